//! Device lifecycle events and states.
//!
//! The host initializes, resets and shuts the graphics device down at points
//! outside this crate's control, and notifies the plugin through
//! [`DeviceEvent`]s. Events arrive serialized on the rendering thread, never
//! concurrently with each other or with frame events.

use std::sync::Arc;

use crate::backend::RenderBackend;

/// A device lifecycle notification issued by the host.
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// The device was created. Carries the backend through which the plugin
    /// talks to it; the backend stays valid until `Shutdown`.
    Initialize(Arc<dyn RenderBackend>),
    /// The device is about to reset.
    BeforeReset,
    /// The device finished resetting.
    AfterReset,
    /// The device is being destroyed. Must be the last event before the
    /// device becomes invalid.
    Shutdown,
}

/// State of the device lifecycle machine.
///
/// `Uninitialized -> Initialized` on `Initialize`,
/// `Initialized -> Uninitialized` on `Shutdown`.
/// `BeforeReset`/`AfterReset` are self-loops on `Initialized`; from
/// `Uninitialized` every event except `Initialize` is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// No device is active.
    #[default]
    Uninitialized,
    /// A device is active and frame events may draw.
    Initialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_uninitialized() {
        assert_eq!(LifecycleState::default(), LifecycleState::Uninitialized);
    }
}
