//! # render-plugin
//!
//! Core of a minimal native rendering extension. A host application owns the
//! graphics device and drives this crate through lifecycle and per-frame
//! callbacks; the crate keeps its GPU resources valid in lockstep with the
//! device and renders one spinning triangle plus one procedurally generated
//! "plasma" texture per frame.
//!
//! ## Overview
//!
//! - [`PluginContext`] - all plugin state, owned by the host and passed into
//!   every call
//! - [`RenderPlugin`] - shared handle mirroring the host-facing surface,
//!   including a stable frame-event handler for the host's command queue
//! - [`RenderBackend`] - trait through which the core talks to whichever
//!   graphics API the host runs; [`DummyBackend`] is the in-process
//!   recording implementation used for tests
//! - [`ResourceSet`] - the all-or-nothing group of GPU objects needed for
//!   the draw, released automatically on drop
//! - [`plasma`] - the pure procedural texture fill
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use render_plugin::{DeviceEvent, DummyBackend, RenderBackend, RenderPlugin};
//!
//! let plugin = RenderPlugin::new();
//! let backend: Arc<dyn RenderBackend> = Arc::new(DummyBackend::new());
//!
//! plugin.set_assets_path("/path/to/streaming/assets");
//! plugin.on_device_event(DeviceEvent::Initialize(backend));
//!
//! let handler = plugin.frame_handler();
//! plugin.set_time(0.016);
//! handler.fire(0); // host enqueues this on its rendering thread
//!
//! plugin.on_device_event(DeviceEvent::Shutdown);
//! ```
//!
//! All calls must arrive serialized on the host's rendering thread; the crate
//! performs no internal threading and every operation runs to completion on
//! the calling thread.

pub mod backend;
pub mod context;
pub mod error;
pub mod frame;
pub mod lifecycle;
pub mod plasma;
pub mod plugin;
pub mod resources;
pub mod shader;
pub mod types;

// Re-export main types for convenience
pub use backend::{
    BackendKind, BufferHandle, DrawBindings, DummyBackend, ExternalTexture, InputLayoutHandle,
    RenderBackend, ShaderHandle, ShaderProfile, StateHandle,
};
pub use context::PluginContext;
pub use error::{PluginError, PluginResult};
pub use lifecycle::{DeviceEvent, LifecycleState};
pub use plugin::{FrameEventHandler, RenderPlugin};
pub use resources::{ResourceSet, CONSTANT_BUFFER_SIZE, VERTEX_BUFFER_SIZE};
pub use types::{
    BlendDescriptor, BufferDescriptor, BufferUsage, CompareFunc, CullMode, DepthStencilDescriptor,
    Extent2d, FillMode, InputElement, PrimitiveTopology, RasterizerDescriptor, ShaderStage, Vertex,
    VertexAttributeFormat,
};

/// Plugin library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_buffer_size_constants() {
        assert_eq!(VERTEX_BUFFER_SIZE, 1024);
        assert_eq!(CONSTANT_BUFFER_SIZE, 64);
    }
}
