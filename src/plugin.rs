//! Host-facing plugin surface.
//!
//! [`RenderPlugin`] wraps the context in a shared handle and exposes the
//! boundary operations a host binds to. [`RenderPlugin::frame_handler`]
//! hands out a stable, cloneable entry point the host can enqueue on its own
//! graphics command stream instead of calling the plugin directly.
//!
//! The host guarantees all calls arrive serialized on its rendering thread;
//! the mutex exists so the handles are `Send + Sync`, not because calls
//! contend.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{BackendKind, ExternalTexture};
use crate::context::PluginContext;
use crate::lifecycle::DeviceEvent;

/// Shared handle to the plugin, mirroring the exported host surface.
#[derive(Debug, Default, Clone)]
pub struct RenderPlugin {
    context: Arc<Mutex<PluginContext>>,
}

impl RenderPlugin {
    /// Create a plugin with a fresh context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the current animation time.
    pub fn set_time(&self, time: f32) {
        self.context.lock().set_time(time);
    }

    /// Store the streaming assets base path.
    pub fn set_assets_path(&self, path: impl Into<PathBuf>) {
        self.context.lock().set_assets_path(path);
    }

    /// Store the host-owned texture handle; `None` disables texture updates.
    pub fn set_texture(&self, texture: Option<ExternalTexture>) {
        self.context.lock().set_texture(texture);
    }

    /// Forward a device lifecycle event.
    pub fn on_device_event(&self, event: DeviceEvent) {
        self.context.lock().on_device_event(event);
    }

    /// Run one render + texture-update pass.
    pub fn on_frame_event(&self, event_id: i32) {
        self.context.lock().on_frame_event(event_id);
    }

    /// Which concrete graphics API is active.
    pub fn backend_kind(&self) -> BackendKind {
        self.context.lock().backend_kind()
    }

    /// A stable handler the host can schedule for frame events.
    pub fn frame_handler(&self) -> FrameEventHandler {
        FrameEventHandler {
            context: Arc::clone(&self.context),
        }
    }

    /// Run a closure against the locked context. Mostly useful for tests and
    /// host glue that needs state the boundary operations don't expose.
    pub fn with_context<R>(&self, f: impl FnOnce(&mut PluginContext) -> R) -> R {
        f(&mut self.context.lock())
    }
}

/// Cloneable frame-event entry point with a stable target context.
///
/// Every clone fires into the same [`PluginContext`] as the plugin it came
/// from, so the host may capture it once and invoke it from its render queue
/// for the lifetime of the plugin.
#[derive(Debug, Clone)]
pub struct FrameEventHandler {
    context: Arc<Mutex<PluginContext>>,
}

impl FrameEventHandler {
    /// Run one render + texture-update pass.
    pub fn fire(&self, event_id: i32) {
        self.context.lock().on_frame_event(event_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DummyBackend, RenderBackend};

    #[test]
    fn test_handler_targets_the_same_context() {
        let plugin = RenderPlugin::new();
        let handler = plugin.frame_handler();

        plugin.set_time(2.0);
        assert_eq!(plugin.with_context(|ctx| ctx.time()), 2.0);

        // firing through the handler is a no-op without a device, like the
        // direct call
        handler.fire(0);
        handler.clone().fire(1);
        assert_eq!(plugin.backend_kind(), BackendKind::Null);
    }

    #[test]
    fn test_boundary_operations_forward() {
        let plugin = RenderPlugin::new();
        let backend: Arc<dyn RenderBackend> = Arc::new(DummyBackend::new());
        plugin.on_device_event(DeviceEvent::Initialize(backend));
        assert_eq!(plugin.backend_kind(), BackendKind::Dummy);

        plugin.on_device_event(DeviceEvent::Shutdown);
        assert_eq!(plugin.backend_kind(), BackendKind::Null);
    }
}
