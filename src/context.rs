//! Plugin state and the per-frame rendering pass.
//!
//! [`PluginContext`] holds everything the host feeds the plugin (animation
//! time, streaming assets path, the external texture handle) together with
//! the device lifecycle state and the GPU resource set. The host owns the
//! context and all calls arrive serialized on its rendering thread, so the
//! context needs no internal locking.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::backend::{BackendKind, ExternalTexture, RenderBackend};
use crate::error::{PluginError, PluginResult};
use crate::frame::{FrameTransforms, TRIANGLE_VERTICES};
use crate::lifecycle::{DeviceEvent, LifecycleState};
use crate::plasma;
use crate::resources::ResourceSet;

/// Process-lifetime plugin state with a single writer (the host's serialized
/// call path).
#[derive(Debug, Default)]
pub struct PluginContext {
    time: f32,
    assets_path: Option<PathBuf>,
    texture: Option<ExternalTexture>,
    backend: Option<Arc<dyn RenderBackend>>,
    backend_kind: BackendKind,
    resources: Option<ResourceSet>,
}

impl PluginContext {
    /// Create a context with no device and nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the current animation time. No validation, no other effects.
    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// The current animation time.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Store the streaming assets base path used for shader loading,
    /// overwriting any previous value. Existence is not checked.
    pub fn set_assets_path(&mut self, path: impl Into<PathBuf>) {
        self.assets_path = Some(path.into());
    }

    /// The streaming assets base path, if the host provided one.
    pub fn assets_path(&self) -> Option<&Path> {
        self.assets_path.as_deref()
    }

    /// Store the host-owned texture handle. The host retains ownership;
    /// `None` disables texture updates.
    pub fn set_texture(&mut self, texture: Option<ExternalTexture>) {
        self.texture = texture;
    }

    /// Which concrete graphics API is active.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend_kind
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> LifecycleState {
        if self.backend.is_some() {
            LifecycleState::Initialized
        } else {
            LifecycleState::Uninitialized
        }
    }

    /// Whether the full GPU resource set currently exists.
    pub fn resources_ready(&self) -> bool {
        self.resources.is_some()
    }

    /// Handle a device lifecycle event from the host.
    pub fn on_device_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::Initialize(backend) => {
                self.backend_kind = backend.kind();
                log::info!("device event: initialize ({:?})", self.backend_kind);
                self.backend = Some(backend);
                // Resource creation is deferred to the first frame; the
                // assets path may not have been provided yet.
            }
            DeviceEvent::Shutdown => {
                log::info!("device event: shutdown");
                // Idempotent: a second shutdown finds nothing to clear.
                self.release_resources();
                self.backend = None;
                self.backend_kind = BackendKind::Null;
                self.texture = None;
            }
            DeviceEvent::BeforeReset => {
                log::info!("device event: before reset");
                // TODO: release the device-dependent resource set here and
                // recreate it on AfterReset; it is currently carried across
                // the reset untouched, which is invalid on backends where a
                // reset invalidates buffers and shaders.
            }
            DeviceEvent::AfterReset => {
                log::info!("device event: after reset");
            }
        }
    }

    /// Make sure the GPU resource set exists, creating it lazily.
    ///
    /// Returns true iff the set is fully present and usable. Idempotent: an
    /// existing set is returned as-is, nothing is re-created. Returns false
    /// without side effects when no device is active or the assets path has
    /// not been provided yet; a failed creation leaves no partial state
    /// behind.
    pub fn ensure_resources(&mut self) -> bool {
        if self.resources.is_some() {
            return true;
        }
        match self.try_create_resources() {
            Ok(()) => true,
            // Waiting on the host is expected, not a failure worth warning
            // about every frame.
            Err(err @ PluginError::DeviceNotInitialized)
            | Err(err @ PluginError::AssetsPathUnset) => {
                log::debug!("resource creation deferred: {err}");
                false
            }
            Err(err) => {
                log::warn!("failed to create GPU resource set: {err}");
                false
            }
        }
    }

    fn try_create_resources(&mut self) -> PluginResult<()> {
        let backend = self
            .backend
            .as_ref()
            .ok_or(PluginError::DeviceNotInitialized)?;
        let assets_path = self
            .assets_path
            .as_deref()
            .ok_or(PluginError::AssetsPathUnset)?;
        let set = ResourceSet::create(backend, assets_path)?;
        log::info!("created GPU resource set: {set:?}");
        self.resources = Some(set);
        Ok(())
    }

    /// Tear down the GPU resource set. Safe to call when nothing exists.
    pub fn release_resources(&mut self) {
        if self.resources.take().is_some() {
            log::debug!("released GPU resource set");
        }
    }

    /// Handle one host-issued render event: establish baseline pipeline
    /// state, draw the triangle, refresh the external texture.
    ///
    /// `event_id` is accepted but unused, reserved for multiplexing several
    /// callbacks through one entry point.
    pub fn on_frame_event(&mut self, event_id: i32) {
        let _ = event_id;
        // Unknown graphics device type? Do nothing.
        if self.backend_kind.is_null() {
            return;
        }
        let Some(backend) = self.backend.clone() else {
            return;
        };

        let transforms = FrameTransforms::at(self.time);
        self.set_default_graphics_state(&backend);
        self.do_rendering(&backend, &transforms);
    }

    /// Bind the baseline depth-stencil, rasterizer and blend state.
    ///
    /// State left by the host's own rendering is arbitrary, so the baseline
    /// is re-bound every frame. Nothing is bound while the resource set does
    /// not exist yet.
    fn set_default_graphics_state(&self, backend: &Arc<dyn RenderBackend>) {
        if let Some(resources) = &self.resources {
            backend.set_default_state(
                resources.depth_stencil_state(),
                resources.rasterizer_state(),
                resources.blend_state(),
            );
        }
    }

    fn do_rendering(&mut self, backend: &Arc<dyn RenderBackend>, transforms: &FrameTransforms) {
        if !self.ensure_resources() {
            log::trace!("skipping draw: resources not ready");
            return;
        }
        let Some(resources) = &self.resources else {
            return;
        };

        // Full 64-byte overwrite of the constant buffer with the world
        // matrix, every frame, changed or not.
        if let Err(err) = backend.write_buffer(
            resources.constant_buffer(),
            bytemuck::bytes_of(&transforms.world),
        ) {
            log::warn!("constant buffer upload failed: {err}");
            return;
        }

        // Full overwrite of the vertex buffer, no partial update.
        if let Err(err) = backend.write_buffer(
            resources.vertex_buffer(),
            bytemuck::cast_slice(&TRIANGLE_VERTICES),
        ) {
            log::warn!("vertex buffer upload failed: {err}");
            return;
        }

        if let Err(err) = backend.draw(&resources.bindings(), TRIANGLE_VERTICES.len() as u32, 0) {
            log::warn!("draw failed: {err}");
        }

        self.update_texture(backend);
    }

    /// Refresh the host-owned texture with procedurally generated pixels.
    fn update_texture(&self, backend: &Arc<dyn RenderBackend>) {
        let Some(texture) = self.texture else {
            return;
        };
        let Some(extent) = backend.texture_extent(texture) else {
            log::warn!("texture update skipped: extent unavailable for {texture:?}");
            return;
        };

        let row_stride = extent.width as usize * plasma::BYTES_PER_PIXEL;
        // Transient staging buffer, released on every exit path.
        let mut pixels = vec![0u8; row_stride * extent.height as usize];
        plasma::fill_plasma(
            extent.width,
            extent.height,
            row_stride,
            self.time,
            &mut pixels,
        );

        if let Err(err) = backend.update_texture(texture, &pixels, row_stride as u32) {
            log::warn!("texture update failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DummyBackend;

    #[test]
    fn test_new_context_is_uninitialized() {
        let ctx = PluginContext::new();
        assert_eq!(ctx.lifecycle(), LifecycleState::Uninitialized);
        assert_eq!(ctx.backend_kind(), BackendKind::Null);
        assert!(!ctx.resources_ready());
        assert_eq!(ctx.assets_path(), None);
    }

    #[test]
    fn test_time_and_path_are_plain_storage() {
        let mut ctx = PluginContext::new();
        ctx.set_time(4.5);
        assert_eq!(ctx.time(), 4.5);
        ctx.set_assets_path("/a");
        ctx.set_assets_path("/b");
        assert_eq!(ctx.assets_path(), Some(Path::new("/b")));
    }

    #[test]
    fn test_initialize_records_backend_kind() {
        let mut ctx = PluginContext::new();
        let backend: Arc<dyn RenderBackend> = Arc::new(DummyBackend::new());
        ctx.on_device_event(DeviceEvent::Initialize(backend));
        assert_eq!(ctx.lifecycle(), LifecycleState::Initialized);
        assert_eq!(ctx.backend_kind(), BackendKind::Dummy);
        // resources stay deferred until first use
        assert!(!ctx.resources_ready());
    }

    #[test]
    fn test_ensure_without_assets_path_is_false() {
        let mut ctx = PluginContext::new();
        let backend: Arc<dyn RenderBackend> = Arc::new(DummyBackend::new());
        ctx.on_device_event(DeviceEvent::Initialize(backend));
        assert!(!ctx.ensure_resources());
        assert!(!ctx.resources_ready());
    }

    #[test]
    fn test_ensure_without_device_is_false() {
        let mut ctx = PluginContext::new();
        ctx.set_assets_path("/somewhere");
        assert!(!ctx.ensure_resources());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut ctx = PluginContext::new();
        let backend: Arc<dyn RenderBackend> = Arc::new(DummyBackend::new());
        ctx.on_device_event(DeviceEvent::Initialize(backend));
        ctx.on_device_event(DeviceEvent::Shutdown);
        assert_eq!(ctx.lifecycle(), LifecycleState::Uninitialized);
        assert_eq!(ctx.backend_kind(), BackendKind::Null);

        // no-op from the uninitialized state
        ctx.on_device_event(DeviceEvent::Shutdown);
        assert_eq!(ctx.lifecycle(), LifecycleState::Uninitialized);
    }

    #[test]
    fn test_reset_events_are_self_loops() {
        let mut ctx = PluginContext::new();
        let backend: Arc<dyn RenderBackend> = Arc::new(DummyBackend::new());
        ctx.on_device_event(DeviceEvent::Initialize(backend));
        ctx.on_device_event(DeviceEvent::BeforeReset);
        ctx.on_device_event(DeviceEvent::AfterReset);
        assert_eq!(ctx.lifecycle(), LifecycleState::Initialized);
        assert_eq!(ctx.backend_kind(), BackendKind::Dummy);
    }

    #[test]
    fn test_frame_event_without_device_is_noop() {
        let mut ctx = PluginContext::new();
        ctx.on_frame_event(0);
        assert!(!ctx.resources_ready());
    }
}
