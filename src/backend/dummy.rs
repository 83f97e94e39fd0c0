//! Dummy recording backend for testing and development.
//!
//! This backend doesn't perform actual GPU operations but provides a valid
//! [`RenderBackend`] implementation that records every call, so plugin
//! behavior can be asserted without GPU hardware. Tests register host-side
//! textures with [`DummyBackend::register_texture`] and inspect uploads,
//! draws and live resource counts through the accessor methods.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::{PluginError, PluginResult};
use crate::types::{
    BlendDescriptor, BufferDescriptor, DepthStencilDescriptor, Extent2d, InputElement,
    RasterizerDescriptor, ShaderStage,
};

use super::{
    BackendKind, BufferHandle, DrawBindings, ExternalTexture, InputLayoutHandle, RenderBackend,
    ShaderHandle, ShaderProfile, StateHandle,
};

/// One recorded draw submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRecord {
    /// Bindings active for the draw.
    pub bindings: DrawBindings,
    /// Number of vertices drawn.
    pub vertex_count: u32,
    /// First vertex index.
    pub first_vertex: u32,
}

#[derive(Debug)]
struct DummyBuffer {
    size: u64,
    contents: Option<Vec<u8>>,
}

#[derive(Debug)]
struct DummyTexture {
    extent: Extent2d,
    pixels: Option<Vec<u8>>,
}

#[derive(Debug, Default)]
struct DummyState {
    next_handle: u64,
    next_texture: u64,
    buffers: HashMap<u64, DummyBuffer>,
    shaders: HashMap<u64, ShaderStage>,
    input_layouts: HashMap<u64, usize>,
    states: HashMap<u64, &'static str>,
    textures: HashMap<u64, DummyTexture>,
    draws: Vec<DrawRecord>,
    default_state_binds: u32,
    fail_creation: bool,
}

impl DummyState {
    fn alloc_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn check_creation_allowed(&self, what: &'static str) -> PluginResult<()> {
        if self.fail_creation {
            return Err(PluginError::ResourceCreationFailed {
                what,
                reason: "simulated backend failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Recording dummy backend.
#[derive(Debug, Default)]
pub struct DummyBackend {
    state: Mutex<DummyState>,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a host-owned texture so the plugin can resolve its extent
    /// and upload pixels into it.
    pub fn register_texture(&self, width: u32, height: u32) -> ExternalTexture {
        let mut state = self.state.lock();
        state.next_texture += 1;
        let id = state.next_texture;
        state.textures.insert(
            id,
            DummyTexture {
                extent: Extent2d::new(width, height),
                pixels: None,
            },
        );
        ExternalTexture(id)
    }

    /// Number of live backend resources (buffers, shaders, layouts, states).
    /// Host-owned textures are not counted.
    pub fn live_resource_count(&self) -> usize {
        let state = self.state.lock();
        state.buffers.len() + state.shaders.len() + state.input_layouts.len() + state.states.len()
    }

    /// Total number of draws submitted so far.
    pub fn draw_count(&self) -> usize {
        self.state.lock().draws.len()
    }

    /// All recorded draw submissions.
    pub fn draws(&self) -> Vec<DrawRecord> {
        self.state.lock().draws.clone()
    }

    /// Contents of a buffer after its last write, if any.
    pub fn buffer_contents(&self, handle: BufferHandle) -> Option<Vec<u8>> {
        self.state
            .lock()
            .buffers
            .get(&handle.0)
            .and_then(|buffer| buffer.contents.clone())
    }

    /// Pixels uploaded to a registered texture, if any upload happened.
    pub fn texture_pixels(&self, texture: ExternalTexture) -> Option<Vec<u8>> {
        self.state
            .lock()
            .textures
            .get(&texture.0)
            .and_then(|tex| tex.pixels.clone())
    }

    /// How many times the baseline pipeline state was bound.
    pub fn default_state_bind_count(&self) -> u32 {
        self.state.lock().default_state_binds
    }

    /// Make every subsequent `create_*` call fail until cleared.
    pub fn set_fail_resource_creation(&self, fail: bool) {
        self.state.lock().fail_creation = fail;
    }
}

impl RenderBackend for DummyBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Dummy
    }

    fn shader_profile(&self) -> ShaderProfile {
        ShaderProfile {
            directory: "Dummy",
            extension: "bin",
        }
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> PluginResult<BufferHandle> {
        let mut state = self.state.lock();
        state.check_creation_allowed("buffer")?;
        let handle = state.alloc_handle();
        state.buffers.insert(
            handle,
            DummyBuffer {
                size: descriptor.size,
                contents: None,
            },
        );
        log::trace!(
            "DummyBackend: created buffer {:?} (size: {})",
            descriptor.label,
            descriptor.size
        );
        Ok(BufferHandle(handle))
    }

    fn create_shader(&self, stage: ShaderStage, bytecode: &[u8]) -> PluginResult<ShaderHandle> {
        let mut state = self.state.lock();
        state.check_creation_allowed("shader")?;
        if bytecode.is_empty() {
            return Err(PluginError::ResourceCreationFailed {
                what: "shader",
                reason: "empty bytecode".to_string(),
            });
        }
        let handle = state.alloc_handle();
        state.shaders.insert(handle, stage);
        log::trace!(
            "DummyBackend: created {:?} shader ({} bytes)",
            stage,
            bytecode.len()
        );
        Ok(ShaderHandle(handle))
    }

    fn create_input_layout(
        &self,
        elements: &[InputElement],
        vertex_shader_bytecode: &[u8],
    ) -> PluginResult<InputLayoutHandle> {
        let mut state = self.state.lock();
        state.check_creation_allowed("input layout")?;
        if vertex_shader_bytecode.is_empty() {
            return Err(PluginError::ResourceCreationFailed {
                what: "input layout",
                reason: "no vertex shader signature to validate against".to_string(),
            });
        }
        let handle = state.alloc_handle();
        state.input_layouts.insert(handle, elements.len());
        let vertex_size: u32 = elements.iter().map(|e| e.format.size()).sum();
        log::trace!(
            "DummyBackend: created input layout with {} elements ({} bytes per vertex)",
            elements.len(),
            vertex_size
        );
        Ok(InputLayoutHandle(handle))
    }

    fn create_rasterizer_state(
        &self,
        descriptor: &RasterizerDescriptor,
    ) -> PluginResult<StateHandle> {
        let mut state = self.state.lock();
        state.check_creation_allowed("rasterizer state")?;
        let handle = state.alloc_handle();
        state.states.insert(handle, "rasterizer");
        log::trace!("DummyBackend: created rasterizer state {:?}", descriptor);
        Ok(StateHandle(handle))
    }

    fn create_blend_state(&self, descriptor: &BlendDescriptor) -> PluginResult<StateHandle> {
        let mut state = self.state.lock();
        state.check_creation_allowed("blend state")?;
        let handle = state.alloc_handle();
        state.states.insert(handle, "blend");
        log::trace!("DummyBackend: created blend state {:?}", descriptor);
        Ok(StateHandle(handle))
    }

    fn create_depth_stencil_state(
        &self,
        descriptor: &DepthStencilDescriptor,
    ) -> PluginResult<StateHandle> {
        let mut state = self.state.lock();
        state.check_creation_allowed("depth-stencil state")?;
        let handle = state.alloc_handle();
        state.states.insert(handle, "depth-stencil");
        log::trace!("DummyBackend: created depth-stencil state {:?}", descriptor);
        Ok(StateHandle(handle))
    }

    fn destroy_buffer(&self, handle: BufferHandle) {
        self.state.lock().buffers.remove(&handle.0);
        log::trace!("DummyBackend: destroyed buffer {:?}", handle);
    }

    fn destroy_shader(&self, handle: ShaderHandle) {
        self.state.lock().shaders.remove(&handle.0);
        log::trace!("DummyBackend: destroyed shader {:?}", handle);
    }

    fn destroy_input_layout(&self, handle: InputLayoutHandle) {
        self.state.lock().input_layouts.remove(&handle.0);
        log::trace!("DummyBackend: destroyed input layout {:?}", handle);
    }

    fn destroy_state(&self, handle: StateHandle) {
        self.state.lock().states.remove(&handle.0);
        log::trace!("DummyBackend: destroyed state {:?}", handle);
    }

    fn write_buffer(&self, handle: BufferHandle, data: &[u8]) -> PluginResult<()> {
        let mut state = self.state.lock();
        let Some(buffer) = state.buffers.get_mut(&handle.0) else {
            return Err(PluginError::BufferWriteFailed(format!(
                "unknown buffer {handle:?}"
            )));
        };
        if data.len() as u64 > buffer.size {
            return Err(PluginError::BufferWriteFailed(format!(
                "write of {} bytes exceeds buffer size {}",
                data.len(),
                buffer.size
            )));
        }
        buffer.contents = Some(data.to_vec());
        log::trace!(
            "DummyBackend: write_buffer {:?} len={}",
            handle,
            data.len()
        );
        Ok(())
    }

    fn set_default_state(
        &self,
        depth_stencil: StateHandle,
        rasterizer: StateHandle,
        blend: StateHandle,
    ) {
        let mut state = self.state.lock();
        state.default_state_binds += 1;
        log::trace!(
            "DummyBackend: bound default state (depth={:?}, raster={:?}, blend={:?})",
            depth_stencil,
            rasterizer,
            blend
        );
    }

    fn draw(
        &self,
        bindings: &DrawBindings,
        vertex_count: u32,
        first_vertex: u32,
    ) -> PluginResult<()> {
        let mut state = self.state.lock();
        let live = state.buffers.contains_key(&bindings.vertex_buffer.0)
            && state.buffers.contains_key(&bindings.constant_buffer.0)
            && state.shaders.contains_key(&bindings.vertex_shader.0)
            && state.shaders.contains_key(&bindings.pixel_shader.0)
            && state.input_layouts.contains_key(&bindings.input_layout.0);
        if !live {
            return Err(PluginError::DrawFailed(
                "draw submitted with stale bindings".to_string(),
            ));
        }
        state.draws.push(DrawRecord {
            bindings: *bindings,
            vertex_count,
            first_vertex,
        });
        log::trace!(
            "DummyBackend: draw {} vertices starting at {}",
            vertex_count,
            first_vertex
        );
        Ok(())
    }

    fn texture_extent(&self, texture: ExternalTexture) -> Option<Extent2d> {
        self.state
            .lock()
            .textures
            .get(&texture.0)
            .map(|tex| tex.extent)
    }

    fn update_texture(
        &self,
        texture: ExternalTexture,
        data: &[u8],
        row_stride: u32,
    ) -> PluginResult<()> {
        let mut state = self.state.lock();
        let Some(tex) = state.textures.get_mut(&texture.0) else {
            return Err(PluginError::TextureUpdateFailed(format!(
                "unknown texture {texture:?}"
            )));
        };
        let expected = row_stride as usize * tex.extent.height as usize;
        if data.len() < expected {
            return Err(PluginError::TextureUpdateFailed(format!(
                "upload of {} bytes is short of {} ({}x{} at stride {})",
                data.len(),
                expected,
                tex.extent.width,
                tex.extent.height,
                row_stride
            )));
        }
        tex.pixels = Some(data.to_vec());
        log::trace!(
            "DummyBackend: update_texture {:?} ({}x{}) len={}",
            texture,
            tex.extent.width,
            tex.extent.height,
            data.len()
        );
        Ok(())
    }
}
