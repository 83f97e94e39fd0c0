//! GPU resource set ownership.
//!
//! Every backend object needed for the triangle draw is wrapped in a scoped
//! handle whose `Drop` releases it exactly once, and the wrappers are
//! composed into [`ResourceSet`]. The set is all-or-nothing: creation either
//! yields a complete usable set or an error, and anything built before the
//! failing step is released on the way out. Drawing never sees a partially
//! built set.

use std::path::Path;
use std::sync::Arc;

use crate::backend::{
    BufferHandle, DrawBindings, InputLayoutHandle, RenderBackend, ShaderHandle, StateHandle,
};
use crate::error::PluginResult;
use crate::shader::{self, PIXEL_SHADER_STEM, VERTEX_SHADER_STEM};
use crate::types::{
    BlendDescriptor, BufferDescriptor, BufferUsage, DepthStencilDescriptor, InputElement,
    PrimitiveTopology, RasterizerDescriptor, ShaderStage, Vertex, VertexAttributeFormat,
};

/// Fixed capacity of the vertex buffer in bytes.
pub const VERTEX_BUFFER_SIZE: u64 = 1024;

/// Size of the constant buffer in bytes: exactly one 4x4 float matrix.
pub const CONSTANT_BUFFER_SIZE: u64 = 64;

/// The two-attribute vertex format the input layout binds.
const INPUT_ELEMENTS: [InputElement; 2] = [
    InputElement {
        semantic: "POSITION",
        format: VertexAttributeFormat::Float32x3,
        offset: 0,
    },
    InputElement {
        semantic: "COLOR",
        format: VertexAttributeFormat::Unorm8x4,
        offset: 12,
    },
];

struct OwnedBuffer {
    backend: Arc<dyn RenderBackend>,
    handle: BufferHandle,
}

impl OwnedBuffer {
    fn create(backend: &Arc<dyn RenderBackend>, descriptor: &BufferDescriptor) -> PluginResult<Self> {
        let handle = backend.create_buffer(descriptor)?;
        Ok(Self {
            backend: Arc::clone(backend),
            handle,
        })
    }
}

impl Drop for OwnedBuffer {
    fn drop(&mut self) {
        self.backend.destroy_buffer(self.handle);
    }
}

struct OwnedShader {
    backend: Arc<dyn RenderBackend>,
    handle: ShaderHandle,
}

impl OwnedShader {
    fn create(
        backend: &Arc<dyn RenderBackend>,
        stage: ShaderStage,
        bytecode: &[u8],
    ) -> PluginResult<Self> {
        let handle = backend.create_shader(stage, bytecode)?;
        Ok(Self {
            backend: Arc::clone(backend),
            handle,
        })
    }
}

impl Drop for OwnedShader {
    fn drop(&mut self) {
        self.backend.destroy_shader(self.handle);
    }
}

struct OwnedInputLayout {
    backend: Arc<dyn RenderBackend>,
    handle: InputLayoutHandle,
}

impl OwnedInputLayout {
    fn create(
        backend: &Arc<dyn RenderBackend>,
        elements: &[InputElement],
        vertex_shader_bytecode: &[u8],
    ) -> PluginResult<Self> {
        let handle = backend.create_input_layout(elements, vertex_shader_bytecode)?;
        Ok(Self {
            backend: Arc::clone(backend),
            handle,
        })
    }
}

impl Drop for OwnedInputLayout {
    fn drop(&mut self) {
        self.backend.destroy_input_layout(self.handle);
    }
}

struct OwnedState {
    backend: Arc<dyn RenderBackend>,
    handle: StateHandle,
}

impl OwnedState {
    fn wrap(backend: &Arc<dyn RenderBackend>, handle: StateHandle) -> Self {
        Self {
            backend: Arc::clone(backend),
            handle,
        }
    }
}

impl Drop for OwnedState {
    fn drop(&mut self) {
        self.backend.destroy_state(self.handle);
    }
}

/// The complete group of GPU objects required for one triangle draw.
///
/// Created after the device is valid and the assets path is known; torn down
/// by dropping it. Either fully present or not present at all.
pub struct ResourceSet {
    vertex_buffer: OwnedBuffer,
    constant_buffer: OwnedBuffer,
    vertex_shader: OwnedShader,
    pixel_shader: OwnedShader,
    input_layout: OwnedInputLayout,
    rasterizer_state: OwnedState,
    blend_state: OwnedState,
    depth_stencil_state: OwnedState,
}

impl ResourceSet {
    /// Create the full resource set.
    ///
    /// Creation order: vertex buffer, constant buffer, shader binaries from
    /// the assets path, input layout against the vertex shader signature,
    /// then the fixed-function states. Any failure releases everything
    /// created so far and returns the error.
    pub fn create(backend: &Arc<dyn RenderBackend>, assets_path: &Path) -> PluginResult<Self> {
        let vertex_buffer = OwnedBuffer::create(
            backend,
            &BufferDescriptor::new(VERTEX_BUFFER_SIZE, BufferUsage::VERTEX | BufferUsage::COPY_DST)
                .with_label("triangle vertices"),
        )?;
        let constant_buffer = OwnedBuffer::create(
            backend,
            &BufferDescriptor::new(
                CONSTANT_BUFFER_SIZE,
                BufferUsage::CONSTANT | BufferUsage::COPY_DST,
            )
            .with_label("world matrix"),
        )?;

        let profile = backend.shader_profile();
        let vs_bytecode = shader::load_shader_bytecode(assets_path, profile, VERTEX_SHADER_STEM)?;
        let ps_bytecode = shader::load_shader_bytecode(assets_path, profile, PIXEL_SHADER_STEM)?;
        let vertex_shader = OwnedShader::create(backend, ShaderStage::Vertex, &vs_bytecode)?;
        let pixel_shader = OwnedShader::create(backend, ShaderStage::Pixel, &ps_bytecode)?;

        let input_layout = OwnedInputLayout::create(backend, &INPUT_ELEMENTS, &vs_bytecode)?;

        let rasterizer_state = OwnedState::wrap(
            backend,
            backend.create_rasterizer_state(&RasterizerDescriptor::default())?,
        );
        let blend_state = OwnedState::wrap(
            backend,
            backend.create_blend_state(&BlendDescriptor::default())?,
        );
        let depth_stencil_state = OwnedState::wrap(
            backend,
            backend.create_depth_stencil_state(&DepthStencilDescriptor::default())?,
        );

        Ok(Self {
            vertex_buffer,
            constant_buffer,
            vertex_shader,
            pixel_shader,
            input_layout,
            rasterizer_state,
            blend_state,
            depth_stencil_state,
        })
    }

    /// Bindings for the triangle draw.
    pub fn bindings(&self) -> DrawBindings {
        DrawBindings {
            vertex_buffer: self.vertex_buffer.handle,
            vertex_stride: Vertex::STRIDE,
            constant_buffer: self.constant_buffer.handle,
            vertex_shader: self.vertex_shader.handle,
            pixel_shader: self.pixel_shader.handle,
            input_layout: self.input_layout.handle,
            topology: PrimitiveTopology::TriangleList,
        }
    }

    /// The vertex buffer handle.
    pub fn vertex_buffer(&self) -> BufferHandle {
        self.vertex_buffer.handle
    }

    /// The constant buffer handle.
    pub fn constant_buffer(&self) -> BufferHandle {
        self.constant_buffer.handle
    }

    /// The rasterizer state handle.
    pub fn rasterizer_state(&self) -> StateHandle {
        self.rasterizer_state.handle
    }

    /// The blend state handle.
    pub fn blend_state(&self) -> StateHandle {
        self.blend_state.handle
    }

    /// The depth-stencil state handle.
    pub fn depth_stencil_state(&self) -> StateHandle {
        self.depth_stencil_state.handle
    }
}

impl std::fmt::Debug for ResourceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceSet")
            .field("vertex_buffer", &self.vertex_buffer.handle)
            .field("constant_buffer", &self.constant_buffer.handle)
            .field("vertex_shader", &self.vertex_shader.handle)
            .field("pixel_shader", &self.pixel_shader.handle)
            .field("input_layout", &self.input_layout.handle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DummyBackend;

    fn backend() -> (Arc<DummyBackend>, Arc<dyn RenderBackend>) {
        let concrete = Arc::new(DummyBackend::new());
        let dynamic: Arc<dyn RenderBackend> = concrete.clone();
        (concrete, dynamic)
    }

    fn write_shader_fixtures(dir: &Path) {
        let shader_dir = dir.join("Shaders").join("Dummy");
        std::fs::create_dir_all(&shader_dir).unwrap();
        std::fs::write(shader_dir.join("SimpleVertexShader.bin"), [0xB0, 0x01]).unwrap();
        std::fs::write(shader_dir.join("SimplePixelShader.bin"), [0xB0, 0x02]).unwrap();
    }

    fn fixture_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "render-plugin-resources-{tag}-{}",
            std::process::id()
        ));
        write_shader_fixtures(&dir);
        dir
    }

    #[test]
    fn test_create_and_drop_releases_everything() {
        let (dummy, dynamic) = backend();
        let dir = fixture_dir("roundtrip");

        let set = ResourceSet::create(&dynamic, &dir).unwrap();
        // 2 buffers + 2 shaders + input layout + 3 states
        assert_eq!(dummy.live_resource_count(), 8);

        drop(set);
        assert_eq!(dummy.live_resource_count(), 0);

        // a second creation is indistinguishable from the first
        let set = ResourceSet::create(&dynamic, &dir).unwrap();
        assert_eq!(dummy.live_resource_count(), 8);
        drop(set);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_shader_fails_without_leaking() {
        let (dummy, dynamic) = backend();
        let dir = std::env::temp_dir().join(format!(
            "render-plugin-resources-missing-{}",
            std::process::id()
        ));
        // only the vertex shader exists
        let shader_dir = dir.join("Shaders").join("Dummy");
        std::fs::create_dir_all(&shader_dir).unwrap();
        std::fs::write(shader_dir.join("SimpleVertexShader.bin"), [0xB0]).unwrap();

        let err = ResourceSet::create(&dynamic, &dir).unwrap_err();
        assert!(matches!(err, crate::error::PluginError::ShaderIo { .. }));
        // the buffers created before the failure were released
        assert_eq!(dummy.live_resource_count(), 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_backend_failure_fails_without_leaking() {
        let (dummy, dynamic) = backend();
        let dir = fixture_dir("backend-failure");

        dummy.set_fail_resource_creation(true);
        assert!(ResourceSet::create(&dynamic, &dir).is_err());
        assert_eq!(dummy.live_resource_count(), 0);

        dummy.set_fail_resource_creation(false);
        assert!(ResourceSet::create(&dynamic, &dir).is_ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bindings_reference_owned_resources() {
        let (dummy, dynamic) = backend();
        let dir = fixture_dir("bindings");

        let set = ResourceSet::create(&dynamic, &dir).unwrap();
        let bindings = set.bindings();
        assert_eq!(bindings.vertex_stride, 16);
        assert_eq!(bindings.topology, PrimitiveTopology::TriangleList);
        assert_eq!(bindings.vertex_buffer, set.vertex_buffer());
        assert_eq!(bindings.constant_buffer, set.constant_buffer());

        drop(set);
        drop(dummy);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
