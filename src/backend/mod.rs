//! Graphics backend abstraction.
//!
//! The host owns the graphics device; this module defines the trait through
//! which the plugin core talks to whichever concrete API the host is running
//! on. The lifecycle controller and frame renderer depend only on
//! [`RenderBackend`], never on a concrete API.
//!
//! The crate ships a single in-process implementation, [`DummyBackend`],
//! which performs no GPU work but records every call so behavior can be
//! tested without hardware. Hosts supply real implementations for their own
//! APIs.

pub mod dummy;

pub use dummy::DummyBackend;

use crate::error::PluginResult;
use crate::types::{
    BlendDescriptor, BufferDescriptor, DepthStencilDescriptor, Extent2d, InputElement,
    PrimitiveTopology, RasterizerDescriptor, ShaderStage,
};

/// Identifies which concrete graphics API is active.
///
/// `Null` is both the initial value and the value after shutdown; every frame
/// call is a no-op while the kind is `Null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum BackendKind {
    /// No device is active.
    #[default]
    Null,
    /// Direct3D 11 class device.
    Direct3D11,
    /// Vulkan class device.
    Vulkan,
    /// In-process recording device used for tests and development.
    Dummy,
}

impl BackendKind {
    /// Returns true if no device is active.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Where a backend's compiled shader binaries live and how they are named:
/// `<assets>/Shaders/<directory>/<stem>.<extension>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderProfile {
    /// Profile directory under `Shaders/`.
    pub directory: &'static str,
    /// File extension of compiled shader blobs.
    pub extension: &'static str,
}

/// Opaque handle to a backend buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub(crate) u64);

/// Opaque handle to a backend shader object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub(crate) u64);

/// Opaque handle to a backend input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputLayoutHandle(pub(crate) u64);

/// Opaque handle to a fixed-function state object
/// (rasterizer, blend or depth-stencil).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHandle(pub(crate) u64);

/// Identity of a host-owned texture.
///
/// The host allocates and frees the underlying texture; the plugin only
/// writes pixel content into it. On a native backend this carries the
/// texture pointer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExternalTexture(pub u64);

/// Everything bound for one draw submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawBindings {
    /// Vertex buffer bound at slot 0.
    pub vertex_buffer: BufferHandle,
    /// Vertex stride in bytes.
    pub vertex_stride: u32,
    /// Constant buffer bound to the vertex stage at slot 0.
    pub constant_buffer: BufferHandle,
    /// Vertex shader.
    pub vertex_shader: ShaderHandle,
    /// Pixel shader.
    pub pixel_shader: ShaderHandle,
    /// Input layout.
    pub input_layout: InputLayoutHandle,
    /// Primitive topology.
    pub topology: PrimitiveTopology,
}

/// Interface to the active graphics device.
///
/// All calls arrive serialized on the host's rendering thread; implementations
/// do not need internal synchronization for correctness, only for being
/// `Send + Sync`.
pub trait RenderBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Which concrete API this backend drives.
    fn kind(&self) -> BackendKind;

    /// Shader binary naming for this backend.
    fn shader_profile(&self) -> ShaderProfile;

    /// Create a buffer resource.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> PluginResult<BufferHandle>;

    /// Create a shader from opaque compiled bytecode.
    fn create_shader(&self, stage: ShaderStage, bytecode: &[u8]) -> PluginResult<ShaderHandle>;

    /// Create an input layout validated against the vertex shader's
    /// reflected input signature.
    fn create_input_layout(
        &self,
        elements: &[InputElement],
        vertex_shader_bytecode: &[u8],
    ) -> PluginResult<InputLayoutHandle>;

    /// Create a rasterizer state object.
    fn create_rasterizer_state(&self, descriptor: &RasterizerDescriptor)
        -> PluginResult<StateHandle>;

    /// Create a blend state object.
    fn create_blend_state(&self, descriptor: &BlendDescriptor) -> PluginResult<StateHandle>;

    /// Create a depth-stencil state object.
    fn create_depth_stencil_state(
        &self,
        descriptor: &DepthStencilDescriptor,
    ) -> PluginResult<StateHandle>;

    /// Destroy a buffer. Must tolerate handles it no longer knows about.
    fn destroy_buffer(&self, handle: BufferHandle);

    /// Destroy a shader.
    fn destroy_shader(&self, handle: ShaderHandle);

    /// Destroy an input layout.
    fn destroy_input_layout(&self, handle: InputLayoutHandle);

    /// Destroy a fixed-function state object.
    fn destroy_state(&self, handle: StateHandle);

    /// Overwrite a buffer's contents from the start. Always a full upload,
    /// never a partial update.
    fn write_buffer(&self, handle: BufferHandle, data: &[u8]) -> PluginResult<()>;

    /// Bind the baseline depth-stencil, rasterizer and blend state to the
    /// immediate rendering context, overriding whatever state the host's own
    /// rendering left behind.
    fn set_default_state(
        &self,
        depth_stencil: StateHandle,
        rasterizer: StateHandle,
        blend: StateHandle,
    );

    /// Bind everything in `bindings` and issue one non-indexed draw.
    fn draw(&self, bindings: &DrawBindings, vertex_count: u32, first_vertex: u32)
        -> PluginResult<()>;

    /// Query the dimensions of a host-owned texture, if the backend can
    /// resolve the handle.
    fn texture_extent(&self, texture: ExternalTexture) -> Option<Extent2d>;

    /// Upload pixel data as a full-subresource update of a host-owned
    /// texture.
    fn update_texture(
        &self,
        texture: ExternalTexture,
        data: &[u8],
        row_stride: u32,
    ) -> PluginResult<()>;
}
