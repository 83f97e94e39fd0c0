//! Descriptors and plain data types shared between the plugin core and
//! backend implementations.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

bitflags! {
    /// Usage flags for buffers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Buffer can be bound as a vertex buffer.
        const VERTEX = 1 << 0;
        /// Buffer can be bound as a constant (uniform) buffer.
        const CONSTANT = 1 << 1;
        /// Buffer can be overwritten from the CPU.
        const COPY_DST = 1 << 2;
    }
}

impl Default for BufferUsage {
    fn default() -> Self {
        Self::empty()
    }
}

/// Descriptor for creating a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BufferDescriptor {
    /// Debug label for the buffer.
    pub label: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// Usage flags.
    pub usage: BufferUsage,
}

impl BufferDescriptor {
    /// Create a new buffer descriptor.
    pub fn new(size: u64, usage: BufferUsage) -> Self {
        Self {
            label: None,
            size,
            usage,
        }
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Shader pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Pixel (fragment) stage.
    Pixel,
}

/// Format of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// Three 32-bit floats.
    Float32x3,
    /// Four unsigned normalized bytes.
    Unorm8x4,
}

impl VertexAttributeFormat {
    /// Size of the attribute in bytes.
    pub fn size(&self) -> u32 {
        match self {
            Self::Float32x3 => 12,
            Self::Unorm8x4 => 4,
        }
    }
}

/// One element of a vertex input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputElement {
    /// Attribute semantic name (matched against the vertex shader signature).
    pub semantic: &'static str,
    /// Attribute format.
    pub format: VertexAttributeFormat,
    /// Byte offset within the vertex.
    pub offset: u32,
}

/// Polygon fill mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    /// Fill polygons.
    #[default]
    Solid,
    /// Draw polygon edges only.
    Wireframe,
}

/// Face culling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// No culling.
    #[default]
    None,
    /// Cull front faces.
    Front,
    /// Cull back faces.
    Back,
}

/// Depth comparison function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareFunc {
    /// Always pass.
    Always,
    /// Pass when the incoming depth is less.
    Less,
    /// Pass when the incoming depth is less or equal.
    #[default]
    LessEqual,
}

/// Descriptor for a rasterizer state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterizerDescriptor {
    /// Polygon fill mode.
    pub fill_mode: FillMode,
    /// Face culling mode.
    pub cull_mode: CullMode,
    /// Whether depth clipping is enabled.
    pub depth_clip: bool,
}

impl Default for RasterizerDescriptor {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Solid,
            cull_mode: CullMode::None,
            depth_clip: true,
        }
    }
}

/// Descriptor for a blend state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendDescriptor {
    /// Whether blending is enabled for the first render target.
    pub enabled: bool,
    /// Color write mask for the first render target.
    pub write_mask: u8,
}

impl Default for BlendDescriptor {
    fn default() -> Self {
        Self {
            enabled: false,
            write_mask: 0xF,
        }
    }
}

/// Descriptor for a depth-stencil state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilDescriptor {
    /// Whether the depth test is enabled.
    pub depth_test: bool,
    /// Whether passing fragments write their depth.
    pub depth_write: bool,
    /// Depth comparison function.
    pub compare: CompareFunc,
}

impl Default for DepthStencilDescriptor {
    fn default() -> Self {
        Self {
            depth_test: true,
            depth_write: false,
            compare: CompareFunc::LessEqual,
        }
    }
}

/// Primitive assembly topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Independent triangles, three vertices each.
    #[default]
    TriangleList,
}

/// Two-dimensional texture extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent2d {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Extent2d {
    /// Create a new extent.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A single triangle vertex.
///
/// `color` is packed RGBA bytes; concrete backends disagree about channel
/// ordering, so the same packed value shows up with swapped channels on some
/// of them.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in normalized device coordinates.
    pub position: [f32; 3],
    /// Packed 32-bit color.
    pub color: u32,
}

impl Vertex {
    /// Size of one vertex in bytes, as consumed by the input assembler.
    pub const STRIDE: u32 = std::mem::size_of::<Self>() as u32;
}

static_assertions::assert_eq_size!(Vertex, [u8; 16]);
static_assertions::assert_impl_all!(Vertex: Pod);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(Vertex::STRIDE, 16);
        let v = Vertex {
            position: [1.0, 2.0, 3.0],
            color: 0xAABBCCDD,
        };
        let bytes = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 16);
        // color sits at offset 12
        assert_eq!(&bytes[12..16], &0xAABBCCDDu32.to_ne_bytes());
    }

    #[test]
    fn test_descriptor_defaults() {
        let rs = RasterizerDescriptor::default();
        assert_eq!(rs.fill_mode, FillMode::Solid);
        assert_eq!(rs.cull_mode, CullMode::None);
        assert!(rs.depth_clip);

        let bs = BlendDescriptor::default();
        assert!(!bs.enabled);
        assert_eq!(bs.write_mask, 0xF);

        let ds = DepthStencilDescriptor::default();
        assert!(ds.depth_test);
        assert!(!ds.depth_write);
        assert_eq!(ds.compare, CompareFunc::LessEqual);
    }

    #[test]
    fn test_buffer_descriptor_builder() {
        let desc = BufferDescriptor::new(1024, BufferUsage::VERTEX).with_label("triangle vb");
        assert_eq!(desc.size, 1024);
        assert_eq!(desc.label.as_deref(), Some("triangle vb"));
    }
}
