//! Per-frame transforms and the fixed triangle geometry.

use glam::Mat4;

use crate::types::Vertex;

/// Depth scale baked into the world matrix translation term.
const WORLD_Z_SCALE: f32 = 0.7;

/// The one triangle this plugin draws: one vertex per primary color,
/// positions already in normalized device coordinates.
///
/// Some backends flip the vertical axis or expect another color byte order;
/// that caveat is the host's to handle, not compensated for here.
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex {
        position: [-0.5, -0.25, 0.0],
        color: 0xFFFF0000,
    },
    Vertex {
        position: [0.5, -0.25, 0.0],
        color: 0xFF00FF00,
    },
    Vertex {
        position: [0.0, 0.5, 0.0],
        color: 0xFF0000FF,
    },
];

/// World matrix for the given animation time: a rotation around the Z axis
/// by `time` radians, with a fixed 0.7 Z term in the last row.
///
/// The matrix depends only on `time`; there is no accumulation between
/// frames. Its 64-byte memory layout is exactly what the constant buffer
/// expects.
pub fn world_matrix(time: f32) -> Mat4 {
    let (sin, cos) = time.sin_cos();
    Mat4::from_cols_array(&[
        cos, -sin, 0.0, 0.0, //
        sin, cos, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, WORLD_Z_SCALE, 1.0,
    ])
}

/// The three transform matrices computed each frame.
///
/// Only `world` ever reaches the GPU; view and projection stay identity
/// because the vertices are authored directly in normalized device
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    /// Z-axis rotation by the current animation time.
    pub world: Mat4,
    /// Identity view matrix.
    pub view: Mat4,
    /// Identity projection matrix.
    pub projection: Mat4,
}

impl FrameTransforms {
    /// Compute the transforms for an animation time.
    pub fn at(time: f32) -> Self {
        Self {
            world: world_matrix(time),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_world_matrix_is_a_rotation() {
        for t in [0.0, 0.5, 1.0, 3.7, -2.25, 1000.0] {
            let m = world_matrix(t);
            let (c, s) = (m.x_axis.x, m.x_axis.y);
            // upper-left 2x2 block is orthonormal with determinant 1
            assert!((c * c + s * s - 1.0).abs() < EPS, "t={t}");
            let det = m.x_axis.x * m.y_axis.y - m.x_axis.y * m.y_axis.x;
            assert!((det - 1.0).abs() < EPS, "t={t}");
        }
    }

    #[test]
    fn test_world_matrix_layout() {
        let m = world_matrix(0.0);
        let expected = [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.7, 1.0,
        ];
        assert_eq!(m.to_cols_array(), expected);
        assert_eq!(bytemuck::bytes_of(&m).len(), 64);
    }

    #[test]
    fn test_world_matrix_has_no_hidden_state() {
        let first = world_matrix(2.5);
        let _ = world_matrix(9.0);
        assert_eq!(world_matrix(2.5), first);
    }

    #[test]
    fn test_frame_transforms_identity_view_projection() {
        let transforms = FrameTransforms::at(1.25);
        assert_eq!(transforms.view, Mat4::IDENTITY);
        assert_eq!(transforms.projection, Mat4::IDENTITY);
        assert_eq!(transforms.world, world_matrix(1.25));
    }

    #[test]
    fn test_triangle_has_one_primary_color_per_vertex() {
        let colors: Vec<u32> = TRIANGLE_VERTICES.iter().map(|v| v.color).collect();
        assert_eq!(colors, vec![0xFFFF0000, 0xFF00FF00, 0xFF0000FF]);
        assert_eq!(bytemuck::cast_slice::<_, u8>(&TRIANGLE_VERTICES).len(), 48);
    }
}
