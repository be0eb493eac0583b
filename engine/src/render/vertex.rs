//! GPU Vertex Layout
//!
//! Shared vertex format for the tower pass and the overlay pass. Matches the
//! `VertexInput` structs in `shaders/tower.wgsl` and `shaders/overlay.wgsl`:
//! - position: vec3<f32> at @location(0)
//! - normal: vec3<f32> at @location(1)
//! - color: vec4<f32> at @location(2)

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TowerVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(TowerVertex, [u8; 40]);

impl TowerVertex {
    /// Creates a new vertex with the given position, normal, and color.
    pub fn new(position: Vec3, normal: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color,
        }
    }

    /// Vertex buffer layout shared by both render pipelines.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0, // position
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1, // normal
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 24,
                shader_location: 2, // color
            },
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TowerVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Append a screen-space quad (two triangles) to an indexed vertex list.
///
/// Corners are given clockwise starting top-left; coordinates are already in
/// normalized device space.
pub fn add_quad(
    vertices: &mut Vec<TowerVertex>,
    indices: &mut Vec<u32>,
    tl: [f32; 3],
    tr: [f32; 3],
    br: [f32; 3],
    bl: [f32; 3],
    color: [f32; 4],
) {
    let base = vertices.len() as u32;
    let normal = [0.0, 0.0, 1.0];

    for position in [tl, tr, br, bl] {
        vertices.push(TowerVertex {
            position,
            normal,
            color,
        });
    }

    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size() {
        // position: 12 bytes, normal: 12 bytes, color: 16 bytes = 40 bytes
        assert_eq!(std::mem::size_of::<TowerVertex>(), 40);
        assert_eq!(TowerVertex::layout().array_stride, 40);
    }

    #[test]
    fn test_add_quad_indices() {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let white = [1.0; 4];
        add_quad(&mut vertices, &mut indices, [0.0; 3], [1.0, 0.0, 0.0], [1.0, -1.0, 0.0], [0.0, -1.0, 0.0], white);
        add_quad(&mut vertices, &mut indices, [0.0; 3], [1.0, 0.0, 0.0], [1.0, -1.0, 0.0], [0.0, -1.0, 0.0], white);

        assert_eq!(vertices.len(), 8);
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }
}
