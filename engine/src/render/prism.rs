//! Prism Floor Template
//!
//! The single-floor geometry every tower floor is cloned from: a regular
//! prism with `segments` sides, unit circumradius, unit height, centered on
//! the origin (Y from -0.5 to +0.5). The floor transform scales it to the
//! floor's radius and thickness.
//!
//! # Layout
//!
//! Non-indexed, grouped per segment:
//! - Side face: 1 quad = 2 triangles (6 vertices)
//! - Top cap: 1 triangle of the fan (3 vertices)
//! - Bottom cap: 1 triangle of the fan (3 vertices)
//!
//! Total: 12 vertices per segment. Angles follow the convention
//! `x = r·sin(θ)`, `z = r·cos(θ)` with θ starting at +Z.

use glam::Vec3;
use std::f32::consts::TAU;

use super::mesh_buffer::MeshBuffer;

/// Smallest segment count that still forms a closed prism.
pub const MIN_PRISM_SEGMENTS: u32 = 3;

/// Vertices emitted per prism segment (side quad + two cap triangles).
pub const VERTICES_PER_SEGMENT: usize = 12;

/// A cached prism template keyed by its segment count.
#[derive(Debug, Clone)]
pub struct PrismTemplate {
    segments: u32,
    geometry: MeshBuffer,
}

impl PrismTemplate {
    /// Generate the template for `segments` sides.
    ///
    /// Callers validate `segments >= 3` upstream; smaller values are raised to
    /// the minimum rather than producing an open shape.
    pub fn new(segments: u32) -> Self {
        let segments = segments.max(MIN_PRISM_SEGMENTS);
        let count = segments as usize;
        let mut geometry = MeshBuffer::with_capacity(Self::vertex_count_for(segments));

        let ring: Vec<Vec3> = (0..count)
            .map(|i| {
                let theta = i as f32 / count as f32 * TAU;
                Vec3::new(theta.sin(), 0.0, theta.cos())
            })
            .collect();

        let top = Vec3::new(0.0, 0.5, 0.0);
        let bottom = Vec3::new(0.0, -0.5, 0.0);
        let white = Vec3::ONE;

        for i in 0..count {
            let a = ring[i];
            let b = ring[(i + 1) % count];

            let top_a = a + top;
            let top_b = b + top;
            let bottom_a = a + bottom;
            let bottom_b = b + bottom;

            // Side quad (CCW seen from outside)
            geometry.push_triangle(top_a, bottom_a, bottom_b, white);
            geometry.push_triangle(top_a, bottom_b, top_b, white);

            // Top cap fan (CCW seen from above)
            geometry.push_triangle(top, top_a, top_b, white);

            // Bottom cap fan (CCW seen from below)
            geometry.push_triangle(bottom, bottom_b, bottom_a, white);
        }

        Self { segments, geometry }
    }

    /// Vertex count of a template with `segments` sides.
    pub fn vertex_count_for(segments: u32) -> usize {
        segments.max(MIN_PRISM_SEGMENTS) as usize * VERTICES_PER_SEGMENT
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn geometry(&self) -> &MeshBuffer {
        &self.geometry
    }

    /// Fresh copy of the template geometry for one floor.
    pub fn instantiate(&self) -> MeshBuffer {
        self.geometry.clone()
    }
}
