//! Merged Mesh Buffer
//!
//! Non-indexed triangle soup with one position and one color per vertex.
//! Every three consecutive vertices form one triangle with CCW winding, so the
//! vertex count is always a multiple of 3.
//!
//! Buffers are cheap to clone and are merged by copying; sources are never
//! retained by the merged result.

use glam::{Mat4, Quat, Vec3};

use super::vertex::TowerVertex;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Bounding sphere centered on the bounding box center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

/// A non-indexed position + color vertex buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Vertex colors (linear RGB)
    pub colors: Vec<Vec3>,
    bounding_box: Option<Aabb>,
    bounding_sphere: Option<BoundingSphere>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
            bounding_box: None,
            bounding_sphere: None,
        }
    }

    /// Push one triangle with a uniform color.
    pub fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Vec3) {
        self.positions.extend_from_slice(&[a, b, c]);
        self.colors.extend_from_slice(&[color, color, color]);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Bake a transform into the vertex positions.
    pub fn apply_matrix(&mut self, matrix: &Mat4) {
        for p in &mut self.positions {
            *p = matrix.transform_point3(*p);
        }
        self.invalidate_bounds();
    }

    /// Rotate every vertex about the +Y axis.
    pub fn rotate_y(&mut self, radians: f32) {
        let rotation = Quat::from_rotation_y(radians);
        for p in &mut self.positions {
            *p = rotation * *p;
        }
        self.invalidate_bounds();
    }

    /// Lowest and highest Y over all vertices, `None` when empty.
    pub fn y_range(&self) -> Option<(f32, f32)> {
        if self.positions.is_empty() {
            return None;
        }
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for p in &self.positions {
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        Some((min_y, max_y))
    }

    /// Concatenate buffers into a new buffer.
    ///
    /// All parts share the same attribute layout by construction; the only
    /// precondition is matching position/color lengths inside each part.
    pub fn merge(parts: &[MeshBuffer]) -> MeshBuffer {
        let total = parts.iter().map(MeshBuffer::vertex_count).sum();
        let mut merged = MeshBuffer::with_capacity(total);
        for part in parts {
            debug_assert_eq!(part.positions.len(), part.colors.len());
            merged.positions.extend_from_slice(&part.positions);
            merged.colors.extend_from_slice(&part.colors);
        }
        merged
    }

    pub fn compute_bounding_box(&mut self) {
        if self.positions.is_empty() {
            self.bounding_box = Some(Aabb {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            });
            return;
        }

        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in &self.positions {
            min = min.min(*p);
            max = max.max(*p);
        }
        self.bounding_box = Some(Aabb { min, max });
    }

    /// Sphere around the box center enclosing every vertex.
    pub fn compute_bounding_sphere(&mut self) {
        if self.bounding_box.is_none() {
            self.compute_bounding_box();
        }
        let center = self.bounding_box.map(|b| b.center()).unwrap_or(Vec3::ZERO);

        let radius_sq = self
            .positions
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0_f32, f32::max);

        self.bounding_sphere = Some(BoundingSphere {
            center,
            radius: radius_sq.sqrt(),
        });
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        self.bounding_box
    }

    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        self.bounding_sphere
    }

    fn invalidate_bounds(&mut self) {
        self.bounding_box = None;
        self.bounding_sphere = None;
    }

    /// Expand to GPU vertices with a flat per-triangle normal.
    pub fn to_vertices(&self) -> Vec<TowerVertex> {
        let mut vertices = Vec::with_capacity(self.positions.len());
        for (tri, colors) in self.positions.chunks_exact(3).zip(self.colors.chunks_exact(3)) {
            let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
            for (p, c) in tri.iter().zip(colors) {
                vertices.push(TowerVertex::new(*p, normal, [c.x, c.y, c.z, 1.0]));
            }
        }
        vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> MeshBuffer {
        let mut mesh = MeshBuffer::new();
        mesh.push_triangle(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::ONE,
        );
        mesh
    }

    #[test]
    fn test_merge_concatenates() {
        let a = unit_triangle();
        let mut b = unit_triangle();
        b.apply_matrix(&Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));

        let merged = MeshBuffer::merge(&[a, b]);
        assert_eq!(merged.vertex_count(), 6);
        assert_eq!(merged.triangle_count(), 2);
        assert_eq!(merged.positions[3], Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(merged.y_range(), Some((0.0, 3.0)));
    }

    #[test]
    fn test_bounds() {
        let mut mesh = unit_triangle();
        mesh.compute_bounding_box();
        mesh.compute_bounding_sphere();

        let aabb = mesh.bounding_box().unwrap();
        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::new(1.0, 1.0, 0.0));

        let sphere = mesh.bounding_sphere().unwrap();
        assert_eq!(sphere.center, Vec3::new(0.5, 0.5, 0.0));
        assert!((sphere.radius - 0.5_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_transform_invalidates_bounds() {
        let mut mesh = unit_triangle();
        mesh.compute_bounding_box();
        mesh.rotate_y(1.0);
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_empty_bounds_are_zero() {
        let mut mesh = MeshBuffer::new();
        mesh.compute_bounding_sphere();
        assert_eq!(mesh.bounding_sphere().unwrap().radius, 0.0);
        assert!(mesh.y_range().is_none());
    }

    #[test]
    fn test_flat_normals() {
        let vertices = unit_triangle().to_vertices();
        assert_eq!(vertices.len(), 3);
        for v in &vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.color, [1.0, 1.0, 1.0, 1.0]);
        }
    }
}
