//! Geometry Assembler
//!
//! Builds the merged tower mesh: one clone of the cached prism template per
//! floor, transformed, vertex-colored by height and concatenated into a
//! single buffer. The mesh container is swapped wholesale on every update.
//!
//! # Pipeline
//!
//! 1. Clamp all four curve configs
//! 2. Clone + transform one template per floor, tracking world Y range
//! 3. Color every vertex from its normalized height via the color channel
//! 4. Merge, apply the global twist, recompute bounds
//! 5. Swap into the mesh container and release the previous buffer

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, trace};

use crate::render::{MIN_PRISM_SEGMENTS, MeshBuffer, PrismTemplate};

use super::curve::Channel;
use super::floor::floor_transforms;
use super::params::TowerParams;
use super::store::{ParamChange, ParamListener};

/// The published tower mesh.
#[derive(Debug)]
pub struct TowerMesh {
    id: u64,
    geometry: MeshBuffer,
    /// Bumped on every geometry swap so renderers know when to re-upload.
    revision: u64,
}

impl TowerMesh {
    fn new(id: u64) -> Self {
        Self {
            id,
            geometry: MeshBuffer::new(),
            revision: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn geometry(&self) -> &MeshBuffer {
        &self.geometry
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the geometry, releasing the previous buffer.
    fn set_geometry(&mut self, geometry: MeshBuffer) {
        let previous = std::mem::replace(&mut self.geometry, geometry);
        self.revision += 1;
        trace!(
            "mesh {} rev {}: released {} vertices",
            self.id,
            self.revision,
            previous.vertex_count()
        );
        drop(previous);
    }
}

/// Owns the prism template cache and the tower mesh.
#[derive(Debug, Default)]
pub struct TowerAssembler {
    template: Option<PrismTemplate>,
    mesh: Option<TowerMesh>,
    next_mesh_id: u64,
    template_builds: u32,
}

impl TowerAssembler {
    /// Minimum Y range used when normalizing heights for the color channel.
    const HEIGHT_EPSILON: f32 = 1e-6;

    pub fn new() -> Self {
        Self::default()
    }

    /// Regenerate the template if the segment count changed, create a fresh
    /// mesh container and re-instance every floor.
    pub fn rebuild(&mut self, params: &mut TowerParams) {
        self.ensure_template(params.radial_segments);
        self.mesh = Some(self.fresh_mesh());
        self.update_instances(params);
    }

    /// Re-instance every floor against the current template and publish the
    /// merged result.
    pub fn update_instances(&mut self, params: &mut TowerParams) {
        params.clamp_curves();
        self.ensure_template(params.radial_segments);
        let Some(template) = self.template.as_ref() else {
            return;
        };

        // Per-floor clones with baked transforms
        let mut floors: Vec<MeshBuffer> = Vec::with_capacity(params.levels as usize);
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for floor in floor_transforms(params) {
            let mut geometry = template.instantiate();
            geometry.apply_matrix(&floor.matrix);
            if let Some((lo, hi)) = geometry.y_range() {
                min_y = min_y.min(lo);
                max_y = max_y.max(hi);
            }
            floors.push(geometry);
        }

        // Height-driven vertex colors
        let range = (max_y - min_y).max(Self::HEIGHT_EPSILON);
        for geometry in &mut floors {
            for (p, c) in geometry.positions.iter().zip(geometry.colors.iter_mut()) {
                let h = (p.y - min_y) / range;
                let w = params.weight(Channel::Color, h);
                // Exact at both ends: w=0 gives base, w=1 gives top
                *c = params.base_color * (1.0 - w) + params.top_color * w;
            }
        }

        let mut merged = MeshBuffer::merge(&floors);
        drop(floors);

        merged.rotate_y(params.total_rotation.to_radians());
        merged.compute_bounding_box();
        merged.compute_bounding_sphere();

        debug!(
            "tower: {} floors x {} segments -> {} triangles",
            params.levels,
            template.segments(),
            merged.triangle_count()
        );

        if self.mesh.is_none() {
            self.mesh = Some(self.fresh_mesh());
        }
        if let Some(mesh) = self.mesh.as_mut() {
            mesh.set_geometry(merged);
        }
    }

    pub fn mesh(&self) -> Option<&TowerMesh> {
        self.mesh.as_ref()
    }

    /// How many times a template has been generated.
    pub fn template_builds(&self) -> u32 {
        self.template_builds
    }

    /// Vertex count a single floor contributes at the cached segment count.
    pub fn template_vertex_count(&self) -> usize {
        self.template
            .as_ref()
            .map(|t| t.geometry().vertex_count())
            .unwrap_or(0)
    }

    /// Store listener: structural edits rebuild, everything else re-instances.
    pub fn listener(assembler: Rc<RefCell<Self>>) -> ParamListener {
        Box::new(move |change, params| {
            let mut assembler = assembler.borrow_mut();
            match change {
                ParamChange::Structural => assembler.rebuild(params),
                ParamChange::Cosmetic | ParamChange::Curve(_) => {
                    assembler.update_instances(params)
                }
            }
        })
    }

    fn ensure_template(&mut self, segments: u32) {
        let cached = self
            .template
            .as_ref()
            .is_some_and(|t| t.segments() == segments.max(MIN_PRISM_SEGMENTS));
        if !cached {
            let template = PrismTemplate::new(segments);
            debug!(
                "prism template: {} segments, {} vertices",
                template.segments(),
                template.geometry().vertex_count()
            );
            self.template = Some(template);
            self.template_builds += 1;
        }
    }

    fn fresh_mesh(&mut self) -> TowerMesh {
        self.next_mesh_id += 1;
        TowerMesh::new(self.next_mesh_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn built(params: &mut TowerParams) -> TowerAssembler {
        let mut assembler = TowerAssembler::new();
        assembler.rebuild(params);
        assembler
    }

    #[test]
    fn test_vertex_count() {
        for (levels, segments) in [(3, 3), (10, 6), (1, 12), (24, 5)] {
            let mut params = TowerParams {
                levels,
                radial_segments: segments,
                ..TowerParams::default()
            };
            let assembler = built(&mut params);
            let count = assembler.mesh().unwrap().geometry().vertex_count();
            assert_eq!(count, levels as usize * 12 * segments as usize);
            assert_eq!(count % 3, 0);
        }
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut params = TowerParams::default();
        params.size_curve.enabled = true;
        params.total_rotation = 33.0;
        let mut assembler = built(&mut params);

        let first = assembler.mesh().unwrap().geometry().clone();
        assembler.update_instances(&mut params);
        let second = assembler.mesh().unwrap().geometry().clone();
        assert_eq!(first, second);
        assert_eq!(assembler.mesh().unwrap().revision(), 2);
    }

    #[test]
    fn test_color_spans_base_to_top() {
        let mut params = TowerParams {
            levels: 5,
            base_color: Vec3::new(1.0, 0.0, 0.0),
            top_color: Vec3::new(0.0, 0.0, 1.0),
            ..TowerParams::default()
        };
        let assembler = built(&mut params);
        let geometry = assembler.mesh().unwrap().geometry();
        let (min_y, max_y) = geometry.y_range().unwrap();

        for (p, c) in geometry.positions.iter().zip(&geometry.colors) {
            if p.y == min_y {
                assert_eq!(*c, params.base_color);
            }
            if p.y == max_y {
                assert_eq!(*c, params.top_color);
            }
        }
    }

    #[test]
    fn test_template_cache_reused() {
        let mut params = TowerParams::default();
        let mut assembler = built(&mut params);
        params.levels = 40;
        assembler.rebuild(&mut params);
        assert_eq!(assembler.template_builds(), 1);

        params.radial_segments = 9;
        assembler.rebuild(&mut params);
        assert_eq!(assembler.template_builds(), 2);
        assert_eq!(assembler.template_vertex_count(), 9 * 12);
    }

    #[test]
    fn test_rebuild_replaces_container() {
        let mut params = TowerParams::default();
        let mut assembler = built(&mut params);
        let first_id = assembler.mesh().unwrap().id();
        assembler.update_instances(&mut params);
        assert_eq!(assembler.mesh().unwrap().id(), first_id);
        assembler.rebuild(&mut params);
        assert_ne!(assembler.mesh().unwrap().id(), first_id);
    }

    #[test]
    fn test_update_clamps_params() {
        let mut params = TowerParams::default();
        params.offset_curve.p1.y = -4.0;
        let _ = built(&mut params);
        assert!(params.curves_clamped());
    }

    #[test]
    fn test_zero_levels() {
        let mut params = TowerParams {
            levels: 0,
            ..TowerParams::default()
        };
        let assembler = built(&mut params);
        let geometry = assembler.mesh().unwrap().geometry();
        assert!(geometry.is_empty());
        assert_eq!(geometry.bounding_sphere().unwrap().radius, 0.0);
    }

    #[test]
    fn test_bounds_published() {
        let mut params = TowerParams {
            total_height: 8.0,
            ..TowerParams::default()
        };
        let assembler = built(&mut params);
        let aabb = assembler.mesh().unwrap().geometry().bounding_box().unwrap();
        assert!((aabb.min.y - 0.0).abs() < 1e-4);
        assert!((aabb.max.y - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_dimensions_stay_finite() {
        let mut params = TowerParams {
            levels: 5,
            radial_segments: 6,
            total_height: 0.0,
            floor_thickness: 0.0,
            base_radius: 0.0,
            top_radius: 0.0,
            base_distance: 0.0,
            top_distance: 0.0,
            ..TowerParams::default()
        };
        let assembler = built(&mut params);
        let geometry = assembler.mesh().unwrap().geometry();

        assert_eq!(geometry.vertex_count(), 5 * 6 * 12);
        assert!(geometry.positions.iter().all(|p| p.is_finite()));
        assert!(geometry.colors.iter().all(|c| c.is_finite()));
        // Collapsed height range normalizes every vertex to the bottom
        assert!(geometry.colors.iter().all(|c| *c == params.base_color));
        assert_eq!(geometry.bounding_sphere().unwrap().radius, 0.0);
    }

    #[test]
    fn test_zero_radius_floors_collapse_to_axis() {
        let mut params = TowerParams {
            levels: 4,
            base_radius: 0.0,
            top_radius: 0.0,
            ..TowerParams::default()
        };
        let assembler = built(&mut params);
        let geometry = assembler.mesh().unwrap().geometry();

        assert_eq!(geometry.vertex_count(), 4 * 6 * 12);
        for p in &geometry.positions {
            assert!(p.is_finite());
            assert!(p.x.abs() < 1e-6 && p.z.abs() < 1e-6);
        }
        let (min_y, max_y) = geometry.y_range().unwrap();
        assert!((min_y - 0.0).abs() < 1e-4);
        assert!((max_y - params.total_height).abs() < 1e-4);
    }
}
