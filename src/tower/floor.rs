//! Floor Transform Builder
//!
//! Turns a floor index into the transform that places one prism template in
//! the tower. Size, rotation and offset are each a lerp between the channel's
//! base and top value, weighted by that channel's easing or curve at the
//! floor's normalized height `t`.

use glam::{Mat4, Quat, Vec3};

use super::curve::Channel;
use super::params::TowerParams;

/// Placement of a single floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorTransform {
    pub index: u32,
    /// Normalized position in the stack, 0 at the base and 1 at the top.
    pub t: f32,
    pub radius: f32,
    pub rotation_degrees: f32,
    /// Rotation about +Y in radians.
    pub angle: f32,
    pub distance: f32,
    pub translation: Vec3,
    /// translate * rotate_y * scale(radius, thickness, radius)
    pub matrix: Mat4,
}

/// `i / (levels - 1)`, or 0 for a single floor.
pub fn normalized_position(index: u32, levels: u32) -> f32 {
    if levels > 1 {
        index as f32 / (levels - 1) as f32
    } else {
        0.0
    }
}

/// Vertical distance between consecutive floor centers.
pub fn level_spacing(params: &TowerParams) -> f32 {
    if params.levels > 1 {
        (params.total_height - params.floor_thickness) / (params.levels - 1) as f32
    } else {
        0.0
    }
}

fn lerp(a: f32, b: f32, w: f32) -> f32 {
    a + (b - a) * w
}

impl FloorTransform {
    pub fn build(params: &TowerParams, index: u32) -> Self {
        let t = normalized_position(index, params.levels);

        let radius = lerp(
            params.base_radius,
            params.top_radius,
            params.weight(Channel::Size, t),
        );
        let rotation_degrees = lerp(
            params.base_degrees,
            params.top_degrees,
            params.weight(Channel::Rotation, t),
        );
        let distance = lerp(
            params.base_distance,
            params.top_distance,
            params.weight(Channel::Offset, t),
        );

        let angle = rotation_degrees.to_radians();
        let rotation = Quat::from_rotation_y(angle);
        let horizontal = rotation * Vec3::new(distance, 0.0, 0.0);
        let y = params.floor_thickness * 0.5 + index as f32 * level_spacing(params);
        let translation = Vec3::new(horizontal.x, y, horizontal.z);

        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::new(radius, params.floor_thickness, radius),
            rotation,
            translation,
        );

        Self {
            index,
            t,
            radius,
            rotation_degrees,
            angle,
            distance,
            translation,
            matrix,
        }
    }
}

/// Transforms for every floor, base first. Empty when `levels == 0`.
pub fn floor_transforms(params: &TowerParams) -> impl Iterator<Item = FloorTransform> + '_ {
    (0..params.levels).map(move |i| FloorTransform::build(params, i))
}
