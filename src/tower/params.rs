//! Tower Parameters
//!
//! The flat, JSON-serializable parameter set every other part of the tower
//! reads. Field names serialize in camelCase (`radialSegments`, `baseRadius`,
//! `sizeCurve`, ...) so snapshots stay stable across versions.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::curve::{Channel, CurveConfig, evaluate};
use super::easing::Easing;

/// Adjustable tower generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TowerParams {
    // Structure
    /// Number of floors. Upstream editors keep this >= 3.
    pub levels: u32,
    /// Sides of each floor prism (>= 3).
    pub radial_segments: u32,
    pub total_height: f32,
    pub floor_thickness: f32,
    /// Twist applied once to the whole merged tower, in degrees.
    pub total_rotation: f32,

    // Size channel
    pub base_radius: f32,
    pub top_radius: f32,

    // Rotation channel (degrees)
    pub base_degrees: f32,
    pub top_degrees: f32,

    // Offset channel
    pub base_distance: f32,
    pub top_distance: f32,

    // Color channel (linear RGB, 0..1)
    pub base_color: Vec3,
    pub top_color: Vec3,

    // Easing per channel
    pub size_easing: Easing,
    pub rotation_easing: Easing,
    pub offset_easing: Easing,
    pub color_easing: Easing,

    // Bezier curve per channel
    pub size_curve: CurveConfig,
    pub rotation_curve: CurveConfig,
    pub offset_curve: CurveConfig,
    pub color_curve: CurveConfig,
}

impl Default for TowerParams {
    fn default() -> Self {
        Self {
            levels: 24,
            radial_segments: 6,
            total_height: 12.0,
            floor_thickness: 0.25,
            total_rotation: 0.0,

            base_radius: 2.0,
            top_radius: 1.0,

            base_degrees: 0.0,
            top_degrees: 180.0,

            base_distance: 0.0,
            top_distance: 0.0,

            base_color: Vec3::new(0.95, 0.55, 0.25),
            top_color: Vec3::new(0.25, 0.45, 0.95),

            size_easing: Easing::Linear,
            rotation_easing: Easing::Linear,
            offset_easing: Easing::Linear,
            color_easing: Easing::Linear,

            size_curve: CurveConfig::default(),
            rotation_curve: CurveConfig::default(),
            offset_curve: CurveConfig::default(),
            color_curve: CurveConfig::default(),
        }
    }
}

impl TowerParams {
    pub fn curve(&self, channel: Channel) -> &CurveConfig {
        match channel {
            Channel::Size => &self.size_curve,
            Channel::Rotation => &self.rotation_curve,
            Channel::Offset => &self.offset_curve,
            Channel::Color => &self.color_curve,
        }
    }

    pub fn curve_mut(&mut self, channel: Channel) -> &mut CurveConfig {
        match channel {
            Channel::Size => &mut self.size_curve,
            Channel::Rotation => &mut self.rotation_curve,
            Channel::Offset => &mut self.offset_curve,
            Channel::Color => &mut self.color_curve,
        }
    }

    pub fn easing(&self, channel: Channel) -> Easing {
        match channel {
            Channel::Size => self.size_easing,
            Channel::Rotation => self.rotation_easing,
            Channel::Offset => self.offset_easing,
            Channel::Color => self.color_easing,
        }
    }

    pub fn easing_mut(&mut self, channel: Channel) -> &mut Easing {
        match channel {
            Channel::Size => &mut self.size_easing,
            Channel::Rotation => &mut self.rotation_easing,
            Channel::Offset => &mut self.offset_easing,
            Channel::Color => &mut self.color_easing,
        }
    }

    /// Blend weight of `channel` at normalized position `t`.
    pub fn weight(&self, channel: Channel, t: f32) -> f32 {
        evaluate(self.curve(channel), self.easing(channel), t)
    }

    /// Clamp every channel's handles. Returns the channels that moved.
    pub fn clamp_curves(&mut self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|c| self.curve_mut(*c).clamp())
            .collect()
    }

    pub fn curves_clamped(&self) -> bool {
        Channel::ALL.iter().all(|c| self.curve(*c).is_clamped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tower::curve::CurvePoint;

    #[test]
    fn test_default_is_valid() {
        let params = TowerParams::default();
        assert!(params.levels >= 3);
        assert!(params.radial_segments >= 3);
        assert!(params.curves_clamped());
    }

    #[test]
    fn test_channel_accessors() {
        let mut params = TowerParams::default();
        *params.easing_mut(Channel::Offset) = Easing::EaseOutCubic;
        params.curve_mut(Channel::Color).enabled = true;

        assert_eq!(params.offset_easing, Easing::EaseOutCubic);
        assert!(params.color_curve.enabled);
        assert_eq!(params.easing(Channel::Offset), Easing::EaseOutCubic);
    }

    #[test]
    fn test_clamp_curves_reports_channels() {
        let mut params = TowerParams::default();
        params.rotation_curve.p1 = CurvePoint::new(4.0, 0.5);
        let moved = params.clamp_curves();
        assert_eq!(moved, vec![Channel::Rotation]);
        assert_eq!(params.rotation_curve.p1.x, 1.0);
    }

    #[test]
    fn test_json_keys_are_camel_case() {
        let json = serde_json::to_value(TowerParams::default()).unwrap();
        for key in [
            "levels",
            "radialSegments",
            "totalHeight",
            "floorThickness",
            "totalRotation",
            "baseRadius",
            "topRadius",
            "baseDegrees",
            "topDegrees",
            "baseDistance",
            "topDistance",
            "baseColor",
            "topColor",
            "sizeEasing",
            "colorCurve",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(json["rotationEasing"], "linear");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let params: TowerParams = serde_json::from_str(r#"{"levels": 5}"#).unwrap();
        assert_eq!(params.levels, 5);
        assert_eq!(params.radial_segments, TowerParams::default().radial_segments);
    }
}
