//! Curve Channels
//!
//! Each tower channel (size, rotation, offset, color) maps a normalized floor
//! position `t` to a blend weight, either through a named [`Easing`] or through
//! a cubic Bezier curve with fixed endpoints `(0,0)` and `(1,1)` and two
//! draggable handles.
//!
//! # Functional vs. visual curve
//!
//! The weight in curve mode uses only the handles' Y components and feeds `t`
//! directly in as the Bezier parameter:
//!
//! ```text
//! weight(t) = 3(1-t)²t·y1 + 3(1-t)t²·y2 + t³
//! ```
//!
//! The handles' X components only position the handles for the curve editor,
//! which draws the full parametric `(X(a), Y(a))` curve. Saved snapshots
//! depend on this evaluation, so it must not be changed to solve `X(a) = t`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::easing::Easing;

/// One of the four independently driven tower channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    Size,
    Rotation,
    Offset,
    Color,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Size, Channel::Rotation, Channel::Offset, Channel::Color];

    pub fn index(self) -> usize {
        match self {
            Channel::Size => 0,
            Channel::Rotation => 1,
            Channel::Offset => 2,
            Channel::Color => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::Size => "Size",
            Channel::Rotation => "Rotation",
            Channel::Offset => "Offset",
            Channel::Color => "Color",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which of the two draggable handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleId {
    P1,
    P2,
}

/// A 2D curve point, serialized as `{ "x": .., "y": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f32,
    pub y: f32,
}

impl CurvePoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// The rectangle a channel's handles are confined to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveBounds {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Default for CurveBounds {
    fn default() -> Self {
        Self::UNIT
    }
}

impl CurveBounds {
    pub const UNIT: CurveBounds = CurveBounds {
        x_min: 0.0,
        x_max: 1.0,
        y_min: 0.0,
        y_max: 1.0,
    };

    /// Bounds with each axis ordered so that min <= max.
    pub fn normalized(self) -> Self {
        Self {
            x_min: self.x_min.min(self.x_max),
            x_max: self.x_min.max(self.x_max),
            y_min: self.y_min.min(self.y_max),
            y_max: self.y_min.max(self.y_max),
        }
    }

    pub fn clamp_x(&self, x: f32) -> f32 {
        let b = self.normalized();
        clamp_coord(x, b.x_min, b.x_max)
    }

    pub fn clamp_y(&self, y: f32) -> f32 {
        let b = self.normalized();
        clamp_coord(y, b.y_min, b.y_max)
    }

    pub fn clamp_point(&self, p: CurvePoint) -> CurvePoint {
        CurvePoint::new(self.clamp_x(p.x), self.clamp_y(p.y))
    }

    pub fn contains(&self, p: CurvePoint) -> bool {
        let b = self.normalized();
        (b.x_min..=b.x_max).contains(&p.x) && (b.y_min..=b.y_max).contains(&p.y)
    }
}

/// Clamp that maps non-finite input to the lower bound.
fn clamp_coord(v: f32, min: f32, max: f32) -> f32 {
    if !v.is_finite() {
        min
    } else {
        v.clamp(min, max)
    }
}

/// Curve-mode configuration of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    pub enabled: bool,
    pub p1: CurvePoint,
    pub p2: CurvePoint,
    #[serde(default)]
    pub bounds: CurveBounds,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            p1: CurvePoint::new(0.33, 0.0),
            p2: CurvePoint::new(0.67, 1.0),
            bounds: CurveBounds::UNIT,
        }
    }
}

impl CurveConfig {
    pub fn handle(&self, handle: HandleId) -> CurvePoint {
        match handle {
            HandleId::P1 => self.p1,
            HandleId::P2 => self.p2,
        }
    }

    /// Write a handle, clamping it into the bounds. Returns the stored value.
    pub fn set_handle(&mut self, handle: HandleId, point: CurvePoint) -> CurvePoint {
        let clamped = self.bounds.clamp_point(point);
        match handle {
            HandleId::P1 => self.p1 = clamped,
            HandleId::P2 => self.p2 = clamped,
        }
        clamped
    }

    /// Force all four handle coordinates into the bounds.
    ///
    /// Returns `true` if anything moved.
    pub fn clamp(&mut self) -> bool {
        let p1 = self.bounds.clamp_point(self.p1);
        let p2 = self.bounds.clamp_point(self.p2);
        // NaN != NaN, so compare bitwise to detect repaired coordinates too
        let changed = p1.x.to_bits() != self.p1.x.to_bits()
            || p1.y.to_bits() != self.p1.y.to_bits()
            || p2.x.to_bits() != self.p2.x.to_bits()
            || p2.y.to_bits() != self.p2.y.to_bits();
        self.p1 = p1;
        self.p2 = p2;
        changed
    }

    pub fn is_clamped(&self) -> bool {
        self.bounds.contains(self.p1) && self.bounds.contains(self.p2)
    }

    /// Functional weight at `t`: Y-only Bezier with `t` as the parameter.
    pub fn weight(&self, t: f32) -> f32 {
        let b = self.bounds.normalized();
        clamp_coord(bezier_y(self.p1.y, self.p2.y, t), b.y_min, b.y_max)
    }

    /// Point on the full parametric curve drawn by the editor.
    pub fn visual_point(&self, a: f32) -> Vec2 {
        cubic_bezier(Vec2::ZERO, self.p1.to_vec2(), self.p2.to_vec2(), Vec2::ONE, a)
    }
}

/// Cubic Bezier Y with endpoints fixed at 0 and 1.
pub fn bezier_y(y1: f32, y2: f32, a: f32) -> f32 {
    let inv = 1.0 - a;
    3.0 * inv * inv * a * y1 + 3.0 * inv * a * a * y2 + a * a * a
}

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let inv = 1.0 - t;
    inv * inv * inv * p0 + 3.0 * inv * inv * t * p1 + 3.0 * inv * t * t * p2 + t * t * t * p3
}

/// Channel weight: the named easing when curve mode is off, the curve otherwise.
pub fn evaluate(config: &CurveConfig, easing: Easing, t: f32) -> f32 {
    if config.enabled {
        config.weight(t)
    } else {
        easing.apply(t)
    }
}
