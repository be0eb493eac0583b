//! Easing Library
//!
//! Named monotonic easing functions mapping `[0, 1]` onto `[0, 1]`. Every
//! variant satisfies `f(0) = 0` and `f(1) = 1`.

use serde::{Deserialize, Serialize};

/// A named easing curve. Serialized by its camelCase key (e.g. `"easeInQuad"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseOutCubic,
}

impl Easing {
    /// Every easing, in menu order.
    pub const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseOutCubic,
    ];

    /// Evaluate the easing. Inputs outside `[0, 1]` are clamped first.
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseOutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
        }
    }

    /// Stable key used in snapshots.
    pub fn key(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseOutCubic => "easeOutCubic",
        }
    }

    /// The next easing in menu order, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|e| *e == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_law() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing} at 1");
        }
    }

    #[test]
    fn test_monotonic_and_in_range() {
        for easing in Easing::ALL {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!((0.0..=1.0).contains(&v), "{easing} out of range: {v}");
                assert!(v >= prev - 1e-6, "{easing} not monotonic at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_known_midpoints() {
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
        assert_eq!(Easing::EaseInQuad.apply(0.5), 0.25);
        assert_eq!(Easing::EaseOutQuad.apply(0.5), 0.75);
        assert_eq!(Easing::EaseInOutQuad.apply(0.5), 0.5);
        assert_eq!(Easing::EaseOutCubic.apply(0.5), 0.875);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::EaseInQuad.apply(-2.0), 0.0);
        assert_eq!(Easing::EaseOutCubic.apply(3.0), 1.0);
        assert_eq!(Easing::Linear.apply(f32::NAN), 0.0);
    }

    #[test]
    fn test_keys_round_trip() {
        for easing in Easing::ALL {
            let json = serde_json::to_string(&easing).unwrap();
            assert_eq!(json, format!("\"{}\"", easing.key()));
            assert_eq!(serde_json::from_str::<Easing>(&json).unwrap(), easing);
        }
        assert!(serde_json::from_str::<Easing>("\"bounce\"").is_err());
    }

    #[test]
    fn test_next_wraps() {
        assert_eq!(Easing::Linear.next(), Easing::EaseInQuad);
        assert_eq!(Easing::EaseOutCubic.next(), Easing::Linear);
    }
}
