//! Tower Snapshots
//!
//! A snapshot is the complete [`TowerParams`] as pretty-printed JSON. Loading
//! re-applies the curve clamp before anything else sees the values.

use std::path::Path;

use log::info;
use thiserror::Error;

use super::params::TowerParams;

/// Errors that can occur during snapshot save/load.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// ENCODE / DECODE
// ============================================================================

pub fn to_json(params: &TowerParams) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(params)?)
}

/// Parse a snapshot. Missing fields take their defaults; curve handles are
/// clamped into their bounds.
pub fn from_json(json: &str) -> Result<TowerParams, SnapshotError> {
    let mut params: TowerParams = serde_json::from_str(json)?;
    params.clamp_curves();
    Ok(params)
}

// ============================================================================
// DISK
// ============================================================================

pub fn save(path: &Path, params: &TowerParams) -> Result<(), SnapshotError> {
    let json = to_json(params)?;

    // Ensure parent directories exist.
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, json)?;
    info!("Saved snapshot to {}", path.display());
    Ok(())
}

pub fn load(path: &Path) -> Result<TowerParams, SnapshotError> {
    let json = std::fs::read_to_string(path)?;
    let params = from_json(&json)?;
    info!(
        "Loaded snapshot from {} ({} levels, {} segments)",
        path.display(),
        params.levels,
        params.radial_segments
    );
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tower::curve::CurvePoint;
    use crate::tower::easing::Easing;
    use glam::Vec3;

    #[test]
    fn test_json_round_trip() {
        let mut params = TowerParams {
            levels: 17,
            radial_segments: 8,
            total_rotation: 45.0,
            top_color: Vec3::new(0.1, 0.2, 0.3),
            color_easing: Easing::EaseInOutQuad,
            ..TowerParams::default()
        };
        params.size_curve.enabled = true;
        params.size_curve.p1 = CurvePoint::new(0.2, 0.8);

        let json = to_json(&params).unwrap();
        let back = from_json(&json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_load_clamps_handles() {
        let json = r#"{
            "levels": 6,
            "offsetCurve": {
                "enabled": true,
                "p1": { "x": -3.0, "y": 0.5 },
                "p2": { "x": 0.5, "y": 7.0 },
                "bounds": { "xMin": 0.0, "xMax": 1.0, "yMin": 0.0, "yMax": 2.0 }
            }
        }"#;
        let params = from_json(json).unwrap();
        assert_eq!(params.levels, 6);
        assert_eq!(params.offset_curve.p1, CurvePoint::new(0.0, 0.5));
        assert_eq!(params.offset_curve.p2, CurvePoint::new(0.5, 2.0));
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = from_json("{ levels: ").unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
    }

    #[test]
    fn test_disk_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("tower_sculpt_snapshot_{}", std::process::id()))
            .join("tower.json");
        let params = TowerParams {
            levels: 11,
            ..TowerParams::default()
        };

        save(&path, &params).unwrap();
        let back = load(&path).unwrap();
        assert_eq!(back, params);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("tower_sculpt_does_not_exist.json");
        assert!(matches!(load(&path), Err(SnapshotError::Io(_))));
    }
}
