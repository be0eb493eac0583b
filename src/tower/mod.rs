//! Tower Module
//!
//! Everything specific to the sculpted tower: parameters and their store,
//! easing and curve channels, floor placement, mesh assembly, snapshots,
//! viewer config and the curve editor overlay.

pub mod assembler;
pub mod config;
pub mod curve;
pub mod easing;
pub mod floor;
pub mod params;
pub mod snapshot;
pub mod store;
pub mod ui;

pub use assembler::{TowerAssembler, TowerMesh};
pub use config::{ConfigError, EditLimits, ViewerConfig};
pub use curve::{Channel, CurveBounds, CurveConfig, CurvePoint, HandleId, evaluate};
pub use easing::Easing;
pub use floor::{FloorTransform, floor_transforms};
pub use params::TowerParams;
pub use snapshot::SnapshotError;
pub use store::{ParamChange, ParamListener, ParameterStore};
pub use ui::{CurveEditor, DragState};
