//! Overlay UI
//!
//! Screen-space widgets drawn over the tower: the per-channel Bezier curve
//! editors and the draw list they render into.

pub mod curve_editor;
pub mod draw_list;
pub mod text;

pub use curve_editor::{CurveEditor, DragState};
pub use draw_list::{DrawList, GlyphKind, OverlayShape};
