//! Tower Sculpt Engine Library
//!
//! Procedural tower sculpting: a stack of prism floors whose size, twist,
//! radial offset and color are driven per channel by an easing function or a
//! two-handle cubic Bezier curve.
//!
//! # Modules
//!
//! - [`render`] - Prism template, merged mesh buffer and GPU vertex layout
//! - [`input`] - Windowing-agnostic pointer events with ownership ids
//! - [`tower`] - Parameters, curve channels, floor transforms, assembler,
//!   snapshots and the curve editor overlay
//!
//! # Example
//!
//! ```ignore
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tower_sculpt_engine::tower::{ParameterStore, ParamChange, TowerAssembler, TowerParams};
//!
//! let assembler = Rc::new(RefCell::new(TowerAssembler::new()));
//! let mut store = ParameterStore::new(TowerParams::default());
//! store.subscribe(TowerAssembler::listener(Rc::clone(&assembler)));
//! store.update(ParamChange::Structural, |p| p.levels = 40);
//!
//! let vertices = assembler.borrow().mesh().map(|m| m.geometry().vertex_count());
//! ```

pub mod input;
pub mod render;

// Tower-specific modules (located in src/tower/ directory)
#[path = "../../src/tower/mod.rs"]
pub mod tower;

pub use input::{PointerEvent, PointerId};
pub use render::{Aabb, BoundingSphere, MeshBuffer, PrismTemplate, TowerVertex};
