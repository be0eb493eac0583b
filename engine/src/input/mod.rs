//! Input Module
//!
//! Provides platform-agnostic pointer input. This module is decoupled from
//! any specific windowing system (like winit); the viewer binary translates
//! window events into [`PointerEvent`]s.

pub mod pointer;

pub use pointer::{CursorTracker, PointerEvent, PointerId};
