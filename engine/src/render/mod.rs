//! Render Module
//!
//! CPU-side geometry for the tower: the prism floor template, the merged
//! non-indexed mesh buffer, and the vertex layout shared with the wgpu
//! pipelines in the viewer.

pub mod mesh_buffer;
pub mod prism;
pub mod vertex;

pub use mesh_buffer::{Aabb, BoundingSphere, MeshBuffer};
pub use prism::{MIN_PRISM_SEGMENTS, PrismTemplate, VERTICES_PER_SEGMENT};
pub use vertex::{TowerVertex, add_quad};
