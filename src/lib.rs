//! Rebuilds a Spine 2D export (skeleton JSON + texture atlas) into
//! mesh-ready geometry: positioned quads with per-face UVs and region
//! assignments.
//!
//! This crate is host-agnostic: it stops at [`GeometryDescription`], and
//! whatever consumes it (a 3D editor, a renderer) binds textures and
//! materializes objects on its own terms.

#![forbid(unsafe_code)]

mod atlas;
mod convert;
mod error;
mod geometry;
mod json;
mod model;
mod resolve;

pub use atlas::*;
pub use convert::*;
pub use error::*;
pub use geometry::*;
pub use json::SkeletonSchema;
pub use model::*;
pub use resolve::*;

#[cfg(test)]
mod geometry_tests;
