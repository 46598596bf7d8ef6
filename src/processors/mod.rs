//! Shared processing utilities for the fusion pipeline.
//!
//! This module provides the geometric primitives and text comparison
//! functions used by the matcher and merge stages.

pub mod geometry;
pub mod text;

pub use geometry::{BoundingBox, Point};
pub use text::{canonicalize, text_similarity};
