//! Hybrid OCR result fusion.
//!
//! This library reconciles text detections produced by two complementary
//! OCR engines for the same image:
//!
//! - a **traditional** engine with precise pixel coordinates but plain
//!   text output, and
//! - a **multimodal** (vision language model) engine with rich text and
//!   style metadata but approximate geometry.
//!
//! The result is a single list of [`HybridTextRegion`] values in reading
//! order, each carrying the most reliable text, geometry, style, and
//! confidence available from either source, plus a [`FusionSummary`] of
//! aggregate counts.
//!
//! # Pipeline
//!
//! [`HybridFusionEngine::fuse`] runs four stages:
//!
//! 1. **Normalization**: each source's boxes are projected from its
//!    analysis frame into the original image's pixel space, undoing
//!    letterboxing or cropping per [`FitMode`], and invalid detections
//!    are dropped with a warning.
//! 2. **Matching**: cross-source pairs are scored on overlap, text
//!    similarity, and center distance, then greedily assigned one to one.
//! 3. **Merging**: matched pairs are fused (traditional geometry,
//!    multimodal style), unmatched detections pass through, and residual
//!    duplicates are collapsed.
//! 4. **Assembly**: regions are grouped into lines, ordered top to bottom
//!    and left to right, and given sequential IDs.
//!
//! # Example
//!
//! ```
//! use hybrid_ocr_fusion::{
//!     BoundingBox, Detection, FitMode, FontInfo, FrameMetadata, FusionConfig,
//!     HybridFusionEngine, OcrSource,
//! };
//!
//! let engine = HybridFusionEngine::new(FusionConfig::default())?;
//!
//! let frame = FrameMetadata::identity(1000, 800);
//! let traditional = vec![Detection::new(
//!     OcrSource::Traditional,
//!     "Invoice #42",
//!     BoundingBox::new(100.0, 50.0, 180.0, 28.0),
//!     0.97,
//! )];
//! let multimodal = vec![
//!     Detection::new(
//!         OcrSource::Multimodal,
//!         "Invoice #42",
//!         BoundingBox::new(96.0, 48.0, 188.0, 30.0),
//!         0.88,
//!     )
//!     .with_font(FontInfo::with_size(24.0)),
//! ];
//!
//! let result = engine.fuse(&traditional, &frame, &multimodal, &frame);
//! assert_eq!(result.summary.matched, 1);
//! println!("{result}");
//! # Ok::<(), hybrid_ocr_fusion::FusionError>(())
//! ```
//!
//! # Error Handling
//!
//! Only configuration problems are fatal, and only at
//! [`HybridFusionEngine::new`]. Per-detection problems (wrong source tag,
//! degenerate or non-finite geometry, boxes outside the image) are logged
//! via [`tracing`] and the detection is dropped, so one bad record never
//! poisons an image's result.

pub mod core;
pub mod domain;
pub mod fusion;
pub mod processors;
pub mod utils;

pub use crate::core::{FusionConfig, FusionError};
pub use domain::{
    Detection, FitMode, FontInfo, FontWeight, FrameMetadata, FusionResult, FusionSummary,
    HybridTextRegion, OcrSource, Provenance, TextAlign,
};
pub use fusion::{HybridFusionEngine, MatchCandidate};
pub use processors::{BoundingBox, Point};
pub use utils::init_tracing;
