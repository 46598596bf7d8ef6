//! # Stage Definition: Hybrid Result Fusion
//!
//! This stage is considered "Done" when it fulfills the following contract:
//!
//! - **Inputs**: Two `Detection` lists (traditional and multimodal) plus a
//!   `FrameMetadata` per source.
//! - **Outputs**: `FusionResult` with regions in reading order, sequential
//!   IDs, and aggregate provenance/confidence metadata.
//! - **Logging**: Warns on dropped detections and frame disagreements;
//!   emits a debug summary per run.
//! - **Error Behavior**: Configuration problems fail `HybridFusionEngine::new`;
//!   a constructed engine never fails a per-image call. Malformed or
//!   degenerate detections are dropped individually so a partial result is
//!   still produced.
//! - **Invariants**:
//!     - Output coordinates are always in the original image's pixel space.
//!     - Each region derives from at most one detection per source.
//!     - No two output regions still form a match candidate with each other.
//!     - Identical inputs produce identical output (deterministic
//!       tie-breaking throughout).

pub mod assembler;
pub mod matcher;
pub mod merge;
pub mod normalizer;

pub use matcher::MatchCandidate;

use crate::core::config::FusionConfig;
use crate::core::errors::FusionError;
use crate::domain::detection::{Detection, FrameMetadata, OcrSource};
use crate::domain::region::FusionResult;

/// Reconciles detections from the two OCR engines into one region list.
///
/// The engine is a pure, stateless transformation: it holds only its
/// immutable configuration, performs no I/O, and distinct invocations may
/// run concurrently without coordination.
///
/// # Example
///
/// ```
/// use hybrid_ocr_fusion::{
///     BoundingBox, Detection, FrameMetadata, FusionConfig, HybridFusionEngine, OcrSource,
/// };
///
/// let engine = HybridFusionEngine::new(FusionConfig::default()).expect("valid config");
/// let frame = FrameMetadata::identity(800, 600);
/// let traditional = vec![Detection::new(
///     OcrSource::Traditional,
///     "Hello",
///     BoundingBox::new(10.0, 10.0, 50.0, 20.0),
///     0.95,
/// )];
/// let result = engine.fuse(&traditional, &frame, &[], &frame);
/// assert_eq!(result.summary.region_count, 1);
/// ```
#[derive(Debug, Clone)]
pub struct HybridFusionEngine {
    config: FusionConfig,
}

impl HybridFusionEngine {
    /// Creates an engine after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FusionError::Config`] if the weights do not sum to 1 or
    /// any threshold is out of range; see [`FusionConfig::validate`].
    pub fn new(config: FusionConfig) -> Result<Self, FusionError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Creates an engine with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: FusionConfig::default(),
        }
    }

    /// Returns the engine's configuration.
    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Fuses one image's detections from both sources.
    ///
    /// Empty inputs are not an error: with one side empty the other
    /// passes through the merge and assembly stages; with both empty an
    /// empty result is returned.
    pub fn fuse(
        &self,
        traditional: &[Detection],
        traditional_frame: &FrameMetadata,
        multimodal: &[Detection],
        multimodal_frame: &FrameMetadata,
    ) -> FusionResult {
        let canonical = canonical_frame(traditional_frame, multimodal_frame);

        let normalized_traditional = normalizer::normalize_detections(
            traditional,
            traditional_frame,
            OcrSource::Traditional,
            &self.config,
        );
        let normalized_multimodal = normalizer::normalize_detections(
            multimodal,
            multimodal_frame,
            OcrSource::Multimodal,
            &self.config,
        );

        if normalized_traditional.is_empty() && normalized_multimodal.is_empty() {
            return FusionResult::empty(traditional.len(), multimodal.len());
        }

        let diagonal = canonical.original_diagonal();
        let outcome = matcher::match_detections(
            &normalized_traditional,
            &normalized_multimodal,
            diagonal,
            &self.config,
        );

        let merged = merge::merge_regions(
            &normalized_traditional,
            &normalized_multimodal,
            &outcome,
            &self.config,
        );
        let deduped = merge::dedup_regions(merged, diagonal, &self.config);

        let result = assembler::assemble(deduped, traditional.len(), multimodal.len(), &self.config);

        tracing::debug!(
            target: "fusion",
            regions = result.summary.region_count,
            matched = result.summary.matched,
            traditional_only = result.summary.traditional_only,
            multimodal_only = result.summary.multimodal_only,
            average_confidence = result.summary.average_confidence,
            "Fused detection lists"
        );

        result
    }
}

/// Picks the frame whose original dimensions define the canonical space.
///
/// The traditional frame wins; a disagreement from the multimodal frame is
/// logged and otherwise ignored.
fn canonical_frame(traditional: &FrameMetadata, multimodal: &FrameMetadata) -> FrameMetadata {
    if traditional.original_width != multimodal.original_width
        || traditional.original_height != multimodal.original_height
    {
        tracing::warn!(
            target: "fusion",
            traditional = ?(traditional.original_width, traditional.original_height),
            multimodal = ?(multimodal.original_width, multimodal.original_height),
            "Sources disagree on original image dimensions; using the traditional frame's"
        );
    }
    *traditional
}
