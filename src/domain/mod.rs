//! Data model for the fusion engine.
//!
//! Input types ([`Detection`], [`FrameMetadata`]) describe what the OCR
//! adapters produced; output types ([`HybridTextRegion`], [`FusionResult`])
//! describe the reconciled region list consumed by downstream inpainting
//! and task-result persistence.

pub mod detection;
pub mod region;

pub use detection::{
    Detection, FitMode, FontInfo, FontWeight, FrameMetadata, NormalizedDetection, OcrSource,
    TextAlign,
};
pub use region::{FusionResult, FusionSummary, HybridTextRegion, Provenance};
