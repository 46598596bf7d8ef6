//! Configuration for the fusion engine.
//!
//! All weights and thresholds that steer matching, merging, and reading
//! order grouping live here. Configuration is validated once at engine
//! construction; a constructed engine never fails a per-image call over
//! configuration.

use crate::core::errors::FusionError;
use serde::{Deserialize, Serialize};

/// Tolerance used when checking that the score weights sum to 1.
const WEIGHT_SUM_EPSILON: f32 = 1e-4;

/// Weights and thresholds for the fusion engine.
///
/// The combined match score is
/// `iou_weight * iou + text_weight * text_similarity + center_weight *
/// center_similarity`; the three weights must sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Weight of the IoU term in the combined match score.
    pub iou_weight: f32,
    /// Weight of the text similarity term in the combined match score.
    pub text_weight: f32,
    /// Weight of the center distance term in the combined match score.
    pub center_weight: f32,
    /// Minimum combined score for a pair to become a match candidate.
    pub match_threshold: f32,
    /// Minimum IoU for a candidate, unless the text override applies.
    pub min_iou: f32,
    /// Text similarity at or above which the IoU floor is waived.
    ///
    /// Handles small, tightly-kerned text where boxes barely overlap but
    /// the recognized text matches near-exactly.
    pub high_text_override: f32,
    /// Fraction of the image diagonal at which center similarity reaches 0.
    pub center_distance_scale: f32,
    /// Fraction of box height by which multimodal boxes are expanded
    /// before matching. Multimodal boxes hug glyph ink; traditional OCR
    /// boxes include line-height padding.
    pub multimodal_expand_ratio: f32,
    /// Fraction of box height by which traditional boxes are shrunk before
    /// matching. Off by default; use instead of (or with) expansion.
    pub traditional_shrink_ratio: f32,
    /// Traditional confidence below which the multimodal text wins for a
    /// matched pair.
    pub low_confidence_floor: f32,
    /// Vertical-center tolerance for reading-order line grouping, as a
    /// fraction of the larger region's height.
    pub line_tolerance_ratio: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            iou_weight: 0.5,
            text_weight: 0.3,
            center_weight: 0.2,
            match_threshold: 0.6,
            min_iou: 0.1,
            high_text_override: 0.9,
            center_distance_scale: 0.2,
            multimodal_expand_ratio: 0.12,
            traditional_shrink_ratio: 0.0,
            low_confidence_floor: 0.3,
            line_tolerance_ratio: 0.5,
        }
    }
}

impl FusionConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`FusionError::Config`] if:
    /// * any weight is outside `[0, 1]` or the weights do not sum to 1
    /// * any threshold is outside `[0, 1]`
    /// * `center_distance_scale` is not strictly positive
    /// * a compensation ratio is negative, not finite, or
    ///   `traditional_shrink_ratio >= 1` (which would collapse every box)
    /// * `line_tolerance_ratio` is negative or not finite
    pub fn validate(&self) -> Result<(), FusionError> {
        for (name, value) in [
            ("iou_weight", self.iou_weight),
            ("text_weight", self.text_weight),
            ("center_weight", self.center_weight),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(FusionError::invalid_field(
                    name,
                    "value in [0, 1]",
                    format!("{value}"),
                ));
            }
        }

        let weight_sum = self.iou_weight + self.text_weight + self.center_weight;
        if (weight_sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(FusionError::config_error_detailed(
                "score weights",
                format!("must sum to 1.0, got {weight_sum}"),
            ));
        }

        for (name, value) in [
            ("match_threshold", self.match_threshold),
            ("min_iou", self.min_iou),
            ("high_text_override", self.high_text_override),
            ("low_confidence_floor", self.low_confidence_floor),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(FusionError::invalid_field(
                    name,
                    "value in [0, 1]",
                    format!("{value}"),
                ));
            }
        }

        if !self.center_distance_scale.is_finite() || self.center_distance_scale <= 0.0 {
            return Err(FusionError::invalid_field(
                "center_distance_scale",
                "value > 0",
                format!("{}", self.center_distance_scale),
            ));
        }

        if !self.multimodal_expand_ratio.is_finite() || self.multimodal_expand_ratio < 0.0 {
            return Err(FusionError::invalid_field(
                "multimodal_expand_ratio",
                "value >= 0",
                format!("{}", self.multimodal_expand_ratio),
            ));
        }

        if !self.traditional_shrink_ratio.is_finite()
            || self.traditional_shrink_ratio < 0.0
            || self.traditional_shrink_ratio >= 1.0
        {
            return Err(FusionError::invalid_field(
                "traditional_shrink_ratio",
                "value in [0, 1)",
                format!("{}", self.traditional_shrink_ratio),
            ));
        }

        if !self.line_tolerance_ratio.is_finite() || self.line_tolerance_ratio < 0.0 {
            return Err(FusionError::invalid_field(
                "line_tolerance_ratio",
                "value >= 0",
                format!("{}", self.line_tolerance_ratio),
            ));
        }

        Ok(())
    }
}
