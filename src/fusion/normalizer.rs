//! Coordinate normalization into canonical pixel space.
//!
//! Each source reports boxes in its own analysis frame. Before matching,
//! every detection is mapped into the original image's pixel space:
//! letterbox/crop offsets from the source's fit mode are corrected, the
//! frame scale is applied, and the bbox model difference between the two
//! engines is compensated.

use crate::core::config::FusionConfig;
use crate::domain::detection::{
    Detection, FitMode, FrameMetadata, NormalizedDetection, OcrSource,
};
use crate::processors::BoundingBox;

/// Per-axis transform from analysis-frame to canonical coordinates.
///
/// Canonical coordinate = (analysis coordinate + offset) * scale. The
/// offset is negative for letterboxing (Contain) and positive for cropping
/// (Cover).
#[derive(Debug, Clone, Copy)]
struct FrameTransform {
    offset_x: f32,
    offset_y: f32,
    scale_x: f32,
    scale_y: f32,
}

impl FrameTransform {
    /// Derives the transform for a frame.
    ///
    /// For `Contain` the original was scaled uniformly to fit inside the
    /// analysis frame and centered, padding the leftover axis; the padding
    /// offset is subtracted before scaling back up. For `Cover` the
    /// original was scaled uniformly to fill the frame and the overflow
    /// cropped symmetrically; the crop offset is added back. For `None`
    /// the axes scale independently with no offset.
    fn from_frame(frame: &FrameMetadata) -> Self {
        let analysis_w = frame.analysis_width as f32;
        let analysis_h = frame.analysis_height as f32;
        let original_w = frame.original_width as f32;
        let original_h = frame.original_height as f32;

        match frame.fit_mode {
            FitMode::Contain => {
                let fit = (analysis_w / original_w).min(analysis_h / original_h);
                let content_w = original_w * fit;
                let content_h = original_h * fit;
                Self {
                    offset_x: -(analysis_w - content_w) / 2.0,
                    offset_y: -(analysis_h - content_h) / 2.0,
                    scale_x: 1.0 / fit,
                    scale_y: 1.0 / fit,
                }
            }
            FitMode::Cover => {
                let fit = (analysis_w / original_w).max(analysis_h / original_h);
                let content_w = original_w * fit;
                let content_h = original_h * fit;
                Self {
                    offset_x: (content_w - analysis_w) / 2.0,
                    offset_y: (content_h - analysis_h) / 2.0,
                    scale_x: 1.0 / fit,
                    scale_y: 1.0 / fit,
                }
            }
            FitMode::None => Self {
                offset_x: 0.0,
                offset_y: 0.0,
                scale_x: original_w / analysis_w,
                scale_y: original_h / analysis_h,
            },
        }
    }

    fn apply(&self, bbox: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x: (bbox.x + self.offset_x) * self.scale_x,
            y: (bbox.y + self.offset_y) * self.scale_y,
            width: bbox.width * self.scale_x,
            height: bbox.height * self.scale_y,
        }
    }
}

/// Clips a box to the canonical frame, dropping any part that fell into
/// letterbox padding.
fn clip_to_frame(bbox: &BoundingBox, width: f32, height: f32) -> BoundingBox {
    let x1 = bbox.x.max(0.0);
    let y1 = bbox.y.max(0.0);
    let x2 = bbox.right().min(width);
    let y2 = bbox.bottom().min(height);
    BoundingBox::from_coords(x1, y1, x2, y2)
}

/// Maps a detection list into canonical pixel space.
///
/// Detections that are malformed (wrong source tag for this list,
/// non-finite geometry or confidence) or degenerate (non-positive width or
/// height before or after normalization) are dropped with a warning; the
/// run continues with the remainder. Confidence is clamped to `[0, 1]`.
pub(crate) fn normalize_detections(
    detections: &[Detection],
    frame: &FrameMetadata,
    expected_source: OcrSource,
    config: &FusionConfig,
) -> Vec<NormalizedDetection> {
    if frame.analysis_width == 0
        || frame.analysis_height == 0
        || frame.original_width == 0
        || frame.original_height == 0
    {
        tracing::warn!(
            target: "fusion",
            source = %expected_source,
            analysis = ?(frame.analysis_width, frame.analysis_height),
            original = ?(frame.original_width, frame.original_height),
            "Frame metadata has zero dimensions; dropping all detections from this source"
        );
        return Vec::new();
    }

    let transform = FrameTransform::from_frame(frame);
    let original_w = frame.original_width as f32;
    let original_h = frame.original_height as f32;

    let mut normalized = Vec::with_capacity(detections.len());
    for (input_index, detection) in detections.iter().enumerate() {
        if detection.source != expected_source {
            tracing::warn!(
                target: "fusion",
                index = input_index,
                expected = %expected_source,
                actual = %detection.source,
                "Detection tagged with wrong source; dropping"
            );
            continue;
        }

        if detection.bbox.has_non_finite() || !detection.confidence.is_finite() {
            tracing::warn!(
                target: "fusion",
                index = input_index,
                source = %expected_source,
                "Detection has non-finite geometry or confidence; dropping"
            );
            continue;
        }

        if detection.bbox.is_degenerate() {
            tracing::warn!(
                target: "fusion",
                index = input_index,
                source = %expected_source,
                bbox = ?detection.bbox,
                "Detection has non-positive dimensions; dropping"
            );
            continue;
        }

        let scaled = transform.apply(&detection.bbox);

        // Compensate for bbox model differences: multimodal boxes are
        // tight to glyph ink, traditional boxes carry line-height padding.
        let compensated = match expected_source {
            OcrSource::Multimodal => scaled.expand_height(config.multimodal_expand_ratio),
            OcrSource::Traditional => scaled.shrink_height(config.traditional_shrink_ratio),
        };

        let clipped = clip_to_frame(&compensated, original_w, original_h);
        if clipped.is_degenerate() {
            tracing::warn!(
                target: "fusion",
                index = input_index,
                source = %expected_source,
                bbox = ?compensated,
                "Detection degenerate after normalization; dropping"
            );
            continue;
        }

        let mut detection = detection.clone();
        detection.confidence = detection.confidence.clamp(0.0, 1.0);
        normalized.push(NormalizedDetection {
            detection,
            bbox: clipped,
            input_index,
        });
    }

    normalized
}
