//! Region merging and residual deduplication.
//!
//! Matched pairs are resolved into single regions preferring traditional
//! geometry and multimodal style; unmatched detections from either side
//! pass through with provenance recorded. A final dedup pass re-applies
//! the candidate test over the merged list to collapse the rare case where
//! more than two raw detections describe one physical text run.

use crate::core::config::FusionConfig;
use crate::domain::detection::{FontInfo, FontWeight, NormalizedDetection};
use crate::domain::region::{HybridTextRegion, Provenance};
use crate::fusion::matcher::{is_candidate, score_pair, MatchOutcome};

/// Character count below which short, tall text is considered a heading.
const HEADING_MAX_CHARS: usize = 20;
/// Box height above which short text is considered a heading.
const HEADING_MIN_HEIGHT: f32 = 40.0;
/// Ratio of box height to synthesized font size.
const FONT_SIZE_HEIGHT_RATIO: f32 = 0.75;
/// Bounds for synthesized font sizes.
const FONT_SIZE_MIN: f32 = 12.0;
const FONT_SIZE_MAX: f32 = 72.0;

/// Synthesizes style metadata for a region that only the traditional
/// engine saw.
///
/// Font size tracks box height; short, tall text is typical of headings
/// and is marked bold.
fn fallback_font(text: &str, height: f32) -> FontInfo {
    let weight = if text.chars().count() < HEADING_MAX_CHARS && height > HEADING_MIN_HEIGHT {
        FontWeight::Bold
    } else {
        FontWeight::Normal
    };

    let mut font =
        FontInfo::with_size((height * FONT_SIZE_HEIGHT_RATIO).clamp(FONT_SIZE_MIN, FONT_SIZE_MAX));
    font.weight = Some(weight);
    font
}

/// Resolves one matched pair into a region.
fn merge_pair(
    traditional: &NormalizedDetection,
    multimodal: &NormalizedDetection,
    config: &FusionConfig,
) -> HybridTextRegion {
    // Traditional geometry is authoritative unless degenerate.
    let bbox = if traditional.bbox.is_degenerate() {
        multimodal.bbox
    } else {
        traditional.bbox
    };

    let t_text = traditional.detection.text.trim();
    let text = if t_text.is_empty() || traditional.detection.confidence < config.low_confidence_floor
    {
        multimodal.detection.text.clone()
    } else {
        traditional.detection.text.clone()
    };

    HybridTextRegion {
        id: String::new(),
        text,
        bbox,
        confidence: traditional
            .detection
            .confidence
            .max(multimodal.detection.confidence),
        font: multimodal.detection.font.clone(),
        provenance: Provenance::BOTH,
        approximate_coordinates: false,
    }
}

/// Produces the merged region list (IDs unassigned) from the match
/// outcome.
pub(crate) fn merge_regions(
    traditional: &[NormalizedDetection],
    multimodal: &[NormalizedDetection],
    outcome: &MatchOutcome,
    config: &FusionConfig,
) -> Vec<HybridTextRegion> {
    let mut regions =
        Vec::with_capacity(outcome.pairs.len() + outcome.unmatched_traditional.len()
            + outcome.unmatched_multimodal.len());

    for pair in &outcome.pairs {
        regions.push(merge_pair(
            &traditional[pair.traditional_idx],
            &multimodal[pair.multimodal_idx],
            config,
        ));
    }

    for &idx in &outcome.unmatched_traditional {
        let detection = &traditional[idx];
        regions.push(HybridTextRegion {
            id: String::new(),
            text: detection.detection.text.clone(),
            bbox: detection.bbox,
            confidence: detection.detection.confidence,
            font: detection
                .detection
                .font
                .clone()
                .or_else(|| Some(fallback_font(&detection.detection.text, detection.bbox.height))),
            provenance: Provenance::TRADITIONAL_ONLY,
            approximate_coordinates: false,
        });
    }

    for &idx in &outcome.unmatched_multimodal {
        let detection = &multimodal[idx];
        regions.push(HybridTextRegion {
            id: String::new(),
            text: detection.detection.text.clone(),
            bbox: detection.bbox,
            confidence: detection.detection.confidence,
            font: detection.detection.font.clone(),
            provenance: Provenance::MULTIMODAL_ONLY,
            approximate_coordinates: true,
        });
    }

    regions
}

/// Collapses residual overlaps in the merged region list.
///
/// Regions are visited by descending confidence (ties by emission order);
/// a region that still forms a match candidate with an already-kept region
/// is dropped in favor of the kept one. The pass is idempotent: the
/// survivors pairwise fail the candidate test, so a second application
/// changes nothing. Survivors are returned in their original emission
/// order.
pub(crate) fn dedup_regions(
    regions: Vec<HybridTextRegion>,
    diagonal: f32,
    config: &FusionConfig,
) -> Vec<HybridTextRegion> {
    if regions.len() < 2 {
        return regions;
    }

    let mut order: Vec<usize> = (0..regions.len()).collect();
    order.sort_by(|&a, &b| {
        regions[b]
            .confidence
            .partial_cmp(&regions[a].confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });

    let mut kept: Vec<usize> = Vec::with_capacity(regions.len());
    for &idx in &order {
        let duplicate_of = kept.iter().find(|&&kept_idx| {
            let candidate = score_pair(
                0,
                0,
                &regions[kept_idx].bbox,
                &regions[idx].bbox,
                &regions[kept_idx].text,
                &regions[idx].text,
                diagonal,
                config,
            );
            is_candidate(&candidate, config)
        });

        match duplicate_of {
            Some(&kept_idx) => {
                tracing::debug!(
                    target: "fusion",
                    dropped = %regions[idx].text,
                    kept = %regions[kept_idx].text,
                    "Dropping residual duplicate region"
                );
            }
            None => kept.push(idx),
        }
    }

    kept.sort_unstable();
    let mut kept_flags = vec![false; regions.len()];
    for &idx in &kept {
        kept_flags[idx] = true;
    }

    regions
        .into_iter()
        .zip(kept_flags)
        .filter(|(_, keep)| *keep)
        .map(|(region, _)| region)
        .collect()
}
