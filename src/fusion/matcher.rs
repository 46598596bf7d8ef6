//! Cross-source region matching.
//!
//! Every (traditional, multimodal) pair is scored on geometric overlap,
//! text similarity, and center distance; pairs clearing the candidate test
//! are assigned greedily by descending combined score. Greedy assignment
//! approximates optimal bipartite matching, which is acceptable for the
//! small region counts typical of one slide; an exact solver could replace
//! the assignment loop behind the same [`MatchOutcome`] contract.

use crate::core::config::FusionConfig;
use crate::domain::detection::NormalizedDetection;
use crate::processors::{text_similarity, BoundingBox};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A scored (traditional, multimodal) pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Index into the normalized traditional detection list.
    pub traditional_idx: usize,
    /// Index into the normalized multimodal detection list.
    pub multimodal_idx: usize,
    /// Intersection over union of the two boxes.
    pub iou: f32,
    /// Normalized edit-distance similarity of the two texts.
    pub text_similarity: f32,
    /// Center-distance similarity relative to the image diagonal.
    pub center_similarity: f32,
    /// Weighted combination of the three terms.
    pub combined_score: f32,
}

/// Result of the assignment stage: accepted pairs plus the residual
/// unmatched detections on each side.
#[derive(Debug, Clone, Default)]
pub(crate) struct MatchOutcome {
    /// Accepted pairs, in assignment order.
    pub pairs: Vec<MatchCandidate>,
    /// Indices of traditional detections left unmatched.
    pub unmatched_traditional: Vec<usize>,
    /// Indices of multimodal detections left unmatched.
    pub unmatched_multimodal: Vec<usize>,
}

/// Scores one pair of boxes and texts.
pub(crate) fn score_pair(
    traditional_idx: usize,
    multimodal_idx: usize,
    t_bbox: &BoundingBox,
    m_bbox: &BoundingBox,
    t_text: &str,
    m_text: &str,
    diagonal: f32,
    config: &FusionConfig,
) -> MatchCandidate {
    let iou = t_bbox.iou(m_bbox);
    let text_sim = text_similarity(t_text, m_text);
    let center_sim = center_similarity(t_bbox, m_bbox, diagonal, config.center_distance_scale);

    MatchCandidate {
        traditional_idx,
        multimodal_idx,
        iou,
        text_similarity: text_sim,
        center_similarity: center_sim,
        combined_score: config.iou_weight * iou
            + config.text_weight * text_sim
            + config.center_weight * center_sim,
    }
}

/// Center similarity: 1 at coincident centers, falling to 0 once the
/// distance reaches `center_distance_scale` of the image diagonal.
fn center_similarity(a: &BoundingBox, b: &BoundingBox, diagonal: f32, scale: f32) -> f32 {
    if diagonal <= 0.0 {
        return 0.0;
    }
    let distance = a.center().distance_to(&b.center());
    1.0 - (distance / diagonal / scale).min(1.0)
}

/// The candidate test: combined score clears the match threshold AND the
/// pair overlaps at least `min_iou` or the texts match near-exactly.
pub(crate) fn is_candidate(candidate: &MatchCandidate, config: &FusionConfig) -> bool {
    candidate.combined_score >= config.match_threshold
        && (candidate.iou >= config.min_iou
            || candidate.text_similarity >= config.high_text_override)
}

/// Scores all pairs and greedily assigns candidates.
///
/// Candidates are visited by descending combined score, ties broken by
/// ascending (traditional, multimodal) index so the result is
/// deterministic. Each detection ends up in at most one pair.
pub(crate) fn match_detections(
    traditional: &[NormalizedDetection],
    multimodal: &[NormalizedDetection],
    diagonal: f32,
    config: &FusionConfig,
) -> MatchOutcome {
    let mut candidates = Vec::new();
    for (t_idx, t) in traditional.iter().enumerate() {
        for (m_idx, m) in multimodal.iter().enumerate() {
            let candidate = score_pair(
                t_idx,
                m_idx,
                &t.bbox,
                &m.bbox,
                &t.detection.text,
                &m.detection.text,
                diagonal,
                config,
            );
            if is_candidate(&candidate, config) {
                candidates.push(candidate);
            }
        }
    }

    let ordered = candidates.into_iter().sorted_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.traditional_idx.cmp(&b.traditional_idx))
            .then_with(|| a.multimodal_idx.cmp(&b.multimodal_idx))
    });

    let mut traditional_taken = vec![false; traditional.len()];
    let mut multimodal_taken = vec![false; multimodal.len()];
    let mut pairs = Vec::new();

    for candidate in ordered {
        if traditional_taken[candidate.traditional_idx]
            || multimodal_taken[candidate.multimodal_idx]
        {
            continue;
        }
        traditional_taken[candidate.traditional_idx] = true;
        multimodal_taken[candidate.multimodal_idx] = true;
        pairs.push(candidate);
    }

    let unmatched_traditional = traditional_taken
        .iter()
        .enumerate()
        .filter(|(_, taken)| !**taken)
        .map(|(idx, _)| idx)
        .collect();
    let unmatched_multimodal = multimodal_taken
        .iter()
        .enumerate()
        .filter(|(_, taken)| !**taken)
        .map(|(idx, _)| idx)
        .collect();

    MatchOutcome {
        pairs,
        unmatched_traditional,
        unmatched_multimodal,
    }
}
