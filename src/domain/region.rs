//! Output-side data model: fused text regions and aggregate metadata.

use crate::domain::detection::FontInfo;
use crate::processors::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which source(s) contributed to a fused region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// True if a traditional detection contributed.
    pub from_traditional: bool,
    /// True if a multimodal detection contributed.
    pub from_multimodal: bool,
}

impl Provenance {
    /// Provenance for a region backed by both sources.
    pub const BOTH: Provenance = Provenance {
        from_traditional: true,
        from_multimodal: true,
    };

    /// Provenance for a region backed only by the traditional engine.
    pub const TRADITIONAL_ONLY: Provenance = Provenance {
        from_traditional: true,
        from_multimodal: false,
    };

    /// Provenance for a region backed only by the multimodal engine.
    pub const MULTIMODAL_ONLY: Provenance = Provenance {
        from_traditional: false,
        from_multimodal: true,
    };

    /// Returns true if exactly one source contributed.
    pub fn is_single_source(&self) -> bool {
        self.from_traditional != self.from_multimodal
    }
}

/// A reconciled text region in canonical (original image) pixel space.
///
/// Each region derives from at most one traditional and at most one
/// multimodal detection; the matcher never produces many-to-many pairings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridTextRegion {
    /// Sequential region identifier in reading order (`region_001`, ...).
    pub id: String,
    /// The fused text.
    pub text: String,
    /// Bounding box in canonical pixel space.
    pub bbox: BoundingBox,
    /// Fused confidence in `[0, 1]`.
    pub confidence: f32,
    /// Style metadata; may be a heuristic fallback for traditional-only
    /// regions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontInfo>,
    /// Which source(s) contributed to this region.
    pub provenance: Provenance,
    /// True when the geometry comes solely from the multimodal engine and
    /// should be treated as imprecise by downstream mask building.
    pub approximate_coordinates: bool,
}

/// Aggregate metadata for one fusion run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionSummary {
    /// Total number of output regions.
    pub region_count: usize,
    /// Regions backed by both sources.
    pub matched: usize,
    /// Regions backed only by the traditional engine.
    pub traditional_only: usize,
    /// Regions backed only by the multimodal engine.
    pub multimodal_only: usize,
    /// Mean confidence over all output regions (0.0 when empty).
    pub average_confidence: f32,
    /// Number of traditional detections received (before validation).
    pub traditional_input: usize,
    /// Number of multimodal detections received (before validation).
    pub multimodal_input: usize,
}

/// Result of one fusion run: ordered regions plus aggregate metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionResult {
    /// Fused regions in reading order.
    pub regions: Vec<HybridTextRegion>,
    /// Aggregate metadata.
    pub summary: FusionSummary,
}

impl FusionResult {
    /// Returns an empty result for the given input sizes.
    pub fn empty(traditional_input: usize, multimodal_input: usize) -> Self {
        Self {
            regions: Vec::new(),
            summary: FusionSummary {
                region_count: 0,
                matched: 0,
                traditional_only: 0,
                multimodal_only: 0,
                average_confidence: 0.0,
                traditional_input,
                multimodal_input,
            },
        }
    }

    /// Returns an iterator over regions backed by both sources.
    pub fn regions_from_both_sources(&self) -> impl Iterator<Item = &HybridTextRegion> {
        self.regions
            .iter()
            .filter(|region| region.provenance == Provenance::BOTH)
    }

    /// Returns an iterator over regions backed by a single source.
    pub fn single_source_regions(&self) -> impl Iterator<Item = &HybridTextRegion> {
        self.regions
            .iter()
            .filter(|region| region.provenance.is_single_source())
    }

    /// Returns all region text concatenated with the specified separator,
    /// in reading order.
    pub fn concatenated_text(&self, separator: &str) -> String {
        self.regions
            .iter()
            .map(|region| region.text.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for FusionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total regions: {}", self.summary.region_count)?;
        writeln!(
            f,
            "By provenance: {} matched, {} traditional-only, {} multimodal-only",
            self.summary.matched, self.summary.traditional_only, self.summary.multimodal_only
        )?;
        writeln!(
            f,
            "Average confidence: {:.3}",
            self.summary.average_confidence
        )?;

        for region in &self.regions {
            let approx = if region.approximate_coordinates {
                " (approximate)"
            } else {
                ""
            };
            writeln!(
                f,
                "  {}: '{}' [{:.0}, {:.0}, {:.0}x{:.0}] confidence {:.3}{}",
                region.id,
                region.text,
                region.bbox.x,
                region.bbox.y,
                region.bbox.width,
                region.bbox.height,
                region.confidence,
                approx
            )?;
        }

        Ok(())
    }
}
