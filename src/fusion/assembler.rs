//! Reading-order assembly of the final region list.
//!
//! Regions are grouped into lines by vertical-center proximity, lines are
//! sorted top to bottom, regions within a line left to right. Sequential
//! zero-padded IDs are assigned and the aggregate summary is computed.

use crate::core::config::FusionConfig;
use crate::domain::region::{FusionResult, FusionSummary, HybridTextRegion, Provenance};

/// A line of regions under construction.
struct Line {
    /// Vertical center of the line's first (anchor) region.
    anchor_center_y: f32,
    /// Height of the anchor region.
    anchor_height: f32,
    regions: Vec<HybridTextRegion>,
}

impl Line {
    fn new(region: HybridTextRegion) -> Self {
        Self {
            anchor_center_y: region.bbox.center().y,
            anchor_height: region.bbox.height,
            regions: vec![region],
        }
    }

    /// Two regions share a line when their vertical centers differ by at
    /// most `tolerance_ratio` of the larger region's height.
    fn accepts(&self, region: &HybridTextRegion, tolerance_ratio: f32) -> bool {
        let tolerance = tolerance_ratio * self.anchor_height.max(region.bbox.height);
        (region.bbox.center().y - self.anchor_center_y).abs() <= tolerance
    }

    fn top(&self) -> f32 {
        self.regions
            .iter()
            .map(|r| r.bbox.y)
            .fold(f32::INFINITY, f32::min)
    }
}

/// Groups regions into reading-order lines and assigns IDs and summary
/// metadata.
pub(crate) fn assemble(
    regions: Vec<HybridTextRegion>,
    traditional_input: usize,
    multimodal_input: usize,
    config: &FusionConfig,
) -> FusionResult {
    let mut ordered: Vec<HybridTextRegion> = regions;
    // Scan by vertical center so each region lands in the topmost line
    // that accepts it.
    ordered.sort_by(|a, b| {
        a.bbox
            .center()
            .y
            .partial_cmp(&b.bbox.center().y)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut lines: Vec<Line> = Vec::new();
    for region in ordered {
        match lines
            .iter_mut()
            .find(|line| line.accepts(&region, config.line_tolerance_ratio))
        {
            Some(line) => line.regions.push(region),
            None => lines.push(Line::new(region)),
        }
    }

    lines.sort_by(|a, b| {
        a.top()
            .partial_cmp(&b.top())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for line in &mut lines {
        line.regions.sort_by(|a, b| {
            a.bbox
                .x
                .partial_cmp(&b.bbox.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    let mut regions: Vec<HybridTextRegion> =
        lines.into_iter().flat_map(|line| line.regions).collect();
    for (index, region) in regions.iter_mut().enumerate() {
        region.id = format!("region_{:03}", index + 1);
    }

    let summary = summarize(&regions, traditional_input, multimodal_input);
    FusionResult { regions, summary }
}

fn summarize(
    regions: &[HybridTextRegion],
    traditional_input: usize,
    multimodal_input: usize,
) -> FusionSummary {
    let matched = regions
        .iter()
        .filter(|r| r.provenance == Provenance::BOTH)
        .count();
    let traditional_only = regions
        .iter()
        .filter(|r| r.provenance == Provenance::TRADITIONAL_ONLY)
        .count();
    let multimodal_only = regions
        .iter()
        .filter(|r| r.provenance == Provenance::MULTIMODAL_ONLY)
        .count();
    let average_confidence = if regions.is_empty() {
        0.0
    } else {
        regions.iter().map(|r| r.confidence).sum::<f32>() / regions.len() as f32
    };

    FusionSummary {
        region_count: regions.len(),
        matched,
        traditional_only,
        multimodal_only,
        average_confidence,
        traditional_input,
        multimodal_input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::BoundingBox;

    fn region(text: &str, bbox: BoundingBox, provenance: Provenance) -> HybridTextRegion {
        HybridTextRegion {
            id: String::new(),
            text: text.to_string(),
            bbox,
            confidence: 0.9,
            font: None,
            provenance,
            approximate_coordinates: false,
        }
    }

    #[test]
    fn test_reading_order_top_to_bottom_left_to_right() {
        let config = FusionConfig::default();
        let regions = vec![
            region(
                "bottom",
                BoundingBox::new(10.0, 200.0, 100.0, 20.0),
                Provenance::BOTH,
            ),
            region(
                "top-right",
                BoundingBox::new(300.0, 10.0, 100.0, 20.0),
                Provenance::BOTH,
            ),
            region(
                "top-left",
                BoundingBox::new(10.0, 12.0, 100.0, 20.0),
                Provenance::BOTH,
            ),
        ];

        let result = assemble(regions, 3, 3, &config);
        let texts: Vec<&str> = result.regions.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["top-left", "top-right", "bottom"]);
    }

    #[test]
    fn test_ids_are_sequential_and_zero_padded() {
        let config = FusionConfig::default();
        let regions = vec![
            region("a", BoundingBox::new(0.0, 0.0, 50.0, 20.0), Provenance::BOTH),
            region(
                "b",
                BoundingBox::new(0.0, 100.0, 50.0, 20.0),
                Provenance::BOTH,
            ),
        ];

        let result = assemble(regions, 2, 2, &config);
        assert_eq!(result.regions[0].id, "region_001");
        assert_eq!(result.regions[1].id, "region_002");
    }

    #[test]
    fn test_slightly_offset_regions_share_a_line() {
        let config = FusionConfig::default();
        // Vertical centers differ by 8px against 20px-tall boxes:
        // within the 50% tolerance, so the left one comes first even
        // though its top edge is lower.
        let regions = vec![
            region(
                "right",
                BoundingBox::new(200.0, 10.0, 100.0, 20.0),
                Provenance::BOTH,
            ),
            region(
                "left",
                BoundingBox::new(10.0, 18.0, 100.0, 20.0),
                Provenance::BOTH,
            ),
        ];

        let result = assemble(regions, 2, 2, &config);
        let texts: Vec<&str> = result.regions.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["left", "right"]);
    }

    #[test]
    fn test_output_sorted_by_line_top_then_left() {
        let config = FusionConfig::default();
        let regions = vec![
            region("c", BoundingBox::new(50.0, 300.0, 80.0, 20.0), Provenance::BOTH),
            region("b2", BoundingBox::new(300.0, 150.0, 80.0, 20.0), Provenance::BOTH),
            region("b1", BoundingBox::new(20.0, 152.0, 80.0, 20.0), Provenance::BOTH),
            region("a", BoundingBox::new(20.0, 10.0, 80.0, 20.0), Provenance::BOTH),
        ];

        let result = assemble(regions, 4, 4, &config);
        let texts: Vec<&str> = result.regions.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b1", "b2", "c"]);
    }

    #[test]
    fn test_summary_counts_by_provenance() {
        let config = FusionConfig::default();
        let regions = vec![
            region("a", BoundingBox::new(0.0, 0.0, 50.0, 20.0), Provenance::BOTH),
            region(
                "b",
                BoundingBox::new(0.0, 100.0, 50.0, 20.0),
                Provenance::TRADITIONAL_ONLY,
            ),
            region(
                "c",
                BoundingBox::new(0.0, 200.0, 50.0, 20.0),
                Provenance::MULTIMODAL_ONLY,
            ),
        ];

        let result = assemble(regions, 2, 2, &config);
        assert_eq!(result.summary.region_count, 3);
        assert_eq!(result.summary.matched, 1);
        assert_eq!(result.summary.traditional_only, 1);
        assert_eq!(result.summary.multimodal_only, 1);
        assert!((result.summary.average_confidence - 0.9).abs() < 1e-6);
        assert_eq!(result.summary.traditional_input, 2);
        assert_eq!(result.summary.multimodal_input, 2);
    }

    #[test]
    fn test_empty_assembly() {
        let config = FusionConfig::default();
        let result = assemble(Vec::new(), 0, 0, &config);
        assert!(result.regions.is_empty());
        assert_eq!(result.summary.region_count, 0);
        assert_eq!(result.summary.average_confidence, 0.0);
    }
}
