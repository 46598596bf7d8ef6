//! End-to-end tests of the fusion pipeline through the public API.

use hybrid_ocr_fusion::{
    BoundingBox, Detection, FitMode, FontInfo, FrameMetadata, FusionConfig, FusionResult,
    HybridFusionEngine, OcrSource, Provenance,
};

fn traditional(text: &str, bbox: BoundingBox, confidence: f32) -> Detection {
    Detection::new(OcrSource::Traditional, text, bbox, confidence)
}

fn multimodal(text: &str, bbox: BoundingBox, confidence: f32) -> Detection {
    Detection::new(OcrSource::Multimodal, text, bbox, confidence)
}

#[test]
fn matching_pair_fuses_into_one_region_with_traditional_geometry() {
    let engine = HybridFusionEngine::with_defaults();
    let frame = FrameMetadata::identity(800, 600);

    let t = vec![traditional(
        "Hello",
        BoundingBox::new(10.0, 10.0, 50.0, 20.0),
        0.95,
    )];
    let m = vec![multimodal("Hello", BoundingBox::new(12.0, 9.0, 48.0, 22.0), 0.9)
        .with_font(FontInfo::with_size(16.0))];

    let result = engine.fuse(&t, &frame, &m, &frame);

    assert_eq!(result.summary.region_count, 1);
    let region = &result.regions[0];
    assert_eq!(region.provenance, Provenance::BOTH);
    assert!(!region.approximate_coordinates);
    // Geometry comes from the coordinate-precise side.
    assert!((region.bbox.x - 10.0).abs() < 1e-4);
    assert!((region.bbox.width - 50.0).abs() < 1e-4);
    // Style comes from the multimodal side.
    assert_eq!(region.font.as_ref().map(|f| f.size), Some(16.0));
    assert!((region.confidence - 0.95).abs() < 1e-6);
    assert_eq!(region.id, "region_001");
}

#[test]
fn multimodal_only_input_is_marked_approximate() {
    let engine = HybridFusionEngine::with_defaults();
    let frame = FrameMetadata::identity(800, 600);

    let m = vec![multimodal("Title", BoundingBox::new(0.0, 0.0, 100.0, 30.0), 0.8)];
    let result = engine.fuse(&[], &frame, &m, &frame);

    assert_eq!(result.summary.region_count, 1);
    let region = &result.regions[0];
    assert!(region.approximate_coordinates);
    assert!(!region.provenance.from_traditional);
    assert!(region.provenance.from_multimodal);
    assert_eq!(result.summary.multimodal_only, 1);
}

#[test]
fn distant_dissimilar_detections_stay_unpaired() {
    let engine = HybridFusionEngine::with_defaults();
    let frame = FrameMetadata::identity(800, 600);

    let t = vec![traditional("A", BoundingBox::new(0.0, 0.0, 10.0, 10.0), 0.9)];
    let m = vec![multimodal("B", BoundingBox::new(500.0, 500.0, 10.0, 10.0), 0.9)];

    let result = engine.fuse(&t, &frame, &m, &frame);

    assert_eq!(result.summary.region_count, 2);
    assert_eq!(result.summary.matched, 0);
    assert_eq!(result.summary.traditional_only, 1);
    assert_eq!(result.summary.multimodal_only, 1);
}

#[test]
fn contain_letterbox_offset_is_removed() {
    let engine = HybridFusionEngine::with_defaults();
    // 800x600 original analyzed in a 1000x600 contain frame: the content
    // occupies x in [100, 900], so analysis x=100 is canonical x=0.
    let t_frame = FrameMetadata::identity(800, 600);
    let m_frame = FrameMetadata {
        analysis_width: 1000,
        analysis_height: 600,
        fit_mode: FitMode::Contain,
        original_width: 800,
        original_height: 600,
    };

    let m = vec![multimodal(
        "Edge",
        BoundingBox::new(100.0, 50.0, 80.0, 20.0),
        0.8,
    )];
    let result = engine.fuse(&[], &t_frame, &m, &m_frame);

    assert_eq!(result.summary.region_count, 1);
    assert!(result.regions[0].bbox.x.abs() < 1e-3);
}

#[test]
fn cover_crop_offset_is_restored() {
    let engine = HybridFusionEngine::with_defaults();
    // 1000x600 original analyzed in an 800x600 cover frame: 100px was
    // cropped from each side, so analysis x=0 is canonical x=100.
    let t_frame = FrameMetadata::identity(1000, 600);
    let m_frame = FrameMetadata {
        analysis_width: 800,
        analysis_height: 600,
        fit_mode: FitMode::Cover,
        original_width: 1000,
        original_height: 600,
    };

    let m = vec![multimodal(
        "Edge",
        BoundingBox::new(0.0, 50.0, 80.0, 20.0),
        0.8,
    )];
    let result = engine.fuse(&[], &t_frame, &m, &m_frame);

    assert_eq!(result.summary.region_count, 1);
    assert!((result.regions[0].bbox.x - 100.0).abs() < 1e-3);
}

#[test]
fn identical_detections_from_both_sources_collapse_to_one_region() {
    let engine = HybridFusionEngine::with_defaults();
    let frame = FrameMetadata::identity(800, 600);
    let bbox = BoundingBox::new(50.0, 50.0, 120.0, 24.0);

    let t = vec![traditional("Same text", bbox, 0.9)];
    let m = vec![multimodal("Same text", bbox, 0.85)];

    let result = engine.fuse(&t, &frame, &m, &frame);
    assert_eq!(result.summary.region_count, 1);
    assert_eq!(result.regions[0].provenance, Provenance::BOTH);
}

#[test]
fn matched_pair_scores_meet_the_threshold_when_recomputed() {
    let engine = HybridFusionEngine::with_defaults();
    let config = FusionConfig::default();
    let frame = FrameMetadata::identity(1000, 800);

    let t = vec![
        traditional("first line", BoundingBox::new(10.0, 10.0, 150.0, 22.0), 0.95),
        traditional("second line", BoundingBox::new(10.0, 60.0, 160.0, 22.0), 0.92),
    ];
    let m = vec![
        multimodal("first line", BoundingBox::new(12.0, 9.0, 148.0, 24.0), 0.85),
        multimodal("second line", BoundingBox::new(11.0, 59.0, 158.0, 24.0), 0.84),
    ];

    let result = engine.fuse(&t, &frame, &m, &frame);
    assert_eq!(result.summary.matched, 2);

    // The merged regions carry traditional geometry, so recomputing the
    // combined score of each fused region against its raw traditional
    // counterpart must clear the match threshold by a wide margin.
    let diagonal = frame.original_diagonal();
    for (region, raw) in result.regions.iter().zip(&t) {
        let iou = region.bbox.iou(&raw.bbox);
        let text = hybrid_ocr_fusion::processors::text_similarity(&region.text, &raw.text);
        let distance = region.bbox.center().distance_to(&raw.bbox.center());
        let center = 1.0 - (distance / diagonal / config.center_distance_scale).min(1.0);
        let combined = config.iou_weight * iou
            + config.text_weight * text
            + config.center_weight * center;
        assert!(combined >= config.match_threshold);
    }
}

#[test]
fn unmatched_counts_agree_with_single_source_regions() {
    let engine = HybridFusionEngine::with_defaults();
    let frame = FrameMetadata::identity(1000, 800);

    let t = vec![
        traditional("shared", BoundingBox::new(10.0, 10.0, 120.0, 22.0), 0.9),
        traditional("t only", BoundingBox::new(10.0, 200.0, 120.0, 22.0), 0.9),
        traditional("t only too", BoundingBox::new(10.0, 400.0, 120.0, 22.0), 0.9),
    ];
    let m = vec![
        multimodal("shared", BoundingBox::new(11.0, 11.0, 120.0, 22.0), 0.8),
        multimodal("m only", BoundingBox::new(600.0, 600.0, 120.0, 22.0), 0.8),
    ];

    let result = engine.fuse(&t, &frame, &m, &frame);
    let single_source = result.single_source_regions().count();
    assert_eq!(
        result.summary.traditional_only + result.summary.multimodal_only,
        single_source
    );
    assert_eq!(single_source, 3);
    assert_eq!(result.summary.matched, 1);
    assert_eq!(result.summary.traditional_input, 3);
    assert_eq!(result.summary.multimodal_input, 2);
}

#[test]
fn output_is_reading_order_sorted() {
    let engine = HybridFusionEngine::with_defaults();
    let frame = FrameMetadata::identity(1000, 800);

    let t = vec![
        traditional("bottom", BoundingBox::new(40.0, 500.0, 120.0, 22.0), 0.9),
        traditional("top right", BoundingBox::new(500.0, 20.0, 120.0, 22.0), 0.9),
        traditional("top left", BoundingBox::new(40.0, 22.0, 120.0, 22.0), 0.9),
        traditional("middle", BoundingBox::new(40.0, 250.0, 120.0, 22.0), 0.9),
    ];

    let result = engine.fuse(&t, &frame, &[], &frame);
    let texts: Vec<&str> = result.regions.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["top left", "top right", "middle", "bottom"]);
    assert_eq!(
        result.concatenated_text(" "),
        "top left top right middle bottom"
    );

    let ids: Vec<&str> = result.regions.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["region_001", "region_002", "region_003", "region_004"]
    );
}

#[test]
fn three_detections_of_one_text_run_collapse_to_one_region() {
    let engine = HybridFusionEngine::with_defaults();
    let frame = FrameMetadata::identity(1000, 800);

    // The traditional engine split one physical run into two overlapping
    // detections; the multimodal engine saw it once. The matcher pairs
    // the multimodal detection with the closer traditional one, and the
    // residual dedup pass collapses the leftover duplicate.
    let t = vec![
        traditional("Sale", BoundingBox::new(100.0, 100.0, 80.0, 20.0), 0.95),
        traditional("Sale", BoundingBox::new(104.0, 103.0, 80.0, 20.0), 0.9),
    ];
    let m = vec![multimodal("Sale", BoundingBox::new(101.0, 99.0, 80.0, 22.0), 0.85)];

    let result = engine.fuse(&t, &frame, &m, &frame);

    assert_eq!(result.summary.region_count, 1);
    assert_eq!(result.regions[0].provenance, Provenance::BOTH);
    assert!((result.regions[0].confidence - 0.95).abs() < 1e-6);

    // No two surviving regions may still look like the same text run.
    assert_eq!(result.summary.traditional_only, 0);
}

#[test]
fn fusing_twice_produces_identical_output() {
    let engine = HybridFusionEngine::with_defaults();
    let frame = FrameMetadata::identity(1000, 800);

    let t = vec![
        traditional("alpha", BoundingBox::new(10.0, 10.0, 100.0, 20.0), 0.9),
        traditional("beta", BoundingBox::new(10.0, 60.0, 100.0, 20.0), 0.88),
    ];
    let m = vec![
        multimodal("alpha", BoundingBox::new(12.0, 9.0, 98.0, 22.0), 0.8),
        multimodal("gamma", BoundingBox::new(400.0, 400.0, 100.0, 20.0), 0.8),
    ];

    let first = engine.fuse(&t, &frame, &m, &frame);
    let second = engine.fuse(&t, &frame, &m, &frame);
    assert_eq!(first.summary, second.summary);
    let texts_a: Vec<&str> = first.regions.iter().map(|r| r.text.as_str()).collect();
    let texts_b: Vec<&str> = second.regions.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts_a, texts_b);
}

#[test]
fn empty_inputs_yield_empty_result() {
    let engine = HybridFusionEngine::with_defaults();
    let frame = FrameMetadata::identity(800, 600);
    let result = engine.fuse(&[], &frame, &[], &frame);
    assert!(result.regions.is_empty());
    assert_eq!(result.summary.region_count, 0);
    assert_eq!(result.summary.average_confidence, 0.0);
}

#[test]
fn mislabeled_detections_are_dropped_not_fatal() {
    let engine = HybridFusionEngine::with_defaults();
    let frame = FrameMetadata::identity(800, 600);

    // A multimodal-tagged record handed to the traditional side, plus a
    // degenerate box. Both are dropped; the valid record survives.
    let t = vec![
        multimodal("wrong side", BoundingBox::new(10.0, 10.0, 50.0, 20.0), 0.9),
        traditional("degenerate", BoundingBox::new(10.0, 50.0, 0.0, 20.0), 0.9),
        traditional("valid", BoundingBox::new(10.0, 100.0, 50.0, 20.0), 0.9),
    ];

    let result = engine.fuse(&t, &frame, &[], &frame);
    assert_eq!(result.summary.region_count, 1);
    assert_eq!(result.regions[0].text, "valid");
    assert_eq!(result.summary.traditional_input, 3);
}

#[test]
fn unmatched_traditional_heading_gets_fallback_font() {
    let engine = HybridFusionEngine::with_defaults();
    let frame = FrameMetadata::identity(1200, 900);

    // Short and tall reads as a heading: bold, size from box height.
    let t = vec![traditional(
        "Big Title",
        BoundingBox::new(100.0, 40.0, 400.0, 60.0),
        0.95,
    )];
    let result = engine.fuse(&t, &frame, &[], &frame);

    let font = result.regions[0].font.as_ref().expect("fallback font");
    assert!((font.size - 45.0).abs() < 1e-3);
    assert_eq!(font.weight, Some(hybrid_ocr_fusion::FontWeight::Bold));
}

#[test]
fn result_serializes_and_deserializes() {
    let engine = HybridFusionEngine::with_defaults();
    let frame = FrameMetadata::identity(800, 600);

    let t = vec![traditional("Hello", BoundingBox::new(10.0, 10.0, 50.0, 20.0), 0.95)];
    let m = vec![multimodal("Hello", BoundingBox::new(12.0, 9.0, 48.0, 22.0), 0.9)
        .with_font(FontInfo::with_size(16.0))];

    let result = engine.fuse(&t, &frame, &m, &frame);
    let json = serde_json::to_string(&result).expect("serialize");
    let restored: FusionResult = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(restored.summary, result.summary);
    assert_eq!(restored.regions.len(), result.regions.len());
    assert_eq!(restored.regions[0].id, result.regions[0].id);
    assert_eq!(restored.regions[0].text, result.regions[0].text);
}
