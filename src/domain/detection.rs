//! Input-side data model: raw OCR detections and frame metadata.
//!
//! Detections arrive from two adapters with different strengths. The
//! traditional engine reports precise geometry but no style information;
//! the multimodal engine reports looser geometry plus font metadata. Both
//! are expressed as [`Detection`] records, tagged with their source and
//! validated at the ingestion boundary rather than at use sites.

use crate::processors::BoundingBox;
use serde::{Deserialize, Serialize};

/// Which OCR engine produced a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrSource {
    /// Coordinate-precise traditional OCR engine.
    Traditional,
    /// Vision-LLM OCR engine with style metadata but looser geometry.
    Multimodal,
}

impl std::fmt::Display for OcrSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OcrSource::Traditional => write!(f, "traditional"),
            OcrSource::Multimodal => write!(f, "multimodal"),
        }
    }
}

/// Font weight reported or synthesized for a text region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    Normal,
    /// Bold weight.
    Bold,
}

/// Horizontal text alignment reported by the multimodal engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Style metadata for a text region.
///
/// In practice only the multimodal engine produces this; for unmatched
/// traditional detections the merge stage synthesizes a heuristic
/// fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontInfo {
    /// Font size in pixels.
    pub size: f32,
    /// Font family name, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Font weight, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeight>,
    /// Text color (CSS-style string), if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Horizontal alignment, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

impl FontInfo {
    /// Creates a FontInfo carrying only a size.
    pub fn with_size(size: f32) -> Self {
        Self {
            size,
            family: None,
            weight: None,
            color: None,
            align: None,
        }
    }
}

/// A single raw text detection from one OCR engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// The engine that produced this detection.
    pub source: OcrSource,
    /// The recognized text.
    pub text: String,
    /// Bounding box in the source's own analysis-frame pixels.
    pub bbox: BoundingBox,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f32,
    /// Style metadata (multimodal only in practice).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontInfo>,
}

impl Detection {
    /// Creates a detection with no font metadata.
    pub fn new(source: OcrSource, text: impl Into<String>, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            source,
            text: text.into(),
            bbox,
            confidence,
            font: None,
        }
    }

    /// Attaches font metadata.
    pub fn with_font(mut self, font: FontInfo) -> Self {
        self.font = Some(font);
        self
    }
}

/// Image scaling strategy used when a source analyzed a resized frame.
///
/// Analogous to CSS object-fit: it determines whether a letterbox or crop
/// offset must be corrected before coordinates can be compared across
/// sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// The frame was cropped to fill the analysis dimensions.
    Cover,
    /// The frame was letterboxed to fit inside the analysis dimensions.
    Contain,
    /// The frame was stretched (or not resized); axes scale independently.
    #[default]
    None,
}

/// Describes the pixel space one source's detections are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMetadata {
    /// Width of the analysis frame the source saw.
    pub analysis_width: u32,
    /// Height of the analysis frame the source saw.
    pub analysis_height: u32,
    /// How the original image was fitted into the analysis frame.
    pub fit_mode: FitMode,
    /// Width of the original image (canonical space).
    pub original_width: u32,
    /// Height of the original image (canonical space).
    pub original_height: u32,
}

impl FrameMetadata {
    /// Creates frame metadata for a source that analyzed the original
    /// image at full resolution.
    pub fn identity(width: u32, height: u32) -> Self {
        Self {
            analysis_width: width,
            analysis_height: height,
            fit_mode: FitMode::None,
            original_width: width,
            original_height: height,
        }
    }

    /// Diagonal length of the original image in pixels.
    pub fn original_diagonal(&self) -> f32 {
        let w = self.original_width as f32;
        let h = self.original_height as f32;
        (w * w + h * h).sqrt()
    }
}

/// A detection whose bounding box has been mapped into canonical
/// (original image) pixel space, with bbox model compensation applied.
#[derive(Debug, Clone)]
pub struct NormalizedDetection {
    /// The underlying detection.
    pub detection: Detection,
    /// Bounding box in canonical pixel space.
    pub bbox: BoundingBox,
    /// Index of the detection in its source's input list. Used for
    /// deterministic tie-breaking during assignment.
    pub input_index: usize,
}
