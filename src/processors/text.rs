//! Text canonicalization and similarity scoring.
//!
//! The two OCR sources disagree on casing, whitespace, and occasionally on
//! individual characters. Matching therefore compares canonicalized text
//! with a normalized edit distance rather than exact equality.

use strsim::normalized_levenshtein;

/// Canonicalizes text for cross-source comparison.
///
/// Lowercases and collapses all runs of whitespace to a single space, so
/// that "Hello  World" and "hello world" compare as identical.
pub fn canonicalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Computes the similarity of two texts as `1 - normalized_edit_distance`
/// over their canonicalized forms, clipped to `[0, 1]`.
///
/// Two empty texts are considered identical (similarity 1.0); an empty text
/// against a non-empty one scores 0.0.
pub fn text_similarity(a: &str, b: &str) -> f32 {
    let a = canonicalize(a);
    let b = canonicalize(b);

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    (normalized_levenshtein(&a, &b) as f32).clamp(0.0, 1.0)
}
