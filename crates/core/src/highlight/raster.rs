//! Raster projection
//!
//! Recognizers report one box per text block, not per word. A word's box is
//! approximated by assuming every character in the block has the same
//! width: `char_width = block_width / char_count`, the word starts at
//! `x1 + start * char_width` and spans `len * char_width`. Vertical extent
//! is the whole block. This is coarse by nature and will drift for
//! proportional fonts.

use serde::Serialize;
use tracing::debug;

use crate::diff::Correction;
use crate::geometry::{Detection, Rect};
use crate::highlight::corrected_original_words;
use crate::tokenizers::Tokenizer;

/// A highlighted word occurrence within one detection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RasterHighlight {
    /// Approximate word rectangle
    pub rect: Rect,
    /// Matched word as it appears in the detection text
    pub word: String,
    /// Index of the detection the word was found in
    pub detection_index: usize,
}

/// Map corrected original words onto approximate rectangles.
///
/// Detections below `confidence_threshold` are skipped. Output is ordered by
/// detection, then by position within the detection text.
pub fn project_onto_image(
    detections: &[Detection],
    corrections: &[Correction],
    confidence_threshold: f64,
    tokenizer: &dyn Tokenizer,
) -> Vec<RasterHighlight> {
    let targets = corrected_original_words(corrections);
    if targets.is_empty() {
        return Vec::new();
    }

    let mut highlights = Vec::new();

    for (detection_index, detection) in detections.iter().enumerate() {
        if detection.confidence < confidence_threshold {
            debug!(
                detection_index,
                confidence = detection.confidence,
                "skipping detection below confidence threshold"
            );
            continue;
        }

        let char_count = detection.text.chars().count();
        if char_count == 0 {
            continue;
        }

        let block = detection.bounding_rect();
        let char_width = block.width() / char_count as f64;

        for token in tokenizer.tokenize(&detection.text) {
            if !token.is_word() || !targets.contains(&token.key) {
                continue;
            }

            let start = token.span.char_start(&detection.text) as f64;
            let len = token.span.char_len(&detection.text) as f64;
            let x1 = block.x1 + start * char_width;

            highlights.push(RasterHighlight {
                rect: Rect::new(x1, block.y1, x1 + len * char_width, block.y2),
                word: token.text,
                detection_index,
            });
        }
    }

    debug!(highlights = highlights.len(), "projected corrections onto image");
    highlights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::tokenizers::WordTokenizer;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn are_to_is() -> Vec<Correction> {
        vec![Correction::new("are", "is", "this are wrong", "this is wrong")]
    }

    #[test]
    fn test_proportional_placement() {
        let detection = Detection::from_rect(Rect::new(0.0, 0.0, 100.0, 20.0), "This are wrong", 0.9);
        let highlights = project_onto_image(&[detection], &are_to_is(), 0.5, &WordTokenizer::new());

        assert_eq!(highlights.len(), 1);
        let rect = highlights[0].rect;
        let char_width = 100.0 / 14.0;
        assert!(approx(rect.x1, 5.0 * char_width));
        assert!(approx(rect.x2, 8.0 * char_width));
        assert_eq!(rect.y1, 0.0);
        assert_eq!(rect.y2, 20.0);
        assert_eq!(highlights[0].word, "are");
    }

    #[test]
    fn test_below_threshold_is_skipped() {
        let low = Detection::from_rect(Rect::new(0.0, 0.0, 100.0, 20.0), "This are wrong", 0.49);
        let highlights = project_onto_image(&[low], &are_to_is(), 0.5, &WordTokenizer::new());
        assert!(highlights.is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let exact = Detection::from_rect(Rect::new(0.0, 0.0, 100.0, 20.0), "they are", 0.5);
        let highlights = project_onto_image(&[exact], &are_to_is(), 0.5, &WordTokenizer::new());
        assert_eq!(highlights.len(), 1);
    }

    #[test]
    fn test_whole_word_case_insensitive_every_occurrence() {
        let detection = Detection::from_rect(
            Rect::new(10.0, 40.0, 210.0, 60.0),
            "ARE you aware they are",
            0.8,
        );
        let highlights = project_onto_image(&[detection], &are_to_is(), 0.5, &WordTokenizer::new());

        let words: Vec<_> = highlights.iter().map(|h| h.word.as_str()).collect();
        assert_eq!(words, vec!["ARE", "are"]);
        assert!(approx(highlights[0].rect.x1, 10.0));
        assert!(highlights[0].rect.x1 < highlights[1].rect.x1);
    }

    #[test]
    fn test_skewed_polygon_uses_bounding_box() {
        let detection = Detection::new(
            [
                Point::new(5.0, 2.0),
                Point::new(45.0, 0.0),
                Point::new(46.0, 10.0),
                Point::new(6.0, 12.0),
            ],
            "teh",
            0.99,
        );
        let corrections = vec![Correction::new("teh", "the", "a teh b", "a the b")];
        let highlights = project_onto_image(&[detection], &corrections, 0.5, &WordTokenizer::new());

        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].rect, Rect::new(5.0, 0.0, 46.0, 12.0));
    }

    #[test]
    fn test_multiple_detections_keep_order() {
        let detections = vec![
            Detection::from_rect(Rect::new(0.0, 0.0, 50.0, 10.0), "nothing here", 0.9),
            Detection::from_rect(Rect::new(0.0, 20.0, 50.0, 30.0), "we are", 0.9),
            Detection::from_rect(Rect::new(0.0, 40.0, 50.0, 50.0), "are we", 0.2),
            Detection::from_rect(Rect::new(0.0, 60.0, 50.0, 70.0), "", 0.9),
        ];
        let highlights = project_onto_image(&detections, &are_to_is(), 0.5, &WordTokenizer::new());

        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].detection_index, 1);
    }

    #[test]
    fn test_no_corrections() {
        let detection = Detection::from_rect(Rect::new(0.0, 0.0, 100.0, 20.0), "This are wrong", 0.9);
        assert!(project_onto_image(&[detection], &[], 0.5, &WordTokenizer::new()).is_empty());
    }
}
