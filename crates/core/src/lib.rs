//! # Proofmark Core
//!
//! Word-level alignment of grammar corrections and their projection back
//! onto the medium the text came from.
//!
//! Given an original text and its corrected version, the engine tokenizes
//! both into words, aligns the word sequences, groups unmatched runs into
//! corrections with surrounding context, and filters out edits that are not
//! worth showing. The resulting corrections can then be projected onto an
//! image (approximate word rectangles from recognizer detections) or onto a
//! document tree (corrected words wrapped in an emphasis element).
//!
//! ## Core Concepts
//!
//! - **Tokenizers**: Split text into word tokens with byte spans
//! - **Aligners**: Compute match/delete/insert operations over word keys
//! - **Grouping**: Turn unmatched runs into corrections with context windows
//! - **Highlight**: Project corrections onto images or document trees
//! - **Pipeline**: Extract, correct, identify and highlight a whole carrier
//!
//! ## Example
//!
//! ```rust
//! use proofmark_core::{CorrectionConfig, CorrectionEngine};
//!
//! let engine = CorrectionEngine::new(CorrectionConfig::new().with_context_words(2));
//! let corrections = engine.identify("This are a test.", "This is a test.").unwrap();
//!
//! assert_eq!(corrections[0].original_word, "are");
//! assert_eq!(corrections[0].corrected_word, "is");
//! ```

pub mod algorithm;
pub mod config;
pub mod diff;
pub mod document;
pub mod engine;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod grouping;
pub mod highlight;
pub mod mapping;
pub mod pipeline;
pub mod render;
pub mod rules;
pub mod tokenizers;

// Re-export main types
pub use config::{CorrectionConfig, HighlightMarker};
pub use diff::{AlignmentOp, Correction, EditType, EditUnit, PositionedWord};
pub use document::{DocumentTree, FragmentNode, NodeId};
pub use engine::CorrectionEngine;
pub use error::{ProofError, Result};
pub use geometry::{Detection, Point, Rect};
pub use pipeline::{Carrier, CorrectionModel, Pipeline, Processed, ProcessingReport, Recognizer};
pub use rules::RuleBasedCorrector;
pub use tokenizers::{JoinPolicy, WordTokenizer};

/// Identify word-level corrections between an original and a corrected text
///
/// Uses the default tokenizer policy and no word bound, so it never fails.
/// Identical inputs (after trimming) yield an empty list.
///
/// # Example
///
/// ```rust
/// use proofmark_core::identify_corrections;
///
/// let corrections = identify_corrections("Same text here.", "Same text here.", 3);
/// assert!(corrections.is_empty());
/// ```
pub fn identify_corrections(original: &str, corrected: &str, context_words: usize) -> Vec<Correction> {
    let engine = CorrectionEngine::new(CorrectionConfig::new().with_context_words(context_words));
    engine.identify(original, corrected).unwrap_or_default()
}

/// Approximate rectangles of every corrected original word in the detections
///
/// `detections` must be the same list the text was extracted from; `None`
/// is a precondition violation, not an empty result.
pub fn highlight_image(
    detections: Option<&[Detection]>,
    corrections: &[Correction],
    confidence_threshold: f64,
) -> Result<Vec<Rect>> {
    config::validate_threshold(confidence_threshold)?;
    let detections = detections.ok_or(ProofError::MissingDetections)?;

    Ok(
        highlight::project_onto_image(detections, corrections, confidence_threshold, &WordTokenizer::new())
            .into_iter()
            .map(|h| h.rect)
            .collect(),
    )
}

/// Wrap every corrected original word of the tree in the default marker
pub fn highlight_tree(tree: DocumentTree, corrections: &[Correction]) -> DocumentTree {
    highlight_tree_with(tree, corrections, &CorrectionConfig::default())
}

/// Wrap corrected original words using the marker and skipped elements of
/// `config`
pub fn highlight_tree_with(
    mut tree: DocumentTree,
    corrections: &[Correction],
    config: &CorrectionConfig,
) -> DocumentTree {
    let tokenizer = WordTokenizer::new().with_join_policy(config.join_policy);
    highlight::project_onto_tree(&mut tree, corrections, config, &tokenizer);
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: &[(&str, &str)] = &[
        ("This are a test.", "This is a test."),
        ("I dont know.", "I don't know."),
        ("Their going too the park tomorow.", "They're going to the park tomorrow."),
        ("He go to school every days", "He goes to school every day"),
        ("a b c d e f g", "a x c y e z g"),
        ("", "Something new."),
        ("Something old.", ""),
    ];

    #[test]
    fn test_substitution_with_context() {
        assert_eq!(
            identify_corrections("This are a test.", "This is a test.", 2),
            vec![Correction::new("are", "is", "this are a test", "this is a test")]
        );
    }

    #[test]
    fn test_identical_text() {
        assert!(identify_corrections("Same text here.", "Same text here.", 3).is_empty());
    }

    #[test]
    fn test_contraction_with_default_tokenizer() {
        // the apostrophe splits "don't" into "don" and "t"
        let corrections = identify_corrections("I dont know.", "I don't know.", 1);
        assert_eq!(
            corrections,
            vec![Correction::new("dont", "don", "i dont know", "i don t")]
        );
    }

    #[test]
    fn test_highlight_tree_scenario() {
        let tree = DocumentTree::parse_html("<p class=\"lead\"> This are wrong. </p>").unwrap();
        let corrections = vec![Correction::new("are", "is", "this are wrong", "this is wrong")];
        let config = CorrectionConfig::new().with_marker(HighlightMarker::new("mark"));

        let tree = highlight_tree_with(tree, &corrections, &config);
        assert_eq!(
            tree.to_html().unwrap(),
            "<p class=\"lead\"> This <mark>are</mark> wrong. </p>"
        );

        let tree = highlight_tree(DocumentTree::parse_html("<p>This are wrong.</p>").unwrap(), &corrections);
        assert_eq!(tree.to_html().unwrap(), "<p>This <u>are</u> wrong.</p>");
    }

    #[test]
    fn test_highlight_image_scenario() {
        let detections = vec![Detection::from_rect(
            Rect::new(0.0, 0.0, 100.0, 20.0),
            "This are wrong",
            0.9,
        )];
        let corrections = vec![Correction::new("are", "is", "this are wrong", "this is wrong")];

        let rects = highlight_image(Some(detections.as_slice()), &corrections, 0.5).unwrap();
        assert_eq!(rects.len(), 1);

        let char_width = 100.0 / "This are wrong".chars().count() as f64;
        assert!((rects[0].x1 - 5.0 * char_width).abs() < 1e-9);
        assert!((rects[0].width() - 3.0 * char_width).abs() < 1e-9);
    }

    #[test]
    fn test_highlight_image_requires_detections() {
        let corrections = vec![Correction::new("are", "is", "", "")];
        assert!(matches!(
            highlight_image(None, &corrections, 0.5),
            Err(ProofError::MissingDetections)
        ));
        assert!(matches!(
            highlight_image(Some(&[][..]), &corrections, f64::NAN),
            Err(ProofError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_highlight_image_never_uses_low_confidence() {
        let detections = vec![
            Detection::from_rect(Rect::new(0.0, 0.0, 100.0, 20.0), "they are", 0.3),
            Detection::from_rect(Rect::new(0.0, 30.0, 100.0, 50.0), "we are", 0.7),
        ];
        let corrections = vec![Correction::new("are", "is", "", "")];

        let rects = highlight_image(Some(detections.as_slice()), &corrections, 0.5).unwrap();
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].y1, 30.0);
    }

    #[test]
    fn test_idempotence() {
        for (text, _) in PAIRS {
            for k in 0..4 {
                assert!(identify_corrections(text, text, k).is_empty());
            }
        }
    }

    #[test]
    fn test_determinism() {
        for (original, corrected) in PAIRS {
            assert_eq!(
                identify_corrections(original, corrected, 3),
                identify_corrections(original, corrected, 3)
            );
        }
    }

    #[test]
    fn test_context_bounds_and_filter_soundness() {
        for (original, corrected) in PAIRS {
            for k in 0..4 {
                for c in identify_corrections(original, corrected, k) {
                    assert!(c.original_context.split_whitespace().count() <= 2 * k + 1);
                    assert!(c.corrected_context.split_whitespace().count() <= 2 * k + 1);
                    assert_ne!(c.original_word, c.corrected_word);
                    assert!(!c.original_word.trim().is_empty());
                    assert!(!c.corrected_word.trim().is_empty());
                }
            }
        }
    }

    #[test]
    fn test_untouched_text_nodes_are_byte_identical() {
        let html = "<div>\n\t<p>Nothing&nbsp;here &amp; there</p>\n\t<p>they are</p>\n</div>";
        let corrections = vec![Correction::new("are", "is", "", "")];

        let out = highlight_tree(DocumentTree::parse_html(html).unwrap(), &corrections)
            .to_html()
            .unwrap();
        assert_eq!(
            out,
            "<div>\n\t<p>Nothing&nbsp;here &amp; there</p>\n\t<p>they <u>are</u></p>\n</div>"
        );
    }

    #[test]
    fn test_end_to_end_with_rules() {
        let pipeline = Pipeline::new(
            CorrectionConfig::default(),
            Box::new(RuleBasedCorrector::new()),
        )
        .unwrap();
        let tree = DocumentTree::parse_html("<p>I recieve teh letter.</p>").unwrap();

        let processed = pipeline.process(Carrier::Document(tree)).unwrap();
        let words: Vec<_> = processed
            .report
            .corrections
            .iter()
            .map(|c| (c.original_word.as_str(), c.corrected_word.as_str()))
            .collect();

        assert_eq!(words, vec![("recieve", "receive"), ("teh", "the")]);
        assert_eq!(
            processed.output().unwrap(),
            "<p>I <u>recieve</u> <u>teh</u> letter.</p>"
        );
    }
}
