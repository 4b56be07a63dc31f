//! Edit grouping and context windows
//!
//! Collapses runs of unmatched ops into `EditUnit`s and turns each unit into
//! word-level `Correction`s with surrounding context. Every buffered word
//! carries the position it had when it was enqueued, so each word of a
//! multi-word run gets its own window.

use tracing::debug;

use crate::diff::{AlignmentOp, Correction, EditUnit, PositionedWord};
use crate::tokenizers::WordSequence;

/// Partition an alignment into edit units; matches are the boundaries.
pub fn group(ops: &[AlignmentOp]) -> Vec<EditUnit> {
    let mut units = Vec::new();
    let mut original_cursor = 0;
    let mut corrected_cursor = 0;
    let mut current = EditUnit::new(0, 0);

    for op in ops {
        match op {
            AlignmentOp::Match { .. } => {
                if !current.is_empty() {
                    units.push(current);
                }
                original_cursor += 1;
                corrected_cursor += 1;
                current = EditUnit::new(original_cursor, corrected_cursor);
            }
            AlignmentOp::DeleteFromOriginal(word) => {
                current.original_words.push(word.clone());
                original_cursor += 1;
            }
            AlignmentOp::InsertToCorrected(word) => {
                current.corrected_words.push(word.clone());
                corrected_cursor += 1;
            }
        }
    }

    if !current.is_empty() {
        units.push(current);
    }

    units
}

/// Group an alignment and attach context windows of `context_size` words.
///
/// Pairs whose two sides are equal are dropped here; all other display
/// policy lives in [`crate::filter`].
pub fn group_and_window(
    ops: &[AlignmentOp],
    original_words: &WordSequence,
    corrected_words: &WordSequence,
    context_size: usize,
) -> Vec<Correction> {
    let units = group(ops);
    debug!(units = units.len(), "grouped alignment into edit units");

    units
        .iter()
        .flat_map(|unit| unit.pairs())
        .filter_map(|(orig, corr)| {
            pair_to_correction(orig, corr, original_words, corrected_words, context_size)
        })
        .collect()
}

fn pair_to_correction(
    orig: Option<&PositionedWord>,
    corr: Option<&PositionedWord>,
    original_words: &WordSequence,
    corrected_words: &WordSequence,
    context_size: usize,
) -> Option<Correction> {
    let (original_context, corrected_context) = match (orig, corr) {
        (Some(o), Some(c)) => {
            if o.word == c.word {
                return None;
            }
            (
                original_words.window(o.position, context_size),
                corrected_words.window(c.position, context_size),
            )
        }
        // Pure insertion: the original side has no anchor, use the corrected one
        (None, Some(c)) => {
            let window = corrected_words.window(c.position, context_size);
            (window.clone(), window)
        }
        // Pure deletion: symmetric
        (Some(o), None) => {
            let window = original_words.window(o.position, context_size);
            (window.clone(), window)
        }
        (None, None) => return None,
    };

    Some(Correction {
        original_word: orig.map(|w| w.word.clone()).unwrap_or_default(),
        corrected_word: corr.map(|w| w.word.clone()).unwrap_or_default(),
        original_context,
        corrected_context,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{Aligner, LcsAligner};
    use crate::tokenizers::{Tokenizer, WordTokenizer};

    fn corrections(original: &str, corrected: &str, context: usize) -> Vec<Correction> {
        let tokenizer = WordTokenizer::new();
        let orig = tokenizer.words(original);
        let corr = tokenizer.words(corrected);
        let ops = LcsAligner::new().align(&orig, &corr);
        group_and_window(&ops, &orig, &corr, context)
    }

    #[test]
    fn test_single_substitution() {
        let result = corrections("This are a test.", "This is a test.", 2);
        assert_eq!(
            result,
            vec![Correction::new("are", "is", "this are a test", "this is a test")]
        );
    }

    #[test]
    fn test_group_partitions_on_matches() {
        let tokenizer = WordTokenizer::new();
        let orig = tokenizer.words("a b c d e");
        let corr = tokenizer.words("x b y z d");
        let ops = LcsAligner::new().align(&orig, &corr);
        let units = group(&ops);

        assert_eq!(units.len(), 3);
        assert_eq!(units[0].original_start, 0);
        assert_eq!(units[1].original_start, 2);
        assert_eq!(units[1].corrected_start, 2);
        assert_eq!(units[1].original_words.len(), 1);
        assert_eq!(units[1].corrected_words.len(), 2);
        assert_eq!(units[2].original_start, 4);
        assert_eq!(units[2].corrected_start, 5);
        assert_eq!(units[2].corrected_words.len(), 0);
    }

    #[test]
    fn test_multi_word_run_gets_own_windows() {
        // "b c" -> "x y": each pair anchors on its own position
        let result = corrections("a b c d e f", "a x y d e f", 1);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0], Correction::new("b", "x", "a b c", "a x y"));
        assert_eq!(result[1], Correction::new("c", "y", "b c d", "x y d"));
    }

    #[test]
    fn test_pure_insertion_uses_corrected_context() {
        let result = corrections("go to store", "go to the store", 1);
        assert_eq!(result, vec![Correction::new("", "the", "to the store", "to the store")]);
    }

    #[test]
    fn test_pure_deletion_uses_original_context() {
        let result = corrections("it is is fine", "it is fine", 1);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].original_word, "is");
        assert_eq!(result[0].corrected_word, "");
        assert_eq!(result[0].original_context, result[0].corrected_context);
    }

    #[test]
    fn test_uneven_run_pads_with_empty() {
        let result = corrections("I dont know.", "I don't know.", 1);
        assert_eq!(
            result,
            vec![
                Correction::new("dont", "don", "i dont know", "i don t"),
                Correction::new("", "t", "don t know", "don t know"),
            ]
        );
    }

    #[test]
    fn test_trailing_run_is_drained() {
        let result = corrections("we was", "we were", 3);
        assert_eq!(result, vec![Correction::new("was", "were", "we was", "we were")]);
    }

    #[test]
    fn test_context_bounds() {
        let k = 2;
        let result = corrections(
            "one two three four five six seven",
            "one too three for five sex seven eight",
            k,
        );
        assert!(!result.is_empty());
        for correction in &result {
            assert!(correction.original_context.split(' ').count() <= 2 * k + 1);
            assert!(correction.corrected_context.split(' ').count() <= 2 * k + 1);
        }
    }

    #[test]
    fn test_zero_context() {
        let result = corrections("This are a test.", "This is a test.", 0);
        assert_eq!(result, vec![Correction::new("are", "is", "are", "is")]);
    }
}
