//! Alignment and correction types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of alignment operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditType {
    /// Word present in both sequences
    Match,
    /// Word only in the original
    Delete,
    /// Word only in the corrected text
    Insert,
}

/// A word together with its index in the word sequence it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedWord {
    pub word: String,
    pub position: usize,
}

impl PositionedWord {
    pub fn new(word: impl Into<String>, position: usize) -> Self {
        Self {
            word: word.into(),
            position,
        }
    }
}

/// One step of an alignment; each op consumes one word from one or both sides
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentOp {
    /// Consumes one word from each side
    Match {
        original: PositionedWord,
        corrected: PositionedWord,
    },
    /// Consumes one word from the original
    DeleteFromOriginal(PositionedWord),
    /// Consumes one word from the corrected text
    InsertToCorrected(PositionedWord),
}

impl AlignmentOp {
    pub fn edit_type(&self) -> EditType {
        match self {
            AlignmentOp::Match { .. } => EditType::Match,
            AlignmentOp::DeleteFromOriginal(_) => EditType::Delete,
            AlignmentOp::InsertToCorrected(_) => EditType::Insert,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, AlignmentOp::Match { .. })
    }

    /// Get a human-readable description of this operation
    pub fn description(&self) -> String {
        match self {
            AlignmentOp::Match { original, .. } => format!("  {}", original.word),
            AlignmentOp::DeleteFromOriginal(word) => format!("- {}", word.word),
            AlignmentOp::InsertToCorrected(word) => format!("+ {}", word.word),
        }
    }
}

/// A maximal run of non-matching ops between two matches (or sequence edges)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditUnit {
    /// Words deleted from the original, in order
    pub original_words: Vec<PositionedWord>,
    /// Words inserted into the corrected text, in order
    pub corrected_words: Vec<PositionedWord>,
    /// Original cursor before the run
    pub original_start: usize,
    /// Corrected cursor before the run
    pub corrected_start: usize,
}

impl EditUnit {
    pub fn new(original_start: usize, corrected_start: usize) -> Self {
        Self {
            original_start,
            corrected_start,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.original_words.is_empty() && self.corrected_words.is_empty()
    }

    /// Original cursor after the run
    pub fn original_end(&self) -> usize {
        self.original_start + self.original_words.len()
    }

    /// Corrected cursor after the run
    pub fn corrected_end(&self) -> usize {
        self.corrected_start + self.corrected_words.len()
    }

    /// Pair words by position; the shorter side yields `None`
    pub fn pairs(&self) -> impl Iterator<Item = (Option<&PositionedWord>, Option<&PositionedWord>)> {
        let len = self.original_words.len().max(self.corrected_words.len());
        (0..len).map(move |i| (self.original_words.get(i), self.corrected_words.get(i)))
    }
}

/// A single word-level correction, the public output record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Correction {
    /// Word from the original text (empty for a pure insertion)
    pub original_word: String,
    /// Word from the corrected text (empty for a pure deletion)
    pub corrected_word: String,
    /// Surrounding words in the original
    pub original_context: String,
    /// Surrounding words in the corrected text
    pub corrected_context: String,
}

impl Correction {
    pub fn new(
        original_word: impl Into<String>,
        corrected_word: impl Into<String>,
        original_context: impl Into<String>,
        corrected_context: impl Into<String>,
    ) -> Self {
        Self {
            original_word: original_word.into(),
            corrected_word: corrected_word.into(),
            original_context: original_context.into(),
            corrected_context: corrected_context.into(),
        }
    }

    /// Pure insertion: nothing on the original side
    pub fn is_insertion(&self) -> bool {
        self.original_word.is_empty() && !self.corrected_word.is_empty()
    }

    /// Pure deletion: nothing on the corrected side
    pub fn is_deletion(&self) -> bool {
        !self.original_word.is_empty() && self.corrected_word.is_empty()
    }
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" → \"{}\" ({} | {})",
            self.original_word, self.corrected_word, self.original_context, self.corrected_context
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_unit_pairs_pad_shorter_side() {
        let mut unit = EditUnit::new(1, 1);
        unit.original_words.push(PositionedWord::new("dont", 1));
        unit.corrected_words.push(PositionedWord::new("don", 1));
        unit.corrected_words.push(PositionedWord::new("t", 2));

        let pairs: Vec<_> = unit
            .pairs()
            .map(|(o, c)| (o.map(|w| w.word.as_str()), c.map(|w| w.word.as_str())))
            .collect();

        assert_eq!(pairs, vec![(Some("dont"), Some("don")), (None, Some("t"))]);
        assert_eq!(unit.original_end(), 2);
        assert_eq!(unit.corrected_end(), 3);
    }

    #[test]
    fn test_correction_kinds() {
        assert!(Correction::new("", "the", "a", "b").is_insertion());
        assert!(Correction::new("the", "", "a", "b").is_deletion());
        let substitution = Correction::new("are", "is", "a", "b");
        assert!(!substitution.is_insertion() && !substitution.is_deletion());
    }

    #[test]
    fn test_correction_serializes_as_four_fields() {
        let correction = Correction::new("are", "is", "this are a", "this is a");
        let json = serde_json::to_value(&correction).unwrap();
        assert_eq!(json["original_word"], "are");
        assert_eq!(json["corrected_word"], "is");
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_op_description() {
        let op = AlignmentOp::DeleteFromOriginal(PositionedWord::new("are", 1));
        assert_eq!(op.edit_type(), EditType::Delete);
        assert_eq!(op.description(), "- are");
    }
}
