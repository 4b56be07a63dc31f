//! Correction engine that orchestrates tokenize → align → group → filter

use tracing::{debug, info};

use crate::algorithm::{Aligner, LcsAligner};
use crate::config::CorrectionConfig;
use crate::diff::Correction;
use crate::error::{ProofError, Result};
use crate::filter::CorrectionFilter;
use crate::grouping;
use crate::tokenizers::{Tokenizer, WordSequence, WordTokenizer};

/// The main correction engine
pub struct CorrectionEngine {
    config: CorrectionConfig,
    tokenizer: Box<dyn Tokenizer>,
    aligner: Box<dyn Aligner>,
}

impl CorrectionEngine {
    /// Create a new engine with the given configuration
    pub fn new(config: CorrectionConfig) -> Self {
        let tokenizer = WordTokenizer::new().with_join_policy(config.join_policy);
        Self {
            config,
            tokenizer: Box::new(tokenizer),
            aligner: Box::new(LcsAligner::new()),
        }
    }

    /// Replace the tokenizer
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Replace the aligner
    pub fn with_aligner(mut self, aligner: Box<dyn Aligner>) -> Self {
        self.aligner = aligner;
        self
    }

    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    /// Identify word-level corrections between two texts
    ///
    /// 1. Return early when the trimmed texts are identical
    /// 2. Tokenize both texts into word sequences
    /// 3. Align the sequences
    /// 4. Group unmatched runs and attach context windows
    /// 5. Apply the display filter
    pub fn identify(&self, original: &str, corrected: &str) -> Result<Vec<Correction>> {
        if original.trim() == corrected.trim() {
            info!("No corrections needed - texts are identical");
            return Ok(Vec::new());
        }

        let original_words = self.tokenizer.words(original);
        let corrected_words = self.tokenizer.words(corrected);
        self.check_bounds(&original_words)?;
        self.check_bounds(&corrected_words)?;

        let ops = self.aligner.align(&original_words, &corrected_words);
        debug!(
            tokenizer = self.tokenizer.name(),
            aligner = self.aligner.name(),
            original = original_words.len(),
            corrected = corrected_words.len(),
            ops = ops.len(),
            "aligned word sequences"
        );

        let grouped = grouping::group_and_window(
            &ops,
            &original_words,
            &corrected_words,
            self.config.context_words,
        );

        let filter =
            CorrectionFilter::new().with_insertions_deletions(self.config.show_insertions_deletions);
        Ok(filter.apply(grouped))
    }

    fn check_bounds(&self, words: &WordSequence) -> Result<()> {
        match self.config.max_words {
            Some(limit) if words.len() > limit => Err(ProofError::InputTooLarge {
                words: words.len(),
                limit,
            }),
            _ => Ok(()),
        }
    }
}

impl Default for CorrectionEngine {
    fn default() -> Self {
        Self::new(CorrectionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizers::JoinPolicy;

    #[test]
    fn test_basic_identify() {
        let engine = CorrectionEngine::new(CorrectionConfig::new().with_context_words(2));
        let result = engine.identify("This are a test.", "This is a test.").unwrap();

        assert_eq!(
            result,
            vec![Correction::new("are", "is", "this are a test", "this is a test")]
        );
    }

    #[test]
    fn test_identical_text() {
        let engine = CorrectionEngine::default();
        assert!(engine.identify("Same text here.", "  Same text here.\n").unwrap().is_empty());
    }

    #[test]
    fn test_case_only_change_is_not_a_correction() {
        let engine = CorrectionEngine::default();
        assert!(engine.identify("hello world", "Hello World").unwrap().is_empty());
    }

    #[test]
    fn test_punctuation_only_change() {
        let engine = CorrectionEngine::default();
        assert!(engine.identify("Hello world", "Hello, world!").unwrap().is_empty());
    }

    #[test]
    fn test_split_policy_contraction() {
        let engine = CorrectionEngine::new(CorrectionConfig::new().with_context_words(1));
        let result = engine.identify("I dont know.", "I don't know.").unwrap();

        assert_eq!(result, vec![Correction::new("dont", "don", "i dont know", "i don t")]);
    }

    #[test]
    fn test_keep_internal_contraction() {
        let config = CorrectionConfig::new()
            .with_context_words(1)
            .with_join_policy(JoinPolicy::KeepInternal);
        let result = CorrectionEngine::new(config)
            .identify("I dont know.", "I don't know.")
            .unwrap();

        assert_eq!(
            result,
            vec![Correction::new("dont", "don't", "i dont know", "i don't know")]
        );
    }

    #[test]
    fn test_insertions_shown_when_relaxed() {
        let config = CorrectionConfig::new()
            .with_context_words(1)
            .with_insertions_deletions(true);
        let result = CorrectionEngine::new(config)
            .identify("Go to store now.", "Go to the store now.")
            .unwrap();

        assert_eq!(result, vec![Correction::new("", "the", "to the store", "to the store")]);

        let strict = CorrectionEngine::new(CorrectionConfig::new().with_context_words(1));
        assert!(strict.identify("Go to store now.", "Go to the store now.").unwrap().is_empty());
    }

    #[test]
    fn test_max_words_bound() {
        let engine = CorrectionEngine::new(CorrectionConfig::new().with_max_words(3));
        let err = engine.identify("one two three four", "one two").unwrap_err();
        assert!(matches!(err, ProofError::InputTooLarge { words: 4, limit: 3 }));

        // identical inputs take the fast path before the bound is checked
        assert!(engine.identify("one two three four", "one two three four").is_ok());
    }

    #[test]
    fn test_deterministic() {
        let engine = CorrectionEngine::default();
        let a = engine
            .identify("Their going too the park tomorow.", "They're going to the park tomorrow.")
            .unwrap();
        let b = engine
            .identify("Their going too the park tomorow.", "They're going to the park tomorrow.")
            .unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }
}
