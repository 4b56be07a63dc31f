//! Rule-based correction model
//!
//! A small table of whole-word, case-insensitive substitutions covering
//! frequent misspellings, contractions typed without an apostrophe and
//! letter confusions typical of text recognition. Useful when no model
//! backend is available, and as a deterministic model in tests.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use tracing::{debug, info};

use crate::error::{ProofError, Result};
use crate::pipeline::CorrectionModel;

const DEFAULT_RULES: &[(&str, &str)] = &[
    // Common misspellings
    ("grammer", "grammar"),
    ("teh", "the"),
    ("adn", "and"),
    ("thier", "their"),
    ("recieve", "receive"),
    ("occured", "occurred"),
    ("seperate", "separate"),
    ("definately", "definitely"),
    // Contractions
    ("dont", "don't"),
    ("wont", "won't"),
    ("cant", "can't"),
    ("doesnt", "doesn't"),
    ("didnt", "didn't"),
    ("havent", "haven't"),
    ("hasnt", "hasn't"),
    ("hadnt", "hadn't"),
    ("isnt", "isn't"),
    ("wasnt", "wasn't"),
    ("werent", "weren't"),
    ("wouldnt", "wouldn't"),
    ("couldnt", "couldn't"),
    ("shouldnt", "shouldn't"),
    // Recognition letter confusions
    ("0", "O"),
    ("rn", "m"),
    ("vv", "w"),
];

static DEFAULT_PATTERNS: LazyLock<Vec<(Regex, String)>> = LazyLock::new(|| {
    DEFAULT_RULES
        .iter()
        .filter_map(|(word, replacement)| {
            word_pattern(word)
                .ok()
                .map(|pattern| (pattern, replacement.to_string()))
        })
        .collect()
});

fn word_pattern(word: &str) -> Result<Regex> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word)))
        .map_err(|err| ProofError::InvalidInput(format!("invalid rule for {:?}: {}", word, err)))
}

/// Whole-word substitution corrector
#[derive(Debug, Clone)]
pub struct RuleBasedCorrector {
    rules: Vec<(Regex, String)>,
}

impl Default for RuleBasedCorrector {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedCorrector {
    /// Corrector with the built-in rule table
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_PATTERNS.clone(),
        }
    }

    /// Corrector with no rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule replacing every whole-word, case-insensitive occurrence
    /// of `word`
    pub fn with_rule(mut self, word: &str, replacement: impl Into<String>) -> Result<Self> {
        self.rules.push((word_pattern(word)?, replacement.into()));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order
    pub fn apply(&self, text: &str) -> String {
        let mut corrected = text.to_string();
        let mut applied = 0;

        for (pattern, replacement) in &self.rules {
            let replaced = pattern.replace_all(&corrected, NoExpand(replacement));
            if replaced != corrected {
                debug!(rule = pattern.as_str(), "rule applied");
                applied += 1;
                corrected = replaced.into_owned();
            }
        }

        if applied > 0 {
            info!("Rule-based correction applied {} fixes", applied);
        }
        corrected
    }
}

impl CorrectionModel for RuleBasedCorrector {
    fn correct(&self, text: &str) -> Result<String> {
        Ok(self.apply(text))
    }

    fn name(&self) -> &str {
        "rule_based"
    }
}
