//! Configuration for the correction engine and projectors

use serde::{Deserialize, Serialize};

use crate::document::is_valid_name;
use crate::error::{ProofError, Result};
use crate::tokenizers::JoinPolicy;

/// Emphasis element wrapped around highlighted words in a document tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightMarker {
    /// Element name, e.g. `u` or `mark`
    pub tag: String,
    /// Optional `class` attribute
    #[serde(default)]
    pub class: Option<String>,
}

impl Default for HighlightMarker {
    fn default() -> Self {
        Self::new("u")
    }
}

impl HighlightMarker {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Element names must be non-empty ASCII alphanumerics (and `-`),
    /// starting with a letter.
    pub fn is_valid(&self) -> bool {
        is_valid_name(&self.tag)
    }

    pub(crate) fn attributes(&self) -> Vec<(String, String)> {
        self.class
            .iter()
            .map(|class| ("class".to_string(), class.clone()))
            .collect()
    }
}

/// Configuration for correction identification and highlighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    /// Context words on each side of a correction
    pub context_words: usize,

    /// Minimum detection confidence for image highlighting
    pub confidence_threshold: f64,

    /// Marker used by the tree projector
    pub marker: HighlightMarker,

    /// Elements whose text is never highlighted
    pub skip_tags: Vec<String>,

    /// Tokenizer treatment of in-word apostrophes and hyphens
    pub join_policy: JoinPolicy,

    /// Upper bound on words per side before alignment is refused
    pub max_words: Option<usize>,

    /// Keep pure insertions and deletions in the final list
    pub show_insertions_deletions: bool,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrectionConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self {
            context_words: 3,
            confidence_threshold: 0.5,
            marker: HighlightMarker::default(),
            skip_tags: vec!["script".to_string(), "style".to_string()],
            join_policy: JoinPolicy::default(),
            max_words: None,
            show_insertions_deletions: false,
        }
    }

    /// Set the number of context words
    pub fn with_context_words(mut self, words: usize) -> Self {
        self.context_words = words;
        self
    }

    /// Set the detection confidence threshold
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the highlight marker
    pub fn with_marker(mut self, marker: HighlightMarker) -> Self {
        self.marker = marker;
        self
    }

    /// Replace the skipped element names
    pub fn with_skip_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the tokenizer join policy
    pub fn with_join_policy(mut self, policy: JoinPolicy) -> Self {
        self.join_policy = policy;
        self
    }

    /// Bound the number of words aligned per side
    pub fn with_max_words(mut self, limit: usize) -> Self {
        self.max_words = Some(limit);
        self
    }

    /// Keep or drop pure insertions and deletions
    pub fn with_insertions_deletions(mut self, show: bool) -> Self {
        self.show_insertions_deletions = show;
        self
    }

    /// Parse a configuration from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that the type system cannot
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.confidence_threshold)?;

        if !self.marker.is_valid() {
            return Err(ProofError::InvalidInput(format!(
                "invalid marker tag {:?}",
                self.marker.tag
            )));
        }

        Ok(())
    }

    /// Whether text under `tag` is skipped (case-insensitive)
    pub fn is_skipped_tag(&self, tag: &str) -> bool {
        self.skip_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ProofError::InvalidInput(format!(
            "confidence threshold must be within [0, 1], got {}",
            threshold
        )))
    }
}
