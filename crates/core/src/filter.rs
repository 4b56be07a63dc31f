//! Display filtering of corrections
//!
//! Only substitution-style edits are shown by default. Pure insertions and
//! deletions survive grouping but are removed here unless the filter is
//! explicitly relaxed, in which case they bypass the context comparison.

use tracing::info;

use crate::diff::Correction;

/// Rules deciding which corrections are worth displaying
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrectionFilter {
    /// Keep pure insertions and deletions
    pub show_insertions_deletions: bool,
}

impl CorrectionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_insertions_deletions(mut self, show: bool) -> Self {
        self.show_insertions_deletions = show;
        self
    }

    /// Whether a single correction passes the display rules
    pub fn keep(&self, correction: &Correction) -> bool {
        let original = correction.original_word.trim();
        let corrected = correction.corrected_word.trim();

        if original == corrected {
            return false;
        }
        if original.is_empty() && corrected.is_empty() {
            return false;
        }
        // A pure insertion or deletion shares one window on both sides, so
        // the context rule below would always reject it.
        if original.is_empty() || corrected.is_empty() {
            return self.show_insertions_deletions;
        }

        correction.original_context.trim() != correction.corrected_context.trim()
    }

    /// Filter a list, preserving order
    pub fn apply(&self, corrections: Vec<Correction>) -> Vec<Correction> {
        let before = corrections.len();
        let kept: Vec<Correction> = corrections.into_iter().filter(|c| self.keep(c)).collect();
        info!("Filtered corrections: {} -> {} meaningful corrections", before, kept.len());
        kept
    }
}

/// Filter with the default display rules
pub fn filter(corrections: Vec<Correction>) -> Vec<Correction> {
    CorrectionFilter::new().apply(corrections)
}
