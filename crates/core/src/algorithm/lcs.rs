use crate::algorithm::{self, Aligner};
use crate::diff::AlignmentOp;
use crate::tokenizers::WordSequence;

/// Longest-common-subsequence aligner with earliest-match tie breaking.
///
/// Quadratic in time and memory; bound the input with
/// `CorrectionConfig::max_words` on latency-sensitive paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LcsAligner;

impl LcsAligner {
    pub fn new() -> Self {
        Self
    }
}

impl Aligner for LcsAligner {
    fn align(&self, original: &WordSequence, corrected: &WordSequence) -> Vec<AlignmentOp> {
        if original.is_empty() && corrected.is_empty() {
            return vec![];
        }

        let lcs = if original.is_empty() || corrected.is_empty() {
            Vec::new()
        } else {
            algorithm::longest_common_subsequence(
                &algorithm::keys(original),
                &algorithm::keys(corrected),
            )
        };

        algorithm::build_operations_from_lcs(original, corrected, &lcs)
    }

    fn name(&self) -> &str {
        "lcs"
    }
}
