//! Sequence alignment
//!
//! Provides the `Aligner` trait and the longest-common-subsequence machinery
//! shared by aligner implementations. Words are compared by their lowercase
//! key, so alignment is case-insensitive.
pub mod lcs;

use crate::diff::{AlignmentOp, PositionedWord};
use crate::tokenizers::WordSequence;

pub use lcs::LcsAligner;

/// Trait for word-sequence aligners
pub trait Aligner: Send + Sync {
    /// Align two word sequences, one op per consumed word
    fn align(&self, original: &WordSequence, corrected: &WordSequence) -> Vec<AlignmentOp>;

    /// Get the name of this aligner
    fn name(&self) -> &str;
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Matched `(original, corrected)` index pairs of a longest common
/// subsequence, choosing the earliest possible match on ties.
fn longest_common_subsequence(original: &[&str], corrected: &[&str]) -> Vec<(usize, usize)> {
    let n = original.len();
    let m = corrected.len();
    let width = m + 1;

    // dp[i * width + j] = LCS length of original[i..] and corrected[j..]
    let mut dp = vec![0u32; (n + 1) * width];

    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i * width + j] = if original[i] == corrected[j] {
                dp[(i + 1) * width + j + 1] + 1
            } else {
                dp[(i + 1) * width + j].max(dp[i * width + j + 1])
            };
        }
    }

    // Walk forward so the first available match is taken
    let mut lcs = Vec::with_capacity(dp[0] as usize);
    let mut i = 0;
    let mut j = 0;

    while i < n && j < m {
        if original[i] == corrected[j] {
            lcs.push((i, j));
            i += 1;
            j += 1;
        } else if dp[(i + 1) * width + j] >= dp[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    lcs
}

/// Expand matched pairs into ops; within each gap, deletions precede
/// insertions.
fn build_operations_from_lcs(
    original: &WordSequence,
    corrected: &WordSequence,
    lcs: &[(usize, usize)],
) -> Vec<AlignmentOp> {
    let mut operations = Vec::with_capacity(original.len() + corrected.len());
    let mut orig_idx = 0;
    let mut corr_idx = 0;

    let boundaries = lcs
        .iter()
        .map(|&(o, c)| (o, c, true))
        .chain(std::iter::once((original.len(), corrected.len(), false)));

    for (orig_stop, corr_stop, matched) in boundaries {
        while orig_idx < orig_stop {
            operations.push(AlignmentOp::DeleteFromOriginal(positioned(original, orig_idx)));
            orig_idx += 1;
        }

        while corr_idx < corr_stop {
            operations.push(AlignmentOp::InsertToCorrected(positioned(corrected, corr_idx)));
            corr_idx += 1;
        }

        if matched {
            operations.push(AlignmentOp::Match {
                original: positioned(original, orig_idx),
                corrected: positioned(corrected, corr_idx),
            });
            orig_idx += 1;
            corr_idx += 1;
        }
    }

    operations
}

fn positioned(words: &WordSequence, position: usize) -> PositionedWord {
    PositionedWord::new(words.key(position).unwrap_or_default(), position)
}

fn keys(words: &WordSequence) -> Vec<&str> {
    words.tokens().iter().map(|t| t.key.as_str()).collect()
}
