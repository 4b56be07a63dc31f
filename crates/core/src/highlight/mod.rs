//! Projection of corrections back onto their carrier
//!
//! Two back-ends share the filtered correction list:
//!
//! - [`raster`] maps corrected words onto approximate pixel rectangles using
//!   the recognizer's block-level detections
//! - [`tree`] wraps corrected words of a document tree in an emphasis marker
//!
//! Both match words the same way the engine tokenizes them, so a word that
//! was flagged during identification is the word that gets highlighted.

pub mod raster;
pub mod tree;

use std::collections::BTreeSet;

use crate::diff::Correction;

pub use raster::{project_onto_image, RasterHighlight};
pub use tree::{project_onto_tree, TreeHighlightOutcome};

/// Lowercase original words of every correction that changed something
pub fn corrected_original_words(corrections: &[Correction]) -> BTreeSet<String> {
    corrections
        .iter()
        .filter(|c| c.original_word != c.corrected_word)
        .map(|c| c.original_word.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}
