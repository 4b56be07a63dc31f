//! Document tree projection
//!
//! Text nodes are re-tokenized and every word whose key is a corrected
//! original word is wrapped in the configured marker element. Only text
//! nodes that gain a highlight are replaced; everything else in the tree is
//! left as parsed.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::CorrectionConfig;
use crate::diff::Correction;
use crate::document::{DocumentTree, FragmentNode};
use crate::highlight::corrected_original_words;
use crate::tokenizers::Tokenizer;

/// What a tree projection changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeHighlightOutcome {
    /// Word occurrences wrapped in the marker
    pub highlighted_words: usize,
    /// Text nodes replaced by a highlighted fragment
    pub modified_nodes: usize,
    /// Text nodes left alone because of their parent element
    pub skipped_nodes: usize,
}

/// Wrap corrected original words of every eligible text node in the
/// configured marker.
///
/// Text directly under a skipped element (`script`, `style` by default) is
/// never touched. A node whose replacement fragment is rejected is logged
/// and left as it was.
pub fn project_onto_tree(
    tree: &mut DocumentTree,
    corrections: &[Correction],
    config: &CorrectionConfig,
    tokenizer: &dyn Tokenizer,
) -> TreeHighlightOutcome {
    let mut outcome = TreeHighlightOutcome::default();

    let targets = corrected_original_words(corrections);
    if targets.is_empty() {
        return outcome;
    }

    for id in tree.text_nodes() {
        if tree
            .parent_tag(id)
            .map_or(false, |tag| config.is_skipped_tag(tag))
        {
            outcome.skipped_nodes += 1;
            continue;
        }

        let Some(text) = tree.text(id) else {
            continue;
        };

        let mut fragment = Vec::new();
        let mut spans = Vec::new();
        let mut highlighted = 0;
        let mut cursor = 0;

        for token in tokenizer.tokenize(text) {
            if !token.is_word() || !targets.contains(&token.key) {
                continue;
            }
            if token.span.start > cursor {
                fragment.push(FragmentNode::text(&text[cursor..token.span.start]));
                spans.push(cursor..token.span.start);
            }
            fragment.push(FragmentNode::wrap(
                config.marker.tag.as_str(),
                config.marker.attributes(),
                token.text.as_str(),
            ));
            spans.push(token.span.start..token.span.end);
            cursor = token.span.end;
            highlighted += 1;
        }

        if highlighted == 0 {
            continue;
        }
        if cursor < text.len() {
            fragment.push(FragmentNode::text(&text[cursor..]));
            spans.push(cursor..text.len());
        }

        // entity spellings of the pieces, so rewritten text reads as written
        let sources: Vec<Option<String>> = spans
            .into_iter()
            .map(|span| tree.text_source(id, span).map(str::to_string))
            .collect();

        match tree.replace_text_with_fragment(id, &fragment) {
            Ok(new_ids) => {
                for (new_id, source) in new_ids.into_iter().zip(sources) {
                    let Some(source) = source else {
                        continue;
                    };
                    // a marker's text is its only child
                    let text_id = match tree.text(new_id) {
                        Some(_) => new_id,
                        None => match tree.children(new_id).first() {
                            Some(&child) => child,
                            None => continue,
                        },
                    };
                    tree.set_text_source(text_id, &source);
                }
                outcome.modified_nodes += 1;
                outcome.highlighted_words += highlighted;
            }
            Err(err) => warn!(node = id.index(), %err, "leaving text node unhighlighted"),
        }
    }

    debug!(
        highlighted = outcome.highlighted_words,
        modified = outcome.modified_nodes,
        skipped = outcome.skipped_nodes,
        "projected corrections onto document tree"
    );
    outcome
}
