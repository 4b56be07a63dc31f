//! Text tokenizers
//!
//! Provides the `Tokenizer` trait and the `WordTokenizer` used throughout the
//! crate. A tokenizer splits text into alternating word and separator tokens
//! that together cover the input exactly, so a token stream can be rebuilt
//! into the original string by concatenation.

use serde::{Deserialize, Serialize};

use crate::mapping::CharSpan;

/// Whether a token takes part in comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// A maximal run of word characters
    Word,
    /// Whitespace, punctuation, anything between words
    Separator,
}

/// Represents a single token with its position in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The literal text, casing preserved
    pub text: String,

    /// Lowercase comparison key (equal to `text` for separators)
    pub key: String,

    /// Word or separator
    pub kind: TokenKind,

    /// Byte span in the source text
    pub span: CharSpan,

    /// Token index in the full stream (words and separators)
    pub index: usize,
}

impl Token {
    /// Create a new token
    pub fn new(text: &str, kind: TokenKind, span: CharSpan, index: usize) -> Self {
        let key = match kind {
            TokenKind::Word => text.to_lowercase(),
            TokenKind::Separator => text.to_string(),
        };

        Self {
            text: text.to_string(),
            key,
            kind,
            span,
            index,
        }
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

/// How apostrophes and hyphens inside a word are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPolicy {
    /// Apostrophes and hyphens are separators: `don't` is `don` + `t`
    #[default]
    Split,
    /// An apostrophe or hyphen between two word characters stays in the
    /// word: `don't` and `co-operate` are single words
    KeepInternal,
}

/// Trait for tokenizers that split text into word and separator tokens
pub trait Tokenizer: Send + Sync {
    /// Tokenize the text into a stream covering the whole input
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Get the name of this tokenizer
    fn name(&self) -> &str;

    /// Clone this tokenizer into a Box
    fn clone_box(&self) -> Box<dyn Tokenizer>;

    /// Tokenize and keep only the words
    fn words(&self, text: &str) -> WordSequence {
        WordSequence::from_tokens(self.tokenize(text))
    }
}

// Implement Clone for Box<dyn Tokenizer>
impl Clone for Box<dyn Tokenizer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Word tokenizer (word characters vs. everything else)
#[derive(Debug, Clone, Default)]
pub struct WordTokenizer {
    /// Treatment of in-word apostrophes and hyphens
    pub join_policy: JoinPolicy,
}

impl WordTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_join_policy(mut self, policy: JoinPolicy) -> Self {
        self.join_policy = policy;
        self
    }

    fn is_joiner(&self, ch: char) -> bool {
        self.join_policy == JoinPolicy::KeepInternal && matches!(ch, '\'' | '\u{2019}' | '-')
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current_start = 0;
        let mut current_kind: Option<TokenKind> = None;
        let mut chars = text.char_indices().peekable();

        while let Some((pos, ch)) = chars.next() {
            let kind = if is_word_char(ch) {
                TokenKind::Word
            } else if self.is_joiner(ch)
                && current_kind == Some(TokenKind::Word)
                && chars.peek().is_some_and(|(_, next)| is_word_char(*next))
            {
                TokenKind::Word
            } else {
                TokenKind::Separator
            };

            match current_kind {
                None => {
                    current_start = pos;
                    current_kind = Some(kind);
                }
                Some(prev) if prev == kind => {}
                Some(prev) => {
                    let span = CharSpan::new(current_start, pos);
                    tokens.push(Token::new(&text[current_start..pos], prev, span, tokens.len()));
                    current_start = pos;
                    current_kind = Some(kind);
                }
            }
        }

        // Emit final token
        if let Some(kind) = current_kind {
            let span = CharSpan::new(current_start, text.len());
            tokens.push(Token::new(&text[current_start..], kind, span, tokens.len()));
        }

        tokens
    }

    fn name(&self) -> &str {
        "word"
    }

    fn clone_box(&self) -> Box<dyn Tokenizer> {
        Box::new(self.clone())
    }
}

/// Word characters: Unicode alphanumerics and underscore
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Ordered word tokens of one text; separators are dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSequence {
    words: Vec<Token>,
}

impl WordSequence {
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            words: tokens.into_iter().filter(Token::is_word).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Token> {
        self.words.get(position)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.words
    }

    /// Comparison key of the word at `position`
    pub fn key(&self, position: usize) -> Option<&str> {
        self.words.get(position).map(|t| t.key.as_str())
    }

    /// Up to `radius` keys either side of `position`, joined by single spaces.
    ///
    /// The window is clamped to the sequence; an out-of-range position is
    /// pulled back to the last word.
    pub fn window(&self, position: usize, radius: usize) -> String {
        if self.words.is_empty() {
            return String::new();
        }

        let position = position.min(self.words.len() - 1);
        let start = position.saturating_sub(radius);
        let end = position
            .saturating_add(radius)
            .saturating_add(1)
            .min(self.words.len());

        self.words[start..end]
            .iter()
            .map(|t| t.key.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
