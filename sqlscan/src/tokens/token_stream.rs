//! Collected token stream with significant-token navigation.
//!
//! Consumers that assemble SQL read tokens semantically but still need to
//! reproduce the original text, comments included. [`TokenStream`] keeps
//! every token and navigates over the significant ones, so whitespace and
//! comments stay transparent without being lost.

use crate::lexical::{LexerError, Tokenizer};
use crate::tokens::Token;

/// A fully tokenized input with position-based navigation.
///
/// Navigation (`current`, `peek`, `advance`, …) moves over significant
/// tokens only; the complete lossless sequence stays available through
/// [`all_tokens`](Self::all_tokens) and [`source`](Self::source).
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    /// Every token, whitespace and comments included, in input order.
    all_tokens: Vec<Token<'a>>,
    /// Indices into `all_tokens` of the significant tokens.
    significant: Vec<usize>,
    /// Current position in `significant`.
    position: usize,
}

impl<'a> TokenStream<'a> {
    /// Tokenize `input` eagerly into a stream.
    pub fn tokenize(input: &'a str) -> Result<Self, LexerError> {
        Ok(Self::new(Tokenizer::tokenize(input)?))
    }

    /// Build a stream from already-produced tokens.
    pub fn new(all_tokens: Vec<Token<'a>>) -> Self {
        let significant = all_tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.is_significant())
            .map(|(index, _)| index)
            .collect();
        Self {
            all_tokens,
            significant,
            position: 0,
        }
    }

    /// The current significant token, if any.
    pub fn current(&self) -> Option<&Token<'a>> {
        self.significant
            .get(self.position)
            .and_then(|&index| self.all_tokens.get(index))
    }

    /// Peek at the next significant token without advancing.
    pub fn peek(&self) -> Option<&Token<'a>> {
        self.peek_ahead(1)
    }

    /// Peek `n` significant tokens ahead of the current one.
    pub fn peek_ahead(&self, n: usize) -> Option<&Token<'a>> {
        self.significant
            .get(self.position + n)
            .and_then(|&index| self.all_tokens.get(index))
    }

    /// Advance to the next significant token and return it.
    pub fn advance(&mut self) -> Option<&Token<'a>> {
        if self.position < self.significant.len() {
            self.position += 1;
        }
        self.current()
    }

    /// Whether navigation has passed the last significant token.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.significant.len()
    }

    /// Number of significant tokens.
    pub fn len(&self) -> usize {
        self.significant.len()
    }

    /// Whether the stream has no significant tokens.
    pub fn is_empty(&self) -> bool {
        self.significant.is_empty()
    }

    /// Save the current navigation position.
    pub fn save_position(&self) -> usize {
        self.position
    }

    /// Restore a previously saved navigation position.
    pub fn restore_position(&mut self, saved: usize) {
        self.position = saved.min(self.significant.len());
    }

    /// Every token in input order, whitespace and comments included.
    pub fn all_tokens(&self) -> &[Token<'a>] {
        &self.all_tokens
    }

    /// Iterate over the significant tokens.
    pub fn iter_significant(&self) -> impl Iterator<Item = &Token<'a>> {
        self.significant.iter().map(|&index| &self.all_tokens[index])
    }

    /// Reassemble the exact source text from the token sequence.
    pub fn source(&self) -> String {
        self.all_tokens.iter().map(|token| token.text()).collect()
    }
}
