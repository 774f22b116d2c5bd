//! Lexical analysis errors.
//!
//! Every error carries the 0-based character offset where scanning failed and
//! the full original input, so callers can render caret-style context. The
//! tokenizer itself never formats more than the message and offset.

use std::fmt;
use thiserror::Error;

/// The construct that was still open when the input (or its body) went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    QuotedIdentifier,
    String,
    DollarQuotedString,
    BitString,
    HexString,
    BlockComment,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Construct::QuotedIdentifier => "quoted identifier",
            Construct::String => "string",
            Construct::DollarQuotedString => "dollar-quoted string",
            Construct::BitString => "bit string",
            Construct::HexString => "hex string",
            Construct::BlockComment => "block comment",
        };
        f.write_str(name)
    }
}

/// The closed set of ways tokenization can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexerErrorKind {
    /// A character with no SQL lexical meaning where a token must start.
    #[error("unknown character `{character}`")]
    UnknownCharacter { character: char },

    /// End of input inside a delimited construct.
    #[error("unterminated {construct}")]
    UnterminatedConstruct { construct: Construct },

    /// A numeric literal whose fractional or exponent part is missing
    /// required digits.
    #[error("malformed numeric literal")]
    MalformedNumeric,

    /// An operator run ending on `+` or `-` without one of the extended
    /// glyphs earlier in the run.
    #[error("operator cannot end with `+` or `-` unless it also contains one of `~ ! @ # % ^ & | ` ?`")]
    MalformedOperator,

    /// A bit-string body character other than `0`/`1`, or a non-hex digit in
    /// a hex-string body.
    #[error("invalid character `{character}` in {construct} literal")]
    InvalidBitOrHexDigit { character: char, construct: Construct },

    /// `$` followed by something that starts neither a positional parameter,
    /// a tag, nor an immediate dollar quote.
    #[error("syntax error at or near `$`")]
    InvalidDollarSyntax,
}

/// A fatal lexical error: what went wrong, where, and in which input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {position}")]
pub struct LexerError {
    kind: LexerErrorKind,
    position: usize,
    input: String,
}

impl LexerError {
    pub(crate) fn new(kind: LexerErrorKind, position: usize, input: &str) -> Self {
        Self {
            kind,
            position,
            input: input.to_string(),
        }
    }

    /// What went wrong.
    pub fn kind(&self) -> &LexerErrorKind {
        &self.kind
    }

    /// 0-based character offset of the failure in the original input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The full input the tokenizer was scanning.
    pub fn input(&self) -> &str {
        &self.input
    }
}
