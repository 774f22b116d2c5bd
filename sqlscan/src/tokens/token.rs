//! Token model with a fixed type-to-class mapping.
//!
//! The tokenizer classifies *how* a span of source was quoted, never what it
//! means: keyword resolution is a table-driven concern for a later pass, so
//! every bare word comes out as [`TokenType::Identifier`] and the
//! [`TokenType::Keyword`] slot is reserved for that pass.

use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse grouping of token types, used by consumers to pick an escaping or
/// filtering discipline without matching on every type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenClass {
    /// Reserved words, assigned by a downstream keyword-resolution pass.
    Keyword,
    /// Bare words; candidates for keyword resolution.
    Identifier,
    /// Delimited identifiers (`"..."`, `U&"..."`).
    QuotedIdentifier,
    /// String, bit, hex, dollar-quoted, and numeric literals.
    Literal,
    /// Operators, punctuation, and positional parameters.
    Symbol,
    /// Whitespace and both comment forms; semantically transparent.
    Whitespace,
}

/// The lexical type of one token.
///
/// The variant records how the source text was quoted or delimited, not what
/// the token means to any SQL grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// Never produced by the tokenizer; reserved for keyword resolution.
    Keyword,
    Identifier,
    /// `"name"` with `""` doubling.
    QuotedIdentifier,
    /// `U&"name"`.
    UnicodeQuotedIdentifier,
    /// `'text'` with `''` doubling.
    String,
    /// `E'text'`.
    EscapedString,
    /// `U&'text'`.
    UnicodeString,
    /// `$tag$text$tag$`, tag possibly empty.
    DollarQuotedString,
    /// `B'0101'`.
    BitString,
    /// `X'1f'`.
    HexString,
    Numeric,
    Operator,
    Whitespace,
    /// `-- ...` up to but excluding the newline.
    LineComment,
    /// `/* ... */`, nesting allowed.
    BlockComment,
    /// `$n`.
    PositionalParameter,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,
    Dot,
}

impl TokenType {
    /// The class this type belongs to. Fixed and total.
    pub fn class(self) -> TokenClass {
        match self {
            TokenType::Keyword => TokenClass::Keyword,
            TokenType::Identifier => TokenClass::Identifier,
            TokenType::QuotedIdentifier | TokenType::UnicodeQuotedIdentifier => {
                TokenClass::QuotedIdentifier
            }
            TokenType::String
            | TokenType::EscapedString
            | TokenType::UnicodeString
            | TokenType::DollarQuotedString
            | TokenType::BitString
            | TokenType::HexString
            | TokenType::Numeric => TokenClass::Literal,
            TokenType::Operator
            | TokenType::PositionalParameter
            | TokenType::LeftParen
            | TokenType::RightParen
            | TokenType::LeftBracket
            | TokenType::RightBracket
            | TokenType::Semicolon
            | TokenType::Comma
            | TokenType::Dot => TokenClass::Symbol,
            TokenType::Whitespace | TokenType::LineComment | TokenType::BlockComment => {
                TokenClass::Whitespace
            }
        }
    }
}

/// Which lexical prefix altered the interpretation of a quoted form.
///
/// Resolved against the provisional token type when the token completes.
/// `Hex` is declared for the hex-prefixed family, which currently classifies
/// directly and never attaches a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    None,
    Unicode,
    Escaped,
    Hex,
}

impl Modifier {
    /// Apply this modifier to the provisional type of a completed token.
    ///
    /// A modifier is only compatible with the types shown here; any other
    /// pairing is an internal consistency violation, not a lexical error the
    /// input can trigger.
    pub(crate) fn resolve(self, provisional: TokenType) -> TokenType {
        match (self, provisional) {
            (Modifier::None, ty) => ty,
            (Modifier::Escaped, TokenType::String) => TokenType::EscapedString,
            (Modifier::Unicode, TokenType::String) => TokenType::UnicodeString,
            (Modifier::Unicode, TokenType::QuotedIdentifier) => {
                TokenType::UnicodeQuotedIdentifier
            }
            (modifier, ty) => unreachable!("modifier {modifier:?} is incompatible with {ty:?}"),
        }
    }
}

/// One classified, contiguous span of source text.
///
/// The text is borrowed from the input and includes every delimiter, quote,
/// and prefix character, so concatenating consecutive tokens reproduces the
/// input exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token<'a> {
    kind: TokenType,
    #[serde(borrow)]
    text: &'a str,
    span: Span,
}

impl<'a> Token<'a> {
    pub(crate) fn new(kind: TokenType, text: &'a str, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// The lexical type of this token.
    pub fn kind(&self) -> TokenType {
        self.kind
    }

    /// The class of this token's type.
    pub fn class(&self) -> TokenClass {
        self.kind.class()
    }

    /// The exact source text, delimiters included.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Byte range of this token in the input.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Whether this token carries meaning (everything except whitespace and
    /// comments).
    pub fn is_significant(&self) -> bool {
        self.class() != TokenClass::Whitespace
    }

    /// Whether this token is a comment.
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenType::LineComment | TokenType::BlockComment)
    }

    /// Whether this token is a literal of any quoting dialect.
    pub fn is_literal(&self) -> bool {
        self.class() == TokenClass::Literal
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}
