//! # sqlscan: lossless SQL tokenizer
//!
//! A single-pass, hand-rolled finite-state lexer for SQL source text. It
//! exists so that code building SQL strings can classify every fragment
//! before deciding how to escape or interpolate it: a misclassified or
//! mis-delimited token is a security defect, not a cosmetic one.
//!
//! ## Guarantees
//!
//! - **Lossless**: whitespace and comments are tokens too; concatenating the
//!   text of every produced token reproduces the input exactly.
//! - **Deterministic**: one token of bounded lookahead, at most two
//!   characters of pushback, no state across tokens except the cursor.
//!   Re-tokenizing any suffix that starts at a token boundary yields the
//!   same tokens.
//! - **Classified, not parsed**: tokens record how their text was quoted
//!   (plain, escaped, unicode, dollar-quoted, bit, hex, …), never what it
//!   means to a SQL grammar. Keyword resolution is a later, table-driven
//!   concern.
//! - **Precise failures**: the first lexical error aborts the run with the
//!   0-based character offset and the original input, so callers can point
//!   a caret at the exact spot.
//!
//! ## Dialect
//!
//! The recognized surface follows PostgreSQL's lexical grammar: `""` and
//! `''` delimiter doubling, `U&`/`E` prefixes, `B'…'`/`X'…'` bit and hex
//! strings, `$tag$ … $tag$` dollar quoting, `$n` positional parameters,
//! `::` casts, nested `/* … */` comments, and multi-glyph operators with
//! the trailing `+`/`-` restriction.
//!
//! ## Example
//!
//! ```
//! use sqlscan::{Tokenizer, TokenType};
//!
//! let tokens = Tokenizer::tokenize("SELECT 'it''s' FROM t").unwrap();
//! assert_eq!(tokens[2].kind(), TokenType::String);
//! assert_eq!(tokens[2].text(), "'it''s'");
//!
//! let rebuilt: String = tokens.iter().map(|t| t.text()).collect();
//! assert_eq!(rebuilt, "SELECT 'it''s' FROM t");
//! ```

pub mod lexical;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use lexical::{Construct, LexerError, LexerErrorKind, Tokenizer};
pub use tokens::{Modifier, Token, TokenClass, TokenStream, TokenType};
pub use utils::Span;
