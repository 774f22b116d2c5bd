//! Token model and collected-stream navigation.
//!
//! The tokenizer reports *how* each span of source was quoted, not what it
//! means: every token carries a [`TokenType`] (the quoting dialect), the
//! exact source text, and its byte span. Types group into coarse
//! [`TokenClass`]es so consumers can pick an escaping or filtering
//! discipline per class: names get re-quoted, literal payloads get their
//! own escaping, whitespace and comments are reproducible but semantically
//! transparent.
//!
//! [`TokenStream`] layers position-based navigation over a fully tokenized
//! input for consumers that need lookahead without losing the insignificant
//! tokens.

pub mod token;
pub mod token_stream;

pub use token::{Modifier, Token, TokenClass, TokenType};
pub use token_stream::TokenStream;
