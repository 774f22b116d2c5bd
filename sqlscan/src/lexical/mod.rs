//! Lexical analysis: the character classifier, the state machine, and the
//! errors it can raise.
//!
//! Scanning is a single forward pass with bounded lookahead: every character
//! is mapped to a class, the automaton transitions on (state, class) pairs,
//! and at most two overshot characters are pushed back when a token
//! completes. The first failure aborts the run with a [`LexerError`] carrying
//! the exact character offset.

pub(crate) mod chars;
pub mod error;
pub mod tokenizer;

pub use error::{Construct, LexerError, LexerErrorKind};
pub use tokenizer::Tokenizer;
