//! The finite-state tokenizer.
//!
//! One [`Tokenizer`] scans one input string, producing tokens on demand. The
//! machine consumes a single classified character per step and keeps no state
//! between tokens except the cursor, so re-tokenizing any suffix that starts
//! at a token boundary yields the same tokens.
//!
//! Tokenization is lossless: whitespace and comments come out as ordinary
//! tokens, and concatenating the text of every produced token reproduces the
//! input exactly. Maximal munch is implemented with bounded lookahead: a
//! transition that overshoots the token records how many trailing characters
//! (at most two) to give back to the cursor.

use crate::lexical::chars::{classify, CharClass as C};
use crate::lexical::error::{Construct, LexerError, LexerErrorKind};
use crate::tokens::{Modifier, Token, TokenType};
use crate::utils::Span;

/// Automaton states. One token scan starts in `Start` and runs until a
/// transition completes the token or fails; the machine is re-entered fresh
/// for the next token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    /// Bare word (letters, digits, `_`, `$`).
    Ident,
    Whitespace,
    /// Integer digits.
    Num,
    /// Digits after the decimal point.
    NumFraction,
    /// Just consumed the exponent marker `e`.
    NumExponentMarker,
    /// Consumed an exponent sign; digits still required.
    NumExponentSign,
    /// Inside the exponent digits.
    NumExponent,
    /// A leading `.`: numeric fraction or the dot symbol.
    DotOrNum,
    QuotedIdent,
    /// Saw a closing `"`; a second one means a doubled quote.
    QuotedIdentQuote,
    /// Leading `U`/`u`: unicode form or plain identifier.
    UnicodePrefix,
    /// `U&` consumed; the next character decides the quoted form.
    UnicodeVariant,
    Str,
    /// Saw a closing `'`; a second one means a doubled quote.
    StrQuote,
    /// Leading `E`/`e`: escaped string or plain identifier.
    EscapedPrefix,
    /// Leading `B`/`b`: bit string or plain identifier.
    BitPrefix,
    /// Leading `X`/`x`: hex string or plain identifier.
    HexPrefix,
    BitBody,
    HexBody,
    /// `$` consumed: positional parameter, tag, or immediate `$$`.
    DollarStart,
    /// Accumulating a dollar-quote tag.
    DollarTag,
    DollarBody,
    /// Saw `$` in the body; matching the closing tag character by character.
    DollarMaybeEnd,
    PositionalParam,
    /// First glyph of a core-set operator run (`+ * < > =`).
    OpStart,
    /// Core-set operator run.
    Op,
    /// Run containing an extended glyph (tilde, bang, at, hash, percent,
    /// caret, ampersand, pipe, backtick, question mark).
    OpExtended,
    /// Core run whose last glyph is `+`; may not end here.
    OpNoFinalPlus,
    /// A bare `-`: operator or line comment.
    OpMaybeLineComment,
    /// A bare `/`: operator or block comment.
    OpMaybeBlockComment,
    /// Core run, last glyph `-`: a second `-` starts a comment.
    OpFutureLineComment,
    /// Core run, last glyph `/`: a `*` starts a comment.
    OpFutureBlockComment,
    /// Extended run, last glyph `-`.
    OpxFutureLineComment,
    /// Extended run, last glyph `/`.
    OpxFutureBlockComment,
    LineComment,
    BlockComment,
    /// Saw `/` inside a block comment; a `*` nests one level deeper.
    BlockCommentSlash,
    /// Saw `*` inside a block comment; a `/` closes one level.
    BlockCommentStar,
    /// A bare `:`: cast operator `::` or a lone colon.
    CastOrColon,
}

/// Single-pass SQL tokenizer over one input string.
///
/// The pull API is [`has_more_tokens`](Self::has_more_tokens) plus
/// [`next_token`](Self::next_token); the same calls back the [`Iterator`]
/// implementation, so the token sequence can also be folded, filtered, or
/// collected lazily. A tokenizer is not restartable (construct a fresh one
/// to scan from the beginning again) and must not be shared between threads
/// without external synchronization.
pub struct Tokenizer<'a> {
    input: &'a str,
    /// Byte offset and value of every character, in order.
    chars: Vec<(usize, char)>,
    /// Index into `chars` of the next unread character.
    pos: usize,
    /// Set once a scan fails; the sequence ends there.
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over `input`.
    pub fn new(input: &'a str) -> Self {
        let chars: Vec<(usize, char)> = input.char_indices().collect();
        log::trace!("tokenizer created over {} characters", chars.len());
        Self {
            input,
            chars,
            pos: 0,
            failed: false,
        }
    }

    /// Tokenize the whole input strictly.
    ///
    /// Returns every token in order, or the first lexical error.
    pub fn tokenize(input: &'a str) -> Result<Vec<Token<'a>>, LexerError> {
        Tokenizer::new(input).collect()
    }

    /// Whether another token (or an error) can still be produced.
    pub fn has_more_tokens(&self) -> bool {
        !self.failed && self.pos < self.chars.len()
    }

    /// Produce the next token.
    ///
    /// Returns `None` once the input is exhausted or a previous call failed;
    /// tokens produced before a failure remain valid.
    pub fn next_token(&mut self) -> Option<Result<Token<'a>, LexerError>> {
        if !self.has_more_tokens() {
            return None;
        }
        let result = self.scan_token();
        if let Err(err) = &result {
            self.failed = true;
            log::debug!("tokenization failed: {err}");
        }
        Some(result)
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).map(|&(_, ch)| ch)
    }

    /// Byte offset of the character at `index`, or the input length past the
    /// end.
    fn byte_offset(&self, index: usize) -> usize {
        self.chars.get(index).map_or(self.input.len(), |&(offset, _)| offset)
    }

    fn error(&self, kind: LexerErrorKind, position: usize) -> LexerError {
        LexerError::new(kind, position, self.input)
    }

    fn unterminated(&self, construct: Construct) -> LexerError {
        self.error(
            LexerErrorKind::UnterminatedConstruct { construct },
            self.chars.len(),
        )
    }

    /// Scan exactly one token starting at the cursor.
    ///
    /// Drives the automaton one classified character per iteration. Each arm
    /// yields the next state; completing arms break out with the provisional
    /// token type after recording how many trailing characters (0, 1, or 2,
    /// the synthetic end-of-input marker included) overshot the token and
    /// must be pushed back.
    fn scan_token(&mut self) -> Result<Token<'a>, LexerError> {
        let start = self.pos;
        let mut state = State::Start;
        let mut modifier = Modifier::None;
        let mut comment_depth: u32 = 0;
        let mut trailing: usize = 0;
        // Dollar-quote tag bookkeeping: where the opening tag's characters
        // live and how much of the closing candidate has matched so far.
        let mut tag_start: usize = 0;
        let mut tag_len: usize = 0;
        let mut tag_pos: usize = 0;

        let provisional = loop {
            let index = self.pos;
            let looked = self.char_at(index);
            let class = classify(looked);
            let ch = looked.unwrap_or('\0');
            self.pos += 1;

            state = match state {
                State::Start => match class {
                    C::Letter => match ch {
                        'U' | 'u' => State::UnicodePrefix,
                        'E' | 'e' => State::EscapedPrefix,
                        'B' | 'b' => State::BitPrefix,
                        'X' | 'x' => State::HexPrefix,
                        _ => State::Ident,
                    },
                    C::Underscore => State::Ident,
                    C::Space | C::Newline => State::Whitespace,
                    C::Digit => State::Num,
                    C::DoubleQuote => State::QuotedIdent,
                    C::Quote => State::Str,
                    C::Dollar => State::DollarStart,
                    C::Plus | C::Asterisk | C::Lt | C::Gt | C::Equal => State::OpStart,
                    C::Tilde | C::Bang | C::At | C::Hash | C::Percent | C::Caret
                    | C::Ampersand | C::Pipe | C::Backtick | C::Question => State::OpExtended,
                    C::Minus => State::OpMaybeLineComment,
                    C::Slash => State::OpMaybeBlockComment,
                    C::LParen => break TokenType::LeftParen,
                    C::RParen => break TokenType::RightParen,
                    C::LBracket => break TokenType::LeftBracket,
                    C::RBracket => break TokenType::RightBracket,
                    C::Comma => break TokenType::Comma,
                    C::Semi => break TokenType::Semicolon,
                    C::Dot => State::DotOrNum,
                    C::Colon => State::CastOrColon,
                    C::Unknown | C::Eof => {
                        return Err(self.error(
                            LexerErrorKind::UnknownCharacter { character: ch },
                            index,
                        ));
                    }
                },

                State::Ident => match class {
                    C::Letter | C::Underscore | C::Digit | C::Dollar => State::Ident,
                    _ => {
                        trailing = 1;
                        break TokenType::Identifier;
                    }
                },

                State::Whitespace => match class {
                    C::Space | C::Newline => State::Whitespace,
                    _ => {
                        trailing = 1;
                        break TokenType::Whitespace;
                    }
                },

                State::Num => match class {
                    C::Digit => State::Num,
                    C::Letter if ch == 'e' => State::NumExponentMarker,
                    C::Dot => State::NumFraction,
                    _ => {
                        trailing = 1;
                        break TokenType::Numeric;
                    }
                },

                State::NumFraction => match class {
                    C::Digit => State::NumFraction,
                    C::Letter if ch == 'e' => State::NumExponentMarker,
                    C::Letter => {
                        return Err(self.error(LexerErrorKind::MalformedNumeric, index));
                    }
                    _ => {
                        trailing = 1;
                        break TokenType::Numeric;
                    }
                },

                State::NumExponentMarker => match class {
                    C::Plus | C::Minus => State::NumExponentSign,
                    C::Digit => State::NumExponent,
                    _ => {
                        return Err(self.error(LexerErrorKind::MalformedNumeric, index));
                    }
                },

                State::NumExponentSign => match class {
                    C::Digit => State::NumExponent,
                    _ => {
                        return Err(self.error(LexerErrorKind::MalformedNumeric, index));
                    }
                },

                State::NumExponent => match class {
                    C::Digit => State::NumExponent,
                    _ => {
                        trailing = 1;
                        break TokenType::Numeric;
                    }
                },

                State::DotOrNum => match class {
                    C::Digit => State::NumFraction,
                    _ => {
                        trailing = 1;
                        break TokenType::Dot;
                    }
                },

                State::QuotedIdent => match class {
                    C::DoubleQuote => State::QuotedIdentQuote,
                    C::Eof => return Err(self.unterminated(Construct::QuotedIdentifier)),
                    _ => State::QuotedIdent,
                },

                State::QuotedIdentQuote => match class {
                    C::DoubleQuote => State::QuotedIdent,
                    _ => {
                        trailing = 1;
                        break TokenType::QuotedIdentifier;
                    }
                },

                State::UnicodePrefix => match class {
                    C::Ampersand => State::UnicodeVariant,
                    C::Letter | C::Underscore | C::Digit | C::Dollar => State::Ident,
                    _ => {
                        trailing = 1;
                        break TokenType::Identifier;
                    }
                },

                State::UnicodeVariant => match class {
                    C::DoubleQuote => {
                        modifier = Modifier::Unicode;
                        State::QuotedIdent
                    }
                    C::Quote => {
                        modifier = Modifier::Unicode;
                        State::Str
                    }
                    _ => {
                        trailing = 2;
                        break TokenType::Identifier;
                    }
                },

                State::Str => match class {
                    C::Quote => State::StrQuote,
                    C::Eof => return Err(self.unterminated(Construct::String)),
                    _ => State::Str,
                },

                State::StrQuote => match class {
                    C::Quote => State::Str,
                    _ => {
                        trailing = 1;
                        break TokenType::String;
                    }
                },

                State::EscapedPrefix => match class {
                    C::Quote => {
                        modifier = Modifier::Escaped;
                        State::Str
                    }
                    C::Letter | C::Underscore | C::Digit | C::Dollar => State::Ident,
                    _ => {
                        trailing = 1;
                        break TokenType::Identifier;
                    }
                },

                State::BitPrefix => match class {
                    C::Quote => State::BitBody,
                    C::Letter | C::Underscore | C::Digit | C::Dollar => State::Ident,
                    _ => {
                        trailing = 1;
                        break TokenType::Identifier;
                    }
                },

                State::HexPrefix => match class {
                    C::Quote => State::HexBody,
                    C::Letter | C::Underscore | C::Digit | C::Dollar => State::Ident,
                    _ => {
                        trailing = 1;
                        break TokenType::Identifier;
                    }
                },

                State::BitBody => match class {
                    C::Quote => break TokenType::BitString,
                    C::Eof => return Err(self.unterminated(Construct::BitString)),
                    _ if ch == '0' || ch == '1' => State::BitBody,
                    _ => {
                        return Err(self.error(
                            LexerErrorKind::InvalidBitOrHexDigit {
                                character: ch,
                                construct: Construct::BitString,
                            },
                            index,
                        ));
                    }
                },

                State::HexBody => match class {
                    C::Quote => break TokenType::HexString,
                    C::Eof => return Err(self.unterminated(Construct::HexString)),
                    _ if ch.is_ascii_hexdigit() => State::HexBody,
                    _ => {
                        return Err(self.error(
                            LexerErrorKind::InvalidBitOrHexDigit {
                                character: ch,
                                construct: Construct::HexString,
                            },
                            index,
                        ));
                    }
                },

                State::DollarStart => match class {
                    C::Dollar => State::DollarBody,
                    C::Digit => State::PositionalParam,
                    C::Underscore | C::Letter => {
                        tag_start = index;
                        State::DollarTag
                    }
                    _ => {
                        return Err(self.error(LexerErrorKind::InvalidDollarSyntax, index));
                    }
                },

                State::DollarTag => match class {
                    C::Letter | C::Digit | C::Underscore => State::DollarTag,
                    C::Dollar => {
                        tag_len = index - tag_start;
                        State::DollarBody
                    }
                    _ => {
                        return Err(self.error(LexerErrorKind::InvalidDollarSyntax, index));
                    }
                },

                State::DollarBody => match class {
                    C::Dollar => {
                        tag_pos = 0;
                        State::DollarMaybeEnd
                    }
                    C::Eof => return Err(self.unterminated(Construct::DollarQuotedString)),
                    _ => State::DollarBody,
                },

                State::DollarMaybeEnd => match class {
                    C::Dollar => {
                        if tag_pos == tag_len {
                            break TokenType::DollarQuotedString;
                        }
                        State::DollarBody
                    }
                    C::Eof => return Err(self.unterminated(Construct::DollarQuotedString)),
                    _ => {
                        // Strictly forward comparison against the tag: a
                        // mismatch resumes the body scan at this character
                        // without re-trying anything already skipped.
                        if tag_pos < tag_len && self.char_at(tag_start + tag_pos) == Some(ch) {
                            tag_pos += 1;
                            State::DollarMaybeEnd
                        } else {
                            State::DollarBody
                        }
                    }
                },

                State::PositionalParam => match class {
                    C::Digit => State::PositionalParam,
                    _ => {
                        trailing = 1;
                        break TokenType::PositionalParameter;
                    }
                },

                State::OpStart | State::Op => match class {
                    C::Plus => State::OpNoFinalPlus,
                    C::Asterisk | C::Lt | C::Gt | C::Equal => State::Op,
                    C::Tilde | C::Bang | C::At | C::Hash | C::Percent | C::Caret
                    | C::Ampersand | C::Pipe | C::Backtick | C::Question => State::OpExtended,
                    C::Minus => State::OpFutureLineComment,
                    C::Slash => State::OpFutureBlockComment,
                    _ => {
                        trailing = 1;
                        break TokenType::Operator;
                    }
                },

                State::OpExtended => match class {
                    C::Plus | C::Asterisk | C::Lt | C::Gt | C::Equal | C::Tilde | C::Bang
                    | C::At | C::Hash | C::Percent | C::Caret | C::Ampersand | C::Pipe
                    | C::Backtick | C::Question => State::OpExtended,
                    C::Minus => State::OpxFutureLineComment,
                    C::Slash => State::OpxFutureBlockComment,
                    _ => {
                        trailing = 1;
                        break TokenType::Operator;
                    }
                },

                State::OpNoFinalPlus => match class {
                    C::Plus => State::OpNoFinalPlus,
                    C::Asterisk | C::Lt | C::Gt | C::Equal => State::Op,
                    C::Tilde | C::Bang | C::At | C::Hash | C::Percent | C::Caret
                    | C::Ampersand | C::Pipe | C::Backtick | C::Question => State::OpExtended,
                    C::Minus => State::OpFutureLineComment,
                    C::Slash => State::OpFutureBlockComment,
                    _ => {
                        return Err(self.error(LexerErrorKind::MalformedOperator, index - 1));
                    }
                },

                State::OpFutureLineComment => match class {
                    C::Plus => State::OpNoFinalPlus,
                    C::Asterisk | C::Lt | C::Gt | C::Equal => State::Op,
                    C::Tilde | C::Bang | C::At | C::Hash | C::Percent | C::Caret
                    | C::Ampersand | C::Pipe | C::Backtick | C::Question => State::OpExtended,
                    C::Minus => {
                        trailing = 2;
                        break TokenType::Operator;
                    }
                    C::Slash => State::OpFutureBlockComment,
                    _ => {
                        return Err(self.error(LexerErrorKind::MalformedOperator, index - 1));
                    }
                },

                State::OpFutureBlockComment => match class {
                    C::Plus => State::OpNoFinalPlus,
                    C::Asterisk => {
                        trailing = 2;
                        break TokenType::Operator;
                    }
                    C::Lt | C::Gt | C::Equal => State::Op,
                    C::Tilde | C::Bang | C::At | C::Hash | C::Percent | C::Caret
                    | C::Ampersand | C::Pipe | C::Backtick | C::Question => State::OpExtended,
                    C::Minus => State::OpFutureLineComment,
                    C::Slash => State::OpFutureBlockComment,
                    C::Eof => {
                        trailing = 1;
                        break TokenType::Operator;
                    }
                    _ => {
                        return Err(self.error(LexerErrorKind::MalformedOperator, index - 1));
                    }
                },

                State::OpxFutureLineComment => match class {
                    C::Plus | C::Asterisk | C::Lt | C::Gt | C::Equal | C::Tilde | C::Bang
                    | C::At | C::Hash | C::Percent | C::Caret | C::Ampersand | C::Pipe
                    | C::Backtick | C::Question => State::OpExtended,
                    C::Minus => {
                        trailing = 2;
                        break TokenType::Operator;
                    }
                    C::Slash => State::OpxFutureBlockComment,
                    _ => {
                        trailing = 1;
                        break TokenType::Operator;
                    }
                },

                State::OpxFutureBlockComment => match class {
                    C::Plus | C::Asterisk => {
                        trailing = 2;
                        break TokenType::Operator;
                    }
                    C::Lt | C::Gt | C::Equal | C::Tilde | C::Bang | C::At | C::Hash
                    | C::Percent | C::Caret | C::Ampersand | C::Pipe | C::Backtick
                    | C::Question => State::OpExtended,
                    C::Minus => State::OpxFutureLineComment,
                    C::Slash => State::OpExtended,
                    C::Eof => {
                        trailing = 1;
                        break TokenType::Operator;
                    }
                    _ => {
                        return Err(self.error(LexerErrorKind::MalformedOperator, index - 1));
                    }
                },

                State::OpMaybeLineComment => match class {
                    C::Plus => State::OpNoFinalPlus,
                    C::Asterisk | C::Lt | C::Gt | C::Equal => State::Op,
                    C::Tilde | C::Bang | C::At | C::Hash | C::Percent | C::Caret
                    | C::Ampersand | C::Pipe | C::Backtick | C::Question => State::OpExtended,
                    C::Minus => State::LineComment,
                    C::Slash => State::OpFutureBlockComment,
                    _ => {
                        trailing = 1;
                        break TokenType::Operator;
                    }
                },

                State::OpMaybeBlockComment => match class {
                    C::Asterisk => State::BlockComment,
                    _ => State::Op,
                },

                State::LineComment => match class {
                    C::Newline | C::Eof => {
                        trailing = 1;
                        break TokenType::LineComment;
                    }
                    _ => State::LineComment,
                },

                State::BlockComment => match class {
                    C::Slash => State::BlockCommentSlash,
                    C::Asterisk => State::BlockCommentStar,
                    C::Eof => return Err(self.unterminated(Construct::BlockComment)),
                    _ => State::BlockComment,
                },

                State::BlockCommentSlash => match class {
                    C::Asterisk => {
                        comment_depth += 1;
                        State::BlockComment
                    }
                    C::Eof => return Err(self.unterminated(Construct::BlockComment)),
                    _ => State::BlockComment,
                },

                State::BlockCommentStar => match class {
                    C::Slash => {
                        if comment_depth > 0 {
                            comment_depth -= 1;
                            State::BlockComment
                        } else {
                            break TokenType::BlockComment;
                        }
                    }
                    C::Eof => return Err(self.unterminated(Construct::BlockComment)),
                    _ => State::BlockComment,
                },

                State::CastOrColon => match class {
                    C::Colon => break TokenType::Operator,
                    _ => {
                        trailing = 1;
                        break TokenType::Operator;
                    }
                },
            };
        };

        self.pos = (self.pos - trailing).min(self.chars.len());
        let byte_start = self.byte_offset(start);
        let byte_end = self.byte_offset(self.pos);
        let span = Span::new(byte_start, byte_end);
        let kind = modifier.resolve(provisional);
        log::trace!("emitted {kind:?} at {span}");
        Ok(Token::new(kind, &self.input[byte_start..byte_end], span))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::error::{Construct, LexerErrorKind};
    use assert_matches::assert_matches;

    fn toks(input: &str) -> Vec<Token<'_>> {
        Tokenizer::tokenize(input).unwrap()
    }

    fn kinds(input: &str) -> Vec<(TokenType, String)> {
        toks(input)
            .into_iter()
            .map(|t| (t.kind(), t.text().to_string()))
            .collect()
    }

    fn lex_err(input: &str) -> LexerError {
        Tokenizer::tokenize(input).unwrap_err()
    }

    // === Identifiers ===

    #[test]
    fn test_plain_identifiers() {
        assert_eq!(
            kinds("foo _bar q2"),
            vec![
                (TokenType::Identifier, "foo".into()),
                (TokenType::Whitespace, " ".into()),
                (TokenType::Identifier, "_bar".into()),
                (TokenType::Whitespace, " ".into()),
                (TokenType::Identifier, "q2".into()),
            ]
        );
    }

    #[test]
    fn test_identifier_continues_over_dollar() {
        assert_eq!(kinds("a$b"), vec![(TokenType::Identifier, "a$b".into())]);
    }

    #[test]
    fn test_unicode_identifier() {
        assert_eq!(kinds("héllo"), vec![(TokenType::Identifier, "héllo".into())]);
    }

    #[test]
    fn test_keywords_are_not_resolved() {
        let tokens = toks("SELECT");
        assert_eq!(tokens[0].kind(), TokenType::Identifier);
    }

    // === Prefix-letter fallback to identifier ===

    #[test]
    fn test_prefix_letters_alone_are_identifiers() {
        for word in ["E", "e", "U", "u", "B", "b", "X", "x"] {
            assert_eq!(
                kinds(word),
                vec![(TokenType::Identifier, word.into())],
                "prefix {word}"
            );
        }
    }

    #[test]
    fn test_prefix_letters_continue_as_identifiers() {
        assert_eq!(kinds("Ex"), vec![(TokenType::Identifier, "Ex".into())]);
        assert_eq!(kinds("b1"), vec![(TokenType::Identifier, "b1".into())]);
        assert_eq!(kinds("u8"), vec![(TokenType::Identifier, "u8".into())]);
        assert_eq!(kinds("xmax"), vec![(TokenType::Identifier, "xmax".into())]);
    }

    #[test]
    fn test_unicode_prefix_without_quote_pushes_back_ampersand() {
        assert_eq!(
            kinds("U&x"),
            vec![
                (TokenType::Identifier, "U".into()),
                (TokenType::Operator, "&".into()),
                (TokenType::Identifier, "x".into()),
            ]
        );
        assert_eq!(
            kinds("U&"),
            vec![
                (TokenType::Identifier, "U".into()),
                (TokenType::Operator, "&".into()),
            ]
        );
    }

    // === Quoted identifiers ===

    #[test]
    fn test_quoted_identifier() {
        assert_eq!(
            kinds("\"name\""),
            vec![(TokenType::QuotedIdentifier, "\"name\"".into())]
        );
    }

    #[test]
    fn test_quoted_identifier_with_doubled_quotes() {
        assert_eq!(
            kinds("\"a\"\"b\""),
            vec![(TokenType::QuotedIdentifier, "\"a\"\"b\"".into())]
        );
    }

    #[test]
    fn test_empty_quoted_identifier() {
        assert_eq!(
            kinds("\"\""),
            vec![(TokenType::QuotedIdentifier, "\"\"".into())]
        );
    }

    #[test]
    fn test_unicode_quoted_identifier() {
        assert_eq!(
            kinds("U&\"name\""),
            vec![(TokenType::UnicodeQuotedIdentifier, "U&\"name\"".into())]
        );
    }

    #[test]
    fn test_unterminated_quoted_identifier() {
        let err = lex_err("\"abc");
        assert_matches!(
            err.kind(),
            LexerErrorKind::UnterminatedConstruct {
                construct: Construct::QuotedIdentifier
            }
        );
        assert_eq!(err.position(), 4);
    }

    // === Strings ===

    #[test]
    fn test_plain_string() {
        assert_eq!(kinds("'hello'"), vec![(TokenType::String, "'hello'".into())]);
    }

    #[test]
    fn test_string_with_doubled_quote() {
        assert_eq!(
            kinds("'it''s'"),
            vec![(TokenType::String, "'it''s'".into())]
        );
    }

    #[test]
    fn test_empty_and_quote_only_strings() {
        assert_eq!(kinds("''"), vec![(TokenType::String, "''".into())]);
        assert_eq!(kinds("''''"), vec![(TokenType::String, "''''".into())]);
    }

    #[test]
    fn test_escaped_string() {
        assert_eq!(
            kinds("E'a''b'"),
            vec![(TokenType::EscapedString, "E'a''b'".into())]
        );
        assert_eq!(
            kinds("e'x'"),
            vec![(TokenType::EscapedString, "e'x'".into())]
        );
    }

    #[test]
    fn test_backslash_is_ordinary_inside_strings() {
        // Delimiter doubling is the only escape at this layer.
        assert_eq!(
            kinds(r"E'a\nb'"),
            vec![(TokenType::EscapedString, r"E'a\nb'".into())]
        );
    }

    #[test]
    fn test_unicode_string() {
        assert_eq!(
            kinds("U&'d\\0061t'"),
            vec![(TokenType::UnicodeString, "U&'d\\0061t'".into())]
        );
    }

    #[test]
    fn test_unterminated_string_is_an_error_not_a_token() {
        let err = lex_err("'abc");
        assert_matches!(
            err.kind(),
            LexerErrorKind::UnterminatedConstruct {
                construct: Construct::String
            }
        );
        assert_eq!(err.position(), 4);
    }

    // === Bit and hex strings ===

    #[test]
    fn test_bit_string() {
        assert_eq!(
            kinds("B'0101'"),
            vec![(TokenType::BitString, "B'0101'".into())]
        );
        assert_eq!(kinds("b''"), vec![(TokenType::BitString, "b''".into())]);
    }

    #[test]
    fn test_bit_string_rejects_other_digits() {
        let err = lex_err("B'0102'");
        assert_matches!(
            err.kind(),
            LexerErrorKind::InvalidBitOrHexDigit {
                character: '2',
                construct: Construct::BitString
            }
        );
        assert_eq!(err.position(), 5);
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(
            kinds("X'1aF0'"),
            vec![(TokenType::HexString, "X'1aF0'".into())]
        );
    }

    #[test]
    fn test_hex_string_rejects_non_hex() {
        let err = lex_err("x'1g'");
        assert_matches!(
            err.kind(),
            LexerErrorKind::InvalidBitOrHexDigit {
                character: 'g',
                construct: Construct::HexString
            }
        );
        assert_eq!(err.position(), 3);
    }

    #[test]
    fn test_unterminated_bit_and_hex_strings() {
        assert_matches!(
            lex_err("B'01").kind(),
            LexerErrorKind::UnterminatedConstruct {
                construct: Construct::BitString
            }
        );
        assert_matches!(
            lex_err("X'1a").kind(),
            LexerErrorKind::UnterminatedConstruct {
                construct: Construct::HexString
            }
        );
    }

    // === Numerics ===

    #[test]
    fn test_numeric_forms() {
        for src in ["0", "42", "1.5", ".5", "1.", "1e5", "1.5e-3", "2e+10", ".5e2", "1.e5"] {
            assert_eq!(
                kinds(src),
                vec![(TokenType::Numeric, src.into())],
                "numeric {src}"
            );
        }
    }

    #[test]
    fn test_exponent_marker_is_lowercase_only() {
        assert_eq!(
            kinds("1E5"),
            vec![
                (TokenType::Numeric, "1".into()),
                (TokenType::Identifier, "E5".into()),
            ]
        );
    }

    #[test]
    fn test_numeric_then_identifier_splits() {
        assert_eq!(
            kinds("123abc"),
            vec![
                (TokenType::Numeric, "123".into()),
                (TokenType::Identifier, "abc".into()),
            ]
        );
    }

    #[test]
    fn test_letter_after_fraction_dot_is_malformed() {
        let err = lex_err("1.x");
        assert_matches!(err.kind(), LexerErrorKind::MalformedNumeric);
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn test_exponent_requires_digits() {
        let err = lex_err("1e");
        assert_matches!(err.kind(), LexerErrorKind::MalformedNumeric);
        assert_eq!(err.position(), 2);

        let err = lex_err("1e+");
        assert_matches!(err.kind(), LexerErrorKind::MalformedNumeric);
        assert_eq!(err.position(), 3);

        let err = lex_err("1e+x");
        assert_matches!(err.kind(), LexerErrorKind::MalformedNumeric);
        assert_eq!(err.position(), 3);
    }

    #[test]
    fn test_lone_dot_is_the_dot_symbol() {
        assert_eq!(kinds("."), vec![(TokenType::Dot, ".".into())]);
        assert_eq!(
            kinds("a.b"),
            vec![
                (TokenType::Identifier, "a".into()),
                (TokenType::Dot, ".".into()),
                (TokenType::Identifier, "b".into()),
            ]
        );
    }

    // === Dollar quoting and positional parameters ===

    #[test]
    fn test_positional_parameter() {
        assert_eq!(
            kinds("$1"),
            vec![(TokenType::PositionalParameter, "$1".into())]
        );
        assert_eq!(
            kinds("$12x"),
            vec![
                (TokenType::PositionalParameter, "$12".into()),
                (TokenType::Identifier, "x".into()),
            ]
        );
    }

    #[test]
    fn test_empty_tag_dollar_quote() {
        assert_eq!(
            kinds("$$body$$"),
            vec![(TokenType::DollarQuotedString, "$$body$$".into())]
        );
    }

    #[test]
    fn test_tagged_dollar_quote() {
        assert_eq!(
            kinds("$fn$select 1;$fn$"),
            vec![(TokenType::DollarQuotedString, "$fn$select 1;$fn$".into())]
        );
    }

    #[test]
    fn test_dollar_quote_body_may_contain_dollars() {
        assert_eq!(
            kinds("$$a$b$$"),
            vec![(TokenType::DollarQuotedString, "$$a$b$$".into())]
        );
    }

    #[test]
    fn test_dollar_quote_partial_tag_rematch() {
        // The closing delimiter is the first point where the full tag
        // re-matches; partial matches fall back into the body.
        assert_eq!(
            kinds("$tag$a$t$ag$tag$"),
            vec![(TokenType::DollarQuotedString, "$tag$a$t$ag$tag$".into())]
        );
    }

    #[test]
    fn test_unterminated_dollar_quote() {
        let err = lex_err("$tag$body");
        assert_matches!(
            err.kind(),
            LexerErrorKind::UnterminatedConstruct {
                construct: Construct::DollarQuotedString
            }
        );
        assert_eq!(err.position(), 9);
    }

    #[test]
    fn test_invalid_dollar_syntax() {
        assert_matches!(lex_err("$ x").kind(), LexerErrorKind::InvalidDollarSyntax);
        assert_eq!(lex_err("$ x").position(), 1);
        assert_matches!(lex_err("$").kind(), LexerErrorKind::InvalidDollarSyntax);
        assert_matches!(lex_err("$tag").kind(), LexerErrorKind::InvalidDollarSyntax);
        assert_matches!(lex_err("$ta g$").kind(), LexerErrorKind::InvalidDollarSyntax);
    }

    // === Operators ===

    #[test]
    fn test_single_character_operators() {
        for src in ["+", "-", "*", "=", "<", ">", "~", "!", "@", "#", "%", "^", "&", "|", "`", "?", ":"] {
            assert_eq!(
                kinds(src),
                vec![(TokenType::Operator, src.into())],
                "operator {src}"
            );
        }
    }

    #[test]
    fn test_multi_character_operators() {
        for src in ["<=", ">=", "<>", "!=", "||", "@>", "<@", "~~", "#>>", ">+<"] {
            assert_eq!(
                kinds(src),
                vec![(TokenType::Operator, src.into())],
                "operator {src}"
            );
        }
    }

    #[test]
    fn test_cast_operator() {
        assert_eq!(kinds("::"), vec![(TokenType::Operator, "::".into())]);
        assert_eq!(
            kinds("a::b"),
            vec![
                (TokenType::Identifier, "a".into()),
                (TokenType::Operator, "::".into()),
                (TokenType::Identifier, "b".into()),
            ]
        );
        assert_eq!(
            kinds(":::"),
            vec![
                (TokenType::Operator, "::".into()),
                (TokenType::Operator, ":".into()),
            ]
        );
        assert_eq!(
            kinds(":x"),
            vec![
                (TokenType::Operator, ":".into()),
                (TokenType::Identifier, "x".into()),
            ]
        );
    }

    #[test]
    fn test_trailing_plus_allowed_after_extended_glyph() {
        assert_eq!(kinds("~+"), vec![(TokenType::Operator, "~+".into())]);
        assert_eq!(kinds("?-"), vec![(TokenType::Operator, "?-".into())]);
    }

    #[test]
    fn test_trailing_plus_rejected_in_core_run() {
        let err = lex_err("><+");
        assert_matches!(err.kind(), LexerErrorKind::MalformedOperator);
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn test_trailing_minus_rejected_in_core_run() {
        let err = lex_err("+-");
        assert_matches!(err.kind(), LexerErrorKind::MalformedOperator);
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn test_operator_ends_before_comment_opener() {
        assert_eq!(
            kinds("+--x"),
            vec![
                (TokenType::Operator, "+".into()),
                (TokenType::LineComment, "--x".into()),
            ]
        );
        assert_eq!(
            kinds("~/*c*/"),
            vec![
                (TokenType::Operator, "~".into()),
                (TokenType::BlockComment, "/*c*/".into()),
            ]
        );
    }

    #[test]
    fn test_slash_continues_an_operator_run() {
        // After `/`, anything but `*` joins the run; the run then ends one
        // character later under maximal munch.
        assert_eq!(
            kinds("1/2"),
            vec![
                (TokenType::Numeric, "1".into()),
                (TokenType::Operator, "/2".into()),
            ]
        );
        assert_eq!(kinds("/"), vec![(TokenType::Operator, "/".into())]);
        assert_eq!(kinds("|/"), vec![(TokenType::Operator, "|/".into())]);
    }

    // === Comments ===

    #[test]
    fn test_line_comment_to_end_of_input() {
        assert_eq!(
            kinds("-- note"),
            vec![(TokenType::LineComment, "-- note".into())]
        );
    }

    #[test]
    fn test_line_comment_excludes_newline() {
        assert_eq!(
            kinds("--c\nx"),
            vec![
                (TokenType::LineComment, "--c".into()),
                (TokenType::Whitespace, "\n".into()),
                (TokenType::Identifier, "x".into()),
            ]
        );
    }

    #[test]
    fn test_block_comment() {
        assert_eq!(
            kinds("/* a */x"),
            vec![
                (TokenType::BlockComment, "/* a */".into()),
                (TokenType::Identifier, "x".into()),
            ]
        );
        assert_eq!(kinds("/**/"), vec![(TokenType::BlockComment, "/**/".into())]);
    }

    #[test]
    fn test_nested_block_comment_is_one_token() {
        assert_eq!(
            kinds("/* a /* b */ c */"),
            vec![(TokenType::BlockComment, "/* a /* b */ c */".into())]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        for src in ["/*", "/* a", "/* a /* b */"] {
            let err = lex_err(src);
            assert_matches!(
                err.kind(),
                LexerErrorKind::UnterminatedConstruct {
                    construct: Construct::BlockComment
                },
                "input {src}"
            );
        }
    }

    // === Whitespace and punctuation ===

    #[test]
    fn test_whitespace_is_one_token() {
        assert_eq!(
            kinds(" \t\n x"),
            vec![
                (TokenType::Whitespace, " \t\n ".into()),
                (TokenType::Identifier, "x".into()),
            ]
        );
    }

    #[test]
    fn test_carriage_return_has_no_lexical_meaning() {
        let err = lex_err("\r\n");
        assert_matches!(
            err.kind(),
            LexerErrorKind::UnknownCharacter { character: '\r' }
        );
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn test_punctuation_tokens() {
        assert_eq!(
            kinds("(a,b);"),
            vec![
                (TokenType::LeftParen, "(".into()),
                (TokenType::Identifier, "a".into()),
                (TokenType::Comma, ",".into()),
                (TokenType::Identifier, "b".into()),
                (TokenType::RightParen, ")".into()),
                (TokenType::Semicolon, ";".into()),
            ]
        );
        assert_eq!(
            kinds("[]"),
            vec![
                (TokenType::LeftBracket, "[".into()),
                (TokenType::RightBracket, "]".into()),
            ]
        );
    }

    #[test]
    fn test_unknown_character() {
        let err = lex_err("a {b");
        assert_matches!(err.kind(), LexerErrorKind::UnknownCharacter { character: '{' });
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn test_error_position_counts_characters_not_bytes() {
        let err = lex_err("é {");
        assert_eq!(err.position(), 2);
        assert_eq!(err.input(), "é {");
    }

    // === Sequence behavior ===

    #[test]
    fn test_round_trip_reproduces_input() {
        let input = "U&\"välue\" = E'a''b' AND b1 = B'0101' /* c /* d */ e */ OR \
                     x <> $q$raw $ text$q$ -- t\n.5::numeric";
        let tokens = toks(input);
        let rebuilt: String = tokens.iter().map(|t| t.text()).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_spans_tile_the_input() {
        let input = "SELECT 'a' FROM t; -- q";
        let tokens = toks(input);
        let mut offset = 0;
        for token in &tokens {
            assert_eq!(token.span().start, offset);
            assert_eq!(token.span().slice(input), token.text());
            offset = token.span().end;
        }
        assert_eq!(offset, input.len());
    }

    #[test]
    fn test_retokenizing_any_suffix_at_a_boundary_matches() {
        let input = "SELECT x, 'a''b' FROM t WHERE v @> $1 -- done";
        let tokens = toks(input);
        let mut offset = 0;
        for token in &tokens {
            let again = toks(&input[offset..]);
            assert_eq!(again[0].kind(), token.kind());
            assert_eq!(again[0].text(), token.text());
            offset += token.text().len();
        }
    }

    #[test]
    fn test_tokenization_is_deterministic_across_instances() {
        let input = "INSERT INTO t (a, b) VALUES ($1, U&'x'), (2.5e1, $$y$$);";
        assert_eq!(toks(input), toks(input));
    }

    #[test]
    fn test_pull_api_protocol() {
        let mut tokenizer = Tokenizer::new("a b");
        let mut texts = Vec::new();
        while tokenizer.has_more_tokens() {
            let token = tokenizer.next_token().unwrap().unwrap();
            texts.push(token.text().to_string());
        }
        assert_eq!(texts, vec!["a", " ", "b"]);
        assert!(tokenizer.next_token().is_none());
    }

    #[test]
    fn test_empty_input_has_no_tokens() {
        assert!(toks("").is_empty());
        let mut tokenizer = Tokenizer::new("");
        assert!(!tokenizer.has_more_tokens());
        assert!(tokenizer.next_token().is_none());
    }

    #[test]
    fn test_iterator_yields_tokens_then_error_then_fuses() {
        let mut tokenizer = Tokenizer::new("ab {x");
        assert_eq!(tokenizer.next().unwrap().unwrap().text(), "ab");
        assert_eq!(tokenizer.next().unwrap().unwrap().text(), " ");
        let err = tokenizer.next().unwrap().unwrap_err();
        assert_eq!(err.position(), 3);
        assert!(tokenizer.next().is_none());
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn test_iterator_adapters_work() {
        let significant: Vec<_> = Tokenizer::new("a = 'b' -- c")
            .filter_map(|result| result.ok())
            .filter(|token| token.is_significant())
            .map(|token| token.text().to_string())
            .collect();
        assert_eq!(significant, vec!["a", "=", "'b'"]);
    }

    #[test]
    fn test_full_statement() {
        let input = "SELECT u.name, $1 FROM users u WHERE u.id = 42;";
        let significant: Vec<_> = toks(input)
            .into_iter()
            .filter(Token::is_significant)
            .map(|t| (t.kind(), t.text().to_string()))
            .collect();
        assert_eq!(
            significant,
            vec![
                (TokenType::Identifier, "SELECT".into()),
                (TokenType::Identifier, "u".into()),
                (TokenType::Dot, ".".into()),
                (TokenType::Identifier, "name".into()),
                (TokenType::Comma, ",".into()),
                (TokenType::PositionalParameter, "$1".into()),
                (TokenType::Identifier, "FROM".into()),
                (TokenType::Identifier, "users".into()),
                (TokenType::Identifier, "u".into()),
                (TokenType::Identifier, "WHERE".into()),
                (TokenType::Identifier, "u".into()),
                (TokenType::Dot, ".".into()),
                (TokenType::Identifier, "id".into()),
                (TokenType::Operator, "=".into()),
                (TokenType::Numeric, "42".into()),
                (TokenType::Semicolon, ";".into()),
            ]
        );
    }
}
