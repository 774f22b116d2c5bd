//! Character classification for the tokenizer.
//!
//! The state machine never looks at raw characters: every input character is
//! first mapped to a [`CharClass`], and all transitions are keyed on the
//! class. The synthetic end-of-input marker gets its own class so the
//! automaton can treat running off the end like any other transition.

/// Lexical class of a single input character.
///
/// `Unknown` is reserved for characters with no SQL lexical meaning; a token
/// can never start with one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    Letter,
    Underscore,
    Digit,
    Dollar,
    Quote,
    DoubleQuote,
    Space,
    Newline,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Ampersand,
    Semi,
    Comma,
    Dot,
    Colon,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Equal,
    Tilde,
    Bang,
    At,
    Hash,
    Percent,
    Caret,
    Pipe,
    Backtick,
    Question,
    Eof,
    Unknown,
}

/// Classify one character, or the end-of-input marker (`None`).
///
/// Total and pure. Letters and digits use the Unicode tests, so the
/// identifier repertoire is not restricted to ASCII.
pub(crate) fn classify(ch: Option<char>) -> CharClass {
    let Some(ch) = ch else {
        return CharClass::Eof;
    };
    if ch == ' ' || ch == '\t' {
        return CharClass::Space;
    }
    if ch.is_alphabetic() {
        return CharClass::Letter;
    }
    if ch.is_numeric() {
        return CharClass::Digit;
    }
    match ch {
        '_' => CharClass::Underscore,
        '$' => CharClass::Dollar,
        '\'' => CharClass::Quote,
        '"' => CharClass::DoubleQuote,
        '\n' => CharClass::Newline,
        '(' => CharClass::LParen,
        ')' => CharClass::RParen,
        '[' => CharClass::LBracket,
        ']' => CharClass::RBracket,
        '&' => CharClass::Ampersand,
        ';' => CharClass::Semi,
        ',' => CharClass::Comma,
        '.' => CharClass::Dot,
        ':' => CharClass::Colon,
        '+' => CharClass::Plus,
        '-' => CharClass::Minus,
        '*' => CharClass::Asterisk,
        '/' => CharClass::Slash,
        '<' => CharClass::Lt,
        '>' => CharClass::Gt,
        '=' => CharClass::Equal,
        '~' => CharClass::Tilde,
        '!' => CharClass::Bang,
        '@' => CharClass::At,
        '#' => CharClass::Hash,
        '%' => CharClass::Percent,
        '^' => CharClass::Caret,
        '|' => CharClass::Pipe,
        '`' => CharClass::Backtick,
        '?' => CharClass::Question,
        _ => CharClass::Unknown,
    }
}
