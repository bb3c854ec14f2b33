// Single-character parsers.

use crate::error::{CaseSensitivity, ParseError};
use crate::parser::Parser;
use crate::reply::ParserReply;

/// Named character categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    /// ASCII `0`-`9`.
    Digit,
    /// ASCII `0`-`9`, `a`-`f`, `A`-`F`.
    HexDigit,
    OctalDigit,
    BinaryDigit,
    /// Any Unicode alphabetic character.
    Letter,
    /// Any Unicode alphanumeric character.
    Alphanumeric,
    /// Any Unicode whitespace, line breaks included.
    Whitespace,
    /// `\n` or `\r`.
    Newline,
}

impl CharacterClass {
    pub fn matches(self, ch: char) -> bool {
        match self {
            CharacterClass::Digit => ch.is_ascii_digit(),
            CharacterClass::HexDigit => ch.is_ascii_hexdigit(),
            CharacterClass::OctalDigit => matches!(ch, '0'..='7'),
            CharacterClass::BinaryDigit => matches!(ch, '0' | '1'),
            CharacterClass::Letter => ch.is_alphabetic(),
            CharacterClass::Alphanumeric => ch.is_alphanumeric(),
            CharacterClass::Whitespace => ch.is_whitespace(),
            CharacterClass::Newline => matches!(ch, '\n' | '\r'),
        }
    }

    /// The label reported when the class fails to match.
    pub fn label(self) -> &'static str {
        match self {
            CharacterClass::Digit => "digit",
            CharacterClass::HexDigit => "hexadecimal digit",
            CharacterClass::OctalDigit => "octal digit",
            CharacterClass::BinaryDigit => "binary digit",
            CharacterClass::Letter => "letter",
            CharacterClass::Alphanumeric => "letter or digit",
            CharacterClass::Whitespace => "whitespace",
            CharacterClass::Newline => "newline",
        }
    }
}

/// Consume one character accepted by `predicate`, failing with `error`.
fn one_char<F>(error: ParseError, predicate: F) -> Parser<char>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    Parser::new(move |state| match state.stream().next_char() {
        Some((ch, rest)) if predicate(ch) => {
            ParserReply::success(ch, Vec::new(), state.with_stream(rest))
        }
        _ => ParserReply::failure(vec![error.clone()], state.clone()),
    })
}

/// Match exactly `expected`.
pub fn char(expected: char) -> Parser<char> {
    one_char(
        ParseError::ExpectedString(expected.to_string(), CaseSensitivity::Sensitive),
        move |ch| ch == expected,
    )
}

/// Match one character accepted by `predicate`, reporting `label` otherwise.
pub fn char_satisfying<F>(label: impl Into<String>, predicate: F) -> Parser<char>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    one_char(ParseError::Expected(label.into()), predicate)
}

/// Match any single character.
pub fn any_char() -> Parser<char> {
    one_char(ParseError::expected("any character"), |_| true)
}

/// Match one of the characters in `set`.
pub fn char_in(set: &str) -> Parser<char> {
    let chars: Vec<char> = set.chars().collect();
    one_char(
        ParseError::Expected(format!("any character in {set:?}")),
        move |ch| chars.contains(&ch),
    )
}

/// Match any character not in `set`.
pub fn char_not_in(set: &str) -> Parser<char> {
    let chars: Vec<char> = set.chars().collect();
    one_char(
        ParseError::Expected(format!("any character not in {set:?}")),
        move |ch| !chars.contains(&ch),
    )
}

pub fn char_class(class: CharacterClass) -> Parser<char> {
    one_char(ParseError::expected(class.label()), move |ch| class.matches(ch))
}

pub fn digit() -> Parser<char> {
    char_class(CharacterClass::Digit)
}

pub fn hex_digit() -> Parser<char> {
    char_class(CharacterClass::HexDigit)
}

pub fn letter() -> Parser<char> {
    char_class(CharacterClass::Letter)
}

pub fn alphanumeric() -> Parser<char> {
    char_class(CharacterClass::Alphanumeric)
}

pub fn whitespace() -> Parser<char> {
    char_class(CharacterClass::Whitespace)
}

/// Match `\n`, `\r\n` or a lone `\r`, yielding `'\n'`.
pub fn newline() -> Parser<char> {
    Parser::new(|state| {
        let remaining = state.remaining();
        let width = if remaining.starts_with("\r\n") {
            2
        } else if remaining.starts_with(['\n', '\r']) {
            1
        } else {
            return ParserReply::failure(
                vec![ParseError::expected(CharacterClass::Newline.label())],
                state.clone(),
            );
        };
        ParserReply::success('\n', Vec::new(), state.advance(width))
    })
}
