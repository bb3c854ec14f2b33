// OpenStep property lists
//
// The text format used by classic NeXTSTEP/OpenStep defaults files:
//
//   { name = "parcomb"; tags = (parser, "text format"); blob = <0fa3 9c>; }
//
// Strings are either quoted (single or double quotes, C-style escapes) or
// bare runs of `[A-Za-z0-9_$+/:.-]`. `//` and `/* */` comments count as
// whitespace.

use super::nested;
use crate::chars::{
    CharacterClass, char, char_class, char_in, char_satisfying, hex_digit, whitespace,
};
use crate::combinators::{any, recursive, tuple};
use crate::constants::DEFAULT_MAX_NESTING_DEPTH;
use crate::context::Builder;
use crate::error::{ParseError, Result};
use crate::parser::Parser;
use crate::repeat::{many, many_separated, repeat_count};
use crate::strings::{string, substring_until, take_while};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlistValue {
    String(String),
    Data(Vec<u8>),
    Array(Vec<PlistValue>),
    /// Entries in input order.
    Dictionary(Vec<(String, PlistValue)>),
}

impl PlistValue {
    pub fn get(&self, key: &str) -> Option<&PlistValue> {
        match self {
            PlistValue::Dictionary(entries) => entries
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlistValue::String(text) => Some(text),
            _ => None,
        }
    }
}

fn ws() -> Parser<()> {
    let line_comment = string("//")
        .then(take_while("comment", |ch| ch != '\n' && ch != '\r', 0))
        .discard();
    let block_comment = string("/*")
        .then(substring_until("*/"))
        .skip(string("*/"))
        .discard();
    many(any([whitespace().discard(), line_comment, block_comment]), 0).discard()
}

fn token(c: char) -> Parser<char> {
    char(c).skip(ws())
}

fn digits_value(digits: &[char], radix: u32) -> u32 {
    digits
        .iter()
        .filter_map(|digit| digit.to_digit(radix))
        .fold(0, |acc, digit| acc * radix + digit)
}

fn escape() -> Parser<char> {
    let simple = char_in("\"'\\abfnrtv").map(|ch| match ch {
        'a' => '\u{7}',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{b}',
        other => other,
    });
    let unicode = char('U')
        .then(repeat_count(hex_digit(), 4))
        .try_map(|digits| {
            char::from_u32(digits_value(&digits, 16))
                .ok_or_else(|| ParseError::generic("invalid unicode escape"))
        });
    // \NNN is a Latin-1 code point
    let octal = repeat_count(char_class(CharacterClass::OctalDigit), 3).try_map(|digits| {
        u8::try_from(digits_value(&digits, 8))
            .map(char::from)
            .map_err(|_| ParseError::generic("octal escape out of range"))
    });
    char('\\').then(any([simple, unicode, octal]).label("escape sequence"))
}

fn quoted(quote: char) -> Parser<String> {
    let plain = char_satisfying("string character", move |ch| ch != quote && ch != '\\');
    char(quote)
        .then(many(plain.or_else(escape()), 0))
        .skip(char(quote))
        .map(|chars| chars.into_iter().collect())
}

fn string_value() -> Parser<String> {
    let bare = take_while(
        "unquoted string",
        |ch| ch.is_ascii_alphanumeric() || "_$+/:.-".contains(ch),
        1,
    );
    any([quoted('"'), quoted('\''), bare]).label("string")
}

fn data() -> Parser<Vec<u8>> {
    let byte = tuple((hex_digit(), hex_digit()))
        .map(|(high, low)| digits_value(&[high, low], 16) as u8)
        .skip(ws());
    token('<').then(many(byte, 0)).skip(char('>'))
}

/// A property list value surrounded by optional whitespace and comments.
pub fn plist() -> Parser<PlistValue> {
    let value = recursive(|value: Parser<PlistValue>| {
        let array = token('(')
            .then(nested(
                DEFAULT_MAX_NESTING_DEPTH,
                many_separated(value.clone(), token(','), true, 0),
            ))
            .skip(char(')'))
            .map(PlistValue::Array);
        let entry = tuple((string_value().skip(ws()), token('='), value, token(';')))
            .map(|(key, _, value, _)| (key, value));
        let dictionary = token('{')
            .then(nested(DEFAULT_MAX_NESTING_DEPTH, many(entry, 0)))
            .skip(char('}'))
            .map(PlistValue::Dictionary);
        any([
            dictionary,
            array,
            data().map(PlistValue::Data),
            string_value().map(PlistValue::String),
        ])
        .label("value")
        .skip(ws())
    });
    ws().then(value)
}

/// Parse a complete property list.
pub fn parse_plist(input: &str) -> Result<PlistValue> {
    Builder::new()
        .require_end_of_stream(true)
        .build()
        .run(&plist(), input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaseSensitivity;

    macro_rules! test_cases {
        ($($name:ident: $test:expr),* $(,)?) => {
            $(
                #[test]
                fn $name() {
                    $test
                }
            )*
        };
    }

    fn s(text: &str) -> PlistValue {
        PlistValue::String(text.to_string())
    }

    test_cases! {
        test_strings: {
            assert_eq!(parse_plist("hello"), Ok(s("hello")));
            assert_eq!(parse_plist("/usr/lib:1.0"), Ok(s("/usr/lib:1.0")));
            assert_eq!(parse_plist(r#""a \"b\"\n""#), Ok(s("a \"b\"\n")));
            assert_eq!(parse_plist(r"'it\'s'"), Ok(s("it's")));
            assert_eq!(parse_plist(r#""\U00e9\101""#), Ok(s("éA")));
        },

        test_data: {
            assert_eq!(parse_plist("<0fa3 9C>"), Ok(PlistValue::Data(vec![0x0f, 0xa3, 0x9c])));
            assert_eq!(parse_plist("<>"), Ok(PlistValue::Data(vec![])));
        },

        test_odd_data_digits: {
            let err = parse_plist("<0fa>").unwrap_err();
            assert_eq!(err.position, 4);
        },

        test_dictionary_and_array: {
            let text = r#"
                // project settings
                {
                    name = parcomb;
                    tags = (parser, "text format", );   /* trailing comma */
                    empty = ();
                    nested = { depth = 2; };
                }
            "#;
            let value = parse_plist(text).unwrap();
            assert_eq!(value.get("name"), Some(&s("parcomb")));
            assert_eq!(
                value.get("tags"),
                Some(&PlistValue::Array(vec![s("parser"), s("text format")]))
            );
            assert_eq!(value.get("empty"), Some(&PlistValue::Array(vec![])));
            assert_eq!(
                value.get("nested").and_then(|nested| nested.get("depth")),
                Some(&s("2"))
            );
        },

        test_missing_semicolon: {
            let err = parse_plist("{ a = b }").unwrap_err();
            assert_eq!(err.position, 8);
            // whitespace and comments could still have continued the entry
            assert_eq!(
                err.errors,
                vec![
                    ParseError::expected("whitespace"),
                    ParseError::expected_string("//", CaseSensitivity::Sensitive),
                    ParseError::expected_string("/*", CaseSensitivity::Sensitive),
                    ParseError::expected_string(";", CaseSensitivity::Sensitive),
                ]
            );
        },

        test_unterminated_comment: {
            assert!(parse_plist("a /* never closed").is_err());
        },
    }
}
