// JSON (RFC 8259)
//
// Whitespace is consumed after every token, so each rule starts at a
// significant character. Object members keep their input order and
// duplicate keys are preserved.

use super::nested;
use crate::chars::{char, char_in, char_satisfying, hex_digit};
use crate::combinators::{any, just, recursive, tuple};
use crate::constants::DEFAULT_MAX_NESTING_DEPTH;
use crate::context::Builder;
use crate::error::{ParseError, Result};
use crate::parser::Parser;
use crate::repeat::{many, many_separated, repeat_count};
use crate::strings::{string, take_while};
use std::fmt;

/// A parsed JSON document.
#[derive(Clone, Debug, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    /// Members in input order.
    Object(Vec<(String, JsonValue)>),
}

impl JsonValue {
    /// Look up the first member named `key` of an object.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(members) => members
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(number) => Some(*number),
            _ => None,
        }
    }
}

fn write_json_string(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in text.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if u32::from(c) < 0x20 => write!(f, "\\u{:04x}", u32::from(c))?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

/// Compact serialization.
impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Bool(value) => write!(f, "{value}"),
            JsonValue::Number(number) => write!(f, "{number}"),
            JsonValue::String(text) => write_json_string(f, text),
            JsonValue::Array(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            JsonValue::Object(members) => {
                f.write_str("{")?;
                for (index, (key, value)) in members.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write_json_string(f, key)?;
                    write!(f, ":{value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Options for the JSON grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    /// Maximum depth of nested arrays and objects (default: 64)
    pub max_nesting_depth: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl JsonOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

// ============================================================================
// Grammar
// ============================================================================

fn ws() -> Parser<()> {
    take_while(
        "whitespace",
        |ch| matches!(ch, ' ' | '\t' | '\n' | '\r'),
        0,
    )
    .discard()
}

fn token(c: char) -> Parser<char> {
    char(c).skip(ws())
}

fn keyword(text: &'static str, value: JsonValue) -> Parser<JsonValue> {
    string(text).map(move |_| value.clone())
}

fn number() -> Parser<JsonValue> {
    let digits = |min_count| take_while("digit", |ch| ch.is_ascii_digit(), min_count);
    let leading = char_satisfying("digit", |ch| matches!(ch, '1'..='9'));
    let integer = char('0').discard().or_else(leading.then(digits(0)).discard());
    let fraction = char('.').then(digits(1)).optional();
    let exponent = tuple((char_in("eE"), char_in("+-").optional(), digits(1))).optional();
    tuple((char('-').optional(), integer, fraction, exponent))
        .skipped()
        .try_map(|text| match text.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(JsonValue::Number(number)),
            Ok(_) => Err(ParseError::generic(format!("number {text} is out of range"))),
            Err(_) => Err(ParseError::generic(format!("invalid number {text}"))),
        })
        .label("number")
}

fn hex4() -> Parser<u32> {
    repeat_count(hex_digit(), 4).map(|digits| {
        digits
            .iter()
            .filter_map(|digit| digit.to_digit(16))
            .fold(0, |acc, digit| acc * 16 + digit)
    })
}

/// `\uXXXX`, combining a surrogate pair into one character.
fn unicode_escape() -> Parser<char> {
    char('u').then(hex4()).flat_map(|high| {
        if (0xD800..0xDC00).contains(&high) {
            string("\\u").then(hex4()).try_map(move |low| {
                if !(0xDC00..0xE000).contains(&low) {
                    return Err(ParseError::generic("expected a low surrogate"));
                }
                let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                char::from_u32(code).ok_or_else(|| ParseError::generic("invalid surrogate pair"))
            })
        } else {
            just(high).try_map(|code| {
                char::from_u32(code).ok_or_else(|| ParseError::generic("unpaired low surrogate"))
            })
        }
    })
}

fn escape() -> Parser<char> {
    let simple = char_in("\"\\/bfnrt").map(|ch| match ch {
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        other => other,
    });
    char('\\').then(simple.or_else(unicode_escape()).label("escape sequence"))
}

fn string_literal() -> Parser<String> {
    let plain = char_satisfying("string character", |ch| {
        ch != '"' && ch != '\\' && u32::from(ch) >= 0x20
    });
    char('"')
        .then(many(plain.or_else(escape()), 0))
        .skip(char('"'))
        .map(|chars| chars.into_iter().collect())
        .label("string")
}

/// A JSON value with the default options.
pub fn json() -> Parser<JsonValue> {
    json_with(JsonOptions::default())
}

/// A JSON value surrounded by optional whitespace.
pub fn json_with(options: JsonOptions) -> Parser<JsonValue> {
    let max_depth = options.max_nesting_depth;
    let value = recursive(move |value: Parser<JsonValue>| {
        let array = token('[')
            .then(nested(
                max_depth,
                many_separated(value.clone(), token(','), false, 0),
            ))
            .skip(char(']'))
            .map(JsonValue::Array);
        let member = tuple((string_literal().skip(ws()), token(':'), value))
            .map(|(key, _, value)| (key, value));
        let object = token('{')
            .then(nested(max_depth, many_separated(member, token(','), false, 0)))
            .skip(char('}'))
            .map(JsonValue::Object);
        any([
            keyword("null", JsonValue::Null),
            keyword("true", JsonValue::Bool(true)),
            keyword("false", JsonValue::Bool(false)),
            number(),
            string_literal().map(JsonValue::String),
            array,
            object,
        ])
        .label("value")
        .skip(ws())
    });
    ws().then(value)
}

/// Parse a complete JSON document.
pub fn parse_json(input: &str) -> Result<JsonValue> {
    parse_json_with(input, JsonOptions::default())
}

pub fn parse_json_with(input: &str, options: JsonOptions) -> Result<JsonValue> {
    Builder::new()
        .require_end_of_stream(true)
        .build()
        .run(&json_with(options), input)
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

    fn s(text: &str) -> JsonValue {
        JsonValue::String(text.to_string())
    }

    // ============================================================
    // Section: Scalars
    // ============================================================

    test_cases! {
        test_keywords: {
            assert_eq!(parse_json("null"), Ok(JsonValue::Null));
            assert_eq!(parse_json(" true "), Ok(JsonValue::Bool(true)));
            assert_eq!(parse_json("false"), Ok(JsonValue::Bool(false)));
        },

        test_numbers: {
            assert_eq!(parse_json("0"), Ok(JsonValue::Number(0.0)));
            assert_eq!(parse_json("-12.5e1"), Ok(JsonValue::Number(-125.0)));
            assert_eq!(parse_json("1E-2"), Ok(JsonValue::Number(0.01)));
        },

        test_overflowing_number_is_rejected: {
            let err = parse_json("[1e999]").unwrap_err();
            assert_eq!(err.position, 6);
            assert!(err.errors.contains(&ParseError::generic("number 1e999 is out of range")));
        },

        test_leading_zero_is_rejected: {
            let err = parse_json("01").unwrap_err();
            assert_eq!(err.position, 1);
        },

        test_string_escapes: {
            assert_eq!(parse_json(r#""a\"b\\c\/\n""#), Ok(s("a\"b\\c/\n")));
            assert_eq!(parse_json(r#""\u00e9""#), Ok(s("é")));
            assert_eq!(parse_json(r#""\ud83d\ude00""#), Ok(s("😀")));
        },

        test_lone_surrogate_is_rejected: {
            assert!(parse_json(r#""\ud83d""#).is_err());
            assert!(parse_json(r#""\ude00""#).is_err());
        },

        test_bad_escape_is_labelled: {
            let err = parse_json(r#""\x""#).unwrap_err();
            assert_eq!(err.position, 2);
            assert_eq!(err.errors, vec![ParseError::expected("escape sequence")]);
        },

        test_control_characters_are_rejected: {
            assert!(parse_json("\"a\tb\"").is_err());
        },
    }

    // ============================================================
    // Section: Containers
    // ============================================================

    test_cases! {
        test_nested_document: {
            let doc = parse_json(r#"{ "a": [1, 2, {"b": null}], "c": "d" }"#).unwrap();
            assert_eq!(
                doc.get("a"),
                Some(&JsonValue::Array(vec![
                    JsonValue::Number(1.0),
                    JsonValue::Number(2.0),
                    JsonValue::Object(vec![("b".to_string(), JsonValue::Null)]),
                ]))
            );
            assert_eq!(doc.get("c").and_then(JsonValue::as_str), Some("d"));
        },

        test_empty_containers: {
            assert_eq!(parse_json("[ ]"), Ok(JsonValue::Array(vec![])));
            assert_eq!(parse_json("{}"), Ok(JsonValue::Object(vec![])));
        },

        test_trailing_comma_is_rejected: {
            let err = parse_json("[1,2,]").unwrap_err();
            assert_eq!(err.position, 5);
            assert_eq!(err.errors, vec![ParseError::expected("value")]);
        },

        test_missing_value_reports_alternatives: {
            let err = parse_json("").unwrap_err();
            assert_eq!(err.errors, vec![ParseError::expected("value")]);
        },

        test_missing_colon: {
            let err = parse_json(r#"{"a" 1}"#).unwrap_err();
            assert_eq!(err.position, 5);
            assert_eq!(
                err.errors,
                vec![ParseError::expected_string(":", CaseSensitivity::Sensitive)]
            );
        },

        test_depth_limit: {
            let options = JsonOptions::new().with_max_nesting_depth(3);
            assert!(parse_json_with("[[[1]]]", options).is_ok());
            let err = parse_json_with("[[[[1]]]]", options).unwrap_err();
            assert_eq!(err.position, 4);
            assert_eq!(
                err.errors,
                vec![ParseError::generic("maximum nesting depth 3 exceeded")]
            );
        },

        test_display_round_trip: {
            let text = r#"{"k":[true,null,"x\"y"],"n":1.5}"#;
            let value = parse_json(text).unwrap();
            assert_eq!(value.to_string(), text);
            assert_eq!(parse_json(&value.to_string()), Ok(value));
        },
    }
}
