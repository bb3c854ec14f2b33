// Numeric literal parser.
//
// Recognizes signed decimal literals with optional fraction and exponent, and
// prefixed hexadecimal (`0x`), octal (`0o`) and binary (`0b`) integers. The
// literal keeps its digits as written; conversion to a machine number is left
// to `integer_value` / `float_value`.

use crate::chars::{CharacterClass, char, char_in};
use crate::combinators::{any, just, tuple};
use crate::error::{CaseSensitivity, ParseError};
use crate::parser::Parser;
use crate::strings::{string_with, take_while};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Sign {
    /// No sign was written.
    #[default]
    Unsigned,
    Plus,
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notation {
    Decimal,
    Hexadecimal,
    Octal,
    Binary,
}

impl Notation {
    pub fn radix(self) -> u32 {
        match self {
            Notation::Decimal => 10,
            Notation::Hexadecimal => 16,
            Notation::Octal => 8,
            Notation::Binary => 2,
        }
    }

    fn digit_class(self) -> CharacterClass {
        match self {
            Notation::Decimal => CharacterClass::Digit,
            Notation::Hexadecimal => CharacterClass::HexDigit,
            Notation::Octal => CharacterClass::OctalDigit,
            Notation::Binary => CharacterClass::BinaryDigit,
        }
    }
}

/// A numeric literal as written in the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberLiteral {
    pub sign: Sign,
    pub notation: Notation,
    /// Digits before the fraction, without prefix.
    pub integer_part: String,
    /// Digits after the `.`, decimal only.
    pub fraction_part: Option<String>,
    /// Exponent digits with an optional leading `-`, decimal only.
    pub exponent: Option<String>,
}

impl NumberLiteral {
    pub fn is_integer(&self) -> bool {
        self.fraction_part.is_none() && self.exponent.is_none()
    }

    /// The value as an `i64`, if the literal is an integer that fits.
    pub fn integer_value(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        let magnitude = i128::from_str_radix(&self.integer_part, self.notation.radix()).ok()?;
        let value = match self.sign {
            Sign::Minus => -magnitude,
            Sign::Unsigned | Sign::Plus => magnitude,
        };
        i64::try_from(value).ok()
    }

    /// The value as an `f64`, rounding as needed.
    pub fn float_value(&self) -> f64 {
        let magnitude = match self.notation {
            Notation::Decimal => {
                let mut text = self.integer_part.clone();
                if let Some(fraction) = &self.fraction_part {
                    text.push('.');
                    text.push_str(fraction);
                }
                if let Some(exponent) = &self.exponent {
                    text.push('e');
                    text.push_str(exponent);
                }
                text.parse::<f64>().unwrap_or(f64::INFINITY)
            }
            notation => {
                let radix = f64::from(notation.radix());
                self.integer_part
                    .chars()
                    .filter_map(|ch| ch.to_digit(notation.radix()))
                    .fold(0.0, |acc, digit| acc * radix + f64::from(digit))
            }
        };
        match self.sign {
            Sign::Minus => -magnitude,
            Sign::Unsigned | Sign::Plus => magnitude,
        }
    }
}

/// Which literal forms [`number_literal`] accepts.
///
/// The default accepts signed decimal numbers with fraction and exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberOptions {
    pub allow_sign: bool,
    pub allow_hex: bool,
    pub allow_octal: bool,
    pub allow_binary: bool,
    pub allow_fraction: bool,
    pub allow_exponent: bool,
}

impl Default for NumberOptions {
    fn default() -> Self {
        Self {
            allow_sign: true,
            allow_hex: false,
            allow_octal: false,
            allow_binary: false,
            allow_fraction: true,
            allow_exponent: true,
        }
    }
}

impl NumberOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signed decimal integers only.
    pub fn integer() -> Self {
        Self::default().with_fraction(false).with_exponent(false)
    }

    pub fn with_sign(mut self, allow: bool) -> Self {
        self.allow_sign = allow;
        self
    }

    pub fn with_hex(mut self, allow: bool) -> Self {
        self.allow_hex = allow;
        self
    }

    pub fn with_octal(mut self, allow: bool) -> Self {
        self.allow_octal = allow;
        self
    }

    pub fn with_binary(mut self, allow: bool) -> Self {
        self.allow_binary = allow;
        self
    }

    pub fn with_fraction(mut self, allow: bool) -> Self {
        self.allow_fraction = allow;
        self
    }

    pub fn with_exponent(mut self, allow: bool) -> Self {
        self.allow_exponent = allow;
        self
    }
}

/// Notation, integer digits, fraction digits, exponent.
type Body = (Notation, String, Option<String>, Option<String>);

fn digits(notation: Notation) -> Parser<String> {
    let class = notation.digit_class();
    take_while(class.label(), move |ch| class.matches(ch), 1)
}

/// `prefix` followed by at least one digit; backtracks if the digits are missing.
fn prefixed(prefix: &str, notation: Notation) -> Parser<Body> {
    string_with(prefix, CaseSensitivity::Insensitive)
        .then(digits(notation))
        .map(move |digits| (notation, digits, None, None))
        .attempt()
}

fn sign_prefix() -> Parser<Sign> {
    char_in("+-")
        .map(|ch| if ch == '-' { Sign::Minus } else { Sign::Plus })
        .optional()
        .map(Option::unwrap_or_default)
}

/// Parse a numeric literal, labelled `number`.
pub fn number_literal(options: NumberOptions) -> Parser<NumberLiteral> {
    let mut radixes = Vec::new();
    if options.allow_hex {
        radixes.push(prefixed("0x", Notation::Hexadecimal));
    }
    if options.allow_octal {
        radixes.push(prefixed("0o", Notation::Octal));
    }
    if options.allow_binary {
        radixes.push(prefixed("0b", Notation::Binary));
    }

    let fraction = if options.allow_fraction {
        char('.').then(digits(Notation::Decimal)).attempt().optional()
    } else {
        just(None)
    };
    let exponent = if options.allow_exponent {
        let exponent_sign = char_in("+-").optional();
        tuple((char_in("eE"), exponent_sign, digits(Notation::Decimal)))
            .map(|(_, sign, digits)| match sign {
                Some('-') => format!("-{digits}"),
                _ => digits,
            })
            .attempt()
            .optional()
    } else {
        just(None)
    };
    let decimal = tuple((digits(Notation::Decimal), fraction, exponent)).map(
        |(integer_part, fraction_part, exponent)| {
            (Notation::Decimal, integer_part, fraction_part, exponent)
        },
    );
    radixes.push(decimal);

    let sign = if options.allow_sign {
        sign_prefix()
    } else {
        just(Sign::Unsigned)
    };
    tuple((sign, any(radixes)))
        .map(
            |(sign, (notation, integer_part, fraction_part, exponent))| NumberLiteral {
                sign,
                notation,
                integer_part,
                fraction_part,
                exponent,
            },
        )
        .label("number")
}

/// A signed decimal integer that fits in an `i64`.
pub fn integer() -> Parser<i64> {
    number_literal(NumberOptions::integer())
        .try_map(|literal| {
            literal
                .integer_value()
                .ok_or_else(|| ParseError::generic("integer literal out of range"))
        })
        .label("integer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ParserState;

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

    fn all_forms() -> NumberOptions {
        NumberOptions::new()
            .with_hex(true)
            .with_octal(true)
            .with_binary(true)
    }

    fn literal(input: &str, options: NumberOptions) -> NumberLiteral {
        number_literal(options).run(input).unwrap()
    }

    // ============================================================
    // Section: Decimal
    // ============================================================

    test_cases! {
        test_plain_integer: {
            let lit = literal("123", NumberOptions::integer());
            assert_eq!(lit.integer_value(), Some(123));
            assert_eq!(lit.sign, Sign::Unsigned);
            assert_eq!(lit.notation, Notation::Decimal);
        },

        test_fraction_and_exponent: {
            let lit = literal("-1.25e+2", NumberOptions::new());
            assert_eq!(lit.sign, Sign::Minus);
            assert_eq!(lit.fraction_part.as_deref(), Some("25"));
            assert_eq!(lit.exponent.as_deref(), Some("2"));
            assert_eq!(lit.float_value(), -125.0);
            assert_eq!(lit.integer_value(), None);
        },

        test_negative_exponent: {
            let lit = literal("5e-1", NumberOptions::new());
            assert_eq!(lit.exponent.as_deref(), Some("-1"));
            assert_eq!(lit.float_value(), 0.5);
        },

        test_dangling_dot_is_not_consumed: {
            let reply = number_literal(NumberOptions::new()).parse(&ParserState::new("7."));
            assert_eq!(reply.state.remaining(), ".");
            assert_eq!(reply.result.into_value().and_then(|lit| lit.integer_value()), Some(7));
        },

        test_sign_disabled: {
            assert!(number_literal(NumberOptions::integer().with_sign(false)).run("-1").is_err());
        },
    }

    // ============================================================
    // Section: Prefixed
    // ============================================================

    test_cases! {
        test_negative_hex: {
            let lit = literal("-0x1A", all_forms());
            assert_eq!(lit.sign, Sign::Minus);
            assert_eq!(lit.notation, Notation::Hexadecimal);
            assert_eq!(lit.integer_part, "1A");
            assert_eq!(lit.integer_value(), Some(-26));
            assert_eq!(lit.float_value(), -26.0);
        },

        test_prefix_case_insensitive: {
            assert_eq!(literal("0O17", all_forms()).integer_value(), Some(15));
            assert_eq!(literal("0B101", all_forms()).integer_value(), Some(5));
        },

        test_prefix_without_digits_is_zero: {
            let reply = number_literal(all_forms()).parse(&ParserState::new("0xg"));
            let lit = reply.result.into_value().unwrap();
            assert_eq!(lit.notation, Notation::Decimal);
            assert_eq!(lit.integer_value(), Some(0));
            assert_eq!(reply.state.remaining(), "xg");
        },

        test_label_on_no_input: {
            let reply = number_literal(all_forms()).parse(&ParserState::new("xyz"));
            assert_eq!(reply.errors(), &[ParseError::expected("number")]);
        },
    }

    // ============================================================
    // Section: Integer
    // ============================================================

    test_cases! {
        test_integer_bounds: {
            assert_eq!(integer().run("-9223372036854775808"), Ok(i64::MIN));
            let err = integer().run("9223372036854775808").unwrap_err();
            assert_eq!(err.errors, vec![ParseError::generic("integer literal out of range")]);
        },
    }
}
