// printf-style format strings
//
// A format string is a sequence of literal text and conversion specifications
// of the form `%[flags][width][.precision][length]conversion`. Width and
// precision may be `*`, meaning they are taken from the argument list.

use crate::chars::{char, char_in};
use crate::combinators::{any, tuple};
use crate::context::Builder;
use crate::error::{ParseError, Result};
use crate::parser::Parser;
use crate::repeat::many;
use crate::strings::{string, take_while};

/// Errors raised while interpreting a conversion specification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatSpecError {
    #[error("field width {0} is out of range")]
    WidthOutOfRange(String),
    #[error("precision {0} is out of range")]
    PrecisionOutOfRange(String),
}

impl From<FormatSpecError> for ParseError {
    fn from(error: FormatSpecError) -> Self {
        ParseError::Generic(error.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    /// `-`
    pub left_align: bool,
    /// `+`
    pub plus_sign: bool,
    /// ` `
    pub space_sign: bool,
    /// `#`
    pub alternate: bool,
    /// `0`
    pub zero_pad: bool,
}

/// A width or precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Fixed(usize),
    /// `*`
    FromArgument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthModifier {
    /// `hh`
    Char,
    /// `h`
    Short,
    /// `l`
    Long,
    /// `ll`
    LongLong,
    /// `L`
    LongDouble,
    /// `j`
    IntMax,
    /// `z`
    Size,
    /// `t`
    PtrDiff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `d`, `i`
    SignedDecimal,
    /// `u`
    UnsignedDecimal,
    /// `o`
    Octal,
    /// `x`, `X`
    Hex { uppercase: bool },
    /// `f`, `F`
    Fixed { uppercase: bool },
    /// `e`, `E`
    Scientific { uppercase: bool },
    /// `g`, `G`
    General { uppercase: bool },
    /// `a`, `A`
    HexFloat { uppercase: bool },
    /// `c`
    Char,
    /// `s`
    String,
    /// `p`
    Pointer,
    /// `n`
    WrittenCount,
}

impl Conversion {
    const CHARACTERS: &'static str = "diuoxXfFeEgGaAcspn";

    fn from_char(ch: char) -> Option<Self> {
        let uppercase = ch.is_ascii_uppercase();
        Some(match ch {
            'd' | 'i' => Conversion::SignedDecimal,
            'u' => Conversion::UnsignedDecimal,
            'o' => Conversion::Octal,
            'x' | 'X' => Conversion::Hex { uppercase },
            'f' | 'F' => Conversion::Fixed { uppercase },
            'e' | 'E' => Conversion::Scientific { uppercase },
            'g' | 'G' => Conversion::General { uppercase },
            'a' | 'A' => Conversion::HexFloat { uppercase },
            'c' => Conversion::Char,
            's' => Conversion::String,
            'p' => Conversion::Pointer,
            'n' => Conversion::WrittenCount,
            _ => return None,
        })
    }

    /// True for conversions that consume an integer argument.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Conversion::SignedDecimal
                | Conversion::UnsignedDecimal
                | Conversion::Octal
                | Conversion::Hex { .. }
                | Conversion::Char
        )
    }

    /// True for conversions that consume a floating-point argument.
    pub fn is_float(self) -> bool {
        matches!(
            self,
            Conversion::Fixed { .. }
                | Conversion::Scientific { .. }
                | Conversion::General { .. }
                | Conversion::HexFloat { .. }
        )
    }
}

/// One `%...` conversion specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: Option<Count>,
    /// A bare `.` is a precision of zero.
    pub precision: Option<Count>,
    pub length: Option<LengthModifier>,
    pub conversion: Conversion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSegment {
    /// Text copied as is; `%%` is unescaped to `%`.
    Literal(String),
    Spec(FormatSpec),
}

// ============================================================================
// Grammar
// ============================================================================

fn flags() -> Parser<FormatFlags> {
    many(char_in("-+ #0"), 0).map(|chars| {
        let mut flags = FormatFlags::default();
        for ch in chars {
            match ch {
                '-' => flags.left_align = true,
                '+' => flags.plus_sign = true,
                ' ' => flags.space_sign = true,
                '#' => flags.alternate = true,
                _ => flags.zero_pad = true,
            }
        }
        flags
    })
}

fn count<E>(out_of_range: E) -> Parser<Count>
where
    E: Fn(String) -> FormatSpecError + Send + Sync + 'static,
{
    let fixed = take_while("digit", |ch| ch.is_ascii_digit(), 1).try_map(move |digits| {
        digits
            .parse::<usize>()
            .map(Count::Fixed)
            .map_err(|_| out_of_range(digits).into())
    });
    char('*').map(|_| Count::FromArgument).or_else(fixed)
}

fn length_modifier() -> Parser<LengthModifier> {
    let modifier = |text: &str, value| string(text).map(move |_| value);
    any([
        modifier("hh", LengthModifier::Char),
        modifier("h", LengthModifier::Short),
        modifier("ll", LengthModifier::LongLong),
        modifier("l", LengthModifier::Long),
        modifier("L", LengthModifier::LongDouble),
        modifier("j", LengthModifier::IntMax),
        modifier("z", LengthModifier::Size),
        modifier("t", LengthModifier::PtrDiff),
    ])
}

fn conversion() -> Parser<Conversion> {
    char_in(Conversion::CHARACTERS)
        .try_map(|ch| {
            Conversion::from_char(ch)
                .ok_or_else(|| ParseError::generic(format!("unknown conversion {ch:?}")))
        })
        .label("conversion specifier")
}

/// A single `%...` specification, `%%` excluded.
pub fn format_spec() -> Parser<FormatSpec> {
    let width = count(FormatSpecError::WidthOutOfRange).optional();
    let precision = char('.')
        .then(count(FormatSpecError::PrecisionOutOfRange).optional())
        .map(|count| count.unwrap_or(Count::Fixed(0)))
        .optional();
    char('%')
        .then(tuple((
            flags(),
            width,
            precision,
            length_modifier().optional(),
            conversion(),
        )))
        .map(|(flags, width, precision, length, conversion)| FormatSpec {
            flags,
            width,
            precision,
            length,
            conversion,
        })
}

fn segment() -> Parser<FormatSegment> {
    any([
        string("%%").map(|_| FormatSegment::Literal("%".to_string())),
        format_spec().map(FormatSegment::Spec),
        take_while("literal text", |ch| ch != '%', 1).map(FormatSegment::Literal),
    ])
}

/// Join adjacent literal segments.
fn coalesce(segments: Vec<FormatSegment>) -> Vec<FormatSegment> {
    let mut joined: Vec<FormatSegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        if let (Some(FormatSegment::Literal(previous)), FormatSegment::Literal(text)) =
            (joined.last_mut(), &segment)
        {
            previous.push_str(text);
            continue;
        }
        joined.push(segment);
    }
    joined
}

/// A whole format string.
pub fn format_string() -> Parser<Vec<FormatSegment>> {
    many(segment(), 0).map(coalesce)
}

/// Parse a complete format string.
pub fn parse_format(input: &str) -> Result<Vec<FormatSegment>> {
    Builder::new()
        .require_end_of_stream(true)
        .build()
        .run(&format_string(), input)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn literal(text: &str) -> FormatSegment {
        FormatSegment::Literal(text.to_string())
    }

    fn only_spec(input: &str) -> FormatSpec {
        match parse_format(input).unwrap().as_slice() {
            [FormatSegment::Spec(spec)] => *spec,
            other => panic!("expected a single spec, got {other:?}"),
        }
    }

    test_cases! {
        test_literals_and_percent: {
            assert_eq!(parse_format("100%% done"), Ok(vec![literal("100% done")]));
            assert_eq!(parse_format(""), Ok(vec![]));
        },

        test_simple_spec: {
            let spec = only_spec("%d");
            assert_eq!(spec.conversion, Conversion::SignedDecimal);
            assert_eq!(spec.flags, FormatFlags::default());
            assert_eq!(spec.width, None);
            assert!(spec.conversion.is_integer());
        },

        test_full_spec: {
            let spec = only_spec("%-+08.3llx");
            assert!(spec.flags.left_align && spec.flags.plus_sign && spec.flags.zero_pad);
            assert_eq!(spec.width, Some(Count::Fixed(8)));
            assert_eq!(spec.precision, Some(Count::Fixed(3)));
            assert_eq!(spec.length, Some(LengthModifier::LongLong));
            assert_eq!(spec.conversion, Conversion::Hex { uppercase: false });
        },

        test_star_and_bare_precision: {
            let spec = only_spec("%*.*f");
            assert_eq!(spec.width, Some(Count::FromArgument));
            assert_eq!(spec.precision, Some(Count::FromArgument));
            assert!(spec.conversion.is_float());
            assert_eq!(only_spec("%.E").precision, Some(Count::Fixed(0)));
        },

        test_mixed_segments: {
            let segments = parse_format("x=%5.2f, name=%s\n").unwrap();
            assert_eq!(segments.len(), 5);
            assert_eq!(segments[0], literal("x="));
            assert_eq!(segments[2], literal(", name="));
            assert_eq!(segments[4], literal("\n"));
        },

        test_missing_conversion: {
            let err = parse_format("abc %").unwrap_err();
            assert_eq!(err.position, 5);
            assert!(err.errors.contains(&ParseError::expected("conversion specifier")));
        },

        test_width_out_of_range: {
            let err = parse_format("%99999999999999999999999d").unwrap_err();
            assert_eq!(
                err.errors.last(),
                Some(&ParseError::generic("field width 99999999999999999999999 is out of range"))
            );
        },
    }
}
