// Bundled grammars
//
// Complete grammars written against the public combinator API only. They
// double as worked examples of the core: JSON exercises recursion and user
// info, CSV exercises separators and zero-width guards, the printf format
// grammar exercises ordered choice over literals, and property lists combine
// all of them with comment-aware whitespace.

pub mod csv;
pub mod format_spec;
pub mod json;
pub mod plist;

pub use csv::{CsvOptions, csv, parse_csv, parse_csv_with};
pub use format_spec::{
    Conversion, Count, FormatFlags, FormatSegment, FormatSpec, FormatSpecError, LengthModifier,
    format_spec, format_string, parse_format,
};
pub use json::{JsonOptions, JsonValue, json, json_with, parse_json, parse_json_with};
pub use plist::{PlistValue, parse_plist, plist};

use crate::combinators::{fail, scoped_user_info, user_info};
use crate::parser::Parser;
use crate::state::UserInfoKey;

/// Current nesting depth of the recursive grammars.
struct NestingDepth;

impl UserInfoKey for NestingDepth {
    type Value = usize;

    fn default_value() -> usize {
        0
    }
}

/// Run `body` one nesting level deeper, failing once `max_depth` is reached.
///
/// Call this after the opening delimiter has been consumed so the failure is
/// not swallowed by an enclosing choice.
pub(crate) fn nested<T: 'static>(max_depth: usize, body: Parser<T>) -> Parser<T> {
    user_info::<NestingDepth>().flat_map(move |depth| {
        if depth >= max_depth {
            fail(format!("maximum nesting depth {max_depth} exceeded"))
        } else {
            scoped_user_info::<NestingDepth, _>(depth + 1, body.clone())
        }
    })
}
