// parcomb: parser combinators over character streams
//
// A `Parser<T>` is an immutable function from a `ParserState` to a
// `ParserReply<T>`. Grammars are built by composing parsers; errors are
// values that are merged, relabelled and wrapped as the composition
// backtracks, and are rendered with line/column anchors only at the `run`
// boundary.

mod chars;
mod combinators;
mod constants;
mod context;
mod error;
mod format;
mod number;
mod parser;
mod position;
mod repeat;
mod reply;
mod state;
mod strings;

#[cfg(feature = "grammars")]
pub mod grammars;

pub use chars::{
    CharacterClass, alphanumeric, any_char, char, char_class, char_in, char_not_in,
    char_satisfying, digit, hex_digit, letter, newline, whitespace,
};
pub use combinators::{
    ParserTuple, alternative, any, attempt, attempt_labeled, discard_first, discard_second,
    end_of_stream, fail, fail_with, follow, follow_with, just, lazy, look_ahead, not, not_empty,
    not_with, one, optional, recursive, scoped_user_info, set_user_info, skipped, tuple,
    update_user_info, user_info,
};
pub use constants::{DEFAULT_INDENT_SIZE, DEFAULT_MAX_NESTING_DEPTH, END_OF_STREAM_LABEL};
pub use context::{Builder, Runner};
pub use error::{CaseSensitivity, ParseError, Result, RunError};
pub use format::{FormatConfig, IndentWriter, format_errors};
pub use number::{Notation, NumberLiteral, NumberOptions, Sign, integer, number_literal};
pub use parser::Parser;
pub use position::TextPosition;
pub use repeat::{many, many_separated, many_with, repeat_count};
pub use reply::{ParserReply, ParserResult, merge_errors};
pub use state::{ParserState, Stream, UserInfo, UserInfoKey};
pub use strings::{
    not_string, string, string_with, substring_until, take_while, whitespaces,
};
