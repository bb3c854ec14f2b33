// Repetition combinators.

use crate::combinators::{attempt, discard_first, optional};
use crate::parser::Parser;
use crate::reply::{ParserReply, ParserResult, merge_errors};
use tracing::error;

/// Apply `parser` exactly `count` times.
///
/// Repetition does not backtrack on its own: a failing iteration reports the
/// state it reached.
pub fn repeat_count<T: 'static>(parser: Parser<T>, count: usize) -> Parser<Vec<T>> {
    Parser::new(move |state| {
        let mut values = Vec::with_capacity(count);
        let mut errors = Vec::new();
        let mut current = state.clone();
        for _ in 0..count {
            let reply = parser.parse(&current);
            let progressed = reply.changed_from(&current);
            current = reply.state;
            match reply.result {
                ParserResult::Success { value, errors: step } => {
                    errors = merge_errors(errors, step, progressed);
                    values.push(value);
                }
                ParserResult::Failure { errors: step } => {
                    return ParserReply::failure(merge_errors(errors, step, progressed), current);
                }
            }
        }
        ParserReply::success(values, errors, current)
    })
}

/// Apply `first` once, then `repeating` until it fails without consuming.
///
/// At least `min_count` values (counting the one from `first`) must be
/// collected. A `repeating` failure after consuming input is final.
///
/// # Panics
///
/// Panics if `repeating` succeeds without changing state, which would
/// otherwise loop forever.
pub fn many_with<T: 'static>(
    first: Parser<T>,
    repeating: Parser<T>,
    min_count: usize,
) -> Parser<Vec<T>> {
    Parser::new(move |state| {
        let reply = first.parse(state);
        let (value, mut errors) = match reply.result {
            ParserResult::Success { value, errors } => (value, errors),
            ParserResult::Failure { errors } => return ParserReply::failure(errors, reply.state),
        };
        let mut values = vec![value];
        let mut current = reply.state;
        loop {
            let reply = repeating.parse(&current);
            let progressed = reply.changed_from(&current);
            match reply.result {
                ParserResult::Success { .. } if !progressed => {
                    let position = current.position();
                    error!(position, "repeated parser succeeded without consuming input");
                    panic!(
                        "infinite loop in `many`: the repeated parser succeeded without \
                         changing state at byte {position}"
                    );
                }
                ParserResult::Success { value, errors: step } => {
                    errors = merge_errors(errors, step, true);
                    values.push(value);
                    current = reply.state;
                }
                ParserResult::Failure { errors: step } if !progressed => {
                    let errors = merge_errors(errors, step, false);
                    return if values.len() >= min_count {
                        ParserReply::success(values, errors, current)
                    } else {
                        ParserReply::failure(errors, current)
                    };
                }
                ParserResult::Failure { errors: step } => {
                    return ParserReply::failure(step, reply.state);
                }
            }
        }
    })
}

/// Succeed with an empty list where `parser` fails without consuming.
fn or_empty<T: 'static>(parser: Parser<Vec<T>>) -> Parser<Vec<T>> {
    Parser::new(move |state| {
        let reply = parser.parse(state);
        if reply.is_success() || reply.changed_from(state) {
            return reply;
        }
        ParserReply::success(Vec::new(), reply.result.into_errors(), reply.state)
    })
}

/// Apply `parser` repeatedly, requiring at least `min_count` values.
///
/// # Panics
///
/// See [`many_with`].
pub fn many<T: 'static>(parser: Parser<T>, min_count: usize) -> Parser<Vec<T>> {
    let repeated = many_with(parser.clone(), parser, min_count);
    if min_count == 0 {
        or_empty(repeated)
    } else {
        repeated
    }
}

/// Apply `parser` repeatedly with `separator` between values.
///
/// With `allow_end_by_separator`, one trailing separator after the last value
/// is consumed; without it, a dangling separator is a hard failure.
///
/// ```
/// use parcomb::{char, digit, many_separated};
///
/// let list = many_separated(digit(), char(','), true, 1);
/// assert_eq!(list.run("1,2,"), Ok(vec!['1', '2']));
/// ```
pub fn many_separated<T: 'static, S: 'static>(
    parser: Parser<T>,
    separator: Parser<S>,
    allow_end_by_separator: bool,
    min_count: usize,
) -> Parser<Vec<T>> {
    let unit = discard_first(separator.clone(), parser.clone());
    let repeated = if allow_end_by_separator {
        many_with(parser, attempt(unit), min_count).skip(optional(separator))
    } else {
        many_with(parser, unit, min_count)
    };
    if min_count == 0 {
        or_empty(repeated)
    } else {
        repeated
    }
}

impl<T: 'static> Parser<T> {
    /// See [`many`].
    pub fn many(self, min_count: usize) -> Parser<Vec<T>> {
        many(self, min_count)
    }

    /// See [`many_separated`].
    pub fn separated_by<S: 'static>(
        self,
        separator: Parser<S>,
        allow_end_by_separator: bool,
        min_count: usize,
    ) -> Parser<Vec<T>> {
        many_separated(self, separator, allow_end_by_separator, min_count)
    }
}
