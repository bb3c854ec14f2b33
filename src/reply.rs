// Parser results and replies.

use crate::error::ParseError;
use crate::state::ParserState;

/// Outcome of a single parser invocation.
///
/// The `errors` of a success are advisory: they describe alternatives that
/// were tried and did not prevent success, and only surface if an enclosing
/// combinator later discards the success.
#[derive(Clone, Debug, PartialEq)]
pub enum ParserResult<T> {
    Success { value: T, errors: Vec<ParseError> },
    Failure { errors: Vec<ParseError> },
}

impl<T> ParserResult<T> {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, ParserResult::Success { .. })
    }

    pub fn errors(&self) -> &[ParseError] {
        match self {
            ParserResult::Success { errors, .. } | ParserResult::Failure { errors } => errors,
        }
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        match self {
            ParserResult::Success { errors, .. } | ParserResult::Failure { errors } => errors,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ParserResult::Success { value, .. } => Some(value),
            ParserResult::Failure { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            ParserResult::Success { value, .. } => Some(value),
            ParserResult::Failure { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParserResult<U> {
        match self {
            ParserResult::Success { value, errors } => ParserResult::Success {
                value: f(value),
                errors,
            },
            ParserResult::Failure { errors } => ParserResult::Failure { errors },
        }
    }

    /// Replace the error list, keeping the result kind and value.
    #[must_use]
    pub fn with_errors(self, errors: Vec<ParseError>) -> Self {
        match self {
            ParserResult::Success { value, .. } => ParserResult::Success { value, errors },
            ParserResult::Failure { .. } => ParserResult::Failure { errors },
        }
    }
}

/// A result paired with the state reached after the attempt.
///
/// This is what every parser invocation returns.
#[derive(Clone, Debug, PartialEq)]
pub struct ParserReply<T> {
    pub result: ParserResult<T>,
    pub state: ParserState,
}

impl<T> ParserReply<T> {
    pub fn success(value: T, errors: Vec<ParseError>, state: ParserState) -> Self {
        Self {
            result: ParserResult::Success { value, errors },
            state,
        }
    }

    pub fn failure(errors: Vec<ParseError>, state: ParserState) -> Self {
        Self {
            result: ParserResult::Failure { errors },
            state,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }

    pub fn errors(&self) -> &[ParseError] {
        self.result.errors()
    }

    /// True if the reply's state differs from `start`.
    #[inline]
    pub fn changed_from(&self, start: &ParserState) -> bool {
        self.state != *start
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParserReply<U> {
        ParserReply {
            result: self.result.map(f),
            state: self.state,
        }
    }

    /// Replace the error list, keeping everything else.
    #[must_use]
    pub fn with_errors(self, errors: Vec<ParseError>) -> Self {
        Self {
            result: self.result.with_errors(errors),
            state: self.state,
        }
    }
}

/// Merge the errors of two consecutive attempts at the same logical point.
///
/// If the later attempt made no progress (`later_progressed == false`), both
/// describe the same input position and are concatenated, earlier first.
/// Otherwise the earlier errors are stale and only the later ones are kept.
pub fn merge_errors(
    mut earlier: Vec<ParseError>,
    later: Vec<ParseError>,
    later_progressed: bool,
) -> Vec<ParseError> {
    if later_progressed {
        later
    } else if earlier.is_empty() {
        later
    } else {
        earlier.extend(later);
        earlier
    }
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

    fn e(label: &str) -> ParseError {
        ParseError::expected(label)
    }

    test_cases! {
        test_merge_without_progress_appends: {
            let merged = merge_errors(vec![e("a")], vec![e("b")], false);
            assert_eq!(merged, vec![e("a"), e("b")]);
        },

        test_merge_with_progress_replaces: {
            let merged = merge_errors(vec![e("a")], vec![e("b")], true);
            assert_eq!(merged, vec![e("b")]);
        },

        test_result_accessors: {
            let ok: ParserResult<u8> = ParserResult::Success { value: 1, errors: vec![e("x")] };
            assert!(ok.is_success());
            assert_eq!(ok.value(), Some(&1));
            assert_eq!(ok.errors(), &[e("x")]);
            let failed: ParserResult<u8> = ParserResult::Failure { errors: vec![] };
            assert!(failed.into_value().is_none());
        },

        test_reply_changed_from: {
            let start = ParserState::new("ab");
            let stay = ParserReply::success((), vec![], start.clone());
            let moved = ParserReply::<()>::failure(vec![], start.advance(1));
            assert!(!stay.changed_from(&start));
            assert!(moved.changed_from(&start));
        },
    }
}
