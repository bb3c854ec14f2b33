// The parser abstraction.
//
// A `Parser<T>` is a shared, immutable function from a state to a reply.
// Everything else in the crate is built by composing such functions. Parsers
// are cheap to clone (one `Arc` bump) and safe to share between threads.

use crate::context::Runner;
use crate::error::{ParseError, Result};
use crate::reply::{ParserReply, ParserResult, merge_errors};
use crate::state::ParserState;
use std::fmt;
use std::sync::Arc;

type ParseFn<T> = dyn Fn(&ParserState) -> ParserReply<T> + Send + Sync;

/// A composable parser producing values of type `T`.
pub struct Parser<T> {
    parse_fn: Arc<ParseFn<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            parse_fn: Arc::clone(&self.parse_fn),
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parser<{}>", std::any::type_name::<T>())
    }
}

impl<T: 'static> Parser<T> {
    /// Wrap a state-to-reply function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ParserState) -> ParserReply<T> + Send + Sync + 'static,
    {
        Self {
            parse_fn: Arc::new(f),
        }
    }

    /// Run this parser on a state.
    #[inline]
    pub fn parse(&self, state: &ParserState) -> ParserReply<T> {
        (self.parse_fn)(state)
    }

    /// Parse `input` from a fresh state with the default [`Runner`].
    ///
    /// Trailing input is left unconsumed; use a runner built with
    /// `require_end_of_stream(true)` to reject it.
    pub fn run(&self, input: &str) -> Result<T> {
        Runner::default().run(self, input)
    }

    /// Transform a successful value.
    pub fn map<U, F>(self, f: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Parser::new(move |state| self.parse(state).map(&f))
    }

    /// Transform a successful value with a validation step that may fail.
    ///
    /// A rejected value becomes a failure carrying the original errors plus
    /// the new one, at the state the wrapped parser reached.
    pub fn try_map<U, F>(self, f: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(T) -> std::result::Result<U, ParseError> + Send + Sync + 'static,
    {
        Parser::new(move |state| {
            let reply = self.parse(state);
            match reply.result {
                ParserResult::Success { value, mut errors } => match f(value) {
                    Ok(value) => ParserReply::success(value, errors, reply.state),
                    Err(error) => {
                        errors.push(error);
                        ParserReply::failure(errors, reply.state)
                    }
                },
                ParserResult::Failure { errors } => ParserReply::failure(errors, reply.state),
            }
        })
    }

    /// Transform a successful value together with the exact input it consumed.
    pub fn map_with_consumed<U, F>(self, f: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(T, &str) -> U + Send + Sync + 'static,
    {
        Parser::new(move |state| {
            let reply = self.parse(state);
            match reply.result {
                ParserResult::Success { value, errors } => {
                    let value = f(value, reply.state.consumed_since(state));
                    ParserReply::success(value, errors, reply.state)
                }
                ParserResult::Failure { errors } => ParserReply::failure(errors, reply.state),
            }
        })
    }

    /// Feed a successful value into `f` and run the parser it returns.
    ///
    /// Errors of the first step survive only if the second step made no
    /// progress past them.
    pub fn flat_map<U, F>(self, f: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(T) -> Parser<U> + Send + Sync + 'static,
    {
        Parser::new(move |state| {
            let first = self.parse(state);
            match first.result {
                ParserResult::Success { value, errors } => {
                    let second = f(value).parse(&first.state);
                    let progressed = second.changed_from(&first.state);
                    let ParserReply { result, state } = second;
                    let merged = merge_errors(errors, result.errors().to_vec(), progressed);
                    ParserReply {
                        result: result.with_errors(merged),
                        state,
                    }
                }
                ParserResult::Failure { errors } => ParserReply::failure(errors, first.state),
            }
        })
    }

    /// Name this rule for diagnostics.
    ///
    /// A failure without state change reports `[Expected(label)]` instead of
    /// the inner errors; anything else passes through untouched.
    pub fn label(self, label: impl Into<String>) -> Parser<T> {
        let label = label.into();
        Parser::new(move |state| {
            let reply = self.parse(state);
            if reply.is_success() || reply.changed_from(state) {
                reply
            } else {
                ParserReply::failure(vec![ParseError::Expected(label.clone())], reply.state)
            }
        })
    }

    /// Reject successful values that fail `predicate`.
    ///
    /// A rejection backtracks fully: it fails with `[Expected(label)]` at the
    /// state the parser started from.
    pub fn satisfying<F>(self, label: impl Into<String>, predicate: F) -> Parser<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let label = label.into();
        Parser::new(move |state| {
            let reply = self.parse(state);
            match &reply.result {
                ParserResult::Success { value, .. } if !predicate(value) => {
                    ParserReply::failure(vec![ParseError::Expected(label.clone())], state.clone())
                }
                _ => reply,
            }
        })
    }
}
