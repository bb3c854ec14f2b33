// Primitive combinators.
//
// Ordered choice follows the "no backtracking past consumed input" rule: once
// an alternative has changed the state, its reply is final. `attempt` and
// `look_ahead` are the only ways to undo that, and both record where the
// abandoned branch actually failed through `ParseError::Nested`.

use crate::constants::END_OF_STREAM_LABEL;
use crate::error::ParseError;
use crate::parser::Parser;
use crate::reply::{ParserReply, ParserResult, merge_errors};
use crate::state::{ParserState, UserInfoKey};
use std::sync::{Arc, OnceLock};
use tracing::trace;

// ============================================================================
// Constant Parsers
// ============================================================================

/// Always succeed with `value`, consuming nothing.
pub fn just<T>(value: T) -> Parser<T>
where
    T: Clone + Send + Sync + 'static,
{
    Parser::new(move |state| ParserReply::success(value.clone(), Vec::new(), state.clone()))
}

/// Always fail with `[Generic(message)]`, consuming nothing.
pub fn fail<T: 'static>(message: impl Into<String>) -> Parser<T> {
    let message = message.into();
    Parser::new(move |state| {
        ParserReply::failure(vec![ParseError::Generic(message.clone())], state.clone())
    })
}

/// Always fail with the given error, consuming nothing.
pub fn fail_with<T: 'static>(error: ParseError) -> Parser<T> {
    Parser::new(move |state| ParserReply::failure(vec![error.clone()], state.clone()))
}

// ============================================================================
// Sequencing
// ============================================================================

/// Threads state and merged errors through consecutive steps.
///
/// Folding steps this way is equivalent to nesting `flat_map`s: each step's
/// errors are merged with the running set only if the step made no progress.
struct Sequence {
    state: ParserState,
    errors: Vec<ParseError>,
}

impl Sequence {
    fn new(state: &ParserState) -> Self {
        Self {
            state: state.clone(),
            errors: Vec::new(),
        }
    }

    /// Run one step. Returns `None` on failure, leaving the failure recorded.
    fn step<T: 'static>(&mut self, parser: &Parser<T>) -> Option<T> {
        let reply = parser.parse(&self.state);
        let progressed = reply.changed_from(&self.state);
        self.state = reply.state;
        match reply.result {
            ParserResult::Success { value, errors } => {
                self.errors = merge_errors(std::mem::take(&mut self.errors), errors, progressed);
                Some(value)
            }
            ParserResult::Failure { errors } => {
                self.errors = merge_errors(std::mem::take(&mut self.errors), errors, progressed);
                None
            }
        }
    }

    fn fail<T>(self) -> ParserReply<T> {
        ParserReply::failure(self.errors, self.state)
    }

    fn finish<T>(self, value: T) -> ParserReply<T> {
        ParserReply::success(value, self.errors, self.state)
    }
}

/// A tuple of parsers that can run in strict sequence.
///
/// Implemented for tuples of two to five parsers.
pub trait ParserTuple {
    type Output;

    fn sequence(self) -> Parser<Self::Output>;
}

macro_rules! impl_parser_tuple {
    ($($name:ident : $ty:ident),+) => {
        impl<$($ty: 'static),+> ParserTuple for ($(Parser<$ty>,)+) {
            type Output = ($($ty,)+);

            fn sequence(self) -> Parser<Self::Output> {
                let ($($name,)+) = self;
                Parser::new(move |state| {
                    let mut seq = Sequence::new(state);
                    $(
                        let Some($name) = seq.step(&$name) else {
                            return seq.fail();
                        };
                    )+
                    seq.finish(($($name,)+))
                })
            }
        }
    };
}

impl_parser_tuple!(a: A, b: B);
impl_parser_tuple!(a: A, b: B, c: C);
impl_parser_tuple!(a: A, b: B, c: C, d: D);
impl_parser_tuple!(a: A, b: B, c: C, d: D, e: E);

/// Run parsers in sequence and collect all values.
///
/// ```
/// use parcomb::{char, tuple};
///
/// let pair = tuple((char('a'), char('b')));
/// assert_eq!(pair.run("ab"), Ok(('a', 'b')));
/// ```
pub fn tuple<P: ParserTuple>(parsers: P) -> Parser<P::Output> {
    parsers.sequence()
}

/// Run `first` then `second`, keeping the second value.
pub fn discard_first<T: 'static, U: 'static>(first: Parser<T>, second: Parser<U>) -> Parser<U> {
    Parser::new(move |state| {
        let mut seq = Sequence::new(state);
        if seq.step(&first).is_none() {
            return seq.fail();
        }
        match seq.step(&second) {
            Some(value) => seq.finish(value),
            None => seq.fail(),
        }
    })
}

/// Run `first` then `second`, keeping the first value.
pub fn discard_second<T: 'static, U: 'static>(first: Parser<T>, second: Parser<U>) -> Parser<T> {
    Parser::new(move |state| {
        let mut seq = Sequence::new(state);
        let Some(value) = seq.step(&first) else {
            return seq.fail();
        };
        match seq.step(&second) {
            Some(_) => seq.finish(value),
            None => seq.fail(),
        }
    })
}

// ============================================================================
// Choice
// ============================================================================

/// Ordered choice.
///
/// `rhs` runs only if `lhs` failed without changing state; `lhs`'s errors are
/// then prepended to `rhs`'s when `rhs` also made no progress.
pub fn alternative<T: 'static>(lhs: Parser<T>, rhs: Parser<T>) -> Parser<T> {
    Parser::new(move |state| {
        let first = lhs.parse(state);
        if first.is_success() || first.changed_from(state) {
            return first;
        }
        let second = rhs.parse(state);
        let progressed = second.changed_from(state);
        let errors = merge_errors(
            first.result.into_errors(),
            second.errors().to_vec(),
            progressed,
        );
        second.with_errors(errors)
    })
}

/// N-ary ordered choice, equivalent to chaining [`alternative`].
///
/// An empty list fails with no errors.
pub fn any<T: 'static>(parsers: impl IntoIterator<Item = Parser<T>>) -> Parser<T> {
    let parsers: Vec<Parser<T>> = parsers.into_iter().collect();
    Parser::new(move |state| {
        let mut errors = Vec::new();
        for parser in &parsers {
            let reply = parser.parse(state);
            let progressed = reply.changed_from(state);
            if reply.is_success() || progressed {
                let merged = merge_errors(errors, reply.errors().to_vec(), progressed);
                return reply.with_errors(merged);
            }
            errors.extend(reply.result.into_errors());
        }
        ParserReply::failure(errors, state.clone())
    })
}

/// Succeed with `None` if `parser` fails without consuming input.
///
/// A failure after consuming input is propagated.
pub fn optional<T: 'static>(parser: Parser<T>) -> Parser<Option<T>> {
    Parser::new(move |state| {
        let reply = parser.parse(state);
        if reply.is_success() || reply.changed_from(state) {
            return reply.map(Some);
        }
        ParserReply::success(None, reply.result.into_errors(), reply.state)
    })
}

/// Succeed only if `parser` succeeded and changed state.
///
/// A zero-width success becomes a failure carrying its advisory errors.
pub fn not_empty<T: 'static>(parser: Parser<T>) -> Parser<T> {
    Parser::new(move |state| {
        let reply = parser.parse(state);
        if reply.is_success() && !reply.changed_from(state) {
            return ParserReply::failure(reply.result.into_errors(), state.clone());
        }
        reply
    })
}

/// Equivalent to [`Parser::label`].
pub fn one<T: 'static>(parser: Parser<T>, label: impl Into<String>) -> Parser<T> {
    parser.label(label)
}

// ============================================================================
// Backtracking
// ============================================================================

/// Wrap the errors of an abandoned branch, never nesting `Nested` twice.
fn nest_errors(position: usize, errors: Vec<ParseError>) -> Vec<ParseError> {
    match errors.as_slice() {
        [ParseError::Nested { .. }] => errors,
        _ => vec![ParseError::Nested { position, errors }],
    }
}

/// Full backtracking.
///
/// A failure after consuming input is reset to the starting state and its
/// errors are wrapped in `Nested` at the position where it actually failed.
pub fn attempt<T: 'static>(parser: Parser<T>) -> Parser<T> {
    Parser::new(move |state| {
        let reply = parser.parse(state);
        if reply.is_success() || !reply.changed_from(state) {
            return reply;
        }
        let position = reply.state.position();
        trace!(from = state.position(), failed_at = position, "attempt backtracked");
        ParserReply::failure(nest_errors(position, reply.result.into_errors()), state.clone())
    })
}

/// Labelled backtracking.
///
/// Behaves like [`Parser::label`] unless `parser` fails after consuming
/// input; then it backtracks and reports `Compound(label, position, errors)`.
pub fn attempt_labeled<T: 'static>(parser: Parser<T>, label: impl Into<String>) -> Parser<T> {
    let label = label.into();
    Parser::new(move |state| {
        let reply = parser.parse(state);
        if reply.is_success() {
            return reply;
        }
        if !reply.changed_from(state) {
            return ParserReply::failure(vec![ParseError::Expected(label.clone())], reply.state);
        }
        let failed_at = reply.state.position();
        trace!(from = state.position(), failed_at, %label, "labelled attempt backtracked");
        let (position, errors) = unwrap_backtracked(reply.result.into_errors(), failed_at);
        let compound = ParseError::Compound {
            label: label.clone(),
            position,
            errors,
        };
        ParserReply::failure(vec![compound], state.clone())
    })
}

/// Take a single `Nested`/`Compound` apart, or pair `errors` with `failed_at`.
fn unwrap_backtracked(mut errors: Vec<ParseError>, failed_at: usize) -> (usize, Vec<ParseError>) {
    if errors.len() == 1 {
        match errors.pop() {
            Some(ParseError::Nested { position, errors })
            | Some(ParseError::Compound {
                position, errors, ..
            }) => return (position, errors),
            Some(other) => errors.push(other),
            None => {}
        }
    }
    (failed_at, errors)
}

/// Test `parser` without consuming input.
///
/// A success is "free": the state is reset and its errors are dropped. A
/// failure after consuming input is reset and wrapped like [`attempt`].
pub fn look_ahead<T: 'static>(parser: Parser<T>) -> Parser<T> {
    Parser::new(move |state| {
        let reply = parser.parse(state);
        let progressed = reply.changed_from(state);
        match reply.result {
            ParserResult::Success { value, .. } => {
                ParserReply::success(value, Vec::new(), state.clone())
            }
            ParserResult::Failure { errors } if !progressed => {
                ParserReply::failure(errors, reply.state)
            }
            ParserResult::Failure { errors } => {
                let position = reply.state.position();
                trace!(from = state.position(), failed_at = position, "look-ahead backtracked");
                ParserReply::failure(nest_errors(position, errors), state.clone())
            }
        }
    })
}

// ============================================================================
// Zero-Width Assertions
// ============================================================================

/// Succeed iff the input is exhausted.
pub fn end_of_stream() -> Parser<()> {
    Parser::new(|state| {
        if state.stream().is_empty() {
            ParserReply::success((), Vec::new(), state.clone())
        } else {
            ParserReply::failure(vec![ParseError::expected(END_OF_STREAM_LABEL)], state.clone())
        }
    })
}

/// Succeed iff `parser` would succeed here; fail with `[Expected(label)]`.
pub fn follow<T: 'static>(parser: Parser<T>, label: impl Into<String>) -> Parser<()> {
    follow_with(parser, ParseError::Expected(label.into()))
}

/// Succeed iff `parser` would succeed here; fail with `error` otherwise.
pub fn follow_with<T: 'static>(parser: Parser<T>, error: ParseError) -> Parser<()> {
    Parser::new(move |state| {
        if parser.parse(state).is_success() {
            ParserReply::success((), Vec::new(), state.clone())
        } else {
            ParserReply::failure(vec![error.clone()], state.clone())
        }
    })
}

/// Succeed iff `parser` would fail here; fail with `[Unexpected(label)]`.
pub fn not<T: 'static>(parser: Parser<T>, label: impl Into<String>) -> Parser<()> {
    not_with(parser, ParseError::Unexpected(label.into()))
}

/// Succeed iff `parser` would fail here; fail with `error` otherwise.
pub fn not_with<T: 'static>(parser: Parser<T>, error: ParseError) -> Parser<()> {
    Parser::new(move |state| {
        if parser.parse(state).is_success() {
            ParserReply::failure(vec![error.clone()], state.clone())
        } else {
            ParserReply::success((), Vec::new(), state.clone())
        }
    })
}

/// Run `parser` and return the exact text it consumed.
pub fn skipped<T: 'static>(parser: Parser<T>) -> Parser<String> {
    parser.map_with_consumed(|_, text| text.to_string())
}

// ============================================================================
// Recursion
// ============================================================================

/// Build a parser on first use and reuse it afterwards.
pub fn lazy<T, F>(build: F) -> Parser<T>
where
    T: 'static,
    F: Fn() -> Parser<T> + Send + Sync + 'static,
{
    let cell: OnceLock<Parser<T>> = OnceLock::new();
    Parser::new(move |state| cell.get_or_init(&build).parse(state))
}

/// Define a self-referential parser.
///
/// `define` receives a handle to the parser being defined. The handle only
/// holds a weak reference, so the finished grammar contains no `Arc` cycle.
///
/// ```
/// use parcomb::{Parser, char, recursive};
///
/// // nested parentheses: "()", "(())", ...
/// let parens: Parser<usize> = recursive(|this| {
///     char('(')
///         .then(this.optional())
///         .skip(char(')'))
///         .map(|inner| inner.map_or(1, |depth| depth + 1))
/// });
/// assert_eq!(parens.run("((()))"), Ok(3));
/// ```
pub fn recursive<T, F>(define: F) -> Parser<T>
where
    T: 'static,
    F: FnOnce(Parser<T>) -> Parser<T>,
{
    let cell: Arc<OnceLock<Parser<T>>> = Arc::new(OnceLock::new());
    let weak = Arc::downgrade(&cell);
    let handle = Parser::new(move |state| {
        let Some(cell) = weak.upgrade() else {
            panic!("recursive parser used after its definition was dropped");
        };
        let Some(parser) = cell.get() else {
            panic!("recursive parser used before its definition completed");
        };
        parser.parse(state)
    });
    let defined = define(handle);
    // `cell` is fresh and the handle only reads it, so this is the one set
    if cell.set(defined).is_err() {
        unreachable!("recursive parser defined twice");
    }
    Parser::new(move |state| match cell.get() {
        Some(parser) => parser.parse(state),
        None => unreachable!("recursive parser is set before it is returned"),
    })
}

// ============================================================================
// User Info
// ============================================================================

/// Read a user-info value without consuming input.
pub fn user_info<K: UserInfoKey>() -> Parser<K::Value> {
    Parser::new(|state| ParserReply::success(state.user_info::<K>(), Vec::new(), state.clone()))
}

/// Set a user-info value. Counts as a state change unless the value is
/// already in place.
pub fn set_user_info<K: UserInfoKey>(value: K::Value) -> Parser<()> {
    Parser::new(move |state| {
        ParserReply::success((), Vec::new(), state.with_user_info::<K>(value.clone()))
    })
}

/// Replace a user-info value with `f(current)`.
pub fn update_user_info<K, F>(f: F) -> Parser<()>
where
    K: UserInfoKey,
    F: Fn(K::Value) -> K::Value + Send + Sync + 'static,
{
    Parser::new(move |state| {
        let value = f(state.user_info::<K>());
        ParserReply::success((), Vec::new(), state.with_user_info::<K>(value))
    })
}

/// Run `parser` with a user-info value set, restoring the previous value in
/// the resulting state.
pub fn scoped_user_info<K, T>(value: K::Value, parser: Parser<T>) -> Parser<T>
where
    K: UserInfoKey,
    T: 'static,
{
    Parser::new(move |state| {
        let previous = state.user_info::<K>();
        let inner = state.with_user_info::<K>(value.clone());
        let reply = parser.parse(&inner);
        ParserReply {
            state: reply.state.with_user_info::<K>(previous),
            result: reply.result,
        }
    })
}

// ============================================================================
// Method Forms
// ============================================================================

impl<T: 'static> Parser<T> {
    /// Ordered choice; see [`alternative`].
    pub fn or_else(self, other: Parser<T>) -> Parser<T> {
        alternative(self, other)
    }

    /// Sequence, keeping the value of `next`; see [`discard_first`].
    pub fn then<U: 'static>(self, next: Parser<U>) -> Parser<U> {
        discard_first(self, next)
    }

    /// Sequence, keeping this parser's value; see [`discard_second`].
    pub fn skip<U: 'static>(self, next: Parser<U>) -> Parser<T> {
        discard_second(self, next)
    }

    /// Pair this parser's value with the value of `next`.
    pub fn and<U: 'static>(self, next: Parser<U>) -> Parser<(T, U)> {
        tuple((self, next))
    }

    pub fn optional(self) -> Parser<Option<T>> {
        optional(self)
    }

    pub fn attempt(self) -> Parser<T> {
        attempt(self)
    }

    pub fn attempt_labeled(self, label: impl Into<String>) -> Parser<T> {
        attempt_labeled(self, label)
    }

    pub fn look_ahead(self) -> Parser<T> {
        look_ahead(self)
    }

    pub fn not_empty(self) -> Parser<T> {
        not_empty(self)
    }

    pub fn skipped(self) -> Parser<String> {
        skipped(self)
    }

    /// Drop the value.
    pub fn discard(self) -> Parser<()> {
        self.map(|_| ())
    }
}
