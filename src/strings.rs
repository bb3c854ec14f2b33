// String and substring parsers.
//
// Multi-character matches are atomic: a partial match fails at the state the
// parser started from.

use crate::chars::CharacterClass;
use crate::error::{CaseSensitivity, ParseError};
use crate::parser::Parser;
use crate::reply::ParserReply;
use crate::state::ParserState;
use unicase::UniCase;

/// Byte length of the prefix of `input` matching `text`, if any.
fn match_prefix(input: &str, text: &str, case: CaseSensitivity) -> Option<usize> {
    match case {
        CaseSensitivity::Sensitive => input.starts_with(text).then_some(text.len()),
        CaseSensitivity::Insensitive => {
            let count = text.chars().count();
            let end = input
                .char_indices()
                .nth(count)
                .map_or(input.len(), |(index, _)| index);
            let candidate = &input[..end];
            let same_length = candidate.chars().count() == count;
            (same_length && UniCase::new(candidate) == UniCase::new(text)).then_some(end)
        }
    }
}

/// Match `text` exactly.
pub fn string(text: impl Into<String>) -> Parser<String> {
    string_with(text, CaseSensitivity::Sensitive)
}

/// Match `text` with the given case sensitivity, yielding the input as written.
pub fn string_with(text: impl Into<String>, case: CaseSensitivity) -> Parser<String> {
    let text = text.into();
    Parser::new(move |state| match match_prefix(state.remaining(), &text, case) {
        Some(width) => {
            let matched = state.remaining()[..width].to_string();
            ParserReply::success(matched, Vec::new(), state.advance(width))
        }
        None => ParserReply::failure(
            vec![ParseError::ExpectedString(text.clone(), case)],
            state.clone(),
        ),
    })
}

/// Succeed without consuming iff the input does not start with `text`.
pub fn not_string(text: impl Into<String>) -> Parser<()> {
    let text = text.into();
    Parser::new(move |state| {
        if state.remaining().starts_with(text.as_str()) {
            ParserReply::failure(
                vec![ParseError::UnexpectedString(
                    text.clone(),
                    CaseSensitivity::Sensitive,
                )],
                state.clone(),
            )
        } else {
            ParserReply::success((), Vec::new(), state.clone())
        }
    })
}

fn take_chars_while(state: &ParserState, predicate: impl Fn(char) -> bool) -> (usize, usize) {
    let mut count = 0;
    let mut width = 0;
    for ch in state.remaining().chars() {
        if !predicate(ch) {
            break;
        }
        count += 1;
        width += ch.len_utf8();
    }
    (count, width)
}

/// Consume characters while `predicate` holds, requiring at least `min_count`.
pub fn take_while<F>(label: impl Into<String>, predicate: F, min_count: usize) -> Parser<String>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    let label = label.into();
    Parser::new(move |state| {
        let (count, width) = take_chars_while(state, &predicate);
        if count < min_count {
            return ParserReply::failure(vec![ParseError::Expected(label.clone())], state.clone());
        }
        let text = state.remaining()[..width].to_string();
        ParserReply::success(text, Vec::new(), state.advance(width))
    })
}

/// Consume everything before the next occurrence of `terminator`.
///
/// The terminator itself is not consumed. Fails if it never occurs.
pub fn substring_until(terminator: impl Into<String>) -> Parser<String> {
    let terminator = terminator.into();
    Parser::new(move |state| match state.remaining().find(terminator.as_str()) {
        Some(width) => {
            let text = state.remaining()[..width].to_string();
            ParserReply::success(text, Vec::new(), state.advance(width))
        }
        None => ParserReply::failure(
            vec![ParseError::ExpectedString(
                terminator.clone(),
                CaseSensitivity::Sensitive,
            )],
            state.clone(),
        ),
    })
}

/// Consume any run of whitespace, possibly empty.
pub fn whitespaces() -> Parser<String> {
    take_while(
        CharacterClass::Whitespace.label(),
        |ch| CharacterClass::Whitespace.matches(ch),
        0,
    )
}
