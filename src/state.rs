// Parser state: the remaining input plus user-defined context.
//
// States are immutable snapshots. Every step produces a new state and the
// caller decides whether to keep it, so backtracking is nothing more than
// holding on to an earlier value. Equality is structural (stream position and
// user info) and is what combinators use to decide whether a step made
// progress.

use downcast_rs::{DowncastSync, impl_downcast};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Stream
// ============================================================================

/// A view of the remaining input over a shared, fully materialized text.
#[derive(Clone)]
pub struct Stream {
    text: Arc<str>,
    position: usize,
}

impl Stream {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            position: 0,
        }
    }

    /// Absolute byte offset into the full input.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The full input, including already consumed text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The input not yet consumed.
    #[inline]
    pub fn remaining(&self) -> &str {
        &self.text[self.position..]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position >= self.text.len()
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Advance by `bytes`, which must land on a character boundary.
    pub fn advance(&self, bytes: usize) -> Stream {
        let position = (self.position + bytes).min(self.text.len());
        debug_assert!(self.text.is_char_boundary(position));
        Stream {
            text: Arc::clone(&self.text),
            position,
        }
    }

    /// Consume one character.
    pub fn next_char(&self) -> Option<(char, Stream)> {
        let ch = self.peek()?;
        Some((ch, self.advance(ch.len_utf8())))
    }

    /// The text between this stream and a later stream over the same input.
    ///
    /// Returns an empty slice if `end` lies before `self`.
    pub fn slice_to(&self, end: &Stream) -> &str {
        let end = end.position.clamp(self.position, self.text.len());
        &self.text[self.position..end]
    }
}

impl PartialEq for Stream {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && (Arc::ptr_eq(&self.text, &other.text) || self.text == other.text)
    }
}

impl Eq for Stream {}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.remaining().chars().take(16).collect();
        f.debug_struct("Stream")
            .field("position", &self.position)
            .field("remaining", &preview)
            .finish()
    }
}

// ============================================================================
// User Info
// ============================================================================

/// A typed key into [`UserInfo`].
///
/// Grammars declare a zero-sized key type per piece of auxiliary state they
/// thread through a parse. Reading a key that was never set yields
/// [`UserInfoKey::default_value`].
///
/// ```
/// use parcomb::UserInfoKey;
///
/// struct InsideLink;
///
/// impl UserInfoKey for InsideLink {
///     type Value = bool;
///     fn default_value() -> bool {
///         false
///     }
/// }
/// ```
pub trait UserInfoKey: 'static {
    type Value: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    fn default_value() -> Self::Value;
}

trait UserValue: DowncastSync + fmt::Debug {
    fn eq_value(&self, other: &dyn UserValue) -> bool;
}

impl_downcast!(sync UserValue);

impl<T> UserValue for T
where
    T: PartialEq + fmt::Debug + Send + Sync + 'static,
{
    fn eq_value(&self, other: &dyn UserValue) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

/// Type-indexed map of user-defined parse context.
///
/// Values equal to their key's default are not stored, so a key that was set
/// back to its default compares equal to one that was never set.
#[derive(Clone, Default)]
pub struct UserInfo {
    values: Arc<HashMap<TypeId, Arc<dyn UserValue>>>,
}

impl UserInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<K: UserInfoKey>(&self) -> K::Value {
        self.values
            .get(&TypeId::of::<K>())
            .and_then(|value| value.downcast_ref::<K::Value>())
            .cloned()
            .unwrap_or_else(K::default_value)
    }

    #[must_use]
    pub fn with<K: UserInfoKey>(&self, value: K::Value) -> UserInfo {
        let mut values = (*self.values).clone();
        if value == K::default_value() {
            values.remove(&TypeId::of::<K>());
        } else {
            let stored: Arc<dyn UserValue> = Arc::new(value);
            values.insert(TypeId::of::<K>(), stored);
        }
        UserInfo {
            values: Arc::new(values),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for UserInfo {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.values, &other.values) {
            return true;
        }
        self.values.len() == other.values.len()
            && self.values.iter().all(|(key, value)| {
                other
                    .values
                    .get(key)
                    .is_some_and(|other| (**value).eq_value(&**other))
            })
    }
}

impl fmt::Debug for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.values()).finish()
    }
}

// ============================================================================
// Parser State
// ============================================================================

/// Immutable snapshot of a parse in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct ParserState {
    stream: Stream,
    user_info: UserInfo,
}

impl ParserState {
    pub fn new(input: impl Into<Arc<str>>) -> Self {
        Self {
            stream: Stream::new(input),
            user_info: UserInfo::new(),
        }
    }

    #[inline]
    pub fn stream(&self) -> &Stream {
        &self.stream
    }

    /// Absolute byte offset of the remaining input.
    #[inline]
    pub fn position(&self) -> usize {
        self.stream.position()
    }

    #[inline]
    pub fn remaining(&self) -> &str {
        self.stream.remaining()
    }

    pub fn user_info<K: UserInfoKey>(&self) -> K::Value {
        self.user_info.get::<K>()
    }

    pub fn user_info_map(&self) -> &UserInfo {
        &self.user_info
    }

    #[must_use]
    pub fn with_user_info<K: UserInfoKey>(&self, value: K::Value) -> ParserState {
        ParserState {
            stream: self.stream.clone(),
            user_info: self.user_info.with::<K>(value),
        }
    }

    #[must_use]
    pub fn with_stream(&self, stream: Stream) -> ParserState {
        ParserState {
            stream,
            user_info: self.user_info.clone(),
        }
    }

    /// Advance the stream by `bytes`, keeping user info.
    #[must_use]
    pub fn advance(&self, bytes: usize) -> ParserState {
        self.with_stream(self.stream.advance(bytes))
    }

    /// The input consumed between an earlier state and this one.
    pub fn consumed_since<'a>(&'a self, earlier: &ParserState) -> &'a str {
        let start = earlier.position().min(self.position());
        &self.stream.text()[start..self.position()]
    }
}
