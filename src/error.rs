// Error types for parcomb parsers.
//
// `ParseError` is the value vocabulary every combinator speaks: failures and
// advisory notes are plain `Vec<ParseError>` sequences threaded through
// replies. `RunError` is the only error that leaves the combinator core, and
// only at the outermost `run` boundary.

use crate::format::{FormatConfig, format_errors};
use crate::position::TextPosition;
use std::fmt;

// ============================================================================
// Parse Errors
// ============================================================================

/// Whether a literal string was (or should be) matched case-sensitively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

/// A reason a parse step failed, or a note attached to a success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A named thing was expected here.
    Expected(String),
    /// A named thing was present but disallowed.
    Unexpected(String),
    /// Literal text was expected here.
    ExpectedString(String, CaseSensitivity),
    /// Literal text was present but disallowed.
    UnexpectedString(String, CaseSensitivity),
    /// Free-form message for failures with no fixed label.
    Generic(String),
    /// A sub-parser failed after consuming input and was backtracked.
    ///
    /// `position` is the absolute byte offset where the failure actually
    /// happened, which is usually further along than the position the
    /// enclosing failure is reported at.
    Nested {
        position: usize,
        errors: Vec<ParseError>,
    },
    /// Like `Nested`, additionally naming the composite rule that failed
    /// (for example "string literal in double quotes").
    Compound {
        label: String,
        position: usize,
        errors: Vec<ParseError>,
    },
}

impl ParseError {
    #[must_use]
    pub fn expected(label: impl Into<String>) -> Self {
        ParseError::Expected(label.into())
    }

    #[must_use]
    pub fn unexpected(label: impl Into<String>) -> Self {
        ParseError::Unexpected(label.into())
    }

    #[must_use]
    pub fn expected_string(text: impl Into<String>, case: CaseSensitivity) -> Self {
        ParseError::ExpectedString(text.into(), case)
    }

    #[must_use]
    pub fn unexpected_string(text: impl Into<String>, case: CaseSensitivity) -> Self {
        ParseError::UnexpectedString(text.into(), case)
    }

    #[must_use]
    pub fn generic(message: impl Into<String>) -> Self {
        ParseError::Generic(message.into())
    }

    #[must_use]
    pub fn nested(position: usize, errors: Vec<ParseError>) -> Self {
        ParseError::Nested { position, errors }
    }

    #[must_use]
    pub fn compound(label: impl Into<String>, position: usize, errors: Vec<ParseError>) -> Self {
        ParseError::Compound {
            label: label.into(),
            position,
            errors,
        }
    }

    /// True for the `Nested` and `Compound` variants.
    pub fn is_wrapper(&self) -> bool {
        matches!(self, ParseError::Nested { .. } | ParseError::Compound { .. })
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Expected(label) => write!(f, "expected {label}"),
            ParseError::Unexpected(label) => write!(f, "unexpected {label}"),
            ParseError::ExpectedString(text, case) => {
                write!(f, "expected {}", quote_literal(text, *case))
            }
            ParseError::UnexpectedString(text, case) => {
                write!(f, "unexpected {}", quote_literal(text, *case))
            }
            ParseError::Generic(message) => f.write_str(message),
            ParseError::Nested { position, errors } => {
                write!(f, "at offset {position}: {} error(s)", errors.len())
            }
            ParseError::Compound {
                label,
                position,
                errors,
            } => write!(f, "in {label} at offset {position}: {} error(s)", errors.len()),
        }
    }
}

/// Quote literal text the way diagnostics show it.
pub(crate) fn quote_literal(text: &str, case: CaseSensitivity) -> String {
    match case {
        CaseSensitivity::Sensitive => format!("{text:?}"),
        CaseSensitivity::Insensitive => format!("{text:?} (case insensitive)"),
    }
}

// ============================================================================
// Run Errors
// ============================================================================

/// Terminal failure of a whole parse, returned by `run`.
///
/// `Display` renders the full error tree with line/column anchors using the
/// default [`FormatConfig`]; use [`RunError::render`] for other settings.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", render_default(.input, .position, .errors))]
pub struct RunError {
    /// The complete input the parse ran over.
    pub input: String,
    /// Absolute byte offset where the terminal failure was reported.
    pub position: usize,
    /// The underlying errors, including nested/compound wrapping.
    pub errors: Vec<ParseError>,
}

impl RunError {
    #[must_use]
    pub fn new(input: impl Into<String>, position: usize, errors: Vec<ParseError>) -> Self {
        Self {
            input: input.into(),
            position,
            errors,
        }
    }

    /// Line and column of the failure position.
    pub fn location(&self) -> TextPosition {
        TextPosition::locate(&self.input, self.position)
    }

    /// Render the error tree with a custom configuration.
    pub fn render(&self, config: &FormatConfig) -> String {
        format_errors(&self.input, self.position, &self.errors, config)
    }
}

fn render_default(input: &str, position: &usize, errors: &[ParseError]) -> String {
    format_errors(input, *position, errors, &FormatConfig::default())
}

/// Result type alias for whole-input parses.
pub type Result<T> = std::result::Result<T, RunError>;
