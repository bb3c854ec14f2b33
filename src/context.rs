// Runner and Builder
//
// This module provides a builder pattern for configuring how a composed
// parser is run over a whole input, along with the runner that does it.
//
// The runner is the single boundary where a terminal `Failure` turns into a
// `RunError`; everything below it deals in `ParserReply` values.

use crate::combinators::end_of_stream;
use crate::error::{Result, RunError};
use crate::format::FormatConfig;
use crate::parser::Parser;
use crate::reply::ParserResult;
use crate::state::ParserState;
use tracing::debug;

// ============================================================================
// Configuration Builder
// ============================================================================

/// Configuration builder for running parsers
///
/// # Examples
///
/// Simple usage with defaults:
/// ```
/// use parcomb::{Builder, char};
///
/// let runner = Builder::new().build();
/// assert_eq!(runner.run(&char('a'), "abc")?, 'a');
/// # Ok::<(), parcomb::RunError>(())
/// ```
///
/// Rejecting trailing input:
/// ```
/// use parcomb::{Builder, char};
///
/// let runner = Builder::new().require_end_of_stream(true).build();
/// assert!(runner.run(&char('a'), "abc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Builder {
    /// Fail unless the parser consumes the whole input (default: false)
    require_end_of_stream: bool,
    /// How `RunError`s are rendered by `Runner::format_error`
    format_config: FormatConfig,
}

impl Builder {
    /// Create a new builder with default configuration
    ///
    /// Defaults:
    /// - `require_end_of_stream`: false
    /// - `format_config`: `FormatConfig::default()`
    pub fn new() -> Self {
        Self {
            require_end_of_stream: false,
            format_config: FormatConfig::default(),
        }
    }

    /// Require the parser to consume all input
    ///
    /// Leftover input then fails with `expecting end of stream` at the first
    /// unconsumed character.
    pub fn require_end_of_stream(mut self, enabled: bool) -> Self {
        self.require_end_of_stream = enabled;
        self
    }

    /// Set the configuration used to render errors
    pub fn format_config(mut self, config: FormatConfig) -> Self {
        self.format_config = config;
        self
    }

    /// Build a runner with this configuration
    ///
    /// The runner holds no per-parse state and can be shared freely.
    pub fn build(self) -> Runner {
        Runner { config: self }
    }

    /// Check if the whole input must be consumed
    pub fn is_end_of_stream_required(&self) -> bool {
        self.require_end_of_stream
    }

    /// Get the error rendering configuration
    pub fn get_format_config(&self) -> &FormatConfig {
        &self.format_config
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Runs parsers over complete inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Runner {
    config: Builder,
}

impl Runner {
    /// Parse `input` from a fresh state
    pub fn run<T: 'static>(&self, parser: &Parser<T>, input: &str) -> Result<T> {
        let state = ParserState::new(input);
        self.run_with_state(parser, &state).map(|(value, _)| value)
    }

    /// Parse from a prepared state, returning the value and the final state
    ///
    /// Use this to seed user info before parsing or to inspect it afterwards.
    pub fn run_with_state<T: 'static>(
        &self,
        parser: &Parser<T>,
        state: &ParserState,
    ) -> Result<(T, ParserState)> {
        debug!(
            position = state.position(),
            remaining = state.remaining().len(),
            "parse started"
        );
        let reply = if self.config.require_end_of_stream {
            parser.clone().skip(end_of_stream()).parse(state)
        } else {
            parser.parse(state)
        };
        let position = reply.state.position();
        match reply.result {
            ParserResult::Success { value, .. } => {
                debug!(position, "parse succeeded");
                Ok((value, reply.state))
            }
            ParserResult::Failure { errors } => {
                debug!(position, errors = errors.len(), "parse failed");
                Err(RunError::new(state.stream().text(), position, errors))
            }
        }
    }

    /// Render an error with this runner's format configuration
    pub fn format_error(&self, error: &RunError) -> String {
        error.render(&self.config.format_config)
    }

    /// Get the configuration used by this runner
    pub fn config(&self) -> &Builder {
        &self.config
    }
}
