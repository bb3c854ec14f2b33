// Shared defaults
//
// Values used by more than one module live here so that labels and limits
// stay consistent between the combinators, the formatter and the grammars.

/// Label reported by `end_of_stream` when input remains.
///
/// `Runner` uses the same parser for `require_end_of_stream`, so leftover
/// input always renders as `expecting end of stream`.
pub const END_OF_STREAM_LABEL: &str = "end of stream";

/// Default maximum nesting depth for the bundled recursive grammars
///
/// Every level of nesting in a combinator grammar costs several native stack
/// frames (one per wrapping combinator), so this is kept well below what an
/// 8MB main-thread stack tolerates. Raise it per grammar through the options
/// structs, e.g. `JsonOptions::max_nesting_depth`.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Spaces per indentation level in rendered error reports.
pub const DEFAULT_INDENT_SIZE: usize = 2;
