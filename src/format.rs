// Error Report Formatter
//
// Renders a `ParseError` tree as indented, line/column-anchored prose:
//
//   line 3, column 7:
//     expecting "," or "}"
//     in string literal at line 3, column 9:
//       unexpected end of stream
//
// Expectations at one level are collected into a single `expecting` line;
// everything else gets a line of its own, and backtracked branches are
// indented under a header naming where they actually failed.

use crate::constants::DEFAULT_INDENT_SIZE;
use crate::error::{ParseError, quote_literal};
use crate::position::TextPosition;

/// Configuration for rendering error reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Number of spaces per indentation level
    pub indent_size: usize,
    /// Whether to append the absolute byte offset to every anchor
    pub show_offsets: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_size: DEFAULT_INDENT_SIZE,
            show_offsets: false,
        }
    }
}

impl FormatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offsets(mut self) -> Self {
        self.show_offsets = true;
        self
    }

    pub fn with_indent(mut self, size: usize) -> Self {
        self.indent_size = size;
        self
    }
}

/// Line-oriented writer with a current indentation level.
#[derive(Debug, Clone)]
pub struct IndentWriter {
    buf: String,
    level: usize,
    indent_size: usize,
}

impl IndentWriter {
    pub fn new(indent_size: usize) -> Self {
        Self {
            buf: String::new(),
            level: 0,
            indent_size,
        }
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Write one line at the current indentation.
    pub fn line(&mut self, text: &str) {
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        self.buf
            .extend(std::iter::repeat_n(' ', self.level * self.indent_size));
        self.buf.push_str(text);
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Render `errors`, reported at byte `position` of `input`.
pub fn format_errors(
    input: &str,
    position: usize,
    errors: &[ParseError],
    config: &FormatConfig,
) -> String {
    let mut writer = IndentWriter::new(config.indent_size);
    writer.line(&format!("{}:", anchor(input, position, config)));
    writer.indent();
    if errors.is_empty() {
        writer.line("no further information");
    } else {
        write_errors(&mut writer, input, errors, config);
    }
    writer.finish()
}

fn anchor(input: &str, position: usize, config: &FormatConfig) -> String {
    let location = TextPosition::locate(input, position);
    if config.show_offsets {
        format!("{location} (offset {position})")
    } else {
        location.to_string()
    }
}

fn write_errors(
    writer: &mut IndentWriter,
    input: &str,
    errors: &[ParseError],
    config: &FormatConfig,
) {
    let mut expectations: Vec<String> = Vec::new();
    for error in errors {
        let expectation = match error {
            ParseError::Expected(label) => label.clone(),
            ParseError::ExpectedString(text, case) => quote_literal(text, *case),
            _ => continue,
        };
        if !expectations.contains(&expectation) {
            expectations.push(expectation);
        }
    }
    if !expectations.is_empty() {
        writer.line(&format!("expecting {}", join_alternatives(&expectations)));
    }

    let mut seen: Vec<String> = Vec::new();
    for error in errors {
        let text = match error {
            ParseError::Expected(_) | ParseError::ExpectedString(..) => continue,
            ParseError::Unexpected(label) => format!("unexpected {label}"),
            ParseError::UnexpectedString(text, case) => {
                format!("unexpected {}", quote_literal(text, *case))
            }
            ParseError::Generic(message) => message.clone(),
            ParseError::Nested { position, errors } => {
                writer.line(&format!("at {}:", anchor(input, *position, config)));
                write_block(writer, input, errors, config);
                continue;
            }
            ParseError::Compound {
                label,
                position,
                errors,
            } => {
                writer.line(&format!("in {label} at {}:", anchor(input, *position, config)));
                write_block(writer, input, errors, config);
                continue;
            }
        };
        if !seen.contains(&text) {
            writer.line(&text);
            seen.push(text);
        }
    }
}

fn write_block(writer: &mut IndentWriter, input: &str, errors: &[ParseError], config: &FormatConfig) {
    writer.indent();
    write_errors(writer, input, errors, config);
    writer.dedent();
}

/// `a`, `a or b`, `a, b or c`.
fn join_alternatives(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}
