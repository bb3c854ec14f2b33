// Line/column lookup for diagnostics.

/// A 1-based line and column in some input text.
///
/// Columns count characters, not bytes. `\n`, `\r\n` and a lone `\r` each
/// count as a single line break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextPosition {
    pub line: usize,
    pub column: usize,
}

impl TextPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Locate the absolute byte offset `index` in `text`.
    ///
    /// An index past the end (or inside a multi-byte character) is clamped
    /// to the nearest preceding character boundary.
    pub fn locate(text: &str, index: usize) -> Self {
        let mut end = index.min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }

        let mut line = 1;
        let mut column = 1;
        let mut chars = text[..end].chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' | '\r' => {
                    line += 1;
                    column = 1;
                }
                _ => column += 1,
            }
        }
        Self { line, column }
    }
}

impl std::fmt::Display for TextPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
