// Comma-separated values (RFC 4180)
//
// Records are separated by CRLF or LF; a final line break is optional. Quoted
// fields may contain delimiters, line breaks and doubled quotes. Every record
// is returned as written, without checking that field counts agree.

use crate::chars::{char, char_satisfying, newline};
use crate::combinators::{end_of_stream, not_with};
use crate::context::Builder;
use crate::error::{ParseError, Result};
use crate::parser::Parser;
use crate::repeat::{many, many_separated};
use crate::strings::{string, take_while};

/// Options for the CSV grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field separator (default: `,`)
    pub delimiter: char,
    /// Quote character (default: `"`)
    pub quote: char,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
        }
    }
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }
}

fn quoted_field(quote: char) -> Parser<String> {
    let doubled: String = [quote, quote].iter().collect();
    let content = char_satisfying("quoted character", move |ch| ch != quote)
        .or_else(string(doubled).map(move |_| quote));
    char(quote)
        .then(many(content, 0))
        .skip(char(quote))
        .map(|chars| chars.into_iter().collect())
}

fn plain_field(options: CsvOptions) -> Parser<String> {
    let CsvOptions { delimiter, quote } = options;
    take_while(
        "field",
        move |ch| ch != delimiter && ch != quote && ch != '\n' && ch != '\r',
        0,
    )
}

fn record(options: CsvOptions) -> Parser<Vec<String>> {
    let field = quoted_field(options.quote).or_else(plain_field(options));
    // A record never starts at the end of input, so a final line break does
    // not produce an empty trailing record.
    not_with(end_of_stream(), ParseError::unexpected("end of stream"))
        .then(many_separated(field, char(options.delimiter), false, 1))
}

/// A CSV document as a list of records.
pub fn csv(options: CsvOptions) -> Parser<Vec<Vec<String>>> {
    many_separated(record(options), newline(), true, 0)
}

/// Parse a complete document with the default options.
pub fn parse_csv(input: &str) -> Result<Vec<Vec<String>>> {
    parse_csv_with(input, CsvOptions::default())
}

pub fn parse_csv_with(input: &str, options: CsvOptions) -> Result<Vec<Vec<String>>> {
    Builder::new()
        .require_end_of_stream(true)
        .build()
        .run(&csv(options), input)
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

    fn rows(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|field| field.to_string()).collect())
            .collect()
    }

    test_cases! {
        test_simple_records: {
            assert_eq!(
                parse_csv("a,b,c\n1,2,3"),
                Ok(rows(&[&["a", "b", "c"], &["1", "2", "3"]]))
            );
        },

        test_trailing_newline_and_crlf: {
            assert_eq!(parse_csv("a,b\r\n1,2\r\n"), Ok(rows(&[&["a", "b"], &["1", "2"]])));
        },

        test_empty_fields_and_lines: {
            assert_eq!(parse_csv(",x,\n\nz"), Ok(rows(&[&["", "x", ""], &[""], &["z"]])));
        },

        test_empty_input: {
            assert_eq!(parse_csv(""), Ok(vec![]));
        },

        test_quoted_fields: {
            let text = "\"a,b\",\"say \"\"hi\"\"\",\"line\nbreak\"";
            assert_eq!(
                parse_csv(text),
                Ok(rows(&[&["a,b", "say \"hi\"", "line\nbreak"]]))
            );
        },

        test_unterminated_quote: {
            let err = parse_csv("\"abc").unwrap_err();
            assert_eq!(err.position, 4);
        },

        test_text_after_closing_quote: {
            let err = parse_csv("\"a\"b").unwrap_err();
            assert_eq!(err.position, 3);
        },

        test_custom_delimiter: {
            let options = CsvOptions::new().with_delimiter(';').with_quote('\'');
            assert_eq!(
                parse_csv_with("'x;y';2", options),
                Ok(rows(&[&["x;y", "2"]]))
            );
        },
    }
}
