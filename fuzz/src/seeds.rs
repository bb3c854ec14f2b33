//! Seed corpus definitions for fuzz targets.
//!
//! The `generate-seeds` binary writes these to `corpus/` directories
//! where libFuzzer picks them up.

/// JSON seeds covering every value kind and the usual failure points.
#[rustfmt::skip]
pub const JSON_SEEDS: &[(&str, &str)] = &[
    // Scalars
    ("null", "null"),
    ("bool_true", "true"),
    ("integer", "42"),
    ("negative_float", "-0.5e+10"),
    ("string", r#""hello""#),
    ("escapes", r#""a\n\t\"\\\/é""#),
    ("surrogate_pair", r#""😀""#),

    // Containers
    ("empty_array", "[]"),
    ("empty_object", "{}"),
    ("nested", r#"{"a": [1, {"b": null}], "c": "d"}"#),
    ("duplicate_keys", r#"{"a": 1, "a": 2}"#),

    // Failures
    ("trailing_comma", "[1, 2, ]"),
    ("leading_zero", "012"),
    ("unterminated_string", r#""abc"#),
    ("lone_surrogate", r#""\ud800""#),
    ("deep", "[[[[[[[[[[[[[[[[[[[[1]]]]]]]]]]]]]]]]]]]"),
];

/// printf-style format string seeds.
#[rustfmt::skip]
pub const FORMAT_SEEDS: &[(&str, &str)] = &[
    ("empty", ""),
    ("literal", "plain text"),
    ("percent", "100%%"),
    ("simple", "%d"),
    ("flags", "%-+ #0d"),
    ("width_precision", "%10.3f"),
    ("star", "%*.*s"),
    ("bare_precision", "%.e"),
    ("length", "%hhd %lld %zu %Lf"),
    ("mixed", "x=%5.2f, name=%s\n"),
    ("dangling", "abc %"),
    ("unknown", "%q"),
];

/// OpenStep property list seeds.
#[rustfmt::skip]
pub const PLIST_SEEDS: &[(&str, &str)] = &[
    ("bare_string", "hello"),
    ("quoted", r#""a \"b\"""#),
    ("single_quoted", "'x'"),
    ("data", "<0fa3 9c>"),
    ("array", "(a, b, c,)"),
    ("dictionary", "{ a = 1; b = (x, y); }"),
    ("comments", "// line\n/* block */ value"),
    ("octal_escape", r#""\101\U00e9""#),
    ("missing_semicolon", "{ a = b }"),
];
