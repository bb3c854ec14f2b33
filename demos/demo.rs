// parcomb demo
//
// Walks through the main features:
// 1. Composing parsers from primitives
// 2. Committed choice and `attempt`
// 3. Runner configuration and error rendering
// 4. User info threaded through a parse
// 5. The bundled grammars

use parcomb::grammars::{FormatSegment, parse_csv, parse_format, parse_json, parse_plist};
use parcomb::{
    Builder, FormatConfig, ParserState, Result, UserInfoKey, char, integer, letter, many,
    many_separated, string, update_user_info, user_info, whitespaces,
};

/// Number of identifiers seen so far.
struct IdentCount;

impl UserInfoKey for IdentCount {
    type Value = usize;

    fn default_value() -> usize {
        0
    }
}

fn main() -> Result<()> {
    println!("=== parcomb Demo ===\n");

    // ========================================================================
    // 1. COMPOSITION - Small parsers into bigger ones
    // ========================================================================
    println!("1. Composition:");

    let list = char('[')
        .then(many_separated(integer().skip(whitespaces()), char(',').skip(whitespaces()), true, 0))
        .skip(char(']'));
    let values = list.run("[1, -2, 30,]")?;
    println!("   [1, -2, 30,] => {values:?}");

    // ========================================================================
    // 2. CHOICE - Committed by default, backtracking on request
    // ========================================================================
    println!("\n2. Choice:");

    let committed = string("let").then(string(" mut")).or_else(string("let"));
    match committed.run("let x") {
        Ok(value) => println!("   ✗ Unexpected success: {value}"),
        Err(e) => println!("   ✓ Committed branch failed at byte {}", e.position),
    }

    let backtracking = string("let").then(string(" mut")).attempt().or_else(string("let"));
    println!("   ✓ With attempt: {:?}", backtracking.run("let x")?);

    // ========================================================================
    // 3. RUNNER - End-of-stream checks and error rendering
    // ========================================================================
    println!("\n3. Runner configuration:");

    let runner = Builder::new()
        .require_end_of_stream(true)
        .format_config(FormatConfig::new().with_offsets().with_indent(4))
        .build();
    println!(
        "   Require end of stream: {}",
        runner.config().is_end_of_stream_required()
    );
    if let Err(e) = runner.run(&integer(), "42 trailing") {
        println!("{}", runner.format_error(&e));
    }

    // ========================================================================
    // 4. USER INFO - Context carried in the parser state
    // ========================================================================
    println!("\n4. User info:");

    let ident = many(letter(), 1)
        .skip(whitespaces())
        .skip(update_user_info::<IdentCount, _>(|count| count + 1));
    let idents = many(ident, 0).then(user_info::<IdentCount>());
    let (count, state) = Builder::new()
        .build()
        .run_with_state(&idents, &ParserState::new("alpha beta gamma"))?;
    println!("   Identifiers counted: {count}");
    println!("   Final state position: {}", state.position());

    // ========================================================================
    // 5. GRAMMARS - Complete formats built on the same API
    // ========================================================================
    println!("\n5. Bundled grammars:");

    let doc = parse_json(r#"{"name": "parcomb", "tags": ["parser", "combinator"]}"#)?;
    println!("   JSON: {doc}");

    let rows = parse_csv("a,b\n\"c, d\",e\n")?;
    println!("   CSV: {rows:?}");

    let segments = parse_format("%-8s|%5.2f%%")?;
    let specs = segments
        .iter()
        .filter(|segment| matches!(segment, FormatSegment::Spec(_)))
        .count();
    println!("   Format: {} segments, {specs} conversions", segments.len());

    let plist = parse_plist("{ name = parcomb; kinds = (json, csv, plist); }")?;
    println!("   Plist name: {:?}", plist.get("name").and_then(|v| v.as_str()));

    match parse_json("{\"a\": [1, 2,]}") {
        Ok(_) => println!("   ✗ Should have failed"),
        Err(e) => println!("   ✓ Syntax error caught:\n{e}"),
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
