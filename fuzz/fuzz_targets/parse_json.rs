#![no_main]

use libfuzzer_sys::fuzz_target;
use parcomb::grammars::parse_json;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        match parse_json(s) {
            // compact output must parse back to the same document
            Ok(value) => assert_eq!(parse_json(&value.to_string()).ok(), Some(value)),
            Err(err) => {
                assert!(err.position <= s.len());
                let _ = err.to_string();
            }
        }
    }
});
