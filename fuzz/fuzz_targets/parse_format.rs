#![no_main]

use libfuzzer_sys::fuzz_target;
use parcomb::grammars::{FormatSegment, parse_format};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(segments) = parse_format(s) {
            // adjacent literals are always joined
            for pair in segments.windows(2) {
                assert!(!matches!(
                    pair,
                    [FormatSegment::Literal(_), FormatSegment::Literal(_)]
                ));
            }
        }
    }
});
