#![no_main]

use libfuzzer_sys::fuzz_target;
use parcomb::FormatConfig;
use parcomb::grammars::parse_plist;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Err(err) = parse_plist(s) {
            let _ = err.render(&FormatConfig::new().with_offsets());
        }
    }
});
