//! Writes the in-code seed definitions to the corpus directories.
//!
//! Run with: `cargo run --manifest-path fuzz/Cargo.toml --bin generate-seeds`
//!
//! Existing files are left alone so corpus entries found by the fuzzer
//! survive a regeneration.

use parcomb_fuzz::seeds;
use std::{fs, path::Path};

const TARGETS: &[(&str, &[(&str, &str)])] = &[
    ("parse_json", seeds::JSON_SEEDS),
    ("parse_format", seeds::FORMAT_SEEDS),
    ("parse_plist", seeds::PLIST_SEEDS),
];

fn main() {
    let fuzz_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for (target, seeds) in TARGETS {
        write_seeds(&fuzz_dir.join("corpus").join(target), seeds, target);
    }
}

fn write_seeds(dir: &Path, seeds: &[(&str, &str)], target: &str) {
    fs::create_dir_all(dir).expect("failed to create corpus directory");

    let (mut written, mut skipped) = (0, 0);
    for (name, content) in seeds {
        let path = dir.join(name);
        if path.exists() {
            skipped += 1;
            continue;
        }
        fs::write(&path, content).expect("failed to write seed file");
        written += 1;
    }

    println!("{target}: wrote {written} seeds, skipped {skipped} existing");
}
