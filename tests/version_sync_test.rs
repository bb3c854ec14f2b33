//! Keeps README.md in step with Cargo.toml: MSRV, crate version and the
//! list of cargo features.

use std::fs;

fn read(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("could not read {path}: {err}"))
}

/// First quoted value on the Cargo.toml line starting with `prefix`.
fn cargo_value(prefix: &str) -> String {
    read("Cargo.toml")
        .lines()
        .find(|line| line.starts_with(prefix))
        .and_then(|line| line.split('"').nth(1))
        .unwrap_or_else(|| panic!("no {prefix} line in Cargo.toml"))
        .to_owned()
}

/// Names declared in Cargo.toml's `[features]` table, `default` excluded.
fn cargo_features() -> Vec<String> {
    read("Cargo.toml")
        .lines()
        .skip_while(|line| line.trim() != "[features]")
        .skip(1)
        .take_while(|line| !line.starts_with('['))
        .filter_map(|line| line.split_once('=').map(|(name, _)| name.trim().to_owned()))
        .filter(|name| !name.is_empty() && !name.starts_with('#') && name != "default")
        .collect()
}

fn assert_readme_contains(expected: &str) {
    assert!(
        read("README.md").contains(expected),
        "README.md should contain \"{expected}\"",
    );
}

#[test]
fn readme_mentions_correct_msrv() {
    let msrv = cargo_value("rust-version");
    assert_readme_contains(&format!("Requires Rust {msrv} or later."));
}

/// The README pins "major.minor" while Cargo.toml carries the full version.
#[test]
fn readme_mentions_correct_version() {
    let version = cargo_value("version = ");
    let (major_minor, _) = version.rsplit_once('.').expect("version has a patch part");
    assert_readme_contains(&format!("parcomb = {{ version = \"{major_minor}\""));
}

#[test]
fn readme_documents_every_feature() {
    let features = cargo_features();
    assert!(!features.is_empty());
    for feature in features {
        assert_readme_contains(&format!("`{feature}`"));
    }
}
