//! Types generated at build time from `fixtures/*.json`.
//!
//! Each fixture `name.json` becomes `pub mod name` with a root type named
//! after the file; `library_document_order` is `library.json` generated with
//! document-order discriminators. `fixtures/settings/name.json`, when present,
//! holds the generator settings for that fixture.

include!(concat!(env!("OUT_DIR"), "/generated.rs"));

/// Fixture text by file stem.
pub fn fixture(stem: &str) -> String {
    let path = format!("{}/fixtures/{stem}.json", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|error| panic!("{path}: {error}"))
}
