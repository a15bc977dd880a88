//! Error types.
//!
//! Only corpus loading can fail from the caller's point of view. Matching
//! errors stay inside the engine: every matching step has a degraded path
//! (substring fallback while searching, unmarked text while highlighting).

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load or validate a corpus.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("failed to read corpus `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid corpus row (line {line}): {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid corpus CSV (line {line}): {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },
    #[error("duplicate entry id `{0}`")]
    DuplicateId(String),
    #[error("entry `{id}` has unknown kind `{value}` (expected a word or paragraph discriminator)")]
    UnknownKind { id: String, value: String },
    #[error("unsupported corpus format for `{0}` (expected .csv, .json or .jsonl)")]
    UnsupportedFormat(PathBuf),
}

/// Internal matching failure.
#[derive(Error, Debug)]
pub(crate) enum MatchError {
    #[error("literal pattern failed to compile: {0}")]
    MalformedPattern(#[from] regex::Error),
}
