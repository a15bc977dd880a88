//! Search run metrics.
//!
//! Timings and counters are collected on every run (they are cheap) but only
//! surfaced through `search_verbose_with`. They are kept out of
//! `SearchResult` so two runs over the same input compare equal.

use crate::{FieldSet, SearchResult};
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for [`super::run`].
    pub total: Duration,
    pub scan: Duration,
    pub dedupe: Duration,
    pub group: Duration,
    pub entries_scanned: usize,
    /// Field-level hits before deduplication.
    pub raw_hits: usize,
    /// Delimited (or loose) match spans across all hits.
    pub spans: usize,
    /// Fields the scope policy selected.
    pub fields: FieldSet,
    pub loose_fallback: bool,
    pub pattern_fallback: bool,
}

/// Search output bundled with its metrics.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub result: SearchResult,
    pub metrics: RunMetrics,
}
