//! Search and grouping engine.
//!
//! The engine is split into one submodule per stage under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! query ── Query::new (api.rs): trim + collapse whitespace
//!             │
//!             v
//! script.rs   classify query -> ScriptClass (separator set + field gating)
//!             │
//!             v
//! fields.rs   search_fields: for each entry, for each selected field
//!               └─ boundary.rs  Matcher::find_bounded (regex, or substring fallback)
//!             │   (optional loose script pass when nothing matched cleanly)
//!             v
//!           Vec<Hit>  (one per entry + field)
//!             │
//!             v
//! dedup.rs    dedupe by entry id -> Vec<OccurrenceRecord> (first-seen order)
//!             │
//!             v
//! group.rs    group by word text / paragraph -> IndexMap<String, Group>
//!               └─ context.rs  windows for paragraph groups
//!             │
//!             v
//!        SearchResult
//! ```
//!
//! `highlight.rs` is not part of the run: the presentation layer calls it per
//! occurrence when rendering.
//!
//! ## Determinism
//!
//! The corpus is read-only and every map is an `IndexMap` filled in scan
//! order, so the same (corpus, query, options) always yields the same
//! `SearchResult`. Timing lives in `RunMetrics`, outside the result.
//!
//! ## Debugging
//!
//! The engine logs through `tracing`: `debug` for each run, `trace` for every
//! field hit, `warn` when a query falls back to substring matching.

#[path = "engine/boundary.rs"]
pub(crate) mod boundary;
#[path = "engine/context.rs"]
mod context;
#[path = "engine/dedup.rs"]
mod dedup;
#[path = "engine/fields.rs"]
mod fields;
#[path = "engine/group.rs"]
mod group;
#[path = "engine/highlight.rs"]
mod highlight;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/script.rs"]
pub(crate) mod script;

pub use context::extract_context;
pub use highlight::{HighlightStyle, highlight, highlight_with};
pub use script::{ScriptClass, classify, is_historic_script_query};

use crate::{Entry, Options, Query, SearchResult};
use metrics::{RunMetrics, RunResult};
use std::time::Instant;

/// Run one search over `entries`.
pub(crate) fn run(entries: &[Entry], query: &Query, options: &Options) -> RunResult {
    let started = Instant::now();
    let mut metrics = RunMetrics::default();

    if query.is_empty() {
        tracing::debug!("blank query, nothing to search");
        metrics.total = started.elapsed();
        return RunResult { result: SearchResult::empty(query.clone()), metrics };
    }

    tracing::debug!(query = query.text(), scope = ?query.scope(), class = ?query.class(), "search started");

    let stage = Instant::now();
    let outcome = fields::search_fields(entries, query, options);
    metrics.scan = stage.elapsed();
    metrics.entries_scanned = outcome.entries_scanned;
    metrics.raw_hits = outcome.hits.len();
    metrics.spans = outcome.hits.iter().map(|h| h.spans.len()).sum();
    metrics.fields = outcome.fields;
    metrics.loose_fallback = outcome.loose_fallback;
    metrics.pattern_fallback = outcome.pattern_fallback;

    let stage = Instant::now();
    let records = dedup::dedupe(&outcome.hits);
    metrics.dedupe = stage.elapsed();

    let stage = Instant::now();
    let groups = group::group(records, query, options);
    metrics.group = stage.elapsed();

    let result = SearchResult { query: query.clone(), groups };
    metrics.total = started.elapsed();

    let stats = result.stats();
    tracing::debug!(
        groups = stats.groups,
        occurrences = stats.occurrences,
        raw_hits = metrics.raw_hits,
        elapsed = ?metrics.total,
        "search finished"
    );

    RunResult { result, metrics }
}
