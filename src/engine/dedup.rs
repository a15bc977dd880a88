//! Collapse field-level hits into one record per entry.
//!
//! Hits arrive in scan order (entry by entry, script → latin → translation).
//! The first hit of an entry creates its `OccurrenceRecord`; later hits for
//! the same entry id only add their field to `found_in` (or set `partial` for
//! a loose script hit). Records come out in order of first appearance, which
//! becomes the occurrence order inside groups.

use crate::{Hit, MatchKind, OccurrenceRecord};
use indexmap::IndexMap;

/// Deduplicate `hits` by entry id, preserving first-appearance order.
pub(crate) fn dedupe(hits: &[Hit<'_>]) -> Vec<OccurrenceRecord> {
    let mut records: IndexMap<&str, OccurrenceRecord> = IndexMap::with_capacity(hits.len());

    for hit in hits {
        let record = records.entry(hit.entry.id.as_str()).or_insert_with(|| {
            let entry = hit.entry;
            OccurrenceRecord {
                entry_id: entry.id.clone(),
                kind: entry.kind,
                script: entry.script.clone(),
                latin: entry.latin.clone(),
                translation: entry.translation.clone(),
                paragraph_id: entry.paragraph_id.clone(),
                reference: entry.reference(),
                source: entry.source_info(),
                full_sentence: entry.full_sentence(),
                found_in: Default::default(),
                partial: false,
            }
        });

        match hit.kind {
            MatchKind::Exact => record.found_in |= hit.field.flag(),
            MatchKind::Loose => record.partial = true,
        }
    }

    records.into_values().collect()
}
