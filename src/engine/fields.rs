//! Field search: run the boundary matcher over every entry.
//!
//! For each entry and each selected field, a non-empty match set produces one
//! `Hit`. Missing fields are skipped for that entry only; nothing one entry
//! contains can stop the scan of the others.
//!
//! When the loose script fallback is enabled and no entry matched the script
//! field with clean boundaries, a second pass accepts plain substrings in the
//! script field. Those hits are tagged `MatchKind::Loose` and merged back in
//! corpus order, so an entry found only loosely still comes before the later
//! entries that matched exactly.

use super::boundary::Matcher;
use super::script::ScriptClass;
use crate::{Entry, Field, FieldSet, Hit, MatchKind, Options, Query};

/// Hits and scan facts for one query.
#[derive(Debug, Default)]
pub(crate) struct ScanOutcome<'a> {
    pub hits: Vec<Hit<'a>>,
    pub fields: FieldSet,
    pub entries_scanned: usize,
    pub loose_fallback: bool,
    pub pattern_fallback: bool,
}

/// Scan `entries` for `query`. Blank queries produce no hits.
pub(crate) fn search_fields<'a>(entries: &'a [Entry], query: &Query, options: &Options) -> ScanOutcome<'a> {
    if query.is_empty() {
        return ScanOutcome::default();
    }

    let class = query.class();
    let fields = query.fields(options.scope_policy);
    let matcher = Matcher::for_query(query.text(), class, options.regex_size_limit);

    let mut outcome = ScanOutcome {
        hits: Vec::new(),
        fields,
        entries_scanned: entries.len(),
        loose_fallback: false,
        pattern_fallback: matcher.is_fallback(),
    };

    // (entry position, hit)
    let mut hits: Vec<(usize, Hit<'a>)> = Vec::new();
    for (pos, entry) in entries.iter().enumerate() {
        for field in fields.fields() {
            let Some(text) = entry.field(field) else {
                tracing::trace!(entry = %entry.id, ?field, "field missing, skipped");
                continue;
            };
            let spans = matcher.find_bounded(text);
            if !spans.is_empty() {
                tracing::trace!(entry = %entry.id, ?field, spans = spans.len(), "hit");
                hits.push((pos, Hit { entry, field, kind: MatchKind::Exact, spans }));
            }
        }
    }

    let script_exact = hits.iter().any(|(_, h)| h.field == Field::Script);
    let wants_loose =
        options.loose_script_fallback && class == ScriptClass::Historic && fields.contains(FieldSet::SCRIPT);
    if wants_loose && !script_exact {
        outcome.loose_fallback = true;
        for (pos, entry) in entries.iter().enumerate() {
            let Some(text) = entry.field(Field::Script) else { continue };
            let spans = matcher.find_loose(text);
            if !spans.is_empty() {
                tracing::trace!(entry = %entry.id, spans = spans.len(), "loose script hit");
                hits.push((pos, Hit { entry, field: Field::Script, kind: MatchKind::Loose, spans }));
            }
        }
        // back to scan order: entry, then field
        hits.sort_by_key(|(pos, hit)| (*pos, hit.field as u8));
    }

    outcome.hits = hits.into_iter().map(|(_, hit)| hit).collect();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntryKind, Scope, ScopePolicy};

    fn corpus() -> Vec<Entry> {
        vec![
            Entry::word("k1", "tatkala", "ꦠꦠ꧀ꦏꦭ", "ketika"),
            Entry::word("k2", "ing", "ꦲꦶꦁ", "di"),
            Entry::new("k3", EntryKind::Word).with_text(None, Some("ingkang"), None),
            Entry::paragraph(
                "p1",
                "ꦱꦏꦺꦧꦼꦂ\u{200B}ꦲꦶꦁ\u{200B}ꦱꦸꦫꦥꦿꦶꦁꦒ",
                "sakeber ing surapringga",
                "menyebar di Surabaya",
            ),
        ]
    }

    fn found(outcome: &ScanOutcome<'_>) -> Vec<(String, Field)> {
        outcome.hits.iter().map(|h| (h.entry.id.clone(), h.field)).collect()
    }

    #[test]
    fn latin_query_searches_latin_and_translation() {
        let entries = corpus();
        let outcome = search_fields(&entries, &Query::new("ing", Scope::All), &Options::default());
        assert_eq!(outcome.fields, FieldSet::LATIN | FieldSet::TRANSLATION);
        assert_eq!(found(&outcome), vec![("k2".to_string(), Field::Latin), ("p1".to_string(), Field::Latin)]);
    }

    #[test]
    fn script_query_searches_script_only() {
        let entries = corpus();
        let outcome = search_fields(&entries, &Query::new("ꦲꦶꦁ", Scope::All), &Options::default());
        assert_eq!(found(&outcome), vec![("k2".to_string(), Field::Script), ("p1".to_string(), Field::Script)]);
    }

    #[test]
    fn all_fields_policy_ignores_script_detection() {
        let entries = corpus();
        let options = Options { scope_policy: ScopePolicy::AllFields, ..Options::default() };
        let outcome = search_fields(&entries, &Query::new("di", Scope::All), &options);
        assert_eq!(outcome.fields, FieldSet::all());
        assert_eq!(
            found(&outcome),
            vec![("k2".to_string(), Field::Translation), ("p1".to_string(), Field::Translation)]
        );
    }

    #[test]
    fn blank_query_and_missing_fields() {
        let entries = corpus();
        let outcome = search_fields(&entries, &Query::new(" \t", Scope::All), &Options::default());
        assert!(outcome.hits.is_empty());
        assert_eq!(outcome.entries_scanned, 0);

        // k3 has no translation; it is skipped without affecting others
        let outcome = search_fields(&entries, &Query::new("ingkang", Scope::All), &Options::default());
        assert_eq!(found(&outcome), vec![("k3".to_string(), Field::Latin)]);
    }

    #[test]
    fn loose_fallback_only_without_exact_script_hits() {
        let entries = corpus();
        let options = Options { loose_script_fallback: true, ..Options::default() };

        // exact hits exist, so no loose pass
        let outcome = search_fields(&entries, &Query::new("ꦲꦶꦁ", Scope::All), &options);
        assert!(!outcome.loose_fallback);
        assert!(outcome.hits.iter().all(|h| h.kind == MatchKind::Exact));

        // "ꦱꦸꦫ" only occurs inside a longer word
        let outcome = search_fields(&entries, &Query::new("ꦱꦸꦫ", Scope::All), &options);
        assert!(outcome.loose_fallback);
        assert_eq!(found(&outcome), vec![("p1".to_string(), Field::Script)]);
        assert_eq!(outcome.hits[0].kind, MatchKind::Loose);

        // disabled by default
        let outcome = search_fields(&entries, &Query::new("ꦱꦸꦫ", Scope::All), &Options::default());
        assert!(outcome.hits.is_empty());
    }

    #[test]
    fn loose_hits_stay_in_corpus_order() {
        // a only contains the query inside a word, b has it standalone in the translation
        let entries = vec![
            Entry::word("a", "saking", "ꦱꦏꦲꦶꦁ", "dari"),
            Entry::word("b", "ing", "ꦲꦶꦁꦏꦁ", "ꦲꦶꦁ"),
        ];
        let options =
            Options { scope_policy: ScopePolicy::AllFields, loose_script_fallback: true, ..Options::default() };
        let outcome = search_fields(&entries, &Query::new("ꦲꦶꦁ", Scope::All), &options);

        assert!(outcome.loose_fallback);
        let expected = vec![
            ("a".to_string(), Field::Script),
            ("b".to_string(), Field::Script),
            ("b".to_string(), Field::Translation),
        ];
        assert_eq!(found(&outcome), expected);
        let kinds: Vec<MatchKind> = outcome.hits.iter().map(|h| h.kind).collect();
        assert_eq!(kinds, vec![MatchKind::Loose, MatchKind::Loose, MatchKind::Exact]);
    }

    #[test]
    fn hits_keep_every_span() {
        let entries = vec![Entry::paragraph("p", "ꦲꦶꦁ ꦲꦶꦁ꧈ꦲꦶꦁ", "ing ing ing", "")];
        let outcome = search_fields(&entries, &Query::new("ing", Scope::LatinOnly), &Options::default());
        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(outcome.hits[0].spans.len(), 3);
    }
}
