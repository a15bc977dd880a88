//! Group occurrence records into display units.
//!
//! ```text
//! Word entry, clean match      -> "<latin> (<script>)"            GroupKind::Word
//! Word entry, loose match only -> "<latin> (<script>) ~partial"   GroupKind::PartialWord
//! Paragraph entry              -> "<paragraph id> :: <query>"     GroupKind::Paragraph
//! ```
//!
//! Word keys come from the entry's own text, so every occurrence of the same
//! word (across different entry ids) lands in one group. Loose matches never
//! share a group with clean ones. Each paragraph gets its own group, whose
//! representative texts are context windows around the query.
//!
//! Groups are created lazily on first occurrence and appended to in record
//! order. Nothing is merged or removed afterwards.

use super::context::extract_context;
use crate::{EntryKind, Group, GroupKind, OccurrenceRecord, Options, Query};
use indexmap::IndexMap;

pub const PARTIAL_SUFFIX: &str = " ~partial";

/// Build groups from deduplicated records, keyed and ordered by first
/// appearance.
pub(crate) fn group(records: Vec<OccurrenceRecord>, query: &Query, options: &Options) -> IndexMap<String, Group> {
    let mut groups: IndexMap<String, Group> = IndexMap::new();

    for record in records {
        let key = group_key(&record, query);
        let group = groups.entry(key.clone()).or_insert_with(|| new_group(key, &record, query, options));
        group.push(record);
    }

    groups
}

fn word_label(record: &OccurrenceRecord) -> String {
    record.latin.clone().or_else(|| record.script.clone()).unwrap_or_else(|| record.entry_id.clone())
}

fn group_key(record: &OccurrenceRecord, query: &Query) -> String {
    match record.kind {
        EntryKind::Word => {
            let mut key = match (&record.latin, &record.script) {
                (Some(latin), Some(script)) => format!("{latin} ({script})"),
                _ => word_label(record),
            };
            if record.is_partial_only() {
                key.push_str(PARTIAL_SUFFIX);
            }
            key
        }
        EntryKind::Paragraph => format!("{} :: {}", record.entry_id, query.text()),
    }
}

fn new_group(key: String, record: &OccurrenceRecord, query: &Query, options: &Options) -> Group {
    match record.kind {
        EntryKind::Word => {
            let kind = if record.is_partial_only() { GroupKind::PartialWord } else { GroupKind::Word };
            Group::new(key, kind, word_label(record), record.script.clone(), record.translation.clone())
        }
        EntryKind::Paragraph => {
            let class = query.class();
            let script = record
                .script
                .as_deref()
                .map(|t| extract_context(t, query.text(), options.script_context_window, class));
            let translation = record
                .translation
                .as_deref()
                .map(|t| extract_context(t, query.text(), options.translation_context_window, class));
            Group::new(key, GroupKind::Paragraph, query.text().to_string(), script, translation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::ELLIPSIS;
    use crate::{FieldSet, Scope};

    fn record(id: &str, kind: EntryKind, latin: &str, script: &str, found_in: FieldSet) -> OccurrenceRecord {
        OccurrenceRecord {
            entry_id: id.into(),
            kind,
            script: Some(script.into()),
            latin: Some(latin.into()),
            translation: Some("ketika".into()),
            paragraph_id: None,
            reference: String::new(),
            source: String::new(),
            full_sentence: String::new(),
            found_in,
            partial: false,
        }
    }

    #[test]
    fn same_word_from_different_entries_shares_a_group() {
        let query = Query::new("tatkala", Scope::All);
        let records = vec![
            record("k1", EntryKind::Word, "tatkala", "ꦠꦠ꧀ꦏꦭ", FieldSet::LATIN),
            record("k2", EntryKind::Word, "ing", "ꦲꦶꦁ", FieldSet::TRANSLATION),
            record("k9", EntryKind::Word, "tatkala", "ꦠꦠ꧀ꦏꦭ", FieldSet::LATIN),
        ];

        let groups = group(records, &query, &Options::default());
        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["tatkala (ꦠꦠ꧀ꦏꦭ)", "ing (ꦲꦶꦁ)"]);

        let tatkala = &groups["tatkala (ꦠꦠ꧀ꦏꦭ)"];
        assert_eq!(tatkala.kind, GroupKind::Word);
        assert_eq!(tatkala.word, "tatkala");
        assert_eq!(tatkala.total_count(), 2);
        let ids: Vec<&str> = tatkala.occurrences().iter().map(|o| o.entry_id.as_str()).collect();
        assert_eq!(ids, vec!["k1", "k9"]);
    }

    #[test]
    fn partial_matches_get_their_own_group() {
        let query = Query::new("ꦠꦠ꧀ꦏꦭ", Scope::All);
        let exact = record("k1", EntryKind::Word, "tatkala", "ꦠꦠ꧀ꦏꦭ", FieldSet::SCRIPT);
        let mut loose = record("k2", EntryKind::Word, "tatkala", "ꦠꦠ꧀ꦏꦭ", FieldSet::empty());
        loose.partial = true;

        let groups = group(vec![exact, loose], &query, &Options::default());
        assert_eq!(groups.len(), 2);
        let partial = &groups[&format!("tatkala (ꦠꦠ꧀ꦏꦭ){PARTIAL_SUFFIX}")];
        assert_eq!(partial.kind, GroupKind::PartialWord);
        assert_eq!(partial.total_count(), 1);
    }

    #[test]
    fn each_paragraph_is_its_own_group_with_context() {
        let query = Query::new("ing", Scope::All);
        let long = format!("{} ing {}", "wonten".repeat(20), "pasar".repeat(30));
        let records = vec![
            record("p1", EntryKind::Paragraph, &long, "ꦲꦶꦁ", FieldSet::LATIN),
            record("p2", EntryKind::Paragraph, "ing", "ꦲꦶꦁ", FieldSet::LATIN),
        ];
        let options = Options { translation_context_window: 5, script_context_window: 5, ..Options::default() };

        let groups = group(records, &query, &options);
        assert_eq!(groups.len(), 2);
        let p1 = &groups["p1 :: ing"];
        assert_eq!(p1.kind, GroupKind::Paragraph);
        assert_eq!(p1.word, "ing");
        // the translation has no clean match, so it is kept whole
        assert_eq!(p1.translation.as_deref(), Some("ketika"));
        assert!(groups.contains_key("p2 :: ing"));
    }

    #[test]
    fn paragraph_script_context_is_clipped() {
        let query = Query::new("ꦲꦶꦁ", Scope::All);
        let zwsp = '\u{200B}';
        let script = format!("{}{zwsp}ꦲꦶꦁ{zwsp}{}", "ꦏ".repeat(80), "ꦱ".repeat(80));
        let records = vec![record("p1", EntryKind::Paragraph, "ing", &script, FieldSet::SCRIPT)];

        let groups = group(records, &query, &Options::default());
        let context = groups["p1 :: ꦲꦶꦁ"].script.clone().unwrap();
        assert!(context.starts_with(ELLIPSIS) && context.ends_with(ELLIPSIS));
        assert!(context.chars().count() < script.chars().count());
    }

    #[test]
    fn words_without_script_fall_back_to_latin_or_id() {
        let query = Query::new("ing", Scope::All);
        let mut no_script = record("k1", EntryKind::Word, "ing", "", FieldSet::LATIN);
        no_script.script = None;
        let mut bare = no_script.clone();
        bare.entry_id = "k2".into();
        bare.latin = None;

        let groups = group(vec![no_script, bare], &query, &Options::default());
        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ing", "k2"]);
    }
}
