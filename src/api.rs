use crate::corpus::{Corpus, EntryKind};
use crate::engine::{self, ScriptClass, boundary::DEFAULT_REGEX_SIZE_LIMIT, script::{normalize_query, query_class}};
use crate::{FieldSet, Scope};
use indexmap::IndexMap;
use serde::Serialize;
use std::time::Duration;

/// How a query with [`Scope::All`] picks the fields it searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopePolicy {
    /// A Javanese query only searches the script field; any other query only
    /// searches the transliteration and the translation.
    #[default]
    ScriptGated,
    /// Every field is searched whatever the query's script.
    AllFields,
}

/// Options that affect searching and context extraction.
#[derive(Debug, Clone)]
pub struct Options {
    pub scope_policy: ScopePolicy,
    /// When no entry matches the script field with clean boundaries, accept
    /// plain substring matches there and group them separately.
    pub loose_script_fallback: bool,
    /// Characters kept on each side of a match in script-field context.
    pub script_context_window: usize,
    /// Characters kept on each side of a match in translation context.
    pub translation_context_window: usize,
    /// Compiled-size limit for the query pattern, in bytes.
    pub regex_size_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            scope_policy: ScopePolicy::ScriptGated,
            loose_script_fallback: false,
            script_context_window: 50,
            translation_context_window: 100,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }
}

/// A normalized query and the scope it searches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Query {
    text: String,
    scope: Scope,
}

impl Query {
    /// Trim the text and collapse inner whitespace runs (zero-width spaces
    /// included) into single spaces.
    pub fn new(text: &str, scope: Scope) -> Self {
        Self { text: normalize_query(text), scope }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when the query contains Javanese characters.
    pub fn is_script_query(&self) -> bool {
        self.class() == ScriptClass::Historic
    }

    pub fn class(&self) -> ScriptClass {
        query_class(&self.text)
    }

    /// Fields to search under `policy`.
    pub fn fields(&self, policy: ScopePolicy) -> FieldSet {
        match (self.scope, policy) {
            (Scope::All, ScopePolicy::ScriptGated) if self.is_script_query() => FieldSet::SCRIPT,
            (Scope::All, ScopePolicy::ScriptGated) => FieldSet::LATIN | FieldSet::TRANSLATION,
            (scope, _) => scope.fields(),
        }
    }
}

/// One entry's contribution to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccurrenceRecord {
    pub entry_id: String,
    pub kind: EntryKind,
    pub script: Option<String>,
    pub latin: Option<String>,
    pub translation: Option<String>,
    pub paragraph_id: Option<String>,
    /// Location string, see [`crate::Entry::reference`].
    pub reference: String,
    /// Provenance string, see [`crate::Entry::source_info`].
    pub source: String,
    pub full_sentence: String,
    /// Fields where the query matched with clean boundaries.
    pub found_in: FieldSet,
    /// Set when the script field only matched as a substring.
    pub partial: bool,
}

impl OccurrenceRecord {
    /// Matched only through the loose script fallback.
    pub fn is_partial_only(&self) -> bool {
        self.partial && self.found_in.is_empty()
    }
}

/// What a group stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupKind {
    Word,
    PartialWord,
    Paragraph,
}

/// Occurrences collected under one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub key: String,
    pub kind: GroupKind,
    /// Representative word (or the query, for paragraph groups).
    pub word: String,
    /// Representative script text; a context window for paragraph groups.
    pub script: Option<String>,
    /// Representative translation; a context window for paragraph groups.
    pub translation: Option<String>,
    occurrences: Vec<OccurrenceRecord>,
    total_count: usize,
}

impl Group {
    pub(crate) fn new(
        key: String,
        kind: GroupKind,
        word: String,
        script: Option<String>,
        translation: Option<String>,
    ) -> Self {
        Self { key, kind, word, script, translation, occurrences: Vec::new(), total_count: 0 }
    }

    pub(crate) fn push(&mut self, occurrence: OccurrenceRecord) {
        self.occurrences.push(occurrence);
        self.total_count += 1;
        debug_assert_eq!(self.total_count, self.occurrences.len());
    }

    /// Occurrences in scan order.
    pub fn occurrences(&self) -> &[OccurrenceRecord] {
        &self.occurrences
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }
}

/// Totals over a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ResultStats {
    pub groups: usize,
    pub occurrences: usize,
}

/// Output of one search: groups in first-seen order.
///
/// A result is a pure function of the corpus snapshot, the query and the
/// options. It becomes stale when the corpus is reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub query: Query,
    pub groups: IndexMap<String, Group>,
}

impl SearchResult {
    pub(crate) fn empty(query: Query) -> Self {
        Self { query, groups: IndexMap::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Group> {
        self.groups.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn stats(&self) -> ResultStats {
        ResultStats { groups: self.groups.len(), occurrences: self.groups.values().map(Group::total_count).sum() }
    }
}

/// Extra details returned by [`search_verbose_with`].
///
/// Kept apart from [`SearchResult`] so that results stay comparable across
/// runs.
#[derive(Debug, Clone, Serialize)]
pub struct SearchDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Time spent matching fields.
    pub scan: Duration,
    pub dedupe: Duration,
    pub group: Duration,
    pub entries_scanned: usize,
    /// Field-level hits before deduplication.
    pub raw_hits: usize,
    /// Match spans across all hits; a field with three matches counts three.
    pub spans: usize,
    pub fields: FieldSet,
    pub class: ScriptClass,
    /// Loose script matching was used.
    pub loose_fallback: bool,
    /// The query pattern could not be compiled and substring matching was used.
    pub pattern_fallback: bool,
}

/// Result from [`search_verbose_with`].
#[derive(Debug, Clone, Serialize)]
pub struct SearchResultVerbose {
    pub result: SearchResult,
    pub details: SearchDetails,
}

/// Search `corpus` for `query` in `scope` with default [`Options`].
///
/// # Example
/// ```
/// use naskah::{Corpus, Entry, Scope, search};
///
/// let corpus = Corpus::from_entries(vec![Entry::word("k1", "tatkala", "ꦠꦠ꧀ꦏꦭ", "ketika")]).unwrap();
/// let result = search(&corpus, "tatkala", Scope::All);
/// assert_eq!(result.stats().occurrences, 1);
/// assert!(search(&corpus, "kala", Scope::LatinOnly).is_empty());
/// ```
pub fn search(corpus: &Corpus, query: &str, scope: Scope) -> SearchResult {
    search_with(corpus, &Query::new(query, scope), &Options::default())
}

/// Search with an explicit [`Query`] and [`Options`].
pub fn search_with(corpus: &Corpus, query: &Query, options: &Options) -> SearchResult {
    engine::run(corpus.entries(), query, options).result
}

/// Like [`search_with`], also returning stage timings and counters.
pub fn search_verbose_with(corpus: &Corpus, query: &Query, options: &Options) -> SearchResultVerbose {
    let run = engine::run(corpus.entries(), query, options);
    let metrics = run.metrics;

    let details = SearchDetails {
        total: metrics.total,
        scan: metrics.scan,
        dedupe: metrics.dedupe,
        group: metrics.group,
        entries_scanned: metrics.entries_scanned,
        raw_hits: metrics.raw_hits,
        spans: metrics.spans,
        fields: metrics.fields,
        class: query.class(),
        loose_fallback: metrics.loose_fallback,
        pattern_fallback: metrics.pattern_fallback,
    };

    SearchResultVerbose { result: run.result, details }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_normalizes_whitespace() {
        let q = Query::new("  ꦲꦶꦁ\u{200B}\u{200B}ꦏꦁ \t", Scope::All);
        assert_eq!(q.text(), "ꦲꦶꦁ ꦏꦁ");
        assert!(q.is_script_query());

        assert!(Query::new(" \u{200B}\n", Scope::All).is_empty());
    }

    #[test]
    fn script_gating_picks_fields() {
        let script = Query::new("ꦲꦶꦁ", Scope::All);
        let latin = Query::new("ing", Scope::All);

        assert_eq!(script.fields(ScopePolicy::ScriptGated), FieldSet::SCRIPT);
        assert_eq!(latin.fields(ScopePolicy::ScriptGated), FieldSet::LATIN | FieldSet::TRANSLATION);
        assert_eq!(latin.fields(ScopePolicy::AllFields), FieldSet::all());

        // explicit scopes are honoured whatever the script
        let forced = Query::new("ing", Scope::ScriptOnly);
        assert_eq!(forced.fields(ScopePolicy::ScriptGated), FieldSet::SCRIPT);
    }

    #[test]
    fn group_count_follows_pushes() {
        let mut group = Group::new("k".into(), GroupKind::Word, "w".into(), None, None);
        assert_eq!(group.total_count(), 0);
        let occurrence = OccurrenceRecord {
            entry_id: "e".into(),
            kind: EntryKind::Word,
            script: None,
            latin: None,
            translation: None,
            paragraph_id: None,
            reference: String::new(),
            source: String::new(),
            full_sentence: String::new(),
            found_in: FieldSet::LATIN,
            partial: false,
        };
        group.push(occurrence.clone());
        group.push(occurrence);
        assert_eq!(group.total_count(), 2);
        assert_eq!(group.occurrences().len(), 2);
    }
}
