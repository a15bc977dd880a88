#[macro_use]
mod macros;
mod api;
mod corpus;
mod engine;
mod error;


pub use api::{
    Group, GroupKind, OccurrenceRecord, Options, Query, ResultStats, ScopePolicy, SearchDetails, SearchResult,
    SearchResultVerbose, search, search_verbose_with, search_with,
};
pub use corpus::{Corpus, CorpusStats, Entry, EntryKind, ScriptInventory};
pub use engine::{
    HighlightStyle, ScriptClass, classify, extract_context, highlight, highlight_with, is_historic_script_query,
};
pub use error::CorpusError;

use serde::{Deserialize, Serialize};

// --- Fields and scopes -------------------------------------------------------

/// One of the three searchable text fields of an [`Entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Text in the historic (Javanese) script.
    Script,
    /// Latin transliteration.
    Latin,
    /// Indonesian translation.
    Translation,
}

impl Field {
    /// All fields in scan order.
    pub const ALL: [Field; 3] = [Field::Script, Field::Latin, Field::Translation];

    pub fn label(self) -> &'static str {
        match self {
            Field::Script => "Script",
            Field::Latin => "Latin",
            Field::Translation => "Translation",
        }
    }

    /// The [`FieldSet`] bit for this field.
    pub fn flag(self) -> FieldSet {
        match self {
            Field::Script => FieldSet::SCRIPT,
            Field::Latin => FieldSet::LATIN,
            Field::Translation => FieldSet::TRANSLATION,
        }
    }
}

bitflags::bitflags! {
    /// Set of fields, used both for the fields a scope selects and for the
    /// fields an occurrence was found in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldSet: u8 {
        const SCRIPT      = 1 << 0;
        const LATIN       = 1 << 1;
        const TRANSLATION = 1 << 2;
    }
}

impl FieldSet {
    /// Fields contained in this set, in scan order.
    pub fn fields(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| self.contains(f.flag()))
    }

    /// Human labels of the contained fields, in display order.
    pub fn labels(self) -> Vec<&'static str> {
        self.fields().map(Field::label).collect()
    }
}

impl Serialize for FieldSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.fields())
    }
}

/// Which fields a query asks to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    All,
    ScriptOnly,
    LatinOnly,
    TranslationOnly,
}

impl Scope {
    pub fn fields(self) -> FieldSet {
        match self {
            Scope::All => FieldSet::all(),
            Scope::ScriptOnly => FieldSet::SCRIPT,
            Scope::LatinOnly => FieldSet::LATIN,
            Scope::TranslationOnly => FieldSet::TRANSLATION,
        }
    }

    /// Parse the short names used on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "all" => Some(Scope::All),
            "script" | "javanese" | "aksara" => Some(Scope::ScriptOnly),
            "latin" => Some(Scope::LatinOnly),
            "translation" | "arti" => Some(Scope::TranslationOnly),
            _ => None,
        }
    }
}

// --- Internal match types ----------------------------------------------------

/// Byte span of one match inside a field's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MatchSpan {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

/// How a hit was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MatchKind {
    /// Clean boundary on both sides.
    Exact,
    /// Script substring without clean boundaries (fallback only).
    Loose,
}

/// One field of one entry that contains the query.
#[derive(Debug, Clone)]
pub(crate) struct Hit<'a> {
    pub entry: &'a Entry,
    pub field: Field,
    pub kind: MatchKind,
    /// All non-overlapping spans; grouping only needs field presence.
    pub spans: Vec<MatchSpan>,
}
