//! Corpus model and loading.
//!
//! A corpus is loaded once and then only read. Loading normalizes the many
//! shapes a tabular export can take (original column names, numbers where
//! text is expected, blank cells) into one typed [`Entry`], so the engine
//! never has to probe for optional columns.

use crate::engine::script::{CharCategory, categorize};
use crate::error::CorpusError;
use crate::{Field, Scope};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Whether an entry is a single lexical unit or a whole paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Word,
    Paragraph,
}

impl EntryKind {
    /// Accepts the Indonesian discriminators of the source data as well.
    pub fn from_discriminator(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "word" | "kata" => Some(EntryKind::Word),
            "paragraph" | "paragraf" | "paragraaf" => Some(EntryKind::Paragraph),
            _ => None,
        }
    }
}

/// One corpus record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Stable, unique identifier.
    pub id: String,
    pub kind: EntryKind,
    /// Text in the historic script.
    pub script: Option<String>,
    /// Latin transliteration.
    pub latin: Option<String>,
    /// Indonesian translation.
    pub translation: Option<String>,
    /// Paragraph a word entry occurs in.
    pub paragraph_id: Option<String>,
    pub chapter: Option<String>,
    pub line: Option<String>,
    /// Full sentence the entry was taken from.
    pub sentence: Option<String>,
    pub source: Option<String>,
    pub author: Option<String>,
    pub year: Option<String>,
    /// 1-based position in the loaded corpus.
    pub row: usize,
}

impl Entry {
    pub fn word(id: impl Into<String>, latin: &str, script: &str, translation: &str) -> Self {
        Self::new(id, EntryKind::Word).with_text(Some(script), Some(latin), Some(translation))
    }

    pub fn paragraph(id: impl Into<String>, script: &str, latin: &str, translation: &str) -> Self {
        Self::new(id, EntryKind::Paragraph).with_text(Some(script), Some(latin), Some(translation))
    }

    pub fn new(id: impl Into<String>, kind: EntryKind) -> Self {
        Entry {
            id: id.into(),
            kind,
            script: None,
            latin: None,
            translation: None,
            paragraph_id: None,
            chapter: None,
            line: None,
            sentence: None,
            source: None,
            author: None,
            year: None,
            row: 0,
        }
    }

    /// Set the three searchable fields; blank values count as missing.
    pub fn with_text(mut self, script: Option<&str>, latin: Option<&str>, translation: Option<&str>) -> Self {
        self.script = present(script);
        self.latin = present(latin);
        self.translation = present(translation);
        self
    }

    pub fn in_paragraph(mut self, paragraph_id: &str) -> Self {
        self.paragraph_id = present(Some(paragraph_id));
        self
    }

    pub fn with_source(mut self, source: &str, author: Option<&str>, year: Option<&str>) -> Self {
        self.source = present(Some(source));
        self.author = present(author);
        self.year = present(year);
        self
    }

    /// Text of a searchable field, `None` when missing.
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Script => self.script.as_deref(),
            Field::Latin => self.latin.as_deref(),
            Field::Translation => self.translation.as_deref(),
        }
    }

    /// Human-readable location, e.g. `"Paragraph: P3 | Chapter: 2 | Line: 14"`.
    pub fn reference(&self) -> String {
        let parts = join_labelled(&[
            ("Paragraph", self.paragraph_id.as_deref()),
            ("Chapter", self.chapter.as_deref()),
            ("Line", self.line.as_deref()),
        ]);
        match (parts, self.line.is_some()) {
            (Some(parts), true) => parts,
            (Some(parts), false) if self.row > 0 => format!("{parts} | Entry: {}", self.row),
            (Some(parts), false) => parts,
            (None, _) if self.row > 0 => format!("Entry: {}", self.row),
            (None, _) => "Reference unavailable".to_string(),
        }
    }

    /// Human-readable provenance, e.g. `"Source: Serat Centhini | Year: 1814"`.
    pub fn source_info(&self) -> String {
        join_labelled(&[
            ("Source", self.source.as_deref()),
            ("Author", self.author.as_deref()),
            ("Year", self.year.as_deref()),
        ])
        .unwrap_or_else(|| "Source unknown".to_string())
    }

    /// The recorded sentence, or all three fields side by side.
    pub fn full_sentence(&self) -> String {
        if let Some(sentence) = &self.sentence {
            return sentence.clone();
        }
        join_labelled(&[
            ("Script", self.script.as_deref()),
            ("Latin", self.latin.as_deref()),
            ("Translation", self.translation.as_deref()),
        ])
        .unwrap_or_else(|| "Context unavailable".to_string())
    }
}

fn join_labelled(parts: &[(&str, Option<&str>)]) -> Option<String> {
    let joined: Vec<String> =
        parts.iter().filter_map(|(label, value)| value.map(|v| format!("{label}: {v}"))).collect();
    (!joined.is_empty()).then(|| joined.join(" | "))
}

fn present(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn csv_error(source: csv::Error) -> CorpusError {
    let line = source.position().map_or(0, |p| p.line() as usize);
    CorpusError::Csv { line, source }
}

// --- Loading -------------------------------------------------------------------

/// Row shape accepted from tabular or flattened graph exports.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default, alias = "identifier", alias = "entity", deserialize_with = "loose_text")]
    id: Option<String>,
    #[serde(default, alias = "type", alias = "jenis", deserialize_with = "loose_text")]
    kind: Option<String>,
    #[serde(default, alias = "isiAksaraJawa", alias = "aksara", alias = "javanese", deserialize_with = "loose_text")]
    script: Option<String>,
    #[serde(default, alias = "isiLatin", deserialize_with = "loose_text")]
    latin: Option<String>,
    #[serde(default, alias = "arti", alias = "terjemahan", deserialize_with = "loose_text")]
    translation: Option<String>,
    #[serde(
        default,
        alias = "munculDalamParagraf",
        alias = "paragraph",
        alias = "paragraf",
        deserialize_with = "loose_text"
    )]
    paragraph_id: Option<String>,
    #[serde(default, alias = "bab", deserialize_with = "loose_text")]
    chapter: Option<String>,
    #[serde(default, alias = "baris", deserialize_with = "loose_text")]
    line: Option<String>,
    #[serde(default, alias = "kalimat", alias = "fullText", alias = "context", deserialize_with = "loose_text")]
    sentence: Option<String>,
    #[serde(default, alias = "sumber", alias = "naskah", alias = "manuscript", deserialize_with = "loose_text")]
    source: Option<String>,
    #[serde(default, alias = "penulis", deserialize_with = "loose_text")]
    author: Option<String>,
    #[serde(default, alias = "tahun", deserialize_with = "loose_text")]
    year: Option<String>,
}

/// Accept strings, numbers, booleans or null; blank strings become `None`.
fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(present(Some(s.as_str()))),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!("expected text, found {other}"))),
    }
}

impl RawEntry {
    fn into_entry(self, row: usize) -> Result<Entry, CorpusError> {
        let id = self.id.unwrap_or_else(|| format!("row-{row}"));
        let raw_kind = self.kind.unwrap_or_default();
        let kind = EntryKind::from_discriminator(&raw_kind)
            .ok_or_else(|| CorpusError::UnknownKind { id: id.clone(), value: raw_kind })?;

        Ok(Entry {
            id,
            kind,
            script: self.script,
            latin: self.latin,
            translation: self.translation,
            paragraph_id: self.paragraph_id,
            chapter: self.chapter,
            line: self.line,
            sentence: self.sentence,
            source: self.source,
            author: self.author,
            year: self.year,
            row,
        })
    }
}

// --- Corpus --------------------------------------------------------------------

/// Read-only snapshot of all entries for a session.
///
/// Reloading means building a new `Corpus`; results computed against the old
/// one are stale and should be dropped.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<Entry>,
}

/// Entry counts by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CorpusStats {
    pub total: usize,
    pub paragraphs: usize,
    pub words: usize,
}

/// Distinct historic-script characters present in a corpus, by category,
/// each list sorted by code point.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScriptInventory {
    pub letters: Vec<char>,
    pub signs: Vec<char>,
    pub punctuation: Vec<char>,
    pub digits: Vec<char>,
    pub others: Vec<char>,
}

impl ScriptInventory {
    pub fn len(&self) -> usize {
        self.letters.len() + self.signs.len() + self.punctuation.len() + self.digits.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Corpus {
    /// Build a corpus from entries, rejecting duplicate ids.
    ///
    /// Entries without a row number get their 1-based position.
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, CorpusError> {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut out = Vec::with_capacity(entries.len());
        for (idx, mut entry) in entries.into_iter().enumerate() {
            if !seen.insert(entry.id.clone()) {
                return Err(CorpusError::DuplicateId(entry.id));
            }
            if entry.row == 0 {
                entry.row = idx + 1;
            }
            out.push(entry);
        }

        let corpus = Corpus { entries: out };
        let stats = corpus.stats();
        tracing::info!(total = stats.total, words = stats.words, paragraphs = stats.paragraphs, "corpus loaded");
        Ok(corpus)
    }

    /// Parse a JSON array of rows.
    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        let rows: Vec<RawEntry> =
            serde_json::from_str(json).map_err(|source| CorpusError::Json { line: source.line(), source })?;
        let entries =
            rows.into_iter().enumerate().map(|(idx, raw)| raw.into_entry(idx + 1)).collect::<Result<Vec<_>, _>>()?;
        Self::from_entries(entries)
    }

    /// Parse JSON Lines: one row object per non-blank line.
    pub fn from_json_lines(text: &str) -> Result<Self, CorpusError> {
        let mut entries = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let raw: RawEntry =
                serde_json::from_str(line).map_err(|source| CorpusError::Json { line: idx + 1, source })?;
            entries.push(raw.into_entry(entries.len() + 1)?);
        }
        Self::from_entries(entries)
    }

    /// Parse a CSV export with a header row, the shape of the manuscript
    /// spreadsheets. Cells are read as text, so a transliteration such as
    /// `nan` is never taken for a number. Unknown columns are ignored.
    pub fn from_csv_str(text: &str) -> Result<Self, CorpusError> {
        let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
        let headers = reader.headers().map_err(csv_error)?.clone();

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            let row: serde_json::Map<String, serde_json::Value> = headers
                .iter()
                .zip(record.iter())
                .filter(|(header, _)| !header.trim().is_empty())
                .map(|(header, cell)| (header.trim().to_string(), serde_json::Value::String(cell.to_string())))
                .collect();
            let raw: RawEntry = serde_json::from_value(serde_json::Value::Object(row))
                .map_err(|source| CorpusError::Json { line, source })?;
            entries.push(raw.into_entry(entries.len() + 1)?);
        }
        Self::from_entries(entries)
    }

    /// Load a `.csv`, `.json` (array) or `.jsonl` (one row per line) file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        let read = || std::fs::read_to_string(path).map_err(|source| CorpusError::Io { path: path.into(), source });

        match ext.as_deref() {
            Some("csv") => Self::from_csv_str(&read()?),
            Some("json") => Self::from_json_str(&read()?),
            Some("jsonl") | Some("ndjson") => Self::from_json_lines(&read()?),
            _ => Err(CorpusError::UnsupportedFormat(path.into())),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CorpusStats {
        let paragraphs = self.entries.iter().filter(|e| e.kind == EntryKind::Paragraph).count();
        CorpusStats { total: self.entries.len(), paragraphs, words: self.entries.len() - paragraphs }
    }

    /// Collect the historic-script characters used in the script field.
    pub fn script_inventory(&self) -> ScriptInventory {
        let chars: BTreeSet<char> = self
            .entries
            .iter()
            .filter_map(|e| e.field(Field::Script))
            .flat_map(str::chars)
            .filter(|c| categorize(*c).is_some())
            .collect();

        let mut inventory = ScriptInventory::default();
        for c in chars {
            let bucket = match categorize(c) {
                Some(CharCategory::Letter) => &mut inventory.letters,
                Some(CharCategory::Sign) => &mut inventory.signs,
                Some(CharCategory::Punctuation) => &mut inventory.punctuation,
                Some(CharCategory::Digit) => &mut inventory.digits,
                Some(CharCategory::Other) | None => &mut inventory.others,
            };
            bucket.push(c);
        }
        inventory
    }

    /// Number of entries that have text in every field `scope` selects.
    pub fn searchable_in(&self, scope: Scope) -> usize {
        let fields = scope.fields();
        self.entries.iter().filter(|e| fields.fields().all(|f| e.field(f).is_some())).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ROWS: &str = r#"[
        {"id": "k1", "type": "Kata", "isiAksaraJawa": "ꦠꦠ꧀ꦏꦭ", "isiLatin": "tatkala", "arti": "ketika",
         "munculDalamParagraf": "p1", "baris": 3},
        {"id": "p1", "type": "Paragraf", "isiAksaraJawa": "ꦠꦠ꧀ꦏꦭ​ꦮꦶꦮꦶꦠ꧀", "isiLatin": "tatkala wiwit",
         "arti": "ketika mulai", "sumber": "Serat", "tahun": 1814},
        {"type": "Kata", "isiLatin": "ing", "arti": "  ", "isiAksaraJawa": null}
    ]"#;

    #[test]
    fn loads_original_column_names() {
        let corpus = Corpus::from_json_str(ROWS).unwrap();
        assert_eq!(corpus.len(), 3);

        let word = &corpus.entries()[0];
        assert_eq!(word.kind, EntryKind::Word);
        assert_eq!(word.latin.as_deref(), Some("tatkala"));
        assert_eq!(word.paragraph_id.as_deref(), Some("p1"));
        assert_eq!(word.line.as_deref(), Some("3"));
        assert_eq!(word.reference(), "Paragraph: p1 | Line: 3");

        let para = &corpus.entries()[1];
        assert_eq!(para.kind, EntryKind::Paragraph);
        assert_eq!(para.source_info(), "Source: Serat | Year: 1814");
        assert_eq!(para.reference(), "Entry: 2");
    }

    #[test]
    fn blank_and_null_cells_are_missing() {
        let corpus = Corpus::from_json_str(ROWS).unwrap();
        let entry = &corpus.entries()[2];
        assert_eq!(entry.id, "row-3");
        assert_eq!(entry.script, None);
        assert_eq!(entry.translation, None);
        assert_eq!(entry.full_sentence(), "Latin: ing");
        assert_eq!(entry.source_info(), "Source unknown");
    }

    #[test]
    fn rejects_duplicate_ids_and_unknown_kinds() {
        let dup = r#"[{"id": "a", "type": "Kata"}, {"id": "a", "type": "Kata"}]"#;
        assert!(matches!(Corpus::from_json_str(dup), Err(CorpusError::DuplicateId(id)) if id == "a"));

        let bad = r#"[{"id": "a", "type": "Bab"}]"#;
        assert!(matches!(Corpus::from_json_str(bad), Err(CorpusError::UnknownKind { value, .. }) if value == "Bab"));
    }

    #[test]
    fn json_lines_report_the_failing_line() {
        let text = "{\"id\": \"a\", \"type\": \"word\"}\n\n{not json}\n";
        match Corpus::from_json_lines(text) {
            Err(CorpusError::Json { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected JSON error, got {other:?}"),
        }
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("pupuh.json");
        std::fs::write(&json_path, ROWS).unwrap();
        assert_eq!(Corpus::load(&json_path).unwrap().len(), 3);

        let jsonl_path = dir.path().join("pupuh.jsonl");
        let mut file = std::fs::File::create(&jsonl_path).unwrap();
        writeln!(file, r#"{{"id": "k1", "type": "kata", "isiLatin": "ing"}}"#).unwrap();
        writeln!(file, r#"{{"id": "k2", "type": "kata", "isiLatin": "kang"}}"#).unwrap();
        assert_eq!(Corpus::load(&jsonl_path).unwrap().len(), 2);

        let xlsx_path = dir.path().join("pupuh.xlsx");
        std::fs::write(&xlsx_path, "id,type\n").unwrap();
        assert!(matches!(Corpus::load(&xlsx_path), Err(CorpusError::UnsupportedFormat(_))));

        assert!(matches!(Corpus::load(dir.path().join("missing.json")), Err(CorpusError::Io { .. })));
    }

    const PUPUH_CSV: &str = "\
No,id,type,isiAksaraJawa,isiLatin,arti,munculDalamParagraf,baris,sumber,tahun
1,k1,Kata,ꦠꦠ꧀ꦏꦭ,tatkala,ketika,p1,3,,
2,k2,Kata,ꦤꦤ꧀,nan,\"ada, terdapat\",p1,,,
3,p1,Paragraf,ꦠꦠ꧀ꦏꦭ\u{200B}ꦮꦶꦮꦶꦠ꧀,tatkala wiwit,ketika mulai,,,Serat Babad,1814
";

    #[test]
    fn loads_csv_with_original_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pupuh.csv");
        std::fs::write(&path, PUPUH_CSV).unwrap();

        let corpus = Corpus::load(&path).unwrap();
        assert_eq!(corpus.stats(), CorpusStats { total: 3, paragraphs: 1, words: 2 });

        let word = &corpus.entries()[0];
        assert_eq!(word.script.as_deref(), Some("ꦠꦠ꧀ꦏꦭ"));
        assert_eq!(word.reference(), "Paragraph: p1 | Line: 3");
        assert_eq!(word.source, None);

        // cells stay text and quoted commas stay in the cell
        let nan = &corpus.entries()[1];
        assert_eq!(nan.latin.as_deref(), Some("nan"));
        assert_eq!(nan.translation.as_deref(), Some("ada, terdapat"));

        let para = &corpus.entries()[2];
        assert_eq!(para.kind, EntryKind::Paragraph);
        assert_eq!(para.source_info(), "Source: Serat Babad | Year: 1814");
    }

    #[test]
    fn csv_errors_carry_the_line() {
        let text = "id,type,isiLatin\nk1,Kata,ing\nk2,Kata\n";
        match Corpus::from_csv_str(text) {
            Err(CorpusError::Csv { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected CSV error, got {other:?}"),
        }

        let unknown = "id,type,isiLatin\nk1,Bab,ing\n";
        let err = Corpus::from_csv_str(unknown).unwrap_err();
        assert!(matches!(err, CorpusError::UnknownKind { value, .. } if value == "Bab"));
    }

    #[test]
    fn stats_and_inventory() {
        let corpus = Corpus::from_json_str(ROWS).unwrap();
        assert_eq!(corpus.stats(), CorpusStats { total: 3, paragraphs: 1, words: 2 });

        let inventory = corpus.script_inventory();
        assert!(inventory.letters.contains(&'ꦠ'));
        assert!(inventory.signs.contains(&'꧀'));
        assert!(inventory.letters.windows(2).all(|w| w[0] < w[1]));
        // zero-width space is not part of the block
        assert!(!inventory.others.contains(&'\u{200B}'));
    }

    #[test]
    fn searchable_counts_entries_with_all_scoped_fields() {
        let corpus = Corpus::from_json_str(ROWS).unwrap();
        assert_eq!(corpus.searchable_in(Scope::LatinOnly), 3);
        assert_eq!(corpus.searchable_in(Scope::ScriptOnly), 2);
        assert_eq!(corpus.searchable_in(Scope::All), 2);
    }
}
