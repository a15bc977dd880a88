//! Script classification and separator sets.
//!
//! The historic script here is Javanese (aksara Jawa), Unicode block
//! U+A980..U+A9DF. Javanese text does not use spaces consistently: words are
//! often run together or split by zero-width spaces, and clauses end with the
//! script's own punctuation (pada lingsa, pada lungsi, ...). Latin text uses
//! ordinary whitespace and ASCII punctuation. Each writing system therefore
//! gets its own separator set.
//!
//! ## Block layout used for categorization
//!
//! ```text
//! A980..A983  signs (panyangga, cecak, layar, wignyan)   -> Letter
//! A984..A9B2  letters (aksara, swara, murda)             -> Letter
//! A9B3..A9C0  dependent signs (sandhangan, pangkon)      -> Sign
//! A9C1..A9CF  punctuation (pada) incl. pangrangkep       -> Punctuation
//! A9D0..A9D9  digits                                     -> Digit
//! A9DA..A9DF  unassigned / pisolek                       -> Other
//! ```

use serde::Serialize;

/// First code point of the Javanese block.
pub const BLOCK_START: char = '\u{A980}';
/// Last code point of the Javanese block.
pub const BLOCK_END: char = '\u{A9DF}';

/// Writing system a character or query belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptClass {
    /// Javanese script.
    Historic,
    /// Latin and everything else.
    Other,
}

/// Classify a single code point.
pub fn classify(c: char) -> ScriptClass {
    if (BLOCK_START..=BLOCK_END).contains(&c) { ScriptClass::Historic } else { ScriptClass::Other }
}

/// True when at least one character of `query` is Javanese.
///
/// This only picks the separator set (and field gating) for the query; it does
/// not reject mixed input.
pub fn is_historic_script_query(query: &str) -> bool {
    query.chars().any(|c| classify(c) == ScriptClass::Historic)
}

/// Separator class of a whole query.
pub fn query_class(query: &str) -> ScriptClass {
    if is_historic_script_query(query) { ScriptClass::Historic } else { ScriptClass::Other }
}

/// Trim a raw query and collapse whitespace runs, zero-width spaces included,
/// into single spaces.
pub(crate) fn normalize_query(text: &str) -> String {
    static_regex!(r"[\s\u{200B}\u{2060}\u{FEFF}]+").replace_all(text, " ").trim().to_string()
}

/// Whitespace variants that show up in Javanese transcriptions.
fn is_script_space(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '\u{00A0}' // no-break space
                | '\u{200B}' // zero width space
                | '\u{200C}' // zero width non-joiner
                | '\u{200D}' // zero width joiner
                | '\u{2060}' // word joiner
                | '\u{FEFF}' // zero width no-break space
        )
}

/// Javanese punctuation (pada). Excludes pangrangkep (U+A9CF), which marks
/// reduplication and sits inside a word.
fn is_script_punctuation(c: char) -> bool {
    matches!(c, '\u{A9C1}'..='\u{A9CD}' | '\u{A9DE}' | '\u{A9DF}')
}

pub(crate) fn is_historic_separator(c: char) -> bool {
    is_script_space(c) || is_script_punctuation(c)
}

pub(crate) fn is_latin_separator(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '-' | '.' | ',' | ';' | ':' | '!' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '"' | '\'' | '/' | '\\'
        )
}

/// Separator test for the given class.
pub(crate) fn is_separator(c: char, class: ScriptClass) -> bool {
    match class {
        ScriptClass::Historic => is_historic_separator(c),
        ScriptClass::Other => is_latin_separator(c),
    }
}

/// Character class inside the Javanese block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CharCategory {
    Letter,
    Sign,
    Punctuation,
    Digit,
    Other,
}

/// Categorize a Javanese character; `None` outside the block.
pub(crate) fn categorize(c: char) -> Option<CharCategory> {
    let category = match c {
        '\u{A980}'..='\u{A9B2}' => CharCategory::Letter,
        '\u{A9B3}'..='\u{A9C0}' => CharCategory::Sign,
        '\u{A9C1}'..='\u{A9CF}' => CharCategory::Punctuation,
        '\u{A9D0}'..='\u{A9D9}' => CharCategory::Digit,
        '\u{A9DA}'..='\u{A9DF}' => CharCategory::Other,
        _ => return None,
    };
    Some(category)
}

/// Character immediately before byte offset `start`.
pub(crate) fn prev_char(text: &str, start: usize) -> Option<char> {
    text.get(..start).and_then(|head| head.chars().next_back())
}

/// Character starting at byte offset `end`.
pub(crate) fn next_char(text: &str, end: usize) -> Option<char> {
    text.get(end..).and_then(|tail| tail.chars().next())
}
