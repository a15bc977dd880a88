//! Boundary-aware literal matching.
//!
//! A query matches only as a delimited unit: the character before the match
//! (or the start of the text) and the character after it (or the end of the
//! text) must both be separators of the query's script class (see
//! `script.rs`). `ing` therefore matches in `tindak ing pasar` but not in
//! `ingkang`.
//!
//! The query is always a literal. Words of a multi-word query are escaped one
//! by one; the single spaces between them (queries are normalized before they
//! get here) match any non-empty run of separators, so a typed space also
//! matches the zero-width spaces of Javanese text.
//!
//! ## Two paths
//!
//! ```text
//! Matcher::for_query
//!   ├─ BoundaryMatcher::compile  (regex, case-insensitive)  -> Ok  => Pattern
//!   └─ Err(MalformedPattern)                                       => Substring
//! ```
//!
//! Compilation of an escaped literal only fails on resource limits, but when
//! it does the char-by-char `SubstringMatcher` gives the same answers. Both
//! share the boundary scan in `scan_bounded`, which restarts one character
//! after a rejected candidate so an overlapping, properly delimited
//! occurrence is not skipped.

use super::script::{ScriptClass, is_separator, next_char, prev_char};
use crate::MatchSpan;
use crate::error::MatchError;
use regex::{Regex, RegexBuilder};

/// Default compiled-size limit for a query pattern.
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1 << 20;

const HISTORIC_SEPARATOR_RUN: &str = r"[\s\u{00A0}\u{200B}-\u{200D}\u{2060}\u{FEFF}\u{A9C1}-\u{A9CD}\u{A9DE}\u{A9DF}]+";
const LATIN_SEPARATOR_RUN: &str = r#"[\s\-.,;:!?()\[\]{}"'/\\]+"#;

/// True when `start..end` is delimited on both sides.
pub(crate) fn is_bounded(text: &str, start: usize, end: usize, class: ScriptClass) -> bool {
    let before = prev_char(text, start).is_none_or(|c| is_separator(c, class));
    let after = next_char(text, end).is_none_or(|c| is_separator(c, class));
    before && after
}

/// Primary path: the query compiled to an escaped, case-insensitive regex.
#[derive(Debug, Clone)]
pub(crate) struct BoundaryMatcher {
    regex: Regex,
    class: ScriptClass,
}

impl BoundaryMatcher {
    pub(crate) fn compile(query: &str, class: ScriptClass, size_limit: usize) -> Result<Self, MatchError> {
        let run = match class {
            ScriptClass::Historic => HISTORIC_SEPARATOR_RUN,
            ScriptClass::Other => LATIN_SEPARATOR_RUN,
        };
        let pattern = query.split(' ').filter(|w| !w.is_empty()).map(regex::escape).collect::<Vec<_>>().join(run);
        let regex = RegexBuilder::new(&pattern).case_insensitive(true).size_limit(size_limit).build()?;
        Ok(Self { regex, class })
    }

    pub(crate) fn find_bounded(&self, text: &str) -> Vec<MatchSpan> {
        scan_bounded(text, self.class, |from| self.regex.find_at(text, from).map(|m| (m.start(), m.end())))
    }

    fn find_loose(&self, text: &str) -> Vec<MatchSpan> {
        self.regex.find_iter(text).map(|m| MatchSpan { start: m.start(), end: m.end() }).collect()
    }
}

/// Fallback path: char-by-char comparison with the same semantics.
#[derive(Debug, Clone)]
pub(crate) struct SubstringMatcher {
    query: Vec<char>,
    class: ScriptClass,
}

impl SubstringMatcher {
    pub(crate) fn new(query: &str, class: ScriptClass) -> Self {
        Self { query: query.chars().collect(), class }
    }

    /// End offset of a match starting exactly at `start`.
    fn match_at(&self, text: &str, start: usize) -> Option<usize> {
        let mut chars = text[start..].char_indices().peekable();
        let mut end = start;

        for &q in &self.query {
            if q == ' ' {
                let mut consumed = 0;
                while let Some(&(idx, c)) = chars.peek() {
                    if !is_separator(c, self.class) {
                        break;
                    }
                    chars.next();
                    end = start + idx + c.len_utf8();
                    consumed += 1;
                }
                if consumed == 0 {
                    return None;
                }
            } else {
                let (idx, c) = chars.next()?;
                if !chars_equal_ignore_case(c, q) {
                    return None;
                }
                end = start + idx + c.len_utf8();
            }
        }

        (end > start).then_some(end)
    }

    fn find_from(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        let tail = text.get(from..)?;
        tail.char_indices().find_map(|(idx, _)| self.match_at(text, from + idx).map(|end| (from + idx, end)))
    }

    fn find_bounded(&self, text: &str) -> Vec<MatchSpan> {
        scan_bounded(text, self.class, |from| self.find_from(text, from))
    }

    fn find_loose(&self, text: &str) -> Vec<MatchSpan> {
        let mut spans = Vec::new();
        let mut from = 0;
        while let Some((start, end)) = self.find_from(text, from) {
            spans.push(MatchSpan { start, end });
            from = end;
        }
        spans
    }
}

fn chars_equal_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Collect non-overlapping, delimited matches from a candidate finder.
///
/// `find(from)` returns the next candidate at or after byte offset `from`.
fn scan_bounded(
    text: &str,
    class: ScriptClass,
    mut find: impl FnMut(usize) -> Option<(usize, usize)>,
) -> Vec<MatchSpan> {
    let mut spans = Vec::new();
    let mut from = 0;

    while from <= text.len() {
        let Some((start, end)) = find(from) else { break };
        if is_bounded(text, start, end, class) {
            spans.push(MatchSpan { start, end });
            from = end.max(start + 1);
        } else {
            from = start + next_char(text, start).map_or(1, char::len_utf8);
        }
        while from < text.len() && !text.is_char_boundary(from) {
            from += 1;
        }
    }

    spans
}

/// A query's matcher, whichever path built it.
#[derive(Debug, Clone)]
pub(crate) enum Matcher {
    Pattern(BoundaryMatcher),
    Substring(SubstringMatcher),
}

impl Matcher {
    /// Build the matcher for a normalized, non-empty query.
    pub(crate) fn for_query(query: &str, class: ScriptClass, size_limit: usize) -> Self {
        match BoundaryMatcher::compile(query, class, size_limit) {
            Ok(matcher) => Matcher::Pattern(matcher),
            Err(err) => {
                tracing::warn!(%err, query, "falling back to substring matching");
                Matcher::Substring(SubstringMatcher::new(query, class))
            }
        }
    }

    /// All non-overlapping, delimited matches.
    pub(crate) fn find_bounded(&self, text: &str) -> Vec<MatchSpan> {
        match self {
            Matcher::Pattern(m) => m.find_bounded(text),
            Matcher::Substring(m) => m.find_bounded(text),
        }
    }

    /// All non-overlapping matches, ignoring boundaries.
    pub(crate) fn find_loose(&self, text: &str) -> Vec<MatchSpan> {
        match self {
            Matcher::Pattern(m) => m.find_loose(text),
            Matcher::Substring(m) => m.find_loose(text),
        }
    }

    pub(crate) fn is_fallback(&self) -> bool {
        matches!(self, Matcher::Substring(_))
    }
}

/// Delimited matches of `query` in `haystack` using the separator set of
/// `class`. Empty queries match nothing.
pub(crate) fn find_matches(haystack: &str, query: &str, class: ScriptClass) -> Vec<MatchSpan> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    Matcher::for_query(query, class, DEFAULT_REGEX_SIZE_LIMIT).find_bounded(haystack)
}
