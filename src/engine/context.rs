//! Context windows around a match.
//!
//! Windows are measured in characters, not bytes, so a Javanese window is as
//! wide on screen as a Latin one. The window spans `window` characters before
//! the match start up to `window` characters after the match end, so it never
//! exceeds `2 * window + len(match)` characters before markers are added. A
//! multi-word match can be longer than the query when words are split by
//! several separators; the whole match is always kept. `...` is prepended or
//! appended only where the text was clipped.

use super::boundary::find_matches;
use super::script::ScriptClass;

pub const ELLIPSIS: &str = "...";

/// Text around the first delimited match of `query`, or `text` unchanged when
/// there is none.
pub fn extract_context(text: &str, query: &str, window: usize, class: ScriptClass) -> String {
    if text.is_empty() || query.trim().is_empty() {
        return text.to_string();
    }
    let Some(first) = find_matches(text, query, class).into_iter().next() else {
        return text.to_string();
    };

    let total = text.chars().count();
    let match_start = text[..first.start].chars().count();
    let match_end = match_start + text[first.start..first.end].chars().count();

    let from = match_start.saturating_sub(window);
    let to = total.min(match_end + window);

    let byte_at = |idx: usize| text.char_indices().nth(idx).map_or(text.len(), |(b, _)| b);
    let mut context = String::with_capacity(to - from + 2 * ELLIPSIS.len());
    if from > 0 {
        context.push_str(ELLIPSIS);
    }
    context.push_str(&text[byte_at(from)..byte_at(to)]);
    if to < total {
        context.push_str(ELLIPSIS);
    }
    context
}
