//! Mark matched spans for display.
//!
//! Highlighting is best effort: whatever goes wrong, the caller gets the
//! escaped text back, just without markers.
//!
//! Match positions are found on the raw text with the same boundary rules as
//! the search, then every piece of text (matched or not) is escaped on its way
//! out. The output therefore never contains unescaped markup-sensitive
//! characters, and entity text such as `&quot;` never takes part in a
//! boundary decision.

use super::boundary::{BoundaryMatcher, DEFAULT_REGEX_SIZE_LIMIT};
use super::script::{ScriptClass, normalize_query};
use std::borrow::Cow;

/// Markers wrapped around each highlighted span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightStyle {
    pub open: Cow<'static, str>,
    pub close: Cow<'static, str>,
    /// Escape `& < > " '` for HTML output.
    pub escape: bool,
}

impl HighlightStyle {
    /// `<span class="highlighted-text">..</span>` with HTML escaping.
    pub fn html() -> Self {
        Self {
            open: Cow::Borrowed(r#"<span class="highlighted-text">"#),
            close: Cow::Borrowed("</span>"),
            escape: true,
        }
    }

    /// Bold yellow for terminals. Terminals have no markup-sensitive
    /// characters, so nothing is escaped.
    pub fn ansi() -> Self {
        Self { open: Cow::Borrowed("\x1b[1;33m"), close: Cow::Borrowed("\x1b[0m"), escape: false }
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self::html()
    }
}

fn escape_into(out: &mut String, text: &str, escape: bool) {
    if !escape {
        out.push_str(text);
        return;
    }
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
}

/// Highlight with [`HighlightStyle::html`].
pub fn highlight(text: &str, query: &str, class: ScriptClass) -> String {
    highlight_with(text, query, class, &HighlightStyle::html())
}

/// Wrap every delimited, case-insensitive match of `query` in `style`'s
/// markers.
pub fn highlight_with(text: &str, query: &str, class: ScriptClass, style: &HighlightStyle) -> String {
    highlight_limited(text, query, class, style, DEFAULT_REGEX_SIZE_LIMIT)
}

fn highlight_limited(text: &str, query: &str, class: ScriptClass, style: &HighlightStyle, size_limit: usize) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let query = normalize_query(query);
    if text.is_empty() || query.is_empty() {
        escape_into(&mut out, text, style.escape);
        return out;
    }

    let matcher = match BoundaryMatcher::compile(&query, class, size_limit) {
        Ok(matcher) => matcher,
        Err(err) => {
            tracing::debug!(%err, "highlight skipped");
            escape_into(&mut out, text, style.escape);
            return out;
        }
    };

    let mut last = 0;
    for span in matcher.find_bounded(text) {
        escape_into(&mut out, &text[last..span.start], style.escape);
        out.push_str(&style.open);
        escape_into(&mut out, &text[span.start..span.end], style.escape);
        out.push_str(&style.close);
        last = span.end;
    }
    escape_into(&mut out, &text[last..], style.escape);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: &str = r#"<span class="highlighted-text">"#;

    #[test]
    fn marks_every_delimited_match() {
        let out = highlight("Ing pasar, ing kutha; ingkang", "ing", ScriptClass::Other);
        assert_eq!(out, format!("{OPEN}Ing</span> pasar, {OPEN}ing</span> kutha; ingkang"));
    }

    #[test]
    fn escapes_before_output() {
        let out = highlight(r#"<b>"ing"</b> & 'ing'"#, "ing", ScriptClass::Other);
        assert_eq!(
            out,
            format!("&lt;b&gt;&quot;{OPEN}ing</span>&quot;&lt;/b&gt; &amp; &#x27;{OPEN}ing</span>&#x27;")
        );
        assert!(!highlight("a < b", "zzz", ScriptClass::Other).contains('<'));
    }

    #[test]
    fn markup_in_query_is_literal() {
        let out = highlight("x <b> y", "<b>", ScriptClass::Other);
        assert_eq!(out, format!("x {OPEN}&lt;b&gt;</span> y"));
    }

    #[test]
    fn script_text_uses_script_separators() {
        let text = "ꦥꦸꦏꦸꦭ꧀\u{200B}ꦲꦶꦁ\u{200B}ꦮꦪꦃ ꦱꦏꦲꦶꦁ";
        let out = highlight(text, "ꦲꦶꦁ", ScriptClass::Historic);
        assert_eq!(out.matches(OPEN).count(), 1);
    }

    #[test]
    fn nothing_to_mark_returns_escaped_text() {
        assert_eq!(highlight("R&D", "", ScriptClass::Other), "R&amp;D");
        assert_eq!(highlight("", "ing", ScriptClass::Other), "");
        assert_eq!(highlight("ingkang", "ing", ScriptClass::Other), "ingkang");
    }

    #[test]
    fn pattern_failure_degrades_to_escaped_text() {
        // a one-byte limit is too small for the "tatkala" pattern
        let out = highlight_limited("<b> tatkala", "tatkala", ScriptClass::Other, &HighlightStyle::html(), 1);
        assert_eq!(out, "&lt;b&gt; tatkala");
        assert_eq!(highlight("<b> tatkala", "tatkala", ScriptClass::Other), format!("&lt;b&gt; {OPEN}tatkala</span>"));
    }

    #[test]
    fn query_is_normalized_like_search_queries() {
        let zwsp = '\u{200B}';
        let text = format!("ꦥꦸꦏꦸꦭ꧀{zwsp}ꦲꦶꦁ{zwsp}ꦏꦁ{zwsp}ꦠꦁ");
        let query = format!(" ꦲꦶꦁ{zwsp}{zwsp}ꦏꦁ\u{FEFF}");
        let out = highlight(&text, &query, ScriptClass::Historic);
        assert_eq!(out, format!("ꦥꦸꦏꦸꦭ꧀{zwsp}{OPEN}ꦲꦶꦁ{zwsp}ꦏꦁ</span>{zwsp}ꦠꦁ"));
    }

    #[test]
    fn ansi_style_does_not_escape() {
        let out = highlight_with("R&D ing", "ing", ScriptClass::Other, &HighlightStyle::ansi());
        assert_eq!(out, "R&D \x1b[1;33ming\x1b[0m");
    }
}
