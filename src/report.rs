use naskah::{
    CorpusStats, EntryKind, Field, Group, GroupKind, HighlightStyle, OccurrenceRecord, ScriptInventory, SearchDetails,
    SearchResult, highlight_with,
};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn enabled(&self) -> bool {
            self.enabled
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_corpus_stats(stats: &CorpusStats, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.paint("━━━ Corpus ━━━", ansi::GRAY));
    println!(
        "  Entries: {}  │  Paragraphs: {}  │  Words: {}",
        palette.paint(stats.total.to_string(), ansi::GREEN),
        palette.paint(stats.paragraphs.to_string(), ansi::BLUE),
        palette.paint(stats.words.to_string(), ansi::BLUE),
    );
}

pub fn print_inventory(inventory: &ScriptInventory, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.paint("━━━ Script characters ━━━", ansi::GRAY));
    if inventory.is_empty() {
        println!("{}", palette.dim("  No Javanese characters in corpus"));
        return;
    }

    // (label, chars, combining)
    let rows = [
        ("Letters", &inventory.letters, false),
        ("Signs", &inventory.signs, true),
        ("Punctuation", &inventory.punctuation, false),
        ("Digits", &inventory.digits, false),
        ("Other", &inventory.others, false),
    ];
    for (label, chars, combining) in rows {
        if chars.is_empty() {
            continue;
        }
        // combining marks get a dotted circle to sit on
        let shown: Vec<String> =
            chars.iter().map(|c| if combining { format!("\u{25CC}{c}") } else { c.to_string() }).collect();
        println!(
            "  {} {} {}",
            palette.paint(format!("{label:<12}"), ansi::BLUE),
            palette.dim(format!("({:>2})", chars.len())),
            shown.join(" ")
        );
    }
}

pub fn print_result(result: &SearchResult, details: &SearchDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    let query = result.query.text();
    println!("\n{}", palette.bold(palette.paint(format!("🔍 Searching: \"{query}\""), ansi::CYAN)));
    println!(
        "  {} {:?}  {} {}",
        palette.dim("scope:"),
        result.query.scope(),
        palette.dim("fields:"),
        details.fields.labels().join(", ")
    );

    println!("\n{}", palette.paint("━━━ Results ━━━", ansi::GRAY));
    if result.is_empty() {
        println!("{}", palette.dim("  No matches"));
        if details.fields.is_empty() || details.entries_scanned == 0 {
            println!("\n{}", palette.dim("  Tip: the query was blank or the corpus is empty"));
        } else if !details.loose_fallback && result.query.is_script_query() {
            println!("\n{}", palette.dim("  Tip: --loose also accepts matches inside longer script words"));
        }
    } else {
        let style = if palette.enabled() { HighlightStyle::ansi() } else { plain_style() };
        for (idx, group) in result.iter().enumerate() {
            print_group(idx, group, query, details, &style, &palette);
        }
    }

    let stats = result.stats();
    println!("\n{}", palette.paint("━━━ Summary ━━━", ansi::GRAY));
    println!(
        "  Groups: {}  │  Occurrences: {}  │  Field hits: {}  │  Spans: {}  │  Entries scanned: {}",
        palette.paint(stats.groups.to_string(), ansi::GREEN),
        palette.paint(stats.occurrences.to_string(), ansi::GREEN),
        palette.dim(details.raw_hits.to_string()),
        palette.dim(details.spans.to_string()),
        palette.dim(details.entries_scanned.to_string()),
    );
    if details.loose_fallback {
        println!("  {}", palette.paint("loose script matching was used", ansi::YELLOW));
    }
    if details.pattern_fallback {
        println!("  {}", palette.paint("query pattern too large, matched by plain scan", ansi::YELLOW));
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Scan: {}  │  Dedupe: {}  │  Group: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.paint(format!("{:?}", details.scan), ansi::CYAN),
        palette.dim(format!("{:?}", details.dedupe)),
        palette.dim(format!("{:?}", details.group)),
    );
    println!();
}

/// Bracket markers for terminals without color.
fn plain_style() -> HighlightStyle {
    HighlightStyle { open: "[".into(), close: "]".into(), escape: false }
}

fn print_group(
    idx: usize,
    group: &Group,
    query: &str,
    details: &SearchDetails,
    style: &HighlightStyle,
    palette: &ansi::Palette,
) {
    let kind = match group.kind {
        GroupKind::Word => palette.paint("word", ansi::BLUE),
        GroupKind::PartialWord => palette.paint("partial", ansi::YELLOW),
        GroupKind::Paragraph => palette.paint("paragraph", ansi::CYAN),
    };
    println!(
        "  {} {} {} {} {}",
        palette.paint(format!("[{idx}]"), ansi::GRAY),
        palette.bold(palette.paint(&group.key, ansi::GREEN)),
        palette.dim("│"),
        kind,
        palette.dim(format!("×{}", group.total_count())),
    );
    if group.kind == GroupKind::Paragraph {
        if let Some(script) = &group.script {
            println!("      {} {}", palette.dim("script:"), highlight_with(script, query, details.class, style));
        }
        if let Some(translation) = &group.translation {
            let marked = highlight_with(translation, query, details.class, style);
            println!("      {} {}", palette.dim("translation:"), marked);
        }
    }

    for occurrence in group.occurrences() {
        print_occurrence(occurrence, query, details, style, palette);
    }
}

fn print_occurrence(
    occurrence: &OccurrenceRecord,
    query: &str,
    details: &SearchDetails,
    style: &HighlightStyle,
    palette: &ansi::Palette,
) {
    let found = if occurrence.found_in.is_empty() {
        palette.paint("partial script match", ansi::YELLOW)
    } else {
        palette.paint(occurrence.found_in.labels().join(", "), ansi::YELLOW)
    };
    println!("      {} {}  {} {}", palette.dim("•"), occurrence.entry_id, palette.dim("found in:"), found);

    // paragraph texts are long, the group line already shows their context
    if occurrence.kind == EntryKind::Word {
        for field in Field::ALL {
            let text = match field {
                Field::Script => occurrence.script.as_deref(),
                Field::Latin => occurrence.latin.as_deref(),
                Field::Translation => occurrence.translation.as_deref(),
            };
            let Some(text) = text else {
                continue;
            };
            let shown = if occurrence.found_in.contains(field.flag()) {
                highlight_with(text, query, details.class, style)
            } else {
                text.to_string()
            };
            println!("        {} {}", palette.dim(format!("{}:", field.label().to_lowercase())), shown);
        }
    }
    println!("        {}", palette.dim(&occurrence.reference));
    println!("        {}", palette.dim(&occurrence.source));
}

