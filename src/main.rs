mod report;

use naskah::{Corpus, Options, Query, Scope, ScopePolicy, search_verbose_with};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "NASKAH_LOG";
const CORPUS_ENV: &str = "NASKAH_CORPUS";

fn main() {
    init_logging();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(io::stderr)).init();
}

fn run(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let corpus = Corpus::load(&config.corpus)?;
    let verbose = config.query.as_ref().map(|query| search_verbose_with(&corpus, query, &config.options));

    if config.json {
        let mut out = serde_json::Map::new();
        if config.stats {
            out.insert("corpus".into(), serde_json::to_value(corpus.stats())?);
        }
        if config.chars {
            out.insert("characters".into(), serde_json::to_value(corpus.script_inventory())?);
        }
        if let Some(verbose) = &verbose {
            out.insert("search".into(), serde_json::to_value(verbose)?);
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if config.stats {
        report::print_corpus_stats(&corpus.stats(), config.color);
    }
    if config.chars {
        report::print_inventory(&corpus.script_inventory(), config.color);
    }
    if let Some(verbose) = &verbose {
        report::print_result(&verbose.result, &verbose.details, config.color);
    }
    Ok(())
}

struct CliConfig {
    corpus: PathBuf,
    query: Option<Query>,
    options: Options,
    json: bool,
    stats: bool,
    chars: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut corpus: Option<PathBuf> = std::env::var_os(CORPUS_ENV).map(PathBuf::from);
    let mut input: Option<String> = None;
    let mut scope = Scope::All;
    let mut options = Options::default();
    let mut json = false;
    let mut stats = false;
    let mut chars = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("naskah {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--stats" => stats = true,
            "--chars" => chars = true,
            "--all-fields" => options.scope_policy = ScopePolicy::AllFields,
            "--loose" => options.loose_script_fallback = true,
            "--corpus" | "-c" => {
                let value = args.next().ok_or_else(|| "error: --corpus expects a path".to_string())?;
                corpus = Some(PathBuf::from(value));
            }
            "--scope" | "-s" => {
                let value = args.next().ok_or_else(|| "error: --scope expects a value".to_string())?;
                scope = parse_scope(&value)?;
            }
            "--window" | "-w" => {
                let value = args.next().ok_or_else(|| "error: --window expects a value".to_string())?;
                set_window(&mut options, &value)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--corpus=") => {
                corpus = Some(PathBuf::from(arg.trim_start_matches("--corpus=")));
            }
            _ if arg.starts_with("--scope=") => {
                scope = parse_scope(arg.trim_start_matches("--scope="))?;
            }
            _ if arg.starts_with("--window=") => {
                set_window(&mut options, arg.trim_start_matches("--window="))?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                input = Some(std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" "));
                break;
            }
        }
    }

    let corpus = corpus
        .ok_or_else(|| format!("error: no corpus given (use --corpus or {CORPUS_ENV})\n\n{}", help_text()))?;

    // --stats/--chars alone are a complete request; otherwise fall back to stdin
    let input = match input {
        Some(value) => Some(value),
        None if stats || chars => None,
        None => Some(read_stdin_input()?),
    };

    let query = match input {
        Some(text) => {
            let query = Query::new(&text, scope);
            if query.is_empty() {
                return Err(format!("error: no query provided\n\n{}", help_text()));
            }
            Some(query)
        }
        None => None,
    };

    Ok(CliConfig { corpus, query, options, json, stats, chars, color })
}

fn parse_scope(value: &str) -> Result<Scope, String> {
    Scope::from_name(value)
        .ok_or_else(|| format!("error: invalid --scope '{value}' (expected all, script, latin or translation)"))
}

/// Script context gets `n` characters per side, translation context `2n`.
fn set_window(options: &mut Options, value: &str) -> Result<(), String> {
    let n: usize = value.parse().map_err(|_| format!("error: invalid --window '{value}' (expected a number)"))?;
    options.script_context_window = n;
    options.translation_context_window = n.saturating_mul(2);
    Ok(())
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    let defaults = Options::default();
    format!(
        "naskah {version}

Word and phrase search over a bilingual Javanese manuscript corpus.

Usage:
  naskah [OPTIONS] --corpus <path> [--] <query...>
  naskah [OPTIONS] --corpus <path> --stats --chars

Options:
  -c, --corpus <path>        Corpus file (.csv, .json array or .jsonl). Default: ${corpus_env}
  -s, --scope <scope>        all | script | latin | translation. Default: all
  --all-fields               With scope 'all', search every field regardless of
                             the query's script.
  --loose                    Accept matches inside longer script words when no
                             clean script match exists.
  -w, --window <n>           Paragraph context: n characters of script text and
                             2n of translation on each side of the match.
                             Default: {script_window}
  --json                     Emit JSON instead of the terminal report.
  --stats                    Print corpus entry counts.
  --chars                    Print the Javanese characters used in the corpus.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

The query is read from the remaining arguments, or from stdin when none are
given. Set ${log_env} (e.g. debug) to see engine logs on stderr.

Exit codes:
  0  Success.
  1  Corpus could not be loaded, or internal error.
  2  Invalid arguments or missing query.
",
        version = env!("CARGO_PKG_VERSION"),
        corpus_env = CORPUS_ENV,
        log_env = LOG_ENV,
        script_window = defaults.script_context_window,
    )
}
