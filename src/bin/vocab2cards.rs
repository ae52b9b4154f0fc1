//! CLI binary for vocab2cards.
//!
//! A thin shim over the library crate that maps CLI flags to `DeckConfig`,
//! feeds sources through the ingest pipeline, and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vocab2cards::{
    analyze_document, entries_from_json, generate_deck, Credentials, DeckConfig, IngestClient,
    IngestProgress, SilentProgress, TokioClock, VocabEntry,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI ingest progress: a single spinner per document ───────────────────────

struct CliIngestProgress {
    bar: ProgressBar,
}

impl CliIngestProgress {
    fn new(name: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix(name.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl IngestProgress for CliIngestProgress {
    fn on_upload_start(&self, _name: &str, size_bytes: u64) {
        self.bar
            .set_message(format!("uploading ({} KiB)…", size_bytes / 1024));
    }

    fn on_upload_complete(&self, _name: &str) {
        self.bar.set_message("upload accepted");
    }

    fn on_poll(&self, attempt: u32, max_attempts: u32, status: &str) {
        self.bar
            .set_message(format!("parsing… {status} ({attempt}/{max_attempts})"));
    }

    fn on_parse_ready(&self) {
        self.bar.set_message("parsed — querying model…");
    }

    fn on_inference_start(&self) {
        self.bar.set_message("extracting vocabulary…");
    }

    fn on_inference_complete(&self, response_len: usize) {
        self.bar
            .set_message(format!("model returned {response_len} bytes"));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Cards from a JSON record file
  vocab2cards words.json

  # Cards from a scanned word list (needs credentials, see below)
  vocab2cards scan.pdf

  # Every scan in a directory, one deck per file
  vocab2cards ./scans/

  # JSON records on stdin
  cat words.json | vocab2cards

  # A CJK-capable font and a custom grid
  vocab2cards --font NotoSansSC-Regular.ttf --rows 5 --columns 2 words.json

INPUT RECORDS:
  A JSON array of objects. Recognised keys per record (all optional):
    english | word              the headword
    chinese | meaning           the translation
    part_of_speech | phonetic   the auxiliary line
    example_sentence | example  an example sentence

OUTPUT:
  flashcards.pdf for a single source (override with -o),
  flashcards_<name>.pdf per source when processing several.

ENVIRONMENT VARIABLES:
  DASHSCOPE_API_KEY        API key for the ingestion/inference services
  DASHSCOPE_APP_ID         Application id the inference call targets
  DASHSCOPE_WORKSPACE_ID   Workspace (optional, default "default")
  VOCAB2CARDS_FONT         Default for --font

  Credentials are only required for scanned inputs; the JSON paths work
  without any of them."#;

/// Turn vocabulary scans or JSON records into printable flashcard PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "vocab2cards",
    version,
    about = "Turn vocabulary scans or JSON records into printable flashcard PDFs",
    long_about = "Turn scanned vocabulary material (images/PDFs) or JSON record files into \
printable flashcard decks: a ruled rows×columns grid per page, each card split into word, \
part of speech, translation and example regions with shrink-to-fit text.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// JSON record files, scans (PDF/PNG/JPEG), or directories to search.
    /// With no inputs, a JSON array is read from standard input.
    inputs: Vec<PathBuf>,

    /// Write the deck to this file (single source only).
    #[arg(short, long, env = "VOCAB2CARDS_OUTPUT")]
    output: Option<PathBuf>,

    /// Card rows per page.
    #[arg(long, env = "VOCAB2CARDS_ROWS", default_value_t = 4)]
    rows: usize,

    /// Card columns per page.
    #[arg(long, env = "VOCAB2CARDS_COLUMNS", default_value_t = 3)]
    columns: usize,

    /// TrueType font for card text (required in practice for CJK).
    #[arg(long, env = "VOCAB2CARDS_FONT")]
    font: Option<PathBuf>,

    /// Seconds between parse-status polls.
    #[arg(long, env = "VOCAB2CARDS_POLL_INTERVAL", default_value_t = 5)]
    poll_interval: u64,

    /// Maximum parse-status polls before a document is abandoned.
    #[arg(long, env = "VOCAB2CARDS_POLL_ATTEMPTS", default_value_t = 99)]
    poll_attempts: u32,

    /// Print per-deck statistics as JSON instead of the summary line.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "VOCAB2CARDS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

/// One resolved input source.
enum Source {
    /// JSON records piped on stdin.
    Stdin,
    /// A local JSON record file.
    Json(PathBuf),
    /// A scan that goes through the remote pipeline.
    Scan(PathBuf),
}

impl Source {
    fn stem(&self) -> String {
        match self {
            Source::Stdin => "stdin".to_string(),
            Source::Json(p) | Source::Scan(p) => p
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "input".to_string()),
        }
    }

    fn is_scan(&self) -> bool {
        matches!(self, Source::Scan(_))
    }
}

const SCAN_EXTENSIONS: [&str; 4] = ["pdf", "png", "jpg", "jpeg"];

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = DeckConfig::builder()
        .rows(cli.rows)
        .columns(cli.columns)
        .poll_interval(Duration::from_secs(cli.poll_interval))
        .poll_attempts(cli.poll_attempts);
    if let Some(ref font) = cli.font {
        builder = builder.font_path(font);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Resolve sources ──────────────────────────────────────────────────
    let sources = resolve_sources(&cli.inputs)?;
    if sources.len() > 1 && cli.output.is_some() {
        bail!("-o/--output only applies to a single source; got {}", sources.len());
    }

    // Credentials are checked up front, before any network traffic, but
    // only when a scan actually needs the remote services.
    let client = if sources.iter().any(Source::is_scan) {
        let creds = Credentials::from_env()?;
        Some(IngestClient::new(creds, &config)?)
    } else {
        None
    };

    let clock = TokioClock;
    let multiple = sources.len() > 1;
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let mut abandoned = 0usize;

    for source in sources {
        let stem = source.stem();

        // ── Gather entries ───────────────────────────────────────────────
        let entries: Vec<VocabEntry> = match &source {
            Source::Stdin => {
                if !cli.quiet {
                    eprintln!("{}", dim("Reading JSON records from stdin (Ctrl-D to finish)…"));
                }
                let text = std::io::read_to_string(std::io::stdin())
                    .context("Failed to read stdin")?;
                entries_from_json(&text)
            }
            Source::Json(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                entries_from_json(&text)
            }
            Source::Scan(path) => {
                let client = client.as_ref().expect("client exists when scans do");
                let spinner = show_progress.then(|| CliIngestProgress::new(&stem));
                let progress: &dyn IngestProgress = match &spinner {
                    Some(s) => s,
                    None => &SilentProgress,
                };
                let result = analyze_document(client, path, &config, &clock, progress).await;
                if let Some(s) = &spinner {
                    s.finish();
                }
                match result {
                    Ok(entries) => entries,
                    Err(e) => {
                        eprintln!("{} {}  {}", red("✗"), bold(&stem), red(&e.to_string()));
                        abandoned += 1;
                        continue;
                    }
                }
            }
        };

        if entries.is_empty() {
            if !cli.quiet {
                eprintln!(
                    "{} {}  no entries extracted — no deck written",
                    cyan("⚠"),
                    bold(&stem)
                );
            }
            continue;
        }

        // ── Generate the deck ────────────────────────────────────────────
        let out_path = match (&cli.output, multiple) {
            (Some(path), _) => path.clone(),
            (None, false) => PathBuf::from("flashcards.pdf"),
            (None, true) => PathBuf::from(format!("flashcards_{stem}.pdf")),
        };

        let output = generate_deck(&entries, &config, &out_path)
            .with_context(|| format!("Deck generation failed for {stem}"))?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?
            );
        } else if !cli.quiet {
            eprintln!(
                "{} {}  {} cards on {} page(s)  {}  →  {}",
                green("✔"),
                bold(&stem),
                output.stats.cards,
                output.stats.pages,
                dim(&format!("{}ms", output.stats.duration_ms)),
                bold(&out_path.display().to_string()),
            );
        }
    }

    if abandoned > 0 && !cli.quiet {
        eprintln!("{} {} document(s) abandoned", red("✘"), abandoned);
    }

    Ok(())
}

/// Expand CLI inputs into concrete sources.
///
/// Directories are searched (non-recursively) for scans; an empty input
/// list means stdin.
fn resolve_sources(inputs: &[PathBuf]) -> Result<Vec<Source>> {
    if inputs.is_empty() {
        return Ok(vec![Source::Stdin]);
    }

    let mut sources = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = discover_scans(input)
                .with_context(|| format!("Failed to read directory {}", input.display()))?;
            if found.is_empty() {
                eprintln!(
                    "{} no scans (pdf/png/jpg/jpeg) found in {}",
                    cyan("⚠"),
                    input.display()
                );
            }
            sources.append(&mut found);
        } else if !input.exists() {
            bail!("Input not found: {}", input.display());
        } else if has_extension(input, "json") {
            sources.push(Source::Json(input.clone()));
        } else if SCAN_EXTENSIONS.iter().any(|ext| has_extension(input, ext)) {
            sources.push(Source::Scan(input.clone()));
        } else {
            bail!(
                "Unsupported input type: {} (expected .json, .pdf, .png, .jpg or a directory)",
                input.display()
            );
        }
    }
    Ok(sources)
}

/// Non-recursive scan discovery, sorted for a stable processing order.
fn discover_scans(dir: &Path) -> std::io::Result<Vec<Source>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && SCAN_EXTENSIONS.iter().any(|ext| has_extension(path, ext))
        })
        .collect();
    paths.sort();
    Ok(paths.into_iter().map(Source::Scan).collect())
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}
