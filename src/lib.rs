//! # vocab2cards
//!
//! Turn scanned vocabulary material into printable flashcard decks.
//!
//! ## Why this crate?
//!
//! Typing a textbook's word list into a flashcard app by hand is the kind
//! of work a document-understanding service does in seconds. This crate
//! uploads a scan (image or PDF), waits for the service to parse it, asks a
//! model for structured vocabulary records, and lays the result out as a
//! cut-ready grid of flashcards — twelve per A4 page, each card split into
//! word, part of speech, translation and example regions.
//!
//! ## Pipeline Overview
//!
//! ```text
//! scan (image/PDF)
//!  │
//!  ├─ 1. Upload   lease + raw-byte PUT to the ingestion service
//!  ├─ 2. Poll     bounded status polling until FILE_IS_READY
//!  ├─ 3. Infer    one completion call referencing the ingested file
//!  ├─ 4. Extract  normalise the model output into VocabEntry records
//!  ├─ 5. Layout   paginate cards into a rows×columns grid, shrink-fit text
//!  └─ 6. Render   ruled PDF pages, one table per page → flashcards.pdf
//! ```
//!
//! Steps 5–6 — the layout core — are pure and synchronous: given entries,
//! they produce the same deck every time, with no network anywhere. Feeding
//! the pipeline from a local JSON array instead of a scan skips steps 1–4
//! entirely (and needs no credentials).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vocab2cards::{generate_deck, DeckConfig, VocabEntry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let entries = vec![VocabEntry {
//!         word: "example".into(),
//!         translation: "例子".into(),
//!         ..Default::default()
//!     }];
//!     let config = DeckConfig::default();
//!     let output = generate_deck(&entries, &config, "flashcards.pdf")?;
//!     eprintln!("{} pages written", output.stats.pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `vocab2cards` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only
//! deps:
//! ```toml
//! vocab2cards = { version = "0.3", default-features = false }
//! ```
//!
//! ## Credentials
//!
//! The remote path reads `DASHSCOPE_API_KEY` and `DASHSCOPE_APP_ID` from
//! the environment (plus optional `DASHSCOPE_WORKSPACE_ID`). Their absence
//! is a fatal configuration error before any network activity — but the
//! local JSON path never needs them.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod deck;
pub mod entry;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod layout;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod render;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DeckConfig, DeckConfigBuilder, A4_HEIGHT_MM, A4_WIDTH_MM};
pub use deck::generate_deck;
pub use entry::{CardContent, VocabEntry, FIELD_CAPTIONS};
pub use error::{DocError, VocabCardsError};
pub use extract::{entries_from_json, normalize, ModelOutput};
pub use ingest::{analyze_document, Clock, Credentials, IngestClient, ParseStatus, PollOutcome, TokioClock};
pub use layout::fit::{fit_text, FittedText, TextMeasure};
pub use layout::grid::{paginate, Grid, Page};
pub use output::{DeckMetadata, DeckOutput, DeckStats};
pub use progress::{IngestProgress, SilentProgress};
