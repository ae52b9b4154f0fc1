//! Deck generation: the entry point of the layout/render core.
//!
//! Everything here is synchronous and network-free — the ingest pipeline
//! hands over plain [`VocabEntry`] values and this module does the rest:
//! build cards, paginate, render, write. That boundary is what makes the
//! core independently testable without any remote service.

use crate::config::DeckConfig;
use crate::entry::CardContent;
use crate::error::VocabCardsError;
use crate::layout::grid::paginate;
use crate::output::{DeckOutput, DeckStats};
use crate::render;
use crate::VocabEntry;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Generate a flashcard deck PDF from vocabulary entries.
///
/// Entry order is preserved: entry `i` lands on page `i / capacity`, cell
/// `i % capacity` in reading order. The final page is padded with blank
/// cards to a full grid.
///
/// # Returns
/// `Ok(DeckOutput)` with run statistics. With zero entries, no file is
/// written and `stats.pages == 0` — an empty deck is not an error.
///
/// # Errors
/// Only fatal conditions: invalid font file, or the output path being
/// unwritable.
pub fn generate_deck(
    entries: &[VocabEntry],
    config: &DeckConfig,
    out_path: impl AsRef<Path>,
) -> Result<DeckOutput, VocabCardsError> {
    let out_path = out_path.as_ref();
    let start = Instant::now();

    let cards: Vec<CardContent> = entries.iter().map(CardContent::from_entry).collect();
    let grid = config.grid();
    let pages = paginate(cards, &grid);

    if pages.is_empty() {
        info!("No entries; no deck written");
        return Ok(DeckOutput {
            path: out_path.to_path_buf(),
            stats: DeckStats {
                duration_ms: start.elapsed().as_millis() as u64,
                ..DeckStats::default()
            },
        });
    }

    let padding_cards = pages.len() * grid.capacity() - entries.len();
    render::write_deck(&pages, config, out_path)?;

    let stats = DeckStats {
        entries: entries.len(),
        cards: entries.len(),
        padding_cards,
        pages: pages.len(),
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Deck complete: {} cards (+{} padding) on {} page(s), {}ms",
        stats.cards, stats.padding_cards, stats.pages, stats.duration_ms
    );

    Ok(DeckOutput {
        path: out_path.to_path_buf(),
        stats,
    })
}
