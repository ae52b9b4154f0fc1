//! PDF backend: draws laid-out pages with `printpdf`.
//!
//! This is the only module that touches PDF types. Everything it draws was
//! computed by [`crate::layout`]; the renderer holds no cross-page state, so
//! pages could be drawn in any order — they are drawn in sequence because
//! page order in the output document is significant.
//!
//! ## Font registration
//!
//! Fonts are registered explicitly at assembly start via
//! [`Fonts::register`], never as an import-time side effect. An embedded
//! TrueType font (required in practice for CJK translations) also provides
//! real glyph metrics for the fit pass; without one, the built-in Helvetica
//! is used with approximate metrics and a warning when CJK content shows up.

use crate::config::DeckConfig;
use crate::error::VocabCardsError;
use crate::layout::cell::{
    render_cell, RenderedCell, CAPTION_COLOR, CAPTION_SIZE, PT_PER_MM,
};
use crate::layout::fit::{is_cjk, BuiltinMetrics, TextMeasure, TtfMetrics, LINE_SPACING};
use crate::layout::grid::{Grid, Page};
use printpdf::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

/// Ascent above the baseline as a fraction of the font size, used to place
/// a line's baseline from its top edge.
const ASCENT_RATIO: f32 = 0.8;

/// The registered document fonts plus the measurement backend they imply.
pub struct Fonts {
    text_font: IndirectFontRef,
    /// Measurement used by the fit pass; glyph-accurate when a TrueType
    /// font is embedded.
    pub metrics: Arc<dyn TextMeasure>,
    embedded: bool,
}

impl Fonts {
    /// Register the document fonts once, at assembly start.
    ///
    /// With `font_path` set, the TrueType file is embedded and its glyph
    /// advances drive measurement. Without it, the built-in Helvetica is
    /// used — fine for Latin decks, wrong glyphs for CJK.
    pub fn register(
        doc: &PdfDocumentReference,
        font_path: Option<&Path>,
    ) -> Result<Self, VocabCardsError> {
        match font_path {
            Some(path) => {
                let data = std::fs::read(path).map_err(|e| VocabCardsError::FontLoad {
                    path: path.to_path_buf(),
                    detail: e.to_string(),
                })?;
                let metrics =
                    TtfMetrics::from_bytes(data.clone()).map_err(|detail| {
                        VocabCardsError::FontLoad {
                            path: path.to_path_buf(),
                            detail,
                        }
                    })?;
                let text_font = doc
                    .add_external_font(std::io::Cursor::new(data))
                    .map_err(|e| VocabCardsError::FontLoad {
                        path: path.to_path_buf(),
                        detail: e.to_string(),
                    })?;
                tracing::debug!("Embedded font: {}", path.display());
                Ok(Self {
                    text_font,
                    metrics: Arc::new(metrics),
                    embedded: true,
                })
            }
            None => {
                let text_font = doc
                    .add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(|e| VocabCardsError::PdfBackend(e.to_string()))?;
                Ok(Self {
                    text_font,
                    metrics: Arc::new(BuiltinMetrics),
                    embedded: false,
                })
            }
        }
    }
}

/// Render `pages` into a PDF at `out_path`, overwriting any existing file.
///
/// Callers guarantee `pages` is non-empty; an empty deck never reaches the
/// backend (no output is produced at all).
pub fn write_deck(
    pages: &[Page],
    config: &DeckConfig,
    out_path: &Path,
) -> Result<(), VocabCardsError> {
    let grid = config.grid();
    let (doc, first_page, first_layer) = PdfDocument::new(
        config.metadata.title.as_str(),
        Mm(config.page_width_mm),
        Mm(config.page_height_mm),
        "cards",
    );

    let fonts = Fonts::register(&doc, config.font_path.as_deref())?;
    if !fonts.embedded && pages.iter().any(page_has_cjk) {
        tracing::warn!(
            "Deck contains CJK text but no font was configured; \
             the built-in Helvetica cannot render it. Pass a TrueType font."
        );
    }

    for (i, page) in pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(
                Mm(config.page_width_mm),
                Mm(config.page_height_mm),
                "cards",
            );
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        draw_page(&layer, page, &grid, config, &fonts);
    }

    let file = File::create(out_path).map_err(|e| VocabCardsError::OutputWriteFailed {
        path: out_path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| VocabCardsError::PdfBackend(e.to_string()))?;

    tracing::info!("Wrote {} page(s) to {}", pages.len(), out_path.display());
    Ok(())
}

fn page_has_cjk(page: &Page) -> bool {
    page.cards()
        .iter()
        .any(|card| card.fields().iter().any(|f| f.chars().any(is_cjk)))
}

/// Draw one page: the ruled grid, then every cell's captions and values.
fn draw_page(
    layer: &PdfLayerReference,
    page: &Page,
    grid: &Grid,
    config: &DeckConfig,
    fonts: &Fonts,
) {
    let page_h = config.page_height_mm;
    let grid_w = grid.cell_width_mm * grid.columns as f32;
    let grid_h = grid.cell_height_mm * grid.rows as f32;

    // Ruled borders around every cell, matching the cut lines.
    layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.set_outline_thickness(1.0);
    for r in 0..=grid.rows {
        let y = page_h - r as f32 * grid.cell_height_mm;
        draw_line(layer, 0.0, y, grid_w, y);
    }
    for c in 0..=grid.columns {
        let x = c as f32 * grid.cell_width_mm;
        draw_line(layer, x, page_h - grid_h, x, page_h);
    }

    for row in 0..grid.rows {
        for col in 0..grid.columns {
            let card = page.card(row, col);
            let cell = render_cell(card, grid, config.min_font_size, fonts.metrics.as_ref());
            let origin_x = col as f32 * grid.cell_width_mm;
            let origin_top_y = page_h - row as f32 * grid.cell_height_mm;
            draw_cell(layer, &cell, origin_x, origin_top_y, fonts);
        }
    }
}

/// Draw one cell at `origin_x`/`origin_top_y` (top-left corner, page
/// coordinates in millimetres).
fn draw_cell(
    layer: &PdfLayerReference,
    cell: &RenderedCell,
    origin_x: f32,
    origin_top_y: f32,
    fonts: &Fonts,
) {
    for region in &cell.regions {
        // Caption, centred at the top of the sub-region.
        let caption_w = fonts.metrics.text_width(region.caption, CAPTION_SIZE) / PT_PER_MM;
        let caption_x = origin_x + (region.region.width - caption_w) / 2.0;
        let caption_baseline = origin_top_y - region.region.y - CAPTION_SIZE / PT_PER_MM;
        layer.set_fill_color(rgb(CAPTION_COLOR));
        layer.use_text(
            region.caption,
            CAPTION_SIZE,
            Mm(caption_x),
            Mm(caption_baseline),
            &fonts.text_font,
        );

        if region.text.lines.is_empty() {
            continue;
        }

        // Value lines, centred horizontally and vertically in the value box.
        let line_h = region.text.font_size * LINE_SPACING / PT_PER_MM;
        let box_top = origin_top_y - region.value_box.y;
        let block_top = box_top - (region.value_box.height - region.text_height_mm()) / 2.0;
        let ascent = region.text.font_size * ASCENT_RATIO / PT_PER_MM;

        layer.set_fill_color(rgb(region.color));
        for (i, line) in region.text.lines.iter().enumerate() {
            let line_w = fonts.metrics.text_width(line, region.text.font_size) / PT_PER_MM;
            let x = origin_x + region.value_box.x + (region.value_box.width - line_w) / 2.0;
            let baseline = block_top - i as f32 * line_h - ascent;
            layer.use_text(
                line.as_str(),
                region.text.font_size,
                Mm(x),
                Mm(baseline),
                &fonts.text_font,
            );
        }
    }
}

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    let points = vec![
        (Point::new(Mm(x1), Mm(y1)), false),
        (Point::new(Mm(x2), Mm(y2)), false),
    ];
    let line = Line {
        points,
        is_closed: false,
    };
    layer.add_line(line);
}
