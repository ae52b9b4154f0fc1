//! Cell layout: one card split into four captioned sub-regions.
//!
//! Every cell is divided into four equal-height regions stacked top to
//! bottom in fixed order — word, auxiliary, translation, example. Each
//! region carries a small muted caption and the field's value, shrink-fitted
//! into the space below the caption. Empty fields keep their caption and
//! blank space, so every cell in the grid occupies identical geometry no
//! matter how much content it carries; the surrounding ruled table depends
//! on that.
//!
//! This module computes geometry only. Nothing here knows about PDF types;
//! the renderer consumes [`RenderedCell`] values and draws them.

use crate::entry::{CardContent, FIELD_CAPTIONS};
use crate::layout::fit::{fit_text, FittedText, TextMeasure};
use crate::layout::grid::Grid;

/// Points per millimetre.
pub const PT_PER_MM: f32 = 2.834_646;

/// Caption font size in points.
pub const CAPTION_SIZE: f32 = 8.0;

/// Caption colour — muted gray.
pub const CAPTION_COLOR: (f32, f32, f32) = (0.5, 0.5, 0.5);

/// Horizontal inset of a value box from the cell border, millimetres.
const H_INSET_MM: f32 = 2.5;

/// Vertical inset inside each sub-region, millimetres.
const V_INSET_MM: f32 = 0.5;

/// Per-field presentation: caption text, nominal value size, value colour.
#[derive(Debug, Clone, Copy)]
pub struct FieldStyle {
    pub caption: &'static str,
    pub nominal_size: f32,
    pub color: (f32, f32, f32),
}

/// The four field styles in render order: word, auxiliary, translation,
/// example. Sizes and colours follow the established deck look — black
/// headword, purple part of speech, black translation, green example.
pub const FIELD_STYLES: [FieldStyle; 4] = [
    FieldStyle {
        caption: FIELD_CAPTIONS[0],
        nominal_size: 14.0,
        color: (0.0, 0.0, 0.0),
    },
    FieldStyle {
        caption: FIELD_CAPTIONS[1],
        nominal_size: 10.0,
        color: (0.5, 0.0, 0.5),
    },
    FieldStyle {
        caption: FIELD_CAPTIONS[2],
        nominal_size: 12.0,
        color: (0.0, 0.0, 0.0),
    },
    FieldStyle {
        caption: FIELD_CAPTIONS[3],
        nominal_size: 9.0,
        color: (0.0, 0.5, 0.0),
    },
];

/// An axis-aligned box in millimetres, relative to the cell's top-left
/// corner, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// True when `inner` lies entirely inside `self`.
    pub fn contains(&self, inner: &Rect) -> bool {
        inner.x >= self.x
            && inner.y >= self.y
            && inner.x + inner.width <= self.x + self.width + f32::EPSILON
            && inner.y + inner.height <= self.y + self.height + f32::EPSILON
    }
}

/// One laid-out sub-region of a cell.
#[derive(Debug, Clone)]
pub struct RenderedRegion {
    /// The caption label, always present even for empty fields.
    pub caption: &'static str,
    /// Full sub-region bounds.
    pub region: Rect,
    /// The box the value text is confined to, below the caption band.
    pub value_box: Rect,
    /// The fitted value text; empty lines for an empty field.
    pub text: FittedText,
    /// Value text colour.
    pub color: (f32, f32, f32),
}

impl RenderedRegion {
    /// Height of the fitted text block in millimetres.
    pub fn text_height_mm(&self) -> f32 {
        self.text.height() / PT_PER_MM
    }
}

/// One fully laid-out cell: four regions, fixed order, fixed geometry.
#[derive(Debug, Clone)]
pub struct RenderedCell {
    pub regions: [RenderedRegion; 4],
}

/// Height of the caption band at the top of each sub-region, millimetres.
pub fn caption_band_mm() -> f32 {
    CAPTION_SIZE * 1.4 / PT_PER_MM
}

/// Lay out one card into the cell geometry of `grid`.
///
/// Pure and infallible: empty and overlong values both produce a valid
/// cell, via blank regions and shrink/clipping respectively.
pub fn render_cell(
    card: &CardContent,
    grid: &Grid,
    min_font_size: f32,
    metrics: &dyn TextMeasure,
) -> RenderedCell {
    let region_height = grid.cell_height_mm / 4.0;
    let band = caption_band_mm();
    let fields = card.fields();

    let regions = std::array::from_fn(|i| {
        let style = &FIELD_STYLES[i];
        let region = Rect {
            x: 0.0,
            y: i as f32 * region_height,
            width: grid.cell_width_mm,
            height: region_height,
        };
        let value_box = Rect {
            x: H_INSET_MM,
            y: region.y + V_INSET_MM + band,
            width: (grid.cell_width_mm - 2.0 * H_INSET_MM).max(0.0),
            height: (region_height - 2.0 * V_INSET_MM - band).max(0.0),
        };
        let text = fit_text(
            fields[i],
            value_box.width * PT_PER_MM,
            value_box.height * PT_PER_MM,
            style.nominal_size,
            min_font_size,
            metrics,
        );
        RenderedRegion {
            caption: style.caption,
            region,
            value_box,
            text,
            color: style.color,
        }
    });

    RenderedCell { regions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fit::BuiltinMetrics;

    fn grid_3x4() -> Grid {
        Grid {
            rows: 4,
            columns: 3,
            cell_width_mm: 70.0,
            cell_height_mm: 70.725,
        }
    }

    fn full_card() -> CardContent {
        CardContent {
            word: "ubiquitous".into(),
            auxiliary: "adj.".into(),
            translation: "无处不在的".into(),
            example: "Smartphones have become ubiquitous in modern life.".into(),
        }
    }

    #[test]
    fn four_regions_in_fixed_order_with_all_captions() {
        let cell = render_cell(&full_card(), &grid_3x4(), 5.0, &BuiltinMetrics);
        let captions: Vec<_> = cell.regions.iter().map(|r| r.caption).collect();
        assert_eq!(captions, ["English", "Part of Speech", "Chinese", "Example"]);
        assert_eq!(cell.regions[0].text.lines.join(" "), "ubiquitous");
        assert_eq!(cell.regions[1].text.lines.join(" "), "adj.");
    }

    #[test]
    fn regions_tile_the_cell_without_overlap() {
        let grid = grid_3x4();
        let cell = render_cell(&full_card(), &grid, 5.0, &BuiltinMetrics);
        for (i, region) in cell.regions.iter().enumerate() {
            let expected_y = i as f32 * grid.cell_height_mm / 4.0;
            assert!((region.region.y - expected_y).abs() < 1e-4);
            assert!((region.region.height - grid.cell_height_mm / 4.0).abs() < 1e-4);
        }
    }

    #[test]
    fn value_text_stays_inside_its_region() {
        // A deliberately overlong example sentence must not bleed into the
        // neighbouring sub-region.
        let mut card = full_card();
        card.example = "This is an exceptionally long example sentence that keeps \
                        going well past any reasonable flashcard width just to \
                        prove that the shrinking layout holds the line."
            .repeat(2);
        let cell = render_cell(&card, &grid_3x4(), 5.0, &BuiltinMetrics);
        for region in &cell.regions {
            assert!(region.region.contains(&region.value_box));
            assert!(
                region.text_height_mm() <= region.value_box.height + 1e-4,
                "field '{}' overflows: {} mm of text in {} mm box",
                region.caption,
                region.text_height_mm(),
                region.value_box.height
            );
            for line in &region.text.lines {
                let w = BuiltinMetrics.text_width(line, region.text.font_size) / PT_PER_MM;
                assert!(w <= region.value_box.width + 1e-3);
            }
        }
    }

    #[test]
    fn empty_card_keeps_full_geometry() {
        let grid = grid_3x4();
        let blank = render_cell(&CardContent::blank(), &grid, 5.0, &BuiltinMetrics);
        let full = render_cell(&full_card(), &grid, 5.0, &BuiltinMetrics);
        for (b, f) in blank.regions.iter().zip(full.regions.iter()) {
            assert_eq!(b.region, f.region);
            assert_eq!(b.value_box, f.value_box);
            assert_eq!(b.caption, f.caption);
            assert!(b.text.lines.is_empty());
        }
    }
}
