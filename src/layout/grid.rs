//! Grid geometry and pagination.
//!
//! The paginator owns exactly one job: slicing a flat card sequence into
//! complete rectangular pages. Every page holds `rows × columns` cards —
//! never fewer — because the output is drawn as a fixed-size ruled table,
//! and a ragged last row would leave cells with undefined content and
//! misaligned borders. The tail of the sequence is padded with blank cards
//! instead.

use crate::entry::CardContent;

/// Per-page grid geometry, derived from the page dimensions by
/// [`crate::config::DeckConfig::grid`].
///
/// `rows ≥ 1` and `columns ≥ 1` are enforced at config build time and fixed
/// for the whole document; there is no per-page variation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub rows: usize,
    pub columns: usize,
    pub cell_width_mm: f32,
    pub cell_height_mm: f32,
}

impl Grid {
    /// Cards per page.
    pub fn capacity(&self) -> usize {
        self.rows * self.columns
    }
}

/// One fully-populated page of cards, in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    cards: Vec<CardContent>,
    columns: usize,
}

impl Page {
    /// All cards on this page, row-major.
    pub fn cards(&self) -> &[CardContent] {
        &self.cards
    }

    /// The card at `(row, col)`; flat index is `row * columns + col`,
    /// matching natural reading order.
    pub fn card(&self, row: usize, col: usize) -> &CardContent {
        &self.cards[row * self.columns + col]
    }
}

/// Slice `cards` into complete pages, padding the tail with blanks.
///
/// * Empty input produces zero pages — the padding step is skipped entirely
///   so it cannot loop on nothing.
/// * Otherwise blanks are appended until the total is a multiple of the
///   grid capacity, then the sequence is chunked; chunk `i` becomes page
///   `i`. Deterministic: same input and grid, same pages.
pub fn paginate(mut cards: Vec<CardContent>, grid: &Grid) -> Vec<Page> {
    if cards.is_empty() {
        return Vec::new();
    }

    let capacity = grid.capacity();
    while cards.len() % capacity != 0 {
        cards.push(CardContent::blank());
    }

    cards
        .chunks(capacity)
        .map(|chunk| Page {
            cards: chunk.to_vec(),
            columns: grid.columns,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_3x4() -> Grid {
        Grid {
            rows: 4,
            columns: 3,
            cell_width_mm: 70.0,
            cell_height_mm: 70.7,
        }
    }

    fn card(word: &str) -> CardContent {
        CardContent {
            word: word.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_yields_zero_pages() {
        assert!(paginate(Vec::new(), &grid_3x4()).is_empty());
    }

    #[test]
    fn page_count_is_ceil_of_n_over_capacity() {
        let grid = grid_3x4();
        for (n, expected_pages) in [(1, 1), (11, 1), (12, 1), (13, 2), (24, 2), (25, 3)] {
            let cards = (0..n).map(|i| card(&format!("w{i}"))).collect();
            let pages = paginate(cards, &grid);
            assert_eq!(pages.len(), expected_pages, "n = {n}");
            for page in &pages {
                assert_eq!(page.cards().len(), grid.capacity());
            }
        }
    }

    #[test]
    fn single_card_pads_to_full_page() {
        let pages = paginate(vec![card("example")], &grid_3x4());
        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        assert_eq!(page.cards()[0].word, "example");
        assert!(page.cards()[1..].iter().all(CardContent::is_blank));
    }

    #[test]
    fn thirteen_cards_leave_eleven_blanks_on_page_two() {
        let cards: Vec<_> = (0..13).map(|i| card(&format!("w{i}"))).collect();
        let pages = paginate(cards, &grid_3x4());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].cards()[0].word, "w12");
        assert_eq!(
            pages[1].cards().iter().filter(|c| c.is_blank()).count(),
            11
        );
    }

    #[test]
    fn exact_multiple_needs_no_padding() {
        let cards: Vec<_> = (0..12).map(|i| card(&format!("w{i}"))).collect();
        let pages = paginate(cards, &grid_3x4());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].cards().iter().all(|c| !c.is_blank()));
    }

    #[test]
    fn row_major_cell_addressing() {
        let cards: Vec<_> = (0..12).map(|i| card(&format!("w{i}"))).collect();
        let pages = paginate(cards, &grid_3x4());
        // Row 1, column 2 of a 3-wide grid is flat index 5.
        assert_eq!(pages[0].card(1, 2).word, "w5");
        assert_eq!(pages[0].card(0, 0).word, "w0");
        assert_eq!(pages[0].card(3, 2).word, "w11");
    }

    #[test]
    fn pagination_is_deterministic() {
        let cards: Vec<_> = (0..17).map(|i| card(&format!("w{i}"))).collect();
        let a = paginate(cards.clone(), &grid_3x4());
        let b = paginate(cards, &grid_3x4());
        assert_eq!(a, b);
    }
}
