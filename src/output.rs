//! Output types: what a deck-generation run produces besides the PDF itself.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Document-level metadata stamped into the generated PDF and echoed in the
/// run output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckMetadata {
    /// PDF document title.
    pub title: String,
    /// PDF author string.
    pub author: String,
    /// PDF subject string.
    pub subject: String,
    /// PDF keyword list.
    pub keywords: Vec<String>,
}

impl Default for DeckMetadata {
    fn default() -> Self {
        Self {
            title: "单词卡片".to_string(),
            author: "vocab2cards".to_string(),
            subject: "单词闪卡".to_string(),
            keywords: vec!["单词".to_string(), "记忆".to_string(), "闪卡".to_string()],
        }
    }
}

/// Statistics about one generated deck.
///
/// `cards` counts real cards only; `padding_cards` counts the blank fillers
/// appended to complete the final page, so
/// `cards + padding_cards == pages × grid capacity`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckStats {
    /// Vocabulary entries received from extraction.
    pub entries: usize,
    /// Real (non-padding) cards laid out.
    pub cards: usize,
    /// Blank cards appended to fill the last page.
    pub padding_cards: usize,
    /// Pages written.
    pub pages: usize,
    /// Wall-clock time for layout + render + write, in milliseconds.
    pub duration_ms: u64,
}

/// Result of a successful deck generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckOutput {
    /// Where the PDF was written.
    pub path: PathBuf,
    /// Run statistics.
    pub stats: DeckStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metadata_matches_deck_branding() {
        let meta = DeckMetadata::default();
        assert_eq!(meta.title, "单词卡片");
        assert_eq!(meta.keywords.len(), 3);
    }

    #[test]
    fn stats_serialise_to_json() {
        let stats = DeckStats {
            entries: 13,
            cards: 13,
            padding_cards: 11,
            pages: 2,
            duration_ms: 42,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"padding_cards\":11"));
    }
}
