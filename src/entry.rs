//! The vocabulary data model: semantic entries and their rendering-ready
//! projection.
//!
//! [`VocabEntry`] is what the extraction layer produces — one record per
//! word, every field optional. [`CardContent`] is what the layout engine
//! consumes: exactly four populated-or-empty string slots in a fixed order
//! (word, auxiliary, translation, example), plus an explicit blank sentinel
//! used to pad the last page of a deck to a full grid.
//!
//! Different producers disagree on field names (`english` vs `word`,
//! `part_of_speech` vs `phonetic`), so [`VocabEntry`] accepts every known
//! alias via serde and folds them into one canonical shape.

use serde::{Deserialize, Serialize};

/// One flashcard's semantic payload, as extracted from source material.
///
/// All fields default to empty; none is unique. Input order is preserved
/// downstream and determines placement on the printed pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    /// The headword.
    #[serde(default, alias = "english")]
    pub word: String,

    /// Part of speech or phonetic transcription, depending on which model
    /// variant produced the record. Folded into one slot either way.
    #[serde(default, alias = "part_of_speech", alias = "phonetic", alias = "pos")]
    pub auxiliary: String,

    /// The translation / meaning.
    #[serde(default, alias = "chinese", alias = "meaning")]
    pub translation: String,

    /// An example sentence.
    #[serde(default, alias = "example_sentence")]
    pub example: String,
}

/// Captions printed above each of the four card fields, in render order.
pub const FIELD_CAPTIONS: [&str; 4] = ["English", "Part of Speech", "Chinese", "Example"];

/// Rendering-ready projection of a [`VocabEntry`], or a blank padding card.
///
/// Every card has exactly four string slots in a fixed order; empty slots
/// stay empty strings, never `None`, so the renderer can treat all cards
/// uniformly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardContent {
    pub word: String,
    pub auxiliary: String,
    pub translation: String,
    pub example: String,
}

impl CardContent {
    /// Build a card from an entry. Pure, never fails; surrounding
    /// whitespace is trimmed but content is otherwise untouched.
    pub fn from_entry(entry: &VocabEntry) -> Self {
        Self {
            word: entry.word.trim().to_string(),
            auxiliary: entry.auxiliary.trim().to_string(),
            translation: entry.translation.trim().to_string(),
            example: entry.example.trim().to_string(),
        }
    }

    /// The padding sentinel: a card with all four slots empty, appended to
    /// complete the final page's grid.
    pub fn blank() -> Self {
        Self::default()
    }

    /// True when every slot is empty — i.e. this is a padding card or an
    /// entry that carried no usable data.
    pub fn is_blank(&self) -> bool {
        self.word.is_empty()
            && self.auxiliary.is_empty()
            && self.translation.is_empty()
            && self.example.is_empty()
    }

    /// The four field values in render order, parallel to
    /// [`FIELD_CAPTIONS`].
    pub fn fields(&self) -> [&str; 4] {
        [&self.word, &self.auxiliary, &self.translation, &self.example]
    }
}

impl From<&VocabEntry> for CardContent {
    fn from(entry: &VocabEntry) -> Self {
        Self::from_entry(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_fold_into_canonical_fields() {
        let e: VocabEntry = serde_json::from_str(
            r#"{"english":"apple","chinese":"苹果","part_of_speech":"n.","example_sentence":"An apple a day."}"#,
        )
        .unwrap();
        assert_eq!(e.word, "apple");
        assert_eq!(e.translation, "苹果");
        assert_eq!(e.auxiliary, "n.");
        assert_eq!(e.example, "An apple a day.");
    }

    #[test]
    fn canonical_keys_also_accepted() {
        let e: VocabEntry = serde_json::from_str(
            r#"{"word":"run","meaning":"跑","phonetic":"/rʌn/"}"#,
        )
        .unwrap();
        assert_eq!(e.word, "run");
        assert_eq!(e.translation, "跑");
        assert_eq!(e.auxiliary, "/rʌn/");
        assert_eq!(e.example, "");
    }

    #[test]
    fn missing_fields_become_empty_strings() {
        let e: VocabEntry = serde_json::from_str(r#"{"word":"x"}"#).unwrap();
        let card = CardContent::from_entry(&e);
        assert_eq!(card.fields(), ["x", "", "", ""]);
        assert!(!card.is_blank());
    }

    #[test]
    fn blank_card_is_blank() {
        assert!(CardContent::blank().is_blank());
        assert_eq!(CardContent::blank().fields(), ["", "", "", ""]);
    }

    #[test]
    fn from_entry_trims_whitespace() {
        let e = VocabEntry {
            word: "  spaced  ".into(),
            ..Default::default()
        };
        assert_eq!(CardContent::from_entry(&e).word, "spaced");
    }
}
