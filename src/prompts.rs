//! The extraction instruction sent to the inference service.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing what the model is asked to
//!    extract requires editing exactly one place.
//! 2. **Testability** — unit tests can inspect the instruction without a
//!    live service call, so regressions in the requested record shape are
//!    caught immediately.
//!
//! Callers can override via [`crate::config::DeckConfig::instruction`]; the
//! constant here is used only when no override is provided.

/// Default instruction for extracting vocabulary records from an ingested
/// document.
pub const EXTRACTION_PROMPT: &str = r#"You are a vocabulary extraction assistant. Analyse the attached document — a scanned vocabulary list, textbook page, or word table — and extract every vocabulary item you can find.

Follow these rules precisely:

1. OUTPUT SHAPE
   - Output ONLY a JSON array of objects, nothing else
   - Each object has exactly these keys: "english", "chinese", "part_of_speech", "example_sentence"
   - Use an empty string for any value the document does not provide
   - Do NOT wrap the array in markdown fences or add commentary

2. CONTENT
   - Keep the document's own ordering of the words
   - Copy spellings and translations exactly; do not invent corrections
   - If the document gives a phonetic transcription instead of a part of
     speech, put it in "part_of_speech"
   - Include an example sentence only when the document contains one"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_requests_the_canonical_record_keys() {
        for key in ["english", "chinese", "part_of_speech", "example_sentence"] {
            assert!(EXTRACTION_PROMPT.contains(key), "missing key: {key}");
        }
    }

    #[test]
    fn prompt_demands_bare_json() {
        assert!(EXTRACTION_PROMPT.contains("JSON array"));
        assert!(EXTRACTION_PROMPT.contains("fences"));
    }
}
