//! Normalisation of heterogeneous model output into vocabulary entries.
//!
//! The inference service does not return one stable shape. Depending on the
//! application variant behind the configured app id, the same call can yield:
//!
//! * a native JSON array of vocabulary records,
//! * a list of text blocks whose concatenation contains the records, or
//! * free text with a JSON array embedded somewhere in the middle
//!   ("Here are the words I found: [ … ] Let me know if …").
//!
//! Rather than ad-hoc type sniffing at every call site, the shapes are a
//! tagged variant — [`ModelOutput`] — with one normalising function per
//! variant, all converging on `Vec<VocabEntry>`.
//!
//! ## Failure policy
//!
//! Extraction never errors. A response that cannot be coaxed into records
//! yields an empty vec; the pipeline tolerates a document producing no data
//! and moves on. Propagating a parse error here would abort a batch run over
//! one chatty model response, which is the wrong trade.

use crate::entry::VocabEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

/// One text block from a block-list response.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
}

/// The response shapes the inference service is known to produce.
#[derive(Debug, Clone)]
pub enum ModelOutput {
    /// Already-structured array of vocabulary records.
    Records(Vec<Value>),
    /// A list of text blocks; their concatenation is treated as free text.
    Blocks(Vec<TextBlock>),
    /// Free text, possibly containing an embedded JSON array.
    Text(String),
}

impl ModelOutput {
    /// Classify a raw response string, which may or may not be JSON.
    ///
    /// Valid JSON goes through [`ModelOutput::classify`]; anything else is
    /// free text.
    pub fn from_raw(raw: &str) -> ModelOutput {
        match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Array(_)) => ModelOutput::classify(&value),
            _ => ModelOutput::Text(raw.to_string()),
        }
    }

    /// Classify a raw response body.
    ///
    /// A top-level array of objects with a `text` key is a block list;
    /// any other array is taken as records; everything else is free text.
    pub fn classify(raw: &Value) -> ModelOutput {
        match raw {
            Value::Array(items) => {
                let all_blocks = !items.is_empty()
                    && items
                        .iter()
                        .all(|v| v.get("text").map(Value::is_string).unwrap_or(false));
                if all_blocks {
                    let blocks = items
                        .iter()
                        .map(|v| TextBlock {
                            text: v["text"].as_str().unwrap_or_default().to_string(),
                        })
                        .collect();
                    ModelOutput::Blocks(blocks)
                } else {
                    ModelOutput::Records(items.clone())
                }
            }
            Value::String(s) => ModelOutput::Text(s.clone()),
            other => ModelOutput::Text(other.to_string()),
        }
    }
}

/// Normalise any model output shape into an ordered list of entries.
pub fn normalize(output: ModelOutput) -> Vec<VocabEntry> {
    match output {
        ModelOutput::Records(values) => entries_from_values(&values),
        ModelOutput::Blocks(blocks) => {
            let joined: String = blocks
                .iter()
                .map(|b| b.text.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            entries_from_text(&joined)
        }
        ModelOutput::Text(text) => entries_from_text(&text),
    }
}

/// Parse user-supplied JSON (a file or stdin) into entries.
///
/// Accepts a JSON array of records. Malformed input degrades to an empty
/// list with a warning, matching the pipeline's recover-locally policy.
pub fn entries_from_json(text: &str) -> Vec<VocabEntry> {
    match serde_json::from_str::<Vec<Value>>(text) {
        Ok(values) => entries_from_values(&values),
        Err(e) => {
            warn!("Input is not a JSON array of records: {e}");
            Vec::new()
        }
    }
}

/// Deserialize each record, skipping the ones that do not fit.
fn entries_from_values(values: &[Value]) -> Vec<VocabEntry> {
    let entries: Vec<VocabEntry> = values
        .iter()
        .filter_map(|v| match serde_json::from_value::<VocabEntry>(v.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping malformed record: {e}");
                None
            }
        })
        .collect();
    debug!("Normalised {} of {} records", entries.len(), values.len());
    entries
}

/// Extract entries from free text containing an embedded JSON array.
///
/// Strips markdown fences first (models wrap JSON in ` ```json ` fences no
/// matter what the instruction says), then takes the span from the first
/// `[` to the last `]` and parses it as an array of records. Anything that
/// fails along the way yields an empty list.
fn entries_from_text(text: &str) -> Vec<VocabEntry> {
    let cleaned = strip_code_fences(text);
    let Some(span) = embedded_array(&cleaned) else {
        warn!("Model output contains no JSON array; yielding no entries");
        return Vec::new();
    };
    match serde_json::from_str::<Vec<Value>>(span) {
        Ok(values) => entries_from_values(&values),
        Err(e) => {
            warn!("Embedded array failed to parse: {e}");
            Vec::new()
        }
    }
}

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*\n(.*)\n```\s*$").unwrap());

/// Strip an outer ` ```json … ``` ` fence if the whole text is wrapped in one.
pub fn strip_code_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

/// The span from the first `[` to the last `]`, inclusive.
fn embedded_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_with_embedded_array() {
        let out = ModelOutput::Text(r#"blah [ {"word":"x"} ] blah"#.to_string());
        let entries = normalize(out);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "x");
    }

    #[test]
    fn structured_records_pass_through() {
        let raw: Value = serde_json::from_str(
            r#"[{"english":"cat","chinese":"猫"},{"english":"dog","chinese":"狗"}]"#,
        )
        .unwrap();
        let entries = normalize(ModelOutput::classify(&raw));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].word, "dog");
        assert_eq!(entries[1].translation, "狗");
    }

    #[test]
    fn block_list_concatenation_is_scanned() {
        let raw: Value = serde_json::from_str(
            r#"[{"text":"the words are"},{"text":"[{\"word\":\"sun\"}]"}]"#,
        )
        .unwrap();
        let output = ModelOutput::classify(&raw);
        assert!(matches!(output, ModelOutput::Blocks(_)));
        let entries = normalize(output);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "sun");
    }

    #[test]
    fn garbage_yields_empty_not_error() {
        assert!(normalize(ModelOutput::Text("no json here".into())).is_empty());
        assert!(normalize(ModelOutput::Text("unbalanced ] [ nope".into())).is_empty());
        assert!(entries_from_json("{not json").is_empty());
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let fenced = "```json\n[{\"word\":\"moon\"}]\n```";
        let entries = normalize(ModelOutput::Text(fenced.into()));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "moon");
    }

    #[test]
    fn order_is_preserved() {
        let text = r#"[{"word":"a"},{"word":"b"},{"word":"c"}]"#;
        let words: Vec<String> = entries_from_json(text).into_iter().map(|e| e.word).collect();
        assert_eq!(words, ["a", "b", "c"]);
    }

    #[test]
    fn malformed_record_is_skipped_not_fatal() {
        // Second record has the wrong type for `word`; it is dropped.
        let text = r#"[{"word":"ok"},{"word":42}]"#;
        let entries = entries_from_json(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "ok");
    }
}
