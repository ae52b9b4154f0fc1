//! The one-shot inference call.
//!
//! Once a document reaches the ready state, a single completion request
//! against the configured application extracts the vocabulary. This module
//! is intentionally thin — the instruction lives in [`crate::prompts`] and
//! response normalisation in [`crate::extract`], so this file only moves
//! bytes.

use crate::config::DeckConfig;
use crate::error::DocError;
use crate::ingest::client::IngestClient;
use crate::prompts::EXTRACTION_PROMPT;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct CompletionResponse {
    output: CompletionOutput,
    #[serde(default)]
    request_id: String,
}

#[derive(Deserialize)]
struct CompletionOutput {
    #[serde(default)]
    text: String,
}

/// Ask the application to extract vocabulary from the ingested file.
///
/// Returns the raw model text; the caller normalises it into entries.
pub async fn run_inference(
    client: &IngestClient,
    config: &DeckConfig,
    file_id: &str,
) -> Result<String, DocError> {
    let prompt = config
        .instruction
        .as_deref()
        .unwrap_or(EXTRACTION_PROMPT);

    let body = serde_json::json!({
        "input": {
            "prompt": prompt,
            "rag_options": {
                "session_file_ids": [file_id],
            },
        },
        "parameters": {},
    });

    let url = format!(
        "{}/api/v1/apps/{}/completion",
        client.completion_endpoint(),
        client.app_id()
    );

    let resp = client
        .http()
        .post(&url)
        .bearer_auth(client.api_key())
        .json(&body)
        .send()
        .await
        .map_err(|e| DocError::InferenceFailed {
            detail: e.to_string(),
        })?;

    let status = resp.status();
    if !status.is_success() {
        // Surface whatever diagnostics the error body carries.
        let detail = match resp.text().await {
            Ok(body) if !body.is_empty() => format!("HTTP {status}: {body}"),
            _ => format!("HTTP {status}"),
        };
        return Err(DocError::InferenceFailed { detail });
    }

    let completion: CompletionResponse =
        resp.json().await.map_err(|e| DocError::InferenceFailed {
            detail: format!("malformed completion response: {e}"),
        })?;

    debug!(
        "Completion {} returned {} bytes",
        completion.request_id,
        completion.output.text.len()
    );
    Ok(completion.output.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_response_deserialises() {
        let raw = r#"{"output":{"text":"[{\"word\":\"x\"}]"},"request_id":"r-1"}"#;
        let resp: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.request_id, "r-1");
        assert!(resp.output.text.contains("word"));
    }

    #[test]
    fn missing_text_defaults_to_empty() {
        let raw = r#"{"output":{}}"#;
        let resp: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.output.text.is_empty());
    }
}
