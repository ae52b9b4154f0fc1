//! The remote ingestion pipeline: upload → poll → infer → normalise.
//!
//! Each submodule implements exactly one interaction with the remote
//! services:
//!
//! ```text
//! file ──▶ client ──▶ poll ──▶ infer ──▶ extract
//! (bytes)  (lease,    (parse   (model    (Vec<VocabEntry>)
//!          upload,    status)  output)
//!          register)
//! ```
//!
//! 1. [`client`] — upload lease, raw-byte PUT, file registration, status
//!    query against the document-ingestion service
//! 2. [`poll`]   — bounded parse-status polling as an explicit state
//!    machine with an injectable clock
//! 3. [`infer`]  — the one-shot completion call referencing the ingested
//!    file
//!
//! Documents are processed one at a time: upload, poll and infer are
//! sequential awaits, and polling is inherently serial (wait, then check).
//! Failures anywhere in the cycle abandon the document with a
//! [`DocError`]; they never abort a batch run.

pub mod client;
pub mod infer;
pub mod poll;

pub use client::{Credentials, IngestClient, UploadLease};
pub use poll::{Clock, ParseStatus, PollOutcome, TokioClock};

use crate::config::DeckConfig;
use crate::entry::VocabEntry;
use crate::error::DocError;
use crate::extract;
use crate::progress::IngestProgress;
use std::path::Path;
use tracing::{debug, info};

/// Run one document through the full remote cycle and return its entries.
///
/// An empty result is a legitimate outcome (the model found nothing); only
/// transport failures, terminal parse states and an exhausted poll budget
/// surface as [`DocError`].
pub async fn analyze_document(
    client: &IngestClient,
    path: &Path,
    config: &DeckConfig,
    clock: &dyn Clock,
    progress: &dyn IngestProgress,
) -> Result<Vec<VocabEntry>, DocError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DocError::SourceUnreadable {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    progress.on_upload_start(&name, bytes.len() as u64);
    let lease = client.apply_upload_lease(&name, &bytes).await?;
    client.upload(&lease, bytes, &name).await?;
    progress.on_upload_complete(&name);

    let file_id = client.register_file(&lease.lease_id, &name).await?;
    info!("Registered '{}' as file {}", name, file_id);

    let outcome = poll::poll_until_ready(
        || client.file_status(&file_id),
        config.poll_interval,
        config.poll_attempts,
        clock,
        progress,
    )
    .await?;

    match outcome {
        PollOutcome::Ready => {}
        PollOutcome::Failed(status) => return Err(DocError::ParseFailed { status }),
        PollOutcome::TimedOut => {
            return Err(DocError::PollTimedOut {
                attempts: config.poll_attempts,
            })
        }
    }

    progress.on_inference_start();
    let raw = infer::run_inference(client, config, &file_id).await?;
    progress.on_inference_complete(raw.len());
    debug!("Model returned {} bytes for '{}'", raw.len(), name);

    Ok(extract::normalize(extract::ModelOutput::from_raw(&raw)))
}
