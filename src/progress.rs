//! Progress-callback trait for per-document ingest events.
//!
//! Pass a `&dyn IngestProgress` into
//! [`crate::ingest::analyze_document`] to receive real-time events while a
//! document moves through upload → poll → infer. The callback approach is
//! the least-invasive integration point: the CLI forwards events to a
//! terminal spinner, a server could forward them to a websocket, and the
//! library knows nothing about either.
//!
//! All methods have default no-op implementations so callers only override
//! what they care about; [`SilentProgress`] is the ready-made "override
//! nothing" implementation.

/// Called by the ingest pipeline as a document advances.
///
/// Implementations must be `Send + Sync`. Within one document the calls are
/// strictly sequential — upload, then polls in order, then inference.
pub trait IngestProgress: Send + Sync {
    /// Called once before the upload starts.
    fn on_upload_start(&self, name: &str, size_bytes: u64) {
        let _ = (name, size_bytes);
    }

    /// Called when the raw bytes have been accepted by the upload target.
    fn on_upload_complete(&self, name: &str) {
        let _ = name;
    }

    /// Called after each parse-status poll.
    ///
    /// `status` is the service's raw status code (e.g. `PARSING`).
    fn on_poll(&self, attempt: u32, max_attempts: u32, status: &str) {
        let _ = (attempt, max_attempts, status);
    }

    /// Called once when the document reaches the ready state.
    fn on_parse_ready(&self) {}

    /// Called just before the inference request is sent.
    fn on_inference_start(&self) {}

    /// Called when the inference response arrived.
    ///
    /// `response_len` is the byte length of the raw model output.
    fn on_inference_complete(&self, response_len: usize) {
        let _ = response_len;
    }
}

/// An [`IngestProgress`] that reports nothing.
pub struct SilentProgress;

impl IngestProgress for SilentProgress {}
