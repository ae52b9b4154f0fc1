//! Error types for the vocab2cards library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`VocabCardsError`] — **Fatal**: the run cannot proceed at all
//!   (missing credentials, invalid grid configuration, unwritable output
//!   path). Returned as `Err(VocabCardsError)` from the top-level deck
//!   functions.
//!
//! * [`DocError`] — **Non-fatal**: a single source document failed somewhere
//!   in the upload → poll → infer cycle. The document is abandoned and the
//!   pipeline continues with the next one, so these never abort a batch run.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! abandoned document, log and continue, or collect all failures for a
//! post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the vocab2cards library.
///
/// Per-document failures use [`DocError`] and are reported by the ingest
/// pipeline rather than propagated here.
#[derive(Debug, Error)]
pub enum VocabCardsError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// A required environment variable is not set.
    ///
    /// Raised before any network activity so a misconfigured run fails
    /// instantly instead of after an upload.
    #[error("Missing credential: environment variable {var} is not set.\nTry: export {var}=...")]
    MissingCredential { var: &'static str },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Font errors ───────────────────────────────────────────────────────
    /// The font file could not be read or is not a parseable TrueType font.
    #[error("Failed to load font '{path}': {detail}\nOnly TrueType (.ttf/.otf) fonts are supported.")]
    FontLoad { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    ///
    /// The only fatal error the layout/render core is expected to produce.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF backend rejected the document.
    #[error("PDF generation failed: {0}")]
    PdfBackend(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single source document.
///
/// Produced by the ingest pipeline when one document's upload / poll / infer
/// cycle fails. The overall run continues with the remaining documents.
#[derive(Debug, Clone, Error)]
pub enum DocError {
    /// The source file could not be read from disk.
    #[error("Cannot read '{path}': {detail}")]
    SourceUnreadable { path: PathBuf, detail: String },

    /// The upload-lease request was rejected.
    #[error("Upload lease refused for '{name}': {detail}")]
    LeaseFailed { name: String, detail: String },

    /// The raw-byte upload to the signed URL failed.
    #[error("Upload failed for '{name}': {detail}")]
    UploadFailed { name: String, detail: String },

    /// The uploaded file could not be registered for parsing.
    #[error("File registration failed for '{name}': {detail}")]
    RegisterFailed { name: String, detail: String },

    /// A status query failed at the transport level.
    #[error("Status query failed: {detail}")]
    StatusFailed { detail: String },

    /// The service reported a terminal parse failure.
    ///
    /// `status` is the service's failure code, e.g. `PARSE_FAILED`,
    /// `SAFE_CHECK_FAILED` or `INDEX_BUILDING_FAILED`.
    #[error("Document parsing failed with status {status}")]
    ParseFailed { status: String },

    /// The poll budget was exhausted before the service finished parsing.
    #[error("Document parsing timed out after {attempts} polls")]
    PollTimedOut { attempts: u32 },

    /// The inference call returned an error.
    #[error("Inference call failed: {detail}")]
    InferenceFailed { detail: String },
}
