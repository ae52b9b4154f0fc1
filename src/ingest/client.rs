//! HTTP client for the document-ingestion service.
//!
//! The service's contract is small: apply for an upload lease with a
//! (content-hash, filename, size) triple, PUT the raw bytes to the signed
//! URL the lease returns, register the uploaded file for parsing, and
//! query its lifecycle status.
//!
//! Credentials are resolved from the environment **before** any network
//! activity — a misconfigured run fails instantly with a
//! [`VocabCardsError::MissingCredential`], never halfway through an upload.

use crate::config::DeckConfig;
use crate::error::{DocError, VocabCardsError};
use crate::ingest::poll::ParseStatus;
use md5::{Digest, Md5};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::Duration;
use tracing::debug;

/// Environment variable holding the service API key.
pub const API_KEY_VAR: &str = "DASHSCOPE_API_KEY";
/// Environment variable holding the application identifier.
pub const APP_ID_VAR: &str = "DASHSCOPE_APP_ID";
/// Environment variable holding the optional workspace identifier.
pub const WORKSPACE_VAR: &str = "DASHSCOPE_WORKSPACE_ID";

/// Remote-service credentials, resolved once per run.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub app_id: String,
    pub workspace_id: String,
}

impl Credentials {
    /// Read credentials from the environment.
    ///
    /// The API key and application id are required; the workspace id
    /// defaults to `"default"`.
    pub fn from_env() -> Result<Self, VocabCardsError> {
        Ok(Self {
            api_key: require_env(API_KEY_VAR)?,
            app_id: require_env(APP_ID_VAR)?,
            workspace_id: std::env::var(WORKSPACE_VAR)
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "default".to_string()),
        })
    }
}

fn require_env(var: &'static str) -> Result<String, VocabCardsError> {
    match std::env::var(var) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(VocabCardsError::MissingCredential { var }),
    }
}

/// A granted upload lease: where to PUT the bytes, and how.
#[derive(Debug, Clone)]
pub struct UploadLease {
    pub lease_id: String,
    pub url: String,
    pub method: String,
    /// Headers the signed URL requires verbatim (content type plus the
    /// service's extra-auth header).
    pub headers: HashMap<String, String>,
}

// ── Wire shapes ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LeaseResponse {
    data: LeaseData,
}

#[derive(Deserialize)]
struct LeaseData {
    file_upload_lease_id: String,
    param: LeaseParam,
}

#[derive(Deserialize)]
struct LeaseParam {
    url: String,
    #[serde(default = "default_method")]
    method: String,
    #[serde(default)]
    headers: HashMap<String, String>,
}

fn default_method() -> String {
    "PUT".to_string()
}

#[derive(Deserialize)]
struct AddFileResponse {
    data: AddFileData,
}

#[derive(Deserialize)]
struct AddFileData {
    file_id: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    data: StatusData,
}

#[derive(Deserialize)]
struct StatusData {
    status: String,
}

// ── Client ───────────────────────────────────────────────────────────────

/// Client for the ingestion service, carrying credentials and endpoints.
pub struct IngestClient {
    http: reqwest::Client,
    upload_http: reqwest::Client,
    creds: Credentials,
    data_endpoint: String,
    completion_endpoint: String,
}

impl IngestClient {
    /// Build a client from resolved credentials and the run configuration.
    pub fn new(creds: Credentials, config: &DeckConfig) -> Result<Self, VocabCardsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| VocabCardsError::Internal(format!("HTTP client: {e}")))?;
        // Separate client for the raw-byte upload: a scan can be tens of
        // megabytes and needs a much longer timeout than a status query.
        let upload_http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upload_timeout_secs))
            .build()
            .map_err(|e| VocabCardsError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            upload_http,
            creds,
            data_endpoint: config.data_endpoint.trim_end_matches('/').to_string(),
            completion_endpoint: config.completion_endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn app_id(&self) -> &str {
        &self.creds.app_id
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.creds.api_key
    }

    pub(crate) fn completion_endpoint(&self) -> &str {
        &self.completion_endpoint
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    fn workspace_url(&self, tail: &str) -> String {
        format!(
            "{}/v2/workspaces/{}/{}",
            self.data_endpoint, self.creds.workspace_id, tail
        )
    }

    /// Apply for an upload lease for one document.
    pub async fn apply_upload_lease(
        &self,
        name: &str,
        bytes: &[u8],
    ) -> Result<UploadLease, DocError> {
        let body = serde_json::json!({
            "md5": md5_hex(bytes),
            "file_name": name,
            "size_in_bytes": bytes.len(),
            "category_type": "SESSION_FILE",
        });

        let resp = self
            .http
            .post(self.workspace_url("upload-leases"))
            .bearer_auth(&self.creds.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DocError::LeaseFailed {
                name: name.to_string(),
                detail: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(DocError::LeaseFailed {
                name: name.to_string(),
                detail: http_failure(resp).await,
            });
        }

        let lease: LeaseResponse = resp.json().await.map_err(|e| DocError::LeaseFailed {
            name: name.to_string(),
            detail: format!("malformed lease response: {e}"),
        })?;

        debug!("Lease {} granted for '{}'", lease.data.file_upload_lease_id, name);
        Ok(UploadLease {
            lease_id: lease.data.file_upload_lease_id,
            url: lease.data.param.url,
            method: lease.data.param.method,
            headers: lease.data.param.headers,
        })
    }

    /// PUT the raw bytes to the signed upload URL.
    ///
    /// The lease's headers are forwarded verbatim — the signed URL rejects
    /// the upload without them.
    pub async fn upload(
        &self,
        lease: &UploadLease,
        bytes: Vec<u8>,
        name: &str,
    ) -> Result<(), DocError> {
        if !lease.method.eq_ignore_ascii_case("PUT") {
            debug!(
                "Lease for '{}' asks for {} (expected PUT); honouring PUT",
                name, lease.method
            );
        }

        let mut req = self.upload_http.put(&lease.url).body(bytes);
        for (key, value) in &lease.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let resp = req.send().await.map_err(|e| DocError::UploadFailed {
            name: name.to_string(),
            detail: e.to_string(),
        })?;

        if !resp.status().is_success() {
            return Err(DocError::UploadFailed {
                name: name.to_string(),
                detail: http_failure(resp).await,
            });
        }
        Ok(())
    }

    /// Register the uploaded bytes as a parseable file; returns the file id.
    pub async fn register_file(&self, lease_id: &str, name: &str) -> Result<String, DocError> {
        let body = serde_json::json!({
            "lease_id": lease_id,
            "parser": "DASHSCOPE_DOCMIND",
            "category_id": "default",
            "category_type": "SESSION_FILE",
        });

        let resp = self
            .http
            .post(self.workspace_url("files"))
            .bearer_auth(&self.creds.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DocError::RegisterFailed {
                name: name.to_string(),
                detail: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(DocError::RegisterFailed {
                name: name.to_string(),
                detail: http_failure(resp).await,
            });
        }

        let added: AddFileResponse = resp.json().await.map_err(|e| DocError::RegisterFailed {
            name: name.to_string(),
            detail: format!("malformed registration response: {e}"),
        })?;
        Ok(added.data.file_id)
    }

    /// Query the parse lifecycle status of a registered file.
    pub async fn file_status(&self, file_id: &str) -> Result<ParseStatus, DocError> {
        let resp = self
            .http
            .get(self.workspace_url(&format!("files/{file_id}")))
            .bearer_auth(&self.creds.api_key)
            .send()
            .await
            .map_err(|e| DocError::StatusFailed {
                detail: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(DocError::StatusFailed {
                detail: http_failure(resp).await,
            });
        }

        let status: StatusResponse = resp.json().await.map_err(|e| DocError::StatusFailed {
            detail: format!("malformed status response: {e}"),
        })?;
        Ok(ParseStatus::from_code(&status.data.status))
    }
}

/// Describe a non-success response with as much diagnostic detail as the
/// body offers.
async fn http_failure(resp: reqwest::Response) -> String {
    let status = resp.status();
    match resp.text().await {
        Ok(body) if !body.is_empty() => format!("HTTP {status}: {body}"),
        _ => format!("HTTP {status}"),
    }
}

/// Lowercase-hex MD5 of the document bytes, as the lease request expects.
fn md5_hex(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    // Feed in chunks so the hashing pattern matches arbitrarily large
    // buffers without assuming they fit a single update.
    for chunk in bytes.chunks(4096) {
        hasher.update(chunk);
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(32);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_matches_known_vector() {
        // RFC 1321 test vector.
        assert_eq!(md5_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn lease_response_deserialises_with_and_without_method() {
        let full = r#"{"data":{"file_upload_lease_id":"L1","param":{
            "url":"https://u","method":"PUT",
            "headers":{"X-bailian-extra":"tok","Content-Type":"application/pdf"}}}}"#;
        let lease: LeaseResponse = serde_json::from_str(full).unwrap();
        assert_eq!(lease.data.file_upload_lease_id, "L1");
        assert_eq!(lease.data.param.headers.len(), 2);

        let sparse = r#"{"data":{"file_upload_lease_id":"L2","param":{"url":"https://u"}}}"#;
        let lease: LeaseResponse = serde_json::from_str(sparse).unwrap();
        assert_eq!(lease.data.param.method, "PUT");
        assert!(lease.data.param.headers.is_empty());
    }

    #[test]
    fn missing_key_is_a_config_error() {
        std::env::remove_var(API_KEY_VAR);
        assert!(matches!(
            Credentials::from_env(),
            Err(VocabCardsError::MissingCredential { var: API_KEY_VAR })
        ));
    }
}
