//! Error types for ml_tn_sync

use thiserror::Error;

/// Unified error type for sync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or invalid credentials/settings
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Token refresh failed
    #[error("Authentication failed: {0}")]
    Authentication(String),
    /// Price value could not be parsed as a number
    #[error("Invalid price value: '{0}'")]
    Parse(String),
    /// A catalog could not be retrieved
    #[error("Failed to fetch {catalog} catalog: {reason}")]
    Fetch {
        catalog: &'static str,
        reason: String,
    },
    /// A single price update was rejected or failed in transit
    #[error("Failed to update price of {target}: {reason}")]
    Mutation { target: String, reason: String },
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP error status code with response body
    #[error("HTTP error: {status} - {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    /// Failed to parse or write JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Wraps a transport-level error as a fatal catalog fetch failure.
    pub fn fetch(catalog: &'static str, err: SyncError) -> Self {
        match err {
            already @ SyncError::Fetch { .. } => already,
            other => SyncError::Fetch {
                catalog,
                reason: other.to_string(),
            },
        }
    }

    /// Wraps a transport-level error as a recoverable per-item failure.
    pub fn mutation(target: impl Into<String>, err: SyncError) -> Self {
        SyncError::Mutation {
            target: target.into(),
            reason: err.to_string(),
        }
    }
}

/// Result alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Turns a non-2xx response into [`SyncError::HttpStatus`] carrying the body.
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    log::debug!("Error response body: {body}");
    Err(SyncError::HttpStatus { status, body })
}
