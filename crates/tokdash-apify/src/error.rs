use thiserror::Error;

use crate::types::RunStatus;

/// Errors returned by the Apify API client.
#[derive(Debug, Error)]
pub enum ApifyError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Apify returned its structured error envelope (`{"error": {...}}`).
    #[error("Apify API error ({kind}): {message}")]
    Api { kind: String, message: String },

    /// Non-2xx status without a parseable Apify error envelope.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The actor run reached a terminal state other than `SUCCEEDED`.
    #[error("actor run {run_id} finished with status {status}")]
    RunFailed { run_id: String, status: RunStatus },

    /// The actor run did not reach a terminal state within the deadline.
    #[error("actor run {run_id} did not finish within {waited_secs}s")]
    RunTimedOut { run_id: String, waited_secs: u64 },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
