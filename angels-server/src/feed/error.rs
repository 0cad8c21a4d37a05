//! Feed error types.

/// Errors from fetching the raw station snapshot.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Reading a local snapshot file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed (network error, client timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The fetch did not complete in time
    #[error("fetch timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// A station record that cannot be turned into a [`Station`](crate::domain::Station).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("malformed station record {index}: {reason}")]
pub struct MalformedRecord {
    /// Position of the record in the feature list.
    pub index: usize,
    pub reason: String,
}

/// Errors from decoding a raw snapshot into stations.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Payload is not the expected JSON shape
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A record is missing required fields or has bad coordinates
    #[error(transparent)]
    Malformed(#[from] MalformedRecord),
}
