//! Errors raised while talking to the cluster or reading its answer.

/// Everything that can end a check run after validation.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Connection refused, TLS failure, timeout, ... Details live in `source()`.
    #[error("error getting response")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer carrying an Elasticsearch error document.
    #[error("[{status}] {error_type}: {reason}")]
    Api {
        status: u16,
        error_type: String,
        reason: String,
    },

    /// Non-2xx answer whose body is not an error document.
    #[error("[{status}] {body}")]
    Http { status: u16, body: String },

    #[error("version of client and server are not equal: server {server}, client {expected}.x")]
    VersionMismatch { server: String, expected: u64 },

    #[error("error encoding or decoding a request: {0}")]
    Encoding(String),

    /// `available` is the newline-terminated list of keys found in `_source`.
    #[error("key '{key}' not found in the document, available keys:\n{available}")]
    KeyNotFound { key: String, available: String },

    #[error("hit #{position} was requested but only {returned} hit(s) were returned")]
    HitNotReturned { position: usize, returned: usize },

    #[error("value of key '{key}' is not a string (found {found})")]
    FieldType { key: String, found: &'static str },
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Encoding(err.to_string())
    }
}
