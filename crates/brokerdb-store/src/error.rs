use thiserror::Error;

/// Postgres SQLSTATE for `unique_violation`, passed through by the REST layer.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Errors returned by a [`CatalogStore`](crate::CatalogStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-2xx status and an error envelope.
    #[error("store API error (HTTP {status}{}): {message}", code_suffix(.code))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A query that must touch at most one row returned a different count.
    #[error("expected at most one row for {context}, got {count}")]
    UnexpectedRowCount { context: String, count: usize },

    #[error("invalid store URL '{url}': {reason}")]
    InvalidStoreUrl { url: String, reason: String },
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(", code {c}"))
        .unwrap_or_default()
}

impl StoreError {
    /// `true` when the store rejected a write because the row already exists.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::Api { code: Some(code), .. } if code == UNIQUE_VIOLATION)
    }
}
