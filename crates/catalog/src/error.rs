use thiserror::Error;

/// Errors surfaced by catalog clients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Client configuration is unusable (missing credentials, bad base URL).
    #[error("invalid catalog config: {0}")]
    InvalidConfig(String),
    /// The catalog answered with a non-success status.
    #[error("catalog returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// The request never produced a response (connect failure, timeout).
    #[error("catalog request failed: {0}")]
    Transport(String),
    /// The response body could not be decoded.
    #[error("invalid catalog response: {0}")]
    Decode(String),
    /// No record with this id.
    #[error("catalog record not found: {0}")]
    NotFound(String),
    #[error("circuit breaker open for catalog '{0}'")]
    CircuitOpen(String),
    #[error("rate limit exceeded for catalog '{0}'")]
    RateLimited(String),
}

impl CatalogError {
    /// Transient failures worth another attempt: transport errors, request
    /// timeouts, throttling and server-side errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Transport(_) => true,
            CatalogError::Http { status, .. } => matches!(status, 408 | 429 | 500..=599),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}
