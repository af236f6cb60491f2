use thiserror::Error;

/// Failures talking to the media catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not configured: {0}")]
    NotConfigured(String),

    #[error("catalog request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("catalog returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures talking to the chat transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("chat transport request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("chat API error: {description}")]
    Api { code: Option<i64>, description: String },

    #[error("could not decode chat API response: {0}")]
    Decode(#[from] serde_json::Error),
}

// Bot API URLs embed the token, so it must never reach a log line
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Network(err.without_url())
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        // The api_key travels in the query string
        CatalogError::Network(err.without_url())
    }
}
