use thiserror::Error;

/// Errors returned by the Qikink API client.
#[derive(Debug, Error)]
pub enum QikinkError {
    /// Network or TLS failure from the underlying HTTP client, or a
    /// non-2xx response status.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials are missing, or the token endpoint yielded no token.
    #[error("qikink authentication failed: {0}")]
    Auth(String),

    /// The catalog response did not resolve to an array of products.
    #[error("unexpected catalog shape: {0}")]
    Shape(String),

    /// The response body could not be parsed as JSON.
    #[error("json decode error for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
