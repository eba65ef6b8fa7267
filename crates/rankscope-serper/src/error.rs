use thiserror::Error;

/// Errors returned by the Serper.dev API client.
#[derive(Debug, Error)]
pub enum SerperError {
    /// Network or TLS failure from the underlying HTTP client, or a non-2xx
    /// HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Client-side misuse, e.g. an invalid base URL.
    #[error("Serper API error: {0}")]
    ApiError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
