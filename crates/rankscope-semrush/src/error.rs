use thiserror::Error;

/// Errors returned by the SEMrush analytics API client.
#[derive(Debug, Error)]
pub enum SemrushError {
    /// Network or TLS failure from the underlying HTTP client, or a non-2xx
    /// HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// SEMrush returned an `ERROR nn :: message` body instead of CSV data.
    #[error("SEMrush API error: {0}")]
    ApiError(String),

    /// The CSV response body could not be parsed into metrics.
    #[error("failed to parse SEMrush response for {domain}: {reason}")]
    Parse { domain: String, reason: String },
}
