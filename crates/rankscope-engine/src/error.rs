use thiserror::Error;

/// Errors returned by the market analysis engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The search client could not be constructed.
    #[error("search client error: {0}")]
    Search(#[from] rankscope_serper::SerperError),

    /// The SEO metrics client could not be constructed.
    #[error("SEO metrics client error: {0}")]
    Metrics(#[from] rankscope_semrush::SemrushError),

    /// Configuration (e.g. the iBuyer list file) failed to load.
    #[error("configuration error: {0}")]
    Config(#[from] rankscope_core::ConfigError),

    /// Every search term came back empty for the requested market.
    #[error("no search results found for {city}, {state}")]
    NoResults { city: String, state: String },
}
