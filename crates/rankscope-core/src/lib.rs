pub mod app_config;
pub mod config;
pub mod domains;
pub mod ibuyers;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use domains::{deduplicate_domains, extract_base_domain};
pub use ibuyers::{load_ibuyers, IbuyerList};
pub use types::{DomainAnalysis, MarketAnalysis, MarketSummary, SearchResult, SeoMetrics};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read ibuyers file {path}: {source}")]
    IbuyersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse ibuyers file: {0}")]
    IbuyersFileParse(#[from] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
