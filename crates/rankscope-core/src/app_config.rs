use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub serper_api_key: String,
    pub semrush_api_key: String,
    pub ibuyers_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub search_inter_request_delay_ms: u64,
    pub serper_max_retries: u32,
    pub serper_retry_backoff_base_ms: u64,
    pub semrush_max_concurrency: usize,
    pub semrush_cache_ttl_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("serper_api_key", &"[redacted]")
            .field("semrush_api_key", &"[redacted]")
            .field("ibuyers_path", &self.ibuyers_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field(
                "search_inter_request_delay_ms",
                &self.search_inter_request_delay_ms,
            )
            .field("serper_max_retries", &self.serper_max_retries)
            .field(
                "serper_retry_backoff_base_ms",
                &self.serper_retry_backoff_base_ms,
            )
            .field("semrush_max_concurrency", &self.semrush_max_concurrency)
            .field("semrush_cache_ttl_secs", &self.semrush_cache_ttl_secs)
            .finish()
    }
}
