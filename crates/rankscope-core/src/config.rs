use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let serper_api_key = require("SERPER_API_KEY")?;
    let semrush_api_key = require("SEMRUSH_API_KEY")?;

    let env = parse_environment(&or_default("RANKSCOPE_ENV", "development"));

    let bind_addr = parse_addr("RANKSCOPE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("RANKSCOPE_LOG_LEVEL", "info");
    let ibuyers_path = lookup("RANKSCOPE_IBUYERS_PATH").ok().map(PathBuf::from);

    let request_timeout_secs = parse_u64("RANKSCOPE_REQUEST_TIMEOUT_SECS", "30")?;
    let search_inter_request_delay_ms =
        parse_u64("RANKSCOPE_SEARCH_INTER_REQUEST_DELAY_MS", "1000")?;
    let serper_max_retries = parse_u32("RANKSCOPE_SERPER_MAX_RETRIES", "3")?;
    let serper_retry_backoff_base_ms = parse_u64("RANKSCOPE_SERPER_RETRY_BACKOFF_BASE_MS", "1000")?;
    let semrush_max_concurrency = parse_usize("RANKSCOPE_SEMRUSH_MAX_CONCURRENCY", "5")?;
    let semrush_cache_ttl_secs = parse_u64("RANKSCOPE_SEMRUSH_CACHE_TTL_SECS", "86400")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        serper_api_key,
        semrush_api_key,
        ibuyers_path,
        request_timeout_secs,
        search_inter_request_delay_ms,
        serper_max_retries,
        serper_retry_backoff_base_ms,
        semrush_max_concurrency,
        semrush_cache_ttl_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
