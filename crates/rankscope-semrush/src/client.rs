//! HTTP client for the SEMrush backlinks analytics API.
//!
//! SEMrush answers `GET /analytics/v1/` with semicolon-separated CSV (a
//! header line and one data row when `display_limit=1`), or an
//! `ERROR nn :: message` body on application-level failure. This client
//! parses that wire format into [`rankscope_core::SeoMetrics`], caches
//! results per domain, and offers a concurrency-limited bulk fetch.

use std::collections::HashMap;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::{Client, Url};

use rankscope_core::SeoMetrics;

use crate::cache::MetricsCache;
use crate::error::SemrushError;

const DEFAULT_BASE_URL: &str = "https://api.semrush.com";
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Client for the SEMrush backlinks analytics API.
pub struct SemrushClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    cache: MetricsCache,
    max_concurrency: usize,
}

impl SemrushClient {
    /// Creates a new client pointed at the production SEMrush API.
    ///
    /// # Errors
    ///
    /// Returns [`SemrushError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, SemrushError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with
    /// wiremock). The `/analytics/v1/` path is appended here.
    ///
    /// # Errors
    ///
    /// Returns [`SemrushError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SemrushError::ApiError`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SemrushError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("rankscope/0.1 (market-seo)")
            .build()?;

        let normalised = format!("{}/analytics/v1/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .map_err(|e| SemrushError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            cache: MetricsCache::new(DEFAULT_CACHE_TTL),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        })
    }

    /// Overrides how long per-domain metrics are cached (default 24 h).
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = MetricsCache::new(ttl);
        self
    }

    /// Overrides the bulk-fetch concurrency limit (default 5).
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Fetches the backlinks overview for a single base domain.
    ///
    /// Cached results are returned without touching the network.
    ///
    /// # Errors
    ///
    /// - [`SemrushError::Http`] on network failure or non-2xx HTTP status.
    /// - [`SemrushError::ApiError`] if SEMrush returns an `ERROR` body.
    /// - [`SemrushError::Parse`] if the CSV payload is malformed.
    pub async fn get_domain_metrics(&self, domain: &str) -> Result<SeoMetrics, SemrushError> {
        if let Some(cached) = self.cache.get(domain).await {
            tracing::debug!(domain, "SEO metrics cache hit");
            return Ok(cached);
        }

        let url = self.build_url(domain);
        tracing::debug!(domain, "requesting SEMrush backlinks overview");
        // The key rides in the query string; strip the URL from errors so
        // rendering them never exposes it.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SemrushError::Http(e.without_url()))?;
        let response = response
            .error_for_status()
            .map_err(|e| SemrushError::Http(e.without_url()))?;
        let body = response
            .text()
            .await
            .map_err(|e| SemrushError::Http(e.without_url()))?;

        let metrics = parse_overview_csv(&body, domain)?;
        self.cache.insert(domain.to_owned(), metrics.clone()).await;
        Ok(metrics)
    }

    /// Fetches metrics for many domains with bounded concurrency.
    ///
    /// Per-domain failures are logged and that domain is left out of the
    /// returned map; a partial map is the expected outcome when SEMrush has
    /// no data for some competitors.
    pub async fn get_bulk_metrics(&self, domains: &[String]) -> HashMap<String, SeoMetrics> {
        let outcomes: Vec<(String, Result<SeoMetrics, SemrushError>)> =
            stream::iter(domains.iter().cloned())
                .map(|domain| async move {
                    let result = self.get_domain_metrics(&domain).await;
                    (domain, result)
                })
                .buffer_unordered(self.max_concurrency)
                .collect()
                .await;

        let mut metrics = HashMap::new();
        for (domain, outcome) in outcomes {
            match outcome {
                Ok(m) => {
                    metrics.insert(domain, m);
                }
                Err(err) => {
                    tracing::warn!(domain, error = %err, "failed to fetch SEO metrics");
                }
            }
        }
        tracing::info!(
            fetched = metrics.len(),
            requested = domains.len(),
            "completed bulk SEO metrics fetch"
        );
        metrics
    }

    /// Empties the metrics cache.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Builds the backlinks-overview request URL with percent-encoded query
    /// parameters.
    fn build_url(&self, domain: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            pairs.append_pair("type", "backlinks_overview");
            pairs.append_pair("target", domain);
            pairs.append_pair("target_type", "root_domain");
            pairs.append_pair("display_date", "latest");
            pairs.append_pair("export_columns", "target,ascore,total,domains_num");
            pairs.append_pair("display_limit", "1");
            pairs.append_pair("database", "us");
        }
        url
    }
}

/// Parses a semicolon-CSV backlinks overview: header line, then one data
/// row `target;ascore;total;domains_num`. The literal `none` (or an empty
/// field) reads as zero.
fn parse_overview_csv(body: &str, domain: &str) -> Result<SeoMetrics, SemrushError> {
    let trimmed = body.trim();
    if trimmed.starts_with("ERROR") {
        return Err(SemrushError::ApiError(trimmed.to_owned()));
    }

    let mut lines = trimmed.lines();
    let _header = lines.next().ok_or_else(|| SemrushError::Parse {
        domain: domain.to_owned(),
        reason: "empty response body".to_owned(),
    })?;
    let row = lines.next().ok_or_else(|| SemrushError::Parse {
        domain: domain.to_owned(),
        reason: "missing data row".to_owned(),
    })?;

    let fields: Vec<&str> = row.split(';').collect();
    if fields.len() < 4 {
        return Err(SemrushError::Parse {
            domain: domain.to_owned(),
            reason: format!("expected 4 columns, got {}", fields.len()),
        });
    }

    Ok(SeoMetrics {
        domain: domain.to_owned(),
        authority_score: parse_numeric_field(fields[1], "ascore", domain)?,
        backlink_count: parse_count_field(fields[2], "total", domain)?,
        referring_domains: parse_count_field(fields[3], "domains_num", domain)?,
    })
}

fn parse_numeric_field(raw: &str, column: &str, domain: &str) -> Result<f64, SemrushError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "none" {
        return Ok(0.0);
    }
    raw.parse::<f64>().map_err(|e| SemrushError::Parse {
        domain: domain.to_owned(),
        reason: format!("invalid {column} value '{raw}': {e}"),
    })
}

fn parse_count_field(raw: &str, column: &str, domain: &str) -> Result<u64, SemrushError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "none" {
        return Ok(0);
    }
    raw.parse::<u64>().map_err(|e| SemrushError::Parse {
        domain: domain.to_owned(),
        reason: format!("invalid {column} value '{raw}': {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_constructs_correct_query_string() {
        let client = SemrushClient::with_base_url("test-key", 30, "https://api.semrush.com")
            .expect("client construction should not fail");
        let url = client.build_url("opendoor.com");
        assert_eq!(
            url.as_str(),
            "https://api.semrush.com/analytics/v1/?key=test-key&type=backlinks_overview\
             &target=opendoor.com&target_type=root_domain&display_date=latest\
             &export_columns=target%2Cascore%2Ctotal%2Cdomains_num&display_limit=1&database=us"
        );
    }

    #[test]
    fn parse_overview_csv_reads_all_columns() {
        let body = "target;ascore;total;domains_num\nopendoor.com;71;1523400;8210\n";
        let metrics = parse_overview_csv(body, "opendoor.com").unwrap();
        assert!((metrics.authority_score - 71.0).abs() < f64::EPSILON);
        assert_eq!(metrics.backlink_count, 1_523_400);
        assert_eq!(metrics.referring_domains, 8210);
    }

    #[test]
    fn parse_overview_csv_treats_none_as_zero() {
        let body = "target;ascore;total;domains_num\ntiny.com;none;none;none\n";
        let metrics = parse_overview_csv(body, "tiny.com").unwrap();
        assert!((metrics.authority_score - 0.0).abs() < f64::EPSILON);
        assert_eq!(metrics.backlink_count, 0);
        assert_eq!(metrics.referring_domains, 0);
    }

    #[test]
    fn parse_overview_csv_surfaces_api_error_body() {
        let body = "ERROR 50 :: NOTHING FOUND";
        let result = parse_overview_csv(body, "unknown.com");
        assert!(matches!(result, Err(SemrushError::ApiError(_))));
    }

    #[test]
    fn parse_overview_csv_rejects_missing_data_row() {
        let body = "target;ascore;total;domains_num\n";
        let result = parse_overview_csv(body, "a.com");
        assert!(
            matches!(result, Err(SemrushError::Parse { ref reason, .. }) if reason.contains("missing data row"))
        );
    }

    #[test]
    fn parse_overview_csv_rejects_short_row() {
        let body = "target;ascore\na.com;50\n";
        let result = parse_overview_csv(body, "a.com");
        assert!(matches!(result, Err(SemrushError::Parse { .. })));
    }
}
