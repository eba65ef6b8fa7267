//! HTTP client for the Serper.dev Google-search API.
//!
//! Wraps `reqwest` with API-key header handling, transient-error retry, and
//! conversion from raw organic results to [`rankscope_core::SearchResult`]
//! rows keyed by registrable base domain.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, Url};

use rankscope_core::domains::extract_base_domain;
use rankscope_core::SearchResult;

use crate::error::SerperError;
use crate::retry::retry_with_backoff;
use crate::types::{SearchPayload, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://google.serper.dev/search";

/// The fixed motivated-seller search terms the analysis runs over.
pub const SEARCH_TERMS: [&str; 3] = [
    "we buy houses",
    "sell my house fast",
    "sell my house fast for cash",
];

/// Client for the Serper.dev search API.
///
/// Use [`SerperClient::new`] for production or
/// [`SerperClient::with_base_url`] to point at a mock server in tests.
pub struct SerperClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl SerperClient {
    /// Creates a new client pointed at the production Serper API.
    ///
    /// # Errors
    ///
    /// Returns [`SerperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, SerperError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom search endpoint URL (for testing
    /// with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SerperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SerperError::ApiError`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SerperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("rankscope/0.1 (market-seo)")
            .build()?;

        let base_url = Url::parse(base_url)
            .map_err(|e| SerperError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: 3,
            backoff_base_ms: 1_000,
        })
    }

    /// Overrides the transient-error retry policy (defaults: 3 retries,
    /// 1 s base back-off).
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches organic results for one search term localized to a city and
    /// state, reduced to ranked base-domain rows.
    ///
    /// Ranks are assigned by position in the organic list (1-based). Entries
    /// whose link has no usable host are skipped, leaving a gap at that rank.
    ///
    /// # Errors
    ///
    /// - [`SerperError::Http`] on network failure or non-2xx HTTP status
    ///   (after transient-error retries are exhausted).
    /// - [`SerperError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search(
        &self,
        term: &str,
        city: &str,
        state: &str,
    ) -> Result<Vec<SearchResult>, SerperError> {
        let payload = SearchPayload::localized(term, city, state);
        tracing::debug!(term, city, state, "sending Serper search request");

        let response = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.send_search(&payload)
        })
        .await?;

        let mut results = Vec::new();
        for (idx, organic) in response.organic.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let rank = (idx + 1) as u32;
            if organic.link.is_empty() {
                continue;
            }
            let Some(domain) = extract_base_domain(&organic.link) else {
                tracing::debug!(link = %organic.link, "skipping result with unusable link");
                continue;
            };
            results.push(SearchResult {
                domain,
                rank,
                url: organic.link.clone(),
                title: organic.title.clone(),
            });
        }

        tracing::info!(term, count = results.len(), "retrieved search results");
        Ok(results)
    }

    /// Runs every term in [`SEARCH_TERMS`] for the given location,
    /// sequentially, sleeping `inter_request_delay` between requests.
    ///
    /// Failures and empty result lists for individual terms are logged and
    /// that term is omitted from the map; the remaining terms still run. An
    /// empty map is therefore possible and is not an error here.
    pub async fn search_all_terms(
        &self,
        city: &str,
        state: &str,
        inter_request_delay: Duration,
    ) -> HashMap<String, Vec<SearchResult>> {
        let mut results = HashMap::new();
        for (idx, term) in SEARCH_TERMS.iter().enumerate() {
            match self.search(term, city, state).await {
                Ok(term_results) if term_results.is_empty() => {
                    tracing::warn!(term, "no results found for term");
                }
                Ok(term_results) => {
                    results.insert((*term).to_owned(), term_results);
                }
                Err(err) => {
                    tracing::error!(term, error = %err, "search failed for term");
                }
            }
            if idx + 1 < SEARCH_TERMS.len() {
                tokio::time::sleep(inter_request_delay).await;
            }
        }
        tracing::info!(
            city,
            state,
            terms = results.len(),
            total_terms = SEARCH_TERMS.len(),
            "completed search term analysis"
        );
        results
    }

    /// Sends one POST request, asserts a 2xx HTTP status, and parses the
    /// response body.
    async fn send_search(&self, payload: &SearchPayload) -> Result<SearchResponse, SerperError> {
        let response = self
            .client
            .post(self.base_url.clone())
            .header("X-API-KEY", &self.api_key)
            .json(payload)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SerperError::Deserialize {
            context: format!("search(q={})", payload.q),
            source: e,
        })
    }
}
