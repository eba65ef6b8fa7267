//! Shared domain model for market analyses.
//!
//! These types are the boundary between the API clients, the analysis
//! engine, and the HTTP/CLI surfaces. Everything is transient: an analysis
//! is computed per request and serialized straight out.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single organic search result for a query, already reduced to its
/// registrable base domain.
///
/// `rank` is the 1-based results-page position. Result lists are stored in
/// the order the search API returned them, which is not guaranteed to be
/// rank-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub domain: String,
    pub rank: u32,
    pub url: String,
    pub title: String,
}

/// Backlink-profile metrics for a domain, as reported by the SEO API.
///
/// `authority_score` is on a 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoMetrics {
    pub domain: String,
    pub authority_score: f64,
    pub backlink_count: u64,
    pub referring_domains: u64,
}

/// Per-domain ranking analysis aggregated across all search terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainAnalysis {
    pub domain: String,
    /// Lowest (best) rank seen across all terms.
    pub best_rank: u32,
    /// Number of result-list entries this domain occupied.
    pub appearances: u32,
    pub average_rank: f64,
    /// Terms the domain appeared for, in first-seen order.
    pub terms_found: Vec<String>,
    /// Rank per term (last occurrence wins when a domain repeats in a list).
    pub positions: HashMap<String, u32>,
    pub authority_score: f64,
    pub backlink_count: u64,
    pub referring_domains: u64,
    pub is_ibuyer: bool,
}

/// Headline numbers for a market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub total_results: usize,
    pub unique_domains: usize,
    pub ibuyer_count: usize,
    /// Unique domains that are not known iBuyers.
    pub investor_count: usize,
    pub ibuyer_ratio: f64,
    pub avg_authority_score: f64,
    pub avg_backlinks: f64,
    /// Up to 10 domains ordered by best rank, ties broken by authority score.
    pub top_domains: Vec<String>,
    /// Up to 5 domains ordered by visibility score, best first.
    pub top_performers: Vec<String>,
}

/// Complete market analysis for one city/state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub city: String,
    pub state: String,
    pub timestamp: DateTime<Utc>,
    /// Search term → result list, in API order.
    pub search_results: HashMap<String, Vec<SearchResult>>,
    /// Base domain → SEO metrics. Domains the SEO API had no data for are
    /// simply absent; consumers default to zero.
    pub seo_metrics: HashMap<String, SeoMetrics>,
    pub domain_analysis: HashMap<String, DomainAnalysis>,
    pub summary: MarketSummary,
}

impl MarketAnalysis {
    /// Number of unique domains across all search terms.
    #[must_use]
    pub fn total_domains(&self) -> usize {
        let mut domains = HashSet::new();
        for results in self.search_results.values() {
            domains.extend(results.iter().map(|r| r.domain.as_str()));
        }
        domains.len()
    }

    /// Mean authority score across all domains with metrics, 0.0 when empty.
    #[must_use]
    pub fn average_authority_score(&self) -> f64 {
        if self.seo_metrics.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.seo_metrics.len() as f64;
        self.seo_metrics.values().map(|m| m.authority_score).sum::<f64>() / count
    }
}
