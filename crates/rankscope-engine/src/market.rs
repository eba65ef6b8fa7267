//! Orchestration of a full market analysis: search, metrics join, summary.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;

use rankscope_core::{
    deduplicate_domains, load_ibuyers, AppConfig, DomainAnalysis, IbuyerList, MarketAnalysis,
    MarketSummary, SearchResult, SeoMetrics,
};
use rankscope_semrush::SemrushClient;
use rankscope_serper::SerperClient;

use crate::chart::{snapshot_chart, ChartConfig};
use crate::error::EngineError;
use crate::rankings::{analyze_performance, analyze_rankings, DomainPerformance};
use crate::snapshot::build_snapshot_rows;

const SUMMARY_TOP_DOMAINS: usize = 10;
const SUMMARY_TOP_PERFORMERS: usize = 5;

/// Coordinates the search and SEO clients into one per-market analysis.
pub struct MarketEngine {
    search: SerperClient,
    seo: SemrushClient,
    ibuyers: IbuyerList,
    inter_request_delay: Duration,
}

impl MarketEngine {
    #[must_use]
    pub fn new(
        search: SerperClient,
        seo: SemrushClient,
        ibuyers: IbuyerList,
        inter_request_delay: Duration,
    ) -> Self {
        Self {
            search,
            seo,
            ibuyers,
            inter_request_delay,
        }
    }

    /// Builds production clients from application configuration. The iBuyer
    /// list comes from `config.ibuyers_path` when set, otherwise the
    /// built-in list.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if a client cannot be constructed or the
    /// iBuyer file fails to load.
    pub fn from_config(config: &AppConfig) -> Result<Self, EngineError> {
        let search = SerperClient::new(&config.serper_api_key, config.request_timeout_secs)?
            .with_retry_policy(config.serper_max_retries, config.serper_retry_backoff_base_ms);
        let seo = SemrushClient::new(&config.semrush_api_key, config.request_timeout_secs)?
            .with_cache_ttl(Duration::from_secs(config.semrush_cache_ttl_secs))
            .with_max_concurrency(config.semrush_max_concurrency);
        let ibuyers = match &config.ibuyers_path {
            Some(path) => load_ibuyers(path)?,
            None => IbuyerList::builtin(),
        };
        Ok(Self::new(
            search,
            seo,
            ibuyers,
            Duration::from_millis(config.search_inter_request_delay_ms),
        ))
    }

    /// Runs a complete market analysis for a city/state: all search terms,
    /// SEO metrics for every domain found, per-domain ranking analysis, and
    /// the summary block.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoResults`] when every search term came back
    /// empty. Individual term or metrics failures degrade to partial data
    /// inside the clients and do not fail the analysis.
    pub async fn analyze(&self, city: &str, state: &str) -> Result<MarketAnalysis, EngineError> {
        tracing::info!(city, state, "starting market analysis");

        let search_results = self
            .search
            .search_all_terms(city, state, self.inter_request_delay)
            .await;
        if search_results.is_empty() {
            return Err(EngineError::NoResults {
                city: city.to_owned(),
                state: state.to_owned(),
            });
        }

        let unique_domains = deduplicate_domains(
            search_results
                .values()
                .flatten()
                .map(|r| r.domain.clone()),
        );
        tracing::info!(domains = unique_domains.len(), "found unique domains");

        let seo_metrics = self.seo.get_bulk_metrics(&unique_domains).await;
        let domain_analysis = analyze_rankings(&search_results, &seo_metrics, &self.ibuyers);
        let performance = analyze_performance(&search_results, &seo_metrics);
        let summary = build_summary(&search_results, &seo_metrics, &domain_analysis, &performance);

        tracing::info!(city, state, "market analysis completed");
        Ok(MarketAnalysis {
            city: city.to_owned(),
            state: state.to_owned(),
            timestamp: Utc::now(),
            search_results,
            seo_metrics,
            domain_analysis,
            summary,
        })
    }

    /// Runs an analysis and reshapes it into the dual-axis snapshot chart
    /// configuration.
    ///
    /// # Errors
    ///
    /// Same conditions as [`MarketEngine::analyze`].
    pub async fn snapshot_chart(&self, city: &str, state: &str) -> Result<ChartConfig, EngineError> {
        let analysis = self.analyze(city, state).await?;
        Ok(snapshot_chart(&build_snapshot_rows(&analysis)))
    }
}

fn build_summary(
    search_results: &HashMap<String, Vec<SearchResult>>,
    seo_metrics: &HashMap<String, SeoMetrics>,
    domain_analysis: &HashMap<String, DomainAnalysis>,
    performance: &HashMap<String, DomainPerformance>,
) -> MarketSummary {
    let total_results = search_results.values().map(Vec::len).sum();
    let unique_domains = domain_analysis.len();
    let ibuyer_count = domain_analysis.values().filter(|d| d.is_ibuyer).count();
    let investor_count = unique_domains - ibuyer_count;
    #[allow(clippy::cast_precision_loss)]
    let ibuyer_ratio = if unique_domains == 0 {
        0.0
    } else {
        ibuyer_count as f64 / unique_domains as f64
    };

    let (avg_authority_score, avg_backlinks) = if seo_metrics.is_empty() {
        (0.0, 0.0)
    } else {
        #[allow(clippy::cast_precision_loss)]
        let count = seo_metrics.len() as f64;
        #[allow(clippy::cast_precision_loss)]
        let backlinks_sum = seo_metrics.values().map(|m| m.backlink_count as f64).sum::<f64>();
        (
            seo_metrics.values().map(|m| m.authority_score).sum::<f64>() / count,
            backlinks_sum / count,
        )
    };

    let mut ordered: Vec<&DomainAnalysis> = domain_analysis.values().collect();
    ordered.sort_by(|a, b| {
        a.best_rank
            .cmp(&b.best_rank)
            .then_with(|| b.authority_score.total_cmp(&a.authority_score))
    });
    let top_domains = ordered
        .into_iter()
        .take(SUMMARY_TOP_DOMAINS)
        .map(|d| d.domain.clone())
        .collect();

    // Tie-break by name so map iteration order cannot leak into the output.
    let mut by_visibility: Vec<(&String, &DomainPerformance)> = performance.iter().collect();
    by_visibility.sort_by(|(a_domain, a), (b_domain, b)| {
        b.visibility_score
            .total_cmp(&a.visibility_score)
            .then_with(|| a_domain.cmp(b_domain))
    });
    let top_performers = by_visibility
        .into_iter()
        .take(SUMMARY_TOP_PERFORMERS)
        .map(|(domain, _)| domain.clone())
        .collect();

    MarketSummary {
        total_results,
        unique_domains,
        ibuyer_count,
        investor_count,
        ibuyer_ratio,
        avg_authority_score,
        avg_backlinks,
        top_domains,
        top_performers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(domain: &str, rank: u32) -> SearchResult {
        SearchResult {
            domain: domain.to_owned(),
            rank,
            url: format!("https://{domain}/"),
            title: domain.to_owned(),
        }
    }

    fn analysis_entry(domain: &str, best_rank: u32, authority: f64, ibuyer: bool) -> DomainAnalysis {
        DomainAnalysis {
            domain: domain.to_owned(),
            best_rank,
            appearances: 1,
            average_rank: f64::from(best_rank),
            terms_found: vec!["we buy houses".to_owned()],
            positions: HashMap::new(),
            authority_score: authority,
            backlink_count: 0,
            referring_domains: 0,
            is_ibuyer: ibuyer,
        }
    }

    #[test]
    fn summary_orders_top_domains_by_best_rank_then_authority() {
        let mut search_results = HashMap::new();
        search_results.insert(
            "we buy houses".to_owned(),
            vec![result("a.com", 1), result("b.com", 1), result("c.com", 2)],
        );
        let mut domain_analysis = HashMap::new();
        domain_analysis.insert("a.com".to_owned(), analysis_entry("a.com", 1, 30.0, false));
        domain_analysis.insert("b.com".to_owned(), analysis_entry("b.com", 1, 80.0, true));
        domain_analysis.insert("c.com".to_owned(), analysis_entry("c.com", 2, 99.0, false));

        let summary = build_summary(
            &search_results,
            &HashMap::new(),
            &domain_analysis,
            &HashMap::new(),
        );
        assert_eq!(summary.top_domains, vec!["b.com", "a.com", "c.com"]);
        assert_eq!(summary.total_results, 3);
        assert_eq!(summary.unique_domains, 3);
        assert_eq!(summary.ibuyer_count, 1);
        assert_eq!(summary.investor_count, 2);
        assert!((summary.ibuyer_ratio - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn summary_of_empty_input_is_all_zeroes() {
        let summary = build_summary(
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
        );
        assert_eq!(summary.total_results, 0);
        assert_eq!(summary.unique_domains, 0);
        assert_eq!(summary.investor_count, 0);
        assert!((summary.ibuyer_ratio - 0.0).abs() < f64::EPSILON);
        assert!((summary.avg_authority_score - 0.0).abs() < f64::EPSILON);
        assert!(summary.top_domains.is_empty());
        assert!(summary.top_performers.is_empty());
    }

    #[test]
    fn summary_orders_top_performers_by_visibility() {
        let mut search_results = HashMap::new();
        search_results.insert(
            "we buy houses".to_owned(),
            vec![result("a.com", 1), result("b.com", 2)],
        );
        let mut seo_metrics = HashMap::new();
        seo_metrics.insert(
            "b.com".to_owned(),
            SeoMetrics {
                domain: "b.com".to_owned(),
                authority_score: 90.0,
                backlink_count: 100,
                referring_domains: 10,
            },
        );
        // a.com ranks first but has no authority (visibility 0), while
        // b.com scores 9 * 1.0 * 0.9 = 8.1.
        let performance = analyze_performance(&search_results, &seo_metrics);
        let summary = build_summary(
            &search_results,
            &seo_metrics,
            &HashMap::new(),
            &performance,
        );
        assert_eq!(summary.top_performers, vec!["b.com", "a.com"]);
    }

    #[test]
    fn summary_averages_metrics() {
        let mut seo_metrics = HashMap::new();
        for (domain, authority, backlinks) in [("a.com", 40.0, 100), ("b.com", 60.0, 300)] {
            seo_metrics.insert(
                domain.to_owned(),
                SeoMetrics {
                    domain: domain.to_owned(),
                    authority_score: authority,
                    backlink_count: backlinks,
                    referring_domains: 0,
                },
            );
        }
        let summary = build_summary(&HashMap::new(), &seo_metrics, &HashMap::new(), &HashMap::new());
        assert!((summary.avg_authority_score - 50.0).abs() < f64::EPSILON);
        assert!((summary.avg_backlinks - 200.0).abs() < f64::EPSILON);
    }
}
