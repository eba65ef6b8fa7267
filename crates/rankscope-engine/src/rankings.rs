//! Per-domain ranking and visibility analysis across all search terms.

use std::collections::HashMap;

use serde::Serialize;

use rankscope_core::{DomainAnalysis, IbuyerList, SearchResult, SeoMetrics};

/// Derived visibility metrics for one domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainPerformance {
    /// Sum of `11 - rank` over all appearances; better ranks earn more.
    pub rank_points: u32,
    pub total_appearances: u32,
    pub average_position: f64,
    /// Fraction of search terms the domain appeared for.
    pub term_coverage: f64,
    pub authority_score: f64,
    pub backlink_strength: u64,
    /// `(rank_points / appearances) * term_coverage * (authority / 100)`.
    pub visibility_score: f64,
}

/// Aggregates rankings per domain across all terms, joining SEO metrics
/// (zero defaults when absent) and flagging known iBuyers.
#[must_use]
pub fn analyze_rankings(
    search_results: &HashMap<String, Vec<SearchResult>>,
    seo_metrics: &HashMap<String, SeoMetrics>,
    ibuyers: &IbuyerList,
) -> HashMap<String, DomainAnalysis> {
    let mut rankings: HashMap<String, DomainAnalysis> = HashMap::new();

    for (term, results) in search_results {
        for result in results {
            let entry = rankings
                .entry(result.domain.clone())
                .or_insert_with(|| {
                    let metrics = seo_metrics.get(&result.domain);
                    DomainAnalysis {
                        domain: result.domain.clone(),
                        best_rank: result.rank,
                        appearances: 0,
                        average_rank: 0.0,
                        terms_found: Vec::new(),
                        positions: HashMap::new(),
                        authority_score: metrics.map_or(0.0, |m| m.authority_score),
                        backlink_count: metrics.map_or(0, |m| m.backlink_count),
                        referring_domains: metrics.map_or(0, |m| m.referring_domains),
                        is_ibuyer: ibuyers.contains(&result.domain),
                    }
                });
            entry.best_rank = entry.best_rank.min(result.rank);
            entry.appearances += 1;
            entry.average_rank = (entry.average_rank * f64::from(entry.appearances - 1)
                + f64::from(result.rank))
                / f64::from(entry.appearances);
            if !entry.terms_found.contains(term) {
                entry.terms_found.push(term.clone());
            }
            entry.positions.insert(term.clone(), result.rank);
        }
    }

    rankings
}

/// Computes visibility metrics per domain.
///
/// Rank points reward page position (`11 - rank`, floored at zero for ranks
/// past 10); coverage is the share of terms the domain showed up for; the
/// visibility score multiplies average rank points, coverage, and authority
/// on a 0-1 scale.
#[must_use]
pub fn analyze_performance(
    search_results: &HashMap<String, Vec<SearchResult>>,
    seo_metrics: &HashMap<String, SeoMetrics>,
) -> HashMap<String, DomainPerformance> {
    let total_terms = search_results.len();
    let mut performance: HashMap<String, DomainPerformance> = HashMap::new();

    for results in search_results.values() {
        for result in results {
            let metrics = seo_metrics.get(&result.domain);
            let perf = performance
                .entry(result.domain.clone())
                .or_insert_with(|| DomainPerformance {
                    rank_points: 0,
                    total_appearances: 0,
                    average_position: 0.0,
                    term_coverage: 0.0,
                    authority_score: metrics.map_or(0.0, |m| m.authority_score),
                    backlink_strength: metrics.map_or(0, |m| m.backlink_count),
                    visibility_score: 0.0,
                });
            perf.total_appearances += 1;
            perf.rank_points += 11u32.saturating_sub(result.rank);
            perf.average_position = (perf.average_position
                * f64::from(perf.total_appearances - 1)
                + f64::from(result.rank))
                / f64::from(perf.total_appearances);
        }
    }

    for perf in performance.values_mut() {
        if total_terms > 0 {
            #[allow(clippy::cast_precision_loss)]
            let coverage = f64::from(perf.total_appearances) / total_terms as f64;
            perf.term_coverage = coverage;
        }
        perf.visibility_score = (f64::from(perf.rank_points)
            / f64::from(perf.total_appearances))
            * perf.term_coverage
            * (perf.authority_score / 100.0);
    }

    performance
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

    fn metrics(domain: &str, authority: f64, backlinks: u64) -> SeoMetrics {
        SeoMetrics {
            domain: domain.to_owned(),
            authority_score: authority,
            backlink_count: backlinks,
            referring_domains: 10,
        }
    }

    fn two_term_results() -> HashMap<String, Vec<SearchResult>> {
        let mut search_results = HashMap::new();
        search_results.insert(
            "we buy houses".to_owned(),
            vec![result("opendoor.com", 3), result("local.com", 1)],
        );
        search_results.insert(
            "sell my house fast".to_owned(),
            vec![result("opendoor.com", 1)],
        );
        search_results
    }

    #[test]
    fn rankings_track_best_rank_and_appearances() {
        let seo: HashMap<String, SeoMetrics> = HashMap::new();
        let rankings = analyze_rankings(&two_term_results(), &seo, &IbuyerList::builtin());

        let opendoor = &rankings["opendoor.com"];
        assert_eq!(opendoor.best_rank, 1);
        assert_eq!(opendoor.appearances, 2);
        assert!((opendoor.average_rank - 2.0).abs() < f64::EPSILON);
        assert_eq!(opendoor.terms_found.len(), 2);
        assert_eq!(opendoor.positions["we buy houses"], 3);
        assert_eq!(opendoor.positions["sell my house fast"], 1);
        assert!(opendoor.is_ibuyer);

        let local = &rankings["local.com"];
        assert_eq!(local.best_rank, 1);
        assert_eq!(local.appearances, 1);
        assert!(!local.is_ibuyer);
    }

    #[test]
    fn rankings_join_seo_metrics_with_zero_default() {
        let mut seo = HashMap::new();
        seo.insert(
            "opendoor.com".to_owned(),
            metrics("opendoor.com", 71.0, 1000),
        );
        let rankings = analyze_rankings(&two_term_results(), &seo, &IbuyerList::builtin());

        assert!((rankings["opendoor.com"].authority_score - 71.0).abs() < f64::EPSILON);
        assert_eq!(rankings["opendoor.com"].backlink_count, 1000);
        assert!((rankings["local.com"].authority_score - 0.0).abs() < f64::EPSILON);
        assert_eq!(rankings["local.com"].backlink_count, 0);
    }

    #[test]
    fn performance_computes_visibility_score() {
        let mut seo = HashMap::new();
        seo.insert("opendoor.com".to_owned(), metrics("opendoor.com", 50.0, 10));
        let performance = analyze_performance(&two_term_results(), &seo);

        let opendoor = &performance["opendoor.com"];
        // Ranks 3 and 1: (11-3) + (11-1) = 18 points over 2 appearances.
        assert_eq!(opendoor.rank_points, 18);
        assert_eq!(opendoor.total_appearances, 2);
        assert!((opendoor.average_position - 2.0).abs() < f64::EPSILON);
        assert!((opendoor.term_coverage - 1.0).abs() < f64::EPSILON);
        // (18 / 2) * 1.0 * 0.5 = 4.5
        assert!((opendoor.visibility_score - 4.5).abs() < 1e-9);
    }

    #[test]
    fn performance_rank_beyond_ten_earns_no_points() {
        let mut search_results = HashMap::new();
        search_results.insert("we buy houses".to_owned(), vec![result("deep.com", 14)]);
        let performance = analyze_performance(&search_results, &HashMap::new());
        assert_eq!(performance["deep.com"].rank_points, 0);
    }

    #[test]
    fn empty_input_yields_empty_maps() {
        let search_results = HashMap::new();
        let seo = HashMap::new();
        assert!(analyze_rankings(&search_results, &seo, &IbuyerList::builtin()).is_empty());
        assert!(analyze_performance(&search_results, &seo).is_empty());
    }
}
