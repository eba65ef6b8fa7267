use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use rankscope_core::MarketAnalysis;
use rankscope_engine::{
    analyze_performance, build_snapshot_rows, snapshot_chart, ChartConfig, DomainPerformance,
    EngineError,
};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct MarketQuery {
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyzeData {
    #[serde(flatten)]
    analysis: MarketAnalysis,
    domain_performance: HashMap<String, DomainPerformance>,
}

pub(super) async fn analyze_market(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MarketQuery>,
) -> Result<Json<ApiResponse<AnalyzeData>>, ApiError> {
    let (city, state_code) = require_location(&req_id.0, &query)?;

    let analysis = state
        .engine
        .analyze(&city, &state_code)
        .await
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;
    let domain_performance = analyze_performance(&analysis.search_results, &analysis.seo_metrics);

    Ok(Json(ApiResponse {
        data: AnalyzeData {
            analysis,
            domain_performance,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn seo_snapshot_chart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MarketQuery>,
) -> Result<Json<ApiResponse<ChartConfig>>, ApiError> {
    let (city, state_code) = require_location(&req_id.0, &query)?;

    let analysis = state
        .engine
        .analyze(&city, &state_code)
        .await
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;
    let config = snapshot_chart(&build_snapshot_rows(&analysis));

    Ok(Json(ApiResponse {
        data: config,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn require_location(request_id: &str, query: &MarketQuery) -> Result<(String, String), ApiError> {
    let city = query
        .city
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let state = query
        .state
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    match (city, state) {
        (Some(city), Some(state)) => Ok((city.to_owned(), state.to_owned())),
        _ => Err(ApiError::new(
            request_id.to_owned(),
            "validation_error",
            "query parameters 'city' and 'state' are required",
        )),
    }
}

fn map_engine_error(request_id: String, error: &EngineError) -> ApiError {
    match error {
        EngineError::NoResults { city, state } => ApiError::new(
            request_id,
            "not_found",
            format!("no search results found for {city}, {state}"),
        ),
        _ => {
            tracing::error!(error = %error, "market analysis failed");
            ApiError::new(request_id, "upstream_error", "market analysis failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_location_accepts_both_params() {
        let query = MarketQuery {
            city: Some("Austin".to_owned()),
            state: Some("TX".to_owned()),
        };
        let (city, state) = require_location("req-1", &query).unwrap();
        assert_eq!(city, "Austin");
        assert_eq!(state, "TX");
    }

    #[test]
    fn require_location_rejects_missing_city() {
        let query = MarketQuery {
            city: None,
            state: Some("TX".to_owned()),
        };
        let err = require_location("req-1", &query).unwrap_err();
        assert_eq!(err.error.code, "validation_error");
    }

    #[test]
    fn require_location_rejects_blank_state() {
        let query = MarketQuery {
            city: Some("Austin".to_owned()),
            state: Some("   ".to_owned()),
        };
        assert!(require_location("req-1", &query).is_err());
    }

    #[test]
    fn no_results_maps_to_not_found() {
        let err = map_engine_error(
            "req-1".to_owned(),
            &EngineError::NoResults {
                city: "Nowhere".to_owned(),
                state: "ZZ".to_owned(),
            },
        );
        assert_eq!(err.error.code, "not_found");
        assert!(err.error.message.contains("Nowhere"));
    }
}
