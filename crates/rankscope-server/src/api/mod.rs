mod markets;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use rankscope_engine::MarketEngine;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MarketEngine>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/analyze", get(markets::analyze_market))
        .route(
            "/api/v1/charts/seo-snapshot",
            get(markets::seo_snapshot_chart),
        )
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData { status: "ok" },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use rankscope_core::IbuyerList;
    use rankscope_semrush::SemrushClient;
    use rankscope_serper::SerperClient;

    use super::*;

    // The health and validation paths never reach the upstream clients, so
    // unroutable base URLs are enough.
    fn test_app() -> Router {
        let search = SerperClient::with_base_url("test-key", 1, "http://127.0.0.1:9")
            .expect("serper client");
        let seo = SemrushClient::with_base_url("test-key", 1, "http://127.0.0.1:9")
            .expect("semrush client");
        let engine = MarketEngine::new(search, seo, IbuyerList::builtin(), Duration::ZERO);
        build_app(AppState {
            engine: Arc::new(engine),
        })
    }

    #[tokio::test]
    async fn health_returns_ok_envelope() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["meta"]["request_id"].as_str().is_some_and(|s| !s.is_empty()));
    }

    #[tokio::test]
    async fn request_id_header_is_passed_through() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-abc-123")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
            Some("req-abc-123")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["meta"]["request_id"], "req-abc-123");
    }

    #[tokio::test]
    async fn request_id_is_generated_when_absent() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        let id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("generated request id header");
        assert!(uuid::Uuid::parse_str(id).is_ok(), "not a UUID: {id}");
    }

    #[tokio::test]
    async fn analyze_without_params_is_validation_error() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/analyze")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[test]
    fn not_found_code_maps_to_404() {
        let err = ApiError::new("req-1", "not_found", "no results");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_error_code_maps_to_400() {
        let err = ApiError::new("req-1", "validation_error", "city is required");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_error_code_maps_to_502() {
        let err = ApiError::new("req-1", "upstream_error", "search API failed");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unknown_code_maps_to_500() {
        let err = ApiError::new("req-1", "mystery", "??");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
