//! Router assembly

use super::handlers::{self, ApiState};
use super::health;
use crate::config::ServerConfig;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Contract routes, relative to the API prefix
fn api_routes() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        // Token map
        .route("/token-map/generate", post(handlers::generate_token_map))
        .route("/token-map/customer/:customer_id", get(handlers::list_token_maps))
        .route(
            "/token-map/:id",
            get(handlers::get_token_map).put(handlers::update_token_map),
        )
        .route("/token-map/:id/export", get(handlers::export_token_map))
        // Solution
        .route("/solution/recommend", post(handlers::recommend_solution))
        .route("/solution/:id", get(handlers::get_solution))
        .route("/solution/:id/refine", post(handlers::refine_solution))
        .route("/solution/:id/history", get(handlers::solution_history))
        // Role-play
        .route("/role-play/start", post(handlers::start_session))
        .route("/role-play/sessions", get(handlers::list_sessions))
        .route("/role-play/:id", get(handlers::get_session))
        .route("/role-play/:id/respond", post(handlers::respond))
        .route("/role-play/:id/end", post(handlers::end_session))
}

/// Build the full router: contract under the API prefix, plus `/` and `/metrics`
pub fn build_router(state: ApiState, server: &ServerConfig) -> Router {
    let prefix = server.api_prefix.trim_end_matches('/');
    let api = if prefix.is_empty() {
        api_routes()
    } else {
        Router::new().nest(prefix, api_routes())
    };

    Router::new()
        .route("/", get(health::root))
        .route("/metrics", get(health::metrics))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(server.max_body_bytes)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockConfig;
    use crate::services::Services;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        build_router(
            ApiState {
                services: Services::mock(MockConfig::instant()),
            },
            &ServerConfig::default(),
        )
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn test_health_routes() {
        let (status, body) = get_json(router(), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (_, body) = get_json(router(), "/api/v1/health/ready").await;
        assert_eq!(body["checks"]["services"], "mock");

        let (_, body) = get_json(router(), "/api/v1/health/live").await;
        assert_eq!(body["status"], "alive");
    }

    #[tokio::test]
    async fn test_static_segments_win_over_ids() {
        let (status, body) = get_json(router(), "/api/v1/role-play/sessions").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_array());

        let (status, body) = get_json(router(), "/api/v1/token-map/customer/cust-5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["customer_id"], "cust-5");
    }

    #[tokio::test]
    async fn test_unknown_export_format_is_rejected() {
        let (status, body) = get_json(router(), "/api/v1/token-map/map-1/export?format=svg").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let response = router()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_requirements_are_rejected() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/solution/recommend")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"requirements": "  "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
