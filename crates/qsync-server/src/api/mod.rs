mod sync;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use qsync_qikink::QikinkClient;
use qsync_store::ProductStore;

use crate::middleware::request_id;

/// Shared application state: the Qikink client and the store handle,
/// both constructed once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub qikink: QikinkClient,
    pub store: ProductStore,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/sync-qikink", post(sync::sync_qikink))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

/// Liveness probe: plain text, touches no dependency.
async fn root() -> &'static str {
    "qsync is running"
}

/// Readiness probe: pings the document store.
async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use qsync_core::QikinkSettings;
    use qsync_store::ServiceAccount;
    use tower::ServiceExt;

    // Unroutable store with aggressive timeouts so failure paths return
    // quickly instead of waiting out the driver's 30s server selection.
    const UNREACHABLE_MONGO: &str =
        "mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=200&connectTimeoutMS=200";

    async fn test_state(base_url: &str) -> AppState {
        let settings = QikinkSettings {
            client_id: Some("test-client".to_string()),
            client_secret: Some("test-secret".to_string()),
            token_url: format!("{base_url}/api/token"),
            products_url: format!("{base_url}/api/products"),
            token_timeout_secs: 5,
            products_timeout_secs: 5,
        };
        let qikink = QikinkClient::new(settings).expect("client");
        let account = ServiceAccount {
            uri: UNREACHABLE_MONGO.to_string(),
            database: "qsync_test".to_string(),
        };
        let store = ProductStore::connect(&account).await.expect("store");
        AppState { qikink, store }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json parse")
    }

    #[tokio::test]
    async fn root_returns_liveness_text() {
        let app = build_app(test_state("http://localhost:9").await);
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers().contains_key("x-request-id"),
            "request id header missing"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let body = String::from_utf8(bytes.to_vec()).expect("utf8 body");
        assert_eq!(body, "qsync is running");
    }

    #[tokio::test]
    async fn healthz_reports_degraded_when_store_is_unreachable() {
        let app = build_app(test_state("http://localhost:9").await);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["database"], "unavailable");
    }
}
