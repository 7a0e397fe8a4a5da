use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Method, Request, header},
    middleware,
    middleware::Next,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::{AppState, handlers};

fn build_cors() -> CorsLayer {
    // The gateway sits behind the portal's backend in production; the open
    // CORS policy only matters for portals developed against it locally.
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any)
}

pub fn build_api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/stacks", get(handlers::get_stacks))
        .route("/stacks/{stack_id}/trigger", post(handlers::trigger_run))
        .route("/logs", get(super::sse_logs_endpoint))
        .layer(middleware::from_fn(security_headers))
        .layer(build_cors())
        .with_state(state)
}

async fn security_headers(req: Request<Body>, next: Next) -> axum::response::Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    response
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use super::*;
    use crate::core::spacelift::SpaceliftService;
    use crate::core::spacelift::testing::{MockSpacelift, sample_stack};

    async fn app_against(mock: &MockSpacelift) -> Router {
        let (log_tx, _) = tokio::sync::broadcast::channel(16);
        let state = AppState {
            service: Arc::new(SpaceliftService::new(&mock.config())),
            log_tx,
        };
        build_api_router(state)
    }

    async fn request(
        app: Router,
        method: Method,
        path: &str,
    ) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("request should build");
        let resp = app.oneshot(req).await.expect("oneshot should succeed");
        let status = resp.status();
        let body_bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .expect("body should collect");
        let json = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::json!({}));
        (status, json)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let mock = MockSpacelift::start(vec![]).await;
        let app = app_against(&mock).await;
        let (status, json) = request(app, Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn stacks_returns_validated_collection() {
        let mock = MockSpacelift::start(vec![sample_stack("vpc", "FINISHED")]).await;
        let app = app_against(&mock).await;
        let (status, json) = request(app, Method::GET, "/stacks").await;
        assert_eq!(status, StatusCode::OK);
        let stacks = json.as_array().expect("body is an array");
        assert_eq!(stacks.len(), 1);
        assert_eq!(stacks[0]["id"], "vpc");
        assert_eq!(stacks[0]["spaceDetails"]["name"], "Platform");
    }

    #[tokio::test]
    async fn trigger_returns_run_acknowledgement() {
        let mock = MockSpacelift::start(vec![sample_stack("vpc", "FINISHED")]).await;
        let app = app_against(&mock).await;
        let (status, json) = request(app, Method::POST, "/stacks/vpc/trigger").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "run-vpc");
        assert_eq!(json["state"], "PREPARING");
    }

    #[tokio::test]
    async fn remote_error_status_is_propagated() {
        let mock = MockSpacelift::start(vec![]).await;
        let app = app_against(&mock).await;
        let (status, json) = request(app, Method::POST, "/stacks/ghost/trigger").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(
            json["error"]
                .as_str()
                .expect("error message present")
                .contains("ghost")
        );
        assert_eq!(json["details"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn validation_failure_maps_to_internal_error() {
        let mock = MockSpacelift::start(vec![sample_stack("vpc", "NOT_A_STATE")]).await;
        let app = app_against(&mock).await;
        let (status, json) = request(app, Method::GET, "/stacks").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            json["error"]
                .as_str()
                .expect("error message present")
                .contains("stacks data")
        );
    }

    #[tokio::test]
    async fn security_headers_present_on_responses() {
        let mock = MockSpacelift::start(vec![]).await;
        let app = app_against(&mock).await;
        let req = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .body(Body::empty())
            .expect("request should build");
        let resp = app.oneshot(req).await.expect("oneshot should succeed");
        assert_eq!(
            resp.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        assert_eq!(resp.headers().get("x-frame-options").unwrap(), "DENY");
    }

    #[tokio::test]
    async fn method_not_allowed_returns_405() {
        let mock = MockSpacelift::start(vec![]).await;
        let app = app_against(&mock).await;
        let (status, _) = request(app, Method::PUT, "/stacks").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
