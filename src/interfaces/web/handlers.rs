use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, info};

use super::AppState;
use crate::core::error::SpaceliftError;

pub async fn health() -> Json<serde_json::Value> {
    info!("PONG!");
    Json(json!({ "status": "ok" }))
}

pub async fn get_stacks(State(state): State<AppState>) -> Response {
    match state.service.get_stacks().await {
        Ok(stacks) => Json(stacks).into_response(),
        Err(e) => error_response("Error fetching stacks", &e),
    }
}

pub async fn trigger_run(
    Path(stack_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    match state.service.trigger_run(&stack_id).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(&format!("Error triggering run for stack {stack_id}"), &e),
    }
}

/// The single exhaustive mapping from the error taxonomy to HTTP
/// responses. Structured API errors surface the status embedded in the
/// remote response when it is an error status; everything else is a 500.
fn error_response(context: &str, err: &SpaceliftError) -> Response {
    error!("{}: {}", context, err);
    match err {
        SpaceliftError::Api {
            status,
            message,
            extensions,
        } => {
            let status = StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let mut body = json!({ "error": message });
            if let Some(details) = extensions {
                body["details"] = details.clone();
            }
            (status, Json(body)).into_response()
        }
        SpaceliftError::Authentication { .. }
        | SpaceliftError::Validation { .. }
        | SpaceliftError::Transport(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_with_success_status_is_not_echoed() {
        let err = SpaceliftError::Api {
            status: 200,
            message: "errors under a 2xx envelope".to_string(),
            extensions: None,
        };
        let response = error_response("test", &err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn api_error_keeps_embedded_error_status() {
        let err = SpaceliftError::Api {
            status: 401,
            message: "unauthorized".to_string(),
            extensions: None,
        };
        let response = error_response("test", &err);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
