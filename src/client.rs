use anyhow::{Result, bail};
use serde::de::DeserializeOwned;

use crate::core::spacelift::types::{RunTriggerResult, Stack};

/// Typed client for a running gateway's REST surface. The CLI uses it when
/// pointed at a daemon with `--api-url`; a portal backend would consume the
/// same endpoints.
pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn get_stacks(&self) -> Result<Vec<Stack>> {
        let response = self
            .http
            .get(format!("{}/stacks", self.base_url))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn trigger_run(&self, stack_id: &str) -> Result<RunTriggerResult> {
        let response = self
            .http
            .post(format!("{}/stacks/{}/trigger", self.base_url, stack_id))
            .send()
            .await?;
        decode(response).await
    }
}

/// Non-2xx responses carry `{error, details?}`; surface the message rather
/// than the bare status.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let message = body
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("gateway request failed");
        bail!("{} (HTTP {})", message, status.as_u16());
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;

    async fn serve_fake_gateway(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn get_stacks_decodes_collection() {
        let app = Router::new().route(
            "/stacks",
            get(|| async {
                Json(json!([{
                    "id": "s1",
                    "name": "n",
                    "labels": [],
                    "state": "FINISHED",
                    "branch": "main",
                    "spaceDetails": { "id": "sp1", "name": "Sp" }
                }]))
            }),
        );
        let base_url = serve_fake_gateway(app).await;

        let stacks = GatewayClient::new(&base_url)
            .get_stacks()
            .await
            .expect("stacks should decode");
        assert_eq!(stacks.len(), 1);
        assert_eq!(stacks[0].id, "s1");
    }

    #[tokio::test]
    async fn trigger_run_decodes_acknowledgement() {
        let app = Router::new().route(
            "/stacks/{stack_id}/trigger",
            post(|| async { Json(json!({ "id": "run-1", "state": "QUEUED" })) }),
        );
        let base_url = serve_fake_gateway(app).await;

        let result = GatewayClient::new(&base_url)
            .trigger_run("s1")
            .await
            .expect("trigger should decode");
        assert_eq!(result.id, "run-1");
        assert_eq!(result.state, "QUEUED");
    }

    #[tokio::test]
    async fn error_body_message_is_surfaced() {
        let app = Router::new().route(
            "/stacks",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "unauthorized" })),
                )
            }),
        );
        let base_url = serve_fake_gateway(app).await;

        let err = GatewayClient::new(&base_url)
            .get_stacks()
            .await
            .expect_err("error status should fail");
        assert!(err.to_string().contains("unauthorized"));
        assert!(err.to_string().contains("401"));
    }
}
