use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use super::{ActionContext, TemplateAction, parse_input};
use crate::core::error::SpaceliftError;
use crate::core::spacelift::SpaceliftService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerRunInput {
    stack_id: String,
}

/// The `spacelift:trigger-run` action kicks off a run for an existing
/// stack as part of a provisioning pipeline.
pub struct TriggerRunAction {
    service: Arc<SpaceliftService>,
}

impl TriggerRunAction {
    pub fn new(service: Arc<SpaceliftService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TemplateAction for TriggerRunAction {
    fn id(&self) -> &'static str {
        "spacelift:trigger-run"
    }

    fn description(&self) -> &'static str {
        "Triggers a run for a Spacelift stack"
    }

    async fn run(&self, ctx: &mut ActionContext, input: Value) -> Result<(), SpaceliftError> {
        let input: TriggerRunInput = parse_input(input)?;

        if ctx.dry_run {
            info!("DRY RUN: would trigger run for stack {}", input.stack_id);
            info!("DRY RUN: using Spacelift endpoint {}", self.service.api_url());
            return Ok(());
        }

        info!("Triggering run for Spacelift stack {}", input.stack_id);
        let result = match self.service.trigger_run(&input.stack_id).await {
            Ok(result) => result,
            Err(e) => {
                error!("Failed to trigger run for stack {}: {}", input.stack_id, e);
                return Err(e);
            }
        };

        info!(
            "Triggered run {} for stack {} (state {})",
            result.id, input.stack_id, result.state
        );
        ctx.output("runId", result.id);
        ctx.output("runState", result.state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use serde_json::json;

    use super::*;
    use crate::core::spacelift::testing::{MockSpacelift, sample_stack};

    #[tokio::test]
    async fn dry_run_makes_no_network_calls_and_no_outputs() {
        let mock = MockSpacelift::start(vec![sample_stack("vpc", "FINISHED")]).await;
        let action = TriggerRunAction::new(Arc::new(SpaceliftService::new(&mock.config())));

        let mut ctx = ActionContext::new(true);
        action
            .run(&mut ctx, json!({ "stackId": "vpc" }))
            .await
            .expect("dry run succeeds");

        assert!(ctx.outputs().is_empty());
        assert_eq!(mock.exchanges.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn real_run_produces_named_outputs() {
        let mock = MockSpacelift::start(vec![sample_stack("vpc", "FINISHED")]).await;
        let action = TriggerRunAction::new(Arc::new(SpaceliftService::new(&mock.config())));

        let mut ctx = ActionContext::new(false);
        action
            .run(&mut ctx, json!({ "stackId": "vpc" }))
            .await
            .expect("run succeeds");

        assert_eq!(ctx.outputs().get("runId").map(String::as_str), Some("run-vpc"));
        assert_eq!(
            ctx.outputs().get("runState").map(String::as_str),
            Some("PREPARING")
        );
    }

    #[tokio::test]
    async fn missing_stack_id_fails_input_validation() {
        let mock = MockSpacelift::start(vec![]).await;
        let action = TriggerRunAction::new(Arc::new(SpaceliftService::new(&mock.config())));

        let mut ctx = ActionContext::new(false);
        let err = action
            .run(&mut ctx, json!({}))
            .await
            .expect_err("missing input should fail");
        match err {
            SpaceliftError::Validation { what, .. } => assert_eq!(what, "action input"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
