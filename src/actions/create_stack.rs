use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info};

use super::{ActionContext, TemplateAction, parse_input};
use crate::core::error::SpaceliftError;
use crate::core::spacelift::SpaceliftService;
use crate::core::spacelift::types::StackDraft;

/// The `spacelift:create-stack` action creates a stack as part of a
/// provisioning pipeline. The draft shape doubles as the action input.
pub struct CreateStackAction {
    service: Arc<SpaceliftService>,
}

impl CreateStackAction {
    pub fn new(service: Arc<SpaceliftService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TemplateAction for CreateStackAction {
    fn id(&self) -> &'static str {
        "spacelift:create-stack"
    }

    fn description(&self) -> &'static str {
        "Creates a new Spacelift stack"
    }

    async fn run(&self, ctx: &mut ActionContext, input: Value) -> Result<(), SpaceliftError> {
        let draft: StackDraft = parse_input(input)?;

        if ctx.dry_run {
            info!(
                "DRY RUN: would create stack '{}' in space {}",
                draft.name, draft.space_id
            );
            info!(
                "DRY RUN: repository {}, branch {}",
                draft.repository, draft.branch
            );
            info!("DRY RUN: using Spacelift endpoint {}", self.service.api_url());
            return Ok(());
        }

        info!("Creating Spacelift stack {}", draft.name);
        let stack = match self.service.create_stack(&draft).await {
            Ok(stack) => stack,
            Err(e) => {
                error!("Failed to create stack '{}': {}", draft.name, e);
                return Err(e);
            }
        };

        info!(
            "Created stack '{}' with id {} in space {} ({})",
            stack.name, stack.id, stack.space_details.name, stack.space_details.id
        );
        ctx.output("stackId", stack.id);
        ctx.output("stackName", stack.name);
        ctx.output("stackState", stack.state.as_str());
        ctx.output("spaceId", stack.space_details.id);
        ctx.output("spaceName", stack.space_details.name);
        Ok(())
    }
}
