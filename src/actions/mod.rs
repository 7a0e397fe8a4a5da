mod create_stack;
mod trigger_run;

pub use create_stack::CreateStackAction;
pub use trigger_run::TriggerRunAction;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::error::SpaceliftError;
use crate::core::spacelift::SpaceliftService;

/// Execution context handed to a workflow action: the dry-run flag plus
/// the named string outputs later pipeline steps consume.
pub struct ActionContext {
    pub dry_run: bool,
    outputs: BTreeMap<String, String>,
}

impl ActionContext {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            outputs: BTreeMap::new(),
        }
    }

    pub fn output(&mut self, key: &str, value: impl Into<String>) {
        self.outputs.insert(key.to_string(), value.into());
    }

    pub fn outputs(&self) -> &BTreeMap<String, String> {
        &self.outputs
    }
}

/// A template-engine step. Input arrives as declarative JSON; outputs are
/// named strings. Implementations log failures and re-raise them so the
/// hosting workflow aborts the step.
#[async_trait]
pub trait TemplateAction: Send + Sync {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    async fn run(&self, ctx: &mut ActionContext, input: Value) -> Result<(), SpaceliftError>;
}

pub fn builtin_actions(service: Arc<SpaceliftService>) -> Vec<Arc<dyn TemplateAction>> {
    vec![
        Arc::new(TriggerRunAction::new(service.clone())),
        Arc::new(CreateStackAction::new(service)),
    ]
}

pub(crate) fn parse_input<T: serde::de::DeserializeOwned>(
    input: Value,
) -> Result<T, SpaceliftError> {
    serde_json::from_value(input).map_err(|e| SpaceliftError::Validation {
        what: "action input",
        detail: e.to_string(),
    })
}
