use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::SpaceliftError;

/// Lifecycle states Spacelift reports for a stack. The gateway never drives
/// this lifecycle; the value is display data owned by the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StackState {
    Applying,
    Confirmed,
    Destroying,
    Discarded,
    Failed,
    Finished,
    Initializing,
    None,
    Planning,
    Preparing,
    PreparingApply,
    PreparingReplan,
    ReplanRequested,
    Stopped,
    Unconfirmed,
}

impl StackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StackState::Applying => "APPLYING",
            StackState::Confirmed => "CONFIRMED",
            StackState::Destroying => "DESTROYING",
            StackState::Discarded => "DISCARDED",
            StackState::Failed => "FAILED",
            StackState::Finished => "FINISHED",
            StackState::Initializing => "INITIALIZING",
            StackState::None => "NONE",
            StackState::Planning => "PLANNING",
            StackState::Preparing => "PREPARING",
            StackState::PreparingApply => "PREPARING_APPLY",
            StackState::PreparingReplan => "PREPARING_REPLAN",
            StackState::ReplanRequested => "REPLAN_REQUESTED",
            StackState::Stopped => "STOPPED",
            StackState::Unconfirmed => "UNCONFIRMED",
        }
    }
}

impl std::fmt::Display for StackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceDetails {
    pub id: String,
    pub name: String,
}

/// A Spacelift stack as the portal sees it. Identity is `id`; everything
/// else is display data. JSON field names are the remote camelCase ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub state: StackState,
    pub branch: String,
    pub space_details: SpaceDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_root: Option<String>,
}

/// Acknowledgement of a triggered run. Run progress is not tracked beyond
/// this point, and run states are not the stack state enum, so `state`
/// stays a free string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTriggerResult {
    pub id: String,
    pub state: String,
}

/// Creation input for a stack: everything a `Stack` has except the
/// remote-assigned `id` and space name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub branch: String,
    pub space_id: String,
    pub repository: String,
    #[serde(default = "default_project_root")]
    pub project_root: String,
}

fn default_project_root() -> String {
    ".".to_string()
}

pub fn validate_stacks(raw: Value) -> Result<Vec<Stack>, SpaceliftError> {
    serde_json::from_value(raw).map_err(|e| SpaceliftError::Validation {
        what: "stacks data",
        detail: e.to_string(),
    })
}

pub fn validate_run_trigger_result(raw: Value) -> Result<RunTriggerResult, SpaceliftError> {
    serde_json::from_value(raw).map_err(|e| SpaceliftError::Validation {
        what: "run trigger result data",
        detail: e.to_string(),
    })
}

pub fn validate_stack(raw: Value) -> Result<Stack, SpaceliftError> {
    serde_json::from_value(raw).map_err(|e| SpaceliftError::Validation {
        what: "stack creation result data",
        detail: e.to_string(),
    })
}
