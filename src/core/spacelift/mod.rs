mod graphql;
pub mod types;

use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{error, info};

use crate::core::config::SpaceliftConfig;
use crate::core::error::SpaceliftError;
use types::{RunTriggerResult, Stack, StackDraft};

/// Fixed token lifetime. Spacelift JWTs live longer than this; the short
/// window keeps a cached token comfortably inside the real expiry.
const TOKEN_TTL: Duration = Duration::from_secs(60);

const TOKEN_EXCHANGE_MUTATION: &str = r#"
mutation GetSpaceliftToken($apiKey: ID!, $apiSecret: String!) {
  apiKeyUser(id: $apiKey, secret: $apiSecret) {
    id
    jwt
  }
}
"#;

const STACKS_QUERY: &str = r#"
query GetStacks {
  stacks {
    id
    name
    description
    labels
    state
    branch
    spaceDetails {
      id
      name
    }
    repository
    projectRoot
  }
}
"#;

const TRIGGER_RUN_MUTATION: &str = r#"
mutation TriggerRun($stackId: ID!) {
  runTrigger(stack: $stackId) {
    id
    state
  }
}
"#;

const CREATE_STACK_MUTATION: &str = r#"
mutation CreateStack($input: StackInput!, $manageState: Boolean!) {
  stackCreate(input: $input, manageState: $manageState) {
    id
    name
    description
    labels
    state
    branch
    spaceDetails {
      id
      name
    }
    repository
    projectRoot
  }
}
"#;

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Token-caching client for the Spacelift GraphQL API. One instance per
/// process/configuration; callers share it behind an `Arc`. The token slot
/// is locked across a refresh, so concurrent callers hitting an expired
/// token share a single in-flight exchange.
pub struct SpaceliftService {
    api_url: String,
    api_key: String,
    api_secret: String,
    http: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl SpaceliftService {
    pub fn new(config: &SpaceliftConfig) -> Self {
        Self {
            api_url: config.api_url(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            http: reqwest::Client::new(),
            token: Mutex::new(None),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the cached bearer token, exchanging the API key pair for a
    /// fresh one when the cache is empty or past its window.
    async fn token(&self) -> Result<String, SpaceliftError> {
        let mut slot = self.token.lock().await;

        if let Some(cached) = slot.as_ref() {
            if Instant::now() < cached.expires_at {
                info!("Using cached API token");
                return Ok(cached.value.clone());
            }
            info!("Cached API token expired, clearing cache");
        }

        // Every failure below leaves the slot empty so the next call
        // starts from a clean exchange.
        *slot = None;

        info!("Fetching new API token");
        let variables = json!({ "apiKey": self.api_key, "apiSecret": self.api_secret });
        let data = match graphql::execute(
            &self.http,
            &self.api_url,
            TOKEN_EXCHANGE_MUTATION,
            variables,
            None,
        )
        .await
        {
            Ok(data) => data,
            Err(e) => {
                error!("Error fetching JWT: {}", e);
                return Err(SpaceliftError::Authentication {
                    reason: exchange_reason(e),
                });
            }
        };

        let jwt = data
            .get("apiKeyUser")
            .and_then(|user| user.get("jwt"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let Some(value) = jwt else {
            error!("Token exchange response carried no jwt");
            return Err(SpaceliftError::Authentication {
                reason: "Unknown error".to_string(),
            });
        };

        *slot = Some(CachedToken {
            value: value.clone(),
            expires_at: Instant::now() + TOKEN_TTL,
        });
        info!("New API token fetched and cached");
        Ok(value)
    }

    /// Fetches and validates the full stack collection. Either the whole
    /// payload validates or the call fails; there are no partial results.
    pub async fn get_stacks(&self) -> Result<Vec<Stack>, SpaceliftError> {
        let token = self.token().await?;

        info!("Fetching stacks");
        let data = graphql::execute(
            &self.http,
            &self.api_url,
            STACKS_QUERY,
            json!({}),
            Some(&token),
        )
        .await?;

        let raw = data.get("stacks").cloned().unwrap_or(Value::Null);
        let stacks = types::validate_stacks(raw).inspect_err(|e| error!("{}", e))?;

        info!("Fetched and validated {} stacks", stacks.len());
        Ok(stacks)
    }

    /// Triggers a run for a stack. The id is not checked locally; the
    /// remote side is the source of truth and answers for unknown ids.
    pub async fn trigger_run(&self, stack_id: &str) -> Result<RunTriggerResult, SpaceliftError> {
        let token = self.token().await?;

        info!("Triggering run for stack {}", stack_id);
        let data = graphql::execute(
            &self.http,
            &self.api_url,
            TRIGGER_RUN_MUTATION,
            json!({ "stackId": stack_id }),
            Some(&token),
        )
        .await?;

        let raw = data.get("runTrigger").cloned().unwrap_or(Value::Null);
        let result = types::validate_run_trigger_result(raw).inspect_err(|e| error!("{}", e))?;

        info!("Run {} triggered for stack {}", result.id, stack_id);
        Ok(result)
    }

    /// Creates a stack from a draft and returns the full created stack,
    /// now carrying a real id and a populated space name.
    pub async fn create_stack(&self, draft: &StackDraft) -> Result<Stack, SpaceliftError> {
        let token = self.token().await?;

        info!("Creating stack {}", draft.name);
        let variables = json!({
            "input": {
                "name": draft.name,
                "description": draft.description,
                "labels": draft.labels,
                "branch": draft.branch,
                "space": draft.space_id,
                "repository": draft.repository,
                "projectRoot": draft.project_root,
                // Fixed policy for portal-created stacks; loosening these
                // is a product decision, not a caller option.
                "administrative": true,
                "autodeploy": true,
            },
            "manageState": true,
        });
        let data = graphql::execute(
            &self.http,
            &self.api_url,
            CREATE_STACK_MUTATION,
            variables,
            Some(&token),
        )
        .await?;

        let raw = data.get("stackCreate").cloned().unwrap_or(Value::Null);
        let stack = types::validate_stack(raw).inspect_err(|e| error!("{}", e))?;

        info!("Stack {} created with id {}", stack.name, stack.id);
        Ok(stack)
    }

    #[cfg(test)]
    pub(crate) async fn force_expire_token(&self) {
        if let Some(cached) = self.token.lock().await.as_mut() {
            cached.expires_at = Instant::now();
        }
    }
}

fn exchange_reason(err: SpaceliftError) -> String {
    match err {
        SpaceliftError::Api { message, .. } => message,
        SpaceliftError::Transport(e) => e.to_string(),
        other => other.to_string(),
    }
}
