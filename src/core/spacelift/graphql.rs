use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::SpaceliftError;

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
    #[serde(default)]
    extensions: Option<Value>,
}

/// POSTs one GraphQL document and unwraps the envelope. A structured error
/// in the body wins regardless of the transport status; a body that is
/// neither data nor errors is reported with the HTTP status alone.
pub(super) async fn execute(
    http: &reqwest::Client,
    api_url: &str,
    query: &str,
    variables: Value,
    bearer: Option<&str>,
) -> Result<Value, SpaceliftError> {
    let mut request = http.post(api_url).json(&GraphqlRequest { query, variables });
    if let Some(token) = bearer {
        request = request.header("Authorization", format!("Bearer {}", token));
    }

    let response = request.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;

    let envelope: GraphqlEnvelope =
        serde_json::from_str(&body).map_err(|_| SpaceliftError::Api {
            status,
            message: format!("non-GraphQL response from API: {}", snippet(&body)),
            extensions: None,
        })?;

    if let Some(errors) = envelope.errors
        && let Some(first) = errors.into_iter().next()
    {
        return Err(SpaceliftError::Api {
            status,
            message: first.message,
            extensions: first.extensions,
        });
    }

    envelope.data.ok_or(SpaceliftError::Api {
        status,
        message: "GraphQL response carried no data".to_string(),
        extensions: None,
    })
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= 200 {
        trimmed.to_string()
    } else {
        let mut end = 200;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_truncates_long_bodies() {
        let long = "x".repeat(500);
        let out = snippet(&long);
        assert!(out.chars().count() <= 201);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn snippet_keeps_short_bodies_intact() {
        assert_eq!(snippet("  <html>bad gateway</html> "), "<html>bad gateway</html>");
    }
}
