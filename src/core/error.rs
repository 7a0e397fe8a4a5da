use thiserror::Error;

/// Failure surface of the Spacelift gateway. Every remote interaction
/// resolves to exactly one of these variants; the web layer maps them to
/// HTTP responses in a single place.
#[derive(Debug, Error)]
pub enum SpaceliftError {
    /// The credential exchange failed. The token cache is cleared before
    /// this is returned, so the next call retries from scratch.
    #[error("failed to authenticate with Spacelift API: {reason}")]
    Authentication { reason: String },

    /// A remote payload did not match the expected shape. Always fatal for
    /// the call; payloads are never coerced or defaulted.
    #[error("invalid {what} received from API: {detail}")]
    Validation { what: &'static str, detail: String },

    /// A structured GraphQL error, carrying the HTTP status of the remote
    /// response and whatever extensions the API attached.
    #[error("Spacelift API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        extensions: Option<serde_json::Value>,
    },

    /// Network-level failure, propagated as-is.
    #[error("transport error talking to Spacelift: {0}")]
    Transport(#[from] reqwest::Error),
}
