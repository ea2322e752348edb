use thiserror::Error;

/// Errors returned by text-service collaborators.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// The API answered 2xx but without any message content.
    #[error("API returned no content")]
    EmptyResponse,

    /// The content did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No text service is configured.
    #[error("text service disabled")]
    Disabled,
}
