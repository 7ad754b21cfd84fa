// ABOUTME: Model client abstraction — one request/response text-generation call.
// ABOUTME: Providers implement ChatModel; ModelError carries the message shown to users on failure.

use async_trait::async_trait;
use thiserror::Error;

use crate::session::Turn;

/// A single generation request: optional out-of-band instructions plus the
/// full ordered conversation, ending with the newest user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub system_instruction: Option<String>,
    pub contents: Vec<Turn>,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("missing API key: set the {0} environment variable")]
    MissingApiKey(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("model API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("model returned no text{}", .0.as_deref().map(|r| format!(" ({r})")).unwrap_or_default())]
    EmptyResponse(Option<String>),
    #[error("invalid response payload: {0}")]
    InvalidPayload(String),
}

/// A hosted (or local) text-generation service.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, for display and logs.
    fn name(&self) -> &str;

    async fn generate(&self, request: GenerateRequest) -> Result<String, ModelError>;
}
