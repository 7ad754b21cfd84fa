// ABOUTME: Offline echo provider — answers without any network access.
// ABOUTME: Lets the UI and persistence be exercised with no API key configured.

use async_trait::async_trait;

use crate::llm::client::{ChatModel, GenerateRequest, ModelError};
use crate::session::Role;

/// Replies by quoting the newest user turn and counting the context it saw.
#[derive(Debug, Default)]
pub struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, ModelError> {
        let last = request
            .contents
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .ok_or_else(|| ModelError::InvalidPayload("no user turn to answer".to_string()))?;
        let earlier = request.contents.len() - 1;
        Ok(format!(
            "You asked: \"{}\" ({} earlier message{} in context)",
            last.content,
            earlier,
            if earlier == 1 { "" } else { "s" }
        ))
    }
}
