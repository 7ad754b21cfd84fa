// ABOUTME: Gemini client — calls the generateContent REST endpoint with reqwest.
// ABOUTME: Maps UI roles (user/assistant) to Gemini roles (user/model) and extracts reply text.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::llm::client::{ChatModel, GenerateRequest, ModelError};
use crate::session::{Role, Turn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::Request(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

/// Gemini's name for a role.
pub fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Translate a Gemini role into the UI's vocabulary. Anything that is not
/// `model` is treated as the user.
pub fn map_role(role: &str) -> Role {
    if role == "model" {
        Role::Assistant
    } else {
        Role::User
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent<'a>>,
    contents: Vec<WireContent<'a>>,
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart<'a>>,
}

#[derive(Debug, Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireResponse {
    candidates: Vec<WireCandidate>,
    prompt_feedback: Option<WirePromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireCandidate {
    content: Option<WireReplyContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireReplyContent {
    role: Option<String>,
    parts: Vec<WireReplyPart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireReplyPart {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WirePromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    error: WireError,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
}

fn build_body(request: &GenerateRequest) -> WireRequest<'_> {
    WireRequest {
        system_instruction: request.system_instruction.as_deref().map(|text| WireContent {
            role: None,
            parts: vec![WirePart { text }],
        }),
        contents: request
            .contents
            .iter()
            .map(|turn| WireContent {
                role: Some(wire_role(turn.role)),
                parts: vec![WirePart {
                    text: &turn.content,
                }],
            })
            .collect(),
    }
}

/// Pull the reply out of a successful response body.
fn parse_reply(body: &str) -> Result<Turn, ModelError> {
    let response: WireResponse =
        serde_json::from_str(body).map_err(|e| ModelError::InvalidPayload(e.to_string()))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response.prompt_feedback.and_then(|f| f.block_reason);
        return Err(ModelError::EmptyResponse(reason));
    };

    let content = candidate.content.unwrap_or_default();
    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.is_empty() {
        return Err(ModelError::EmptyResponse(candidate.finish_reason));
    }

    let role = content.role.as_deref().map(map_role).unwrap_or(Role::Assistant);
    Ok(Turn {
        role,
        content: text,
    })
}

/// Best-effort human-readable message from an error response body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<WireErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty error body".to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        }
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, ModelError> {
        let body = build_body(&request);
        tracing::debug!(model = %self.config.model, turns = body.contents.len(), "gemini generateContent");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Request("request timed out".to_string())
                } else {
                    ModelError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ModelError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        parse_reply(&text).map(|turn| turn.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roles_map_between_vocabularies() {
        assert_eq!(wire_role(Role::Assistant), "model");
        assert_eq!(wire_role(Role::User), "user");
        assert_eq!(map_role("model"), Role::Assistant);
        assert_eq!(map_role("user"), Role::User);
    }

    #[test]
    fn body_includes_system_instruction_and_mapped_roles() {
        let request = GenerateRequest {
            system_instruction: Some("Be an advisor.".to_string()),
            contents: vec![
                Turn::user("Hi"),
                Turn::assistant("Hello!"),
                Turn::user("Dorm tips?"),
            ],
        };
        let value = serde_json::to_value(build_body(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "systemInstruction": { "parts": [{ "text": "Be an advisor." }] },
                "contents": [
                    { "role": "user", "parts": [{ "text": "Hi" }] },
                    { "role": "model", "parts": [{ "text": "Hello!" }] },
                    { "role": "user", "parts": [{ "text": "Dorm tips?" }] }
                ]
            })
        );
    }

    #[test]
    fn body_omits_absent_system_instruction() {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Turn::user("Hi")],
        };
        let value = serde_json::to_value(build_body(&request)).unwrap();
        assert!(value.get("systemInstruction").is_none());
    }

    #[test]
    fn reply_concatenates_text_parts() {
        let body = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Office hours " }, { "text": "are on Tuesdays." }] },
                "finishReason": "STOP"
            }]
        })
        .to_string();
        let turn = parse_reply(&body).unwrap();
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, "Office hours are on Tuesdays.");
    }

    #[test]
    fn blocked_prompt_is_an_empty_response() {
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string();
        let err = parse_reply(&body).unwrap_err();
        assert!(matches!(err, ModelError::EmptyResponse(Some(ref r)) if r == "SAFETY"));
    }

    #[test]
    fn candidate_without_text_reports_finish_reason() {
        let body = json!({ "candidates": [{ "finishReason": "RECITATION" }] }).to_string();
        let err = parse_reply(&body).unwrap_err();
        assert_eq!(err.to_string(), "model returned no text (RECITATION)");
    }

    #[test]
    fn error_message_prefers_provider_message() {
        let body = json!({ "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" } })
            .to_string();
        assert_eq!(error_message(&body), "API key not valid.");
        assert_eq!(error_message("  upstream down  "), "upstream down");
        assert_eq!(error_message(""), "empty error body");
    }

    #[test]
    fn endpoint_joins_base_url_and_model() {
        let client = GeminiClient::new(GeminiConfig {
            base_url: "http://localhost:9999/".to_string(),
            model: "gemini-2.5-flash-lite".to_string(),
            api_key: "k".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash-lite:generateContent"
        );
    }
}
