// ABOUTME: Integration tests for the chat orchestrator against a real store file on disk.
// ABOUTME: Verifies exchanges survive a restart, failures are recorded, and replay rebuilds context.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use unibot::chat::{ChatOrchestrator, ERROR_REPLY_PREFIX, ModelSessionCache, Priming};
use unibot::config::PrimingStrategy;
use unibot::llm::{ChatModel, GenerateRequest, ModelError};
use unibot::session::{PLACEHOLDER_TITLE, Role, SessionStore};

/// Replies "reply to <text>" unless the text contains "fail"; records every request.
#[derive(Default)]
struct ScriptedModel {
    requests: Mutex<Vec<GenerateRequest>>,
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, ModelError> {
        let last = request
            .contents
            .last()
            .map(|t| t.content.clone())
            .unwrap_or_default();
        self.requests.lock().unwrap().push(request);
        if last.contains("fail") {
            return Err(ModelError::Status {
                status: 503,
                message: "model overloaded".to_string(),
            });
        }
        Ok(format!("reply to {}", last))
    }
}

fn open(dir: &TempDir, model: Arc<ScriptedModel>) -> ChatOrchestrator {
    let store = SessionStore::new(dir.path().join("chat_sessions.json"));
    let cache = ModelSessionCache::new(
        model,
        Priming {
            strategy: PrimingStrategy::SystemInstruction,
            instructions: "You are a helpful university advisor.".to_string(),
        },
    );
    ChatOrchestrator::open(store, cache)
}

#[tokio::test]
async fn conversation_survives_restart() {
    let dir = TempDir::new().unwrap();

    let id = {
        let mut orch = open(&dir, Arc::new(ScriptedModel::default()));
        let id = orch.newest_session().unwrap();
        orch.handle_input(&id, "How do I pick electives?").await.unwrap();
        orch.handle_input(&id, "Any for first years?").await.unwrap();
        assert!(orch.take_notices().is_empty());
        id
    };

    let reopened = open(&dir, Arc::new(ScriptedModel::default()));
    let conversation = reopened.conversation(&id).unwrap();
    assert_eq!(conversation.title(), "How do I pick electives?");
    let contents: Vec<(Role, &str)> = conversation
        .messages()
        .iter()
        .map(|t| (t.role, t.content.as_str()))
        .collect();
    assert_eq!(
        contents,
        vec![
            (Role::User, "How do I pick electives?"),
            (Role::Assistant, "reply to How do I pick electives?"),
            (Role::User, "Any for first years?"),
            (Role::Assistant, "reply to Any for first years?"),
        ]
    );
    assert_eq!(reopened.list_sessions().len(), 1);
}

#[tokio::test]
async fn failed_reply_is_recorded_and_title_stays_placeholder() {
    let dir = TempDir::new().unwrap();

    let id = {
        let mut orch = open(&dir, Arc::new(ScriptedModel::default()));
        let id = orch.newest_session().unwrap();
        let reply = orch.handle_input(&id, "please fail").await.unwrap();
        assert!(reply.starts_with(ERROR_REPLY_PREFIX));
        assert!(reply.contains("model overloaded"));
        id
    };

    let reopened = open(&dir, Arc::new(ScriptedModel::default()));
    let conversation = reopened.conversation(&id).unwrap();
    assert_eq!(conversation.title(), PLACEHOLDER_TITLE);
    assert_eq!(conversation.messages().len(), 2);
    assert!(conversation.messages()[1].content.starts_with(ERROR_REPLY_PREFIX));
}

#[tokio::test]
async fn restored_session_replays_history_before_next_message() {
    let dir = TempDir::new().unwrap();

    let id = {
        let mut orch = open(&dir, Arc::new(ScriptedModel::default()));
        let id = orch.newest_session().unwrap();
        orch.handle_input(&id, "Where is the gym?").await.unwrap();
        id
    };

    let model = Arc::new(ScriptedModel::default());
    let mut reopened = open(&dir, model.clone());
    reopened.handle_input(&id, "When does it open?").await.unwrap();

    let requests = model.requests.lock().unwrap();
    // One replayed user turn, then the new message.
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].contents.last().unwrap().content,
        "Where is the gym?"
    );
    let last = &requests[1];
    assert_eq!(
        last.system_instruction.as_deref(),
        Some("You are a helpful university advisor.")
    );
    let texts: Vec<&str> = last.contents.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Where is the gym?",
            "reply to Where is the gym?",
            "When does it open?"
        ]
    );
}

#[tokio::test]
async fn new_sessions_are_listed_newest_first_after_restart() {
    let dir = TempDir::new().unwrap();

    let (first, second) = {
        let mut orch = open(&dir, Arc::new(ScriptedModel::default()));
        let first = orch.newest_session().unwrap();
        let second = orch.new_session();
        (first, second)
    };

    let reopened = open(&dir, Arc::new(ScriptedModel::default()));
    let ids: Vec<_> = reopened.list_sessions().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![second, first]);
}
