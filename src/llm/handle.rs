// ABOUTME: Model handle — a live conversational context bound to one session.
// ABOUTME: Keeps the model-side history and sends it along with every new message.

use std::sync::Arc;

use crate::llm::client::{ChatModel, GenerateRequest, ModelError};
use crate::session::Turn;

/// Stateful chat context over a stateless [`ChatModel`].
///
/// Only exchanges that succeed become part of the context; a failed send
/// leaves the history as it was.
pub struct ModelHandle {
    client: Arc<dyn ChatModel>,
    system_instruction: Option<String>,
    history: Vec<Turn>,
}

impl ModelHandle {
    pub fn new(client: Arc<dyn ChatModel>, system_instruction: Option<String>) -> Self {
        Self {
            client,
            system_instruction,
            history: Vec::new(),
        }
    }

    /// Send one user message and return the model's reply.
    pub async fn send(&mut self, text: &str) -> Result<String, ModelError> {
        let mut contents = self.history.clone();
        contents.push(Turn::user(text));

        let reply = self
            .client
            .generate(GenerateRequest {
                system_instruction: self.system_instruction.clone(),
                contents,
            })
            .await?;

        self.history.push(Turn::user(text));
        self.history.push(Turn::assistant(reply.clone()));
        Ok(reply)
    }

    /// The context the model sees before the next message.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    /// Records every request and fails when the newest turn contains "fail".
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<GenerateRequest>>,
    }

    #[async_trait]
    impl ChatModel for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        async fn generate(&self, request: GenerateRequest) -> Result<String, ModelError> {
            let last = request.contents.last().map(|t| t.content.clone()).unwrap_or_default();
            self.seen.lock().unwrap().push(request);
            if last.contains("fail") {
                return Err(ModelError::Request("boom".to_string()));
            }
            Ok(format!("re: {last}"))
        }
    }

    #[tokio::test]
    async fn successful_sends_accumulate_history() {
        let recorder = Arc::new(Recorder::default());
        let mut handle = ModelHandle::new(recorder.clone(), Some("advise".to_string()));

        assert_eq!(handle.send("one").await.unwrap(), "re: one");
        assert_eq!(handle.send("two").await.unwrap(), "re: two");

        assert_eq!(
            handle.history(),
            &[
                Turn::user("one"),
                Turn::assistant("re: one"),
                Turn::user("two"),
                Turn::assistant("re: two"),
            ]
        );

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen[1].contents.len(), 3);
        assert_eq!(seen[1].system_instruction.as_deref(), Some("advise"));
    }

    #[tokio::test]
    async fn failed_send_leaves_history_untouched() {
        let mut handle = ModelHandle::new(Arc::new(Recorder::default()), None);
        handle.send("one").await.unwrap();

        let err = handle.send("please fail").await.unwrap_err();
        assert_eq!(err.to_string(), "request failed: boom");
        assert_eq!(handle.history().len(), 2);
    }
}
