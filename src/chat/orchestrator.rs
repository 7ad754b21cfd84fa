// ABOUTME: Chat orchestrator — the application state every UI action goes through.
// ABOUTME: Appends turns, calls the model via the handle cache, titles sessions, persists per turn.

use chrono::Utc;
use thiserror::Error;

use crate::chat::cache::{ModelSessionCache, ReplayReport};
use crate::chat::title::derive_title;
use crate::session::{Conversation, SessionId, SessionStore, SessionSummary, Sessions, Turn};

/// Prefix of the assistant turn recorded when a model call fails.
pub const ERROR_REPLY_PREFIX: &str = "Sorry, I encountered an error:";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A message for the user-visible surface that is not part of any conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Owns the session map, its store, and the model handle cache.
pub struct ChatOrchestrator {
    store: SessionStore,
    sessions: Sessions,
    cache: ModelSessionCache,
    notices: Vec<Notice>,
}

impl ChatOrchestrator {
    /// Load sessions from the store, creating a first session if there are none.
    ///
    /// A store that cannot be read is reported as a notice and treated as empty.
    pub fn open(store: SessionStore, cache: ModelSessionCache) -> Self {
        let mut notices = Vec::new();
        let sessions = match store.load() {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::error!(error = %e, "failed to load sessions");
                notices.push(Notice::error(format!("Could not load saved chats: {e}")));
                Sessions::new()
            }
        };
        tracing::info!(path = %store.path().display(), sessions = sessions.len(), "opened session store");

        let mut orchestrator = Self {
            store,
            sessions,
            cache,
            notices,
        };
        if orchestrator.sessions.is_empty() {
            orchestrator.new_session();
        }
        orchestrator
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    pub fn conversation(&self, id: &SessionId) -> Option<&Conversation> {
        self.sessions.get(id)
    }

    /// Sessions newest first.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        self.sessions.list()
    }

    pub fn newest_session(&self) -> Option<SessionId> {
        self.sessions.newest()
    }

    pub fn model_name(&self) -> &str {
        self.cache.model_name()
    }

    /// Drain notices accumulated since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Start an empty conversation and persist it.
    pub fn new_session(&mut self) -> SessionId {
        let id = self.sessions.create(Utc::now());
        tracing::info!(session = %id, "created session");
        self.persist();
        id
    }

    /// Touch a session so its model handle exists, replaying history if needed.
    pub async fn activate(&mut self, id: &SessionId) -> Result<Option<ReplayReport>, ChatError> {
        let conversation = self
            .sessions
            .get(id)
            .ok_or_else(|| ChatError::UnknownSession(id.clone()))?;
        let (_, report) = self.cache.get_or_create(id, conversation.messages()).await;
        if let Some(report) = report {
            self.note_replay(report);
        }
        Ok(report)
    }

    /// Record a user message, ask the model, and record its reply.
    ///
    /// Model failures never surface as errors here: they become an assistant
    /// turn starting with [`ERROR_REPLY_PREFIX`].
    pub async fn handle_input(&mut self, id: &SessionId, text: &str) -> Result<String, ChatError> {
        let prior_len = self
            .sessions
            .get(id)
            .ok_or_else(|| ChatError::UnknownSession(id.clone()))?
            .messages()
            .len();

        self.sessions.append(id, Turn::user(text));
        self.persist();

        let result = {
            let history = self
                .sessions
                .get(id)
                .map(|conversation| &conversation.messages()[..prior_len])
                .unwrap_or_default();
            let (handle, report) = self.cache.get_or_create(id, history).await;
            let result = handle.send(text).await;
            if let Some(report) = report {
                self.note_replay(report);
            }
            result
        };

        let reply = match result {
            Ok(reply) => {
                let titled = self
                    .sessions
                    .get_mut(id)
                    .is_some_and(|c| c.assign_title_once(derive_title(text)));
                if titled {
                    self.persist();
                }
                reply
            }
            Err(e) => {
                tracing::warn!(session = %id, error = %e, "model call failed");
                format!("{ERROR_REPLY_PREFIX} {e}")
            }
        };

        self.sessions.append(id, Turn::assistant(reply.clone()));
        self.persist();
        Ok(reply)
    }

    fn note_replay(&mut self, report: ReplayReport) {
        if !report.is_complete() {
            self.notices.push(Notice::warning(format!(
                "Restored this chat with partial context: {} of {} replayed messages failed",
                report.failed, report.attempted
            )));
        }
    }

    /// Save everything; a failure becomes a notice and memory stays as it is.
    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.sessions) {
            tracing::error!(error = %e, "failed to save sessions");
            self.notices.push(Notice::error(format!("Could not save chats: {e}")));
        }
    }
}
