// ABOUTME: Model session cache — one live model handle per session, built lazily by replay.
// ABOUTME: Replay re-sends stored user turns (after optional in-band priming), skipping failures.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::config::PrimingStrategy;
use crate::llm::{ChatModel, ModelHandle};
use crate::session::{Role, SessionId, Turn};

/// How a freshly built handle is told about its domain.
#[derive(Debug, Clone)]
pub struct Priming {
    pub strategy: PrimingStrategy,
    pub instructions: String,
}

/// Outcome of rebuilding one handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
    pub attempted: usize,
    pub failed: usize,
}

impl ReplayReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Process-local handles keyed by session. Never persisted.
pub struct ModelSessionCache {
    client: Arc<dyn ChatModel>,
    priming: Priming,
    handles: HashMap<SessionId, ModelHandle>,
}

impl ModelSessionCache {
    pub fn new(client: Arc<dyn ChatModel>, priming: Priming) -> Self {
        Self {
            client,
            priming,
            handles: HashMap::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.client.name()
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.handles.contains_key(id)
    }

    /// Return the handle for `id`, building it from `history` if absent.
    ///
    /// The report is `Some` only when the handle was built by this call.
    pub async fn get_or_create(
        &mut self,
        id: &SessionId,
        history: &[Turn],
    ) -> (&mut ModelHandle, Option<ReplayReport>) {
        match self.handles.entry(id.clone()) {
            Entry::Occupied(entry) => (entry.into_mut(), None),
            Entry::Vacant(entry) => {
                let (handle, report) = rebuild(&self.client, &self.priming, id, history).await;
                (entry.insert(handle), Some(report))
            }
        }
    }
}

/// Build a handle and replay the priming message and user turns into it.
async fn rebuild(
    client: &Arc<dyn ChatModel>,
    priming: &Priming,
    id: &SessionId,
    history: &[Turn],
) -> (ModelHandle, ReplayReport) {
    let (system_instruction, priming_turn) = match priming.strategy {
        PrimingStrategy::SystemInstruction => (Some(priming.instructions.clone()), None),
        PrimingStrategy::Replay => (None, Some(priming.instructions.as_str())),
    };
    let mut handle = ModelHandle::new(client.clone(), system_instruction);
    let mut report = ReplayReport::default();

    let user_turns = history
        .iter()
        .filter(|turn| turn.role == Role::User)
        .map(|turn| turn.content.as_str());

    for text in priming_turn.into_iter().chain(user_turns) {
        report.attempted += 1;
        if let Err(e) = handle.send(text).await {
            report.failed += 1;
            tracing::debug!(session = %id, error = %e, "replay call failed");
        }
    }

    if report.is_complete() {
        tracing::info!(session = %id, replayed = report.attempted, "rebuilt model handle");
    } else {
        tracing::warn!(
            session = %id,
            attempted = report.attempted,
            failed = report.failed,
            "rebuilt model handle with partial context"
        );
    }
    (handle, report)
}
