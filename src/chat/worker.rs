// ABOUTME: Chat worker loop — owns the orchestrator and serves UI requests one at a time.
// ABOUTME: Receives UserEvents over mpsc and answers with ChatEvents carrying fresh snapshots.

use tokio::sync::mpsc;

use crate::chat::orchestrator::{ChatOrchestrator, Notice};
use crate::session::{SessionId, SessionSummary, Turn};

/// Requests from the UI to the worker.
#[derive(Debug)]
pub enum UserEvent {
    /// Send a message to the active session.
    Message(String),
    /// Start a new chat and make it active.
    NewSession,
    /// Make an existing session active.
    SelectSession(SessionId),
    /// Stop the worker.
    Quit,
}

/// Everything the UI needs to redraw after a request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSnapshot {
    pub sessions: Vec<SessionSummary>,
    pub active: SessionId,
    pub title: String,
    pub messages: Vec<Turn>,
}

/// Responses from the worker to the UI.
#[derive(Debug)]
pub enum ChatEvent {
    /// The worker started a request that may take a while.
    Busy,
    /// A request finished; redraw from this snapshot.
    Snapshot(ChatSnapshot),
    Notice(Notice),
}

/// Build a snapshot of the session list and one session's conversation.
pub fn snapshot(orchestrator: &ChatOrchestrator, active: &SessionId) -> ChatSnapshot {
    let (title, messages) = orchestrator
        .conversation(active)
        .map(|c| (c.title().to_string(), c.messages().to_vec()))
        .unwrap_or_default();
    ChatSnapshot {
        sessions: orchestrator.list_sessions(),
        active: active.clone(),
        title,
        messages,
    }
}

/// Run the worker until Quit or until the UI drops its sender.
///
/// Starts on the newest session. Requests are processed strictly in order, so
/// a slow model call delays everything queued behind it.
pub async fn run_chat_loop(
    mut orchestrator: ChatOrchestrator,
    mut user_rx: mpsc::Receiver<UserEvent>,
    chat_tx: mpsc::Sender<ChatEvent>,
) {
    let mut active = match orchestrator.newest_session() {
        Some(id) => id,
        None => orchestrator.new_session(),
    };

    let _ = chat_tx.send(ChatEvent::Busy).await;
    if let Err(e) = orchestrator.activate(&active).await {
        tracing::error!(error = %e, "failed to activate initial session");
    }
    publish(&mut orchestrator, &active, &chat_tx).await;

    while let Some(event) = user_rx.recv().await {
        match event {
            UserEvent::Quit => break,
            UserEvent::Message(text) => {
                let _ = chat_tx.send(ChatEvent::Busy).await;
                if let Err(e) = orchestrator.handle_input(&active, &text).await {
                    tracing::error!(error = %e, "failed to handle input");
                }
            }
            UserEvent::NewSession => {
                active = orchestrator.new_session();
                if let Err(e) = orchestrator.activate(&active).await {
                    tracing::error!(error = %e, "failed to activate new session");
                }
            }
            UserEvent::SelectSession(id) => {
                let _ = chat_tx.send(ChatEvent::Busy).await;
                match orchestrator.activate(&id).await {
                    Ok(_) => active = id,
                    Err(e) => {
                        let _ = chat_tx
                            .send(ChatEvent::Notice(Notice::error(e.to_string())))
                            .await;
                    }
                }
            }
        }
        publish(&mut orchestrator, &active, &chat_tx).await;
    }
    tracing::info!("chat worker stopped");
}

async fn publish(
    orchestrator: &mut ChatOrchestrator,
    active: &SessionId,
    chat_tx: &mpsc::Sender<ChatEvent>,
) {
    // Snapshot first: the UI drops notices when the active session changes.
    let _ = chat_tx
        .send(ChatEvent::Snapshot(snapshot(orchestrator, active)))
        .await;
    for notice in orchestrator.take_notices() {
        let _ = chat_tx.send(ChatEvent::Notice(notice)).await;
    }
}
