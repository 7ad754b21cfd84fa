// ABOUTME: App orchestrator — wires together config, LLM client, session store, worker, and TUI.
// ABOUTME: Also provides the headless `sessions` and `ask` commands over the same orchestrator.

use std::path::PathBuf;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::chat::{
    ChatEvent, ChatOrchestrator, ModelSessionCache, NoticeLevel, Priming, UserEvent,
    run_chat_loop,
};
use crate::config::Config;
use crate::llm;
use crate::prompt::AdvisorPrompt;
use crate::session::{SessionId, SessionStore};
use crate::tui::input::{InputResult, handle_key};
use crate::tui::state::TuiState;
use crate::tui::ui;

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
}

impl App {
    /// Create a new app with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the orchestrator: model client, priming, and the loaded session store.
    pub fn open_orchestrator(&self) -> anyhow::Result<ChatOrchestrator> {
        // Load local .env if present, then the user's secrets.
        let _ = dotenvy::dotenv();
        let _ = dotenvy::from_path(Config::secrets_env_path());

        let client = llm::create_client(&self.config.llm)?;
        let instructions = AdvisorPrompt::new().load_override().build();
        let cache = ModelSessionCache::new(
            client,
            Priming {
                strategy: self.config.llm.priming,
                instructions,
            },
        );
        let store = SessionStore::new(&self.config.store.path);
        Ok(ChatOrchestrator::open(store, cache))
    }

    /// Run the full-screen chat UI until the user quits.
    pub async fn run(self) -> anyhow::Result<()> {
        let orchestrator = self.open_orchestrator()?;
        let model = orchestrator.model_name().to_string();

        let (user_tx, user_rx) = mpsc::channel::<UserEvent>(16);
        let (chat_tx, mut chat_rx) = mpsc::channel::<ChatEvent>(64);
        let worker = tokio::spawn(run_chat_loop(orchestrator, user_rx, chat_tx));

        let mut state = TuiState::new(model, self.config.store.path.display().to_string());
        let mut terminal = ratatui::init();
        let mut events = EventStream::new();

        let result = async {
            loop {
                terminal.draw(|frame| ui::render(frame, &mut state))?;

                tokio::select! {
                    maybe_event = events.next() => {
                        let Some(event) = maybe_event else { break };
                        let Event::Key(key) = event? else { continue };
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        let request = match handle_key(&mut state, key) {
                            InputResult::None => continue,
                            InputResult::Quit => break,
                            InputResult::Send(text) => UserEvent::Message(text),
                            InputResult::NewSession => UserEvent::NewSession,
                            InputResult::SelectSession(id) => UserEvent::SelectSession(id),
                        };
                        if user_tx.send(request).await.is_err() {
                            break;
                        }
                    }
                    maybe_chat = chat_rx.recv() => {
                        match maybe_chat {
                            Some(ChatEvent::Busy) => state.busy = true,
                            Some(ChatEvent::Snapshot(snapshot)) => state.apply_snapshot(snapshot),
                            Some(ChatEvent::Notice(notice)) => state.push_notice(notice),
                            None => break,
                        }
                    }
                }
            }
            Ok::<(), anyhow::Error>(())
        }
        .await;

        ratatui::restore();

        // Let an in-flight request finish and persist before exiting.
        let _ = user_tx.send(UserEvent::Quit).await;
        drop(user_tx);
        let _ = worker.await;

        result
    }

    /// Print every session, newest first.
    pub fn list_sessions(&self) -> anyhow::Result<()> {
        let store = SessionStore::new(&self.config.store.path);
        let sessions = store.load()?;
        if sessions.is_empty() {
            println!("No saved chats in {}", store.path().display());
            return Ok(());
        }
        for summary in sessions.list() {
            println!(
                "{}  {}  {:>3} msgs  {}",
                summary.id,
                summary.created_at.format("%Y-%m-%d %H:%M"),
                summary.turn_count,
                summary.title
            );
        }
        Ok(())
    }

    /// Send one message without the UI and print the reply.
    pub async fn ask(&self, text: &str, session: Option<SessionId>, new: bool) -> anyhow::Result<()> {
        let text = text.trim();
        if text.is_empty() {
            anyhow::bail!("nothing to ask: the message is empty");
        }

        let mut orchestrator = self.open_orchestrator()?;
        let id = match (session, new) {
            (_, true) => orchestrator.new_session(),
            (Some(id), false) => id,
            (None, false) => orchestrator
                .newest_session()
                .ok_or_else(|| anyhow::anyhow!("no session available"))?,
        };

        let reply = orchestrator.handle_input(&id, text).await?;
        for notice in orchestrator.take_notices() {
            let label = match notice.level {
                NoticeLevel::Warning => "Warning",
                NoticeLevel::Error => "Error",
            };
            eprintln!("{}: {}", label, notice.message);
        }
        println!("{}", reply);
        eprintln!("(session {})", id);
        Ok(())
    }
}

/// Route tracing output to the log file so it never draws over the TUI.
pub fn init_logging(path: PathBuf) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("unibot=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
    Ok(())
}
