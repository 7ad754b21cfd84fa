// ABOUTME: Entry point for unibot — a university-life chatbot with saved chat sessions.
// ABOUTME: Parses CLI args, loads config, sets up logging, and launches the TUI or a headless command.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use unibot::app::{self, App};
use unibot::config::Config;
use unibot::session::SessionId;

#[derive(Parser)]
#[command(name = "unibot")]
#[command(about = "University Life Chatbot - ask about academics, campus tips, and student life", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.unibot/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session store file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Model provider (gemini or echo)
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Model name
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved chats, newest first
    Sessions,
    /// Ask a single question without the UI
    Ask {
        /// The question to send
        text: String,

        /// Continue an existing chat
        #[arg(long, conflicts_with = "new")]
        session: Option<String>,

        /// Start a fresh chat for this question
        #[arg(long)]
        new: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(store) = cli.store {
        config.store.path = store;
    }
    if let Some(provider) = cli.provider {
        config.llm.provider = provider;
    }
    if let Some(model) = cli.model {
        config.llm.model = model;
    }

    // Logging is best-effort; an unwritable home directory must not block chatting.
    if let Err(e) = app::init_logging(Config::log_path()) {
        eprintln!("Warning: {}", e);
    }
    tracing::info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        store = %config.store.path.display(),
        "starting unibot"
    );

    let app = App::new(config);
    match cli.command {
        None => app.run().await?,
        Some(Commands::Sessions) => app.list_sessions()?,
        Some(Commands::Ask { text, session, new }) => {
            app.ask(&text, session.map(SessionId::from), new).await?
        }
    }

    Ok(())
}
