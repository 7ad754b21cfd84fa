// ABOUTME: Chat module — orchestration of a conversation turn and the worker that serializes them.
// ABOUTME: Includes the model handle cache (replay) and title derivation.

pub mod cache;
pub mod orchestrator;
pub mod title;
pub mod worker;

pub use cache::{ModelSessionCache, Priming, ReplayReport};
pub use orchestrator::{ChatError, ChatOrchestrator, ERROR_REPLY_PREFIX, Notice, NoticeLevel};
pub use title::derive_title;
pub use worker::{ChatEvent, ChatSnapshot, UserEvent, run_chat_loop};
