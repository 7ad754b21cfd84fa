// ABOUTME: LLM module — model client trait, Gemini and echo providers, and per-session handles.
// ABOUTME: The provider factory picks a client from config.

pub mod client;
pub mod echo;
pub mod gemini;
pub mod handle;
pub mod provider;

pub use client::{ChatModel, GenerateRequest, ModelError};
pub use handle::ModelHandle;
pub use provider::create_client;
