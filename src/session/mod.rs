// ABOUTME: Session module — conversation records, the in-memory session map, and its JSON store.
// ABOUTME: Everything here is plain data and file I/O; no model calls.

pub mod record;
pub mod sessions;
pub mod store;

pub use record::{Conversation, PLACEHOLDER_TITLE, Role, SessionId, Turn};
pub use sessions::{SessionSummary, Sessions};
pub use store::{SessionStore, StoreError};
