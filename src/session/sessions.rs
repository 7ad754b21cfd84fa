// ABOUTME: In-memory session map — the id -> conversation mapping the store loads and saves.
// ABOUTME: Handles session creation with strictly increasing timestamps and newest-first listing.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::session::record::{Conversation, SessionId, Turn};

/// Display summary of one session for the session list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub turn_count: usize,
}

/// All known sessions, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sessions {
    by_id: BTreeMap<SessionId, Conversation>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: &SessionId) -> Option<&Conversation> {
        self.by_id.get(id)
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Option<&mut Conversation> {
        self.by_id.get_mut(id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Create a new empty session stamped with `now`.
    ///
    /// Timestamps are kept at microsecond precision (what the store writes) and
    /// strictly increase across sessions: if the clock has not moved past the
    /// newest session, the new one is placed one microsecond after it.
    pub fn create(&mut self, now: DateTime<Utc>) -> SessionId {
        let now = now.trunc_subsecs(6);
        let created_at = match self.newest_created_at() {
            Some(newest) if now <= newest => newest + Duration::microseconds(1),
            _ => now,
        };

        let id = SessionId::generate();
        self.by_id.insert(id.clone(), Conversation::new(created_at));
        id
    }

    /// Append a turn to a session. Returns false if the session does not exist.
    pub fn append(&mut self, id: &SessionId, turn: Turn) -> bool {
        match self.by_id.get_mut(id) {
            Some(conversation) => {
                conversation.push(turn);
                true
            }
            None => false,
        }
    }

    /// Summaries sorted by `created_at` descending, ties broken by id ascending.
    pub fn list(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .by_id
            .iter()
            .map(|(id, conversation)| SessionSummary {
                id: id.clone(),
                title: conversation.title().to_string(),
                created_at: conversation.created_at(),
                turn_count: conversation.messages().len(),
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        summaries
    }

    /// Id of the most recently created session.
    pub fn newest(&self) -> Option<SessionId> {
        self.list().into_iter().next().map(|summary| summary.id)
    }

    fn newest_created_at(&self) -> Option<DateTime<Utc>> {
        self.by_id.values().map(Conversation::created_at).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn create_inserts_empty_placeholder_session() {
        let mut sessions = Sessions::new();
        let id = sessions.create(at(100));
        let conv = sessions.get(&id).unwrap();
        assert!(conv.has_placeholder_title());
        assert!(conv.messages().is_empty());
        assert_eq!(conv.created_at(), at(100));
    }

    #[test]
    fn same_instant_creations_get_strictly_increasing_timestamps() {
        let mut sessions = Sessions::new();
        let first = sessions.create(at(100));
        let second = sessions.create(at(100));
        let third = sessions.create(at(50));

        let t1 = sessions.get(&first).unwrap().created_at();
        let t2 = sessions.get(&second).unwrap().created_at();
        let t3 = sessions.get(&third).unwrap().created_at();
        assert!(t1 < t2);
        assert!(t2 < t3);
    }

    #[test]
    fn list_is_newest_first() {
        let mut sessions = Sessions::new();
        let old = sessions.create(at(10));
        let new = sessions.create(at(20));

        let listed: Vec<SessionId> = sessions.list().into_iter().map(|s| s.id).collect();
        assert_eq!(listed, vec![new.clone(), old]);
        assert_eq!(sessions.newest(), Some(new));
    }

    #[test]
    fn list_breaks_timestamp_ties_by_id() {
        let json = r#"{
            "b": {"title": "B", "messages": [], "created_at": "2025-01-01T00:00:00Z"},
            "a": {"title": "A", "messages": [], "created_at": "2025-01-01T00:00:00Z"},
            "c": {"title": "C", "messages": [], "created_at": "2024-01-01T00:00:00Z"}
        }"#;
        let sessions: Sessions = serde_json::from_str(json).unwrap();
        let titles: Vec<String> = sessions.list().into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn append_preserves_order_and_rejects_unknown_ids() {
        let mut sessions = Sessions::new();
        let id = sessions.create(at(0));
        assert!(sessions.append(&id, Turn::user("one")));
        assert!(sessions.append(&id, Turn::assistant("two")));
        assert!(!sessions.append(&SessionId::from("missing"), Turn::user("x")));

        let contents: Vec<&str> = sessions
            .get(&id)
            .unwrap()
            .messages()
            .iter()
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(contents, vec!["one", "two"]);
        assert_eq!(sessions.list()[0].turn_count, 2);
    }
}
