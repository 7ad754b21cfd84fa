// ABOUTME: Session store — loads and saves every conversation as one JSON object on disk.
// ABOUTME: Full-file rewrite on each save via tmp + rename; unreadable files are backed up on load.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::session::sessions::Sessions;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode sessions: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The single file holding all sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unparseable store file found at `at` is copied before it can
    /// be overwritten. The timestamp keeps earlier backups intact.
    pub fn corrupt_backup_path(&self, at: DateTime<Utc>) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".corrupt-{}", at.format("%Y%m%dT%H%M%S%.6fZ")));
        PathBuf::from(name)
    }

    /// Load all sessions. A missing file is an empty mapping.
    ///
    /// A file that exists but does not decode as sessions (bad JSON or bad
    /// UTF-8) is copied to [`Self::corrupt_backup_path`] before the error is
    /// returned.
    pub fn load(&self) -> Result<Sessions, StoreError> {
        if !self.path.exists() {
            return Ok(Sessions::new());
        }
        let content = std::fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        match serde_json::from_slice(&content) {
            Ok(sessions) => Ok(sessions),
            Err(source) => {
                let backup = self.corrupt_backup_path(Utc::now());
                match std::fs::copy(&self.path, &backup) {
                    Ok(_) => tracing::warn!(backup = %backup.display(), "backed up unreadable session store"),
                    Err(e) => tracing::warn!(error = %e, "failed to back up unreadable session store"),
                }
                Err(StoreError::Parse {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    /// Overwrite the store file with every session.
    pub fn save(&self, sessions: &Sessions) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(sessions)?;
        std::fs::write(&tmp_path, &content).map_err(write_err)?;
        std::fs::rename(&tmp_path, &self.path).map_err(write_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::record::Turn;
    use chrono::TimeZone;

    /// Every `.corrupt-*` backup next to the store, sorted by name.
    fn backups(store: &SessionStore) -> Vec<PathBuf> {
        let dir = store.path().parent().unwrap();
        let mut found: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("chat_sessions.json.corrupt-"))
            })
            .collect();
        found.sort();
        found
    }

    fn sample_sessions() -> Sessions {
        let mut sessions = Sessions::new();
        let id = sessions.create(Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap());
        sessions.append(&id, Turn::user("Where is the library?"));
        sessions.append(&id, Turn::assistant("Next to the student union."));
        sessions
            .get_mut(&id)
            .unwrap()
            .assign_title_once("Where is the library?".to_string());
        sessions.create(Utc.with_ymd_and_hms(2025, 9, 2, 8, 0, 0).unwrap());
        sessions
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("chat_sessions.json"));
        let loaded = store.load().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn save_then_load_is_structurally_equal() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("chat_sessions.json"));
        let original = sample_sessions();

        store.save(&original).unwrap();
        let loaded = SessionStore::new(store.path()).load().unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn save_creates_parent_directories_and_leaves_no_tmp() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("dir").join("chat_sessions.json");
        let store = SessionStore::new(&path);

        store.save(&sample_sessions()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn save_overwrites_in_full() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("chat_sessions.json"));

        store.save(&sample_sessions()).unwrap();
        store.save(&Sessions::new()).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.trim(), "{}");
    }

    #[test]
    fn corrupt_file_is_reported_and_backed_up() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("chat_sessions.json"));
        std::fs::write(store.path(), "{ not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().contains("chat_sessions.json"));

        let found = backups(&store);
        assert_eq!(found.len(), 1);
        assert_eq!(std::fs::read_to_string(&found[0]).unwrap(), "{ not json");
    }

    #[test]
    fn invalid_utf8_is_backed_up_like_bad_json() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("chat_sessions.json"));
        let bytes = b"{\"s1\": {\"title\": \"caf\xe9\", \"messages\": [], \"created_at\": \"2024-10-01T12:00:00\"}}";
        std::fs::write(store.path(), bytes).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));

        let found = backups(&store);
        assert_eq!(found.len(), 1);
        assert_eq!(std::fs::read(&found[0]).unwrap(), bytes.to_vec());
    }

    #[test]
    fn repeated_corruption_keeps_every_backup() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("chat_sessions.json"));

        std::fs::write(store.path(), "first broken").unwrap();
        store.load().unwrap_err();
        std::thread::sleep(std::time::Duration::from_millis(5));
        std::fs::write(store.path(), "second broken").unwrap();
        store.load().unwrap_err();

        let contents: Vec<String> = backups(&store)
            .iter()
            .map(|p| std::fs::read_to_string(p).unwrap())
            .collect();
        assert_eq!(contents, vec!["first broken", "second broken"]);
    }

    #[test]
    fn backup_name_carries_the_timestamp() {
        let store = SessionStore::new("data/chat_sessions.json");
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 5).unwrap();
        assert_eq!(
            store.corrupt_backup_path(at),
            PathBuf::from("data/chat_sessions.json.corrupt-20260301T093005.000000Z")
        );
    }

    #[test]
    fn reads_files_written_with_naive_timestamps() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("chat_sessions.json"));
        std::fs::write(
            store.path(),
            r#"{"3f2a": {"title": "Hello", "messages": [{"role": "user", "content": "Hello"}, {"role": "assistant", "content": "Hi!"}], "created_at": "2024-10-01T12:00:00.500000"}}"#,
        )
        .unwrap();

        let loaded = store.load().unwrap();
        let conv = loaded.get(&"3f2a".into()).unwrap();
        assert_eq!(conv.title(), "Hello");
        assert_eq!(conv.messages().len(), 2);
    }
}
