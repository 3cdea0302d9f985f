//! Flat-file conversation history.
//!
//! Each conversation lives in `<dir>/<id>.json` as a JSON array of
//! `{role, content}` turns in chronological order. The file's existence is
//! what makes a conversation valid; an empty array is a conversation with no
//! turns yet.
//!
//! Mutations are read-full, modify, write-full. Within one process every
//! mutation of a given id runs under that id's lock, and the file is replaced
//! through a temporary sibling plus `rename`, so concurrent appends never
//! drop each other's turns and readers never observe a half-written file.
//! Separate processes writing the same id are not coordinated.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;
use uuid::Uuid;

use crate::core::models::{ConversationId, Turn};
use crate::errors::GptError;

#[derive(Debug)]
pub struct ConversationStore {
    dir: PathBuf,
    locks: Mutex<HashMap<ConversationId, Arc<Mutex<()>>>>,
}

impl ConversationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// # Errors
    ///
    /// Returns `GptError::ConfigError` if the directory does not exist or is
    /// not a directory.
    pub fn ensure_dir(&self) -> Result<(), GptError> {
        if self.dir.is_dir() {
            Ok(())
        } else {
            Err(GptError::ConfigError(format!(
                "conversation path '{}' is not a valid directory",
                self.dir.display()
            )))
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, id: &ConversationId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    #[must_use]
    pub fn exists(&self, id: &ConversationId) -> bool {
        self.path_for(id).is_file()
    }

    /// Writes an empty history for `id`.
    ///
    /// # Errors
    ///
    /// Returns `GptError::StorageError` if the file already exists or cannot
    /// be written.
    pub fn create(&self, id: &ConversationId) -> Result<(), GptError> {
        let path = self.path_for(id);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                GptError::StorageError(format!(
                    "could not create conversation file '{}': {e}",
                    path.display()
                ))
            })?;
        file.write_all(b"[]").map_err(|e| {
            GptError::StorageError(format!(
                "could not write conversation file '{}': {e}",
                path.display()
            ))
        })?;

        debug!("Created conversation file {}", path.display());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GptError::ConversationNotFound` if the file is missing,
    /// `GptError::HistoryParseError` if it is not a JSON array of turns, and
    /// `GptError::StorageError` for any other read failure.
    pub fn load(&self, id: &ConversationId) -> Result<Vec<Turn>, GptError> {
        let path = self.path_for(id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GptError::ConversationNotFound(id.to_string()));
            }
            Err(e) => {
                return Err(GptError::StorageError(format!(
                    "could not read '{}': {e}",
                    path.display()
                )));
            }
        };

        serde_json::from_str(&raw)
            .map_err(|e| GptError::HistoryParseError(format!("{}: {e}", path.display())))
    }

    /// Replaces the whole history of `id`.
    ///
    /// # Errors
    ///
    /// Returns `GptError::StorageError` if the file cannot be written.
    pub fn save(&self, id: &ConversationId, turns: &[Turn]) -> Result<(), GptError> {
        self.with_lock(id, || self.write_replace(id, turns))
    }

    /// Appends `turns` to the stored history of `id` and returns the number
    /// of turns now stored.
    ///
    /// The history is re-read under the id's lock, so turns appended by
    /// another caller since this caller last loaded are kept.
    ///
    /// # Errors
    ///
    /// Fails like [`load`](Self::load) if the conversation does not exist or
    /// is malformed, and with `GptError::StorageError` if the rewrite fails.
    pub fn append(&self, id: &ConversationId, turns: &[Turn]) -> Result<usize, GptError> {
        let stored = self.with_lock(id, || {
            let mut history = self.load(id)?;
            history.extend_from_slice(turns);
            self.write_replace(id, &history)?;
            Ok(history.len())
        })?;

        debug!(
            "Appended {} turn(s) to conversation {id}, {} stored",
            turns.len(),
            stored
        );
        Ok(stored)
    }

    /// Runs `f` while holding the lock for `id`.
    ///
    /// The lock table only holds ids that some caller is using right now:
    /// the last caller out removes the entry.
    fn with_lock<T>(
        &self,
        id: &ConversationId,
        f: impl FnOnce() -> Result<T, GptError>,
    ) -> Result<T, GptError> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(id.clone()).or_default())
        };

        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        // Clones are only taken under the table lock, so the count is stable here.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&lock) == 2 {
            locks.remove(id);
        }
        result
    }

    fn write_replace(&self, id: &ConversationId, turns: &[Turn]) -> Result<(), GptError> {
        let path = self.path_for(id);
        let tmp = self
            .dir
            .join(format!(".{id}.{}.tmp", Uuid::new_v4().simple()));

        // serde_json leaves non-ASCII text and '/' unescaped.
        let body = serde_json::to_string(turns)?;

        if let Err(e) = fs::write(&tmp, body) {
            let _ = fs::remove_file(&tmp);
            return Err(GptError::StorageError(format!(
                "could not write '{}': {e}",
                tmp.display()
            )));
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(GptError::StorageError(format!(
                "could not replace '{}': {e}",
                path.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked_ids(store: &ConversationStore) -> usize {
        store.locks.lock().unwrap().len()
    }

    #[test]
    fn lock_table_forgets_idle_conversations() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::new(dir.path());

        let ids: Vec<ConversationId> = (0..20).map(|_| ConversationId::generate()).collect();
        for id in &ids {
            store.create(id).unwrap();
            store.append(id, &[Turn::user("hi")]).unwrap();
            store.save(id, &[]).unwrap();
        }
        assert_eq!(tracked_ids(&store), 0);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for id in &ids {
                        store.append(id, &[Turn::user("again")]).unwrap();
                    }
                });
            }
        });
        assert_eq!(tracked_ids(&store), 0);
        assert_eq!(store.load(&ids[0]).unwrap().len(), 4);
    }

    #[test]
    fn failed_append_still_releases_its_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::new(dir.path());

        let missing = ConversationId::generate();
        assert!(store.append(&missing, &[Turn::user("x")]).is_err());
        assert_eq!(tracked_ids(&store), 0);
    }
}
