//! Origin-scoped session storage using Papaya HashMap
//!
//! Each backend origin owns one [`SessionRecord`]. Records are always replaced
//! as a whole, so readers never see a new access token next to an old refresh
//! token. With a file path configured, every change is written through to a
//! JSON file so a restarted process picks up the same session. Inside a Tokio
//! runtime those writes happen off the async worker threads.

use crate::error::{ClientError, Result};
use crate::types::{AuthTokens, CachedUser, SessionRecord};
use papaya::HashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Thread-safe session store using Papaya HashMap
///
/// Stores one session record per origin URL
#[derive(Clone)]
pub struct TokenStore {
    sessions: Arc<HashMap<String, SessionRecord>>,
    persistence: Option<Arc<FilePersistence>>,
}

struct FilePersistence {
    path: PathBuf,
    /// Serializes snapshot writes so an older snapshot never lands last
    write_lock: Mutex<()>,
}

impl TokenStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(HashMap::new()),
            persistence: None,
        }
    }

    /// Open a store backed by a JSON file, loading any sessions already in it.
    ///
    /// A missing file starts empty. A file that cannot be parsed is ignored
    /// with a warning and overwritten on the next change.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let sessions = HashMap::new();

        match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, SessionRecord>>(&bytes) {
                Ok(saved) => {
                    let pinned = sessions.pin();
                    for (origin, record) in saved {
                        pinned.insert(origin, record);
                    }
                    debug!(path = %path.display(), count = pinned.len(), "Loaded stored sessions");
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read session file");
            }
        }

        Self {
            sessions: Arc::new(sessions),
            persistence: Some(Arc::new(FilePersistence {
                path,
                write_lock: Mutex::new(()),
            })),
        }
    }

    /// File backing this store, if any
    pub fn path(&self) -> Option<&Path> {
        self.persistence.as_ref().map(|p| p.path.as_path())
    }

    /// Store a full session for an origin (login, registration, social login)
    pub fn store(&self, origin: &str, record: SessionRecord) {
        self.sessions.pin().insert(origin.to_string(), record);
        self.persist();
    }

    /// Snapshot of the session for an origin
    pub fn get(&self, origin: &str) -> Option<SessionRecord> {
        self.sessions.pin().get(origin).cloned()
    }

    pub fn access_token(&self, origin: &str) -> Option<String> {
        self.get(origin).and_then(|r| r.access_token)
    }

    pub fn refresh_token(&self, origin: &str) -> Option<String> {
        self.get(origin).and_then(|r| r.refresh_token)
    }

    pub fn user(&self, origin: &str) -> Option<CachedUser> {
        self.get(origin).and_then(|r| r.user)
    }

    /// Swap both tokens of an existing session in one step.
    ///
    /// Returns `false` when the origin has no session any more, e.g. because
    /// a logout won the race; the tokens are not written in that case.
    pub fn replace_tokens(&self, origin: &str, tokens: &AuthTokens) -> bool {
        let replaced = self
            .sessions
            .pin()
            .update(origin.to_string(), |record| record.with_tokens(tokens))
            .is_some();
        if replaced {
            self.persist();
        }
        replaced
    }

    /// Remove the session for an origin
    pub fn remove(&self, origin: &str) {
        self.sessions.pin().remove(origin);
        self.persist();
    }

    /// Check if a session exists for an origin
    pub fn contains(&self, origin: &str) -> bool {
        self.sessions.pin().contains_key(origin)
    }

    /// Get all origins with stored sessions
    pub fn origins(&self) -> Vec<String> {
        self.sessions
            .pin()
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Clear all stored sessions
    pub fn clear(&self) {
        self.sessions.pin().clear();
        self.persist();
    }

    /// Write the current sessions to the backing file.
    ///
    /// Implicit writes only log failures; call this to observe them. Blocks
    /// the calling thread, see [`TokenStore::flush_async`] for async callers.
    pub fn flush(&self) -> Result<()> {
        let Some(persistence) = &self.persistence else {
            return Ok(());
        };
        // The snapshot is taken under the lock, so the last write always
        // carries the latest state
        let _guard = persistence
            .write_lock
            .lock()
            .map_err(|_| ClientError::Storage("session file lock poisoned".to_string()))?;

        let snapshot: BTreeMap<String, SessionRecord> = self
            .sessions
            .pin()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        let tmp = persistence.path.with_extension("tmp");
        std::fs::write(&tmp, bytes)
            .and_then(|_| std::fs::rename(&tmp, &persistence.path))
            .map_err(|e| {
                ClientError::Storage(format!("{}: {e}", persistence.path.display()))
            })
    }

    /// Async version of [`TokenStore::flush`] using `spawn_blocking`.
    ///
    /// Returns once every change made before the call is on disk.
    pub async fn flush_async(&self) -> Result<()> {
        if self.persistence.is_none() {
            return Ok(());
        }
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.flush())
            .await
            .map_err(|e| ClientError::Storage(format!("spawn_blocking join error: {e}")))?
    }

    /// Write through after a change. Inside a Tokio runtime the file write
    /// runs on the blocking pool; the in-memory map is already updated.
    fn persist(&self) {
        if self.persistence.is_none() {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = self.clone();
                handle.spawn_blocking(move || store.persist_now());
            }
            Err(_) => self.persist_now(),
        }
    }

    fn persist_now(&self) {
        if let Err(e) = self.flush() {
            warn!(error = %e, "Failed to persist sessions");
        }
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}
