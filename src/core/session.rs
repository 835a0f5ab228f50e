// src/core/session.rs — Generation session store
//
// One session correlates the page-0 through page-N requests of a single
// post. The store owns every session; protocol steps look one up by request
// id and write back through these operations only.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::infra::errors::CardpressError;

#[derive(Debug, Clone)]
pub struct Session {
    pub request_id: String,
    pub title: String,
    /// Immutable once computed; `total_pages == pages.len()` for the
    /// session's whole lifetime.
    pub pages: Vec<String>,
    pub total_pages: usize,
    pub created_at: DateTime<Utc>,
    /// Intermediate markup files emitted so far, deleted at teardown.
    pub artifact_paths: Vec<PathBuf>,
}

/// Injectable session store; swap for a sharded or persistent
/// implementation without touching the protocol.
pub trait SessionStore: Send + Sync {
    fn create(
        &self,
        request_id: &str,
        title: &str,
        pages: Vec<String>,
    ) -> Result<(), CardpressError>;

    fn get(&self, request_id: &str) -> Result<Session, CardpressError>;

    /// Record an emitted artifact. Appending the same path twice is a no-op.
    fn append_artifact(&self, request_id: &str, path: &Path) -> Result<(), CardpressError>;

    /// Delete the session, returning its artifacts for cleanup. Absent
    /// sessions yield an empty list.
    fn remove(&self, request_id: &str) -> Vec<PathBuf>;

    /// Drop every session unconditionally; returns the count and all
    /// recorded artifacts. Safety net for abandoned multi-page requests.
    fn sweep_all(&self) -> (usize, Vec<PathBuf>);
}

/// Process-local store backed by a mutex-guarded map. The lock is held only
/// for the map operation itself, so requests on distinct ids never serialize
/// on gateway I/O.
#[derive(Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().expect("session map poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn create(
        &self,
        request_id: &str,
        title: &str,
        pages: Vec<String>,
    ) -> Result<(), CardpressError> {
        let mut map = self.sessions.lock().expect("session map poisoned");
        if map.contains_key(request_id) {
            return Err(CardpressError::DuplicateSession {
                request_id: request_id.to_string(),
            });
        }
        let total_pages = pages.len();
        map.insert(
            request_id.to_string(),
            Session {
                request_id: request_id.to_string(),
                title: title.to_string(),
                pages,
                total_pages,
                created_at: Utc::now(),
                artifact_paths: Vec::new(),
            },
        );
        Ok(())
    }

    fn get(&self, request_id: &str) -> Result<Session, CardpressError> {
        let map = self.sessions.lock().expect("session map poisoned");
        map.get(request_id)
            .cloned()
            .ok_or_else(|| CardpressError::UnknownSession {
                request_id: request_id.to_string(),
            })
    }

    fn append_artifact(&self, request_id: &str, path: &Path) -> Result<(), CardpressError> {
        let mut map = self.sessions.lock().expect("session map poisoned");
        let session = map
            .get_mut(request_id)
            .ok_or_else(|| CardpressError::UnknownSession {
                request_id: request_id.to_string(),
            })?;
        if !session.artifact_paths.iter().any(|p| p == path) {
            session.artifact_paths.push(path.to_path_buf());
        }
        Ok(())
    }

    fn remove(&self, request_id: &str) -> Vec<PathBuf> {
        let mut map = self.sessions.lock().expect("session map poisoned");
        map.remove(request_id)
            .map(|s| s.artifact_paths)
            .unwrap_or_default()
    }

    fn sweep_all(&self) -> (usize, Vec<PathBuf>) {
        let mut map = self.sessions.lock().expect("session map poisoned");
        let count = map.len();
        let artifacts = map
            .drain()
            .flat_map(|(_, s)| s.artifact_paths)
            .collect();
        (count, artifacts)
    }
}
