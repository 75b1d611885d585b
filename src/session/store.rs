//! Session storage.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::observability::metrics;
use crate::request::{MalformedUrlError, UrlParts};
use crate::session::model::{NewSession, Session};

/// Errors returned by a [`SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No session with this id.
    #[error("session {0} not found")]
    NotFound(u64),

    /// The method token is empty or contains whitespace.
    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),

    /// The stored URL would not decompose into host and path.
    #[error(transparent)]
    MalformedUrl(#[from] MalformedUrlError),
}

/// Create, fetch, list and complete sessions.
pub trait SessionStore: Send + Sync {
    /// Validate and store a new session, assigning its id.
    fn create(&self, fields: NewSession) -> Result<Session, StoreError>;

    fn get(&self, id: u64) -> Option<Session>;

    /// All sessions, ascending by id.
    fn list(&self) -> Vec<Session>;

    /// Record that a request for `id` was sent and answered.
    fn mark_completed(
        &self,
        id: u64,
        completed_at: u64,
        response: String,
    ) -> Result<Session, StoreError>;
}

/// Thread-safe in-memory store.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    inner: Arc<DashMap<u64, Session>>,
    next_id: Arc<AtomicU64>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn count(&self) -> usize {
        self.inner.len()
    }

    /// Number of sessions still waiting to be sent.
    pub fn pending_count(&self) -> usize {
        self.inner.iter().filter(|r| r.value().needs_to_send_request()).count()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, fields: NewSession) -> Result<Session, StoreError> {
        if fields.method.is_empty() || fields.method.contains(char::is_whitespace) {
            return Err(StoreError::InvalidMethod(fields.method));
        }
        UrlParts::parse(&fields.url)?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = Session::new(id, fields);
        self.inner.insert(id, session.clone());

        metrics::record_session_created();
        tracing::debug!(session_id = id, session = %session, "Session created");
        Ok(session)
    }

    fn get(&self, id: u64) -> Option<Session> {
        self.inner.get(&id).map(|r| r.value().clone())
    }

    fn list(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.inner.iter().map(|r| r.value().clone()).collect();
        sessions.sort_by_key(|s| s.id);
        sessions
    }

    fn mark_completed(
        &self,
        id: u64,
        completed_at: u64,
        response: String,
    ) -> Result<Session, StoreError> {
        let mut entry = self.inner.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        entry.mark_completed(completed_at, response);
        Ok(entry.value().clone())
    }
}
