//! Per-session conversation state.
//!
//! Each browser session owns one [`Session`]: its transcript and the
//! currently selected language. Sessions live in memory only and are
//! dropped on explicit end or after an idle timeout.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Local;
use uuid::Uuid;

use mindwell_core::language::DEFAULT_LANGUAGE;
use mindwell_core::types::{ChatTurn, ConversationHistory};

use crate::error::ChatError;

// =============================================================================
// Session
// =============================================================================

/// Conversation context for one user session.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    history: ConversationHistory,
    selected_language: String,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            history: ConversationHistory::new(),
            selected_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn append(&mut self, turn: ChatTurn) {
        self.history.append(turn);
    }

    pub fn selected_language(&self) -> &str {
        &self.selected_language
    }

    /// Returns `true` if the selection changed. Past turns are untouched.
    pub fn set_selected_language(&mut self, display_name: &str) -> bool {
        if self.selected_language == display_name {
            return false;
        }
        self.selected_language = display_name.to_string();
        true
    }
}

/// Shared handle to a session.
///
/// The async mutex is held for the whole of a user action, so a session
/// never has two provider calls in flight.
pub type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

/// Result of [`SessionStore::get_or_create`].
#[derive(Clone)]
pub struct SessionLease {
    pub id: Uuid,
    pub handle: SessionHandle,
    /// Whether the session was created by this call.
    pub created: bool,
}

// =============================================================================
// SessionStore
// =============================================================================

struct SessionEntry {
    handle: SessionHandle,
    last_seen: i64,
}

/// In-memory owner of every live session.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
    /// Idle timeout in minutes.
    timeout_minutes: u32,
}

impl SessionStore {
    pub fn new(timeout_minutes: u32) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            timeout_minutes,
        }
    }

    /// Return the requested session if it is still live, otherwise start a
    /// fresh one. Expired sessions are swept on the way.
    pub fn get_or_create(&self, requested: Option<Uuid>) -> Result<SessionLease, ChatError> {
        let now = Local::now().timestamp();
        let mut sessions = self.lock()?;
        self.sweep(&mut sessions, now);

        if let Some(sid) = requested {
            if let Some(entry) = sessions.get_mut(&sid) {
                entry.last_seen = now;
                return Ok(SessionLease {
                    id: sid,
                    handle: Arc::clone(&entry.handle),
                    created: false,
                });
            }
        }

        let sid = Uuid::new_v4();
        let handle = Arc::new(tokio::sync::Mutex::new(Session::new(sid)));
        sessions.insert(
            sid,
            SessionEntry {
                handle: Arc::clone(&handle),
                last_seen: now,
            },
        );
        tracing::debug!(session = %sid, "Session created");
        Ok(SessionLease {
            id: sid,
            handle,
            created: true,
        })
    }

    /// Destroy a session and its transcript.
    pub fn end(&self, session_id: Uuid) -> Result<(), ChatError> {
        let mut sessions = self.lock()?;
        if sessions.remove(&session_id).is_some() {
            tracing::debug!(session = %session_id, "Session ended");
            Ok(())
        } else {
            Err(ChatError::SessionNotFound(session_id))
        }
    }

    /// Drop every session idle past the timeout. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Local::now().timestamp())
    }

    /// [`purge_expired`](Self::purge_expired) against an explicit clock.
    pub fn purge_expired_at(&self, now: i64) -> usize {
        match self.sessions.lock() {
            Ok(mut sessions) => self.sweep(&mut sessions, now),
            Err(_) => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -- Private helpers --

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, SessionEntry>>, ChatError> {
        self.sessions
            .lock()
            .map_err(|e| ChatError::Internal(format!("session lock poisoned: {}", e)))
    }

    fn is_expired(&self, last_seen: i64, now: i64) -> bool {
        let timeout_secs = i64::from(self.timeout_minutes) * 60;
        now - last_seen > timeout_secs
    }

    fn sweep(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: i64) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry.last_seen, now));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(removed, "Expired sessions discarded");
        }
        removed
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new(Uuid::new_v4());
        assert!(session.history().is_empty());
        assert_eq!(session.selected_language(), "English");
    }

    #[test]
    fn test_append_grows_history() {
        let mut session = Session::new(Uuid::new_v4());
        session.append(ChatTurn::user("hi"));
        session.append(ChatTurn::assistant("hello"));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history().turns()[1].content(), "hello");
    }

    #[test]
    fn test_set_language_reports_change() {
        let mut session = Session::new(Uuid::new_v4());
        assert!(session.set_selected_language("বাংলা (Bengali)"));
        assert_eq!(session.selected_language(), "বাংলা (Bengali)");
    }

    #[test]
    fn test_selecting_same_language_twice_is_idempotent() {
        let mut session = Session::new(Uuid::new_v4());
        session.append(ChatTurn::user("hi"));
        assert!(session.set_selected_language("ଓଡ଼ିଆ (Odia)"));
        let history_before = session.history().clone();
        assert!(!session.set_selected_language("ଓଡ଼ିଆ (Odia)"));
        assert_eq!(session.selected_language(), "ଓଡ଼ିଆ (Odia)");
        assert_eq!(session.history(), &history_before);
    }

    #[test]
    fn test_language_change_keeps_past_turns() {
        let mut session = Session::new(Uuid::new_v4());
        session.append(ChatTurn::user("hello"));
        session.set_selected_language("हिन्दी (Hindi)");
        assert_eq!(session.history().turns()[0].content(), "hello");
    }

    #[test]
    fn test_get_or_create_creates_when_absent() {
        let store = SessionStore::new(60);
        let lease = store.get_or_create(None).unwrap();
        assert!(lease.created);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_or_create_reuses_live_session() {
        let store = SessionStore::new(60);
        let first = store.get_or_create(None).unwrap();
        let second = store.get_or_create(Some(first.id)).unwrap();
        assert!(!second.created);
        assert_eq!(first.id, second.id);
        assert!(Arc::ptr_eq(&first.handle, &second.handle));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_id_gets_fresh_session() {
        let store = SessionStore::new(60);
        let stale = Uuid::new_v4();
        let lease = store.get_or_create(Some(stale)).unwrap();
        assert!(lease.created);
        assert_ne!(lease.id, stale);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new(60);
        let a = store.get_or_create(None).unwrap();
        let b = store.get_or_create(None).unwrap();
        a.handle.lock().await.append(ChatTurn::user("only in a"));
        assert_eq!(a.handle.lock().await.history().len(), 1);
        assert!(b.handle.lock().await.history().is_empty());
    }

    #[test]
    fn test_end_removes_session() {
        let store = SessionStore::new(60);
        let lease = store.get_or_create(None).unwrap();
        store.end(lease.id).unwrap();
        assert!(store.is_empty());
        assert!(store.get_or_create(Some(lease.id)).unwrap().created);
    }

    #[test]
    fn test_end_unknown_session_errors() {
        let store = SessionStore::new(60);
        let id = Uuid::new_v4();
        let err = store.end(id).unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound(e) if e == id));
    }

    #[test]
    fn test_purge_expired_removes_idle_sessions() {
        let store = SessionStore::new(1);
        let lease = store.get_or_create(None).unwrap();
        let now = Local::now().timestamp();

        assert_eq!(store.purge_expired_at(now + 30), 0);
        assert_eq!(store.len(), 1);

        assert_eq!(store.purge_expired_at(now + 61), 1);
        assert!(store.get_or_create(Some(lease.id)).unwrap().created);
    }

    #[test]
    fn test_purge_boundary_not_expired() {
        let store = SessionStore::new(1);
        store.get_or_create(None).unwrap();
        let now = Local::now().timestamp();
        // Exactly at the timeout is still live.
        assert_eq!(store.purge_expired_at(now + 60 - 1), 0);
    }
}
