//! Session management

use crate::auth::models::Role;
use crate::auth::otp::ResetFlow;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Identity stored in a session after a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    /// Café name, when the user belongs to one
    pub cafe: Option<String>,
}

/// Severity of a flash message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

/// One-shot message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }
}

/// Session information
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID, carried by the browser in an opaque cookie
    pub id: String,
    /// Login identity; `None` for anonymous sessions
    pub identity: Option<SessionIdentity>,
    /// Password reset state, when a reset is in flight
    pub reset: Option<ResetFlow>,
    /// Pending flash messages
    pub flashes: Vec<Flash>,
    /// When the session was created
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// When the session last accessed
    pub last_accessed: chrono::DateTime<chrono::Utc>,
}

impl Session {
    /// Create a new session, anonymous unless an identity is given
    pub fn new(identity: Option<SessionIdentity>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            identity,
            reset: None,
            flashes: Vec::new(),
            created_at: now,
            last_accessed: now,
        }
    }

    /// Check if session is expired (30 minutes idle)
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now();
        now.signed_duration_since(self.last_accessed).num_minutes() > 30
    }

    /// Update last accessed time
    pub fn touch(&mut self) {
        self.last_accessed = chrono::Utc::now();
    }
}

/// Session manager for in-memory session storage
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a new session
    pub async fn create_session(&self, identity: Option<SessionIdentity>) -> Session {
        let session = Session::new(identity);
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        session
    }

    /// Get a session by ID
    pub async fn get_session(&self, session_id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            if session.is_expired() {
                sessions.remove(session_id);
                return None;
            }
            session.touch();
            return Some(session.clone());
        }
        None
    }

    /// Mutate a session in place; returns false when the session is gone
    pub async fn update_session<F>(&self, session_id: &str, mutate: F) -> bool
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            if session.is_expired() {
                sessions.remove(session_id);
                return false;
            }
            mutate(session);
            session.touch();
            return true;
        }
        false
    }

    /// Queue a flash message for the next rendered page
    pub async fn push_flash(&self, session_id: &str, flash: Flash) -> bool {
        self.update_session(session_id, |session| session.flashes.push(flash))
            .await
    }

    /// Drain the pending flash messages
    pub async fn take_flashes(&self, session_id: &str) -> Vec<Flash> {
        let mut taken = Vec::new();
        self.update_session(session_id, |session| {
            taken = std::mem::take(&mut session.flashes);
        })
        .await;
        taken
    }

    /// Delete a session and everything in it
    pub async fn flush_session(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }

    /// Cleanup expired sessions
    pub async fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| !session.is_expired());
    }

    /// Get session count
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_identity() -> SessionIdentity {
        SessionIdentity {
            user_id: "user-1".to_string(),
            username: "alice".to_string(),
            role: Role::ShopOwner,
            cafe: Some("Corner Beans".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let manager = SessionManager::new();
        let session = manager.create_session(Some(owner_identity())).await;

        let retrieved = manager.get_session(&session.id).await.unwrap();
        let identity = retrieved.identity.unwrap();
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.role, Role::ShopOwner);
        assert_eq!(identity.cafe.as_deref(), Some("Corner Beans"));
    }

    #[tokio::test]
    async fn test_anonymous_session_has_no_identity() {
        let manager = SessionManager::new();
        let session = manager.create_session(None).await;
        let retrieved = manager.get_session(&session.id).await.unwrap();
        assert!(retrieved.identity.is_none());
        assert!(retrieved.reset.is_none());
    }

    #[tokio::test]
    async fn test_flush_session_clears_everything() {
        let manager = SessionManager::new();
        let session = manager.create_session(Some(owner_identity())).await;
        manager
            .push_flash(&session.id, Flash::info("pending"))
            .await;

        manager.flush_session(&session.id).await;
        assert!(manager.get_session(&session.id).await.is_none());

        // flushing twice is a no-op
        manager.flush_session(&session.id).await;
        assert!(manager.get_session(&session.id).await.is_none());
    }

    #[tokio::test]
    async fn test_flashes_drain_once() {
        let manager = SessionManager::new();
        let session = manager.create_session(None).await;

        manager.push_flash(&session.id, Flash::success("one")).await;
        manager.push_flash(&session.id, Flash::error("two")).await;

        let flashes = manager.take_flashes(&session.id).await;
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].level, FlashLevel::Success);
        assert_eq!(flashes[1].message, "two");

        assert!(manager.take_flashes(&session.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_session_expiration() {
        let manager = SessionManager::new();
        let session = manager.create_session(None).await;

        // Manually expire the session for testing
        {
            let mut sessions = manager.sessions.write().await;
            if let Some(session) = sessions.get_mut(&session.id) {
                session.last_accessed = chrono::Utc::now() - chrono::Duration::minutes(31);
            }
        }

        assert!(manager.get_session(&session.id).await.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_session_returns_false() {
        let manager = SessionManager::new();
        let updated = manager
            .update_session("non-existent-id", |session| {
                session.flashes.push(Flash::info("lost"))
            })
            .await;
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_session_clone_shares_storage() {
        let manager1 = SessionManager::new();
        let manager2 = manager1.clone();

        let session = manager1.create_session(None).await;

        assert!(manager2.get_session(&session.id).await.is_some());
        assert_eq!(manager2.session_count().await, 1);
    }
}
