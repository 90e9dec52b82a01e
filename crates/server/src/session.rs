//! Session Management
//!
//! Owns the live conversations. Each entry wraps its `Session` in an async
//! mutex, so turns within one session run strictly in sequence while different
//! sessions proceed in parallel. The registry lock is never held across an
//! await point.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;

use vanguard_agent::Session;
use vanguard_config::constants::sessions;

use crate::ServerError;

/// A registered session
pub struct SessionEntry {
    id: String,
    session: Mutex<Session>,
    last_activity: RwLock<Instant>,
}

impl SessionEntry {
    fn new(session: Session) -> Self {
        Self {
            id: session.id().to_string(),
            session: Mutex::new(session),
            last_activity: RwLock::new(Instant::now()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Exclusive access to the conversation; waits for any in-flight turn
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Session> {
        self.session.lock().await
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.read().elapsed()
    }

    /// Check if session is expired
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.idle_for() > timeout
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<SessionEntry>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    /// Create a new session manager with default timeouts
    pub fn new(max_sessions: usize) -> Self {
        Self::with_config(
            max_sessions,
            Duration::from_secs(sessions::IDLE_TIMEOUT_SECS),
            Duration::from_secs(sessions::CLEANUP_INTERVAL_SECS),
        )
    }

    pub fn with_config(
        max_sessions: usize,
        session_timeout: Duration,
        cleanup_interval: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout,
            cleanup_interval,
        }
    }

    /// Start a background task that periodically drops idle sessions.
    ///
    /// Send `true` on the returned channel to stop it.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let removed = manager.cleanup_expired();
                        if removed > 0 {
                            tracing::info!(
                                removed,
                                remaining = manager.count(),
                                "Session cleanup"
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Register a new session.
    ///
    /// At capacity, idle sessions are purged first; if none can be freed the
    /// session is rejected.
    pub fn create(&self, session: Session) -> Result<Arc<SessionEntry>, ServerError> {
        if self.count() >= self.max_sessions {
            self.cleanup_expired();
        }

        let mut sessions = self.sessions.write();
        if sessions.len() >= self.max_sessions {
            tracing::warn!(max_sessions = self.max_sessions, "Session capacity reached");
            return Err(ServerError::CapacityExceeded(self.max_sessions));
        }

        let entry = Arc::new(SessionEntry::new(session));
        sessions.insert(entry.id().to_string(), Arc::clone(&entry));
        tracing::debug!(session_id = %entry.id(), active = sessions.len(), "Session created");

        Ok(entry)
    }

    /// Look up a live session. Expired sessions are dropped on access.
    pub fn get(&self, id: &str) -> Option<Arc<SessionEntry>> {
        let entry = self.sessions.read().get(id).cloned()?;
        if entry.is_expired(self.session_timeout) {
            self.remove(id);
            return None;
        }
        Some(entry)
    }

    /// Remove a session. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().remove(id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "Session removed");
        }
        removed
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }

    /// Drop every session idle for longer than the timeout; returns how many
    pub fn cleanup_expired(&self) -> usize {
        let timeout = self.session_timeout;
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(timeout));
        before - sessions.len()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub fn session_timeout(&self) -> Duration {
        self.session_timeout
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(sessions::MAX_SESSIONS)
    }
}
