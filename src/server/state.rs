//! Server state management
//!
//! Sessions live in memory only; each one owns its shell and is locked for
//! the duration of a command. Sessions nobody has touched for
//! `session_idle` are dropped by [`AppState::purge_idle_sessions`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::commands::{CommandMode, CommandRegistry, Environment};
use crate::config::Config;
use crate::shell::ShellSession;

use super::rate_limit::RateLimiter;

/// How long an untouched session is kept when no config says otherwise
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

/// Shared application state for the server
pub struct AppState {
    pub registry: Arc<CommandRegistry>,
    pub env: Arc<Environment>,
    /// Active sessions mapped by ID
    pub sessions: RwLock<HashMap<String, SessionHandle>>,
    /// Applies to session creation and command submissions
    pub rate_limiter: RateLimiter,
    session_idle: Duration,
}

/// Handle to a managed session
#[derive(Clone)]
pub struct SessionHandle {
    pub session: Arc<Mutex<ShellSession>>,
    /// Session creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Refreshed whenever a route looks the session up
    pub last_active: Instant,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_parts(
            Arc::new(CommandRegistry::builtin()),
            Arc::new(Environment::from_config(config)?),
            RateLimiter::from_config(&config.server.rate_limit),
        )
        .with_session_idle(config.server.session_idle()))
    }

    pub fn with_parts(
        registry: Arc<CommandRegistry>,
        env: Arc<Environment>,
        rate_limiter: RateLimiter,
    ) -> Self {
        Self {
            registry,
            env,
            sessions: RwLock::new(HashMap::new()),
            rate_limiter,
            session_idle: DEFAULT_SESSION_IDLE,
        }
    }

    pub fn with_session_idle(mut self, idle: Duration) -> Self {
        self.session_idle = idle;
        self
    }

    /// Create and store a new session, returning its id
    pub async fn create_session(&self, mode: CommandMode) -> (String, SessionHandle) {
        let session =
            ShellSession::new(self.registry.clone(), self.env.clone()).with_mode(mode);
        let id = session.id().to_string();
        let handle = SessionHandle {
            session: Arc::new(Mutex::new(session)),
            created_at: chrono::Utc::now(),
            last_active: Instant::now(),
        };

        self.sessions.write().await.insert(id.clone(), handle.clone());
        tracing::debug!(session = %id, "session created");
        (id, handle)
    }

    /// Look a session up and mark it active
    pub async fn session(&self, id: &str) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let handle = sessions.get_mut(id)?;
        handle.last_active = Instant::now();
        Some(handle.clone())
    }

    /// Drop sessions idle for longer than `session_idle`; returns how many went
    pub async fn purge_idle_sessions(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| now.duration_since(handle.last_active) <= self.session_idle);
        before - sessions.len()
    }

    pub async fn remove_session(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
