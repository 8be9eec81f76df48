use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub last_topic: Option<String>,
    pub question_count: u64,
    /// Tags in the order they were first discussed.
    pub asked_about: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl SessionContext {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            last_topic: None,
            question_count: 0,
            asked_about: Vec::new(),
            created_at: now,
            last_seen: now,
        }
    }

    pub fn record_topic(&mut self, tag: &str) {
        self.last_topic = Some(tag.to_string());
        if !self.asked_about.iter().any(|seen| seen == tag) {
            self.asked_about.push(tag.to_string());
        }
    }

    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.last_seen > ttl
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock it for the whole turn so same-session requests serialize.
pub type SessionHandle = Arc<Mutex<SessionContext>>;


pub trait SessionStore: Send + Sync {
    fn get(&self, session_id: &str) -> Option<SessionContext>;

    fn get_or_create(&self, session_id: &str) -> SessionHandle;

    fn update(&self, session_id: &str, apply: &mut dyn FnMut(&mut SessionContext)) {
        let handle = self.get_or_create(session_id);
        let mut context = handle.lock();
        apply(&mut context);
    }

    fn remove(&self, session_id: &str) -> Option<SessionContext>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Largest span `chrono::Duration::seconds` accepts.
const MAX_TTL_SECS: u64 = (i64::MAX / 1000) as u64;

/// Bounded LRU of sessions; idle sessions are reset on their next access.
pub struct InMemorySessionStore {
    sessions: Mutex<LruCache<String, SessionHandle>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(max_sessions: usize, ttl_secs: u64) -> Self {
        Self {
            sessions: Mutex::new(LruCache::new(
                NonZeroUsize::new(max_sessions).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl: Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, session_id: &str) -> Option<SessionContext> {
        let handle = self.sessions.lock().peek(session_id).cloned()?;
        let context = handle.lock();
        if context.is_expired(self.ttl, Utc::now()) {
            return None;
        }
        Some(context.clone())
    }

    fn get_or_create(&self, session_id: &str) -> SessionHandle {
        let handle = {
            let mut sessions = self.sessions.lock();
            match sessions.get(session_id) {
                Some(handle) => handle.clone(),
                None => {
                    debug!("Creating session {}", session_id);
                    let handle: SessionHandle = Arc::new(Mutex::new(SessionContext::new()));
                    if let Some((evicted, _)) = sessions.push(session_id.to_string(), handle.clone()) {
                        debug!("Evicted idle session {}", evicted);
                    }
                    handle
                }
            }
        };

        {
            let mut context = handle.lock();
            if context.is_expired(self.ttl, Utc::now()) {
                debug!("Session {} expired, starting fresh", session_id);
                *context = SessionContext::new();
            }
        }

        handle
    }

    fn remove(&self, session_id: &str) -> Option<SessionContext> {
        let handle = self.sessions.lock().pop(session_id)?;
        let context = handle.lock().clone();
        Some(context)
    }

    fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}
