//! Session Registry: process-lifetime token to student mapping.
//!
//! # Responsibility
//! - Issue opaque session tokens for authenticated students.
//! - Resolve and revoke tokens for session checks and logout.
//!
//! # Invariants
//! - A live token maps to exactly one email until revoked, expired, or the
//!   process ends. Nothing is persisted.
//! - Reads and writes go through a single mutex.

use log::{debug, info};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Raw token size before hex encoding (64 hex chars).
const TOKEN_BYTES: usize = 32;

/// Session storage contract consumed by the authentication service.
pub trait SessionStore {
    /// Issues a fresh token bound to `email`.
    fn create(&self, email: &str) -> String;
    /// Returns the email bound to `token`, if the session is live.
    fn lookup(&self, token: &str) -> Option<String>;
    /// Drops `token`. Unknown tokens are ignored.
    fn revoke(&self, token: &str);
    /// Number of sessions currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: SessionStore> SessionStore for &S {
    fn create(&self, email: &str) -> String {
        (**self).create(email)
    }

    fn lookup(&self, token: &str) -> Option<String> {
        (**self).lookup(token)
    }

    fn revoke(&self, token: &str) {
        (**self).revoke(token)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// One live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    /// Unix epoch milliseconds at issue time.
    pub issued_at_ms: i64,
}

impl Session {
    fn is_expired(&self, ttl: Option<Duration>, now_ms: i64) -> bool {
        let elapsed_ms = u128::try_from(now_ms.saturating_sub(self.issued_at_ms)).unwrap_or(0);
        ttl.is_some_and(|ttl| elapsed_ms >= ttl.as_millis())
    }
}

/// In-memory registry guarded by one mutex.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Option<Duration>,
}

impl InMemorySessionStore {
    /// Creates a registry whose sessions never expire.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry whose sessions expire `ttl` after issue.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// Returns a snapshot of the session bound to `token`, expired or not.
    pub fn get(&self, token: &str) -> Option<Session> {
        self.sessions.lock().get(token).cloned()
    }

    /// Removes every expired session and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now_ms = now_epoch_ms();
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(self.ttl, now_ms));
        let purged = before - sessions.len();
        if purged > 0 {
            info!("event=session_purge module=session status=ok purged={purged}");
        }
        purged
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, email: &str) -> String {
        let mut sessions = self.sessions.lock();
        let token = loop {
            let candidate = generate_token();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(
            token.clone(),
            Session {
                email: email.to_string(),
                issued_at_ms: now_epoch_ms(),
            },
        );
        debug!(
            "event=session_create module=session status=ok live_sessions={}",
            sessions.len()
        );
        token
    }

    fn lookup(&self, token: &str) -> Option<String> {
        let mut sessions = self.sessions.lock();
        let session = sessions.get(token)?;
        if session.is_expired(self.ttl, now_epoch_ms()) {
            sessions.remove(token);
            debug!("event=session_lookup module=session status=expired");
            return None;
        }
        Some(session.email.clone())
    }

    fn revoke(&self, token: &str) {
        if self.sessions.lock().remove(token).is_some() {
            debug!("event=session_revoke module=session status=ok");
        }
    }

    fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}

fn generate_token() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}
