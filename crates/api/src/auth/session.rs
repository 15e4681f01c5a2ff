//! Process-wide cache of verified bearer tokens.
//!
//! Entries are keyed by the SHA-256 of the token and live for a fixed TTL.
//! They are inserted after a successful remote verification and evicted
//! explicitly when a token is rejected.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::Identity;

/// Expired entries are swept on insert once the map grows past this size.
const SWEEP_THRESHOLD: usize = 1024;

struct CachedSession {
    identity: Identity,
    expires_at: Instant,
}

pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, CachedSession>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Cached identity for `token_hash`, if present and not expired.
    pub async fn get(&self, token_hash: &str) -> Option<Identity> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token_hash)
            .filter(|s| s.expires_at > Instant::now())
            .map(|s| s.identity.clone())
    }

    pub async fn insert(&self, token_hash: String, identity: Identity) {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= SWEEP_THRESHOLD {
            let removed = sweep_expired(&mut sessions);
            tracing::debug!(removed, "Swept expired sessions");
        }
        sessions.insert(
            token_hash,
            CachedSession {
                identity,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Returns `true` if an entry was removed.
    pub async fn evict(&self, token_hash: &str) -> bool {
        self.sessions.write().await.remove(token_hash).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Drop every expired entry, returning how many were removed.
fn sweep_expired(sessions: &mut HashMap<String, CachedSession>) -> usize {
    let before = sessions.len();
    let now = Instant::now();
    sessions.retain(|_, s| s.expires_at > now);
    before - sessions.len()
}
