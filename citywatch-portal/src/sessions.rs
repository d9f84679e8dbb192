//! In-memory admin session store
//!
//! Sessions are opaque tokens mapped to expiry timestamps. The store is
//! process-local: restarting the portal logs every admin out, which is the
//! right failure mode for a single shared credential.

use chrono::{DateTime, Duration, Utc};
use citywatch_common::auth::generate_session_token;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh session token valid for `ttl_seconds`
    pub async fn issue(&self, ttl_seconds: i64) -> String {
        let token = generate_session_token();
        let expires_at = Utc::now() + Duration::seconds(ttl_seconds);

        let mut sessions = self.inner.write().await;
        // Expired entries accumulate only until the next issue
        sessions.retain(|_, expiry| *expiry > Utc::now());
        sessions.insert(token.clone(), expires_at);

        token
    }

    /// Whether a token identifies a live session
    pub async fn validate(&self, token: &str) -> bool {
        let sessions = self.inner.read().await;
        sessions
            .get(token)
            .map_or(false, |expiry| *expiry > Utc::now())
    }

    /// Drop a session (logout)
    pub async fn revoke(&self, token: &str) {
        self.inner.write().await.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issued_token_validates() {
        let store = SessionStore::new();
        let token = store.issue(3600).await;
        assert!(store.validate(&token).await);
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let store = SessionStore::new();
        store.issue(3600).await;
        assert!(!store.validate("not-a-token").await);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let store = SessionStore::new();
        let token = store.issue(-1).await; // already expired
        assert!(!store.validate(&token).await);
    }

    #[tokio::test]
    async fn test_revoked_token_rejected() {
        let store = SessionStore::new();
        let token = store.issue(3600).await;
        store.revoke(&token).await;
        assert!(!store.validate(&token).await);
    }
}
