/// Server-held session store
///
/// Sessions bind an opaque token (delivered to the client in an HTTP-only
/// cookie) to the authenticated email for a fixed TTL. The store is an
/// explicit injected dependency of request handling rather than ambient
/// state, behind the [`SessionStore`] trait so it can later be backed by an
/// external cache without touching the routes.
///
/// # Example
///
/// ```
/// use gestor_shared::auth::session::{MemorySessionStore, SessionStore};
/// use std::time::Duration;
///
/// # async fn example() {
/// let store = MemorySessionStore::new(Duration::from_secs(3600));
///
/// let token = store.create("user@example.com").await;
/// assert_eq!(store.resolve(&token).await.as_deref(), Some("user@example.com"));
///
/// store.destroy(&token).await;
/// assert!(store.resolve(&token).await.is_none());
/// # }
/// ```

use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Length of a session token (characters)
const TOKEN_LENGTH: usize = 32;

/// Session store interface
///
/// Implementations must persist the session before `create` returns so a
/// login response never references a session the next request cannot resolve.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a new session bound to `email` and returns its opaque token
    async fn create(&self, email: &str) -> String;

    /// Resolves a token to the email it was bound to
    ///
    /// Returns `None` for unknown or expired tokens.
    async fn resolve(&self, token: &str) -> Option<String>;

    /// Destroys the session for `token`
    ///
    /// Idempotent: destroying an unknown token is not an error.
    async fn destroy(&self, token: &str);
}

struct SessionEntry {
    email: String,
    expires_at: Instant,
}

/// In-memory session store with per-session TTL
///
/// Expired entries are dropped lazily on resolve. The map is the only shared
/// mutable in-process state of the server, guarded by a mutex.
pub struct MemorySessionStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, SessionEntry>>,
}

impl MemorySessionStore {
    /// Creates a store whose sessions expire `ttl` after creation
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Generates a random base62 session token
    ///
    /// Token space: 62^32, generated from the thread-local CSPRNG.
    fn generate_token() -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();

        (0..TOKEN_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, email: &str) -> String {
        let token = Self::generate_token();
        let entry = SessionEntry {
            email: email.to_string(),
            expires_at: Instant::now() + self.ttl,
        };

        self.entries.lock().unwrap().insert(token.clone(), entry);
        token
    }

    async fn resolve(&self, token: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();

        match entries.get(token) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.email.clone()),
            Some(_) => {
                // Expired: drop the entry so the map does not grow unbounded
                entries.remove(token);
                None
            }
            None => None,
        }
    }

    async fn destroy(&self, token: &str) {
        self.entries.lock().unwrap().remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_resolve() {
        let store = MemorySessionStore::new(Duration::from_secs(3600));

        let token = store.create("a@x.com").await;
        assert_eq!(store.resolve(&token).await.as_deref(), Some("a@x.com"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_token() {
        let store = MemorySessionStore::new(Duration::from_secs(3600));
        assert!(store.resolve("nao_existe").await.is_none());
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let store = MemorySessionStore::new(Duration::from_secs(3600));

        let token = store.create("a@x.com").await;
        store.destroy(&token).await;
        assert!(store.resolve(&token).await.is_none());

        // Destroying again must not panic or error
        store.destroy(&token).await;
    }

    #[tokio::test]
    async fn test_expired_session_is_not_resolved() {
        let store = MemorySessionStore::new(Duration::ZERO);

        let token = store.create("a@x.com").await;
        assert!(store.resolve(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = MemorySessionStore::new(Duration::from_secs(3600));

        let token_a = store.create("a@x.com").await;
        let token_b = store.create("b@x.com").await;

        store.destroy(&token_a).await;

        assert!(store.resolve(&token_a).await.is_none());
        assert_eq!(store.resolve(&token_b).await.as_deref(), Some("b@x.com"));
    }

    #[test]
    fn test_token_format() {
        let token = MemorySessionStore::generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = MemorySessionStore::generate_token();
        let b = MemorySessionStore::generate_token();
        assert_ne!(a, b);
    }
}
