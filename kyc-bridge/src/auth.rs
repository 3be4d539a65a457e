//! Session-token cache for vendors that require a login exchange.

use std::{fmt, sync::RwLock};

use tracing::debug;

/// Per-adapter cache of the vendor session token.
///
/// One writer at a time; readers observe either the previous or the new
/// token. A poisoned lock is treated as an empty cache, which only costs
/// one extra login.
#[derive(Default)]
pub struct TokenCache {
    token: RwLock<Option<String>>,
}

impl TokenCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token, if any.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    /// Stores a freshly issued token.
    pub fn store(&self, token: impl Into<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.into());
        }
    }

    /// Drops the cached token so the next call logs in again.
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.token.write()
            && guard.take().is_some()
        {
            debug!("session token invalidated");
        }
    }

    /// Returns true when a token is cached.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.token.read().is_ok_and(|guard| guard.is_some())
    }
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache").field("cached", &self.is_cached()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    #[test]
    fn test_store_and_invalidate() {
        let cache = TokenCache::new();
        assert_eq!(cache.get(), None);

        cache.store("abc");
        assert_eq!(cache.get().as_deref(), Some("abc"));

        cache.invalidate();
        assert!(!cache.is_cached());
    }

    #[test]
    fn test_debug_hides_token() {
        let cache = TokenCache::new();
        cache.store("super-secret");
        let debug = format!("{cache:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("cached: true"));
    }

    #[test]
    fn test_concurrent_readers_see_old_or_new_token() {
        let cache = Arc::new(TokenCache::new());
        cache.store("old");

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get())
            })
            .collect();
        cache.store("new");

        for reader in readers {
            let seen = reader.join().unwrap();
            assert!(matches!(seen.as_deref(), Some("old" | "new")));
        }
    }
}
