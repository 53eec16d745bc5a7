//! In-memory credential store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::CredentialStore;

struct Slot {
    value: String,
    expires_at: Instant,
}

impl Slot {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// Mutex-guarded map with per-entry expiry.
///
/// Expiry is lazy: entries past their deadline are dropped when touched, so
/// an expired key is indistinguishable from one that was never written. All
/// operations take the lock once, which makes `set_if_absent` and
/// `get_and_delete` atomic with respect to each other.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Slot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let slot = Slot {
            value: value.to_string(),
            expires_at: now + ttl,
        };

        match entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired(now) {
                    occupied.insert(slot);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(slot);
                true
            }
        }
    }

    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        match entries.get(key) {
            Some(slot) if !slot.is_expired(now) => Some(slot.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn get_and_delete(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let slot = entries.remove(key)?;
        if slot.is_expired(now) {
            return None;
        }
        Some(slot.value)
    }

    async fn exists(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        match entries.get(key) {
            Some(slot) if !slot.is_expired(now) => true,
            Some(_) => {
                entries.remove(key);
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);
    const SHORT_TTL: Duration = Duration::from_millis(20);

    #[tokio::test]
    async fn set_if_absent_rejects_live_key() {
        let store = MemoryStore::new();

        assert!(store.set_if_absent("k", "first", TTL).await);
        assert!(!store.set_if_absent("k", "second", TTL).await);

        // The losing write must not have replaced the value.
        assert_eq!(store.get("k").await.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn set_if_absent_succeeds_after_expiry() {
        let store = MemoryStore::new();

        assert!(store.set_if_absent("k", "first", SHORT_TTL).await);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(store.set_if_absent("k", "second", TTL).await);
        assert_eq!(store.get("k").await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn get_and_delete_removes_the_value() {
        let store = MemoryStore::new();
        store.set_if_absent("k", "v", TTL).await;

        assert_eq!(store.get_and_delete("k").await.as_deref(), Some("v"));
        assert_eq!(store.get_and_delete("k").await, None);
        assert!(!store.exists("k").await);
    }

    #[tokio::test]
    async fn expired_value_reads_as_absent_everywhere() {
        let store = MemoryStore::new();
        store.set_if_absent("k", "v", SHORT_TTL).await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(!store.exists("k").await);
        assert_eq!(store.get("k").await, None);
        assert_eq!(store.get_and_delete("k").await, None);
    }

    #[tokio::test]
    async fn concurrent_get_and_delete_yields_one_winner() {
        let store = std::sync::Arc::new(MemoryStore::new());
        store.set_if_absent("k", "v", TTL).await;

        let (a, b) = tokio::join!(store.get_and_delete("k"), store.get_and_delete("k"));
        let winners = usize::from(a.is_some()) + usize::from(b.is_some());
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let store = MemoryStore::new();
        store.set_if_absent("a", "1", TTL).await;
        store.set_if_absent("b", "2", TTL).await;

        assert_eq!(store.get_and_delete("a").await.as_deref(), Some("1"));
        assert_eq!(store.get("b").await.as_deref(), Some("2"));
    }
}
