//! Session cache: a short-lived "already helped" veto per author/channel.
//!
//! Keyed by `(author_id, channel_id)` with a fixed TTL; holds nothing but a
//! timestamp. Process-wide, in-memory only: a restart makes everyone
//! eligible again. Marking is a single critical section so two
//! near-simultaneous analyses of the same key cannot both emit a
//! notification.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

type SessionKey = (u64, u64);

/// Time-bounded record of who has already been helped where.
pub struct SessionCache {
    entries: Mutex<HashMap<SessionKey, Instant>>,
    ttl: Duration,
}

impl SessionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Cheap read gate: should a message from this author/channel be
    /// analyzed at all?
    pub fn should_process(&self, author_id: u64, channel_id: u64) -> bool {
        let entries = self.entries.lock().expect("session cache poisoned");
        match entries.get(&(author_id, channel_id)) {
            Some(marked) => marked.elapsed() >= self.ttl,
            None => true,
        }
    }

    /// Atomic check-and-mark, called right before a notification is
    /// emitted. Returns false if another analysis marked this key first
    /// within the cool-down window.
    pub fn try_mark(&self, author_id: u64, channel_id: u64) -> bool {
        let mut entries = self.entries.lock().expect("session cache poisoned");

        entries.retain(|_, marked| marked.elapsed() < self.ttl);

        let key = (author_id, channel_id);
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, Instant::now());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_key_is_processed() {
        let cache = SessionCache::new(Duration::from_secs(300));
        assert!(cache.should_process(1, 2));
    }

    #[test]
    fn test_marked_key_is_vetoed() {
        let cache = SessionCache::new(Duration::from_secs(300));
        assert!(cache.try_mark(1, 2));
        assert!(!cache.should_process(1, 2));
        assert!(!cache.try_mark(1, 2));
    }

    #[test]
    fn test_keys_are_independent() {
        let cache = SessionCache::new(Duration::from_secs(300));
        assert!(cache.try_mark(1, 2));
        assert!(cache.should_process(1, 3));
        assert!(cache.should_process(9, 2));
    }

    #[test]
    fn test_expired_entry_is_eligible_again() {
        let cache = SessionCache::new(Duration::ZERO);
        assert!(cache.try_mark(1, 2));
        assert!(cache.should_process(1, 2));
        assert!(cache.try_mark(1, 2));
    }
}
