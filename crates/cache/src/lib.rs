//! In-memory correlation cache binding delivered result messages to the
//! payloads needed when their inline controls are activated later.
//!
//! Entries are written once under a fresh random correlation id and either
//! consumed once (`take`, apply-fix) or read non-destructively (`get`,
//! summarize). Every entry carries a TTL; expired entries are dropped lazily
//! on access and swept on insert, so the store stays bounded under sustained
//! use.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use {
    rand::{Rng, distr::Alphanumeric},
    tracing::debug,
};

use voxrelay_common::{ChatRef, MessageId};

/// Length of a correlation id. 12 alphanumeric characters give a 62^12 id
/// space; collisions among live entries are handled by re-rolling anyway.
pub const CORRELATION_ID_LEN: usize = 12;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// What kind of payload an entry holds, which decides the follow-up action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Corrected text waiting to be written back into the origin message.
    TextFix,
    /// A transcript that may later be summarized.
    Transcript,
}

/// One pending result payload.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub kind: EntryKind,
    pub payload_text: String,
    pub origin_chat: ChatRef,
    pub origin_message: MessageId,
    pub origin_link: Option<String>,
}

struct StoredEntry {
    entry: CacheEntry,
    expires_at: Instant,
}

/// Correlation store. Interior mutability behind a std mutex: every operation
/// is a synchronous map access, never held across an await point.
pub struct ResultCache {
    inner: Mutex<HashMap<String, StoredEntry>>,
    ttl: Duration,
}

impl ResultCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Insert an entry under a freshly generated correlation id and return
    /// the id. Expired entries are swept as a side effect.
    pub fn put(&self, entry: CacheEntry) -> String {
        let now = Instant::now();
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.retain(|_, stored| now < stored.expires_at);

        let mut id = generate_correlation_id();
        // A live id is never reused; re-roll on the (practically impossible)
        // collision instead of clobbering.
        while map.contains_key(&id) {
            id = generate_correlation_id();
        }

        debug!(correlation_id = %id, kind = ?entry.kind, live = map.len() + 1, "cache put");
        map.insert(id.clone(), StoredEntry {
            entry,
            expires_at: now + self.ttl,
        });
        id
    }

    /// Non-destructive lookup. Returns `None` for unknown or expired ids.
    pub fn get(&self, id: &str) -> Option<CacheEntry> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let expired = map
            .get(id)
            .is_some_and(|stored| Instant::now() >= stored.expires_at);
        if expired {
            map.remove(id);
            return None;
        }
        map.get(id).map(|stored| stored.entry.clone())
    }

    /// Destructive lookup: the single-use read for apply-fix actions. The
    /// lookup and the delete are one critical section, so two concurrent
    /// activations of the same token cannot both succeed.
    pub fn take(&self, id: &str) -> Option<CacheEntry> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let stored = map.remove(id)?;
        if Instant::now() >= stored.expires_at {
            return None;
        }
        Some(stored.entry)
    }

    /// Re-insert an entry under its original id, with a fresh TTL. Used when
    /// the side effect after a `take` failed and the operator should be able
    /// to retry.
    pub fn restore(&self, id: &str, entry: CacheEntry) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(id.to_string(), StoredEntry {
            entry,
            expires_at: Instant::now() + self.ttl,
        });
    }

    /// Number of live (possibly expired but unswept) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

fn generate_correlation_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CORRELATION_ID_LEN)
        .map(char::from)
        .collect()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn entry(kind: EntryKind, text: &str) -> CacheEntry {
        CacheEntry {
            kind,
            payload_text: text.to_string(),
            origin_chat: ChatRef(-1001234567890),
            origin_message: MessageId(7),
            origin_link: Some("https://t.me/c/1234567890/7".into()),
        }
    }

    #[test]
    fn put_then_get_returns_payload() {
        let cache = ResultCache::default();
        let id = cache.put(entry(EntryKind::Transcript, "hello world"));
        assert_eq!(id.len(), CORRELATION_ID_LEN);
        let got = cache.get(&id).unwrap();
        assert_eq!(got.payload_text, "hello world");
        assert_eq!(got.kind, EntryKind::Transcript);
        // get is non-destructive
        assert!(cache.get(&id).is_some());
    }

    #[test]
    fn take_is_single_use() {
        let cache = ResultCache::default();
        let id = cache.put(entry(EntryKind::TextFix, "Fixed."));
        assert!(cache.take(&id).is_some());
        assert!(cache.take(&id).is_none());
        assert!(cache.get(&id).is_none());
    }

    #[test]
    fn restore_revives_taken_entry() {
        let cache = ResultCache::default();
        let id = cache.put(entry(EntryKind::TextFix, "Fixed."));
        let taken = cache.take(&id).unwrap();
        cache.restore(&id, taken);
        assert_eq!(cache.get(&id).unwrap().payload_text, "Fixed.");
    }

    #[test]
    fn ids_are_unique_across_many_allocations() {
        let cache = ResultCache::default();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let id = cache.put(entry(EntryKind::Transcript, "t"));
            assert!(seen.insert(id), "correlation id repeated");
        }
        assert_eq!(cache.len(), 10_000);
    }

    #[test]
    fn ids_are_alphanumeric() {
        let cache = ResultCache::default();
        let id = cache.put(entry(EntryKind::Transcript, "t"));
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn expired_entries_are_invisible() {
        let cache = ResultCache::new(Duration::ZERO);
        let id = cache.put(entry(EntryKind::Transcript, "t"));
        assert!(cache.get(&id).is_none());
        let id2 = cache.put(entry(EntryKind::TextFix, "t"));
        assert!(cache.take(&id2).is_none());
    }

    #[test]
    fn put_sweeps_expired_entries() {
        let cache = ResultCache::new(Duration::ZERO);
        for _ in 0..50 {
            cache.put(entry(EntryKind::Transcript, "t"));
        }
        // Each put retains only unexpired entries, then inserts its own.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unknown_id_misses() {
        let cache = ResultCache::default();
        assert!(cache.get("nope").is_none());
        assert!(cache.take("nope").is_none());
    }
}
