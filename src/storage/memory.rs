// src/storage/memory.rs
use dashmap::DashMap;
use log::debug;
use std::io;
use std::sync::atomic::{ AtomicU64, Ordering };
use std::time::{ Duration, Instant };
use super::KeyValueStore;

// Expired entries are swept once every this many writes.
const PURGE_EVERY: u64 = 256;

/// In-process store. Backs session keys, which do not outlive the process and
/// expire `ttl` after their last write.
#[derive(Debug)]
pub struct MemoryStore {
    entries: DashMap<(String, String), (String, Instant)>,
    ttl: Duration,
    writes: AtomicU64,
}

impl MemoryStore {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(30 * 60))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            writes: AtomicU64::new(0),
        }
    }

    /// Drops every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, (_, written)| written.elapsed() < ttl);
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            debug!("Purged {} expired session entries", purged);
        }
        purged
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, visitor: &str, key: &str) -> Option<String> {
        let id = (visitor.to_string(), key.to_string());
        let expired = match self.entries.get(&id) {
            Some(entry) if entry.1.elapsed() < self.ttl => {
                return Some(entry.0.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove_if(&id, |_, (_, written)| written.elapsed() >= self.ttl);
        }
        None
    }

    fn set(&self, visitor: &str, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert((visitor.to_string(), key.to_string()), (value.to_string(), Instant::now()));
        if self.writes.fetch_add(1, Ordering::Relaxed) % PURGE_EVERY == PURGE_EVERY - 1 {
            self.purge_expired();
        }
        Ok(())
    }
}
