//! Bounded memo of transform results keyed by file identity and content hash.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_CACHE_CAPACITY: usize = 500;

/// Lowercase hex SHA-256 of `text`.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Cache key for `text` as seen in the file `id`.
pub fn cache_key(id: &str, text: &str) -> String {
    format!("{}:{}", id, content_hash(text))
}

struct Slot {
    value: String,
    tick: u64,
}

/// Least-recently-used map with a fixed capacity.
///
/// Recency is tracked with a monotonically increasing tick; `order` maps each
/// live tick back to its key so the oldest entry is always `order`'s first.
pub struct ContentCache {
    entries: HashMap<String, Slot>,
    order: BTreeMap<u64, String>,
    capacity: usize,
    next_tick: u64,
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl ContentCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            capacity,
            next_tick: 0,
        }
    }

    /// Looks up `key` and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let tick = self.bump();
        let slot = self.entries.get_mut(key)?;
        self.order.remove(&slot.tick);
        slot.tick = tick;
        self.order.insert(tick, key.to_string());
        Some(slot.value.clone())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let tick = self.bump();

        if let Some(previous) = self.entries.insert(
            key.clone(),
            Slot {
                value: value.into(),
                tick,
            },
        ) {
            self.order.remove(&previous.tick);
        }
        self.order.insert(tick, key);

        while self.entries.len() > self.capacity {
            let Some((_, oldest)) = self.order.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    /// Membership test that leaves recency untouched.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn bump(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }
}
