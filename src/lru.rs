//! LRU cache for text deduplication.
//!
//! A fixed-capacity recency cache: `get` promotes an entry to
//! most-recently-used, `put` evicts the least-recently-used entry once the
//! cache is full. Entries live in a slot vector linked into a doubly
//! linked recency list by index, so no entry is ever reallocated on
//! promotion.

use std::collections::HashMap;
use std::hash::Hash;

const NIL: usize = usize::MAX;

struct Slot<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// Bounded least-recently-used cache.
pub struct LruCache<K, V> {
    capacity: usize,
    map: HashMap<K, usize>,
    slots: Vec<Slot<K, V>>,
    head: usize,
    tail: usize,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A zero capacity is bumped to one so the cache stays usable.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        LruCache {
            capacity,
            map: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
        }
    }

    /// Number of entries currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Look up a key, promoting it to most-recently-used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let index = *self.map.get(key)?;
        self.promote(index);
        Some(&self.slots[index].value)
    }

    /// Insert or update a key, evicting the least-recently-used entry
    /// when the cache is full.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&index) = self.map.get(&key) {
            self.slots[index].value = value;
            self.promote(index);
            return;
        }

        let index = if self.map.len() >= self.capacity {
            // Reuse the tail slot for the new entry.
            let tail = self.tail;
            self.detach(tail);
            let evicted_key = self.slots[tail].key.clone();
            self.map.remove(&evicted_key);
            self.slots[tail].key = key.clone();
            self.slots[tail].value = value;
            tail
        } else {
            self.slots.push(Slot {
                key: key.clone(),
                value,
                prev: NIL,
                next: NIL,
            });
            self.slots.len() - 1
        };

        self.attach_front(index);
        self.map.insert(key, index);
    }

    /// Drop every entry, keeping the configured capacity.
    pub fn clear(&mut self) {
        self.map.clear();
        self.slots.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    fn promote(&mut self, index: usize) {
        if self.head == index {
            return;
        }
        self.detach(index);
        self.attach_front(index);
    }

    fn detach(&mut self, index: usize) {
        let (prev, next) = (self.slots[index].prev, self.slots[index].next);
        if prev != NIL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }
        self.slots[index].prev = NIL;
        self.slots[index].next = NIL;
    }

    fn attach_front(&mut self, index: usize) {
        self.slots[index].prev = NIL;
        self.slots[index].next = self.head;
        if self.head != NIL {
            self.slots[self.head].prev = index;
        }
        self.head = index;
        if self.tail == NIL {
            self.tail = index;
        }
    }
}
