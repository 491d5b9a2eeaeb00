//! Open-chained hash table mapping stored element hashes to list positions.
//!
//! The table never sees elements, only their hashes: callers resolve equality
//! through a closure over the position a candidate entry points at, mirroring
//! how the dense item array and this index stay in sync.

const NIL: usize = usize::MAX;

/// One slot of the entry arena.
///
/// `next` is dual-use: for a live slot it threads the bucket chain, for a freed
/// slot it threads the free list. A freed slot is marked by `index == NIL`.
#[derive(Debug, Clone, Copy)]
struct Entry {
    hash: u64,
    next: usize,
    index: usize,
}

/// Hash index over positions `0..len` of a dense array.
///
/// `buckets.len()` is the table capacity, always zero or a power of two, so
/// `hash & (capacity - 1)` selects a chain head. Freed slots are recycled
/// before the arena grows, which bounds `entries` by the peak live count.
#[derive(Debug, Clone)]
pub struct BucketTable {
    buckets: Vec<usize>,
    entries: Vec<Entry>,
    free_head: usize,
    free_count: usize,
}

impl Default for BucketTable {
    fn default() -> Self {
        BucketTable {
            buckets: Vec::new(),
            entries: Vec::new(),
            free_head: NIL,
            free_count: 0,
        }
    }
}

impl BucketTable {
    pub fn with_capacity(capacity: usize) -> Self {
        let buckets = if capacity == 0 {
            Vec::new()
        } else {
            vec![NIL; capacity.next_power_of_two()]
        };
        BucketTable {
            entries: Vec::with_capacity(buckets.len().min(capacity)),
            buckets,
            free_head: NIL,
            free_count: 0,
        }
    }
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }
    pub fn len(&self) -> usize {
        self.entries.len() - self.free_count
    }
    /// Returns the position recorded for the entry matching `hash` and `eq`.
    pub fn find(&self, hash: u64, mut eq: impl FnMut(usize) -> bool) -> Option<usize> {
        if self.buckets.is_empty() {
            return None;
        }
        let mut slot = self.buckets[hash as usize & (self.buckets.len() - 1)];
        while slot != NIL {
            let entry = self.entries[slot];
            if entry.hash == hash && eq(entry.index) {
                return Some(entry.index);
            }
            slot = entry.next;
        }
        None
    }
    /// Records `index` under `hash`, prepending the slot to its bucket chain.
    ///
    /// The caller must have established that no equal element is present and
    /// that `len() < capacity()`.
    pub fn insert(&mut self, hash: u64, index: usize) {
        debug_assert!(self.len() < self.capacity());
        let slot = if self.free_head != NIL {
            let slot = self.free_head;
            self.free_head = self.entries[slot].next;
            self.free_count -= 1;
            slot
        } else {
            self.entries.push(Entry {
                hash: 0,
                next: NIL,
                index: NIL,
            });
            self.entries.len() - 1
        };
        let bucket = hash as usize & (self.buckets.len() - 1);
        self.entries[slot] = Entry {
            hash,
            next: self.buckets[bucket],
            index,
        };
        self.buckets[bucket] = slot;
    }
    /// Unlinks the entry matching `hash` and `eq`, pushes its slot onto the
    /// free list and returns the position it recorded.
    pub fn remove(&mut self, hash: u64, mut eq: impl FnMut(usize) -> bool) -> Option<usize> {
        if self.buckets.is_empty() {
            return None;
        }
        let bucket = hash as usize & (self.buckets.len() - 1);
        let mut prev = NIL;
        let mut slot = self.buckets[bucket];
        while slot != NIL {
            let entry = self.entries[slot];
            if entry.hash == hash && eq(entry.index) {
                if prev == NIL {
                    self.buckets[bucket] = entry.next;
                } else {
                    self.entries[prev].next = entry.next;
                }
                self.entries[slot] = Entry {
                    hash: 0,
                    next: self.free_head,
                    index: NIL,
                };
                self.free_head = slot;
                self.free_count += 1;
                return Some(entry.index);
            }
            prev = slot;
            slot = entry.next;
        }
        None
    }
    /// Shifts every recorded position at or after `from` up by `by`.
    pub fn shift_up(&mut self, from: usize, by: usize) {
        for entry in &mut self.entries {
            if entry.index != NIL && entry.index >= from {
                entry.index += by;
            }
        }
    }
    /// Shifts every recorded position at or after `from` down by `by`.
    pub fn shift_down(&mut self, from: usize, by: usize) {
        for entry in &mut self.entries {
            if entry.index != NIL && entry.index >= from {
                entry.index -= by;
            }
        }
    }
    /// Grows the bucket array to the next power of two holding `min_capacity`
    /// and relinks every live entry from its stored hash.
    ///
    /// Positions at or after `gap_start` are moved up by `gap_len` in the same
    /// pass, so absorbing a batch insert costs a single sweep; plain growth
    /// passes `gap_len == 0`. The free list is left untouched.
    pub fn grow(&mut self, min_capacity: usize, gap_start: usize, gap_len: usize) {
        let capacity = min_capacity.next_power_of_two().max(2);
        self.buckets.clear();
        self.buckets.resize(capacity, NIL);
        let mask = capacity - 1;
        for slot in 0..self.entries.len() {
            let entry = &mut self.entries[slot];
            if entry.index == NIL {
                continue;
            }
            if entry.index >= gap_start {
                entry.index += gap_len;
            }
            let bucket = entry.hash as usize & mask;
            entry.next = self.buckets[bucket];
            self.buckets[bucket] = slot;
        }
    }
    /// Drops every entry but keeps the allocated buckets and arena.
    pub fn clear(&mut self) {
        self.buckets.fill(NIL);
        self.entries.clear();
        self.free_head = NIL;
        self.free_count = 0;
    }
    /// High-water mark of the slot arena.
    #[cfg(test)]
    pub fn arena_len(&self) -> usize {
        self.entries.len()
    }
    #[cfg(test)]
    pub fn check(&self, len: usize, hash_of: impl Fn(usize) -> u64) {
        assert_eq!(self.len(), len);
        assert!(self.capacity() == 0 || self.capacity().is_power_of_two());
        assert!(self.capacity() >= self.entries.len());
        let mut free = 0;
        let mut slot = self.free_head;
        while slot != NIL {
            assert_eq!(self.entries[slot].index, NIL);
            free += 1;
            slot = self.entries[slot].next;
        }
        assert_eq!(free, self.free_count);
        let mut positions = vec![false; len];
        for (bucket, &head) in self.buckets.iter().enumerate() {
            let mut slot = head;
            while slot != NIL {
                let entry = self.entries[slot];
                assert_ne!(entry.index, NIL);
                assert_eq!(entry.hash as usize & (self.buckets.len() - 1), bucket);
                assert_eq!(entry.hash, hash_of(entry.index));
                assert!(!std::mem::replace(&mut positions[entry.index], true));
                slot = entry.next;
            }
        }
        assert!(positions.into_iter().all(|seen| seen));
    }
}
