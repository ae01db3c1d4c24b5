//! Hash index from caller-chosen ids to dense array slots.
//!
//! Collision strategy is chaining: the bucket for an id is `id % capacity` and each bucket holds
//! a small vec of `(id, slot)` pairs. The index tracks the largest id ever inserted so callers
//! can hand out fresh ids without scanning.

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct IdIndex {
    buckets: Vec<Vec<(usize, usize)>>,
    len: usize,
    max_id: Option<usize>,
}

impl Default for IdIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl IdIndex {
    pub const DEFAULT_CAPACITY: usize = 16;

    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); Self::DEFAULT_CAPACITY],
            len: 0,
            max_id: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        Ok(Self {
            buckets: vec![Vec::new(); capacity],
            len: 0,
            max_id: None,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Largest id ever inserted, `None` while nothing has been inserted. Removals do not lower
    /// this; it only resets on `clear`.
    pub fn max_id(&self) -> Option<usize> {
        self.max_id
    }

    /// Inserts or updates the slot for `id`.
    pub fn set(&mut self, id: usize, slot: usize) {
        if self.len >= self.buckets.len() {
            // Keep the load factor at or below 1 so chains stay short.
            let doubled = self.buckets.len() * 2;
            let _ = self.resize(doubled);
        }
        let idx = id % self.buckets.len();
        let bucket = &mut self.buckets[idx];
        if let Some(entry) = bucket.iter_mut().find(|(entry_id, _)| *entry_id == id) {
            entry.1 = slot;
            return;
        }
        bucket.push((id, slot));
        self.len += 1;
        self.max_id = Some(self.max_id.map_or(id, |m| m.max(id)));
    }

    pub fn get(&self, id: usize) -> Option<usize> {
        self.buckets[id % self.buckets.len()]
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|&(_, slot)| slot)
    }

    pub fn has(&self, id: usize) -> bool {
        self.get(id).is_some()
    }

    /// Removes `id`, returning the slot it mapped to.
    pub fn remove(&mut self, id: usize) -> Option<usize> {
        let idx = id % self.buckets.len();
        let bucket = &mut self.buckets[idx];
        let pos = bucket.iter().position(|(entry_id, _)| *entry_id == id)?;
        let (_, slot) = bucket.swap_remove(pos);
        self.len -= 1;
        Some(slot)
    }

    /// Rehashes every entry into `capacity` buckets.
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        let mut buckets: Vec<Vec<(usize, usize)>> = vec![Vec::new(); capacity];
        for bucket in self.buckets.drain(..) {
            for (id, slot) in bucket {
                buckets[id % capacity].push((id, slot));
            }
        }
        self.buckets = buckets;
        Ok(())
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
        self.max_id = None;
    }
}
