/*
Keyed priority queue with min and max access.

Every entry is a unique key with an f64 priority. Entries are stored once in a slab and
indexed twice:
  - the key index (key -> slot) answers existence, lookup and remove-by-key,
  - the priority index ((priority, key) -> slot) answers pop-min (first) and pop-max (last).

Both indices only hold slot numbers. An entry is freed exactly once, when its slot is
removed from the slab, so the two views can never disagree about ownership.

Insert, remove, set-priority and both pops are O(log n).
*/

use log::trace;
use ordered_float::OrderedFloat;
use slab::Slab;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;
use std::mem::size_of;

pub type Priority = f64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<K> {
    pub key: K,
    pub priority: Priority,
}

/// Errors returned by [`KeyedPriorityQueue`]. No operation mutates the queue when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The key is not in the queue.
    KeyNotFound,
    /// The key is already in the queue.
    KeyAlreadyExists,
    /// Nothing to pop.
    EmptyQueue,
    /// NaN has no place in a total order.
    NanPriority,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound => write!(f, "key does not exist"),
            Self::KeyAlreadyExists => write!(f, "key already exists"),
            Self::EmptyQueue => write!(f, "queue is empty"),
            Self::NanPriority => write!(f, "priority cannot be NaN"),
        }
    }
}

impl std::error::Error for QueueError {}

type PriorityKey<K> = (OrderedFloat<Priority>, K);

#[derive(Debug, Clone)]
pub struct KeyedPriorityQueue<K> {
    entries: Slab<Entry<K>>,
    by_key: BTreeMap<K, usize>,
    by_priority: BTreeMap<PriorityKey<K>, usize>,
}

impl<K> Default for KeyedPriorityQueue<K>
where
    K: Ord + Copy + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> KeyedPriorityQueue<K>
where
    K: Ord + Copy + fmt::Debug,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Slab::with_capacity(capacity),
            by_key: BTreeMap::new(),
            by_priority: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn contains(&self, key: K) -> bool {
        self.by_key.contains_key(&key)
    }

    /// Adds `key` with `priority`.
    ///
    /// The key index is checked before anything is touched, so a duplicate leaves the queue
    /// exactly as it was.
    pub fn insert(&mut self, key: K, priority: Priority) -> Result<(), QueueError> {
        if priority.is_nan() {
            return Err(QueueError::NanPriority);
        }
        if self.by_key.contains_key(&key) {
            return Err(QueueError::KeyAlreadyExists);
        }

        let slot = self.entries.insert(Entry { key, priority });
        self.by_key.insert(key, slot);
        self.by_priority.insert((OrderedFloat(priority), key), slot);
        trace!("insert {:?} @ {}", key, priority);
        Ok(())
    }

    /// Removes `key` and hands its entry back to the caller.
    pub fn remove(&mut self, key: K) -> Result<Entry<K>, QueueError> {
        let slot = self.by_key.remove(&key).ok_or(QueueError::KeyNotFound)?;
        let entry = self.entries.remove(slot);
        let removed = self.by_priority.remove(&(OrderedFloat(entry.priority), key));
        debug_assert_eq!(removed, Some(slot), "priority index out of sync for {:?}", key);
        trace!("remove {:?} @ {}", key, entry.priority);
        Ok(entry)
    }

    pub fn get_priority(&self, key: K) -> Result<Priority, QueueError> {
        self.by_key
            .get(&key)
            .map(|&slot| self.entries[slot].priority)
            .ok_or(QueueError::KeyNotFound)
    }

    /// Moves `key` to `priority`. Done as a remove followed by an insert.
    pub fn set_priority(&mut self, key: K, priority: Priority) -> Result<(), QueueError> {
        // Validate up front: a NaN would otherwise fail the insert after the remove.
        if priority.is_nan() {
            return Err(QueueError::NanPriority);
        }
        self.remove(key)?;
        self.insert(key, priority)
    }

    pub fn peek_min(&self) -> Option<Entry<K>> {
        self.by_priority
            .first_key_value()
            .map(|(_, &slot)| self.entries[slot])
    }

    pub fn peek_max(&self) -> Option<Entry<K>> {
        self.by_priority
            .last_key_value()
            .map(|(_, &slot)| self.entries[slot])
    }

    /// Removes and returns an entry whose priority is <= every other live priority.
    /// Among equal priorities the smallest key comes out first.
    pub fn pop_min(&mut self) -> Result<Entry<K>, QueueError> {
        let key = self.peek_min().ok_or(QueueError::EmptyQueue)?.key;
        self.remove(key)
    }

    /// Removes and returns an entry whose priority is >= every other live priority.
    pub fn pop_max(&mut self) -> Result<Entry<K>, QueueError> {
        let key = self.peek_max().ok_or(QueueError::EmptyQueue)?.key;
        self.remove(key)
    }

    /// Snapshot of every entry, ascending by priority.
    pub fn serialize_by_priority(&self) -> Vec<Entry<K>> {
        self.by_priority
            .values()
            .map(|&slot| self.entries[slot])
            .collect()
    }

    /// Snapshot of every entry, ascending by key.
    pub fn serialize_by_key(&self) -> Vec<Entry<K>> {
        self.by_key.values().map(|&slot| self.entries[slot]).collect()
    }

    pub fn clear(&mut self) {
        self.by_priority.clear();
        self.by_key.clear();
        self.entries.clear();
    }

    /// Rough heap footprint in bytes. Diagnostic only.
    pub fn allocation(&self) -> usize {
        let slot = size_of::<Entry<K>>() + size_of::<usize>();
        let key_node = size_of::<K>() + size_of::<usize>();
        let priority_node = size_of::<PriorityKey<K>>() + size_of::<usize>();
        size_of::<Self>()
            + self.entries.capacity() * slot
            + self.by_key.len() * key_node
            + self.by_priority.len() * priority_node
    }

    /// One `key: priority` line per entry, in key order. The format is not stable.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for entry in self.serialize_by_key() {
            let _ = writeln!(out, "{:?}: {}", entry.key, entry.priority);
        }
        out
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        assert_eq!(self.entries.len(), self.by_key.len());
        assert_eq!(self.entries.len(), self.by_priority.len());
        for (&key, &slot) in &self.by_key {
            let entry = self.entries[slot];
            assert_eq!(entry.key, key);
            assert_eq!(
                self.by_priority.get(&(OrderedFloat(entry.priority), key)),
                Some(&slot)
            );
        }
    }
}
