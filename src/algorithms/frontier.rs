use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::algorithms::key::Key;
use crate::cell::Cell;

#[derive(Clone, Copy, Debug)]
pub struct QueueEntry {
    pub key: Key,
    pub cell: Cell,
    stamp: f64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap behavior; equal keys pop in cell order
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

/// Open list of possibly inconsistent cells.
///
/// A cell may sit in the heap several times. The stamp map remembers the key
/// of its latest push, and anything else is dropped when it surfaces.
#[derive(Clone, Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<QueueEntry>,
    stamps: FxHashMap<Cell, f64>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `cell` under `key`, superseding any earlier push of it.
    pub fn push(&mut self, cell: Cell, key: Key) {
        let stamp = key.stamp();
        self.stamps.insert(cell, stamp);
        self.heap.push(QueueEntry { key, cell, stamp });
    }

    fn is_current(&self, entry: &QueueEntry) -> bool {
        self.stamps.get(&entry.cell) == Some(&entry.stamp)
    }

    /// Whether `cell` has a live entry.
    pub fn contains(&self, cell: Cell) -> bool {
        self.stamps.contains_key(&cell)
    }

    /// Drops the live entry for `cell`; its heap copies go stale.
    pub fn forget(&mut self, cell: Cell) {
        self.stamps.remove(&cell);
    }

    fn discard_stale(&mut self) {
        while let Some(top) = self.heap.peek() {
            if self.is_current(top) {
                break;
            }
            self.heap.pop();
        }
    }

    /// Key of the smallest live entry.
    pub fn top_key(&mut self) -> Option<Key> {
        self.discard_stale();
        self.heap.peek().map(|entry| entry.key)
    }

    /// Removes the smallest live entry.
    pub fn pop(&mut self) -> Option<(Cell, Key)> {
        self.discard_stale();
        let entry = self.heap.pop()?;
        self.stamps.remove(&entry.cell);
        Some((entry.cell, entry.key))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Live entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.heap.iter().filter(|entry| self.is_current(entry))
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.stamps.clear();
    }
}
