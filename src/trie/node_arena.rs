//! An index-based arena for trie nodes.
//!
//! Nodes are addressed by stable [`NodeId`]s instead of references, so the
//! tree can be mutated in place without aliasing. Freed slots go on a
//! free-list and are handed out again by later allocations.

use std::ops::{Index, IndexMut};

/// Stable handle to a slot in a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

enum Slot<T> {
    Occupied(T),
    Vacant,
}

/// A growable arena that reuses freed slots before growing.
pub(crate) struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<NodeId>,
    /// Slots beyond this count are never created.
    limit: usize,
}

impl<T> NodeArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        NodeArena {
            slots: Vec::new(),
            free_list: Vec::new(),
            limit: usize::MAX,
        }
    }

    /// Creates an arena whose first slot holds `first`.
    pub fn with_first(first: T) -> (Self, NodeId) {
        let mut arena = Self::new();
        arena.slots.push(Slot::Occupied(first));
        (arena, NodeId(0))
    }

    /// Stores a value and returns its handle, reusing a freed slot if one exists.
    ///
    /// Returns `None` once every `u32` index is taken.
    pub fn alloc(&mut self, value: T) -> Option<NodeId> {
        if let Some(id) = self.free_list.pop() {
            self.slots[id.index()] = Slot::Occupied(value);
            return Some(id);
        }
        if self.slots.len() >= self.limit {
            return None;
        }
        let id = NodeId(u32::try_from(self.slots.len()).ok()?);
        self.slots.push(Slot::Occupied(value));
        Some(id)
    }

    /// Caps the number of slots, so exhaustion can be exercised without 2^32 nodes.
    #[cfg(test)]
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    /// Removes the value behind `id` and puts the slot on the free-list.
    ///
    /// Returns `None` if the slot was already vacant.
    pub fn free(&mut self, id: NodeId) -> Option<T> {
        let slot = self.slots.get_mut(id.index())?;
        match std::mem::replace(slot, Slot::Vacant) {
            Slot::Occupied(value) => {
                self.free_list.push(id);
                Some(value)
            }
            Slot::Vacant => None,
        }
    }

    /// Returns the value behind `id`, or `None` if the slot is vacant.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live values.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Returns the number of slots ever allocated, live or free.
    #[cfg(test)]
    pub fn capacity_used(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of slots waiting on the free-list.
    #[cfg(test)]
    pub fn free_len(&self) -> usize {
        self.free_list.len()
    }
}

impl<T> Index<NodeId> for NodeArena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: NodeId) -> &T {
        self.get(id).expect("stale node id")
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        self.get_mut(id).expect("stale node id")
    }
}
