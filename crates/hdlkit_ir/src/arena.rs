//! Generic arena for dense, ID-indexed storage of design-model nodes.
//!
//! The [`Arena`] provides O(1) insertion and lookup by opaque [`ArenaId`] keys.
//! Trees stored in an arena refer to each other by ID, so parent and sibling
//! links never form ownership cycles.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Trait for opaque ID types used as arena keys.
///
/// Implementors must provide a bijection between `u32` indices and the ID type.
pub trait ArenaId: Copy {
    /// Creates an ID from a raw `u32` index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw `u32` index.
    fn as_raw(self) -> u32;
}

/// A dense, ID-indexed container.
///
/// Items are appended and never reordered. The only removal is
/// [`Arena::truncate`], which drops the most recent allocations and is used to
/// discard the nodes of an abandoned speculative build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<I: ArenaId, T> {
    items: Vec<T>,
    #[serde(skip)]
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates a new, empty arena.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Allocates a new item and returns its ID.
    pub fn alloc(&mut self, item: T) -> I {
        let id = self.next_id();
        self.items.push(item);
        id
    }

    /// Allocates an item that needs to know its own ID.
    pub fn alloc_with(&mut self, f: impl FnOnce(I) -> T) -> I {
        let id = self.next_id();
        self.items.push(f(id));
        id
    }

    /// Returns the ID the next allocation will receive.
    pub fn next_id(&self) -> I {
        I::from_raw(self.items.len() as u32)
    }

    /// Drops every item allocated at or after `len`.
    ///
    /// IDs handed out for the dropped items become dangling.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Returns a reference to the item with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get(&self, id: I) -> &T {
        &self.items[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the item with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.as_raw() as usize]
    }

    /// Returns the number of items in the arena.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the arena contains no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over `(ID, &T)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_raw(i as u32), item))
    }

    /// Iterates over references to items in allocation order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{IntfId, SignalId};

    #[test]
    fn alloc_and_get() {
        let mut arena: Arena<SignalId, String> = Arena::new();
        let id = arena.alloc("clk".to_string());
        assert_eq!(arena[id], "clk");
    }

    #[test]
    fn alloc_with_sees_own_id() {
        let mut arena: Arena<SignalId, (SignalId, &str)> = Arena::new();
        arena.alloc((SignalId::from_raw(0), "first"));
        let id = arena.alloc_with(|id| (id, "second"));
        assert_eq!(arena[id].0, id);
        assert_eq!(id.as_raw(), 1);
    }

    #[test]
    fn truncate_discards_tail() {
        let mut arena: Arena<IntfId, u32> = Arena::new();
        arena.alloc(1);
        let mark = arena.len();
        arena.alloc(2);
        arena.alloc(3);
        arena.truncate(mark);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.next_id(), IntfId::from_raw(1));
    }

    #[test]
    fn get_mut_modifies() {
        let mut arena: Arena<SignalId, String> = Arena::new();
        let id = arena.alloc("original".to_string());
        *arena.get_mut(id) = "modified".to_string();
        assert_eq!(arena[id], "modified");
    }

    #[test]
    fn iter_pairs_ids_in_order() {
        let mut arena: Arena<SignalId, u32> = Arena::new();
        arena.alloc(100);
        arena.alloc(200);
        let pairs: Vec<(u32, u32)> = arena.iter().map(|(id, v)| (id.as_raw(), *v)).collect();
        assert_eq!(pairs, vec![(0, 100), (1, 200)]);
        assert!(!arena.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let mut arena: Arena<SignalId, String> = Arena::new();
        arena.alloc("first".to_string());
        arena.alloc("second".to_string());
        let json = serde_json::to_string(&arena).unwrap();
        let restored: Arena<SignalId, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[SignalId::from_raw(1)], "second");
    }
}
