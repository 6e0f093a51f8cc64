//! Append-only typed storage for signals and cells.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::Index;

/// An ID that names a slot in an [`Arena`].
pub trait ArenaId: Copy {
    /// The ID of slot `slot`.
    fn at_slot(slot: usize) -> Self;

    /// The slot this ID names.
    fn slot(self) -> usize;
}

/// Items addressed by the ID they were allocated under.
///
/// Nothing is ever removed, so an ID handed out by one module builder stays
/// valid in the [`Module`](crate::Module) it finishes into.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arena<I: ArenaId, T> {
    items: Vec<T>,
    #[serde(skip)]
    ids: PhantomData<fn() -> I>,
}

impl<I: ArenaId, T> Arena<I, T> {
    /// An empty arena.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            ids: PhantomData,
        }
    }

    /// Stores the item `make` builds from its own ID and returns that ID.
    pub fn alloc_with(&mut self, make: impl FnOnce(I) -> T) -> I {
        let id = I::at_slot(self.items.len());
        let item = make(id);
        self.items.push(item);
        id
    }

    /// The item behind `id`, if it was allocated here.
    pub fn get(&self, id: I) -> Option<&T> {
        self.items.get(id.slot())
    }

    /// Number of items allocated.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` before the first allocation.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in allocation order.
    pub fn values(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        &self.items[id.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{CellId, SignalId};

    #[test]
    fn items_see_their_own_id() {
        let mut arena: Arena<SignalId, (SignalId, &str)> = Arena::new();
        let a = arena.alloc_with(|id| (id, "a"));
        let b = arena.alloc_with(|id| (id, "b"));
        assert_eq!(arena[a], (a, "a"));
        assert_eq!(arena[b].0, SignalId::from_raw(1));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn unknown_ids_are_absent() {
        let arena: Arena<CellId, u8> = Arena::default();
        assert!(arena.is_empty());
        assert_eq!(arena.get(CellId::from_raw(3)), None);
    }

    #[test]
    fn serializes_as_the_item_list() {
        let mut arena: Arena<SignalId, char> = Arena::new();
        for c in "xyz".chars() {
            arena.alloc_with(|_| c);
        }
        let json = serde_json::to_string(&arena).unwrap();
        assert_eq!(json, r#"["x","y","z"]"#);
        let back: Arena<SignalId, char> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.values().collect::<String>(), "xyz");
    }
}
