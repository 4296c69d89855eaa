//! Node arena shared by the index engines.
//!
//! Every engine keeps its nodes in a [`NodeStore`] and links them with
//! [`NodeId`] handles instead of references. Splits, merges and borrows then
//! only move handles between vectors, and a released slot is recycled by the
//! next allocation.

use std::ops::{Index, IndexMut};

/// Stable handle to a node inside a [`NodeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Slot index of this handle
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena owning all nodes of one structure.
#[derive(Debug, Clone)]
pub struct NodeStore<N> {
    slots: Vec<Option<N>>,
    free: Vec<NodeId>,
    live: usize,
}

impl<N> NodeStore<N> {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Stores `node` and returns its handle, reusing a released slot if any.
    pub fn alloc(&mut self, node: N) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Removes the node behind `id`, returning it.
    ///
    /// Returns `None` if the slot is already vacant.
    pub fn release(&mut self, id: NodeId) -> Option<N> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id);
        self.live -= 1;
        Some(node)
    }

    /// Removes the node behind `id`, returning it.
    ///
    /// # Panics
    ///
    /// Panics if the slot is vacant, like indexing with a dangling handle.
    pub fn take(&mut self, id: NodeId) -> N {
        match self.release(id) {
            Some(node) => node,
            None => panic!("dangling node handle {}", id),
        }
    }

    /// Returns the node behind `id`, if it is live
    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Returns the node behind `id` mutably, if it is live
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Returns true if `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Mutable access to two distinct live nodes at once.
    ///
    /// # Panics
    ///
    /// Panics if `a == b` or either handle is vacant. Engines only call this
    /// with sibling handles read from the same parent.
    pub fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut N, &mut N) {
        assert_ne!(a, b, "pair_mut requires distinct nodes");
        let (lo, hi, swapped) = if a.0 < b.0 {
            (a.0, b.0, false)
        } else {
            (b.0, a.0, true)
        };
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo].as_mut().expect("vacant node slot");
        let second = tail[0].as_mut().expect("vacant node slot");
        if swapped {
            (second, first)
        } else {
            (first, second)
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns true if no node is live
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drops every node and forgets all handles
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

impl<N> Default for NodeStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Index<NodeId> for NodeStore<N> {
    type Output = N;

    fn index(&self, id: NodeId) -> &N {
        match self.get(id) {
            Some(node) => node,
            None => panic!("dangling node handle {}", id),
        }
    }
}

impl<N> IndexMut<NodeId> for NodeStore<N> {
    fn index_mut(&mut self, id: NodeId) -> &mut N {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("dangling node handle {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_alloc_and_get() {
        let mut store = NodeStore::new();
        let a = store.alloc("a");
        let b = store.alloc("b");

        assert_ne!(a, b);
        assert_eq!(store[a], "a");
        assert_eq!(store.get(b), Some(&"b"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_release_reuses_slot() {
        let mut store = NodeStore::new();
        let a = store.alloc(1);
        let _b = store.alloc(2);

        assert_eq!(store.release(a), Some(1));
        assert!(!store.contains(a));
        assert_eq!(store.release(a), None);
        assert_eq!(store.len(), 1);

        let c = store.alloc(3);
        assert_eq!(c, a);
        assert_eq!(store[c], 3);
    }

    #[test]
    fn test_store_pair_mut_both_orders() {
        let mut store = NodeStore::new();
        let a = store.alloc(vec![1]);
        let b = store.alloc(vec![2]);

        {
            let (x, y) = store.pair_mut(b, a);
            x.push(20);
            y.push(10);
        }
        assert_eq!(store[a], vec![1, 10]);
        assert_eq!(store[b], vec![2, 20]);
    }

    #[test]
    #[should_panic(expected = "distinct")]
    fn test_store_pair_mut_same_handle() {
        let mut store = NodeStore::new();
        let a = store.alloc(0);
        let _ = store.pair_mut(a, a);
    }

    #[test]
    fn test_store_take_frees_slot() {
        let mut store = NodeStore::new();
        let a = store.alloc('a');
        let b = store.alloc('b');

        assert_eq!(store.take(b), 'b');
        assert!(!store.contains(b));
        assert_eq!(store.len(), 1);
        assert_eq!(store.alloc('c'), b);

        store.clear();
        assert!(store.is_empty());
        assert!(!store.contains(a));
    }

    #[test]
    #[should_panic(expected = "dangling node handle")]
    fn test_store_take_vacant_slot() {
        let mut store = NodeStore::new();
        let a = store.alloc(1);
        store.release(a);
        let _ = store.take(a);
    }
}
