//! Classic B-Tree: every node carries keys, internal nodes route by them.
//!
//! Nodes live in a [`NodeStore`] and refer to their children by [`NodeId`].
//! Each structural repair (split, borrow, merge) is carried out by a parent
//! on one of its own children while the recursive descent unwinds, so no
//! operation ever needs a parent pointer.

use std::fmt;

use ordex_core::{
    Error, IndexType, NodeId, NodeStore, OrderedIndex, Result, SearchResult, TreeConfig,
};
use tracing::{debug, trace};

/// A node of a [`BTree`].
#[derive(Debug, Clone)]
pub struct BTreeNode<K> {
    keys: Vec<K>,
    children: Vec<NodeId>,
}

impl<K> BTreeNode<K> {
    fn leaf() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    fn internal(child: NodeId) -> Self {
        Self {
            keys: Vec::new(),
            children: vec![child],
        }
    }

    /// Keys in ascending order
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child handles; empty for leaves
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns true if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// B-Tree of configurable order.
///
/// # Examples
///
/// ```
/// use ordex_btree::BTree;
///
/// let mut tree = BTree::new(4)?;
/// for key in [50, 25, 75, 10] {
///     tree.insert(key)?;
/// }
/// assert!(tree.search(&25).found);
/// tree.delete(&25)?;
/// assert_eq!(tree.keys(), vec![10, 50, 75]);
/// # Ok::<(), ordex_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BTree<K> {
    nodes: NodeStore<BTreeNode<K>>,
    root: NodeId,
    config: TreeConfig,
    len: usize,
}

impl<K: Ord + Clone + fmt::Debug> BTree<K> {
    /// Creates an empty tree of the given order.
    ///
    /// Fails with [`Error::InvalidConfig`] if `order < 3`.
    pub fn new(order: usize) -> Result<Self> {
        Self::with_config(TreeConfig::new(order))
    }

    /// Creates an empty tree from a [`TreeConfig`]
    pub fn with_config(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        let mut nodes = NodeStore::new();
        let root = nodes.alloc(BTreeNode::leaf());
        Ok(Self {
            nodes,
            root,
            config,
            len: 0,
        })
    }

    /// Maximum children per internal node
    pub fn order(&self) -> usize {
        self.config.order
    }

    /// Minimum keys per non-root node
    pub fn min_keys(&self) -> usize {
        self.config.min_keys()
    }

    /// Maximum keys per node
    pub fn max_keys(&self) -> usize {
        self.config.max_keys()
    }

    /// Handle of the root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node behind a handle, if live
    pub fn node(&self, id: NodeId) -> Option<&BTreeNode<K>> {
        self.nodes.get(id)
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of levels; a lone root leaf has height 1
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut id = self.root;
        while let Some(&child) = self.nodes[id].children.first() {
            id = child;
            height += 1;
        }
        height
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no key
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finds the node holding `key` and the key's position in it
    pub fn locate(&self, key: &K) -> Option<(NodeId, usize)> {
        let mut id = self.root;
        loop {
            let node = &self.nodes[id];
            let i = node.keys.partition_point(|k| k < key);
            if node.keys.get(i) == Some(key) {
                return Some((id, i));
            }
            if node.is_leaf() {
                return None;
            }
            id = node.children[i];
        }
    }

    /// Looks up `key`, recording every node visited from the root down.
    pub fn search(&self, key: &K) -> SearchResult<NodeId> {
        let mut path = Vec::new();
        let mut id = self.root;
        loop {
            path.push(id);
            let node = &self.nodes[id];
            let i = node.keys.partition_point(|k| k < key);
            if node.keys.get(i) == Some(key) {
                return SearchResult::new(true, path);
            }
            if node.is_leaf() {
                return SearchResult::new(false, path);
            }
            id = node.children[i];
        }
    }

    /// Inserts `key`.
    ///
    /// Returns [`Error::DuplicateKey`] and leaves the tree untouched if the
    /// key is already present.
    pub fn insert(&mut self, key: K) -> Result<()> {
        if self.locate(&key).is_some() {
            debug!(key = ?key, "b-tree insert rejected: duplicate");
            return Err(Error::DuplicateKey);
        }
        trace!(key = ?key, "b-tree insert");

        let root = self.root;
        self.insert_into(root, key);
        if self.nodes[root].keys.len() > self.max_keys() {
            let new_root = self.nodes.alloc(BTreeNode::internal(root));
            self.split_child(new_root, 0);
            self.root = new_root;
            debug!(root = %new_root, height = self.height(), "b-tree grew a level");
        }
        self.len += 1;
        Ok(())
    }

    fn insert_into(&mut self, id: NodeId, key: K) {
        let node = &mut self.nodes[id];
        let i = node.keys.partition_point(|k| k < &key);
        if node.is_leaf() {
            node.keys.insert(i, key);
            return;
        }
        let child = node.children[i];
        self.insert_into(child, key);
        if self.nodes[child].keys.len() > self.max_keys() {
            self.split_child(id, i);
        }
    }

    /// Splits `parent.children[index]` around its median key.
    ///
    /// The child keeps the keys before `mid = (order - 1) / 2`, the key at
    /// `mid` moves up into `parent.keys[index]`, and a new right sibling
    /// takes everything after it.
    fn split_child(&mut self, parent: NodeId, index: usize) {
        let child = self.nodes[parent].children[index];
        let mid = (self.order() - 1) / 2;

        let node = &mut self.nodes[child];
        let mut upper = node.keys.split_off(mid);
        let promoted = upper.remove(0);
        let children = if node.is_leaf() {
            Vec::new()
        } else {
            node.children.split_off(mid + 1)
        };
        debug!(node = %child, promoted = ?promoted, "b-tree split");

        let sibling = self.nodes.alloc(BTreeNode {
            keys: upper,
            children,
        });
        let parent_node = &mut self.nodes[parent];
        parent_node.keys.insert(index, promoted);
        parent_node.children.insert(index + 1, sibling);
    }

    /// Removes `key`.
    ///
    /// Returns [`Error::KeyNotFound`] and leaves the tree untouched if the
    /// key is absent.
    pub fn delete(&mut self, key: &K) -> Result<()> {
        if self.locate(key).is_none() {
            debug!(key = ?key, "b-tree delete rejected: not found");
            return Err(Error::KeyNotFound);
        }
        trace!(key = ?key, "b-tree delete");

        let root = self.root;
        self.remove_from(root, key);
        self.shrink_root();
        self.len -= 1;
        Ok(())
    }

    fn remove_from(&mut self, id: NodeId, key: &K) {
        let node = &self.nodes[id];
        let i = node.keys.partition_point(|k| k < key);
        let hit = node.keys.get(i) == Some(key);

        if node.is_leaf() {
            if hit {
                self.nodes[id].keys.remove(i);
            }
            return;
        }
        if hit {
            self.remove_internal(id, key, i);
        } else {
            let child = node.children[i];
            self.remove_from(child, key);
            self.rebalance(id, i);
        }
    }

    /// Removes `keys[index]` from internal node `id`.
    fn remove_internal(&mut self, id: NodeId, key: &K, index: usize) {
        let min = self.min_keys();
        let (left, right) = self.adjacent(id, index);
        let left_len = self.nodes[left].keys.len();
        let right_len = self.nodes[right].keys.len();

        if left_len <= min && right_len > min {
            let successor = self.first_key(right);
            self.nodes[id].keys[index] = successor.clone();
            self.remove_from(right, &successor);
            self.rebalance(id, index + 1);
        } else if left_len <= min && left_len + right_len < self.max_keys() {
            self.merge(id, index);
            self.remove_from(left, key);
            self.rebalance(id, index);
        } else {
            // Spare keys on the left, or an odd order where merging two
            // minimal children would overflow.
            let predecessor = self.last_key(left);
            self.nodes[id].keys[index] = predecessor.clone();
            self.remove_from(left, &predecessor);
            self.rebalance(id, index);
        }
    }

    /// Restores the fill bound of `parent.children[ci]` after a removal.
    fn rebalance(&mut self, parent: NodeId, ci: usize) {
        let min = self.min_keys();
        let children = &self.nodes[parent].children;
        if self.nodes[children[ci]].keys.len() >= min {
            return;
        }
        let left = ci.checked_sub(1).map(|i| children[i]);
        let right = children.get(ci + 1).copied();
        let spare = |id: NodeId| self.nodes[id].keys.len() > min;

        if left.is_some_and(spare) {
            self.borrow_from_left(parent, ci);
        } else if right.is_some_and(spare) {
            self.borrow_from_right(parent, ci);
        } else if left.is_some() {
            self.merge(parent, ci - 1);
        } else if right.is_some() {
            self.merge(parent, ci);
        }
    }

    fn borrow_from_left(&mut self, parent: NodeId, ci: usize) {
        let (left, child) = self.adjacent(parent, ci - 1);
        let (left_node, child_node) = self.nodes.pair_mut(left, child);
        let Some(up) = left_node.keys.pop() else {
            return;
        };
        if let Some(grandchild) = left_node.children.pop() {
            child_node.children.insert(0, grandchild);
        }
        let down = std::mem::replace(&mut self.nodes[parent].keys[ci - 1], up);
        self.nodes[child].keys.insert(0, down);
        debug!(node = %child, from = %left, "b-tree borrow from left sibling");
    }

    fn borrow_from_right(&mut self, parent: NodeId, ci: usize) {
        let (child, right) = self.adjacent(parent, ci);
        let (child_node, right_node) = self.nodes.pair_mut(child, right);
        if right_node.keys.is_empty() {
            return;
        }
        let up = right_node.keys.remove(0);
        if !right_node.children.is_empty() {
            child_node.children.push(right_node.children.remove(0));
        }
        let down = std::mem::replace(&mut self.nodes[parent].keys[ci], up);
        self.nodes[child].keys.push(down);
        debug!(node = %child, from = %right, "b-tree borrow from right sibling");
    }

    /// Folds `children[index + 1]` and the separating key into `children[index]`.
    fn merge(&mut self, parent: NodeId, index: usize) {
        let (left, right) = self.adjacent(parent, index);
        let right_node = self.nodes.take(right);
        let parent_node = &mut self.nodes[parent];
        let separator = parent_node.keys.remove(index);
        parent_node.children.remove(index + 1);

        let left_node = &mut self.nodes[left];
        left_node.keys.push(separator);
        left_node.keys.extend(right_node.keys);
        left_node.children.extend(right_node.children);
        debug!(node = %left, absorbed = %right, "b-tree merge");
    }

    fn shrink_root(&mut self) {
        let root = &self.nodes[self.root];
        if root.keys.is_empty() && !root.is_leaf() {
            let child = root.children[0];
            self.nodes.release(self.root);
            debug!(root = %child, "b-tree lost a level");
            self.root = child;
        }
    }

    fn adjacent(&self, parent: NodeId, index: usize) -> (NodeId, NodeId) {
        let children = &self.nodes[parent].children;
        (children[index], children[index + 1])
    }

    fn first_key(&self, mut id: NodeId) -> K {
        while let Some(&child) = self.nodes[id].children.first() {
            id = child;
        }
        self.nodes[id].keys[0].clone()
    }

    fn last_key(&self, mut id: NodeId) -> K {
        while let Some(&child) = self.nodes[id].children.last() {
            id = child;
        }
        let keys = &self.nodes[id].keys;
        keys[keys.len() - 1].clone()
    }

    /// All keys in ascending order (in-order traversal)
    pub fn keys(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.len);
        self.collect_in_order(self.root, &mut out);
        out
    }

    fn collect_in_order(&self, id: NodeId, out: &mut Vec<K>) {
        let node = &self.nodes[id];
        if node.is_leaf() {
            out.extend(node.keys.iter().cloned());
            return;
        }
        for (key, &child) in node.keys.iter().zip(&node.children) {
            self.collect_in_order(child, out);
            out.push(key.clone());
        }
        self.collect_in_order(node.children[node.keys.len()], out);
    }

    /// Drops every key, keeping the order
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(BTreeNode::leaf());
        self.len = 0;
    }
}

impl<K: Ord + Clone + fmt::Debug> OrderedIndex<K> for BTree<K> {
    type Trace = NodeId;

    fn insert(&mut self, key: K) -> Result<()> {
        BTree::insert(self, key)
    }

    fn search(&self, key: &K) -> SearchResult<NodeId> {
        BTree::search(self, key)
    }

    fn delete(&mut self, key: &K) -> Result<()> {
        BTree::delete(self, key)
    }

    fn keys(&self) -> Vec<K> {
        BTree::keys(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        BTree::clear(self)
    }

    fn index_type(&self) -> IndexType {
        IndexType::BTree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(order: usize, keys: &[u32]) -> BTree<u32> {
        let mut tree = BTree::new(order).unwrap();
        for &k in keys {
            tree.insert(k).unwrap();
        }
        tree
    }

    #[test]
    fn test_btree_rejects_small_order() {
        assert!(matches!(
            BTree::<u32>::new(2),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_btree_empty() {
        let tree = BTree::<u32>::new(4).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        let result = tree.search(&1);
        assert!(!result.found);
        assert_eq!(result.path, vec![tree.root()]);
    }

    #[test]
    fn test_btree_demo_sequence() {
        let mut tree = build(4, &[50, 25, 75, 10, 30, 60, 90, 5, 15]);

        assert!(tree.height() >= 2);
        assert_eq!(tree.keys(), vec![5, 10, 15, 25, 30, 50, 60, 75, 90]);
        assert!(tree.search(&30).found);
        assert!(!tree.search(&99).found);

        tree.delete(&25).unwrap();
        assert!(!tree.search(&25).found);
        assert_eq!(tree.delete(&25), Err(Error::KeyNotFound));
        assert_eq!(tree.len(), 8);
    }

    #[test]
    fn test_btree_root_split_shape() {
        let tree = build(4, &[50, 25, 75, 10]);
        let root = tree.node(tree.root()).unwrap();
        assert_eq!(root.keys(), &[25]);
        let left = tree.node(root.children()[0]).unwrap();
        let right = tree.node(root.children()[1]).unwrap();
        assert_eq!(left.keys(), &[10]);
        assert_eq!(right.keys(), &[50, 75]);
    }

    #[test]
    fn test_btree_search_path_ends_at_holder() {
        let tree = build(4, &[50, 25, 75, 10, 30, 60, 90, 5, 15]);
        let result = tree.search(&60);
        assert!(result.found);
        assert_eq!(result.path.first(), Some(&tree.root()));
        let (holder, _) = tree.locate(&60).unwrap();
        assert_eq!(result.path.last(), Some(&holder));
    }

    #[test]
    fn test_btree_duplicate_is_noop() {
        let mut tree = build(3, &[1, 2, 3, 4, 5]);
        let before = tree.keys();
        let nodes = tree.node_count();
        assert_eq!(tree.insert(3), Err(Error::DuplicateKey));
        assert_eq!(tree.keys(), before);
        assert_eq!(tree.node_count(), nodes);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_btree_delete_internal_key() {
        let mut tree = build(4, &(1..=30).collect::<Vec<_>>());
        let root_key = tree.node(tree.root()).unwrap().keys()[0];
        tree.delete(&root_key).unwrap();
        assert!(!tree.search(&root_key).found);
        let expected: Vec<u32> = (1..=30).filter(|&k| k != root_key).collect();
        assert_eq!(tree.keys(), expected);
    }

    #[test]
    fn test_btree_delete_everything_shrinks() {
        for order in 3..=6 {
            let keys: Vec<u32> = (1..=40).collect();
            let mut tree = build(order, &keys);
            assert!(tree.height() > 1);
            for k in keys.iter().rev() {
                tree.delete(k).unwrap();
            }
            assert!(tree.is_empty());
            assert_eq!(tree.height(), 1);
            assert_eq!(tree.node_count(), 1);
        }
    }

    fn reachable(tree: &BTree<u32>, id: NodeId) -> usize {
        let node = tree.node(id).unwrap();
        1 + node
            .children()
            .iter()
            .map(|&c| reachable(tree, c))
            .sum::<usize>()
    }

    #[test]
    fn test_btree_merges_leave_no_orphans() {
        for order in 3..=5 {
            let mut tree = build(order, &(1..=60).collect::<Vec<_>>());
            let mut merged = false;
            // alternate ends so merges happen on both sides
            for i in 0..30u32 {
                let before = tree.node_count();
                tree.delete(&(i + 1)).unwrap();
                tree.delete(&(60 - i)).unwrap();
                merged |= tree.node_count() < before;
                assert_eq!(tree.node_count(), reachable(&tree, tree.root()));
            }
            assert!(merged, "order {} never merged", order);
            assert_eq!(tree.node_count(), 1);
        }
    }

    #[test]
    fn test_btree_clear() {
        let mut tree = build(5, &[3, 1, 4, 5, 9, 2, 6]);
        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.keys().is_empty());
        tree.insert(7).unwrap();
        assert_eq!(tree.keys(), vec![7]);
    }

    #[test]
    fn test_btree_trait_object_contract() {
        let mut tree = BTree::new(4).unwrap();
        let index: &mut dyn OrderedIndex<u32, Trace = NodeId> = &mut tree;
        index.insert(10).unwrap();
        assert!(index.contains(&10));
        assert_eq!(index.index_type(), IndexType::BTree);
        index.delete(&10).unwrap();
        assert!(index.is_empty());
    }
}
