//! B+-Tree: records live only in leaves, and the leaves form a sorted chain.
//!
//! Internal keys are copies of leaf keys used for routing. A key equal to a
//! separator routes right, so `children[i]` holds keys in
//! `[keys[i - 1], keys[i])`. The chain link `next` is a plain [`NodeId`];
//! the parent/child edges remain the only ownership path.

use std::fmt;

use ordex_core::{
    Error, IndexType, NodeId, NodeStore, OrderedIndex, RangeIndex, Result, SearchResult,
    TreeConfig,
};
use tracing::{debug, trace};

/// A node of a [`BPlusTree`].
#[derive(Debug, Clone)]
pub struct BPlusNode<K> {
    keys: Vec<K>,
    children: Vec<NodeId>,
    next: Option<NodeId>,
}

impl<K> BPlusNode<K> {
    fn leaf(keys: Vec<K>, next: Option<NodeId>) -> Self {
        Self {
            keys,
            children: Vec::new(),
            next,
        }
    }

    /// Keys in ascending order; for leaves these are the stored records
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child handles; empty for leaves
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Next leaf in key order; always `None` for internal nodes
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// Returns true if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// B+-Tree of configurable order with a linked leaf level.
///
/// # Examples
///
/// ```
/// use ordex_btree::BPlusTree;
///
/// let mut tree = BPlusTree::new(4)?;
/// for key in (10..=90).step_by(10) {
///     tree.insert(key)?;
/// }
/// assert_eq!(tree.range_query(&25, &65), vec![30, 40, 50, 60]);
/// # Ok::<(), ordex_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BPlusTree<K> {
    nodes: NodeStore<BPlusNode<K>>,
    root: NodeId,
    config: TreeConfig,
    len: usize,
}

impl<K: Ord + Clone + fmt::Debug> BPlusTree<K> {
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
        let root = nodes.alloc(BPlusNode::leaf(Vec::new(), None));
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
    pub fn node(&self, id: NodeId) -> Option<&BPlusNode<K>> {
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

    fn child_index(node: &BPlusNode<K>, key: &K) -> usize {
        node.keys.partition_point(|k| k <= key)
    }

    /// Leaf whose key span covers `key`
    pub fn find_leaf(&self, key: &K) -> NodeId {
        let mut id = self.root;
        loop {
            let node = &self.nodes[id];
            if node.is_leaf() {
                return id;
            }
            id = node.children[Self::child_index(node, key)];
        }
    }

    fn leftmost_leaf(&self) -> NodeId {
        let mut id = self.root;
        while let Some(&child) = self.nodes[id].children.first() {
            id = child;
        }
        id
    }

    /// Leaf handles in chain order, starting from the leftmost leaf
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = Some(self.leftmost_leaf());
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.nodes[id].next;
        }
        out
    }

    /// Looks up `key`, recording every node visited from the root to a leaf.
    pub fn search(&self, key: &K) -> SearchResult<NodeId> {
        let mut path = Vec::new();
        let mut id = self.root;
        loop {
            path.push(id);
            let node = &self.nodes[id];
            if node.is_leaf() {
                let found = node.keys.binary_search(key).is_ok();
                return SearchResult::new(found, path);
            }
            id = node.children[Self::child_index(node, key)];
        }
    }

    /// Returns true if `key` is stored
    pub fn contains(&self, key: &K) -> bool {
        self.nodes[self.find_leaf(key)]
            .keys
            .binary_search(key)
            .is_ok()
    }

    /// Inserts `key`.
    ///
    /// Returns [`Error::DuplicateKey`] and leaves the tree untouched if the
    /// key is already present.
    pub fn insert(&mut self, key: K) -> Result<()> {
        if self.contains(&key) {
            debug!(key = ?key, "b+tree insert rejected: duplicate");
            return Err(Error::DuplicateKey);
        }
        trace!(key = ?key, "b+tree insert");

        let root = self.root;
        self.insert_into(root, key);
        if self.nodes[root].keys.len() > self.max_keys() {
            let new_root = self.nodes.alloc(BPlusNode {
                keys: Vec::new(),
                children: vec![root],
                next: None,
            });
            self.split_child(new_root, 0);
            self.root = new_root;
            debug!(root = %new_root, height = self.height(), "b+tree grew a level");
        }
        self.len += 1;
        Ok(())
    }

    fn insert_into(&mut self, id: NodeId, key: K) {
        let node = &mut self.nodes[id];
        if node.is_leaf() {
            let i = node.keys.partition_point(|k| k < &key);
            node.keys.insert(i, key);
            return;
        }
        let i = Self::child_index(node, &key);
        let child = node.children[i];
        self.insert_into(child, key);
        if self.nodes[child].keys.len() > self.max_keys() {
            self.split_child(id, i);
        }
    }

    fn split_child(&mut self, parent: NodeId, index: usize) {
        let child = self.nodes[parent].children[index];
        let (separator, sibling) = if self.nodes[child].is_leaf() {
            self.split_leaf(child)
        } else {
            self.split_internal(child)
        };
        let parent_node = &mut self.nodes[parent];
        parent_node.keys.insert(index, separator);
        parent_node.children.insert(index + 1, sibling);
    }

    /// Moves the upper half of `leaf` into a new leaf spliced in after it.
    /// The new leaf's first key is copied up as the separator.
    fn split_leaf(&mut self, leaf: NodeId) -> (K, NodeId) {
        let node = &mut self.nodes[leaf];
        let mid = node.keys.len() / 2;
        let upper = node.keys.split_off(mid);
        let separator = upper[0].clone();
        let next = node.next;

        let sibling = self.nodes.alloc(BPlusNode::leaf(upper, next));
        self.nodes[leaf].next = Some(sibling);
        debug!(leaf = %leaf, sibling = %sibling, separator = ?separator, "b+tree leaf split");
        (separator, sibling)
    }

    /// Splits an internal node at `(order - 1) / 2`; the median moves up.
    fn split_internal(&mut self, id: NodeId) -> (K, NodeId) {
        let mid = (self.order() - 1) / 2;
        let node = &mut self.nodes[id];
        let mut upper = node.keys.split_off(mid);
        let separator = upper.remove(0);
        let children = node.children.split_off(mid + 1);

        let sibling = self.nodes.alloc(BPlusNode {
            keys: upper,
            children,
            next: None,
        });
        debug!(node = %id, sibling = %sibling, separator = ?separator, "b+tree internal split");
        (separator, sibling)
    }

    /// Removes `key`.
    ///
    /// Returns [`Error::KeyNotFound`] and leaves the tree untouched if the
    /// key is absent.
    pub fn delete(&mut self, key: &K) -> Result<()> {
        if !self.contains(key) {
            debug!(key = ?key, "b+tree delete rejected: not found");
            return Err(Error::KeyNotFound);
        }
        trace!(key = ?key, "b+tree delete");

        let root = self.root;
        self.remove_from(root, key);
        self.shrink_root();
        self.len -= 1;
        Ok(())
    }

    fn remove_from(&mut self, id: NodeId, key: &K) {
        let node = &mut self.nodes[id];
        if node.is_leaf() {
            if let Ok(i) = node.keys.binary_search(key) {
                node.keys.remove(i);
            }
            return;
        }
        let i = Self::child_index(node, key);
        let child = node.children[i];
        self.remove_from(child, key);
        self.rebalance(id, i);
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
        let Some(moved) = left_node.keys.pop() else {
            return;
        };

        if child_node.is_leaf() {
            child_node.keys.insert(0, moved.clone());
            self.nodes[parent].keys[ci - 1] = moved;
        } else {
            if let Some(grandchild) = left_node.children.pop() {
                child_node.children.insert(0, grandchild);
            }
            let down = std::mem::replace(&mut self.nodes[parent].keys[ci - 1], moved);
            self.nodes[child].keys.insert(0, down);
        }
        debug!(node = %child, from = %left, "b+tree borrow from left sibling");
    }

    fn borrow_from_right(&mut self, parent: NodeId, ci: usize) {
        let (child, right) = self.adjacent(parent, ci);
        let (child_node, right_node) = self.nodes.pair_mut(child, right);
        let moved = right_node.keys.remove(0);

        if child_node.is_leaf() {
            child_node.keys.push(moved);
            let separator = right_node.keys[0].clone();
            self.nodes[parent].keys[ci] = separator;
        } else {
            child_node.children.push(right_node.children.remove(0));
            let down = std::mem::replace(&mut self.nodes[parent].keys[ci], moved);
            self.nodes[child].keys.push(down);
        }
        debug!(node = %child, from = %right, "b+tree borrow from right sibling");
    }

    /// Folds `children[index + 1]` into `children[index]`. Leaves splice the
    /// chain past the absorbed leaf; internal nodes pull the separator down.
    fn merge(&mut self, parent: NodeId, index: usize) {
        let (left, right) = self.adjacent(parent, index);
        let right_node = self.nodes.take(right);
        let parent_node = &mut self.nodes[parent];
        let separator = parent_node.keys.remove(index);
        parent_node.children.remove(index + 1);

        let left_node = &mut self.nodes[left];
        if left_node.is_leaf() {
            left_node.keys.extend(right_node.keys);
            left_node.next = right_node.next;
        } else {
            left_node.keys.push(separator);
            left_node.keys.extend(right_node.keys);
            left_node.children.extend(right_node.children);
        }
        debug!(node = %left, absorbed = %right, "b+tree merge");
    }

    fn shrink_root(&mut self) {
        let root = &self.nodes[self.root];
        if root.keys.is_empty() && !root.is_leaf() {
            let child = root.children[0];
            self.nodes.release(self.root);
            debug!(root = %child, "b+tree lost a level");
            self.root = child;
        }
    }

    fn adjacent(&self, parent: NodeId, index: usize) -> (NodeId, NodeId) {
        let children = &self.nodes[parent].children;
        (children[index], children[index + 1])
    }

    /// Iterates over keys in `[start, end]` by walking the leaf chain.
    ///
    /// One descent locates the first leaf; the walk stops at the first key
    /// past `end`.
    pub fn range<'a>(&'a self, start: &K, end: &'a K) -> Range<'a, K> {
        if start > end {
            return Range {
                nodes: &self.nodes,
                leaf: None,
                pos: 0,
                end: Some(end),
            };
        }
        let leaf = self.find_leaf(start);
        let pos = self.nodes[leaf].keys.partition_point(|k| k < start);
        Range {
            nodes: &self.nodes,
            leaf: Some(leaf),
            pos,
            end: Some(end),
        }
    }

    /// Keys in `[start, end]`, ascending. Empty when `start > end`.
    pub fn range_query(&self, start: &K, end: &K) -> Vec<K> {
        let out: Vec<K> = self.range(start, end).cloned().collect();
        trace!(start = ?start, end = ?end, hits = out.len(), "b+tree range query");
        out
    }

    /// Iterates over every key along the leaf chain
    pub fn iter(&self) -> Range<'_, K> {
        Range {
            nodes: &self.nodes,
            leaf: Some(self.leftmost_leaf()),
            pos: 0,
            end: None,
        }
    }

    /// All keys in ascending order
    pub fn keys(&self) -> Vec<K> {
        self.iter().cloned().collect()
    }

    /// Drops every key, keeping the order
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(BPlusNode::leaf(Vec::new(), None));
        self.len = 0;
    }
}

/// Iterator over a stretch of the leaf chain.
#[derive(Debug, Clone)]
pub struct Range<'a, K> {
    nodes: &'a NodeStore<BPlusNode<K>>,
    leaf: Option<NodeId>,
    pos: usize,
    end: Option<&'a K>,
}

impl<'a, K: Ord> Iterator for Range<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let nodes = self.nodes;
        loop {
            let node = &nodes[self.leaf?];
            match node.keys.get(self.pos) {
                Some(key) => {
                    if self.end.is_some_and(|end| key > end) {
                        self.leaf = None;
                        return None;
                    }
                    self.pos += 1;
                    return Some(key);
                }
                None => {
                    self.leaf = node.next;
                    self.pos = 0;
                }
            }
        }
    }
}

impl<K: Ord + Clone + fmt::Debug> OrderedIndex<K> for BPlusTree<K> {
    type Trace = NodeId;

    fn insert(&mut self, key: K) -> Result<()> {
        BPlusTree::insert(self, key)
    }

    fn search(&self, key: &K) -> SearchResult<NodeId> {
        BPlusTree::search(self, key)
    }

    fn delete(&mut self, key: &K) -> Result<()> {
        BPlusTree::delete(self, key)
    }

    fn keys(&self) -> Vec<K> {
        BPlusTree::keys(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        BPlusTree::clear(self)
    }

    fn index_type(&self) -> IndexType {
        IndexType::BPlusTree
    }

    fn contains(&self, key: &K) -> bool {
        BPlusTree::contains(self, key)
    }
}

impl<K: Ord + Clone + fmt::Debug> RangeIndex<K> for BPlusTree<K> {
    fn range_query(&self, start: &K, end: &K) -> Vec<K> {
        BPlusTree::range_query(self, start, end)
    }
}
