// Structural checks shared by the tree integration tests

use std::collections::BTreeSet;

use ordex_btree::{BPlusTree, BTree};
use ordex_core::NodeId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Walks a B-Tree and panics on the first broken invariant.
pub fn check_btree(tree: &BTree<u32>) {
    let mut leaf_depth = None;
    let keys = walk_btree(tree, tree.root(), None, None, 1, &mut leaf_depth);
    assert!(keys.windows(2).all(|w| w[0] < w[1]), "keys out of order");
    assert_eq!(keys.len(), tree.len());
    assert_eq!(leaf_depth.unwrap_or(1), tree.height());
    let reachable = count_nodes(tree.root(), &|id| tree.node(id).unwrap().children().to_vec());
    assert_eq!(reachable, tree.node_count(), "arena holds unreachable nodes");
}

fn walk_btree(
    tree: &BTree<u32>,
    id: NodeId,
    lower: Option<u32>,
    upper: Option<u32>,
    depth: usize,
    leaf_depth: &mut Option<usize>,
) -> Vec<u32> {
    let node = tree.node(id).expect("dangling child");
    let keys = node.keys();
    check_fill(id == tree.root(), keys.len(), tree.min_keys(), tree.max_keys());
    check_bounds(keys, lower, upper);

    if node.is_leaf() {
        check_depth(leaf_depth, depth);
        return keys.to_vec();
    }
    assert_eq!(node.children().len(), keys.len() + 1, "child count at {}", id);

    let mut out = Vec::new();
    for (i, &child) in node.children().iter().enumerate() {
        let lo = if i == 0 { lower } else { Some(keys[i - 1]) };
        let hi = keys.get(i).copied().or(upper);
        out.extend(walk_btree(tree, child, lo, hi, depth + 1, leaf_depth));
        if let Some(&k) = keys.get(i) {
            out.push(k);
        }
    }
    out
}

/// Walks a B+-Tree and its leaf chain and panics on the first broken
/// invariant.
pub fn check_bplus(tree: &BPlusTree<u32>) {
    let mut leaf_depth = None;
    let mut leaves = Vec::new();
    walk_bplus(tree, tree.root(), None, None, 1, &mut leaf_depth, &mut leaves);
    assert_eq!(leaf_depth.unwrap_or(1), tree.height());

    assert_eq!(tree.leaves(), leaves, "leaf chain differs from tree order");
    let last = *leaves.last().expect("no leaves");
    assert_eq!(tree.node(last).unwrap().next(), None, "chain not terminated");

    let chained: Vec<u32> = leaves
        .iter()
        .flat_map(|&id| tree.node(id).unwrap().keys().to_vec())
        .collect();
    assert!(chained.windows(2).all(|w| w[0] < w[1]), "keys out of order");
    assert_eq!(chained.len(), tree.len());
    let reachable = count_nodes(tree.root(), &|id| tree.node(id).unwrap().children().to_vec());
    assert_eq!(reachable, tree.node_count(), "arena holds unreachable nodes");
}

fn count_nodes(id: NodeId, children: &dyn Fn(NodeId) -> Vec<NodeId>) -> usize {
    1 + children(id)
        .into_iter()
        .map(|c| count_nodes(c, children))
        .sum::<usize>()
}

fn walk_bplus(
    tree: &BPlusTree<u32>,
    id: NodeId,
    lower: Option<u32>,
    upper: Option<u32>,
    depth: usize,
    leaf_depth: &mut Option<usize>,
    leaves: &mut Vec<NodeId>,
) {
    let node = tree.node(id).expect("dangling child");
    let keys = node.keys();
    check_fill(id == tree.root(), keys.len(), tree.min_keys(), tree.max_keys());

    if node.is_leaf() {
        check_depth(leaf_depth, depth);
        // leaf keys sit in [lower, upper)
        if let (Some(lo), Some(&first)) = (lower, keys.first()) {
            assert!(first >= lo, "leaf key {} below separator {}", first, lo);
        }
        if let (Some(hi), Some(&last)) = (upper, keys.last()) {
            assert!(last < hi, "leaf key {} not below separator {}", last, hi);
        }
        leaves.push(id);
        return;
    }
    assert!(node.next().is_none(), "internal node {} is chained", id);
    assert_eq!(node.children().len(), keys.len() + 1, "child count at {}", id);
    assert!(keys.windows(2).all(|w| w[0] < w[1]));

    for (i, &child) in node.children().iter().enumerate() {
        let lo = if i == 0 { lower } else { Some(keys[i - 1]) };
        let hi = keys.get(i).copied().or(upper);
        walk_bplus(tree, child, lo, hi, depth + 1, leaf_depth, leaves);
    }
}

fn check_fill(is_root: bool, len: usize, min: usize, max: usize) {
    assert!(len <= max, "node holds {} keys, max is {}", len, max);
    if !is_root {
        assert!(len >= min, "node holds {} keys, min is {}", len, min);
    }
}

fn check_bounds(keys: &[u32], lower: Option<u32>, upper: Option<u32>) {
    assert!(keys.windows(2).all(|w| w[0] < w[1]), "node keys unsorted");
    if let (Some(lo), Some(&first)) = (lower, keys.first()) {
        assert!(first > lo, "key {} not above separator {}", first, lo);
    }
    if let (Some(hi), Some(&last)) = (upper, keys.last()) {
        assert!(last < hi, "key {} not below separator {}", last, hi);
    }
}

fn check_depth(leaf_depth: &mut Option<usize>, depth: usize) {
    match leaf_depth {
        Some(d) => assert_eq!(*d, depth, "leaves at different depths"),
        None => *leaf_depth = Some(depth),
    }
}

/// One randomized mutation against a model set
#[derive(Debug, Clone, Copy)]
pub enum Mutation {
    Insert(u32),
    Delete(u32),
}

/// Deterministic stream of inserts and deletes over `1..=key_max`
pub fn mutations(seed: u64, count: usize, key_max: u32) -> Vec<Mutation> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let key = rng.random_range(1..=key_max);
            if rng.random::<f64>() < 0.6 {
                Mutation::Insert(key)
            } else {
                Mutation::Delete(key)
            }
        })
        .collect()
}

/// Applies a mutation to the model and reports whether it changed
pub fn apply_model(model: &mut BTreeSet<u32>, op: Mutation) -> bool {
    match op {
        Mutation::Insert(k) => model.insert(k),
        Mutation::Delete(k) => model.remove(&k),
    }
}
