//! # Ordex
//!
//! In-memory ordered index engines: a B-Tree, a B+-Tree with a linked leaf
//! level, and a Skip List, behind one API.
//!
//! ## Quick Start
//!
//! ```rust
//! use ordex::{Index, IndexConfig, IndexType};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut index = Index::new(IndexConfig::for_type(IndexType::BPlusTree))?;
//!
//!     for key in [50, 25, 75, 10, 30, 60, 90] {
//!         index.insert(key)?;
//!     }
//!     assert!(index.search(&30).found);
//!     assert_eq!(index.range_query(&25, &60)?, vec![25, 30, 50, 60]);
//!
//!     index.delete(&30)?;
//!     assert!(!index.contains(&30));
//!     Ok(())
//! }
//! ```
//!
//! ## Engines
//!
//! - [`BTree`]: keys in every node, order configurable (`>= 3`)
//! - [`BPlusTree`]: keys in chained leaves, supports [`Index::range_query`]
//! - [`SkipList`]: layered linked list with geometric node levels
//!
//! Duplicate inserts fail with [`Error::DuplicateKey`] and deletes of absent
//! keys with [`Error::KeyNotFound`]; neither changes the structure. Use
//! [`Outcome`] for the `{ok, reason}` view of those results.
//!
//! Enable [`logging`] to watch splits, merges and level changes as they
//! happen.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fmt;

pub use ordex_core::config::{
    DEFAULT_MAX_LEVEL, DEFAULT_ORDER, DEFAULT_P, KEY_RANGE, MAX_LEVEL_RANGE, ORDER_RANGE, P_RANGE,
};
pub use ordex_core::{
    Error, IndexConfig, IndexType, NodeId, OrderedIndex, Outcome, RangeIndex, Result,
    SearchResult, SkipListConfig, TreeConfig,
};

pub use ordex_btree::{BPlusNode, BPlusTree, BTree, BTreeNode};
pub use ordex_skiplist::{
    FixedLevels, GeometricLevels, LevelGenerator, SkipList, SkipNode, SkipStep, StepAction,
};

pub mod input;
pub mod logging;
pub mod script;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One element of a search trace from any engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceStep<K> {
    /// A tree node visited on the way down
    Node(NodeId),
    /// A skip list move
    Skip(SkipStep<K>),
}

/// An ordered index of any kind, chosen at runtime from an [`IndexConfig`].
#[derive(Debug, Clone)]
pub enum Index<K> {
    /// B-Tree engine
    BTree(BTree<K>),
    /// B+-Tree engine
    BPlusTree(BPlusTree<K>),
    /// Skip list engine
    SkipList(SkipList<K>),
}

impl<K: Ord + Clone + fmt::Debug> Index<K> {
    /// Builds an empty index.
    ///
    /// Fails with [`Error::InvalidConfig`] if the parameters are rejected.
    pub fn new(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        let index = match config {
            IndexConfig::BTree(c) => Index::BTree(BTree::with_config(c)?),
            IndexConfig::BPlusTree(c) => Index::BPlusTree(BPlusTree::with_config(c)?),
            IndexConfig::SkipList(c) => Index::SkipList(SkipList::with_config(c)?),
        };
        tracing::debug!(kind = %index.kind(), "index created");
        Ok(index)
    }

    /// Engine kind
    pub fn kind(&self) -> IndexType {
        match self {
            Index::BTree(_) => IndexType::BTree,
            Index::BPlusTree(_) => IndexType::BPlusTree,
            Index::SkipList(_) => IndexType::SkipList,
        }
    }

    /// Inserts a key; [`Error::DuplicateKey`] if present
    pub fn insert(&mut self, key: K) -> Result<()> {
        match self {
            Index::BTree(t) => t.insert(key),
            Index::BPlusTree(t) => t.insert(key),
            Index::SkipList(l) => l.insert(key),
        }
    }

    /// Looks up a key, recording the traversal
    pub fn search(&self, key: &K) -> SearchResult<TraceStep<K>> {
        fn wrap<T, K>(
            result: SearchResult<T>,
            step: impl Fn(T) -> TraceStep<K>,
        ) -> SearchResult<TraceStep<K>> {
            SearchResult::new(result.found, result.path.into_iter().map(step).collect())
        }
        match self {
            Index::BTree(t) => wrap(t.search(key), TraceStep::Node),
            Index::BPlusTree(t) => wrap(t.search(key), TraceStep::Node),
            Index::SkipList(l) => wrap(l.search(key), TraceStep::Skip),
        }
    }

    /// Returns true if the key is present
    pub fn contains(&self, key: &K) -> bool {
        match self {
            Index::BTree(t) => t.locate(key).is_some(),
            Index::BPlusTree(t) => t.contains(key),
            Index::SkipList(l) => l.contains(key),
        }
    }

    /// Removes a key; [`Error::KeyNotFound`] if absent
    pub fn delete(&mut self, key: &K) -> Result<()> {
        match self {
            Index::BTree(t) => t.delete(key),
            Index::BPlusTree(t) => t.delete(key),
            Index::SkipList(l) => l.delete(key),
        }
    }

    /// Keys in `[start, end]`, ascending.
    ///
    /// Only the B+-Tree answers range queries; other kinds fail with
    /// [`Error::InvalidInput`].
    pub fn range_query(&self, start: &K, end: &K) -> Result<Vec<K>> {
        match self {
            Index::BPlusTree(t) => Ok(t.range_query(start, end)),
            other => Err(Error::InvalidInput(format!(
                "{} does not support range queries",
                other.kind()
            ))),
        }
    }

    /// All keys in ascending order
    pub fn keys(&self) -> Vec<K> {
        match self {
            Index::BTree(t) => t.keys(),
            Index::BPlusTree(t) => t.keys(),
            Index::SkipList(l) => l.keys(),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        match self {
            Index::BTree(t) => t.len(),
            Index::BPlusTree(t) => t.len(),
            Index::SkipList(l) => l.len(),
        }
    }

    /// Returns true if no key is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of levels: tree height, or the skip list's top level plus one
    pub fn height(&self) -> usize {
        match self {
            Index::BTree(t) => t.height(),
            Index::BPlusTree(t) => t.height(),
            Index::SkipList(l) => l.level() + 1,
        }
    }

    /// Drops every key, keeping the configuration
    pub fn clear(&mut self) {
        match self {
            Index::BTree(t) => t.clear(),
            Index::BPlusTree(t) => t.clear(),
            Index::SkipList(l) => l.clear(),
        }
        tracing::debug!(kind = %self.kind(), "index cleared");
    }

    /// The B-Tree, if this is one
    pub fn as_btree(&self) -> Option<&BTree<K>> {
        match self {
            Index::BTree(t) => Some(t),
            _ => None,
        }
    }

    /// The B+-Tree, if this is one
    pub fn as_bplus_tree(&self) -> Option<&BPlusTree<K>> {
        match self {
            Index::BPlusTree(t) => Some(t),
            _ => None,
        }
    }

    /// The skip list, if this is one
    pub fn as_skip_list(&self) -> Option<&SkipList<K>> {
        match self {
            Index::SkipList(l) => Some(l),
            _ => None,
        }
    }
}
