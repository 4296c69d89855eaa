//! Indexing module.
//!
//! The contract shared by every ordered index engine: insert, search and
//! delete over a totally ordered key type, plus range queries for engines
//! that keep their keys chained in order.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Index type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    /// Multiway search tree, keys stored in every node
    BTree,
    /// Multiway search tree, keys stored in chained leaves
    BPlusTree,
    /// Probabilistic layered linked list
    SkipList,
}

impl IndexType {
    /// Returns true if this kind answers range queries
    pub fn supports_range(self) -> bool {
        matches!(self, IndexType::BPlusTree)
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            IndexType::BTree => "B-Tree",
            IndexType::BPlusTree => "B+-Tree",
            IndexType::SkipList => "Skip List",
        }
    }
}

impl std::fmt::Display for IndexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a lookup.
///
/// `path` lists what the lookup visited in order. It exists for observers
/// that replay the traversal and carries no behavioral contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<T> {
    /// Whether the key is present
    pub found: bool,
    /// Visited nodes or steps, root/head first
    pub path: Vec<T>,
}

impl<T> SearchResult<T> {
    /// Builds a result from its parts
    pub fn new(found: bool, path: Vec<T>) -> Self {
        Self { found, path }
    }
}

/// Ordered index over keys of type `K`.
pub trait OrderedIndex<K: Ord> {
    /// One element of a search trace
    type Trace;

    /// Insert a key. Fails with [`Error::DuplicateKey`] if present.
    fn insert(&mut self, key: K) -> Result<()>;

    /// Look up a key, recording the traversal
    fn search(&self, key: &K) -> SearchResult<Self::Trace>;

    /// Remove a key. Fails with [`Error::KeyNotFound`] if absent.
    fn delete(&mut self, key: &K) -> Result<()>;

    /// All keys in ascending order
    fn keys(&self) -> Vec<K>;

    /// Number of stored keys
    fn len(&self) -> usize;

    /// Drop every key, keeping the construction parameters
    fn clear(&mut self);

    /// Which engine this is
    fn index_type(&self) -> IndexType;

    /// Returns true if the key is present
    fn contains(&self, key: &K) -> bool {
        self.search(key).found
    }

    /// Returns true if no key is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered index that can answer inclusive range queries.
pub trait RangeIndex<K: Ord>: OrderedIndex<K> {
    /// Keys in `[start, end]`, ascending. Empty when `start > end`.
    fn range_query(&self, start: &K, end: &K) -> Vec<K>;
}

/// The `{ok, reason}` view of a mutation's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Key was inserted
    Inserted,
    /// Key was already present; nothing changed
    Duplicate,
    /// Key was removed
    Deleted,
    /// Key was absent; nothing changed
    NotFound,
}

impl Outcome {
    /// Maps an insert result, passing through non-recoverable errors
    pub fn from_insert(result: Result<()>) -> Result<Outcome> {
        match result {
            Ok(()) => Ok(Outcome::Inserted),
            Err(Error::DuplicateKey) => Ok(Outcome::Duplicate),
            Err(e) => Err(e),
        }
    }

    /// Maps a delete result, passing through non-recoverable errors
    pub fn from_delete(result: Result<()>) -> Result<Outcome> {
        match result {
            Ok(()) => Ok(Outcome::Deleted),
            Err(Error::KeyNotFound) => Ok(Outcome::NotFound),
            Err(e) => Err(e),
        }
    }

    /// Whether the structure changed
    pub fn ok(self) -> bool {
        matches!(self, Outcome::Inserted | Outcome::Deleted)
    }

    /// Machine-readable reason
    pub fn reason(self) -> &'static str {
        match self {
            Outcome::Inserted => "inserted",
            Outcome::Duplicate => "duplicate",
            Outcome::Deleted => "deleted",
            Outcome::NotFound => "not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_results() {
        assert_eq!(Outcome::from_insert(Ok(())), Ok(Outcome::Inserted));
        assert_eq!(
            Outcome::from_insert(Err(Error::DuplicateKey)),
            Ok(Outcome::Duplicate)
        );
        assert_eq!(Outcome::from_delete(Ok(())), Ok(Outcome::Deleted));
        assert_eq!(
            Outcome::from_delete(Err(Error::KeyNotFound)),
            Ok(Outcome::NotFound)
        );
        assert!(Outcome::from_delete(Err(Error::InvalidInput("x".into()))).is_err());
    }

    #[test]
    fn test_outcome_reason() {
        assert!(Outcome::Inserted.ok());
        assert!(!Outcome::Duplicate.ok());
        assert_eq!(Outcome::NotFound.reason(), "not_found");
        assert_eq!(Outcome::Deleted.reason(), "deleted");
    }

    #[test]
    fn test_index_type() {
        assert!(IndexType::BPlusTree.supports_range());
        assert!(!IndexType::BTree.supports_range());
        assert_eq!(IndexType::SkipList.to_string(), "Skip List");
    }
}
