//! Skip list over an arena of nodes.
//!
//! The head sentinel is not stored in the arena; a predecessor of `None`
//! stands for the head everywhere below.

use std::fmt;

use ordex_core::{
    Error, IndexType, NodeId, NodeStore, OrderedIndex, Result, SearchResult, SkipListConfig,
};
use tracing::{debug, trace};

use crate::level::{GeometricLevels, LevelGenerator};

/// A node of a [`SkipList`].
#[derive(Debug, Clone)]
pub struct SkipNode<K> {
    key: K,
    forward: Vec<Option<NodeId>>,
}

impl<K> SkipNode<K> {
    /// Stored key
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Highest level this node is linked on
    pub fn level(&self) -> usize {
        self.forward.len() - 1
    }

    /// Successor on `level`, if linked there
    pub fn next(&self, level: usize) -> Option<NodeId> {
        self.forward.get(level).copied().flatten()
    }
}

/// What a search did at one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Moved to the next node on the same level
    Right,
    /// Dropped one level
    Down,
    /// Reached the node holding the key
    Found,
}

/// One step of a skip list search trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipStep<K> {
    /// Key of the node the step was taken from; `None` for the head
    pub key: Option<K>,
    /// Level the step happened on
    pub level: usize,
    /// What happened
    pub action: StepAction,
}

/// Skip list with a pluggable level source.
///
/// # Examples
///
/// ```
/// use ordex_core::SkipListConfig;
/// use ordex_skiplist::SkipList;
///
/// let mut list = SkipList::with_config(SkipListConfig::default().with_seed(3))?;
/// list.insert(42)?;
/// assert!(list.search(&42).found);
/// # Ok::<(), ordex_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SkipList<K, G = GeometricLevels> {
    nodes: NodeStore<SkipNode<K>>,
    head: Vec<Option<NodeId>>,
    level: usize,
    config: SkipListConfig,
    levels: G,
    len: usize,
}

impl<K: Ord + Clone + fmt::Debug> SkipList<K, GeometricLevels> {
    /// Creates an empty list with OS-seeded geometric levels
    pub fn new(max_level: usize, p: f64) -> Result<Self> {
        Self::with_config(SkipListConfig::new(max_level, p))
    }

    /// Creates an empty list from a [`SkipListConfig`]
    pub fn with_config(config: SkipListConfig) -> Result<Self> {
        config.validate()?;
        let levels = GeometricLevels::from_config(&config);
        Self::with_generator(config, levels)
    }
}

impl<K: Ord + Clone + fmt::Debug, G: LevelGenerator> SkipList<K, G> {
    /// Creates an empty list drawing node levels from `levels`
    pub fn with_generator(config: SkipListConfig, levels: G) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            nodes: NodeStore::new(),
            head: vec![None; config.max_level + 1],
            level: 0,
            config,
            levels,
            len: 0,
        })
    }

    /// Highest level a node may reach
    pub fn max_level(&self) -> usize {
        self.config.max_level
    }

    /// Tallest populated level; 0 for an empty list
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list holds no key
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Node behind a handle, if live
    pub fn node(&self, id: NodeId) -> Option<&SkipNode<K>> {
        self.nodes.get(id)
    }

    /// First node on `level`
    pub fn first(&self, level: usize) -> Option<NodeId> {
        self.head.get(level).copied().flatten()
    }

    fn link(&self, from: Option<NodeId>, level: usize) -> Option<NodeId> {
        match from {
            Some(id) => self.nodes[id].forward[level],
            None => self.head[level],
        }
    }

    fn set_link(&mut self, from: Option<NodeId>, level: usize, to: Option<NodeId>) {
        match from {
            Some(id) => self.nodes[id].forward[level] = to,
            None => self.head[level] = to,
        }
    }

    /// Last node before `key` on every level up to `max_level`. Levels above
    /// the current one keep the head.
    fn predecessors(&self, key: &K) -> Vec<Option<NodeId>> {
        let mut update = vec![None; self.config.max_level + 1];
        let mut current = None;
        for i in (0..=self.level).rev() {
            while let Some(next) = self.link(current, i) {
                if self.nodes[next].key >= *key {
                    break;
                }
                current = Some(next);
            }
            update[i] = current;
        }
        update
    }

    fn step(&self, at: Option<NodeId>, level: usize, action: StepAction) -> SkipStep<K> {
        SkipStep {
            key: at.map(|id| self.nodes[id].key.clone()),
            level,
            action,
        }
    }

    /// Looks up `key`, recording every move right and down.
    ///
    /// When the key is present the trace ends with a [`StepAction::Found`]
    /// step on level 0 at the matching node.
    pub fn search(&self, key: &K) -> SearchResult<SkipStep<K>> {
        let mut path = Vec::new();
        let mut current = None;
        for i in (0..=self.level).rev() {
            while let Some(next) = self.link(current, i) {
                if self.nodes[next].key >= *key {
                    break;
                }
                path.push(self.step(current, i, StepAction::Right));
                current = Some(next);
            }
            path.push(self.step(current, i, StepAction::Down));
        }

        let candidate = self.link(current, 0);
        let found = candidate.is_some_and(|id| self.nodes[id].key == *key);
        if found {
            path.push(self.step(candidate, 0, StepAction::Found));
        }
        SearchResult::new(found, path)
    }

    /// Returns true if `key` is stored
    pub fn contains(&self, key: &K) -> bool {
        let update = self.predecessors(key);
        self.link(update[0], 0)
            .is_some_and(|id| self.nodes[id].key == *key)
    }

    /// Inserts `key`.
    ///
    /// Returns [`Error::DuplicateKey`] and leaves the list untouched if the
    /// key is already present.
    pub fn insert(&mut self, key: K) -> Result<()> {
        self.insert_leveled(key).map(|_| ())
    }

    /// Inserts `key` and returns the level the new node was given.
    pub fn insert_leveled(&mut self, key: K) -> Result<usize> {
        let update = self.predecessors(&key);
        if self
            .link(update[0], 0)
            .is_some_and(|id| self.nodes[id].key == key)
        {
            debug!(key = ?key, "skiplist insert rejected: duplicate");
            return Err(Error::DuplicateKey);
        }

        let max_level = self.config.max_level;
        let new_level = self.levels.random_level(max_level).min(max_level);
        trace!(key = ?key, level = new_level, "skiplist insert");
        if new_level > self.level {
            debug!(from = self.level, to = new_level, "skiplist raised its level");
            self.level = new_level;
        }

        let id = self.nodes.alloc(SkipNode {
            key,
            forward: vec![None; new_level + 1],
        });
        for (i, &prev) in update.iter().enumerate().take(new_level + 1) {
            let next = self.link(prev, i);
            self.nodes[id].forward[i] = next;
            self.set_link(prev, i, Some(id));
        }
        self.len += 1;
        Ok(new_level)
    }

    /// Removes `key`.
    ///
    /// Returns [`Error::KeyNotFound`] and leaves the list untouched if the
    /// key is absent.
    pub fn delete(&mut self, key: &K) -> Result<()> {
        let update = self.predecessors(key);
        let target = match self.link(update[0], 0) {
            Some(id) if self.nodes[id].key == *key => id,
            _ => {
                debug!(key = ?key, "skiplist delete rejected: not found");
                return Err(Error::KeyNotFound);
            }
        };
        trace!(key = ?key, "skiplist delete");

        for (i, &prev) in update.iter().enumerate().take(self.level + 1) {
            if self.link(prev, i) != Some(target) {
                break;
            }
            let next = self.nodes[target].forward[i];
            self.set_link(prev, i, next);
        }
        self.nodes.release(target);

        let before = self.level;
        while self.level > 0 && self.head[self.level].is_none() {
            self.level -= 1;
        }
        if self.level != before {
            debug!(from = before, to = self.level, "skiplist lowered its level");
        }
        self.len -= 1;
        Ok(())
    }

    /// Node handles linked on `level`, in key order
    pub fn lane(&self, level: usize) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.first(level);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.nodes[id].forward[level];
        }
        out
    }

    /// `(key, level)` for every node, in key order
    pub fn entries(&self) -> Vec<(K, usize)> {
        self.lane(0)
            .into_iter()
            .map(|id| {
                let node = &self.nodes[id];
                (node.key.clone(), node.level())
            })
            .collect()
    }

    /// All keys in ascending order
    pub fn keys(&self) -> Vec<K> {
        self.lane(0)
            .into_iter()
            .map(|id| self.nodes[id].key.clone())
            .collect()
    }

    /// Drops every key, keeping the configuration and level source
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head.iter_mut().for_each(|link| *link = None);
        self.level = 0;
        self.len = 0;
    }
}

impl<K: Ord + Clone + fmt::Debug, G: LevelGenerator> OrderedIndex<K> for SkipList<K, G> {
    type Trace = SkipStep<K>;

    fn insert(&mut self, key: K) -> Result<()> {
        SkipList::insert(self, key)
    }

    fn search(&self, key: &K) -> SearchResult<SkipStep<K>> {
        SkipList::search(self, key)
    }

    fn delete(&mut self, key: &K) -> Result<()> {
        SkipList::delete(self, key)
    }

    fn keys(&self) -> Vec<K> {
        SkipList::keys(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        SkipList::clear(self)
    }

    fn index_type(&self) -> IndexType {
        IndexType::SkipList
    }

    fn contains(&self, key: &K) -> bool {
        SkipList::contains(self, key)
    }
}
