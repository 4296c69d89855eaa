//! Construction parameters for the index engines.
//!
//! Ranges mirror the options offered by the interactive front end; the
//! engines themselves accept anything `validate` lets through.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::index::IndexType;
use crate::{Error, Result};

/// Smallest order a B-/B+-Tree accepts
pub const MIN_ORDER: usize = 3;
/// Default tree order
pub const DEFAULT_ORDER: usize = 4;
/// Orders offered by the front end
pub const ORDER_RANGE: RangeInclusive<usize> = 3..=5;

/// Default skip list height cap
pub const DEFAULT_MAX_LEVEL: usize = 6;
/// Default promotion probability
pub const DEFAULT_P: f64 = 0.5;
/// Height caps offered by the front end
pub const MAX_LEVEL_RANGE: RangeInclusive<usize> = 4..=8;
/// Promotion probabilities offered by the front end
pub const P_RANGE: RangeInclusive<f64> = 0.25..=0.75;
/// Hard upper bound on `max_level`
pub const MAX_LEVEL_CAP: usize = 32;

/// Keys accepted by the input layer
pub const KEY_RANGE: RangeInclusive<u32> = 1..=999;

/// B-Tree / B+-Tree parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum children per internal node
    pub order: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
        }
    }
}

impl TreeConfig {
    /// Config with the given order
    pub fn new(order: usize) -> Self {
        Self { order }
    }

    /// Reject orders below [`MIN_ORDER`]
    pub fn validate(&self) -> Result<()> {
        if self.order < MIN_ORDER {
            return Err(Error::InvalidConfig(format!(
                "order must be at least {}, got {}",
                MIN_ORDER, self.order
            )));
        }
        Ok(())
    }

    /// `order - 1`
    pub fn max_keys(&self) -> usize {
        self.order - 1
    }

    /// `ceil(order / 2) - 1`
    pub fn min_keys(&self) -> usize {
        self.order.div_ceil(2) - 1
    }
}

/// Skip list parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkipListConfig {
    /// Highest level a node may reach (0-based)
    pub max_level: usize,
    /// Probability of promoting a node one more level
    pub p: f64,
    /// Seed for the level generator; `None` seeds from the OS
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SkipListConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            p: DEFAULT_P,
            seed: None,
        }
    }
}

impl SkipListConfig {
    /// Config with the given height cap and probability
    pub fn new(max_level: usize, p: f64) -> Self {
        Self {
            max_level,
            p,
            seed: None,
        }
    }

    /// Set the height cap
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    /// Set the promotion probability
    pub fn with_p(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    /// Fix the level generator seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject a zero or oversized height cap and probabilities outside `(0, 1)`
    pub fn validate(&self) -> Result<()> {
        if self.max_level == 0 || self.max_level > MAX_LEVEL_CAP {
            return Err(Error::InvalidConfig(format!(
                "max_level must be in 1..={}, got {}",
                MAX_LEVEL_CAP, self.max_level
            )));
        }
        if !(self.p > 0.0 && self.p < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "p must be in (0, 1), got {}",
                self.p
            )));
        }
        Ok(())
    }
}

/// Which engine to build, with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexConfig {
    /// B-Tree
    BTree(TreeConfig),
    /// B+-Tree
    BPlusTree(TreeConfig),
    /// Skip list
    SkipList(SkipListConfig),
}

impl IndexConfig {
    /// Default parameters for the given engine
    pub fn for_type(kind: IndexType) -> Self {
        match kind {
            IndexType::BTree => IndexConfig::BTree(TreeConfig::default()),
            IndexType::BPlusTree => IndexConfig::BPlusTree(TreeConfig::default()),
            IndexType::SkipList => IndexConfig::SkipList(SkipListConfig::default()),
        }
    }

    /// Engine kind
    pub fn index_type(&self) -> IndexType {
        match self {
            IndexConfig::BTree(_) => IndexType::BTree,
            IndexConfig::BPlusTree(_) => IndexType::BPlusTree,
            IndexConfig::SkipList(_) => IndexType::SkipList,
        }
    }

    /// Validate the embedded parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            IndexConfig::BTree(c) | IndexConfig::BPlusTree(c) => c.validate(),
            IndexConfig::SkipList(c) => c.validate(),
        }
    }
}
