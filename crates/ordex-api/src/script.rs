//! Scripted operation sequences and random fills.
//!
//! A script is a list of [`Op`]s replayed against an [`Index`]. Each engine
//! ships a demo script exercising its characteristic operations.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Index, IndexType, Outcome, Result};

/// One scripted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Op {
    /// Insert `value`
    Insert {
        /// Key to insert
        value: u32,
    },
    /// Look up `value`
    Search {
        /// Key to look up
        value: u32,
    },
    /// Delete `value`
    Delete {
        /// Key to delete
        value: u32,
    },
    /// Collect keys in `[start, end]`
    Range {
        /// Lower bound, inclusive
        start: u32,
        /// Upper bound, inclusive
        end: u32,
    },
}

const fn insert(value: u32) -> Op {
    Op::Insert { value }
}

/// B-Tree demo: nine inserts forcing splits, then a search and a delete
pub const BTREE_DEMO: &[Op] = &[
    insert(50),
    insert(25),
    insert(75),
    insert(10),
    insert(30),
    insert(60),
    insert(90),
    insert(5),
    insert(15),
    Op::Search { value: 30 },
    Op::Delete { value: 25 },
];

/// B+-Tree demo: nine inserts, a range query over the leaf chain, a delete
pub const BPLUS_TREE_DEMO: &[Op] = &[
    insert(50),
    insert(25),
    insert(75),
    insert(10),
    insert(30),
    insert(60),
    insert(90),
    insert(35),
    insert(40),
    Op::Range { start: 25, end: 50 },
    Op::Delete { value: 30 },
];

/// Skip list demo: eight inserts, then a search and a delete
pub const SKIP_LIST_DEMO: &[Op] = &[
    insert(50),
    insert(25),
    insert(75),
    insert(10),
    insert(30),
    insert(60),
    insert(90),
    insert(5),
    Op::Search { value: 60 },
    Op::Delete { value: 25 },
];

/// Demo script for an engine kind
pub fn demo(kind: IndexType) -> &'static [Op] {
    match kind {
        IndexType::BTree => BTREE_DEMO,
        IndexType::BPlusTree => BPLUS_TREE_DEMO,
        IndexType::SkipList => SKIP_LIST_DEMO,
    }
}

/// What one scripted operation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// Insert or delete, with its outcome
    Mutation(Outcome),
    /// Search, with whether the key was found
    Search(bool),
    /// Range query hits, ascending
    Range(Vec<u32>),
}

/// Replays `ops` against `index`, logging each step.
///
/// Duplicates and missing keys are reported as [`StepResult::Mutation`]
/// outcomes. A range query on an engine without range support aborts the
/// script with [`crate::Error::InvalidInput`].
pub fn run_script(index: &mut Index<u32>, ops: &[Op]) -> Result<Vec<StepResult>> {
    let mut results = Vec::with_capacity(ops.len());
    for (step, op) in ops.iter().enumerate() {
        let result = match *op {
            Op::Insert { value } => {
                StepResult::Mutation(Outcome::from_insert(index.insert(value))?)
            }
            Op::Delete { value } => {
                StepResult::Mutation(Outcome::from_delete(index.delete(&value))?)
            }
            Op::Search { value } => StepResult::Search(index.search(&value).found),
            Op::Range { start, end } => StepResult::Range(index.range_query(&start, &end)?),
        };
        info!(kind = %index.kind(), step, op = ?op, result = ?result, "script step");
        results.push(result);
    }
    Ok(results)
}

/// How many keys a random fill draws for an engine kind
pub fn fill_count(kind: IndexType) -> RangeInclusive<usize> {
    match kind {
        IndexType::BPlusTree => 6..=15,
        IndexType::BTree | IndexType::SkipList => 5..=12,
    }
}

/// Keys drawn for a random fill.
///
/// Picks a count from `count`, then draws from `keys` until that many
/// distinct keys are held. The count is capped at the size of `keys`. Keys
/// keep the order they were first drawn in.
pub fn random_keys<R: Rng>(
    rng: &mut R,
    count: RangeInclusive<usize>,
    keys: RangeInclusive<u32>,
) -> Vec<u32> {
    let span = if keys.is_empty() {
        0
    } else {
        (keys.end() - keys.start()) as usize + 1
    };
    let target = rng.random_range(count).min(span);
    let mut seen = HashSet::with_capacity(target);
    let mut out = Vec::with_capacity(target);
    while out.len() < target {
        let key = rng.random_range(keys.clone());
        if seen.insert(key) {
            out.push(key);
        }
    }
    out
}

/// Inserts a random fill into `index`, returning the keys that were added.
///
/// Skip lists receive the keys in ascending order; the trees take them in
/// draw order.
pub fn random_fill<R: Rng>(rng: &mut R, index: &mut Index<u32>) -> Vec<u32> {
    let mut keys = random_keys(rng, fill_count(index.kind()), 1..=99);
    if index.kind() == IndexType::SkipList {
        keys.sort_unstable();
    }
    keys.into_iter()
        .filter(|&k| index.insert(k).is_ok())
        .collect()
}
