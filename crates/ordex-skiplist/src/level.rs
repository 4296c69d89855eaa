//! Level generation for new skip list nodes.

use ordex_core::SkipListConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of node levels.
///
/// The returned level is 0-based and must not exceed `max_level`; the list
/// clamps anything larger.
pub trait LevelGenerator {
    /// Level for the next inserted node
    fn random_level(&mut self, max_level: usize) -> usize;
}

/// Geometric levels: each extra level is taken with probability `p`.
#[derive(Debug, Clone)]
pub struct GeometricLevels {
    p: f64,
    rng: StdRng,
}

impl GeometricLevels {
    /// Generator seeded from the OS, or from `seed` when given
    pub fn new(p: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { p, rng }
    }

    /// Generator for the probability and seed of a config
    pub fn from_config(config: &SkipListConfig) -> Self {
        Self::new(config.p, config.seed)
    }
}

impl LevelGenerator for GeometricLevels {
    fn random_level(&mut self, max_level: usize) -> usize {
        let mut level = 0;
        while level < max_level && self.rng.random::<f64>() < self.p {
            level += 1;
        }
        level
    }
}

/// Replays a fixed sequence of levels, cycling when exhausted.
///
/// An empty sequence always yields level 0.
#[derive(Debug, Clone, Default)]
pub struct FixedLevels {
    levels: Vec<usize>,
    pos: usize,
}

impl FixedLevels {
    /// Generator replaying `levels` in order
    pub fn new(levels: impl Into<Vec<usize>>) -> Self {
        Self {
            levels: levels.into(),
            pos: 0,
        }
    }
}

impl LevelGenerator for FixedLevels {
    fn random_level(&mut self, max_level: usize) -> usize {
        if self.levels.is_empty() {
            return 0;
        }
        let level = self.levels[self.pos % self.levels.len()];
        self.pos += 1;
        level.min(max_level)
    }
}
