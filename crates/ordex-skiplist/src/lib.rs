//! # Ordex Skip List Engine
//!
//! Probabilistic layered linked list with an injectable level source.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! **This crate is an internal implementation detail of Ordex.**
//!
//! Users should depend on the main `ordex` crate instead, which provides the
//! stable public API. This crate's API may change without notice between
//! minor versions.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod level;
pub mod list;

pub use level::{FixedLevels, GeometricLevels, LevelGenerator};
pub use list::{SkipList, SkipNode, SkipStep, StepAction};
