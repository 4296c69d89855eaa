//! # Ordex Core
//!
//! Core types shared by the Ordex index engines.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! **This crate is an internal implementation detail of Ordex.**
//!
//! Users should depend on the main `ordex` crate instead, which provides the
//! stable public API. This crate's API may change without notice between
//! minor versions.
//!
//! ---
//!
//! - [`store`]: the node arena every engine allocates from
//! - [`index`]: the [`OrderedIndex`] / [`RangeIndex`] contract
//! - [`config`]: construction parameters and their accepted ranges
//! - [`error`]: the error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod index;
pub mod store;

pub use config::{IndexConfig, SkipListConfig, TreeConfig};
pub use error::{Error, Result};
pub use index::{IndexType, OrderedIndex, Outcome, RangeIndex, SearchResult};
pub use store::{NodeId, NodeStore};
