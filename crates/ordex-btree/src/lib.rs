//! # Ordex B-Tree Engines
//!
//! Arena-backed B-Tree and B+-Tree implementations.
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
//! Both trees keep every leaf at the same depth and every non-root node
//! between `ceil(order / 2) - 1` and `order - 1` keys. Overflow and
//! underflow are repaired by the parent as the recursion unwinds, so a
//! mutation touches each level once.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bplus;
pub mod btree;

pub use bplus::{BPlusNode, BPlusTree, Range};
pub use btree::{BTree, BTreeNode};
