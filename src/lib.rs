//! A height-balanced (AVL) binary search tree map for Rust.
//!
//! This crate provides [`AVLTreeMap`], an ordered key-value map with an API modelled on the
//! standard library's `BTreeMap`. Every node keeps the heights of its two subtrees within
//! one level of each other, so lookups, insertions and removals run in O(log n).
//!
//! # Example
//!
//! ```
//! use avl_bst::{AVLTreeMap, KeyNotFound};
//!
//! let mut scores = AVLTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Standard BTreeMap operations work as expected
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // `find` reports a missing key as an error
//! assert_eq!(scores.find(&"Dave"), Err(KeyNotFound));
//!
//! // The tree stays balanced whatever the insertion order
//! assert!(scores.is_balanced());
//! assert_eq!(scores.height(), 2);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Familiar API** - Mirrors `std::collections::BTreeMap` for the operations it supports
//! - **Stable storage** - Nodes and values live in slot arenas addressed by compact handles
//!
//! # Implementation
//!
//! Each node stores a balance factor, `height(right) - height(left)`. After an insertion or
//! removal the balance factors are updated bottom-up along parent links, and single or
//! double rotations repair any node that reaches ±2. The walk stops as soon as a subtree is
//! known to have kept its height.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: `IterMut` hands out disjoint borrows of the node and value arenas through a raw pointer.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod avl_tree_map;

pub use avl_tree_map::AVLTreeMap;
pub use error::KeyNotFound;
