//! # cowtree - Copy-on-Write Ordered B-Tree
//!
//! An in-memory ordered key-value container organized as a B-tree of
//! configurable branching factor, with lazy structural sharing: cloning
//! a tree is O(1), and the clones diverge through copy-on-write as they
//! are mutated.
//!
//! - **Ordered map API**: point reads and writes, min/max, visitor-based
//!   range iteration in both directions, seekable cursors.
//! - **Positional access**: nodes cache subtree item counts, funding
//!   O(log n) `at(rank)` and key-to-rank lookup.
//! - **Cheap snapshots**: `clone()` copies no nodes; each handle copies
//!   only the paths it subsequently writes, so a handle and its clone
//!   can be mutated concurrently from different threads.
//! - **Node recycling**: nodes freed by merges and root collapse return
//!   to a pool shared by the clone family, preserving vector capacity
//!   across delete/insert churn.
//!
//! ## Quick Start
//!
//! ```
//! use cowtree::BTree;
//!
//! let mut tree = BTree::new(32);
//! for i in 0..10 {
//!     tree.set(i, i * i);
//! }
//!
//! assert_eq!(tree.get(&3), Some(&9));
//! assert_eq!(tree.at(7), (&7, &49));
//!
//! let snapshot = tree.clone();
//! tree.delete(&3);
//! assert!(tree.get(&3).is_none());
//! assert_eq!(snapshot.get(&3), Some(&9));
//!
//! let mut keys = Vec::new();
//! tree.ascend(|k, _| {
//!     keys.push(*k);
//!     true
//! });
//! assert_eq!(keys, [0, 1, 2, 4, 5, 6, 7, 8, 9]);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Public API (BTree)            │  tree::tree
//! ├──────────────────┬──────────────────┤
//! │  Range iteration │  Cursor / Iter    │  tree::node, tree::iter
//! ├──────────────────┴──────────────────┤
//! │  Node algorithms (insert/remove/...) │  tree::node
//! ├─────────────────────────────────────┤
//! │  Ownership contexts (copy-on-write)  │  tree::cow
//! ├─────────────────────────────────────┤
//! │  Node pool (sharded, shared)         │  memory::pool
//! └─────────────────────────────────────┘
//! ```
//!
//! Every mutation enters at the handle, loads the handle's write
//! context, and descends; any node on the path not tagged with that
//! context is copied before it is touched. Reads never copy.
//!
//! ## Module Overview
//!
//! - [`tree`]: node structure, algorithms, the [`BTree`] handle, cursors
//! - `memory`: the shared node pool
//! - [`config`]: tunable constants

pub mod config;
mod memory;
pub mod tree;

#[cfg(test)]
mod proptests;

pub use tree::{BTree, Cursor, Iter};
