//! # B-Tree Core
//!
//! The tree itself: node structure and algorithms, the copy-on-write
//! ownership discipline, the public handle, and cursor iteration.
//!
//! - `node`: a single node (sorted items, child edges, cached subtree
//!   count, ownership tag) and the recursive search, insert, remove, and
//!   iteration algorithms.
//! - `cow`: write contexts deciding who may mutate a node in place, who
//!   must copy it first, and when a freed node may be recycled.
//! - `tree`: [`BTree`], the handle everything enters through.
//! - `iter`: [`Cursor`], a seekable iterator reifying its position as a
//!   stack of node/index frames, and the [`Iter`] adapter.

pub(crate) mod cow;
pub(crate) mod iter;
pub(crate) mod node;
pub(crate) mod tree;

pub use iter::{Cursor, Iter};
pub use tree::BTree;
