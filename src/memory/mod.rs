//! # Node Recycling
//!
//! Freed B-tree nodes are returned to a shared pool and handed back out on
//! the next allocation, so steady-state mutation (delete/insert cycles,
//! copy-on-write churn after a clone) reuses item and child vector
//! capacity instead of round-tripping through the allocator.
//!
//! The pool is the only structure shared mutably across tree handles, so
//! it is the only place in the crate that needs cross-thread
//! synchronization. See `NodePool`.

mod pool;

pub(crate) use pool::NodePool;
