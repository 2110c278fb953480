//! # Node Pool
//!
//! Sharded free pool of node shells, shared by every handle of a clone
//! family.
//!
//! ## Purpose
//!
//! Structural mutations free nodes (merges, root collapse) and allocate
//! nodes (splits, copy-on-write). Recycling shells through this pool
//! preserves the capacity of their item and child vectors, which is where
//! nearly all of a node's allocation cost lives.
//!
//! ## Design
//!
//! The pool uses lock sharding to keep concurrent `get`/`put` from
//! handles on different threads cheap, the same strategy as a sharded
//! buffer pool, scaled down. A round-robin counter distributes traffic
//! across shards; an empty shard on `get` simply reports a miss and the
//! caller allocates fresh. Each shard retains at most
//! [`POOL_SHARD_CAP`] shells; returns beyond that are dropped, bounding
//! the pool's high-water mark.
//!
//! Shells arrive already cleared (see `CowCtx::retire`), so a pooled node
//! holds no keys, values, or child references.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::config::{POOL_SHARD_CAP, POOL_SHARD_COUNT};
use crate::tree::node::Node;

pub(crate) struct NodePool<K, V> {
    shards: [Mutex<Vec<Node<K, V>>>; POOL_SHARD_COUNT],
    /// Round-robin counter distributing get/put traffic across shards.
    next_shard: AtomicUsize,
}

impl<K, V> NodePool<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            shards: std::array::from_fn(|_| Mutex::new(Vec::new())),
            next_shard: AtomicUsize::new(0),
        }
    }

    /// Takes a recycled shell out of the pool, if one is available.
    pub(crate) fn get(&self) -> Option<Node<K, V>> {
        let shard = self.next_shard.fetch_add(1, Ordering::Relaxed) % POOL_SHARD_COUNT;
        self.shards[shard].lock().pop()
    }

    /// Returns a cleared shell to the pool. Dropped instead if the
    /// selected shard is at capacity.
    pub(crate) fn put(&self, node: Node<K, V>) {
        let shard = self.next_shard.fetch_add(1, Ordering::Relaxed) % POOL_SHARD_COUNT;
        let mut shard = self.shards[shard].lock();
        if shard.len() < POOL_SHARD_CAP {
            shard.push(node);
        }
    }

    /// Current number of retained shells across all shards.
    #[cfg(test)]
    pub(crate) fn available(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }
}
