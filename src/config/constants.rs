//! # Configuration Constants
//!
//! Centralizes the crate's tunable constants. Values that depend on each
//! other are co-located and guarded by compile-time assertions.
//!
//! ```text
//! MIN_DEGREE (2)
//!       │
//!       └─> smallest legal branching factor; a degree-D node holds
//!           [D-1, 2D-1] items, so D = 2 gives the classic 2-3-4 tree
//!
//! POOL_SHARD_COUNT (8)
//!       │
//!       └─> POOL_SHARD_CAP (32)
//!             Upper bound on retained nodes per shard. Total retained
//!             shells never exceed POOL_SHARD_COUNT * POOL_SHARD_CAP,
//!             which bounds the pool's high-water mark.
//!
//! CURSOR_STACK_DEPTH (8)
//!       Inline capacity of a cursor's frame stack, one frame per tree
//!       level. Eight levels cover hundreds of items even at degree 2;
//!       deeper trees spill the stack to the heap.
//! ```

/// Smallest legal branching factor. `BTree::new` panics below this.
pub const MIN_DEGREE: usize = 2;

/// Number of shards in the node pool.
/// More shards reduce lock contention between handles freeing nodes
/// concurrently.
pub const POOL_SHARD_COUNT: usize = 8;

/// Maximum number of recycled node shells retained per pool shard.
/// Returns beyond this are dropped instead of retained.
pub const POOL_SHARD_CAP: usize = 32;

/// Inline frame capacity of cursor stacks.
pub const CURSOR_STACK_DEPTH: usize = 8;

const _: () = assert!(MIN_DEGREE >= 2, "a B-tree needs at least two children per node");

const _: () = assert!(POOL_SHARD_COUNT > 0, "the node pool needs at least one shard");

const _: () = assert!(CURSOR_STACK_DEPTH > 0, "cursor stacks need inline capacity");
