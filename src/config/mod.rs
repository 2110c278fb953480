//! Crate-wide configuration constants.

mod constants;

pub use constants::{CURSOR_STACK_DEPTH, MIN_DEGREE, POOL_SHARD_CAP, POOL_SHARD_COUNT};
