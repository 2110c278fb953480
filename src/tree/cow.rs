//! # Ownership Context
//!
//! Write contexts decide node ownership. A tree whose context equals a
//! node's `owner` tag created that node and is allowed to mutate it in
//! place; a tree with any other context must copy the node first. Cloning
//! a tree hands fresh contexts to both the original and the clone, which
//! strands every existing node under a context neither handle holds, so
//! the first write through either handle copies its path down from the
//! root, and the other handle keeps seeing the pre-copy structure.
//!
//! Every mutating descent maintains one invariant: the node currently
//! being visited carries the writing tree's context. [`writable`] is the
//! gate that establishes it before each step down.
//!
//! Context ids come from a process-wide counter and are never reused, so
//! a stale tag can never collide with a live handle. Freshly copied or
//! allocated nodes come from the shared [`NodePool`]; nodes freed by a
//! merge or root collapse go back to it, but only when the freeing
//! handle owns them. A shared node may still be live through another
//! handle and is left untouched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::node::Node;
use crate::memory::NodePool;

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Issues a context id no live or dead node has ever carried.
pub(crate) fn next_owner_id() -> u64 {
    NEXT_OWNER.fetch_add(1, Ordering::Relaxed)
}

/// A tree handle's write context, threaded through every mutating
/// descent: the handle's current owner id plus the pool nodes are
/// allocated from and retired to.
pub(crate) struct CowCtx<'a, K, V> {
    pub(crate) id: u64,
    pub(crate) pool: &'a NodePool<K, V>,
}

impl<K, V> Clone for CowCtx<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for CowCtx<'_, K, V> {}

impl<K, V> CowCtx<'_, K, V> {
    /// Hands back an owned node if this context may recycle it: the tag
    /// matches and no other reference is keeping it alive. Otherwise the
    /// shared node is returned untouched.
    pub(crate) fn reclaim(&self, node: Arc<Node<K, V>>) -> Result<Node<K, V>, Arc<Node<K, V>>> {
        if node.owner == self.id {
            Arc::try_unwrap(node)
        } else {
            Err(node)
        }
    }

    /// Clears a reclaimed shell and returns it to the pool. Clearing
    /// drops the keys, values, and child references the shell still
    /// holds; the pool must not retain them across reuses.
    pub(crate) fn retire(&self, mut shell: Node<K, V>) {
        shell.items.clear();
        shell.children.clear();
        shell.count = 0;
        shell.owner = 0;
        self.pool.put(shell);
    }

    /// Frees a node a mutation made unreachable, recycling it when this
    /// context owns it.
    pub(crate) fn free_node(&self, node: Arc<Node<K, V>>) {
        if let Ok(shell) = self.reclaim(node) {
            self.retire(shell);
        }
    }
}

impl<K: Clone, V: Clone> CowCtx<'_, K, V> {
    /// Allocates an empty node tagged with this context, reusing a
    /// pooled shell when one is available.
    pub(crate) fn new_node(&self) -> Node<K, V> {
        let mut node = self.pool.get().unwrap_or_else(Node::new);
        node.owner = self.id;
        node
    }

    /// Copies `src` for mutation under this context: items are cloned,
    /// children are shared (the copy points at the same child nodes),
    /// and the copy carries this context's tag.
    fn copy_node(&self, src: &Node<K, V>) -> Node<K, V> {
        let mut node = self.new_node();
        node.items.extend(src.items.iter().cloned());
        node.children.extend(src.children.iter().cloned());
        node.count = src.count;
        node
    }
}

/// Makes `node` mutable under `ctx` and returns the mutable reference.
///
/// If the tag already matches, the node was created by this handle and
/// nothing else references it, so it is mutated in place. Otherwise a
/// copy is spliced in; the original stays reachable from any other
/// handle that references it.
pub(crate) fn writable<'n, K: Clone, V: Clone>(
    node: &'n mut Arc<Node<K, V>>,
    ctx: CowCtx<'_, K, V>,
) -> &'n mut Node<K, V> {
    if node.owner != ctx.id {
        *node = Arc::new(ctx.copy_node(node));
    }
    Arc::make_mut(node)
}
