//! # Tree Handle
//!
//! The public surface of the crate. A [`BTree`] owns its root reference,
//! branching factor, total length, and current write context, and
//! exposes point operations, ordered iteration in both directions,
//! positional access, and O(1) lazy cloning.
//!
//! ## Insert
//!
//! ```text
//! 1. Root full? Split it first: a new root takes the promoted median,
//!    with the old lower half and the new upper half as its children.
//! 2. Descend. A full child is split before stepping into it, so the
//!    insertion point always has room.
//! 3. An equivalent key found anywhere on the way replaces in place and
//!    reports the old value.
//! ```
//!
//! ## Delete
//!
//! ```text
//! 1. Descend toward the target (by key, minimum, or maximum).
//! 2. A child at its minimum is topped up before stepping into it
//!    (rotate from a sibling with items to spare, else merge) so the
//!    final leaf removal never underflows.
//! 3. A by-key hit at an interior node is filled with its predecessor,
//!    extracted by a max-removal from the left child.
//! 4. If the root ends up empty it collapses to its single child (or
//!    goes away entirely), and the freed node returns to the pool.
//! ```
//!
//! ## Clone
//!
//! Cloning copies no nodes. Both handles receive fresh write contexts,
//! so every shared node is foreign to both; each handle copies its way
//! down on first mutation and splices the copies into itself only. The
//! two trees diverge physically exactly as fast as they are written.
//!
//! A handle is a single-threaded mutator (`&mut self`), but a handle and
//! its clone may be used, including written, from different threads
//! concurrently.

use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::cow::{next_owner_id, writable, CowCtx};
use super::iter::{Cursor, CursorStack, Frame, Iter};
use super::node::{Direction, Item, Node, Removal};
use crate::config::MIN_DEGREE;
use crate::memory::NodePool;

/// An ordered map backed by an in-memory B-tree with copy-on-write
/// structural sharing.
///
/// `degree` controls node fan-out: every node except the root holds
/// between `degree - 1` and `2 * degree - 1` items. `clone` is O(1) and
/// the clones diverge lazily as they are mutated.
///
/// ```
/// use cowtree::BTree;
///
/// let mut tree = BTree::new(8);
/// for word in ["bison", "auk", "cormorant"] {
///     tree.set(word, word.len());
/// }
///
/// let snapshot = tree.clone();
/// tree.delete(&"auk");
///
/// assert_eq!(tree.len(), 2);
/// assert_eq!(snapshot.len(), 3);
/// assert_eq!(snapshot.get(&"auk"), Some(&3));
/// assert_eq!(tree.min(), Some((&"bison", &5)));
/// ```
pub struct BTree<K, V> {
    degree: usize,
    length: usize,
    root: Option<Arc<Node<K, V>>>,
    /// Current write-context id. Atomic so `clone` can retag the
    /// original through a shared reference; mutations load it once at
    /// entry.
    owner: AtomicU64,
    pool: Arc<NodePool<K, V>>,
}

impl<K, V> BTree<K, V> {
    /// Creates an empty tree with the given branching factor.
    ///
    /// `BTree::new(2)` builds a 2-3-4 tree: each node holds 1-3 items
    /// and 2-4 children.
    ///
    /// # Panics
    ///
    /// Panics if `degree < 2`; such a tree cannot exist.
    pub fn new(degree: usize) -> Self {
        assert!(
            degree >= MIN_DEGREE,
            "btree degree must be at least {MIN_DEGREE}, got {degree}"
        );
        Self {
            degree,
            length: 0,
            root: None,
            owner: AtomicU64::new(next_owner_id()),
            pool: Arc::new(NodePool::new()),
        }
    }

    fn max_items(&self) -> usize {
        self.degree * 2 - 1
    }

    fn min_items(&self) -> usize {
        self.degree - 1
    }

    /// Number of items in the tree.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Smallest key and its value, or `None` if the tree is empty.
    pub fn min(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(first) = node.children.first() {
            node = first;
        }
        node.items.first().map(|item| (&item.key, &item.value))
    }

    /// Largest key and its value, or `None` if the tree is empty.
    pub fn max(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(last) = node.children.last() {
            node = last;
        }
        node.items.last().map(|item| (&item.key, &item.value))
    }

    /// Key and value at `rank` in sort order, 0-based.
    ///
    /// # Panics
    ///
    /// Panics if `rank >= self.len()`.
    pub fn at(&self, rank: usize) -> (&K, &V) {
        assert!(
            rank < self.length,
            "rank {rank} out of range for tree of length {}",
            self.length
        );
        match self.root.as_deref() {
            Some(root) => {
                let item = root.at(rank);
                (&item.key, &item.value)
            }
            None => unreachable!("non-empty tree without a root"),
        }
    }

    /// Positions a cursor before the smallest item; the first `next()`
    /// yields the tree's minimum.
    pub fn before_min(&self) -> Cursor<'_, K, V> {
        let Some(root) = self.root.as_deref() else {
            return Cursor::empty(Direction::Ascend);
        };
        let mut stack = CursorStack::new();
        stack.push(Frame {
            node: root,
            index: -1,
        });
        Cursor::new(stack, Direction::Ascend, false, -1)
    }

    /// Positions a cursor after the largest item; the first `next()`
    /// yields the tree's maximum and the cursor walks downward from
    /// there.
    pub fn after_max(&self) -> Cursor<'_, K, V> {
        let Some(root) = self.root.as_deref() else {
            return Cursor::empty(Direction::Descend);
        };
        let mut stack = CursorStack::new();
        stack.push(Frame {
            node: root,
            index: root.items.len() as isize,
        });
        Cursor::new(stack, Direction::Descend, false, self.length as isize)
    }

    /// Ascending iterator over all entries.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.before_min())
    }
}

impl<K: Ord, V> BTree<K, V> {
    /// Value stored under `key`, or `None`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.root.as_deref()?.get(key).map(|item| &item.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.root
            .as_deref()
            .is_some_and(|root| root.get(key).is_some())
    }

    /// Value stored under `key` together with the key's rank in sort
    /// order, or `None` if the key is absent.
    pub fn get_with_index(&self, key: &K) -> Option<(&V, usize)> {
        let (item, rank) = self.root.as_deref()?.get_with_index(key)?;
        Some((&item.value, rank))
    }

    /// Positions a cursor so the first `next()` yields the smallest item
    /// with key `>= key`, walking upward from there.
    pub fn before(&self, key: &K) -> Cursor<'_, K, V> {
        let Some(root) = self.root.as_deref() else {
            return Cursor::empty(Direction::Ascend);
        };
        let mut stack = CursorStack::new();
        let (found, rank) = root.cursors_for(key, &mut stack);
        let stay = found
            || stack
                .last()
                .is_some_and(|top| (top.index as usize) < top.node.items.len());
        Cursor::new(stack, Direction::Ascend, stay, rank as isize - 1)
    }

    /// Positions a cursor so the first `next()` yields the largest item
    /// with key `<= key`, walking downward from there.
    pub fn after(&self, key: &K) -> Cursor<'_, K, V> {
        let Some(root) = self.root.as_deref() else {
            return Cursor::empty(Direction::Descend);
        };
        let mut stack = CursorStack::new();
        let (found, rank) = root.cursors_for(key, &mut stack);
        let pos = if found { rank as isize + 1 } else { rank as isize };
        Cursor::new(stack, Direction::Descend, found, pos)
    }

    fn iterate<F>(
        &self,
        dir: Direction,
        start: Option<&K>,
        stop: Option<&K>,
        include_start: bool,
        mut visitor: F,
    ) where
        F: FnMut(&K, &V) -> bool,
    {
        if let Some(root) = self.root.as_deref() {
            let mut hit = false;
            root.iterate(dir, start, stop, include_start, &mut hit, &mut visitor);
        }
    }

    /// Visits every entry in ascending key order until the visitor
    /// returns `false`.
    pub fn ascend<F>(&self, visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.iterate(Direction::Ascend, None, None, false, visitor);
    }

    /// Visits every entry with `key < pivot` in ascending order.
    pub fn ascend_less_than<F>(&self, pivot: &K, visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.iterate(Direction::Ascend, None, Some(pivot), false, visitor);
    }

    /// Visits every entry with `key >= pivot` in ascending order.
    pub fn ascend_greater_or_equal<F>(&self, pivot: &K, visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.iterate(Direction::Ascend, Some(pivot), None, true, visitor);
    }

    /// Visits every entry in `[greater_or_equal, less_than)` in
    /// ascending order.
    pub fn ascend_range<F>(&self, greater_or_equal: &K, less_than: &K, visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.iterate(
            Direction::Ascend,
            Some(greater_or_equal),
            Some(less_than),
            true,
            visitor,
        );
    }

    /// Visits every entry in descending key order until the visitor
    /// returns `false`.
    pub fn descend<F>(&self, visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.iterate(Direction::Descend, None, None, false, visitor);
    }

    /// Visits every entry with `key <= pivot` in descending order.
    pub fn descend_less_or_equal<F>(&self, pivot: &K, visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.iterate(Direction::Descend, Some(pivot), None, true, visitor);
    }

    /// Visits every entry with `key > pivot` in descending order.
    pub fn descend_greater_than<F>(&self, pivot: &K, visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.iterate(Direction::Descend, None, Some(pivot), false, visitor);
    }

    /// Visits every entry in `(greater_than, less_or_equal]` in
    /// descending order.
    pub fn descend_range<F>(&self, less_or_equal: &K, greater_than: &K, visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.iterate(
            Direction::Descend,
            Some(less_or_equal),
            Some(greater_than),
            true,
            visitor,
        );
    }
}

impl<K: Ord + Clone, V: Clone> BTree<K, V> {
    /// Inserts `key` with `value`, returning the previous value if an
    /// equivalent key was already present (its value is replaced).
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let max_items = self.max_items();
        let ctx = CowCtx {
            id: self.owner.load(Ordering::Relaxed),
            pool: &self.pool,
        };
        let Some(mut root) = self.root.take() else {
            let mut node = ctx.new_node();
            node.items.push(Item { key, value });
            node.count = 1;
            self.root = Some(Arc::new(node));
            self.length += 1;
            return None;
        };
        if root.items.len() >= max_items {
            let (mid, second) = writable(&mut root, ctx).split(max_items / 2, ctx);
            let mut new_root = ctx.new_node();
            new_root.count = root.count + second.count + 1;
            new_root.items.push(mid);
            new_root.children.push(root);
            new_root.children.push(Arc::new(second));
            root = Arc::new(new_root);
        }
        let old = writable(&mut root, ctx).insert(Item { key, value }, max_items, ctx);
        self.root = Some(root);
        if old.is_none() {
            self.length += 1;
        }
        old
    }

    /// Removes `key`, returning its value if it was present.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.remove_kind(Removal::ByKey(key)).map(|item| item.value)
    }

    /// Removes and returns the smallest entry, or `None` if the tree is
    /// empty.
    pub fn delete_min(&mut self) -> Option<(K, V)> {
        self.remove_kind(Removal::Min)
            .map(|item| (item.key, item.value))
    }

    /// Removes and returns the largest entry, or `None` if the tree is
    /// empty.
    pub fn delete_max(&mut self) -> Option<(K, V)> {
        self.remove_kind(Removal::Max)
            .map(|item| (item.key, item.value))
    }

    fn remove_kind(&mut self, what: Removal<'_, K>) -> Option<Item<K, V>> {
        let min_items = self.min_items();
        let ctx = CowCtx {
            id: self.owner.load(Ordering::Relaxed),
            pool: &self.pool,
        };
        let mut root = match self.root.take() {
            Some(root) if !root.items.is_empty() => root,
            other => {
                self.root = other;
                return None;
            }
        };
        let out = writable(&mut root, ctx).remove(what, min_items, ctx);
        if root.items.is_empty() {
            if root.children.is_empty() {
                ctx.free_node(root);
                self.root = None;
            } else {
                let child = Arc::clone(&root.children[0]);
                ctx.free_node(mem::replace(&mut root, child));
                self.root = Some(root);
            }
        } else {
            self.root = Some(root);
        }
        if out.is_some() {
            self.length -= 1;
        }
        out
    }
}

impl<K, V> Clone for BTree<K, V> {
    /// Lazy O(1) clone. No node is copied; both handles take fresh write
    /// contexts and share the existing structure read-only, copying
    /// nodes on demand as each is subsequently mutated.
    fn clone(&self) -> Self {
        let out = Self {
            degree: self.degree,
            length: self.length,
            root: self.root.clone(),
            owner: AtomicU64::new(next_owner_id()),
            pool: Arc::clone(&self.pool),
        };
        self.owner.store(next_owner_id(), Ordering::Relaxed);
        out
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
