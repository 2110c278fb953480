//! Model-based property tests: random operation sequences are applied to
//! both a [`BTree`] and `std::collections::BTreeMap`, and every observable
//! must agree at every step.

use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::BTree;

/// Keys are folded into a small space so sequences actually collide,
/// replace, and delete existing entries.
const KEY_SPACE: u16 = 97;

#[derive(Arbitrary, Debug, Clone)]
enum Action {
    Set(u16, u16),
    Delete(u16),
    DeleteMin,
    DeleteMax,
}

fn apply(tree: &mut BTree<u16, u16>, model: &mut BTreeMap<u16, u16>, action: &Action) {
    match action {
        Action::Set(k, v) => {
            let k = k % KEY_SPACE;
            assert_eq!(tree.set(k, *v), model.insert(k, *v));
        }
        Action::Delete(k) => {
            let k = k % KEY_SPACE;
            assert_eq!(tree.delete(&k), model.remove(&k));
        }
        Action::DeleteMin => {
            let want = model.iter().next().map(|(k, v)| (*k, *v));
            if let Some((k, _)) = want {
                model.remove(&k);
            }
            assert_eq!(tree.delete_min(), want);
        }
        Action::DeleteMax => {
            let want = model.iter().next_back().map(|(k, v)| (*k, *v));
            if let Some((k, _)) = want {
                model.remove(&k);
            }
            assert_eq!(tree.delete_max(), want);
        }
    }
}

fn entries(tree: &BTree<u16, u16>) -> Vec<(u16, u16)> {
    let mut out = Vec::new();
    tree.ascend(|k, v| {
        out.push((*k, *v));
        true
    });
    out
}

proptest! {
    #[test]
    fn behaves_like_btreemap(
        degree in 2usize..7,
        actions in proptest::collection::vec(any::<Action>(), 0..400),
    ) {
        let mut tree = BTree::new(degree);
        let mut model = BTreeMap::new();

        for action in &actions {
            apply(&mut tree, &mut model, action);
            prop_assert_eq!(tree.len(), model.len());
        }

        prop_assert_eq!(entries(&tree), model.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>());
        prop_assert_eq!(tree.min(), model.iter().next());
        prop_assert_eq!(tree.max(), model.iter().next_back());
    }

    #[test]
    fn descend_is_reverse_of_ascend(
        degree in 2usize..7,
        actions in proptest::collection::vec(any::<Action>(), 0..200),
    ) {
        let mut tree = BTree::new(degree);
        let mut model = BTreeMap::new();
        for action in &actions {
            apply(&mut tree, &mut model, action);
        }

        let mut forward = entries(&tree);
        let mut backward = Vec::new();
        tree.descend(|k, v| {
            backward.push((*k, *v));
            true
        });
        forward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn rank_lookups_are_consistent(
        degree in 2usize..7,
        keys in proptest::collection::btree_set(0u16..512, 0..200),
    ) {
        let mut tree = BTree::new(degree);
        for &k in &keys {
            tree.set(k, k);
        }

        for (rank, &k) in keys.iter().enumerate() {
            let (_, got_rank) = tree.get_with_index(&k).expect("key was inserted");
            prop_assert_eq!(got_rank, rank);
            let (got_key, _) = tree.at(rank);
            prop_assert_eq!(*got_key, k);
        }
    }

    #[test]
    fn clone_is_isolated_from_later_writes(
        degree in 2usize..7,
        before in proptest::collection::vec(any::<Action>(), 0..150),
        after in proptest::collection::vec(any::<Action>(), 0..150),
    ) {
        let mut tree = BTree::new(degree);
        let mut model = BTreeMap::new();
        for action in &before {
            apply(&mut tree, &mut model, action);
        }

        let snapshot_tree = tree.clone();
        let snapshot_entries = entries(&snapshot_tree);

        // Keep mutating both the original and, independently, the clone;
        // the model tracks the original.
        let mut clone_tree = snapshot_tree.clone();
        let mut clone_model: BTreeMap<u16, u16> = snapshot_entries.iter().copied().collect();
        for action in &after {
            apply(&mut tree, &mut model, action);
            apply(&mut clone_tree, &mut clone_model, action);
        }

        prop_assert_eq!(entries(&snapshot_tree), snapshot_entries);
        prop_assert_eq!(entries(&tree), model.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>());
        prop_assert_eq!(
            entries(&clone_tree),
            clone_model.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn cursor_walks_match_range_queries(
        keys in proptest::collection::btree_set(0u16..256, 0..120),
        pivot in 0u16..256,
    ) {
        let mut tree = BTree::new(2);
        for &k in &keys {
            tree.set(k, k);
        }

        let mut up = Vec::new();
        let mut cursor = tree.before(&pivot);
        while cursor.next() {
            up.push(*cursor.key().expect("key after successful next"));
        }
        let want_up: Vec<u16> = keys.iter().copied().filter(|k| *k >= pivot).collect();
        prop_assert_eq!(up, want_up);

        let mut down = Vec::new();
        let mut cursor = tree.after(&pivot);
        while cursor.next() {
            down.push(*cursor.key().expect("key after successful next"));
        }
        let mut want_down: Vec<u16> = keys.iter().copied().filter(|k| *k <= pivot).collect();
        want_down.reverse();
        prop_assert_eq!(down, want_down);
    }
}
