pub mod common;
pub use common::*;

use proptest::prelude::*;
use std::collections::BTreeSet;
use trike_trees::splay::SplayTree;
use trike_trees::weight::{IntegerBalance, ReferenceBalance, WeightTree};

pub fn round_action_strategy(max_value: u32) -> impl Strategy<Value = RoundAction> {
    prop_oneof![
        (0..max_value).prop_map(|value| RoundAction::Insert { value }),
        (0..max_value).prop_map(|value| RoundAction::Find { value }),
        any::<usize>().prop_map(|index| RoundAction::Remove { index }),
    ]
}

// Mostly insertions, so that the trees grow
fn growing_params(max_value: u32) -> impl Strategy<Value = Vec<RoundAction>> {
    proptest::collection::vec(
        prop_oneof![
            3 => (0..max_value).prop_map(|value| RoundAction::Insert { value }),
            1 => round_action_strategy(max_value),
        ],
        1..400,
    )
}

proptest::proptest! {
    #[test]
    fn weight_consistency_proptest(actions in growing_params(500)) {
        check_weight_tree::<ReferenceBalance>(&actions);
    }

    #[test]
    fn weight_integer_balance_consistency_proptest(actions in growing_params(500)) {
        check_weight_tree::<IntegerBalance>(&actions);
    }

    #[test]
    fn splay_consistency_proptest(actions in growing_params(500)) {
        check_splay_tree(&actions);
    }

    #[test]
    fn weight_height_bound_proptest(values in proptest::collection::vec(any::<u32>(), 1..2_000)) {
        let mut tree = WeightTree::new();
        for value in values {
            tree.insert(value).unwrap();
        }
        prop_assert!(tree.height() as f64 <= height_bound(tree.size()));
    }

    #[test]
    fn weight_select_find_round_trip_proptest(
        values in proptest::collection::vec(any::<u32>(), 0..300)
    ) {
        let tree: WeightTree<u32> = values.iter().cloned().collect();
        for value in values.iter() {
            let rank = tree.find(value);
            prop_assert!(rank >= 1);
            prop_assert_eq!(tree.select(rank), value);
        }
    }

    #[test]
    fn overwrite_keeps_one_node_proptest(values in proptest::collection::vec(0..50u32, 1..200)) {
        let mut splay = SplayTree::new();
        let mut weight = WeightTree::new();
        for value in values.iter() {
            splay.insert(*value).unwrap();
            weight.insert(*value).unwrap();
        }
        let distinct: BTreeSet<_> = values.iter().cloned().collect();
        for value in values.iter() {
            prop_assert_eq!(splay.insert(*value), Ok(Some(*value)));
            let size = weight.size();
            let rank = weight.find(value);
            prop_assert_eq!(weight.insert(*value), Ok(rank));
            prop_assert_eq!(weight.size(), size);
        }
        prop_assert_eq!(splay.len(), distinct.len());
        prop_assert_eq!(weight.size(), distinct.len());
    }

    #[test]
    fn splay_drain_proptest(values in proptest::collection::vec(any::<u32>(), 0..300)) {
        let mut tree: SplayTree<u32> = values.iter().cloned().collect();
        let distinct: BTreeSet<_> = values.iter().cloned().collect();
        let mut drained = BTreeSet::new();
        while !tree.is_empty() {
            prop_assert!(drained.insert(tree.pop()));
        }
        prop_assert_eq!(drained, distinct);
    }

    #[test]
    fn splay_sorted_walk_proptest(values in proptest::collection::vec(any::<u32>(), 1..300)) {
        let mut tree: SplayTree<u32> = values.iter().cloned().collect();
        let mut walk = vec![*tree.min()];
        while tree.next() {
            walk.push(*tree.root());
        }
        prop_assert!(is_strictly_increasing(&walk));
        prop_assert_eq!(walk.len(), tree.len());
        tree.assert_correctness();
    }
}
