use itertools::Itertools;
use rand::Rng;
use std::collections::BTreeSet;
use trike_trees::splay::SplayTree;
use trike_trees::weight::{Balance, WeightTree};
use trike_trees::NaturalOrder;

/// Something to perform in one round of tests
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum RoundAction {
    Insert { value: u32 },
    Find { value: u32 },
    /// Removes the element at `index % len`. For a splay tree, pops the root instead.
    Remove { index: usize },
}

pub fn random_round_action<R: Rng>(rng: &mut R, max_value: u32) -> RoundAction {
    use RoundAction::*;
    match rng.gen_range(0..3) {
        0 => Insert {
            value: rng.gen_range(0..max_value),
        },
        1 => Find {
            value: rng.gen_range(0..max_value),
        },
        _ => Remove {
            index: rng.gen_range(0..usize::MAX),
        },
    }
}

pub fn is_strictly_increasing<'a, I: IntoIterator<Item = &'a u32>>(iter: I) -> bool {
    iter.into_iter().tuple_windows().all(|(a, b)| a < b)
}

/// The documented height bound of the reference balance constants.
pub fn height_bound(size: usize) -> f64 {
    2.06 * ((size + 1) as f64).log2()
}

/// Runs the actions on a weight tree and on a `BTreeSet`, and checks that they agree.
pub fn check_weight_tree<B: Balance>(actions: &[RoundAction]) -> WeightTree<u32, NaturalOrder, B> {
    use RoundAction::*;
    let mut tree: WeightTree<u32, NaturalOrder, B> = WeightTree::default();
    let mut model = BTreeSet::new();
    for action in actions {
        match *action {
            Insert { value } => {
                model.insert(value);
                let rank = tree.insert(value).unwrap();
                assert_eq!(rank, model.range(..value).count() + 1);
            }
            Find { value } => {
                let rank = tree.find(&value);
                if model.contains(&value) {
                    assert_eq!(rank, model.range(..value).count() + 1);
                    assert_eq!(*tree.select(rank), value);
                } else {
                    assert_eq!(rank, 0);
                }
            }
            Remove { index } if !model.is_empty() => {
                let rank = index % model.len() + 1;
                let expected = *model.iter().nth(rank - 1).unwrap();
                assert_eq!(tree.remove(rank), expected);
                model.remove(&expected);
            }
            Remove { .. } => assert!(tree.is_empty()),
        }
        assert_eq!(tree.size(), model.len());
        tree.assert_correctness();
    }
    assert!(tree.iter().eq(model.iter()));
    tree
}

/// Runs the actions on a splay tree and on a `BTreeSet`, and checks that they agree.
pub fn check_splay_tree(actions: &[RoundAction]) -> SplayTree<u32> {
    use RoundAction::*;
    let mut tree = SplayTree::new();
    let mut model = BTreeSet::new();
    for action in actions {
        match *action {
            Insert { value } => {
                let fresh = model.insert(value);
                let old = tree.insert(value).unwrap();
                assert_eq!(old.is_none(), fresh);
                assert_eq!(*tree.root(), value);
            }
            Find { value } => {
                let found = tree.find(&value);
                assert_eq!(found, model.contains(&value));
                if found {
                    assert_eq!(*tree.root(), value);
                }
            }
            Remove { .. } if !model.is_empty() => {
                let value = tree.pop();
                assert!(model.remove(&value));
            }
            Remove { .. } => assert!(tree.is_empty()),
        }
        tree.assert_correctness();
    }
    assert_eq!(tree.len(), model.len());
    assert!(tree.iter().eq(model.iter()));
    tree
}
