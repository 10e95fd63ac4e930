mod common;
use common::*;

use rand::{rngs::StdRng, SeedableRng};
use trike_trees::compare::{payload, PositionOrder};
use trike_trees::random::{choose, rand_size_t};
use trike_trees::splay::SplayTree;
use trike_trees::weight::{IntegerBalance, NoBalance, ReferenceBalance, WeightTree};

#[test]
fn weight_tree_from_balanced_insertions() {
    let mut tree = WeightTree::new();
    for x in [4, 2, 6, 1, 3, 5, 7].iter() {
        tree.insert(*x).unwrap();
    }
    assert_eq!(tree.size(), 7);
    assert_eq!(*tree.select(1), 1);
    assert_eq!(*tree.select(7), 7);
    assert_eq!(tree.find(&5), 5);
}

#[test]
fn splay_find_makes_root() {
    let mut tree = SplayTree::new();
    for x in [5, 3, 8, 1].iter() {
        tree.insert(*x).unwrap();
    }
    assert!(tree.find(&3));
    assert_eq!(*tree.root(), 3);
}

#[test]
fn weight_remove_last_rank() {
    let mut tree: WeightTree<u32> = (0..100).map(|x| (x * 13) % 100).collect();
    while !tree.is_empty() {
        let size = tree.size();
        let max = *tree.last().unwrap();
        assert_eq!(tree.remove(size), max);
        assert_eq!(tree.size(), size - 1);
        assert!(tree.iter().all(|x| *x < max));
    }
}

#[test]
fn find_on_empty_trees() {
    let mut splay: SplayTree<u32> = SplayTree::new();
    assert!(!splay.find(&3));
    assert!(splay.is_empty());
    assert_eq!(splay.peek(), None);
    assert_eq!(splay.get(&3), None);

    let weight: WeightTree<u32> = WeightTree::new();
    assert_eq!(weight.find(&3), 0);
    assert!(weight.is_empty());
    assert_eq!(weight.first(), None);
}

#[test]
fn splay_drain_is_a_permutation() {
    let values: Vec<u32> = (0..500).map(|x| (x * 7_919) % 1_000).collect();
    let mut tree: SplayTree<u32> = values.iter().cloned().collect();
    let mut drained = vec![];
    while !tree.is_empty() {
        drained.push(tree.pop());
    }
    assert_eq!(drained.len(), values.len());
    drained.sort_unstable();
    let mut expected = values;
    expected.sort_unstable();
    assert_eq!(drained, expected);
}

#[test]
fn position_cache() {
    // key bits above the low byte, value in the low byte
    fn hash(key: u64, value: u8) -> u64 {
        (key << 8) | value as u64
    }

    let mut cache: SplayTree<u64, PositionOrder> = SplayTree::default();
    for key in 0..1_000 {
        assert_eq!(cache.insert(hash(key * 3, (key % 7) as u8)), Ok(None));
    }
    assert_eq!(cache.insert(hash(300, 200)), Ok(Some(hash(300, 100 % 7))));
    assert_eq!(cache.get(&hash(300, 0)).cloned().map(payload), Some(200));
    assert_eq!(*cache.root(), hash(300, 200));
    assert_eq!(cache.get(&hash(301, 0)), None);

    let mut cleared = 0;
    while !cache.is_empty() {
        cache.pop();
        cleared += 1;
    }
    assert_eq!(cleared, 1_000);
}

#[test]
fn splay_cache_into_rank_tree() {
    let mut cache: SplayTree<u64, PositionOrder> = SplayTree::default();
    for key in (0..256u64).rev() {
        cache.insert((key << 8) | 1).unwrap();
    }
    let ranked: WeightTree<u64, PositionOrder> = cache.into();
    ranked.assert_correctness();
    assert_eq!(ranked.size(), 256);
    assert_eq!(ranked.find(&(17 << 8)), 18);
    assert_eq!(*ranked.select(18), (17 << 8) | 1);
}

#[test]
fn splay_and_model_consistency() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let actions: Vec<_> = (0..5_000).map(|_| random_round_action(&mut rng, 300)).collect();
    check_splay_tree(&actions);
}

#[test]
fn weight_and_model_consistency() {
    let mut rng = StdRng::seed_from_u64(0xba1a);
    let actions: Vec<_> = (0..5_000).map(|_| random_round_action(&mut rng, 300)).collect();
    let tree = check_weight_tree::<ReferenceBalance>(&actions);
    assert!(tree.height() as f64 <= height_bound(tree.size()) || tree.is_empty());
    check_weight_tree::<IntegerBalance>(&actions);
    check_weight_tree::<NoBalance>(&actions);
}

#[test]
fn weight_remove_value() {
    let mut tree: WeightTree<u32> = (0..20).collect();
    assert_eq!(tree.remove_value(&7), Some(7));
    assert_eq!(tree.remove_value(&7), None);
    assert!(!tree.contains(&7));
    assert_eq!(tree.get(&8), Some(&8));
    assert_eq!(tree.size(), 19);
    assert!(is_strictly_increasing(&tree));
}

#[test]
fn random_moves_are_reproducible() {
    let moves = [3u8, 9, 14, 20, 27];
    let picks = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..50)
            .map(|_| *choose(&mut rng, &moves[..]).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(picks(11), picks(11));
    let mut rng = StdRng::seed_from_u64(11);
    assert!((0..1_000).all(|_| rand_size_t(&mut rng, moves.len()) < moves.len()));
}
