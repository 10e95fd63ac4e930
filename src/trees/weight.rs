//! Weight-balanced trees (BB[α] trees).
//!
//! Every node stores the size of its subtree, which is all the bookkeeping the tree needs:
//! it serves both to answer rank queries and to keep the tree balanced.
//! The weight of a subtree is its size plus one. A node is balanced when neither son's weight
//! is more than `DELTA` times the other's; after an insertion or a removal, every node on
//! the path is checked, and an unbalanced node is fixed by a single rotation or,
//! if the inner grandson is too heavy compared to `GAMMA`, a double rotation.
//!
//! Ranks are 1-based. A rank of `0` stands for "not found".
//!
//!```
//! use trike_trees::weight::WeightTree;
//!
//! let mut tree = WeightTree::new();
//! for x in [4, 2, 6, 1, 3, 5, 7].iter() {
//!     tree.insert(*x).unwrap();
//! }
//! assert_eq!(tree.size(), 7);
//! assert_eq!(tree.find(&5), 5);
//! assert_eq!(*tree.select(1), 1);
//! assert_eq!(tree.remove(7), 7);
//! # tree.assert_correctness();
//!```

use super::boxed::try_box;
use super::iterative_deallocator::deallocate_iteratively;
use super::iterators::Iter;
use super::TreeNode;
use crate::compare::{Comparator, NaturalOrder};
use crate::error::Result;
use std::cmp::Ordering;
use std::marker::PhantomData;

const RANK_ERROR: &str = "precondition violated: rank out of range";
const INVARIANT_ERROR: &str = "invariant violated: subtree sizes are inconsistent";

type Link<T> = Option<Box<WeightNode<T>>>;

pub struct WeightNode<T> {
    left: Link<T>,
    right: Link<T>,
    size: usize,
    value: T,
}

fn size<T>(tree: &Link<T>) -> usize {
    tree.as_ref().map_or(0, |node| node.size)
}

fn weight<T>(tree: &Link<T>) -> usize {
    size(tree) + 1
}

impl<T> WeightNode<T> {
    fn leaf(value: T) -> Self {
        WeightNode {
            left: None,
            right: None,
            size: 1,
            value,
        }
    }

    fn resize(&mut self) {
        self.size = 1 + size(&self.left) + size(&self.right);
    }
}

impl<T> TreeNode for WeightNode<T> {
    type Value = T;

    fn value(&self) -> &T {
        &self.value
    }

    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    fn take_children(&mut self) -> (Link<T>, Link<T>) {
        (self.left.take(), self.right.take())
    }
}

/// The rebalancing constants, as the fractions `DELTA_NUM / DELTA_DEN` and
/// `GAMMA_NUM / GAMMA_DEN`.
pub trait Balance {
    const DELTA_NUM: usize;
    const DELTA_DEN: usize;
    const GAMMA_NUM: usize;
    const GAMMA_DEN: usize;
}

/// `DELTA = 5/2`, `GAMMA = 3/2`. The height is at most about `2.06 * log2(n)`,
/// comparable to a red-black tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceBalance;

impl Balance for ReferenceBalance {
    const DELTA_NUM: usize = 5;
    const DELTA_DEN: usize = 2;
    const GAMMA_NUM: usize = 3;
    const GAMMA_DEN: usize = 2;
}

/// `DELTA = 3`, `GAMMA = 2`. Fewer rotations, height at most about `2.41 * log2(n)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerBalance;

impl Balance for IntegerBalance {
    const DELTA_NUM: usize = 3;
    const DELTA_DEN: usize = 1;
    const GAMMA_NUM: usize = 2;
    const GAMMA_DEN: usize = 1;
}

/// `DELTA = GAMMA = 1/0`: no node is ever too heavy, giving a plain binary search tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBalance;

impl Balance for NoBalance {
    const DELTA_NUM: usize = 1;
    const DELTA_DEN: usize = 0;
    const GAMMA_NUM: usize = 1;
    const GAMMA_DEN: usize = 0;
}

/// Performs a right rotation, and returns the new root of the subtree.
/// Does nothing if there is no left son.
fn rotate_right<T>(mut node: Box<WeightNode<T>>) -> Box<WeightNode<T>> {
    let mut pivot = match node.left.take() {
        Some(pivot) => pivot,
        None => return node,
    };
    node.left = pivot.right.take();
    pivot.size = node.size;
    node.resize();
    pivot.right = Some(node);
    pivot
}

/// Performs a left rotation, and returns the new root of the subtree.
/// Does nothing if there is no right son.
fn rotate_left<T>(mut node: Box<WeightNode<T>>) -> Box<WeightNode<T>> {
    let mut pivot = match node.right.take() {
        Some(pivot) => pivot,
        None => return node,
    };
    node.right = pivot.left.take();
    pivot.size = node.size;
    node.resize();
    pivot.left = Some(node);
    pivot
}

/// Restores the weight balance at `node`, whose sons are balanced and whose size is correct.
fn rebalance<T, B: Balance>(mut node: Box<WeightNode<T>>) -> Box<WeightNode<T>> {
    let l_weight = weight(&node.left);
    let r_weight = weight(&node.right);
    if B::DELTA_NUM * r_weight < B::DELTA_DEN * l_weight {
        let grandsons = node.left.as_ref().map(|left| (weight(&left.left), weight(&left.right)));
        let (outer, inner) = match grandsons {
            Some(weights) => weights,
            None => return node,
        };
        if B::GAMMA_DEN * inner >= B::GAMMA_NUM * outer {
            node.left = node.left.take().map(rotate_left);
        }
        rotate_right(node)
    } else if B::DELTA_NUM * l_weight < B::DELTA_DEN * r_weight {
        let grandsons = node
            .right
            .as_ref()
            .map(|right| (weight(&right.left), weight(&right.right)));
        let (inner, outer) = match grandsons {
            Some(weights) => weights,
            None => return node,
        };
        if B::GAMMA_DEN * inner >= B::GAMMA_NUM * outer {
            node.right = node.right.take().map(rotate_right);
        }
        rotate_left(node)
    } else {
        node
    }
}

fn rebalance_link<T, B: Balance>(link: &mut Link<T>) {
    if let Some(node) = link.take() {
        *link = Some(rebalance::<T, B>(node));
    }
}

/// Builds a perfectly balanced tree out of the first `count` values of `values`,
/// which must be sorted.
fn build_balanced<T, I: Iterator<Item = T>>(values: &mut I, count: usize) -> Link<T> {
    if count == 0 {
        return None;
    }
    let left_count = count / 2;
    let left = build_balanced(values, left_count);
    let value = values.next()?;
    let right = build_balanced(values, count - left_count - 1);
    let mut node = WeightNode::leaf(value);
    node.left = left;
    node.right = right;
    node.resize();
    match try_box(node) {
        Ok(node) => Some(node),
        Err(_) => std::alloc::handle_alloc_error(std::alloc::Layout::new::<WeightNode<T>>()),
    }
}

/// A weight-balanced tree holding unique elements under the order `C`,
/// balanced according to `B`.
pub struct WeightTree<T, C = NaturalOrder, B = ReferenceBalance> {
    root: Link<T>,
    cmp: C,
    balance: PhantomData<B>,
}

impl<T: Ord> WeightTree<T> {
    pub fn new() -> Self {
        WeightTree::with_comparator(NaturalOrder)
    }
}

impl<T, C: Default, B> Default for WeightTree<T, C, B> {
    fn default() -> Self {
        WeightTree::with_comparator(C::default())
    }
}

impl<T, C, B> WeightTree<T, C, B> {
    pub fn with_comparator(cmp: C) -> Self {
        WeightTree {
            root: None,
            cmp,
            balance: PhantomData,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Number of elements, in `O(1)` time.
    pub fn size(&self) -> usize {
        size(&self.root)
    }

    pub fn len(&self) -> usize {
        self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn height(&self) -> usize {
        super::height(self.root.as_deref())
    }

    pub fn iter(&self) -> Iter<'_, WeightNode<T>> {
        Iter::new(self.root.as_deref())
    }

    /// Returns the element with the given 1-based rank.
    /// Panics unless `1 <= rank <= self.size()`.
    pub fn select(&self, rank: usize) -> &T {
        let size = self.size();
        assert!(1 <= rank && rank <= size, "{}", RANK_ERROR);
        let mut node = self.root.as_deref().expect(RANK_ERROR);
        if rank == 1 {
            while let Some(left) = node.left.as_deref() {
                node = left;
            }
        } else if rank == size {
            while let Some(right) = node.right.as_deref() {
                node = right;
            }
        } else {
            let mut target = rank;
            loop {
                let l_weight = weight(&node.left);
                match target.cmp(&l_weight) {
                    Ordering::Equal => break,
                    Ordering::Less => node = node.left.as_deref().expect(INVARIANT_ERROR),
                    Ordering::Greater => {
                        target -= l_weight;
                        node = node.right.as_deref().expect(INVARIANT_ERROR);
                    }
                }
            }
        }
        &node.value
    }

    pub fn first(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            Some(self.select(1))
        }
    }

    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            Some(self.select(self.size()))
        }
    }

    /// Deallocates the whole tree in `O(n)` time.
    pub fn clear(&mut self) {
        deallocate_iteratively(&mut self.root);
    }
}

impl<T, C, B: Balance> WeightTree<T, C, B> {
    /// Removes the element with the given 1-based rank, and returns it.
    /// Panics unless `1 <= rank <= self.size()`.
    pub fn remove(&mut self, rank: usize) -> T {
        assert!(!self.is_empty(), "precondition violated: the weight tree is empty");
        assert!(1 <= rank && rank <= self.size(), "{}", RANK_ERROR);
        Self::remove_at(&mut self.root, rank)
    }

    fn remove_at(link: &mut Link<T>, rank: usize) -> T {
        let node = link.as_deref_mut().expect(INVARIANT_ERROR);
        let l_weight = weight(&node.left);
        let value = if l_weight > rank {
            Self::remove_at(&mut node.left, rank)
        } else if l_weight < rank {
            Self::remove_at(&mut node.right, rank - l_weight)
        } else if node.left.is_some() && node.right.is_some() {
            // the successor takes this node's place, and its own node is removed instead.
            let next = Self::remove_at(&mut node.right, 1);
            std::mem::replace(&mut node.value, next)
        } else {
            let mut old = link.take().expect(INVARIANT_ERROR);
            let (left, right) = old.take_children();
            *link = left.or(right);
            let WeightNode { value, .. } = *old;
            return value;
        };
        node.resize();
        rebalance_link::<T, B>(link);
        value
    }
}

impl<T, C: Comparator<T>, B: Balance> WeightTree<T, C, B> {
    /// Returns the rank of `x`, or `0` if it isn't present. Doesn't restructure the tree.
    pub fn find(&self, x: &T) -> usize {
        let mut tree = self.root.as_deref();
        let mut rank = 1;
        while let Some(node) = tree {
            if self.cmp.less(x, &node.value) {
                tree = node.left.as_deref();
            } else {
                rank += size(&node.left);
                if self.cmp.less(&node.value, x) {
                    tree = node.right.as_deref();
                    rank += 1;
                } else {
                    return rank;
                }
            }
        }
        0
    }

    pub fn contains(&self, x: &T) -> bool {
        self.find(x) != 0
    }

    /// Finds the stored element equal to `x`.
    pub fn get(&self, x: &T) -> Option<&T> {
        let mut tree = self.root.as_deref();
        while let Some(node) = tree {
            match self.cmp.compare(x, &node.value) {
                Ordering::Less => tree = node.left.as_deref(),
                Ordering::Greater => tree = node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    /// Inserts `value`, and returns its rank.
    ///
    /// If an equal element is already present, it is overwritten in place. If a new node
    /// can't be allocated, returns an error and leaves the tree unchanged.
    pub fn insert(&mut self, value: T) -> Result<usize> {
        Self::insert_at(&mut self.root, value, &self.cmp)
    }

    fn insert_at(link: &mut Link<T>, value: T, cmp: &C) -> Result<usize> {
        let node = match link {
            Some(node) => node,
            None => {
                *link = Some(try_box(WeightNode::leaf(value))?);
                return Ok(1);
            }
        };
        let rank = match cmp.compare(&value, &node.value) {
            Ordering::Less => Self::insert_at(&mut node.left, value, cmp)?,
            Ordering::Greater => Self::insert_at(&mut node.right, value, cmp)? + weight(&node.left),
            Ordering::Equal => {
                // nothing moved, so there is nothing to rebalance
                node.value = value;
                return Ok(weight(&node.left));
            }
        };
        node.resize();
        rebalance_link::<T, B>(link);
        Ok(rank)
    }

    /// Removes the element equal to `x`, if there is one.
    pub fn remove_value(&mut self, x: &T) -> Option<T> {
        match self.find(x) {
            0 => None,
            rank => Some(self.remove(rank)),
        }
    }

    /// Checks that the elements are in order, and that every node's size and
    /// weight balance are correct. If not, panics.
    pub fn assert_correctness(&self) {
        let mut iter = self.iter();
        if let Some(mut prev) = iter.next() {
            for value in iter {
                assert!(self.cmp.less(prev, value), "weight tree out of order");
                prev = value;
            }
        }

        let mut stack: Vec<&WeightNode<T>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            assert_eq!(node.size, 1 + size(&node.left) + size(&node.right));
            let l_weight = weight(&node.left);
            let r_weight = weight(&node.right);
            assert!(B::DELTA_NUM * r_weight >= B::DELTA_DEN * l_weight, "left side too heavy");
            assert!(B::DELTA_NUM * l_weight >= B::DELTA_DEN * r_weight, "right side too heavy");
            stack.extend(node.left.as_deref());
            stack.extend(node.right.as_deref());
        }
    }
}

impl<T, C, B> Drop for WeightTree<T, C, B> {
    fn drop(&mut self) {
        deallocate_iteratively(&mut self.root);
    }
}

impl<T: std::fmt::Debug, C, B> std::fmt::Debug for WeightTree<T, C, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, C: Comparator<T>, B: Balance> Extend<T> for WeightTree<T, C, B> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if self.insert(value).is_err() {
                std::alloc::handle_alloc_error(std::alloc::Layout::new::<WeightNode<T>>());
            }
        }
    }
}

impl<T, C: Comparator<T> + Default, B: Balance> std::iter::FromIterator<T> for WeightTree<T, C, B> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = WeightTree::default();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Clone, B> From<super::splay::SplayTree<T, C>> for WeightTree<T, C, B> {
    /// Moves the elements of a splay tree into a perfectly balanced weight tree,
    /// keeping the order. Takes `O(n)` time.
    fn from(tree: super::splay::SplayTree<T, C>) -> Self {
        let cmp = tree.comparator().clone();
        let values: Vec<T> = tree.into_iter().collect();
        let count = values.len();
        WeightTree {
            root: build_balanced(&mut values.into_iter(), count),
            cmp,
            balance: PhantomData,
        }
    }
}

/// Drains a weight tree in increasing order.
pub struct IntoIter<T, C, B> {
    tree: WeightTree<T, C, B>,
}

impl<T, C, B: Balance> Iterator for IntoIter<T, C, B> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.tree.is_empty() {
            None
        } else {
            Some(self.tree.remove(1))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.size(), Some(self.tree.size()))
    }
}

impl<T, C, B: Balance> ExactSizeIterator for IntoIter<T, C, B> {}

impl<T, C, B: Balance> IntoIterator for WeightTree<T, C, B> {
    type Item = T;
    type IntoIter = IntoIter<T, C, B>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { tree: self }
    }
}

impl<'a, T, C, B> IntoIterator for &'a WeightTree<T, C, B> {
    type Item = &'a T;
    type IntoIter = Iter<'a, WeightNode<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[test]
fn weight_scenario() {
    let mut tree = WeightTree::new();
    for x in [4, 2, 6, 1, 3, 5, 7].iter() {
        tree.insert(*x).unwrap();
    }
    assert_eq!(tree.size(), 7);
    assert_eq!(*tree.select(1), 1);
    assert_eq!(*tree.select(7), 7);
    assert_eq!(tree.find(&5), 5);
    assert_eq!(tree.find(&8), 0);
    tree.assert_correctness();
}

#[test]
fn weight_insert_reports_rank() {
    let mut tree = WeightTree::new();
    assert_eq!(tree.insert(10), Ok(1));
    assert_eq!(tree.insert(30), Ok(2));
    assert_eq!(tree.insert(20), Ok(2));
    assert_eq!(tree.insert(0), Ok(1));
    assert_eq!(tree.insert(40), Ok(5));
    tree.assert_correctness();
}

#[test]
fn weight_overwrite_keeps_size() {
    let mut tree: WeightTree<(u32, char), _> =
        WeightTree::with_comparator(|a: &(u32, char), b: &(u32, char)| a.0 < b.0);
    for x in 0..10 {
        tree.insert((x, 'a')).unwrap();
    }
    // the rank of an overwritten element is still accumulated on the way up the path
    assert_eq!(tree.insert((6, 'b')), Ok(7));
    assert_eq!(tree.size(), 10);
    assert_eq!(*tree.select(7), (6, 'b'));
    tree.assert_correctness();
}

#[test]
fn weight_overwrite_rank_comes_from_the_matched_node() {
    // The matched node answers with its own left weight and skips rebalancing;
    // its ancestors still add their left weights on the way up.
    let mut tree: WeightTree<i32> = [4, 2, 6, 1, 3, 5, 7].iter().cloned().collect();
    assert_eq!(tree.height(), 3);
    assert_eq!(tree.insert(4), Ok(4));
    assert_eq!(tree.insert(5), Ok(5));
    assert_eq!(tree.insert(1), Ok(1));
    assert_eq!(tree.height(), 3);
    assert_eq!(tree.size(), 7);
}

#[test]
fn weight_remove_every_rank() {
    let arr: Vec<_> = (0..200).collect();
    for rank in 1..=arr.len() {
        let mut tree: WeightTree<i32> = arr.iter().cloned().collect();
        assert_eq!(tree.remove(rank), arr[rank - 1]);
        assert_eq!(tree.size(), arr.len() - 1);
        tree.assert_correctness();
        assert_eq!(
            tree.into_iter().collect::<Vec<_>>(),
            arr[..rank - 1]
                .iter()
                .chain(arr[rank..].iter())
                .cloned()
                .collect::<Vec<_>>()
        );
    }
}

#[test]
fn weight_sequential_insertions_stay_balanced() {
    let mut tree = WeightTree::new();
    for x in 0..10_000u32 {
        tree.insert(x).unwrap();
    }
    tree.assert_correctness();
    let bound = 2.06 * ((tree.size() + 1) as f64).log2();
    assert!((tree.height() as f64) <= bound);
}

#[test]
fn weight_no_balance_is_a_plain_bst() {
    let mut tree: WeightTree<u32, NaturalOrder, NoBalance> = WeightTree::default();
    for x in 0..100 {
        tree.insert(x).unwrap();
    }
    assert_eq!(tree.height(), 100);
    assert_eq!(tree.find(&57), 58);
    assert_eq!(tree.remove(1), 0);
    tree.assert_correctness();
}

#[test]
fn weight_allocation_failure_keeps_tree() {
    let mut tree: WeightTree<i32> = (0..50).map(|x| x * 2).collect();
    super::boxed::fail_next_allocation();
    assert_eq!(tree.insert(31), Err(crate::error::AllocError));
    assert_eq!(tree.size(), 50);
    assert_eq!(tree.find(&31), 0);
    tree.assert_correctness();
    assert_eq!(tree.insert(31), Ok(17));
}

#[test]
fn weight_from_splay_tree() {
    let splay: super::splay::SplayTree<i32> = (0..1000).map(|x| (x * 17) % 1000).collect();
    let tree: WeightTree<i32> = splay.into();
    assert_eq!(tree.size(), 1000);
    tree.assert_correctness();
    assert_eq!(tree.height(), 10);
    assert_eq!(*tree.select(500), 499);
}

#[test]
#[should_panic]
fn weight_select_out_of_range() {
    let tree: WeightTree<i32> = (0..5).collect();
    tree.select(6);
}

#[test]
#[should_panic]
fn weight_remove_from_empty() {
    let mut tree: WeightTree<i32> = WeightTree::new();
    tree.remove(1);
}
