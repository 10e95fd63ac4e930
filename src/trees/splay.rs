//! Top-down splay trees.
//!
//! Every access restructures the tree so that the last touched node becomes the root.
//! No balancing data is stored in the nodes: the logarithmic bound holds in the
//! amortized sense only, a single access may take linear time.
//!
//! All splaying here is top-down. While descending, the nodes that are passed are split
//! off into two side trees, one of the nodes smaller than the target and one of the
//! nodes larger than it. When the descent stops, the node it stopped at becomes the root,
//! and the side trees are hung below it.
//!
//!```
//! use trike_trees::splay::SplayTree;
//!
//! let mut tree: SplayTree<i32> = [5, 3, 8, 1].iter().cloned().collect();
//! assert!(tree.find(&3));
//! assert_eq!(*tree.root(), 3);
//! assert!(!tree.find(&4));
//! # tree.assert_correctness();
//!```

use super::boxed::try_box;
use super::iterative_deallocator::deallocate_iteratively;
use super::iterators::Iter;
use super::TreeNode;
use crate::compare::{Comparator, NaturalOrder};
use crate::error::Result;
use std::cmp::Ordering;

const EMPTY_TREE_ERROR: &str = "precondition violated: the splay tree is empty";

type Link<T> = Option<Box<SplayNode<T>>>;

pub struct SplayNode<T> {
    left: Link<T>,
    right: Link<T>,
    value: T,
}

impl<T> SplayNode<T> {
    fn new(value: T) -> Self {
        SplayNode {
            left: None,
            right: None,
            value,
        }
    }
}

impl<T> TreeNode for SplayNode<T> {
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

/// Hangs `node` into the empty slot `hole` of the tree of smaller nodes, and returns the
/// slot where the next smaller node goes. `node`'s right son must be empty.
fn hang_smaller<T>(hole: &mut Link<T>, node: Box<SplayNode<T>>) -> &mut Link<T> {
    &mut hole.insert(node).right
}

/// Hangs `node` into the empty slot `hole` of the tree of larger nodes, and returns the
/// slot where the next larger node goes. `node`'s left son must be empty.
fn hang_larger<T>(hole: &mut Link<T>, node: Box<SplayNode<T>>) -> &mut Link<T> {
    &mut hole.insert(node).left
}

/// Splays the tree towards a target.
/// `towards` tells on which side of the given value the target is.
/// When two consecutive steps go to the same side, a rotation is done before linking
/// (the zig-zig case).
///
/// Returns the new root, and whether the descent stopped at a node equal to the target.
/// If it didn't, the new root is the last node on the search path.
///
/// Doesn't allocate: the side trees are built in place, by keeping a reference to the
/// empty slot at the bottom of each of them.
fn splay<T, F>(mut root: Box<SplayNode<T>>, mut towards: F) -> (Box<SplayNode<T>>, bool)
where
    F: FnMut(&T) -> Ordering,
{
    let mut smaller: Link<T> = None;
    let mut larger: Link<T> = None;
    let mut smaller_hole = &mut smaller;
    let mut larger_hole = &mut larger;
    let found = loop {
        match towards(&root.value) {
            Ordering::Less => {
                let mut son = match root.left.take() {
                    Some(son) => son,
                    None => break false,
                };
                if towards(&son.value) == Ordering::Less {
                    // rotate right
                    root.left = son.right.take();
                    son.right = Some(root);
                    root = son;
                    son = match root.left.take() {
                        Some(son) => son,
                        None => break false,
                    };
                }
                // link right
                larger_hole = hang_larger(larger_hole, root);
                root = son;
            }
            Ordering::Greater => {
                let mut son = match root.right.take() {
                    Some(son) => son,
                    None => break false,
                };
                if towards(&son.value) == Ordering::Greater {
                    // rotate left
                    root.right = son.left.take();
                    son.left = Some(root);
                    root = son;
                    son = match root.right.take() {
                        Some(son) => son,
                        None => break false,
                    };
                }
                // link left
                smaller_hole = hang_smaller(smaller_hole, root);
                root = son;
            }
            Ordering::Equal => break true,
        }
    };
    // assemble
    *smaller_hole = root.left.take();
    *larger_hole = root.right.take();
    root.left = smaller;
    root.right = larger;
    (root, found)
}

fn splay_min<T>(root: Box<SplayNode<T>>) -> Box<SplayNode<T>> {
    splay(root, |_| Ordering::Less).0
}

fn splay_max<T>(root: Box<SplayNode<T>>) -> Box<SplayNode<T>> {
    splay(root, |_| Ordering::Greater).0
}

/// A splay tree holding unique elements under the order `C`.
pub struct SplayTree<T, C = NaturalOrder> {
    root: Link<T>,
    cmp: C,
}

impl<T: Ord> SplayTree<T> {
    pub fn new() -> Self {
        SplayTree::with_comparator(NaturalOrder)
    }
}

impl<T, C: Default> Default for SplayTree<T, C> {
    fn default() -> Self {
        SplayTree {
            root: None,
            cmp: C::default(),
        }
    }
}

// These operations only follow the shape of the tree, and never compare elements.
impl<T, C> SplayTree<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        SplayTree { root: None, cmp }
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Counts the elements. No sizes are stored, so this takes `O(n)` time.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn height(&self) -> usize {
        super::height(self.root.as_deref())
    }

    /// Iterates over the elements in order, without splaying.
    pub fn iter(&self) -> Iter<'_, SplayNode<T>> {
        Iter::new(self.root.as_deref())
    }

    /// The element at the root, i.e, the last element that was accessed.
    pub fn peek(&self) -> Option<&T> {
        self.root.as_ref().map(|node| &node.value)
    }

    /// The element at the root. Panics if the tree is empty.
    pub fn root(&self) -> &T {
        self.peek().expect(EMPTY_TREE_ERROR)
    }

    /// Moves the minimum to the root, and returns it. Panics if the tree is empty.
    pub fn min(&mut self) -> &T {
        let root = self.root.take().expect(EMPTY_TREE_ERROR);
        &self.root.get_or_insert(splay_min(root)).value
    }

    /// Moves the maximum to the root, and returns it. Panics if the tree is empty.
    pub fn max(&mut self) -> &T {
        let root = self.root.take().expect(EMPTY_TREE_ERROR);
        &self.root.get_or_insert(splay_max(root)).value
    }

    /// Removes the root and returns its element. Panics if the tree is empty.
    ///
    /// The new root is the successor of the removed element if there is one,
    /// and its predecessor otherwise.
    pub fn pop(&mut self) -> T {
        let mut old = self.root.take().expect(EMPTY_TREE_ERROR);
        self.root = match old.take_children() {
            (None, None) => None,
            (Some(left), None) => Some(splay_max(left)),
            (left, Some(right)) => {
                let mut root = splay_min(right);
                root.left = left;
                Some(root)
            }
        };
        let SplayNode { value, .. } = *old;
        value
    }

    /// Moves the successor of the root to the root, with the old root as its left son.
    /// Returns `false`, and doesn't change anything, if there is no successor.
    ///```
    /// use trike_trees::splay::SplayTree;
    ///
    /// let mut tree: SplayTree<i32> = (0..10).rev().collect();
    /// let mut res = vec![*tree.min()];
    /// while tree.next() {
    ///     res.push(*tree.root());
    /// }
    /// assert_eq!(res, (0..10).collect::<Vec<_>>());
    ///```
    pub fn next(&mut self) -> bool {
        let old = match self.root.as_mut() {
            Some(old) => old,
            None => return false,
        };
        let right = match old.right.take() {
            Some(right) => right,
            None => return false,
        };
        let mut root = splay_min(right);
        root.left = self.root.take();
        self.root = Some(root);
        true
    }

    /// Moves the predecessor of the root to the root, with the old root as its right son.
    /// Returns `false`, and doesn't change anything, if there is no predecessor.
    pub fn prev(&mut self) -> bool {
        let old = match self.root.as_mut() {
            Some(old) => old,
            None => return false,
        };
        let left = match old.left.take() {
            Some(left) => left,
            None => return false,
        };
        let mut root = splay_max(left);
        root.right = self.root.take();
        self.root = Some(root);
        true
    }

    /// Deallocates the whole tree in `O(n)` time.
    pub fn clear(&mut self) {
        deallocate_iteratively(&mut self.root);
    }
}

impl<T, C: Comparator<T>> SplayTree<T, C> {
    /// Searches for `x`. Whether it is found or not, the tree is splayed towards it:
    /// on success `x`'s node is the root, otherwise the last node on its search path is.
    pub fn find(&mut self, x: &T) -> bool {
        let root = match self.root.take() {
            Some(root) => root,
            None => return false,
        };
        let cmp = &self.cmp;
        let (root, found) = splay(root, |value| cmp.compare(x, value));
        self.root = Some(root);
        found
    }

    /// Finds the stored element equal to `x`.
    pub fn get(&mut self, x: &T) -> Option<&T> {
        if self.find(x) {
            self.peek()
        } else {
            None
        }
    }

    /// Inserts `value`, which becomes the root.
    ///
    /// If an equal element is already present, it is overwritten in place and returned.
    /// If a new node is needed and it can't be allocated, returns an error. The tree is then
    /// left splayed towards `value`, but otherwise unchanged.
    pub fn insert(&mut self, value: T) -> Result<Option<T>> {
        let root = match self.root.take() {
            Some(root) => root,
            None => {
                self.root = Some(try_box(SplayNode::new(value))?);
                return Ok(None);
            }
        };
        let cmp = &self.cmp;
        let (mut root, found) = splay(root, |other| cmp.compare(&value, other));
        if found {
            let old = std::mem::replace(&mut root.value, value);
            self.root = Some(root);
            return Ok(Some(old));
        }

        let mut fresh = match try_box(SplayNode::new(value)) {
            Ok(fresh) => fresh,
            Err(err) => {
                self.root = Some(root);
                return Err(err);
            }
        };
        if self.cmp.less(&fresh.value, &root.value) {
            fresh.left = root.left.take();
            fresh.right = Some(root);
        } else {
            fresh.right = root.right.take();
            fresh.left = Some(root);
        }
        self.root = Some(fresh);
        Ok(None)
    }

    /// Checks that the in-order traversal is strictly increasing. If not, panics.
    pub fn assert_correctness(&self) {
        let mut iter = self.iter();
        if let Some(mut prev) = iter.next() {
            for value in iter {
                assert!(self.cmp.less(prev, value), "splay tree out of order");
                prev = value;
            }
        }
    }
}

impl<T, C> Drop for SplayTree<T, C> {
    fn drop(&mut self) {
        deallocate_iteratively(&mut self.root);
    }
}

impl<T: std::fmt::Debug, C> std::fmt::Debug for SplayTree<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, C: Comparator<T>> Extend<T> for SplayTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if self.insert(value).is_err() {
                std::alloc::handle_alloc_error(std::alloc::Layout::new::<SplayNode<T>>());
            }
        }
    }
}

impl<T, C: Comparator<T> + Default> std::iter::FromIterator<T> for SplayTree<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = SplayTree::default();
        tree.extend(iter);
        tree
    }
}

/// Drains a splay tree in increasing order.
pub struct IntoIter<T, C> {
    tree: SplayTree<T, C>,
}

impl<T, C> Iterator for IntoIter<T, C> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.tree.is_empty() {
            None
        } else {
            // the root is always the minimum, so after popping it its successor is the root.
            Some(self.tree.pop())
        }
    }
}

impl<T, C> IntoIterator for SplayTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T, C>;

    fn into_iter(mut self) -> Self::IntoIter {
        if !self.is_empty() {
            self.min();
        }
        IntoIter { tree: self }
    }
}

impl<'a, T, C> IntoIterator for &'a SplayTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, SplayNode<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[test]
fn splay_find_moves_to_root() {
    let mut tree = SplayTree::new();
    for x in [5, 3, 8, 1].iter() {
        assert_eq!(tree.insert(*x), Ok(None));
    }
    assert!(tree.find(&3));
    assert_eq!(*tree.root(), 3);
    // a failed search still splays the last node on the path
    assert!(!tree.find(&7));
    assert_eq!(*tree.root(), 8);
    tree.assert_correctness();
}

#[test]
fn splay_min_max() {
    let mut tree: SplayTree<i32> = (0..200).map(|x| (x * 37) % 200).collect();
    assert_eq!(*tree.min(), 0);
    assert_eq!(*tree.root(), 0);
    assert_eq!(*tree.max(), 199);
    assert_eq!(*tree.root(), 199);
    tree.assert_correctness();
    assert_eq!(tree.len(), 200);
}

#[test]
fn splay_insert_overwrites() {
    let mut tree = SplayTree::with_comparator(|a: &(i32, char), b: &(i32, char)| a.0 < b.0);
    assert_eq!(tree.insert((1, 'a')), Ok(None));
    assert_eq!(tree.insert((2, 'b')), Ok(None));
    assert_eq!(tree.insert((1, 'c')), Ok(Some((1, 'a'))));
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get(&(1, ' ')), Some(&(1, 'c')));
}

#[test]
fn splay_pop_drains_every_element() {
    let mut tree: SplayTree<u32> = (0..300).map(|x| (x * 7919) % 300).collect();
    let mut popped = vec![];
    while !tree.is_empty() {
        popped.push(tree.pop());
        tree.assert_correctness();
    }
    popped.sort_unstable();
    assert_eq!(popped, (0..300).collect::<Vec<_>>());
}

#[test]
fn splay_pop_promotes_a_neighbor() {
    let mut tree: SplayTree<i32> = [10, 20, 30].iter().cloned().collect();
    assert!(tree.find(&20));
    assert_eq!(tree.pop(), 20);
    assert_eq!(*tree.root(), 30);
    assert!(tree.find(&30));
    assert_eq!(tree.pop(), 30);
    assert_eq!(*tree.root(), 10);
    assert_eq!(tree.pop(), 10);
    assert!(tree.is_empty());
}

#[test]
fn splay_next_prev() {
    let mut tree: SplayTree<i32> = (0..50).map(|x| x * 2).collect();
    assert!(tree.find(&40));
    assert!(tree.next());
    assert_eq!(*tree.root(), 42);
    assert!(tree.prev());
    assert!(tree.prev());
    assert_eq!(*tree.root(), 38);

    assert_eq!(*tree.max(), 98);
    assert!(!tree.next());
    assert_eq!(*tree.root(), 98);
    let mut res = vec![98];
    while tree.prev() {
        res.push(*tree.root());
    }
    assert_eq!(res, (0..50).rev().map(|x| x * 2).collect::<Vec<_>>());
    tree.assert_correctness();

    let mut empty: SplayTree<i32> = SplayTree::new();
    assert!(!empty.next());
    assert!(!empty.prev());
}

#[test]
fn splay_allocation_failure_keeps_tree() {
    let mut tree: SplayTree<i32> = (0..20).collect();
    super::boxed::fail_next_allocation();
    assert_eq!(tree.insert(100), Err(crate::error::AllocError));
    // splayed towards 100: the maximum is at the root
    assert_eq!(*tree.root(), 19);
    assert_eq!(tree.len(), 20);
    tree.assert_correctness();

    // an overwrite needs no allocation, so the failure is still pending afterwards
    super::boxed::fail_next_allocation();
    assert_eq!(tree.insert(5), Ok(Some(5)));
    assert_eq!(tree.insert(-1), Err(crate::error::AllocError));
    assert_eq!(tree.len(), 20);
    assert_eq!(tree.insert(-1), Ok(None));
}

#[test]
fn splay_into_iter_is_sorted() {
    let tree: SplayTree<i32> = (0..100).map(|x| (x * 31) % 100).collect();
    assert_eq!(tree.into_iter().collect::<Vec<_>>(), (0..100).collect::<Vec<_>>());
}

#[test]
fn splay_deep_tree_is_handled_iteratively() {
    // increasing insertions make the tree a single path
    let mut tree: SplayTree<u32> = (0..200_000).collect();
    assert_eq!(tree.height(), 200_000);
    assert!(tree.find(&0));
    assert!(tree.height() < 200_000);
    drop(tree);
}

#[test]
#[should_panic]
fn splay_root_of_empty_tree() {
    let tree: SplayTree<i32> = SplayTree::new();
    tree.root();
}

#[test]
#[should_panic]
fn splay_min_of_empty_tree() {
    let mut tree: SplayTree<i32> = SplayTree::new();
    tree.min();
}

#[test]
#[should_panic]
fn splay_max_of_empty_tree() {
    let mut tree: SplayTree<i32> = SplayTree::new();
    tree.max();
}

#[test]
#[should_panic]
fn splay_pop_of_empty_tree() {
    let mut tree: SplayTree<i32> = SplayTree::new();
    tree.pop();
}
