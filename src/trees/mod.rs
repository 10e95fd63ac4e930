//! The two tree implementations, and the plumbing they share:
//! node allocation, in-order iteration and non-recursive deallocation.
//!
//! The [`splay`] and [`weight`] modules don't share any algorithm;
//! only the way they own their nodes is common.

pub mod boxed;
pub mod iterative_deallocator;
pub mod iterators;
pub mod splay;
pub mod weight;

/// A binary node that exclusively owns its two subtrees.
pub trait TreeNode: Sized {
    type Value;

    fn value(&self) -> &Self::Value;
    fn left(&self) -> Option<&Self>;
    fn right(&self) -> Option<&Self>;

    /// Detaches both subtrees, leaving this node a leaf.
    fn take_children(&mut self) -> (Option<Box<Self>>, Option<Box<Self>>);
}

/// Number of nodes on the longest root-to-leaf path. `0` for an empty tree.
pub fn height<N: TreeNode>(root: Option<&N>) -> usize {
    // explicit stack, since a splay tree may be a single long path.
    let mut stack: Vec<(&N, usize)> = root.into_iter().map(|node| (node, 1)).collect();
    let mut res = 0;
    while let Some((node, depth)) = stack.pop() {
        res = std::cmp::max(res, depth);
        stack.extend(node.left().map(|son| (son, depth + 1)));
        stack.extend(node.right().map(|son| (son, depth + 1)));
    }
    res
}
