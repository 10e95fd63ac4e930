use super::TreeNode;

/// Dropping a `Box` node drops its sons recursively, one stack frame per level.
/// A splay tree can degenerate into a path as long as the tree itself, so both trees
/// tear themselves down through this work list instead.
struct IterativeDeallocator<N: TreeNode> {
    stack: Vec<Box<N>>,
}

impl<N: TreeNode> IterativeDeallocator<N> {
    fn step(&mut self) -> Option<()> {
        let mut node = self.stack.pop()?;
        let (left, right) = node.take_children();
        self.push(left);
        self.push(right);
        Some(())
    }

    fn push(&mut self, tree: Option<Box<N>>) {
        if let Some(node) = tree {
            self.stack.push(node);
        }
    }
}

/// Empties `tree`, freeing its nodes in `O(n)` time and constant stack depth.
pub fn deallocate_iteratively<N: TreeNode>(tree: &mut Option<Box<N>>) {
    let mut deallocator = IterativeDeallocator { stack: vec![] };
    deallocator.push(tree.take());
    while let Some(()) = deallocator.step() {}
}
