use super::TreeNode;

/// In-order iterator over a borrowed tree. Does not restructure anything,
/// so it can be used on a splay tree behind a shared reference.
pub struct Iter<'a, N: TreeNode> {
    /// Nodes whose left subtree has been fully pushed, but which weren't yielded yet.
    stack: Vec<&'a N>,
}

impl<'a, N: TreeNode> Iter<'a, N> {
    pub fn new(root: Option<&'a N>) -> Self {
        let mut res = Iter { stack: vec![] };
        res.push_left_path(root);
        res
    }

    fn push_left_path(&mut self, mut tree: Option<&'a N>) {
        while let Some(node) = tree {
            self.stack.push(node);
            tree = node.left();
        }
    }
}

impl<'a, N: TreeNode> Iterator for Iter<'a, N> {
    type Item = &'a N::Value;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_path(node.right());
        Some(node.value())
    }
}
