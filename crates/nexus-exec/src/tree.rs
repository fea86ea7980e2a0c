//! Bottom-up tree rewriting.
//!
//! Expression trees and plan trees are immutable once built. Optimization
//! passes change them with [`TreeNode::transform_up`], which rebuilds every
//! interior node from its rewritten children and hands each rebuilt node to
//! the rewrite function in post-order. Nodes are never mutated in place, so
//! the same subtree may be shared between several trees.

use crate::error::ExecResult;

/// A node of a rewritable tree.
///
/// Implemented for shared handles (`Arc<dyn ...>`) so that leaves can be
/// handed to the rewrite function without copying.
pub trait TreeNode: Clone {
    /// Returns the direct children, in order.
    fn tree_children(&self) -> Vec<Self>;

    /// Rebuilds this node, same variant, with new children.
    ///
    /// `children` must have the same length as [`TreeNode::tree_children`].
    fn with_tree_children(&self, children: Vec<Self>) -> ExecResult<Self>;

    /// Rewrites the tree bottom-up.
    ///
    /// For a node with children `c1..cn`, each child is rewritten first,
    /// the node is rebuilt with the rewritten children, and `f` is applied
    /// to the rebuilt node. Leaves are passed to `f` as they are.
    fn transform_up<F>(&self, f: &mut F) -> ExecResult<Self>
    where
        F: FnMut(Self) -> ExecResult<Self>,
    {
        let children = self.tree_children();
        let rebuilt = if children.is_empty() {
            self.clone()
        } else {
            let new_children = children
                .iter()
                .map(|child| child.transform_up(f))
                .collect::<ExecResult<Vec<_>>>()?;
            self.with_tree_children(new_children)?
        };
        f(rebuilt)
    }

    /// Applies `f` to every node in post-order without rebuilding anything.
    fn for_each_up<F>(&self, f: &mut F)
    where
        F: FnMut(&Self),
    {
        for child in self.tree_children() {
            child.for_each_up(f);
        }
        f(self);
    }
}
