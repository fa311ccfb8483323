use crate::errors::{RCTreeError, Result};
use crate::tree::{Node, RCTree};
use crate::RCTreeFloat;

impl<T: RCTreeFloat> RCTree<T> {

    /// Forget the point registered under `index`, removing its leaf from the
    /// tree.
    ///
    /// In the general case we are deleting leaf `P` in the following
    /// diagram:
    ///
    /// ```text
    ///     A
    ///    / \     P = leaf being forgotten
    ///   B   N    N = parent of P
    ///      / \   S = sibling of P
    ///     P   S  A = grandparent of P
    /// ```
    ///
    /// The parent has only one child left, so it is spliced out and the
    /// sibling takes its place:
    ///
    /// ```text
    ///     A
    ///    / \
    ///   B   S
    /// ```
    ///
    /// Every branch from the grandparent up to the root loses one mass, and
    /// every leaf under the sibling moves one level up. If the parent was
    /// the root there is no grandparent: the sibling simply becomes the new
    /// root and no ancestor masses need repair.
    ///
    /// Fails with [`RCTreeError::LeafNotFound`] if no leaf is registered
    /// under `index`, and with [`RCTreeError::InvalidOperation`] if the leaf
    /// is the tree's only one, since there is no parent to splice out. A
    /// failed call leaves the tree untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use rrctlib::{RCTree, RCTreeError};
    ///
    /// let points = vec![vec![0.0f32], vec![1.0], vec![2.0]];
    /// let mut tree = RCTree::from_points_seeded(points, 5).unwrap();
    ///
    /// tree.forget_point(1).unwrap();
    /// assert_eq!(tree.num_leaves(), 2);
    /// assert_eq!(
    ///     tree.forget_point(1),
    ///     Err(RCTreeError::LeafNotFound { index: 1 })
    /// );
    /// ```
    pub fn forget_point(&mut self, index: usize) -> Result<()> {
        let leaf_key = self
            .leaf_key(index)
            .ok_or(RCTreeError::LeafNotFound { index })?;

        let parent_key = match self.get_parent(leaf_key) {
            Some(key) => key,
            None => {
                return Err(RCTreeError::InvalidOperation {
                    msg: "cannot forget the tree's only remaining leaf",
                })
            }
        };

        let sibling_key = match self.sibling_of(leaf_key) {
            Some(key) => key,
            None => panic!("Inconsistent node: leaf has a parent but no sibling"),
        };
        let grandparent_key = self.get_parent(parent_key);

        // short-circuit the grandparent to the sibling
        self.get_node_mut(sibling_key).set_parent(grandparent_key);
        match grandparent_key {
            Some(grandparent_key) => {
                match self.get_node_mut(grandparent_key) {
                    Node::Branch(grandparent) => {
                        if grandparent.left() == parent_key {
                            grandparent.set_left(sibling_key);
                        } else if grandparent.right() == parent_key {
                            grandparent.set_right(sibling_key);
                        } else {
                            panic!("Inconsistent node: broken parent-child relationship");
                        }
                    }
                    Node::Leaf(_) => panic!("Inconsistent node: parents cannot be leaves"),
                }
                // each remaining ancestor holds one leaf fewer
                self.decrement_masses_upward(Some(grandparent_key));
            }
            None => self.set_root_node(Some(sibling_key)),
        }

        // the spliced-in subtree moved one level up
        self.decrement_leaf_depths(sibling_key);

        self.unregister_leaf(index);
        self.remove_node(leaf_key);
        self.remove_node(parent_key);
        Ok(())
    }
}
