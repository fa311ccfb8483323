use crate::errors::{RCTreeError, Result};
use crate::tree::{BoundingBox, Branch, Cut, Leaf, Node, RCTree};
use crate::RCTreeFloat;

impl<T: RCTreeFloat> RCTree<T> {

    /// Insert a point into the tree, creating a new leaf registered under
    /// `index`.
    ///
    /// Steps of the insertion algorithm, starting at the root:
    ///
    /// 1. Compute the bounding box of the visited node's subtree and merge
    ///    the new point into it. If the point is inside the existing box, a
    ///    cut on the merged box cannot separate it, so descend directly.
    /// 2. Otherwise sample a random cut on the merged box. If the cut falls
    ///    outside the unexpanded box, the point is an outlier relative to
    ///    this subtree: splice a new leaf in right here, beside the whole
    ///    subtree. See `splice_new_leaf` for the rewiring.
    /// 3. Otherwise descend into whichever child of the visited node covers
    ///    the half-space the point falls into, and repeat one level down.
    ///
    /// A leaf's bounding box has no interior, so reaching a leaf always ends
    /// the descent: an equal point yields a zero-span merged box whose only
    /// possible cut sits exactly on the boundary, which counts as
    /// separation. The loop is nevertheless bounded by the current maximum
    /// leaf depth plus one; exhausting the bound means the engine itself is
    /// defective and returns [`RCTreeError::InvariantViolation`].
    ///
    /// Nothing is mutated until the splice point is known, so a failed
    /// insertion leaves the tree untouched.
    ///
    /// Returns the node key of the new leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use rrctlib::{RCTree, RCTreeError};
    ///
    /// let mut tree: RCTree<f32> = RCTree::new(2);
    /// tree.insert_point(vec![0.0, 0.0], 0).unwrap();
    /// tree.insert_point(vec![1.0, 1.0], 1).unwrap();
    /// assert_eq!(tree.mass(), 2);
    ///
    /// // an index can only be used once
    /// let result = tree.insert_point(vec![2.0, 2.0], 1);
    /// assert_eq!(result, Err(RCTreeError::DuplicateIndex { index: 1 }));
    /// ```
    pub fn insert_point(&mut self, point: Vec<T>, index: usize) -> Result<usize> {
        if point.len() != self.dimensions() {
            return Err(RCTreeError::InvalidArgument {
                msg: "point dimension does not match the tree",
            });
        }
        if self.leaf_key(index).is_some() {
            return Err(RCTreeError::DuplicateIndex { index });
        }

        let root_key = match self.root_node() {
            Some(key) => key,
            None => {
                // first point: the new leaf is the entire tree
                let leaf_key = self.insert_node(Node::Leaf(Leaf::new(index, point, 0)));
                self.set_root_node(Some(leaf_key));
                self.register_leaf(index, leaf_key);
                return Ok(leaf_key);
            }
        };

        let iteration_bound = self.max_leaf_depth() + 1;
        let mut node_key = root_key;
        let mut depth = 0;

        for _ in 0..iteration_bound {
            let bbox = self.bounding_box_of(node_key);
            let is_branch = self.get_node(node_key).as_branch().is_some();

            if !(is_branch && bbox.contains_point(&point)) {
                let merged = BoundingBox::merged_box_with_point(&bbox, &point);
                let cut = Cut::new_random_cut(&merged, self.rng_mut())?;
                let dim = cut.dimension();
                let (min, max) = (bbox.min_values()[dim], bbox.max_values()[dim]);
                if cut.value() < min || max <= cut.value() {
                    return Ok(self.splice_new_leaf(point, index, node_key, cut, min, depth));
                }
            }

            // no separation at this level; descend along the side of the
            // visited node's own cut the point falls on
            node_key = match self.get_node(node_key) {
                Node::Branch(branch) => {
                    if Cut::is_left_of(&point, branch.cut()) {
                        branch.left()
                    } else {
                        branch.right()
                    }
                }
                Node::Leaf(_) => {
                    return Err(RCTreeError::InvariantViolation {
                        msg: "insertion reached a leaf without separating from it",
                    })
                }
            };
            depth += 1;
        }

        Err(RCTreeError::InvariantViolation {
            msg: "insertion descent passed the deepest leaf without separating",
        })
    }

    /// Splice a new leaf into the tree next to the subtree it separated
    /// from.
    ///
    /// When this function is called, a proposed cut has separated the new
    /// point from the bounding box of the subtree rooted at `node_key`. The
    /// current tree state is:
    ///
    /// ```text
    ///       A        N = current node
    ///      / \       A = parent of N
    ///     S   N      S = sibling of N
    ///        / \
    /// ```
    ///
    /// which is transformed to:
    ///
    /// ```text
    ///       A        B = new branch holding the separating cut
    ///      / \       P = new leaf for the inserted point
    ///     S   B
    ///        / \
    ///       N   P
    ///      / \
    /// ```
    ///
    /// The new leaf sits on the side dictated by the face of the box the cut
    /// escaped through. `B` takes over `N`'s slot in `A` (or the root slot),
    /// its mass is the displaced subtree's plus the new leaf's, every leaf
    /// under `B` moves one level down, and every branch above `B` gains one
    /// mass.
    fn splice_new_leaf(
        &mut self,
        point: Vec<T>,
        index: usize,
        node_key: usize,
        cut: Cut<T>,
        min: T,
        depth: usize,
    ) -> usize {
        let parent_key = self.get_parent(node_key);
        let displaced_mass = self.get_node(node_key).mass();

        let leaf_key = self.insert_node(Node::Leaf(Leaf::new(index, point, depth)));

        let (left, right) = if cut.value() < min {
            (leaf_key, node_key)
        } else {
            (node_key, leaf_key)
        };
        let mut branch = Branch::new(cut, left, right);
        branch.set_mass(displaced_mass + 1);
        let branch_key = self.insert_node(Node::Branch(branch));

        self.get_node_mut(branch_key).set_parent(parent_key);
        self.get_node_mut(node_key).set_parent(Some(branch_key));
        self.get_node_mut(leaf_key).set_parent(Some(branch_key));

        match parent_key {
            Some(parent_key) => match self.get_node_mut(parent_key) {
                Node::Branch(parent) => {
                    if parent.left() == node_key {
                        parent.set_left(branch_key);
                    } else if parent.right() == node_key {
                        parent.set_right(branch_key);
                    } else {
                        panic!("Inconsistent node: broken parent-child relationship");
                    }
                }
                Node::Leaf(_) => panic!("Inconsistent node: parents cannot be leaves"),
            },
            None => self.set_root_node(Some(branch_key)),
        }

        // the displaced subtree and the new leaf both moved one level down,
        // and every ancestor of the new branch gained the leaf's mass
        self.increment_leaf_depths(branch_key);
        self.increment_masses_upward(parent_key);

        self.register_leaf(index, leaf_key);
        leaf_key
    }
}
