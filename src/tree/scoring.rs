use crate::errors::{RCTreeError, Result};
use crate::tree::{Node, RCTree};
use crate::RCTreeFloat;

impl<T: RCTreeFloat> RCTree<T> {

    /// Compute the displacement of the leaf registered under `index`.
    ///
    /// The displacement is the mass of the leaf's sibling subtree: the
    /// number of points that would spread out to fill the gap if the leaf
    /// were removed. Because the tree keeps subtree masses exact, this is a
    /// single sibling lookup.
    ///
    /// Fails with [`RCTreeError::LeafNotFound`] for an unknown index and
    /// with [`RCTreeError::InvalidOperation`] if the leaf is the root of a
    /// single-leaf tree, where no sibling exists and the quantity is
    /// undefined.
    pub fn displacement(&self, index: usize) -> Result<u32> {
        let leaf_key = self
            .leaf_key(index)
            .ok_or(RCTreeError::LeafNotFound { index })?;

        match self.sibling_of(leaf_key) {
            Some(sibling_key) => Ok(self.get_node(sibling_key).mass()),
            None => Err(RCTreeError::InvalidOperation {
                msg: "displacement is undefined for the only leaf in a tree",
            }),
        }
    }

    /// Compute the collusive displacement of the leaf registered under
    /// `index`.
    ///
    /// Plain displacement is easy to fool: a cluster of colluding outliers
    /// shields each of its members. Collusive displacement instead considers
    /// removing the whole subtree the leaf sits in, at every granularity
    /// from the leaf itself up to the root, and reports the worst case. At
    /// each ancestor level the disruption is the sibling subtree's mass
    /// divided by the mass of the subtree being removed; the result is the
    /// maximum ratio observed on the walk.
    ///
    /// The walk is bounded by the leaf's own depth and stops early if the
    /// root is reached. Error conditions match
    /// [`displacement`](Self::displacement).
    ///
    /// # Examples
    ///
    /// ```
    /// use rrctlib::RCTree;
    ///
    /// let points = vec![
    ///     vec![0.0f32, 0.0],
    ///     vec![0.0, 1.0],
    ///     vec![1.0, 0.0],
    ///     vec![1.0, 1.0],
    /// ];
    /// let tree = RCTree::from_points_seeded(points, 1).unwrap();
    ///
    /// // a leaf's own displacement ratio is one term of the maximum
    /// let disp = tree.displacement(0).unwrap();
    /// let codisp = tree.co_displacement(0).unwrap();
    /// assert!(codisp >= disp as f64);
    /// ```
    pub fn co_displacement(&self, index: usize) -> Result<f64> {
        let leaf_key = self
            .leaf_key(index)
            .ok_or(RCTreeError::LeafNotFound { index })?;
        let depth = match self.get_node(leaf_key) {
            Node::Leaf(leaf) => leaf.depth(),
            Node::Branch(_) => panic!("Inconsistent node: leaf map entry is not a leaf"),
        };

        let mut node_key = leaf_key;
        let mut best: Option<f64> = None;
        for _ in 0..depth {
            let parent_key = match self.get_parent(node_key) {
                Some(key) => key,
                None => break,
            };
            let sibling_key = match self.sibling_of(node_key) {
                Some(key) => key,
                None => panic!("Inconsistent node: node has a parent but no sibling"),
            };

            let displacement = self.get_node(sibling_key).mass() as f64;
            let num_deleted = self.get_node(node_key).mass() as f64;
            let ratio = displacement / num_deleted;
            best = Some(match best {
                None => ratio,
                Some(previous) => previous.max(ratio),
            });

            node_key = parent_key;
        }

        best.ok_or(RCTreeError::InvalidOperation {
            msg: "co-displacement is undefined for the only leaf in a tree",
        })
    }
}
