use std::collections::HashMap;

use num_traits::Zero;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::errors::{RCTreeError, Result};
use crate::store::NodeStore;
use crate::tree::{BoundingBox, Branch, Cut, Leaf, Node};
use crate::RCTreeFloat;

/// Robust random cut tree over a set of indexed points.
///
/// A tree is a binary space partition built from random axis-aligned cuts.
/// [`Leaf`] nodes hold the data points; [`Branch`] nodes hold the [`Cut`]
/// separating their two children. All nodes live in a [`NodeStore`] arena and
/// refer to each other by store key, so restructuring the tree never moves a
/// node, it only rewrites keys.
///
/// Alongside the structure the tree maintains, for every branch, the total
/// mass of the leaves below it, and for every leaf, its current depth. Both
/// are kept exact by [`insert_point`](RCTree::insert_point) and
/// [`forget_point`](RCTree::forget_point), which is what lets
/// [`displacement`](RCTree::displacement) and
/// [`co_displacement`](RCTree::co_displacement) run in time proportional to
/// the leaf's depth.
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
/// let mut tree = RCTree::from_points_seeded(points, 0).unwrap();
/// assert_eq!(tree.num_leaves(), 4);
/// assert_eq!(tree.mass(), 4);
///
/// tree.insert_point(vec![0.5, 0.5], 4).unwrap();
/// assert_eq!(tree.num_leaves(), 5);
///
/// tree.forget_point(4).unwrap();
/// assert_eq!(tree.num_leaves(), 4);
/// ```
pub struct RCTree<T> {
    node_store: NodeStore<T>,
    root_node: Option<usize>,
    leaf_map: HashMap<usize, usize>,
    dimensions: usize,
    rng: ChaCha8Rng,
}

impl<T: RCTreeFloat> RCTree<T> {

    /// Create a new empty tree for points of the given dimensionality.
    ///
    /// The tree's random number generator is initialized from the host
    /// system's entropy; use [`seed`](RCTree::seed) to make subsequent
    /// insertions reproducible.
    ///
    /// # Examples
    ///
    /// ```
    /// use rrctlib::RCTree;
    ///
    /// let mut tree: RCTree<f32> = RCTree::new(2);
    /// assert_eq!(tree.num_leaves(), 0);
    ///
    /// tree.insert_point(vec![0.0, 0.0], 0).unwrap();
    /// assert_eq!(tree.num_leaves(), 1);
    /// ```
    pub fn new(dimensions: usize) -> Self {
        RCTree {
            node_store: NodeStore::new(),
            root_node: None,
            leaf_map: HashMap::new(),
            dimensions,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Construct a tree from a set of points, indexed `0..n-1`.
    ///
    /// The tree contains exactly one leaf per input point. The partition is
    /// built recursively: each subset is split by a random cut whose
    /// dimension is chosen with probability proportional to the subset's
    /// extent along each axis and whose value is uniform within that extent.
    pub fn from_points(points: Vec<Vec<T>>) -> Result<Self> {
        Self::from_parts(points, None, ChaCha8Rng::from_entropy())
    }

    /// Construct a tree from a set of points with a fixed random seed.
    ///
    /// Equal seeds and equal inputs produce identical structures.
    pub fn from_points_seeded(points: Vec<Vec<T>>, seed: u64) -> Result<Self> {
        Self::from_parts(points, None, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Construct a tree from a set of points with caller-supplied indices.
    ///
    /// `indices[i]` becomes the external index of `points[i]`. Indices must
    /// be unique and `indices` must be as long as `points`.
    pub fn from_points_indexed(points: Vec<Vec<T>>, indices: &[usize]) -> Result<Self> {
        Self::from_parts(points, Some(indices), ChaCha8Rng::from_entropy())
    }

    /// Construct a tree from indexed points with a fixed random seed.
    pub fn from_points_indexed_seeded(
        points: Vec<Vec<T>>,
        indices: &[usize],
        seed: u64,
    ) -> Result<Self> {
        Self::from_parts(points, Some(indices), ChaCha8Rng::seed_from_u64(seed))
    }

    /// Re-initializes the tree's random number generator with a seed.
    ///
    /// Random cut trees use the [`ChaCha8Rng`] random number generator. It
    /// has fast initialization, high throughput and a relatively small
    /// memory footprint. The generator is consumed by construction and by
    /// point insertion; reseeding makes subsequent insertions reproducible.
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    // ########################################################################
    // Construction
    // ########################################################################

    fn from_parts(
        points: Vec<Vec<T>>,
        indices: Option<&[usize]>,
        rng: ChaCha8Rng,
    ) -> Result<Self> {
        if points.is_empty() {
            return Err(RCTreeError::InvalidArgument {
                msg: "at least one point is required to construct a tree",
            });
        }
        let dimensions = points[0].len();
        if dimensions == 0 {
            return Err(RCTreeError::InvalidArgument {
                msg: "points must have at least one dimension",
            });
        }
        if points.iter().any(|p| p.len() != dimensions) {
            return Err(RCTreeError::InvalidArgument {
                msg: "all points must have the same dimension",
            });
        }
        if let Some(ix) = indices {
            if ix.len() != points.len() {
                return Err(RCTreeError::InvalidArgument {
                    msg: "one index is required per point",
                });
            }
        }

        let mut tree = RCTree {
            node_store: NodeStore::new(),
            root_node: None,
            leaf_map: HashMap::new(),
            dimensions,
            rng,
        };

        let mut slots: Vec<Option<Vec<T>>> = points.into_iter().map(Some).collect();
        let subset: Vec<usize> = (0..slots.len()).collect();
        let root_key = tree.build_subtree(&mut slots, indices, subset, 0)?;
        tree.root_node = Some(root_key);
        tree.refresh_subtree_masses(root_key);
        Ok(tree)
    }

    /// Recursively partition a subset of the input points into a subtree.
    ///
    /// `subset` holds positions into `slots`; a position's point is taken out
    /// of its slot at the moment its leaf is created. `depth` is the depth at
    /// which the subtree's root node will sit. Children are created before
    /// their branch, then back-linked to it, so the parent of each subtree
    /// root is left `None` for the caller to fill in.
    fn build_subtree(
        &mut self,
        slots: &mut Vec<Option<Vec<T>>>,
        indices: Option<&[usize]>,
        subset: Vec<usize>,
        depth: usize,
    ) -> Result<usize> {
        if subset.len() == 1 {
            let pos = subset[0];
            let index = indices.map_or(pos, |ix| ix[pos]);
            let point = slots[pos].take().unwrap();
            let leaf_key = self.insert_node(Node::Leaf(Leaf::new(index, point, depth)));
            if self.leaf_map.insert(index, leaf_key).is_some() {
                return Err(RCTreeError::DuplicateIndex { index });
            }
            return Ok(leaf_key);
        }

        let bbox = subset_bounding_box(slots, &subset);
        let (cut, left_subset, right_subset) = if bbox.range_sum() > Zero::zero() {
            let cut = Cut::new_random_cut(&bbox, &mut self.rng)?;
            let (s1, s2): (Vec<usize>, Vec<usize>) = subset
                .iter()
                .copied()
                .partition(|&pos| Cut::is_left_of(slots[pos].as_ref().unwrap(), &cut));
            if s1.is_empty() || s2.is_empty() {
                return Err(RCTreeError::InvariantViolation {
                    msg: "a random cut failed to separate a point subset",
                });
            }
            (cut, s1, s2)
        } else {
            // All points in this subset are identical, so no axis cut can
            // tell them apart. Split one point off and cut at the shared
            // coordinate.
            let cut = Cut::new(0, bbox.min_values()[0]);
            (cut, vec![subset[0]], subset[1..].to_vec())
        };

        let left_key = self.build_subtree(slots, indices, left_subset, depth + 1)?;
        let right_key = self.build_subtree(slots, indices, right_subset, depth + 1)?;
        let branch_key = self.insert_node(Node::Branch(Branch::new(cut, left_key, right_key)));
        self.get_node_mut(left_key).set_parent(Some(branch_key));
        self.get_node_mut(right_key).set_parent(Some(branch_key));
        Ok(branch_key)
    }

    /// Bottom-up pass setting every branch's mass to the sum of its
    /// children's masses. Returns the mass of the subtree.
    fn refresh_subtree_masses(&mut self, node_key: usize) -> u32 {
        let (left, right) = match self.get_node(node_key) {
            Node::Leaf(leaf) => return leaf.mass(),
            Node::Branch(branch) => (branch.left(), branch.right()),
        };
        let mass = self.refresh_subtree_masses(left) + self.refresh_subtree_masses(right);
        match self.get_node_mut(node_key) {
            Node::Branch(branch) => branch.set_mass(mass),
            Node::Leaf(_) => panic!("Inconsistent node: expected branch"),
        }
        mass
    }

    // ########################################################################
    // Accessors
    // ########################################################################

    /// Returns the key of the tree's root node, if the tree is non-empty.
    #[inline(always)]
    pub fn root_node(&self) -> Option<usize> { self.root_node }

    #[inline(always)]
    pub(crate) fn set_root_node(&mut self, root_key: Option<usize>) {
        self.root_node = root_key;
    }

    /// Returns a reference to the arena holding the tree's nodes.
    #[inline(always)]
    pub fn node_store(&self) -> &NodeStore<T> { &self.node_store }

    /// Returns the dimensionality of the points in the tree.
    #[inline(always)]
    pub fn dimensions(&self) -> usize { self.dimensions }

    /// Returns the number of leaves currently in the tree.
    pub fn num_leaves(&self) -> usize { self.leaf_map.len() }

    /// Returns the mass of the tree.
    ///
    /// The mass of the tree is the mass of its root: the number of points in
    /// the tree, weighted by leaf multiplicity. Zero for an empty tree.
    pub fn mass(&self) -> u32 {
        match self.root_node {
            None => 0,
            Some(key) => self.get_node(key).mass(),
        }
    }

    /// Returns the node key of the leaf registered under `index`.
    pub fn leaf_key(&self, index: usize) -> Option<usize> {
        self.leaf_map.get(&index).copied()
    }

    /// Returns the leaf registered under `index`.
    pub fn leaf(&self, index: usize) -> Option<&Leaf<T>> {
        self.leaf_map
            .get(&index)
            .map(|&key| match self.get_node(key) {
                Node::Leaf(leaf) => leaf,
                Node::Branch(_) => panic!("Inconsistent node: leaf map entry is not a leaf"),
            })
    }

    /// Returns an iterator over the external indices of all leaves in the
    /// tree, in no particular order.
    pub fn leaf_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.leaf_map.keys().copied()
    }

    /// Returns the depth of the deepest leaf in the tree. Zero for an empty
    /// tree.
    pub fn max_leaf_depth(&self) -> usize {
        self.leaf_map
            .values()
            .map(|&key| match self.get_node(key) {
                Node::Leaf(leaf) => leaf.depth(),
                Node::Branch(_) => panic!("Inconsistent node: leaf map entry is not a leaf"),
            })
            .max()
            .unwrap_or(0)
    }

    // ########################################################################
    // Traversal
    // ########################################################################

    /// Returns an iterator over the nodes on the cut-guided path from the
    /// root towards `point`.
    ///
    /// At every branch the traversal follows the child whose half-space
    /// contains the point, ending at a leaf. The leaf reached this way is the
    /// structural neighborhood the tree files the point under; it is not
    /// guaranteed to be the geometric nearest neighbor.
    ///
    /// # Examples
    ///
    /// ```
    /// use rrctlib::{Node, RCTree};
    ///
    /// let points = vec![vec![0.0f32, 0.0], vec![1.0, 1.0]];
    /// let tree = RCTree::from_points_seeded(points, 0).unwrap();
    ///
    /// // a two-leaf tree has a two-node path: the root branch, then a leaf
    /// let path: Vec<&Node<f32>> = tree.traverse(&[0.1, -0.2]).collect();
    /// assert_eq!(path.len(), 2);
    /// ```
    pub fn traverse<'a>(&'a self, point: &'a [T]) -> NodeTraverser<'a, T> {
        NodeTraverser::new(self, point)
    }

    /// Search for the leaf the tree files `point` under.
    ///
    /// Descends from the root, at each branch following the side of the cut
    /// the query point falls on, until a leaf is reached. Returns `None` on
    /// an empty tree.
    pub fn query(&self, point: &[T]) -> Option<&Leaf<T>> {
        let mut node_key = self.root_node?;
        loop {
            match self.get_node(node_key) {
                Node::Leaf(leaf) => return Some(leaf),
                Node::Branch(branch) => {
                    node_key = if Cut::is_left_of(point, branch.cut()) {
                        branch.left()
                    } else {
                        branch.right()
                    };
                }
            }
        }
    }

    /// Traverse the subtree under `node_key` depth-first, calling `op` on
    /// every leaf.
    ///
    /// Branches are only used for recursion; `op` sees leaves exclusively.
    ///
    /// # Examples
    ///
    /// ```
    /// use rrctlib::RCTree;
    ///
    /// let points = vec![vec![0.0f32], vec![1.0], vec![2.0]];
    /// let tree = RCTree::from_points_seeded(points, 7).unwrap();
    ///
    /// let mut total = 0;
    /// tree.traverse_leaves(tree.root_node().unwrap(), |leaf| total += leaf.mass());
    /// assert_eq!(total, 3);
    /// ```
    pub fn traverse_leaves<F: FnMut(&Leaf<T>)>(&self, node_key: usize, mut op: F) {
        self.visit_leaves(node_key, &mut op);
    }

    fn visit_leaves<F: FnMut(&Leaf<T>)>(&self, node_key: usize, op: &mut F) {
        match self.get_node(node_key) {
            Node::Leaf(leaf) => op(leaf),
            Node::Branch(branch) => {
                let (left, right) = (branch.left(), branch.right());
                self.visit_leaves(left, op);
                self.visit_leaves(right, op);
            }
        }
    }

    fn visit_leaves_mut<F: FnMut(&mut Leaf<T>)>(&mut self, node_key: usize, op: &mut F) {
        let (left, right) = match self.get_node_mut(node_key) {
            Node::Leaf(leaf) => {
                op(leaf);
                return;
            }
            Node::Branch(branch) => (branch.left(), branch.right()),
        };
        self.visit_leaves_mut(left, op);
        self.visit_leaves_mut(right, op);
    }

    // ########################################################################
    // Bounding boxes
    // ########################################################################

    /// Compute the bounding box of all points in the tree.
    ///
    /// Returns `None` on an empty tree.
    pub fn bounding_box(&self) -> Option<BoundingBox<T>> {
        self.root_node.map(|key| self.bounding_box_of(key))
    }

    /// Compute the bounding box of all points under a given node.
    ///
    /// The envelope is derived by a full traversal of the subtree's leaves
    /// on every call. Nothing is cached: mutations stay cheap, and reads pay
    /// O(subtree size) for it.
    pub fn bounding_box_of(&self, node_key: usize) -> BoundingBox<T> {
        let mut bbox: Option<BoundingBox<T>> = None;
        self.visit_leaves(node_key, &mut |leaf| {
            bbox = Some(match bbox.take() {
                None => BoundingBox::new_from_point(leaf.point()),
                Some(current) => BoundingBox::merged_box_with_point(&current, leaf.point()),
            });
        });
        match bbox {
            Some(bbox) => bbox,
            None => panic!("Inconsistent node: subtree without leaves"),
        }
    }

    // ########################################################################
    // Shared structural helpers
    // ########################################################################

    #[inline(always)]
    pub(crate) fn get_node(&self, node_key: usize) -> &Node<T> {
        self.node_store.get(node_key).unwrap()
    }

    #[inline(always)]
    pub(crate) fn get_node_mut(&mut self, node_key: usize) -> &mut Node<T> {
        self.node_store.get_mut(node_key).unwrap()
    }

    #[inline(always)]
    pub(crate) fn insert_node(&mut self, node: Node<T>) -> usize {
        self.node_store.insert(node)
    }

    #[inline(always)]
    pub(crate) fn remove_node(&mut self, node_key: usize) {
        self.node_store.remove(node_key);
    }

    #[inline(always)]
    pub(crate) fn get_parent(&self, node_key: usize) -> Option<usize> {
        self.get_node(node_key).parent()
    }

    #[inline(always)]
    pub(crate) fn register_leaf(&mut self, index: usize, leaf_key: usize) {
        self.leaf_map.insert(index, leaf_key);
    }

    #[inline(always)]
    pub(crate) fn unregister_leaf(&mut self, index: usize) {
        self.leaf_map.remove(&index);
    }

    #[inline(always)]
    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng { &mut self.rng }

    /// Returns the node key of the sibling of the input node.
    ///
    /// The sibling only fails to exist when the input node is the root, in
    /// which case `None` is returned.
    pub(crate) fn sibling_of(&self, node_key: usize) -> Option<usize> {
        if let Some(parent_key) = self.get_parent(node_key) {
            let parent: &Branch<T> = match self.get_node(parent_key) {
                Node::Branch(node) => node,
                Node::Leaf(_) => panic!("Inconsistent node: parents cannot be leaves"),
            };

            if parent.left() == node_key {
                return Some(parent.right());
            } else if parent.right() == node_key {
                return Some(parent.left());
            } else {
                panic!("Inconsistent node: parent does not have node as a child");
            }
        }
        None
    }

    /// Add one to the mass of every branch from `node_key` up to the root,
    /// following parent links.
    pub(crate) fn increment_masses_upward(&mut self, node_key: Option<usize>) {
        let mut current = node_key;
        while let Some(key) = current {
            current = match self.get_node_mut(key) {
                Node::Branch(branch) => {
                    branch.increment_mass();
                    branch.parent()
                }
                Node::Leaf(_) => panic!("Inconsistent node: ancestors must be branches"),
            };
        }
    }

    /// Subtract one from the mass of every branch from `node_key` up to the
    /// root, following parent links.
    pub(crate) fn decrement_masses_upward(&mut self, node_key: Option<usize>) {
        let mut current = node_key;
        while let Some(key) = current {
            current = match self.get_node_mut(key) {
                Node::Branch(branch) => {
                    branch.decrement_mass();
                    branch.parent()
                }
                Node::Leaf(_) => panic!("Inconsistent node: ancestors must be branches"),
            };
        }
    }

    /// Add one to the recorded depth of every leaf under `node_key`.
    pub(crate) fn increment_leaf_depths(&mut self, node_key: usize) {
        self.visit_leaves_mut(node_key, &mut |leaf| leaf.set_depth(leaf.depth() + 1));
    }

    /// Subtract one from the recorded depth of every leaf under `node_key`.
    pub(crate) fn decrement_leaf_depths(&mut self, node_key: usize) {
        self.visit_leaves_mut(node_key, &mut |leaf| leaf.set_depth(leaf.depth() - 1));
    }
}

/// Bounding box over the points named by `subset`.
fn subset_bounding_box<T: RCTreeFloat>(
    slots: &[Option<Vec<T>>],
    subset: &[usize],
) -> BoundingBox<T> {
    let mut bbox = BoundingBox::new_from_point(slots[subset[0]].as_ref().unwrap());
    for &pos in &subset[1..] {
        bbox = BoundingBox::merged_box_with_point(&bbox, slots[pos].as_ref().unwrap());
    }
    bbox
}

/// A type for traversing nodes from the root to the nearest leaf.
///
/// Given an input point, this type traces the path from the root node of a
/// tree to the leaf node the tree files the point under, following the side
/// of each branch's cut the point falls on. Returned by
/// [`RCTree::traverse`].
pub struct NodeTraverser<'a, T> {
    tree: &'a RCTree<T>,
    point: &'a [T],
    current_node_key: Option<usize>,
}

impl<'a, T: RCTreeFloat> NodeTraverser<'a, T> {

    /// Create a new node traverser from a tree and a query point.
    pub fn new(tree: &'a RCTree<T>, point: &'a [T]) -> Self {
        NodeTraverser {
            tree,
            point,
            current_node_key: tree.root_node(),
        }
    }

    /// Return the key of the next node in a traversal.
    fn next_node_key(&self, node: &Node<T>) -> Option<usize> {
        match node {
            Node::Leaf(_) => None,
            Node::Branch(node) => {
                if Cut::is_left_of(self.point, node.cut()) {
                    Some(node.left())
                } else {
                    Some(node.right())
                }
            }
        }
    }
}

impl<'a, T: RCTreeFloat> Iterator for NodeTraverser<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<&'a Node<T>> {
        match self.current_node_key {
            Some(node_key) => {
                let node = self.tree.node_store().get(node_key).unwrap();
                self.current_node_key = self.next_node_key(node);
                Some(node)
            }
            None => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand_distr::StandardNormal;

    use super::*;

    fn generate_random_normal(dimension: usize, num_points: usize) -> Vec<Vec<f32>> {
        let mut points: Vec<Vec<f32>> = Vec::with_capacity(num_points);
        let mut rng = rand::thread_rng();
        for _ in 0..num_points {
            let mut point: Vec<f32> = Vec::with_capacity(dimension);
            for _ in 0..dimension {
                point.push(rng.sample(StandardNormal));
            }
            points.push(point);
        }
        points
    }

    /// Traverses the tree and checks that every branch's mass equals the sum
    /// of its children's masses. Returns the mass of the subtree.
    fn check_node_masses<T: RCTreeFloat>(tree: &RCTree<T>, node_key: usize) -> u32 {
        let node = tree.node_store().get(node_key).unwrap();
        let mass = node.mass();
        match node {
            Node::Branch(branch) => {
                let left_mass = check_node_masses(tree, branch.left());
                let right_mass = check_node_masses(tree, branch.right());
                assert_eq!(mass, left_mass + right_mass);
                mass
            }
            Node::Leaf(_) => mass,
        }
    }

    /// Checks that every leaf's recorded depth equals the number of parent
    /// links between it and the root.
    fn check_leaf_depths<T: RCTreeFloat>(tree: &RCTree<T>) {
        tree.traverse_leaves(tree.root_node().unwrap(), |leaf| {
            let mut links = 0;
            let mut current = leaf.parent();
            while let Some(key) = current {
                links += 1;
                current = tree.node_store().get(key).unwrap().parent();
            }
            assert_eq!(leaf.depth(), links);
        });
    }

    #[test]
    fn test_unit_square_construction() {
        let points = vec![
            vec![0.0f32, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ];
        let tree = RCTree::from_points_seeded(points, 11).unwrap();

        // four leaves and three branches
        assert_eq!(tree.num_leaves(), 4);
        assert_eq!(tree.node_store().len(), 7);
        assert_eq!(tree.mass(), 4);

        check_node_masses(&tree, tree.root_node().unwrap());
        check_leaf_depths(&tree);

        let bbox = tree.bounding_box().unwrap();
        assert_eq!(bbox.min_values(), &[0.0, 0.0]);
        assert_eq!(bbox.max_values(), &[1.0, 1.0]);
    }

    #[test]
    fn test_single_point_tree() {
        let tree = RCTree::from_points(vec![vec![1.0f32, 2.0, 3.0]]).unwrap();
        assert_eq!(tree.num_leaves(), 1);
        assert_eq!(tree.node_store().len(), 1);

        let leaf = tree.leaf(0).unwrap();
        assert_eq!(leaf.depth(), 0);
        assert!(leaf.parent().is_none());
    }

    #[test]
    fn test_traversal_reaches_own_leaf() {
        let mut points = generate_random_normal(4, 32);
        let query = vec![10.0f32, 10.0, 10.0, 10.0];
        points.push(query.clone());
        let tree = RCTree::from_points(points).unwrap();

        // the traversal is cut-guided, so a point present in the tree is
        // always filed under its own leaf
        let leaf = tree.query(&query).unwrap();
        assert_eq!(leaf.point(), &query[..]);
        assert_eq!(leaf.index(), 32);

        let path: Vec<&Node<f32>> = tree.traverse(&query).collect();
        assert_eq!(path.len(), leaf.depth() + 1);
    }

    #[test]
    fn test_empty_tree_accessors() {
        let tree: RCTree<f32> = RCTree::new(3);
        assert_eq!(tree.num_leaves(), 0);
        assert_eq!(tree.mass(), 0);
        assert!(tree.root_node().is_none());
        assert!(tree.query(&[0.0, 0.0, 0.0]).is_none());
        assert!(tree.bounding_box().is_none());
    }

    #[test]
    fn test_construction_validation() {
        let no_points: Vec<Vec<f32>> = Vec::new();
        assert!(matches!(
            RCTree::from_points(no_points),
            Err(RCTreeError::InvalidArgument { .. })
        ));

        let ragged = vec![vec![0.0f32, 1.0], vec![2.0]];
        assert!(matches!(
            RCTree::from_points(ragged),
            Err(RCTreeError::InvalidArgument { .. })
        ));

        let points = vec![vec![0.0f32], vec![1.0]];
        assert!(matches!(
            RCTree::from_points_indexed(points.clone(), &[5]),
            Err(RCTreeError::InvalidArgument { .. })
        ));
        assert!(matches!(
            RCTree::from_points_indexed(points, &[5, 5]),
            Err(RCTreeError::DuplicateIndex { index: 5 })
        ));
    }

    #[test]
    fn test_custom_indices() {
        let points = vec![vec![0.0f32], vec![1.0], vec![2.0]];
        let tree = RCTree::from_points_indexed(points, &[10, 20, 30]).unwrap();

        assert_eq!(tree.leaf(20).unwrap().point(), &[1.0]);
        assert!(tree.leaf(0).is_none());
    }

    #[test]
    fn test_seeded_determinism() {
        let points = generate_random_normal(3, 64);
        let one = RCTree::from_points_seeded(points.clone(), 99).unwrap();
        let other = RCTree::from_points_seeded(points, 99).unwrap();

        let mut depths_one: Vec<(usize, usize)> = (0..64)
            .map(|i| (i, one.leaf(i).unwrap().depth()))
            .collect();
        let mut depths_other: Vec<(usize, usize)> = (0..64)
            .map(|i| (i, other.leaf(i).unwrap().depth()))
            .collect();
        depths_one.sort();
        depths_other.sort();
        assert_eq!(depths_one, depths_other);
    }

    #[test]
    fn test_identical_points_construction() {
        // a degenerate point set exercises the fallback cut
        let points = vec![vec![5.0f32, 5.0]; 6];
        let tree = RCTree::from_points_seeded(points, 3).unwrap();

        assert_eq!(tree.num_leaves(), 6);
        assert_eq!(tree.mass(), 6);
        check_node_masses(&tree, tree.root_node().unwrap());
        check_leaf_depths(&tree);

        let bbox = tree.bounding_box().unwrap();
        assert_eq!(bbox.range_sum(), 0.0);
    }
}
