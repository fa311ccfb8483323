extern crate rand;
extern crate rand_chacha;
extern crate rrctlib;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rrctlib::{Node, RCTree, RCTreeError};

fn random_points(dimensions: usize, num_points: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    (0..num_points)
        .map(|_| (0..dimensions).map(|_| rng.gen::<f32>() * 10.0 - 5.0).collect())
        .collect()
}

fn unit_square() -> Vec<Vec<f32>> {
    vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ]
}

/// Every branch's mass must equal the sum of its children's masses. Returns
/// the mass of the subtree.
fn check_masses(tree: &RCTree<f32>, node_key: usize) -> u32 {
    let node = tree.node_store().get(node_key).unwrap();
    match node {
        Node::Branch(branch) => {
            let left_mass = check_masses(tree, branch.left());
            let right_mass = check_masses(tree, branch.right());
            assert_eq!(node.mass(), left_mass + right_mass);
            node.mass()
        }
        Node::Leaf(_) => node.mass(),
    }
}

/// Every leaf's recorded depth must equal the number of parent links between
/// it and the root.
fn check_depths(tree: &RCTree<f32>) {
    tree.traverse_leaves(tree.root_node().unwrap(), |leaf| {
        let mut links = 0;
        let mut current = leaf.parent();
        while let Some(key) = current {
            links += 1;
            current = tree.node_store().get(key).unwrap().parent();
        }
        assert_eq!(leaf.depth(), links, "stale depth at leaf {}", leaf.index());
    });
}

/// The leaf map and the set of leaves reachable from the root must agree
/// exactly, and every entry must point at a leaf carrying its own index.
fn check_leaf_map(tree: &RCTree<f32>) {
    let mut reachable: Vec<usize> = Vec::new();
    tree.traverse_leaves(tree.root_node().unwrap(), |leaf| reachable.push(leaf.index()));
    reachable.sort();

    let mut mapped: Vec<usize> = tree.leaf_indices().collect();
    mapped.sort();
    assert_eq!(reachable, mapped);

    for index in mapped {
        assert_eq!(tree.leaf(index).unwrap().index(), index);
    }
}

fn check_all(tree: &RCTree<f32>) {
    let root_key = tree.root_node().unwrap();
    check_masses(tree, root_key);
    check_depths(tree);
    check_leaf_map(tree);
}

/// Canonical rendering of a subtree: cuts, masses, leaf indices and depths.
/// Two trees with equal snapshots are structurally identical.
fn snapshot(tree: &RCTree<f32>, node_key: usize, out: &mut String) {
    match tree.node_store().get(node_key).unwrap() {
        Node::Leaf(leaf) => {
            out.push_str(&format!("L({},{},{})", leaf.index(), leaf.depth(), leaf.mass()));
        }
        Node::Branch(branch) => {
            out.push_str(&format!(
                "B({},{},{},",
                branch.cut().dimension(),
                branch.cut().value(),
                branch.mass()
            ));
            snapshot(tree, branch.left(), out);
            out.push(',');
            snapshot(tree, branch.right(), out);
            out.push(')');
        }
    }
}

fn tree_snapshot(tree: &RCTree<f32>) -> String {
    let mut out = String::new();
    snapshot(tree, tree.root_node().unwrap(), &mut out);
    out
}

#[test]
fn unit_square_has_four_leaves_and_three_branches() {
    let tree = RCTree::from_points_seeded(unit_square(), 42).unwrap();

    assert_eq!(tree.num_leaves(), 4);
    assert_eq!(tree.node_store().len(), 7);
    assert_eq!(tree.mass(), 4);
    assert_eq!(tree.dimensions(), 2);
    check_all(&tree);
}

#[test]
fn distant_point_becomes_sibling_of_former_root() {
    let mut tree = RCTree::from_points_seeded(unit_square(), 42).unwrap();
    let old_root = tree.root_node().unwrap();

    // the merged bounding box is dominated by the gap to this point, so the
    // separating cut lands above the unit square at the very first level
    tree.insert_point(vec![1.0e8, 1.0e8], 4).unwrap();

    assert_eq!(tree.num_leaves(), 5);
    assert_eq!(tree.mass(), 5);

    let outlier = tree.leaf(4).unwrap();
    assert_eq!(outlier.depth(), 1);
    assert_eq!(outlier.parent(), tree.root_node());

    // the other child of the new root is the displaced old root
    let root = tree.node_store().get(tree.root_node().unwrap()).unwrap();
    let root = root.as_branch().unwrap();
    let outlier_key = tree.leaf_key(4).unwrap();
    let displaced = if root.left() == outlier_key { root.right() } else { root.left() };
    assert_eq!(displaced, old_root);
    assert_eq!(tree.node_store().get(displaced).unwrap().mass(), 4);

    check_all(&tree);
}

#[test]
fn forgetting_a_leaf_splices_its_sibling_upward() {
    let tree_points = unit_square();
    let mut tree = RCTree::from_points_seeded(tree_points, 42).unwrap();

    // a deepest leaf always has both a parent and a grandparent
    let victim = tree
        .leaf_indices()
        .max_by_key(|&index| tree.leaf(index).unwrap().depth())
        .unwrap();
    let victim_key = tree.leaf_key(victim).unwrap();
    let parent_key = tree.leaf(victim).unwrap().parent().unwrap();

    let parent = tree.node_store().get(parent_key).unwrap().as_branch().unwrap();
    let sibling_key = if parent.left() == victim_key { parent.right() } else { parent.left() };
    let grandparent_key = parent.parent().unwrap();

    tree.forget_point(victim).unwrap();

    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.mass(), 3);

    // the grandparent now points straight at the sibling, and vice versa
    let grandparent = tree
        .node_store()
        .get(grandparent_key)
        .unwrap()
        .as_branch()
        .unwrap();
    assert!(grandparent.left() == sibling_key || grandparent.right() == sibling_key);
    let sibling = tree.node_store().get(sibling_key).unwrap();
    assert_eq!(sibling.parent(), Some(grandparent_key));

    check_all(&tree);
}

#[test]
fn forgetting_an_unknown_index_fails() {
    let mut tree = RCTree::from_points_seeded(unit_square(), 42).unwrap();
    assert_eq!(
        tree.forget_point(17),
        Err(RCTreeError::LeafNotFound { index: 17 })
    );
    assert_eq!(tree.num_leaves(), 4);
}

#[test]
fn inserting_a_duplicate_index_fails() {
    let mut tree = RCTree::from_points_seeded(unit_square(), 42).unwrap();
    assert_eq!(
        tree.insert_point(vec![0.5, 0.5], 2),
        Err(RCTreeError::DuplicateIndex { index: 2 })
    );
    assert_eq!(tree.num_leaves(), 4);
    check_all(&tree);
}

#[test]
fn inserting_a_mismatched_dimension_fails() {
    let mut tree = RCTree::from_points_seeded(unit_square(), 42).unwrap();
    assert!(matches!(
        tree.insert_point(vec![0.5], 9),
        Err(RCTreeError::InvalidArgument { .. })
    ));
    assert_eq!(tree.num_leaves(), 4);
}

#[test]
fn forgetting_the_sole_leaf_fails() {
    let mut tree = RCTree::from_points(vec![vec![1.0f32, 2.0]]).unwrap();
    assert!(matches!(
        tree.forget_point(0),
        Err(RCTreeError::InvalidOperation { .. })
    ));
    assert_eq!(tree.num_leaves(), 1);
}

#[test]
fn insert_then_forget_restores_the_tree() {
    let mut tree = RCTree::from_points_seeded(unit_square(), 7).unwrap();
    let before = tree_snapshot(&tree);

    // an interior point
    tree.insert_point(vec![0.3, 0.4], 9).unwrap();
    check_all(&tree);
    tree.forget_point(9).unwrap();
    assert_eq!(tree_snapshot(&tree), before);

    // an outlier
    tree.insert_point(vec![-50.0, 20.0], 9).unwrap();
    check_all(&tree);
    tree.forget_point(9).unwrap();
    assert_eq!(tree_snapshot(&tree), before);
}

#[test]
fn duplicate_point_splices_beside_its_twin() {
    let points = unit_square();
    let twin_point = points[0].clone();
    let mut tree = RCTree::from_points_seeded(points, 13).unwrap();
    let twin_key = tree.leaf_key(0).unwrap();

    // the duplicate is inside every bounding box on the way down, so the
    // descent only ends at the twin leaf, where the merged box has no
    // interior and the boundary cut separates the two
    let new_key = tree.insert_point(twin_point, 4).unwrap();

    assert_eq!(tree.num_leaves(), 5);
    let new_leaf = tree.leaf(4).unwrap();
    let parent_key = new_leaf.parent().unwrap();
    let parent = tree.node_store().get(parent_key).unwrap().as_branch().unwrap();
    let sibling_key = if parent.left() == new_key { parent.right() } else { parent.left() };
    assert_eq!(sibling_key, twin_key);
    assert_eq!(new_leaf.depth(), tree.leaf(0).unwrap().depth());

    check_all(&tree);
}

#[test]
fn tree_grows_from_empty_by_insertion() {
    let mut tree: RCTree<f32> = RCTree::new(2);
    tree.seed(21);

    for (index, point) in unit_square().into_iter().enumerate() {
        tree.insert_point(point, index).unwrap();
        check_all(&tree);
    }
    assert_eq!(tree.num_leaves(), 4);

    for index in 0..3 {
        tree.forget_point(index).unwrap();
        check_all(&tree);
    }
    assert_eq!(tree.num_leaves(), 1);
    assert_eq!(tree.leaf(3).unwrap().depth(), 0);
}

#[cfg(test)]
parameterized_test::create! { random_operations_preserve_invariants, (dimensions, seed), {
    random_operations(dimensions, seed);
}}

random_operations_preserve_invariants! {
    d1: (1, 10),
    d2: (2, 20),
    d3: (3, 30),
    d5: (5, 50),
}

fn random_operations(dimensions: usize, seed: u64) {
    let points = random_points(dimensions, 40, seed);
    let mut tree = RCTree::from_points_seeded(points, seed).unwrap();
    check_all(&tree);

    let mut rng = ChaCha20Rng::seed_from_u64(seed ^ 0xa5a5_a5a5);
    let mut next_index = 40;

    for _ in 0..60 {
        if rng.gen::<bool>() && tree.num_leaves() > 1 {
            let indices: Vec<usize> = tree.leaf_indices().collect();
            let victim = indices[rng.gen_range(0..indices.len())];
            tree.forget_point(victim).unwrap();
        } else {
            let point: Vec<f32> = (0..dimensions).map(|_| rng.gen::<f32>() * 4.0 - 2.0).collect();
            tree.insert_point(point, next_index).unwrap();
            next_index += 1;
        }

        check_all(&tree);
        assert_eq!(tree.mass() as usize, tree.num_leaves());
    }
}
