//! A Rust implementation of robust random cut trees, the tree structure
//! underlying random-cut-forest anomaly detection on streams.
//!
//! A robust random cut tree is a randomized binary space-partitioning tree
//! over a set of d-dimensional points. Points can be inserted and forgotten
//! one at a time while the tree maintains exact per-node bookkeeping, so that
//! the structural displacement caused by removing a point can be read off in
//! time proportional to the depth of its leaf. Displacement and collusive
//! displacement are the usual proxies for anomalousness: points that are easy
//! to isolate sit in small, shallow subtrees and displace little.
//!
//! ```
//! use rrctlib::RCTree;
//!
//! // build a tree over the corners of the unit square
//! let points = vec![
//!     vec![0.0f32, 0.0],
//!     vec![0.0, 1.0],
//!     vec![1.0, 0.0],
//!     vec![1.0, 1.0],
//! ];
//! let mut tree = RCTree::from_points_seeded(points, 42).unwrap();
//! assert_eq!(tree.num_leaves(), 4);
//!
//! // stream a far-away point through the tree and score it
//! tree.insert_point(vec![100.0, 100.0], 4).unwrap();
//! let score = tree.co_displacement(4).unwrap();
//! tree.forget_point(4).unwrap();
//! assert!(score >= 1.0);
//! ```
//!
//! ### References
//!
//! Sudipto Guha, Nina Mishra, Gourav Roy, and Okke Schrijvers. *"Robust random
//! cut forest based anomaly detection on streams."* International Conference
//! on Machine Learning, pp. 2712-2721. PMLR, 2016.

use std::iter::Sum;

use num_traits::Float;

mod errors;
pub use errors::{RCTreeError, Result};

mod store;
pub use store::NodeStore;

pub mod tree;
pub use tree::{BoundingBox, Branch, Cut, Leaf, Node, NodeTraverser, RCTree};

/// Floating point coordinate trait used throughout the crate.
///
/// Everything the tree needs from its coordinate type: `Float` for the
/// min/max/epsilon arithmetic of bounding boxes and cuts, `Sum` for range
/// sums. Blanket-implemented, so `f32` and `f64` satisfy it out of the box.
pub trait RCTreeFloat: Float + Sum {}

impl<T> RCTreeFloat for T where T: Float + Sum {}
