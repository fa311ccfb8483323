//! Submodule containing types and components of a robust random cut tree.

mod bounding_box;
pub use bounding_box::BoundingBox;

mod cut;
pub use cut::Cut;

mod node;
pub use node::{Branch, Leaf, Node};

mod tree;
pub use tree::{NodeTraverser, RCTree};

mod insertion;
mod removal;
mod scoring;
