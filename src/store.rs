use slab::Slab;

use crate::Node;

/// A type for storing tree nodes by key.
///
/// Slab keys are stable for the lifetime of the entry, so they double as the
/// node handles that parent and child links are made of. Splicing a subtree
/// is a pure key rewrite; no node is moved in memory.
pub type NodeStore<T> = Slab<Node<T>>;
