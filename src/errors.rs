use thiserror::Error;

/// Errors that can be returned by tree operations.
///
/// Every error is local to the single operation that produced it. A failed
/// mutation leaves the tree exactly as it was: all validation and cut
/// resolution happens before any node is linked or unlinked.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RCTreeError {
    /// No leaf with the requested index exists in the tree.
    #[error("no leaf with index {index} in the tree")]
    LeafNotFound { index: usize },

    /// A leaf with the requested index already exists in the tree.
    #[error("a leaf with index {index} already exists in the tree")]
    DuplicateIndex { index: usize },

    /// An argument failed validation before the operation started.
    #[error("invalid argument: {msg}")]
    InvalidArgument { msg: &'static str },

    /// The operation is not defined for the tree's current shape, such as
    /// forgetting the sole remaining leaf.
    #[error("invalid operation: {msg}")]
    InvalidOperation { msg: &'static str },

    /// An internal invariant could not be upheld. Seeing this error means a
    /// defect in the engine itself, not in the caller's input.
    #[error("invariant violation: {msg}")]
    InvariantViolation { msg: &'static str },
}

pub type Result<T> = std::result::Result<T, RCTreeError>;
