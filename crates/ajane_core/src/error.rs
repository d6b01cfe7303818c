//! Error types for Ajane core.

use crate::id::NodeId;
use crate::transport::TransportError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while building or driving a panel.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A widget id was empty.
    #[error("widget id must not be empty")]
    EmptyId,

    /// A widget id exceeds the fixed id capacity.
    #[error("widget id {id:?} is longer than {max} bytes")]
    IdTooLong {
        /// The offending id.
        id: String,
        /// Maximum id length.
        max: usize,
    },

    /// A widget id collides with a name used by the protocol itself.
    #[error("widget id {0:?} is reserved")]
    ReservedId(String),

    /// Two widgets in one panel share an id.
    #[error("duplicate widget id {0:?}")]
    DuplicateId(String),

    /// A node handle does not belong to this panel.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// A node was given to more than one parent.
    #[error("node {0} already has a parent")]
    NodeAlreadyAttached(NodeId),

    /// A node was built but never placed in the tree.
    #[error("node {0} is not attached to the tree")]
    DetachedNode(NodeId),

    /// The arena is full.
    #[error("panel capacity of {capacity} nodes exceeded")]
    CapacityExceeded {
        /// Configured node capacity.
        capacity: usize,
    },

    /// A radio group or drop-down list has more options than can be indexed.
    #[error("too many options: {count}")]
    TooManyOptions {
        /// Number of options requested.
        count: usize,
    },

    /// An operation was applied to a node of the wrong kind.
    #[error("node {node} is not a {expected}")]
    KindMismatch {
        /// The node the operation was applied to.
        node: NodeId,
        /// What the operation expects.
        expected: &'static str,
    },

    /// A slider range with `min > max`.
    #[error("invalid range: min {min} > max {max}")]
    InvalidRange {
        /// Lower bound.
        min: i16,
        /// Upper bound.
        max: i16,
    },

    /// The transport adapter failed; only the current request is affected.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl CoreError {
    /// Returns true if this error was raised while building a panel.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            CoreError::EmptyId
                | CoreError::IdTooLong { .. }
                | CoreError::ReservedId(_)
                | CoreError::DuplicateId(_)
                | CoreError::NodeAlreadyAttached(_)
                | CoreError::DetachedNode(_)
                | CoreError::CapacityExceeded { .. }
                | CoreError::TooManyOptions { .. }
        )
    }
}
