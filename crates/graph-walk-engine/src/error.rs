//! Error types for traversal runs.

use thiserror::Error;

/// Result type alias for traversal operations.
pub type TraversalResult<T> = Result<T, TraversalError>;

/// Errors that can occur while starting or driving a traversal.
#[derive(Debug, Error)]
pub enum TraversalError {
    /// The start node is not a node of the graph. Raised before any mutation.
    #[error("invalid start node {start}: graph has {node_count} nodes")]
    InvalidArgument { start: usize, node_count: usize },

    /// A pacing delay was cut short. Non-fatal: the walk continues.
    #[error("pacing delay interrupted")]
    Interrupted,

    /// The run observed its cancellation token.
    #[error("traversal cancelled")]
    Cancelled,

    /// Another run holds this engine's visit state.
    #[error("a traversal is already running on this engine")]
    AlreadyRunning,

    /// The worker task panicked or was aborted.
    #[error("traversal worker failed: {0}")]
    Worker(String),
}
