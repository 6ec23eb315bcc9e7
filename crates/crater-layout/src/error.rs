//! Engine error type.

use thiserror::Error;

use crate::tree::NodeId;

/// Errors returned by the tree store and the layout entry points.
///
/// None of them is fatal: the façade maps every variant to `false`, `0.0`
/// or an empty JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The id was never issued, or its node has been destroyed.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// Attaching the child would make a node its own ancestor.
    #[error("inserting {child} under {parent} would create a cycle")]
    WouldCycle {
        /// The prospective parent.
        parent: NodeId,
        /// The node being attached.
        child: NodeId,
    },

    /// `insert_child`/`remove_child` with an index past the end.
    #[error("child index {index} out of bounds for {parent} with {len} children")]
    ChildIndexOutOfBounds {
        /// The parent being edited.
        parent: NodeId,
        /// The requested index.
        index: usize,
        /// The parent's current child count.
        len: usize,
    },
}
