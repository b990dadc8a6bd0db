// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised by patch mutations and queries.

use crate::node::NodeId;
use crate::port::{PortDirection, PortType};
use crate::wire::{InputId, Wire};

/// Result type for patch operations
pub type Result<T> = std::result::Result<T, PatchError>;

/// Error when mutating or querying a patch
///
/// Every failing mutation leaves the patch exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatchError {
    /// Referenced node is not in the patch
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Port index beyond the node's port count
    #[error("{direction} port {index} out of range on node {node} ({count} ports)")]
    PortOutOfRange {
        /// Node owning the ports
        node: NodeId,
        /// Which container was indexed
        direction: PortDirection,
        /// Requested index
        index: usize,
        /// Number of ports in the container
        count: usize,
    },

    /// Value or wire endpoint types are incompatible
    #[error("Type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// Type of the receiving port
        expected: PortType,
        /// Type that was offered
        found: PortType,
    },

    /// A node with the same ID is already present
    #[error("Duplicate node ID: {0}")]
    DuplicateId(NodeId),

    /// The input already has an incoming wire
    #[error("Input already connected: {0:?}")]
    AlreadyConnected(InputId),

    /// The wire would close a value cycle
    #[error("Wire would create a value cycle: {0:?}")]
    CycleDetected(Wire),
}
