// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wire (edge) definitions for the patch.

use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};

/// An output port endpoint: `(node, output index)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputId {
    /// Owning node
    pub node: NodeId,
    /// Index into the node's outputs
    pub port: usize,
}

impl OutputId {
    /// Create an output endpoint
    pub fn new(node: NodeId, port: usize) -> Self {
        Self { node, port }
    }

    /// Output `port` of `node`
    pub fn of(node: &dyn Node, port: usize) -> Self {
        Self::new(node.id(), port)
    }
}

/// An input port endpoint: `(node, input index)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InputId {
    /// Owning node
    pub node: NodeId,
    /// Index into the node's inputs
    pub port: usize,
}

impl InputId {
    /// Create an input endpoint
    pub fn new(node: NodeId, port: usize) -> Self {
        Self { node, port }
    }

    /// Input `port` of `node`
    pub fn of(node: &dyn Node, port: usize) -> Self {
        Self::new(node.id(), port)
    }
}

/// A directed edge from an output to an input.
///
/// Wires have no identity of their own: two wires with the same endpoints
/// are the same wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Wire {
    /// Producing output
    pub from: OutputId,
    /// Consuming input
    pub to: InputId,
}

impl Wire {
    /// Create a wire
    pub fn new(from: OutputId, to: InputId) -> Self {
        Self { from, to }
    }

    /// Check if this wire involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from.node == node_id || self.to.node == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_wires_are_value_equal() {
        let a = NodeId::new();
        let b = NodeId::new();
        let mut set = HashSet::new();
        set.insert(Wire::new(OutputId::new(a, 0), InputId::new(b, 0)));
        set.insert(Wire::new(OutputId::new(a, 0), InputId::new(b, 0)));
        set.insert(Wire::new(OutputId::new(a, 0), InputId::new(b, 1)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_involves_node() {
        let a = NodeId::new();
        let b = NodeId::new();
        let wire = Wire::new(OutputId::new(a, 0), InputId::new(b, 0));
        assert!(wire.involves_node(a));
        assert!(wire.involves_node(b));
        assert!(!wire.involves_node(NodeId::new()));
    }
}
