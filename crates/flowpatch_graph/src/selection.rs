// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor selection state.

use crate::node::NodeId;
use std::collections::HashSet;

/// Set of selected nodes, owned by the editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: HashSet<NodeId>,
}

impl Selection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; returns whether it was newly selected
    pub fn insert(&mut self, node_id: NodeId) -> bool {
        self.nodes.insert(node_id)
    }

    /// Deselect a node
    pub fn remove(&mut self, node_id: NodeId) -> bool {
        self.nodes.remove(&node_id)
    }

    /// Whether the node is selected
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains(&node_id)
    }

    /// Deselect everything
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Number of selected nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate selected node IDs
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }
}

impl FromIterator<NodeId> for Selection {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
