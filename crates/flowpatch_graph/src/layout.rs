// SPDX-License-Identifier: MIT OR Apache-2.0
//! Automatic placement of connected nodes.

use crate::error::Result;
use crate::node::{NodeId, Position};
use crate::patch::Patch;
use crate::wire::Wire;
use std::collections::HashSet;

impl Patch {
    /// Place `node_id` at `at`, then lay out everything downstream of it.
    ///
    /// Each node fed by an output of an already placed node goes one column
    /// to the right. Siblings are stacked top to bottom, each below the full
    /// height of the previous sibling's subtree, so chains read left to right
    /// without overlapping. Children are visited by source port index, then
    /// by wire insertion order. The first child shares its parent's row; only
    /// later siblings are offset downwards. A node is placed at most once per
    /// call, which also makes wire cycles safe.
    pub fn recursive_layout(&mut self, node_id: NodeId, at: Position) -> Result<()> {
        self.node(node_id)?;

        let mut visited = HashSet::from([node_id]);
        let height = self.layout_subtree(node_id, at, &mut visited);
        tracing::debug!(
            "Laid out {} node(s) from {} (height {})",
            visited.len(),
            node_id,
            height
        );
        Ok(())
    }

    /// Returns the height taken by the node and its placed descendants
    fn layout_subtree(
        &mut self,
        node_id: NodeId,
        at: Position,
        visited: &mut HashSet<NodeId>,
    ) -> f32 {
        let own_height = match self.node(node_id) {
            Ok(node) => self
                .config
                .layout
                .node_height(node.inputs().len(), node.outputs().len()),
            Err(_) => return 0.0,
        };
        if let Err(err) = self.move_node(node_id, at) {
            tracing::warn!("Layout skipped {}: {}", node_id, err);
            return 0.0;
        }

        let spacing = self.config.layout.node_spacing;
        let column = at.x + self.config.layout.node_width + spacing;

        let mut outgoing: Vec<Wire> = self
            .wires
            .iter()
            .filter(|w| w.from.node == node_id)
            .copied()
            .collect();
        outgoing.sort_by_key(|w| w.from.port);

        let mut stacked = 0.0;
        for wire in outgoing {
            let child = wire.to.node;
            if !visited.insert(child) {
                continue;
            }
            let child_at = Position::new(column, at.y + stacked);
            let child_height = self.layout_subtree(child, child_at, visited);
            stacked += child_height + spacing;
        }

        let children_height = if stacked > 0.0 { stacked - spacing } else { 0.0 };
        own_height.max(children_height)
    }
}
