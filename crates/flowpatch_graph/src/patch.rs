// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patch: the graph of nodes and wires being edited.

use crate::config::PatchConfig;
use crate::error::{PatchError, Result};
use crate::event::{EventBus, PatchEvent, SubscriptionId};
use crate::node::{Node, NodeId, Position};
use crate::port::{Port, PortDirection, PortType, PortValue};
use crate::selection::Selection;
use crate::wire::{InputId, OutputId, Wire};
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashSet, VecDeque};

/// A node graph.
///
/// Owns every node and wire. After each completed mutation every wire refers
/// to existing, type-compatible ports and every input has at most one
/// incoming wire.
#[derive(Debug, Default)]
pub struct Patch {
    pub(crate) nodes: IndexMap<NodeId, Box<dyn Node>>,
    pub(crate) wires: IndexSet<Wire>,
    pub(crate) config: PatchConfig,
    pub(crate) events: EventBus,
}

impl Patch {
    /// Create a new empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty patch with the given settings
    pub fn with_config(config: PatchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Build a patch from nodes and wires, validating each as it is inserted
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Box<dyn Node>>,
        wires: impl IntoIterator<Item = Wire>,
    ) -> Result<Self> {
        let mut patch = Self::new();
        for node in nodes {
            patch.insert_boxed(node)?;
        }
        for wire in wires {
            patch.insert_wire(wire)?;
        }
        Ok(patch)
    }

    /// Settings
    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Register a change listener
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&PatchEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    /// Remove a change listener
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Add a node to the patch
    pub fn insert_node<N: Node + 'static>(&mut self, node: N) -> Result<NodeId> {
        self.insert_boxed(Box::new(node))
    }

    /// Add an already boxed node to the patch
    pub fn insert_boxed(&mut self, node: Box<dyn Node>) -> Result<NodeId> {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            tracing::warn!("Rejected duplicate node {}", id);
            return Err(PatchError::DuplicateId(id));
        }
        tracing::debug!("Inserted {} node '{}' ({})", node.kind(), node.name(), id);
        self.nodes.insert(id, node);
        self.events.emit(&PatchEvent::NodeInserted(id));
        Ok(id)
    }

    /// Remove a node and every wire touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<Box<dyn Node>> {
        if !self.nodes.contains_key(&node_id) {
            return Err(PatchError::NodeNotFound(node_id));
        }
        for wire in self.wires_touching(node_id)? {
            self.remove_wire(wire);
        }
        let node = self
            .nodes
            .shift_remove(&node_id)
            .ok_or(PatchError::NodeNotFound(node_id))?;
        tracing::debug!("Removed node '{}' ({})", node.name(), node_id);
        self.events.emit(&PatchEvent::NodeRemoved(node_id));
        Ok(node)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Result<&dyn Node> {
        self.nodes
            .get(&node_id)
            .map(Box::as_ref)
            .ok_or(PatchError::NodeNotFound(node_id))
    }

    /// Get all nodes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &dyn Node> {
        self.nodes.values().map(Box::as_ref)
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the node is in the patch
    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Rename a node
    pub fn rename_node(&mut self, node_id: NodeId, name: impl Into<String>) -> Result<()> {
        self.node_mut(node_id)?.set_name(name.into());
        Ok(())
    }

    /// Lock or unlock a node. The flag is only advisory for the editor.
    pub fn set_locked(&mut self, node_id: NodeId, locked: bool) -> Result<()> {
        self.node_mut(node_id)?.set_locked(locked);
        Ok(())
    }

    /// Move a node
    pub fn move_node(&mut self, node_id: NodeId, position: Position) -> Result<()> {
        let node = self.node_mut(node_id)?;
        let from = node.position();
        node.set_position(Some(position));
        self.events.emit(&PatchEvent::NodeMoved {
            node: node_id,
            from,
            to: position,
        });
        Ok(())
    }

    fn node_mut(&mut self, node_id: NodeId) -> Result<&mut Box<dyn Node>> {
        self.nodes
            .get_mut(&node_id)
            .ok_or(PatchError::NodeNotFound(node_id))
    }

    // ------------------------------------------------------------------
    // Ports
    // ------------------------------------------------------------------

    /// Get the output port behind an endpoint
    pub fn output_port(&self, output: OutputId) -> Result<&Port> {
        let ports = self.node(output.node)?.outputs();
        ports.get(output.port).ok_or(PatchError::PortOutOfRange {
            node: output.node,
            direction: PortDirection::Output,
            index: output.port,
            count: ports.len(),
        })
    }

    /// Get the input port behind an endpoint
    pub fn input_port(&self, input: InputId) -> Result<&Port> {
        let ports = self.node(input.node)?.inputs();
        ports.get(input.port).ok_or(PatchError::PortOutOfRange {
            node: input.node,
            direction: PortDirection::Input,
            index: input.port,
            count: ports.len(),
        })
    }

    /// Current value of an output port
    pub fn output_value(&self, output: OutputId) -> Result<Option<&PortValue>> {
        Ok(self.output_port(output)?.value())
    }

    /// Current value of an input port
    pub fn input_value(&self, input: InputId) -> Result<Option<&PortValue>> {
        Ok(self.input_port(input)?.value())
    }

    // ------------------------------------------------------------------
    // Wires
    // ------------------------------------------------------------------

    /// Add a wire and push the producer's current value through it.
    ///
    /// Checks, in order: both nodes exist, both port indices are in range,
    /// the port types are compatible, the input is free, and the wire does
    /// not close a value cycle. A rejected wire leaves the patch untouched.
    pub fn insert_wire(&mut self, wire: Wire) -> Result<()> {
        if let Err(err) = self.validate_wire(wire) {
            tracing::warn!("Rejected wire {:?}: {}", wire, err);
            return Err(err);
        }

        self.wires.insert(wire);
        tracing::debug!("Added wire {:?}", wire);
        self.events.emit(&PatchEvent::WireAdded(wire));

        self.push_wire(wire);
        Ok(())
    }

    fn validate_wire(&self, wire: Wire) -> Result<()> {
        self.node(wire.from.node)?;
        self.node(wire.to.node)?;

        let from_type = self.output_port(wire.from)?.port_type();
        let to_type = self.input_port(wire.to)?.port_type();
        if !self.types_compatible(from_type, to_type) {
            return Err(PatchError::TypeMismatch {
                expected: to_type,
                found: from_type,
            });
        }

        if self.wire_into(wire.to).is_some() {
            return Err(PatchError::AlreadyConnected(wire.to));
        }

        if self.closes_value_cycle(wire) {
            return Err(PatchError::CycleDetected(wire));
        }

        Ok(())
    }

    fn types_compatible(&self, from: PortType, to: PortType) -> bool {
        if self.config.implicit_conversions {
            from.can_connect_to(&to)
        } else {
            from == to || from == PortType::Any || to == PortType::Any
        }
    }

    /// Whether a value leaving `wire.to` could travel back to `wire.from`
    /// through existing wires and node bindings.
    fn closes_value_cycle(&self, wire: Wire) -> bool {
        let mut visited = HashSet::new();
        let mut queue: VecDeque<OutputId> = self.bound_outputs(wire.to).collect();

        while let Some(output) = queue.pop_front() {
            if output == wire.from {
                return true;
            }
            if !visited.insert(output) {
                continue;
            }
            for next in self.wires_from(output) {
                queue.extend(self.bound_outputs(next.to));
            }
        }
        false
    }

    /// Outputs recomputed when `input` changes
    pub(crate) fn bound_outputs(&self, input: InputId) -> impl Iterator<Item = OutputId> + '_ {
        self.nodes
            .get(&input.node)
            .into_iter()
            .flat_map(|node| node.bindings().iter())
            .filter(move |b| b.input == input.port)
            .map(move |b| OutputId::new(input.node, b.output))
    }

    /// Remove a wire. Returns `false` if it was not in the patch.
    ///
    /// The input keeps the last value it received.
    pub fn remove_wire(&mut self, wire: Wire) -> bool {
        if !self.wires.shift_remove(&wire) {
            return false;
        }
        tracing::debug!("Removed wire {:?}", wire);
        self.events.emit(&PatchEvent::WireRemoved(wire));
        true
    }

    /// Get all wires, in insertion order
    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.iter()
    }

    /// Get the number of wires
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Whether the wire is in the patch
    pub fn contains_wire(&self, wire: &Wire) -> bool {
        self.wires.contains(wire)
    }

    /// Wires leaving an output
    pub fn wires_from(&self, output: OutputId) -> impl Iterator<Item = &Wire> {
        self.wires.iter().filter(move |w| w.from == output)
    }

    /// The wire feeding an input, if any
    pub fn wire_into(&self, input: InputId) -> Option<Wire> {
        self.wires.iter().find(|w| w.to == input).copied()
    }

    /// Every wire with either endpoint on the node
    pub fn wires_touching(&self, node_id: NodeId) -> Result<IndexSet<Wire>> {
        self.node(node_id)?;
        Ok(self
            .wires
            .iter()
            .filter(|w| w.involves_node(node_id))
            .copied()
            .collect())
    }

    // ------------------------------------------------------------------
    // Reachability
    // ------------------------------------------------------------------

    /// Nodes reachable by following outgoing wires, in breadth-first order.
    ///
    /// The start node is included only if it lies on a cycle.
    pub fn downstream(&self, node_id: NodeId) -> Result<IndexSet<NodeId>> {
        self.node(node_id)?;
        Ok(self.reachable(node_id, |w| (w.from.node, w.to.node)))
    }

    /// Nodes reachable by following incoming wires backwards
    pub fn upstream(&self, node_id: NodeId) -> Result<IndexSet<NodeId>> {
        self.node(node_id)?;
        Ok(self.reachable(node_id, |w| (w.to.node, w.from.node)))
    }

    fn reachable(
        &self,
        start: NodeId,
        edge: impl Fn(&Wire) -> (NodeId, NodeId),
    ) -> IndexSet<NodeId> {
        let mut found = IndexSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for (_, next) in self.wires.iter().map(&edge).filter(|(src, _)| *src == current) {
                if found.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        found
    }

    /// Copy of `selection` without the IDs of nodes no longer in the patch
    pub fn prune_selection(&self, selection: &Selection) -> Selection {
        selection
            .iter()
            .filter(|id| self.contains_node(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{BasicNode, IntNode, MathNode, MathOp};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn wire(from: NodeId, from_port: usize, to: NodeId, to_port: usize) -> Wire {
        Wire::new(OutputId::new(from, from_port), InputId::new(to, to_port))
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut patch = Patch::new();
        let node = IntNode::new("Integer 1");
        let id = patch.insert_node(node.clone()).unwrap();

        let found = patch.node(id).unwrap();
        assert_eq!(found.core(), node.core());
        assert_eq!(patch.node_count(), 1);

        patch.remove_node(id).unwrap();
        assert_eq!(patch.node(id).unwrap_err(), PatchError::NodeNotFound(id));
        assert_eq!(patch.remove_node(id).unwrap_err(), PatchError::NodeNotFound(id));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut patch = Patch::new();
        let node = IntNode::new("Integer");
        let id = patch.insert_node(node.clone()).unwrap();
        assert_eq!(patch.insert_node(node).unwrap_err(), PatchError::DuplicateId(id));
        assert_eq!(patch.node_count(), 1);
    }

    #[test]
    fn test_valid_wire_touches_both_nodes() {
        let mut patch = Patch::new();
        let a = patch.insert_node(IntNode::new("a")).unwrap();
        let b = patch.insert_node(IntNode::new("b")).unwrap();
        let w = wire(a, 0, b, 0);

        patch.insert_wire(w).unwrap();
        assert!(patch.wires_touching(a).unwrap().contains(&w));
        assert!(patch.wires_touching(b).unwrap().contains(&w));
        assert_eq!(patch.wire_into(InputId::new(b, 0)), Some(w));
    }

    #[test]
    fn test_wire_validation_order() {
        let mut patch = Patch::new();
        let a = patch.insert_node(IntNode::new("a")).unwrap();
        let b = patch.insert_node(IntNode::new("b")).unwrap();
        let missing = NodeId::new();

        assert_eq!(
            patch.insert_wire(wire(missing, 0, b, 0)).unwrap_err(),
            PatchError::NodeNotFound(missing)
        );
        assert_eq!(
            patch.insert_wire(wire(a, 3, b, 0)).unwrap_err(),
            PatchError::PortOutOfRange {
                node: a,
                direction: PortDirection::Output,
                index: 3,
                count: 1,
            }
        );
        assert_eq!(
            patch.insert_wire(wire(a, 0, b, 1)).unwrap_err(),
            PatchError::PortOutOfRange {
                node: b,
                direction: PortDirection::Input,
                index: 1,
                count: 1,
            }
        );
        assert_eq!(patch.wire_count(), 0);
    }

    #[test]
    fn test_type_mismatch_leaves_patch_unchanged() {
        let mut patch = Patch::new();
        let int = patch.insert_node(IntNode::new("int").with_value(4)).unwrap();
        let flag = patch
            .insert_node(BasicNode::new(
                "flag",
                [Port::new("In", PortType::Bool)],
                Vec::<Port>::new(),
            ))
            .unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        patch.subscribe(move |e| sink.lock().push(e.clone()));

        let err = patch.insert_wire(wire(int, 0, flag, 0)).unwrap_err();
        assert_eq!(
            err,
            PatchError::TypeMismatch {
                expected: PortType::Bool,
                found: PortType::Int,
            }
        );
        assert_eq!(patch.wire_count(), 0);
        assert_eq!(patch.input_value(InputId::new(flag, 0)).unwrap(), None);
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_strict_typing_rejects_conversions() {
        let config = PatchConfig {
            implicit_conversions: false,
            ..Default::default()
        };
        let mut patch = Patch::with_config(config);
        let int = patch.insert_node(IntNode::new("int")).unwrap();
        let add = patch.insert_node(MathNode::new("add", MathOp::Add)).unwrap();
        assert!(matches!(
            patch.insert_wire(wire(int, 0, add, 0)),
            Err(PatchError::TypeMismatch { .. })
        ));

        let any = patch.insert_node(BasicNode::passive("any")).unwrap();
        patch.insert_wire(wire(int, 0, any, 0)).unwrap();
    }

    #[test]
    fn test_input_accepts_single_wire() {
        let mut patch = Patch::new();
        let a = patch.insert_node(IntNode::new("a")).unwrap();
        let b = patch.insert_node(IntNode::new("b")).unwrap();
        let c = patch.insert_node(IntNode::new("c")).unwrap();

        patch.insert_wire(wire(a, 0, c, 0)).unwrap();
        assert_eq!(
            patch.insert_wire(wire(b, 0, c, 0)).unwrap_err(),
            PatchError::AlreadyConnected(InputId::new(c, 0))
        );
        assert_eq!(
            patch.insert_wire(wire(a, 0, c, 0)).unwrap_err(),
            PatchError::AlreadyConnected(InputId::new(c, 0))
        );
        assert_eq!(patch.wire_count(), 1);
    }

    #[test]
    fn test_value_cycle_rejected() {
        let mut patch = Patch::new();
        let a = patch.insert_node(IntNode::new("a")).unwrap();
        let b = patch.insert_node(IntNode::new("b")).unwrap();

        patch.insert_wire(wire(a, 0, b, 0)).unwrap();
        let back = wire(b, 0, a, 0);
        assert_eq!(
            patch.insert_wire(back).unwrap_err(),
            PatchError::CycleDetected(back)
        );

        let own = wire(a, 0, a, 0);
        assert_eq!(patch.insert_wire(own).unwrap_err(), PatchError::CycleDetected(own));
        assert_eq!(patch.wire_count(), 1);
    }

    #[test]
    fn test_wire_cycle_without_bindings_allowed() {
        let mut patch = Patch::new();
        let a = patch.insert_node(BasicNode::passive("a")).unwrap();
        let b = patch.insert_node(BasicNode::passive("b")).unwrap();

        patch.insert_wire(wire(a, 0, b, 0)).unwrap();
        patch.insert_wire(wire(b, 0, a, 0)).unwrap();
        assert_eq!(patch.wire_count(), 2);
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut patch = Patch::new();
        let a = patch.insert_node(IntNode::new("a")).unwrap();
        let b = patch.insert_node(IntNode::new("b")).unwrap();
        let c = patch.insert_node(IntNode::new("c")).unwrap();
        patch.insert_wire(wire(a, 0, b, 0)).unwrap();
        patch.insert_wire(wire(b, 0, c, 0)).unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        patch.subscribe(move |e| sink.lock().push(e.clone()));

        patch.remove_node(b).unwrap();
        assert!(patch.wires().all(|w| !w.involves_node(b)));
        assert_eq!(patch.wire_count(), 0);
        assert!(patch.wires_touching(a).unwrap().is_empty());

        let events = events.lock();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], PatchEvent::NodeRemoved(b));
    }

    #[test]
    fn test_remove_missing_wire_is_noop() {
        let mut patch = Patch::new();
        let a = patch.insert_node(IntNode::new("a")).unwrap();
        let b = patch.insert_node(IntNode::new("b")).unwrap();
        let w = wire(a, 0, b, 0);

        assert!(!patch.remove_wire(w));
        patch.insert_wire(w).unwrap();
        assert!(patch.remove_wire(w));
        assert!(!patch.contains_wire(&w));
        assert!(!patch.remove_wire(w));
    }

    #[test]
    fn test_wires_touching_unknown_node() {
        let patch = Patch::new();
        let id = NodeId::new();
        assert_eq!(patch.wires_touching(id).unwrap_err(), PatchError::NodeNotFound(id));
    }

    #[test]
    fn test_downstream_and_upstream() {
        let mut patch = Patch::new();
        let a = patch.insert_node(IntNode::new("a")).unwrap();
        let b = patch.insert_node(IntNode::new("b")).unwrap();
        let c = patch.insert_node(IntNode::new("c")).unwrap();
        let d = patch.insert_node(IntNode::new("d")).unwrap();
        patch.insert_wire(wire(a, 0, b, 0)).unwrap();
        patch.insert_wire(wire(b, 0, c, 0)).unwrap();

        let down: Vec<_> = patch.downstream(a).unwrap().into_iter().collect();
        assert_eq!(down, vec![b, c]);
        assert!(patch.downstream(c).unwrap().is_empty());

        let up: Vec<_> = patch.upstream(c).unwrap().into_iter().collect();
        assert_eq!(up, vec![b, a]);
        assert!(patch.upstream(d).unwrap().is_empty());
    }

    #[test]
    fn test_downstream_includes_start_on_cycle() {
        let mut patch = Patch::new();
        let a = patch.insert_node(BasicNode::passive("a")).unwrap();
        let b = patch.insert_node(BasicNode::passive("b")).unwrap();
        patch.insert_wire(wire(a, 0, b, 0)).unwrap();
        patch.insert_wire(wire(b, 0, a, 0)).unwrap();

        let down = patch.downstream(a).unwrap();
        assert!(down.contains(&a));
        assert!(down.contains(&b));
    }

    #[test]
    fn test_from_parts() {
        let int1 = IntNode::new("Integer 1").with_value(2);
        let int2 = IntNode::new("Integer 2");
        let w = Wire::new(OutputId::of(&int1, 0), InputId::of(&int2, 0));
        let int2_id = int2.id();

        let patch = Patch::from_parts(
            [Box::new(int1) as Box<dyn Node>, Box::new(int2)],
            [w],
        )
        .unwrap();
        assert_eq!(patch.node_count(), 2);
        assert_eq!(
            patch.input_value(InputId::new(int2_id, 0)).unwrap(),
            Some(&PortValue::Int(2))
        );
    }

    #[test]
    fn test_from_parts_rejects_dangling_wire() {
        let int1 = IntNode::new("Integer 1");
        let w = Wire::new(OutputId::of(&int1, 0), InputId::new(NodeId::new(), 0));
        let err = Patch::from_parts([Box::new(int1) as Box<dyn Node>], [w]).unwrap_err();
        assert_eq!(err, PatchError::NodeNotFound(w.to.node));
    }

    #[test]
    fn test_node_metadata_updates() {
        let mut patch = Patch::new();
        let id = patch.insert_node(IntNode::new("a")).unwrap();

        patch.rename_node(id, "renamed").unwrap();
        patch.set_locked(id, true).unwrap();
        patch.move_node(id, Position::new(10.0, 20.0)).unwrap();

        let node = patch.node(id).unwrap();
        assert_eq!(node.name(), "renamed");
        assert!(node.locked());
        assert_eq!(node.position(), Some(Position::new(10.0, 20.0)));
    }

    #[test]
    fn test_prune_selection() {
        let mut patch = Patch::new();
        let a = patch.insert_node(IntNode::new("a")).unwrap();
        let b = patch.insert_node(IntNode::new("b")).unwrap();
        let selection: Selection = [a, b].into_iter().collect();

        patch.remove_node(b).unwrap();
        let pruned = patch.prune_selection(&selection);
        assert!(pruned.contains(a));
        assert!(!pruned.contains(b));
        assert_eq!(selection.len(), 2);
    }
}
