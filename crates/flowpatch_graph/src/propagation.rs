// SPDX-License-Identifier: MIT OR Apache-2.0
//! Value propagation along wires and node bindings.
//!
//! Writing a port pushes its value synchronously. The outputs affected by the
//! write (reachable through wires and node bindings) are collected once and
//! processed in dependency order: each affected output is recomputed once,
//! after every input feeding it has been delivered, and then delivered over
//! each of its wires once. Work is linear in the affected part of the graph
//! even when paths split and rejoin. Ties are broken by discovery order, with
//! wires in insertion order, so delivery order is deterministic. Value cycles
//! are rejected when wires are inserted, so the order always exists.

use crate::error::{PatchError, Result};
use crate::event::PatchEvent;
use crate::patch::Patch;
use crate::port::{PortDirection, PortValue};
use crate::wire::{InputId, OutputId, Wire};
use indexmap::IndexMap;
use std::collections::VecDeque;

impl Patch {
    /// Write an output port and propagate the value downstream
    pub fn set_output_value(&mut self, output: OutputId, value: Option<PortValue>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&output.node)
            .ok_or(PatchError::NodeNotFound(output.node))?;
        let count = node.outputs().len();
        let port = node
            .outputs_mut()
            .get_mut(output.port)
            .ok_or(PatchError::PortOutOfRange {
                node: output.node,
                direction: PortDirection::Output,
                index: output.port,
                count,
            })?;
        port.set_value(value.clone())?;

        self.events.emit(&PatchEvent::PortValueChanged {
            node: output.node,
            direction: PortDirection::Output,
            index: output.port,
            value,
        });
        self.propagate(&[output], false);
        Ok(())
    }

    /// Write an input port and propagate through the node's bindings.
    ///
    /// A wired input is overwritten again the next time its producer changes.
    pub fn set_input_value(&mut self, input: InputId, value: Option<PortValue>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&input.node)
            .ok_or(PatchError::NodeNotFound(input.node))?;
        let count = node.inputs().len();
        let port = node
            .inputs_mut()
            .get_mut(input.port)
            .ok_or(PatchError::PortOutOfRange {
                node: input.node,
                direction: PortDirection::Input,
                index: input.port,
                count,
            })?;
        port.set_value(value.clone())?;

        self.events.emit(&PatchEvent::PortValueChanged {
            node: input.node,
            direction: PortDirection::Input,
            index: input.port,
            value,
        });
        let bound: Vec<OutputId> = self.bound_outputs(input).collect();
        self.propagate(&bound, true);
        Ok(())
    }

    /// Deliver the producer's current value through a freshly added wire
    pub(crate) fn push_wire(&mut self, wire: Wire) {
        let value = self.output_value(wire.from).ok().flatten().cloned();
        self.deliver(wire.to, value);
        let bound: Vec<OutputId> = self.bound_outputs(wire.to).collect();
        self.propagate(&bound, true);
    }

    /// Push `roots` and everything downstream of them.
    ///
    /// Roots are recomputed first when `evaluate_roots` is set; otherwise
    /// they already hold the value to push.
    fn propagate(&mut self, roots: &[OutputId], evaluate_roots: bool) {
        for output in self.affected_outputs(roots) {
            let is_root = roots.contains(&output);
            if (evaluate_roots || !is_root) && !self.reevaluate(output) {
                continue;
            }

            let value = self.output_value(output).ok().flatten().cloned();
            let targets: Vec<InputId> = self.wires_from(output).map(|w| w.to).collect();
            for input in targets {
                tracing::trace!("Propagating {:?} from {:?} to {:?}", value, output, input);
                self.deliver(input, value.clone());
            }
        }
    }

    /// Outputs reachable from `roots`, each listed once, after every output
    /// it depends on
    fn affected_outputs(&self, roots: &[OutputId]) -> Vec<OutputId> {
        let mut dependents: IndexMap<OutputId, Vec<OutputId>> = IndexMap::new();
        let mut queue: VecDeque<OutputId> = roots.iter().copied().collect();
        while let Some(output) = queue.pop_front() {
            if dependents.contains_key(&output) {
                continue;
            }
            let next: Vec<OutputId> = self
                .wires_from(output)
                .flat_map(|w| self.bound_outputs(w.to))
                .collect();
            queue.extend(next.iter().copied());
            dependents.insert(output, next);
        }

        let mut pending: IndexMap<OutputId, usize> =
            dependents.keys().map(|output| (*output, 0)).collect();
        for next in dependents.values().flatten() {
            if let Some(count) = pending.get_mut(next) {
                *count += 1;
            }
        }

        let mut ready: VecDeque<OutputId> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(output, _)| *output)
            .collect();
        let mut order = Vec::with_capacity(dependents.len());
        while let Some(output) = ready.pop_front() {
            order.push(output);
            for next in &dependents[&output] {
                if let Some(count) = pending.get_mut(next) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(*next);
                    }
                }
            }
        }
        order
    }

    /// Store a value arriving over a wire, converting it to the input's type.
    ///
    /// Values that cannot be converted (only possible when an `Any` output
    /// feeds a typed input) leave the input unset.
    fn deliver(&mut self, input: InputId, value: Option<PortValue>) {
        let Some(port) = self
            .nodes
            .get_mut(&input.node)
            .and_then(|node| node.inputs_mut().get_mut(input.port))
        else {
            return;
        };

        let converted = value.and_then(|v| {
            let converted = v.convert_to(port.port_type());
            if converted.is_none() {
                tracing::debug!(
                    "Dropped {:?} value at {:?}: no conversion to {:?}",
                    v.port_type(),
                    input,
                    port.port_type()
                );
            }
            converted
        });
        if port.set_value(converted.clone()).is_err() {
            return;
        }

        self.events.emit(&PatchEvent::PortValueChanged {
            node: input.node,
            direction: PortDirection::Input,
            index: input.port,
            value: converted,
        });
    }

    /// Recompute a bound output from its node's inputs; returns whether it
    /// was written
    fn reevaluate(&mut self, output: OutputId) -> bool {
        let Some(node) = self.nodes.get_mut(&output.node) else {
            return false;
        };
        let value = node.evaluate(output.port);
        let Some(port) = node.outputs_mut().get_mut(output.port) else {
            return false;
        };
        let value = value.and_then(|v| v.convert_to(port.port_type()));
        if let Err(err) = port.set_value(value.clone()) {
            tracing::warn!("Node {} produced an invalid value: {}", output.node, err);
            return false;
        }

        self.events.emit(&PatchEvent::PortValueChanged {
            node: output.node,
            direction: PortDirection::Output,
            index: output.port,
            value,
        });
        true
    }
}
