// SPDX-License-Identifier: MIT OR Apache-2.0
//! Integer value node.
//!
//! Holds a single integer that mirrors whatever arrives on its input and is
//! republished on its output. Editing the value directly means writing the
//! output port through the patch.

use crate::node::{Binding, Node, NodeCore, Position};
use crate::port::{Port, PortType, PortValue, PortsContainer};

/// Registry kind identifier
pub const KIND: &str = "int";

const BINDINGS: [Binding; 1] = [Binding::new(0, 0)];

/// Node binding an integer input to an integer output
#[derive(Debug, Clone)]
pub struct IntNode {
    core: NodeCore,
}

impl IntNode {
    /// Create an unset integer node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: NodeCore::new(
                name,
                PortsContainer::new([Port::new("Value", PortType::Int)]),
                PortsContainer::new([Port::new("Value", PortType::Int)]),
            ),
        }
    }

    /// Set the initial position
    pub fn with_position(mut self, position: Position) -> Self {
        self.core.position = Some(position);
        self
    }

    /// Set the initial value, published on the output
    pub fn with_value(mut self, value: i64) -> Self {
        self.core.outputs = PortsContainer::new([
            Port::new("Value", PortType::Int).with_value(PortValue::Int(value)),
        ]);
        self
    }

    /// Current value
    pub fn value(&self) -> Option<i64> {
        self.core.outputs[0].value().and_then(PortValue::as_int)
    }
}

impl Node for IntNode {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn kind(&self) -> &str {
        KIND
    }

    fn bindings(&self) -> &[Binding] {
        &BINDINGS
    }
}
