// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node with caller-defined ports and no internal behavior.

use crate::node::{Node, NodeCore};
use crate::port::{Port, PortType, PortsContainer};

/// Registry kind identifier
pub const KIND: &str = "basic";

/// Inert node: values arrive on its inputs and stop there
#[derive(Debug, Clone)]
pub struct BasicNode {
    core: NodeCore,
}

impl BasicNode {
    /// Create a node with the given ports
    pub fn new(
        name: impl Into<String>,
        inputs: impl IntoIterator<Item = Port>,
        outputs: impl IntoIterator<Item = Port>,
    ) -> Self {
        Self {
            core: NodeCore::new(name, PortsContainer::new(inputs), PortsContainer::new(outputs)),
        }
    }

    /// Create a node with one `Any` input and one `Any` output
    pub fn passive(name: impl Into<String>) -> Self {
        Self::new(
            name,
            [Port::new("In", PortType::Any)],
            [Port::new("Out", PortType::Any)],
        )
    }
}

impl Node for BasicNode {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn kind(&self) -> &str {
        KIND
    }
}
