// SPDX-License-Identifier: MIT OR Apache-2.0
//! Binary float arithmetic node.

use crate::node::{Binding, Node, NodeCore};
use crate::port::{Port, PortType, PortValue, PortsContainer};

const BINDINGS: [Binding; 2] = [Binding::new(0, 0), Binding::new(1, 0)];

/// Arithmetic operation computed by a [`MathNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathOp {
    /// A + B
    Add,
    /// A - B
    Subtract,
    /// A * B
    Multiply,
    /// A / B, unset when B is zero
    Divide,
    /// min(A, B)
    Min,
    /// max(A, B)
    Max,
}

impl MathOp {
    /// Every operation, in registry order
    pub const ALL: [MathOp; 6] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Min,
        Self::Max,
    ];

    /// Registry kind identifier
    pub fn kind(self) -> &'static str {
        match self {
            Self::Add => "math_add",
            Self::Subtract => "math_subtract",
            Self::Multiply => "math_multiply",
            Self::Divide => "math_divide",
            Self::Min => "math_min",
            Self::Max => "math_max",
        }
    }

    /// Human-readable description
    pub fn description(self) -> &'static str {
        match self {
            Self::Add => "Add two values",
            Self::Subtract => "Subtract B from A",
            Self::Multiply => "Multiply two values",
            Self::Divide => "Divide A by B",
            Self::Min => "Minimum of two values",
            Self::Max => "Maximum of two values",
        }
    }

    /// Apply the operation
    pub fn apply(self, a: f32, b: f32) -> Option<f32> {
        match self {
            Self::Add => Some(a + b),
            Self::Subtract => Some(a - b),
            Self::Multiply => Some(a * b),
            Self::Divide if b == 0.0 => None,
            Self::Divide => Some(a / b),
            Self::Min => Some(a.min(b)),
            Self::Max => Some(a.max(b)),
        }
    }
}

/// Node computing `A op B` over two float inputs
#[derive(Debug, Clone)]
pub struct MathNode {
    core: NodeCore,
    op: MathOp,
}

impl MathNode {
    /// Create a math node
    pub fn new(name: impl Into<String>, op: MathOp) -> Self {
        Self {
            core: NodeCore::new(
                name,
                PortsContainer::new([
                    Port::new("A", PortType::Float),
                    Port::new("B", PortType::Float),
                ]),
                PortsContainer::new([Port::new("Result", PortType::Float)]),
            ),
            op,
        }
    }

    /// The operation
    pub fn op(&self) -> MathOp {
        self.op
    }
}

impl Node for MathNode {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn kind(&self) -> &str {
        self.op.kind()
    }

    fn bindings(&self) -> &[Binding] {
        &BINDINGS
    }

    fn evaluate(&self, output: usize) -> Option<PortValue> {
        if output != 0 {
            return None;
        }
        let a = self.inputs().get(0)?.value()?.as_float()?;
        let b = self.inputs().get(1)?.value()?.as_float()?;
        self.op.apply(a, b).map(PortValue::Float)
    }
}
