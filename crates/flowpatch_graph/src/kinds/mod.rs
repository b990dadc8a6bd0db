// SPDX-License-Identifier: MIT OR Apache-2.0
//! Concrete node kinds built on the core [`Node`](crate::node::Node) trait.

pub mod basic;
pub mod math;
pub mod value;

pub use basic::BasicNode;
pub use math::{MathNode, MathOp};
pub use value::IntNode;

use crate::node::NodeRegistry;

/// Create a registry with every built-in kind
pub fn create_builtin_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    registry.register(value::KIND, "Integer value forwarded from input to output", |name| {
        Box::new(IntNode::new(name))
    });

    for op in MathOp::ALL {
        registry.register(op.kind(), op.description(), move |name| {
            Box::new(MathNode::new(name, op))
        });
    }

    registry.register(basic::KIND, "Inert node with a single untyped input and output", |name| {
        Box::new(BasicNode::passive(name))
    });

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = create_builtin_registry();
        assert_eq!(registry.kinds().count(), 2 + MathOp::ALL.len());

        let node = registry.create_node("int", "Integer 1").unwrap();
        assert_eq!(node.kind(), "int");
        assert_eq!(node.name(), "Integer 1");
        assert_eq!(node.inputs().len(), 1);

        let add = registry.create_node("math_add", "Add").unwrap();
        assert_eq!(add.inputs().len(), 2);
        assert_eq!(add.outputs().len(), 1);

        assert!(registry.create_node("missing", "x").is_none());
    }

    #[test]
    fn test_registry_creates_fresh_ids() {
        let registry = create_builtin_registry();
        let a = registry.create_node("int", "a").unwrap();
        let b = registry.create_node("int", "b").unwrap();
        assert_ne!(a.id(), b.id());
    }
}
