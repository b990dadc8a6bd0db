// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless walkthrough of the flowpatch engine.
//!
//! Builds two wired integer nodes, lays them out, pushes a value through the
//! wire and logs every change notification. Set `RUST_LOG` to adjust the
//! verbosity, e.g. `RUST_LOG=flowpatch_graph=trace`.

use flowpatch_graph::kinds::{create_builtin_registry, IntNode};
use flowpatch_graph::{
    InputId, Node, OutputId, Patch, PatchError, PatchEvent, PortValue, Position, Wire,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Two integer nodes, the first feeding the second
fn simple_patch() -> Result<Patch, PatchError> {
    let int1 = IntNode::new("Integer 1");
    let int2 = IntNode::new("Integer 2");
    let wire = Wire::new(OutputId::of(&int1, 0), InputId::of(&int2, 0));
    let int2_id = int2.id();

    let mut patch = Patch::from_parts([Box::new(int1) as Box<dyn Node>, Box::new(int2)], [wire])?;
    patch.recursive_layout(int2_id, Position::new(800.0, 50.0))?;
    Ok(patch)
}

fn log_event(event: &PatchEvent) {
    match event {
        PatchEvent::WireAdded(wire) => tracing::info!("Added wire: {:?}", wire),
        PatchEvent::WireRemoved(wire) => tracing::info!("Removed wire: {:?}", wire),
        PatchEvent::NodeInserted(id) => tracing::info!("Added node {}", id),
        PatchEvent::NodeRemoved(id) => tracing::info!("Removed node {}", id),
        PatchEvent::NodeMoved { node, to, .. } => {
            tracing::info!("Moved node {} to ({}, {})", node, to.x, to.y);
        }
        PatchEvent::PortValueChanged {
            node,
            direction,
            index,
            value,
        } => tracing::info!("{} {} of {} is now {:?}", direction, index, node, value),
    }
}

fn run() -> Result<(), PatchError> {
    let mut patch = simple_patch()?;
    patch.subscribe(log_event);

    let ids: Vec<_> = patch.node_ids().collect();
    let (int1, int2) = (ids[0], ids[1]);

    patch.set_output_value(OutputId::new(int1, 0), Some(PortValue::Int(5)))?;

    // "Add Node": create from the registry, then wire it after int2
    let registry = create_builtin_registry();
    if let Some(node) = registry.create_node("int", "Integer") {
        let id = patch.insert_boxed(node)?;
        patch.insert_wire(Wire::new(OutputId::new(int2, 0), InputId::new(id, 0)))?;
        patch.recursive_layout(int2, Position::new(800.0, 50.0))?;
    }

    for node in patch.nodes() {
        tracing::info!(
            "{}: position {:?}, value {:?}",
            node.name(),
            node.position(),
            node.outputs()[0].value()
        );
    }
    Ok(())
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,flowpatch_graph=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        tracing::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}
