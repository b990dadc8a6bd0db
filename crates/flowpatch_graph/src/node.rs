// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph engine.

use crate::port::{PortValue, PortsContainer};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A point in patch space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate, growing rightwards
    pub x: f32,
    /// Vertical coordinate, growing downwards
    pub y: f32,
}

impl Position {
    /// Create a position
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Internal dependency of a node output on one of its inputs.
///
/// Whenever input `input` changes, output `output` is recomputed through
/// [`Node::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    /// Input port index
    pub input: usize,
    /// Output port index
    pub output: usize,
}

impl Binding {
    /// Bind `output` to `input`
    pub const fn new(input: usize, output: usize) -> Self {
        Self { input, output }
    }
}

/// Fields shared by every node kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCore {
    id: NodeId,
    /// Display name
    pub name: String,
    /// Position in the patch, `None` until laid out
    pub position: Option<Position>,
    /// UI policy flag: the editor must not move or delete a locked node
    pub locked: bool,
    /// Input ports
    pub inputs: PortsContainer,
    /// Output ports
    pub outputs: PortsContainer,
}

impl NodeCore {
    /// Create node fields with a fresh ID
    pub fn new(name: impl Into<String>, inputs: PortsContainer, outputs: PortsContainer) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            position: None,
            locked: false,
            inputs,
            outputs,
        }
    }

    /// Set the position
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Node ID
    pub fn id(&self) -> NodeId {
        self.id
    }
}

/// A vertex of a patch.
///
/// Kinds store their shared fields in a [`NodeCore`] and get every accessor
/// for free; behavior comes from [`Node::bindings`] and [`Node::evaluate`].
pub trait Node: fmt::Debug + Send {
    /// Shared node fields
    fn core(&self) -> &NodeCore;

    /// Mutable shared node fields
    fn core_mut(&mut self) -> &mut NodeCore;

    /// Kind identifier, as registered in a [`NodeRegistry`]
    fn kind(&self) -> &str;

    /// Internal input-to-output dependencies, fixed at construction
    fn bindings(&self) -> &[Binding] {
        &[]
    }

    /// Compute the value of a bound output from the current inputs.
    ///
    /// The default forwards the value of the first input bound to `output`.
    fn evaluate(&self, output: usize) -> Option<PortValue> {
        let binding = self.bindings().iter().find(|b| b.output == output)?;
        self.inputs().get(binding.input)?.value().cloned()
    }

    /// Unique node ID
    fn id(&self) -> NodeId {
        self.core().id()
    }

    /// Display name
    fn name(&self) -> &str {
        &self.core().name
    }

    /// Rename the node
    fn set_name(&mut self, name: String) {
        self.core_mut().name = name;
    }

    /// Current position, `None` if never laid out
    fn position(&self) -> Option<Position> {
        self.core().position
    }

    /// Move the node
    fn set_position(&mut self, position: Option<Position>) {
        self.core_mut().position = position;
    }

    /// Whether the editor should refuse to move or delete this node
    fn locked(&self) -> bool {
        self.core().locked
    }

    /// Lock or unlock the node
    fn set_locked(&mut self, locked: bool) {
        self.core_mut().locked = locked;
    }

    /// Input ports
    fn inputs(&self) -> &PortsContainer {
        &self.core().inputs
    }

    /// Mutable input ports
    fn inputs_mut(&mut self) -> &mut PortsContainer {
        &mut self.core_mut().inputs
    }

    /// Output ports
    fn outputs(&self) -> &PortsContainer {
        &self.core().outputs
    }

    /// Mutable output ports
    fn outputs_mut(&mut self) -> &mut PortsContainer {
        &mut self.core_mut().outputs
    }
}

/// Constructor for a registered node kind, taking the display name
pub type NodeFactory = Box<dyn Fn(&str) -> Box<dyn Node> + Send + Sync>;

/// A registered node kind
pub struct NodeKind {
    /// Kind identifier
    pub id: String,
    /// Description
    pub description: String,
    factory: NodeFactory,
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeKind")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Registry of available node kinds
#[derive(Debug)]
pub struct NodeRegistry {
    /// Registered kinds by ID
    kinds: IndexMap<String, NodeKind>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            kinds: IndexMap::new(),
        }
    }

    /// Register a node kind, replacing any kind with the same ID
    pub fn register(
        &mut self,
        id: impl Into<String>,
        description: impl Into<String>,
        factory: impl Fn(&str) -> Box<dyn Node> + Send + Sync + 'static,
    ) {
        let id = id.into();
        self.kinds.insert(
            id.clone(),
            NodeKind {
                id,
                description: description.into(),
                factory: Box::new(factory),
            },
        );
    }

    /// Get a kind by ID
    pub fn get(&self, id: &str) -> Option<&NodeKind> {
        self.kinds.get(id)
    }

    /// Get all registered kinds
    pub fn kinds(&self) -> impl Iterator<Item = &NodeKind> {
        self.kinds.values()
    }

    /// Create a node of the given kind
    pub fn create_node(&self, kind: &str, name: &str) -> Option<Box<dyn Node>> {
        self.get(kind).map(|k| (k.factory)(name))
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
