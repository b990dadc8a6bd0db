// SPDX-License-Identifier: MIT OR Apache-2.0
//! Change notifications delivered to the editor.

use crate::node::{NodeId, Position};
use crate::port::{PortDirection, PortValue};
use crate::wire::Wire;
use std::fmt;

/// A change applied to a patch
#[derive(Debug, Clone, PartialEq)]
pub enum PatchEvent {
    /// A node was inserted
    NodeInserted(NodeId),
    /// A node was removed (after its wires)
    NodeRemoved(NodeId),
    /// A wire was added
    WireAdded(Wire),
    /// A wire was removed
    WireRemoved(Wire),
    /// A node changed position
    NodeMoved {
        /// Moved node
        node: NodeId,
        /// Previous position
        from: Option<Position>,
        /// New position
        to: Position,
    },
    /// A port's value was written
    PortValueChanged {
        /// Owning node
        node: NodeId,
        /// Port direction
        direction: PortDirection,
        /// Port index
        index: usize,
        /// New value
        value: Option<PortValue>,
    },
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&PatchEvent) + Send>;

/// Synchronous fan-out of [`PatchEvent`]s to listeners, in registration order
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl EventBus {
    /// Create a bus with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&PatchEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver an event to every listener
    pub fn emit(&mut self, event: &PatchEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
