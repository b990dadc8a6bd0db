// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph engine for visual patch editors.
//!
//! A [`Patch`] owns nodes with typed input/output ports and the wires that
//! connect them. The engine provides:
//! - Wire validation (existence, port range, type compatibility, one
//!   producer per input, no value cycles)
//! - Synchronous value propagation along wires and node bindings
//! - Recursive left-to-right layout of connected nodes
//! - Change notifications for the editor
//!
//! Rendering, persistence and undo are left to the editor.

pub mod config;
pub mod error;
pub mod event;
pub mod kinds;
pub mod layout;
pub mod node;
pub mod patch;
pub mod port;
pub mod propagation;
pub mod selection;
pub mod shared;
pub mod wire;

pub use config::{LayoutConfig, PatchConfig};
pub use error::PatchError;
pub use event::{PatchEvent, SubscriptionId};
pub use node::{Binding, Node, NodeCore, NodeId, NodeRegistry, Position};
pub use patch::Patch;
pub use port::{Port, PortDirection, PortType, PortValue, PortsContainer};
pub use selection::Selection;
pub use shared::SharedPatch;
pub use wire::{InputId, OutputId, Wire};
