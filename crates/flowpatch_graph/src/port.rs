// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use crate::error::{PatchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Data type that can flow through ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    /// Boolean value
    Bool,
    /// Integer value
    Int,
    /// Floating point value
    Float,
    /// 2D vector
    Vector2,
    /// 3D vector
    Vector3,
    /// 4D vector
    Vector4,
    /// Color (RGBA)
    Color,
    /// String value
    String,
    /// Any type (for generic nodes)
    Any,
}

impl PortType {
    /// Check if this type can connect to another type
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        // Any type can connect to anything
        if matches!(self, Self::Any) || matches!(other, Self::Any) {
            return true;
        }

        if self == other {
            return true;
        }

        // Implicit conversions
        matches!(
            (self, other),
            (Self::Int, Self::Float)
                | (Self::Float, Self::Int)
                | (Self::Float, Self::Vector2 | Self::Vector3 | Self::Vector4)
                | (Self::Vector2, Self::Vector3 | Self::Vector4)
                | (Self::Vector3, Self::Vector4)
                | (Self::Color, Self::Vector4)
                | (Self::Vector4, Self::Color)
        )
    }

    /// Whether a port of this type can store `value` without conversion
    pub fn accepts(&self, value: &PortValue) -> bool {
        matches!(self, Self::Any) || value.port_type() == *self
    }
}

/// Value that can be stored in a port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f32),
    /// 2D vector
    Vector2([f32; 2]),
    /// 3D vector
    Vector3([f32; 3]),
    /// 4D vector
    Vector4([f32; 4]),
    /// Color
    Color([f32; 4]),
    /// String
    String(String),
}

impl PortValue {
    /// Get the port type for this value
    pub fn port_type(&self) -> PortType {
        match self {
            Self::Bool(_) => PortType::Bool,
            Self::Int(_) => PortType::Int,
            Self::Float(_) => PortType::Float,
            Self::Vector2(_) => PortType::Vector2,
            Self::Vector3(_) => PortType::Vector3,
            Self::Vector4(_) => PortType::Vector4,
            Self::Color(_) => PortType::Color,
            Self::String(_) => PortType::String,
        }
    }

    /// Convert the value for delivery into a port of type `target`.
    ///
    /// Returns `None` when no implicit conversion exists. Vectors widen with
    /// zeros, except the fourth component which defaults to one.
    pub fn convert_to(&self, target: PortType) -> Option<PortValue> {
        if target.accepts(self) {
            return Some(self.clone());
        }

        let converted = match (self, target) {
            (Self::Int(v), PortType::Float) => Self::Float(*v as f32),
            (Self::Float(v), PortType::Int) => Self::Int(v.round() as i64),
            (Self::Float(v), PortType::Vector2) => Self::Vector2([*v; 2]),
            (Self::Float(v), PortType::Vector3) => Self::Vector3([*v; 3]),
            (Self::Float(v), PortType::Vector4) => Self::Vector4([*v; 4]),
            (Self::Vector2([x, y]), PortType::Vector3) => Self::Vector3([*x, *y, 0.0]),
            (Self::Vector2([x, y]), PortType::Vector4) => Self::Vector4([*x, *y, 0.0, 1.0]),
            (Self::Vector3([x, y, z]), PortType::Vector4) => Self::Vector4([*x, *y, *z, 1.0]),
            (Self::Color(c), PortType::Vector4) => Self::Vector4(*c),
            (Self::Vector4(v), PortType::Color) => Self::Color(*v),
            _ => return None,
        };
        Some(converted)
    }

    /// The value as a float, for numeric values
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// The value as an integer, if it is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for PortValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for PortValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PortValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for PortValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A port on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    index: usize,
    /// Port name (not unique)
    pub name: String,
    port_type: PortType,
    value: Option<PortValue>,
}

impl Port {
    /// Create a new, unset port. The index is assigned by its container.
    pub fn new(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            index: 0,
            name: name.into(),
            port_type,
            value: None,
        }
    }

    /// Set the initial value
    pub fn with_value(mut self, value: PortValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Position of this port within its container
    pub fn index(&self) -> usize {
        self.index
    }

    /// Data type, fixed at construction
    pub fn port_type(&self) -> PortType {
        self.port_type
    }

    /// Current value
    pub fn value(&self) -> Option<&PortValue> {
        self.value.as_ref()
    }

    /// Replace the stored value.
    ///
    /// Fails with [`PatchError::TypeMismatch`] and leaves the port unchanged
    /// if the value is not of this port's type.
    pub fn set_value(&mut self, value: Option<PortValue>) -> Result<()> {
        if let Some(v) = &value {
            if !self.port_type.accepts(v) {
                return Err(PatchError::TypeMismatch {
                    expected: self.port_type,
                    found: v.port_type(),
                });
            }
        }
        self.value = value;
        Ok(())
    }

    /// Check if a wire from this port into `input` would be type-valid
    pub fn can_connect(&self, input: &Port) -> bool {
        self.port_type.can_connect_to(&input.port_type)
    }
}

/// Ordered ports of one direction belonging to a node.
///
/// Insertion order defines each port's index; the set of ports is fixed once
/// the container is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortsContainer {
    ports: Vec<Port>,
}

impl PortsContainer {
    /// Build a container, assigning indices in order
    pub fn new(ports: impl IntoIterator<Item = Port>) -> Self {
        let ports = ports
            .into_iter()
            .enumerate()
            .map(|(index, mut port)| {
                port.index = index;
                port
            })
            .collect();
        Self { ports }
    }

    /// Get a port by index
    pub fn get(&self, index: usize) -> Option<&Port> {
        self.ports.get(index)
    }

    /// Get a mutable port by index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Port> {
        self.ports.get_mut(index)
    }

    /// Number of ports
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Whether the container has no ports
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Iterate ports in index order
    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }
}

impl std::ops::Index<usize> for PortsContainer {
    type Output = Port;

    fn index(&self, index: usize) -> &Port {
        &self.ports[index]
    }
}
