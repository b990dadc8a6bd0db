// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patch configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// RON parse error
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Geometry used by [`Patch::recursive_layout`](crate::patch::Patch::recursive_layout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of every node
    pub node_width: f32,
    /// Gap between columns and between stacked subtrees
    pub node_spacing: f32,
    /// Height of the title bar
    pub header_height: f32,
    /// Height of one port row
    pub port_height: f32,
}

impl LayoutConfig {
    /// Height of a node with the given port counts
    pub fn node_height(&self, inputs: usize, outputs: usize) -> f32 {
        self.header_height + inputs.max(outputs) as f32 * self.port_height
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_spacing: 40.0,
            header_height: 24.0,
            port_height: 22.0,
        }
    }
}

/// Patch-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Layout geometry
    pub layout: LayoutConfig,
    /// Allow wires between distinct but convertible types (`Int` to `Float`,
    /// `Vector2` to `Vector4`, ...). When off, endpoints must match exactly
    /// unless one side is `Any`.
    pub implicit_conversions: bool,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            implicit_conversions: true,
        }
    }
}

impl PatchConfig {
    /// Parse from RON; missing fields take their defaults
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(s)?)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = PatchConfig::from_ron("(layout: (node_spacing: 10.0))").unwrap();
        assert_eq!(config.layout.node_spacing, 10.0);
        assert_eq!(config.layout.node_width, 180.0);
        assert!(config.implicit_conversions);
    }

    #[test]
    fn test_config_serialization() {
        let config = PatchConfig {
            implicit_conversions: false,
            ..Default::default()
        };
        let ron = config.to_ron().unwrap();
        let loaded = PatchConfig::from_ron(&ron).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            PatchConfig::from_ron("(layout: 3)"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_node_height() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.node_height(1, 1), 46.0);
        assert_eq!(layout.node_height(2, 1), 68.0);
        assert_eq!(layout.node_height(0, 0), 24.0);
    }
}
