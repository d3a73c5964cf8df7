//! Engine configuration loaded from `kanflow.toml`.
//!
//! ```toml
//! [limits]
//! max_depth = 10
//! max_nodes = 50
//! max_children = 10
//! max_ascent = 10
//!
//! [layout]
//! node_width = 180.0
//! node_height = 60.0
//! horizontal_spacing = 40.0
//! vertical_spacing = 80.0
//! origin_x = 400.0
//! origin_y = 50.0
//! ```
//!
//! Every key is optional and falls back to the defaults shown above.

use crate::{BuildLimits, Error, LayoutConfig, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "kanflow.toml";

/// Tunables for the tree builder and the layout engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowChartConfig {
    /// Tree-size bounds.
    pub limits: BuildLimits,
    /// Layout geometry.
    pub layout: LayoutConfig,
}

impl FlowChartConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the text is not valid TOML or a
    /// value has the wrong type, or if the layout geometry is unusable.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// Returns `None` if the file doesn't exist.
    /// Returns an error if the file exists but is invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(e, Some(path.to_path_buf()), "reading config"))?;

        Self::from_toml_str(&content).map(Some)
    }

    fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        let sizes = [
            ("node_width", layout.node_width),
            ("node_height", layout.node_height),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::configuration(format!(
                    "layout.{name} must be a positive number, got {value}"
                )));
            }
        }

        let gaps = [
            ("horizontal_spacing", layout.horizontal_spacing),
            ("vertical_spacing", layout.vertical_spacing),
        ];
        for (name, value) in gaps {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::configuration(format!(
                    "layout.{name} must not be negative, got {value}"
                )));
            }
        }

        if !layout.origin_x.is_finite() || !layout.origin_y.is_finite() {
            return Err(Error::configuration("layout origin must be finite"));
        }

        Ok(())
    }
}
