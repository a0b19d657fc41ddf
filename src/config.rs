//! `novagraph.toml` widget configuration.
//!
//! Every key is optional; anything left out falls back to the defaults for
//! the chosen injection strategy.
//!
//! ```toml
//! injection = "event"
//! width = 600
//! link_distance = 50
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::html::Injection;
use crate::params::LayoutParams;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConfig {
    pub injection: Injection,
    pub width: Option<f64>,
    pub height: Option<u32>,
    pub node_strength: Option<f64>,
    pub link_strength: Option<f64>,
    pub link_distance: Option<f64>,
    pub collide_strength: Option<f64>,
}

impl WidgetConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigRead(path.to_path_buf(), e))?;
        let config: WidgetConfig =
            toml::from_str(&content).map_err(|e| Error::ConfigParse(path.to_path_buf(), e))?;
        tracing::debug!(path = %path.display(), ?config, "loaded widget config");
        Ok(config)
    }

    /// Resolve the layout parameters, filling gaps with defaults.
    pub fn layout(&self) -> LayoutParams {
        let defaults = LayoutParams::for_injection(self.injection);
        LayoutParams {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            node_strength: self.node_strength.unwrap_or(defaults.node_strength),
            link_strength: self.link_strength.unwrap_or(defaults.link_strength),
            link_distance: self.link_distance.unwrap_or(defaults.link_distance),
            collide_strength: self.collide_strength.unwrap_or(defaults.collide_strength),
        }
    }
}
