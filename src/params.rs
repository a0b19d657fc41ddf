//! Layout parameters and the checks run before any HTML is built.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::html::Injection;

/// Force-layout parameters forwarded to the visualization bundle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Width of the main visualization window.
    pub width: f64,
    /// Height of the iframe in pixels.
    pub height: u32,
    /// Many-body force between nodes, range [-200, 60).
    pub node_strength: f64,
    /// Link force strength, range [0, 5).
    pub link_strength: f64,
    /// Target link length, range [0, floor(width / 3)).
    pub link_distance: f64,
    /// Collision force strength, range [0, 20).
    pub collide_strength: f64,
}

pub const DEFAULT_WIDTH: f64 = 500.0;
pub const DEFAULT_NODE_STRENGTH: f64 = -30.0;
pub const DEFAULT_LINK_STRENGTH: f64 = 1.0;
pub const DEFAULT_LINK_DISTANCE: f64 = 30.0;
pub const DEFAULT_COLLIDE_STRENGTH: f64 = 1.0;

impl Default for LayoutParams {
    fn default() -> Self {
        Self::for_injection(Injection::default())
    }
}

impl LayoutParams {
    /// Defaults for a given bundle flavour; only the iframe height differs.
    pub fn for_injection(injection: Injection) -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: injection.default_height(),
            node_strength: DEFAULT_NODE_STRENGTH,
            link_strength: DEFAULT_LINK_STRENGTH,
            link_distance: DEFAULT_LINK_DISTANCE,
            collide_strength: DEFAULT_COLLIDE_STRENGTH,
        }
    }

    /// Exclusive upper bound for `link_distance`.
    pub fn max_link_distance(&self) -> f64 {
        (self.width / 3.0).floor()
    }

    /// Check the layout parameters in isolation.
    pub fn validate(&self) -> Result<()> {
        check_range("node_strength", self.node_strength, -200.0, 60.0)?;
        check_range("link_strength", self.link_strength, 0.0, 5.0)?;
        check_range(
            "link_distance",
            self.link_distance,
            0.0,
            self.max_link_distance(),
        )?;
        check_range("collide_strength", self.collide_strength, 0.0, 20.0)?;

        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::invalid("width", "needs to be a positive number"));
        }
        if self.height == 0 {
            return Err(Error::invalid("height", "needs to be a positive number"));
        }
        Ok(())
    }
}

/// Validate a request: data shape first, then parameter ranges.
///
/// The first failing check is reported.
pub fn validate(data: &Value, params: &LayoutParams) -> Result<()> {
    let Some(map) = data.as_object() else {
        return Err(Error::invalid("data", "has to be a mapping"));
    };
    for key in ["nodes", "links"] {
        match map.get(key) {
            None => return Err(Error::invalid(key, "key is missing from `data`")),
            Some(value) if !value.is_array() => {
                tracing::debug!(key, "graph data key is not an array");
            }
            Some(_) => {}
        }
    }

    params.validate()
}

fn check_range(parameter: &'static str, value: f64, low: f64, high: f64) -> Result<()> {
    if (low..high).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid(
            parameter,
            format!("needs to be in range [{low}, {high}), got {value}"),
        ))
    }
}
