//! Named color and color-list presets
//!
//! The animation engine only ever sees `#RRGGBB` strings; presets are a
//! convenience layer that lets callers say "ocean" instead of a hex list.
//! The engine itself performs no I/O for them: lookups go through the
//! read-only [`PresetStore`] trait, injected by whoever assembles the
//! session. [`JsonPresetStore`] is the standard implementation, fed from
//! the two JSON asset maps.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Read-only lookup of named presets
pub trait PresetStore {
    /// Resolve a named single color to its `#RRGGBB` string
    fn get_color(&self, name: &str) -> Option<&str>;

    /// Resolve a named color list to its `#RRGGBB` strings
    fn get_color_list(&self, name: &str) -> Option<&[String]>;
}

/// Preset store backed by the JSON asset maps
/// (`colors.json` / `color_lists.json`)
#[derive(Debug, Default)]
pub struct JsonPresetStore {
    colors: HashMap<String, String>,
    color_lists: HashMap<String, Vec<String>>,
}

impl JsonPresetStore {
    /// Store with no presets
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the two JSON maps. Values are kept as strings; color-format
    /// validation stays with the animation factory, which names the
    /// offending value on failure.
    pub fn from_json(colors_json: &str, color_lists_json: &str) -> Result<Self> {
        let colors = serde_json::from_str(colors_json)
            .map_err(|e| Error::Config(format!("invalid colors preset JSON: {}", e)))?;
        let color_lists = serde_json::from_str(color_lists_json)
            .map_err(|e| Error::Config(format!("invalid color_lists preset JSON: {}", e)))?;
        Ok(JsonPresetStore {
            colors,
            color_lists,
        })
    }
}

impl PresetStore for JsonPresetStore {
    fn get_color(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }

    fn get_color_list(&self, name: &str) -> Option<&[String]> {
        self.color_lists.get(name).map(Vec::as_slice)
    }
}
