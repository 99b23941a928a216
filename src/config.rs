//! Configuration for DeepaIO
//!
//! Loads configuration from a TOML file with the minimal parameters needed
//! to drive one strip: where the controller listens, where its binaries
//! live, how many LEDs are attached, and where the preset assets are.

use crate::error::{Error, Result};
use crate::opc::packet::MAX_PIXELS;
use crate::supervisor::DEFAULT_PORT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub controller: ControllerConfig,
    pub strip: StripConfig,
    pub assets: AssetsConfig,
    pub logging: LoggingConfig,
}

/// Controller process configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerConfig {
    /// Host the controller listens on (frames are sent here)
    pub host: String,
    /// TCP port the controller listens on
    pub port: u16,
    /// Directory holding the platform controller binaries
    pub bin_dir: String,
}

/// LED strip configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripConfig {
    /// Number of addressable LEDs; every frame has exactly this length
    pub led_count: usize,
}

/// Preset asset locations (JSON maps of named colors and color lists)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// Named single colors, `{"name": "#RRGGBB", ...}`
    pub colors: String,
    /// Named color lists, `{"name": ["#RRGGBB", ...], ...}`
    pub color_lists: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!(
                "failed to parse {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check bounds a parseable file can still violate.
    pub fn validate(&self) -> Result<()> {
        if self.strip.led_count == 0 || self.strip.led_count > MAX_PIXELS {
            return Err(Error::Config(format!(
                "strip.led_count must be between 1 and {}, got {}",
                MAX_PIXELS, self.strip.led_count
            )));
        }
        Ok(())
    }

    /// Default configuration: local controller on the standard port,
    /// one 512-LED strip.
    pub fn defaults() -> Self {
        Config {
            controller: ControllerConfig {
                host: "127.0.0.1".to_string(),
                port: DEFAULT_PORT,
                bin_dir: "bin".to_string(),
            },
            strip: StripConfig { led_count: 512 },
            assets: AssetsConfig {
                colors: "assets/colors.json".to_string(),
                color_lists: "assets/color_lists.json".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}
