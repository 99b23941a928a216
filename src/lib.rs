//! DeepaIO - Hardware abstraction library for addressable LED strips
//!
//! This library provides the core components for driving addressable LED
//! hardware through a locally-supervised controller process:
//!
//! - [`supervisor`]: ensures exactly one controller process (fcserver) is
//!   alive on the known port, launching and terminating it as needed
//! - [`opc`]: the Open Pixel Control wire codec and the TCP client that
//!   streams encoded frames to the controller
//! - [`animation`]: named frame-producing patterns (static and
//!   continuously evolving) driven at a fixed tick rate
//! - [`presets`]: injected read-only lookup of named colors and color lists

pub mod animation;
pub mod color;
pub mod config;
pub mod error;
pub mod opc;
pub mod presets;
pub mod supervisor;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
