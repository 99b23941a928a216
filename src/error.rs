//! Error types for DeepaIO

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// DeepaIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or missing pattern argument
    #[error("Validation error: {0}")]
    Validation(String),

    /// Pattern name not associated with any animation
    #[error("'{0}' is not associated with any animation pattern")]
    UnknownPattern(String),

    /// Controller executable could not be started
    #[error("Failed to launch controller binary '{binary}': {source}")]
    ProcessLaunch {
        /// Path of the binary that failed to start
        binary: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// Frame transmission failure on the streaming connection
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Invalid packet or frame buffer
    #[error("Invalid packet: {0}")]
    InvalidPacket(String),

    /// Configuration or preset error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
