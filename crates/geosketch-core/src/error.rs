//! Error types for geosketch

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeosketchError {
    // Transform errors
    #[error("No coordinate transform available from {from} to {to}: {reason}")]
    TransformSetup {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Coordinate transform from {from} to {to} failed: {reason}")]
    Transform {
        from: String,
        to: String,
        reason: String,
    },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GeosketchError>;
