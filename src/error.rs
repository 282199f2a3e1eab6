//! Error types for the head tracking library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML document could not be parsed or serialized
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark provider failed to produce detections for a frame
    #[error("Landmark provider error: {0}")]
    Provider(String),

    /// Frame source failed to deliver a frame
    #[error("Frame source error: {0}")]
    FrameSource(String),

    /// Unknown assignment policy requested
    #[error("Assignment policy error: {0}")]
    AssignmentPolicy(String),

    /// Game phase transition not allowed from the current phase
    #[error("Invalid game transition: {0}")]
    GameTransition(String),

    /// Overlay sink rejected a frame of draw commands
    #[error("Overlay error: {0}")]
    Overlay(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
