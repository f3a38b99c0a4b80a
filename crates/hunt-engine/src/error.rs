//! Error types for the hunt binary.
//!
//! [`EngineError`] wraps every failure mode between startup and the final
//! summary.

/// Top-level error for the hunt binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: hunt_core::ConfigError,
    },

    /// Grid construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: hunt_world::WorldError,
    },

    /// The hunt itself failed.
    #[error("hunt error: {source}")]
    Hunt {
        /// The underlying hunt error.
        #[from]
        source: hunt_core::HuntError,
    },

    /// Interactive input could not be obtained.
    #[error("prompt error: {message}")]
    Prompt {
        /// Description of the prompt failure.
        message: String,
    },

    /// Reading stdin or writing stdout failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
