//! Error handling for the indicator engine.

/// Errors that abort an aggregation run
///
/// Only configuration and I/O problems are fatal. Data quality findings are
/// absorbed during the run and reported through the result instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The run cannot be trusted with the given inputs
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error reading the population reference file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Build a configuration error from anything displayable
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result type for indicator engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
