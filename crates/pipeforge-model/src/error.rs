use thiserror::Error;

/// Result type alias for topology model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised by the topology model
#[derive(Error, Debug)]
pub enum ModelError {
    /// Lookup of a module that is not part of the application
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    /// A connection endpoint that names neither a topic nor an agent
    #[error("Connection endpoint '{endpoint}' in module '{module}' does not match any topic or agent")]
    UnknownEndpoint { module: String, endpoint: String },

    /// Structural validation failed (duplicate ids, empty names, ...)
    #[error("Invalid application: {0}")]
    Validation(String),

    /// YAML document could not be deserialized
    #[error("Failed to parse document: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl ModelError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
