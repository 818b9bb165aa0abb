use thiserror::Error;

/// Result type alias for code storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Single error surface for every storage backend; underlying causes are
/// wrapped, never interpreted.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The archive does not exist for this tenant
    #[error("Archive '{archive_id}' not found for tenant '{tenant}'")]
    NotFound { tenant: String, archive_id: String },

    /// Operation declared but deliberately not implemented
    #[error("Operation not implemented: {0}")]
    Unimplemented(&'static str),

    /// Filesystem/transport failure from the backend
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive metadata could not be read or written
    #[error("Archive metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    /// Any other backend failure, wrapped with its cause
    #[error("Storage backend error: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StorageError {
    /// Create a backend error without an underlying cause
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying backend cause
    pub fn backend_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
