//! Error types for the runtime control plane
//!
//! The taxonomy separates configuration-time failures (non-retryable,
//! surfaced to the operator at plan time) from remote-system failures
//! (retryable by the caller with backoff — the control plane itself never
//! retries).

use pipeforge_model::ModelError;
use thiserror::Error;

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors raised while binding a topology or deploying its resources
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A connection references a topic the topology does not declare.
    /// Non-retryable configuration error; the known names are listed so the
    /// operator can spot the typo.
    #[error("Topic '{topic}' not found, known topics: {known:?}")]
    Topology { topic: String, known: Vec<String> },

    /// The plugin does not support the requested endpoint kind
    #[error("Unsupported connection to endpoint '{0}': direct agent-to-agent links are not supported by this cluster runtime")]
    UnsupportedConnection(String),

    /// No cluster runtime is registered for the application's cluster type
    #[error("No cluster runtime registered for type '{0}'")]
    UnsupportedClusterType(String),

    /// The agent type is not in the capability registry for this cluster
    #[error("Unknown agent type '{agent_type}' for cluster type '{cluster_type}', known types: {known:?}")]
    UnknownAgentType {
        agent_type: String,
        cluster_type: String,
        known: Vec<String>,
    },

    /// Remote system unreachable or rejected an operation. Retryable by the
    /// caller with backoff.
    #[error("Deployment error: {0}")]
    Deployment(String),

    /// A resource was registered twice for the same key
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    /// Lookup miss on an already-built instance — a programming or
    /// configuration error, fatal
    #[error("Not found: {0}")]
    NotFound(String),

    /// Asset provisioning collaborator failure, wrapped and re-surfaced
    #[error("Asset provisioning error: {0}")]
    AssetProvision(String),

    /// Topology model failure surfaced during binding
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Plan building aborted; wraps the first underlying failure.
    /// Partial plans are never returned.
    #[error("Plan building failed: {source}")]
    Planning {
        #[source]
        source: Box<RuntimeError>,
    },
}

impl RuntimeError {
    /// Create a deployment error
    pub fn deployment(msg: impl Into<String>) -> Self {
        Self::Deployment(msg.into())
    }

    /// Create an asset provisioning error
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::AssetProvision(msg.into())
    }

    /// Wrap a failure as a planning abort. Planning errors are never
    /// double-wrapped.
    pub fn planning(source: RuntimeError) -> Self {
        match source {
            already @ Self::Planning { .. } => already,
            other => Self::Planning {
                source: Box::new(other),
            },
        }
    }

    /// Whether the caller may retry with backoff
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Deployment(_) => true,
            Self::Planning { source } => source.is_retryable(),
            _ => false,
        }
    }
}
