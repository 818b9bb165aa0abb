//! Pulsar cluster runtime for pipeforge
//!
//! The reference [`ClusterRuntime`](pipeforge_runtime::ClusterRuntime)
//! implementation: resolves a logical topology to
//! tenant/namespace-qualified Pulsar topics, registers agent bindings, and
//! provisions `create-if-not-exists` topics through the admin REST API.
//!
//! # Example
//!
//! ```rust,ignore
//! use pipeforge_pulsar::{PulsarClusterConfig, PulsarClusterRuntime};
//! use pipeforge_runtime::ClusterRuntimeRegistry;
//! use std::sync::Arc;
//!
//! let config = PulsarClusterConfig::from_streaming_cluster(
//!     &application.instance().streaming_cluster,
//! )?;
//! let mut registry = ClusterRuntimeRegistry::new();
//! registry.register(Arc::new(PulsarClusterRuntime::from_config(config)?));
//! ```

pub mod admin;
pub mod config;
pub mod name;
pub mod runtime;

pub use admin::{HttpPulsarAdmin, PulsarAdmin};
pub use config::{PulsarClusterConfig, SensitiveString};
pub use name::PulsarName;
pub use runtime::{PulsarAgentNode, PulsarClusterRuntime, PulsarTopic, CLUSTER_TYPE};
