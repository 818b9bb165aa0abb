//! Declarative topology model for pipeforge applications
//!
//! Immutable value types describing a logical pipeline: modules, topic
//! definitions, agent configurations, and the connections between them —
//! plus structural validation. No binding to any concrete messaging
//! technology happens here; that is the job of a cluster runtime plugin.
//!
//! # Example
//!
//! ```rust
//! use pipeforge_model::{Application, Connection, Connectable};
//!
//! let instance = r#"
//! instance:
//!   streamingCluster:
//!     type: "pulsar"
//! "#;
//! let module = r#"
//! module: "module-1"
//! topics:
//!   - name: "input-topic"
//!     creation-mode: create-if-not-exists
//! pipeline:
//!   - id: "step1"
//!     type: "drop-fields"
//!     input: "input-topic"
//! "#;
//!
//! let app = Application::from_yaml(instance, &[module]).unwrap();
//! let module = app.get_module("module-1").unwrap();
//! let endpoint = module
//!     .resolve_endpoint(&Connection::new("input-topic"))
//!     .unwrap();
//! assert!(matches!(endpoint, Connectable::Topic(_)));
//! ```

pub mod application;
pub mod error;
pub mod module;
pub mod topic;

pub use application::{Application, ComputeCluster, Instance, StreamingCluster};
pub use error::{ModelError, Result};
pub use module::{AgentConfiguration, Connectable, Connection, Module};
pub use topic::{TopicCreationMode, TopicDefinition};
