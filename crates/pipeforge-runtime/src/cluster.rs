//! Cluster runtime contract and registry
//!
//! One [`ClusterRuntime`] implementation exists per supported messaging
//! technology. The execution plan builder selects the runtime by the
//! cluster-type tag declared in the application instance — never by
//! reflection or feature probing.

use crate::error::Result;
use crate::instance::PhysicalApplicationInstance;
use async_trait::async_trait;
use pipeforge_model::{Application, TopicCreationMode};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A resolved, technology-specific handle to a topic.
///
/// The logical name is the matching key; the qualified name is whatever the
/// target technology needs (tenant/namespace prefixes and the like).
pub trait TopicHandle: Send + Sync + fmt::Debug {
    /// Logical name as declared in the topology
    fn logical_name(&self) -> &str;

    /// Fully-qualified, technology-specific name
    fn qualified_name(&self) -> String;

    /// Creation policy carried over from the topic definition
    fn creation_mode(&self) -> TopicCreationMode;

    /// Partition count hint, when the technology has one
    fn partitions(&self) -> Option<u32> {
        None
    }
}

/// A resolved, technology-specific handle for a deployable agent.
pub trait AgentHandle: Send + Sync + fmt::Debug {
    fn agent_id(&self) -> &str;

    fn agent_type(&self) -> &str;

    /// Free-form configuration forwarded to the deployed process
    fn configuration(&self) -> &HashMap<String, serde_yaml::Value>;
}

/// Binds logical connections and agent configurations to concrete resources
/// of one messaging technology.
#[async_trait]
pub trait ClusterRuntime: Send + Sync {
    /// Cluster-type tag this runtime serves (e.g. "pulsar")
    fn cluster_type(&self) -> &str;

    /// Walk every module's topics, connections, and agent configurations,
    /// resolving each to a technology-specific resource descriptor.
    ///
    /// Idempotent with respect to remote state: re-running against an
    /// already-provisioned cluster is a no-op, not an error.
    async fn create_physical_instance(
        &self,
        application: &Application,
        default_tenant: &str,
        default_namespace: &str,
    ) -> Result<PhysicalApplicationInstance>;

    /// Physically create topics flagged `create-if-not-exists` that do not
    /// yet exist. Remote failures surface as `Deployment` errors for the
    /// caller to retry with backoff.
    async fn deploy_topics(&self, instance: &PhysicalApplicationInstance) -> Result<()>;
}

/// Registry of cluster runtimes, keyed by cluster-type tag.
///
/// Built once at startup and passed explicitly to the plan builder.
pub struct ClusterRuntimeRegistry {
    runtimes: HashMap<String, Arc<dyn ClusterRuntime>>,
}

impl ClusterRuntimeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            runtimes: HashMap::new(),
        }
    }

    /// Register a runtime under its own cluster-type tag
    pub fn register(&mut self, runtime: Arc<dyn ClusterRuntime>) {
        self.runtimes
            .insert(runtime.cluster_type().to_string(), runtime);
    }

    /// Get a runtime by cluster-type tag
    pub fn get(&self, cluster_type: &str) -> Option<&Arc<dyn ClusterRuntime>> {
        self.runtimes.get(cluster_type)
    }

    /// List registered cluster types
    pub fn list(&self) -> Vec<&str> {
        self.runtimes.keys().map(String::as_str).collect()
    }

    /// Check if a cluster type is registered
    pub fn contains(&self, cluster_type: &str) -> bool {
        self.runtimes.contains_key(cluster_type)
    }

    /// Number of registered runtimes
    pub fn len(&self) -> usize {
        self.runtimes.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.runtimes.is_empty()
    }
}

impl Default for ClusterRuntimeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NullRuntime;

    #[async_trait]
    impl ClusterRuntime for NullRuntime {
        fn cluster_type(&self) -> &str {
            "null"
        }

        async fn create_physical_instance(
            &self,
            _application: &Application,
            default_tenant: &str,
            default_namespace: &str,
        ) -> Result<PhysicalApplicationInstance> {
            Ok(PhysicalApplicationInstance::new(
                default_tenant,
                default_namespace,
            ))
        }

        async fn deploy_topics(&self, _instance: &PhysicalApplicationInstance) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = ClusterRuntimeRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(NullRuntime));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("null"));
        assert!(registry.get("null").is_some());
        assert!(registry.get("kafka").is_none());
    }
}
