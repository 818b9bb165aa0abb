//! Execution plan builder
//!
//! The single entry point that turns a validated [`Application`] into a
//! deployment-ready plan: select the cluster runtime by the application's
//! cluster-type tag, create the physical instance, deploy topics, then
//! assemble one deployment descriptor per agent. Planning is
//! all-or-nothing — the first failure aborts and wraps into a `Planning`
//! error; partial plans are never returned.

use crate::agents::{AgentTypeRegistry, ComponentType};
use crate::cluster::ClusterRuntimeRegistry;
use crate::error::{Result, RuntimeError};
use crate::instance::PhysicalApplicationInstance;
use pipeforge_model::{Application, StreamingCluster};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Reference to the code storage backend an agent process needs at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeStorageConfig {
    /// Storage backend tag ("none" when agents carry no packaged code)
    #[serde(rename = "type")]
    pub storage_type: String,

    /// Backend-specific configuration
    #[serde(default)]
    pub configuration: HashMap<String, serde_yaml::Value>,
}

impl Default for CodeStorageConfig {
    fn default() -> Self {
        Self {
            storage_type: "none".to_string(),
            configuration: HashMap::new(),
        }
    }
}

/// Everything the orchestration layer needs to start one agent process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDeploymentDescriptor {
    pub module_id: String,
    pub agent_id: String,
    pub agent_type: String,
    pub component_type: ComponentType,
    pub tenant: String,
    pub application_id: String,

    /// Qualified physical names of the input topics
    pub input_topics: Vec<String>,

    /// Qualified physical names of the output topics
    pub output_topics: Vec<String>,

    /// Free-form agent configuration
    pub configuration: HashMap<String, serde_yaml::Value>,

    /// Streaming cluster the agent connects to at startup
    pub streaming_cluster: StreamingCluster,

    /// Code storage the agent fetches its archive from at startup
    pub code_storage: CodeStorageConfig,
}

/// The deployment-ready output of plan building.
#[derive(Debug)]
pub struct ExecutionPlan {
    /// The resolved physical bindings
    pub instance: PhysicalApplicationInstance,
    /// Per-agent descriptors, in module/pipeline order
    pub agents: Vec<AgentDeploymentDescriptor>,
}

/// Planner settings shared across applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Tenant used when the cluster configuration does not override it
    #[serde(default = "default_tenant", rename = "default-tenant")]
    pub default_tenant: String,

    /// Namespace used when the cluster configuration does not override it
    #[serde(default = "default_namespace", rename = "default-namespace")]
    pub default_namespace: String,

    /// Code storage reference stamped into every descriptor
    #[serde(default, rename = "code-storage")]
    pub code_storage: CodeStorageConfig,
}

fn default_tenant() -> String {
    "public".to_string()
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_tenant: default_tenant(),
            default_namespace: default_namespace(),
            code_storage: CodeStorageConfig::default(),
        }
    }
}

/// Builds execution plans against a fixed set of cluster runtimes and
/// agent-type capabilities.
pub struct ExecutionPlanBuilder {
    runtimes: ClusterRuntimeRegistry,
    agent_types: AgentTypeRegistry,
    config: PlannerConfig,
}

impl ExecutionPlanBuilder {
    pub fn new(
        runtimes: ClusterRuntimeRegistry,
        agent_types: AgentTypeRegistry,
        config: PlannerConfig,
    ) -> Self {
        Self {
            runtimes,
            agent_types,
            config,
        }
    }

    /// Build the execution plan for an application.
    ///
    /// Idempotent given an unchanged application and unchanged remote
    /// state. Any failure aborts the whole plan.
    pub async fn build(
        &self,
        application_id: &str,
        application: &Application,
    ) -> Result<ExecutionPlan> {
        self.build_inner(application_id, application)
            .await
            .map_err(RuntimeError::planning)
    }

    async fn build_inner(
        &self,
        application_id: &str,
        application: &Application,
    ) -> Result<ExecutionPlan> {
        application.validate()?;
        let streaming_cluster = &application.instance().streaming_cluster;
        let cluster_type = streaming_cluster.cluster_type.as_str();

        let runtime = self
            .runtimes
            .get(cluster_type)
            .ok_or_else(|| RuntimeError::UnsupportedClusterType(cluster_type.to_string()))?;

        let instance = runtime
            .create_physical_instance(
                application,
                &self.config.default_tenant,
                &self.config.default_namespace,
            )
            .await?;
        runtime.deploy_topics(&instance).await?;

        let mut agents = Vec::new();
        for module in application.modules() {
            for agent in &module.agents {
                let provider = self
                    .agent_types
                    .lookup(&agent.agent_type, cluster_type)
                    .ok_or_else(|| RuntimeError::UnknownAgentType {
                        agent_type: agent.agent_type.clone(),
                        cluster_type: cluster_type.to_string(),
                        known: self.agent_types.known_agent_types(),
                    })?;

                // The plugin must have bound this agent during instance
                // creation; a miss here is a broken plugin, not bad config.
                if instance
                    .get_agent_implementation(&module.id, &agent.id)
                    .is_none()
                {
                    return Err(RuntimeError::NotFound(format!(
                        "agent implementation '{}#{}' was never registered",
                        module.id, agent.id
                    )));
                }

                let mut input_topics = Vec::new();
                if let Some(connection) = &agent.input {
                    let topic = instance.get_connection_implementation(module, connection)?;
                    input_topics.push(topic.qualified_name());
                }
                let mut output_topics = Vec::new();
                if let Some(connection) = &agent.output {
                    let topic = instance.get_connection_implementation(module, connection)?;
                    output_topics.push(topic.qualified_name());
                }

                agents.push(AgentDeploymentDescriptor {
                    module_id: module.id.clone(),
                    agent_id: agent.id.clone(),
                    agent_type: agent.agent_type.clone(),
                    component_type: provider.component_type,
                    tenant: instance.default_tenant().to_string(),
                    application_id: application_id.to_string(),
                    input_topics,
                    output_topics,
                    configuration: agent.configuration.clone(),
                    streaming_cluster: streaming_cluster.clone(),
                    code_storage: self.config.code_storage.clone(),
                });
            }
        }

        info!(
            application_id,
            cluster_type,
            topics = instance.topic_count(),
            agents = agents.len(),
            "Execution plan built"
        );
        Ok(ExecutionPlan { instance, agents })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_storage_config_default() {
        let config = CodeStorageConfig::default();
        assert_eq!(config.storage_type, "none");
        assert!(config.configuration.is_empty());
    }

    #[test]
    fn test_planner_config_defaults() {
        let config: PlannerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.default_tenant, "public");
        assert_eq!(config.default_namespace, "default");
        assert_eq!(config.code_storage.storage_type, "none");
    }

    #[test]
    fn test_descriptor_serializes_for_orchestration() {
        let descriptor = AgentDeploymentDescriptor {
            module_id: "module-1".to_string(),
            agent_id: "step1".to_string(),
            agent_type: "drop-fields".to_string(),
            component_type: ComponentType::Processor,
            tenant: "public".to_string(),
            application_id: "app".to_string(),
            input_topics: vec!["persistent://public/default/input-topic".to_string()],
            output_topics: vec![],
            configuration: HashMap::new(),
            streaming_cluster: StreamingCluster::default(),
            code_storage: CodeStorageConfig::default(),
        };
        let yaml = serde_yaml::to_string(&descriptor).unwrap();
        assert!(yaml.contains("component_type: processor"));
        assert!(yaml.contains("persistent://public/default/input-topic"));

        let parsed: AgentDeploymentDescriptor = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, descriptor);
    }
}
