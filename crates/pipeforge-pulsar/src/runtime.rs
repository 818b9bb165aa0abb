//! Pulsar cluster runtime
//!
//! Binds a logical topology to Pulsar resources: every declared topic
//! becomes a tenant/namespace-qualified [`PulsarTopic`], every agent
//! configuration a [`PulsarAgentNode`]. Connection endpoints are validated
//! at instance-creation time so a dangling reference fails the plan before
//! anything touches the cluster.

use crate::admin::{HttpPulsarAdmin, PulsarAdmin};
use crate::config::PulsarClusterConfig;
use crate::name::PulsarName;
use async_trait::async_trait;
use pipeforge_model::{AgentConfiguration, Application, TopicCreationMode, TopicDefinition};
use pipeforge_runtime::{
    AgentHandle, ClusterRuntime, PhysicalApplicationInstance, Result, RuntimeError, TopicHandle,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Cluster-type tag served by this runtime.
pub const CLUSTER_TYPE: &str = "pulsar";

/// A topology topic bound to a qualified Pulsar name.
#[derive(Debug, Clone)]
pub struct PulsarTopic {
    name: PulsarName,
    logical_name: String,
    creation_mode: TopicCreationMode,
    partitions: Option<u32>,
}

impl PulsarTopic {
    fn bind(definition: &TopicDefinition, tenant: &str, namespace: &str) -> Self {
        Self {
            name: PulsarName::new(tenant, namespace, &definition.name),
            logical_name: definition.name.clone(),
            creation_mode: definition.creation_mode,
            partitions: definition.partitions,
        }
    }

    pub fn name(&self) -> &PulsarName {
        &self.name
    }
}

impl TopicHandle for PulsarTopic {
    fn logical_name(&self) -> &str {
        &self.logical_name
    }

    fn qualified_name(&self) -> String {
        self.name.fully_qualified()
    }

    fn creation_mode(&self) -> TopicCreationMode {
        self.creation_mode
    }

    fn partitions(&self) -> Option<u32> {
        self.partitions
    }
}

/// An agent configuration bound for deployment against this cluster.
#[derive(Debug, Clone)]
pub struct PulsarAgentNode {
    agent_id: String,
    agent_type: String,
    configuration: HashMap<String, serde_yaml::Value>,
}

impl PulsarAgentNode {
    fn bind(agent: &AgentConfiguration) -> Self {
        Self {
            agent_id: agent.id.clone(),
            agent_type: agent.agent_type.clone(),
            configuration: agent.configuration.clone(),
        }
    }
}

impl AgentHandle for PulsarAgentNode {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn agent_type(&self) -> &str {
        &self.agent_type
    }

    fn configuration(&self) -> &HashMap<String, serde_yaml::Value> {
        &self.configuration
    }
}

/// [`ClusterRuntime`] implementation for Pulsar-like clusters.
pub struct PulsarClusterRuntime {
    config: PulsarClusterConfig,
    admin: Arc<dyn PulsarAdmin>,
}

impl PulsarClusterRuntime {
    /// Create a runtime with an explicit admin implementation (tests use
    /// an in-memory one).
    pub fn new(config: PulsarClusterConfig, admin: Arc<dyn PulsarAdmin>) -> Self {
        Self { config, admin }
    }

    /// Create a runtime backed by the admin REST API.
    pub fn from_config(config: PulsarClusterConfig) -> Result<Self> {
        let admin = Arc::new(HttpPulsarAdmin::new(&config)?);
        Ok(Self { config, admin })
    }
}

#[async_trait]
impl ClusterRuntime for PulsarClusterRuntime {
    fn cluster_type(&self) -> &str {
        CLUSTER_TYPE
    }

    async fn create_physical_instance(
        &self,
        application: &Application,
        default_tenant: &str,
        default_namespace: &str,
    ) -> Result<PhysicalApplicationInstance> {
        let tenant = self.config.tenant.as_deref().unwrap_or(default_tenant);
        let namespace = self
            .config
            .namespace
            .as_deref()
            .unwrap_or(default_namespace);

        let mut instance = PhysicalApplicationInstance::new(tenant, namespace);
        for module in application.modules() {
            for topic in &module.topics {
                instance.register_topic(Arc::new(PulsarTopic::bind(topic, tenant, namespace)))?;
            }
            for agent in &module.agents {
                instance.register_agent(
                    &module.id,
                    &agent.id,
                    Arc::new(PulsarAgentNode::bind(agent)),
                )?;
            }
        }

        // Validate every connection now: a dangling endpoint is a
        // configuration error and must fail the plan, not the deployed
        // agent.
        for module in application.modules() {
            for agent in &module.agents {
                for connection in agent.input.iter().chain(agent.output.iter()) {
                    instance.get_connection_implementation(module, connection)?;
                }
            }
        }

        debug!(
            tenant,
            namespace,
            topics = instance.topic_count(),
            "Created physical application instance"
        );
        Ok(instance)
    }

    async fn deploy_topics(&self, instance: &PhysicalApplicationInstance) -> Result<()> {
        for topic in instance.topics() {
            if topic.creation_mode() != TopicCreationMode::CreateIfNotExists {
                continue;
            }
            let qualified = topic.qualified_name();
            let name = PulsarName::parse(&qualified).ok_or_else(|| {
                RuntimeError::deployment(format!("'{qualified}' is not a pulsar topic name"))
            })?;

            if self.admin.topic_exists(&name).await? {
                debug!(topic = %name, "Topic already provisioned");
                continue;
            }
            info!(topic = %name, partitions = ?topic.partitions(), "Creating topic");
            self.admin.create_topic(&name, topic.partitions()).await?;
        }
        Ok(())
    }
}
