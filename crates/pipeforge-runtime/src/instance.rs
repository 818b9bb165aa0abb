//! Physical application instance
//!
//! The state container a cluster runtime fills while binding a topology:
//! one physical topic per logical topic, one agent implementation per
//! `module#agent` key. Populated only during instance construction; the
//! plan builder and downstream agents read from it afterwards.

use crate::cluster::{AgentHandle, TopicHandle};
use crate::error::{Result, RuntimeError};
use pipeforge_model::{Connectable, Connection, Module};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// The resolved binding of a topology to concrete messaging resources.
#[derive(Debug)]
pub struct PhysicalApplicationInstance {
    default_tenant: String,
    default_namespace: String,
    /// Physical topics keyed by qualified name, ordered for deterministic
    /// deployment
    topics: BTreeMap<String, Arc<dyn TopicHandle>>,
    /// Agent implementations keyed by `module#agent`
    agents: HashMap<String, Arc<dyn AgentHandle>>,
}

impl PhysicalApplicationInstance {
    pub fn new(default_tenant: impl Into<String>, default_namespace: impl Into<String>) -> Self {
        Self {
            default_tenant: default_tenant.into(),
            default_namespace: default_namespace.into(),
            topics: BTreeMap::new(),
            agents: HashMap::new(),
        }
    }

    pub fn default_tenant(&self) -> &str {
        &self.default_tenant
    }

    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    /// Register a physical topic.
    ///
    /// Registering the same logical topic with the same qualified name again
    /// is a no-op — several connections may reference one topic. A logical
    /// name resolving to a second, different physical handle violates the
    /// one-physical-per-logical invariant and fails.
    pub fn register_topic(&mut self, topic: Arc<dyn TopicHandle>) -> Result<()> {
        let qualified = topic.qualified_name();
        if self.topics.contains_key(&qualified) {
            return Ok(());
        }
        if let Some(existing) = self
            .topics
            .values()
            .find(|t| t.logical_name() == topic.logical_name())
        {
            return Err(RuntimeError::AlreadyRegistered(format!(
                "logical topic '{}' already bound to '{}'",
                topic.logical_name(),
                existing.qualified_name()
            )));
        }
        debug!(topic = %qualified, "Registered physical topic");
        self.topics.insert(qualified, topic);
        Ok(())
    }

    /// All physical topics, in qualified-name order.
    pub fn topics(&self) -> impl Iterator<Item = &Arc<dyn TopicHandle>> {
        self.topics.values()
    }

    /// Number of physical topics.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Resolve a connection to the physical topic it lands on.
    ///
    /// Matching is by logical name only — tenant/namespace qualifiers never
    /// participate. A topic endpoint with no physical counterpart is a
    /// configuration-time `Topology` error enumerating the known names; an
    /// agent-output endpoint is unsupported.
    pub fn get_connection_implementation(
        &self,
        module: &Module,
        connection: &Connection,
    ) -> Result<Arc<dyn TopicHandle>> {
        let logical_name = match module.resolve_endpoint(connection) {
            Ok(Connectable::Topic(topic)) => topic.name.clone(),
            Ok(Connectable::AgentOutput(agent)) => {
                return Err(RuntimeError::UnsupportedConnection(agent.id.clone()))
            }
            // The endpoint names nothing in the topology; report it against
            // the known physical topics so the operator sees the choices.
            Err(_) => connection.endpoint.clone(),
        };
        self.topics
            .values()
            .find(|t| t.logical_name() == logical_name)
            .cloned()
            .ok_or_else(|| RuntimeError::Topology {
                topic: logical_name,
                known: self.topics.values().map(|t| t.qualified_name()).collect(),
            })
    }

    /// Register an agent implementation under `module#agent`.
    ///
    /// Called only during instance construction; a second registration for
    /// the same key is a programming error and fails fast — handles are
    /// never silently overwritten.
    pub fn register_agent(
        &mut self,
        module_id: &str,
        agent_id: &str,
        agent: Arc<dyn AgentHandle>,
    ) -> Result<()> {
        let key = agent_key(module_id, agent_id);
        if self.agents.contains_key(&key) {
            return Err(RuntimeError::AlreadyRegistered(format!(
                "agent implementation '{key}'"
            )));
        }
        debug!(agent = %key, "Registered agent implementation");
        self.agents.insert(key, agent);
        Ok(())
    }

    /// Look up an agent implementation. Absent means the plugin never
    /// registered one — registration happens during creation, never lazily.
    pub fn get_agent_implementation(
        &self,
        module_id: &str,
        agent_id: &str,
    ) -> Option<Arc<dyn AgentHandle>> {
        self.agents.get(&agent_key(module_id, agent_id)).cloned()
    }
}

fn agent_key(module_id: &str, agent_id: &str) -> String {
    format!("{module_id}#{agent_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeforge_model::{AgentConfiguration, TopicCreationMode, TopicDefinition};

    #[derive(Debug)]
    struct TestTopic {
        logical: String,
        qualified: String,
    }

    impl TestTopic {
        fn new(logical: &str) -> Arc<dyn TopicHandle> {
            Arc::new(Self {
                logical: logical.to_string(),
                qualified: format!("test://tenant/ns/{logical}"),
            })
        }

        fn qualified_as(logical: &str, qualified: &str) -> Arc<dyn TopicHandle> {
            Arc::new(Self {
                logical: logical.to_string(),
                qualified: qualified.to_string(),
            })
        }
    }

    impl TopicHandle for TestTopic {
        fn logical_name(&self) -> &str {
            &self.logical
        }

        fn qualified_name(&self) -> String {
            self.qualified.clone()
        }

        fn creation_mode(&self) -> TopicCreationMode {
            TopicCreationMode::None
        }
    }

    #[derive(Debug)]
    struct TestAgent {
        id: String,
        configuration: HashMap<String, serde_yaml::Value>,
    }

    impl TestAgent {
        fn new(id: &str) -> Arc<dyn AgentHandle> {
            Arc::new(Self {
                id: id.to_string(),
                configuration: HashMap::new(),
            })
        }
    }

    impl AgentHandle for TestAgent {
        fn agent_id(&self) -> &str {
            &self.id
        }

        fn agent_type(&self) -> &str {
            "test-agent"
        }

        fn configuration(&self) -> &HashMap<String, serde_yaml::Value> {
            &self.configuration
        }
    }

    fn module_with_topics(names: &[&str]) -> Module {
        let mut module = Module::new("module-1");
        module.topics = names
            .iter()
            .map(|n| TopicDefinition::from_name(*n))
            .collect();
        module
    }

    #[test]
    fn test_connection_resolves_by_logical_name() {
        let mut instance = PhysicalApplicationInstance::new("tenant", "ns");
        instance.register_topic(TestTopic::new("input-topic")).unwrap();

        let module = module_with_topics(&["input-topic"]);
        let handle = instance
            .get_connection_implementation(&module, &Connection::new("input-topic"))
            .unwrap();
        assert_eq!(handle.logical_name(), "input-topic");
        assert_eq!(handle.qualified_name(), "test://tenant/ns/input-topic");
    }

    #[test]
    fn test_missing_topic_enumerates_known_names() {
        let mut instance = PhysicalApplicationInstance::new("tenant", "ns");
        instance.register_topic(TestTopic::new("input-topic")).unwrap();

        let module = module_with_topics(&["input-topic"]);
        let err = instance
            .get_connection_implementation(&module, &Connection::new("missing-topic"))
            .unwrap_err();
        match err {
            RuntimeError::Topology { topic, known } => {
                assert_eq!(topic, "missing-topic");
                assert_eq!(known, vec!["test://tenant/ns/input-topic".to_string()]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_agent_output_endpoint_unsupported() {
        let instance = PhysicalApplicationInstance::new("tenant", "ns");
        let mut module = Module::new("module-1");
        module.agents.push(AgentConfiguration {
            id: "step1".to_string(),
            name: None,
            agent_type: "drop-fields".to_string(),
            input: None,
            output: None,
            configuration: HashMap::new(),
        });

        let err = instance
            .get_connection_implementation(&module, &Connection::new("step1"))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnsupportedConnection(id) if id == "step1"));
    }

    #[test]
    fn test_register_same_topic_twice_is_noop() {
        let mut instance = PhysicalApplicationInstance::new("tenant", "ns");
        instance.register_topic(TestTopic::new("events")).unwrap();
        instance.register_topic(TestTopic::new("events")).unwrap();
        assert_eq!(instance.topic_count(), 1);
    }

    #[test]
    fn test_conflicting_binding_for_logical_topic_fails() {
        let mut instance = PhysicalApplicationInstance::new("tenant", "ns");
        instance.register_topic(TestTopic::new("events")).unwrap();
        let err = instance
            .register_topic(TestTopic::qualified_as("events", "test://other/ns/events"))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::AlreadyRegistered(_)));
    }

    #[test]
    fn test_register_agent_twice_fails_fast() {
        let mut instance = PhysicalApplicationInstance::new("tenant", "ns");
        instance
            .register_agent("module-1", "step1", TestAgent::new("step1"))
            .unwrap();
        let err = instance
            .register_agent("module-1", "step1", TestAgent::new("step1"))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::AlreadyRegistered(_)));
    }

    #[test]
    fn test_unregistered_agent_lookup_is_absent() {
        let instance = PhysicalApplicationInstance::new("tenant", "ns");
        assert!(instance
            .get_agent_implementation("module-1", "step1")
            .is_none());
    }

    #[test]
    fn test_agent_keys_are_scoped_by_module() {
        let mut instance = PhysicalApplicationInstance::new("tenant", "ns");
        instance
            .register_agent("module-1", "step1", TestAgent::new("step1"))
            .unwrap();
        instance
            .register_agent("module-2", "step1", TestAgent::new("step1"))
            .unwrap();
        assert!(instance.get_agent_implementation("module-1", "step1").is_some());
        assert!(instance.get_agent_implementation("module-2", "step1").is_some());
    }
}
