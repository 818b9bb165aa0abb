//! Modules, agent configurations, and connections

use crate::error::{ModelError, Result};
use crate::topic::TopicDefinition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A directional reference from an agent's input or output slot to an
/// endpoint — either a topic declared in the module or another agent's
/// output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Connection {
    /// Endpoint name; resolved against topics first, then agent ids
    pub endpoint: String,
}

impl Connection {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

/// The resolved target of a [`Connection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Connectable<'a> {
    /// The connection references a topic declared in the module
    Topic(&'a TopicDefinition),
    /// The connection references another agent's output
    AgentOutput(&'a AgentConfiguration),
}

/// Declarative configuration of one deployable agent (a pipeline step).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfiguration {
    /// Unique agent id within the module
    pub id: String,

    /// Human-readable step name
    #[serde(default)]
    pub name: Option<String>,

    /// Agent type tag, resolved against the agent-type capability registry
    #[serde(rename = "type")]
    pub agent_type: String,

    /// Input connection (absent for pure sources)
    #[serde(default)]
    pub input: Option<Connection>,

    /// Output connection (absent for pure sinks)
    #[serde(default)]
    pub output: Option<Connection>,

    /// Free-form agent configuration, passed through to the deployed process
    #[serde(default)]
    pub configuration: HashMap<String, serde_yaml::Value>,
}

/// A named collection of topic definitions, agent configurations, and the
/// connections between them. Module identity is globally unique within an
/// [`Application`](crate::Application).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Module id, unique within the application
    pub id: String,

    /// Topics declared by this module
    #[serde(default)]
    pub topics: Vec<TopicDefinition>,

    /// Agents in pipeline order — descriptor order follows this
    #[serde(default)]
    pub agents: Vec<AgentConfiguration>,
}

impl Module {
    /// Create an empty module.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            topics: Vec::new(),
            agents: Vec::new(),
        }
    }

    /// Look up a topic definition by logical name.
    pub fn get_topic(&self, name: &str) -> Option<&TopicDefinition> {
        self.topics.iter().find(|t| t.name == name)
    }

    /// Look up an agent configuration by id.
    pub fn get_agent(&self, id: &str) -> Option<&AgentConfiguration> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Resolve a connection endpoint to the entity it references.
    ///
    /// Topics shadow agent ids: an endpoint naming both resolves to the
    /// topic. An endpoint naming neither is an `UnknownEndpoint` error.
    pub fn resolve_endpoint<'a>(&'a self, connection: &Connection) -> Result<Connectable<'a>> {
        if let Some(topic) = self.get_topic(&connection.endpoint) {
            return Ok(Connectable::Topic(topic));
        }
        if let Some(agent) = self.get_agent(&connection.endpoint) {
            return Ok(Connectable::AgentOutput(agent));
        }
        Err(ModelError::UnknownEndpoint {
            module: self.id.clone(),
            endpoint: connection.endpoint.clone(),
        })
    }

    /// Structural validation: non-empty ids, unique topic names, unique
    /// agent ids.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(ModelError::validation("module id cannot be empty"));
        }
        let mut seen_topics = Vec::with_capacity(self.topics.len());
        for topic in &self.topics {
            if topic.name.is_empty() {
                return Err(ModelError::validation(format!(
                    "module '{}' declares a topic with an empty name",
                    self.id
                )));
            }
            if seen_topics.contains(&topic.name.as_str()) {
                return Err(ModelError::validation(format!(
                    "module '{}' declares topic '{}' more than once",
                    self.id, topic.name
                )));
            }
            seen_topics.push(topic.name.as_str());
        }
        let mut seen_agents = Vec::with_capacity(self.agents.len());
        for agent in &self.agents {
            if agent.id.is_empty() {
                return Err(ModelError::validation(format!(
                    "module '{}' declares an agent with an empty id",
                    self.id
                )));
            }
            if agent.agent_type.is_empty() {
                return Err(ModelError::validation(format!(
                    "agent '{}' in module '{}' has an empty type",
                    agent.id, self.id
                )));
            }
            if seen_agents.contains(&agent.id.as_str()) {
                return Err(ModelError::validation(format!(
                    "module '{}' declares agent '{}' more than once",
                    self.id, agent.id
                )));
            }
            seen_agents.push(agent.id.as_str());
        }
        Ok(())
    }
}
