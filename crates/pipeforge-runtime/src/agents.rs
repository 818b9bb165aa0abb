//! Agent-type capability registry
//!
//! Static capability data: which agent types exist, which component role
//! they play, and which cluster types can host them. Built once at startup
//! and passed explicitly to the plan builder — never ambient global state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The role a deployed agent plays in a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    /// Produces records onto topics
    Source,
    /// Consumes, transforms, and re-emits records
    Processor,
    /// Consumes records into an external system
    Sink,
}

/// One provider's capability record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTypeProvider {
    pub component_type: ComponentType,
    pub agent_types: BTreeSet<String>,
    pub cluster_types: BTreeSet<String>,
}

impl AgentTypeProvider {
    pub fn new<'a>(
        component_type: ComponentType,
        agent_types: impl IntoIterator<Item = &'a str>,
        cluster_types: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            component_type,
            agent_types: agent_types.into_iter().map(str::to_string).collect(),
            cluster_types: cluster_types.into_iter().map(str::to_string).collect(),
        }
    }

    /// Whether this provider can supply the agent type on the cluster type.
    pub fn supports(&self, agent_type: &str, cluster_type: &str) -> bool {
        self.agent_types.contains(agent_type) && self.cluster_types.contains(cluster_type)
    }
}

/// Immutable set of agent-type providers.
#[derive(Debug, Clone, Default)]
pub struct AgentTypeRegistry {
    providers: Vec<AgentTypeProvider>,
}

impl AgentTypeRegistry {
    pub fn new(providers: Vec<AgentTypeProvider>) -> Self {
        Self { providers }
    }

    /// The built-in capability set: text-processing and record-shaping
    /// processors, available on the reference cluster runtime and in
    /// standalone ("none") mode.
    pub fn builtin(cluster_type: &str) -> Self {
        Self::new(vec![
            AgentTypeProvider::new(
                ComponentType::Processor,
                [
                    "text-extractor",
                    "language-detector",
                    "text-splitter",
                    "text-normaliser",
                ],
                [cluster_type, "none"],
            ),
            AgentTypeProvider::new(
                ComponentType::Processor,
                ["drop-fields", "merge-key-value"],
                [cluster_type, "none"],
            ),
        ])
    }

    /// First provider supporting the (agent type, cluster type) pair.
    pub fn lookup(&self, agent_type: &str, cluster_type: &str) -> Option<&AgentTypeProvider> {
        self.providers
            .iter()
            .find(|p| p.supports(agent_type, cluster_type))
    }

    /// Sorted list of every known agent type, for error messages.
    pub fn known_agent_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .providers
            .iter()
            .flat_map(|p| p.agent_types.iter().cloned())
            .collect();
        types.sort();
        types.dedup();
        types
    }
}
