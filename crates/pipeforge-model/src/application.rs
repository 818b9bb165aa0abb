//! Application assembly and instance-level configuration

use crate::error::{ModelError, Result};
use crate::module::{AgentConfiguration, Module};
use crate::topic::TopicDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Streaming cluster selection: the cluster-type tag drives runtime plugin
/// selection, the configuration map is passed through to the plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamingCluster {
    /// Cluster type tag, e.g. "pulsar" or "kafka"
    #[serde(rename = "type")]
    pub cluster_type: String,

    /// Technology-specific configuration, interpreted by the plugin
    #[serde(default)]
    pub configuration: serde_yaml::Mapping,
}

/// Compute/orchestration cluster selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputeCluster {
    /// Cluster type tag, e.g. "kubernetes" or "none"
    #[serde(rename = "type")]
    pub cluster_type: String,
}

/// Instance-level configuration shared by all modules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename = "streamingCluster")]
    pub streaming_cluster: StreamingCluster,

    #[serde(default, rename = "computeCluster")]
    pub compute_cluster: ComputeCluster,
}

/// The full declarative unit: modules plus instance configuration.
///
/// Immutable after assembly — any change requires building a new
/// `Application`. Modules are kept ordered by id so plan building is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    modules: BTreeMap<String, Module>,
    instance: Instance,
}

/// Wire shape of the instance document (`instance.yaml`).
#[derive(Debug, Deserialize)]
struct InstanceDocument {
    instance: Instance,
}

/// Wire shape of a module document (`module.yaml` / `pipeline.yaml`).
///
/// Several documents may target the same module; their topics and pipeline
/// steps are merged in document order.
#[derive(Debug, Deserialize)]
struct ModuleDocument {
    /// Module id this document contributes to
    module: String,

    /// Pipeline id within the module (informational)
    #[serde(default)]
    #[allow(dead_code)]
    id: Option<String>,

    #[serde(default)]
    topics: Vec<TopicDefinition>,

    #[serde(default)]
    pipeline: Vec<AgentConfiguration>,
}

impl Application {
    /// Assemble an application from already-built modules.
    pub fn new(instance: Instance, modules: impl IntoIterator<Item = Module>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for module in modules {
            if map.insert(module.id.clone(), module).is_some() {
                return Err(ModelError::validation(
                    "duplicate module id in application",
                ));
            }
        }
        let app = Self {
            modules: map,
            instance,
        };
        app.validate()?;
        Ok(app)
    }

    /// Assemble an application from an instance document and one or more
    /// module documents. Documents targeting the same module id are merged
    /// in order.
    pub fn from_yaml(instance: &str, modules: &[&str]) -> Result<Self> {
        let instance: InstanceDocument = serde_yaml::from_str(instance)?;
        let mut merged: BTreeMap<String, Module> = BTreeMap::new();
        for doc in modules {
            let doc: ModuleDocument = serde_yaml::from_str(doc)?;
            let module = merged
                .entry(doc.module.clone())
                .or_insert_with(|| Module::new(doc.module.clone()));
            module.topics.extend(doc.topics);
            module.agents.extend(doc.pipeline);
        }
        let app = Self {
            modules: merged,
            instance: instance.instance,
        };
        app.validate()?;
        Ok(app)
    }

    /// Instance-level configuration.
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Modules in deterministic (id) order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Look up a module by id.
    pub fn get_module(&self, id: &str) -> Result<&Module> {
        self.modules
            .get(id)
            .ok_or_else(|| ModelError::ModuleNotFound(id.to_string()))
    }

    /// Total number of declared topics across all modules.
    pub fn topic_count(&self) -> usize {
        self.modules.values().map(|m| m.topics.len()).sum()
    }

    /// Structural validation of every module plus the instance section.
    pub fn validate(&self) -> Result<()> {
        if self.instance.streaming_cluster.cluster_type.is_empty() {
            return Err(ModelError::validation(
                "instance is missing the streaming cluster type",
            ));
        }
        for module in self.modules.values() {
            module.validate()?;
        }
        Ok(())
    }
}
