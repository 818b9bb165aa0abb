//! Topic definitions

use serde::{Deserialize, Serialize};

/// How a topic is expected to come into existence on the target cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopicCreationMode {
    /// Provision the topic during deployment if it is missing
    CreateIfNotExists,
    /// The topic is managed elsewhere and must already exist
    AssumeExists,
    /// No provisioning and no existence requirement (default)
    #[default]
    None,
}

/// A logical topic declared by a module.
///
/// The name is the identity within a module; technology-specific qualifiers
/// (tenant, namespace) are added only when a cluster runtime produces the
/// physical handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDefinition {
    /// Logical topic name, unique within the module
    pub name: String,

    /// Creation policy applied by `deploy_topics`
    #[serde(default, rename = "creation-mode")]
    pub creation_mode: TopicCreationMode,

    /// Partition count hint (technology-specific meaning)
    #[serde(default)]
    pub partitions: Option<u32>,

    /// Replication factor hint (technology-specific meaning)
    #[serde(default, rename = "replication-factor")]
    pub replication_factor: Option<u16>,
}

impl TopicDefinition {
    /// Create a topic definition with the default creation mode.
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creation_mode: TopicCreationMode::default(),
            partitions: None,
            replication_factor: None,
        }
    }

    /// Create a topic definition that is provisioned on deployment.
    pub fn create_if_not_exists(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creation_mode: TopicCreationMode::CreateIfNotExists,
            partitions: None,
            replication_factor: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_mode_default() {
        let topic: TopicDefinition = serde_yaml::from_str("name: events").unwrap();
        assert_eq!(topic.creation_mode, TopicCreationMode::None);
        assert_eq!(topic.partitions, None);
    }

    #[test]
    fn test_creation_mode_kebab_case() {
        let topic: TopicDefinition = serde_yaml::from_str(
            "name: events\ncreation-mode: create-if-not-exists\npartitions: 4",
        )
        .unwrap();
        assert_eq!(topic.creation_mode, TopicCreationMode::CreateIfNotExists);
        assert_eq!(topic.partitions, Some(4));
    }

    #[test]
    fn test_from_name() {
        let topic = TopicDefinition::from_name("events");
        assert_eq!(topic.name, "events");
        assert_eq!(topic.creation_mode, TopicCreationMode::None);
    }
}
