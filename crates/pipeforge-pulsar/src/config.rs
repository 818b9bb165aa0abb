//! Pulsar cluster configuration

use pipeforge_model::StreamingCluster;
use pipeforge_runtime::{Result, RuntimeError};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Wrapper for sensitive configuration values.
///
/// Prevents accidental logging of secrets while allowing access when
/// needed.
#[derive(Debug, Clone)]
pub struct SensitiveString(SecretString);

impl SensitiveString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Expose the secret value
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for SensitiveString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Serialize for SensitiveString {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str("***REDACTED***")
    }
}

impl<'de> Deserialize<'de> for SensitiveString {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

/// Configuration carried in the application's `streamingCluster` section
/// when the cluster type is `pulsar`.
#[derive(Debug, Clone, Deserialize)]
pub struct PulsarClusterConfig {
    /// Admin REST endpoint
    #[serde(rename = "webServiceUrl", default = "default_web_service_url")]
    pub web_service_url: String,

    /// Tenant override; falls back to the planner default
    #[serde(default)]
    pub tenant: Option<String>,

    /// Namespace override; falls back to the planner default
    #[serde(default)]
    pub namespace: Option<String>,

    /// Bearer token for the admin endpoint
    #[serde(rename = "authToken", default)]
    pub auth_token: Option<SensitiveString>,
}

fn default_web_service_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for PulsarClusterConfig {
    fn default() -> Self {
        Self {
            web_service_url: default_web_service_url(),
            tenant: None,
            namespace: None,
            auth_token: None,
        }
    }
}

impl PulsarClusterConfig {
    /// Extract the Pulsar configuration from an application's streaming
    /// cluster section.
    pub fn from_streaming_cluster(cluster: &StreamingCluster) -> Result<Self> {
        serde_yaml::from_value(serde_yaml::Value::Mapping(cluster.configuration.clone())).map_err(
            |e| {
                RuntimeError::deployment(format!(
                    "invalid pulsar cluster configuration: {e}"
                ))
            },
        )
    }
}
