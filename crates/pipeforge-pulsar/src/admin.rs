//! Pulsar admin client
//!
//! The cluster runtime talks to the target cluster through the
//! [`PulsarAdmin`] trait so plan building stays testable without a broker.
//! [`HttpPulsarAdmin`] is the real implementation over the admin REST API.

use crate::config::{PulsarClusterConfig, SensitiveString};
use crate::name::PulsarName;
use async_trait::async_trait;
use pipeforge_runtime::{Result, RuntimeError};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimal admin surface the cluster runtime needs: existence checks and
/// idempotent topic creation.
#[async_trait]
pub trait PulsarAdmin: Send + Sync {
    /// Whether the topic exists in its namespace
    async fn topic_exists(&self, topic: &PulsarName) -> Result<bool>;

    /// Create the topic. An already-existing topic is success, not an
    /// error — concurrent deployments race to create.
    async fn create_topic(&self, topic: &PulsarName, partitions: Option<u32>) -> Result<()>;
}

/// Admin REST client (`/admin/v2`).
#[derive(Debug)]
pub struct HttpPulsarAdmin {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<SensitiveString>,
}

impl HttpPulsarAdmin {
    /// Build a client against the configured web service URL.
    ///
    /// The URL scheme is validated up front; everything else is left to
    /// the cluster to reject.
    pub fn new(config: &PulsarClusterConfig) -> Result<Self> {
        let parsed = url::Url::parse(&config.web_service_url).map_err(|e| {
            RuntimeError::deployment(format!(
                "invalid pulsar web service URL '{}': {e}",
                config.web_service_url
            ))
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(RuntimeError::deployment(format!(
                    "pulsar web service URL must use http or https, got '{scheme}'"
                )));
            }
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RuntimeError::deployment(format!("failed to create admin client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.web_service_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn topic_url(&self, topic: &PulsarName) -> String {
        format!(
            "{}/admin/v2/persistent/{}/{}/{}",
            self.base_url, topic.tenant, topic.namespace, topic.name
        )
    }

    fn namespace_url(&self, topic: &PulsarName) -> String {
        format!(
            "{}/admin/v2/persistent/{}/{}",
            self.base_url, topic.tenant, topic.namespace
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }
}

#[async_trait]
impl PulsarAdmin for HttpPulsarAdmin {
    async fn topic_exists(&self, topic: &PulsarName) -> Result<bool> {
        let url = self.namespace_url(topic);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| RuntimeError::deployment(format!("pulsar admin unreachable: {e}")))?;

        match response.status() {
            StatusCode::OK => {
                let topics: Vec<String> = response.json().await.map_err(|e| {
                    RuntimeError::deployment(format!("invalid topic list from pulsar admin: {e}"))
                })?;
                let qualified = topic.fully_qualified();
                // Partitioned topics are listed per partition.
                let partition_prefix = format!("{qualified}-partition-");
                Ok(topics
                    .iter()
                    .any(|t| *t == qualified || t.starts_with(&partition_prefix)))
            }
            StatusCode::NOT_FOUND => Err(RuntimeError::deployment(format!(
                "namespace {}/{} does not exist",
                topic.tenant, topic.namespace
            ))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RuntimeError::deployment(
                "pulsar admin rejected credentials".to_string(),
            )),
            status => Err(RuntimeError::deployment(format!(
                "pulsar admin returned {status} listing {url}"
            ))),
        }
    }

    async fn create_topic(&self, topic: &PulsarName, partitions: Option<u32>) -> Result<()> {
        let (url, request) = match partitions {
            Some(n) if n > 0 => {
                let url = format!("{}/partitions", self.topic_url(topic));
                let request = self.client.put(&url).json(&n);
                (url, request)
            }
            _ => {
                let url = self.topic_url(topic);
                let request = self.client.put(&url);
                (url, request)
            }
        };
        debug!(topic = %topic, "Creating pulsar topic");

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| RuntimeError::deployment(format!("pulsar admin unreachable: {e}")))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => {
                info!(topic = %topic, "Topic already exists, maybe created by a concurrent deployment");
                Ok(())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RuntimeError::deployment(
                "pulsar admin rejected credentials".to_string(),
            )),
            status => Err(RuntimeError::deployment(format!(
                "pulsar admin returned {status} creating {url}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_url() {
        let config = PulsarClusterConfig {
            web_service_url: "pulsar://localhost:6650".to_string(),
            ..Default::default()
        };
        let err = HttpPulsarAdmin::new(&config).unwrap_err();
        assert!(matches!(err, RuntimeError::Deployment(_)));
    }

    #[test]
    fn test_rejects_unparsable_url() {
        let config = PulsarClusterConfig {
            web_service_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(HttpPulsarAdmin::new(&config).is_err());
    }

    #[test]
    fn test_admin_urls() {
        let admin = HttpPulsarAdmin::new(&PulsarClusterConfig {
            web_service_url: "http://pulsar:8080/".to_string(),
            ..Default::default()
        })
        .unwrap();
        let name = PulsarName::new("public", "default", "events");
        assert_eq!(
            admin.topic_url(&name),
            "http://pulsar:8080/admin/v2/persistent/public/default/events"
        );
        assert_eq!(
            admin.namespace_url(&name),
            "http://pulsar:8080/admin/v2/persistent/public/default"
        );
    }
}
