//! Asset provisioning contract
//!
//! Pipelines may depend on data-store assets (tables, keyspaces, indexes)
//! that must exist before agents start. The contract is two methods —
//! exists and deploy — implemented per asset type by adapters around the
//! vendor SDK. Deployment is idempotent: an "already exists" answer from
//! the underlying system is success, never a failure.

use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Declarative description of one external asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDefinition {
    /// Asset id within the application
    pub id: String,

    /// Asset type tag, e.g. "cassandra-table"
    #[serde(rename = "type")]
    pub asset_type: String,

    /// Type-specific configuration (connection details, DDL statements)
    #[serde(default)]
    pub config: HashMap<String, serde_yaml::Value>,
}

/// Idempotent exists/deploy contract for one asset type.
#[async_trait]
pub trait AssetManager: Send + Sync {
    /// Whether the asset already exists on the target system
    async fn asset_exists(&self, asset: &AssetDefinition) -> Result<bool>;

    /// Create the asset. Must tolerate "already exists" from the
    /// underlying system without failing the overall deployment.
    async fn deploy_asset(&self, asset: &AssetDefinition) -> Result<()>;
}

/// Supplies [`AssetManager`]s for the asset types it supports.
pub trait AssetManagerProvider: Send + Sync {
    fn supports(&self, asset_type: &str) -> bool;

    fn create(&self, asset_type: &str) -> Result<Box<dyn AssetManager>>;
}

/// Registry of asset manager providers, checked in registration order.
#[derive(Default)]
pub struct AssetManagerRegistry {
    providers: Vec<Arc<dyn AssetManagerProvider>>,
}

impl AssetManagerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn AssetManagerProvider>) {
        self.providers.push(provider);
    }

    /// Create a manager for the asset type, or fail if no provider
    /// supports it.
    pub fn create_for(&self, asset_type: &str) -> Result<Box<dyn AssetManager>> {
        self.providers
            .iter()
            .find(|p| p.supports(asset_type))
            .ok_or_else(|| {
                RuntimeError::NotFound(format!("no asset manager for type '{asset_type}'"))
            })?
            .create(asset_type)
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Deploy an asset unless it already exists. Returns whether a deployment
/// was performed.
pub async fn deploy_asset_if_missing(
    manager: &dyn AssetManager,
    asset: &AssetDefinition,
) -> Result<bool> {
    if manager.asset_exists(asset).await? {
        info!(asset = %asset.id, "Asset already exists, skipping deployment");
        return Ok(false);
    }
    info!(asset = %asset.id, asset_type = %asset.asset_type, "Deploying asset");
    manager.deploy_asset(asset).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Asset manager that remembers deployments and can simulate the
    /// "already exists" answer from the backing system.
    struct RecordingAssetManager {
        exists: AtomicBool,
        deployments: AtomicUsize,
    }

    impl RecordingAssetManager {
        fn new(exists: bool) -> Self {
            Self {
                exists: AtomicBool::new(exists),
                deployments: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AssetManager for RecordingAssetManager {
        async fn asset_exists(&self, _asset: &AssetDefinition) -> Result<bool> {
            Ok(self.exists.load(Ordering::SeqCst))
        }

        async fn deploy_asset(&self, _asset: &AssetDefinition) -> Result<()> {
            // Concurrent creation by another agent shows up as
            // already-exists here; still success.
            self.deployments.fetch_add(1, Ordering::SeqCst);
            self.exists.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn table_asset() -> AssetDefinition {
        AssetDefinition {
            id: "events-table".to_string(),
            asset_type: "cassandra-table".to_string(),
            config: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_deploy_skipped_when_asset_exists() {
        let manager = RecordingAssetManager::new(true);
        let deployed = deploy_asset_if_missing(&manager, &table_asset())
            .await
            .unwrap();
        assert!(!deployed);
        assert_eq!(manager.deployments.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_deploy_runs_once_then_becomes_noop() {
        let manager = RecordingAssetManager::new(false);
        assert!(deploy_asset_if_missing(&manager, &table_asset())
            .await
            .unwrap());
        assert!(!deploy_asset_if_missing(&manager, &table_asset())
            .await
            .unwrap());
        assert_eq!(manager.deployments.load(Ordering::SeqCst), 1);
    }

    struct TableProvider;

    impl AssetManagerProvider for TableProvider {
        fn supports(&self, asset_type: &str) -> bool {
            asset_type == "cassandra-table"
        }

        fn create(&self, _asset_type: &str) -> Result<Box<dyn AssetManager>> {
            Ok(Box::new(RecordingAssetManager::new(false)))
        }
    }

    #[test]
    fn test_registry_dispatches_by_asset_type() {
        let mut registry = AssetManagerRegistry::new();
        registry.register(Arc::new(TableProvider));
        assert!(registry.create_for("cassandra-table").is_ok());
        assert!(matches!(
            registry.create_for("s3-bucket"),
            Err(RuntimeError::NotFound(_))
        ));
    }
}
