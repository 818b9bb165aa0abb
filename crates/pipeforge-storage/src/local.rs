//! Local filesystem code storage
//!
//! Archives live under `{root}/{tenant}/{archive_id}` with a JSON metadata
//! sidecar at `{root}/{tenant}/{archive_id}.meta.json`. Suitable for tests
//! and single-node deployments; cloud object stores implement the same
//! trait elsewhere.

use crate::error::{Result, StorageError};
use crate::{new_archive_id, CodeArchiveMetadata, CodeStorage};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Filesystem-backed [`CodeStorage`].
pub struct LocalCodeStorage {
    root: PathBuf,
}

impl LocalCodeStorage {
    /// Create a store rooted at the given directory. The directory is
    /// created on first write, not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn archive_path(&self, tenant: &str, archive_id: &str) -> PathBuf {
        self.root.join(tenant).join(archive_id)
    }

    fn metadata_path(&self, tenant: &str, archive_id: &str) -> PathBuf {
        self.root
            .join(tenant)
            .join(format!("{archive_id}.meta.json"))
    }

    /// Archive ids become path segments; reject anything that could
    /// escape the tenant directory.
    fn check_key(value: &str, what: &str) -> Result<()> {
        if value.is_empty()
            || value.contains(['/', '\\'])
            || value == "."
            || value == ".."
        {
            return Err(StorageError::backend(format!("invalid {what}: '{value}'")));
        }
        Ok(())
    }

    async fn read_metadata(&self, path: &Path) -> Result<CodeArchiveMetadata> {
        let raw = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

#[async_trait]
impl CodeStorage for LocalCodeStorage {
    async fn store_application_code(
        &self,
        tenant: &str,
        application_id: &str,
        version: &str,
        data: Bytes,
    ) -> Result<CodeArchiveMetadata> {
        Self::check_key(tenant, "tenant")?;
        Self::check_key(application_id, "application id")?;
        Self::check_key(version, "version")?;
        let archive_id = new_archive_id(tenant, application_id, version);
        info!(
            tenant,
            application_id, version, archive_id, "Storing code archive"
        );

        tokio::fs::create_dir_all(self.root.join(tenant)).await?;
        tokio::fs::write(self.archive_path(tenant, &archive_id), &data).await?;

        let metadata = CodeArchiveMetadata {
            tenant: tenant.to_string(),
            archive_id: archive_id.clone(),
            application_id: Some(application_id.to_string()),
        };
        let raw = serde_json::to_vec_pretty(&metadata)?;
        tokio::fs::write(self.metadata_path(tenant, &archive_id), raw).await?;
        Ok(metadata)
    }

    async fn download_application_code(&self, tenant: &str, archive_id: &str) -> Result<Bytes> {
        Self::check_key(tenant, "tenant")?;
        Self::check_key(archive_id, "archive id")?;
        let path = self.archive_path(tenant, archive_id);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound {
                tenant: tenant.to_string(),
                archive_id: archive_id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn describe_application_code(
        &self,
        tenant: &str,
        archive_id: &str,
    ) -> Result<CodeArchiveMetadata> {
        Self::check_key(tenant, "tenant")?;
        Self::check_key(archive_id, "archive id")?;
        let path = self.metadata_path(tenant, archive_id);
        match self.read_metadata(&path).await {
            Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound {
                    tenant: tenant.to_string(),
                    archive_id: archive_id.to_string(),
                })
            }
            other => other,
        }
    }

    async fn delete_application_code(&self, tenant: &str, archive_id: &str) -> Result<()> {
        Self::check_key(tenant, "tenant")?;
        Self::check_key(archive_id, "archive id")?;
        debug!(tenant, archive_id, "Deleting code archive");
        for path in [
            self.archive_path(tenant, archive_id),
            self.metadata_path(tenant, archive_id),
        ] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
