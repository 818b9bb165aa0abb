//! Code archive storage for pipeforge
//!
//! Deployed agents run packaged code archives. This crate defines the
//! keyed put/get/describe/delete contract the control plane requires from a
//! blob store, plus a local-filesystem backend for tests and single-node
//! deployments. Cloud backends implement the same [`CodeStorage`] trait in
//! their own crates.
//!
//! All operations are scoped by tenant; every failure surfaces as a single
//! [`StorageError`] wrapping the underlying cause.

pub mod error;
pub mod local;

pub use error::{Result, StorageError};
pub use local::LocalCodeStorage;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Metadata describing a stored code archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeArchiveMetadata {
    /// Tenant that owns the archive
    pub tenant: String,
    /// Storage-assigned archive id, unique per tenant
    pub archive_id: String,
    /// Application the archive was uploaded for, when known
    pub application_id: Option<String>,
}

/// Blob storage contract for packaged agent code.
#[async_trait]
pub trait CodeStorage: Send + Sync {
    /// Store an archive and return its metadata. The assigned archive id
    /// embeds tenant, application, and version for operator forensics.
    async fn store_application_code(
        &self,
        tenant: &str,
        application_id: &str,
        version: &str,
        data: Bytes,
    ) -> Result<CodeArchiveMetadata>;

    /// Fetch an archive's payload.
    async fn download_application_code(&self, tenant: &str, archive_id: &str) -> Result<Bytes>;

    /// Fetch an archive's metadata, failing with
    /// [`StorageError::NotFound`] if it does not exist.
    async fn describe_application_code(
        &self,
        tenant: &str,
        archive_id: &str,
    ) -> Result<CodeArchiveMetadata>;

    /// Delete one archive. Deleting a missing archive is not an error.
    async fn delete_application_code(&self, tenant: &str, archive_id: &str) -> Result<()>;

    /// Delete every archive belonging to an application.
    ///
    /// Deliberately unimplemented: no cascading-delete policy is defined,
    /// and guessing one here could destroy archives still referenced by
    /// running agents.
    async fn delete_application(&self, _tenant: &str, _application_id: &str) -> Result<()> {
        Err(StorageError::Unimplemented("delete_application"))
    }
}

/// Build the storage-assigned archive id for an upload.
pub(crate) fn new_archive_id(tenant: &str, application_id: &str, version: &str) -> String {
    format!(
        "{}_{}_{}_{}",
        tenant,
        application_id,
        version,
        uuid::Uuid::new_v4()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_id_embeds_coordinates() {
        let id = new_archive_id("acme", "app", "v7");
        assert!(id.starts_with("acme_app_v7_"));
    }

    #[test]
    fn test_archive_ids_are_unique() {
        let a = new_archive_id("acme", "app", "v1");
        let b = new_archive_id("acme", "app", "v1");
        assert_ne!(a, b);
    }
}
