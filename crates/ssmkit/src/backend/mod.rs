//! Backend abstraction for SSM document operations.
//!
//! The [`Backend`] trait defines the raw API surface used by [`Client`],
//! allowing for different implementations (AWS SDK, in-memory for tests).
//! Backends report every failure as-is; recovering from categorized errors
//! is left to callers.

pub mod aws;
pub mod memory;

use crate::Client;
use crate::error::Result;
use crate::types::{CreateDocument, Document, DocumentDescription, DocumentFormat};
use async_trait::async_trait;

/// Backend trait for SSM document operations.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read a document. `version` defaults to the default version.
    async fn get_document(
        &self,
        name: &str,
        version: Option<&str>,
        format: Option<DocumentFormat>,
    ) -> Result<Document>;

    /// Read document metadata (versions, status, hash). `None` describes the
    /// default version.
    async fn describe_document(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<DocumentDescription>;

    /// Create a new document.
    async fn create_document(&self, request: &CreateDocument) -> Result<DocumentDescription>;

    /// Replace the content of a document, producing a new `$LATEST` version.
    async fn update_document(
        &self,
        name: &str,
        content: &str,
        format: DocumentFormat,
    ) -> Result<DocumentDescription>;

    /// Make `version` the default version of a document.
    async fn update_default_version(&self, name: &str, version: &str) -> Result<()>;

    /// Delete a document and all its versions.
    async fn delete_document(&self, name: &str) -> Result<()>;

    /// List account ids the document is shared with.
    async fn share_permissions(&self, name: &str) -> Result<Vec<String>>;

    /// Add and remove share permissions in a single call.
    async fn modify_share_permissions(
        &self,
        name: &str,
        to_add: &[String],
        to_remove: &[String],
    ) -> Result<()>;
}

/// Builds a [`Client`] for a region.
///
/// This is the credential/region seam: implementations hold whatever
/// credentials they need and hand out region-scoped clients.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Create a client for `region`.
    async fn client(&self, region: &str) -> Result<Client>;
}
