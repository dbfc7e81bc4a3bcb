//! # ssmkit
//!
//! Async Rust client for AWS Systems Manager (SSM) documents.
//!
//! This crate provides:
//! - Typed document formats, types and descriptions
//! - Categorized errors (not found, duplicate content, ...) instead of raw
//!   SDK error codes
//! - A [`Backend`] trait with an AWS SDK implementation and an in-memory
//!   implementation that records every call
//! - A [`ClientFactory`] seam for building region-scoped clients
//!
//! ## Example
//!
//! ```no_run
//! use ssmkit::{AwsClientFactory, AwsCredentials, ClientFactory};
//!
//! # async fn run() -> ssmkit::Result<()> {
//! let factory = AwsClientFactory::new(AwsCredentials::Profile("default".into()));
//! let client = factory.client("eu-west-1").await?;
//!
//! match client.get_document("my-runbook", None, None).await {
//!     Ok(doc) => println!("version {:?}", doc.version),
//!     Err(e) if e.is_not_found() => println!("not deployed yet"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use backend::aws::{AwsBackend, AwsClientFactory, AwsCredentials};
pub use backend::memory::{Call, MemoryBackend};
pub use backend::{Backend, ClientFactory};
pub use error::{Error, ErrorCategory, Result};
pub use types::{
    CreateDocument, Document, DocumentDescription, DocumentFormat, DocumentType, LATEST_VERSION,
};

use std::sync::Arc;

/// High-level client for SSM document operations.
///
/// The client wraps a backend and is scoped to one region. Cloning is cheap.
#[derive(Clone)]
pub struct Client {
    backend: Arc<dyn Backend>,
    region: String,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with a custom backend.
    pub fn with_backend(backend: impl Backend + 'static, region: &str) -> Self {
        Self {
            backend: Arc::new(backend),
            region: region.to_string(),
        }
    }

    /// Region this client talks to.
    pub fn region(&self) -> &str {
        &self.region
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Read a document (default version unless `version` is given).
    pub async fn get_document(
        &self,
        name: &str,
        version: Option<&str>,
        format: Option<DocumentFormat>,
    ) -> Result<Document> {
        log::debug!("GetDocument {name} (version: {})", version.unwrap_or("default"));
        self.backend.get_document(name, version, format).await
    }

    /// Read document metadata for `version`, or the default version when `None`.
    pub async fn describe_document(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<DocumentDescription> {
        log::debug!("DescribeDocument {name} ({})", version.unwrap_or("$DEFAULT"));
        self.backend.describe_document(name, version).await
    }

    /// Create a document.
    pub async fn create_document(&self, request: &CreateDocument) -> Result<DocumentDescription> {
        log::debug!(
            "CreateDocument {} ({}, {})",
            request.name,
            request.document_type,
            request.format
        );
        self.backend.create_document(request).await
    }

    /// Replace document content. Fails with [`Error::DuplicateContent`] when
    /// the content equals the latest version.
    pub async fn update_document(
        &self,
        name: &str,
        content: &str,
        format: DocumentFormat,
    ) -> Result<DocumentDescription> {
        log::debug!("UpdateDocument {name} ({format})");
        self.backend.update_document(name, content, format).await
    }

    /// Make `version` the default version.
    pub async fn update_default_version(&self, name: &str, version: &str) -> Result<()> {
        log::debug!("UpdateDocumentDefaultVersion {name} -> {version}");
        self.backend.update_default_version(name, version).await
    }

    /// Delete a document. Returns `false` if it did not exist.
    pub async fn delete_document(&self, name: &str) -> Result<bool> {
        log::debug!("DeleteDocument {name}");
        match self.backend.delete_document(name).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Share permissions
    // =========================================================================

    /// Account ids the document is shared with.
    pub async fn share_permissions(&self, name: &str) -> Result<Vec<String>> {
        log::debug!("DescribeDocumentPermission {name}");
        self.backend.share_permissions(name).await
    }

    /// Add and remove share permissions in one call.
    pub async fn modify_share_permissions(
        &self,
        name: &str,
        to_add: &[String],
        to_remove: &[String],
    ) -> Result<()> {
        log::debug!(
            "ModifyDocumentPermission {name} (+{} -{})",
            to_add.len(),
            to_remove.len()
        );
        self.backend
            .modify_share_permissions(name, to_add, to_remove)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let backend = MemoryBackend::new();
        let client = Client::with_backend(backend.clone(), "us-east-1");

        assert!(!client.delete_document("missing").await.unwrap());
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_existing() {
        let backend = MemoryBackend::new();
        backend.insert("doc", DocumentType::Command, DocumentFormat::Json, "{}");
        let client = backend.client("eu-west-1").await.unwrap();

        assert_eq!(client.region(), "eu-west-1");
        assert!(client.delete_document("doc").await.unwrap());
        assert!(!backend.contains("doc"));
    }

    #[tokio::test]
    async fn test_delete_propagates_transport_errors() {
        let backend = MemoryBackend::new();
        backend.fail_operation("DeleteDocument");
        let client = Client::with_backend(backend, "us-east-1");

        let err = client.delete_document("doc").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Transport);
    }
}
