//! In-memory backend.
//!
//! Behaves like the service for the operations this crate uses (versioning,
//! duplicate-content detection, share permissions) and records every call,
//! so callers can assert exactly which API operations a workflow issued.

use super::{Backend, ClientFactory};
use crate::Client;
use crate::error::{Error, Result};
use crate::types::{
    CreateDocument, Document, DocumentDescription, DocumentFormat, DocumentType, LATEST_VERSION,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetDocument { name: String },
    DescribeDocument { name: String },
    CreateDocument { name: String },
    UpdateDocument { name: String },
    UpdateDefaultVersion { name: String, version: String },
    DeleteDocument { name: String },
    SharePermissions { name: String },
    ModifySharePermissions {
        name: String,
        to_add: Vec<String>,
        to_remove: Vec<String>,
    },
}

impl Call {
    /// Whether the call changes remote state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateDocument { .. }
                | Self::UpdateDocument { .. }
                | Self::UpdateDefaultVersion { .. }
                | Self::DeleteDocument { .. }
                | Self::ModifySharePermissions { .. }
        )
    }

    /// API operation name.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::GetDocument { .. } => "GetDocument",
            Self::DescribeDocument { .. } => "DescribeDocument",
            Self::CreateDocument { .. } => "CreateDocument",
            Self::UpdateDocument { .. } => "UpdateDocument",
            Self::UpdateDefaultVersion { .. } => "UpdateDocumentDefaultVersion",
            Self::DeleteDocument { .. } => "DeleteDocument",
            Self::SharePermissions { .. } => "DescribeDocumentPermission",
            Self::ModifySharePermissions { .. } => "ModifyDocumentPermission",
        }
    }
}

#[derive(Debug, Clone)]
struct StoredDocument {
    document_type: DocumentType,
    format: DocumentFormat,
    /// Content per version; version `n` is `versions[n - 1]`
    versions: Vec<(DocumentFormat, String)>,
    default_version: usize,
    permissions: Vec<String>,
    created_date: DateTime<Utc>,
}

impl StoredDocument {
    fn latest(&self) -> usize {
        self.versions.len()
    }

    fn resolve_version(&self, name: &str, version: Option<&str>) -> Result<usize> {
        match version {
            None | Some("$DEFAULT") => Ok(self.default_version),
            Some(LATEST_VERSION) => Ok(self.latest()),
            Some(v) => v
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=self.latest()).contains(n))
                .ok_or_else(|| Error::NotFound {
                    name: format!("{name}:{v}"),
                }),
        }
    }

    fn describe(&self, name: &str, version: usize) -> DocumentDescription {
        let (format, content) = &self.versions[version - 1];
        DocumentDescription {
            name: name.to_string(),
            format: Some(*format),
            document_type: Some(self.document_type),
            document_version: Some(version.to_string()),
            latest_version: Some(self.latest().to_string()),
            default_version: Some(self.default_version.to_string()),
            version_name: None,
            status: Some("Active".to_string()),
            hash: Some(blake3::hash(content.as_bytes()).to_hex().to_string()),
            hash_type: Some("Blake3".to_string()),
            created_date: Some(self.created_date),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    documents: BTreeMap<String, StoredDocument>,
    calls: Vec<Call>,
    failing: Vec<&'static str>,
}

/// In-memory SSM backend. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only happens after a panic in another test thread.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record `call` and fail it if its operation was marked as failing.
    fn record(state: &mut MemoryState, call: Call) -> Result<()> {
        let operation = call.operation();
        state.calls.push(call);
        if state.failing.contains(&operation) {
            return Err(Error::Transport {
                operation,
                code: Some("InternalServerError".to_string()),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    /// Make every call to `operation` fail with a transport error.
    pub fn fail_operation(&self, operation: &'static str) {
        self.state().failing.push(operation);
    }

    /// Seed a document without recording a call.
    pub fn insert(&self, name: &str, document_type: DocumentType, format: DocumentFormat, content: &str) {
        self.state().documents.insert(
            name.to_string(),
            StoredDocument {
                document_type,
                format,
                versions: vec![(format, content.to_string())],
                default_version: 1,
                permissions: Vec::new(),
                created_date: Utc::now(),
            },
        );
    }

    /// Every call issued so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Calls that changed remote state.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    /// Recorded `ModifyDocumentPermission` calls as `(to_add, to_remove)`.
    pub fn permission_changes(&self) -> Vec<(Vec<String>, Vec<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ModifySharePermissions {
                    to_add, to_remove, ..
                } => Some((to_add, to_remove)),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Whether a document exists.
    pub fn contains(&self, name: &str) -> bool {
        self.state().documents.contains_key(name)
    }

    /// Content of the latest version.
    pub fn latest_content(&self, name: &str) -> Option<String> {
        self.state()
            .documents
            .get(name)
            .and_then(|d| d.versions.last().map(|(_, content)| content.clone()))
    }

    /// Current share permissions.
    pub fn permissions(&self, name: &str) -> Vec<String> {
        self.state()
            .documents
            .get(name)
            .map(|d| d.permissions.clone())
            .unwrap_or_default()
    }
}

fn not_found(name: &str) -> Error {
    Error::NotFound {
        name: name.to_string(),
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get_document(
        &self,
        name: &str,
        version: Option<&str>,
        _format: Option<DocumentFormat>,
    ) -> Result<Document> {
        let mut state = self.state();
        Self::record(&mut state, Call::GetDocument { name: name.to_string() })?;

        let doc = state.documents.get(name).ok_or_else(|| not_found(name))?;
        let version = doc.resolve_version(name, version)?;
        let (format, content) = &doc.versions[version - 1];

        Ok(Document {
            name: name.to_string(),
            format: Some(*format),
            document_type: Some(doc.document_type),
            version: Some(version.to_string()),
            version_name: None,
            status: Some("Active".to_string()),
            content: Some(content.clone()),
        })
    }

    async fn describe_document(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<DocumentDescription> {
        let mut state = self.state();
        Self::record(&mut state, Call::DescribeDocument { name: name.to_string() })?;

        let doc = state.documents.get(name).ok_or_else(|| not_found(name))?;
        let version = doc.resolve_version(name, version)?;
        Ok(doc.describe(name, version))
    }

    async fn create_document(&self, request: &CreateDocument) -> Result<DocumentDescription> {
        let mut state = self.state();
        Self::record(
            &mut state,
            Call::CreateDocument {
                name: request.name.clone(),
            },
        )?;

        if state.documents.contains_key(&request.name) {
            return Err(Error::AlreadyExists {
                name: request.name.clone(),
            });
        }
        validate_content(&request.name, request.format, &request.content)?;

        let doc = StoredDocument {
            document_type: request.document_type,
            format: request.format,
            versions: vec![(request.format, request.content.clone())],
            default_version: 1,
            permissions: Vec::new(),
            created_date: Utc::now(),
        };
        let description = doc.describe(&request.name, 1);
        state.documents.insert(request.name.clone(), doc);
        Ok(description)
    }

    async fn update_document(
        &self,
        name: &str,
        content: &str,
        format: DocumentFormat,
    ) -> Result<DocumentDescription> {
        let mut state = self.state();
        Self::record(&mut state, Call::UpdateDocument { name: name.to_string() })?;

        let doc = state.documents.get_mut(name).ok_or_else(|| not_found(name))?;
        if doc.versions.last().is_some_and(|(_, latest)| latest == content) {
            return Err(Error::DuplicateContent {
                name: name.to_string(),
            });
        }
        validate_content(name, format, content)?;

        doc.format = format;
        doc.versions.push((format, content.to_string()));
        Ok(doc.describe(name, doc.latest()))
    }

    async fn update_default_version(&self, name: &str, version: &str) -> Result<()> {
        let mut state = self.state();
        Self::record(
            &mut state,
            Call::UpdateDefaultVersion {
                name: name.to_string(),
                version: version.to_string(),
            },
        )?;

        let doc = state.documents.get_mut(name).ok_or_else(|| not_found(name))?;
        doc.default_version = doc.resolve_version(name, Some(version))?;
        Ok(())
    }

    async fn delete_document(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        Self::record(&mut state, Call::DeleteDocument { name: name.to_string() })?;

        state
            .documents
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(name))
    }

    async fn share_permissions(&self, name: &str) -> Result<Vec<String>> {
        let mut state = self.state();
        Self::record(&mut state, Call::SharePermissions { name: name.to_string() })?;

        state
            .documents
            .get(name)
            .map(|d| d.permissions.clone())
            .ok_or_else(|| not_found(name))
    }

    async fn modify_share_permissions(
        &self,
        name: &str,
        to_add: &[String],
        to_remove: &[String],
    ) -> Result<()> {
        let mut state = self.state();
        Self::record(
            &mut state,
            Call::ModifySharePermissions {
                name: name.to_string(),
                to_add: to_add.to_vec(),
                to_remove: to_remove.to_vec(),
            },
        )?;

        let doc = state.documents.get_mut(name).ok_or_else(|| not_found(name))?;
        doc.permissions.retain(|id| !to_remove.contains(id));
        for id in to_add {
            if !doc.permissions.contains(id) {
                doc.permissions.push(id.clone());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ClientFactory for MemoryBackend {
    async fn client(&self, region: &str) -> Result<Client> {
        Ok(Client::with_backend(self.clone(), region))
    }
}

/// Reject content the service would refuse outright.
fn validate_content(name: &str, format: DocumentFormat, content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::InvalidContent {
            name: name.to_string(),
            message: "content is empty".to_string(),
        });
    }
    if format == DocumentFormat::Json
        && let Err(e) = serde_json::from_str::<serde_json::Value>(content)
    {
        return Err(Error::InvalidContent {
            name: name.to_string(),
            message: e.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(name: &str, content: &str) -> CreateDocument {
        CreateDocument {
            name: name.to_string(),
            document_type: DocumentType::Command,
            format: DocumentFormat::Json,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let backend = MemoryBackend::new();
        let created = backend
            .create_document(&create_request("doc", r#"{"a":1}"#))
            .await
            .unwrap();
        assert_eq!(created.latest_version.as_deref(), Some("1"));

        let doc = backend.get_document("doc", None, None).await.unwrap();
        assert_eq!(doc.content.as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(doc.version.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend.get_document("missing", None, None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_duplicate_content() {
        let backend = MemoryBackend::new();
        backend.insert("doc", DocumentType::Command, DocumentFormat::Json, r#"{"a":1}"#);

        let err = backend
            .update_document("doc", r#"{"a":1}"#, DocumentFormat::Json)
            .await
            .unwrap_err();
        assert!(err.is_duplicate_content());

        let updated = backend
            .update_document("doc", r#"{"a":2}"#, DocumentFormat::Json)
            .await
            .unwrap();
        assert_eq!(updated.document_version.as_deref(), Some("2"));
        // Default version stays on 1 until promoted
        assert_eq!(updated.default_version.as_deref(), Some("1"));

        let latest = backend
            .get_document("doc", Some(LATEST_VERSION), None)
            .await
            .unwrap();
        assert_eq!(latest.content.as_deref(), Some(r#"{"a":2}"#));
    }

    #[tokio::test]
    async fn test_describe_honors_version() {
        let backend = MemoryBackend::new();
        backend.insert("doc", DocumentType::Command, DocumentFormat::Yaml, "a: 1");
        backend
            .update_document("doc", r#"{"a":2}"#, DocumentFormat::Json)
            .await
            .unwrap();

        let default = backend.describe_document("doc", None).await.unwrap();
        assert_eq!(default.document_version.as_deref(), Some("1"));
        assert_eq!(default.format, Some(DocumentFormat::Yaml));

        let latest = backend
            .describe_document("doc", Some(LATEST_VERSION))
            .await
            .unwrap();
        assert_eq!(latest.document_version.as_deref(), Some("2"));
        assert_eq!(latest.format, Some(DocumentFormat::Json));
        assert_ne!(latest.hash, default.hash);

        let err = backend.describe_document("doc", Some("7")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_json() {
        let backend = MemoryBackend::new();
        let err = backend
            .create_document(&create_request("doc", "not json"))
            .await
            .unwrap_err();
        assert_eq!(err.category(), crate::ErrorCategory::InvalidContent);
        assert!(!backend.contains("doc"));
    }

    #[tokio::test]
    async fn test_permissions() {
        let backend = MemoryBackend::new();
        backend.insert("doc", DocumentType::Command, DocumentFormat::Json, "{}");

        backend
            .modify_share_permissions(
                "doc",
                &["111111111111".to_string(), "222222222222".to_string()],
                &[],
            )
            .await
            .unwrap();
        backend
            .modify_share_permissions("doc", &[], &["111111111111".to_string()])
            .await
            .unwrap();

        assert_eq!(backend.permissions("doc"), vec!["222222222222".to_string()]);
        assert_eq!(backend.permission_changes().len(), 2);
    }

    #[tokio::test]
    async fn test_fail_operation() {
        let backend = MemoryBackend::new();
        backend.fail_operation("DescribeDocument");
        let err = backend.describe_document("doc", None).await.unwrap_err();
        assert_eq!(err.category(), crate::ErrorCategory::Transport);
        assert_eq!(backend.calls().len(), 1);
    }
}
