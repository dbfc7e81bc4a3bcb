//! Existence check and content reconciliation.

use crate::engine::desired::DesiredDocument;
use crate::error::Result;
use declarative::{Action, ApplyResult, EventKind, LifecycleContext};
use ssmkit::{Client, CreateDocument, Document, DocumentFormat, DocumentType, LATEST_VERSION};

/// The most recent version of a deployed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveDocument {
    pub format: Option<DocumentFormat>,
    pub document_type: Option<DocumentType>,
    pub version: Option<String>,
    pub content: String,
}

impl From<Document> for LiveDocument {
    fn from(doc: Document) -> Self {
        Self {
            format: doc.format,
            document_type: doc.document_type,
            version: doc.version,
            content: doc.content.unwrap_or_default(),
        }
    }
}

/// Read the latest version of `name`. Absence is `None`, not an error.
pub async fn existence(client: &Client, name: &str) -> Result<Option<LiveDocument>> {
    match client.get_document(name, Some(LATEST_VERSION), None).await {
        Ok(doc) => Ok(Some(doc.into())),
        Err(e) if e.is_not_found() => {
            log::debug!("Document {name} does not exist");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Create or update the document content.
///
/// An update whose content equals the latest version is not an error: the
/// document is left as is and [`ApplyResult::NoChange`] is returned.
pub async fn apply_content(
    client: &Client,
    desired: &DesiredDocument,
    action: Action,
    ctx: &mut LifecycleContext<'_>,
) -> Result<ApplyResult> {
    let name = desired.name.as_str();

    match action {
        Action::Create => {
            ctx.emit(
                name,
                EventKind::Create,
                format!(
                    "Creating AWS SSM document {name} ({}, {}) in {}",
                    desired.document_type,
                    desired.format,
                    client.region()
                ),
            );
            client
                .create_document(&CreateDocument {
                    name: desired.name.clone(),
                    document_type: desired.document_type,
                    format: desired.format,
                    content: desired.content.clone(),
                })
                .await?;
            Ok(ApplyResult::Created)
        }
        Action::Update => {
            ctx.emit(
                name,
                EventKind::Update,
                format!("Updating AWS SSM document {name}"),
            );
            let description = match client
                .update_document(name, &desired.content, desired.format)
                .await
            {
                Ok(description) => description,
                Err(e) if e.is_duplicate_content() => {
                    ctx.emit(
                        name,
                        EventKind::Recovered,
                        "Content matches the latest version, nothing to update",
                    );
                    return Ok(ApplyResult::NoChange);
                }
                Err(e) => return Err(e.into()),
            };

            if desired.set_default_version
                && let Some(version) = description.document_version.as_deref()
            {
                ctx.emit(
                    name,
                    EventKind::Update,
                    format!("Setting default version of {name} to {version}"),
                );
                client.update_default_version(name, version).await?;
            }
            Ok(ApplyResult::Modified)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{InstanceIdentity, RecordingSink, decide};
    use ssmkit::{Call, ClientFactory, MemoryBackend};

    fn desired(content: &str) -> DesiredDocument {
        DesiredDocument {
            name: "doc".to_string(),
            region: "us-east-1".to_string(),
            document_type: DocumentType::Command,
            format: DocumentFormat::Json,
            content: content.to_string(),
            account_ids: Vec::new(),
            set_default_version: false,
        }
    }

    #[tokio::test]
    async fn test_existence() {
        let backend = MemoryBackend::new();
        let client = backend.client("us-east-1").await.unwrap();
        assert_eq!(existence(&client, "doc").await.unwrap(), None);

        backend.insert("doc", DocumentType::Command, DocumentFormat::Json, r#"{"a":1}"#);
        let live = existence(&client, "doc").await.unwrap().unwrap();
        assert_eq!(live.content, r#"{"a":1}"#);
        assert_eq!(live.version.as_deref(), Some("1"));
        assert_eq!(decide(Some(&live)), Action::Update);
    }

    #[tokio::test]
    async fn test_existence_propagates_other_errors() {
        let backend = MemoryBackend::new();
        backend.fail_operation("GetDocument");
        let client = backend.client("us-east-1").await.unwrap();
        assert!(existence(&client, "doc").await.is_err());
    }

    #[tokio::test]
    async fn test_create() {
        let backend = MemoryBackend::new();
        let client = backend.client("us-east-1").await.unwrap();
        let identity = InstanceIdentity::default();
        let mut sink = RecordingSink::new();
        let mut ctx = LifecycleContext::new(&identity, &mut sink);

        let result = apply_content(&client, &desired("{}"), Action::Create, &mut ctx)
            .await
            .unwrap();

        assert_eq!(result, ApplyResult::Created);
        assert_eq!(backend.latest_content("doc").as_deref(), Some("{}"));
        assert_eq!(sink.of_kind(EventKind::Create).len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_content_is_not_an_error() {
        let backend = MemoryBackend::new();
        backend.insert("doc", DocumentType::Command, DocumentFormat::Json, "{}");
        let client = backend.client("us-east-1").await.unwrap();
        let identity = InstanceIdentity::default();
        let mut sink = RecordingSink::new();
        let mut ctx = LifecycleContext::new(&identity, &mut sink);

        let result = apply_content(&client, &desired("{}"), Action::Update, &mut ctx)
            .await
            .unwrap();

        assert_eq!(result, ApplyResult::NoChange);
        assert_eq!(sink.of_kind(EventKind::Recovered).len(), 1);
    }

    #[tokio::test]
    async fn test_update_promotes_default_version() {
        let backend = MemoryBackend::new();
        backend.insert("doc", DocumentType::Command, DocumentFormat::Json, "{}");
        let client = backend.client("us-east-1").await.unwrap();
        let identity = InstanceIdentity::default();
        let mut sink = RecordingSink::new();
        let mut ctx = LifecycleContext::new(&identity, &mut sink);

        let mut doc = desired(r#"{"v":2}"#);
        doc.set_default_version = true;
        let result = apply_content(&client, &doc, Action::Update, &mut ctx)
            .await
            .unwrap();

        assert_eq!(result, ApplyResult::Modified);
        assert!(backend.calls().contains(&Call::UpdateDefaultVersion {
            name: "doc".to_string(),
            version: "2".to_string(),
        }));
        let described = client.describe_document("doc", None).await.unwrap();
        assert_eq!(described.default_version.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_update_keeps_default_version() {
        let backend = MemoryBackend::new();
        backend.insert("doc", DocumentType::Command, DocumentFormat::Json, "{}");
        let client = backend.client("us-east-1").await.unwrap();
        let identity = InstanceIdentity::default();
        let mut sink = RecordingSink::new();
        let mut ctx = LifecycleContext::new(&identity, &mut sink);

        apply_content(&client, &desired(r#"{"v":2}"#), Action::Update, &mut ctx)
            .await
            .unwrap();

        let described = client.describe_document("doc", None).await.unwrap();
        assert_eq!(described.default_version.as_deref(), Some("1"));
        assert_eq!(described.latest_version.as_deref(), Some("2"));
    }
}
