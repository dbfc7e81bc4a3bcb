//! Record what was deployed.

use crate::engine::desired::DesiredDocument;
use crate::error::Result;
use crate::state::DocumentState;
use ssmkit::{Client, DocumentDescription, LATEST_VERSION};

/// Describe the latest version of the deployed document and turn it into
/// persisted state.
pub async fn capture(client: &Client, desired: &DesiredDocument) -> Result<DocumentState> {
    let description = client
        .describe_document(&desired.name, Some(LATEST_VERSION))
        .await?;
    Ok(snapshot(description, &desired.region, &desired.account_ids))
}

/// Service metadata plus the caller's region and account ids.
pub fn snapshot(
    description: DocumentDescription,
    region: &str,
    account_ids: &[String],
) -> DocumentState {
    DocumentState {
        name: Some(description.name),
        region: Some(region.to_string()),
        format: description.format,
        document_type: description.document_type,
        document_version: description.document_version,
        latest_version: description.latest_version,
        default_version: description.default_version,
        version_name: description.version_name,
        status: description.status,
        hash: description.hash,
        hash_type: description.hash_type,
        created_date: description.created_date,
        account_ids: account_ids.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssmkit::{ClientFactory, DocumentFormat, DocumentType, MemoryBackend};

    #[test]
    fn test_snapshot_keeps_account_order() {
        let description = DocumentDescription {
            name: "doc".to_string(),
            format: Some(DocumentFormat::Yaml),
            document_version: Some("3".to_string()),
            ..Default::default()
        };
        let accounts = vec!["222222222222".to_string(), "111111111111".to_string()];

        let state = snapshot(description, "eu-central-1", &accounts);

        assert_eq!(state.name.as_deref(), Some("doc"));
        assert_eq!(state.region.as_deref(), Some("eu-central-1"));
        assert_eq!(state.format, Some(DocumentFormat::Yaml));
        assert_eq!(state.document_version.as_deref(), Some("3"));
        assert_eq!(state.account_ids, accounts);
    }

    #[tokio::test]
    async fn test_capture_describes_document() {
        let backend = MemoryBackend::new();
        backend.insert("doc", DocumentType::Command, DocumentFormat::Json, "{}");
        let client = backend.client("us-east-1").await.unwrap();

        let desired = DesiredDocument {
            name: "doc".to_string(),
            region: "us-east-1".to_string(),
            document_type: DocumentType::Command,
            format: DocumentFormat::Json,
            content: "{}".to_string(),
            account_ids: Vec::new(),
            set_default_version: false,
        };

        let state = capture(&client, &desired).await.unwrap();
        assert_eq!(state.document_type, Some(DocumentType::Command));
        assert_eq!(state.status.as_deref(), Some("Active"));
        assert_eq!(state.hash_type.as_deref(), Some("Blake3"));
        assert!(state.hash.is_some());
    }
}
