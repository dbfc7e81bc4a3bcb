//! Dry-run planning.
//!
//! A plan issues only reads: it shows what a deploy would change without
//! changing anything.

use crate::engine::desired::DesiredDocument;
use crate::engine::permissions;
use crate::engine::reconcile::{self, LiveDocument};
use crate::error::Result;
use declarative::{Action, ResourceState, SetDiff, decide};
use similar::TextDiff;
use ssmkit::{Client, DocumentFormat};

/// What a deploy would do.
#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub desired: DesiredDocument,
    pub action: Action,
    pub current: ResourceState,
    pub live: Option<LiveDocument>,
    pub permissions: SetDiff<String>,
}

impl DeployPlan {
    /// Whether the content differs from the latest version.
    pub fn content_changed(&self) -> bool {
        self.live
            .as_ref()
            .is_none_or(|live| live.content != self.desired.content)
    }

    pub fn has_changes(&self) -> bool {
        self.content_changed() || !self.permissions.is_empty()
    }

    /// Unified diff of live and desired content, if they differ.
    ///
    /// JSON is pretty-printed first so single-line documents diff by key.
    pub fn content_diff(&self) -> Option<String> {
        if !self.content_changed() {
            return None;
        }

        let old = self
            .live
            .as_ref()
            .map(|live| display_content(&live.content, live.format))
            .unwrap_or_default();
        let new = display_content(&self.desired.content, Some(self.desired.format));

        Some(
            TextDiff::from_lines(&old, &new)
                .unified_diff()
                .context_radius(3)
                .header("live", "desired")
                .to_string(),
        )
    }
}

fn display_content(content: &str, format: Option<DocumentFormat>) -> String {
    let pretty = match format {
        Some(DocumentFormat::Json) | None => serde_json::from_str::<serde_json::Value>(content)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok()),
        _ => None,
    };

    let mut text = pretty.unwrap_or_else(|| content.to_string());
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Read live state and plan a deploy of `desired`.
pub async fn plan(client: &Client, desired: DesiredDocument) -> Result<DeployPlan> {
    let live = reconcile::existence(client, &desired.name).await?;
    let action = decide(live.as_ref());
    let current = ResourceState::observe(live.as_ref(), |doc| {
        doc.version.as_ref().map(|v| format!("version {v}"))
    });

    let live_accounts = match &live {
        Some(_) => permissions::live(client, &desired.name).await?,
        None => Vec::new(),
    };
    let permissions = permissions::diff(&desired.account_ids, &live_accounts);

    Ok(DeployPlan {
        desired,
        action,
        current,
        live,
        permissions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssmkit::{ClientFactory, DocumentType, MemoryBackend};

    fn desired(content: &str, accounts: &[&str]) -> DesiredDocument {
        DesiredDocument {
            name: "doc".to_string(),
            region: "us-east-1".to_string(),
            document_type: DocumentType::Command,
            format: DocumentFormat::Json,
            content: content.to_string(),
            account_ids: accounts.iter().map(|s| s.to_string()).collect(),
            set_default_version: false,
        }
    }

    #[tokio::test]
    async fn test_plan_create() {
        let backend = MemoryBackend::new();
        let client = backend.client("us-east-1").await.unwrap();

        let plan = plan(&client, desired(r#"{"a":1}"#, &["111111111111"]))
            .await
            .unwrap();

        assert_eq!(plan.action, Action::Create);
        assert!(plan.current.is_absent());
        assert!(plan.has_changes());
        assert_eq!(plan.permissions.additions(), vec!["111111111111"]);
        assert!(plan.content_diff().unwrap().contains("+  \"a\": 1"));
        assert!(backend.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_plan_unchanged() {
        let backend = MemoryBackend::new();
        backend.insert("doc", DocumentType::Command, DocumentFormat::Json, "{}");
        let client = backend.client("us-east-1").await.unwrap();

        let plan = plan(&client, desired("{}", &[])).await.unwrap();

        assert_eq!(plan.action, Action::Update);
        assert_eq!(
            plan.current,
            ResourceState::Present {
                details: Some("version 1".to_string())
            }
        );
        assert!(!plan.has_changes());
        assert_eq!(plan.content_diff(), None);
        assert!(backend.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_plan_content_diff() {
        let backend = MemoryBackend::new();
        backend.insert(
            "doc",
            DocumentType::Command,
            DocumentFormat::Json,
            r#"{"schemaVersion":"2.2","mainSteps":[]}"#,
        );
        let client = backend.client("us-east-1").await.unwrap();

        let plan = plan(&client, desired(r#"{"schemaVersion":"2.2","mainSteps":[1]}"#, &[]))
            .await
            .unwrap();

        let diff = plan.content_diff().unwrap();
        assert!(diff.contains("--- live"));
        assert!(diff.contains("+++ desired"));
        assert!(diff.contains("-  \"mainSteps\": []"));
        assert!(backend.mutations().is_empty());
    }

    #[test]
    fn test_display_content_keeps_non_json() {
        assert_eq!(display_content("a: 1", Some(DocumentFormat::Yaml)), "a: 1\n");
        assert_eq!(display_content("", None), "");
    }
}
