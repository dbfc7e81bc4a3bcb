//! The SSM document component.
//!
//! `deploy` runs the whole reconciliation: build the desired document,
//! check whether it exists, create or update it, converge its share
//! permissions and record what was deployed. `remove` strips permissions
//! before deleting, so a failed delete never leaves a half-shared document.

use crate::engine::desired::{self, DesiredDocument};
use crate::engine::planner::{self, DeployPlan};
use crate::engine::{permissions, reconcile, recorder};
use crate::error::{Error, Result};
use crate::inputs::{DEFAULT_REGION, Inputs};
use crate::source;
use crate::state::DocumentState;
use async_trait::async_trait;
use declarative::{Component, EventKind, InstanceIdentity, LifecycleContext, decide};
use ssmkit::ClientFactory;
use std::path::PathBuf;
use std::sync::Arc;

/// Component type name
pub const COMPONENT_TYPE: &str = "aws-ssm-document";

/// An SSM document managed from declarative inputs.
pub struct SsmDocument {
    clients: Arc<dyn ClientFactory>,
    base_dir: PathBuf,
}

impl SsmDocument {
    /// `base_dir` anchors relative `src`, `file` and script paths.
    pub fn new(clients: Arc<dyn ClientFactory>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            clients,
            base_dir: base_dir.into(),
        }
    }

    /// Build the desired document without touching the network.
    pub fn desired(
        &self,
        inputs: &Inputs,
        prior: &DocumentState,
        identity: &InstanceIdentity,
    ) -> Result<DesiredDocument> {
        let source = source::open(inputs.src.as_deref(), &self.base_dir);
        log::debug!("Reading content from {}", source.location());
        desired::build(inputs, prior, identity, source.as_ref())
    }

    /// Plan a deploy without changing anything.
    pub async fn plan(
        &self,
        inputs: &Inputs,
        prior: &DocumentState,
        identity: &InstanceIdentity,
    ) -> Result<DeployPlan> {
        let desired = self.desired(inputs, prior, identity)?;
        let client = self.clients.client(&desired.region).await?;
        planner::plan(&client, desired).await
    }
}

#[async_trait]
impl Component for SsmDocument {
    type Inputs = Inputs;
    type State = DocumentState;
    type Error = Error;

    fn component_type(&self) -> &'static str {
        COMPONENT_TYPE
    }

    async fn deploy(
        &self,
        inputs: Inputs,
        prior: &DocumentState,
        ctx: &mut LifecycleContext<'_>,
    ) -> Result<DocumentState> {
        let desired = self.desired(&inputs, prior, ctx.identity)?;
        let name = desired.name.as_str();
        let client = self.clients.client(&desired.region).await?;

        ctx.emit(
            name,
            EventKind::Check,
            format!("Checking if an AWS SSM document has already been created with name: {name}"),
        );
        let live = reconcile::existence(&client, name).await?;

        if let Some(live_type) = live.as_ref().and_then(|l| l.document_type)
            && live_type != desired.document_type
        {
            log::warn!(
                "{name} is a {live_type} document; its type cannot change to {}",
                desired.document_type
            );
        }

        let action = decide(live.as_ref());
        let content = reconcile::apply_content(&client, &desired, action, ctx).await?;

        let live_accounts = permissions::live(&client, name).await?;
        let changes = permissions::diff(&desired.account_ids, &live_accounts);
        let shared = permissions::synchronize(&client, name, &changes, ctx).await?;

        if !content.is_change() && !shared.is_change() {
            ctx.emit(name, EventKind::Unchanged, format!("{name} is up to date"));
        }

        let state = recorder::capture(&client, &desired).await?;
        ctx.emit(
            name,
            EventKind::Record,
            format!(
                "Recorded {name} (version {}, default {})",
                state.latest_version.as_deref().unwrap_or("?"),
                state.default_version.as_deref().unwrap_or("?")
            ),
        );
        Ok(state)
    }

    async fn remove(
        &self,
        prior: &DocumentState,
        ctx: &mut LifecycleContext<'_>,
    ) -> Result<DocumentState> {
        let Some(name) = prior.name.as_deref() else {
            let key = ctx.identity.key();
            ctx.emit(&key, EventKind::Unchanged, "No AWS SSM document to remove");
            return Ok(DocumentState::default());
        };
        let region = prior.region.as_deref().unwrap_or(DEFAULT_REGION);
        let client = self.clients.client(region).await?;

        permissions::revoke_all(&client, name, ctx).await?;

        ctx.emit(
            name,
            EventKind::Remove,
            format!("Removing AWS SSM document {name} from {region}"),
        );
        if !client.delete_document(name).await? {
            ctx.emit(name, EventKind::Unchanged, format!("{name} was already deleted"));
        }

        Ok(DocumentState::default())
    }
}
