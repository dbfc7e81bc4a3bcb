//! Share-permission synchronization.
//!
//! Desired and live account lists are compared as sets. All changes go out
//! in a single modify call, always against `$LATEST`.

use crate::error::Result;
use declarative::{ApplyResult, EventKind, LifecycleContext, SetDiff};
use ssmkit::Client;

/// Account id that shares the document publicly
pub const ALL_ACCOUNTS: &str = "all";

/// Spell the public-share token one way so set comparison ignores its case.
pub fn canonical_account(id: &str) -> String {
    if id.eq_ignore_ascii_case(ALL_ACCOUNTS) {
        ALL_ACCOUNTS.to_string()
    } else {
        id.to_string()
    }
}

/// Accounts the document is currently shared with.
pub async fn live(client: &Client, name: &str) -> Result<Vec<String>> {
    let accounts = client.share_permissions(name).await?;
    Ok(accounts.iter().map(|id| canonical_account(id)).collect())
}

pub fn diff(desired: &[String], live: &[String]) -> SetDiff<String> {
    SetDiff::compute(desired, live)
}

/// Apply `changes`; no call is made when there is nothing to change.
pub async fn synchronize(
    client: &Client,
    name: &str,
    changes: &SetDiff<String>,
    ctx: &mut LifecycleContext<'_>,
) -> Result<ApplyResult> {
    if changes.is_empty() {
        log::debug!("Share permissions of {name} are up to date");
        return Ok(ApplyResult::NoChange);
    }

    let to_add = changes.additions();
    let to_remove = changes.removals();
    ctx.emit(
        name,
        EventKind::Sync,
        format!(
            "Updating share permissions of {name} (add: [{}], remove: [{}])",
            to_add.join(", "),
            to_remove.join(", ")
        ),
    );

    client
        .modify_share_permissions(name, &to_add, &to_remove)
        .await?;
    Ok(ApplyResult::Modified)
}

/// Strip every share permission. A missing document has none.
pub async fn revoke_all(
    client: &Client,
    name: &str,
    ctx: &mut LifecycleContext<'_>,
) -> Result<ApplyResult> {
    let accounts = match client.share_permissions(name).await {
        Ok(accounts) => accounts,
        Err(e) if e.is_not_found() => return Ok(ApplyResult::NoChange),
        Err(e) => return Err(e.into()),
    };

    synchronize(client, name, &SetDiff::remove_all(&accounts), ctx).await
}
