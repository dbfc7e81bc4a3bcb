use anyhow::Result;
use colored::Colorize;
use ssmkit::ClientFactory;

use crate::Context;
use crate::cli::StatusArgs;
use crate::credentials;
use crate::engine::{permissions, reconcile};
use crate::inputs::DEFAULT_REGION;
use crate::state::DocumentState;
use crate::ui;

pub async fn run(_ctx: &Context, args: StatusArgs) -> Result<()> {
    let identity = args.instance.identity();
    let key = identity.key();
    let store = super::state_store(&args.instance)?;
    let state = store.get(&key)?;

    ui::header("Document Status");
    ui::kv("Instance", &key);
    ui::kv("State file", &store.path().display().to_string());

    if state.is_empty() {
        println!();
        ui::info("Nothing deployed");
        return Ok(());
    }

    show_recorded(&state);

    if args.live {
        show_live(&state).await?;
    }

    println!();
    Ok(())
}

fn show_recorded(state: &DocumentState) {
    ui::section("Recorded");
    ui::kv("Name", &ui::or_dash(state.name.as_deref()));
    ui::kv("Region", &ui::or_dash(state.region.as_deref()));
    ui::kv(
        "Type",
        &state
            .document_type
            .map_or_else(|| "-".to_string(), |t| t.to_string()),
    );
    ui::kv(
        "Format",
        &state.format.map_or_else(|| "-".to_string(), |f| f.to_string()),
    );
    ui::kv("Version", &ui::or_dash(state.document_version.as_deref()));
    ui::kv("Latest", &ui::or_dash(state.latest_version.as_deref()));
    ui::kv("Default", &ui::or_dash(state.default_version.as_deref()));
    ui::kv("Status", &ui::or_dash(state.status.as_deref()));
    if let Some(hash) = &state.hash {
        ui::kv(
            "Hash",
            &format!("{hash} ({})", ui::or_dash(state.hash_type.as_deref())),
        );
    }
    if let Some(created) = state.created_date {
        ui::kv("Created", &created.to_rfc3339());
    }
    ui::kv(
        "Shared with",
        &if state.account_ids.is_empty() {
            "-".to_string()
        } else {
            state.account_ids.join(", ")
        },
    );
}

async fn show_live(state: &DocumentState) -> Result<()> {
    let Some(name) = state.name.as_deref() else {
        return Ok(());
    };
    let region = state.region.as_deref().unwrap_or(DEFAULT_REGION);

    ui::section("Live");
    let client = credentials::client_factory()?.client(region).await?;

    let Some(live) = reconcile::existence(&client, name).await? else {
        ui::warn(&format!("{name} no longer exists in {region}"));
        return Ok(());
    };

    let latest = live.version.as_deref();
    let drift = latest != state.latest_version.as_deref();
    ui::kv(
        "Latest",
        &if drift {
            format!("{} {}", ui::or_dash(latest), "(changed since last deploy)".yellow())
        } else {
            ui::or_dash(latest)
        },
    );

    let mut accounts = permissions::live(&client, name).await?;
    accounts.sort();
    ui::kv(
        "Shared with",
        &if accounts.is_empty() {
            "-".to_string()
        } else {
            accounts.join(", ")
        },
    );
    Ok(())
}
