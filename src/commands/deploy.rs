use anyhow::{Context as _, Result};
use declarative::{Component, LifecycleContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::Context;
use crate::cli::DeployArgs;
use crate::credentials;
use crate::engine::{SsmDocument, differ};
use crate::inputs::{DEFAULT_INPUT_FILES, Inputs};
use crate::state::DocumentState;
use crate::ui;

pub async fn run(ctx: &Context, args: DeployArgs) -> Result<()> {
    let cwd = super::current_dir()?;
    let inputs_path = match args.inputs {
        Some(path) => path,
        None => Inputs::discover(&cwd).with_context(|| {
            format!(
                "No inputs file found in {} (looked for {})",
                cwd.display(),
                DEFAULT_INPUT_FILES.join(", ")
            )
        })?,
    };
    let inputs = Inputs::load(&inputs_path)?;
    let base_dir = base_dir(&inputs_path, &cwd);

    let identity = args.instance.identity();
    let key = identity.key();
    let store = super::state_store(&args.instance)?;
    let prior = store.get(&key)?;

    let factory = credentials::client_factory()?;
    let component = SsmDocument::new(Arc::new(factory), base_dir);

    if args.dry_run {
        ui::header("Deploy Plan");
        ui::warn("Dry run - no changes will be made");
        let plan = component.plan(&inputs, &prior, &identity).await?;
        differ::display_plan(&plan);
        return Ok(());
    }

    ui::header("Deploying AWS SSM Document");
    ui::kv("Instance", &key);
    ui::kv("Inputs", &inputs_path.display().to_string());
    println!();

    let mut sink = ui::UiSink::new(ctx.quiet);
    let mut lifecycle = LifecycleContext::new(&identity, &mut sink);
    let state = component.deploy(inputs, &prior, &mut lifecycle).await?;

    store
        .put(&key, state.clone())
        .with_context(|| format!("Deployed, but failed to record state for {key}"))?;

    println!();
    ui::success("Deploy complete!");
    show_outputs(&state);
    Ok(())
}

/// Relative `src`/`file` paths are anchored at the inputs file's directory.
fn base_dir(inputs_path: &Path, cwd: &Path) -> PathBuf {
    match inputs_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => cwd.join(parent),
        _ => cwd.to_path_buf(),
    }
}

fn show_outputs(state: &DocumentState) {
    ui::kv("Name", &ui::or_dash(state.name.as_deref()));
    ui::kv("Region", &ui::or_dash(state.region.as_deref()));
    ui::kv(
        "Version",
        &format!(
            "{} (latest {}, default {})",
            ui::or_dash(state.document_version.as_deref()),
            ui::or_dash(state.latest_version.as_deref()),
            ui::or_dash(state.default_version.as_deref())
        ),
    );
    if !state.account_ids.is_empty() {
        ui::kv("Shared with", &state.account_ids.join(", "));
    }
}
