use anyhow::{Context as _, Result};
use declarative::{Component, LifecycleContext};
use std::sync::Arc;

use crate::Context;
use crate::cli::InstanceArgs;
use crate::credentials;
use crate::engine::SsmDocument;
use crate::ui;

pub async fn run(ctx: &Context, args: InstanceArgs) -> Result<()> {
    let identity = args.identity();
    let key = identity.key();
    let store = super::state_store(&args)?;
    let prior = store.get(&key)?;

    ui::header("Removing AWS SSM Document");
    ui::kv("Instance", &key);
    println!();

    if prior.is_empty() {
        ui::info(&format!("Nothing deployed for {key}"));
        return Ok(());
    }

    let factory = credentials::client_factory()?;
    let component = SsmDocument::new(Arc::new(factory), super::current_dir()?);

    let mut sink = ui::UiSink::new(ctx.quiet);
    let mut lifecycle = LifecycleContext::new(&identity, &mut sink);
    let state = component.remove(&prior, &mut lifecycle).await?;

    store
        .put(&key, state)
        .with_context(|| format!("Removed, but failed to update state for {key}"))?;

    println!();
    ui::success("Remove complete!");
    Ok(())
}
