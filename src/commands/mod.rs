pub mod deploy;
pub mod remove;
pub mod status;

use crate::cli::InstanceArgs;
use crate::state::StateStore;
use anyhow::{Context as _, Result};
use std::path::PathBuf;

/// State store selected by `--state-file`, or the default one.
pub fn state_store(args: &InstanceArgs) -> Result<StateStore> {
    match &args.state_file {
        Some(path) => Ok(StateStore::at(path)),
        None => StateStore::default_location(),
    }
}

pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Could not determine the current directory")
}
