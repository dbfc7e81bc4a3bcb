use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ssmkit::{DocumentFormat, DocumentType};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// State Structures
// ============================================================================

/// What is recorded about a deployed document.
///
/// Holds no content and no local timestamps, so deploying the same inputs
/// twice records the same state.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct DocumentState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DocumentFormat>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,

    /// Version described by the service (the default version)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_type: Option<String>,

    /// Service-side creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,

    /// Account ids as the caller wrote them
    #[serde(default)]
    pub account_ids: Vec<String>,
}

impl DocumentState {
    /// Whether nothing has been deployed.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

/// Contents of the state file: one entry per instance key.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StateFile {
    #[serde(default)]
    pub instances: BTreeMap<String, DocumentState>,
}

// ============================================================================
// StateStore
// ============================================================================

/// TOML file holding [`DocumentState`] per instance.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the state directory (see [`crate::paths::state_dir`]).
    pub fn default_location() -> Result<Self> {
        Ok(Self::at(crate::paths::state_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state file, or return default if it doesn't exist
    pub fn load(&self) -> Result<StateFile> {
        if !self.path.exists() {
            log::debug!("State file does not exist, using default state");
            return Ok(StateFile::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        let state: StateFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;

        log::debug!("Loaded state from {}", self.path.display());
        Ok(state)
    }

    /// Save the state file
    pub fn save(&self, state: &StateFile) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(state).context("Failed to serialize state to TOML")?;

        fs::write(&self.path, &content)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        log::debug!("Saved state to {}", self.path.display());
        Ok(())
    }

    /// State recorded for `key`, or empty state.
    pub fn get(&self, key: &str) -> Result<DocumentState> {
        Ok(self.load()?.instances.remove(key).unwrap_or_default())
    }

    /// Record state for `key`. Empty state removes the entry.
    pub fn put(&self, key: &str, document: DocumentState) -> Result<()> {
        let mut state = self.load()?;
        if document.is_empty() {
            if state.instances.remove(key).is_none() && !self.path.exists() {
                return Ok(());
            }
        } else {
            state.instances.insert(key.to_string(), document);
        }
        self.save(&state)
    }
}
