//! Desired-state builder.
//!
//! Combines inputs, prior state and instance identity into the document
//! that should exist. Everything here is local; the identity guard runs
//! before any file is read.

use crate::engine::permissions::{self, ALL_ACCOUNTS};
use crate::engine::resolver;
use crate::error::{Error, Result};
use crate::inputs::Inputs;
use crate::source::SourceReader;
use crate::state::DocumentState;
use declarative::InstanceIdentity;
use rand::Rng;
use rand::distributions::Alphanumeric;
use regex::Regex;
use ssmkit::{DocumentFormat, DocumentType};
use std::sync::LazyLock;

/// Prefix of names generated for unstable identities
pub const GENERATED_NAME_PREFIX: &str = "ssm-document";

const RANDOM_SUFFIX_LEN: usize = 6;
const NAME_MAX_LEN: usize = 128;

static VALID_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,128}$").expect("valid regex"));

static INVALID_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\-]+").expect("valid regex"));

static ACCOUNT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("valid regex"));

/// Names starting with these are reserved by the service.
const RESERVED_PREFIXES: [&str; 3] = ["aws", "amazon", "amzn"];

/// The document that should exist after a deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredDocument {
    pub name: String,
    pub region: String,
    pub document_type: DocumentType,
    pub format: DocumentFormat,
    pub content: String,
    /// Trimmed, in caller order
    pub account_ids: Vec<String>,
    pub set_default_version: bool,
}

/// Refuse deploys that would silently orphan the deployed document.
pub fn guard_identity(inputs: &Inputs, prior: &DocumentState) -> Result<()> {
    if let (Some(from), Some(to)) = (prior.name.as_deref(), inputs.explicit_name())
        && from != to
    {
        return Err(Error::IllegalIdentityChange {
            field: "name",
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    if let Some(from) = prior.region.as_deref()
        && from != inputs.region()
    {
        return Err(Error::IllegalIdentityChange {
            field: "region",
            from: from.to_string(),
            to: inputs.region().to_string(),
        });
    }

    Ok(())
}

/// Generate a document name for `identity`.
///
/// Stable identities map to the same name on every call; otherwise a random
/// suffix is used and the name must be kept in state.
pub fn generate_name(identity: &InstanceIdentity) -> String {
    if !identity.is_stable() {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_SUFFIX_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        return sanitize_name(&format!(
            "{GENERATED_NAME_PREFIX}-{}-{suffix}",
            identity.stage
        ));
    }

    let parts: Vec<&str> = identity
        .app
        .as_deref()
        .into_iter()
        .chain(std::iter::once(identity.stage.as_str()))
        .chain(identity.instance.as_deref())
        .collect();

    let name = sanitize_name(&parts.join("-"));
    let lower = name.to_ascii_lowercase();
    if RESERVED_PREFIXES.iter().any(|p| lower.starts_with(p)) || name.len() < 3 {
        sanitize_name(&format!("{GENERATED_NAME_PREFIX}-{name}"))
    } else {
        name
    }
}

/// Replace characters the service rejects and cap the length.
fn sanitize_name(raw: &str) -> String {
    let mut name = INVALID_NAME_CHARS.replace_all(raw, "-").into_owned();
    name.truncate(NAME_MAX_LEN);
    name
}

pub fn validate_name(name: &str) -> Result<()> {
    if VALID_NAME.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "document name '{name}' must be 3-128 characters of letters, digits, '_', '-' or '.'"
        )))
    }
}

/// Trim account ids and check each is 12 digits or `all` in any case.
pub fn normalize_account_ids(ids: &[String]) -> Result<Vec<String>> {
    ids.iter()
        .map(|id| {
            let id = id.trim();
            if ACCOUNT_ID.is_match(id) || id.eq_ignore_ascii_case(ALL_ACCOUNTS) {
                Ok(permissions::canonical_account(id))
            } else {
                Err(Error::InvalidInput(format!(
                    "account id '{id}' must be 12 digits or 'all'"
                )))
            }
        })
        .collect()
}

/// Build the desired document.
pub fn build(
    inputs: &Inputs,
    prior: &DocumentState,
    identity: &InstanceIdentity,
    source: &dyn SourceReader,
) -> Result<DesiredDocument> {
    guard_identity(inputs, prior)?;

    let name = match (inputs.explicit_name(), prior.name.as_deref()) {
        (Some(name), _) | (None, Some(name)) => name.to_string(),
        (None, None) => {
            let name = generate_name(identity);
            log::debug!("Generated document name {name} for {}", identity.key());
            name
        }
    };
    validate_name(&name)?;

    let account_ids = normalize_account_ids(&inputs.account_ids)?;
    let resolved = resolver::resolve(inputs, prior.format, source)?;

    Ok(DesiredDocument {
        name,
        region: inputs.region().to_string(),
        document_type: inputs
            .document_type
            .or(prior.document_type)
            .unwrap_or_default(),
        format: resolved.format,
        content: resolved.content,
        account_ids,
        set_default_version: inputs.set_default_version,
    })
}
