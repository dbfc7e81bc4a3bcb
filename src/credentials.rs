//! Credential discovery.
//!
//! A `.env` file in the working directory is loaded first; variables already
//! set in the environment win over it.

use crate::error::{Error, Result};
use ssmkit::{AwsClientFactory, AwsCredentials};
use std::path::Path;

/// Environment variable overriding the service endpoint
pub const ENV_ENDPOINT_URL: &str = "SSMDOC_ENDPOINT_URL";

const MISSING_CREDENTIALS: &str = "Credentials not found. Make sure you have a .env file in the cwd \
     (or AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY, or AWS_PROFILE, in the environment).";

/// Load `.env` from `dir` if present.
pub fn load_dotenv(dir: &Path) {
    let path = dir.join(".env");
    if !path.is_file() {
        return;
    }
    match dotenvy::from_path(&path) {
        Ok(()) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) => log::warn!("Ignoring {}: {e}", path.display()),
    }
}

/// Resolve credentials through `lookup`.
pub fn resolve_with<F>(lookup: F) -> Result<AwsCredentials>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let (Some(access_key_id), Some(secret_access_key)) =
        (var("AWS_ACCESS_KEY_ID"), var("AWS_SECRET_ACCESS_KEY"))
    {
        return Ok(AwsCredentials::Static {
            access_key_id,
            secret_access_key,
            session_token: var("AWS_SESSION_TOKEN"),
        });
    }

    if let Some(profile) = var("AWS_PROFILE") {
        return Ok(AwsCredentials::Profile(profile));
    }

    Err(Error::Configuration(MISSING_CREDENTIALS.to_string()))
}

/// Resolve credentials from the process environment.
pub fn resolve() -> Result<AwsCredentials> {
    resolve_with(|key| std::env::var(key).ok())
}

/// Build an AWS client factory from the environment.
pub fn client_factory() -> Result<AwsClientFactory> {
    let credentials = resolve()?;
    log::debug!("Using credentials: {credentials:?}");

    let endpoint_url = std::env::var(ENV_ENDPOINT_URL)
        .ok()
        .filter(|e| !e.trim().is_empty());

    Ok(AwsClientFactory::new(credentials).with_endpoint_url(endpoint_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_static_credentials() {
        let creds = resolve_with(lookup(&[
            ("AWS_ACCESS_KEY_ID", "AKIAEXAMPLE"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("AWS_SESSION_TOKEN", "token"),
            ("AWS_PROFILE", "ignored"),
        ]))
        .unwrap();

        match creds {
            AwsCredentials::Static {
                access_key_id,
                session_token,
                ..
            } => {
                assert_eq!(access_key_id, "AKIAEXAMPLE");
                assert_eq!(session_token.as_deref(), Some("token"));
            }
            other => panic!("unexpected credentials: {other:?}"),
        }
    }

    #[test]
    fn test_profile_credentials() {
        let creds = resolve_with(lookup(&[
            ("AWS_ACCESS_KEY_ID", "AKIAEXAMPLE"),
            ("AWS_PROFILE", "deploy"),
        ]))
        .unwrap();
        assert!(matches!(creds, AwsCredentials::Profile(p) if p == "deploy"));
    }

    #[test]
    fn test_missing_credentials() {
        let err = resolve_with(lookup(&[("AWS_SECRET_ACCESS_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().starts_with("Credentials not found."));
    }

    #[test]
    fn test_load_dotenv_missing_file_is_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        load_dotenv(dir.path());
    }
}
