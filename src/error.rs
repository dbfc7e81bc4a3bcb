//! Errors raised while deploying or removing a document.
//!
//! Local failures (bad inputs, missing files, identity changes) are detected
//! before any network call. Remote failures keep their [`ssmkit::Error`]
//! category so callers can tell "not found" from a transport problem.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing credentials or unusable settings
    #[error("{0}")]
    Configuration(String),

    /// The document name or region differs from what was deployed before
    #[error(
        "Changing the {field} from {from} to {to} will delete the AWS SSM document. \
         Please remove it manually, change the {field}, then re-deploy."
    )]
    IllegalIdentityChange {
        field: &'static str,
        from: String,
        to: String,
    },

    /// A content file could not be found in the source
    #[error("source file not found: {path}")]
    SourceNotFound { path: String },

    /// Inputs that cannot describe a document
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Remote(#[from] ssmkit::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn source_not_found(path: impl Into<String>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_change_message() {
        let err = Error::IllegalIdentityChange {
            field: "name",
            from: "old-doc".to_string(),
            to: "new-doc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Changing the name from old-doc to new-doc will delete the AWS SSM document. \
             Please remove it manually, change the name, then re-deploy."
        );
    }

    #[test]
    fn test_remote_keeps_category() {
        let err: Error = ssmkit::Error::NotFound {
            name: "doc".to_string(),
        }
        .into();
        match err {
            Error::Remote(inner) => assert!(inner.is_not_found()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
