//! Error types for SSM document operations.
//!
//! Remote failures are categorized so callers can tell recoverable
//! conditions (a document that does not exist, an update that changes
//! nothing) from fatal ones without matching on SDK error codes.

use thiserror::Error;

/// Categories of SSM document errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Document (or version) does not exist
    NotFound,
    /// Update content is identical to the latest version
    DuplicateContent,
    /// A document with this name already exists
    AlreadyExists,
    /// Content rejected by the service (schema, size, syntax)
    InvalidContent,
    /// Account-level quota reached
    LimitExceeded,
    /// Anything else: network, auth, throttling, service errors
    Transport,
}

impl ErrorCategory {
    /// Whether callers are expected to handle this locally instead of failing.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound | Self::DuplicateContent)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NotFound => "Document not found",
            Self::DuplicateContent => "Content unchanged",
            Self::AlreadyExists => "Document already exists",
            Self::InvalidContent => "Invalid document content",
            Self::LimitExceeded => "Limit exceeded",
            Self::Transport => "Request failed",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::NotFound => "Check the document name and region",
            Self::DuplicateContent => "No action needed - the document already has this content",
            Self::AlreadyExists => "Pick another name or adopt the existing document by name",
            Self::InvalidContent => "Validate the document against its schemaVersion",
            Self::LimitExceeded => "Delete unused documents or versions, or request a quota increase",
            Self::Transport => "Check credentials, region and network connectivity",
        }
    }
}

/// Errors that can occur during SSM document operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Document does not exist
    #[error("document not found: {name}")]
    NotFound {
        /// Name of the missing document
        name: String,
    },

    /// Update would not change the latest version
    #[error("document {name} already has this content")]
    DuplicateContent {
        /// Name of the document
        name: String,
    },

    /// Create collided with an existing document
    #[error("document already exists: {name}")]
    AlreadyExists {
        /// Name of the existing document
        name: String,
    },

    /// Content rejected by the service
    #[error("invalid content for document {name}: {message}")]
    InvalidContent {
        /// Name of the document
        name: String,
        /// Service message
        message: String,
    },

    /// Quota reached
    #[error("{operation} hit a service limit: {message}")]
    LimitExceeded {
        /// API operation that failed
        operation: &'static str,
        /// Service message
        message: String,
    },

    /// Any other failure, propagated unchanged
    #[error("{operation} failed: {message}")]
    Transport {
        /// API operation that failed
        operation: &'static str,
        /// Service error code, when the service returned one
        code: Option<String>,
        /// Full error message
        message: String,
    },
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::DuplicateContent { .. } => ErrorCategory::DuplicateContent,
            Error::AlreadyExists { .. } => ErrorCategory::AlreadyExists,
            Error::InvalidContent { .. } => ErrorCategory::InvalidContent,
            Error::LimitExceeded { .. } => ErrorCategory::LimitExceeded,
            Error::Transport { .. } => ErrorCategory::Transport,
        }
    }

    /// Whether the document does not exist.
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    /// Whether an update was rejected because nothing changed.
    pub fn is_duplicate_content(&self) -> bool {
        self.category() == ErrorCategory::DuplicateContent
    }

    /// Whether callers are expected to handle this locally.
    pub fn is_recoverable(&self) -> bool {
        self.category().is_recoverable()
    }

    /// Create an error from a service error code.
    ///
    /// SSM reports a missing document as `InvalidDocument` on most
    /// operations; `DocumentNotFoundException` is accepted as well.
    pub fn from_code(
        operation: &'static str,
        name: &str,
        code: Option<&str>,
        message: &str,
    ) -> Self {
        match code {
            Some("InvalidDocument" | "DocumentNotFoundException") => Error::NotFound {
                name: name.to_string(),
            },
            Some("DuplicateDocumentContent") => Error::DuplicateContent {
                name: name.to_string(),
            },
            Some("DocumentAlreadyExists") => Error::AlreadyExists {
                name: name.to_string(),
            },
            Some(
                "InvalidDocumentContent" | "InvalidDocumentSchemaVersion" | "MaxDocumentSizeExceeded",
            ) => Error::InvalidContent {
                name: name.to_string(),
                message: message.trim().to_string(),
            },
            Some(
                "DocumentLimitExceeded" | "DocumentVersionLimitExceeded" | "DocumentPermissionLimit",
            ) => Error::LimitExceeded {
                operation,
                message: message.trim().to_string(),
            },
            _ => Error::Transport {
                operation,
                code: code.map(str::to_string),
                message: message.trim().to_string(),
            },
        }
    }
}

/// Result type for SSM document operations.
pub type Result<T> = std::result::Result<T, Error>;
