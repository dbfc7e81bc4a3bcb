//! Core types for SSM documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version selector for the most recent document version.
pub const LATEST_VERSION: &str = "$LATEST";

/// Content format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    /// JSON content (the service default)
    #[serde(rename = "JSON")]
    Json,
    /// YAML content
    #[serde(rename = "YAML")]
    Yaml,
    /// Plain text content
    #[serde(rename = "TEXT")]
    Text,
}

impl DocumentFormat {
    /// Service representation of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Text => "TEXT",
        }
    }

    /// Derive a format from a file extension.
    ///
    /// The extension is uppercased; `yml` maps to YAML and `txt` to TEXT.
    pub fn from_extension(extension: &str) -> Option<Self> {
        extension.parse().ok()
    }
}

impl Default for DocumentFormat {
    fn default() -> Self {
        Self::Json
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "JSON" => Ok(Self::Json),
            "YAML" | "YML" => Ok(Self::Yaml),
            "TEXT" | "TXT" => Ok(Self::Text),
            other => Err(format!("unknown document format: {other}")),
        }
    }
}

/// Kind of document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    Command,
    Automation,
    #[serde(rename = "Automation.ChangeTemplate")]
    ChangeTemplate,
    ChangeCalendar,
    Policy,
    Session,
    Package,
    ApplicationConfiguration,
    ApplicationConfigurationSchema,
    DeploymentStrategy,
}

impl DocumentType {
    /// Service representation of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "Command",
            Self::Automation => "Automation",
            Self::ChangeTemplate => "Automation.ChangeTemplate",
            Self::ChangeCalendar => "ChangeCalendar",
            Self::Policy => "Policy",
            Self::Session => "Session",
            Self::Package => "Package",
            Self::ApplicationConfiguration => "ApplicationConfiguration",
            Self::ApplicationConfigurationSchema => "ApplicationConfigurationSchema",
            Self::DeploymentStrategy => "DeploymentStrategy",
        }
    }
}

impl Default for DocumentType {
    fn default() -> Self {
        Self::Command
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let all = [
            Self::Command,
            Self::Automation,
            Self::ChangeTemplate,
            Self::ChangeCalendar,
            Self::Policy,
            Self::Session,
            Self::Package,
            Self::ApplicationConfiguration,
            Self::ApplicationConfigurationSchema,
            Self::DeploymentStrategy,
        ];
        all.into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown document type: {s}"))
    }
}

/// A document as returned by `GetDocument`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub format: Option<DocumentFormat>,
    pub document_type: Option<DocumentType>,
    pub version: Option<String>,
    pub version_name: Option<String>,
    pub status: Option<String>,
    pub content: Option<String>,
}

/// Document metadata as returned by `DescribeDocument`, `CreateDocument`
/// and `UpdateDocument`. Never carries the content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentDescription {
    pub name: String,
    pub format: Option<DocumentFormat>,
    pub document_type: Option<DocumentType>,
    pub document_version: Option<String>,
    pub latest_version: Option<String>,
    pub default_version: Option<String>,
    pub version_name: Option<String>,
    pub status: Option<String>,
    pub hash: Option<String>,
    pub hash_type: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
}

/// Parameters for creating a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDocument {
    pub name: String,
    pub document_type: DocumentType,
    pub format: DocumentFormat,
    pub content: String,
}
