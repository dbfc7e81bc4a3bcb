//! Caller-supplied inputs describing one document.
//!
//! Inputs are read from a TOML, YAML or JSON file. Keys use camelCase
//! (`shellScriptPath`, `accountIds`, `setDefaultVersion`) in every format.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use ssmkit::{DocumentFormat, DocumentType};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Region used when inputs do not name one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Inputs files looked up in the working directory, in order
pub const DEFAULT_INPUT_FILES: [&str; 4] =
    ["ssmdoc.toml", "ssmdoc.yml", "ssmdoc.yaml", "ssmdoc.json"];

/// Format requested by the caller.
///
/// `SHELL` is not a service format: it turns a shell script into a JSON
/// command document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InputFormat {
    Json,
    Yaml,
    Text,
    Shell,
}

impl InputFormat {
    /// Service format, or `None` for shell scripts.
    pub fn document_format(self) -> Option<DocumentFormat> {
        match self {
            Self::Json => Some(DocumentFormat::Json),
            Self::Yaml => Some(DocumentFormat::Yaml),
            Self::Text => Some(DocumentFormat::Text),
            Self::Shell => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Text => "TEXT",
            Self::Shell => "SHELL",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("SHELL") {
            return Ok(Self::Shell);
        }
        match s.parse::<DocumentFormat>()? {
            DocumentFormat::Json => Ok(Self::Json),
            DocumentFormat::Yaml => Ok(Self::Yaml),
            DocumentFormat::Text => Ok(Self::Text),
        }
    }
}

impl TryFrom<String> for InputFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InputFormat> for String {
    fn from(value: InputFormat) -> Self {
        value.as_str().to_string()
    }
}

/// Everything a caller can say about a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inputs {
    /// Document name; generated from the instance identity when absent
    #[serde(default)]
    pub name: Option<String>,

    /// Target region (default: us-east-1)
    #[serde(default)]
    pub region: Option<String>,

    /// Document type (default: Command)
    #[serde(default, rename = "type")]
    pub document_type: Option<DocumentType>,

    #[serde(default)]
    pub format: Option<InputFormat>,

    /// Inline content: a string, or a structured JSON/YAML/TOML value
    #[serde(default)]
    pub content: Option<Value>,

    /// Directory or `.zip` archive holding content files
    #[serde(default)]
    pub src: Option<String>,

    /// Content file relative to `src`
    #[serde(default)]
    pub file: Option<String>,

    /// Shell script wrapped into a command document
    #[serde(default)]
    pub shell_script_path: Option<String>,

    /// Description of a generated shell document
    #[serde(default)]
    pub description: Option<String>,

    /// Parameters of a generated shell document
    #[serde(default)]
    pub parameters: Option<Value>,

    /// Accounts the document is shared with (`all` for public)
    #[serde(default, deserialize_with = "deserialize_account_ids")]
    pub account_ids: Vec<String>,

    /// Promote each new version to the default version
    #[serde(default)]
    pub set_default_version: bool,
}

impl Inputs {
    /// Region to deploy to.
    pub fn region(&self) -> &str {
        self.region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REGION)
    }

    /// Name given by the caller, if any.
    pub fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Load inputs from a file, picking the parser from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read inputs file: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let inputs = Self::parse(&content, &extension)
            .with_context(|| format!("Failed to parse inputs file: {}", path.display()))?;

        log::debug!("Loaded inputs from {}", path.display());
        Ok(inputs)
    }

    fn parse(content: &str, extension: &str) -> Result<Self> {
        let inputs = match extension {
            "toml" => toml::from_str(content)?,
            "yml" | "yaml" => serde_yaml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            other => bail!("Unsupported inputs file extension: '{other}' (use toml, yaml or json)"),
        };
        Ok(inputs)
    }

    /// Find the default inputs file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_INPUT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }
}

/// Account ids may be written as numbers in YAML/TOML/JSON.
fn deserialize_account_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AccountId {
        Text(String),
        Number(u64),
    }

    let ids = Option::<Vec<AccountId>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(ids
        .into_iter()
        .map(|id| match id {
            AccountId::Text(s) => s,
            // Account ids are 12 digits; numbers lose leading zeros
            AccountId::Number(n) => format!("{n:012}"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_toml() {
        let inputs = Inputs::parse(
            r#"
name = "run-migrations"
region = "eu-west-1"
type = "Automation"
format = "yaml"
src = "./docs"
file = "migrate.yml"
accountIds = ["111111111111", "all"]
setDefaultVersion = true
"#,
            "toml",
        )
        .unwrap();

        assert_eq!(inputs.explicit_name(), Some("run-migrations"));
        assert_eq!(inputs.region(), "eu-west-1");
        assert_eq!(inputs.document_type, Some(DocumentType::Automation));
        assert_eq!(inputs.format, Some(InputFormat::Yaml));
        assert_eq!(inputs.file.as_deref(), Some("migrate.yml"));
        assert_eq!(inputs.account_ids, vec!["111111111111", "all"]);
        assert!(inputs.set_default_version);
    }

    #[test]
    fn test_parse_yaml_structured_content_and_numeric_accounts() {
        let inputs = Inputs::parse(
            r#"
content:
  schemaVersion: "2.2"
  mainSteps: []
accountIds:
  - 111111111111
  - 12345
"#,
            "yaml",
        )
        .unwrap();

        assert!(inputs.content.as_ref().is_some_and(Value::is_object));
        assert_eq!(inputs.account_ids, vec!["111111111111", "000000012345"]);
        assert_eq!(inputs.region(), DEFAULT_REGION);
    }

    #[test]
    fn test_parse_json_shell() {
        let inputs = Inputs::parse(
            r#"{"shellScriptPath": "setup.sh", "description": "Bootstrap", "format": "SHELL"}"#,
            "json",
        )
        .unwrap();

        assert_eq!(inputs.shell_script_path.as_deref(), Some("setup.sh"));
        assert_eq!(inputs.format, Some(InputFormat::Shell));
        assert!(!inputs.set_default_version);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Inputs::parse(r#"{"format": "XML"}"#, "json").is_err());
        assert!(Inputs::parse("name: x", "ini").is_err());
    }

    #[test]
    fn test_blank_name_and_region() {
        let inputs = Inputs {
            name: Some("  ".to_string()),
            region: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(inputs.explicit_name(), None);
        assert_eq!(inputs.region(), DEFAULT_REGION);
    }

    #[test]
    fn test_input_format_strings() {
        assert_eq!("shell".parse::<InputFormat>(), Ok(InputFormat::Shell));
        assert_eq!("yml".parse::<InputFormat>(), Ok(InputFormat::Yaml));
        assert_eq!(InputFormat::Text.to_string(), "TEXT");
        assert_eq!(InputFormat::Shell.document_format(), None);
    }

    #[test]
    fn test_load_and_discover() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Inputs::discover(dir.path()), None);

        fs::write(dir.path().join("ssmdoc.yaml"), "name: from-yaml\n").unwrap();
        fs::write(dir.path().join("ssmdoc.json"), r#"{"name": "from-json"}"#).unwrap();

        let found = Inputs::discover(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("ssmdoc.yaml"));

        let inputs = Inputs::load(&found).unwrap();
        assert_eq!(inputs.explicit_name(), Some("from-yaml"));
    }
}
