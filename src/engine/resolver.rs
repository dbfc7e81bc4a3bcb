//! Turn inputs into document content and format.
//!
//! Exactly one content source wins, checked in this order:
//!
//! 1. a shell script (`shellScriptPath`, or `format = SHELL` with `file`),
//!    wrapped into a JSON command document
//! 2. an inline content string, trimmed
//! 3. inline structured content, serialized as compact JSON
//! 4. a content file read from the source
//! 5. nothing: empty content
//!
//! Resolution never touches the network.

use crate::error::{Error, Result};
use crate::inputs::{InputFormat, Inputs};
use crate::source::SourceReader;
use serde_json::{Map, Value, json};
use ssmkit::DocumentFormat;
use std::path::Path;

/// Schema version of generated shell documents
pub const SHELL_SCHEMA_VERSION: &str = "2.2";

/// Step action running a shell script on Linux instances
pub const SHELL_ACTION: &str = "aws:runShellScript";

/// Step name of generated shell documents
pub const SHELL_STEP_NAME: &str = "RunShellScript";

/// Content ready to be sent to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub format: DocumentFormat,
    pub content: String,
}

impl ResolvedContent {
    fn new(format: DocumentFormat, content: impl Into<String>) -> Self {
        Self {
            format,
            content: content.into(),
        }
    }
}

/// Resolve content and format.
///
/// `prior_format` is the format recorded by the previous deploy, used when
/// the inputs don't determine one.
pub fn resolve(
    inputs: &Inputs,
    prior_format: Option<DocumentFormat>,
    source: &dyn SourceReader,
) -> Result<ResolvedContent> {
    let requested = inputs.format.and_then(InputFormat::document_format);

    if let Some(script_path) = shell_script_path(inputs)? {
        let script = source.read_to_string(script_path)?;
        let content = shell_document(
            &script,
            inputs.description.as_deref(),
            inputs.parameters.as_ref(),
        )?;
        log::debug!("Wrapped shell script {script_path} into a command document");
        return Ok(ResolvedContent::new(DocumentFormat::Json, content));
    }

    match &inputs.content {
        Some(Value::String(text)) => {
            let format = requested.or(prior_format).unwrap_or_default();
            return Ok(ResolvedContent::new(format, text.trim()));
        }
        Some(value @ (Value::Object(_) | Value::Array(_))) => {
            return Ok(ResolvedContent::new(
                DocumentFormat::Json,
                serde_json::to_string(value)?,
            ));
        }
        Some(Value::Null) | None => {}
        Some(other) => {
            return Err(Error::InvalidInput(format!(
                "content must be a string, an object or an array, got: {other}"
            )));
        }
    }

    if let Some(file) = inputs.file.as_deref().filter(|f| !f.trim().is_empty()) {
        let format = format_for_file(file)
            .or(requested)
            .or(prior_format)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "cannot infer the document format of '{file}'; set format to JSON, YAML or TEXT"
                ))
            })?;
        let content = source.read_to_string(file)?;
        return Ok(ResolvedContent::new(format, content));
    }

    let format = requested.or(prior_format).unwrap_or_default();
    Ok(ResolvedContent::new(format, String::new()))
}

/// Script selected for shell wrapping, if any.
fn shell_script_path(inputs: &Inputs) -> Result<Option<&str>> {
    if let Some(path) = inputs.shell_script_path.as_deref() {
        return Ok(Some(path));
    }
    if inputs.format == Some(InputFormat::Shell) {
        return match inputs.file.as_deref() {
            Some(file) => Ok(Some(file)),
            None => Err(Error::source_not_found("")),
        };
    }
    Ok(None)
}

fn format_for_file(file: &str) -> Option<DocumentFormat> {
    Path::new(file)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(DocumentFormat::from_extension)
}

/// Wrap a shell script into a command document, one command per line.
pub fn shell_document(
    script: &str,
    description: Option<&str>,
    parameters: Option<&Value>,
) -> Result<String> {
    let commands: Vec<&str> = script.lines().collect();

    let mut document = Map::new();
    document.insert("schemaVersion".to_string(), json!(SHELL_SCHEMA_VERSION));
    if let Some(description) = description {
        document.insert("description".to_string(), json!(description));
    }
    if let Some(parameters) = parameters {
        document.insert("parameters".to_string(), parameters.clone());
    }
    document.insert(
        "mainSteps".to_string(),
        json!([{
            "action": SHELL_ACTION,
            "name": SHELL_STEP_NAME,
            "inputs": { "runCommand": commands },
        }]),
    );

    Ok(serde_json::to_string(&Value::Object(document))?)
}
