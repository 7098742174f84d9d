//! Rule documents
//!
//! Rule sets written as YAML or JSON data. Converters are referenced by name
//! and defaults are constants:
//!
//! ```yaml
//! name: user_summary
//! validation: strict
//! rules:
//!   id: true
//!   displayName: name
//!   email:
//!     converter: lowercase
//!     sourcePath: contact.email
//!   role:
//!     defaultTo: guest
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::config::{TransformerConfig, ValidationMode};
use crate::registry::ConverterRegistry;
use crate::rule::{ConverterRef, DefaultTo, ExplicitRule, PathRef, RawRule, RuleSet};
use crate::transformer::Transformer;

/// A parsed rule document
#[derive(Debug, Clone)]
pub struct RuleDocument {
    /// Optional document name
    pub name: Option<String>,

    /// Validation mode requested by the document
    pub validation: ValidationMode,

    /// Rules in document order
    pub rules: RuleSet,
}

impl RuleDocument {
    /// Build a transformer using the document's validation mode and the
    /// given converters
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidRule`] for the first malformed rule when
    /// the document asks for strict validation.
    pub fn transformer(&self, converters: &ConverterRegistry) -> crate::Result<Transformer> {
        let config = TransformerConfig::new()
            .with_validation(self.validation)
            .with_converters(converters.clone());
        Transformer::with_config(&self.rules, &config)
    }
}

#[derive(Deserialize)]
struct DocumentFile {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    validation: ValidationMode,

    #[serde(default)]
    rules: Map<String, Value>,
}

impl From<DocumentFile> for RuleDocument {
    fn from(file: DocumentFile) -> Self {
        Self {
            name: file.name,
            validation: file.validation,
            rules: file
                .rules
                .into_iter()
                .map(|(key, value)| (key, RawRule::from_value(value)))
                .collect(),
        }
    }
}

impl RawRule {
    /// Interpret one data-form rule by its shape
    ///
    /// Booleans keep or drop, strings alias a source path, objects are
    /// explicit rules. Numbers, arrays, and `null` are unsupported.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Bool(keep) => RawRule::Keep(keep),
            Value::String(source) => RawRule::Alias(source),
            Value::Object(fields) => RawRule::Explicit(explicit_from_fields(fields)),
            other @ (Value::Null | Value::Number(_) | Value::Array(_)) => {
                RawRule::Unsupported(other)
            }
        }
    }
}

fn explicit_from_fields(fields: Map<String, Value>) -> ExplicitRule {
    let mut rule = ExplicitRule::new();
    for (field, value) in fields {
        match field.as_str() {
            "converter" => {
                rule.converter = Some(match value {
                    Value::String(name) => ConverterRef::Named(name),
                    other => ConverterRef::Invalid(other),
                });
            }
            "sourcePath" => rule.source_path = Some(path_ref(value)),
            "destinationPath" => rule.destination_path = Some(path_ref(value)),
            "defaultTo" => rule.default_to = Some(DefaultTo::Value(value)),
            _ => trace!(field = %field, "ignoring unknown rule field"),
        }
    }
    rule
}

fn path_ref(value: Value) -> PathRef {
    match value {
        Value::String(path) => PathRef::Path(path),
        other => PathRef::Invalid(other),
    }
}

/// Rule document parser
pub struct RuleDsl;

/// Parse error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl ParseError {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, " at line {line}, column {col}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl RuleDsl {
    /// Parse a rule document from YAML
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Parse`] when YAML parsing fails.
    pub fn parse_yaml(yaml: &str) -> crate::Result<RuleDocument> {
        let file = serde_yaml::from_str::<DocumentFile>(yaml).map_err(|e| ParseError {
            message: format!("Failed to parse rule document: {e}"),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
        })?;
        Ok(file.into())
    }

    /// Parse a rule document from JSON
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Parse`] when JSON parsing fails.
    pub fn parse_json(json: &str) -> crate::Result<RuleDocument> {
        let file = serde_json::from_str::<DocumentFile>(json).map_err(|e| ParseError {
            message: format!("Failed to parse rule document: {e}"),
            line: Some(e.line()),
            column: Some(e.column()),
        })?;
        Ok(file.into())
    }

    /// Parse a rule document from a file; `.json` files are read as JSON,
    /// everything else as YAML
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Parse`] when the file cannot be read or parsed.
    pub fn parse_file(path: &std::path::Path) -> crate::Result<RuleDocument> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ParseError::message(format!("Failed to read file: {e}")))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse_yaml(&content)
        }
    }
}
