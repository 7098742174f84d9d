#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # reshape-rules
//!
//! Declarative object reshaping driven by rule sets.
//!
//! A [`RuleSet`] maps destination paths to rules written in one of four
//! shorthand forms. Rules are first canonicalized into [`CanonicalRule`]s and
//! then applied to a source `serde_json::Value`, producing a new value and
//! leaving the source untouched.
//!
//! ```
//! use reshape_rules::{Converter, ExplicitRule, RuleSet, serialize};
//! use serde_json::json;
//!
//! let rules = RuleSet::new()
//!     .with("id", true)
//!     .with("profile.name", "user_name")
//!     .with(
//!         "age",
//!         ExplicitRule::new().with_converter(Converter::new(|value, _| json!(value.as_i64().unwrap_or(0) + 1))),
//!     );
//!
//! let source = json!({"id": 7, "user_name": "ada", "age": 36});
//! let output = serialize(&rules, &source).unwrap();
//! assert_eq!(output, json!({"id": 7, "profile": {"name": "ada"}, "age": 37}));
//! ```

/// Applying canonical rules to source values.
pub mod apply;
/// Normalizing raw rule shorthand into canonical rules.
pub mod canonicalize;
/// Transformer configuration and validation modes.
pub mod config;
/// Built-in named converters.
pub mod converters;
/// Loading rule sets from YAML and JSON documents.
pub mod dsl;
/// Registry of named converters.
pub mod registry;
/// Raw and canonical rule types.
pub mod rule;
/// One-shot and cached transformation entry points.
pub mod transformer;

pub use apply::apply;
pub use canonicalize::{Canonicalizer, canonicalize};
pub use config::{TransformerConfig, ValidationMode};
pub use dsl::{ParseError, RuleDocument, RuleDsl};
pub use registry::ConverterRegistry;
pub use rule::{
    CanonicalRule, CanonicalRuleSet, Converter, ConverterRef, DefaultTo, ExplicitRule, PathRef,
    RawRule, RuleField, RuleSet,
};
pub use transformer::{Transformer, create_transformer, serialize};

use thiserror::Error;

/// Errors that can occur while canonicalizing or applying rules
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid rule '{key}': {reason}")]
    InvalidRule {
        key: String,
        field: RuleField,
        reason: String,
    },

    #[error("Rule '{key}' failed to convert value: {source}")]
    Conversion {
        key: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Transform error: {0}")]
    Transform(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// Build an invalid-rule error naming the malformed field.
    pub fn invalid_rule(key: impl Into<String>, field: RuleField, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            key: key.into(),
            field,
            reason: reason.into(),
        }
    }

    /// Wrap a converter failure with the key of the rule that ran it.
    pub fn conversion(key: impl Into<String>, source: Error) -> Self {
        Self::Conversion {
            key: key.into(),
            source: Box::new(source),
        }
    }

    /// Build a transform error reported by a converter.
    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
