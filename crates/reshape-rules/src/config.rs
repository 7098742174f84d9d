//! Transformer configuration and validation modes

use serde::{Deserialize, Serialize};

use crate::registry::ConverterRegistry;

/// How canonicalization treats a malformed rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Fail with a typed error naming the malformed field
    #[default]
    Strict,

    /// Drop the malformed rule with a warning and keep going
    Permissive,
}

/// Settings used when building a [`crate::Transformer`]
#[derive(Debug, Clone)]
pub struct TransformerConfig {
    /// Validation mode for canonicalization
    pub validation: ValidationMode,

    /// Converters available to rules that reference one by name
    pub converters: ConverterRegistry,
}

impl TransformerConfig {
    /// Strict validation with the built-in converters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the validation mode
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    /// Replace the converter registry
    #[must_use]
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            validation: ValidationMode::default(),
            converters: ConverterRegistry::with_builtins(),
        }
    }
}
