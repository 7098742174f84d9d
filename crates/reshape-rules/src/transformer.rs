//! Transformer facade
//!
//! [`serialize`] canonicalizes and applies in one call. [`Transformer`]
//! canonicalizes once and can then be applied to any number of sources,
//! from any number of threads.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::apply::apply;
use crate::canonicalize::Canonicalizer;
use crate::config::TransformerConfig;
use crate::rule::{CanonicalRuleSet, RuleSet};
use crate::Result;

/// A rule set canonicalized once, ready to reshape many sources
#[derive(Debug, Clone)]
pub struct Transformer {
    rules: Arc<CanonicalRuleSet>,
}

impl Transformer {
    /// Canonicalize `rules` with the default configuration
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidRule`] for the first malformed rule.
    pub fn new(rules: &RuleSet) -> Result<Self> {
        Self::with_config(rules, &TransformerConfig::default())
    }

    /// Canonicalize `rules` with explicit settings
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidRule`] for the first malformed rule when
    /// validation is strict.
    pub fn with_config(rules: &RuleSet, config: &TransformerConfig) -> Result<Self> {
        let canonical = Canonicalizer::new(config).canonicalize(rules)?;
        debug!(
            rules = canonical.len(),
            validation = ?config.validation,
            "created transformer"
        );
        Ok(Self::from_canonical(canonical))
    }

    /// Wrap rules that are already canonical
    #[must_use]
    pub fn from_canonical(rules: CanonicalRuleSet) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    /// The cached canonical rules
    #[must_use]
    pub fn rules(&self) -> &CanonicalRuleSet {
        &self.rules
    }

    /// Reshape one source value
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Conversion`] when a converter fails.
    pub fn apply(&self, source: &Value) -> Result<Value> {
        apply(&self.rules, source)
    }

    /// Reshape every source in order, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns the first [`crate::Error::Conversion`] encountered.
    pub fn apply_all<'a, I>(&self, sources: I) -> Result<Vec<Value>>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        sources.into_iter().map(|source| self.apply(source)).collect()
    }
}

/// Canonicalize once and return a reusable [`Transformer`]
///
/// # Errors
///
/// Returns [`crate::Error::InvalidRule`] for the first malformed rule.
pub fn create_transformer(rules: &RuleSet) -> Result<Transformer> {
    Transformer::new(rules)
}

/// Canonicalize `rules` and apply them to `source` in one call
///
/// Equivalent to `create_transformer(rules)?.apply(source)`.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidRule`] for a malformed rule, or
/// [`crate::Error::Conversion`] when a converter fails.
pub fn serialize(rules: &RuleSet, source: &Value) -> Result<Value> {
    create_transformer(rules)?.apply(source)
}
