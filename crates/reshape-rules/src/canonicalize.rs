//! Rule canonicalization
//!
//! Every shorthand form is reduced to one [`CanonicalRule`] in four steps:
//! unsupported shapes are filtered out, each remaining rule is normalized
//! with its defaults filled in, `false` rules are dropped, and finally each
//! rule is validated. Validation runs after defaulting, so a rule that omits a
//! path is given the key and passes.

use reshape_path::Path;
use tracing::{debug, trace, warn};

use crate::config::{TransformerConfig, ValidationMode};
use crate::registry::ConverterRegistry;
use crate::rule::{
    CanonicalRule, CanonicalRuleSet, Converter, ConverterRef, DefaultTo, PathRef, RawRule,
    RuleField, RuleSet,
};
use crate::{Error, Result};

/// A rule with defaults filled in but not yet validated
#[derive(Debug)]
struct NormalizedRule {
    converter: ConverterRef,
    source_path: PathRef,
    destination_path: PathRef,
    default_to: Option<DefaultTo>,
}

/// Canonicalizes raw rule sets against a converter registry
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    mode: ValidationMode,
    converters: ConverterRegistry,
}

impl Canonicalizer {
    /// Create a canonicalizer from transformer settings
    #[must_use]
    pub fn new(config: &TransformerConfig) -> Self {
        Self {
            mode: config.validation,
            converters: config.converters.clone(),
        }
    }

    /// Canonicalize every rule in `rules`, in order
    ///
    /// # Errors
    ///
    /// In [`ValidationMode::Strict`], returns [`Error::InvalidRule`] for the
    /// first rule whose converter is not callable or whose paths are not
    /// valid path strings.
    pub fn canonicalize(&self, rules: &RuleSet) -> Result<CanonicalRuleSet> {
        let mut canonical = Vec::with_capacity(rules.len());
        let mut unsupported = 0usize;
        let mut dropped = 0usize;

        for (key, rule) in rules.iter() {
            if let RawRule::Unsupported(value) = rule {
                trace!(key, %value, "ignoring rule with unsupported shape");
                unsupported += 1;
                continue;
            }

            let Some(normalized) = normalize(key, rule) else {
                dropped += 1;
                continue;
            };

            match self.validate(key, normalized) {
                Ok(rule) => canonical.push(rule),
                Err(err) if self.mode == ValidationMode::Permissive => {
                    warn!(key, error = %err, "dropping malformed rule");
                    dropped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        debug!(
            total = rules.len(),
            canonical = canonical.len(),
            unsupported,
            dropped,
            "canonicalized rule set"
        );

        Ok(canonical.into_iter().collect())
    }

    fn validate(&self, key: &str, rule: NormalizedRule) -> Result<CanonicalRule> {
        let converter = self.resolve_converter(key, rule.converter)?;
        let source_path = parse_path(key, RuleField::SourcePath, rule.source_path)?;
        let destination_path = parse_path(key, RuleField::DestinationPath, rule.destination_path)?;

        Ok(CanonicalRule {
            key: key.to_string(),
            converter,
            source_path,
            destination_path,
            default_to: rule.default_to,
        })
    }

    fn resolve_converter(&self, key: &str, converter: ConverterRef) -> Result<Converter> {
        match converter {
            ConverterRef::Function(converter) => Ok(converter),
            ConverterRef::Named(name) => self.converters.get(&name).ok_or_else(|| {
                Error::invalid_rule(
                    key,
                    RuleField::Converter,
                    format!(
                        "{} must be a function, no converter named '{name}' is registered",
                        RuleField::Converter
                    ),
                )
            }),
            ConverterRef::Invalid(value) => Err(Error::invalid_rule(
                key,
                RuleField::Converter,
                format!("{} must be a function, got {value}", RuleField::Converter),
            )),
        }
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(&TransformerConfig::default())
    }
}

/// Canonicalize with strict validation and the built-in converters
///
/// # Errors
///
/// Returns [`Error::InvalidRule`] for the first malformed rule.
pub fn canonicalize(rules: &RuleSet) -> Result<CanonicalRuleSet> {
    Canonicalizer::default().canonicalize(rules)
}

/// Fill in the defaults for one rule; `None` means the rule is dropped
fn normalize(key: &str, rule: &RawRule) -> Option<NormalizedRule> {
    let own_path = || PathRef::Path(key.to_string());
    let identity = || ConverterRef::Function(Converter::identity());

    match rule {
        RawRule::Keep(false) | RawRule::Unsupported(_) => None,
        RawRule::Keep(true) => Some(NormalizedRule {
            converter: identity(),
            source_path: own_path(),
            destination_path: own_path(),
            default_to: None,
        }),
        RawRule::Alias(source) => Some(NormalizedRule {
            converter: identity(),
            source_path: PathRef::Path(source.clone()),
            destination_path: own_path(),
            default_to: None,
        }),
        RawRule::Convert(converter) => Some(NormalizedRule {
            converter: ConverterRef::Function(converter.clone()),
            source_path: own_path(),
            destination_path: own_path(),
            default_to: None,
        }),
        RawRule::Explicit(explicit) => Some(NormalizedRule {
            converter: explicit.converter.clone().unwrap_or_else(identity),
            source_path: explicit.source_path.clone().unwrap_or_else(own_path),
            destination_path: explicit.destination_path.clone().unwrap_or_else(own_path),
            default_to: explicit.default_to.clone(),
        }),
    }
}

fn parse_path(key: &str, field: RuleField, path: PathRef) -> Result<Path> {
    match path {
        PathRef::Path(raw) => Path::parse(&raw).map_err(|err| {
            Error::invalid_rule(key, field, format!("{field} must be a valid path: {err}"))
        }),
        PathRef::Invalid(value) => Err(Error::invalid_rule(
            key,
            field,
            format!("{field} must be a string, got {value}"),
        )),
    }
}
