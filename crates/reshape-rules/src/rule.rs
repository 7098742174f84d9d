//! Rule types
//!
//! A [`RuleSet`] holds raw rules as callers write them. Canonicalization turns
//! each one into a [`CanonicalRule`] with an explicit converter and parsed
//! source and destination paths.
//!
//! The key of a rule is its destination path. The companion field of every
//! shorthand form names the source path.
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

use reshape_path::Path;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Signature shared by every converter: `(value_at_source_path, source) -> value`
pub type ConverterFn = dyn Fn(&Value, &Value) -> crate::Result<Value> + Send + Sync;

/// Signature of a default provider: `(source) -> value`
pub type DefaultFn = dyn Fn(&Value) -> Value + Send + Sync;

/// A callable that maps a source value, and the whole source object, to an
/// output value
#[derive(Clone)]
pub struct Converter {
    name: Option<String>,
    func: Arc<ConverterFn>,
}

impl Converter {
    /// Create a converter from an infallible function
    pub fn new(func: impl Fn(&Value, &Value) -> Value + Send + Sync + 'static) -> Self {
        Self::fallible(move |value, source| Ok(func(value, source)))
    }

    /// Create a converter that may report a [`crate::Error::Transform`]
    pub fn fallible(
        func: impl Fn(&Value, &Value) -> crate::Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: None,
            func: Arc::new(func),
        }
    }

    /// The converter that returns its input unchanged
    pub fn identity() -> Self {
        Self::new(|value, _| value.clone()).named("identity")
    }

    /// Attach a name, used in logs and debug output
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name given at registration, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Run the converter
    ///
    /// # Errors
    ///
    /// Returns whatever error the wrapped function reports.
    pub fn call(&self, value: &Value, source: &Value) -> crate::Result<Value> {
        (self.func)(value, source)
    }

    /// Whether both handles point at the same function
    pub fn same_as(&self, other: &Converter) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converter({})", self.name.as_deref().unwrap_or("<fn>"))
    }
}

/// Fallback used when the source path holds no value
#[derive(Clone)]
pub enum DefaultTo {
    /// A constant, cloned on every use
    Value(Value),

    /// A function of the whole source object
    Provider(Arc<DefaultFn>),
}

impl DefaultTo {
    /// Constant default
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Default computed from the source object
    pub fn provider(func: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self::Provider(Arc::new(func))
    }

    /// Produce the default for `source`
    pub fn resolve(&self, source: &Value) -> Value {
        match self {
            DefaultTo::Value(value) => value.clone(),
            DefaultTo::Provider(func) => func(source),
        }
    }
}

impl fmt::Debug for DefaultTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultTo::Value(value) => f.debug_tuple("Value").field(value).finish(),
            DefaultTo::Provider(_) => f.write_str("Provider(<fn>)"),
        }
    }
}

/// Converter as written in an explicit rule, resolved during canonicalization
#[derive(Debug, Clone)]
pub enum ConverterRef {
    /// A function supplied directly
    Function(Converter),

    /// A converter looked up by name in the [`crate::ConverterRegistry`]
    Named(String),

    /// Anything else; fails validation
    Invalid(Value),
}

/// Path as written in an explicit rule, parsed during canonicalization
#[derive(Debug, Clone, PartialEq)]
pub enum PathRef {
    /// A path string
    Path(String),

    /// Anything else; fails validation
    Invalid(Value),
}

impl From<&str> for PathRef {
    fn from(value: &str) -> Self {
        Self::Path(value.to_string())
    }
}

impl From<String> for PathRef {
    fn from(value: String) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for PathRef {
    fn from(value: &Path) -> Self {
        Self::Path(value.as_str().to_string())
    }
}

/// The object form of a rule, with every field optional
#[derive(Debug, Clone, Default)]
pub struct ExplicitRule {
    /// Converter, identity when unset
    pub converter: Option<ConverterRef>,

    /// Where to read from, the rule key when unset
    pub source_path: Option<PathRef>,

    /// Where to write to, the rule key when unset
    pub destination_path: Option<PathRef>,

    /// Fallback when the source path holds no value
    pub default_to: Option<DefaultTo>,
}

impl ExplicitRule {
    /// Create an explicit rule with nothing set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the converter function
    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(ConverterRef::Function(converter));
        self
    }

    /// Reference a registered converter by name
    pub fn with_named_converter(mut self, name: impl Into<String>) -> Self {
        self.converter = Some(ConverterRef::Named(name.into()));
        self
    }

    /// Set the source path
    pub fn with_source_path(mut self, path: impl Into<PathRef>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Override the destination path given by the rule key
    pub fn with_destination_path(mut self, path: impl Into<PathRef>) -> Self {
        self.destination_path = Some(path.into());
        self
    }

    /// Set the fallback
    pub fn with_default(mut self, default_to: DefaultTo) -> Self {
        self.default_to = Some(default_to);
        self
    }
}

/// One rule in one of its shorthand forms
#[derive(Debug, Clone)]
pub enum RawRule {
    /// `true` copies the key's path, `false` drops the rule
    Keep(bool),

    /// Copy from the named source path
    Alias(String),

    /// Convert the value at the key's path
    Convert(Converter),

    /// Object form with optional fields
    Explicit(ExplicitRule),

    /// Any other shape, dropped during canonicalization
    Unsupported(Value),
}

impl RawRule {
    /// Short name of the rule's shape, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            RawRule::Keep(_) => "boolean",
            RawRule::Alias(_) => "string",
            RawRule::Convert(_) => "function",
            RawRule::Explicit(_) => "object",
            RawRule::Unsupported(_) => "unsupported",
        }
    }
}

impl From<bool> for RawRule {
    fn from(value: bool) -> Self {
        Self::Keep(value)
    }
}

impl From<&str> for RawRule {
    fn from(value: &str) -> Self {
        Self::Alias(value.to_string())
    }
}

impl From<String> for RawRule {
    fn from(value: String) -> Self {
        Self::Alias(value)
    }
}

impl From<Converter> for RawRule {
    fn from(value: Converter) -> Self {
        Self::Convert(value)
    }
}

impl From<ExplicitRule> for RawRule {
    fn from(value: ExplicitRule) -> Self {
        Self::Explicit(value)
    }
}

/// Ordered mapping from rule key to raw rule
///
/// Keys are unique. Inserting an existing key replaces its rule and keeps its
/// position.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: Vec<(String, RawRule)>,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a rule, builder style
    pub fn with(mut self, key: impl Into<String>, rule: impl Into<RawRule>) -> Self {
        self.insert(key, rule);
        self
    }

    /// Add or replace a rule
    pub fn insert(&mut self, key: impl Into<String>, rule: impl Into<RawRule>) -> &mut Self {
        let key = key.into();
        let rule = rule.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = rule,
            None => self.entries.push((key, rule)),
        }
        self
    }

    /// Get the rule stored under `key`
    pub fn get(&self, key: &str) -> Option<&RawRule> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, rule)| rule)
    }

    /// Iterate rules in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawRule)> {
        self.entries.iter().map(|(key, rule)| (key.as_str(), rule))
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no rules
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, R> FromIterator<(K, R)> for RuleSet
where
    K: Into<String>,
    R: Into<RawRule>,
{
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        let mut rules = RuleSet::new();
        for (key, rule) in iter {
            rules.insert(key, rule);
        }
        rules
    }
}

/// Field of a rule that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    Converter,
    SourcePath,
    DestinationPath,
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuleField::Converter => "converter",
            RuleField::SourcePath => "sourcePath",
            RuleField::DestinationPath => "destinationPath",
        })
    }
}

/// A normalized rule, ready to apply
#[derive(Debug, Clone)]
pub struct CanonicalRule {
    /// Key of the raw rule this came from
    pub key: String,

    /// Always callable
    pub converter: Converter,

    /// Where the value is read from
    pub source_path: Path,

    /// Where the value is written to
    pub destination_path: Path,

    /// Fallback when the source path holds no value
    pub default_to: Option<DefaultTo>,
}

impl CanonicalRule {
    /// Express this rule in explicit object form
    pub fn to_explicit(&self) -> ExplicitRule {
        ExplicitRule {
            converter: Some(ConverterRef::Function(self.converter.clone())),
            source_path: Some(PathRef::from(&self.source_path)),
            destination_path: Some(PathRef::from(&self.destination_path)),
            default_to: self.default_to.clone(),
        }
    }
}

/// Canonical rules in rule-set order
#[derive(Debug, Clone, Default)]
pub struct CanonicalRuleSet {
    rules: Vec<CanonicalRule>,
}

impl CanonicalRuleSet {
    /// Iterate rules in application order
    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRule> {
        self.rules.iter()
    }

    /// Get the rule derived from `key`
    pub fn get(&self, key: &str) -> Option<&CanonicalRule> {
        self.rules.iter().find(|rule| rule.key == key)
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule survived canonicalization
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Re-express every rule in explicit form, keyed as before
    pub fn to_rule_set(&self) -> RuleSet {
        self.rules
            .iter()
            .map(|rule| (rule.key.clone(), rule.to_explicit()))
            .collect()
    }
}

impl FromIterator<CanonicalRule> for CanonicalRuleSet {
    fn from_iter<I: IntoIterator<Item = CanonicalRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CanonicalRuleSet {
    type Item = &'a CanonicalRule;
    type IntoIter = std::slice::Iter<'a, CanonicalRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
