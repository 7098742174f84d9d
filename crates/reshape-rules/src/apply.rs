//! Rule application
//!
//! Applies canonical rules to one source value, building the output in a
//! fresh accumulator. Rules run in rule-set order, so when two destinations
//! overlap the later rule wins.

use reshape_path::{get, set_in_place};
use serde_json::{Map, Value};
use tracing::trace;

use crate::rule::{CanonicalRule, CanonicalRuleSet};
use crate::{Error, Result};

/// Apply `rules` to `source` and return the reshaped value
///
/// A rule contributes to the output when its source path holds a non-null
/// value, or when it carries a default. The source is never modified.
///
/// # Errors
///
/// Returns [`Error::Conversion`] when a converter reports a failure.
pub fn apply(rules: &CanonicalRuleSet, source: &Value) -> Result<Value> {
    let mut output = Value::Object(Map::new());

    for rule in rules.iter().filter(|rule| is_eligible(rule, source)) {
        if let Some(value) = resolve_value(rule, source)? {
            trace!(
                key = %rule.key,
                destination = %rule.destination_path,
                "writing rule output"
            );
            set_in_place(&mut output, &rule.destination_path, value);
        }
    }

    Ok(output)
}

fn present_value<'a>(rule: &CanonicalRule, source: &'a Value) -> Option<&'a Value> {
    get(source, &rule.source_path).filter(|value| !value.is_null())
}

fn is_eligible(rule: &CanonicalRule, source: &Value) -> bool {
    rule.default_to.is_some() || present_value(rule, source).is_some()
}

fn resolve_value(rule: &CanonicalRule, source: &Value) -> Result<Option<Value>> {
    if let Some(value) = present_value(rule, source) {
        return rule
            .converter
            .call(value, source)
            .map(Some)
            .map_err(|err| Error::conversion(&rule.key, err));
    }

    Ok(rule
        .default_to
        .as_ref()
        .map(|default_to| default_to.resolve(source)))
}
