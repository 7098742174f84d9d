//! Converter registry
//!
//! Rules written as data can only name a converter. The registry maps those
//! names to functions. Cloning a registry is cheap; registering into a clone
//! copies the table first, so clones never observe each other's additions.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::converters;
use crate::rule::Converter;

/// Named converters available to rule sets
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    converters: Arc<HashMap<String, Converter>>,
}

impl ConverterRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in converters
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .insert(Converter::identity())
            .register_fallible("uppercase", converters::uppercase)
            .register_fallible("lowercase", converters::lowercase)
            .register_fallible("trim", converters::trim)
            .register_fallible("to_string", converters::to_string)
            .register_fallible("to_number", converters::to_number)
            .register_fallible("to_boolean", converters::to_boolean);
        registry
    }

    /// Register an infallible converter
    pub fn register(
        &mut self,
        name: impl Into<String>,
        func: impl Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    ) -> &mut Self {
        let name = name.into();
        self.insert(Converter::new(func).named(name))
    }

    /// Register a converter that may fail
    pub fn register_fallible(
        &mut self,
        name: impl Into<String>,
        func: impl Fn(&Value, &Value) -> crate::Result<Value> + Send + Sync + 'static,
    ) -> &mut Self {
        let name = name.into();
        self.insert(Converter::fallible(func).named(name))
    }

    fn insert(&mut self, converter: Converter) -> &mut Self {
        let name = converter.name().unwrap_or_default().to_string();
        Arc::make_mut(&mut self.converters).insert(name, converter);
        self
    }

    /// Get a converter by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Converter> {
        self.converters.get(name).cloned()
    }

    /// Check if a converter is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.converters.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.converters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered converters
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}
