use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::{
    fiber::{FIBER_ANALYZER_NAME, FiberAnalyzer},
    traits::Analyzer,
};

/// Constructor for an analyzer variant
pub type AnalyzerConstructor = fn() -> Box<dyn Analyzer>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown analyzer variant '{0}'")]
    UnknownVariant(String),

    #[error("Analyzer variant '{0}' is already registered")]
    DuplicateVariant(String),
}

/// Factory for a fiber analyzer. Ownership passes to the caller.
pub fn create_fiber_analyzer() -> Box<dyn Analyzer> {
    Box::new(FiberAnalyzer::new())
}

/// Maps variant names to constructors
#[derive(Clone, Default)]
pub struct AnalyzerRegistry {
    constructors: BTreeMap<String, AnalyzerConstructor>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in variant
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.constructors.insert(FIBER_ANALYZER_NAME.to_string(), create_fiber_analyzer);
        registry
    }

    pub fn register(&mut self, name: &str, constructor: AnalyzerConstructor) -> Result<(), RegistryError> {
        if self.constructors.contains_key(name) {
            return Err(RegistryError::DuplicateVariant(name.to_string()));
        }
        debug!(variant = name, "registered analyzer variant");
        self.constructors.insert(name.to_string(), constructor);
        Ok(())
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn Analyzer>, RegistryError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| RegistryError::UnknownVariant(name.to_string()))?;
        Ok(constructor())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
