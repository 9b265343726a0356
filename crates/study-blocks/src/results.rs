use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use study_core::{ErrorInfo, StudyError};
use study_registry::Available;

/// Metric values keyed by qualified metric name, in computation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultsStore {
    values: IndexMap<String, Value>,
}

impl ResultsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a metric value. Each qualified name can be stored once.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Result<(), StudyError> {
        let name = name.into();
        if self.values.contains_key(&name) {
            return Err(StudyError::Config(
                ErrorInfo::new(
                    "results_duplicate",
                    format!("metric '{name}' computed more than once"),
                )
                .with_context("metric", name)
                .with_hint("give repeated metric entries distinct instance names"),
            ));
        }
        self.values.insert(name, value);
        Ok(())
    }

    /// Value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Stored names in computation order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    /// Stored `(name, value)` pairs in computation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of stored metrics.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no metric has been stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Available for ResultsStore {
    fn provides(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}
