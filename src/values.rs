use crate::error::ValueError;
use crate::model::{NodeConfiguration, Value};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Supplies the current value of a parameter by key.
pub trait ValueSource {
    /// `None` when the parameter is unset or unknown.
    fn value_of(&self, key: &str) -> Option<&Value>;
}

impl ValueSource for NodeConfiguration {
    fn value_of(&self, key: &str) -> Option<&Value> {
        self.parameter(key).and_then(|p| p.value.as_ref())
    }
}

/// A detached set of parameter values, e.g. loaded from a workflow's settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueStore {
    values: AHashMap<String, Value>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every set value in a configuration.
    pub fn from_configuration(config: &NodeConfiguration) -> Self {
        let values = config
            .parameters()
            .iter()
            .filter_map(|p| p.value.clone().map(|v| (p.key.clone(), v)))
            .collect();
        Self { values }
    }

    /// Reads a JSON object mapping parameter keys to values.
    pub fn from_json(json: &str) -> Result<Self, ValueError> {
        serde_json::from_str(json).map_err(|e| ValueError::Load(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ValueError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ValueError::Load(format!("'{}': {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, ValueError> {
        serde_json::to_string_pretty(self).map_err(|e| ValueError::Load(e.to_string()))
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

impl ValueSource for ValueStore {
    fn value_of(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

impl NodeConfiguration {
    /// Type-checks and assigns every value in `store`.
    ///
    /// Keys are applied in sorted order so the first reported error is deterministic.
    pub fn apply_values(&mut self, store: &ValueStore) -> Result<(), ValueError> {
        let mut entries: Vec<(&String, &Value)> = store.values.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in entries {
            self.set_value(key, value.clone())?;
        }
        Ok(())
    }
}
