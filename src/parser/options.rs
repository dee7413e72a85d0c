use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Legacy housekeeping switches that never become parameters or ports.
pub const DEFAULT_IGNORED_NAMES: &[&str] = &["write_ini", "write_par", "par", "help", "ini"];

/// Root-level elements that are accepted and skipped without interpretation.
pub const DEFAULT_SKIPPED_ELEMENTS: &[&str] = &["citations"];

/// Explicit configuration for a [`CtdParser`](super::CtdParser).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Item names suppressed entirely, matched against the item's local name.
    pub ignored_names: Vec<String>,
    /// Root-level elements skipped instead of rejected.
    pub skipped_elements: Vec<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            ignored_names: DEFAULT_IGNORED_NAMES.iter().map(|s| s.to_string()).collect(),
            skipped_elements: DEFAULT_SKIPPED_ELEMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ParserOptions {
    /// Options that suppress nothing and skip nothing.
    pub fn strict() -> Self {
        Self {
            ignored_names: Vec::new(),
            skipped_elements: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(|e| ParseError::Options(e.to_string()))
    }

    /// Loads options from a JSON file. Missing fields fall back to the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ParseError::Options(format!("'{}': {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn with_ignored_name(mut self, name: impl Into<String>) -> Self {
        self.ignored_names.push(name.into());
        self
    }
}
