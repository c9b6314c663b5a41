use anyhow::Context;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::domain::SelectOption;
use crate::io::{DocumentFormat, parse_document_str};

use super::{LookupError, OptionLookup};

/// In-memory option source: lookup key to option sequence, insertion order
/// preserved.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StaticCatalog {
    entries: IndexMap<String, Vec<SelectOption>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, options: Vec<SelectOption>) -> Self {
        self.insert(key, options);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, options: Vec<SelectOption>) {
        self.entries.insert(key.into(), options);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a catalog document (object of key -> option array).
    pub fn parse_str(contents: &str, format: DocumentFormat) -> anyhow::Result<Self> {
        let value = parse_document_str(contents, format)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &serde_json::Value) -> anyhow::Result<Self> {
        serde_json::from_value(value.clone())
            .context("catalog must map lookup keys to option arrays")
    }
}

impl OptionLookup for StaticCatalog {
    fn fetch(&self, key: &str) -> Result<Vec<SelectOption>, LookupError> {
        // Unknown keys resolve empty; there is no error branch to surface.
        Ok(self.entries.get(key).cloned().unwrap_or_default())
    }
}
