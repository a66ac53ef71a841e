use std::collections::HashMap;

use super::convert::Converter;

/// How one raw capture converts and where it is published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingEntry {
    pub converter: Option<Converter>,
    /// Destinations in the common-schema taxonomy.
    pub ecs: Vec<String>,
    /// Destinations in the vendor taxonomy.
    pub rsa: Vec<String>,
}

impl MappingEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn convert(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn ecs(mut self, path: &str) -> Self {
        self.ecs.push(path.to_string());
        self
    }

    pub fn rsa(mut self, path: &str) -> Self {
        self.rsa.push(path.to_string());
        self
    }
}

/// Raw field name → [`MappingEntry`].
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: HashMap<String, MappingEntry>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, entry: MappingEntry) -> Self {
        self.insert(key, entry);
        self
    }

    pub fn insert(&mut self, key: &str, entry: MappingEntry) {
        self.entries.insert(key.to_string(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&MappingEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
