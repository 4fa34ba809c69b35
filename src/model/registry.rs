//! Blueprint registry and definition loading

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::blueprint::{Blueprint, BlueprintOptions};
use super::BlueprintDef;

/// Errors that can occur when loading blueprint definitions
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read blueprint definitions: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse blueprint definitions: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Envelope returned by the project blueprint listing
#[derive(Deserialize)]
struct Listing {
    items: Vec<BlueprintDef>,
}

/// Parse blueprint definitions from JSON
///
/// Accepts a bare array or a `{ "items": [...] }` listing envelope.
pub fn parse_definitions(content: &str) -> Result<Vec<BlueprintDef>, LoadError> {
    if content.trim_start().starts_with('{') {
        let listing: Listing = serde_json::from_str(content)?;
        Ok(listing.items)
    } else {
        Ok(serde_json::from_str(content)?)
    }
}

/// Read and parse blueprint definitions from a JSON file
pub fn load_definitions(path: &Path) -> Result<Vec<BlueprintDef>, LoadError> {
    let content = std::fs::read_to_string(path)?;
    parse_definitions(&content)
}

/// Lookup of every known blueprint by type and by id
///
/// Types are unique: inserting a blueprint whose type is already known
/// replaces the earlier one in place, keeping presentation order. Ids are
/// never dropped, so a replaced blueprint is still found by its id.
#[derive(Debug, Clone, Default)]
pub struct BlueprintRegistry {
    blueprints: Vec<Arc<Blueprint>>,
    by_type: HashMap<String, usize>,
    by_id: HashMap<String, Arc<Blueprint>>,
}

impl BlueprintRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build blueprints from definitions and register them in order
    pub fn from_definitions(
        defs: impl IntoIterator<Item = BlueprintDef>,
        options: &BlueprintOptions,
    ) -> Self {
        let mut registry = Self::new();
        for def in defs {
            registry.insert(Blueprint::new(def, options));
        }
        registry
    }

    /// Register a blueprint, replacing any blueprint of the same type
    pub fn insert(&mut self, blueprint: Blueprint) -> Arc<Blueprint> {
        let blueprint = Arc::new(blueprint);
        let type_name = blueprint.type_name().to_string();

        let slot = match self.by_type.get(&type_name) {
            Some(&slot) => {
                let previous = std::mem::replace(&mut self.blueprints[slot], Arc::clone(&blueprint));
                debug!(blueprint = %type_name, previous = previous.id(), "replacing blueprint");
                slot
            }
            None => {
                self.blueprints.push(Arc::clone(&blueprint));
                self.blueprints.len() - 1
            }
        };

        self.by_type.insert(type_name, slot);
        self.by_id.insert(blueprint.id().to_string(), Arc::clone(&blueprint));
        blueprint
    }

    /// Look up by id, falling back to type
    pub fn get(&self, key: &str) -> Option<&Arc<Blueprint>> {
        self.get_by_id(key).or_else(|| self.get_by_type(key))
    }

    pub fn get_by_type(&self, type_name: &str) -> Option<&Arc<Blueprint>> {
        self.by_type.get(type_name).map(|&slot| &self.blueprints[slot])
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Arc<Blueprint>> {
        self.by_id.get(id)
    }

    /// Blueprints in presentation order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Blueprint>> {
        self.blueprints.iter()
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.blueprints.iter().map(|bp| bp.type_name())
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }

    /// Drop every registered blueprint
    pub fn clear(&mut self) {
        self.blueprints.clear();
        self.by_type.clear();
        self.by_id.clear();
    }
}
