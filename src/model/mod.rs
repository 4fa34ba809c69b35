//! Blueprint data model
//!
//! Raw blueprint definitions arrive as JSON records from the project service.
//! They are wrapped into [`Blueprint`] and [`Attribute`] values, which classify
//! attributes and answer relationship questions, and collected into a
//! [`BlueprintRegistry`] used to resolve relationship targets.

mod attribute;
mod blueprint;
mod registry;
mod tags;
mod units;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub use attribute::{Attribute, SearchType};
pub use blueprint::{AttributeBuckets, Blueprint, BlueprintOptions, DataSourceProvider};
pub use registry::{load_definitions, parse_definitions, BlueprintRegistry, LoadError};
pub use tags::Tags;
pub use units::{UnitCatalog, Units};

/// Kind of relationship an attribute (or relationship node) describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipType {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    /// Any other value; treated like every non-oneToOne kind
    #[serde(other)]
    Other,
}

impl RelationshipType {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::OneToOne => "oneToOne",
            RelationshipType::OneToMany => "oneToMany",
            RelationshipType::ManyToOne => "manyToOne",
            RelationshipType::ManyToMany => "manyToMany",
            RelationshipType::Other => "other",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display metadata attached to blueprints and attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Icons keyed by purpose
    pub icons: HashMap<String, String>,
    /// Display strings keyed by purpose (e.g. `namePlural`)
    pub strings: HashMap<String, String>,
}

/// Read an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One field definition of a blueprint as delivered by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub path: String,
    #[serde(default)]
    pub parent_path: Option<String>,
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_collection: bool,
    #[serde(default)]
    pub relationship_type: Option<RelationshipType>,
    #[serde(default)]
    pub target_blueprint_id: Option<String>,
    #[serde(default)]
    pub source_blueprint_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub forward_data: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owned: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// A data-model type definition as delivered by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintDef {
    pub id: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Vec<AttributeDef>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}
