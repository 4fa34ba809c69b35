//! Accessor wrapper around one blueprint attribute

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::registry::BlueprintRegistry;
use super::tags::Tags;
use super::units::UnitCatalog;
use super::{AttributeDef, Blueprint, RelationshipType};

const RELATIONSHIP: &str = "relationship";
const PARENT_RELATIONSHIP: &str = "parentRelationship";

/// Search index type an attribute maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchType {
    String,
    Number,
    Boolean,
    Date,
    GeoPoint,
    GeoShape,
    Shape,
    Ip,
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchType::String => "string",
            SearchType::Number => "number",
            SearchType::Boolean => "boolean",
            SearchType::Date => "date",
            SearchType::GeoPoint => "geoPoint",
            SearchType::GeoShape => "geoShape",
            SearchType::Shape => "shape",
            SearchType::Ip => "ip",
        };
        f.write_str(s)
    }
}

/// A blueprint attribute with convenience queries
///
/// Attributes never hold their blueprint or the registry; lookups that need
/// other blueprints take the registry as an argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    def: AttributeDef,
    tags: Tags,
}

impl Attribute {
    pub fn new(def: AttributeDef) -> Self {
        let tags = Tags::from(def.tags.clone());
        Self { def, tags }
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn name(&self) -> Option<&str> {
        self.def.name.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.def.path
    }

    pub fn parent_path(&self) -> Option<&str> {
        self.def.parent_path.as_deref()
    }

    /// Declared value type (`string`, `relationship`, a unit family, ...)
    pub fn value_type(&self) -> &str {
        &self.def.value_type
    }

    pub fn source(&self) -> Option<&str> {
        self.def.source.as_deref()
    }

    /// Whether a one-to-one relationship forwards its target's data
    pub fn forward_data(&self) -> bool {
        self.def.forward_data
    }

    pub fn is_collection(&self) -> bool {
        self.def.is_collection
    }

    pub fn owned(&self) -> bool {
        self.def.owned
    }

    pub fn relationship_type(&self) -> Option<RelationshipType> {
        self.def.relationship_type
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Blueprint id this relationship points at; only set for relationships
    pub fn target_blueprint_id(&self) -> Option<&str> {
        if self.is_relationship() {
            self.def.target_blueprint_id.as_deref()
        } else {
            None
        }
    }

    /// Blueprint id of the parent; only set for parent relationships
    pub fn source_blueprint_id(&self) -> Option<&str> {
        if self.is_parent_relationship() {
            self.def.source_blueprint_id.as_deref()
        } else {
            None
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.has(tag)
    }

    pub fn get_tag_starting_with(&self, prefix: &str, strip: bool) -> Option<&str> {
        self.tags.starting_with(prefix, strip)
    }

    pub fn get_tags_starting_with(&self, prefix: &str, strip: bool) -> Vec<&str> {
        self.tags.all_starting_with(prefix, strip)
    }

    /// Blueprint this relationship points at, looked up on every call
    pub fn target_blueprint<'r>(&self, registry: &'r BlueprintRegistry) -> Option<&'r Arc<Blueprint>> {
        self.target_blueprint_id().and_then(|id| registry.get(id))
    }

    /// Blueprint of the parent this attribute refers to
    pub fn parent_relationship_blueprint<'r>(
        &self,
        registry: &'r BlueprintRegistry,
    ) -> Option<&'r Arc<Blueprint>> {
        self.source_blueprint_id().and_then(|id| registry.get(id))
    }

    pub fn search_type(&self) -> SearchType {
        match self.value_type() {
            "string" | "relationship" | "parentRelationship" | "enum" | "resourceEnum" => {
                SearchType::String
            }
            "int" | "number" | "percent" => SearchType::Number,
            "boolean" => SearchType::Boolean,
            "timestamp" => SearchType::Date,
            "geoPoint" => SearchType::GeoPoint,
            "geoJson" => SearchType::GeoShape,
            "shape" => SearchType::Shape,
            "ip" => SearchType::Ip,
            // every other type is a unit of measure
            _ => SearchType::Number,
        }
    }

    pub fn is_relationship(&self) -> bool {
        self.value_type() == RELATIONSHIP
    }

    pub fn is_parent_relationship(&self) -> bool {
        self.value_type() == PARENT_RELATIONSHIP
    }

    fn is_relationship_of(&self, kind: RelationshipType) -> bool {
        self.is_relationship() && self.def.relationship_type == Some(kind)
    }

    pub fn is_one_to_one(&self) -> bool {
        self.is_relationship_of(RelationshipType::OneToOne)
    }

    pub fn is_one_to_many(&self) -> bool {
        self.is_relationship_of(RelationshipType::OneToMany)
    }

    pub fn is_many_to_one(&self) -> bool {
        self.is_relationship_of(RelationshipType::ManyToOne)
    }

    pub fn is_many_to_many(&self) -> bool {
        self.is_relationship_of(RelationshipType::ManyToMany)
    }

    pub fn is_unit(&self, catalog: &impl UnitCatalog) -> bool {
        catalog.is_unit_type(self.value_type())
    }

    /// Icon for the given purpose from metadata
    pub fn get_icon(&self, key: &str) -> Option<&str> {
        self.def.metadata.as_ref()?.icons.get(key).map(String::as_str)
    }

    /// Display string for the given purpose from metadata
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.def.metadata.as_ref()?.strings.get(key).map(String::as_str)
    }
}
