//! Blueprint wrapper and attribute classification

use std::collections::HashMap;

use tracing::warn;

use super::attribute::Attribute;
use super::tags::Tags;
use super::{BlueprintDef, RelationshipType};

/// Named attributes that must have a specific value type
const NAMED_ATTRIBUTE_TYPES: &[(&str, &str)] = &[
    ("name", "string"),
    ("geoPosition", "geoPoint"),
    ("icon", "string"),
];

fn named_type_matches(name: &str, value_type: &str) -> bool {
    NAMED_ATTRIBUTE_TYPES
        .iter()
        .find(|(n, _)| *n == name)
        .map_or(true, |(_, t)| *t == value_type)
}

/// Options for building a blueprint
#[derive(Debug, Clone)]
pub struct BlueprintOptions {
    /// Use the blueprint alias as its type when one is set
    pub use_aliases: bool,
}

impl Default for BlueprintOptions {
    fn default() -> Self {
        Self { use_aliases: true }
    }
}

impl BlueprintOptions {
    pub fn with_aliases(mut self, use_aliases: bool) -> Self {
        self.use_aliases = use_aliases;
        self
    }
}

/// Attribute indices per bucket; every attribute lands in exactly one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBuckets {
    /// Collections, `is:hidden` attributes and non-forwarding one-to-ones
    pub hidden: Vec<usize>,
    /// Plain fields of the blueprint itself
    pub local: Vec<usize>,
    /// One-to-one relationships that forward their target's data
    pub child: Vec<usize>,
    /// References to the parent
    pub parent: Vec<usize>,
}

/// Extension point for binding a blueprint to external data
pub trait DataSourceProvider {
    /// Name of the live data source, if bound
    fn data_source(&self) -> Option<&str> {
        None
    }

    /// Name of the history data source, if bound
    fn history_data_source(&self) -> Option<&str> {
        None
    }
}

/// A data-model type and its classified attributes
#[derive(Debug, Clone)]
pub struct Blueprint {
    def: BlueprintDef,
    type_name: String,
    history_type: String,
    tags: Tags,
    attributes: Vec<Attribute>,
    buckets: AttributeBuckets,
    named: HashMap<String, usize>,
}

impl Blueprint {
    pub fn new(mut def: BlueprintDef, options: &BlueprintOptions) -> Self {
        let type_name = match &def.alias {
            Some(alias) if options.use_aliases && !alias.is_empty() => alias.clone(),
            _ => def.id.clone(),
        };
        let attributes = std::mem::take(&mut def.attributes)
            .into_iter()
            .map(Attribute::new)
            .collect();
        let tags = Tags::from(def.tags.clone());

        let mut bp = Self {
            history_type: format!("{type_name}.history"),
            type_name,
            tags,
            attributes,
            buckets: AttributeBuckets::default(),
            named: HashMap::new(),
            def,
        };
        bp.itemize();
        bp
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    /// Registry key: the alias when aliases are enabled, otherwise the id
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn history_type(&self) -> &str {
        &self.history_type
    }

    pub fn alias(&self) -> Option<&str> {
        self.def.alias.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.def.name.as_deref()
    }

    pub fn name_plural(&self) -> Option<&str> {
        self.get_string("namePlural").or_else(|| self.name())
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
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

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn get_attribute(&self, path: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.path() == path)
    }

    /// Relationship-typed attributes in declaration order
    pub fn relationship_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_relationship())
    }

    pub fn has_relationships(&self, ignore_one_to_one: bool) -> bool {
        self.relationship_attributes()
            .any(|a| !ignore_one_to_one || a.relationship_type() != Some(RelationshipType::OneToOne))
    }

    pub fn buckets(&self) -> &AttributeBuckets {
        &self.buckets
    }

    fn bucket<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a Attribute> {
        indices.iter().map(move |&i| &self.attributes[i])
    }

    pub fn hidden_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.bucket(&self.buckets.hidden)
    }

    pub fn local_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.bucket(&self.buckets.local)
    }

    pub fn child_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.bucket(&self.buckets.child)
    }

    pub fn parent_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.bucket(&self.buckets.parent)
    }

    /// Attribute registered under a semantic name (`name`, `geoPosition`, ...)
    pub fn named_attribute(&self, name: &str) -> Option<&Attribute> {
        self.named.get(name).map(|&i| &self.attributes[i])
    }

    pub fn named_attribute_keys(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    pub fn has_geo_position(&self) -> bool {
        self.named.contains_key("geoPosition")
    }

    pub fn get_icon(&self, key: &str) -> Option<&str> {
        self.def.metadata.as_ref()?.icons.get(key).map(String::as_str)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.def.metadata.as_ref()?.strings.get(key).map(String::as_str)
    }

    /// Sort every attribute into one bucket and collect named attributes
    fn itemize(&mut self) {
        let mut buckets = AttributeBuckets::default();
        let mut possible_name = None;
        let mut possible_geo_position = None;

        for index in 0..self.attributes.len() {
            let attr = &self.attributes[index];

            if attr.is_collection() || attr.tags().hidden {
                buckets.hidden.push(index);
            } else if attr.is_one_to_one() {
                if attr.forward_data() {
                    buckets.child.push(index);
                } else {
                    buckets.hidden.push(index);
                }
            } else if attr.is_parent_relationship() {
                buckets.parent.push(index);
                self.register_aliases(index);
            } else {
                buckets.local.push(index);
                let attr = &self.attributes[index];
                let is_string = attr.value_type() == "string";
                let is_geo_point = attr.value_type() == "geoPoint";
                let is_name = is_string && attr.tags().is_name;
                let is_geo_position = is_geo_point && attr.tags().is_geo_position;
                let named_name = attr.path() == "name";
                let named_position = attr.path() == "position";

                if is_name {
                    self.set_named_attribute("name", index);
                } else if named_name && is_string && possible_name.is_none() {
                    possible_name = Some(index);
                }
                if is_geo_position {
                    self.set_named_attribute("geoPosition", index);
                } else if named_position && is_geo_point && possible_geo_position.is_none() {
                    possible_geo_position = Some(index);
                }

                self.register_aliases(index);
            }
        }

        // Heuristic candidates only apply when nothing was declared explicitly
        if let Some(index) = possible_geo_position {
            self.named.entry("geoPosition".to_string()).or_insert(index);
        }
        if let Some(index) = possible_name {
            self.named.entry("name".to_string()).or_insert(index);
        }

        self.buckets = buckets;
    }

    /// Register every `attribute:<name>` tag that passes the type table
    fn register_aliases(&mut self, index: usize) {
        let attr = &self.attributes[index];
        let names: Vec<String> = attr
            .tags()
            .attribute_aliases
            .iter()
            .filter(|name| named_type_matches(name, attr.value_type()))
            .cloned()
            .collect();
        for name in names {
            self.set_named_attribute(&name, index);
        }
    }

    fn set_named_attribute(&mut self, name: &str, index: usize) {
        if let Some(&existing) = self.named.get(name) {
            warn!(
                blueprint = %self.type_name,
                name,
                kept = self.attributes[existing].path(),
                ignored = self.attributes[index].path(),
                "named attribute has already been specified"
            );
            return;
        }
        self.named.insert(name.to_string(), index);
    }
}

impl DataSourceProvider for Blueprint {}
