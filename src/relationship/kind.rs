//! Relationship kinds: the variant payload a relationship tree carries

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::model::{Attribute, Blueprint};

use super::node::RelationshipOptions;

/// Capability interface of a relationship variant
///
/// A relationship is generic over its kind, so `create_child`,
/// `create_resolved` and `create_item` always produce nodes of the caller's
/// own kind. Kinds can override naming, icons, and supply fallback
/// parameters for path resolution.
pub trait RelationshipKind: Clone + fmt::Debug + Send + Sync + 'static {
    /// Human readable name of the relationship
    fn name(&self, options: &RelationshipOptions<Self>) -> Option<String> {
        options.name.clone()
    }

    /// Icon for the given purpose
    fn icon(&self, options: &RelationshipOptions<Self>, key: &str) -> Option<String> {
        options.icons.get(key).cloned()
    }

    /// Fallback value for a `:key` path segment
    fn param(&self, _key: &str) -> Option<Cow<'_, str>> {
        None
    }
}

/// Relationship without extra payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plain;

impl RelationshipKind for Plain {}

/// Handle to one attribute of a shared blueprint
#[derive(Clone)]
pub struct AttributeRef {
    blueprint: Arc<Blueprint>,
    index: usize,
}

impl AttributeRef {
    /// Returns `None` if the blueprint has no attribute at `index`
    pub fn new(blueprint: Arc<Blueprint>, index: usize) -> Option<Self> {
        (index < blueprint.attributes().len()).then_some(Self { blueprint, index })
    }

    /// Blueprint that declares the attribute
    pub fn blueprint(&self) -> &Arc<Blueprint> {
        &self.blueprint
    }
}

impl Deref for AttributeRef {
    type Target = Attribute;

    fn deref(&self) -> &Attribute {
        &self.blueprint.attributes()[self.index]
    }
}

impl fmt::Debug for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.blueprint.type_name(), self.path())
    }
}

/// One step on the way from a root blueprint to a relationship
#[derive(Clone)]
pub enum ChainLink {
    Blueprint(Arc<Blueprint>),
    Attribute(AttributeRef),
}

impl fmt::Debug for ChainLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainLink::Blueprint(bp) => write!(f, "{}", bp.type_name()),
            ChainLink::Attribute(attr) => write!(f, "{attr:?}"),
        }
    }
}

/// Kind used for relationships derived from blueprints
#[derive(Clone)]
pub struct BlueprintLink {
    /// Value for the `:systemId` path segment
    pub system_id: Option<String>,
    /// Blueprint of the objects this relationship reaches
    pub blueprint: Arc<Blueprint>,
    /// Blueprint holding the relationship attribute
    pub parent_blueprint: Option<Arc<Blueprint>>,
    /// The relationship attribute; `None` at the root
    pub attribute: Option<AttributeRef>,
    pub chain: Vec<ChainLink>,
}

impl BlueprintLink {
    /// Kind for the collection root of `blueprint`
    pub fn root(blueprint: Arc<Blueprint>, system_id: Option<String>) -> Self {
        Self {
            system_id,
            chain: vec![ChainLink::Blueprint(Arc::clone(&blueprint))],
            blueprint,
            parent_blueprint: None,
            attribute: None,
        }
    }

    /// Kind for following `attribute` to `target`
    pub fn child(&self, attribute: AttributeRef, target: Arc<Blueprint>) -> Self {
        let mut chain = self.chain.clone();
        chain.push(ChainLink::Attribute(attribute.clone()));
        Self {
            system_id: self.system_id.clone(),
            blueprint: target,
            parent_blueprint: Some(Arc::clone(&self.blueprint)),
            attribute: Some(attribute),
            chain,
        }
    }
}

impl fmt::Debug for BlueprintLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlueprintLink")
            .field("system_id", &self.system_id)
            .field("blueprint", &self.blueprint.type_name())
            .field("attribute", &self.attribute)
            .field("chain", &self.chain)
            .finish()
    }
}

impl RelationshipKind for BlueprintLink {
    fn name(&self, options: &RelationshipOptions<Self>) -> Option<String> {
        match &self.attribute {
            Some(attr) => Some(attr.name().unwrap_or(attr.path()).to_string()),
            None => self
                .blueprint
                .name_plural()
                .map(str::to_string)
                .or_else(|| options.name.clone()),
        }
    }

    fn icon(&self, options: &RelationshipOptions<Self>, key: &str) -> Option<String> {
        self.attribute
            .as_ref()
            .and_then(|attr| attr.get_icon(key))
            .or_else(|| self.blueprint.get_icon(key))
            .map(str::to_string)
            .or_else(|| options.icons.get(key).cloned())
    }

    fn param(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "systemId" => self.system_id.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}
