//! Walks the blueprint graph and builds the relationship tree

use std::sync::Arc;

use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::error::AnalyzeError;
use crate::model::{Blueprint, BlueprintRegistry};
use crate::path::PathResolver;

use super::kind::{AttributeRef, BlueprintLink};
use super::node::{ChildOptions, Relationship};
use super::registry::Relationships;

/// Relationship derived from blueprints
pub type BlueprintRelationship = Relationship<BlueprintLink>;

/// Builds one root relationship per blueprint and one child per
/// relationship attribute, recursively
pub struct RelationshipAnalyzer<'a> {
    blueprints: &'a BlueprintRegistry,
    config: &'a AnalyzerConfig,
    resolver: PathResolver,
}

impl<'a> RelationshipAnalyzer<'a> {
    pub fn new(blueprints: &'a BlueprintRegistry, config: &'a AnalyzerConfig) -> Self {
        Self {
            blueprints,
            config,
            resolver: PathResolver::default(),
        }
    }

    /// Resolver shared by every relationship this analyzer creates
    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Build the tree for every blueprint in presentation order
    ///
    /// Each relationship is registered in `registry` (parents before their
    /// children) and returned in the same order.
    pub fn run(
        &self,
        registry: &mut Relationships<BlueprintLink>,
    ) -> Result<Vec<Arc<BlueprintRelationship>>, AnalyzeError> {
        let mut routes = Vec::new();
        for blueprint in self.blueprints.iter() {
            let root = Arc::new(self.root(blueprint)?);
            self.register(&root, registry, &mut routes);
            self.process(&root, registry, &mut routes)?;
        }
        Ok(routes)
    }

    /// Collection root of a blueprint; roots have no relationship type
    fn root(&self, blueprint: &Arc<Blueprint>) -> Result<BlueprintRelationship, AnalyzeError> {
        let type_name = blueprint.type_name();
        let kind = BlueprintLink::root(Arc::clone(blueprint), self.config.system_id.clone());
        Ok(Relationship::builder(type_name, kind)
            .with_api_name(self.config.api_name.as_str())
            .with_object_type(type_name)
            .with_ref_path(format!(":systemId/{type_name}"))
            .with_url_path(format!("{}/{type_name}", self.config.base_url))
            .with_resolver(self.resolver.clone())
            .build()?)
    }

    fn process(
        &self,
        rel: &Arc<BlueprintRelationship>,
        registry: &mut Relationships<BlueprintLink>,
        routes: &mut Vec<Arc<BlueprintRelationship>>,
    ) -> Result<(), AnalyzeError> {
        let link = rel.kind();
        let blueprint = &link.blueprint;

        for (index, attr) in blueprint.attributes().iter().enumerate() {
            if !attr.is_relationship() {
                continue;
            }
            let target = attr.target_blueprint(self.blueprints).ok_or_else(|| {
                AnalyzeError::MissingTarget {
                    blueprint: blueprint.type_name().to_string(),
                    attribute: attr.path().to_string(),
                    target: attr.target_blueprint_id().unwrap_or_default().to_string(),
                }
            })?;
            self.check_acyclic(rel, target)?;

            let Some(attribute) = AttributeRef::new(Arc::clone(blueprint), index) else {
                continue;
            };
            let mut options = ChildOptions::new(link.child(attribute, Arc::clone(target)))
                .with_object_type(target.type_name());
            options.name = attr.name().map(str::to_string);
            options.relationship_type = attr.relationship_type();

            let child = Arc::new(rel.create_child(attr.path(), options)?);
            self.register(&child, registry, routes);
            self.process(&child, registry, routes)?;
        }
        Ok(())
    }

    /// Fail when `target` already appears on the path from the root to `rel`
    ///
    /// Expansion depends only on the blueprint, so revisiting one on the
    /// current path would recurse forever.
    fn check_acyclic(
        &self,
        rel: &Arc<BlueprintRelationship>,
        target: &Arc<Blueprint>,
    ) -> Result<(), AnalyzeError> {
        let mut lineage = vec![rel.kind().blueprint.type_name().to_string()];
        let mut current = rel.parent_template().cloned();
        while let Some(node) = current {
            lineage.push(node.kind().blueprint.type_name().to_string());
            current = node.parent_template().cloned();
        }

        if lineage.iter().any(|t| t == target.type_name()) {
            lineage.reverse();
            lineage.push(target.type_name().to_string());
            return Err(AnalyzeError::CyclicModel { chain: lineage });
        }
        Ok(())
    }

    fn register(
        &self,
        rel: &Arc<BlueprintRelationship>,
        registry: &mut Relationships<BlueprintLink>,
        routes: &mut Vec<Arc<BlueprintRelationship>>,
    ) {
        debug!(
            path = rel.path(),
            url_path = rel.url_path(),
            ref_path = rel.ref_path(),
            "registering relationship"
        );
        registry.add(Arc::clone(rel));
        routes.push(Arc::clone(rel));
    }
}
