//! Blueprint Paths - Relationship path templates for a blueprint data model
//!
//! This library loads blueprint definitions, derives a tree of relationships
//! from them, and resolves each relationship's reference and url templates
//! against concrete identifiers.
//!
//! # Example
//!
//! ```rust
//! use blueprint_paths::{analyze, parse_definitions, AnalyzerConfig, Match};
//!
//! let defs = parse_definitions(r#"[
//!     {"id": "bp-device", "alias": "device", "attributes": []}
//! ]"#).unwrap();
//! let analysis = analyze(defs, &AnalyzerConfig::new()).unwrap();
//!
//! let device = analysis.relationships.get_by_path("device").unwrap();
//! let resolved = device.create_resolved(Match::from_pairs([("systemId", "S1")]));
//! assert_eq!(resolved.url(), Some("v1/interface/S1/device"));
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod path;
pub mod relationship;
pub mod report;

use std::sync::Arc;

pub use config::{AnalyzerConfig, ConfigError};
pub use error::{AnalyzeError, RelationshipError};
pub use model::{
    load_definitions, parse_definitions, Attribute, Blueprint, BlueprintDef, BlueprintRegistry,
    LoadError, RelationshipType,
};
pub use path::{Match, PathResolver};
pub use relationship::{
    BlueprintLink, BlueprintRelationship, ObjRef, Relationship, RelationshipAnalyzer,
    Relationships,
};
pub use report::{format_routes, summarize, RouteSummary};

/// Everything one analysis run produces
#[derive(Debug, Clone)]
pub struct Analysis {
    pub blueprints: BlueprintRegistry,
    /// Path lookup of every relationship
    pub relationships: Relationships<BlueprintLink>,
    /// Roots and children in creation order
    pub routes: Vec<Arc<BlueprintRelationship>>,
    /// Shared by every relationship in `routes`
    pub resolver: PathResolver,
}

/// Build blueprints from definitions and analyze their relationships
pub fn analyze(
    defs: impl IntoIterator<Item = BlueprintDef>,
    config: &AnalyzerConfig,
) -> Result<Analysis, AnalyzeError> {
    let blueprints = BlueprintRegistry::from_definitions(defs, &config.blueprint_options());
    let resolver = PathResolver::new();
    let mut relationships = Relationships::new();
    let routes = RelationshipAnalyzer::new(&blueprints, config)
        .with_resolver(resolver.clone())
        .run(&mut relationships)?;

    Ok(Analysis {
        blueprints,
        relationships,
        routes,
        resolver,
    })
}
