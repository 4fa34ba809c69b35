//! Error types for building relationship trees

use thiserror::Error;

/// Invalid relationship construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationshipError {
    /// Non-grouped (oneToOne) relationships only exist below a parent
    #[error("relationship '{path}' is oneToOne and cannot be a root")]
    AliasWithoutParent { path: String },

    #[error("relationship '{path}' has no object type")]
    MissingObjectType { path: String },

    /// `create_child` was called without an object or relationship type
    #[error("child '{subpath}' of '{parent}' requires a {missing}")]
    IncompleteChild {
        parent: String,
        subpath: String,
        missing: &'static str,
    },
}

/// Errors that can occur while walking the blueprint graph
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Relationship(#[from] RelationshipError),

    /// A relationship attribute points at a blueprint that is not registered
    #[error("attribute '{attribute}' of blueprint '{blueprint}' targets unknown blueprint '{target}'")]
    MissingTarget {
        blueprint: String,
        attribute: String,
        target: String,
    },

    /// The target graph loops back onto a blueprint already on the current path
    #[error("cyclic blueprint model: {}", chain.join(" -> "))]
    CyclicModel { chain: Vec<String> },
}
