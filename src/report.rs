//! Route listings for analyzed relationships
//!
//! A listing shows every relationship with its url and ref templates, or,
//! when a match is given, the values they resolve to.

use std::sync::Arc;

use serde::Serialize;

use crate::path::Match;
use crate::relationship::{ObjRef, Relationship, RelationshipKind};

/// Serializable view of one relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub object_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    pub is_group: bool,
    pub id_key: String,
    pub url_path: String,
    pub ref_path: String,
    pub obj_ref_url_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obj_ref: Option<ObjRef>,
}

impl RouteSummary {
    /// Summarize `rel`, resolving it against `matched` when given
    pub fn new<K: RelationshipKind>(rel: &Relationship<K>, matched: Option<&Match>) -> Self {
        let resolved = matched.map(|m| rel.create_resolved(m.clone()));
        let resolved = resolved.as_ref();

        Self {
            path: rel.path().to_string(),
            name: rel.name(),
            object_type: rel.object_type().to_string(),
            relationship_type: rel.relationship_type().map(|t| t.to_string()),
            is_group: rel.is_group(),
            id_key: rel.id_key().to_string(),
            url_path: rel.url_path().to_string(),
            ref_path: rel.ref_path().to_string(),
            obj_ref_url_path: rel.obj_ref_url_path().to_string(),
            url: resolved.and_then(|r| r.url()).map(str::to_string),
            reference: resolved.and_then(|r| r.reference()).map(str::to_string),
            obj_ref: resolved.and_then(|r| r.obj_ref()).cloned(),
        }
    }
}

/// Summaries of `routes` in order
pub fn summarize<K: RelationshipKind>(
    routes: &[Arc<Relationship<K>>],
    matched: Option<&Match>,
) -> Vec<RouteSummary> {
    routes
        .iter()
        .map(|rel| RouteSummary::new(&**rel, matched))
        .collect()
}

/// Plain text listing, one block per relationship
pub fn format_routes(summaries: &[RouteSummary]) -> String {
    let mut out = String::new();
    for route in summaries {
        let relationship = route.relationship_type.as_deref().unwrap_or("root");
        let shape = if route.is_group { "group" } else { "alias" };
        out.push_str(&format!(
            "{} -> {} ({}, {})\n",
            route.path, route.object_type, relationship, shape
        ));
        out.push_str(&format!(
            "  url {}\n",
            route.url.as_deref().unwrap_or(&route.url_path)
        ));
        out.push_str(&format!(
            "  ref {}\n",
            route.reference.as_deref().unwrap_or(&route.ref_path)
        ));
    }
    out
}
