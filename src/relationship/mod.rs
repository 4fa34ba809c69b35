//! Relationship trees over the blueprint model
//!
//! Every blueprint gets a root relationship, and every relationship attribute
//! becomes a child one level deeper. Each node carries path templates that
//! can be bound to concrete identifiers:
//!
//! ```text
//! dealer                   ref :systemId/dealer
//!                          url v1/interface/:systemId/dealer
//! dealer.vehicles          ref :systemId/dealer/:dealerId/vehicles
//!                          url v1/interface/:systemId/dealer/:dealerId/vehicles
//! dealer.vehicles.tracker  ref :systemId/dealer/:dealerId/vehicles/:vehicleId
//!                          url v1/interface/:systemId/dealer/:dealerId/vehicles/:vehicleId/tracker
//! ```

mod analyzer;
mod kind;
mod node;
mod registry;

pub use analyzer::{BlueprintRelationship, RelationshipAnalyzer};
pub use kind::{AttributeRef, BlueprintLink, ChainLink, Plain, RelationshipKind};
pub use node::{ChildOptions, ObjRef, Relationship, RelationshipBuilder, RelationshipOptions};
pub use registry::{RelationshipList, Relationships, RelationshipsByPath};
