//! Append-only relationship registry

use std::collections::HashMap;
use std::sync::Arc;

use super::kind::{Plain, RelationshipKind};
use super::node::Relationship;

/// Relationships in registration order
pub type RelationshipList<K> = Arc<Vec<Arc<Relationship<K>>>>;

/// Relationships keyed by their dot-joined path
pub type RelationshipsByPath<K> = Arc<HashMap<String, Arc<Relationship<K>>>>;

/// Registry of template relationships
///
/// Every `add` swaps in a fresh sequence and a fresh path lookup. Snapshots
/// handed out earlier keep seeing exactly what was registered at the time.
#[derive(Debug, Clone)]
pub struct Relationships<K = Plain> {
    all: RelationshipList<K>,
    by_path: RelationshipsByPath<K>,
}

impl<K> Default for Relationships<K> {
    fn default() -> Self {
        Self {
            all: Arc::new(Vec::new()),
            by_path: Arc::new(HashMap::new()),
        }
    }
}

impl<K: RelationshipKind> Relationships<K> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a relationship; a later relationship with the same path wins
    /// the path lookup
    pub fn add(&mut self, rel: Arc<Relationship<K>>) {
        let mut all = Vec::with_capacity(self.all.len() + 1);
        all.extend(self.all.iter().cloned());
        all.push(Arc::clone(&rel));

        let mut by_path = (*self.by_path).clone();
        by_path.insert(rel.path().to_string(), rel);

        self.all = Arc::new(all);
        self.by_path = Arc::new(by_path);
    }

    pub fn get_by_path(&self, path: &str) -> Option<Arc<Relationship<K>>> {
        self.by_path.get(path).cloned()
    }

    /// Child of `rel` registered under `<rel.path>.<child_path>`
    pub fn get_child_by_path(
        &self,
        rel: &Relationship<K>,
        child_path: &str,
    ) -> Option<Arc<Relationship<K>>> {
        self.get_by_path(&format!("{}.{}", rel.path(), child_path))
    }

    /// Snapshot of the path lookup
    pub fn get_all_by_path(&self) -> RelationshipsByPath<K> {
        Arc::clone(&self.by_path)
    }

    /// Snapshot of every registration in order
    pub fn get_all(&self) -> RelationshipList<K> {
        Arc::clone(&self.all)
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Start over with an empty registry; outstanding snapshots are untouched
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
