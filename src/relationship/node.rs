//! Relationship nodes: path templates and their resolved instances

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde::Serialize;

use crate::error::RelationshipError;
use crate::model::RelationshipType;
use crate::path::{Match, ParamSource, Params, PathResolver};

use super::kind::{Plain, RelationshipKind};

/// Object reference produced by a resolved relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjRef {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
}

/// Immutable options of a relationship
///
/// Only built through [`RelationshipBuilder`], which applies the defaults
/// and checks the alias invariant.
#[derive(Debug, Clone)]
pub struct RelationshipOptions<K> {
    /// Api the relationship belongs to
    pub api_name: Option<String>,
    pub name: Option<String>,
    /// Dot-joined chain identifier, e.g. `dealer.vehicles`
    pub path: String,
    /// Segment this relationship contributes below its parent
    pub subpath: Option<String>,
    /// Parameterized url, e.g. `/dealer/:dealerId/vehicles`
    pub url_path: String,
    /// Parameterized ref of the container, e.g. `dealer/:dealerId/vehicles`
    pub ref_path: String,
    pub object_type: String,
    pub object_type_name: Option<String>,
    pub object_type_name_plural: Option<String>,
    /// `None` at the root
    pub relationship_type: Option<RelationshipType>,
    /// Parameter holding the id of one member, e.g. `vehicleId`
    pub id_key: String,
    /// Members are addressed through `:idKey`; false for oneToOne aliases
    pub is_group: bool,
    pub is_item: bool,
    /// Template this relationship hangs below
    pub parent: Option<Arc<Relationship<K>>>,
    pub icons: HashMap<String, String>,
    /// Fallback values for path resolution
    pub params: Params,
    pub kind: K,
    resolver: PathResolver,
    obj_ref_url_path: OnceLock<String>,
}

impl<K> RelationshipOptions<K> {
    fn validate(&self) -> Result<(), RelationshipError> {
        if !self.is_group && self.parent.is_none() {
            return Err(RelationshipError::AliasWithoutParent {
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}

impl<K: RelationshipKind> ParamSource for RelationshipOptions<K> {
    fn param(&self, key: &str) -> Option<Cow<'_, str>> {
        if let Some(value) = self.params.get(key) {
            return Some(Cow::Borrowed(value.as_str()));
        }
        let value = match key {
            "apiName" => self.api_name.as_deref(),
            "name" => self.name.as_deref(),
            "path" => Some(self.path.as_str()),
            "subpath" => self.subpath.as_deref(),
            "urlPath" => Some(self.url_path.as_str()),
            "refPath" => Some(self.ref_path.as_str()),
            "objectType" => Some(self.object_type.as_str()),
            "objectTypeName" => self.object_type_name.as_deref(),
            "idKey" => Some(self.id_key.as_str()),
            "relationshipType" => self.relationship_type.map(RelationshipType::as_str),
            _ => None,
        };
        value.map(Cow::Borrowed).or_else(|| self.kind.param(key))
    }
}

/// Builder for template relationships
#[derive(Debug, Clone)]
pub struct RelationshipBuilder<K> {
    path: String,
    kind: K,
    api_name: Option<String>,
    name: Option<String>,
    subpath: Option<String>,
    url_path: String,
    ref_path: String,
    object_type: Option<String>,
    object_type_name: Option<String>,
    object_type_name_plural: Option<String>,
    relationship_type: Option<RelationshipType>,
    id_key: Option<String>,
    is_group: Option<bool>,
    parent: Option<Arc<Relationship<K>>>,
    icons: HashMap<String, String>,
    params: Params,
    resolver: PathResolver,
}

impl<K: RelationshipKind> RelationshipBuilder<K> {
    pub fn new(path: impl Into<String>, kind: K) -> Self {
        Self {
            path: path.into(),
            kind,
            api_name: None,
            name: None,
            subpath: None,
            url_path: String::new(),
            ref_path: String::new(),
            object_type: None,
            object_type_name: None,
            object_type_name_plural: None,
            relationship_type: None,
            id_key: None,
            is_group: None,
            parent: None,
            icons: HashMap::new(),
            params: Params::new(),
            resolver: PathResolver::default(),
        }
    }

    pub fn with_api_name(mut self, api_name: impl Into<String>) -> Self {
        self.api_name = Some(api_name.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_subpath(mut self, subpath: impl Into<String>) -> Self {
        self.subpath = Some(subpath.into());
        self
    }

    pub fn with_url_path(mut self, url_path: impl Into<String>) -> Self {
        self.url_path = url_path.into();
        self
    }

    pub fn with_ref_path(mut self, ref_path: impl Into<String>) -> Self {
        self.ref_path = ref_path.into();
        self
    }

    pub fn with_object_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = Some(object_type.into());
        self
    }

    pub fn with_object_type_name(mut self, name: impl Into<String>) -> Self {
        self.object_type_name = Some(name.into());
        self
    }

    pub fn with_object_type_name_plural(mut self, name: impl Into<String>) -> Self {
        self.object_type_name_plural = Some(name.into());
        self
    }

    pub fn with_relationship_type(mut self, relationship_type: RelationshipType) -> Self {
        self.relationship_type = Some(relationship_type);
        self
    }

    /// Override the default `<objectType>Id`
    pub fn with_id_key(mut self, id_key: impl Into<String>) -> Self {
        self.id_key = Some(id_key.into());
        self
    }

    /// Override the default (grouped unless oneToOne)
    pub fn with_group(mut self, is_group: bool) -> Self {
        self.is_group = Some(is_group);
        self
    }

    /// Hang the relationship below `parent`; a bound parent is stored unbound
    pub fn with_parent(mut self, parent: &Relationship<K>) -> Self {
        self.parent = Some(Arc::new(parent.unbound()));
        self
    }

    pub fn with_icon(mut self, key: impl Into<String>, icon: impl Into<String>) -> Self {
        self.icons.insert(key.into(), icon.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn build(self) -> Result<Relationship<K>, RelationshipError> {
        let object_type = self
            .object_type
            .ok_or_else(|| RelationshipError::MissingObjectType {
                path: self.path.clone(),
            })?;
        let is_group = self
            .is_group
            .unwrap_or(self.relationship_type != Some(RelationshipType::OneToOne));

        let options = RelationshipOptions {
            id_key: self.id_key.unwrap_or_else(|| format!("{object_type}Id")),
            api_name: self.api_name,
            name: self.name,
            path: self.path,
            subpath: self.subpath,
            url_path: self.url_path,
            ref_path: self.ref_path,
            object_type,
            object_type_name: self.object_type_name,
            object_type_name_plural: self.object_type_name_plural,
            relationship_type: self.relationship_type,
            is_group,
            is_item: false,
            parent: self.parent,
            icons: self.icons,
            params: self.params,
            kind: self.kind,
            resolver: self.resolver,
            obj_ref_url_path: OnceLock::new(),
        };
        options.validate()?;

        Ok(Relationship {
            options: Arc::new(options),
            calc: Calc::default(),
        })
    }
}

/// Options for [`Relationship::create_child`]
///
/// `object_type` and `relationship_type` are required; the rest falls back to
/// the usual defaults.
#[derive(Debug, Clone, Default)]
pub struct ChildOptions<K> {
    pub name: Option<String>,
    pub object_type: Option<String>,
    pub relationship_type: Option<RelationshipType>,
    /// Inherited from the parent when unset
    pub api_name: Option<String>,
    pub id_key: Option<String>,
    pub object_type_name: Option<String>,
    pub object_type_name_plural: Option<String>,
    /// Replaces the composed reference template
    pub ref_path: Option<String>,
    /// Replaces the composed url template
    pub url_path: Option<String>,
    pub icons: HashMap<String, String>,
    pub params: Params,
    pub kind: K,
}

impl<K> ChildOptions<K> {
    pub fn new(kind: K) -> Self {
        Self {
            name: None,
            object_type: None,
            relationship_type: None,
            api_name: None,
            id_key: None,
            object_type_name: None,
            object_type_name_plural: None,
            ref_path: None,
            url_path: None,
            icons: HashMap::new(),
            params: Params::new(),
            kind,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_object_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = Some(object_type.into());
        self
    }

    pub fn with_relationship_type(mut self, relationship_type: RelationshipType) -> Self {
        self.relationship_type = Some(relationship_type);
        self
    }

    pub fn with_api_name(mut self, api_name: impl Into<String>) -> Self {
        self.api_name = Some(api_name.into());
        self
    }

    pub fn with_id_key(mut self, id_key: impl Into<String>) -> Self {
        self.id_key = Some(id_key.into());
        self
    }

    pub fn with_ref_path(mut self, ref_path: impl Into<String>) -> Self {
        self.ref_path = Some(ref_path.into());
        self
    }

    pub fn with_url_path(mut self, url_path: impl Into<String>) -> Self {
        self.url_path = Some(url_path.into());
        self
    }
}

/// Match-dependent values, each computed at most once
#[derive(Debug, Clone, Default)]
struct Calc {
    matched: Option<Match>,
    id: OnceLock<Option<String>>,
    reference: OnceLock<String>,
    url: OnceLock<String>,
    obj_ref_url: OnceLock<String>,
    obj_ref: OnceLock<ObjRef>,
}

impl Calc {
    fn bound(matched: Option<Match>) -> Self {
        Self {
            matched,
            ..Self::default()
        }
    }
}

/// A node in the relationship tree
///
/// A template carries no match and describes how to reach objects of
/// `object_type` from the root. Binding a match with [`create_resolved`] or
/// [`create_item`] yields a new instance sharing the same options whose
/// `id`, `reference`, `url`, `obj_ref_url` and `obj_ref` are resolved lazily
/// and cached.
///
/// [`create_resolved`]: Relationship::create_resolved
/// [`create_item`]: Relationship::create_item
#[derive(Debug, Clone)]
pub struct Relationship<K = Plain> {
    options: Arc<RelationshipOptions<K>>,
    calc: Calc,
}

impl<K: RelationshipKind> Relationship<K> {
    /// Start building a template relationship
    pub fn builder(path: impl Into<String>, kind: K) -> RelationshipBuilder<K> {
        RelationshipBuilder::new(path, kind)
    }

    pub fn options(&self) -> &RelationshipOptions<K> {
        &self.options
    }

    pub fn kind(&self) -> &K {
        &self.options.kind
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.options.resolver
    }

    pub fn api_name(&self) -> Option<&str> {
        self.options.api_name.as_deref()
    }

    pub fn name(&self) -> Option<String> {
        self.options.kind.name(&self.options)
    }

    pub fn path(&self) -> &str {
        &self.options.path
    }

    pub fn subpath(&self) -> Option<&str> {
        self.options.subpath.as_deref()
    }

    pub fn url_path(&self) -> &str {
        &self.options.url_path
    }

    pub fn ref_path(&self) -> &str {
        &self.options.ref_path
    }

    /// Parameterized path of the referenced item: the ref path plus the id
    pub fn obj_ref_url_path(&self) -> &str {
        self.options.obj_ref_url_path.get_or_init(|| {
            let key = if self.is_group() {
                format!(":{}", self.options.id_key)
            } else {
                self.subpath().unwrap_or_default().to_string()
            };
            format!("{}/{}", self.options.ref_path, key)
        })
    }

    pub fn object_type(&self) -> &str {
        &self.options.object_type
    }

    pub fn object_type_name(&self) -> &str {
        self.options
            .object_type_name
            .as_deref()
            .unwrap_or(&self.options.object_type)
    }

    pub fn object_type_name_plural(&self) -> &str {
        self.options
            .object_type_name_plural
            .as_deref()
            .unwrap_or_else(|| self.object_type_name())
    }

    pub fn id_key(&self) -> &str {
        &self.options.id_key
    }

    pub fn is_group(&self) -> bool {
        self.options.is_group
    }

    /// Addressed by its name instead of an id; the opposite of `is_group`
    pub fn is_alias(&self) -> bool {
        !self.options.is_group
    }

    /// Only relationships produced by `create_item` are items
    pub fn is_item(&self) -> bool {
        self.options.is_item
    }

    pub fn relationship_type(&self) -> Option<RelationshipType> {
        self.options.relationship_type
    }

    pub fn is_root(&self) -> bool {
        self.options.relationship_type.is_none()
    }

    pub fn is_one_to_one(&self) -> bool {
        self.options.relationship_type == Some(RelationshipType::OneToOne)
    }

    pub fn is_one_to_many(&self) -> bool {
        self.options.relationship_type == Some(RelationshipType::OneToMany)
    }

    pub fn is_many_to_one(&self) -> bool {
        self.options.relationship_type == Some(RelationshipType::ManyToOne)
    }

    pub fn is_many_to_many(&self) -> bool {
        self.options.relationship_type == Some(RelationshipType::ManyToMany)
    }

    pub fn get_icon(&self, key: &str) -> Option<String> {
        self.options.kind.icon(&self.options, key)
    }

    /// The match this instance was bound to
    pub fn matched(&self) -> Option<&Match> {
        self.calc.matched.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.calc.matched.is_some()
    }

    /// The stored parent template, never bound
    pub fn parent_template(&self) -> Option<&Arc<Relationship<K>>> {
        self.options.parent.as_ref()
    }

    /// The parent, bound to this instance's match when there is one
    pub fn parent(&self) -> Option<Arc<Relationship<K>>> {
        let parent = self.options.parent.as_ref()?;
        match &self.calc.matched {
            Some(matched) if !parent.is_resolved() => {
                Some(Arc::new(parent.create_resolved(matched.clone())))
            }
            _ => Some(Arc::clone(parent)),
        }
    }

    /// Id of the bound member: the match value of `id_key` for groups, the
    /// subpath for aliases
    pub fn id(&self) -> Option<&str> {
        let matched = self.calc.matched.as_ref()?;
        self.calc
            .id
            .get_or_init(|| {
                if self.is_group() {
                    matched
                        .params
                        .as_ref()
                        .and_then(|p| p.get(&self.options.id_key))
                        .cloned()
                } else {
                    self.options.subpath.clone()
                }
            })
            .as_deref()
    }

    /// Resolved ref of the container
    pub fn reference(&self) -> Option<&str> {
        self.resolve_cached(&self.calc.reference, &self.options.ref_path)
    }

    /// Resolved url
    pub fn url(&self) -> Option<&str> {
        self.resolve_cached(&self.calc.url, &self.options.url_path)
    }

    /// Resolved path of the referenced item
    pub fn obj_ref_url(&self) -> Option<&str> {
        self.resolve_cached(&self.calc.obj_ref_url, self.obj_ref_url_path())
    }

    pub fn obj_ref(&self) -> Option<&ObjRef> {
        self.calc.matched.as_ref()?;
        Some(self.calc.obj_ref.get_or_init(|| ObjRef {
            id: self.id().map(str::to_string),
            object_type: self.options.object_type.clone(),
            reference: self.reference().map(str::to_string),
        }))
    }

    fn resolve_cached<'a>(&'a self, cell: &'a OnceLock<String>, template: &str) -> Option<&'a str> {
        let matched = self.calc.matched.as_ref()?;
        let resolved = cell.get_or_init(|| {
            let fallback: &dyn ParamSource = &*self.options;
            self.options
                .resolver
                .resolve(Some(template), Some(matched), Some(fallback))
                .unwrap_or_else(|| template.to_string())
        });
        Some(resolved.as_str())
    }

    /// Same options, no match
    pub fn unbound(&self) -> Self {
        Self {
            options: Arc::clone(&self.options),
            calc: Calc::default(),
        }
    }

    /// Build a template one level below this one
    ///
    /// Items delegate to their parent template, so children always hang below
    /// the nearest non-item ancestor.
    pub fn create_child(
        &self,
        subpath: &str,
        child: ChildOptions<K>,
    ) -> Result<Relationship<K>, RelationshipError> {
        if self.is_item() {
            if let Some(parent) = &self.options.parent {
                return parent.create_child(subpath, child);
            }
        }

        let incomplete = |missing| RelationshipError::IncompleteChild {
            parent: self.options.path.clone(),
            subpath: subpath.to_string(),
            missing,
        };
        let object_type = child.object_type.ok_or_else(|| incomplete("objectType"))?;
        let relationship_type = child
            .relationship_type
            .ok_or_else(|| incomplete("relationshipType"))?;

        let child_is_alias = relationship_type == RelationshipType::OneToOne;
        let parent_ref = &self.options.ref_path;
        let parent_url = &self.options.url_path;
        let (ref_path, url_path) = if self.is_group() {
            let id_key = &self.options.id_key;
            let ref_path = if child_is_alias {
                format!("{parent_ref}/:{id_key}")
            } else {
                format!("{parent_ref}/:{id_key}/{subpath}")
            };
            (ref_path, format!("{parent_url}/:{id_key}/{subpath}"))
        } else {
            let parent_subpath = self.subpath().unwrap_or_default();
            let ref_path = if child_is_alias {
                format!("{parent_ref}/{parent_subpath}")
            } else {
                format!("{parent_ref}/{parent_subpath}/{subpath}")
            };
            (ref_path, format!("{parent_url}/{subpath}"))
        };

        let mut builder = Relationship::builder(format!("{}.{}", self.options.path, subpath), child.kind)
            .with_subpath(subpath)
            .with_ref_path(child.ref_path.unwrap_or(ref_path))
            .with_url_path(child.url_path.unwrap_or(url_path))
            .with_object_type(object_type)
            .with_relationship_type(relationship_type)
            .with_parent(self)
            .with_resolver(self.options.resolver.clone());
        builder.api_name = child.api_name.or_else(|| self.options.api_name.clone());
        builder.name = child.name;
        builder.id_key = child.id_key;
        builder.object_type_name = child.object_type_name;
        builder.object_type_name_plural = child.object_type_name_plural;
        builder.icons = child.icons;
        builder.params = child.params;
        builder.build()
    }

    /// Bind `matched` without marking the result as an item
    pub fn create_resolved(&self, matched: Match) -> Self {
        Self {
            options: Arc::clone(&self.options),
            calc: Calc::bound(Some(matched)),
        }
    }

    /// Bind `matched` to a copy of the options adjusted by `adjust`
    pub fn create_resolved_with<F>(&self, matched: Match, adjust: F) -> Result<Self, RelationshipError>
    where
        F: FnOnce(&mut RelationshipOptions<K>),
    {
        let mut options = (*self.options).clone();
        adjust(&mut options);
        options.obj_ref_url_path = OnceLock::new();
        options.validate()?;
        Ok(Self {
            options: Arc::new(options),
            calc: Calc::bound(Some(matched)),
        })
    }

    /// One concrete member of this relationship
    ///
    /// For groups the id is `resource_id` when given (it is also written into
    /// the bound match), else the match value of `id_key`. Aliases use their
    /// subpath. Grouped items extend `url_path` with `/:<id_key>`; items are
    /// only rebound, never extended twice.
    pub fn create_item(&self, matched: Option<Match>, resource_id: Option<&str>) -> Self {
        let id_key = &self.options.id_key;
        let matched = matched.map(|m| match resource_id {
            Some(id) if self.is_group() => m.with_param(id_key.as_str(), id),
            _ => m,
        });

        if self.is_item() {
            return Self {
                options: Arc::clone(&self.options),
                calc: Calc::bound(matched),
            };
        }

        let mut options = (*self.options).clone();
        options.parent = Some(Arc::new(self.unbound()));
        options.is_item = true;
        if self.is_group() {
            options.url_path = format!("{}/:{}", options.url_path, id_key);
        }

        Self {
            options: Arc::new(options),
            calc: Calc::bound(matched),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn device_root() -> Relationship {
        Relationship::builder("device", Plain)
            .with_object_type("device")
            .with_ref_path(":systemId/device")
            .with_url_path("/v1/interface/:systemId/device")
            .build()
            .expect("root should build")
    }

    fn child(object_type: &str, relationship_type: RelationshipType) -> ChildOptions<Plain> {
        ChildOptions::new(Plain)
            .with_object_type(object_type)
            .with_relationship_type(relationship_type)
    }

    fn s1() -> Match {
        Match::from_pairs([("systemId", "S1")])
    }

    #[test]
    fn test_defaults() {
        let root = device_root();
        assert_eq!(root.id_key(), "deviceId");
        assert!(root.is_group());
        assert!(!root.is_alias());
        assert!(root.is_root());
        assert!(!root.is_item());
        assert_eq!(root.object_type_name(), "device");
        assert_eq!(root.object_type_name_plural(), "device");
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_template_has_no_resolved_values() {
        let root = device_root();
        assert_eq!(root.id(), None);
        assert_eq!(root.reference(), None);
        assert_eq!(root.url(), None);
        assert_eq!(root.obj_ref_url(), None);
        assert_eq!(root.obj_ref(), None);
    }

    #[test]
    fn test_alias_root_is_rejected() {
        let result = Relationship::builder("tracker", Plain)
            .with_object_type("tracker")
            .with_relationship_type(RelationshipType::OneToOne)
            .build();
        assert_eq!(
            result.unwrap_err(),
            RelationshipError::AliasWithoutParent {
                path: "tracker".to_string()
            }
        );
    }

    #[test]
    fn test_alias_with_parent_is_accepted() {
        let root = device_root();
        let rel = Relationship::builder("device.tracker", Plain)
            .with_object_type("tracker")
            .with_relationship_type(RelationshipType::OneToOne)
            .with_parent(&root)
            .build()
            .expect("alias with parent should build");
        assert!(rel.is_alias());
    }

    #[test]
    fn test_missing_object_type() {
        let result = Relationship::builder("x", Plain).build();
        assert!(matches!(result, Err(RelationshipError::MissingObjectType { .. })));
    }

    #[test]
    fn test_resolved_root() {
        let resolved = device_root().create_resolved(s1());
        assert_eq!(resolved.url(), Some("/v1/interface/S1/device"));
        assert_eq!(resolved.reference(), Some("S1/device"));
        assert_eq!(resolved.id(), None);
    }

    #[test]
    fn test_child_of_group() {
        let root = device_root();
        let many = root
            .create_child("sensors", child("sensor", RelationshipType::OneToMany))
            .unwrap();
        assert_eq!(many.path(), "device.sensors");
        assert_eq!(many.subpath(), Some("sensors"));
        assert_eq!(many.ref_path(), ":systemId/device/:deviceId/sensors");
        assert_eq!(many.url_path(), "/v1/interface/:systemId/device/:deviceId/sensors");

        let one = root
            .create_child("tracker", child("tracker", RelationshipType::OneToOne))
            .unwrap();
        assert_eq!(one.ref_path(), ":systemId/device/:deviceId");
        assert_eq!(one.url_path(), "/v1/interface/:systemId/device/:deviceId/tracker");
        assert!(one.is_alias());
    }

    #[test]
    fn test_child_of_alias() {
        let root = device_root();
        let alias = root
            .create_child("tracker", child("tracker", RelationshipType::OneToOne))
            .unwrap();

        let one = alias
            .create_child("sim", child("sim", RelationshipType::OneToOne))
            .unwrap();
        assert_eq!(one.ref_path(), ":systemId/device/:deviceId/tracker");
        assert_eq!(one.url_path(), "/v1/interface/:systemId/device/:deviceId/tracker/sim");

        let many = alias
            .create_child("events", child("event", RelationshipType::ManyToMany))
            .unwrap();
        assert_eq!(many.ref_path(), ":systemId/device/:deviceId/tracker/events");
        assert_eq!(many.url_path(), "/v1/interface/:systemId/device/:deviceId/tracker/events");
        assert_eq!(many.path(), "device.tracker.events");
    }

    #[test]
    fn test_child_requires_types() {
        let root = device_root();
        let no_type = root.create_child(
            "x",
            ChildOptions::new(Plain).with_relationship_type(RelationshipType::OneToMany),
        );
        assert!(matches!(
            no_type,
            Err(RelationshipError::IncompleteChild { missing: "objectType", .. })
        ));

        let no_relationship = root.create_child("x", ChildOptions::new(Plain).with_object_type("x"));
        assert!(matches!(
            no_relationship,
            Err(RelationshipError::IncompleteChild { missing: "relationshipType", .. })
        ));
    }

    #[test]
    fn test_child_inherits_api_name_unless_overridden() {
        let root = Relationship::builder("device", Plain)
            .with_object_type("device")
            .with_api_name("imagine")
            .build()
            .unwrap();
        let inherited = root
            .create_child("a", child("a", RelationshipType::OneToMany))
            .unwrap();
        assert_eq!(inherited.api_name(), Some("imagine"));

        let overridden = root
            .create_child("b", child("b", RelationshipType::OneToMany).with_api_name("other"))
            .unwrap();
        assert_eq!(overridden.api_name(), Some("other"));
    }

    #[test]
    fn test_child_path_overrides() {
        let root = device_root();
        let sensors = root
            .create_child(
                "sensors",
                child("sensor", RelationshipType::OneToMany)
                    .with_url_path("/v2/sensors/:deviceId")
                    .with_ref_path(":systemId/sensors"),
            )
            .unwrap();
        assert_eq!(sensors.url_path(), "/v2/sensors/:deviceId");
        assert_eq!(sensors.ref_path(), ":systemId/sensors");
        assert_eq!(sensors.path(), "device.sensors");
        assert_eq!(sensors.id_key(), "sensorId");
        assert_eq!(sensors.parent_template().map(|p| p.path()), Some("device"));

        let matched = Match::from_pairs([("systemId", "S1"), ("deviceId", "D1")]);
        let resolved = sensors.create_resolved(matched);
        assert_eq!(resolved.url(), Some("/v2/sensors/D1"));
        assert_eq!(resolved.reference(), Some("S1/sensors"));

        // Only the url is replaced; the reference is still composed
        let tracker = root
            .create_child(
                "tracker",
                child("tracker", RelationshipType::OneToOne).with_url_path("/v2/tracker"),
            )
            .unwrap();
        assert_eq!(tracker.url_path(), "/v2/tracker");
        assert_eq!(tracker.ref_path(), ":systemId/device/:deviceId");
    }

    #[test]
    fn test_obj_ref_url_path() {
        let root = device_root();
        assert_eq!(root.obj_ref_url_path(), ":systemId/device/:deviceId");

        let alias = root
            .create_child("tracker", child("tracker", RelationshipType::OneToOne))
            .unwrap();
        assert_eq!(alias.obj_ref_url_path(), ":systemId/device/:deviceId/tracker");
    }

    #[test]
    fn test_create_item_on_group() {
        let root = device_root();
        let item = root.create_item(Some(s1()), Some("D42"));
        assert!(item.is_item());
        assert_eq!(item.id(), Some("D42"));
        assert_eq!(item.url_path(), "/v1/interface/:systemId/device/:deviceId");
        assert_eq!(item.ref_path(), root.ref_path());
        assert_eq!(item.url(), Some("/v1/interface/S1/device/D42"));
        assert_eq!(item.reference(), Some("S1/device"));
        assert_eq!(item.obj_ref_url(), Some("S1/device/D42"));
        assert_eq!(
            item.obj_ref(),
            Some(&ObjRef {
                id: Some("D42".to_string()),
                object_type: "device".to_string(),
                reference: Some("S1/device".to_string()),
            })
        );
        assert_eq!(item.parent_template().map(|p| p.path()), Some("device"));
        assert!(!item.parent_template().unwrap().is_item());
    }

    #[test]
    fn test_create_item_uses_match_id() {
        let matched = Match::from_pairs([("systemId", "S1"), ("deviceId", "D7")]);
        let item = device_root().create_item(Some(matched), None);
        assert_eq!(item.id(), Some("D7"));
    }

    #[test]
    fn test_create_item_on_alias() {
        let alias = device_root()
            .create_child("tracker", child("tracker", RelationshipType::OneToOne))
            .unwrap();
        let matched = Match::from_pairs([("systemId", "S1"), ("deviceId", "D1")]);
        let item = alias.create_item(Some(matched), Some("ignored"));
        assert_eq!(item.id(), Some("tracker"));
        assert_eq!(item.url_path(), alias.url_path());
        assert_eq!(item.url(), Some("/v1/interface/S1/device/D1/tracker"));
        assert_eq!(item.matched().and_then(|m| m.param("trackerId")), None);
    }

    #[test]
    fn test_item_is_only_rebound() {
        let item = device_root().create_item(Some(s1()), Some("D1"));
        let rebound = item.create_item(Some(s1()), Some("D2"));
        assert!(rebound.is_item());
        assert_eq!(rebound.url_path(), item.url_path());
        assert_eq!(rebound.id(), Some("D2"));
        assert_eq!(rebound.url(), Some("/v1/interface/S1/device/D2"));
    }

    #[test]
    fn test_item_children_attach_to_template() {
        let root = device_root();
        let item = root.create_item(Some(s1()), Some("D1"));
        let from_item = item
            .create_child("sensors", child("sensor", RelationshipType::OneToMany))
            .unwrap();
        let from_root = root
            .create_child("sensors", child("sensor", RelationshipType::OneToMany))
            .unwrap();
        assert_eq!(from_item.url_path(), from_root.url_path());
        assert_eq!(from_item.ref_path(), from_root.ref_path());
    }

    #[test]
    fn test_parent_is_resolved_with_match() {
        let root = device_root();
        let sensors = root
            .create_child("sensors", child("sensor", RelationshipType::OneToMany))
            .unwrap();
        assert!(!sensors.parent().unwrap().is_resolved());

        let matched = Match::from_pairs([("systemId", "S1"), ("deviceId", "D1")]);
        let resolved = sensors.create_resolved(matched.clone());
        let parent = resolved.parent().expect("has parent");
        assert_eq!(parent.matched(), Some(&matched));
        assert_eq!(parent.url(), Some("/v1/interface/S1/device"));
        assert!(!resolved.parent_template().unwrap().is_resolved());
    }

    #[test]
    fn test_options_are_fallback_params() {
        let root = Relationship::builder("device", Plain)
            .with_object_type("device")
            .with_ref_path(":systemId/:objectType")
            .with_url_path("/base/:systemId/:objectType")
            .with_param("systemId", "SYS")
            .build()
            .unwrap();
        let resolved = root.create_resolved(Match::from_pairs([("other", "x")]));
        assert_eq!(resolved.reference(), Some("SYS/device"));
        assert_eq!(resolved.url(), Some("/base/SYS/device"));
    }

    #[test]
    fn test_create_resolved_with_overrides() {
        let root = device_root();
        assert_eq!(root.obj_ref_url_path(), ":systemId/device/:deviceId");
        let resolved = root
            .create_resolved_with(s1(), |opts| opts.ref_path = "other/:systemId".to_string())
            .unwrap();
        assert_eq!(resolved.reference(), Some("other/S1"));
        assert_eq!(resolved.obj_ref_url_path(), "other/:systemId/:deviceId");

        let invalid = root.create_resolved_with(s1(), |opts| opts.is_group = false);
        assert!(matches!(invalid, Err(RelationshipError::AliasWithoutParent { .. })));
    }

    #[test]
    fn test_special_params_installed_later_apply() {
        let resolver = PathResolver::new();
        let root = Relationship::builder("device", Plain)
            .with_object_type("device")
            .with_url_path("/p/:persona/device")
            .with_resolver(resolver.clone())
            .build()
            .unwrap();
        resolver.set_special_param("persona", |_, _| Ok(Some("default".to_string())));
        let resolved = root.create_resolved(Match::from_pairs([("systemId", "S1")]));
        assert_eq!(resolved.url(), Some("/p/default/device"));
    }

    #[test]
    fn test_icons() {
        let root = Relationship::builder("device", Plain)
            .with_object_type("device")
            .with_icon("list", "fa-list")
            .build()
            .unwrap();
        assert_eq!(root.get_icon("list").as_deref(), Some("fa-list"));
        assert_eq!(root.get_icon("detail"), None);
    }
}
