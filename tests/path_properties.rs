//! Integration tests for path composition and resolution

use blueprint_paths::path::{last_id, SpecialParamError};
use blueprint_paths::relationship::{ChildOptions, Plain};
use blueprint_paths::{Match, PathResolver, Relationship, RelationshipError, RelationshipType};
use pretty_assertions::assert_eq;

fn device() -> Relationship {
    Relationship::builder("device", Plain)
        .with_object_type("device")
        .with_ref_path(":systemId/device")
        .with_url_path("/v1/interface/:systemId/device")
        .build()
        .expect("Should build")
}

fn child(object_type: &str, relationship_type: RelationshipType) -> ChildOptions<Plain> {
    ChildOptions::new(Plain)
        .with_object_type(object_type)
        .with_relationship_type(relationship_type)
}

#[test]
fn test_composition_table() {
    let group = device();
    let alias = group
        .create_child("tracker", child("tracker", RelationshipType::OneToOne))
        .unwrap();

    let cases = [
        (
            &group,
            "sim",
            RelationshipType::OneToOne,
            ":systemId/device/:deviceId",
            "/v1/interface/:systemId/device/:deviceId/sim",
        ),
        (
            &group,
            "sensors",
            RelationshipType::OneToMany,
            ":systemId/device/:deviceId/sensors",
            "/v1/interface/:systemId/device/:deviceId/sensors",
        ),
        (
            &alias,
            "sim",
            RelationshipType::OneToOne,
            ":systemId/device/:deviceId/tracker",
            "/v1/interface/:systemId/device/:deviceId/tracker/sim",
        ),
        (
            &alias,
            "pings",
            RelationshipType::ManyToOne,
            ":systemId/device/:deviceId/tracker/pings",
            "/v1/interface/:systemId/device/:deviceId/tracker/pings",
        ),
    ];

    for (parent, subpath, relationship_type, ref_path, url_path) in cases {
        let rel = parent
            .create_child(subpath, child(subpath, relationship_type))
            .unwrap();
        assert_eq!(rel.ref_path(), ref_path, "ref of {}", rel.path());
        assert_eq!(rel.url_path(), url_path, "url of {}", rel.path());
        assert_eq!(rel.path(), format!("{}.{}", parent.path(), subpath));
    }
}

#[test]
fn test_resolve_tokens() {
    let resolver = PathResolver::new();
    let matched = Match::from_pairs([("id", "5")]);
    assert_eq!(resolver.resolve_str("a/:id/b", &matched), "a/5/b");
    assert_eq!(
        resolver.resolve_str("a/:missing/b", &Match::from_pairs(Vec::<(String, String)>::new())),
        "a/:missing/b"
    );
}

#[test]
fn test_one_to_one_needs_parent() {
    let orphan = Relationship::builder("tracker", Plain)
        .with_object_type("tracker")
        .with_relationship_type(RelationshipType::OneToOne)
        .build();
    assert!(matches!(orphan, Err(RelationshipError::AliasWithoutParent { .. })));

    let root = device();
    let adopted = Relationship::builder("device.tracker", Plain)
        .with_object_type("tracker")
        .with_relationship_type(RelationshipType::OneToOne)
        .with_parent(&root)
        .build();
    assert!(adopted.is_ok());
}

#[test]
fn test_root_resolution() {
    let resolved = device().create_resolved(Match::from_pairs([("systemId", "S1")]));
    assert_eq!(resolved.url(), Some("/v1/interface/S1/device"));
    assert_eq!(resolved.reference(), Some("S1/device"));
}

#[test]
fn test_item_on_group() {
    let root = device();
    assert_eq!(root.id_key(), "deviceId");
    let item = root.create_item(Some(Match::from_pairs([("systemId", "S1")])), Some("D42"));
    assert_eq!(item.id(), Some("D42"));
    assert!(item.url_path().ends_with("/:deviceId"));
    assert_eq!(item.obj_ref_url(), Some("S1/device/D42"));
}

#[test]
fn test_resolved_values_are_cached() {
    let resolver = PathResolver::new();
    let root = Relationship::builder("device", Plain)
        .with_object_type("device")
        .with_url_path("/:tenant/device")
        .with_resolver(resolver.clone())
        .build()
        .unwrap();
    resolver.set_special_param("tenant", |_, _| Ok(Some("first".to_string())));

    let resolved = root.create_resolved(Match::from_pairs([("systemId", "S1")]));
    assert_eq!(resolved.url(), Some("/first/device"));

    resolver.set_special_param("tenant", |_, _| Ok(Some("second".to_string())));
    assert_eq!(resolved.url(), Some("/first/device"));

    let fresh = root.create_resolved(Match::from_pairs([("systemId", "S1")]));
    assert_eq!(fresh.url(), Some("/second/device"));
}

#[test]
fn test_failing_special_param_falls_back_to_match() {
    let resolver = PathResolver::new();
    resolver.set_special_param("owner", |_, _| {
        Err(SpecialParamError::new("owner", "directory unavailable"))
    });

    let with_value = Match::from_pairs([("owner", "u1")]);
    assert_eq!(resolver.resolve_str("/o/:owner/x", &with_value), "/o/u1/x");

    let without = Match::from_pairs([("other", "1")]);
    assert_eq!(resolver.resolve_str("/o/:owner/x", &without), "/o//x");
}

#[test]
fn test_last_id() {
    let matched = Match::from_pairs([("dealerId", "D1"), ("vehicleId", "V7")]);
    assert_eq!(
        last_id(":systemId/dealer/:dealerId/vehicles/:vehicleId", &matched),
        Some("V7")
    );
    assert_eq!(last_id(":systemId/dealer", &matched), None);
}
