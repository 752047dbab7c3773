//! Registry dispatch integration tests.

use nebucloud_sd::prelude::*;
use sd_cache::instance::instance_service_key;
use sd_cache::service::service_version_key;
use serde_json::json;

fn service_doc(oid: &str, service_id: &str, version: &str) -> RawDocument {
    json!({
        "_id": { "$oid": oid },
        "domain": "default",
        "project": "default",
        "service": {
            "service_id": service_id,
            "app_id": "shop",
            "service_name": "orders",
            "version": version,
            "schemas": ["OrderEndpoint"],
            "status": "UP"
        }
    })
}

fn instance_doc(oid: &str, service_id: &str, instance_id: &str) -> RawDocument {
    json!({
        "_id": { "$oid": oid },
        "domain": "default",
        "project": "default",
        "instance": {
            "instance_id": instance_id,
            "service_id": service_id,
            "endpoints": ["rest://10.0.0.1:8080"],
            "host_name": "node-a",
            "status": "UP"
        }
    })
}

#[test]
fn feed_replay_populates_all_kinds() {
    let registry = CacheRegistry::with_defaults().unwrap();

    registry.dispatch("service", ChangeKind::Update, &service_doc("s1", "svc-1", "1.0.0")).unwrap();
    registry.dispatch("service", ChangeKind::Update, &service_doc("s2", "svc-2", "1.1.0")).unwrap();
    for (oid, inst) in [("i1", "inst-1"), ("i2", "inst-2"), ("i3", "inst-3")] {
        registry.dispatch("instance", ChangeKind::Update, &instance_doc(oid, "svc-1", inst)).unwrap();
    }

    let services = registry.typed::<Service>("service").unwrap();
    let instances = registry.typed::<Instance>("instance").unwrap();

    assert_eq!(services.size(), 2);
    assert_eq!(
        services
            .get_value(service_version_key("default", "default", "shop", "orders").as_str())
            .len(),
        2
    );
    assert_eq!(
        instances
            .get_value(instance_service_key("default", "default", "svc-1").as_str())
            .len(),
        3
    );
}

#[test]
fn delete_notification_without_payload() {
    let registry = CacheRegistry::with_defaults().unwrap();
    registry.dispatch("instance", ChangeKind::Update, &instance_doc("i1", "svc-1", "inst-1")).unwrap();

    let outcome = registry
        .dispatch("instance", ChangeKind::Delete, &json!({ "_id": { "$oid": "i1" } }))
        .unwrap();

    assert_eq!(outcome, ApplyOutcome::Delete(DeleteOutcome::Deleted));
    let instances = registry.typed::<Instance>("instance").unwrap();
    assert!(instances
        .get_value(instance_service_key("default", "default", "svc-1").as_str())
        .is_empty());
}

#[test]
fn redundant_update_reports_unchanged() {
    let registry = CacheRegistry::with_defaults().unwrap();
    let doc = service_doc("s1", "svc-1", "1.0.0");

    registry.dispatch("service", ChangeKind::Update, &doc).unwrap();
    let outcome = registry.dispatch("service", ChangeKind::Update, &doc).unwrap();

    assert_eq!(outcome, ApplyOutcome::Update(UpdateOutcome::Unchanged));
}

#[test]
fn malformed_documents_are_dropped() {
    let registry = CacheRegistry::with_defaults().unwrap();

    let err = registry
        .dispatch("service", ChangeKind::Update, &json!({ "domain": "default" }))
        .unwrap_err();
    assert!(matches!(err, SdError::MissingDocumentId { .. }));

    let err = registry
        .dispatch("service", ChangeKind::Update, &json!({ "_id": "s1", "service": "oops" }))
        .unwrap_err();
    assert!(err.is_decode_failure());

    let partial = registry
        .dispatch("service", ChangeKind::Update, &json!({ "_id": "s1", "domain": "default" }))
        .unwrap();
    assert_eq!(partial, ApplyOutcome::Update(UpdateOutcome::Ignored));

    assert_eq!(registry.get("service").unwrap().size(), 0);
}

#[test]
fn resync_only_clears_dirty_kinds() {
    let registry = CacheRegistry::with_defaults().unwrap();
    registry.dispatch("service", ChangeKind::Update, &service_doc("s1", "svc-1", "1.0.0")).unwrap();
    registry.dispatch("instance", ChangeKind::Update, &instance_doc("i1", "svc-1", "inst-1")).unwrap();

    registry.get("instance").unwrap().mark_dirty();
    assert_eq!(registry.clear_dirty(), vec!["instance".to_string()]);

    assert_eq!(registry.get("service").unwrap().size(), 1);
    assert_eq!(registry.get("instance").unwrap().size(), 0);
}
