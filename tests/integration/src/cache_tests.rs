//! Entity cache integration tests.

use std::sync::Arc;

use nebucloud_sd::prelude::*;
use sd_cache::service::{new_service_cache, service_id_key, service_info_key};

fn orders(service_id: &str, version: &str) -> Service {
    Service::new(
        "default",
        "default",
        MicroService::new(service_id, "shop", "orders", version),
    )
}

#[derive(Debug, Clone, PartialEq)]
struct Named {
    name: String,
}

impl Entity for Named {
    const KIND: &'static str = "named";
}

fn by_name() -> IndexFuncs<Named> {
    IndexFuncs::new().with(|n: &Named| Some(IndexKey::from(n.name.as_str())))
}

fn named(name: &str) -> Named {
    Named {
        name: name.to_string(),
    }
}

#[test]
fn update_then_get_round_trips() {
    let cache = new_service_cache(CacheOptions::default());
    let svc = orders("svc-1", "1.0.0");

    cache.process_update(ChangeEvent::update("a1", svc.clone()));

    assert_eq!(cache.get("a1").as_deref(), Some(&svc));
}

#[test]
fn delete_removes_from_primary() {
    let cache = new_service_cache(CacheOptions::default());
    cache.process_update(ChangeEvent::update("a1", orders("svc-1", "1.0.0")));

    cache.process_delete(ChangeEvent::delete("a1"));

    assert!(cache.get("a1").is_none());
    assert_eq!(cache.size(), 0);
}

#[test]
fn every_registered_index_finds_the_entity() {
    let cache = new_service_cache(CacheOptions::default());
    let svc = orders("svc-1", "1.0.0");
    cache.process_update(ChangeEvent::update("a1", svc.clone()));

    let keys = cache.index_keys(&svc);
    assert_eq!(keys.len(), 3);
    for key in keys {
        let found = cache.get_value(key.as_str());
        assert!(found.iter().any(|v| **v == svc), "missing under {key}");
    }
}

#[test]
fn stale_index_entries_are_retained_on_update() {
    let cache = EntityCache::new(by_name());
    cache.process_update(ChangeEvent::update("k", named("a")));
    cache.process_update(ChangeEvent::update("k", named("b")));

    let under_a = cache.get_value("a");
    let under_b = cache.get_value("b");
    assert_eq!(under_a.len(), 1);
    assert_eq!(under_b.len(), 1);
    assert_eq!(*under_a[0], named("b"));
    assert_eq!(*under_b[0], named("b"));
}

#[test]
fn retract_policy_drops_stale_index_entries() {
    let options = CacheOptions::default().with_index_policy(IndexUpdatePolicy::Retract);
    let cache = EntityCache::with_options(options, by_name());
    cache.process_update(ChangeEvent::update("k", named("a")));
    cache.process_update(ChangeEvent::update("k", named("b")));

    assert!(cache.get_value("a").is_empty());
    assert_eq!(cache.get_value("b").len(), 1);
}

#[test]
fn clear_resets_everything() {
    let cache = new_service_cache(CacheOptions::default());
    for i in 0..20 {
        cache.process_update(ChangeEvent::update(format!("a{i}"), orders(&format!("svc-{i}"), "1.0.0")));
    }
    cache.process_delete(ChangeEvent::delete("a4"));
    cache.process_update(ChangeEvent::update("a5", orders("svc-5", "2.0.0")));
    cache.mark_dirty();

    cache.clear();

    assert_eq!(cache.size(), 0);
    assert!(!cache.dirty());
    for i in 0..20 {
        let key = service_id_key("default", "default", &format!("svc-{i}"));
        assert!(cache.get_value(key.as_str()).is_empty());
    }
    assert!(cache
        .get_value(service_info_key("default", "default", "shop", "orders", "2.0.0").as_str())
        .is_empty());
    assert!(cache.index_cache().is_empty());
}

#[test]
fn delete_of_unknown_key_leaves_state_unchanged() {
    let cache = new_service_cache(CacheOptions::default());
    cache.process_update(ChangeEvent::update("a1", orders("svc-1", "1.0.0")));
    let index_keys = cache.index_cache().len();

    let outcome = cache.process_delete(ChangeEvent::delete("never-inserted"));

    assert_eq!(outcome, DeleteOutcome::Missing);
    assert_eq!(cache.size(), 1);
    assert_eq!(cache.index_cache().len(), index_keys);
}

#[test]
fn by_name_scenario() {
    let cache = EntityCache::new(by_name());

    cache.process_update(ChangeEvent::update("id1", named("svc-a")));
    let found: Vec<Named> = cache.get_value("svc-a").iter().map(|v| (**v).clone()).collect();
    assert_eq!(found, vec![named("svc-a")]);

    cache.process_delete(ChangeEvent::delete("id1"));
    assert!(cache.get_value("svc-a").is_empty());
    assert!(cache.get("id1").is_none());
}

#[test]
fn resync_clear_then_replay() {
    let cache = Arc::new(new_service_cache(CacheOptions::default()));
    cache.process_update(ChangeEvent::update("a1", orders("svc-1", "1.0.0")));
    cache.process_update(ChangeEvent::update("a2", orders("svc-2", "1.0.0")));

    // The engine notices the feed broke, marks the cache and replays a full snapshot
    // in which a2 no longer exists.
    cache.mark_dirty();
    assert!(cache.dirty());
    cache.clear();
    cache.process_update(ChangeEvent::update("a1", orders("svc-1", "1.0.0")));

    assert_eq!(cache.size(), 1);
    assert!(cache.get("a2").is_none());
    assert!(cache
        .get_value(service_id_key("default", "default", "svc-2").as_str())
        .is_empty());
}

#[tokio::test]
async fn watch_skips_redundant_updates() {
    let cache = new_service_cache(CacheOptions::default());
    let mut watch = cache.watch();

    cache.process_update(ChangeEvent::update("a1", orders("svc-1", "1.0.0")));
    cache.process_update(ChangeEvent::update("a1", orders("svc-1", "1.0.0")));
    cache.process_delete(ChangeEvent::delete("a1"));

    let first = watch.recv().await.expect("created event");
    assert_eq!(first.action, CacheAction::Created);
    assert_eq!(first.cache, "service");
    let second = watch.recv().await.expect("deleted event");
    assert_eq!(second.action, CacheAction::Deleted);
    assert!(watch.try_recv().is_err());
}
