//! Load tests with thousands of entries.
//!
//! These tests verify the cache under concurrent event application:
//! - Disjoint-key updates from many tasks
//! - Readers racing writers on shared index keys
//! - Watch notification under load
//!
//! Run with: `cargo test --package integration-tests load_tests -- --nocapture`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use nebucloud_sd::prelude::*;
use sd_cache::instance::{instance_id_key, instance_service_key, new_instance_cache};
use tokio::sync::Barrier;

fn instance(service: usize, i: usize) -> Instance {
    Instance::new(
        "default",
        "default",
        MicroServiceInstance::new(format!("inst-{service}-{i}"), format!("svc-{service}"))
            .endpoint(format!("rest://10.0.{service}.{i}:8080")),
    )
}

/// Disjoint-key updates from many tasks converge to one entry per key.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_disjoint_updates() {
    let cache = Arc::new(new_instance_cache(CacheOptions::default().with_capacity(1000)));
    let num_tasks = 10;
    let per_task = 100;

    let barrier = Arc::new(Barrier::new(num_tasks));
    let total_ops = Arc::new(AtomicU64::new(0));
    let start = Instant::now();

    let mut handles = Vec::new();
    for task_id in 0..num_tasks {
        let cache = Arc::clone(&cache);
        let barrier = Arc::clone(&barrier);
        let total_ops = Arc::clone(&total_ops);

        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            for i in 0..per_task {
                cache.process_update(ChangeEvent::update(
                    format!("doc-{task_id}-{i}"),
                    instance(task_id, i),
                ));
                total_ops.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }

    for handle in handles {
        handle.await.expect("Task panicked");
    }

    let duration = start.elapsed();
    let ops = total_ops.load(Ordering::Relaxed);
    println!(
        "Concurrent update: {} ops in {:?} ({:.2} µs/op)",
        ops,
        duration,
        duration.as_micros() as f64 / ops as f64
    );

    assert_eq!(cache.size(), num_tasks * per_task);
    for task_id in 0..num_tasks {
        let by_service = instance_service_key("default", "default", &format!("svc-{task_id}"));
        assert_eq!(cache.get_value(by_service.as_str()).len(), per_task);

        for i in 0..per_task {
            let doc = format!("doc-{task_id}-{i}");
            assert!(cache.get(&doc).is_some());
            let by_id = instance_id_key(
                "default",
                "default",
                &format!("svc-{task_id}"),
                &format!("inst-{task_id}-{i}"),
            );
            assert_eq!(cache.get_value(by_id.as_str()).len(), 1);
        }
    }
}

/// Readers resolving a shared index key never observe foreign entities.
///
/// Each writer owns half of the keys, matching per-key ordered delivery.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_race_writers() {
    let cache = Arc::new(new_instance_cache(CacheOptions::default()));
    let shared = instance_service_key("default", "default", "svc-0");
    let reads = Arc::new(AtomicU64::new(0));

    let mut handles = Vec::new();
    for writer in 0..2 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            for round in 0..500 {
                let i = writer * 25 + round % 25;
                let doc = format!("doc-{i}");
                if round % 4 == 0 {
                    cache.process_delete(ChangeEvent::delete(doc));
                } else {
                    cache.process_update(ChangeEvent::update(doc, instance(0, i)));
                }
            }
        }));
    }

    for _ in 0..4 {
        let cache = Arc::clone(&cache);
        let shared = shared.clone();
        let reads = Arc::clone(&reads);
        handles.push(tokio::spawn(async move {
            for _ in 0..500 {
                for value in cache.get_value(shared.as_str()) {
                    let body = value.instance.as_ref().expect("cached instances are valid");
                    assert_eq!(body.service_id, "svc-0");
                }
                reads.fetch_add(1, Ordering::Relaxed);
                tokio::task::yield_now().await;
            }
        }));
    }

    for handle in handles {
        handle.await.expect("Task panicked");
    }

    assert_eq!(reads.load(Ordering::Relaxed), 2000);
    assert!(cache.size() <= 50);
    assert!(cache.get_value(shared.as_str()).len() <= cache.size());
}

/// A watch sees one notification per change, none for redundant updates.
#[tokio::test]
async fn test_watch_notifications_under_load() {
    let options = CacheOptions::default().with_watch_buffer_size(4096);
    let cache = new_instance_cache(options);
    let mut watch = cache.watch();
    let num_entries = 1000;

    let start = Instant::now();
    for i in 0..num_entries {
        cache.process_update(ChangeEvent::update(format!("doc-{i}"), instance(1, i)));
        // Redundant replay of the same value.
        cache.process_update(ChangeEvent::update(format!("doc-{i}"), instance(1, i)));
    }
    println!("Applied {} updates in {:?}", num_entries * 2, start.elapsed());

    let mut received = 0;
    while let Ok(event) = watch.try_recv() {
        assert_eq!(event.action, CacheAction::Created);
        received += 1;
    }

    assert_eq!(received, num_entries);
    assert_eq!(cache.stats().updates_applied(), num_entries as u64);
    assert_eq!(cache.stats().updates_unchanged(), num_entries as u64);
}

/// Full resync of a large cache.
#[test]
fn test_clear_and_replay_10000_entries() {
    let cache = new_instance_cache(CacheOptions::default().with_capacity(10_000));
    for i in 0..10_000 {
        cache.process_update(ChangeEvent::update(format!("doc-{i}"), instance(i % 100, i)));
    }
    assert_eq!(cache.size(), 10_000);

    cache.mark_dirty();
    let start = Instant::now();
    cache.clear();
    println!("Cleared 10000 entries in {:?}", start.elapsed());

    assert_eq!(cache.size(), 0);
    assert!(cache.index_cache().is_empty());

    for i in 0..5_000 {
        cache.process_update(ChangeEvent::update(format!("doc-{i}"), instance(i % 100, i)));
    }
    assert_eq!(cache.size(), 5_000);
    assert_eq!(
        cache
            .get_value(instance_service_key("default", "default", "svc-7").as_str())
            .len(),
        50
    );
}
