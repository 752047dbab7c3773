//! Service Mirror Demo
//!
//! This demo shows the cache side of a registry mirror:
//! - Registers the built-in service and instance caches
//! - Replays a recorded change feed into them
//! - Answers lookups by secondary index
//! - Runs a resync (mark dirty, clear, replay)
//!
//! Run with:
//! ```bash
//! cargo run --package service-mirror
//! ```

use std::time::Duration;

use nebucloud_sd::cache::instance::instance_service_key;
use nebucloud_sd::cache::service::{service_info_key, service_version_key};
use nebucloud_sd::prelude::*;
use serde_json::json;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Configuration for the demo.
struct Config {
    /// Tenant domain of the generated records.
    domain: &'static str,
    /// Tenant project of the generated records.
    project: &'static str,
    /// Number of instances per service.
    instances_per_service: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: "default",
            project: "default",
            instances_per_service: 3,
        }
    }
}

/// One recorded change-feed entry: target kind, operation, document.
type FeedEntry = (&'static str, ChangeKind, RawDocument);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{}", nebucloud_sd::version::version_string());

    let config = Config::default();
    let registry = CacheRegistry::with_defaults()?;
    info!(caches = ?registry.names(), "registry ready");

    let services = registry.typed::<Service>("service")?;
    let instances = registry.typed::<Instance>("instance")?;

    // Print instance changes as they are applied
    let mut watch = instances.watch();
    let watch_id = watch.id();
    let printer = tokio::spawn(async move {
        while let Some(event) = watch.recv().await {
            info!(cache = %event.cache, key = %event.key, action = %event.action, "change");
        }
    });

    let feed = recorded_feed(&config);
    replay(&registry, &feed);

    let all_versions = service_version_key(config.domain, config.project, "shop", "orders");
    for svc in services.get_value(all_versions.as_str()) {
        if let Some(ms) = svc.service.as_ref() {
            info!(service_id = %ms.service_id, version = %ms.version, "orders version");
        }
    }

    let v2 = service_info_key(config.domain, config.project, "shop", "orders", "2.0.0");
    info!(index = %v2, matches = services.get_value(v2.as_str()).len(), "lookup");

    let orders_instances = instance_service_key(config.domain, config.project, "orders-v2");
    for inst in instances.get_value(orders_instances.as_str()) {
        if let Some(body) = inst.instance.as_ref() {
            info!(instance_id = %body.instance_id, endpoints = ?body.endpoints, "orders-v2 instance");
        }
    }

    // The feed was interrupted: resync everything from a fresh snapshot
    registry.mark_all_dirty();
    let cleared = registry.clear_dirty();
    info!(caches = ?cleared, "resync started");
    replay(&registry, &feed);
    info!(
        services = services.size(),
        instances = instances.size(),
        "resync finished"
    );

    // Cancelling drops the sender, which ends the printer loop
    tokio::time::sleep(Duration::from_millis(50)).await;
    instances.cancel_watch(watch_id);
    printer.await?;

    info!(
        applied = services.stats().updates_applied() + instances.stats().updates_applied(),
        unchanged = services.stats().updates_unchanged() + instances.stats().updates_unchanged(),
        ignored = services.stats().events_ignored() + instances.stats().events_ignored(),
        "done"
    );
    Ok(())
}

fn replay(registry: &CacheRegistry, feed: &[FeedEntry]) {
    for (kind, change, doc) in feed {
        if let Err(err) = registry.dispatch(kind, *change, doc) {
            warn!(kind, error = %err, "event dropped");
        }
    }
}

fn recorded_feed(config: &Config) -> Vec<FeedEntry> {
    let mut feed = Vec::new();

    for (n, version) in ["1.0.0", "2.0.0"].iter().enumerate() {
        let service_id = format!("orders-v{}", n + 1);
        feed.push((
            "service",
            ChangeKind::Update,
            json!({
                "_id": { "$oid": format!("65a0000000000000000000{n:02}") },
                "domain": config.domain,
                "project": config.project,
                "service": {
                    "service_id": service_id,
                    "app_id": "shop",
                    "service_name": "orders",
                    "version": version,
                    "status": "UP"
                }
            }),
        ));

        for i in 0..config.instances_per_service {
            feed.push((
                "instance",
                ChangeKind::Update,
                json!({
                    "_id": { "$oid": format!("65b00000000000000000{n:02}{i:02}") },
                    "domain": config.domain,
                    "project": config.project,
                    "instance": {
                        "instance_id": format!("{service_id}-{i}"),
                        "service_id": service_id,
                        "endpoints": [format!("rest://10.0.{n}.{i}:8080")],
                        "status": "UP"
                    }
                }),
            ));
        }
    }

    // One instance goes away, one partial write, one unparseable document
    feed.push((
        "instance",
        ChangeKind::Delete,
        json!({ "_id": { "$oid": "65b000000000000000000000" } }),
    ));
    feed.push((
        "service",
        ChangeKind::Update,
        json!({ "_id": { "$oid": "65a000000000000000000099" }, "domain": config.domain }),
    ));
    feed.push(("service", ChangeKind::Update, json!({ "domain": config.domain })));

    feed
}
