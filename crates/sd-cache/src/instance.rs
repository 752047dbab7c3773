//! The `instance` entity kind.
//!
//! Instances are indexed by id and by owning service:
//!
//! | index                    | key                                   |
//! |--------------------------|---------------------------------------|
//! | [`instance_id_index`]      | `domain/project/serviceId/instanceId` |
//! | [`instance_service_index`] | `domain/project/serviceId`            |

use sd_core::IndexKey;
use sd_types::{Instance, INSTANCE};

use crate::cache::EntityCache;
use crate::cacher::{json_decoder, EntityCacher};
use crate::config::CacheOptions;
use crate::index_funcs::IndexFuncs;

/// Key of one instance.
pub fn instance_id_key(domain: &str, project: &str, service_id: &str, instance_id: &str) -> IndexKey {
    IndexKey::from_parts([domain, project, service_id, instance_id])
}

/// Key of all instances of a service.
pub fn instance_service_key(domain: &str, project: &str, service_id: &str) -> IndexKey {
    IndexKey::from_parts([domain, project, service_id])
}

/// `domain/project/serviceId/instanceId`
pub fn instance_id_index(inst: &Instance) -> Option<IndexKey> {
    let body = inst.instance.as_ref()?;
    Some(instance_id_key(
        &inst.domain,
        &inst.project,
        &body.service_id,
        &body.instance_id,
    ))
}

/// `domain/project/serviceId`
pub fn instance_service_index(inst: &Instance) -> Option<IndexKey> {
    let body = inst.instance.as_ref()?;
    Some(instance_service_key(&inst.domain, &inst.project, &body.service_id))
}

/// Index functions of the instance kind, in registration order.
pub fn instance_index_funcs() -> IndexFuncs<Instance> {
    IndexFuncs::new()
        .with(instance_id_index)
        .with(instance_service_index)
}

/// Build the instance cache from options.
pub fn new_instance_cache(options: CacheOptions) -> EntityCache<Instance> {
    EntityCache::with_options(options, instance_index_funcs())
}

/// Factory registering the instance cache with its decoder.
pub fn new_instance_cacher() -> EntityCacher<Instance> {
    let options = CacheOptions::default().with_table(INSTANCE);
    EntityCacher::new(new_instance_cache(options), json_decoder())
}
