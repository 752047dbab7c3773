//! The `service` entity kind.
//!
//! Services are indexed by id, by full identity including version, and by
//! identity across versions. Key layout, in this field order:
//!
//! | index                   | key                                         |
//! |-------------------------|---------------------------------------------|
//! | [`service_id_index`]      | `domain/project/serviceId`                  |
//! | [`service_info_index`]    | `domain/project/appId/serviceName/version`  |
//! | [`service_version_index`] | `domain/project/appId/serviceName`          |

use sd_core::IndexKey;
use sd_types::{Service, SERVICE};

use crate::cache::EntityCache;
use crate::cacher::{json_decoder, EntityCacher};
use crate::config::CacheOptions;
use crate::index_funcs::IndexFuncs;

/// Key of a service by id.
pub fn service_id_key(domain: &str, project: &str, service_id: &str) -> IndexKey {
    IndexKey::from_parts([domain, project, service_id])
}

/// Key of a service by app, name and version.
pub fn service_info_key(
    domain: &str,
    project: &str,
    app_id: &str,
    service_name: &str,
    version: &str,
) -> IndexKey {
    IndexKey::from_parts([domain, project, app_id, service_name, version])
}

/// Key of all versions of a service.
pub fn service_version_key(
    domain: &str,
    project: &str,
    app_id: &str,
    service_name: &str,
) -> IndexKey {
    IndexKey::from_parts([domain, project, app_id, service_name])
}

/// `domain/project/serviceId`
pub fn service_id_index(svc: &Service) -> Option<IndexKey> {
    let ms = svc.service.as_ref()?;
    Some(service_id_key(&svc.domain, &svc.project, &ms.service_id))
}

/// `domain/project/appId/serviceName/version`
pub fn service_info_index(svc: &Service) -> Option<IndexKey> {
    let ms = svc.service.as_ref()?;
    Some(service_info_key(
        &svc.domain,
        &svc.project,
        &ms.app_id,
        &ms.service_name,
        &ms.version,
    ))
}

/// `domain/project/appId/serviceName`
pub fn service_version_index(svc: &Service) -> Option<IndexKey> {
    let ms = svc.service.as_ref()?;
    Some(service_version_key(
        &svc.domain,
        &svc.project,
        &ms.app_id,
        &ms.service_name,
    ))
}

/// Index functions of the service kind, in registration order.
pub fn service_index_funcs() -> IndexFuncs<Service> {
    IndexFuncs::new()
        .with(service_id_index)
        .with(service_info_index)
        .with(service_version_index)
}

/// Build the service cache from options.
pub fn new_service_cache(options: CacheOptions) -> EntityCache<Service> {
    EntityCache::with_options(options, service_index_funcs())
}

/// Factory registering the service cache with its decoder.
pub fn new_service_cacher() -> EntityCacher<Service> {
    let options = CacheOptions::default().with_table(SERVICE);
    EntityCacher::new(new_service_cache(options), json_decoder())
}
