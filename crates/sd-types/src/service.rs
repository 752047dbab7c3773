//! Service registration records.

use std::collections::BTreeMap;

use sd_core::Entity;
use serde::{Deserialize, Serialize};

/// Entity-kind name of service records.
pub const SERVICE: &str = "service";

/// A stored service document: tenancy plus the micro-service definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Tenant domain.
    #[serde(default)]
    pub domain: String,
    /// Tenant project.
    #[serde(default)]
    pub project: String,
    /// User-defined tags.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    /// The service definition. Absent on partially written documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<MicroService>,
}

/// A micro-service definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MicroService {
    /// Unique service id.
    pub service_id: String,
    /// Application the service belongs to.
    pub app_id: String,
    /// Service name.
    pub service_name: String,
    /// Semantic version string.
    pub version: String,
    /// Free-form description.
    pub description: String,
    /// Service level, e.g. `FRONT` or `BACK`.
    pub level: String,
    /// Registered schema ids.
    pub schemas: Vec<String>,
    /// Service status, e.g. `UP`.
    pub status: String,
    /// Deployment environment.
    pub environment: String,
    /// Extended properties.
    pub properties: BTreeMap<String, String>,
    /// Creation timestamp (unix seconds, as string).
    pub timestamp: String,
    /// Last modification timestamp (unix seconds, as string).
    pub mod_timestamp: String,
}

impl Service {
    /// Create a service record in the given tenancy.
    pub fn new(domain: impl Into<String>, project: impl Into<String>, service: MicroService) -> Self {
        Self {
            domain: domain.into(),
            project: project.into(),
            tags: BTreeMap::new(),
            service: Some(service),
        }
    }

    /// Add a tag.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

impl MicroService {
    /// Create a service definition.
    pub fn new(
        service_id: impl Into<String>,
        app_id: impl Into<String>,
        service_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            app_id: app_id.into(),
            service_name: service_name.into(),
            version: version.into(),
            status: "UP".to_string(),
            ..Self::default()
        }
    }

    /// Set the environment.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Set a property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl Entity for Service {
    const KIND: &'static str = SERVICE;

    fn is_valid(&self) -> bool {
        self.service.is_some()
    }
}
