//! Service instance records.

use std::collections::BTreeMap;

use sd_core::Entity;
use serde::{Deserialize, Serialize};

/// Entity-kind name of instance records.
pub const INSTANCE: &str = "instance";

/// A stored instance document: tenancy plus the instance definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Tenant domain.
    #[serde(default)]
    pub domain: String,
    /// Tenant project.
    #[serde(default)]
    pub project: String,
    /// Time of the last heartbeat, as written by the registry.
    #[serde(default)]
    pub refresh_time: String,
    /// The instance definition. Absent on partially written documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<MicroServiceInstance>,
}

/// A running instance of a micro-service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MicroServiceInstance {
    /// Unique instance id.
    pub instance_id: String,
    /// Id of the service this instance belongs to.
    pub service_id: String,
    /// Reachable endpoints, e.g. `rest://10.0.0.1:8080`.
    pub endpoints: Vec<String>,
    /// Host name.
    pub host_name: String,
    /// Instance status, e.g. `UP`.
    pub status: String,
    /// Version of the service this instance runs.
    pub version: String,
    /// Heartbeat configuration.
    pub health_check: Option<HealthCheck>,
    /// Extended properties.
    pub properties: BTreeMap<String, String>,
    /// Creation timestamp (unix seconds, as string).
    pub timestamp: String,
    /// Last modification timestamp (unix seconds, as string).
    pub mod_timestamp: String,
}

/// Heartbeat configuration of an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheck {
    /// Check mode, e.g. `push`.
    pub mode: String,
    /// Heartbeat interval in seconds.
    pub interval: u32,
    /// Missed heartbeats tolerated before expiry.
    pub times: u32,
}

impl Instance {
    /// Create an instance record in the given tenancy.
    pub fn new(
        domain: impl Into<String>,
        project: impl Into<String>,
        instance: MicroServiceInstance,
    ) -> Self {
        Self {
            domain: domain.into(),
            project: project.into(),
            refresh_time: String::new(),
            instance: Some(instance),
        }
    }

    /// Set the heartbeat time.
    pub fn refresh_time(mut self, refresh_time: impl Into<String>) -> Self {
        self.refresh_time = refresh_time.into();
        self
    }
}

impl MicroServiceInstance {
    /// Create an instance definition.
    pub fn new(instance_id: impl Into<String>, service_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            service_id: service_id.into(),
            status: "UP".to_string(),
            ..Self::default()
        }
    }

    /// Add an endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.push(endpoint.into());
        self
    }

    /// Set the host name.
    pub fn host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = host_name.into();
        self
    }

    /// Set the status.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

impl Entity for Instance {
    const KIND: &'static str = INSTANCE;

    fn is_valid(&self) -> bool {
        self.instance.is_some()
    }
}
