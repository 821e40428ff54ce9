//! Monitored resource identity and the reporting metadata derived from it

use crate::error::{HealthError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PROVIDER: &str = "azure";
pub const CATEGORY: &str = "compute";
pub const SERVICE_NAME: &str = "VM";

/// Identity of a single virtual machine. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentity {
    name: String,
    resource_group: String,
    subscription_id: String,
    region: String,
}

impl ResourceIdentity {
    pub fn new(
        name: impl Into<String>,
        resource_group: impl Into<String>,
        subscription_id: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<Self> {
        let identity = Self {
            name: name.into(),
            resource_group: resource_group.into(),
            subscription_id: subscription_id.into(),
            region: region.into(),
        };

        for (field, value) in [
            ("name", &identity.name),
            ("resource_group", &identity.resource_group),
            ("subscription_id", &identity.subscription_id),
            ("region", &identity.region),
        ] {
            if value.trim().is_empty() {
                return Err(HealthError::invalid_identity(field));
            }
        }

        Ok(identity)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn metadata(&self) -> CheckMetadata {
        CheckMetadata::for_identity(self)
    }
}

impl std::fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.resource_group, self.name)
    }
}

/// Labels attached to a check for the reporting side. Opaque to evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckMetadata(BTreeMap<String, String>);

impl CheckMetadata {
    fn for_identity(identity: &ResourceIdentity) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert("provider".to_string(), PROVIDER.to_string());
        labels.insert("region".to_string(), identity.region.clone());
        labels.insert("category".to_string(), CATEGORY.to_string());
        labels.insert("serviceName".to_string(), SERVICE_NAME.to_string());
        labels.insert("subId".to_string(), identity.subscription_id.clone());
        Self(labels)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> ResourceIdentity {
        ResourceIdentity::new("web-01", "prod-rg", "sub-123", "westeurope").unwrap()
    }

    #[test]
    fn test_identity_accessors() {
        let identity = identity();
        assert_eq!(identity.name(), "web-01");
        assert_eq!(identity.resource_group(), "prod-rg");
        assert_eq!(identity.subscription_id(), "sub-123");
        assert_eq!(identity.region(), "westeurope");
        assert_eq!(identity.to_string(), "prod-rg/web-01");
    }

    #[test]
    fn test_identity_rejects_blank_fields() {
        assert!(ResourceIdentity::new("", "rg", "sub", "region").is_err());
        assert!(ResourceIdentity::new("vm", "  ", "sub", "region").is_err());
        assert!(ResourceIdentity::new("vm", "rg", "", "region").is_err());

        match ResourceIdentity::new("vm", "rg", "sub", "") {
            Err(HealthError::InvalidIdentity(msg)) => assert!(msg.contains("region")),
            other => panic!("expected invalid identity, got {:?}", other),
        }
    }

    #[test]
    fn test_metadata_labels() {
        let metadata = identity().metadata();
        assert_eq!(metadata.len(), 5);
        assert_eq!(metadata.get("provider"), Some("azure"));
        assert_eq!(metadata.get("region"), Some("westeurope"));
        assert_eq!(metadata.get("category"), Some("compute"));
        assert_eq!(metadata.get("serviceName"), Some("VM"));
        assert_eq!(metadata.get("subId"), Some("sub-123"));
        assert_eq!(metadata.get("missing"), None);
    }

    #[test]
    fn test_metadata_serializes_as_object() {
        let json = serde_json::to_value(identity().metadata()).unwrap();
        assert_eq!(json["serviceName"], "VM");
        assert_eq!(json["subId"], "sub-123");
    }
}
