use crate::error::Result;
use crate::identity::ResourceIdentity;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_PREFIX: &str = "VMHEALTH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub resource: ResourceConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: String,
    pub resource_group: String,
    pub subscription_id: String,
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub snapshot_path: PathBuf,
    /// 0 disables the per-call deadline.
    pub request_timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("./snapshot.json"),
            request_timeout_seconds: 30,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl AppConfig {
    pub fn load() -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let fields = [
            ("resource.name", &self.resource.name),
            ("resource.resource_group", &self.resource.resource_group),
            ("resource.subscription_id", &self.resource.subscription_id),
            ("resource.region", &self.resource.region),
        ];

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{} cannot be empty", field)));
            }
        }

        if self.client.snapshot_path.as_os_str().is_empty() {
            return Err(ConfigError::Message(
                "client.snapshot_path cannot be empty".to_string(),
            ));
        }

        if self.client.request_timeout_seconds == 0 {
            tracing::warn!("Resource client timeout disabled - calls may block indefinitely");
        }

        Ok(())
    }

    pub fn identity(&self) -> Result<ResourceIdentity> {
        ResourceIdentity::new(
            self.resource.name.clone(),
            self.resource.resource_group.clone(),
            self.resource.subscription_id.clone(),
            self.resource.region.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> AppConfig {
        let mut config = AppConfig::default();
        config.resource = ResourceConfig {
            name: "web-01".to_string(),
            resource_group: "prod-rg".to_string(),
            subscription_id: "sub-123".to_string(),
            region: "westeurope".to_string(),
        };
        config
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.resource.name.is_empty());
        assert_eq!(config.client.snapshot_path, PathBuf::from("./snapshot.json"));
        assert_eq!(config.client.request_timeout(), Some(Duration::from_secs(30)));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(configured().validate().is_ok());

        let mut config = configured();
        config.resource.region = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = configured();
        config.client.snapshot_path = PathBuf::new();
        assert!(config.validate().is_err());

        let mut config = configured();
        config.client.request_timeout_seconds = 0;
        assert!(config.validate().is_ok());
        assert_eq!(config.client.request_timeout(), None);
    }

    #[test]
    fn test_identity_from_config() {
        let identity = configured().identity().unwrap();
        assert_eq!(identity.name(), "web-01");
        assert_eq!(identity.resource_group(), "prod-rg");
        assert!(AppConfig::default().identity().is_err());
    }

    // Env values stay strings until deserialized, so numeric-looking
    // identifiers keep their leading zeros.
    #[test]
    fn test_config_loading_from_environment() {
        std::env::set_var("VMHEALTH__RESOURCE__NAME", "007");
        std::env::set_var("VMHEALTH__RESOURCE__RESOURCE_GROUP", "env-rg");
        std::env::set_var("VMHEALTH__RESOURCE__SUBSCRIPTION_ID", "00000000");
        std::env::set_var("VMHEALTH__RESOURCE__REGION", "1e5");
        std::env::set_var("VMHEALTH__CLIENT__REQUEST_TIMEOUT_SECONDS", "5");

        let config = AppConfig::load().expect("Should load configuration from environment");

        assert_eq!(config.resource.name, "007");
        assert_eq!(config.resource.resource_group, "env-rg");
        assert_eq!(config.resource.subscription_id, "00000000");
        assert_eq!(config.resource.region, "1e5");
        assert_eq!(config.client.request_timeout_seconds, 5);

        let identity = config.identity().unwrap();
        assert_eq!(identity.name(), "007");
        assert_eq!(identity.subscription_id(), "00000000");
    }
}
