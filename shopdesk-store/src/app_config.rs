use serde::Deserialize;
use shopdesk_catalog::{DiscountSchedule, DiscountTier, PricingError};
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

fn default_host() -> String { "0.0.0.0".to_string() }

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// JSON fixture loaded by the memory backend
    pub seed_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: None, max_connections: default_max_connections() }
    }
}

fn default_max_connections() -> u32 { 5 }

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    #[serde(default = "default_tiers")]
    pub tiers: Vec<DiscountTier>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self { tiers: default_tiers() }
    }
}

fn default_tiers() -> Vec<DiscountTier> {
    DiscountSchedule::default().tiers().to_vec()
}

impl PricingConfig {
    pub fn schedule(&self) -> Result<DiscountSchedule, PricingError> {
        DiscountSchedule::new(self.tiers.clone())
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Uncommitted local overrides
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `SHOPDESK__SERVER__PORT=9000`
            .add_source(
                config::Environment::with_prefix("SHOPDESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }

    /// Build a config from a single TOML document, without files or environment.
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8080

            [auth]
            jwt_secret = "secret"
            jwt_expiration_seconds = 3600
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.pricing.schedule().unwrap(), DiscountSchedule::default());
    }

    #[test]
    fn test_custom_tiers() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8080

            [storage]
            backend = "memory"
            seed_file = "config/seed.json"

            [auth]
            jwt_secret = "secret"
            jwt_expiration_seconds = 60

            [[pricing.tiers]]
            min_quantity = 10
            percent_off = 3

            [[pricing.tiers]]
            min_quantity = 40
            percent_off = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.seed_file.as_deref(), Some("config/seed.json"));
        let schedule = config.pricing.schedule().unwrap();
        assert_eq!(schedule.tiers()[0], DiscountTier { min_quantity: 40, percent_off: 12 });
    }
}
