use config::{self, ConfigError, Environment};
use reqwest::Url;
use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::services::error::{Error, Result};

fn default_url() -> String {
    String::from("postgresql://localhost:5432/localdb")
}

fn default_max_connections() -> u32 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Builds the pool without connecting; the first query opens a connection.
    pub fn init(&self) -> Result<PgPool> {
        validate_url("database", &self.url)?;
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_lazy(&self.url)
            .map_err(|e| Error::Configuration(format!("invalid database url: {e}")))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: default_url(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetQueryConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub master_db_url: String,
    #[serde(default)]
    pub use_master_db: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl AssetQueryConfig {
    pub fn new() -> Result<AssetQueryConfig, ConfigError> {
        let prefix = std::env::var("PREFIX").unwrap_or_else(|_| String::from("asset_query"));
        config::Config::builder()
            .add_source(Environment::with_prefix(&prefix).separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        validate_url("database", &self.database.url)?;
        validate_url("master", &self.master_db_url)?;
        if self.request_timeout_secs == 0 {
            return Err(Error::Configuration(
                "request timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for AssetQueryConfig {
    fn default() -> Self {
        AssetQueryConfig {
            database: DatabaseConfig::default(),
            master_db_url: String::default(),
            use_master_db: false,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn validate_url(name: &str, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(Error::Configuration(format!("{name} URL cannot be empty")));
    }
    Url::parse(url)
        .map(|_| ())
        .map_err(|e| Error::Configuration(format!("invalid {name} URL format: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(master: &str) -> AssetQueryConfig {
        AssetQueryConfig {
            master_db_url: master.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_master_url_is_rejected() {
        let err = config("").validate().expect_err("empty url must fail");
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn malformed_master_url_is_rejected() {
        let err = config("not a url").validate().expect_err("bad url must fail");
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn empty_database_url_is_rejected() {
        let mut cfg = config("https://master.example.com");
        cfg.database.url = "  ".to_string();
        assert!(matches!(cfg.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn defaults_are_valid_with_master_url() {
        let cfg = config("https://master.example.com");
        cfg.validate().expect("valid config");
        assert!(!cfg.use_master_db);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
    }
}
