use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct PeopleConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    /// Overrides the database named in `uri`.
    pub database: Option<String>,
}

impl PeopleConfig {
    pub fn load() -> Result<Self, AppError> {
        // Handles .env, PORT and LOG_LEVEL.
        let common_config = core_config::Config::load()?;

        Ok(PeopleConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: required_env("DATABASE_URL")?,
                database: optional_env("DATABASE_NAME"),
            },
        })
    }
}

fn required_env(key: &str) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required but not set",
            key
        ))),
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.is_empty())
}
