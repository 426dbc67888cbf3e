//! Gateway configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. TOML file (`blog-gateway.toml`, or the path given on the command line)
//! 3. the plain `PORT`, `SUPABASE_URL` and `SUPABASE_ANON_KEY` variables
//! 4. `BLOG_GATEWAY_*` variables
//! 5. command-line overrides

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_TROPHY_URL, cors};
use crate::options::{CorsOptions, ValidationError};
use crate::origin::AllowedOrigins;
use clap::ValueEnum;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "blog-gateway.toml";
pub const ENV_PREFIX: &str = "BLOG_GATEWAY_";
pub const DEFAULT_PORT: u16 = 3000;

const RAW_ENV_KEYS: [&str; 3] = ["PORT", "SUPABASE_URL", "SUPABASE_ANON_KEY"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("configuration file {0} does not exist")]
    MissingFile(PathBuf),

    #[error("{0} must be set when the supabase store is selected")]
    MissingValue(&'static str),

    #[error("base_url must not be empty")]
    EmptyBaseUrl,

    #[error(transparent)]
    Cors(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Supabase,
    Memory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Public origin used for sitemap `<loc>` entries.
    pub base_url: String,
    pub trophy_url: String,
    pub allowed_origins: Vec<String>,
    pub log_format: LogFormat,
    pub store: StoreKind,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            trophy_url: DEFAULT_TROPHY_URL.to_string(),
            allowed_origins: cors::DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
            log_format: LogFormat::default(),
            store: StoreKind::default(),
        }
    }
}

/// Values supplied on the command line. Unset fields leave the lower layers
/// alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<LogFormat>,
}

impl GatewayConfig {
    /// Every layer except the command line.
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let file = config_file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(GatewayConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::raw().only(&RAW_ENV_KEYS))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(
        config_file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = config_file
            && !path.exists()
        {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }

        let config: GatewayConfig = Self::figment(config_file)
            .merge(Serialized::defaults(overrides.clone()))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store == StoreKind::Supabase {
            if self.supabase_url.trim().is_empty() {
                return Err(ConfigError::MissingValue("SUPABASE_URL"));
            }
            if self.supabase_anon_key.trim().is_empty() {
                return Err(ConfigError::MissingValue("SUPABASE_ANON_KEY"));
            }
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        self.cors_options()?;
        Ok(())
    }

    pub fn cors_options(&self) -> Result<CorsOptions, ValidationError> {
        let options =
            CorsOptions::with_origins(AllowedOrigins::list(self.allowed_origins.iter()));
        options.validate()?;
        Ok(options)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
