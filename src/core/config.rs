use std::path::Path;

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::Result;
use crate::{
    DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL, DEFAULT_KNOWLEDGE_BASE_PATH, DEFAULT_PORT,
    DEFAULT_SIMILARITY_THRESHOLD,
};


pub const ENV_PREFIX: &str = "COLLEGEBOT";


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    
    pub host: String,
    pub port: u16,

    
    pub knowledge_base_path: String,

    
    pub similarity_threshold: f64,
    pub similarity_cache_size: usize,
    pub similarity_cache_ttl_secs: u64,

    
    pub max_sessions: usize,
    pub session_ttl_secs: u64,

    
    pub rng_seed: Option<u64>,
}

impl BotConfig {
    
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            knowledge_base_path: DEFAULT_KNOWLEDGE_BASE_PATH.to_string(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            similarity_cache_size: DEFAULT_CACHE_SIZE,
            similarity_cache_ttl_secs: DEFAULT_CACHE_TTL,
            max_sessions: 10_000,
            session_ttl_secs: 24 * 60 * 60,
            rng_seed: None,
        }
    }

    
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Optional `collegebot.*` file (or the explicit path), then `COLLEGEBOT_*`
    /// variables, then the bare `PORT` variable hosting platforms hand out.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder();
        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("collegebot").required(false)),
        };
        let builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let mut config = Self::from_builder(builder)?;

        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            debug!("PORT override: {}", port);
            config.port = port;
        }

        Ok(config)
    }

    
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_builder(Config::builder().add_source(File::from_str(json, FileFormat::Json)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        Ok(builder.build()?.try_deserialize()?)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.knowledge_base_path, "data/college_data.json");
        assert!((config.similarity_threshold - 0.15).abs() < f64::EPSILON);
        assert!(config.rng_seed.is_none());
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = BotConfig::from_json_str(r#"{"port": 8080, "rng_seed": 7}"#).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.max_sessions, 10_000);
    }

    #[test]
    fn test_invalid_type_is_config_error() {
        let err = BotConfig::from_json_str(r#"{"port": "not a port"}"#).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
