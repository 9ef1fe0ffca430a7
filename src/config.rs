//! Server configuration from environment variables

use std::net::IpAddr;
use thiserror::Error;

use crate::llm::groq::{GroqConfig, DEFAULT_MODEL, GROQ_BASE_URL};
use crate::store::FirestoreConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "5000";

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Which document store backs the gateways
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Firestore(FirestoreConfig),
    Memory,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Everything the server needs at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub groq: GroqConfig,
    pub store: StoreBackend,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = parse(
            "HOST",
            &get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
        )?;
        let port = parse(
            "PORT",
            &get("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string()),
        )?;

        let api_key = get("GROQ_API_KEY").ok_or(ConfigError::Missing("GROQ_API_KEY"))?;
        let groq = GroqConfig::new(api_key)
            .with_base_url(get("GROQ_BASE_URL").unwrap_or_else(|| GROQ_BASE_URL.to_string()))
            .with_model(get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()));

        let backend = get("STORE_BACKEND").unwrap_or_else(|| "firestore".to_string());
        let store = match backend.to_ascii_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            "firestore" => {
                let project_id = get("FIRESTORE_PROJECT_ID")
                    .or_else(|| get("GOOGLE_CLOUD_PROJECT"))
                    .ok_or(ConfigError::Missing("FIRESTORE_PROJECT_ID"))?;
                let mut config = FirestoreConfig::new(project_id);
                if let Some(database) = get("FIRESTORE_DATABASE_ID") {
                    config = config.with_database(database);
                }
                if let Some(host) = get("FIRESTORE_EMULATOR_HOST") {
                    config = config.with_emulator_host(host);
                }
                StoreBackend::Firestore(config)
            }
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORE_BACKEND",
                    message: format!("expected 'firestore' or 'memory', got '{}'", other),
                })
            }
        };

        let log_format = match get("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    message: format!("expected 'text' or 'json', got '{}'", other),
                })
            }
        };

        Ok(Self {
            host,
            port,
            groq,
            store,
            log_format,
        })
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> (IpAddr, u16) {
        (self.host, self.port)
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })
}
