//! Service configuration loader for LingoChat.
//!
//! Reads `config.toml` from the data directory (`~/.lingochat/` by default)
//! and deserializes it into [`ServiceConfig`]. Falls back to defaults when
//! the file is missing or malformed. A few settings can be overridden from
//! the environment; credentials are only ever read from the environment.

use std::path::{Path, PathBuf};

use lingochat_types::config::ServiceConfig;
use secrecy::SecretString;

pub const DATA_DIR_ENV: &str = "LINGOCHAT_DATA_DIR";
pub const PORT_ENV: &str = "PORT";
pub const DATABASE_URL_ENV: &str = "LINGOCHAT_DATABASE_URL";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const SERVICE_BUS_ENV: &str = "SERVICE_BUS_CONNECTION_STRING";

/// `LINGOCHAT_DATA_DIR`, falling back to `~/.lingochat`.
pub fn default_data_dir() -> PathBuf {
    match std::env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".lingochat")
        }
    }
}

/// Load service configuration from `{data_dir}/config.toml`, then apply
/// environment overrides.
pub async fn load_service_config(data_dir: &Path) -> ServiceConfig {
    let config = read_config_file(data_dir).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

async fn read_config_file(data_dir: &Path) -> ServiceConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ServiceConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ServiceConfig::default();
        }
    };

    match toml::from_str::<ServiceConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ServiceConfig::default()
        }
    }
}

/// Apply `PORT` and `LINGOCHAT_DATABASE_URL` on top of file settings.
pub fn apply_env_overrides(
    mut config: ServiceConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ServiceConfig {
    if let Some(port) = lookup(PORT_ENV) {
        match port.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => tracing::warn!(value = %port, "Ignoring invalid PORT"),
        }
    }
    if let Some(url) = lookup(DATABASE_URL_ENV).filter(|u| !u.is_empty()) {
        config.database.url = Some(url);
    }
    config
}

/// Secrets needed to reach external services.
pub struct Credentials {
    pub gemini_api_key: Option<SecretString>,
    pub service_bus_connection_string: Option<SecretString>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secret = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from)
        };
        Self {
            gemini_api_key: secret(GEMINI_API_KEY_ENV),
            service_bus_connection_string: secret(SERVICE_BUS_ENV),
        }
    }
}
