use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::{env, fs, io, time::Duration};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "coach.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("postgres storage requires a database url")]
    MissingDatabaseUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

impl std::str::FromStr for StorageBackend {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" => Ok(Self::Postgres),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_addr: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    // Pool sizing only matters for the postgres backend.
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            database_url: None,
            max_connections: 5,
            acquire_timeout_ms: 3000,
        }
    }
}

impl StorageConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub base_url: String,
    pub verify_timeout_ms: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3002".to_string(),
            verify_timeout_ms: 1500,
        }
    }
}

// Runtime settings: TOML file first, then environment overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub identity: IdentityConfig,
}

impl Config {
    // Reads `COACH_CONFIG` (or ./coach.toml when present) and applies env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("COACH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_overrides(|name| env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    // A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup("COACH_BIND_ADDR") {
            self.http.bind_addr = value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "COACH_BIND_ADDR",
                value,
            })?;
        }
        if let Some(value) = lookup("COACH_STORAGE") {
            self.storage.backend = value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "COACH_STORAGE",
                value,
            })?;
        }
        if let Some(value) = lookup("DATABASE_URL") {
            self.storage.database_url = Some(value);
        }
        if let Some(value) = lookup("COACH_DB_MAX_CONNECTIONS") {
            self.storage.max_connections = value
                .parse()
                .ok()
                .filter(|max| *max > 0)
                .ok_or(ConfigError::InvalidEnv {
                    name: "COACH_DB_MAX_CONNECTIONS",
                    value,
                })?;
        }
        if let Some(value) = lookup("IDENTITY_SERVICE_URL") {
            self.identity.base_url = value;
        }
        if let Some(value) = lookup("IDENTITY_VERIFY_TIMEOUT_MS") {
            self.identity.verify_timeout_ms =
                value.parse().map_err(|_| ConfigError::InvalidEnv {
                    name: "IDENTITY_VERIFY_TIMEOUT_MS",
                    value,
                })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_url = self
            .storage
            .database_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if self.storage.backend == StorageBackend::Postgres && !has_url {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        Ok(())
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_millis(self.identity.verify_timeout_ms)
    }
}
