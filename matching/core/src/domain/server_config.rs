// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Server Configuration Types
//
// Defines the configuration schema for a Huddle server, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - HTTP bind settings
// - Storage backend selection (in-memory or PostgreSQL)
// - Match-group sampling timeout
// - Logging level and format

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::repository::{PostgresConfig, StorageBackend};

pub const API_VERSION: &str = "huddle/v1";
pub const KIND: &str = "ServerConfig";

/// Default deadline for one sampling run.
pub const DEFAULT_MATCH_TIMEOUT_MS: u64 = 50_000;

/// Top-level Kubernetes-style server configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfigManifest {
    /// API version (must be "huddle/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ServerConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: ServerConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable server name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfigSpec {
    #[serde(default)]
    pub server: HttpConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    InMemory {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed_file: Option<PathBuf>,
    },
    Postgres {
        connection_string: String,
        #[serde(default = "default_max_connections")]
        max_connections: u32,
    },
}

impl StorageConfig {
    pub fn to_backend(&self) -> StorageBackend {
        match self {
            StorageConfig::InMemory { seed_file } => StorageBackend::InMemory {
                seed_file: seed_file.clone(),
            },
            StorageConfig::Postgres {
                connection_string,
                max_connections,
            } => StorageBackend::PostgreSQL(PostgresConfig {
                connection_string: connection_string.clone(),
                max_connections: *max_connections,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Deadline for one sampling run, in milliseconds
    #[serde(default = "default_match_timeout_ms")]
    pub timeout_ms: u64,
}

impl MatchingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    5
}

fn default_match_timeout_ms() -> u64 {
    DEFAULT_MATCH_TIMEOUT_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::InMemory { seed_file: None }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_match_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Compact,
        }
    }
}

impl Default for ServerConfigManifest {
    fn default() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "huddle-server".to_string());

        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: hostname,
                labels: None,
            },
            spec: ServerConfigSpec::default(),
        }
    }
}

impl ServerConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Candidate config locations, in precedence order
    /// 1. HUDDLE_CONFIG_PATH environment variable
    /// 2. ./huddle-config.yaml (working directory)
    /// 3. ~/.huddle/config.yaml (user home)
    /// 4. /etc/huddle/config.yaml (system)
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("HUDDLE_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("./huddle-config.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".huddle").join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/huddle/config.yaml"));

        paths
    }

    /// First existing file among [`Self::search_paths`]
    pub fn discover_config() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // 1. Explicit CLI path (Fail if missing/invalid)
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        // 2. Discovery (Env -> Cwd -> Home -> System)
        let mut config = if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            Self::from_yaml_file(config_path)?
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("HUDDLE_DATABASE_URL") {
            tracing::info!("Environment override: HUDDLE_DATABASE_URL (storage backend = postgres)");
            let max_connections = match &self.spec.storage {
                StorageConfig::Postgres { max_connections, .. } => *max_connections,
                StorageConfig::InMemory { .. } => default_max_connections(),
            };
            self.spec.storage = StorageConfig::Postgres {
                connection_string: url,
                max_connections,
            };
        }

        if let Some(val) = lookup("HUDDLE_MATCH_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(ms) => {
                    tracing::info!("Environment override: HUDDLE_MATCH_TIMEOUT_MS={}", ms);
                    self.spec.matching.timeout_ms = ms;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for HUDDLE_MATCH_TIMEOUT_MS: '{}'. Expected milliseconds. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        if self.spec.server.port == 0 {
            anyhow::bail!("spec.server.port cannot be 0");
        }

        if self.spec.matching.timeout_ms == 0 {
            anyhow::bail!("spec.matching.timeout_ms must be greater than 0");
        }

        if let StorageConfig::Postgres {
            connection_string,
            max_connections,
        } = &self.spec.storage
        {
            if connection_string.is_empty() {
                anyhow::bail!("spec.storage.connection_string cannot be empty for postgres");
            }
            if *max_connections == 0 {
                anyhow::bail!("spec.storage.max_connections must be greater than 0");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let manifest = ServerConfigManifest::default();
        assert_eq!(manifest.api_version, "huddle/v1");
        assert_eq!(manifest.kind, "ServerConfig");
        assert!(!manifest.metadata.name.is_empty());
        assert_eq!(manifest.spec.storage, StorageConfig::InMemory { seed_file: None });
        assert_eq!(manifest.spec.matching.timeout_ms, 50_000);
        assert_eq!(manifest.spec.server.port, 8080);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_parse_postgres_manifest() {
        let yaml = r#"
apiVersion: huddle/v1
kind: ServerConfig
metadata:
  name: huddle-prod
spec:
  server:
    port: 9000
  storage:
    backend: postgres
    connection_string: postgres://huddle@db/huddle
  matching:
    timeout_ms: 1500
  logging:
    format: json
"#;
        let manifest = ServerConfigManifest::from_yaml_str(yaml).unwrap();
        assert_eq!(manifest.spec.server.port, 9000);
        assert_eq!(manifest.spec.server.bind_address, "0.0.0.0");
        assert_eq!(
            manifest.spec.storage,
            StorageConfig::Postgres {
                connection_string: "postgres://huddle@db/huddle".to_string(),
                max_connections: 5,
            }
        );
        assert_eq!(manifest.spec.matching.timeout(), Duration::from_millis(1500));
        assert_eq!(manifest.spec.logging.format, LogFormat::Json);
        assert_eq!(manifest.spec.logging.level, "info");
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huddle-config.yaml");

        let mut manifest = ServerConfigManifest::default();
        manifest.metadata.name = "roundtrip".to_string();
        manifest.spec.matching.timeout_ms = 250;
        manifest.to_yaml_file(&path).unwrap();

        let loaded = ServerConfigManifest::load_or_default(Some(path)).unwrap();
        assert_eq!(loaded.metadata.name, "roundtrip");
        assert_eq!(loaded.spec.matching.timeout_ms, 250);
    }

    #[test]
    fn test_missing_explicit_path_fails() {
        let result = ServerConfigManifest::load_or_default(Some(PathBuf::from(
            "/nonexistent/huddle-config.yaml",
        )));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let mut manifest = ServerConfigManifest::default();
        manifest.apply_overrides(|key| match key {
            "HUDDLE_DATABASE_URL" => Some("postgres://localhost/huddle".to_string()),
            "HUDDLE_MATCH_TIMEOUT_MS" => Some("1200".to_string()),
            _ => None,
        });
        assert!(matches!(manifest.spec.storage, StorageConfig::Postgres { .. }));
        assert_eq!(manifest.spec.matching.timeout_ms, 1200);

        manifest.apply_overrides(|key| match key {
            "HUDDLE_MATCH_TIMEOUT_MS" => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(manifest.spec.matching.timeout_ms, 1200);
    }

    #[test]
    fn test_validation() {
        let mut manifest = ServerConfigManifest::default();
        assert!(manifest.validate().is_ok());

        manifest.api_version = "wrong/v1".to_string();
        assert!(manifest.validate().is_err());
        manifest.api_version = API_VERSION.to_string();

        manifest.kind = "NodeConfig".to_string();
        assert!(manifest.validate().is_err());
        manifest.kind = KIND.to_string();

        manifest.metadata.name = "".to_string();
        assert!(manifest.validate().is_err());
        manifest.metadata.name = "huddle".to_string();

        manifest.spec.matching.timeout_ms = 0;
        assert!(manifest.validate().is_err());
        manifest.spec.matching.timeout_ms = 10;

        manifest.spec.storage = StorageConfig::Postgres {
            connection_string: "".to_string(),
            max_connections: 5,
        };
        assert!(manifest.validate().is_err());
    }
}
