//! Layered configuration loading.
//!
//! The process reads a single config file whose path comes from the
//! `CONFIG_PATH` environment variable. The file may be YAML, TOML or JSON;
//! format is inferred from the extension. Missing or unparsable config is a
//! startup failure — there is no compiled-in fallback for the required keys.

use std::env;

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_PATH_VAR: &str = "CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub apps: AppsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppsConfig {
    pub rest: RestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestConfig {
    pub port: u16,
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    pub jwt_header_name: String,
    pub jwt_validation_url: String,
    pub board_validation_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub users: BackendConfig,
    #[serde(default)]
    pub rooms: BackendConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(rename = "type", default = "default_backend_type")]
    pub kind: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: default_backend_type(),
        }
    }
}

fn default_backend_type() -> String {
    "in-memory".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(rename = "type", default = "default_backend_type")]
    pub kind: String,
    #[serde(default = "default_cache_ttl")]
    pub ttl: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            kind: default_backend_type(),
            ttl: default_cache_ttl(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub write_to_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            write_to_file: false,
        }
    }
}

fn default_log_level() -> String {
    "INFO".to_string()
}

/// Load the config file named by `CONFIG_PATH`, failing fast with a clear
/// error if the variable is unset or the file can't be read/parsed.
pub fn load() -> Result<AppConfig> {
    let path = env::var(CONFIG_PATH_VAR)
        .with_context(|| format!("{CONFIG_PATH_VAR} environment variable is not set"))?;

    let settings = config::Config::builder()
        .add_source(config::File::with_name(&path))
        .build()
        .with_context(|| format!("failed to read config file at {path}"))?;

    settings
        .try_deserialize::<AppConfig>()
        .with_context(|| format!("failed to parse config file at {path}"))
}

/// Resolve a configured storage/cache backend selector, warning and falling
/// back to `in-memory` for anything this binary doesn't implement.
pub fn resolve_backend(label: &str, kind: &str) -> &'static str {
    match kind {
        "in-memory" => "in-memory",
        other => {
            tracing::warn!(
                backend = label,
                requested = other,
                "unknown backend type, falling back to in-memory"
            );
            "in-memory"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fall_back_to_in_memory() {
        let cfg = StorageConfig::default();
        assert_eq!(cfg.users.kind, "in-memory");
        assert_eq!(cfg.rooms.kind, "in-memory");
    }

    #[test]
    fn cache_defaults_have_a_positive_ttl() {
        let cfg = CacheConfig::default();
        assert_eq!(cfg.kind, "in-memory");
        assert_eq!(cfg.ttl, 60);
    }

    #[test]
    fn resolve_backend_falls_back_on_unknown_type() {
        assert_eq!(resolve_backend("users", "redis"), "in-memory");
        assert_eq!(resolve_backend("users", "in-memory"), "in-memory");
    }

    #[test]
    fn parses_full_yaml_document() {
        let yaml = r#"
apps:
  rest:
    port: 8080
    validation:
      jwt_header_name: X-Jwt
      jwt_validation_url: http://auth.internal/validate
      board_validation_url: http://boards.internal/validate
storage:
  users:
    type: in-memory
  rooms:
    type: in-memory
cache:
  type: in-memory
  ttl: 120
logging:
  level: DEBUG
  write_to_file: true
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, yaml).unwrap();

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .unwrap();
        let cfg: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(cfg.apps.rest.port, 8080);
        assert_eq!(cfg.apps.rest.validation.jwt_header_name, "X-Jwt");
        assert_eq!(cfg.cache.ttl, 120);
        assert_eq!(cfg.logging.level, "DEBUG");
        assert!(cfg.logging.write_to_file);
    }
}
