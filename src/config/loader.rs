//! Configuration Loader
//!
//! Environment-aware configuration loading: discovers the base and environment
//! files, then layers environment variables on top.

use config::{Config, Environment, File};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::ConfigResult;
use super::{redact_url, AppConfig};
use crate::constants::environments;

const CONFIG_FILE_STEM: &str = "base-api";
const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// Top-level keys read from the process environment; nested keys use `__`
const ENV_KEYS: &[&str] = &[
    "ENVIRONMENT",
    "DATABASE_URL",
    "MIGRATE_DATABASE_URL",
    "BROKER_URL",
    "RESULT_BACKEND_URL",
];
const ENV_SECTION_PREFIXES: &[&str] = &["SERVER__", "DATABASE__", "WORKER__"];

/// Builds an [`AppConfig`] from files and environment variables
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: Option<String>,
    env_vars: Option<HashMap<String, String>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader reading `./config` and the process environment
    pub fn new() -> Self {
        Self {
            config_dir: PathBuf::from("config"),
            environment: None,
            env_vars: None,
        }
    }

    pub fn with_config_dir(mut self, config_dir: impl Into<PathBuf>) -> Self {
        self.config_dir = config_dir.into();
        self
    }

    /// Pin the environment instead of reading `ENVIRONMENT`
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Use these variables instead of the process environment
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn load(&self) -> ConfigResult<AppConfig> {
        let env_vars = self.relevant_env_vars();
        let environment = self
            .environment
            .clone()
            .or_else(|| env_vars.get(ENVIRONMENT_VAR).cloned())
            .unwrap_or_else(|| environments::DEVELOPMENT.to_string());

        debug!(
            environment = %environment,
            config_dir = %self.config_dir.display(),
            "Loading configuration"
        );

        let settings = Config::builder()
            .add_source(File::with_name(&file_stem(&self.config_dir, None)).required(false))
            .add_source(
                File::with_name(&file_stem(&self.config_dir, Some(&environment)))
                    .required(false),
            )
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env_vars.into_iter().collect())),
            )
            .set_override(
                "environment",
                config::Value::from(environment.as_str()),
            )?
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        debug!(
            environment = %config.environment,
            database_url = %redact_url(&config.database_url),
            broker_url = %redact_url(&config.broker_url),
            result_backend_url = %redact_url(&config.result_backend_url),
            bind_address = %config.server.bind_address(),
            "Configuration loaded"
        );

        Ok(config)
    }

    fn relevant_env_vars(&self) -> HashMap<String, String> {
        let vars: Box<dyn Iterator<Item = (String, String)>> = match &self.env_vars {
            Some(vars) => Box::new(vars.clone().into_iter()),
            None => Box::new(std::env::vars()),
        };
        vars.filter(|(key, _)| is_relevant_key(key)).collect()
    }
}

fn is_relevant_key(key: &str) -> bool {
    ENV_KEYS.contains(&key)
        || ENV_SECTION_PREFIXES
            .iter()
            .any(|prefix| key.starts_with(prefix))
}

fn file_stem(config_dir: &Path, environment: Option<&str>) -> String {
    let name = match environment {
        Some(env) => format!("{CONFIG_FILE_STEM}.{env}"),
        None => CONFIG_FILE_STEM.to_string(),
    };
    config_dir.join(name).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_loads_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::new()
            .with_config_dir(dir.path())
            .with_env_vars(no_env())
            .load()
            .unwrap();

        assert_eq!(config.environment, "development");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.worker.results_queue, "task_results");
    }

    #[test]
    fn test_environment_file_overrides_base_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("base-api.toml"),
            "database_url = \"postgresql://base/db\"\n[server]\nport = 9000\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("base-api.production.toml"),
            "[server]\nport = 9100\n",
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_config_dir(dir.path())
            .with_environment("production")
            .with_env_vars(no_env())
            .load()
            .unwrap();

        assert_eq!(config.environment, "production");
        assert_eq!(config.database_url, "postgresql://base/db");
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_environment_comes_from_environment_variable() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("base-api.production.toml"),
            "[server]\nport = 9100\n",
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_config_dir(dir.path())
            .with_env_vars(vec![(
                "ENVIRONMENT".to_string(),
                "production".to_string(),
            )])
            .load()
            .unwrap();

        assert_eq!(config.environment, "production");
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_env_vars_take_precedence() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("base-api.toml"),
            "broker_url = \"postgresql://file/broker\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_config_dir(dir.path())
            .with_env_vars([
                ("ENVIRONMENT", "testing"),
                ("BROKER_URL", "postgresql://env/broker"),
                ("SERVER__PORT", "8123"),
                ("WORKER__POLL_INTERVAL_MS", "250"),
                ("UNRELATED_SERVER", "ignored"),
            ])
            .load()
            .unwrap();

        assert!(config.is_testing());
        assert_eq!(config.broker_url, "postgresql://env/broker");
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.worker.poll_interval_ms, 250);
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let dir = TempDir::new().unwrap();
        let result = ConfigLoader::new()
            .with_config_dir(dir.path())
            .with_env_vars([("DATABASE__MAX_CONNECTIONS", "0")])
            .load();

        assert!(result.is_err());
    }

    #[test]
    fn test_relevant_keys() {
        assert!(is_relevant_key("DATABASE_URL"));
        assert!(is_relevant_key("SERVER__HOST"));
        assert!(!is_relevant_key("PATH"));
        assert!(!is_relevant_key("SERVER"));
    }
}
