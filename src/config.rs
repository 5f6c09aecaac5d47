use config::{Config, ConfigError, Map};
use serde::Deserialize;
use std::time::Duration;

/// Backend location when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/bank/v1";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Optional config file, looked up as `banking-client.{toml,json,yaml,...}`
pub const CONFIG_FILE: &str = "banking-client";

/// Environment prefix: `BANKING_API_URL`, `BANKING_TIMEOUT_SECS`, `BANKING_LOG_LEVEL`
pub const ENV_PREFIX: &str = "BANKING";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, then `banking-client.toml` if present, then `BANKING_*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        Self::load_layers(file, None)
    }

    /// `env` replaces the process environment when given.
    fn load_layers(file: &str, env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .add_source(config::File::with_name(file).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(env))
            .build()?
            .try_deserialize::<ClientConfig>()?;

        // A zero timeout would fail every request before it is sent
        if config.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_point_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://localhost:8080/api/bank/v1");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = ClientConfig::load_layers("no-such-banking-client-config", env(&[])).unwrap();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("banking-client-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("client.toml");
        fs::write(
            &path,
            "api_url = \"http://bank.internal:9000/api/bank/v1\"\ntimeout_secs = 3\n",
        )
        .unwrap();

        let stem = dir.join("client");
        let config = ClientConfig::load_layers(stem.to_str().unwrap(), env(&[])).unwrap();

        assert_eq!(config.api_url, "http://bank.internal:9000/api/bank/v1");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);

        fs::remove_dir_all(&dir).ok();
    }

    fn env(vars: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        let dir = std::env::temp_dir().join(format!("banking-client-env-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("client.toml"),
            "api_url = \"http://from-file:9000/api/bank/v1\"\ntimeout_secs = 3\n",
        )
        .unwrap();

        let stem = dir.join("client");
        let config = ClientConfig::load_layers(
            stem.to_str().unwrap(),
            env(&[
                ("BANKING_API_URL", "http://from-env:7000/api/bank/v1"),
                ("BANKING_TIMEOUT_SECS", "25"),
                ("OTHER_LOG_LEVEL", "trace"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_url, "http://from-env:7000/api/bank/v1");
        assert_eq!(config.timeout(), Duration::from_secs(25));
        // Unprefixed variables are ignored
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_env_overrides_defaults_without_file() {
        let config = ClientConfig::load_layers(
            "no-such-banking-client-config",
            env(&[("BANKING_LOG_LEVEL", "debug")]),
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = ClientConfig::load_layers(
            "no-such-banking-client-config",
            env(&[("BANKING_TIMEOUT_SECS", "0")]),
        )
        .unwrap_err();

        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_api_url_override() {
        let config = ClientConfig::default().with_api_url("http://example.test/api");
        assert_eq!(config.api_url, "http://example.test/api");
    }
}
