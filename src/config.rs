//! Client configuration, resolved once at startup.
//!
//! Sources, later ones winning:
//! 1. built-in defaults (the service on `http://127.0.0.1:5000`)
//! 2. a TOML file named by `TREATMENT_PREDICTOR_CONFIG`
//! 3. `PREDICTOR_BASE_URL`, `PREDICTOR_TIMEOUT_SECS`, `PREDICTOR_CONNECT_TIMEOUT_SECS`
//!
//! A `.env` file in the working directory is loaded before the environment is read.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const CONFIG_PATH_VAR: &str = "TREATMENT_PREDICTOR_CONFIG";
pub const BASE_URL_VAR: &str = "PREDICTOR_BASE_URL";
pub const TIMEOUT_VAR: &str = "PREDICTOR_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "PREDICTOR_CONNECT_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: Url,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
            user_agent: format!("treatment-predictor/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Resolves the configuration from every source.
    pub fn load() -> ClientResult<Self> {
        dotenv::dotenv().ok();

        let config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        let config = config.with_env(|key| std::env::var(key).ok())?;

        info!(base_url = %config.base_url, "Client configuration loaded");
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::config(format!("cannot read {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Reading configuration file");
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> ClientResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ClientError::config(e.to_string()))?;
        config.validate()
    }

    /// Applies overrides from a variable lookup.
    pub fn with_env<F>(mut self, lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_VAR) {
            self.base_url = Url::parse(url.trim())?;
        }
        if let Some(secs) = lookup(TIMEOUT_VAR) {
            self.request_timeout_secs = parse_secs(TIMEOUT_VAR, &secs)?;
        }
        if let Some(secs) = lookup(CONNECT_TIMEOUT_VAR) {
            self.connect_timeout_secs = parse_secs(CONNECT_TIMEOUT_VAR, &secs)?;
        }
        self.validate()
    }

    pub fn with_base_url(mut self, base_url: &str) -> ClientResult<Self> {
        self.base_url = Url::parse(base_url)?;
        self.validate()
    }

    /// Checks the invariants and normalizes the base URL to end in `/`, so
    /// endpoint paths join underneath it instead of replacing its last segment.
    pub fn validate(mut self) -> ClientResult<Self> {
        match self.base_url.scheme() {
            "http" | "https" => {}
            other => return Err(ClientError::config(format!("unsupported scheme `{}`", other))),
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(ClientError::config("timeouts must be greater than zero"));
        }
        if !self.base_url.path().ends_with('/') {
            let path = format!("{}/", self.base_url.path());
            self.base_url.set_path(&path);
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Absolute URL of an endpoint below the base URL.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

fn parse_secs(var: &str, value: &str) -> ClientResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ClientError::config(format!("{} must be a whole number of seconds, got {:?}", var, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoint("/predict_treatment").unwrap().as_str(),
            "http://127.0.0.1:5000/predict_treatment"
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::default()
            .with_env(env(&[
                (BASE_URL_VAR, "https://predict.example.org/api"),
                (TIMEOUT_VAR, "8"),
            ]))
            .unwrap();

        assert_eq!(config.request_timeout_secs, 8);
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(
            config.endpoint("get_cancer_categories").unwrap().as_str(),
            "https://predict.example.org/api/get_cancer_categories"
        );
    }

    #[test]
    fn test_invalid_env_values() {
        assert!(ClientConfig::default()
            .with_env(env(&[(TIMEOUT_VAR, "soon")]))
            .is_err());
        assert!(ClientConfig::default()
            .with_env(env(&[(TIMEOUT_VAR, "0")]))
            .is_err());
        assert!(ClientConfig::default()
            .with_env(env(&[(BASE_URL_VAR, "not a url")]))
            .is_err());
        assert!(ClientConfig::default()
            .with_env(env(&[(BASE_URL_VAR, "ftp://127.0.0.1/")]))
            .is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://10.0.0.7:5000\"").unwrap();
        writeln!(file, "request_timeout_secs = 12").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url.as_str(), "http://10.0.0.7:5000/");
        assert_eq!(config.request_timeout_secs, 12);
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::from_file("/nonexistent/predictor.toml").unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
