//! Core configuration struct and loading logic.
//!
//! [`Config`] holds the server settings. Values come from, in increasing
//! priority: built-in defaults, an optional config file, and environment
//! variables. The GitHub token is deliberately not part of this struct; it is
//! resolved lazily by [`crate::credential::resolve`] on first client use.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::credential::{ConfigSource, DEFAULT_TOKEN_VAR};
use crate::error::{ConfigError, Result};
use crate::persistence::{find_config_file, read_config_file};

/// Environment variable overriding [`Config::host`].
pub const HOST_VAR: &str = "MARKHUB_HOST";
/// Environment variable overriding [`Config::port`].
pub const PORT_VAR: &str = "MARKHUB_PORT";
/// Environment variable overriding [`Config::cache_ttl_secs`].
pub const CACHE_TTL_VAR: &str = "MARKHUB_CACHE_TTL_SECS";
/// Environment variable overriding [`Config::api_base_url`].
pub const API_URL_VAR: &str = "GITHUB_API_URL";

/// Server configuration.
///
/// # Examples
///
/// ```
/// use markhub_config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.port, 3000);
/// assert_eq!(config.token_var, "GITHUB_PAT");
/// assert!(config.cache_ttl().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub host: String,

    /// Port the HTTP server listens on.
    pub port: u16,

    /// Base URL of the GitHub REST API, for GitHub Enterprise installs.
    ///
    /// `None` means `https://api.github.com`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Lifetime of cached HTTP responses in seconds. Zero disables caching.
    pub cache_ttl_secs: u64,

    /// Name of the environment variable holding the GitHub token.
    pub token_var: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_base_url: None,
            cache_ttl_secs: 0,
            token_var: DEFAULT_TOKEN_VAR.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the default file locations, then applies
    /// overrides from `env`.
    ///
    /// Without a config file, defaults are used as the base.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed,
    /// or if an environment override is invalid.
    pub fn load(env: &dyn ConfigSource) -> Result<Self> {
        let config = match find_config_file() {
            Some(path) => read_config_file(path)?,
            None => Self::default(),
        };
        config.with_env(env)
    }

    /// Loads configuration from a specific file, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails
    /// validation.
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides on top of `self`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a numeric override does not
    /// parse, or if the result fails validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use markhub_config::Config;
    ///
    /// let mut env = HashMap::new();
    /// env.insert("MARKHUB_PORT".to_string(), "8080".to_string());
    ///
    /// let config = Config::default().with_env(&env).unwrap();
    /// assert_eq!(config.port, 8080);
    /// ```
    pub fn with_env(mut self, env: &dyn ConfigSource) -> Result<Self> {
        if let Some(host) = env.var(HOST_VAR) {
            self.host = host;
        }
        if let Some(port) = env.var(PORT_VAR) {
            self.port = parse_var(PORT_VAR, &port)?;
        }
        if let Some(ttl) = env.var(CACHE_TTL_VAR) {
            self.cache_ttl_secs = parse_var(CACHE_TTL_VAR, &ttl)?;
        }
        if let Some(url) = env.var(API_URL_VAR) {
            self.api_base_url = Some(url);
        }
        self.validate()?;
        Ok(self)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the host or token variable name is empty, or if
    /// the API base URL is not an http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(invalid("host", "must not be empty"));
        }
        if self.token_var.trim().is_empty() {
            return Err(invalid("token_var", "must not be empty"));
        }
        if let Some(url) = &self.api_base_url
            && !(url.starts_with("https://") || url.starts_with("http://"))
        {
            return Err(invalid("api_base_url", "must be an http(s) URL"));
        }
        Ok(())
    }

    /// Returns the `host:port` address to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the response cache lifetime, or `None` when caching is off.
    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| invalid(name, &e.to_string()))
}

fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(config.api_base_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_every_field() {
        let config = Config::default()
            .with_env(&env(&[
                (HOST_VAR, "0.0.0.0"),
                (PORT_VAR, "8080"),
                (CACHE_TTL_VAR, "300"),
                (API_URL_VAR, "https://github.example.com/api/v3"),
            ]))
            .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(300)));
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("https://github.example.com/api/v3")
        );
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = Config::default()
            .with_env(&env(&[(PORT_VAR, "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == PORT_VAR));
    }

    #[test]
    fn non_http_api_url_is_rejected() {
        let err = Config::default()
            .with_env(&env(&[(API_URL_VAR, "ftp://example.com")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn zero_ttl_disables_cache() {
        let config = Config::default()
            .with_env(&env(&[(CACHE_TTL_VAR, "0")]))
            .unwrap();
        assert!(config.cache_ttl().is_none());
    }

    #[test]
    fn deserialize_partial_uses_defaults() {
        let config: Config = serde_json5::from_str("{ port: 9000 }").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.token_var, DEFAULT_TOKEN_VAR);
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("markhub.json5");
        std::fs::write(
            &path,
            r#"
            {
                // local development
                host: "0.0.0.0",
                port: 4000,
                cache_ttl_secs: 60,
                token_var: "MY_TOKEN",
            }
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:4000");
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.token_var, "MY_TOKEN");
    }

    #[test]
    fn load_from_rejects_empty_host() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("markhub.json");
        std::fs::write(&path, r#"{"host": ""}"#).unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
