//! Credential resolution.
//!
//! markhub authenticates against GitHub with a single personal access token
//! read from the process environment. Lookups go through the
//! [`ConfigSource`] trait so that tests and embedders can supply their own
//! values without touching the real environment.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;

use crate::error::{ConfigError, Result};

/// Name of the environment variable holding the GitHub token.
pub const DEFAULT_TOKEN_VAR: &str = "GITHUB_PAT";

/// A source of named configuration values.
pub trait ConfigSource: Send + Sync {
    /// Returns the raw value for `name`, if set.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads values from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<S: ConfigSource + ?Sized> ConfigSource for &S {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

impl<S: ConfigSource + ?Sized> ConfigSource for Arc<S> {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// Resolves a required secret from `source`.
///
/// Surrounding whitespace is trimmed; a value that is empty afterwards is
/// treated as missing.
///
/// # Errors
///
/// Returns [`ConfigError::MissingValue`] naming `name` if the value is
/// absent or empty.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use markhub_config::credential::resolve;
///
/// let mut env = HashMap::new();
/// env.insert("GITHUB_PAT".to_string(), "ghp_xxx".to_string());
///
/// assert!(resolve(&env, "GITHUB_PAT").is_ok());
/// assert!(resolve(&env, "OTHER_TOKEN").is_err());
/// ```
pub fn resolve(source: &dyn ConfigSource, name: &str) -> Result<SecretString> {
    match source.var(name) {
        Some(value) if !value.trim().is_empty() => Ok(SecretString::from(value.trim().to_string())),
        _ => Err(ConfigError::MissingValue {
            name: name.to_string(),
        }),
    }
}
