//! Configuration management for markhub.
//!
//! This crate handles loading server settings from files and the environment,
//! and resolving the GitHub credential.
//!
//! # Overview
//!
//! - [`config`]: Server configuration struct and loading logic
//! - [`credential`]: Required-secret lookup through a [`ConfigSource`]
//! - [`persistence`]: Config file discovery and reading
//! - [`error`]: Error types for configuration operations
//!
//! # Configuration Sources (Priority)
//!
//! 1. Environment variables (`MARKHUB_*`, `GITHUB_API_URL`)
//! 2. Local config (`./markhub.json5` or `./markhub.json`)
//! 3. User config (`~/.config/markhub/config.json5` or `config.json`)
//! 4. Built-in defaults
//!
//! The GitHub token (`GITHUB_PAT` by default) is only ever read from the
//! environment, and only when the first GitHub client is built.
//!
//! # Examples
//!
//! ```no_run
//! use markhub_config::{Config, ProcessEnv};
//!
//! # fn example() -> markhub_config::Result<()> {
//! let config = Config::load(&ProcessEnv)?;
//! println!("Listening on {}", config.bind_address());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credential;
pub mod error;
pub mod persistence;

pub use config::Config;
pub use credential::{ConfigSource, DEFAULT_TOKEN_VAR, ProcessEnv};
pub use error::{ConfigError, Result};
