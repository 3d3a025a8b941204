//! Configuration module for relpick.
//!
//! Handles loading and parsing the .relpickrc configuration file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::api::Identifier;
use crate::api::http::DEFAULT_TIMEOUT_SECS;
use crate::endpoint::{ApiEnvironment, EndpointConfig};
use crate::logging::LogConfig;
use crate::picker::debounce::{DEFAULT_DEBOUNCE_MS, MAX_DEBOUNCE_MS, MIN_DEBOUNCE_MS};
use crate::picker::selection::InsertPolicy;

/// Origin used when neither the file nor the command line names one.
pub const DEFAULT_ORIGIN: &str = "http://localhost";

/// Default .relpickrc file content.
const DEFAULT_RELPICKRC: &str = r#"# relpick Configuration File
# ===========================
# Lines starting with '#' are comments.
# Command-line flags override every value here.
#
# Site
# ----
# origin = http://localhost        # Site used when no domain is given
# api_root = http://localhost/wp-json/
# domain = https://network.example.com
# blog_path = /sub/                # Path of the blog to query
# site_id = 3                      # Blog id; its path is looked up remotely
# token = <nonce>                  # Sent as _wpnonce

# Endpoint
# --------
# namespace = wp/v2
# resource_type = posts            # Only used with the default namespace
# site_namespace = hpu/v1          # Namespace serving the blogs routes

# Picker
# ------
# debounce_ms = 300                # Quiet interval before searching (1-2000)
# insert_policy = append           # append or prepend
# http_timeout_secs = 30

# Logging Configuration
# ---------------------
# Logs are stored in ~/.relpick/logs/ with automatic cleanup.
#
# log_enabled = true       # Enable/disable file logging (true/false)
# log_level = info         # Log level: trace, debug, info, warn, error, off
# log_retention = 24       # Hours to keep log files (default: 24)
"#;

/// Errors from loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: invalid value {value:?} for {key}")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to config file.
    pub config_path: PathBuf,
    /// Ambient site origin.
    pub origin: String,
    /// Ambient API root; derived from the origin when unset.
    pub api_root: Option<String>,
    /// Domain override.
    pub domain: Option<String>,
    /// Blog path override.
    pub blog_path: Option<String>,
    /// Blog id whose path is looked up.
    pub site_id: Option<Identifier>,
    /// REST namespace; `wp/v2` when unset.
    pub namespace: Option<String>,
    /// Resource collection; `posts` only with the default namespace.
    pub resource_type: Option<String>,
    pub site_namespace: Option<String>,
    /// Nonce sent as `_wpnonce`.
    pub token: Option<String>,
    pub debounce_ms: u64,
    pub insert_policy: InsertPolicy,
    pub http_timeout_secs: u64,
    /// Logging configuration.
    pub log_config: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: Self::default_config_path(),
            origin: DEFAULT_ORIGIN.to_string(),
            api_root: None,
            domain: None,
            blog_path: None,
            site_id: None,
            namespace: None,
            resource_type: None,
            site_namespace: None,
            token: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            insert_policy: InsertPolicy::default(),
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_config: LogConfig::default(),
        }
    }
}

impl Config {
    /// Returns the default config file path (~/.relpickrc).
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".relpickrc")
    }

    /// Loads configuration from the default path, creating it if it doesn't exist.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or holds an invalid value.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_config_path())
    }

    /// Loads configuration from a specific path.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or holds an invalid value.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if !path.exists() {
            Self::create_default_config(path).map_err(io_error)?;
        }

        let content = fs::read_to_string(path).map_err(io_error)?;
        let mut config = Self {
            config_path: path.to_path_buf(),
            ..Self::default()
        };
        config.parse(&content)?;
        Ok(config)
    }

    fn create_default_config(path: &Path) -> io::Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_RELPICKRC.as_bytes())?;
        Ok(())
    }

    /// Parses config file content on top of the current values.
    ///
    /// # Errors
    /// Returns error on the first value that cannot be parsed.
    pub fn parse(&mut self, content: &str) -> Result<(), ConfigError> {
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.split('#').next().unwrap_or(value).trim();

                self.apply_setting(key, value)
                    .map_err(|()| ConfigError::InvalidValue {
                        line: index + 1,
                        key: key.to_string(),
                        value: value.to_string(),
                    })?;
            }
        }
        Ok(())
    }

    /// Applies a single setting. `Err` means the value is malformed.
    fn apply_setting(&mut self, key: &str, value: &str) -> Result<(), ()> {
        let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());

        match key {
            "origin" => {
                if value.is_empty() {
                    return Err(());
                }
                self.origin = value.to_string();
            }
            "api_root" => self.api_root = optional(value),
            "domain" => self.domain = optional(value),
            "blog_path" => self.blog_path = optional(value),
            "site_id" => {
                self.site_id = match value {
                    "" => None,
                    _ => Some(Identifier::parse(value)),
                };
            }
            "namespace" => self.namespace = optional(value),
            "resource_type" => self.resource_type = optional(value),
            "site_namespace" => self.site_namespace = optional(value),
            "token" => self.token = optional(value),
            "debounce_ms" => self.debounce_ms = parse_debounce(value).ok_or(())?,
            "insert_policy" => {
                self.insert_policy = match value.to_lowercase().as_str() {
                    "append" | "prepend" => InsertPolicy::parse(value),
                    _ => return Err(()),
                };
            }
            "http_timeout_secs" => {
                self.http_timeout_secs = value.parse().ok().filter(|s| *s > 0).ok_or(())?;
            }
            "log_level" => self.log_config.level = LogConfig::parse_level(value),
            "log_retention" | "log_retention_hours" => {
                self.log_config.retention_hours = LogConfig::parse_retention(value);
            }
            "log_enabled" | "logging" => self.log_config.enabled = parse_bool(value),
            _ => warn!("[CONFIG] Ignoring unknown setting {}", key),
        }
        Ok(())
    }

    /// Builds the picker endpoint configuration.
    #[must_use]
    pub fn endpoint_config(&self) -> EndpointConfig {
        let mut endpoint = EndpointConfig {
            namespace: self.namespace.clone(),
            resource_type: self.resource_type.clone(),
            site_namespace: self.site_namespace.clone(),
            ..EndpointConfig::default()
        };
        if let Some(domain) = &self.domain {
            endpoint = endpoint.with_domain(domain.clone());
        }
        if let Some(path) = &self.blog_path {
            endpoint = endpoint.with_path(path.clone());
        }
        if let Some(id) = &self.site_id {
            endpoint = endpoint.with_site_id(id.clone());
        }
        if let Some(token) = &self.token {
            endpoint = endpoint.with_token(token.clone());
        }
        endpoint
    }

    /// Builds the ambient API environment.
    #[must_use]
    pub fn environment(&self) -> ApiEnvironment {
        let environment = ApiEnvironment::new(self.origin.clone());
        match &self.api_root {
            Some(root) => environment.with_api_root(root.clone()),
            None => environment,
        }
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Parses a debounce interval within the accepted range.
#[must_use]
pub fn parse_debounce(value: &str) -> Option<u64> {
    value
        .parse()
        .ok()
        .filter(|ms| (MIN_DEBOUNCE_MS..=MAX_DEBOUNCE_MS).contains(ms))
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "yes" | "1" | "on")
}
