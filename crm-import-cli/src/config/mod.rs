//! Run configuration
//!
//! Defaults can be overridden by a TOML file in the platform config
//! directory, the `CRM_IMPORT_API_URL` environment variable, and finally the
//! command-line flags (applied by the handler).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::resilience::RetryConfig;

/// Environment variable overriding the endpoint URL
pub const API_URL_ENV: &str = "CRM_IMPORT_API_URL";

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/opportunities/";

/// Resolved configuration for one import run
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Endpoint receiving one POST per record
    pub api_url: String,
    /// Directory where the success/failure log files are created
    pub log_dir: PathBuf,
    /// Retry policy for each record's submission
    pub retry: RetryConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_dir: PathBuf::from("."),
            retry: RetryConfig::default(),
        }
    }
}

/// On-disk configuration; every field is optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_url: Option<String>,
    log_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
    max_attempts: Option<u32>,
    backoff_secs: Option<u64>,
}

impl ImportConfig {
    /// Load the configuration, layering the config file and environment over
    /// the built-in defaults.
    ///
    /// An explicitly passed path must exist; the default location is ignored
    /// when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file does not exist: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::default_path().filter(|p| p.exists()),
        };

        if let Some(path) = path {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let file: ConfigFile = toml::from_str(&raw)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.apply(file);
        }

        if let Ok(url) = env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }

        Ok(config)
    }

    /// Default config file location, e.g. `~/.config/crm-import/config.toml`
    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("crm-import").join("config.toml"))
    }

    fn apply(&mut self, file: ConfigFile) {
        if let Some(url) = file.api_url {
            self.api_url = url;
        }
        if let Some(dir) = file.log_dir {
            self.log_dir = dir;
        }
        if let Some(secs) = file.timeout_secs {
            self.retry.request_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = file.max_attempts {
            self.retry.max_attempts = attempts.max(1);
        }
        if let Some(secs) = file.backoff_secs {
            self.retry.backoff = Duration::from_secs(secs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.log_dir, PathBuf::from("."));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.request_timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_apply_overrides_only_present_fields() {
        let mut config = ImportConfig::default();
        config.apply(ConfigFile {
            api_url: Some("http://crm.internal/opportunities/".into()),
            log_dir: None,
            timeout_secs: Some(10),
            max_attempts: None,
            backoff_secs: Some(2),
        });

        assert_eq!(config.api_url, "http://crm.internal/opportunities/");
        assert_eq!(config.log_dir, PathBuf::from("."));
        assert_eq!(config.retry.request_timeout, Duration::from_secs(10));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff, Duration::from_secs(2));
    }

    #[test]
    fn test_parse_config_file() {
        let file: ConfigFile = toml::from_str(
            r#"
            api_url = "http://crm.internal/opportunities/"
            log_dir = "logs"
            timeout_secs = 30
            max_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(
            file.api_url.as_deref(),
            Some("http://crm.internal/opportunities/")
        );
        assert_eq!(file.log_dir, Some(PathBuf::from("logs")));
        assert_eq!(file.timeout_secs, Some(30));
        assert_eq!(file.max_attempts, Some(5));
        assert_eq!(file.backoff_secs, None);
    }

    #[test]
    fn test_zero_max_attempts_clamped() {
        let mut config = ImportConfig::default();
        config.apply(ConfigFile {
            max_attempts: Some(0),
            ..Default::default()
        });
        assert_eq!(config.retry.max_attempts, 1);
    }
}
