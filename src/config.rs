//! Runtime configuration.
//!
//! Values come from an optional JSON settings file, then from the process
//! environment (after `.env` has been loaded by `main`). Environment values win.
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("development") {
            Environment::Development
        } else {
            Environment::Production
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Where chat messages are forwarded. `None` is reported per request.
    pub webhook_url: Option<String>,
    pub upstream_timeout: Duration,
    pub environment: Environment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            webhook_url: None,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            environment: Environment::default(),
        }
    }
}

/// Shape of the JSON settings file: `{ "N8N": { "WebhookUrl": "..." } }`.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(rename = "N8N", default)]
    n8n: N8nSection,
}

#[derive(Debug, Default, Deserialize)]
struct N8nSection {
    #[serde(rename = "WebhookUrl", default)]
    webhook_url: Option<String>,
}

impl SettingsFile {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Config {
    /// Reads configuration from the settings file and environment variables.
    ///
    /// | Variable                | Default                           |
    /// |-------------------------|-----------------------------------|
    /// | `CONFIG_FILE`           | `appsettings.json` if it exists   |
    /// | `N8N_WEBHOOK_URL`       | `N8N.WebhookUrl` from the file    |
    /// | `N8N__WEBHOOKURL`       | same as above                     |
    /// | `BIND_ADDR`             | `0.0.0.0:3000`                    |
    /// | `UPSTREAM_TIMEOUT_SECS` | `15`                              |
    /// | `APP_ENV`               | `production`                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();

        let settings_path = match non_blank(lookup("CONFIG_FILE")) {
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_SETTINGS_FILE)).filter(|p| p.exists()),
        };

        let settings = match settings_path {
            Some(path) => SettingsFile::read(&path)?,
            None => SettingsFile::default(),
        };

        Self::resolve(settings, lookup)
    }

    /// Like [`Config::from_env`], but reading the settings file at `path`
    /// and looking variables up with `lookup` instead of the process env.
    pub fn from_sources<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = match path {
            Some(path) => SettingsFile::read(path)?,
            None => SettingsFile::default(),
        };
        Self::resolve(settings, lookup)
    }

    fn resolve<F>(settings: SettingsFile, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let webhook_url = non_blank(lookup("N8N_WEBHOOK_URL"))
            .or_else(|| non_blank(lookup("N8N__WEBHOOKURL")))
            .or_else(|| non_blank(settings.n8n.webhook_url));

        let bind_addr = match non_blank(lookup("BIND_ADDR")) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "BIND_ADDR",
                value,
            })?,
            None => Config::default().bind_addr,
        };

        let upstream_timeout = match non_blank(lookup("UPSTREAM_TIMEOUT_SECS")) {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "UPSTREAM_TIMEOUT_SECS",
                        value,
                    });
                }
            },
            None => DEFAULT_UPSTREAM_TIMEOUT,
        };

        let environment = non_blank(lookup("APP_ENV"))
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            webhook_url,
            upstream_timeout,
            environment,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn settings_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_any_source() {
        let config = Config::from_sources(None, lookup_from(&[])).unwrap();
        assert_eq!(config.webhook_url, None);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.upstream_timeout, Duration::from_secs(15));
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn blank_webhook_url_counts_as_missing() {
        let config =
            Config::from_sources(None, lookup_from(&[("N8N_WEBHOOK_URL", "   ")])).unwrap();
        assert_eq!(config.webhook_url, None);
    }

    #[test]
    fn reads_webhook_url_from_settings_file() {
        let file = settings_file(r#"{"N8N": {"WebhookUrl": "http://n8n.local/hook"}}"#);
        let config = Config::from_sources(Some(file.path()), lookup_from(&[])).unwrap();
        assert_eq!(config.webhook_url.as_deref(), Some("http://n8n.local/hook"));
    }

    #[test]
    fn environment_overrides_settings_file() {
        let file = settings_file(r#"{"N8N": {"WebhookUrl": "http://from-file/hook"}}"#);
        let config = Config::from_sources(
            Some(file.path()),
            lookup_from(&[("N8N__WEBHOOKURL", "http://from-env/hook")]),
        )
        .unwrap();
        assert_eq!(config.webhook_url.as_deref(), Some("http://from-env/hook"));
    }

    #[test]
    fn malformed_settings_file_is_an_error() {
        let file = settings_file("{not json");
        let err = Config::from_sources(Some(file.path()), lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Config::from_sources(None, lookup_from(&[("UPSTREAM_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "UPSTREAM_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn development_environment_is_case_insensitive() {
        let config =
            Config::from_sources(None, lookup_from(&[("APP_ENV", "Development")])).unwrap();
        assert_eq!(config.environment, Environment::Development);
    }
}
