//! Shared configuration for Courier
//!
//! This crate is the single source of truth for the startup URL, the browser
//! process command-line switches, and the CEF subprocess settings. Values are
//! layered: built-in defaults, then an optional JSON file named by
//! `COURIER_CONFIG`, then individual `COURIER_*` environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default page loaded by the single browser instance
pub const DEFAULT_STARTUP_URL: &str = "about:blank";

/// Environment variable naming an optional JSON config file
pub const CONFIG_PATH_ENV: &str = "COURIER_CONFIG";

/// Environment variable overriding the startup URL
pub const STARTUP_URL_ENV: &str = "COURIER_STARTUP_URL";

/// Environment variable toggling `--single-process`
pub const SINGLE_PROCESS_ENV: &str = "COURIER_SINGLE_PROCESS";

/// Environment variable toggling `--use-mock-keychain`
pub const MOCK_KEYCHAIN_ENV: &str = "COURIER_MOCK_KEYCHAIN";

/// Environment variable toggling the CEF sandbox
pub const NO_SANDBOX_ENV: &str = "COURIER_NO_SANDBOX";

/// Environment variable pointing at the subprocess helper binary
pub const HELPER_PATH_ENV: &str = "COURIER_HELPER_PATH";

/// Helper path variable understood by other CEF hosts, accepted as a fallback
pub const LEGACY_HELPER_PATH_ENV: &str = "CEF_HELPER_PATH";

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Startup configuration for the browser host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourierConfig {
    /// URL the browser instance navigates to at creation
    pub startup_url: String,
    /// Append `--single-process` for the browser process
    pub single_process: bool,
    /// Append `--use-mock-keychain` so macOS never prompts for the keychain.
    /// Cookies are stored unencrypted when this is set.
    pub disable_credential_prompt: bool,
    /// Run CEF without its sandbox
    pub no_sandbox: bool,
    /// Explicit path to the subprocess helper binary
    pub helper_path: Option<PathBuf>,
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            startup_url: DEFAULT_STARTUP_URL.to_string(),
            single_process: true,
            disable_credential_prompt: true,
            no_sandbox: true,
            helper_path: None,
        }
    }
}

impl CourierConfig {
    /// Load defaults, the optional config file, then environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `COURIER_*` overrides read through `lookup`
    ///
    /// Boolean values that cannot be parsed are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(STARTUP_URL_ENV).filter(|url| !url.is_empty()) {
            self.startup_url = url;
        }
        if let Some(value) = lookup_flag(&lookup, SINGLE_PROCESS_ENV) {
            self.single_process = value;
        }
        if let Some(value) = lookup_flag(&lookup, MOCK_KEYCHAIN_ENV) {
            self.disable_credential_prompt = value;
        }
        if let Some(value) = lookup_flag(&lookup, NO_SANDBOX_ENV) {
            self.no_sandbox = value;
        }
        if let Some(path) = lookup(HELPER_PATH_ENV).or_else(|| lookup(LEGACY_HELPER_PATH_ENV)) {
            self.helper_path = Some(PathBuf::from(path));
        }
    }
}

fn lookup_flag<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    let parsed = parse_flag(&raw);
    if parsed.is_none() {
        tracing::warn!("Ignoring {}={:?}: expected a boolean", key, raw);
    }
    parsed
}

/// Parse the boolean spellings accepted in environment overrides
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CourierConfig::default();
        assert_eq!(config.startup_url, DEFAULT_STARTUP_URL);
        assert!(config.single_process);
        assert!(config.disable_credential_prompt);
        assert!(config.no_sandbox);
        assert!(config.helper_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CourierConfig::default();
        config.apply_overrides(lookup_from(&[
            (STARTUP_URL_ENV, "https://example.com"),
            (SINGLE_PROCESS_ENV, "off"),
            (MOCK_KEYCHAIN_ENV, "0"),
            (HELPER_PATH_ENV, "/opt/courier/courier-cef-helper"),
        ]));

        assert_eq!(config.startup_url, "https://example.com");
        assert!(!config.single_process);
        assert!(!config.disable_credential_prompt);
        assert!(config.no_sandbox);
        assert_eq!(
            config.helper_path,
            Some(PathBuf::from("/opt/courier/courier-cef-helper"))
        );
    }

    #[test]
    fn test_invalid_flag_is_ignored() {
        let mut config = CourierConfig::default();
        config.apply_overrides(lookup_from(&[(SINGLE_PROCESS_ENV, "maybe")]));
        assert!(config.single_process);
    }

    #[test]
    fn test_legacy_helper_path() {
        let mut config = CourierConfig::default();
        config.apply_overrides(lookup_from(&[(LEGACY_HELPER_PATH_ENV, "/tmp/helper")]));
        assert_eq!(config.helper_path, Some(PathBuf::from("/tmp/helper")));

        let mut config = CourierConfig::default();
        config.apply_overrides(lookup_from(&[
            (LEGACY_HELPER_PATH_ENV, "/tmp/legacy"),
            (HELPER_PATH_ENV, "/tmp/preferred"),
        ]));
        assert_eq!(config.helper_path, Some(PathBuf::from("/tmp/preferred")));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: CourierConfig =
            serde_json::from_str(r#"{ "startup_url": "https://example.org" }"#).unwrap();
        assert_eq!(config.startup_url, "https://example.org");
        assert!(config.single_process);
    }

    #[test]
    fn test_from_file_missing() {
        let err = CourierConfig::from_file(Path::new("/nonexistent/courier.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag(""), None);
    }
}
