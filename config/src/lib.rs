//! Configuration loading for Abacus.
//!
//! The file lives at `~/.abacus/config.toml`. Every section and key is
//! optional; accessors on [`AbacusConfig`] fill in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Environment variable that wins over `service.url`.
pub const SERVICE_URL_ENV: &str = "ABACUS_SERVICE_URL";

#[derive(Debug, Default, Deserialize)]
pub struct AbacusConfig {
    pub service: Option<ServiceConfig>,
    pub app: Option<AppConfig>,
    pub history: Option<HistoryConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the calculation service. `${VAR}` references are expanded.
    pub url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// `"basic"` or `"scientific"`.
    pub keypad: Option<String>,
    /// Use ASCII-only glyphs for the spinner and symbols.
    #[serde(default)]
    pub ascii_only: bool,
    #[serde(default)]
    pub high_contrast: bool,
    /// Freeze the loading spinner.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryConfig {
    /// Directory holding the history file. A leading `~` is the home dir.
    pub dir: Option<String>,
}

/// Replace `${VAR}` with the variable's value (empty when unset).
///
/// An unclosed `${` is kept literally.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + end_rel];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 2 + end_rel + 1..];
    }

    out.push_str(rest);
    out
}

fn expand_home(value: &str) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if value == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    PathBuf::from(value)
}

impl AbacusConfig {
    /// Load `~/.abacus/config.toml`. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        Self::parse(&content)
            .map(Some)
            .map_err(|err| {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                }
            })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Service base URL: `ABACUS_SERVICE_URL`, then `service.url`, then the default.
    #[must_use]
    pub fn service_url(&self) -> String {
        self.service_url_with(env::var(SERVICE_URL_ENV).ok())
    }

    fn service_url_with(&self, env_override: Option<String>) -> String {
        if let Some(url) = env_override.filter(|url| !url.trim().is_empty()) {
            return url.trim().to_string();
        }
        self.service
            .as_ref()
            .and_then(|service| service.url.as_deref())
            .map(expand_env_vars)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string())
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        let secs = self
            .service
            .as_ref()
            .and_then(|service| service.connect_timeout_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Raw keypad setting, if any. Interpretation is left to the caller.
    #[must_use]
    pub fn keypad(&self) -> Option<&str> {
        self.app.as_ref().and_then(|app| app.keypad.as_deref())
    }

    #[must_use]
    pub fn ascii_only(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.ascii_only)
    }

    #[must_use]
    pub fn high_contrast(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.high_contrast)
    }

    #[must_use]
    pub fn reduced_motion(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.reduced_motion)
    }

    /// Directory for the history store: `history.dir`, else `~/.abacus/data`.
    #[must_use]
    pub fn history_dir(&self) -> Option<PathBuf> {
        match self.history.as_ref().and_then(|h| h.dir.as_deref()) {
            Some(dir) if !dir.trim().is_empty() => Some(expand_home(&expand_env_vars(dir.trim()))),
            _ => default_data_dir(),
        }
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".abacus").join("config.toml"))
}

#[must_use]
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".abacus").join("data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = AbacusConfig::parse("").unwrap();
        assert_eq!(config.service_url_with(None), DEFAULT_SERVICE_URL);
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.keypad(), None);
        assert!(!config.ascii_only());
        assert!(!config.high_contrast());
    }

    #[test]
    fn parses_all_sections() {
        let config = AbacusConfig::parse(
            r#"
            [service]
            url = "http://calc.internal:8080"
            connect_timeout_secs = 3

            [app]
            keypad = "scientific"
            ascii_only = true
            high_contrast = true

            [history]
            dir = "/var/lib/abacus"
            "#,
        )
        .unwrap();
        assert_eq!(config.service_url_with(None), "http://calc.internal:8080");
        assert_eq!(config.connect_timeout(), Duration::from_secs(3));
        assert_eq!(config.keypad(), Some("scientific"));
        assert!(config.ascii_only());
        assert!(config.high_contrast());
        assert!(!config.reduced_motion());
        assert_eq!(config.history_dir(), Some(PathBuf::from("/var/lib/abacus")));
    }

    #[test]
    fn env_override_wins_over_file() {
        let config = AbacusConfig::parse("[service]\nurl = \"http://file:1\"").unwrap();
        assert_eq!(
            config.service_url_with(Some("http://env:2".to_string())),
            "http://env:2"
        );
        assert_eq!(
            config.service_url_with(Some("   ".to_string())),
            "http://file:1"
        );
    }

    #[test]
    fn service_url_expands_env_vars() {
        unsafe {
            std::env::set_var("ABACUS_TEST_CALC_HOST", "calc.example");
        }
        let config =
            AbacusConfig::parse("[service]\nurl = \"http://${ABACUS_TEST_CALC_HOST}:5000\"")
                .unwrap();
        assert_eq!(config.service_url_with(None), "http://calc.example:5000");
        unsafe {
            std::env::remove_var("ABACUS_TEST_CALC_HOST");
        }
    }

    #[test]
    fn history_dir_expands_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let config = AbacusConfig::parse("[history]\ndir = \"~/calc-data\"").unwrap();
        assert_eq!(config.history_dir(), Some(home.join("calc-data")));
    }

    #[test]
    fn load_from_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = AbacusConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn load_from_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[service\nurl = 1").unwrap();
        let err = AbacusConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[app]\nkeypad = \"basic\"").unwrap();
        let config = AbacusConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(config.keypad(), Some("basic"));
    }

    #[test]
    fn expand_env_vars_no_vars() {
        assert_eq!(expand_env_vars("hello world"), "hello world");
    }

    #[test]
    fn expand_env_vars_missing_var_becomes_empty() {
        unsafe {
            std::env::remove_var("ABACUS_MISSING_VAR_FOR_TEST");
        }
        assert_eq!(
            expand_env_vars("before ${ABACUS_MISSING_VAR_FOR_TEST} after"),
            "before  after"
        );
    }

    #[test]
    fn expand_env_vars_adjacent_vars() {
        unsafe {
            std::env::set_var("ABACUS_ADJ_A", "X");
            std::env::set_var("ABACUS_ADJ_B", "Y");
        }
        assert_eq!(expand_env_vars("${ABACUS_ADJ_A}${ABACUS_ADJ_B}"), "XY");
        unsafe {
            std::env::remove_var("ABACUS_ADJ_A");
            std::env::remove_var("ABACUS_ADJ_B");
        }
    }

    #[test]
    fn expand_env_vars_unclosed_brace_preserved() {
        assert_eq!(expand_env_vars("test ${UNCLOSED"), "test ${UNCLOSED");
    }

    #[test]
    fn expand_env_vars_empty_var_name_dropped() {
        assert_eq!(expand_env_vars("test ${} more"), "test  more");
    }
}
