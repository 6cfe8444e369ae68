use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    convert::TryFrom,
    fs,
    path::{Path, PathBuf},
};

use crate::{aggregate::TimeBasis, locale::Locale};

/// Environment variable holding the OpenWeather API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Value shipped in sample env files; treated as "no key".
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

const MAX_TIMEOUT_SECS: u64 = 120;

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for static assets (css, images).
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// locale = "vi"
/// time_zone = "Asia/Ho_Chi_Minh"
///
/// [server]
/// port = 8080
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key. `OPENWEATHER_API_KEY` takes precedence.
    pub api_key: Option<String>,
    /// Base of the `/weather` and `/forecast` endpoints.
    pub base_url: String,
    pub units: String,
    /// Language of provider descriptions.
    pub lang: String,
    /// Deadline for one upstream request, connect included.
    pub timeout_secs: u64,
    pub locale: Locale,
    /// "local", "city" or an IANA zone name.
    pub time_zone: String,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            units: "metric".to_string(),
            lang: "vi".to_string(),
            timeout_secs: 10,
            locale: Locale::Vi,
            time_zone: "local".to_string(),
            server: ServerConfig::default(),
        }
    }
}

/// Returns the key if it can be sent upstream: present, non-blank and not the placeholder.
pub fn usable_api_key(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
}

impl Config {
    /// Load config from `path` (or the default location) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_file_path()?,
        };
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Apply `OPENWEATHER_API_KEY` and `PORT` from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV) {
            self.api_key = Some(key);
        }

        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {PORT_ENV} value '{port}'"))?;
        }

        Ok(())
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-web")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The API key, if one is configured and not the placeholder.
    pub fn credential(&self) -> Option<&str> {
        usable_api_key(self.api_key.as_deref())
    }

    pub fn time_basis(&self) -> Result<TimeBasis> {
        TimeBasis::try_from(self.time_zone.as_str())
    }

    /// Reject settings the server cannot start with. A missing API key is
    /// not an error here; pages report it per request.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(anyhow!(
                "base_url must be an http:// or https:// URL, got '{}'",
                self.base_url
            ));
        }

        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(anyhow!(
                "timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}, got {}",
                self.timeout_secs
            ));
        }

        self.time_basis()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn default_config_is_valid_but_has_no_credential() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.credential(), None);
        assert_eq!(cfg.units, "metric");
        assert_eq!(cfg.lang, "vi");
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn placeholder_and_blank_keys_are_not_usable() {
        assert_eq!(usable_api_key(None), None);
        assert_eq!(usable_api_key(Some("")), None);
        assert_eq!(usable_api_key(Some("   ")), None);
        assert_eq!(usable_api_key(Some(PLACEHOLDER_API_KEY)), None);
        assert_eq!(usable_api_key(Some(" abc123 ")), Some("abc123"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config {
            api_key: Some("FROM_FILE".into()),
            ..Config::default()
        };

        cfg.apply_env(env(&[(API_KEY_ENV, "FROM_ENV"), (PORT_ENV, "8081")]))
            .expect("env should apply");

        assert_eq!(cfg.credential(), Some("FROM_ENV"));
        assert_eq!(cfg.server.port, 8081);
    }

    #[test]
    fn invalid_port_env_is_reported() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[(PORT_ENV, "eighty")])).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "locale = \"en\"\n\n[server]\nport = 9000\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.locale, Locale::En);
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.base_url, Config::default().base_url);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            api_key: Some("KEY".into()),
            time_zone: "Asia/Ho_Chi_Minh".into(),
            ..Config::default()
        };
        cfg.save_to(&path).expect("save should succeed");

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let bad_url = Config { base_url: "ftp://example.com".into(), ..Config::default() };
        assert!(bad_url.validate().unwrap_err().to_string().contains("base_url"));

        let zero_timeout = Config { timeout_secs: 0, ..Config::default() };
        assert!(zero_timeout.validate().unwrap_err().to_string().contains("timeout_secs"));

        let bad_zone = Config { time_zone: "Nowhere/Special".into(), ..Config::default() };
        assert!(bad_zone.validate().unwrap_err().to_string().contains("Unknown time zone"));
    }

    #[test]
    fn config_path_points_at_toml() {
        if let Ok(path) = Config::config_file_path() {
            assert!(path.ends_with("config.toml"));
        }
    }
}
