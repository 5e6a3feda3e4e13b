//! Application configuration.
//!
//! Configuration is TOML. Every field has a default, so a file only needs
//! the keys it overrides. The defaults ship embedded as
//! `config/default.toml`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use ips_map_source::SnapshotSource;
use ips_map_source::file::FileSnapshots;
use ips_map_source::http::HttpSnapshots;
use ips_map_source::live::LiveSnapshots;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_TOML: &str = include_str!("../config/default.toml");

static DEFAULT_CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_toml_str(DEFAULT_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded default config: {e}"))
});

/// Errors raised while reading configuration or building clients from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for [`Config`].
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub search: SearchConfig,
    pub http: HttpConfig,
}

/// Where snapshots come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Base URL of the static snapshots. Takes precedence over `dir`.
    pub base_url: Option<String>,
    /// Local directory holding the static snapshots.
    pub dir: PathBuf,
    /// Cache-busting version of the mandatory snapshots.
    pub version: String,
    /// Cache-busting version of the stations feed.
    pub stations_version: String,
    /// Build the mandatory snapshots from the public APIs instead.
    pub live: bool,
}

/// Search defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Radius used when a request does not name one.
    pub default_radius_km: f64,
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            dir: PathBuf::from("data"),
            version: "7".to_string(),
            stations_version: "18".to_string(),
            live: false,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_km: 1.0,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("ips-map/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// The embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded `config/default.toml` is malformed.
    #[must_use]
    pub fn embedded() -> &'static Self {
        &DEFAULT_CONFIG
    }

    /// Parses a configuration, defaulting every missing key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the input is not valid TOML or a
    /// key has the wrong type.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Toml`] if it does not parse.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Builds the shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Http`] if the TLS backend cannot be
    /// initialized.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        Ok(reqwest::Client::builder()
            .user_agent(self.http.user_agent.clone())
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .build()?)
    }

    /// The source of the three mandatory snapshots.
    #[must_use]
    pub fn snapshot_source(&self, client: &reqwest::Client) -> Box<dyn SnapshotSource> {
        if self.data.live {
            return Box::new(LiveSnapshots::new(client.clone()));
        }
        self.static_source(client, &self.data.version)
    }

    /// The source of the optional stations feed.
    #[must_use]
    pub fn stations_source(&self, client: &reqwest::Client) -> Box<dyn SnapshotSource> {
        self.static_source(client, &self.data.stations_version)
    }

    fn static_source(&self, client: &reqwest::Client, version: &str) -> Box<dyn SnapshotSource> {
        match &self.data.base_url {
            Some(base_url) => Box::new(
                HttpSnapshots::new(client.clone(), base_url.clone()).with_version(version),
            ),
            None => Box::new(FileSnapshots::new(self.data.dir.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let embedded = Config::embedded();
        assert_eq!(embedded.data.dir, PathBuf::from("data"));
        assert_eq!(embedded.data.version, "7");
        assert_eq!(embedded.data.stations_version, "18");
        assert!(!embedded.data.live);
        assert!((embedded.search.default_radius_km - 1.0).abs() < f64::EPSILON);
        assert_eq!(embedded.http.timeout_secs, 30);
    }

    #[test]
    fn embedded_file_matches_serde_defaults() {
        let embedded = Config::embedded();
        let defaults = Config::default();
        assert_eq!(embedded.data, defaults.data);
        assert_eq!(embedded.search, defaults.search);
        assert_eq!(embedded.http.timeout_secs, defaults.http.timeout_secs);
    }

    #[test]
    fn partial_files_keep_defaults() {
        let config = Config::from_toml_str(
            r#"
            [data]
            base_url = "https://example.org/data"

            [search]
            default_radius_km = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(config.data.base_url.as_deref(), Some("https://example.org/data"));
        assert_eq!(config.data.version, "7");
        assert!((config.search.default_radius_km - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.http, HttpConfig::default());
    }

    #[test]
    fn empty_input_is_the_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(matches!(
            Config::from_toml_str("[search]\ndefault_radius_km = \"far\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("ips_map_missing_config.toml");
        assert!(matches!(
            Config::from_path(&path),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn reads_files() {
        let dir = std::env::temp_dir().join("ips_map_controller_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[data]\nlive = true\n").unwrap();

        let config = Config::from_path(&path).unwrap();
        assert!(config.data.live);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn source_selection() {
        let client = reqwest::Client::new();

        let local = Config::default();
        assert_eq!(local.snapshot_source(&client).describe(), "data");

        let remote = Config::from_toml_str("[data]\nbase_url = \"https://example.org/data\"").unwrap();
        assert_eq!(
            remote.snapshot_source(&client).describe(),
            "https://example.org/data"
        );
        assert_eq!(
            remote.stations_source(&client).describe(),
            "https://example.org/data"
        );
    }
}
