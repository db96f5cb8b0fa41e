//! # Configuration
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`CLEAVER_*`, `__` between nested keys)
//! 2. Config file (`--config FILE`, else `<data dir>/cleaver.toml` if present)
//! 3. Defaults (this file)
//!
//! ```text
//! CLEAVER_STORAGE__BACKEND=sqlite   → storage.backend = "sqlite"
//! CLEAVER_DATA_DIR=/srv/counter     → data_dir = "/srv/counter"
//! CLEAVER_RECEIPTS_DIR=receipts     → receipts_dir = "receipts"
//! ```
//!
//! Relative file names are resolved against the data directory.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use cleaver_core::Money;

/// Name of the optional config file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "cleaver.toml";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CLEAVER_DATA_DIR";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Shown in the session banner.
    pub store_name: String,

    /// Prefix for amounts on screen (`R$ 47.88`). Never written to files.
    pub currency_symbol: String,

    /// Where data files live. Default: the platform data directory.
    pub data_dir: Option<PathBuf>,

    pub storage: StorageConfig,

    /// When set, every finalized sale is also written here as a receipt CSV.
    pub receipts_dir: Option<PathBuf>,

    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
    pub catalog_file: PathBuf,
    pub history_file: PathBuf,
    pub database_file: PathBuf,

    /// Start a missing catalog with the default cuts.
    pub seed_default_catalog: bool,
}

/// Where catalog and history are kept.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `catalog.json` + `history.csv`
    #[default]
    Files,
    /// `cleaver.db`
    Sqlite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Ignore a scan identical to the previous one until the sale is
    /// finalized. Guards against a scanner firing twice.
    pub suppress_repeated_scans: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            store_name: "Cleaver".to_string(),
            currency_symbol: "R$".to_string(),
            data_dir: None,
            storage: StorageConfig::default(),
            receipts_dir: None,
            session: SessionConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            backend: Backend::Files,
            catalog_file: PathBuf::from("catalog.json"),
            history_file: PathBuf::from("history.csv"),
            database_file: PathBuf::from("cleaver.db"),
            seed_default_catalog: true,
        }
    }
}

impl AppConfig {
    /// Loads configuration from all sources.
    ///
    /// An explicit `config_file` must exist; the implicit
    /// `<data dir>/cleaver.toml` is optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let (file, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (default_data_dir().join(CONFIG_FILE_NAME), false),
        };

        Self::load_from(&file, required, Some(env_source()))
    }

    fn load_from(
        file: &Path,
        required: bool,
        env: Option<Environment>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(
                File::from(file)
                    .format(FileFormat::Toml)
                    .required(required),
            );
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        builder.build()?.try_deserialize()
    }

    /// The data directory in effect.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Resolves a configured file name against the data directory.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        self.data_dir().join(file)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.resolve(&self.storage.catalog_file)
    }

    pub fn history_path(&self) -> PathBuf {
        self.resolve(&self.storage.history_file)
    }

    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.storage.database_file)
    }

    pub fn receipts_path(&self) -> Option<PathBuf> {
        self.receipts_dir.as_deref().map(|dir| self.resolve(dir))
    }

    /// `R$ 47.88`
    pub fn format_currency(&self, amount: Money) -> String {
        if self.currency_symbol.is_empty() {
            amount.to_string()
        } else {
            format!("{} {}", self.currency_symbol, amount)
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("CLEAVER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Determines the data directory.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.cleaver.register`
/// - **Windows**: `%APPDATA%\cleaver\register\data`
/// - **Linux**: `~/.local/share/register`
///
/// `CLEAVER_DATA_DIR` overrides all of these; without a home directory the
/// current directory is used.
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    ProjectDirs::from("com", "cleaver", "register")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            AppConfig::load_from(&dir.path().join("missing.toml"), false, None).unwrap();

        assert_eq!(config.storage.backend, Backend::Files);
        assert_eq!(config.storage.catalog_file, PathBuf::from("catalog.json"));
        assert!(config.storage.seed_default_catalog);
        assert!(!config.session.suppress_repeated_scans);
        assert!(config.receipts_dir.is_none());
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from(&dir.path().join("missing.toml"), true, None).is_err());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cleaver.toml");
        fs::write(
            &file,
            r#"
store_name = "Açougue Central"
currency_symbol = "€"
data_dir = "/srv/counter"
receipts_dir = "receipts"

[storage]
backend = "sqlite"

[session]
suppress_repeated_scans = true
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&file, true, None).unwrap();

        assert_eq!(config.store_name, "Açougue Central");
        assert_eq!(config.storage.backend, Backend::Sqlite);
        // Untouched nested keys keep their defaults.
        assert_eq!(config.storage.history_file, PathBuf::from("history.csv"));
        assert!(config.session.suppress_repeated_scans);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/srv/counter/cleaver.db")
        );
        assert_eq!(
            config.receipts_path(),
            Some(PathBuf::from("/srv/counter/receipts"))
        );
        assert_eq!(config.format_currency(Money::from_cents(4788)), "€ 47.88");
    }

    #[test]
    fn test_absolute_file_names_are_kept() {
        let mut config = AppConfig::default();
        config.data_dir = Some(PathBuf::from("/srv/counter"));
        config.storage.catalog_file = PathBuf::from("/etc/cleaver/catalog.json");

        assert_eq!(
            config.catalog_path(),
            PathBuf::from("/etc/cleaver/catalog.json")
        );
        assert_eq!(config.history_path(), PathBuf::from("/srv/counter/history.csv"));
    }
}
