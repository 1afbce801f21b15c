//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the database file.
pub const ENV_DATABASE: &str = "PHONEBOOK_DB";

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// SQLite database file
    pub database: Option<PathBuf>,

    /// Append log output here instead of stderr
    pub log_file: Option<PathBuf>,

    /// Default log filter, e.g. "info" or "phonebook=debug"
    pub log_level: Option<String>,

    #[serde(skip)]
    cli_database: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/phonebook/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("phonebook")
            .join("config.toml")
    }

    /// Apply a `--db` argument, which outranks everything else.
    pub fn with_database(mut self, cli_db: Option<PathBuf>) -> Self {
        self.cli_database = cli_db;
        self
    }

    /// Resolve the database file.
    ///
    /// Precedence order:
    /// 1. CLI `--db` argument (see [`Config::with_database`])
    /// 2. `PHONEBOOK_DB` environment variable
    /// 3. Config file `database` setting
    /// 4. `<data dir>/phonebook/contacts.db`
    pub fn database_path(&self) -> PathBuf {
        self.resolve_database(std::env::var_os(ENV_DATABASE).map(PathBuf::from))
    }

    fn resolve_database(&self, env_db: Option<PathBuf>) -> PathBuf {
        self.cli_database
            .clone()
            .or(env_db)
            .or_else(|| self.database.clone())
            .unwrap_or_else(Self::default_database)
    }

    fn default_database() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("phonebook")
            .join("contacts.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_empty() {
        let config = Config::default();
        assert!(config.database.is_none());
        assert!(config.log_file.is_none());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn database_prefers_cli_arg() {
        let config = Config {
            database: Some(PathBuf::from("/config/contacts.db")),
            ..Config::default()
        }
        .with_database(Some(PathBuf::from("/cli/contacts.db")));

        assert_eq!(
            config.resolve_database(Some(PathBuf::from("/env/contacts.db"))),
            PathBuf::from("/cli/contacts.db")
        );
    }

    #[test]
    fn database_prefers_env_over_config() {
        let config = Config {
            database: Some(PathBuf::from("/config/contacts.db")),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_database(Some(PathBuf::from("/env/contacts.db"))),
            PathBuf::from("/env/contacts.db")
        );
        assert_eq!(
            config.resolve_database(None),
            PathBuf::from("/config/contacts.db")
        );
    }

    #[test]
    fn database_falls_back_to_data_dir() {
        let path = Config::default().resolve_database(None);
        assert!(path.ends_with("phonebook/contacts.db"));
    }

    #[test]
    fn missing_config_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.database.is_none());
    }

    #[test]
    fn config_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "database = \"/tmp/book.db\"\nlog_file = \"/tmp/phonebook.log\"\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.database, Some(PathBuf::from("/tmp/book.db")));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/phonebook.log")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn invalid_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "database = [").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn config_path_is_in_config_dir() {
        assert!(Config::config_path().ends_with("phonebook/config.toml"));
    }
}
