//! Configuration - TOML file plus CLI overrides
//!
//! `kitlog.toml` in the working directory supplies defaults; every field
//! can be overridden per-invocation from the CLI. Nothing is required:
//! a missing file means built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Database file name inside the data directory.
const DATABASE_FILE_NAME: &str = "kitlog.db";

/// SQLite journal mode.
///
/// `delete` disables the write-ahead log for storage drivers that cannot
/// handle WAL side files (e.g. some network filesystems).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalMode {
    #[default]
    Wal,
    Delete,
}

impl JournalMode {
    /// The SQLite pragma value
    pub fn pragma_value(self) -> &'static str {
        match self {
            JournalMode::Wal => "wal",
            JournalMode::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KitlogConfig {
    /// Listening port
    pub port: u16,
    /// Directory holding the database file
    pub data_dir: PathBuf,
    /// SQLite journal mode
    pub journal_mode: JournalMode,
    /// Delete and recreate the database file on startup. Destructive;
    /// meant for ephemeral/demo deployments only.
    pub reset_on_start: bool,
    /// Insert sample records into empty tables on startup
    pub seed_on_start: bool,
}

impl Default for KitlogConfig {
    fn default() -> Self {
        Self {
            port: 4150,
            data_dir: PathBuf::from("data"),
            journal_mode: JournalMode::Wal,
            reset_on_start: false,
            seed_on_start: false,
        }
    }
}

impl KitlogConfig {
    /// Path of the database file inside the data directory
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("kitlog.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<KitlogConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(KitlogConfig::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: KitlogConfig = toml::from_str(&contents)?;
    Ok(config)
}

pub fn write_config(path: &Path, config: &KitlogConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_data_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Remove the database file and its WAL side files, if present.
pub fn reset_database(db_path: &Path) -> anyhow::Result<()> {
    for path in [
        db_path.to_path_buf(),
        db_path.with_extension("db-wal"),
        db_path.with_extension("db-shm"),
    ] {
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
    }
    tracing::info!("Reset database at {}", db_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KitlogConfig::default();
        assert_eq!(config.port, 4150);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.journal_mode, JournalMode::Wal);
        assert!(!config.reset_on_start);
        assert!(!config.seed_on_start);
        assert!(config.database_path().ends_with("kitlog.db"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = load_config(Some(Path::new("/nonexistent/kitlog.toml"))).unwrap();
        assert_eq!(config.port, KitlogConfig::default().port);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: KitlogConfig =
            toml::from_str("port = 9000\njournal_mode = \"delete\"").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.journal_mode, JournalMode::Delete);
        // Unspecified fields fall back to defaults
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kitlog.toml");

        let mut config = KitlogConfig::default();
        config.port = 8088;
        config.seed_on_start = true;

        write_config(&path, &config, false).unwrap();
        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.port, 8088);
        assert!(loaded.seed_on_start);

        // Refuses to clobber without force
        assert!(write_config(&path, &config, false).is_err());
        assert!(write_config(&path, &config, true).is_ok());
    }

    #[test]
    fn test_ensure_data_dir_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested/data/kitlog.db");

        ensure_data_dir(&db_path).unwrap();
        assert!(db_path.parent().unwrap().exists());
    }
}
