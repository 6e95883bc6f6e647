use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    currency::FormatOptions,
    errors::ConfigError,
    storage::csv_backend::{BACKUP_DIR, DEFAULT_RETENTION},
    utils::{app_data_dir, ensure_dir, tmp_path},
};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
/// Ledger file name used when the configuration does not name one.
pub const DEFAULT_LEDGER_FILE: &str = "finance_data.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ledger location. Relative paths resolve against the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backups_dir: Option<PathBuf>,
    pub backup_retention: usize,
    pub currency_symbol: String,
    pub grouping_separator: char,
    pub decimal_separator: char,
}

impl Default for Config {
    fn default() -> Self {
        let format = FormatOptions::default();
        Self {
            ledger_file: None,
            backups_dir: None,
            backup_retention: DEFAULT_RETENTION,
            currency_symbol: format.symbol,
            grouping_separator: format.grouping_separator,
            decimal_separator: format.decimal_separator,
        }
    }
}

impl Config {
    pub fn resolve_ledger_file(&self, base_dir: &Path) -> PathBuf {
        match &self.ledger_file {
            Some(path) => base_dir.join(path),
            None => base_dir.join(DEFAULT_LEDGER_FILE),
        }
    }

    pub fn resolve_backups_dir(&self, base_dir: &Path) -> PathBuf {
        match &self.backups_dir {
            Some(path) => base_dir.join(path),
            None => base_dir.join(BACKUP_DIR),
        }
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            symbol: self.currency_symbol.clone(),
            grouping_separator: self.grouping_separator,
            decimal_separator: self.decimal_separator,
        }
    }
}

/// Reads and writes `<base>/config/config.json`.
pub struct ConfigManager {
    base_dir: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at the application data directory (`SAIFU_HOME` or `~/.saifu`).
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let base_dir = base.into();
        let config_root = base_dir.join(CONFIG_DIR);
        ensure_dir(&config_root)?;
        Ok(Self {
            path: config_root.join(CONFIG_FILE),
            base_dir,
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backup_retention, DEFAULT_RETENTION);
        assert_eq!(config.currency_symbol, "₹");
        assert!(manager.path().ends_with("config/config.json"));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path()).unwrap();
        let config = Config {
            ledger_file: Some(PathBuf::from("ledgers/home.csv")),
            backup_retention: 2,
            currency_symbol: "€".into(),
            grouping_separator: '.',
            decimal_separator: ',',
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path()).unwrap();
        fs::write(manager.path(), r#"{ "backup_retention": 9 }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.backup_retention, 9);
        assert_eq!(config.ledger_file, None);
        assert_eq!(config.decimal_separator, '.');
    }

    #[test]
    fn corrupt_files_are_reported() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path()).unwrap();
        fs::write(manager.path(), "{ not json").unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
    }

    #[test]
    fn ledger_paths_resolve_against_base() {
        let base = Path::new("/data/saifu");
        let mut config = Config::default();
        assert_eq!(
            config.resolve_ledger_file(base),
            PathBuf::from("/data/saifu/finance_data.csv")
        );
        assert_eq!(
            config.resolve_backups_dir(base),
            PathBuf::from("/data/saifu/backups")
        );
        config.ledger_file = Some(PathBuf::from("/elsewhere/ledger.csv"));
        assert_eq!(
            config.resolve_ledger_file(base),
            PathBuf::from("/elsewhere/ledger.csv")
        );
    }
}
