use std::fs;
use std::path::{Path, PathBuf};

use super::ConfigData;
use crate::error::{ConfigError, PagefixResult, PathContext};

pub const CONFIG_DIR: &str = ".pagefix";
pub const CONFIG_FILE: &str = "config.toml";

/// Scalar keys understood by `get`/`set`
pub const KEYS: &[&str] = &[
    "backup.suffix",
    "backup.overwrite_existing",
    "discovery.extension",
    "stylesheet.legacy",
    "stylesheet.consolidated",
    "facts.bank_rate",
    "facts.data_currency",
    "facts.e_invoice_threshold",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub data: ConfigData,
    pub path: PathBuf,
}

impl Config {
    pub fn load_or_default(project_root: impl AsRef<Path>) -> PagefixResult<Self> {
        let config_path = Self::path_for(project_root.as_ref());

        let data = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| {
                ConfigError::Unreadable {
                    path: config_path.clone(),
                    message: e.to_string(),
                }
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))?
        } else {
            ConfigData::default()
        };

        let config = Self {
            data,
            path: config_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Write the default configuration unless one already exists.
    /// Returns whether a new file was created.
    pub fn init(project_root: impl AsRef<Path>) -> PagefixResult<bool> {
        let config_path = Self::path_for(project_root.as_ref());
        if config_path.exists() {
            return Ok(false);
        }

        let config = Self {
            data: ConfigData::default(),
            path: config_path,
        };
        config.save()?;
        Ok(true)
    }

    pub fn save(&self) -> PagefixResult<()> {
        let content = toml::to_string_pretty(&self.data)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }

        fs::write(&self.path, content).with_path(&self.path)?;

        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> PagefixResult<()> {
        let invalid = || ConfigError::InvalidValue {
            field: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "backup.suffix" => self.data.backup.suffix = value.to_string(),
            "backup.overwrite_existing" => {
                self.data.backup.overwrite_existing = value.parse().map_err(|_| invalid())?;
            }
            "discovery.extension" => {
                self.data.discovery.extension = value.trim_start_matches('.').to_string();
            }
            "stylesheet.legacy" => self.data.stylesheet.legacy = value.to_string(),
            "stylesheet.consolidated" => self.data.stylesheet.consolidated = value.to_string(),
            "facts.bank_rate" => {
                self.data.facts.bank_rate = value.parse().map_err(|_| invalid())?;
            }
            "facts.data_currency" => self.data.facts.data_currency = value.to_string(),
            "facts.e_invoice_threshold" => {
                self.data.facts.e_invoice_threshold = value.to_string();
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                }
                .into())
            }
        }

        self.validate()?;
        self.save()?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> PagefixResult<String> {
        let value = match key {
            "backup.suffix" => self.data.backup.suffix.clone(),
            "backup.overwrite_existing" => self.data.backup.overwrite_existing.to_string(),
            "discovery.extension" => self.data.discovery.extension.clone(),
            "stylesheet.legacy" => self.data.stylesheet.legacy.clone(),
            "stylesheet.consolidated" => self.data.stylesheet.consolidated.clone(),
            "facts.bank_rate" => format!("{:.2}", self.data.facts.bank_rate),
            "facts.data_currency" => self.data.facts.data_currency.clone(),
            "facts.e_invoice_threshold" => self.data.facts.e_invoice_threshold.clone(),
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                }
                .into())
            }
        };

        Ok(value)
    }

    fn validate(&self) -> PagefixResult<()> {
        let data = &self.data;
        if data.backup.suffix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "backup.suffix".to_string(),
                value: String::new(),
            }
            .into());
        }
        if data.stylesheet.legacy == data.stylesheet.consolidated {
            return Err(ConfigError::Invalid(
                "stylesheet.legacy and stylesheet.consolidated must differ".to_string(),
            )
            .into());
        }
        if !data.facts.bank_rate.is_finite() || data.facts.bank_rate < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "facts.bank_rate".to_string(),
                value: data.facts.bank_rate.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn path_for(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_DIR).join(CONFIG_FILE)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: ConfigData::default(),
            path: PathBuf::from(CONFIG_DIR).join(CONFIG_FILE),
        }
    }
}
