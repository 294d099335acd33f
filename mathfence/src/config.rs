//! Manage the app configuration by creating, resetting and reading the
//! settings file

use std::{
    fs,
    io::{Read, Write},
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use serde_derive::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

const DEFAULT_SETTING_FILE_NAME: &str = "settings.yaml";

/// How command results are printed.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Parse a format name as accepted by `--output`. Unknown names fall back
    /// to text.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Default sampling range of the `table` command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TableSettings {
    pub from: f64,
    pub to: f64,
    pub steps: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            from: -5.0,
            to: 5.0,
            steps: 11,
        }
    }
}

/// Describe the configuration yaml
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Output format used when `--output` is not given.
    pub output: OutputFormat,
    /// Decimals printed for evaluated values.
    pub precision: usize,
    pub table: TableSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: OutputFormat::Text,
            precision: 6,
            table: TableSettings::default(),
        }
    }
}

/// describe configuration folder
#[derive(Debug)]
pub struct Config {
    /// Configuration folder path.
    pub root_folder: PathBuf,
    /// config file.
    pub setting_file_path: PathBuf,
}

impl Config {
    /// Get application setting config. The folder and a default settings
    /// file are created when missing.
    ///
    /// # Errors
    ///
    /// Will return `Err` when the folder can't be resolved or on load/save config
    pub fn new(path: Option<&str>) -> Result<Self> {
        let package_name = env!("CARGO_PKG_NAME");

        let config_folder = match path {
            Some(p) => PathBuf::from(p),
            None => dirs::config_dir()
                .map(|dir| dir.join(package_name))
                .ok_or_else(|| Error::Config("could not get directory path".to_string()))?,
        };

        let setting_config = Self {
            setting_file_path: config_folder.join(DEFAULT_SETTING_FILE_NAME),
            root_folder: config_folder,
        };

        setting_config.create_config_folder()?;
        setting_config.manage_setting_file()?;
        debug!(configuration = ?setting_config, "configuration settings loaded");
        Ok(setting_config)
    }

    /// Convert user settings yaml to struct.
    ///
    /// # Errors
    ///
    /// Will return `Err` has an error when loading the config file
    pub fn get_settings_from_file(&self) -> Result<Settings> {
        Ok(serde_yaml::from_str(&self.read_config_file()?)?)
    }

    /// Create a default config yaml file if not exists.
    ///
    /// # Errors
    ///
    /// Will return `Err` file could not created
    pub fn manage_setting_file(&self) -> Result<()> {
        if !self.setting_file_path.is_file() {
            debug!(path = %self.setting_file_path.display(), "setting file not found");
            self.create_default_settings_file()?;
        }
        Ok(())
    }

    /// Reset user configuration to the defaults. An existing settings file is
    /// kept as a timestamped backup, whose path is returned.
    ///
    /// # Errors
    ///
    /// Will return `Err` when the backup or the new file could not be written
    pub fn reset_config(&self) -> Result<Option<PathBuf>> {
        let backup = if self.setting_file_path.is_file() {
            Some(self.backup()?)
        } else {
            None
        };
        self.create_default_settings_file()?;
        Ok(backup)
    }

    /// Return the raw config content.
    ///
    /// # Errors
    ///
    /// Will return `Err` when the file can't be read
    pub fn read_config_file(&self) -> Result<String> {
        let mut file = fs::File::open(&self.setting_file_path)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }

    /// Create config folder if not exists.
    fn create_config_folder(&self) -> Result<()> {
        if self.root_folder.is_dir() {
            debug!(path = %self.root_folder.display(), "configuration folder found");
        } else {
            fs::create_dir_all(&self.root_folder)?;
            debug!(path = %self.root_folder.display(), "configuration folder created");
        }
        Ok(())
    }

    fn create_default_settings_file(&self) -> Result<()> {
        self.save_settings_file_from_struct(&Settings::default())
    }

    /// Convert the given settings to YAML format and write the file.
    fn save_settings_file_from_struct(&self, settings: &Settings) -> Result<()> {
        let content = serde_yaml::to_string(settings)?;
        let mut file = fs::File::create(&self.setting_file_path)?;
        file.write_all(content.as_bytes())?;
        debug!(path = %self.setting_file_path.display(), settings = ?settings, "settings file created");
        Ok(())
    }

    fn backup(&self) -> Result<PathBuf> {
        let mut backup_to = self.setting_file_path.clone().into_os_string();
        backup_to.push(format!(
            ".{}.bak",
            SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs()
        ));
        let backup_to = PathBuf::from(backup_to);
        fs::rename(&self.setting_file_path, &backup_to)?;
        debug!(path = %backup_to.display(), "settings file backed up");
        Ok(backup_to)
    }
}
