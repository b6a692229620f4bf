//! Persistent user settings.
//!
//! Stored as TOML under the user's config directory
//! (`~/.config/zcalc/settings.toml` on Linux). Loading never fails: a missing
//! file yields the defaults (which are then written), a broken one yields the
//! defaults with a warning. Every setter writes the file straight away.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculator::Base;

const SETTINGS_DIR: &str = "zcalc";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write settings at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which keypad the calculator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalculatorMode {
    #[default]
    Standard,
    Programmer,
}

/// The persisted values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsData {
    pub use_digit_grouping: bool,
    pub calculator_mode: CalculatorMode,
    pub number_base: u32,
    pub use_operator_precedence: bool,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            use_digit_grouping: false,
            calculator_mode: CalculatorMode::Standard,
            number_base: 10,
            use_operator_precedence: false,
        }
    }
}

/// Settings bound to the file they persist to.
#[derive(Debug, Clone)]
pub struct Settings {
    data: SettingsData,
    path: Option<PathBuf>,
}

impl Settings {
    /// Load from the default location.
    pub fn load() -> Self {
        match settings_path() {
            Some(path) => Self::load_from(path),
            None => {
                warn!("Could not determine config directory, settings will not be saved");
                Self::in_memory()
            }
        }
    }

    /// Load from `path`, writing the defaults there if it does not exist.
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match read_settings(&path) {
            Ok(Some(data)) => data,
            Ok(None) => {
                let settings = Self {
                    data: SettingsData::default(),
                    path: Some(path),
                };
                settings.save_or_warn();
                return settings;
            }
            Err(err) => {
                warn!("{err}; using defaults");
                SettingsData::default()
            }
        };
        Self {
            data,
            path: Some(path),
        }
    }

    /// Settings that are never written anywhere.
    pub fn in_memory() -> Self {
        Self {
            data: SettingsData::default(),
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn data(&self) -> &SettingsData {
        &self.data
    }

    pub fn use_digit_grouping(&self) -> bool {
        self.data.use_digit_grouping
    }

    pub fn set_use_digit_grouping(&mut self, value: bool) {
        self.data.use_digit_grouping = value;
        self.save_or_warn();
    }

    pub fn calculator_mode(&self) -> CalculatorMode {
        self.data.calculator_mode
    }

    pub fn set_calculator_mode(&mut self, mode: CalculatorMode) {
        self.data.calculator_mode = mode;
        self.save_or_warn();
    }

    /// The raw stored base, which may be outside {2, 8, 10, 16}.
    pub fn number_base(&self) -> u32 {
        self.data.number_base
    }

    /// The stored base, falling back to decimal when it is not supported.
    pub fn base(&self) -> Base {
        Base::try_from(self.data.number_base).unwrap_or_else(|err| {
            warn!("{err}; using decimal");
            Base::Decimal
        })
    }

    pub fn set_number_base(&mut self, base: Base) {
        self.data.number_base = base.radix();
        self.save_or_warn();
    }

    pub fn use_operator_precedence(&self) -> bool {
        self.data.use_operator_precedence
    }

    pub fn set_use_operator_precedence(&mut self, value: bool) {
        self.data.use_operator_precedence = value;
        self.save_or_warn();
    }

    /// Write the current values. A no-op for in-memory settings.
    pub fn save(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = toml::to_string_pretty(&self.data)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Settings saved");
        Ok(())
    }

    fn save_or_warn(&self) {
        if let Err(err) = self.save() {
            warn!("{err}");
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Default settings file location.
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

fn read_settings(path: &Path) -> Result<Option<SettingsData>, SettingsError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content)
        .map(Some)
        .map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);

        let settings = Settings::load_from(&path);
        assert_eq!(settings.data(), &SettingsData::default());
        assert!(path.exists());
    }

    #[test]
    fn test_setters_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        let mut settings = Settings::load_from(&path);
        settings.set_use_digit_grouping(true);
        settings.set_calculator_mode(CalculatorMode::Programmer);
        settings.set_number_base(Base::Hexadecimal);
        settings.set_use_operator_precedence(true);

        let reloaded = Settings::load_from(&path);
        assert!(reloaded.use_digit_grouping());
        assert_eq!(reloaded.calculator_mode(), CalculatorMode::Programmer);
        assert_eq!(reloaded.base(), Base::Hexadecimal);
        assert!(reloaded.use_operator_precedence());
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "use_digit_grouping = [not toml").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.data(), &SettingsData::default());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "calculator_mode = \"Programmer\"\n").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.calculator_mode(), CalculatorMode::Programmer);
        assert_eq!(settings.number_base(), 10);
    }

    #[test]
    fn test_unsupported_base_degrades_to_decimal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "number_base = 7\n").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.number_base(), 7);
        assert_eq!(settings.base(), Base::Decimal);
    }

    #[test]
    fn test_in_memory_settings_never_write() {
        let mut settings = Settings::in_memory();
        settings.set_use_digit_grouping(true);
        assert!(settings.use_digit_grouping());
        assert!(settings.path().is_none());
        assert!(settings.save().is_ok());
    }
}
