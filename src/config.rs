use crate::colors::{Color, ColorMode};
use crate::error::ConfigError;
use crate::level::{parse_level_index, Level};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// ctime(3) layout, trailing newline included.
pub const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y\n";

/// Minimum level as written in a settings file: a name or a raw index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LevelSetting {
    Index(i64),
    Name(String),
}

impl LevelSetting {
    pub fn resolve(&self) -> Result<i64, ConfigError> {
        match self {
            LevelSetting::Index(i) => Ok(*i),
            LevelSetting::Name(name) => parse_level_index(name).map_err(ConfigError::Invalid),
        }
    }
}

impl Default for LevelSetting {
    fn default() -> Self {
        LevelSetting::Index(Level::Debug.into())
    }
}

/// Per-level color overrides; unset levels keep their default color.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelColors {
    pub debug: Option<Color>,
    pub info: Option<Color>,
    #[serde(alias = "warning")]
    pub warn: Option<Color>,
    pub error: Option<Color>,
    pub critical: Option<Color>,
}

impl LevelColors {
    pub fn overrides(&self) -> impl Iterator<Item = (Level, Color)> + '_ {
        [
            (Level::Debug, self.debug),
            (Level::Info, self.info),
            (Level::Warn, self.warn),
            (Level::Error, self.error),
            (Level::Critical, self.critical),
        ]
        .into_iter()
        .filter_map(|(level, color)| color.map(|c| (level, c)))
    }
}

/// Logger settings as loaded from a YAML file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerSettings {
    pub min_level: LevelSetting,
    pub file: Option<PathBuf>,
    pub show_timestamp: bool,
    pub show_function: bool,
    pub show_line: bool,
    pub color: ColorMode,
    pub colors: LevelColors,
    pub time_format: String,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        LoggerSettings {
            min_level: LevelSetting::default(),
            file: None,
            show_timestamp: true,
            show_function: true,
            show_line: true,
            color: ColorMode::default(),
            colors: LevelColors::default(),
            time_format: CTIME_FORMAT.to_string(),
        }
    }
}

impl LoggerSettings {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
