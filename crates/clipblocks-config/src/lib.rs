//! On-disk options for the clipblocks pipeline.
//!
//! The file mirrors [`ConvertOptions`]: `[classifier]`, `[printer]` and
//! `[formatter]` tables (with `[formatter.limits]`), every key optional.

use clipblocks_engine::{
    ClassifierOptions, ConvertOptions, Converter, FormatOptions, OptionsError, PrintOptions,
};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Overrides the config file location when set.
pub const CONFIG_ENV: &str = "CLIPBLOCKS_CONFIG";
const DEFAULT_LOCATION: &str = "~/.config/clipblocks/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{} is not valid TOML: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{} holds unusable options: {source}", path.display())]
    InvalidOptions { path: PathBuf, source: OptionsError },

    #[error("cannot encode options: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Pipeline options as stored on disk. Missing sections take defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classifier: ClassifierOptions,
    pub printer: PrintOptions,
    pub formatter: FormatOptions,
}

impl Config {
    /// Where [`Config::load`] looks: `$CLIPBLOCKS_CONFIG`, else
    /// `~/.config/clipblocks/config.toml`.
    pub fn location() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => expand(Path::new(&path)),
            _ => expand(Path::new(DEFAULT_LOCATION)),
        }
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::location())
    }

    /// Reads and validates a config file. A missing file is `Ok(None)` so
    /// callers can fall back to defaults.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = expand(path.as_ref());
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config: Config = match toml::from_str(&text) {
            Ok(config) => config,
            Err(source) => return Err(ConfigError::Parse { path, source }),
        };
        config
            .check()
            .map_err(|source| ConfigError::InvalidOptions { path, source })?;
        Ok(Some(config))
    }

    /// Writes the options as TOML, creating parent directories.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = expand(path.as_ref());
        let text = toml::to_string_pretty(self)?;
        let written = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
            _ => Ok(()),
        }
        .and_then(|()| fs::write(&path, text));
        written.map_err(|source| ConfigError::Write { path, source })
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            classifier: self.classifier,
            printer: self.printer,
            formatter: self.formatter,
        }
    }

    /// Runs the same option validation the pipeline does on construction.
    pub fn check(&self) -> Result<(), OptionsError> {
        Converter::new(self.convert_options()).map(drop)
    }
}

/// `~` and `$VAR` expansion. An undefined variable leaves the path untouched.
fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(&raw)
        .map(|expanded| PathBuf::from(expanded.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}
