//! Configuration loader for dotora.
//!
//! `defaults/dotora.default.toml` is embedded so that documented defaults and runtime
//! behavior stay in sync. Callers layer user files and CLI overrides on top via
//! [`Loader`] before deserializing into [`DotOraConfig`].

use crate::dotora::formats::ora::FormatOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/dotora.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct DotOraConfig {
    pub formatting: FormattingConfig,
    pub editing: EditingConfig,
}

/// Writer layout, mirrors [`FormatOptions`]
#[derive(Debug, Clone, Deserialize)]
pub struct FormattingConfig {
    pub sibling_separator: String,
    pub spaced_assignment: bool,
    pub line_ending: String,
}

impl FormattingConfig {
    pub fn to_options(&self) -> FormatOptions {
        FormatOptions {
            sibling_separator: self.sibling_separator.clone(),
            spaced_assignment: self.spaced_assignment,
            line_ending: self.line_ending.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditingConfig {
    pub follow_symlinks: bool,
    pub default_format: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a configuration file that may not exist.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. from a CLI flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<DotOraConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<DotOraConfig, ConfigError> {
    Loader::new().build()
}
