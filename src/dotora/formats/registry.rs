//! Named output formats for `dotora show`
//!
//! A [`Formatter`] turns a parsed [`DotOraFile`] into text. The registry keys them by
//! the name given on the command line; `ora` is the only one whose output can be read
//! back, the others are views.

use crate::dotora::editing::DotOraFile;
use crate::dotora::formats::ora::FormatOptions;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No formatter registered under this name
    UnknownFormat(String),
    /// The formatter could not encode the params (json/yaml backends)
    Encode { format: &'static str, message: String },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownFormat(name) => write!(f, "unknown output format `{name}`"),
            FormatError::Encode { format, message } => {
                write!(f, "cannot encode params as {format}: {message}")
            }
        }
    }
}

impl std::error::Error for FormatError {}

pub trait Formatter: Send + Sync {
    /// Name used with `--format`
    fn name(&self) -> &str;

    fn serialize(&self, file: &DotOraFile) -> Result<String, FormatError>;

    /// One line shown next to the name when listing formats
    fn description(&self) -> &str {
        ""
    }
}

/// Formatters by name, listed in name order
pub struct FormatRegistry {
    formatters: BTreeMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn empty() -> Self {
        FormatRegistry {
            formatters: BTreeMap::new(),
        }
    }

    /// The four built-in formats; `ora` writes with `options`
    pub fn with_options(options: FormatOptions) -> Self {
        let mut registry = Self::empty();
        registry.register(super::OraFormatter::new(options));
        registry.register(super::TreevizFormatter);
        registry.register(super::JsonFormatter);
        registry.register(super::YamlFormatter);
        registry
    }

    /// A later formatter with the same name wins.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn serialize(&self, file: &DotOraFile, format: &str) -> Result<String, FormatError> {
        match self.formatters.get(format) {
            Some(formatter) => formatter.serialize(file),
            None => Err(FormatError::UnknownFormat(format.to_string())),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.formatters.keys().map(String::as_str).collect()
    }

    /// `name  description` lines for the error message of an unknown `--format`
    pub fn describe(&self) -> Vec<String> {
        let width = self.formatters.keys().map(String::len).max().unwrap_or(0);
        self.formatters
            .iter()
            .map(|(name, formatter)| {
                format!("{name:<width$}  {}", formatter.description())
                    .trim_end()
                    .to_string()
            })
            .collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_options(FormatOptions::default())
    }
}
