//! One-shot edit requests
//!
//! An [`EditRequest`] carries the arguments of a single edit the way a host tool receives
//! them. [`apply`] validates the combination, parses the source, dispatches to exactly
//! one [`DotOraFile`] mutation and renders the result.

use super::file::DotOraFile;
use super::selector::AliasSelector;
use crate::dotora::ast::error::{DotOraError, UsageError};
use crate::dotora::ast::path::AttrPath;
use crate::dotora::formats::ora::FormatOptions;
use std::fmt;
use tracing::debug;

/// Whether the addressed content should exist after the edit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Present,
    Absent,
}

impl State {
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "present" => Some(State::Present),
            "absent" => Some(State::Absent),
            _ => None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Present => write!(f, "present"),
            State::Absent => write!(f, "absent"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditRequest {
    pub state: State,
    pub alias: String,
    pub whole_value: Option<String>,
    pub attribute_path: Option<String>,
    pub attribute_name: Option<String>,
    pub attribute_value: Option<String>,
    pub old_value: Option<String>,
}

impl EditRequest {
    pub fn present(alias: impl Into<String>) -> Self {
        Self {
            state: State::Present,
            alias: alias.into(),
            ..Default::default()
        }
    }

    pub fn absent(alias: impl Into<String>) -> Self {
        Self {
            state: State::Absent,
            alias: alias.into(),
            ..Default::default()
        }
    }

    pub fn whole_value(mut self, value: impl Into<String>) -> Self {
        self.whole_value = Some(value.into());
        self
    }

    pub fn attribute_path(mut self, path: impl Into<String>) -> Self {
        self.attribute_path = Some(path.into());
        self
    }

    pub fn attribute_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_name = Some(name.into());
        self
    }

    pub fn attribute_value(mut self, value: impl Into<String>) -> Self {
        self.attribute_value = Some(value.into());
        self
    }

    pub fn old_value(mut self, value: impl Into<String>) -> Self {
        self.old_value = Some(value.into());
        self
    }

    /// Reject argument combinations that have no meaning
    pub fn validate(&self) -> Result<(), UsageError> {
        if self.alias.trim().is_empty() {
            return Err(UsageError::EmptyAlias);
        }

        let given: Vec<&'static str> = [
            ("whole_value", self.whole_value.is_some()),
            ("attribute_path", self.attribute_path.is_some()),
            ("attribute_name", self.attribute_name.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect();
        if given.len() > 1 {
            return Err(UsageError::MutuallyExclusive(given));
        }

        if self.state == State::Absent && self.whole_value.is_some() {
            return Err(UsageError::WholeValueWithAbsent);
        }

        if self.state == State::Present && self.attribute_value.is_none() {
            if self.attribute_path.is_some() {
                return Err(UsageError::MissingAttributeValue {
                    argument: "attribute_path",
                });
            }
            if self.attribute_name.is_some() {
                return Err(UsageError::MissingAttributeValue {
                    argument: "attribute_name",
                });
            }
        }

        if self.old_value.is_some() && self.attribute_name.is_none() {
            return Err(UsageError::OldValueWithoutAttributeName);
        }

        Ok(())
    }

    /// Run the one mutation this request names. Returns whether the file changed.
    pub fn apply_to(&self, file: &mut DotOraFile) -> Result<bool, DotOraError> {
        self.validate()?;
        let alias = self.alias.trim();
        let value = self.attribute_value.as_deref().unwrap_or_default();

        let changed = match self.state {
            State::Present => {
                if let Some(whole) = &self.whole_value {
                    file.upsert_alias(alias, whole)?
                } else if let Some(path) = &self.attribute_path {
                    file.upsert_alias_attribute(alias, &AttrPath::parse(path)?, value)
                } else if let Some(name) = &self.attribute_name {
                    let all = AliasSelector::parse(alias) == AliasSelector::All;
                    if self.old_value.is_some() || all {
                        file.replace_attribute_values(alias, name, value, self.old_value.as_deref())
                    } else {
                        file.set_param_value(alias, name, value)
                    }
                } else {
                    debug!(alias, "present request without a value, nothing to do");
                    false
                }
            }
            State::Absent => {
                if let Some(path) = &self.attribute_path {
                    file.delete_param_path(alias, &AttrPath::parse(path)?)
                } else if let Some(name) = &self.attribute_name {
                    file.delete_param(alias, name)
                } else {
                    file.remove_alias(alias)
                }
            }
        };
        Ok(changed)
    }
}

/// Result of [`apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub alias: String,
    /// Rendered file after the edit
    pub content: String,
    pub changed: bool,
    /// Rendered value of the alias after the edit, empty when absent
    pub alias_value: String,
    pub warnings: Vec<String>,
}

impl EditOutcome {
    /// `ALIAS=VALUE` summary line
    pub fn message(&self) -> String {
        format!("{}={}", self.alias, self.alias_value)
    }
}

/// Parse `source`, apply `request` and render with `options`
pub fn apply(
    source: &str,
    request: &EditRequest,
    options: &FormatOptions,
) -> Result<EditOutcome, DotOraError> {
    request.validate()?;
    let mut file = DotOraFile::parse(source)?;
    request.apply_to(&mut file)?;

    let content = file.render(options);
    let changed = file.changed() && content != source;
    let alias = request.alias.trim().to_string();
    let alias_value = file.alias_value(&alias);
    debug!(alias = %alias, changed, "edit request applied");

    Ok(EditOutcome {
        alias,
        content,
        changed,
        alias_value,
        warnings: file.warnings().to_vec(),
    })
}
