//! The whole-file owner
//!
//! Lookups by alias resolve to the first param whose name matches ignoring case.
//! Duplicate aliases are kept as they are unless an edit targets them.
//!
//! Names and scalar values handed to an edit are checked against the lexer's rules
//! first; anything that would not read back unchanged is refused with a warning.

use super::selector::AliasSelector;
use crate::dotora::ast::error::{MalformedDescriptor, PathError};
use crate::dotora::ast::node::{AttributeNode, NodeValue};
use crate::dotora::ast::param::Param;
use crate::dotora::ast::path::AttrPath;
use crate::dotora::ast::tree;
use crate::dotora::formats::ora::{render_file, render_value, FormatOptions};
use crate::dotora::parsing::{check_key, check_scalar, parse, parse_value};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct DotOraFile {
    params: Vec<Param>,
    warnings: Vec<String>,
    changed: bool,
    next_index: usize,
}

impl DotOraFile {
    /// Parse a file's full text. Warnings from parsing are carried over.
    pub fn parse(source: &str) -> Result<Self, MalformedDescriptor> {
        let output = parse(source)?;
        let next_index = output.params.len();
        Ok(Self {
            params: output.params,
            warnings: output.warnings,
            changed: false,
            next_index,
        })
    }

    pub fn from_params(params: Vec<Param>) -> Self {
        let next_index = params.iter().map(|p| p.index + 1).max().unwrap_or(0);
        Self {
            params,
            warnings: Vec::new(),
            changed: false,
            next_index,
        }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Whether any mutation so far altered semantic content
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// First param named `alias`, ignoring case
    pub fn param(&self, alias: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.is_named(alias))
    }

    fn position(&self, alias: &str) -> Option<usize> {
        self.params.iter().position(|p| p.is_named(alias))
    }

    /// Rendered value of the alias, or an empty string when the alias is absent
    pub fn alias_value(&self, alias: &str) -> String {
        self.param(alias)
            .map(|p| render_value(p.value(), &FormatOptions::default()))
            .unwrap_or_default()
    }

    pub fn resolve(&self, alias: &str, path: &AttrPath) -> Option<&AttributeNode> {
        tree::resolve(&self.param(alias)?.root, path)
    }

    /// Scalar value at `path` under `alias`
    pub fn lookup(&self, alias: &str, path: &AttrPath) -> Option<&str> {
        self.resolve(alias, path)?.as_scalar()
    }

    pub fn render(&self, options: &FormatOptions) -> String {
        render_file(&self.params, options)
    }

    fn record_warning(&mut self, warning: String) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Record why an edit was refused before it touched anything
    fn reject(&mut self, alias: &str, error: PathError) -> bool {
        self.record_warning(format!("Alias: {}, {}", alias, error));
        false
    }

    fn mark_changed(&mut self, operation: &str, alias: &str) {
        debug!(operation, alias, "content changed");
        self.changed = true;
    }

    /// Apply `edit` to the root of every selected param. When nothing is selected and
    /// `create` is set, the edit runs on a fresh empty alias which is only added if the
    /// edit succeeds. Path errors become warnings.
    fn edit_selected<F>(&mut self, alias: &str, create: bool, operation: &str, mut edit: F) -> bool
    where
        F: FnMut(&mut AttributeNode) -> Result<bool, PathError>,
    {
        let selector = AliasSelector::parse(alias);
        let matching = self
            .params
            .iter()
            .enumerate()
            .filter(|(_, p)| selector.matches(p.name()))
            .map(|(i, _)| i);
        let targets: Vec<usize> = match &selector {
            AliasSelector::All => matching.collect(),
            AliasSelector::Named(_) => matching.take(1).collect(),
        };

        if targets.is_empty() {
            if let (true, AliasSelector::Named(name)) = (create, &selector) {
                if let Err(e) = check_key(name) {
                    return self.reject(name, e);
                }
                let mut param = Param::new(name.clone(), NodeValue::empty_group(), self.next_index);
                return match edit(&mut param.root) {
                    Ok(_) => {
                        self.next_index += 1;
                        self.params.push(param);
                        self.mark_changed(operation, alias);
                        true
                    }
                    Err(e) => {
                        self.record_warning(format!("Alias: {}, {}", name, e));
                        false
                    }
                };
            }
            debug!(operation, alias, "no matching alias");
            return false;
        }

        let mut changed = false;
        for index in targets {
            match edit(&mut self.params[index].root) {
                Ok(c) => changed |= c,
                Err(e) => {
                    let warning = format!("Alias: {}, {}", self.params[index].name(), e);
                    self.record_warning(warning);
                }
            }
        }
        if changed {
            self.mark_changed(operation, alias);
        }
        changed
    }

    /// Replace the whole value of `alias`, or append a new param
    pub fn upsert_alias(&mut self, alias: &str, whole_value: &str) -> Result<bool, MalformedDescriptor> {
        let value = parse_value(whole_value)?;
        let options = FormatOptions::default();

        let changed = match self.position(alias) {
            Some(index) => {
                let param = &mut self.params[index];
                let differs = render_value(param.value(), &options) != render_value(&value, &options);
                if differs {
                    param.root.value = value;
                }
                differs
            }
            None => {
                if let Err(e) = check_key(alias) {
                    return Ok(self.reject(alias, e));
                }
                self.params.push(Param::new(alias, value, self.next_index));
                self.next_index += 1;
                true
            }
        };

        if changed {
            self.mark_changed("upsert_alias", alias);
        }
        Ok(changed)
    }

    /// Set the top-level attribute `attr` of `alias`, creating the alias if needed
    pub fn set_param_value(&mut self, alias: &str, attr: &str, value: &str) -> bool {
        if let Err(e) = check_key(attr).and_then(|_| check_scalar(value)) {
            return self.reject(alias, e);
        }
        self.edit_selected(alias, true, "set_param_value", |root| {
            tree::set_scalar(root, attr, value)
        })
    }

    /// Set the scalar at `path` under `alias`, creating the alias and any missing
    /// intermediate groups
    pub fn upsert_alias_attribute(&mut self, alias: &str, path: &AttrPath, value: &str) -> bool {
        if let Err(e) = check_scalar(value) {
            return self.reject(alias, e);
        }
        self.edit_selected(alias, true, "upsert_alias_attribute", |root| {
            tree::upsert_path(root, path, value).map(|upserted| upserted.status.changed())
        })
    }

    /// Remove the top-level attribute `attr` (every occurrence) from `alias`
    pub fn delete_param(&mut self, alias: &str, attr: &str) -> bool {
        self.edit_selected(alias, false, "delete_param", |root| {
            Ok(tree::remove_children(root, attr))
        })
    }

    /// Remove the node at `path` under `alias`; ancestors stay in place
    pub fn delete_param_path(&mut self, alias: &str, path: &AttrPath) -> bool {
        self.edit_selected(alias, false, "delete_param_path", |root| {
            Ok(tree::delete_path(root, path))
        })
    }

    /// Set every scalar named `attr` at any depth under the selected aliases, optionally
    /// only where it currently equals `old_value`
    pub fn replace_attribute_values(
        &mut self,
        alias: &str,
        attr: &str,
        value: &str,
        old_value: Option<&str>,
    ) -> bool {
        if let Err(e) = check_scalar(value) {
            return self.reject(alias, e);
        }
        self.edit_selected(alias, false, "replace_attribute_values", |root| {
            Ok(tree::replace_values(root, attr, value, old_value))
        })
    }

    /// Remove the first param named `alias`
    pub fn remove_alias(&mut self, alias: &str) -> bool {
        match self.position(alias) {
            Some(index) => {
                self.params.remove(index);
                self.mark_changed("remove_alias", alias);
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for DotOraFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(&FormatOptions::default()))
    }
}
