//! Param element
//!
//! A param is one top-level statement of a dot-ora file: an alias and its tree.
//!
//! Syntax:
//! <name> "=" <value>
//!
//! Examples:
//! - `NAMES.DEFAULT_DOMAIN = example.com`
//! - `ORCL = (DESCRIPTION = (ADDRESS = (PROTOCOL = TCP)(HOST = db01)(PORT = 1521)))`

use super::node::{AttributeNode, NodeValue};
use super::range::Range;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    /// Root of the tree; its key is the alias name as written
    pub root: AttributeNode,
    /// Order in which the param was read or added
    pub index: usize,
    /// Source range for params read from text
    #[serde(skip)]
    pub location: Option<Range>,
}

impl Param {
    pub fn new(name: impl Into<String>, value: NodeValue, index: usize) -> Self {
        Self {
            root: AttributeNode::new(name, value),
            index,
            location: None,
        }
    }

    pub fn at(mut self, location: Range) -> Self {
        self.location = Some(location);
        self
    }

    pub fn name(&self) -> &str {
        &self.root.key
    }

    pub fn value(&self) -> &NodeValue {
        &self.root.value
    }

    /// Case-insensitive alias comparison
    pub fn is_named(&self, alias: &str) -> bool {
        self.root.key_matches(alias)
    }
}
