//! Alias selection
//!
//! Most edits target one alias by name. The special name `@all` targets every param in
//! the file; it never auto-creates anything.

use std::fmt;

pub const ALL_ALIASES: &str = "@all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasSelector {
    All,
    Named(String),
}

impl AliasSelector {
    pub fn parse(alias: &str) -> Self {
        if alias.eq_ignore_ascii_case(ALL_ALIASES) {
            AliasSelector::All
        } else {
            AliasSelector::Named(alias.to_string())
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            AliasSelector::All => true,
            AliasSelector::Named(alias) => alias.eq_ignore_ascii_case(name),
        }
    }
}

impl fmt::Display for AliasSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasSelector::All => write!(f, "{}", ALL_ALIASES),
            AliasSelector::Named(alias) => write!(f, "{}", alias),
        }
    }
}
