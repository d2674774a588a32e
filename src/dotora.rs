//! Main module for dotora library functionality

pub mod ast;
pub mod config;
pub mod editing;
pub mod formats;
pub mod lexing;
pub mod parsing;

pub use ast::{AttrPath, AttributeNode, DotOraError, MalformedDescriptor, NodeValue, Param};
pub use editing::{AliasSelector, DotOraFile};
pub use parsing::{parse, parse_value, ParseOutput};
