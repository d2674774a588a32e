//! The descriptor model
//!
//!     A dot-ora file is a list of [`Param`]s. Each param owns a root [`AttributeNode`]
//!     whose key is the alias name and whose value is either a scalar or an ordered group
//!     of child nodes. [`AttrPath`] addresses nodes inside that tree and the functions in
//!     [`tree`] read and mutate it.
//!
//!     Keys are stored exactly as written. Every comparison goes through
//!     [`AttributeNode::key_matches`], which ignores ASCII case.

pub mod error;
pub mod node;
pub mod param;
pub mod path;
pub mod range;
pub mod tree;

pub use error::{format_source_context, DotOraError, MalformedDescriptor, PathError, UsageError};
pub use node::{AttributeNode, NodeValue};
pub use param::Param;
pub use path::{AttrPath, Segment};
pub use range::{Position, Range, SourceLocation};
