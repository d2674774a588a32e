//! Error types for parsing and editing

use crate::dotora::ast::range::Position;
use std::fmt;

/// Unrecoverable structural error: the file (or a whole value handed to the editor)
/// cannot be split into statements, typically because of unbalanced parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedDescriptor {
    pub message: String,
    pub position: Position,
}

impl MalformedDescriptor {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// One-based line number
    pub fn line(&self) -> usize {
        self.position.line + 1
    }

    /// One-based column number
    pub fn column(&self) -> usize {
        self.position.column + 1
    }
}

impl fmt::Display for MalformedDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "malformed descriptor at line {}, column {}: {}",
            self.line(),
            self.column(),
            self.message
        )
    }
}

impl std::error::Error for MalformedDescriptor {}

/// Errors raised while addressing nodes inside an attribute tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path string has no segments
    Empty,
    /// A segment is empty or its `[n]` qualifier is not a number
    InvalidSegment { path: String, segment: String },
    /// A scalar node sits where the path needs a group
    NotAGroup { key: String },
    /// A key that would not read back as a single name
    InvalidKey { key: String },
    /// A scalar that would not read back as the same value
    InvalidValue { value: String },
    /// `KEY[n]` asks for a sibling past the next free slot
    IndexOutOfRange {
        key: String,
        index: usize,
        available: usize,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Empty => write!(f, "attribute path is empty"),
            PathError::InvalidSegment { path, segment } => {
                write!(f, "invalid segment `{}` in attribute path `{}`", segment, path)
            }
            PathError::InvalidKey { key } => {
                write!(f, "`{}` is not a valid attribute name", key)
            }
            PathError::InvalidValue { value } => write!(
                f,
                "value `{}` contains unquoted structural characters; quote it",
                value
            ),
            PathError::NotAGroup { key } => {
                write!(f, "`{}` holds a scalar value, not nested attributes", key)
            }
            PathError::IndexOutOfRange {
                key,
                index,
                available,
            } => write!(
                f,
                "index {} for `{}` is out of range ({} present)",
                index, key, available
            ),
        }
    }
}

impl std::error::Error for PathError {}

/// Rejected argument combinations for an edit request. Raised before anything is parsed
/// or mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// More than one of `whole_value`, `attribute_path`, `attribute_name`
    MutuallyExclusive(Vec<&'static str>),
    /// `state=absent` together with `whole_value`
    WholeValueWithAbsent,
    /// An attribute edit with `state=present` and no value to set
    MissingAttributeValue { argument: &'static str },
    /// `old_value` only makes sense together with `attribute_name`
    OldValueWithoutAttributeName,
    /// The alias argument is empty
    EmptyAlias,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::MutuallyExclusive(arguments) => write!(
                f,
                "parameters are mutually exclusive: {}",
                arguments.join(", ")
            ),
            UsageError::WholeValueWithAbsent => {
                write!(f, "combination of state=absent and whole_value is not allowed")
            }
            UsageError::MissingAttributeValue { argument } => {
                write!(f, "{} requires attribute_value when state=present", argument)
            }
            UsageError::OldValueWithoutAttributeName => {
                write!(f, "old_value can only be used together with attribute_name")
            }
            UsageError::EmptyAlias => write!(f, "alias must not be empty"),
        }
    }
}

impl std::error::Error for UsageError {}

/// Top-level error for everything the library can fail with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotOraError {
    Malformed(MalformedDescriptor),
    Usage(UsageError),
    Path(PathError),
}

impl fmt::Display for DotOraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DotOraError::Malformed(e) => write!(f, "{}", e),
            DotOraError::Usage(e) => write!(f, "usage error: {}", e),
            DotOraError::Path(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DotOraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DotOraError::Malformed(e) => Some(e),
            DotOraError::Usage(e) => Some(e),
            DotOraError::Path(e) => Some(e),
        }
    }
}

impl From<MalformedDescriptor> for DotOraError {
    fn from(e: MalformedDescriptor) -> Self {
        DotOraError::Malformed(e)
    }
}

impl From<UsageError> for DotOraError {
    fn from(e: UsageError) -> Self {
        DotOraError::Usage(e)
    }
}

impl From<PathError> for DotOraError {
    fn from(e: PathError) -> Self {
        DotOraError::Path(e)
    }
}

/// Format source code context around an error position
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// All lines are numbered for easy reference.
pub fn format_source_context(source: &str, position: Position) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = position.line;

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();

    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
    }

    context
}
