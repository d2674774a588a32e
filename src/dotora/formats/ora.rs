//! Canonical dot-ora writer
//!
//! Each param is written on a single line as `NAME=VALUE`. Groups are written as
//! `(KEY=VALUE)`, siblings adjacent unless a separator is configured, scalars bare.
//! Whitespace and line wrapping of the source are not preserved; names, nesting, values
//! and order are.
//!
//! Rendering uses an explicit work stack, mirroring the parser, so nesting depth is
//! bounded by memory rather than by the call stack.

use super::registry::{FormatError, Formatter};
use crate::dotora::ast::node::{AttributeNode, NodeValue};
use crate::dotora::ast::param::Param;
use crate::dotora::editing::DotOraFile;

/// Layout knobs for the writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Placed between sibling groups
    pub sibling_separator: String,
    /// `KEY = VALUE` instead of `KEY=VALUE`
    pub spaced_assignment: bool,
    /// Written after every param
    pub line_ending: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            sibling_separator: String::new(),
            spaced_assignment: false,
            line_ending: "\n".to_string(),
        }
    }
}

impl FormatOptions {
    fn assignment(&self) -> &'static str {
        if self.spaced_assignment {
            " = "
        } else {
            "="
        }
    }
}

enum Step<'a> {
    Open(&'a AttributeNode),
    Close,
    Separator,
}

fn push_children<'a>(stack: &mut Vec<Step<'a>>, children: &'a [AttributeNode]) {
    for (i, child) in children.iter().enumerate().rev() {
        stack.push(Step::Open(child));
        if i > 0 {
            stack.push(Step::Separator);
        }
    }
}

fn write_value(out: &mut String, value: &NodeValue, options: &FormatOptions) {
    let children = match value {
        NodeValue::Scalar(text) => {
            out.push_str(text);
            return;
        }
        NodeValue::Group(children) if children.is_empty() => {
            out.push_str("()");
            return;
        }
        NodeValue::Group(children) => children,
    };

    let mut stack = Vec::new();
    push_children(&mut stack, children);

    while let Some(step) = stack.pop() {
        match step {
            Step::Open(node) => {
                out.push('(');
                out.push_str(&node.key);
                out.push_str(options.assignment());
                match &node.value {
                    NodeValue::Scalar(text) => {
                        out.push_str(text);
                        out.push(')');
                    }
                    NodeValue::Group(children) if children.is_empty() => out.push_str("())"),
                    NodeValue::Group(children) => {
                        stack.push(Step::Close);
                        push_children(&mut stack, children);
                    }
                }
            }
            Step::Close => out.push(')'),
            Step::Separator => out.push_str(&options.sibling_separator),
        }
    }
}

/// Render a value as it appears on the right-hand side of `=`
pub fn render_value(value: &NodeValue, options: &FormatOptions) -> String {
    let mut out = String::new();
    write_value(&mut out, value, options);
    out
}

/// Render a param as `NAME=VALUE` without line ending
pub fn render_param(param: &Param, options: &FormatOptions) -> String {
    let mut out = String::new();
    out.push_str(param.name());
    out.push_str(options.assignment());
    write_value(&mut out, param.value(), options);
    out
}

/// Render params in order, one per line
pub fn render_file(params: &[Param], options: &FormatOptions) -> String {
    let mut out = String::new();
    for param in params {
        out.push_str(&render_param(param, options));
        out.push_str(&options.line_ending);
    }
    out
}

/// The canonical text format
#[derive(Debug, Clone, Default)]
pub struct OraFormatter {
    pub options: FormatOptions,
}

impl OraFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }
}

impl Formatter for OraFormatter {
    fn name(&self) -> &str {
        "ora"
    }

    fn serialize(&self, file: &DotOraFile) -> Result<String, FormatError> {
        Ok(render_file(file.params(), &self.options))
    }

    fn description(&self) -> &str {
        "Canonical dot-ora text, one param per line"
    }
}
