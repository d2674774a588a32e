//! Treeviz formatter
//!
//! One line per node, two spaces of indentation per level of nesting:
//!
//!     ⧉ ORCL
//!       ≔ DESCRIPTION
//!         ≔ ADDRESS
//!           ◦ HOST = db01
//!
//! Icons:
//!     Param: ⧉
//!     Group: ≔
//!     Scalar: ◦

use super::registry::{FormatError, Formatter};
use crate::dotora::ast::node::{AttributeNode, NodeValue};
use crate::dotora::editing::DotOraFile;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn push_tree(out: &mut String, root: &AttributeNode) {
    let mut stack: Vec<(&AttributeNode, usize)> = vec![(root, 0)];

    while let Some((node, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        let icon = if depth == 0 { "⧉" } else if node.value.is_group() { "≔" } else { "◦" };
        match &node.value {
            NodeValue::Scalar(text) => {
                out.push_str(&format!("{}{} {} = {}\n", indent, icon, node.key, truncate(text, 40)))
            }
            NodeValue::Group(children) if children.is_empty() => {
                out.push_str(&format!("{}{} {} (empty)\n", indent, icon, node.key))
            }
            NodeValue::Group(children) => {
                out.push_str(&format!("{}{} {}\n", indent, icon, node.key));
                stack.extend(children.iter().rev().map(|c| (c, depth + 1)));
            }
        }
    }
}

/// Render every param of the file as a tree
pub fn to_treeviz_str(file: &DotOraFile) -> String {
    let mut out = String::new();
    for param in file.params() {
        push_tree(&mut out, &param.root);
    }
    out
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, file: &DotOraFile) -> Result<String, FormatError> {
        Ok(to_treeviz_str(file))
    }

    fn description(&self) -> &str {
        "One line per node, indentation shows nesting"
    }
}
