//! Attribute nodes
//!
//! One parenthesized element of a descriptor: `(KEY=VALUE)`. The value is either a
//! scalar token or an ordered group of child nodes, never both.
//!
//! Scalar text is kept as written, quotes included. A parenthesized list of bare values
//! such as `(TNSNAMES, EZCONNECT)` is also a scalar, normalized to `(A, B)`.

use serde::Serialize;

/// The value side of an attribute node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeValue {
    Scalar(String),
    Group(Vec<AttributeNode>),
}

impl NodeValue {
    pub fn empty_group() -> Self {
        NodeValue::Group(Vec::new())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            NodeValue::Scalar(s) => Some(s),
            NodeValue::Group(_) => None,
        }
    }

    pub fn children(&self) -> Option<&[AttributeNode]> {
        match self {
            NodeValue::Group(children) => Some(children),
            NodeValue::Scalar(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, NodeValue::Group(_))
    }
}

/// A key and its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeNode {
    pub key: String,
    pub value: NodeValue,
}

impl AttributeNode {
    pub fn new(key: impl Into<String>, value: NodeValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn scalar(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, NodeValue::Scalar(value.into()))
    }

    pub fn group(key: impl Into<String>, children: Vec<AttributeNode>) -> Self {
        Self::new(key, NodeValue::Group(children))
    }

    /// Case-insensitive key comparison
    pub fn key_matches(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }

    pub fn as_scalar(&self) -> Option<&str> {
        self.value.as_scalar()
    }

    pub fn children(&self) -> Option<&[AttributeNode]> {
        self.value.children()
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<AttributeNode>> {
        match &mut self.value {
            NodeValue::Group(children) => Some(children),
            NodeValue::Scalar(_) => None,
        }
    }

    /// First direct child with the given key
    pub fn child(&self, key: &str) -> Option<&AttributeNode> {
        self.children()?.iter().find(|c| c.key_matches(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_and_group_are_exclusive() {
        let scalar = AttributeNode::scalar("PORT", "1521");
        assert_eq!(scalar.as_scalar(), Some("1521"));
        assert!(scalar.children().is_none());

        let group = AttributeNode::group("ADDRESS", vec![scalar.clone()]);
        assert!(group.as_scalar().is_none());
        assert_eq!(group.children().map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_empty_group_differs_from_empty_scalar() {
        let empty_group = AttributeNode::new("X", NodeValue::empty_group());
        let empty_scalar = AttributeNode::scalar("X", "");
        assert_ne!(empty_group, empty_scalar);
    }

    #[test]
    fn test_child_lookup_ignores_case() {
        let node = AttributeNode::group("ADDRESS", vec![AttributeNode::scalar("Host", "db01")]);
        assert_eq!(node.child("HOST").and_then(|c| c.as_scalar()), Some("db01"));
        assert_eq!(node.child("host").and_then(|c| c.as_scalar()), Some("db01"));
        assert!(node.child("PORT").is_none());
    }
}
