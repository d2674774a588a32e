//! Path-addressed operations over an attribute tree
//!
//! All functions take the root node of a param. Lookups never fail loudly: a missing key
//! is a normal answer. Mutations only fail when the tree shape makes the request
//! impossible (a scalar in the middle of the path, an index gap), and they fail before
//! touching anything below the offending node.
//!
//! Deleting a node never prunes its ancestors, even when they end up empty.

use super::error::PathError;
use super::node::{AttributeNode, NodeValue};
use super::path::{AttrPath, Segment};

/// What `upsert_path` did to the leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
    Unchanged,
}

impl Upsert {
    pub fn changed(self) -> bool {
        !matches!(self, Upsert::Unchanged)
    }
}

/// The leaf touched by `upsert_path`
#[derive(Debug)]
pub struct Upserted<'a> {
    pub leaf: &'a mut AttributeNode,
    pub status: Upsert,
}

/// Index of the `segment.nth()`-th child matching `segment.key`
fn find_child(children: &[AttributeNode], segment: &Segment) -> Option<usize> {
    children
        .iter()
        .enumerate()
        .filter(|(_, c)| c.key_matches(&segment.key))
        .nth(segment.nth())
        .map(|(i, _)| i)
}

/// Like `find_child`, but `Ok(None)` when the segment addresses the next free slot (so
/// the caller may append) and an error when it skips past it.
fn locate_for_insert(
    children: &[AttributeNode],
    segment: &Segment,
) -> Result<Option<usize>, PathError> {
    if let Some(i) = find_child(children, segment) {
        return Ok(Some(i));
    }
    let available = children
        .iter()
        .filter(|c| c.key_matches(&segment.key))
        .count();
    if segment.nth() == available {
        Ok(None)
    } else {
        Err(PathError::IndexOutOfRange {
            key: segment.key.clone(),
            index: segment.nth(),
            available,
        })
    }
}

fn walk<'a>(root: &'a AttributeNode, segments: &[Segment]) -> Option<&'a AttributeNode> {
    let mut node = root;
    for segment in segments {
        let children = node.children()?;
        node = &children[find_child(children, segment)?];
    }
    Some(node)
}

fn walk_mut<'a>(
    root: &'a mut AttributeNode,
    segments: &[Segment],
) -> Option<&'a mut AttributeNode> {
    let mut node = root;
    for segment in segments {
        let children = node.children_mut()?;
        let index = find_child(children, segment)?;
        node = &mut children[index];
    }
    Some(node)
}

/// Case-insensitive, first-match-per-segment lookup
pub fn resolve<'a>(root: &'a AttributeNode, path: &AttrPath) -> Option<&'a AttributeNode> {
    walk(root, path.segments())
}

/// Read-only dry run of `upsert_path`: fails with the error the real walk would hit,
/// without creating anything.
fn check_insert(root: &AttributeNode, path: &AttrPath) -> Result<(), PathError> {
    let mut node = Some(root);
    for segment in path.segments() {
        match node {
            Some(current) => {
                let children = current.children().ok_or_else(|| PathError::NotAGroup {
                    key: current.key.clone(),
                })?;
                node = locate_for_insert(children, segment)?.map(|i| &children[i]);
            }
            // Below a group that does not exist yet only the first sibling can be addressed
            None if segment.nth() > 0 => {
                return Err(PathError::IndexOutOfRange {
                    key: segment.key.clone(),
                    index: segment.nth(),
                    available: 0,
                })
            }
            None => {}
        }
    }
    Ok(())
}

/// Walk `path`, creating missing intermediate groups, and set the leaf's scalar value.
///
/// New nodes are appended after the existing children. A leaf that currently holds a
/// group is replaced by the scalar. On error the tree is left exactly as it was.
pub fn upsert_path<'a>(
    root: &'a mut AttributeNode,
    path: &AttrPath,
    value: &str,
) -> Result<Upserted<'a>, PathError> {
    check_insert(root, path)?;
    let (last, parents) = path.split_last();

    let mut node = root;
    for segment in parents {
        let key = node.key.clone();
        let children = node.children_mut().ok_or(PathError::NotAGroup { key })?;
        let index = match locate_for_insert(children, segment)? {
            Some(index) => index,
            None => {
                children.push(AttributeNode::new(
                    segment.key.clone(),
                    NodeValue::empty_group(),
                ));
                children.len() - 1
            }
        };
        node = &mut children[index];
    }

    let key = node.key.clone();
    let children = node.children_mut().ok_or(PathError::NotAGroup { key })?;
    match locate_for_insert(children, last)? {
        Some(index) => {
            let leaf = &mut children[index];
            let status = if leaf.as_scalar() == Some(value) {
                Upsert::Unchanged
            } else {
                leaf.value = NodeValue::Scalar(value.to_string());
                Upsert::Updated
            };
            Ok(Upserted { leaf, status })
        }
        None => {
            children.push(AttributeNode::scalar(last.key.clone(), value));
            let leaf = children
                .last_mut()
                .unwrap_or_else(|| unreachable!("a child was just pushed"));
            Ok(Upserted {
                leaf,
                status: Upsert::Created,
            })
        }
    }
}

/// Remove the node addressed by `path`. Returns whether a node was removed.
pub fn delete_path(root: &mut AttributeNode, path: &AttrPath) -> bool {
    let (last, parents) = path.split_last();
    let Some(parent) = walk_mut(root, parents) else {
        return false;
    };
    let Some(children) = parent.children_mut() else {
        return false;
    };
    match find_child(children, last) {
        Some(index) => {
            children.remove(index);
            true
        }
        None => false,
    }
}

/// Set or replace the first direct child named `key` with a scalar. Returns whether the
/// tree changed.
pub fn set_scalar(root: &mut AttributeNode, key: &str, value: &str) -> Result<bool, PathError> {
    let root_key = root.key.clone();
    let children = root
        .children_mut()
        .ok_or(PathError::NotAGroup { key: root_key })?;

    match children.iter_mut().find(|c| c.key_matches(key)) {
        Some(child) if child.as_scalar() == Some(value) => Ok(false),
        Some(child) => {
            child.value = NodeValue::Scalar(value.to_string());
            Ok(true)
        }
        None => {
            children.push(AttributeNode::scalar(key, value));
            Ok(true)
        }
    }
}

/// Set every scalar node named `key` anywhere below `root` to `value`. With `old_value`,
/// only nodes currently holding exactly that value are touched.
pub fn replace_values(
    root: &mut AttributeNode,
    key: &str,
    value: &str,
    old_value: Option<&str>,
) -> bool {
    let mut changed = false;
    let mut stack: Vec<&mut AttributeNode> = match root.children_mut() {
        Some(children) => children.iter_mut().collect(),
        None => return false,
    };

    while let Some(node) = stack.pop() {
        let matches_key = node.key_matches(key);
        match &mut node.value {
            NodeValue::Scalar(current) => {
                if matches_key
                    && old_value.map_or(true, |old| current == old)
                    && current != value
                {
                    *current = value.to_string();
                    changed = true;
                }
            }
            NodeValue::Group(children) => stack.extend(children.iter_mut()),
        }
    }

    changed
}

/// Remove every direct child named `key`. Returns whether any was removed.
pub fn remove_children(root: &mut AttributeNode, key: &str) -> bool {
    match root.children_mut() {
        Some(children) => {
            let before = children.len();
            children.retain(|c| !c.key_matches(key));
            children.len() != before
        }
        None => false,
    }
}
