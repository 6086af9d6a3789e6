//! Nested field-specification trees.
//!
//! A [`FieldSpecTree`] describes which scalar fields and which relations
//! (and, recursively, their fields) are permitted to cross the wire for a
//! resource. Two trees exist per request at most: the *allowed* tree
//! (default-computed or configured per route) and, for pull requests, a
//! *requested* tree derived from client input and then narrowed against
//! *allowed*.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// A nested field-specification tree.
///
/// Each node holds an ordered set of flat scalar field names plus a mapping
/// from relation names to child trees. Trees are cycle-free by construction:
/// every producer in this workspace builds them top-down with bounded
/// recursion.
///
/// # Example
///
/// ```
/// use atlas_core::FieldSpecTree;
///
/// let tree = FieldSpecTree::new()
///     .field("username")
///     .field("email")
///     .with_child("profile", FieldSpecTree::new().field("id").field("lastname"));
///
/// assert!(tree.has_field("username"));
/// assert!(tree.child("profile").is_some());
/// assert!(!tree.has_field("password"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSpecTree {
    /// Flat scalar field names, in insertion order.
    #[serde(skip_serializing_if = "IndexSet::is_empty")]
    fields: IndexSet<String>,

    /// Relation name to child tree, in insertion order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    children: IndexMap<String, FieldSpecTree>,
}

impl FieldSpecTree {
    /// Creates an empty tree (nothing exposed).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flat field, builder style.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.add_field(name);
        self
    }

    /// Adds a nested child tree under a relation name, builder style.
    #[must_use]
    pub fn with_child(mut self, name: impl Into<String>, child: FieldSpecTree) -> Self {
        self.add_child(name, child);
        self
    }

    /// Adds a flat field.
    pub fn add_field(&mut self, name: impl Into<String>) {
        self.fields.insert(name.into());
    }

    /// Adds a nested child tree under a relation name, replacing any
    /// existing child with the same name.
    pub fn add_child(&mut self, name: impl Into<String>, child: FieldSpecTree) {
        self.children.insert(name.into(), child);
    }

    /// Returns true if the tree exposes nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.children.is_empty()
    }

    /// Returns true if `name` is present as a flat field.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// Returns true if `name` is present as a nested relation entry.
    #[must_use]
    pub fn has_child(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Returns the child tree for a relation name, if present.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&FieldSpecTree> {
        self.children.get(name)
    }

    /// Iterates the flat field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Iterates the nested entries in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &FieldSpecTree)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of flat fields at this node.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of nested entries at this node.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Unions another tree into this one, recursively merging children
    /// that share a name.
    pub fn merge(&mut self, other: &FieldSpecTree) {
        for field in other.fields() {
            self.add_field(field);
        }
        for (name, child) in other.children() {
            if let Some(existing) = self.children.get_mut(name) {
                existing.merge(child);
            } else {
                self.children.insert(name.to_string(), child.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree() {
        let tree = FieldSpecTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.field_count(), 0);
        assert_eq!(tree.child_count(), 0);
    }

    #[test]
    fn test_builder() {
        let tree = FieldSpecTree::new()
            .field("id")
            .field("username")
            .with_child("profile", FieldSpecTree::new().field("lastname"));

        assert!(tree.has_field("id"));
        assert!(tree.has_field("username"));
        assert!(tree.has_child("profile"));
        assert!(tree.child("profile").unwrap().has_field("lastname"));
        assert!(tree.child("missing").is_none());
    }

    #[test]
    fn test_duplicate_fields_collapse() {
        let mut tree = FieldSpecTree::new();
        tree.add_field("id");
        tree.add_field("id");
        assert_eq!(tree.field_count(), 1);
    }

    #[test]
    fn test_child_replacement() {
        let mut tree = FieldSpecTree::new();
        tree.add_child("profile", FieldSpecTree::new().field("a"));
        tree.add_child("profile", FieldSpecTree::new().field("b"));

        assert_eq!(tree.child_count(), 1);
        assert!(tree.child("profile").unwrap().has_field("b"));
        assert!(!tree.child("profile").unwrap().has_field("a"));
    }

    #[test]
    fn test_field_order_preserved() {
        let tree = FieldSpecTree::new().field("b").field("a").field("c");
        let order: Vec<_> = tree.fields().collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_merge_unions_recursively() {
        let mut left = FieldSpecTree::new()
            .field("a")
            .with_child("rel", FieldSpecTree::new().field("x"));
        let right = FieldSpecTree::new()
            .field("b")
            .with_child("rel", FieldSpecTree::new().field("y"));

        left.merge(&right);
        assert!(left.has_field("a"));
        assert!(left.has_field("b"));
        let rel = left.child("rel").unwrap();
        assert!(rel.has_field("x"));
        assert!(rel.has_field("y"));
    }

    #[test]
    fn test_serde_round_trip() {
        let tree = FieldSpecTree::new()
            .field("username")
            .with_child("profile", FieldSpecTree::new().field("id"));

        let json = serde_json::to_string(&tree).expect("serialization should work");
        let back: FieldSpecTree = serde_json::from_str(&json).expect("deserialization should work");
        assert_eq!(tree, back);
    }
}
