//! Tree-against-tree filtering.
//!
//! The filter narrows a requested (or client-submitted) field tree against
//! the allowed tree. Both over-requesting and typos are treated as "field
//! not granted" and dropped silently; the only hard failure at this layer
//! is a collection-shaped push payload.

use serde_json::Value;

use atlas_core::FieldSpecTree;

use crate::error::ExposeError;

/// Filters a requested tree against an allowed tree.
///
/// A flat field survives only if the allowed tree lists it flat; a nested
/// entry survives only if the allowed tree has a nested entry under the
/// same key, with the subtrees filtered recursively. Everything else is
/// dropped without error.
///
/// Filtering is idempotent: filtering an already-filtered tree against the
/// same allowed tree returns it unchanged.
///
/// # Example
///
/// ```
/// use atlas_core::FieldSpecTree;
/// use atlas_expose::filter_tree;
///
/// let requested = FieldSpecTree::new().field("username").field("address");
/// let allowed = FieldSpecTree::new().field("username").field("email");
///
/// let granted = filter_tree(&requested, &allowed);
/// assert!(granted.has_field("username"));
/// assert!(!granted.has_field("address"));
/// ```
#[must_use]
pub fn filter_tree(requested: &FieldSpecTree, allowed: &FieldSpecTree) -> FieldSpecTree {
    let mut granted = FieldSpecTree::new();
    for field in requested.fields() {
        if allowed.has_field(field) {
            granted.add_field(field);
        }
    }
    for (name, subtree) in requested.children() {
        if let Some(allowed_subtree) = allowed.child(name) {
            granted.add_child(name, filter_tree(subtree, allowed_subtree));
        }
    }
    granted
}

/// Shapes a push payload into a requested [`FieldSpecTree`].
///
/// Only single-resource payloads are accepted: a JSON object with at most
/// one top-level entry (the resource), whose value carries the submitted
/// fields. Arrays and multi-entry objects are collection-shaped and
/// rejected.
///
/// # Errors
///
/// Returns [`ExposeError::CollectionPush`] for collection-shaped payloads.
pub fn push_payload_tree(payload: &Value) -> Result<FieldSpecTree, ExposeError> {
    let Some(map) = payload.as_object() else {
        return Err(ExposeError::CollectionPush);
    };
    if map.len() > 1 {
        return Err(ExposeError::CollectionPush);
    }
    Ok(map.values().next().map(value_tree).unwrap_or_default())
}

/// Converts submitted data into field-spec form: object keys with nested
/// object/array values become nested entries, scalar-valued keys become
/// flat fields. Arrays union the shapes of their object elements.
fn value_tree(value: &Value) -> FieldSpecTree {
    let mut tree = FieldSpecTree::new();
    let Some(map) = value.as_object() else {
        return tree;
    };
    for (key, entry) in map {
        match entry {
            Value::Object(_) => tree.add_child(key, value_tree(entry)),
            Value::Array(items) => {
                let mut merged = FieldSpecTree::new();
                let mut saw_object = false;
                for item in items {
                    if item.is_object() {
                        saw_object = true;
                        merged.merge(&value_tree(item));
                    }
                }
                if saw_object {
                    tree.add_child(key, merged);
                } else {
                    // An array of scalars is a plain multi-valued field.
                    tree.add_field(key);
                }
            }
            _ => tree.add_field(key),
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_filtering() {
        let requested = FieldSpecTree::new().field("username").field("address");
        let allowed = FieldSpecTree::new().field("username").field("email");

        let granted = filter_tree(&requested, &allowed);
        let fields: Vec<_> = granted.fields().collect();
        assert_eq!(fields, vec!["username"]);
    }

    #[test]
    fn test_nested_filtering() {
        let requested = FieldSpecTree::new()
            .field("username")
            .with_child("profile", FieldSpecTree::new().field("id").field("secret"));
        let allowed = FieldSpecTree::new()
            .field("username")
            .with_child("profile", FieldSpecTree::new().field("id").field("lastname"));

        let granted = filter_tree(&requested, &allowed);
        let profile = granted.child("profile").unwrap();
        assert!(profile.has_field("id"));
        assert!(!profile.has_field("secret"));
    }

    #[test]
    fn test_nested_request_against_flat_grant_is_dropped() {
        // `profile` is allowed flat, not as a relation; the nested request
        // does not survive.
        let requested =
            FieldSpecTree::new().with_child("profile", FieldSpecTree::new().field("id"));
        let allowed = FieldSpecTree::new().field("profile");

        let granted = filter_tree(&requested, &allowed);
        assert!(granted.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let requested = FieldSpecTree::new()
            .field("a")
            .field("z")
            .with_child("rel", FieldSpecTree::new().field("x").field("q"));
        let allowed = FieldSpecTree::new()
            .field("a")
            .with_child("rel", FieldSpecTree::new().field("x"));

        let once = filter_tree(&requested, &allowed);
        let twice = filter_tree(&once, &allowed);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_allowed_grants_nothing() {
        let requested = FieldSpecTree::new().field("a");
        let granted = filter_tree(&requested, &FieldSpecTree::new());
        assert!(granted.is_empty());
    }

    #[test]
    fn test_push_single_resource() {
        let payload = json!({
            "user": {
                "username": "alice",
                "email": "a@example.com",
                "profile": { "lastname": "Smith" }
            }
        });

        let tree = push_payload_tree(&payload).unwrap();
        assert!(tree.has_field("username"));
        assert!(tree.has_field("email"));
        assert!(tree.child("profile").unwrap().has_field("lastname"));
    }

    #[test]
    fn test_push_array_of_nested_objects_unions() {
        let payload = json!({
            "user": {
                "phone_numbers": [
                    { "number": "555-1234" },
                    { "number": "555-5678", "label": "work" }
                ]
            }
        });

        let tree = push_payload_tree(&payload).unwrap();
        let phones = tree.child("phone_numbers").unwrap();
        assert!(phones.has_field("number"));
        assert!(phones.has_field("label"));
    }

    #[test]
    fn test_push_scalar_array_is_flat() {
        let payload = json!({ "user": { "tags": ["a", "b"] } });
        let tree = push_payload_tree(&payload).unwrap();
        assert!(tree.has_field("tags"));
        assert!(tree.child("tags").is_none());
    }

    #[test]
    fn test_push_rejects_top_level_array() {
        let payload = json!([{ "user": { "username": "alice" } }]);
        let err = push_payload_tree(&payload).unwrap_err();
        assert!(matches!(err, ExposeError::CollectionPush));
    }

    #[test]
    fn test_push_rejects_multi_entry_object() {
        let payload = json!({
            "user": { "username": "alice" },
            "other": { "username": "bob" }
        });
        let err = push_payload_tree(&payload).unwrap_err();
        assert!(matches!(err, ExposeError::CollectionPush));
    }

    #[test]
    fn test_push_empty_object_is_empty_tree() {
        let tree = push_payload_tree(&json!({})).unwrap();
        assert!(tree.is_empty());
    }
}
