//! Default exposure resolution over the entity relationship graph.
//!
//! When a route carries no explicit exposure override, the allowed tree is
//! computed by walking the entity graph to a bounded depth. The traversal
//! threads an explicit visited set through the recursion, scoped to one
//! top-level call, so cyclic schemas terminate and no state survives
//! between requests.

use std::collections::HashSet;

use atlas_core::{FieldSpecTree, FetchKind, MetadataError, MetadataProvider};

/// Depth-limited, cycle-avoiding traversal of the relationship graph.
///
/// # Example
///
/// ```
/// use atlas_core::{EntityGraph, FetchKind};
/// use atlas_expose::DefaultExposeResolver;
///
/// let mut graph = EntityGraph::new();
/// let user = graph.add_entity("User", ["id", "username"], ["id"]);
/// let profile = graph.add_entity("Profile", ["id", "lastname"], ["id"]);
/// graph.to_one(user, "profile", profile, FetchKind::Eager);
///
/// let resolver = DefaultExposeResolver::new(&graph);
/// let tree = resolver.resolve("User", 2, None).unwrap();
/// assert!(tree.has_field("username"));
/// assert!(tree.child("profile").unwrap().has_field("lastname"));
/// ```
#[derive(Clone, Copy)]
pub struct DefaultExposeResolver<'a> {
    metadata: &'a dyn MetadataProvider,
}

impl<'a> DefaultExposeResolver<'a> {
    /// Creates a resolver over a metadata provider.
    #[must_use]
    pub fn new(metadata: &'a dyn MetadataProvider) -> Self {
        Self { metadata }
    }

    /// Resolves the default allowed tree for an entity type.
    ///
    /// Depth 0 exposes nothing. At each level the type's scalar fields
    /// (plus identifier fields, which are always readable) are included;
    /// while depth remains, relations whose fetch kind passes the filter
    /// are recursed into. A target type already visited during this call
    /// is not expanded again: later paths to it yield an empty nested
    /// entry, which also caps diamond-shaped graphs to one expansion.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] when the graph does not know a type
    /// reached by the traversal.
    pub fn resolve(
        &self,
        entity: &str,
        depth: usize,
        fetch_filter: Option<FetchKind>,
    ) -> Result<FieldSpecTree, MetadataError> {
        let mut visited = HashSet::new();
        self.resolve_level(entity, depth, fetch_filter, &mut visited)
    }

    fn resolve_level(
        &self,
        entity: &str,
        depth: usize,
        fetch_filter: Option<FetchKind>,
        visited: &mut HashSet<String>,
    ) -> Result<FieldSpecTree, MetadataError> {
        let mut tree = FieldSpecTree::new();
        if depth == 0 {
            return Ok(tree);
        }
        visited.insert(entity.to_string());

        for field in self.metadata.scalar_fields(entity)? {
            tree.add_field(field);
        }
        for field in self.metadata.identifier_fields(entity)? {
            tree.add_field(field);
        }

        if depth > 1 {
            for relation in self.metadata.relations(entity)? {
                if let Some(kind) = fetch_filter {
                    if relation.fetch != kind {
                        continue;
                    }
                }
                if visited.contains(&relation.target) {
                    tree.add_child(relation.field, FieldSpecTree::new());
                } else {
                    let child =
                        self.resolve_level(&relation.target, depth - 1, fetch_filter, visited)?;
                    tree.add_child(relation.field, child);
                }
            }
        }

        Ok(tree)
    }
}
