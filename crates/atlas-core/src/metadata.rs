//! Entity-relationship metadata.
//!
//! The exposure engine consumes a description of each entity type: its
//! scalar column names, its identifier fields, and its relations to other
//! types. [`MetadataProvider`] is the consuming trait; [`EntityGraph`] is
//! the in-tree implementation, a directed graph with an explicit node arena
//! and a name index so that cyclic schemas (bidirectional or diamond-shaped
//! relations) are representable without reference cycles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// How a relation is fetched by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchKind {
    /// The relation is loaded together with its owner.
    Eager,
    /// The relation is loaded on first access.
    Lazy,
}

/// A relation from one entity type to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// The field name the relation is exposed under.
    pub field: String,
    /// The target entity type name.
    pub target: String,
    /// True for to-many relations, false for to-one.
    pub to_many: bool,
    /// Fetch eagerness declared by the persistence mapping.
    pub fetch: FetchKind,
}

/// Describes an entity's scalar fields, identifier fields, and relations.
///
/// Implemented by [`EntityGraph`] in-tree; external metadata sources
/// (ORM mapping readers, schema registries) implement it at the boundary.
pub trait MetadataProvider {
    /// Ordered scalar column names of the entity type.
    fn scalar_fields(&self, entity: &str) -> Result<Vec<String>, MetadataError>;

    /// Ordered identifier (key) field names of the entity type.
    fn identifier_fields(&self, entity: &str) -> Result<Vec<String>, MetadataError>;

    /// Relations declared on the entity type, in declaration order.
    fn relations(&self, entity: &str) -> Result<Vec<Relation>, MetadataError>;
}

/// Opaque handle to an entity node inside an [`EntityGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(usize);

/// Directed entity-relationship graph.
///
/// Nodes live in an arena indexed by [`EntityId`]; a name index maps type
/// names to nodes. Relations are edges holding the target's id, so cycles
/// (`A ↔ B`) and diamonds (`A → B → D`, `A → C → D`) are plain data.
///
/// # Example
///
/// ```
/// use atlas_core::{EntityGraph, FetchKind, MetadataProvider};
///
/// let mut graph = EntityGraph::new();
/// let user = graph.add_entity("User", ["id", "username", "email"], ["id"]);
/// let profile = graph.add_entity("Profile", ["id", "lastname"], ["id"]);
/// graph.to_one(user, "profile", profile, FetchKind::Eager);
/// graph.to_one(profile, "user", user, FetchKind::Lazy);
///
/// let relations = graph.relations("User").unwrap();
/// assert_eq!(relations[0].field, "profile");
/// assert_eq!(relations[0].target, "Profile");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    nodes: Vec<EntityNode>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
struct EntityNode {
    name: String,
    scalars: Vec<String>,
    identifiers: Vec<String>,
    edges: Vec<RelationEdge>,
}

#[derive(Debug, Clone)]
struct RelationEdge {
    field: String,
    target: usize,
    to_many: bool,
    fetch: FetchKind,
}

impl EntityGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity type with its scalar and identifier fields.
    ///
    /// Re-adding an existing name replaces its field lists but keeps its
    /// id and already-declared relations.
    pub fn add_entity<S, I>(&mut self, name: impl Into<String>, scalars: S, identifiers: I) -> EntityId
    where
        S: IntoIterator,
        S::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let name = name.into();
        let scalars: Vec<String> = scalars.into_iter().map(Into::into).collect();
        let identifiers: Vec<String> = identifiers.into_iter().map(Into::into).collect();

        if let Some(&idx) = self.index.get(&name) {
            self.nodes[idx].scalars = scalars;
            self.nodes[idx].identifiers = identifiers;
            return EntityId(idx);
        }

        let idx = self.nodes.len();
        self.nodes.push(EntityNode {
            name: name.clone(),
            scalars,
            identifiers,
            edges: Vec::new(),
        });
        self.index.insert(name, idx);
        EntityId(idx)
    }

    /// Declares a to-one relation edge.
    pub fn to_one(&mut self, from: EntityId, field: impl Into<String>, target: EntityId, fetch: FetchKind) {
        self.relate(from, field, target, false, fetch);
    }

    /// Declares a to-many relation edge.
    pub fn to_many(&mut self, from: EntityId, field: impl Into<String>, target: EntityId, fetch: FetchKind) {
        self.relate(from, field, target, true, fetch);
    }

    /// Declares a relation edge.
    pub fn relate(
        &mut self,
        from: EntityId,
        field: impl Into<String>,
        target: EntityId,
        to_many: bool,
        fetch: FetchKind,
    ) {
        self.nodes[from.0].edges.push(RelationEdge {
            field: field.into(),
            target: target.0,
            to_many,
            fetch,
        });
    }

    /// Returns the id for an entity type name, if registered.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<EntityId> {
        self.index.get(name).copied().map(EntityId)
    }

    /// Returns true if the graph contains the entity type.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of entity types in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no entity types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, entity: &str) -> Result<&EntityNode, MetadataError> {
        self.index
            .get(entity)
            .map(|&idx| &self.nodes[idx])
            .ok_or_else(|| MetadataError::unknown_entity(entity))
    }
}

impl MetadataProvider for EntityGraph {
    fn scalar_fields(&self, entity: &str) -> Result<Vec<String>, MetadataError> {
        Ok(self.node(entity)?.scalars.clone())
    }

    fn identifier_fields(&self, entity: &str) -> Result<Vec<String>, MetadataError> {
        Ok(self.node(entity)?.identifiers.clone())
    }

    fn relations(&self, entity: &str) -> Result<Vec<Relation>, MetadataError> {
        let node = self.node(entity)?;
        Ok(node
            .edges
            .iter()
            .map(|edge| Relation {
                field: edge.field.clone(),
                target: self.nodes[edge.target].name.clone(),
                to_many: edge.to_many,
                fetch: edge.fetch,
            })
            .collect())
    }
}
