//! Abstract scene access.
//!
//! [`SceneReader`] is the read-only interface between a scene engine and the
//! schema layers built on top of it (collections, material bindings). The
//! in-memory [`Stage`](crate::scene::Stage) implements it; other engines can
//! plug in by implementing the same trait.

use crate::collection::{parse_collection_path, Collection};
use crate::core::Relationship;
use crate::util::ScenePath;

/// Reader interface for a hierarchical scene.
pub trait SceneReader: Send + Sync {
    /// Identifier of the scene (usually its source file).
    fn name(&self) -> &str;

    /// Check whether a prim exists at `path`. The pseudo-root always exists.
    fn has_prim(&self, path: &ScenePath) -> bool;

    /// Child prim paths in authored order. Empty for unknown prims.
    fn children(&self, path: &ScenePath) -> Vec<ScenePath>;

    /// Relationships authored on a prim, in authored order.
    fn relationships(&self, path: &ScenePath) -> &[Relationship];

    /// Collections owned by a prim, in authored order.
    fn collections(&self, path: &ScenePath) -> &[Collection];

    /// Get a relationship by name.
    fn relationship(&self, path: &ScenePath, name: &str) -> Option<&Relationship> {
        self.relationships(path).iter().find(|r| r.name() == name)
    }

    /// Get a collection by name.
    fn collection(&self, path: &ScenePath, name: &str) -> Option<&Collection> {
        self.collections(path).iter().find(|c| c.name() == name)
    }

    /// Resolve a collection path (`/Prim.collection:Name`).
    fn collection_at(&self, collection_path: &ScenePath) -> Option<&Collection> {
        let (owner, name) = parse_collection_path(collection_path)?;
        self.collection(&owner, name)
    }
}
