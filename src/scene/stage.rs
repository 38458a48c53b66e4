//! In-memory stage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::collection::{collection_path, Collection};
use crate::core::{Relationship, SceneReader};
use crate::util::{validate_prim_name, Error, Result, ScenePath};
use super::Prim;

/// Authored data of a single prim.
#[derive(Clone, Debug, Default)]
pub(crate) struct PrimData {
    pub(crate) children: Vec<String>,
    pub(crate) relationships: Vec<Relationship>,
    pub(crate) collections: Vec<Collection>,
}

/// A hierarchy of prims with relationships and collections.
///
/// The pseudo-root `/` always exists. Prims are addressed by [`ScenePath`];
/// children, relationships and collections keep their authored order.
#[derive(Clone, Debug)]
pub struct Stage {
    name: String,
    source_path: Option<PathBuf>,
    prims: HashMap<ScenePath, PrimData>,
}

impl Stage {
    /// Create an empty, anonymous stage.
    pub fn new() -> Self {
        Self::with_name("anonymous")
    }

    /// Create an empty stage with an identifier.
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut prims = HashMap::new();
        prims.insert(ScenePath::pseudo_root(), PrimData::default());
        Self {
            name: name.into(),
            source_path: None,
            prims,
        }
    }

    /// File this stage was loaded from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub(crate) fn set_source_path(&mut self, path: PathBuf) {
        self.name = path.display().to_string();
        self.source_path = Some(path);
    }

    /// Number of prims, excluding the pseudo-root.
    pub fn num_prims(&self) -> usize {
        self.prims.len() - 1
    }

    /// Get a prim handle. The handle is invalid if nothing exists at `path`.
    pub fn prim_at_path(&self, path: &ScenePath) -> Prim<'_> {
        Prim::new(self, path.clone())
    }

    /// Get the pseudo-root prim.
    pub fn pseudo_root(&self) -> Prim<'_> {
        Prim::new(self, ScenePath::pseudo_root())
    }

    /// Define a prim and any missing ancestors. Defining an existing prim is a no-op.
    pub fn define_prim(&mut self, path: &ScenePath) -> Result<()> {
        if path.is_property_path() {
            return Err(Error::invalid_path(format!("{path}: not a prim path")));
        }
        if self.prims.contains_key(path) {
            return Ok(());
        }

        let Some(parent) = path.parent() else {
            return Ok(());
        };
        self.define_prim(&parent)?;

        validate_prim_name(path.name())?;
        if let Some(parent_data) = self.prims.get_mut(&parent) {
            parent_data.children.push(path.name().to_string());
        }
        self.prims.insert(path.clone(), PrimData::default());
        Ok(())
    }

    /// Remove a prim and its whole subtree. Returns false if nothing was removed.
    pub fn remove_prim(&mut self, path: &ScenePath) -> bool {
        if path.is_pseudo_root() || !self.prims.contains_key(path) {
            return false;
        }

        self.prims.retain(|p, _| !p.has_prefix(path));
        if let Some(parent) = path.parent() {
            if let Some(parent_data) = self.prims.get_mut(&parent) {
                parent_data.children.retain(|c| c != path.name());
            }
        }
        true
    }

    /// Depth-first, pre-order list of every prim path (pseudo-root excluded).
    pub fn traverse(&self) -> Vec<ScenePath> {
        let mut out = Vec::with_capacity(self.num_prims());
        let mut stack: Vec<ScenePath> = self.children(&ScenePath::pseudo_root());
        stack.reverse();

        while let Some(path) = stack.pop() {
            let mut children = self.children(&path);
            children.reverse();
            stack.extend(children);
            out.push(path);
        }
        out
    }

    fn prim_data_mut(&mut self, path: &ScenePath) -> Result<&mut PrimData> {
        if path.is_pseudo_root() {
            return Err(Error::invalid_path("the pseudo-root cannot hold properties"));
        }
        self.prims
            .get_mut(path)
            .ok_or_else(|| Error::PrimNotFound(path.to_string()))
    }

    /// Create a relationship or replace the targets of an existing one.
    ///
    /// Existing relationships keep their position and metadata.
    pub fn create_relationship(
        &mut self,
        prim: &ScenePath,
        name: &str,
        targets: Vec<ScenePath>,
    ) -> Result<&mut Relationship> {
        // Validates the property name
        prim.append_property(name)?;
        let data = self.prim_data_mut(prim)?;

        let index = match data.relationships.iter().position(|r| r.name() == name) {
            Some(index) => {
                data.relationships[index].set_targets(targets);
                index
            }
            None => {
                data.relationships.push(Relationship::with_targets(name, targets));
                data.relationships.len() - 1
            }
        };
        Ok(&mut data.relationships[index])
    }

    /// Mutable access to an authored relationship.
    pub fn relationship_mut(&mut self, prim: &ScenePath, name: &str) -> Option<&mut Relationship> {
        self.prims
            .get_mut(prim)?
            .relationships
            .iter_mut()
            .find(|r| r.name() == name)
    }

    /// Set a metadata entry on an authored relationship.
    pub fn set_relationship_metadata(&mut self, prim: &ScenePath, name: &str, key: &str, value: &str) -> Result<()> {
        self.prim_data_mut(prim)?;
        let rel = self
            .relationship_mut(prim, name)
            .ok_or_else(|| Error::other(format!("relationship {name} not found on {prim}")))?;
        rel.metadata_mut().set(key, value);
        Ok(())
    }

    /// Remove a relationship. Returns false if it was not authored.
    pub fn remove_relationship(&mut self, prim: &ScenePath, name: &str) -> bool {
        let Some(data) = self.prims.get_mut(prim) else {
            return false;
        };
        let before = data.relationships.len();
        data.relationships.retain(|r| r.name() != name);
        data.relationships.len() != before
    }

    /// Define a collection on a prim, replacing any collection with the same
    /// name. Returns the collection's path.
    pub fn define_collection(&mut self, prim: &ScenePath, collection: Collection) -> Result<ScenePath> {
        let path = collection_path(prim, collection.name())?;
        let data = self.prim_data_mut(prim)?;

        match data.collections.iter_mut().find(|c| c.name() == collection.name()) {
            Some(existing) => *existing = collection,
            None => data.collections.push(collection),
        }
        Ok(path)
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneReader for Stage {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_prim(&self, path: &ScenePath) -> bool {
        self.prims.contains_key(path)
    }

    fn children(&self, path: &ScenePath) -> Vec<ScenePath> {
        let Some(data) = self.prims.get(path) else {
            return Vec::new();
        };
        data.children
            .iter()
            .filter_map(|name| path.append_child(name).ok())
            .collect()
    }

    fn relationships(&self, path: &ScenePath) -> &[Relationship] {
        self.prims
            .get(path)
            .map(|d| d.relationships.as_slice())
            .unwrap_or(&[])
    }

    fn collections(&self, path: &ScenePath) -> &[Collection] {
        self.prims
            .get(path)
            .map(|d| d.collections.as_slice())
            .unwrap_or(&[])
    }
}
