//! JSON scene descriptions.
//!
//! A scene file is a tree of prims; each prim carries its relationships and
//! collections in authored order:
//!
//! ```json
//! {
//!   "prims": [
//!     { "name": "Office_set",
//!       "relationships": [
//!         { "name": "material:binding", "targets": ["/Office_set/Materials/Default"] }
//!       ],
//!       "collections": [
//!         { "name": "Erasers", "includes": ["/Office_set/Pencil_1/Geom/EraserHead"] }
//!       ],
//!       "children": [ { "name": "Materials" } ] }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collection::{Collection, ExpansionRule};
use crate::core::{MetaData, SceneReader};
use crate::util::{Error, Result, ScenePath};
use super::Stage;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneDesc {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    prims: Vec<PrimDesc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrimDesc {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    relationships: Vec<RelationshipDesc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    collections: Vec<CollectionDesc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<PrimDesc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelationshipDesc {
    name: String,
    #[serde(default)]
    targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bind_material_as: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionDesc {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    includes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    excludes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expansion_rule: Option<String>,
    #[serde(default)]
    include_root: bool,
}

impl Stage {
    /// Load a stage from a JSON scene file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path)?;
        let mut stage = Self::from_json_str(&text)?;
        stage.set_source_path(path.canonicalize()?);
        tracing::debug!(path = %path.display(), prims = stage.num_prims(), "stage opened");
        Ok(stage)
    }

    /// Build a stage from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let desc: SceneDesc = serde_json::from_str(text)?;
        let mut stage = Stage::new();
        let root = ScenePath::pseudo_root();
        add_prims(&mut stage, &root, &desc.prims)?;
        Ok(stage)
    }

    /// Serialize the stage to pretty JSON in the same format [`Stage::open`] reads.
    pub fn to_json_string(&self) -> Result<String> {
        let desc = SceneDesc {
            prims: self
                .children(&ScenePath::pseudo_root())
                .iter()
                .map(|child| describe_prim(self, child))
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&desc)?)
    }

    /// Write the stage to a JSON scene file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

fn parse_path(text: &str, context: &ScenePath) -> Result<ScenePath> {
    ScenePath::new(text).map_err(|e| Error::invalid_path(format!("{context}: {e}")))
}

fn add_prims(stage: &mut Stage, parent: &ScenePath, prims: &[PrimDesc]) -> Result<()> {
    let mut seen = HashSet::new();
    for desc in prims {
        if !seen.insert(desc.name.as_str()) {
            return Err(Error::invalid_scene(format!(
                "duplicate prim {:?} under {parent}",
                desc.name
            )));
        }

        let path = parent.append_child(&desc.name)?;
        stage.define_prim(&path)?;

        let mut rel_names = HashSet::new();
        for rel in &desc.relationships {
            if !rel_names.insert(rel.name.as_str()) {
                return Err(Error::invalid_scene(format!(
                    "duplicate relationship {:?} on {path}",
                    rel.name
                )));
            }
            let targets = rel
                .targets
                .iter()
                .map(|t| parse_path(t, &path))
                .collect::<Result<Vec<_>>>()?;
            let relationship = stage.create_relationship(&path, &rel.name, targets)?;
            for (key, value) in &rel.metadata {
                relationship.metadata_mut().set(key.as_str(), value.as_str());
            }
            if let Some(strength) = &rel.bind_material_as {
                relationship.metadata_mut().set_bind_material_as(strength);
            }
        }

        let mut collection_names = HashSet::new();
        for coll in &desc.collections {
            if !collection_names.insert(coll.name.as_str()) {
                return Err(Error::invalid_scene(format!(
                    "duplicate collection {:?} on {path}",
                    coll.name
                )));
            }
            let mut collection = Collection::new(&coll.name)
                .with_include_root(coll.include_root);
            if let Some(rule) = &coll.expansion_rule {
                collection = collection.with_expansion_rule(ExpansionRule::from_token(rule));
            }
            for include in &coll.includes {
                collection.include(parse_path(include, &path)?);
            }
            for exclude in &coll.excludes {
                collection.exclude(parse_path(exclude, &path)?);
            }
            stage.define_collection(&path, collection)?;
        }

        add_prims(stage, &path, &desc.children)?;
    }
    Ok(())
}

fn describe_prim(stage: &Stage, path: &ScenePath) -> PrimDesc {
    let relationships = stage
        .relationships(path)
        .iter()
        .map(|rel| {
            let mut metadata: MetaData = rel.metadata().clone();
            let bind_material_as = metadata.remove(MetaData::BIND_MATERIAL_AS_KEY);
            RelationshipDesc {
                name: rel.name().to_string(),
                targets: rel.targets().iter().map(|t| t.to_string()).collect(),
                bind_material_as,
                metadata: metadata
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        })
        .collect();

    let collections = stage
        .collections(path)
        .iter()
        .map(|coll| CollectionDesc {
            name: coll.name().to_string(),
            includes: coll.includes().iter().map(|p| p.to_string()).collect(),
            excludes: coll.excludes().iter().map(|p| p.to_string()).collect(),
            expansion_rule: Some(coll.expansion_rule().as_token().to_string()),
            include_root: coll.include_root(),
        })
        .collect();

    PrimDesc {
        name: path.name().to_string(),
        relationships,
        collections,
        children: stage
            .children(path)
            .iter()
            .map(|child| describe_prim(stage, child))
            .collect(),
    }
}
