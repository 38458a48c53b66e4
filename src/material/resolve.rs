//! Bound material resolution.
//!
//! Walks a prim's ancestor chain and picks the material that renders it,
//! combining direct and collection bindings with their strengths. A
//! purpose-specific pass runs first, then the `allPurpose` fallback.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::scene::Prim;
use crate::util::{Error, Result};
use super::{CollectionBinding, Material, MaterialBindingApi, Purpose};

/// Resolver configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverSettings {
    /// Purposes callers may request. `allPurpose` is always searched as the
    /// fallback, whether or not it is listed here.
    pub allowed_purposes: Vec<Purpose>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            allowed_purposes: Purpose::ALL.to_vec(),
        }
    }
}

impl ResolverSettings {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let settings = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        tracing::debug!(path = %path.display(), ?settings, "loaded resolver settings");
        Ok(settings)
    }

    /// Parse settings from JSON text. Unknown purpose tokens are rejected.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check whether `purpose` may be requested.
    pub fn allows(&self, purpose: Purpose) -> bool {
        self.allowed_purposes.contains(&purpose)
    }
}

/// Resolves bound materials under a fixed configuration.
///
/// Resolution only reads the scene, so one resolver can be shared freely
/// between threads.
#[derive(Clone, Debug, Default)]
pub struct BindingResolver {
    settings: ResolverSettings,
}

impl BindingResolver {
    /// Create a resolver with the given settings.
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    /// Active settings.
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Find the material bound to `prim` for `purpose`.
    ///
    /// A non-empty `collection_name` restricts collection bindings to the
    /// collection with that name. Returns `Ok(None)` when nothing is bound.
    #[tracing::instrument(level = "debug", skip_all, fields(prim = %prim.path(), purpose = %purpose))]
    pub fn resolve(&self, prim: &Prim<'_>, purpose: Purpose, collection_name: &str) -> Result<Option<Material>> {
        if !prim.is_valid() {
            return Err(Error::InvalidNode(prim.path().to_string()));
        }
        if !self.settings.allows(purpose) {
            return Err(self.invalid_purpose(purpose.as_token()));
        }

        let mut purposes: SmallVec<[Purpose; 2]> = SmallVec::new();
        purposes.push(purpose);
        if purpose != Purpose::AllPurpose {
            purposes.push(Purpose::AllPurpose);
        }

        for purpose in purposes {
            if let Some(material) = resolve_for_purpose(prim, purpose, collection_name) {
                tracing::debug!(%purpose, material = %material.path(), "resolved");
                return Ok(Some(material));
            }
        }

        tracing::debug!("no material bound");
        Ok(None)
    }

    /// Like [`BindingResolver::resolve`], taking the purpose as a token.
    pub fn resolve_token(&self, prim: &Prim<'_>, purpose: &str, collection_name: &str) -> Result<Option<Material>> {
        if !prim.is_valid() {
            return Err(Error::InvalidNode(prim.path().to_string()));
        }
        let parsed = Purpose::from_token(purpose).map_err(|_| self.invalid_purpose(purpose))?;
        self.resolve(prim, parsed, collection_name)
    }

    /// Resolve many prims in parallel. Results keep the order of `prims`.
    pub fn resolve_many(
        &self,
        prims: &[Prim<'_>],
        purpose: Purpose,
        collection_name: &str,
    ) -> Vec<Result<Option<Material>>> {
        prims
            .par_iter()
            .map(|prim| self.resolve(prim, purpose, collection_name))
            .collect()
    }

    fn invalid_purpose(&self, purpose: &str) -> Error {
        Error::InvalidPurpose {
            purpose: purpose.to_string(),
            allowed: self
                .settings
                .allowed_purposes
                .iter()
                .map(|p| p.as_token().to_string())
                .collect(),
        }
    }
}

/// Find the material bound to `prim` using the default settings.
///
/// `purpose` is a purpose token (`""` means `allPurpose`); `collection_name`
/// filters collection bindings when non-empty.
pub fn resolve_bound_material(prim: &Prim<'_>, purpose: &str, collection_name: &str) -> Result<Option<Material>> {
    BindingResolver::default().resolve_token(prim, purpose, collection_name)
}

/// One pass of the ancestor walk for a single purpose.
fn resolve_for_purpose(prim: &Prim<'_>, purpose: Purpose, collection_name: &str) -> Option<Material> {
    let mut material: Option<Material> = None;

    for path in prim.path().ancestors() {
        let api = MaterialBindingApi::new(prim.prim_at_path(&path));

        // Strong bindings replace whatever was found below, even with nothing
        if material.is_none() || api.direct_binding_strength(purpose).is_stronger() {
            material = api.direct_bound_material(purpose);
        }

        for binding in nearest_collection_bindings(api.prim(), purpose) {
            if !collection_name.is_empty() && binding.collection_name() != collection_name {
                continue;
            }
            if binding.is_member(&path) && (material.is_none() || binding.strength().is_stronger()) {
                material = binding.material();
            }
        }
    }

    material
}

/// Collection bindings of the nearest prim, at or above `prim`, that authors
/// any collection binding relationship for `purpose`.
///
/// The search stops there even if none of those relationships is usable.
fn nearest_collection_bindings<'a>(prim: &Prim<'a>, purpose: Purpose) -> Vec<CollectionBinding<'a>> {
    for path in prim.path().ancestors() {
        let api = MaterialBindingApi::new(prim.prim_at_path(&path));
        if !api.collection_binding_rels(purpose).is_empty() {
            tracing::trace!(owner = %path, %purpose, "nearest collection bindings");
            return api.collection_bindings(purpose);
        }
    }
    Vec::new()
}
