//! Direct and collection-based material bindings.

use std::fmt;

use crate::collection::{parse_collection_path, Collection, MembershipQuery};
use crate::core::{Relationship, SceneReader};
use crate::scene::Prim;
use crate::util::{Result, ScenePath};
use super::{BindingStrength, Purpose};

/// Handle to a material prim.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Material {
    path: ScenePath,
}

impl Material {
    /// Wrap a prim as a material. Returns None if the prim is not valid.
    pub fn from_prim(prim: &Prim<'_>) -> Option<Self> {
        prim.is_valid().then(|| Self { path: prim.path().clone() })
    }

    /// Look up `path` on `scene`. Returns None if no prim lives there.
    pub fn resolve(scene: &dyn SceneReader, path: &ScenePath) -> Option<Self> {
        Self::from_prim(&Prim::new(scene, path.clone()))
    }

    /// Path of the material prim.
    #[inline]
    pub fn path(&self) -> &ScenePath {
        &self.path
    }

    /// Name of the material prim.
    #[inline]
    pub fn name(&self) -> &str {
        self.path.name()
    }
}

/// A `material:binding[:<purpose>]` relationship.
#[derive(Clone)]
pub struct DirectBinding<'a> {
    scene: &'a dyn SceneReader,
    relationship: &'a Relationship,
    purpose: Purpose,
}

impl<'a> DirectBinding<'a> {
    pub(crate) fn new(scene: &'a dyn SceneReader, relationship: &'a Relationship, purpose: Purpose) -> Self {
        Self { scene, relationship, purpose }
    }

    /// The binding relationship.
    pub fn relationship(&self) -> &'a Relationship {
        self.relationship
    }

    /// Purpose the binding was authored for.
    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// Targeted material path (first target), if any.
    pub fn material_path(&self) -> Option<&'a ScenePath> {
        self.relationship.first_target()
    }

    /// Bound material, if the target resolves to a prim.
    pub fn material(&self) -> Option<Material> {
        Material::resolve(self.scene, self.material_path()?)
    }

    /// Binding strength.
    pub fn strength(&self) -> BindingStrength {
        BindingStrength::of(Some(self.relationship))
    }
}

/// A `material:binding:collection[:<purpose>]:<name>` relationship.
///
/// Targets are `[collection path, material path]`.
#[derive(Clone)]
pub struct CollectionBinding<'a> {
    scene: &'a dyn SceneReader,
    relationship: &'a Relationship,
    purpose: Purpose,
    binding_name: &'a str,
    collection_owner: ScenePath,
    collection_name: &'a str,
}

impl<'a> CollectionBinding<'a> {
    /// Interpret a relationship as a collection binding.
    ///
    /// Returns None unless the relationship has exactly two targets and the
    /// first one is a collection path.
    pub fn new(scene: &'a dyn SceneReader, relationship: &'a Relationship, purpose: Purpose) -> Option<Self> {
        let [collection_path, _material] = relationship.targets() else {
            return None;
        };
        let (collection_owner, collection_name) = parse_collection_path(collection_path)?;
        let binding_name = relationship
            .name()
            .rsplit(':')
            .next()
            .unwrap_or_default();

        Some(Self {
            scene,
            relationship,
            purpose,
            binding_name,
            collection_owner,
            collection_name,
        })
    }

    /// The binding relationship.
    pub fn relationship(&self) -> &'a Relationship {
        self.relationship
    }

    /// Purpose the binding was authored for.
    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// Last component of the relationship name.
    pub fn binding_name(&self) -> &'a str {
        self.binding_name
    }

    /// Path of the bound collection.
    pub fn collection_path(&self) -> &'a ScenePath {
        &self.relationship.targets()[0]
    }

    /// Name of the bound collection.
    pub fn collection_name(&self) -> &'a str {
        self.collection_name
    }

    /// The bound collection, if it exists on the scene.
    pub fn collection(&self) -> Option<&'a Collection> {
        self.scene.collection(&self.collection_owner, self.collection_name)
    }

    /// Targeted material path.
    pub fn material_path(&self) -> &'a ScenePath {
        &self.relationship.targets()[1]
    }

    /// Bound material, if the target resolves to a prim.
    pub fn material(&self) -> Option<Material> {
        Material::resolve(self.scene, self.material_path())
    }

    /// Binding strength.
    pub fn strength(&self) -> BindingStrength {
        BindingStrength::of(Some(self.relationship))
    }

    /// Membership query of the bound collection. None if the collection is missing.
    pub fn membership_query(&self) -> Result<Option<MembershipQuery>> {
        match self.collection() {
            Some(collection) => Ok(Some(collection.membership_query(self.scene, &self.collection_owner)?)),
            None => Ok(None),
        }
    }

    /// Check whether `path` is in the bound collection.
    ///
    /// A missing collection has no members; a collection whose membership
    /// cannot be computed is logged and treated the same way.
    pub fn is_member(&self, path: &ScenePath) -> bool {
        match self.membership_query() {
            Ok(Some(query)) => query.is_path_included(path),
            Ok(None) => {
                tracing::trace!(collection = %self.collection_path(), "bound collection not found");
                false
            }
            Err(e) => {
                tracing::warn!(collection = %self.collection_path(), error = %e, "cannot compute collection membership");
                false
            }
        }
    }
}

impl fmt::Debug for DirectBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectBinding")
            .field("relationship", &self.relationship.name())
            .field("purpose", &self.purpose)
            .field("material", &self.material_path())
            .finish()
    }
}

impl fmt::Debug for CollectionBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionBinding")
            .field("relationship", &self.relationship.name())
            .field("purpose", &self.purpose)
            .field("collection", self.collection_path())
            .field("material", self.material_path())
            .finish()
    }
}

/// A material binding of either kind.
#[derive(Clone, Debug)]
pub enum Binding<'a> {
    /// Relationship straight to a material.
    Direct(DirectBinding<'a>),
    /// Material bound to the members of a collection.
    Collection(CollectionBinding<'a>),
}

impl<'a> Binding<'a> {
    /// The binding relationship.
    pub fn relationship(&self) -> &'a Relationship {
        match self {
            Binding::Direct(b) => b.relationship(),
            Binding::Collection(b) => b.relationship(),
        }
    }

    /// Binding strength.
    pub fn strength(&self) -> BindingStrength {
        BindingStrength::of(Some(self.relationship()))
    }

    /// Purpose the binding was authored for.
    pub fn purpose(&self) -> Purpose {
        match self {
            Binding::Direct(b) => b.purpose(),
            Binding::Collection(b) => b.purpose(),
        }
    }

    /// Targeted material path, if any.
    pub fn material_path(&self) -> Option<&'a ScenePath> {
        match self {
            Binding::Direct(b) => b.material_path(),
            Binding::Collection(b) => Some(b.material_path()),
        }
    }

    /// Bound material, if the target resolves.
    pub fn material(&self) -> Option<Material> {
        match self {
            Binding::Direct(b) => b.material(),
            Binding::Collection(b) => b.material(),
        }
    }
}
