//! Reading and authoring material bindings on prims.

use crate::collection::parse_collection_path;
use crate::core::{MetaData, Relationship};
use crate::scene::{Prim, Stage};
use crate::util::{Error, Result, ScenePath};
use super::{
    collection_binding_rel_name, collection_binding_rel_prefix, direct_binding_rel_name, Binding,
    BindingStrength, CollectionBinding, DirectBinding, Material, Purpose,
};

/// Material binding view of a prim.
#[derive(Clone, Debug)]
pub struct MaterialBindingApi<'a> {
    prim: Prim<'a>,
}

impl<'a> MaterialBindingApi<'a> {
    /// Wrap a prim.
    pub fn new(prim: Prim<'a>) -> Self {
        Self { prim }
    }

    /// The wrapped prim.
    pub fn prim(&self) -> &Prim<'a> {
        &self.prim
    }

    /// The authored direct binding relationship for `purpose`.
    pub fn direct_binding_rel(&self, purpose: Purpose) -> Option<&'a Relationship> {
        self.prim.relationship(&direct_binding_rel_name(purpose))
    }

    /// Direct binding for `purpose`. None if the relationship is not authored.
    pub fn direct_binding(&self, purpose: Purpose) -> Option<DirectBinding<'a>> {
        self.direct_binding_rel(purpose)
            .map(|rel| DirectBinding::new(self.prim.scene(), rel, purpose))
    }

    /// Strength of the direct binding for `purpose`.
    pub fn direct_binding_strength(&self, purpose: Purpose) -> BindingStrength {
        BindingStrength::of(self.direct_binding_rel(purpose))
    }

    /// Material the direct binding for `purpose` resolves to.
    pub fn direct_bound_material(&self, purpose: Purpose) -> Option<Material> {
        self.direct_binding(purpose)?.material()
    }

    /// Collection binding relationships for `purpose`, in authored order.
    ///
    /// Only names with exactly one namespace component after the purpose
    /// prefix qualify, so `allPurpose` never picks up purpose-specific
    /// bindings.
    pub fn collection_binding_rels(&self, purpose: Purpose) -> Vec<&'a Relationship> {
        let prefix = collection_binding_rel_prefix(purpose);
        self.prim
            .relationships()
            .iter()
            .filter(|rel| {
                rel.name()
                    .strip_prefix(prefix.as_str())
                    .and_then(|rest| rest.strip_prefix(':'))
                    .is_some_and(|name| !name.is_empty() && !name.contains(':'))
            })
            .collect()
    }

    /// Valid collection bindings for `purpose`, in authored order.
    pub fn collection_bindings(&self, purpose: Purpose) -> Vec<CollectionBinding<'a>> {
        self.collection_binding_rels(purpose)
            .into_iter()
            .filter_map(|rel| {
                let binding = CollectionBinding::new(self.prim.scene(), rel, purpose);
                if binding.is_none() {
                    tracing::trace!(prim = %self.prim.path(), rel = rel.name(), "skipping malformed collection binding");
                }
                binding
            })
            .collect()
    }

    /// Every binding authored for `purpose`: the direct one first, then collections.
    pub fn bindings(&self, purpose: Purpose) -> Vec<Binding<'a>> {
        let mut bindings: Vec<Binding<'a>> = self
            .direct_binding(purpose)
            .map(Binding::Direct)
            .into_iter()
            .collect();
        bindings.extend(self.collection_bindings(purpose).into_iter().map(Binding::Collection));
        bindings
    }
}

fn apply_strength(rel: &mut Relationship, strength: BindingStrength) {
    match strength {
        BindingStrength::StrongerThanDescendents => rel.metadata_mut().set_bind_material_as(strength.as_token()),
        BindingStrength::WeakerThanDescendents => {
            rel.metadata_mut().remove(MetaData::BIND_MATERIAL_AS_KEY);
        }
    }
}

/// Binding authoring.
impl Stage {
    /// Bind `material` directly to `prim` for `purpose`.
    pub fn bind(
        &mut self,
        prim: &ScenePath,
        material: &ScenePath,
        strength: BindingStrength,
        purpose: Purpose,
    ) -> Result<()> {
        let rel = self.create_relationship(prim, &direct_binding_rel_name(purpose), vec![material.clone()])?;
        apply_strength(rel, strength);
        tracing::debug!(%prim, %material, %purpose, %strength, "bound material");
        Ok(())
    }

    /// Bind `material` to the members of a collection, authored on `prim`.
    ///
    /// An empty `binding_name` defaults to the collection's name.
    pub fn bind_collection(
        &mut self,
        prim: &ScenePath,
        collection: &ScenePath,
        material: &ScenePath,
        binding_name: &str,
        strength: BindingStrength,
        purpose: Purpose,
    ) -> Result<()> {
        let (_, collection_name) = parse_collection_path(collection)
            .ok_or_else(|| Error::invalid_path(format!("{collection}: not a collection path")))?;
        let binding_name = if binding_name.is_empty() { collection_name } else { binding_name };
        if binding_name.contains(':') {
            return Err(Error::invalid_path(format!("binding name {binding_name:?} must not contain ':'")));
        }

        let rel = self.create_relationship(
            prim,
            &collection_binding_rel_name(binding_name, purpose),
            vec![collection.clone(), material.clone()],
        )?;
        apply_strength(rel, strength);
        tracing::debug!(%prim, %collection, %material, %purpose, %strength, "bound collection");
        Ok(())
    }

    /// Remove the direct binding for `purpose`. Returns false if none was authored.
    pub fn unbind_direct(&mut self, prim: &ScenePath, purpose: Purpose) -> bool {
        self.remove_relationship(prim, &direct_binding_rel_name(purpose))
    }

    /// Remove a collection binding. Returns false if none was authored.
    pub fn unbind_collection(&mut self, prim: &ScenePath, binding_name: &str, purpose: Purpose) -> bool {
        self.remove_relationship(prim, &collection_binding_rel_name(binding_name, purpose))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;

    fn p(s: &str) -> ScenePath {
        ScenePath::new(s).unwrap()
    }

    fn stage() -> Stage {
        let mut stage = Stage::new();
        for path in ["/Set/Pencil/Eraser", "/Set/Pencil/Shaft", "/Looks/Pink", "/Looks/Yellow"] {
            stage.define_prim(&p(path)).unwrap();
        }
        let mut erasers = Collection::new("Erasers");
        erasers.include(p("/Set/Pencil/Eraser"));
        stage.define_collection(&p("/Set"), erasers).unwrap();
        stage
    }

    #[test]
    fn test_direct_binding_authoring() {
        let mut stage = stage();
        let set = p("/Set");
        stage
            .bind(&set, &p("/Looks/Pink"), BindingStrength::StrongerThanDescendents, Purpose::Full)
            .unwrap();

        let api = MaterialBindingApi::new(stage.prim_at_path(&set));
        assert!(api.direct_binding(Purpose::AllPurpose).is_none());
        let binding = api.direct_binding(Purpose::Full).unwrap();
        assert_eq!(binding.relationship().name(), "material:binding:full");
        assert!(api.direct_binding_strength(Purpose::Full).is_stronger());
        assert_eq!(api.direct_bound_material(Purpose::Full).unwrap().path(), &p("/Looks/Pink"));

        // Rebinding weaker drops the strength metadata
        stage
            .bind(&set, &p("/Looks/Yellow"), BindingStrength::WeakerThanDescendents, Purpose::Full)
            .unwrap();
        let api = MaterialBindingApi::new(stage.prim_at_path(&set));
        assert!(!api.direct_binding_strength(Purpose::Full).is_stronger());
        assert_eq!(api.direct_bound_material(Purpose::Full).unwrap().name(), "Yellow");

        assert!(stage.unbind_direct(&set, Purpose::Full));
        assert!(!stage.unbind_direct(&set, Purpose::Full));
    }

    #[test]
    fn test_bind_missing_prim() {
        let mut stage = stage();
        let err = stage
            .bind(&p("/Nope"), &p("/Looks/Pink"), BindingStrength::default(), Purpose::AllPurpose)
            .unwrap_err();
        assert!(matches!(err, Error::PrimNotFound(_)));
    }

    #[test]
    fn test_collection_binding_authoring() {
        let mut stage = stage();
        let set = p("/Set");
        stage
            .bind_collection(
                &set,
                &p("/Set.collection:Erasers"),
                &p("/Looks/Pink"),
                "",
                BindingStrength::WeakerThanDescendents,
                Purpose::AllPurpose,
            )
            .unwrap();
        stage
            .bind_collection(
                &set,
                &p("/Set.collection:Erasers"),
                &p("/Looks/Yellow"),
                "rubber",
                BindingStrength::StrongerThanDescendents,
                Purpose::Preview,
            )
            .unwrap();

        let api = MaterialBindingApi::new(stage.prim_at_path(&set));
        let all = api.collection_bindings(Purpose::AllPurpose);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].binding_name(), "Erasers");
        assert_eq!(all[0].collection_name(), "Erasers");
        assert!(all[0].is_member(&p("/Set/Pencil/Eraser")));
        assert!(!all[0].is_member(&p("/Set/Pencil/Shaft")));

        let preview = api.collection_bindings(Purpose::Preview);
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0].relationship().name(), "material:binding:collection:preview:rubber");
        assert!(preview[0].strength().is_stronger());

        assert!(stage.unbind_collection(&set, "rubber", Purpose::Preview));
        let api = MaterialBindingApi::new(stage.prim_at_path(&set));
        assert!(api.collection_bindings(Purpose::Preview).is_empty());
    }

    #[test]
    fn test_bind_collection_rejects_bad_paths() {
        let mut stage = stage();
        let err = stage
            .bind_collection(
                &p("/Set"),
                &p("/Set"),
                &p("/Looks/Pink"),
                "",
                BindingStrength::default(),
                Purpose::AllPurpose,
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));

        let err = stage
            .bind_collection(
                &p("/Set"),
                &p("/Set.collection:Erasers"),
                &p("/Looks/Pink"),
                "a:b",
                BindingStrength::default(),
                Purpose::AllPurpose,
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }

    #[test]
    fn test_collection_binding_rels_filter() {
        let mut stage = stage();
        let set = p("/Set");
        let targets = vec![p("/Set.collection:Erasers"), p("/Looks/Pink")];
        for name in [
            "material:binding:collection:A",
            "material:binding:collection:full:B",
            "material:binding:collectionX:C",
            "material:binding:collection:full:x:y",
        ] {
            stage.create_relationship(&set, name, targets.clone()).unwrap();
        }
        // Authored but malformed: one target only
        stage
            .create_relationship(&set, "material:binding:collection:Broken", vec![p("/Looks/Pink")])
            .unwrap();

        let api = MaterialBindingApi::new(stage.prim_at_path(&set));
        let names = |purpose: Purpose| -> Vec<String> {
            api.collection_binding_rels(purpose)
                .iter()
                .map(|r| r.name().to_string())
                .collect()
        };
        assert_eq!(
            names(Purpose::AllPurpose),
            vec!["material:binding:collection:A", "material:binding:collection:Broken"]
        );
        assert_eq!(names(Purpose::Full), vec!["material:binding:collection:full:B"]);
        assert!(names(Purpose::Preview).is_empty());

        assert_eq!(api.collection_bindings(Purpose::AllPurpose).len(), 1);
    }

    #[test]
    fn test_bindings_order() {
        let mut stage = stage();
        let set = p("/Set");
        stage
            .bind_collection(
                &set,
                &p("/Set.collection:Erasers"),
                &p("/Looks/Pink"),
                "",
                BindingStrength::default(),
                Purpose::AllPurpose,
            )
            .unwrap();
        stage
            .bind(&set, &p("/Looks/Yellow"), BindingStrength::default(), Purpose::AllPurpose)
            .unwrap();

        let api = MaterialBindingApi::new(stage.prim_at_path(&set));
        let bindings = api.bindings(Purpose::AllPurpose);
        assert_eq!(bindings.len(), 2);
        assert!(matches!(bindings[0], Binding::Direct(_)));
        assert!(matches!(bindings[1], Binding::Collection(_)));
    }
}
