//! Material binding schemas.
//!
//! This module answers "which material renders this prim?" for a given
//! purpose. Materials are bound to prims through relationships, either
//! directly or through collections.
//!
//! ## Key Concepts
//!
//! - **Direct binding**: `material:binding[:<purpose>]` targeting a material
//! - **Collection binding**: `material:binding:collection[:<purpose>]:<name>`
//!   targeting `[collection, material]`
//! - **Binding strength**: `bindMaterialAs` metadata; a `strongerThanDescendents`
//!   binding on an ancestor overrides bindings further down
//! - **Purpose**: `full` / `preview` bindings fall back to `allPurpose`
//!
//! ## Example
//!
//! ```ignore
//! use matbind::material::resolve_bound_material;
//!
//! let prim = stage.prim_at_path(&"/Office_set/Pencil_1/Geom/EraserHead".parse()?);
//! if let Some(material) = resolve_bound_material(&prim, "full", "")? {
//!     println!("{}", material.path());
//! }
//! ```

mod purpose;
mod binding;
mod api;
mod resolve;

pub use purpose::{BindingStrength, Purpose};
pub use binding::{Binding, CollectionBinding, DirectBinding, Material};
pub use api::MaterialBindingApi;
pub use resolve::{resolve_bound_material, BindingResolver, ResolverSettings};

/// Base name of direct binding relationships.
pub const MATERIAL_BINDING: &str = "material:binding";

/// Namespace of collection binding relationships.
pub const COLLECTION_BINDING_NAMESPACE: &str = "material:binding:collection";

/// Binding overrides bindings on descendants.
pub const STRONGER_THAN_DESCENDENTS: &str = "strongerThanDescendents";

/// Bindings on descendants override this binding (default).
pub const WEAKER_THAN_DESCENDENTS: &str = "weakerThanDescendents";

/// Name of the direct binding relationship for a purpose.
pub fn direct_binding_rel_name(purpose: Purpose) -> String {
    match purpose.namespace_suffix() {
        Some(suffix) => format!("{MATERIAL_BINDING}:{suffix}"),
        None => MATERIAL_BINDING.to_string(),
    }
}

/// Namespace holding the collection binding relationships for a purpose.
pub fn collection_binding_rel_prefix(purpose: Purpose) -> String {
    match purpose.namespace_suffix() {
        Some(suffix) => format!("{COLLECTION_BINDING_NAMESPACE}:{suffix}"),
        None => COLLECTION_BINDING_NAMESPACE.to_string(),
    }
}

/// Name of a collection binding relationship for a purpose.
pub fn collection_binding_rel_name(binding_name: &str, purpose: Purpose) -> String {
    format!("{}:{binding_name}", collection_binding_rel_prefix(purpose))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_names() {
        assert_eq!(direct_binding_rel_name(Purpose::AllPurpose), "material:binding");
        assert_eq!(direct_binding_rel_name(Purpose::Full), "material:binding:full");
        assert_eq!(collection_binding_rel_prefix(Purpose::AllPurpose), "material:binding:collection");
        assert_eq!(collection_binding_rel_prefix(Purpose::Preview), "material:binding:collection:preview");
        assert_eq!(
            collection_binding_rel_name("Erasers", Purpose::Full),
            "material:binding:collection:full:Erasers"
        );
    }
}
