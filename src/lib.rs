//! # matbind
//!
//! Material binding resolution over a USD-style scene hierarchy.
//!
//! Prims carry relationships and collections; materials are bound to prims
//! either directly (`material:binding`) or through collections
//! (`material:binding:collection:<name>`), per rendering purpose. This crate
//! answers which material is bound to a given prim.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (paths, errors)
//! - [`core`] - Scene access trait, relationships, metadata, stage cache
//! - [`scene`] - In-memory stage, prim handles, JSON scene files
//! - [`collection`] - Collections and membership queries
//! - [`material`] - Binding schema and the bound-material resolver
//!
//! ## Example
//!
//! ```ignore
//! use matbind::prelude::*;
//!
//! let stage = Stage::open("office_set.json")?;
//! let prim = stage.prim_at_path(&"/Office_set/Desk_Assembly/Cup_grp".parse()?);
//!
//! match resolve_bound_material(&prim, "full", "")? {
//!     Some(material) => println!("{}", material.path()),
//!     None => println!("no material"),
//! }
//! ```

pub mod util;
pub mod core;
pub mod scene;
pub mod collection;
pub mod material;

// Re-export commonly used types
pub use util::{Error, Result, ScenePath};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, ScenePath};
    pub use crate::core::{SceneReader, StageCache};
    pub use crate::scene::{Prim, Stage};
    pub use crate::collection::{Collection, ExpansionRule};
    pub use crate::material::{
        resolve_bound_material, BindingResolver, BindingStrength, Material, MaterialBindingApi, Purpose,
        ResolverSettings,
    };
}
