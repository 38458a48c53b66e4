//! Collection schemas.
//!
//! Collections provide a way to name a set of prims without modifying the
//! scene hierarchy. Material bindings use them to assign one material to many
//! prims at once.
//!
//! ## Key Concepts
//!
//! - **Collection**: Named include/exclude rules owned by a prim
//! - **Expansion rule**: Whether includes also cover descendants
//! - **MembershipQuery**: Flattened rules answering "is this path a member?"
//!
//! ## Example
//!
//! ```ignore
//! use matbind::collection::Collection;
//!
//! let owner = stage.prim_at_path(&"/Office_set".parse()?);
//! if let Some(erasers) = owner.collection("Erasers") {
//!     let query = erasers.membership_query(stage, owner.path())?;
//!     println!("{}", query.is_path_included(&"/Office_set/Pencil/Eraser".parse()?));
//! }
//! ```

mod schema;
mod membership;

pub use schema::*;
pub use membership::MembershipQuery;

/// Property namespace of collections on their owning prim.
pub const COLLECTION_NAMESPACE: &str = "collection";
