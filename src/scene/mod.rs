//! In-memory scene engine.
//!
//! - [`Stage`] - Prim hierarchy with relationships and collections
//! - [`Prim`] - Read-only handle used to walk a scene
//!
//! Stages are built programmatically or loaded from JSON scene files
//! (see [`Stage::open`]).

mod stage;
mod prim;
mod loader;

pub use stage::Stage;
pub use prim::Prim;
