//! Core layer - abstract scene access and shared building blocks.
//!
//! This module provides:
//! - [`SceneReader`] - Read-only trait seam over a scene engine
//! - [`Relationship`] - Named, ordered target lists on prims
//! - [`MetaData`] - Key-value metadata storage
//! - [`StageCache`] - Thread-safe cache of loaded stages

mod metadata;
mod relationship;
mod traits;
mod cache;

pub use metadata::MetaData;
pub use relationship::Relationship;
pub use traits::SceneReader;
pub use cache::{StageCache, StageCacheId};
