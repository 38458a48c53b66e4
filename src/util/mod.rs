//! Utility types for matbind.
//!
//! This module contains fundamental types used throughout the library:
//! - [`ScenePath`] - Absolute prim / property paths
//! - [`Error`] / [`Result`] - Error handling

mod error;
mod path;

pub use error::*;
pub use path::*;
