//! Shared building blocks of geopack.
//!
//! Contains the catalog types (layer entries, style configurations, symbol layers, colors),
//! the fuzzy name index used to pair layers with style documents and popup definitions,
//! the content-hash layer cache and small JSON file helpers.

pub mod cache;
pub mod json;
pub mod names;
pub mod types;

pub use cache::*;
pub use names::*;
pub use types::*;
