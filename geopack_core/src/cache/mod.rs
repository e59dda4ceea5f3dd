//! Incremental build cache.
//!
//! Maps `"pack/filename"` to the content hash of the inputs that produced a layer, together with
//! the geometry type and style derived from them. A layer whose hash is unchanged is not
//! transformed or tiled again.

mod hash;
mod layer_cache;

pub use hash::*;
pub use layer_cache::*;
