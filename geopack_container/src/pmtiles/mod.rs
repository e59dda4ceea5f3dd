//! Writing of PMTiles v3 archives.
//!
//! Only the parts needed to produce clustered archives are implemented: the header, Hilbert
//! tile ids, varint-encoded directories with leaf splitting and gzip internal compression.

pub mod types;
mod writer;

pub use types::{HeaderV3, PMTilesCompression, PMTilesType, tile_id};
pub use writer::*;
