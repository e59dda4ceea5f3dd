mod byte_range;
mod compression;
mod directory;
mod entries;
mod header;
mod tile_id;
mod varint;

pub use byte_range::*;
pub use compression::*;
pub use directory::*;
pub use entries::*;
pub use header::*;
pub use tile_id::*;
pub use varint::*;
