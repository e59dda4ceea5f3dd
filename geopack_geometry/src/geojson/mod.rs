//! Reading and writing GeoJSON.
//!
//! Only the parts needed for reprojection are typed: geometries and their positions.
//! Feature properties, ids and any foreign members are carried through as JSON values.

mod collection;
mod geometry;
mod read;

pub use collection::*;
pub use geometry::*;
pub use read::*;
