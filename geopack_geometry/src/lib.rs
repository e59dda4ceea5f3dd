//! GeoJSON handling and reprojection into the canonical geographic reference (WGS 84 degrees).
//!
//! - [`geojson`]: a serde model of GeoJSON documents that keeps properties and foreign members.
//! - [`crs`]: coordinate reference detection and the projections needed to undo them.
//! - [`GeometryTransformer`]: reads one document, infers or reads its reference, reprojects it.

pub mod crs;
pub mod geojson;
mod transform;

pub use crs::*;
pub use geojson::*;
pub use transform::*;
