//! Coordinate references and projections.
//!
//! The canonical reference is WGS 84 longitude/latitude in degrees (EPSG:4326 in GeoJSON axis
//! order, i.e. CRS84). Sources may also be in Web Mercator or in one configured regional
//! transverse Mercator grid.

mod ellipsoid;
mod reference;
mod regional;
mod transverse_mercator;
mod web_mercator;

pub use ellipsoid::*;
pub use reference::*;
pub use regional::*;
pub use transverse_mercator::*;
pub use web_mercator::*;
