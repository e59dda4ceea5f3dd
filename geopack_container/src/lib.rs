//! Tiling of large or complex layers into PMTiles archives.
//!
//! The [`Tiler`] runs `tippecanoe` on an ASCII-named copy of a GeoJSON document inside a
//! scratch directory, then converts the resulting MBTiles database into a PMTiles archive,
//! either with the in-process [`convert_mbtiles_to_pmtiles`] or with the external `pmtiles`
//! tool for larger databases.

mod config;
mod convert;
pub mod mbtiles;
pub mod pmtiles;
mod tiler;
pub mod tools;

pub use config::*;
pub use convert::*;
pub use tiler::*;
