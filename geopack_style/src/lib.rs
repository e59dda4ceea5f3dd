//! Interpretation of ArcGIS CIM layer documents (`.lyrx`) into the renderer-agnostic
//! [`StyleConfig`](geopack_core::StyleConfig) model.
//!
//! - [`cim`]: the serde model of the relevant parts of a document,
//! - [`StyleInterpreter`]: symbol flattening and derivation of simple style, symbol layer stack,
//!   labels, scale range and complexity,
//! - [`StyleIndex`]: fuzzy lookup of the style document belonging to a layer.

pub mod cim;
mod index;
mod interpret;

pub use cim::CimDocument;
pub use index::StyleIndex;
pub use interpret::*;
