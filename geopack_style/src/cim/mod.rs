//! serde model of the parts of ArcGIS CIM layer documents that carry symbology.
//!
//! Everything else in a document is ignored. Unknown renderer, symbol layer, effect and color
//! types deserialize into an `Unsupported`/`Other` variant instead of failing.

mod color;
mod document;
mod symbol;

pub use color::*;
pub use document::*;
pub use symbol::*;
