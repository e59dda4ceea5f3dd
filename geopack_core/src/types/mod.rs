mod color;
mod geometry_type;
mod layer_entry;
mod popup;
mod style;

pub use color::*;
pub use geometry_type::*;
pub use layer_entry::*;
pub use popup::*;
pub use style::*;
