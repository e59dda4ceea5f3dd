mod reader;

pub use reader::*;
#[cfg(test)]
pub use reader::tests::create_mbtiles;
