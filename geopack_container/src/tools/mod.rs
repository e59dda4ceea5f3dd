//! External tool invocation and the scratch directories the tools work in.

mod command;
mod scratch;

pub use command::*;
pub use scratch::*;
