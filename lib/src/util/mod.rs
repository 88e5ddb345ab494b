mod macros;
mod path;

pub use macros::*;
pub use path::*;
