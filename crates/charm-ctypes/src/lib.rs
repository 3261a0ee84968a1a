//! C type algebra, layout arithmetic, and memory chunks.

mod chunk;
mod layout;
mod types;

pub use chunk::*;
pub use layout::*;
pub use types::*;
