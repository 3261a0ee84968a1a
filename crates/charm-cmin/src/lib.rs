//! IR with named locals and explicit stack frames ("Cminor" level).
//!
//! Expressions keep the CSM shape, but temporaries carry symbolic names and
//! every address-taken local lives at a fixed byte offset in the function's
//! stack frame. The `lower` module performs the storage classification and
//! the access rewrites.

mod expr;
mod lower;
mod program;
mod stmt;

pub use expr::*;
pub use lower::*;
pub use program::*;
pub use stmt::*;

// Operators are unchanged from the CSM level.
pub use charm_csm::{BinOp, CmpKind, Comparison, UnOp};
