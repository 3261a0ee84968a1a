//! IR with machine addressing modes, first-class conditions, and fused
//! operators ("CminorSel" level).
//!
//! The last IR before register allocation: loads and stores carry the ARM64
//! addressing mode they will use, comparisons are reified as conditions so
//! branches and conditional selects consume the same value, and the
//! add/sub-with-shifted-register forms ARM64 encodes in one instruction are
//! explicit nodes. The `lower` module performs instruction selection from
//! CMIN.

mod addr;
mod cond;
mod dump;
mod expr;
mod lower;
mod program;
mod stmt;

pub use addr::*;
pub use cond::*;
pub use dump::*;
pub use expr::*;
pub use lower::*;
pub use program::*;
pub use stmt::*;

// Operators and constants are unchanged from the CMIN level.
pub use charm_cmin::{BinOp, CmpKind, Comparison, Const, Sig, UnOp};
