//! ARM64 instruction AST and GNU-as printer.
//!
//! The instruction model is the ground truth the earlier passes aim at:
//! one `Is64` flag per integer instruction selecting the `wN`/`xN` register
//! width, explicit condition codes, paired load/store with pre/post-index
//! writeback, and PC-relative addressing split into page and page-offset
//! halves. The printer emits text GNU as accepts on both ELF (Linux) and
//! Mach-O (Darwin) targets.

mod instr;
mod printer;
mod regs;

pub use instr::*;
pub use printer::*;
pub use regs::*;
