//! Functions and whole programs.

use crate::stmt::{Sig, Stmt};

// Globals keep their untyped CSM form unchanged.
pub use charm_csm::GlobalVar;

/// One slot of a function's stack frame.
#[derive(Clone, PartialEq, Debug)]
pub struct StackSlot {
    pub name: String,
    pub offset: i64,
    pub size: i64,
}

impl StackSlot {
    #[must_use]
    pub fn new(name: &str, offset: i64, size: i64) -> Self {
        Self {
            name: name.to_string(),
            offset,
            size,
        }
    }
}

/// Function definition.
#[derive(Clone, PartialEq, Debug)]
pub struct Function {
    pub name: String,
    pub sig: Sig,
    pub params: Vec<String>,
    /// Register-resident variables: non-address-taken locals and renamed
    /// temporaries.
    pub vars: Vec<String>,
    /// Address-taken locals, in declaration order with non-decreasing
    /// offsets.
    pub stack_layout: Vec<StackSlot>,
    /// Total frame bytes, rounded up to 8.
    pub stack_size: i64,
    pub body: Stmt,
}

/// A whole translation unit.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Program {
    pub globals: Vec<GlobalVar>,
    pub functions: Vec<Function>,
}
