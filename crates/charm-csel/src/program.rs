//! Functions and whole programs.

use charm_cmin::Sig;

use crate::stmt::Stmt;

pub use charm_csm::GlobalVar;

// The frame computed by the previous pass is carried through unchanged.
pub use charm_cmin::StackSlot;

/// Function definition.
#[derive(Clone, PartialEq, Debug)]
pub struct Function {
    pub name: String,
    pub sig: Sig,
    pub params: Vec<String>,
    pub vars: Vec<String>,
    pub stack_layout: Vec<StackSlot>,
    pub stack_size: i64,
    pub body: Stmt,
}

/// A whole translation unit.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Program {
    pub globals: Vec<GlobalVar>,
    pub functions: Vec<Function>,
}
