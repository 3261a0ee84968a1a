//! Statements.

use charm_ctypes::{Chunk, Type};

use crate::expr::Expr;

/// Function signature, still in terms of C types.
#[derive(Clone, PartialEq, Debug)]
pub struct Sig {
    pub params: Vec<Type>,
    pub ret: Type,
}

impl Sig {
    #[must_use]
    pub const fn new(params: Vec<Type>, ret: Type) -> Self {
        Self { params, ret }
    }
}

/// Statement kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum Stmt {
    Skip,
    /// Assignment to a temporary.
    Set { temp: u32, value: Expr },
    /// Assignment to a named scalar variable.
    Assign { name: String, value: Expr },
    /// Memory store.
    Store {
        chunk: Chunk,
        addr: Expr,
        value: Expr,
    },
    Call {
        dest: Option<u32>,
        sig: Sig,
        func: Expr,
        args: Vec<Expr>,
    },
    /// Call in tail position: the callee's return value becomes this
    /// function's return value and the frame is reused.
    TailCall {
        sig: Sig,
        func: Expr,
        args: Vec<Expr>,
    },
    Builtin {
        dest: Option<u32>,
        name: String,
        args: Vec<Expr>,
    },
    Seq(Box<Stmt>, Box<Stmt>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
    },
    /// Infinite loop; left only by `Exit` through an enclosing block.
    Loop(Box<Stmt>),
    /// Exit target: `Exit(n)` inside leaves `n` enclosing blocks.
    Block(Box<Stmt>),
    Exit(usize),
    Switch {
        /// Scrutinee is a long rather than an int.
        long: bool,
        scrutinee: Expr,
        cases: Vec<(i64, Stmt)>,
        default: Option<Box<Stmt>>,
    },
    Return(Option<Expr>),
    Label(String, Box<Stmt>),
    Goto(String),
}

impl Stmt {
    #[must_use]
    pub fn seq(first: Self, second: Self) -> Self {
        Self::Seq(Box::new(first), Box::new(second))
    }

    #[must_use]
    pub const fn set(temp: u32, value: Expr) -> Self {
        Self::Set { temp, value }
    }

    #[must_use]
    pub fn assign(name: &str, value: Expr) -> Self {
        Self::Assign {
            name: name.to_string(),
            value,
        }
    }

    #[must_use]
    pub const fn store(chunk: Chunk, addr: Expr, value: Expr) -> Self {
        Self::Store { chunk, addr, value }
    }

    #[must_use]
    pub fn if_then_else(cond: Expr, then_branch: Self, else_branch: Self) -> Self {
        Self::If {
            cond,
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    #[must_use]
    pub fn loop_(body: Self) -> Self {
        Self::Loop(Box::new(body))
    }

    #[must_use]
    pub fn block(body: Self) -> Self {
        Self::Block(Box::new(body))
    }
}
