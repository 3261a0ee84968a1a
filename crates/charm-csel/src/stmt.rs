//! Statements.

use charm_cmin::Sig;
use charm_ctypes::Chunk;

use crate::addr::AddrMode;
use crate::cond::Condition;
use crate::expr::Expr;

/// Statement kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum Stmt {
    Skip,
    Assign { name: String, value: Expr },
    /// Store through an addressing mode.
    Store {
        chunk: Chunk,
        mode: AddrMode,
        args: Vec<Expr>,
        value: Expr,
    },
    Call {
        dest: Option<String>,
        sig: Sig,
        func: Expr,
        args: Vec<Expr>,
    },
    /// Call in tail position.
    TailCall {
        sig: Sig,
        func: Expr,
        args: Vec<Expr>,
    },
    Builtin {
        dest: Option<String>,
        name: String,
        args: Vec<Expr>,
    },
    Seq(Box<Stmt>, Box<Stmt>),
    If {
        cond: Condition,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
    },
    Loop(Box<Stmt>),
    Block(Box<Stmt>),
    Exit(usize),
    Switch {
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
    pub fn assign(name: &str, value: Expr) -> Self {
        Self::Assign {
            name: name.to_string(),
            value,
        }
    }

    #[must_use]
    pub fn if_then_else(cond: Condition, then_branch: Self, else_branch: Self) -> Self {
        Self::If {
            cond,
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }
}
