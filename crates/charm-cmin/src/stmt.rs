//! Statements and signatures.

use charm_ctypes::Chunk;

use crate::expr::Expr;

/// Function signature in type-descriptor form.
///
/// Descriptors are the canonical type strings ("int", "long", "float",
/// "double", "void"); anything pointer-sized reduces to "long". Width and
/// alignment already travel on the chunk of each operation, so this lossy
/// form is all the later passes need.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Sig {
    pub params: Vec<String>,
    pub ret: String,
}

impl Sig {
    #[must_use]
    pub const fn new(params: Vec<String>, ret: String) -> Self {
        Self { params, ret }
    }
}

/// Statement kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum Stmt {
    Skip,
    /// Assignment to a named register variable.
    Assign { name: String, value: Expr },
    Store {
        chunk: Chunk,
        addr: Expr,
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
        cond: Expr,
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
}
