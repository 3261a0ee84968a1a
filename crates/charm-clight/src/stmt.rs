//! Statements.

use crate::expr::Expr;

/// Statement kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum Stmt {
    Skip,
    /// Assignment through an l-value (`lhs = rhs`).
    Assign { lhs: Expr, rhs: Expr },
    /// Assignment to a temporary.
    Set { temp: u32, value: Expr },
    /// Function call, optionally binding the result to a temporary.
    Call {
        dest: Option<u32>,
        func: Expr,
        args: Vec<Expr>,
    },
    /// Compiler builtin invocation.
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
    /// Infinite loop; `cont` runs after `body` on every iteration and is
    /// the target of `continue`.
    Loop { body: Box<Stmt>, cont: Box<Stmt> },
    Break,
    Continue,
    Return(Option<Expr>),
    /// Selected-case switch: each case body is self-contained (the front
    /// end desugars C fall-through), `Break` exits the switch.
    Switch {
        scrutinee: Expr,
        cases: Vec<(i64, Stmt)>,
        default: Option<Box<Stmt>>,
    },
    Label(String, Box<Stmt>),
    Goto(String),
}

impl Stmt {
    /// Sequence two statements.
    #[must_use]
    pub fn seq(first: Self, second: Self) -> Self {
        Self::Seq(Box::new(first), Box::new(second))
    }

    /// Sequence a list of statements, right-nested.
    #[must_use]
    pub fn block(stmts: Vec<Self>) -> Self {
        stmts
            .into_iter()
            .rev()
            .reduce(|acc, s| Self::seq(s, acc))
            .unwrap_or(Self::Skip)
    }

    /// Conditional statement.
    #[must_use]
    pub fn if_then_else(cond: Expr, then_branch: Self, else_branch: Self) -> Self {
        Self::If {
            cond,
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    /// Loop with a continue statement.
    #[must_use]
    pub fn loop_(body: Self, cont: Self) -> Self {
        Self::Loop {
            body: Box::new(body),
            cont: Box::new(cont),
        }
    }

    /// Assignment through an l-value.
    #[must_use]
    pub const fn assign(lhs: Expr, rhs: Expr) -> Self {
        Self::Assign { lhs, rhs }
    }

    /// Assignment to a temporary.
    #[must_use]
    pub const fn set(temp: u32, value: Expr) -> Self {
        Self::Set { temp, value }
    }

    /// Labelled statement.
    #[must_use]
    pub fn label(name: &str, body: Self) -> Self {
        Self::Label(name.to_string(), Box::new(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_nests_right() {
        let s = Stmt::block(vec![Stmt::Skip, Stmt::Break, Stmt::Continue]);
        let Stmt::Seq(first, rest) = s else {
            panic!("expected Seq");
        };
        assert_eq!(*first, Stmt::Skip);
        assert!(matches!(*rest, Stmt::Seq(..)));
    }

    #[test]
    fn test_empty_block_is_skip() {
        assert_eq!(Stmt::block(vec![]), Stmt::Skip);
    }
}
