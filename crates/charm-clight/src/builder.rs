//! Function builder fluent API.

use charm_ctypes::Type;

use crate::expr::Expr;
use crate::program::Function;
use crate::stmt::Stmt;

/// Builder for CLIGHT functions.
///
/// Declarations chain; statements append in order; `build` produces the
/// function with the statements sequenced right-nested.
pub struct FunctionBuilder {
    name: String,
    ret: Type,
    params: Vec<(String, Type)>,
    locals: Vec<(String, Type)>,
    temps: Vec<(u32, Type)>,
    next_temp: u32,
    stmts: Vec<Stmt>,
}

impl FunctionBuilder {
    #[must_use]
    pub fn new(name: &str, ret: Type) -> Self {
        Self {
            name: name.to_string(),
            ret,
            params: Vec::new(),
            locals: Vec::new(),
            temps: Vec::new(),
            next_temp: 0,
            stmts: Vec::new(),
        }
    }

    /// Declare a parameter.
    #[must_use]
    pub fn param(mut self, name: &str, ty: Type) -> Self {
        self.params.push((name.to_string(), ty));
        self
    }

    /// Declare an in-memory local.
    #[must_use]
    pub fn local(mut self, name: &str, ty: Type) -> Self {
        self.locals.push((name.to_string(), ty));
        self
    }

    /// Declare a fresh typed temporary and return its id.
    pub fn temp(&mut self, ty: Type) -> u32 {
        let id = self.next_temp;
        self.next_temp += 1;
        self.temps.push((id, ty));
        id
    }

    /// Append a statement.
    pub fn push(&mut self, s: Stmt) {
        self.stmts.push(s);
    }

    /// Append `temp := value`.
    pub fn set(&mut self, temp: u32, value: Expr) {
        self.stmts.push(Stmt::set(temp, value));
    }

    /// Append `lhs = rhs`.
    pub fn assign(&mut self, lhs: Expr, rhs: Expr) {
        self.stmts.push(Stmt::assign(lhs, rhs));
    }

    /// Append `return value`.
    pub fn ret(&mut self, value: Expr) {
        self.stmts.push(Stmt::Return(Some(value)));
    }

    #[must_use]
    pub fn build(self) -> Function {
        Function {
            name: self.name,
            ret: self.ret,
            params: self.params,
            locals: self.locals,
            temps: self.temps,
            body: Stmt::block(self.stmts),
        }
    }
}
