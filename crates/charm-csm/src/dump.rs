//! Textual dump of CSM programs, for logs and test diagnostics.

use crate::expr::{Const, Expr};
use crate::program::{Function, Program};
use crate::stmt::Stmt;

/// Render a whole program.
#[must_use]
pub fn dump_program(p: &Program) -> String {
    let mut d = Dumper::new();
    for g in &p.globals {
        let kind = if g.readonly { "rodata" } else { "data" };
        d.line(&format!("{} {}[{}]", kind, g.name, g.size));
    }
    for f in &p.functions {
        d.function(f);
    }
    d.out
}

/// Render one function.
#[must_use]
pub fn dump_function(f: &Function) -> String {
    let mut d = Dumper::new();
    d.function(f);
    d.out
}

struct Dumper {
    out: String,
    indent: usize,
}

impl Dumper {
    const fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn function(&mut self, f: &Function) {
        self.line(&format!("fn {}({}) {{", f.name, f.params.join(", ")));
        self.indent += 1;
        for local in &f.locals {
            self.line(&format!(
                "local {}[{}:{}]",
                local.name, local.size, local.chunk
            ));
        }
        for t in &f.temps {
            self.line(&format!("temp ${t}"));
        }
        self.stmt(&f.body);
        self.indent -= 1;
        self.line("}");
    }

    fn stmt(&mut self, s: &Stmt) {
        match s {
            Stmt::Skip => self.line("skip"),
            Stmt::Set { temp, value } => self.line(&format!("${temp} = {}", expr(value))),
            Stmt::Assign { name, value } => self.line(&format!("{name} = {}", expr(value))),
            Stmt::Store { chunk, addr, value } => {
                self.line(&format!("{chunk}[{}] = {}", expr(addr), expr(value)));
            }
            Stmt::Call {
                dest, func, args, ..
            } => {
                let prefix = dest.map_or(String::new(), |t| format!("${t} = "));
                self.line(&format!("{prefix}call {}({})", expr(func), exprs(args)));
            }
            Stmt::TailCall { func, args, .. } => {
                self.line(&format!("tailcall {}({})", expr(func), exprs(args)));
            }
            Stmt::Builtin { dest, name, args } => {
                let prefix = dest.map_or(String::new(), |t| format!("${t} = "));
                self.line(&format!("{prefix}builtin \"{name}\"({})", exprs(args)));
            }
            Stmt::Seq(a, b) => {
                self.stmt(a);
                self.stmt(b);
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.line(&format!("if {} {{", expr(cond)));
                self.indent += 1;
                self.stmt(then_branch);
                self.indent -= 1;
                if matches!(**else_branch, Stmt::Skip) {
                    self.line("}");
                } else {
                    self.line("} else {");
                    self.indent += 1;
                    self.stmt(else_branch);
                    self.indent -= 1;
                    self.line("}");
                }
            }
            Stmt::Loop(body) => {
                self.line("loop {");
                self.indent += 1;
                self.stmt(body);
                self.indent -= 1;
                self.line("}");
            }
            Stmt::Block(body) => {
                self.line("block {");
                self.indent += 1;
                self.stmt(body);
                self.indent -= 1;
                self.line("}");
            }
            Stmt::Exit(depth) => self.line(&format!("exit {depth}")),
            Stmt::Switch {
                long,
                scrutinee,
                cases,
                default,
            } => {
                let suffix = if *long { "l" } else { "" };
                self.line(&format!("switch{suffix} {} {{", expr(scrutinee)));
                self.indent += 1;
                for (value, body) in cases {
                    self.line(&format!("case {value}:"));
                    self.indent += 1;
                    self.stmt(body);
                    self.indent -= 1;
                }
                if let Some(d) = default {
                    self.line("default:");
                    self.indent += 1;
                    self.stmt(d);
                    self.indent -= 1;
                }
                self.indent -= 1;
                self.line("}");
            }
            Stmt::Return(None) => self.line("return"),
            Stmt::Return(Some(e)) => self.line(&format!("return {}", expr(e))),
            Stmt::Label(name, body) => {
                self.line(&format!("{name}:"));
                self.stmt(body);
            }
            Stmt::Goto(name) => self.line(&format!("goto {name}")),
        }
    }
}

fn exprs(es: &[Expr]) -> String {
    es.iter().map(expr).collect::<Vec<_>>().join(", ")
}

fn expr(e: &Expr) -> String {
    match e {
        Expr::Const(c) => constant(c),
        Expr::Var(name) => name.clone(),
        Expr::Tempvar(id) => format!("${id}"),
        Expr::Addrof(name) => format!("&{name}"),
        Expr::Load { chunk, addr } => format!("{chunk}[{}]", expr(addr)),
        Expr::Unop { op, arg } => format!("{}({})", op.name(), expr(arg)),
        Expr::Binop { op, left, right } => {
            format!("{}({}, {})", op.name(), expr(left), expr(right))
        }
        Expr::Cmp {
            kind,
            cmp,
            left,
            right,
        } => format!(
            "{}({}, {}, {})",
            kind.name(),
            cmp.name(),
            expr(left),
            expr(right)
        ),
    }
}

fn constant(c: &Const) -> String {
    match c {
        Const::Int(v) => v.to_string(),
        Const::Long(v) => format!("{v}L"),
        Const::Float(v) => format!("{v:?}"),
        Const::Single(v) => format!("{v:?}f"),
        Const::Symbol { name, offset } => {
            if *offset == 0 {
                format!("&{name}")
            } else {
                format!("&{name}+{offset}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{BinOp, CmpKind, Comparison};
    use crate::stmt::Sig;
    use charm_ctypes::{Chunk, Type};

    #[test]
    fn test_dump_expressions() {
        let e = Expr::binop(
            BinOp::AddL,
            Expr::tempvar(1),
            Expr::load(Chunk::I32, Expr::addrof("x")),
        );
        assert_eq!(expr(&e), "addl($1, int32[&x])");

        let c = Expr::cmp(CmpKind::IntU, Comparison::Lt, Expr::var("a"), Expr::int(0));
        assert_eq!(expr(&c), "cmpu(lt, a, 0)");
    }

    #[test]
    fn test_dump_function() {
        let f = Function {
            name: "f".to_string(),
            sig: Sig::new(Vec::new(), Type::Void),
            params: vec!["x".to_string()],
            locals: vec![crate::program::Local::new("c", 1, Chunk::I8S)],
            temps: vec![1],
            body: Stmt::seq(
                Stmt::set(1, Expr::var("x")),
                Stmt::Return(Some(Expr::Tempvar(1))),
            ),
        };
        let text = dump_function(&f);
        let expected = "fn f(x) {\n  local c[1:int8s]\n  temp $1\n  $1 = x\n  return $1\n}\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_dump_control_flow() {
        let s = Stmt::block(Stmt::loop_(Stmt::seq(
            Stmt::if_then_else(Expr::var("done"), Stmt::Exit(2), Stmt::Skip),
            Stmt::Exit(1),
        )));
        let mut d = Dumper::new();
        d.stmt(&s);
        let expected = "block {\n  loop {\n    if done {\n      exit 2\n    }\n    exit 1\n  }\n}\n";
        assert_eq!(d.out, expected);
    }
}
