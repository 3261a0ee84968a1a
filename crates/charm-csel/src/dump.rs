//! Textual dump of CSEL programs, for logs and test diagnostics.

use charm_cmin::Const;

use crate::addr::AddrMode;
use crate::cond::Condition;
use crate::expr::{Expr, ShiftKind};
use crate::program::{Function, Program};
use crate::stmt::Stmt;

impl ShiftKind {
    /// Assembly-style mnemonic.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lsl => "lsl",
            Self::Lsr => "lsr",
            Self::Asr => "asr",
        }
    }
}

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
        for slot in &f.stack_layout {
            self.line(&format!(
                "stack {}@{}[{}]",
                slot.name, slot.offset, slot.size
            ));
        }
        if f.stack_size > 0 {
            self.line(&format!("frame {}", f.stack_size));
        }
        self.stmt(&f.body);
        self.indent -= 1;
        self.line("}");
    }

    fn stmt(&mut self, s: &Stmt) {
        match s {
            Stmt::Skip => self.line("skip"),
            Stmt::Assign { name, value } => self.line(&format!("{name} = {}", expr(value))),
            Stmt::Store {
                chunk,
                mode,
                args,
                value,
            } => {
                self.line(&format!(
                    "{chunk}[{}] = {}",
                    address(mode, args),
                    expr(value)
                ));
            }
            Stmt::Call {
                dest, func, args, ..
            } => {
                let prefix = dest
                    .as_ref()
                    .map_or(String::new(), |name| format!("{name} = "));
                self.line(&format!("{prefix}call {}({})", expr(func), exprs(args)));
            }
            Stmt::TailCall { func, args, .. } => {
                self.line(&format!("tailcall {}({})", expr(func), exprs(args)));
            }
            Stmt::Builtin { dest, name, args } => {
                let prefix = dest
                    .as_ref()
                    .map_or(String::new(), |d| format!("{d} = "));
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
                self.line(&format!("if {} {{", condition(cond)));
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
        Expr::Unop { op, arg } => format!("{}({})", op.name(), expr(arg)),
        Expr::Binop { op, left, right } => {
            format!("{}({}, {})", op.name(), expr(left), expr(right))
        }
        Expr::Load { chunk, mode, args } => format!("{chunk}[{}]", address(mode, args)),
        Expr::Condition {
            cond,
            then_value,
            else_value,
        } => format!(
            "({} ? {} : {})",
            condition(cond),
            expr(then_value),
            expr(else_value)
        ),
        Expr::AddShift {
            shift,
            amount,
            left,
            right,
        } => format!(
            "addshift({} #{amount}, {}, {})",
            shift.name(),
            expr(left),
            expr(right)
        ),
        Expr::SubShift {
            shift,
            amount,
            left,
            right,
        } => format!(
            "subshift({} #{amount}, {}, {})",
            shift.name(),
            expr(left),
            expr(right)
        ),
    }
}

fn condition(c: &Condition) -> String {
    match c {
        Condition::True => "true".to_string(),
        Condition::False => "false".to_string(),
        Condition::Cmp {
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
        Condition::Not(inner) => format!("not({})", condition(inner)),
        Condition::And(a, b) => format!("and({}, {})", condition(a), condition(b)),
        Condition::Or(a, b) => format!("or({}, {})", condition(a), condition(b)),
    }
}

/// Render an addressing mode applied to its operands.
fn address(mode: &AddrMode, args: &[Expr]) -> String {
    match mode {
        AddrMode::Indexed(0) => expr(&args[0]),
        AddrMode::Indexed(offset) => format!("{} + {offset}", expr(&args[0])),
        AddrMode::Indexed2 => format!("{} + {}", expr(&args[0]), expr(&args[1])),
        AddrMode::Indexed2Shift(shift) => {
            format!("{} + ({} << {shift})", expr(&args[0]), expr(&args[1]))
        }
        AddrMode::Global { symbol, offset } => {
            if *offset == 0 {
                format!("&{symbol}")
            } else {
                format!("&{symbol}+{offset}")
            }
        }
        AddrMode::Instack(offset) => format!("stack({offset})"),
        AddrMode::Based { symbol, offset } => {
            if *offset == 0 {
                format!("{} + &{symbol}", expr(&args[0]))
            } else {
                format!("{} + &{symbol}+{offset}", expr(&args[0]))
            }
        }
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
        Const::AddrStack(offset) => format!("stack({offset})"),
    }
}
