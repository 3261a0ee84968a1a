//! CSM → CMIN lowering ("cminorgen").
//!
//! Chooses storage for every local: locals whose address is never taken
//! stay in registers, the rest get byte offsets in the function's stack
//! frame. Accesses are rewritten accordingly, numeric temporaries become
//! symbolic names, and signatures reduce to type descriptors.

use charm_csm as csm;
use charm_ctypes::{Chunk, Type, align_up};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::expr::{Const, Expr};
use crate::program::{Function, Program, StackSlot};
use crate::stmt::{Sig, Stmt};

/// Lower a whole CSM program.
#[must_use]
pub fn lower_program(p: &csm::Program) -> Program {
    Program {
        globals: p.globals.clone(),
        functions: p.functions.iter().map(lower_function).collect(),
    }
}

/// Symbolic name of a numeric temporary.
#[must_use]
pub fn temp_name(id: u32) -> String {
    format!("_t{id}")
}

/// Slot alignment from slot size: 1, 2, 4, or 8 bytes.
const fn slot_align(size: i64) -> i64 {
    if size >= 8 {
        8
    } else if size >= 4 {
        4
    } else if size >= 2 {
        2
    } else {
        1
    }
}

fn lower_function(f: &csm::Function) -> Function {
    let mut taken = FxHashSet::default();
    collect_addr_taken(&f.body, &mut taken);

    let mut stack = FxHashMap::default();
    let mut layout = Vec::new();
    let mut offset = 0;
    let mut vars = Vec::new();
    for local in &f.locals {
        if taken.contains(&local.name) {
            let slot = align_up(offset, slot_align(local.size));
            layout.push(StackSlot::new(&local.name, slot, local.size));
            stack.insert(local.name.clone(), (slot, local.chunk));
            offset = slot + local.size;
        } else {
            vars.push(local.name.clone());
        }
    }
    let stack_size = align_up(offset, 8);
    vars.extend(f.temps.iter().map(|&id| temp_name(id)));

    let rewriter = Rewriter { stack: &stack };
    let body = rewriter.stmt(&f.body);

    debug!(
        function = %f.name,
        stack_slots = layout.len(),
        stack_size,
        "laid out stack frame"
    );

    Function {
        name: f.name.clone(),
        sig: lower_sig(&f.sig),
        params: f.params.clone(),
        vars,
        stack_layout: layout,
        stack_size,
        body,
    }
}

/// Reduce a typed signature to descriptor strings.
fn lower_sig(sig: &csm::Sig) -> Sig {
    Sig::new(
        sig.params.iter().map(descriptor).collect(),
        descriptor(&sig.ret),
    )
}

fn descriptor(ty: &Type) -> String {
    let name = match ty {
        Type::Void => "void",
        Type::Int { .. } => "int",
        Type::Float { size } => match size {
            charm_ctypes::FloatSize::F32 => "float",
            charm_ctypes::FloatSize::F64 => "double",
        },
        // Everything pointer-sized reduces to long.
        Type::Long { .. }
        | Type::Pointer { .. }
        | Type::Array { .. }
        | Type::Function { .. }
        | Type::Struct { .. }
        | Type::Union { .. } => "long",
    };
    name.to_string()
}

// ============================================================================
// Address-taken analysis
// ============================================================================

/// Collect every name whose address is taken anywhere in `s`.
pub fn collect_addr_taken(s: &csm::Stmt, taken: &mut FxHashSet<String>) {
    match s {
        csm::Stmt::Set { value, .. } | csm::Stmt::Assign { value, .. } => {
            expr_addr_taken(value, taken);
        }
        csm::Stmt::Store { addr, value, .. } => {
            expr_addr_taken(addr, taken);
            expr_addr_taken(value, taken);
        }
        csm::Stmt::Call { func, args, .. } | csm::Stmt::TailCall { func, args, .. } => {
            expr_addr_taken(func, taken);
            for a in args {
                expr_addr_taken(a, taken);
            }
        }
        csm::Stmt::Builtin { args, .. } => {
            for a in args {
                expr_addr_taken(a, taken);
            }
        }
        csm::Stmt::Seq(a, b) => {
            collect_addr_taken(a, taken);
            collect_addr_taken(b, taken);
        }
        csm::Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            expr_addr_taken(cond, taken);
            collect_addr_taken(then_branch, taken);
            collect_addr_taken(else_branch, taken);
        }
        csm::Stmt::Loop(body) | csm::Stmt::Block(body) | csm::Stmt::Label(_, body) => {
            collect_addr_taken(body, taken);
        }
        csm::Stmt::Switch {
            scrutinee,
            cases,
            default,
            ..
        } => {
            expr_addr_taken(scrutinee, taken);
            for (_, case) in cases {
                collect_addr_taken(case, taken);
            }
            if let Some(d) = default {
                collect_addr_taken(d, taken);
            }
        }
        csm::Stmt::Return(e) => {
            if let Some(e) = e {
                expr_addr_taken(e, taken);
            }
        }
        csm::Stmt::Skip | csm::Stmt::Exit(_) | csm::Stmt::Goto(_) => {}
    }
}

fn expr_addr_taken(e: &csm::Expr, taken: &mut FxHashSet<String>) {
    match e {
        csm::Expr::Addrof(name) => {
            taken.insert(name.clone());
        }
        csm::Expr::Load { addr, .. } => expr_addr_taken(addr, taken),
        csm::Expr::Unop { arg, .. } => expr_addr_taken(arg, taken),
        csm::Expr::Binop { left, right, .. } | csm::Expr::Cmp { left, right, .. } => {
            expr_addr_taken(left, taken);
            expr_addr_taken(right, taken);
        }
        csm::Expr::Const(_) | csm::Expr::Var(_) | csm::Expr::Tempvar(_) => {}
    }
}

// ============================================================================
// Access rewrites
// ============================================================================

struct Rewriter<'a> {
    /// Stack locals: name → (offset, access chunk).
    stack: &'a FxHashMap<String, (i64, Chunk)>,
}

impl Rewriter<'_> {
    fn expr(&self, e: &csm::Expr) -> Expr {
        match e {
            csm::Expr::Const(c) => Expr::Const(lower_const(c)),
            csm::Expr::Var(name) => match self.stack.get(name) {
                Some(&(offset, chunk)) => Expr::load(chunk, Expr::addr_stack(offset)),
                None => Expr::Var(name.clone()),
            },
            csm::Expr::Tempvar(id) => Expr::Var(temp_name(*id)),
            csm::Expr::Addrof(name) => match self.stack.get(name) {
                Some(&(offset, _)) => Expr::addr_stack(offset),
                None => Expr::Const(Const::symbol(name, 0)),
            },
            csm::Expr::Load { chunk, addr } => Expr::load(*chunk, self.expr(addr)),
            csm::Expr::Unop { op, arg } => Expr::unop(*op, self.expr(arg)),
            csm::Expr::Binop { op, left, right } => {
                Expr::binop(*op, self.expr(left), self.expr(right))
            }
            csm::Expr::Cmp {
                kind,
                cmp,
                left,
                right,
            } => Expr::cmp(*kind, *cmp, self.expr(left), self.expr(right)),
        }
    }

    fn stmt(&self, s: &csm::Stmt) -> Stmt {
        match s {
            csm::Stmt::Skip => Stmt::Skip,
            csm::Stmt::Set { temp, value } => Stmt::Assign {
                name: temp_name(*temp),
                value: self.expr(value),
            },
            csm::Stmt::Assign { name, value } => match self.stack.get(name) {
                Some(&(offset, chunk)) => {
                    Stmt::store(chunk, Expr::addr_stack(offset), self.expr(value))
                }
                None => Stmt::Assign {
                    name: name.clone(),
                    value: self.expr(value),
                },
            },
            csm::Stmt::Store { chunk, addr, value } => {
                Stmt::store(*chunk, self.expr(addr), self.expr(value))
            }
            csm::Stmt::Call {
                dest,
                sig,
                func,
                args,
            } => Stmt::Call {
                dest: dest.map(temp_name),
                sig: lower_sig(sig),
                func: self.expr(func),
                args: args.iter().map(|a| self.expr(a)).collect(),
            },
            csm::Stmt::TailCall { sig, func, args } => Stmt::TailCall {
                sig: lower_sig(sig),
                func: self.expr(func),
                args: args.iter().map(|a| self.expr(a)).collect(),
            },
            csm::Stmt::Builtin { dest, name, args } => Stmt::Builtin {
                dest: dest.map(temp_name),
                name: name.clone(),
                args: args.iter().map(|a| self.expr(a)).collect(),
            },
            csm::Stmt::Seq(a, b) => Stmt::seq(self.stmt(a), self.stmt(b)),
            csm::Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => Stmt::if_then_else(
                self.expr(cond),
                self.stmt(then_branch),
                self.stmt(else_branch),
            ),
            csm::Stmt::Loop(body) => Stmt::Loop(Box::new(self.stmt(body))),
            csm::Stmt::Block(body) => Stmt::Block(Box::new(self.stmt(body))),
            csm::Stmt::Exit(depth) => Stmt::Exit(*depth),
            csm::Stmt::Switch {
                long,
                scrutinee,
                cases,
                default,
            } => Stmt::Switch {
                long: *long,
                scrutinee: self.expr(scrutinee),
                cases: cases.iter().map(|(v, s)| (*v, self.stmt(s))).collect(),
                default: default.as_ref().map(|d| Box::new(self.stmt(d))),
            },
            csm::Stmt::Return(e) => Stmt::Return(e.as_ref().map(|e| self.expr(e))),
            csm::Stmt::Label(name, body) => Stmt::Label(name.clone(), Box::new(self.stmt(body))),
            csm::Stmt::Goto(name) => Stmt::Goto(name.clone()),
        }
    }
}

fn lower_const(c: &csm::Const) -> Const {
    match c {
        csm::Const::Int(v) => Const::Int(*v),
        csm::Const::Float(v) => Const::Float(*v),
        csm::Const::Single(v) => Const::Single(*v),
        csm::Const::Long(v) => Const::Long(*v),
        csm::Const::Symbol { name, offset } => Const::Symbol {
            name: name.clone(),
            offset: *offset,
        },
    }
}

#[cfg(test)]
mod tests;
