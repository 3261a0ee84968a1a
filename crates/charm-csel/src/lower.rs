//! CMIN → CSEL lowering ("selection").
//!
//! Picks ARM64 addressing modes for memory accesses, fuses shift-with-add
//! patterns into the combined forms the target encodes in one instruction,
//! lifts boolean expressions into first-class conditions, and if-converts
//! simple two-armed assignments into conditional expressions. Unrecognised
//! shapes keep their generic form; selection never fails.

use charm_cmin as cmin;
use charm_cmin::{BinOp, CmpKind, Comparison, Const, UnOp};
use charm_ctypes::Chunk;
use tracing::debug;

use crate::addr::AddrMode;
use crate::cond::Condition;
use crate::expr::{Expr, ShiftKind};
use crate::program::{Function, Program};
use crate::stmt::Stmt;

/// Lower a whole CMIN program.
#[must_use]
pub fn lower_program(p: &cmin::Program) -> Program {
    let selector = Selector;
    Program {
        globals: p.globals.clone(),
        functions: p
            .functions
            .iter()
            .map(|f| selector.function(f))
            .collect(),
    }
}

/// Selection context.
struct Selector;

impl Selector {
    fn function(&self, f: &cmin::Function) -> Function {
        debug!(function = %f.name, "selecting instructions");
        Function {
            name: f.name.clone(),
            sig: f.sig.clone(),
            params: f.params.clone(),
            vars: f.vars.clone(),
            stack_layout: f.stack_layout.clone(),
            stack_size: f.stack_size,
            body: self.stmt(&f.body),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn expr(&self, e: &cmin::Expr) -> Expr {
        match e {
            cmin::Expr::Const(c) => Expr::Const(c.clone()),
            cmin::Expr::Var(name) => Expr::Var(name.clone()),
            cmin::Expr::Load { chunk, addr } => {
                let (mode, args) = self.select_addr(*chunk, addr);
                Expr::load(*chunk, mode, args)
            }
            cmin::Expr::Unop {
                op: UnOp::NotBool,
                arg,
            } => Expr::condition(
                Condition::not(self.select_condition(arg)),
                Expr::int(1),
                Expr::int(0),
            ),
            cmin::Expr::Unop { op, arg } => Expr::unop(*op, self.expr(arg)),
            cmin::Expr::Binop { op, left, right } => self
                .try_combined(*op, left, right)
                .unwrap_or_else(|| Expr::binop(*op, self.expr(left), self.expr(right))),
            cmin::Expr::Cmp {
                kind,
                cmp,
                left,
                right,
            } => Expr::condition(
                Condition::cmp(*kind, *cmp, self.expr(left), self.expr(right)),
                Expr::int(1),
                Expr::int(0),
            ),
        }
    }

    // ========================================================================
    // Combined operators
    // ========================================================================

    /// Recognise `a ± (b << s)` and `a + b·2^s`.
    fn try_combined(&self, op: BinOp, left: &cmin::Expr, right: &cmin::Expr) -> Option<Expr> {
        let is_add = match op {
            BinOp::Add | BinOp::AddL => true,
            BinOp::Sub | BinOp::SubL => false,
            _ => return None,
        };
        if let Some((kind, amount, index)) = shift_pattern(right) {
            let fused = if is_add {
                Expr::add_shift(kind, amount, self.expr(left), self.expr(index))
            } else {
                Expr::sub_shift(kind, amount, self.expr(left), self.expr(index))
            };
            return Some(fused);
        }
        // Addition commutes: the shift may sit on the left.
        if is_add {
            if let Some((kind, amount, index)) = shift_pattern(left) {
                return Some(Expr::add_shift(
                    kind,
                    amount,
                    self.expr(right),
                    self.expr(index),
                ));
            }
        }
        None
    }

    // ========================================================================
    // Addressing modes
    // ========================================================================

    /// Greedy decomposition of an address expression.
    fn select_addr(&self, chunk: Chunk, addr: &cmin::Expr) -> (AddrMode, Vec<Expr>) {
        match addr {
            cmin::Expr::Const(Const::Symbol { name, offset }) => {
                (AddrMode::global(name, *offset), Vec::new())
            }
            cmin::Expr::Const(Const::AddrStack(offset)) => {
                (AddrMode::Instack(*offset), Vec::new())
            }
            cmin::Expr::Binop {
                op: BinOp::Add | BinOp::AddL,
                left,
                right,
            } => self.select_add_addr(chunk, left, right),
            _ => (AddrMode::Indexed(0), vec![self.expr(addr)]),
        }
    }

    fn select_add_addr(
        &self,
        chunk: Chunk,
        left: &cmin::Expr,
        right: &cmin::Expr,
    ) -> (AddrMode, Vec<Expr>) {
        // base + encodable constant offset
        if let Some(k) = const_offset(right) {
            if offset_encodable(k, chunk) {
                return (AddrMode::Indexed(k), vec![self.expr(left)]);
            }
        }
        if let Some(k) = const_offset(left) {
            if offset_encodable(k, chunk) {
                return (AddrMode::Indexed(k), vec![self.expr(right)]);
            }
        }
        // base + symbol address
        if let cmin::Expr::Const(Const::Symbol { name, offset }) = right {
            return (AddrMode::based(name, *offset), vec![self.expr(left)]);
        }
        if let cmin::Expr::Const(Const::Symbol { name, offset }) = left {
            return (AddrMode::based(name, *offset), vec![self.expr(right)]);
        }
        // base + (index << s), where s matches the access size
        if let Some((index, shift)) = scaled_index(right, chunk) {
            return (
                AddrMode::Indexed2Shift(shift),
                vec![self.expr(left), self.expr(index)],
            );
        }
        if let Some((index, shift)) = scaled_index(left, chunk) {
            return (
                AddrMode::Indexed2Shift(shift),
                vec![self.expr(right), self.expr(index)],
            );
        }
        // base + index
        (AddrMode::Indexed2, vec![self.expr(left), self.expr(right)])
    }

    // ========================================================================
    // Conditions
    // ========================================================================

    /// Lift a boolean-valued expression into condition form.
    fn select_condition(&self, e: &cmin::Expr) -> Condition {
        match e {
            cmin::Expr::Cmp {
                kind,
                cmp,
                left,
                right,
            } => Condition::cmp(*kind, *cmp, self.expr(left), self.expr(right)),
            cmin::Expr::Const(Const::Int(0) | Const::Long(0)) => Condition::False,
            cmin::Expr::Const(Const::Int(_) | Const::Long(_)) => Condition::True,
            cmin::Expr::Unop {
                op: UnOp::NotBool,
                arg,
            } => Condition::not(self.select_condition(arg)),
            _ => {
                if is_long_valued(e) {
                    Condition::cmp(CmpKind::LongU, Comparison::Ne, self.expr(e), Expr::long(0))
                } else {
                    Condition::cmp(CmpKind::IntU, Comparison::Ne, self.expr(e), Expr::int(0))
                }
            }
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn stmt(&self, s: &cmin::Stmt) -> Stmt {
        match s {
            cmin::Stmt::Skip => Stmt::Skip,
            cmin::Stmt::Assign { name, value } => Stmt::Assign {
                name: name.clone(),
                value: self.expr(value),
            },
            cmin::Stmt::Store { chunk, addr, value } => {
                let (mode, args) = self.select_addr(*chunk, addr);
                Stmt::Store {
                    chunk: *chunk,
                    mode,
                    args,
                    value: self.expr(value),
                }
            }
            cmin::Stmt::Call {
                dest,
                sig,
                func,
                args,
            } => Stmt::Call {
                dest: dest.clone(),
                sig: sig.clone(),
                func: self.expr(func),
                args: args.iter().map(|a| self.expr(a)).collect(),
            },
            cmin::Stmt::TailCall { sig, func, args } => Stmt::TailCall {
                sig: sig.clone(),
                func: self.expr(func),
                args: args.iter().map(|a| self.expr(a)).collect(),
            },
            cmin::Stmt::Builtin { dest, name, args } => Stmt::Builtin {
                dest: dest.clone(),
                name: name.clone(),
                args: args.iter().map(|a| self.expr(a)).collect(),
            },
            cmin::Stmt::Seq(a, b) => Stmt::seq(self.stmt(a), self.stmt(b)),
            cmin::Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.select_condition(cond);
                if let Some(converted) = self.try_if_convert(&cond, then_branch, else_branch) {
                    return converted;
                }
                Stmt::if_then_else(cond, self.stmt(then_branch), self.stmt(else_branch))
            }
            cmin::Stmt::Loop(body) => Stmt::Loop(Box::new(self.stmt(body))),
            cmin::Stmt::Block(body) => Stmt::Block(Box::new(self.stmt(body))),
            cmin::Stmt::Exit(depth) => Stmt::Exit(*depth),
            cmin::Stmt::Switch {
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
            cmin::Stmt::Return(e) => Stmt::Return(e.as_ref().map(|e| self.expr(e))),
            cmin::Stmt::Label(name, body) => Stmt::Label(name.clone(), Box::new(self.stmt(body))),
            cmin::Stmt::Goto(name) => Stmt::Goto(name.clone()),
        }
    }

    /// Replace `if (c) x = a; else x = b;` by a conditional expression when
    /// both arms assign the same variable and both values are simple.
    fn try_if_convert(
        &self,
        cond: &Condition,
        then_branch: &cmin::Stmt,
        else_branch: &cmin::Stmt,
    ) -> Option<Stmt> {
        let cmin::Stmt::Assign {
            name: then_name,
            value: then_value,
        } = then_branch
        else {
            return None;
        };
        let cmin::Stmt::Assign {
            name: else_name,
            value: else_value,
        } = else_branch
        else {
            return None;
        };
        if then_name != else_name || !is_simple(then_value) || !is_simple(else_value) {
            return None;
        }
        Some(Stmt::assign(
            then_name,
            Expr::condition(cond.clone(), self.expr(then_value), self.expr(else_value)),
        ))
    }
}

// ============================================================================
// Pattern helpers
// ============================================================================

const fn shift_of_op(op: BinOp) -> Option<ShiftKind> {
    match op {
        BinOp::Shl | BinOp::ShlL => Some(ShiftKind::Lsl),
        BinOp::Shr | BinOp::ShrL => Some(ShiftKind::Asr),
        BinOp::ShrU | BinOp::ShrLU => Some(ShiftKind::Lsr),
        _ => None,
    }
}

fn const_offset(e: &cmin::Expr) -> Option<i64> {
    match e {
        cmin::Expr::Const(Const::Int(v)) => Some(*v as i64),
        cmin::Expr::Const(Const::Long(v)) => Some(*v),
        _ => None,
    }
}

fn const_shift_amount(e: &cmin::Expr) -> Option<u8> {
    match const_offset(e) {
        Some(v) if (0..=63).contains(&v) => Some(v as u8),
        _ => None,
    }
}

fn log2_exact(v: i64) -> Option<u8> {
    if v > 0 && v.count_ones() == 1 {
        Some(v.trailing_zeros() as u8)
    } else {
        None
    }
}

/// Match `(index << s)` or `index · 2^s`, returning the index operand and
/// the shift amount.
fn shift_pattern(e: &cmin::Expr) -> Option<(ShiftKind, u8, &cmin::Expr)> {
    let cmin::Expr::Binop { op, left, right } = e else {
        return None;
    };
    if let Some(kind) = shift_of_op(*op) {
        let amount = const_shift_amount(right)?;
        return Some((kind, amount, left.as_ref()));
    }
    if matches!(op, BinOp::Mul | BinOp::MulL) {
        if let Some(s) = const_offset(right).and_then(log2_exact) {
            return Some((ShiftKind::Lsl, s, left.as_ref()));
        }
        if let Some(s) = const_offset(left).and_then(log2_exact) {
            return Some((ShiftKind::Lsl, s, right.as_ref()));
        }
    }
    None
}

/// Match an index scaled to exactly the access size: `idx << log2(size)`,
/// the only shifted-register form the load/store encodings support.
fn scaled_index(e: &cmin::Expr, chunk: Chunk) -> Option<(&cmin::Expr, u8)> {
    let want = log2_exact(chunk.size())?;
    let (kind, amount, index) = shift_pattern(e)?;
    if kind == ShiftKind::Lsl && amount == want {
        Some((index, amount))
    } else {
        None
    }
}

/// A constant offset fits when the scaled unsigned 12-bit form or the
/// unscaled signed 9-bit form can encode it.
fn offset_encodable(offset: i64, chunk: Chunk) -> bool {
    let size = chunk.size();
    let scaled = offset >= 0 && offset % size == 0 && offset / size < 4096;
    let unscaled = (-256..=255).contains(&offset);
    scaled || unscaled
}

/// Expressions whose natural width is 64 bits.
fn is_long_valued(e: &cmin::Expr) -> bool {
    match e {
        cmin::Expr::Const(
            Const::Long(_) | Const::Symbol { .. } | Const::AddrStack(_),
        ) => true,
        cmin::Expr::Load { chunk, .. } => chunk.size() == 8,
        cmin::Expr::Unop { op, .. } => matches!(
            op,
            UnOp::NegLong
                | UnOp::NotLong
                | UnOp::LongOfInt
                | UnOp::LongOfIntU
                | UnOp::LongOfFloat
                | UnOp::LongUOfFloat
        ),
        cmin::Expr::Binop { op, .. } => matches!(
            op,
            BinOp::AddL
                | BinOp::SubL
                | BinOp::MulL
                | BinOp::DivL
                | BinOp::DivLU
                | BinOp::ModL
                | BinOp::ModLU
                | BinOp::AndL
                | BinOp::OrL
                | BinOp::XorL
                | BinOp::ShlL
                | BinOp::ShrL
                | BinOp::ShrLU
        ),
        _ => false,
    }
}

/// If-conversion candidate values: literals, variable reads, and pure
/// operators, recursively; division, modulo, and memory loads disqualify.
fn is_simple(e: &cmin::Expr) -> bool {
    match e {
        cmin::Expr::Const(_) | cmin::Expr::Var(_) => true,
        cmin::Expr::Load { .. } => false,
        cmin::Expr::Unop { arg, .. } => is_simple(arg),
        cmin::Expr::Binop { op, left, right } => {
            !matches!(
                op,
                BinOp::Div
                    | BinOp::DivU
                    | BinOp::DivL
                    | BinOp::DivLU
                    | BinOp::DivF
                    | BinOp::DivS
                    | BinOp::Mod
                    | BinOp::ModU
                    | BinOp::ModL
                    | BinOp::ModLU
            ) && is_simple(left)
                && is_simple(right)
        }
        cmin::Expr::Cmp { left, right, .. } => is_simple(left) && is_simple(right),
    }
}

#[cfg(test)]
mod tests;
