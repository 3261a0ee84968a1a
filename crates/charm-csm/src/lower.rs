//! CLIGHT → CSM lowering ("cshmgen").
//!
//! Makes every type-dependent operation explicit: operators pick up their
//! type suffix, l-values become address expressions feeding chunked loads
//! and stores, casts are linearised into conversion chains, string literals
//! move into fresh read-only globals, and `sizeof`/`alignof` fold to
//! constants. Modified parameters are routed through shadow temporaries so
//! the ABI-level parameter itself is never stored to.

use charm_clight as clight;
use charm_ctypes::{Chunk, CompositeDefs, FloatSize, IntSize, Signedness, Type, alignof, offsetof,
                   sizeof};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::expr::{Const, Expr};
use crate::ops::{BinOp, CmpKind, Comparison, UnOp};
use crate::program::{Function, GlobalVar, Local, Program};
use crate::stmt::{Sig, Stmt};

/// Lower a whole CLIGHT program.
#[must_use]
pub fn lower_program(p: &clight::Program) -> Program {
    let mut cx = Cshmgen::new(&p.composites);
    let functions = p.functions.iter().map(|f| cx.lower_function(f)).collect();
    let mut globals: Vec<GlobalVar> = p.globals.iter().map(|g| cx.lower_global(g)).collect();
    globals.append(&mut cx.strings);
    Program { globals, functions }
}

/// Block-exit depths for `break` and `continue` at the current point.
#[derive(Clone, Copy, Default)]
struct ExitDepths {
    brk: Option<usize>,
    cont: Option<usize>,
}

/// Translator state for one program.
struct Cshmgen<'a> {
    defs: &'a CompositeDefs,
    /// Parameter names of the function being lowered.
    params: FxHashSet<String>,
    /// Shadow temporaries for parameters the body assigns to.
    shadows: FxHashMap<String, u32>,
    /// Read-only globals created for string literals, program-wide.
    strings: Vec<GlobalVar>,
    next_string: u32,
}

impl<'a> Cshmgen<'a> {
    fn new(defs: &'a CompositeDefs) -> Self {
        Self {
            defs,
            params: FxHashSet::default(),
            shadows: FxHashMap::default(),
            strings: Vec::new(),
            next_string: 0,
        }
    }

    // ========================================================================
    // Functions and globals
    // ========================================================================

    fn lower_global(&self, g: &clight::GlobalVar) -> GlobalVar {
        GlobalVar {
            name: g.name.clone(),
            size: sizeof(&g.ty, self.defs),
            align: alignof(&g.ty, self.defs),
            init: g.init.clone(),
            readonly: g.readonly,
        }
    }

    fn lower_function(&mut self, f: &clight::Function) -> Function {
        self.params = f.params.iter().map(|(n, _)| n.clone()).collect();
        self.shadows.clear();

        let mut assigned = FxHashSet::default();
        collect_assigned_params(&f.body, &self.params, &mut assigned);

        let mut next_temp = f.temps.iter().map(|(id, _)| id + 1).max().unwrap_or(0);
        let mut temps: Vec<u32> = f.temps.iter().map(|(id, _)| *id).collect();
        let mut prologue = Vec::new();
        for (name, _) in &f.params {
            if assigned.contains(name) {
                let temp = next_temp;
                next_temp += 1;
                self.shadows.insert(name.clone(), temp);
                temps.push(temp);
                prologue.push(Stmt::set(temp, Expr::var(name)));
            }
        }

        let mut body = self.stmt(&f.body, ExitDepths::default());
        for s in prologue.into_iter().rev() {
            body = Stmt::seq(s, body);
        }

        debug!(
            function = %f.name,
            shadowed_params = self.shadows.len(),
            "lowered function"
        );

        Function {
            name: f.name.clone(),
            sig: Sig::new(f.params.iter().map(|(_, t)| t.clone()).collect(), f.ret.clone()),
            params: f.params.iter().map(|(n, _)| n.clone()).collect(),
            locals: f
                .locals
                .iter()
                .map(|(n, t)| Local::new(n, sizeof(t, self.defs), Chunk::of(t)))
                .collect(),
            temps,
            body,
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn stmt(&mut self, s: &clight::Stmt, depths: ExitDepths) -> Stmt {
        match s {
            clight::Stmt::Skip => Stmt::Skip,
            clight::Stmt::Assign { lhs, rhs } => self.assign(lhs, rhs),
            clight::Stmt::Set { temp, value } => Stmt::set(*temp, self.expr(value)),
            clight::Stmt::Call { dest, func, args } => {
                let (params, ret) = function_sig(&func.ty);
                Stmt::Call {
                    dest: *dest,
                    sig: Sig::new(params, ret),
                    func: self.expr(func),
                    args: args.iter().map(|a| self.expr(a)).collect(),
                }
            }
            clight::Stmt::Builtin { dest, name, args } => Stmt::Builtin {
                dest: *dest,
                name: name.clone(),
                args: args.iter().map(|a| self.expr(a)).collect(),
            },
            clight::Stmt::Seq(a, b) => Stmt::seq(self.stmt(a, depths), self.stmt(b, depths)),
            clight::Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => Stmt::if_then_else(
                self.expr(cond),
                self.stmt(then_branch, depths),
                self.stmt(else_branch, depths),
            ),
            clight::Stmt::Loop { body, cont } => {
                // Block { Loop { Seq(Block { body }, cont) } }: continue
                // exits the inner block, break exits both.
                let body = self.stmt(
                    body,
                    ExitDepths {
                        brk: Some(2),
                        cont: Some(1),
                    },
                );
                let cont = self.stmt(
                    cont,
                    ExitDepths {
                        brk: Some(1),
                        cont: None,
                    },
                );
                Stmt::block(Stmt::loop_(Stmt::seq(Stmt::block(body), cont)))
            }
            clight::Stmt::Break => {
                Stmt::Exit(depths.brk.unwrap_or_else(|| panic!("break outside loop or switch")))
            }
            clight::Stmt::Continue => {
                Stmt::Exit(depths.cont.unwrap_or_else(|| panic!("continue outside loop")))
            }
            clight::Stmt::Return(e) => Stmt::Return(e.as_ref().map(|e| self.expr(e))),
            clight::Stmt::Switch {
                scrutinee,
                cases,
                default,
            } => {
                let inner = ExitDepths {
                    brk: Some(1),
                    cont: depths.cont.map(|d| d + 1),
                };
                let long = scrutinee.ty.is_long();
                let switch = Stmt::Switch {
                    long,
                    scrutinee: self.expr(scrutinee),
                    cases: cases
                        .iter()
                        .map(|(v, s)| (*v, self.stmt(s, inner)))
                        .collect(),
                    default: default.as_ref().map(|s| Box::new(self.stmt(s, inner))),
                };
                Stmt::block(switch)
            }
            clight::Stmt::Label(name, body) => {
                Stmt::Label(name.clone(), Box::new(self.stmt(body, depths)))
            }
            clight::Stmt::Goto(name) => Stmt::Goto(name.clone()),
        }
    }

    fn assign(&mut self, lhs: &clight::Expr, rhs: &clight::Expr) -> Stmt {
        let value = self.expr(rhs);
        match &lhs.kind {
            clight::ExprKind::Var(name) => {
                if let Some(&temp) = self.shadows.get(name) {
                    return Stmt::set(temp, value);
                }
                assert!(
                    lhs.ty.is_scalar(),
                    "aggregate assignment to `{name}` must be lowered by the front end"
                );
                Stmt::assign(name, value)
            }
            clight::ExprKind::Deref(_) | clight::ExprKind::Field { .. } => {
                let addr = self.lvalue_addr(lhs);
                Stmt::store(Chunk::of(&lhs.ty), addr, value)
            }
            other => panic!("assignment to non-l-value: {other:?}"),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn expr(&mut self, e: &clight::Expr) -> Expr {
        match &e.kind {
            clight::ExprKind::ConstInt(v) => Expr::Const(Const::Int(*v)),
            clight::ExprKind::ConstFloat(v) => Expr::Const(Const::Float(*v)),
            clight::ExprKind::ConstSingle(v) => Expr::Const(Const::Single(*v)),
            clight::ExprKind::ConstLong(v) => Expr::Const(Const::Long(*v)),
            clight::ExprKind::Str(s) => self.string_literal(s),
            clight::ExprKind::Var(name) => {
                if let Some(&temp) = self.shadows.get(name) {
                    Expr::Tempvar(temp)
                } else if decays_to_address(&e.ty) {
                    Expr::addrof(name)
                } else {
                    Expr::var(name)
                }
            }
            clight::ExprKind::Tempvar(id) => Expr::Tempvar(*id),
            clight::ExprKind::Deref(ptr) => {
                let addr = self.expr(ptr);
                if decays_to_address(&e.ty) {
                    addr
                } else {
                    Expr::load(Chunk::of(&e.ty), addr)
                }
            }
            clight::ExprKind::Addrof(lvalue) => self.lvalue_addr(lvalue),
            clight::ExprKind::Unop { op, arg } => {
                let translated = self.expr(arg);
                Expr::unop(select_unop(*op, &arg.ty), translated)
            }
            clight::ExprKind::Binop { op, left, right } => self.binop(*op, left, right, &e.ty),
            clight::ExprKind::Cast(arg) => {
                let value = self.expr(arg);
                cast_value(value, &arg.ty, &e.ty)
            }
            clight::ExprKind::Field { .. } => {
                let addr = self.lvalue_addr(e);
                if decays_to_address(&e.ty) {
                    addr
                } else {
                    Expr::load(Chunk::of(&e.ty), addr)
                }
            }
            clight::ExprKind::Sizeof(ty) => Expr::long(sizeof(ty, self.defs)),
            clight::ExprKind::Alignof(ty) => Expr::long(alignof(ty, self.defs)),
        }
    }

    /// Address of an l-value expression.
    fn lvalue_addr(&mut self, e: &clight::Expr) -> Expr {
        match &e.kind {
            clight::ExprKind::Var(name) => {
                assert!(
                    !self.params.contains(name),
                    "address of parameter `{name}` is not supported"
                );
                Expr::addrof(name)
            }
            clight::ExprKind::Deref(ptr) => self.expr(ptr),
            clight::ExprKind::Field { base, name } => self.field_addr(base, name),
            other => panic!("not an l-value: {other:?}"),
        }
    }

    /// Address of `base.field`.
    fn field_addr(&mut self, base: &clight::Expr, field: &str) -> Expr {
        let base_addr = self.lvalue_addr(base);
        match &base.ty {
            Type::Struct { name } => {
                let offset = offsetof(self.defs, name, field);
                if offset == 0 {
                    base_addr
                } else {
                    Expr::binop(BinOp::AddL, base_addr, Expr::long(offset))
                }
            }
            Type::Union { .. } => base_addr,
            other => panic!("field access `{field}` into non-composite type {other:?}"),
        }
    }

    fn string_literal(&mut self, s: &str) -> Expr {
        let label = format!(".Lstr{}", self.next_string);
        self.next_string += 1;
        let mut init = s.as_bytes().to_vec();
        init.push(0);
        self.strings.push(GlobalVar {
            name: label.clone(),
            size: init.len() as i64,
            align: 1,
            init,
            readonly: true,
        });
        Expr::Const(Const::Symbol {
            name: label,
            offset: 0,
        })
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn binop(
        &mut self,
        op: clight::BinaryOp,
        left: &clight::Expr,
        right: &clight::Expr,
        result: &Type,
    ) -> Expr {
        use clight::BinaryOp as B;

        if op.is_comparison() {
            let kind = cmp_kind(&left.ty, &right.ty);
            let cmp = comparison(op);
            return Expr::cmp(kind, cmp, self.expr(left), self.expr(right));
        }

        // Pointer arithmetic works at long and scales by the element size.
        if matches!(op, B::Add | B::Sub) && (is_pointer_like(result)
            || (op == B::Sub && is_pointer_like(&left.ty) && is_pointer_like(&right.ty)))
        {
            return self.pointer_arith(op, left, right, result);
        }

        let unsigned =
            result.is_unsigned() || left.ty.is_unsigned() || right.ty.is_unsigned();
        let csm_op = match op {
            B::Add => arith_op(result, BinOp::Add, BinOp::AddL, BinOp::AddF, BinOp::AddS),
            B::Sub => arith_op(result, BinOp::Sub, BinOp::SubL, BinOp::SubF, BinOp::SubS),
            B::Mul => arith_op(result, BinOp::Mul, BinOp::MulL, BinOp::MulF, BinOp::MulS),
            B::Div => match class_of(result) {
                ArithClass::Int => {
                    if unsigned {
                        BinOp::DivU
                    } else {
                        BinOp::Div
                    }
                }
                ArithClass::Long => {
                    if unsigned {
                        BinOp::DivLU
                    } else {
                        BinOp::DivL
                    }
                }
                ArithClass::Float => BinOp::DivF,
                ArithClass::Single => BinOp::DivS,
            },
            B::Mod => match class_of(result) {
                ArithClass::Int => {
                    if unsigned {
                        BinOp::ModU
                    } else {
                        BinOp::Mod
                    }
                }
                ArithClass::Long => {
                    if unsigned {
                        BinOp::ModLU
                    } else {
                        BinOp::ModL
                    }
                }
                ArithClass::Float | ArithClass::Single => {
                    panic!("modulo on floating-point operands")
                }
            },
            B::And => int_op(result, BinOp::And, BinOp::AndL),
            B::Or => int_op(result, BinOp::Or, BinOp::OrL),
            B::Xor => int_op(result, BinOp::Xor, BinOp::XorL),
            B::Shl => int_op(result, BinOp::Shl, BinOp::ShlL),
            B::Shr => match class_of(result) {
                ArithClass::Int => {
                    if result.is_unsigned() {
                        BinOp::ShrU
                    } else {
                        BinOp::Shr
                    }
                }
                ArithClass::Long => {
                    if result.is_unsigned() {
                        BinOp::ShrLU
                    } else {
                        BinOp::ShrL
                    }
                }
                _ => panic!("shift on floating-point operands"),
            },
            B::Eq | B::Ne | B::Lt | B::Gt | B::Le | B::Ge => unreachable!("handled above"),
        };
        Expr::binop(csm_op, self.expr(left), self.expr(right))
    }

    /// `p + i`, `p - i` (scaled by element size) and `p - q` (difference in
    /// elements).
    fn pointer_arith(
        &mut self,
        op: clight::BinaryOp,
        left: &clight::Expr,
        right: &clight::Expr,
        result: &Type,
    ) -> Expr {
        use clight::BinaryOp as B;

        if op == B::Sub && is_pointer_like(&left.ty) && is_pointer_like(&right.ty) {
            let elem = element_size(&left.ty, self.defs);
            let diff = Expr::binop(BinOp::SubL, self.expr(left), self.expr(right));
            return if elem > 1 {
                Expr::binop(BinOp::DivL, diff, Expr::long(elem))
            } else {
                diff
            };
        }

        let (ptr, index) = if is_pointer_like(&left.ty) {
            (left, right)
        } else {
            (right, left)
        };
        let elem = element_size(result, self.defs);
        let base = self.expr(ptr);
        let index_value = self.expr(index);
        let index_long = widen_index(index_value, &index.ty);
        let scaled = if elem == 1 {
            index_long
        } else {
            Expr::binop(BinOp::MulL, index_long, Expr::long(elem))
        };
        let csm_op = if op == B::Add { BinOp::AddL } else { BinOp::SubL };
        Expr::binop(csm_op, base, scaled)
    }
}

// ============================================================================
// Pure helpers
// ============================================================================

/// Array and function values decay to their address.
const fn decays_to_address(ty: &Type) -> bool {
    matches!(ty, Type::Array { .. } | Type::Function { .. })
}

const fn is_pointer_like(ty: &Type) -> bool {
    matches!(ty, Type::Pointer { .. } | Type::Array { .. })
}

fn element_size(ty: &Type, defs: &CompositeDefs) -> i64 {
    match ty {
        Type::Pointer { elem } | Type::Array { elem, .. } => sizeof(elem, defs),
        other => panic!("pointer arithmetic on non-pointer type {other:?}"),
    }
}

/// Widen an index operand of pointer arithmetic to long.
fn widen_index(value: Expr, ty: &Type) -> Expr {
    match ty {
        Type::Int {
            sign: Signedness::Signed,
            ..
        } => Expr::unop(UnOp::LongOfInt, value),
        Type::Int {
            sign: Signedness::Unsigned,
            ..
        } => Expr::unop(UnOp::LongOfIntU, value),
        _ => value,
    }
}

enum ArithClass {
    Int,
    Long,
    Float,
    Single,
}

fn class_of(ty: &Type) -> ArithClass {
    match ty {
        Type::Int { .. } => ArithClass::Int,
        Type::Long { .. } | Type::Pointer { .. } | Type::Array { .. } => ArithClass::Long,
        Type::Float {
            size: FloatSize::F64,
        } => ArithClass::Float,
        Type::Float {
            size: FloatSize::F32,
        } => ArithClass::Single,
        other => panic!("operator applied at non-arithmetic type {other:?}"),
    }
}

fn arith_op(ty: &Type, int: BinOp, long: BinOp, float: BinOp, single: BinOp) -> BinOp {
    match class_of(ty) {
        ArithClass::Int => int,
        ArithClass::Long => long,
        ArithClass::Float => float,
        ArithClass::Single => single,
    }
}

fn int_op(ty: &Type, int: BinOp, long: BinOp) -> BinOp {
    match class_of(ty) {
        ArithClass::Int => int,
        ArithClass::Long => long,
        _ => panic!("integer operator applied at floating-point type"),
    }
}

fn select_unop(op: clight::UnaryOp, ty: &Type) -> UnOp {
    match op {
        clight::UnaryOp::Neg => match class_of(ty) {
            ArithClass::Int => UnOp::NegInt,
            ArithClass::Long => UnOp::NegLong,
            ArithClass::Float => UnOp::NegFloat,
            ArithClass::Single => UnOp::NegSingle,
        },
        clight::UnaryOp::NotInt => match class_of(ty) {
            ArithClass::Int => UnOp::NotInt,
            ArithClass::Long => UnOp::NotLong,
            _ => panic!("bitwise complement on floating-point operand"),
        },
        clight::UnaryOp::NotBool => UnOp::NotBool,
    }
}

/// Comparison kind from the operand types: any unsigned integer operand
/// forces the unsigned variant, pointers compare as unsigned long, floats
/// by their size.
fn cmp_kind(left: &Type, right: &Type) -> CmpKind {
    if left.is_double() || right.is_double() {
        CmpKind::Float
    } else if left.is_single() || right.is_single() {
        CmpKind::Single
    } else if is_pointer_like(left) || is_pointer_like(right) {
        CmpKind::LongU
    } else if left.is_long() || right.is_long() {
        if left.is_unsigned() || right.is_unsigned() {
            CmpKind::LongU
        } else {
            CmpKind::Long
        }
    } else if left.is_unsigned() || right.is_unsigned() {
        CmpKind::IntU
    } else {
        CmpKind::Int
    }
}

const fn comparison(op: clight::BinaryOp) -> Comparison {
    match op {
        clight::BinaryOp::Eq => Comparison::Eq,
        clight::BinaryOp::Ne => Comparison::Ne,
        clight::BinaryOp::Lt => Comparison::Lt,
        clight::BinaryOp::Gt => Comparison::Gt,
        clight::BinaryOp::Le => Comparison::Le,
        clight::BinaryOp::Ge => Comparison::Ge,
        _ => panic!("not a comparison operator"),
    }
}

fn function_sig(ty: &Type) -> (Vec<Type>, Type) {
    match ty {
        Type::Function { params, ret, .. } => (params.clone(), (**ret).clone()),
        Type::Pointer { elem } => function_sig(elem),
        other => panic!("call through non-function type {other:?}"),
    }
}

// ============================================================================
// Casts
// ============================================================================

/// Convert `value` from type `from` to type `to`, chaining conversions
/// where ARM64 has no direct operator (f32 ↔ int/long goes through f64).
fn cast_value(value: Expr, from: &Type, to: &Type) -> Expr {
    if from == to {
        return value;
    }
    match to {
        Type::Void => value,
        Type::Float {
            size: FloatSize::F64,
        } => to_double(value, from),
        Type::Float {
            size: FloatSize::F32,
        } => {
            if from.is_single() {
                value
            } else {
                Expr::unop(UnOp::SingleOfFloat, to_double(value, from))
            }
        }
        Type::Long { sign } => to_long(value, from, *sign),
        Type::Int {
            size: IntSize::I32,
            sign,
        } => to_int32(value, from, *sign),
        Type::Int {
            size: IntSize::I8,
            sign,
        } => {
            let narrow = match sign {
                Signedness::Signed => UnOp::Cast8S,
                Signedness::Unsigned => UnOp::Cast8U,
            };
            Expr::unop(narrow, to_int32(value, from, *sign))
        }
        Type::Int {
            size: IntSize::I16,
            sign,
        } => {
            let narrow = match sign {
                Signedness::Signed => UnOp::Cast16S,
                Signedness::Unsigned => UnOp::Cast16U,
            };
            Expr::unop(narrow, to_int32(value, from, *sign))
        }
        Type::Int {
            size: IntSize::IBool,
            ..
        } => to_bool(value, from),
        Type::Pointer { .. } => match from {
            Type::Pointer { .. } | Type::Array { .. } | Type::Function { .. } | Type::Long { .. } => {
                value
            }
            Type::Int {
                sign: Signedness::Signed,
                ..
            } => Expr::unop(UnOp::LongOfInt, value),
            Type::Int {
                sign: Signedness::Unsigned,
                ..
            } => Expr::unop(UnOp::LongOfIntU, value),
            other => panic!("cast from {other:?} to pointer"),
        },
        other => panic!("cast from {from:?} to {other:?}"),
    }
}

fn to_double(value: Expr, from: &Type) -> Expr {
    match from {
        Type::Float {
            size: FloatSize::F64,
        } => value,
        Type::Float {
            size: FloatSize::F32,
        } => Expr::unop(UnOp::FloatOfSingle, value),
        Type::Int {
            sign: Signedness::Signed,
            ..
        } => Expr::unop(UnOp::FloatOfInt, value),
        Type::Int {
            sign: Signedness::Unsigned,
            ..
        } => Expr::unop(UnOp::FloatOfIntU, value),
        Type::Long {
            sign: Signedness::Signed,
        } => Expr::unop(UnOp::FloatOfLong, value),
        Type::Long {
            sign: Signedness::Unsigned,
        } => Expr::unop(UnOp::FloatOfLongU, value),
        other => panic!("cast from {other:?} to double"),
    }
}

fn to_long(value: Expr, from: &Type, sign: Signedness) -> Expr {
    match from {
        Type::Long { .. } | Type::Pointer { .. } | Type::Array { .. } | Type::Function { .. } => {
            value
        }
        Type::Int {
            sign: Signedness::Signed,
            ..
        } => Expr::unop(UnOp::LongOfInt, value),
        Type::Int {
            sign: Signedness::Unsigned,
            ..
        } => Expr::unop(UnOp::LongOfIntU, value),
        Type::Float {
            size: FloatSize::F64,
        } => match sign {
            Signedness::Signed => Expr::unop(UnOp::LongOfFloat, value),
            Signedness::Unsigned => Expr::unop(UnOp::LongUOfFloat, value),
        },
        Type::Float {
            size: FloatSize::F32,
        } => {
            let widened = Expr::unop(UnOp::FloatOfSingle, value);
            match sign {
                Signedness::Signed => Expr::unop(UnOp::LongOfFloat, widened),
                Signedness::Unsigned => Expr::unop(UnOp::LongUOfFloat, widened),
            }
        }
        other => panic!("cast from {other:?} to long"),
    }
}

fn to_int32(value: Expr, from: &Type, sign: Signedness) -> Expr {
    match from {
        Type::Int { .. } => value,
        Type::Long { .. } | Type::Pointer { .. } => Expr::unop(UnOp::IntOfLong, value),
        Type::Float {
            size: FloatSize::F64,
        } => match sign {
            Signedness::Signed => Expr::unop(UnOp::IntOfFloat, value),
            Signedness::Unsigned => Expr::unop(UnOp::IntUOfFloat, value),
        },
        Type::Float {
            size: FloatSize::F32,
        } => {
            let widened = Expr::unop(UnOp::FloatOfSingle, value);
            match sign {
                Signedness::Signed => Expr::unop(UnOp::IntOfFloat, widened),
                Signedness::Unsigned => Expr::unop(UnOp::IntUOfFloat, widened),
            }
        }
        other => panic!("cast from {other:?} to int"),
    }
}

/// `_Bool` casts compare against zero in the source domain.
fn to_bool(value: Expr, from: &Type) -> Expr {
    match from {
        Type::Int { .. } => Expr::cmp(CmpKind::Int, Comparison::Ne, value, Expr::int(0)),
        Type::Long { .. } => Expr::cmp(CmpKind::Long, Comparison::Ne, value, Expr::long(0)),
        Type::Pointer { .. } | Type::Array { .. } | Type::Function { .. } => {
            Expr::cmp(CmpKind::LongU, Comparison::Ne, value, Expr::long(0))
        }
        Type::Float {
            size: FloatSize::F64,
        } => Expr::cmp(
            CmpKind::Float,
            Comparison::Ne,
            value,
            Expr::Const(Const::Float(0.0)),
        ),
        Type::Float {
            size: FloatSize::F32,
        } => Expr::cmp(
            CmpKind::Single,
            Comparison::Ne,
            value,
            Expr::Const(Const::Single(0.0)),
        ),
        other => panic!("cast from {other:?} to _Bool"),
    }
}

// ============================================================================
// Parameter-assignment scan
// ============================================================================

/// Collect parameter names assigned anywhere in `s`.
fn collect_assigned_params(
    s: &clight::Stmt,
    params: &FxHashSet<String>,
    assigned: &mut FxHashSet<String>,
) {
    match s {
        clight::Stmt::Assign { lhs, .. } => {
            if let clight::ExprKind::Var(name) = &lhs.kind {
                if params.contains(name) {
                    assigned.insert(name.clone());
                }
            }
        }
        clight::Stmt::Seq(a, b) => {
            collect_assigned_params(a, params, assigned);
            collect_assigned_params(b, params, assigned);
        }
        clight::Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            collect_assigned_params(then_branch, params, assigned);
            collect_assigned_params(else_branch, params, assigned);
        }
        clight::Stmt::Loop { body, cont } => {
            collect_assigned_params(body, params, assigned);
            collect_assigned_params(cont, params, assigned);
        }
        clight::Stmt::Switch { cases, default, .. } => {
            for (_, case) in cases {
                collect_assigned_params(case, params, assigned);
            }
            if let Some(d) = default {
                collect_assigned_params(d, params, assigned);
            }
        }
        clight::Stmt::Label(_, body) => collect_assigned_params(body, params, assigned),
        clight::Stmt::Skip
        | clight::Stmt::Set { .. }
        | clight::Stmt::Call { .. }
        | clight::Stmt::Builtin { .. }
        | clight::Stmt::Break
        | clight::Stmt::Continue
        | clight::Stmt::Return(_)
        | clight::Stmt::Goto(_) => {}
    }
}
