use super::*;

const fn selector() -> Selector {
    Selector
}

#[test]
fn test_add_shift_fusion() {
    // S5: x + (y << 2) fuses into one node.
    let e = cmin::Expr::binop(
        BinOp::Add,
        cmin::Expr::var("x"),
        cmin::Expr::binop(BinOp::Shl, cmin::Expr::var("y"), cmin::Expr::int(2)),
    );
    let selected = selector().expr(&e);
    assert_eq!(
        selected,
        Expr::add_shift(ShiftKind::Lsl, 2, Expr::var("x"), Expr::var("y"))
    );
}

#[test]
fn test_add_shift_commutes() {
    let e = cmin::Expr::binop(
        BinOp::AddL,
        cmin::Expr::binop(BinOp::ShlL, cmin::Expr::var("y"), cmin::Expr::int(3)),
        cmin::Expr::var("x"),
    );
    let selected = selector().expr(&e);
    assert_eq!(
        selected,
        Expr::add_shift(ShiftKind::Lsl, 3, Expr::var("x"), Expr::var("y"))
    );
}

#[test]
fn test_sub_shift_only_fuses_right_operand() {
    let fused = cmin::Expr::binop(
        BinOp::Sub,
        cmin::Expr::var("x"),
        cmin::Expr::binop(BinOp::ShrU, cmin::Expr::var("y"), cmin::Expr::int(1)),
    );
    assert_eq!(
        selector().expr(&fused),
        Expr::sub_shift(ShiftKind::Lsr, 1, Expr::var("x"), Expr::var("y"))
    );

    // x >> 1 - y must NOT become a fused subtraction with swapped operands.
    let not_fused = cmin::Expr::binop(
        BinOp::Sub,
        cmin::Expr::binop(BinOp::Shr, cmin::Expr::var("x"), cmin::Expr::int(1)),
        cmin::Expr::var("y"),
    );
    assert!(matches!(
        selector().expr(&not_fused),
        Expr::Binop { op: BinOp::Sub, .. }
    ));
}

#[test]
fn test_arithmetic_shift_kind_from_operator() {
    let e = cmin::Expr::binop(
        BinOp::Add,
        cmin::Expr::var("x"),
        cmin::Expr::binop(BinOp::Shr, cmin::Expr::var("y"), cmin::Expr::int(4)),
    );
    assert_eq!(
        selector().expr(&e),
        Expr::add_shift(ShiftKind::Asr, 4, Expr::var("x"), Expr::var("y"))
    );
}

#[test]
fn test_multiply_by_power_of_two_becomes_shift() {
    let e = cmin::Expr::binop(
        BinOp::AddL,
        cmin::Expr::var("base"),
        cmin::Expr::binop(BinOp::MulL, cmin::Expr::var("i"), cmin::Expr::long(8)),
    );
    assert_eq!(
        selector().expr(&e),
        Expr::add_shift(ShiftKind::Lsl, 3, Expr::var("base"), Expr::var("i"))
    );
}

#[test]
fn test_variable_shift_amount_does_not_fuse() {
    let e = cmin::Expr::binop(
        BinOp::Add,
        cmin::Expr::var("x"),
        cmin::Expr::binop(BinOp::Shl, cmin::Expr::var("y"), cmin::Expr::var("n")),
    );
    assert!(matches!(
        selector().expr(&e),
        Expr::Binop { op: BinOp::Add, .. }
    ));
}

#[test]
fn test_global_pointer_value_stays_the_base_register() {
    // *gp for a global pointer scalar: the address is gp's current value,
    // not gp's own storage cell.
    let e = cmin::Expr::load(charm_ctypes::Chunk::I32, cmin::Expr::var("gp"));
    assert_eq!(
        selector().expr(&e),
        Expr::load(
            charm_ctypes::Chunk::I32,
            AddrMode::Indexed(0),
            vec![Expr::var("gp")]
        )
    );
}

#[test]
fn test_symbol_constant_selects_aglobal_with_offset() {
    let e = cmin::Expr::load(
        charm_ctypes::Chunk::I32,
        cmin::Expr::Const(Const::symbol("table", 16)),
    );
    assert_eq!(
        selector().expr(&e),
        Expr::load(charm_ctypes::Chunk::I32, AddrMode::global("table", 16), vec![])
    );
}

#[test]
fn test_stack_address_selects_ainstack() {
    let e = cmin::Expr::load(charm_ctypes::Chunk::I32, cmin::Expr::addr_stack(24));
    assert_eq!(
        selector().expr(&e),
        Expr::load(charm_ctypes::Chunk::I32, AddrMode::Instack(24), vec![])
    );
}

#[test]
fn test_base_plus_constant_selects_aindexed() {
    let e = cmin::Expr::load(
        charm_ctypes::Chunk::I64,
        cmin::Expr::binop(BinOp::AddL, cmin::Expr::var("p"), cmin::Expr::long(16)),
    );
    assert_eq!(
        selector().expr(&e),
        Expr::load(
            charm_ctypes::Chunk::I64,
            AddrMode::Indexed(16),
            vec![Expr::var("p")]
        )
    );
}

#[test]
fn test_unencodable_offset_falls_back_to_register_index() {
    // 32768 is out of range for an 8-byte scaled 12-bit offset and for the
    // signed 9-bit form; the constant stays a register operand.
    let e = cmin::Expr::load(
        charm_ctypes::Chunk::I64,
        cmin::Expr::binop(BinOp::AddL, cmin::Expr::var("p"), cmin::Expr::long(32768)),
    );
    assert_eq!(
        selector().expr(&e),
        Expr::load(
            charm_ctypes::Chunk::I64,
            AddrMode::Indexed2,
            vec![Expr::var("p"), Expr::long(32768)]
        )
    );
}

#[test]
fn test_negative_offset_uses_unscaled_form() {
    let e = cmin::Expr::load(
        charm_ctypes::Chunk::I64,
        cmin::Expr::binop(BinOp::AddL, cmin::Expr::var("p"), cmin::Expr::long(-8)),
    );
    assert_eq!(
        selector().expr(&e),
        Expr::load(
            charm_ctypes::Chunk::I64,
            AddrMode::Indexed(-8),
            vec![Expr::var("p")]
        )
    );
}

#[test]
fn test_scaled_index_selects_aindexed2shift() {
    let e = cmin::Expr::load(
        charm_ctypes::Chunk::I64,
        cmin::Expr::binop(
            BinOp::AddL,
            cmin::Expr::var("base"),
            cmin::Expr::binop(BinOp::ShlL, cmin::Expr::var("i"), cmin::Expr::int(3)),
        ),
    );
    assert_eq!(
        selector().expr(&e),
        Expr::load(
            charm_ctypes::Chunk::I64,
            AddrMode::Indexed2Shift(3),
            vec![Expr::var("base"), Expr::var("i")]
        )
    );
}

#[test]
fn test_mismatched_shift_is_not_a_scaled_index() {
    // Shift of 2 against an 8-byte access cannot use the scaled form.
    let e = cmin::Expr::load(
        charm_ctypes::Chunk::I64,
        cmin::Expr::binop(
            BinOp::AddL,
            cmin::Expr::var("base"),
            cmin::Expr::binop(BinOp::ShlL, cmin::Expr::var("i"), cmin::Expr::int(2)),
        ),
    );
    let Expr::Load { mode, .. } = selector().expr(&e) else {
        panic!("expected Load");
    };
    assert_eq!(mode, AddrMode::Indexed2);
}

#[test]
fn test_base_plus_symbol_selects_abased() {
    let e = cmin::Expr::load(
        charm_ctypes::Chunk::I32,
        cmin::Expr::binop(
            BinOp::AddL,
            cmin::Expr::var("i"),
            cmin::Expr::Const(Const::symbol("table", 0)),
        ),
    );
    assert_eq!(
        selector().expr(&e),
        Expr::load(
            charm_ctypes::Chunk::I32,
            AddrMode::based("table", 0),
            vec![Expr::var("i")]
        )
    );
}

#[test]
fn test_opaque_address_falls_back_to_indexed_zero() {
    let e = cmin::Expr::load(charm_ctypes::Chunk::I32, cmin::Expr::var("p"));
    assert_eq!(
        selector().expr(&e),
        Expr::load(
            charm_ctypes::Chunk::I32,
            AddrMode::Indexed(0),
            vec![Expr::var("p")]
        )
    );
}

#[test]
fn test_condition_lift_preserves_comparison() {
    // P8: the cmp field survives lifting unchanged.
    let e = cmin::Expr::cmp(
        CmpKind::IntU,
        Comparison::Lt,
        cmin::Expr::var("a"),
        cmin::Expr::var("b"),
    );
    let cond = selector().select_condition(&e);
    assert_eq!(
        cond,
        Condition::cmp(CmpKind::IntU, Comparison::Lt, Expr::var("a"), Expr::var("b"))
    );
}

#[test]
fn test_condition_constants() {
    assert_eq!(
        selector().select_condition(&cmin::Expr::int(0)),
        Condition::False
    );
    assert_eq!(
        selector().select_condition(&cmin::Expr::long(0)),
        Condition::False
    );
    assert_eq!(
        selector().select_condition(&cmin::Expr::int(7)),
        Condition::True
    );
}

#[test]
fn test_condition_notbool_negates() {
    let e = cmin::Expr::unop(
        UnOp::NotBool,
        cmin::Expr::cmp(
            CmpKind::Int,
            Comparison::Eq,
            cmin::Expr::var("a"),
            cmin::Expr::int(0),
        ),
    );
    let cond = selector().select_condition(&e);
    assert_eq!(
        cond,
        Condition::not(Condition::cmp(
            CmpKind::Int,
            Comparison::Eq,
            Expr::var("a"),
            Expr::int(0)
        ))
    );
}

#[test]
fn test_condition_default_compares_against_zero() {
    let cond = selector().select_condition(&cmin::Expr::var("flag"));
    assert_eq!(
        cond,
        Condition::cmp(CmpKind::IntU, Comparison::Ne, Expr::var("flag"), Expr::int(0))
    );

    let long_cond = selector().select_condition(&cmin::Expr::binop(
        BinOp::AddL,
        cmin::Expr::var("a"),
        cmin::Expr::var("b"),
    ));
    assert!(matches!(
        long_cond,
        Condition::Cmp {
            kind: CmpKind::LongU,
            cmp: Comparison::Ne,
            ..
        }
    ));
}

#[test]
fn test_if_conversion_of_simple_assignments() {
    let s = cmin::Stmt::If {
        cond: cmin::Expr::cmp(
            CmpKind::Int,
            Comparison::Lt,
            cmin::Expr::var("a"),
            cmin::Expr::var("b"),
        ),
        then_branch: Box::new(cmin::Stmt::assign("x", cmin::Expr::var("a"))),
        else_branch: Box::new(cmin::Stmt::assign("x", cmin::Expr::var("b"))),
    };
    let selected = selector().stmt(&s);
    assert_eq!(
        selected,
        Stmt::assign(
            "x",
            Expr::condition(
                Condition::cmp(CmpKind::Int, Comparison::Lt, Expr::var("a"), Expr::var("b")),
                Expr::var("a"),
                Expr::var("b")
            )
        )
    );
}

#[test]
fn test_if_conversion_rejects_loads_and_division() {
    let with_load = cmin::Stmt::If {
        cond: cmin::Expr::var("c"),
        then_branch: Box::new(cmin::Stmt::assign(
            "x",
            cmin::Expr::load(charm_ctypes::Chunk::I32, cmin::Expr::var("p")),
        )),
        else_branch: Box::new(cmin::Stmt::assign("x", cmin::Expr::int(0))),
    };
    assert!(matches!(selector().stmt(&with_load), Stmt::If { .. }));

    let with_div = cmin::Stmt::If {
        cond: cmin::Expr::var("c"),
        then_branch: Box::new(cmin::Stmt::assign(
            "x",
            cmin::Expr::binop(BinOp::Div, cmin::Expr::var("a"), cmin::Expr::var("b")),
        )),
        else_branch: Box::new(cmin::Stmt::assign("x", cmin::Expr::int(0))),
    };
    assert!(matches!(selector().stmt(&with_div), Stmt::If { .. }));
}

#[test]
fn test_if_conversion_requires_same_destination() {
    let s = cmin::Stmt::If {
        cond: cmin::Expr::var("c"),
        then_branch: Box::new(cmin::Stmt::assign("x", cmin::Expr::int(1))),
        else_branch: Box::new(cmin::Stmt::assign("y", cmin::Expr::int(2))),
    };
    assert!(matches!(selector().stmt(&s), Stmt::If { .. }));
}

#[test]
fn test_store_carries_addressing_mode() {
    let s = cmin::Stmt::store(
        charm_ctypes::Chunk::I32,
        cmin::Expr::binop(BinOp::AddL, cmin::Expr::var("p"), cmin::Expr::long(4)),
        cmin::Expr::var("v"),
    );
    let selected = selector().stmt(&s);
    assert_eq!(
        selected,
        Stmt::Store {
            chunk: charm_ctypes::Chunk::I32,
            mode: AddrMode::Indexed(4),
            args: vec![Expr::var("p")],
            value: Expr::var("v"),
        }
    );
}

#[test]
fn test_value_position_comparison_becomes_conditional() {
    let e = cmin::Expr::cmp(
        CmpKind::Int,
        Comparison::Lt,
        cmin::Expr::var("a"),
        cmin::Expr::var("b"),
    );
    let selected = selector().expr(&e);
    assert_eq!(
        selected,
        Expr::condition(
            Condition::cmp(CmpKind::Int, Comparison::Lt, Expr::var("a"), Expr::var("b")),
            Expr::int(1),
            Expr::int(0)
        )
    );
}
