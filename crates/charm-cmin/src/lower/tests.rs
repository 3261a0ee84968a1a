use super::*;
use charm_csm::{BinOp, Local};
use charm_ctypes::Type;

fn function_with(locals: Vec<Local>, body: csm::Stmt) -> csm::Function {
    csm::Function {
        name: "f".to_string(),
        sig: csm::Sig::new(Vec::new(), Type::Void),
        params: Vec::new(),
        locals,
        temps: Vec::new(),
        body,
    }
}

fn lower_one(f: csm::Function) -> Function {
    let program = csm::Program {
        globals: Vec::new(),
        functions: vec![f],
    };
    lower_program(&program).functions.remove(0)
}

#[test]
fn test_stack_layout_classification() {
    // S3: &c, &i, &l taken but not &r.
    let locals = vec![
        Local::new("c", 1, charm_ctypes::Chunk::I8U),
        Local::new("i", 4, charm_ctypes::Chunk::I32),
        Local::new("l", 8, charm_ctypes::Chunk::I64),
        Local::new("r", 4, charm_ctypes::Chunk::I32),
    ];
    let body = csm::Stmt::seq(
        csm::Stmt::set(1, csm::Expr::addrof("c")),
        csm::Stmt::seq(
            csm::Stmt::set(2, csm::Expr::addrof("i")),
            csm::Stmt::seq(
                csm::Stmt::set(3, csm::Expr::addrof("l")),
                csm::Stmt::assign("r", csm::Expr::int(0)),
            ),
        ),
    );
    let mut f = function_with(locals, body);
    f.temps = vec![1, 2, 3];
    let lowered = lower_one(f);

    assert_eq!(
        lowered.stack_layout,
        vec![
            StackSlot::new("c", 0, 1),
            StackSlot::new("i", 4, 4),
            StackSlot::new("l", 8, 8),
        ]
    );
    assert_eq!(lowered.stack_size, 16);
    assert!(lowered.vars.contains(&"r".to_string()));
}

#[test]
fn test_offsets_are_non_decreasing_and_aligned() {
    let locals = vec![
        Local::new("a", 1, charm_ctypes::Chunk::I8U),
        Local::new("b", 2, charm_ctypes::Chunk::I16U),
        Local::new("c", 1, charm_ctypes::Chunk::I8U),
        Local::new("d", 8, charm_ctypes::Chunk::I64),
    ];
    let body = csm::Stmt::seq(
        csm::Stmt::set(1, csm::Expr::addrof("a")),
        csm::Stmt::seq(
            csm::Stmt::set(1, csm::Expr::addrof("b")),
            csm::Stmt::seq(
                csm::Stmt::set(1, csm::Expr::addrof("c")),
                csm::Stmt::set(1, csm::Expr::addrof("d")),
            ),
        ),
    );
    let mut f = function_with(locals, body);
    f.temps = vec![1];
    let lowered = lower_one(f);

    // a at 0, b aligned to 2, c right after, d aligned to 8.
    assert_eq!(lowered.stack_layout[0].offset, 0);
    assert_eq!(lowered.stack_layout[1].offset, 2);
    assert_eq!(lowered.stack_layout[2].offset, 4);
    assert_eq!(lowered.stack_layout[3].offset, 8);
    assert_eq!(lowered.stack_size, 16);
    let mut prev = -1;
    for slot in &lowered.stack_layout {
        assert!(slot.offset >= prev);
        prev = slot.offset;
    }
}

#[test]
fn test_register_local_keeps_var_access() {
    let locals = vec![Local::new("x", 4, charm_ctypes::Chunk::I32)];
    let body = csm::Stmt::assign("x", csm::Expr::var("x"));
    let lowered = lower_one(function_with(locals, body));
    assert_eq!(lowered.stack_size, 0);
    assert_eq!(lowered.vars, vec!["x".to_string()]);
    assert_eq!(lowered.body, Stmt::assign("x", Expr::var("x")));
}

#[test]
fn test_stack_local_reads_become_loads() {
    let locals = vec![Local::new("x", 4, charm_ctypes::Chunk::I32)];
    let body = csm::Stmt::seq(
        csm::Stmt::set(1, csm::Expr::addrof("x")),
        csm::Stmt::set(2, csm::Expr::var("x")),
    );
    let mut f = function_with(locals, body);
    f.temps = vec![1, 2];
    let lowered = lower_one(f);

    let expected = Stmt::seq(
        Stmt::assign("_t1", Expr::addr_stack(0)),
        Stmt::assign(
            "_t2",
            Expr::load(charm_ctypes::Chunk::I32, Expr::addr_stack(0)),
        ),
    );
    assert_eq!(lowered.body, expected);
}

#[test]
fn test_stack_local_writes_become_stores() {
    let locals = vec![Local::new("x", 4, charm_ctypes::Chunk::I32)];
    let body = csm::Stmt::seq(
        csm::Stmt::set(1, csm::Expr::addrof("x")),
        csm::Stmt::assign("x", csm::Expr::int(3)),
    );
    let mut f = function_with(locals, body);
    f.temps = vec![1];
    let lowered = lower_one(f);

    let expected = Stmt::seq(
        Stmt::assign("_t1", Expr::addr_stack(0)),
        Stmt::store(charm_ctypes::Chunk::I32, Expr::addr_stack(0), Expr::int(3)),
    );
    assert_eq!(lowered.body, expected);
}

#[test]
fn test_temps_are_renamed() {
    // S1 tail: $1 becomes _t1 everywhere.
    let body = csm::Stmt::set(
        1,
        csm::Expr::binop(BinOp::AddL, csm::Expr::tempvar(1), csm::Expr::long(5)),
    );
    let mut f = function_with(Vec::new(), body);
    f.temps = vec![1];
    let lowered = lower_one(f);

    assert_eq!(
        lowered.body,
        Stmt::assign(
            "_t1",
            Expr::binop(BinOp::AddL, Expr::var("_t1"), Expr::long(5))
        )
    );
    assert_eq!(lowered.vars, vec!["_t1".to_string()]);
}

#[test]
fn test_global_addrof_becomes_symbol() {
    let body = csm::Stmt::set(1, csm::Expr::addrof("g"));
    let mut f = function_with(Vec::new(), body);
    f.temps = vec![1];
    let lowered = lower_one(f);
    assert_eq!(
        lowered.body,
        Stmt::assign("_t1", Expr::Const(Const::symbol("g", 0)))
    );
}

#[test]
fn test_global_var_read_unchanged() {
    let body = csm::Stmt::set(1, csm::Expr::var("g"));
    let mut f = function_with(Vec::new(), body);
    f.temps = vec![1];
    let lowered = lower_one(f);
    assert_eq!(lowered.body, Stmt::assign("_t1", Expr::var("g")));
}

#[test]
fn test_addr_taken_walk_recurses_everywhere() {
    // Address buried under a load inside a loop inside a switch.
    let buried = csm::Stmt::Switch {
        long: false,
        scrutinee: csm::Expr::int(0),
        cases: vec![(
            0,
            csm::Stmt::Loop(Box::new(csm::Stmt::set(
                1,
                csm::Expr::load(charm_ctypes::Chunk::I32, csm::Expr::addrof("deep")),
            ))),
        )],
        default: None,
    };
    let mut taken = rustc_hash::FxHashSet::default();
    collect_addr_taken(&buried, &mut taken);
    assert!(taken.contains("deep"));
}

#[test]
fn test_signature_descriptors() {
    let f = csm::Function {
        name: "f".to_string(),
        sig: csm::Sig::new(
            vec![
                Type::int(),
                Type::long(),
                Type::double(),
                Type::float(),
                Type::pointer(Type::int()),
            ],
            Type::Void,
        ),
        params: Vec::new(),
        locals: Vec::new(),
        temps: Vec::new(),
        body: csm::Stmt::Skip,
    };
    let lowered = lower_one(f);
    assert_eq!(lowered.sig.params, ["int", "long", "double", "float", "long"]);
    assert_eq!(lowered.sig.ret, "void");
}

#[test]
fn test_tail_call_is_structural() {
    let body = csm::Stmt::TailCall {
        sig: csm::Sig::new(vec![Type::int()], Type::int()),
        func: csm::Expr::addrof("callee"),
        args: vec![csm::Expr::tempvar(1)],
    };
    let mut f = function_with(Vec::new(), body);
    f.temps = vec![1];
    let lowered = lower_one(f);
    let Stmt::TailCall { sig, func, args } = &lowered.body else {
        panic!("expected TailCall");
    };
    assert_eq!(sig.params, ["int"]);
    assert_eq!(*func, Expr::Const(Const::symbol("callee", 0)));
    assert_eq!(args[0], Expr::var("_t1"));
}

#[test]
fn test_call_dest_renamed() {
    let body = csm::Stmt::Call {
        dest: Some(2),
        sig: csm::Sig::new(Vec::new(), Type::int()),
        func: csm::Expr::addrof("callee"),
        args: vec![csm::Expr::tempvar(1)],
    };
    let mut f = function_with(Vec::new(), body);
    f.temps = vec![1, 2];
    let lowered = lower_one(f);
    let Stmt::Call { dest, func, args, .. } = &lowered.body else {
        panic!("expected Call");
    };
    assert_eq!(dest.as_deref(), Some("_t2"));
    assert_eq!(*func, Expr::Const(Const::symbol("callee", 0)));
    assert_eq!(args[0], Expr::var("_t1"));
}
