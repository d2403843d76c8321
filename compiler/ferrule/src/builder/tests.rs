#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use crate::context::Context;
use crate::enums::{IntPredicate, Opcode, RealPredicate, ValueKind};
use crate::error::{FailureKind, FerruleError};
use crate::owned::Disposable;
use crate::values::{AnyValue, GlobalObject};

#[test]
fn unpositioned_builder_fails_without_building() {
    let ctx = Context::new().unwrap();
    let module = ctx.create_module("m").unwrap();
    let builder = ctx.create_builder().unwrap();
    let void = ctx.void_type().unwrap();
    let function = module.add_function("f", ctx.function_type(void, &[], false).unwrap()).unwrap();
    let entry = ctx.append_basic_block(function, "entry").unwrap();

    assert_eq!(builder.insert_block().unwrap(), None);
    let err = builder.build_ret_void().unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Builder));
    assert_eq!(entry.instructions().count(), 0);

    builder.position_at_end(entry).unwrap();
    assert_eq!(builder.insert_block().unwrap(), Some(entry));
    builder.clear_insertion_position().unwrap();
    assert_eq!(builder.insert_block().unwrap(), None);
}

#[test]
fn arithmetic_shortcuts_pick_their_opcode() {
    let ctx = Context::new().unwrap();
    let module = ctx.create_module("m").unwrap();
    let builder = ctx.create_builder().unwrap();
    let i32 = ctx.i32_type().unwrap();
    let double = ctx.double_type().unwrap();
    let function = module
        .add_function("f", ctx.function_type(i32, &[i32, i32, double], false).unwrap())
        .unwrap();
    builder.position_at_end(ctx.append_basic_block(function, "entry").unwrap()).unwrap();
    let a = function.param(0).unwrap();
    let b = function.param(1).unwrap();
    let x = function.param(2).unwrap();

    let built = [
        builder.build_add(a, b, "add").unwrap(),
        builder.build_sub(a, b, "sub").unwrap(),
        builder.build_mul(a, b, "mul").unwrap(),
        builder.build_fadd(x, x, "fadd").unwrap(),
        builder.build_binop(Opcode::Xor, a, b, "xor").unwrap(),
    ];
    let opcodes: Vec<Opcode> = built
        .iter()
        .map(|value| match value.classify().unwrap() {
            AnyValue::Instruction(inst) => inst.opcode().unwrap(),
            other => panic!("expected an instruction, got {other:?}"),
        })
        .collect();
    assert_eq!(opcodes, [Opcode::Add, Opcode::Sub, Opcode::Mul, Opcode::FAdd, Opcode::Xor]);
    assert_eq!(built[0].name(), "add");
    assert_eq!(built[3].type_of().unwrap(), double);
}

#[test]
fn mismatched_operands_are_rejected() {
    let ctx = Context::new().unwrap();
    let module = ctx.create_module("m").unwrap();
    let builder = ctx.create_builder().unwrap();
    let i32 = ctx.i32_type().unwrap();
    let i64 = ctx.i64_type().unwrap();
    let function = module
        .add_function("f", ctx.function_type(i32, &[i32, i64], false).unwrap())
        .unwrap();
    let entry = ctx.append_basic_block(function, "entry").unwrap();
    builder.position_at_end(entry).unwrap();
    let a = function.param(0).unwrap();
    let b = function.param(1).unwrap();

    let err = builder.build_add(a, b, "bad").unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Builder));
    let err = builder.build_fadd(a, a, "bad").unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Builder));
    let err = builder.build_binop(Opcode::Ret, a, a, "bad").unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Builder));
    // A non-i1 condition.
    let err = builder.build_cond_br(a, entry, entry).unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Builder));

    assert_eq!(entry.instructions().count(), 0);
}

#[test]
fn comparisons_produce_i1() {
    let ctx = Context::new().unwrap();
    let module = ctx.create_module("m").unwrap();
    let builder = ctx.create_builder().unwrap();
    let i32 = ctx.i32_type().unwrap();
    let float = ctx.float_type().unwrap();
    let function = module
        .add_function("f", ctx.function_type(i32, &[i32, float], false).unwrap())
        .unwrap();
    builder.position_at_end(ctx.append_basic_block(function, "entry").unwrap()).unwrap();
    let n = function.param(0).unwrap();
    let x = function.param(1).unwrap();

    let eq = builder.build_icmp(IntPredicate::Eq, n, n, "eq").unwrap();
    let ord = builder.build_fcmp(RealPredicate::Ord, x, x, "ord").unwrap();
    assert_eq!(eq.type_of().unwrap(), ctx.bool_type().unwrap());
    assert_eq!(ord.type_of().unwrap(), ctx.bool_type().unwrap());
    assert!(builder.build_icmp(IntPredicate::Eq, x, x, "bad").is_err());
    assert!(builder.build_fcmp(RealPredicate::Ord, n, n, "bad").is_err());
}

#[test]
fn unnamed_call_has_empty_name() {
    let ctx = Context::new().unwrap();
    let module = ctx.create_module("m").unwrap();
    let builder = ctx.create_builder().unwrap();
    let i32 = ctx.i32_type().unwrap();
    let callee = module
        .add_function("callee", ctx.function_type(i32, &[i32], false).unwrap())
        .unwrap();
    let caller = module
        .add_function("caller", ctx.function_type(i32, &[], false).unwrap())
        .unwrap();
    builder.position_at_end(ctx.append_basic_block(caller, "entry").unwrap()).unwrap();
    let one = i32.const_int(1, false).unwrap();

    let unnamed = builder.build_call(callee, &[one], None).unwrap();
    let named = builder.build_call(callee, &[one], Some("r")).unwrap();
    assert_eq!(unnamed.name(), "");
    assert_eq!(named.name(), "r");
    assert_eq!(unnamed.kind().unwrap(), ValueKind::Instruction);

    let AnyValue::Instruction(call) = named.classify().unwrap() else {
        panic!("call should be an instruction");
    };
    assert_eq!(call.opcode().unwrap(), Opcode::Call);
    assert_eq!(call.operand_count(), 2);
    assert_eq!(call.operand(0), Some(one));
    assert_eq!(call.operand(1), Some(callee.as_value()));
}

#[test]
fn call_arity_is_checked() {
    let ctx = Context::new().unwrap();
    let module = ctx.create_module("m").unwrap();
    let builder = ctx.create_builder().unwrap();
    let i32 = ctx.i32_type().unwrap();
    let callee = module
        .add_function("callee", ctx.function_type(i32, &[i32], false).unwrap())
        .unwrap();
    builder.position_at_end(ctx.append_basic_block(callee, "entry").unwrap()).unwrap();

    let err = builder.build_call(callee, &[], Some("r")).unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Builder));
}

#[test]
fn disposed_builder_reports_use_after_dispose() {
    let ctx = Context::new().unwrap();
    let mut builder = ctx.create_builder().unwrap();
    builder.dispose().unwrap();

    assert!(!builder.is_valid());
    assert_eq!(
        builder.build_unreachable().unwrap_err(),
        FerruleError::UseAfterDispose { kind: "builder" }
    );
    assert_eq!(
        Disposable::dispose(&mut builder).unwrap_err(),
        FerruleError::DoubleDispose { kind: "builder" }
    );
}

#[test]
fn position_before_inserts_in_the_middle() {
    let ctx = Context::new().unwrap();
    let module = ctx.create_module("m").unwrap();
    let builder = ctx.create_builder().unwrap();
    let i32 = ctx.i32_type().unwrap();
    let function = module
        .add_function("f", ctx.function_type(i32, &[i32], false).unwrap())
        .unwrap();
    let entry = ctx.append_basic_block(function, "entry").unwrap();
    let x = function.param(0).unwrap();

    builder.position_at_end(entry).unwrap();
    let doubled = builder.build_add(x, x, "doubled").unwrap();
    let ret = builder.build_ret(doubled).unwrap();

    builder.position_before(ret).unwrap();
    assert_eq!(builder.insert_block().unwrap(), Some(entry));
    builder.build_mul(x, x, "squared").unwrap();
    let names: Vec<String> = entry.instructions().map(|inst| inst.as_value().name()).collect();
    assert_eq!(names, ["doubled", "squared", ""]);
    module.verify().unwrap();
}

#[test]
fn builder_before_removed_instruction_is_unpositioned() {
    let ctx = Context::new().unwrap();
    let module = ctx.create_module("m").unwrap();
    let builder = ctx.create_builder().unwrap();
    let void = ctx.void_type().unwrap();
    let function = module.add_function("f", ctx.function_type(void, &[], false).unwrap()).unwrap();
    let entry = ctx.append_basic_block(function, "entry").unwrap();
    builder.position_at_end(entry).unwrap();
    let ret = builder.build_ret_void().unwrap();

    builder.position_before(ret).unwrap();
    ret.remove_from_parent().unwrap();
    assert_eq!(builder.insert_block().unwrap(), None);
    let err = builder.build_unreachable().unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Builder));

    let err = builder.position_before(ret).unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Builder));
    builder.position_at_end(entry).unwrap();
    builder.insert(ret, "ignored").unwrap();
    assert_eq!(entry.terminator(), Some(ret));
    assert_eq!(ret.as_value().name(), "");
}

#[test]
fn insert_rejects_instruction_from_another_module() {
    let ctx = Context::new().unwrap();
    let builder = ctx.create_builder().unwrap();
    let void = ctx.void_type().unwrap();
    let fn_ty = ctx.function_type(void, &[], false).unwrap();
    let first = ctx.create_module("first").unwrap();
    let second = ctx.create_module("second").unwrap();
    let source = ctx.append_basic_block(first.add_function("f", fn_ty).unwrap(), "entry").unwrap();
    let target = ctx.append_basic_block(second.add_function("g", fn_ty).unwrap(), "entry").unwrap();

    builder.position_at_end(source).unwrap();
    let ret = builder.build_ret_void().unwrap();
    ret.remove_from_parent().unwrap();

    builder.position_at_end(target).unwrap();
    let err = builder.insert(ret, "").unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Builder));
    assert_eq!(target.first_instruction(), None);
}
