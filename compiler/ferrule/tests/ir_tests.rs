//! Building, verifying and printing modules through the typed object model.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use ferrule::{Context, FailureKind, FerruleError, GlobalObject, Linkage, Module, Opcode, OptionExt};
use pretty_assertions::assert_eq;

/// `@limit`, `i32 @square(i32 %x)` and `i32 @main()` calling `square(5)`.
fn build_demo<'ctx>(ctx: &'ctx Context) -> Module<'ctx> {
    let module = ctx.create_module("demo").unwrap();
    let builder = ctx.create_builder().unwrap();
    let i32 = ctx.i32_type().unwrap();
    let i64 = ctx.i64_type().unwrap();

    let limit = module.add_global(i64, "limit").unwrap();
    limit.set_initializer(Some(i64.const_int(7, false).unwrap()));
    limit.set_constant(true);

    let square = module
        .add_function("square", ctx.function_type(i32, &[i32], false).unwrap())
        .unwrap();
    let x = square.param(0).unwrap();
    x.set_name("x").unwrap();
    builder.position_at_end(ctx.append_basic_block(square, "entry").unwrap()).unwrap();
    let sq = builder.build_mul(x, x, "sq").unwrap();
    builder.build_ret(sq).unwrap();

    let main = module.add_function("main", ctx.function_type(i32, &[], false).unwrap()).unwrap();
    builder.position_at_end(ctx.append_basic_block(main, "entry").unwrap()).unwrap();
    let five = i32.const_int(5, false).unwrap();
    let result = builder.build_call(square, &[five], None).unwrap();
    builder.build_ret(result).unwrap();

    module
}

#[test]
fn verified_module_prints_its_definitions() {
    let ctx = Context::new().unwrap();
    let module = build_demo(&ctx);
    module.verify().unwrap();

    let mut text = module.print_to_string().unwrap();
    assert_eq!(
        text.get_string().unwrap(),
        "; ModuleID = 'demo'\n\
         \n\
         @limit = constant i64 7\n\
         \n\
         define i32 @square(i32 %x) {\n\
         entry:\n  \
         %sq = mul i32 %x, %x\n  \
         ret i32 %sq\n\
         }\n\
         \n\
         define i32 @main() {\n\
         entry:\n  \
         %0 = call i32 @square(i32 5)\n  \
         ret i32 %0\n\
         }\n"
    );
    text.dispose().unwrap();
}

#[test]
fn missing_terminator_fails_verification() {
    let ctx = Context::new().unwrap();
    let module = ctx.create_module("broken").unwrap();
    let void = ctx.void_type().unwrap();
    let function = module
        .add_function("open_ended", ctx.function_type(void, &[], false).unwrap())
        .unwrap();
    ctx.append_basic_block(function, "entry").unwrap();

    let err = module.verify().unwrap_err();
    let FerruleError::External(failure) = &err else {
        panic!("expected an external failure, got {err:?}");
    };
    assert_eq!(failure.kind, FailureKind::Verification);
    assert!(
        failure.message.contains("'open_ended' does not have terminator"),
        "{}",
        failure.message
    );
}

#[test]
fn module_lists_functions_and_globals() {
    let ctx = Context::new().unwrap();
    let module = build_demo(&ctx);

    let functions: Vec<String> = module.functions().unwrap().map(|f| f.name()).collect();
    assert_eq!(functions, ["square", "main"]);
    let globals: Vec<String> = module.globals().unwrap().map(|g| g.name()).collect();
    assert_eq!(globals, ["limit"]);

    let square = module.get_function("square").unwrap().get().unwrap();
    assert_eq!(square.linkage().unwrap(), Linkage::External);
    assert_eq!(square.parent_module_name().as_deref(), Some("demo"));
    assert!(module.get_function("cube").unwrap().is_empty());
    assert!(module.get_global("limit").unwrap().is_defined());
    let missing = module.get_global("nope").unwrap();
    assert_eq!(missing.get().unwrap_err(), FerruleError::EmptyOptionAccess);
}

#[test]
fn call_instruction_shape() {
    let ctx = Context::new().unwrap();
    let module = build_demo(&ctx);
    let main = module.get_function("main").unwrap().get().unwrap();
    let entry = main.entry_block().unwrap();

    let call = entry.first_instruction().unwrap();
    assert_eq!(call.opcode().unwrap(), Opcode::Call);
    assert_eq!(call.as_value().name(), "");
    assert_eq!(call.operand(0).unwrap().const_int_value(), Some(5));
    let terminator = entry.terminator().unwrap();
    assert_eq!(terminator.opcode().unwrap(), Opcode::Ret);
    assert_eq!(terminator.operand(0), Some(call.as_value()));
}

#[test]
fn module_name_round_trips() {
    let ctx = Context::new().unwrap();
    let module = ctx.create_module("before").unwrap();
    assert_eq!(module.name().unwrap(), "before");
    module.set_name("after").unwrap();
    assert_eq!(module.name().unwrap(), "after");
}

#[test]
fn non_function_type_cannot_be_declared() {
    let ctx = Context::new().unwrap();
    let module = ctx.create_module("m").unwrap();
    let err = module.add_function("f", ctx.i32_type().unwrap()).unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::InvalidType));
    assert_eq!(module.functions().unwrap().count(), 0);
}

#[test]
fn disposed_module_rejects_queries() {
    let ctx = Context::new().unwrap();
    let mut module = build_demo(&ctx);
    module.dispose().unwrap();

    let expected = FerruleError::UseAfterDispose { kind: "module" };
    assert_eq!(module.verify().unwrap_err(), expected);
    assert_eq!(module.name().unwrap_err(), expected);
    assert_eq!(module.functions().unwrap_err(), expected);
    assert_eq!(module.dispose().unwrap_err(), FerruleError::DoubleDispose { kind: "module" });
}
