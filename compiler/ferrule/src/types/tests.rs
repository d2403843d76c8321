#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use crate::context::Context;
use crate::enums::{TypeKind, ValueKind};
use crate::error::FailureKind;

#[test]
fn types_are_uniqued_per_context() {
    let ctx = Context::new().unwrap();
    assert_eq!(ctx.i32_type().unwrap(), ctx.int_type(32).unwrap());
    assert_ne!(ctx.i32_type().unwrap(), ctx.i64_type().unwrap());
    assert_eq!(ctx.pointer_type(0).unwrap(), ctx.pointer_type(0).unwrap());
}

#[test]
fn integer_queries() {
    let ctx = Context::new().unwrap();
    let i16 = ctx.i16_type().unwrap();
    assert_eq!(i16.kind().unwrap(), TypeKind::Integer);
    assert_eq!(i16.int_width(), Some(16));
    assert_eq!(ctx.bool_type().unwrap().int_width(), Some(1));
    assert_eq!(ctx.double_type().unwrap().int_width(), None);
}

#[test]
fn zero_width_integer_is_rejected() {
    let ctx = Context::new().unwrap();
    let err = ctx.int_type(0).unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::InvalidType));
}

#[test]
fn sentinel_queries_are_none_for_other_kinds() {
    let ctx = Context::new().unwrap();
    let float = ctx.float_type().unwrap();
    assert_eq!(float.pointer_address_space(), None);
    assert_eq!(float.array_length(), None);
    assert_eq!(float.element_type(), None);
    assert_eq!(float.return_type(), None);
    assert!(float.param_types().is_empty());
    assert!(!float.is_vararg());
    assert_eq!(ctx.pointer_type(3).unwrap().pointer_address_space(), Some(3));
}

#[test]
fn array_types() {
    let ctx = Context::new().unwrap();
    let i8 = ctx.i8_type().unwrap();
    let array = i8.array_type(12).unwrap();
    assert_eq!(array.kind().unwrap(), TypeKind::Array);
    assert_eq!(array.array_length(), Some(12));
    assert_eq!(array.element_type(), Some(i8));
    assert!(array.is_sized());

    let void = ctx.void_type().unwrap();
    assert!(!void.is_sized());
    let err = void.array_type(2).unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::InvalidType));
}

#[test]
fn function_types() {
    let ctx = Context::new().unwrap();
    let i32 = ctx.i32_type().unwrap();
    let ptr = ctx.pointer_type(0).unwrap();
    let fn_ty = ctx.function_type(i32, &[ptr, i32], true).unwrap();

    assert_eq!(fn_ty.kind().unwrap(), TypeKind::Function);
    assert_eq!(fn_ty.return_type(), Some(i32));
    assert_eq!(fn_ty.param_types(), vec![ptr, i32]);
    assert_eq!(fn_ty.param_count(), 2);
    assert!(fn_ty.is_vararg());
    assert!(!fn_ty.is_sized());
}

#[test]
fn integer_constants() {
    let ctx = Context::new().unwrap();
    let i8 = ctx.i8_type().unwrap();

    let wrapped = i8.const_int(300, false).unwrap();
    assert_eq!(wrapped.const_int_value(), Some(300 & 0xff));
    assert_eq!(wrapped.kind().unwrap(), ValueKind::ConstantInt);
    assert!(wrapped.is_constant());

    let minus_one = i8.const_int(u64::MAX, true).unwrap();
    assert_eq!(minus_one.const_int_value(), Some(0xff));
    assert_eq!(minus_one.const_real_value(), None);

    let err = ctx.float_type().unwrap().const_int(1, false).unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::InvalidType));
}

#[test]
fn integer_constants_are_uniqued_by_bit_pattern() {
    let ctx = Context::new().unwrap();
    let i8 = ctx.i8_type().unwrap();
    assert_eq!(i8.const_int(255, false).unwrap(), i8.const_int(u64::MAX, true).unwrap());
    assert_eq!(i8.const_int(7, false).unwrap(), i8.const_int(7, true).unwrap());
    assert_ne!(i8.const_int(7, false).unwrap(), i8.const_int(8, false).unwrap());

    let module = ctx.create_module("m").unwrap();
    let zext = i8.const_int(255, false).unwrap();
    let sext = i8.const_int(u64::MAX, true).unwrap();
    module.add_global(i8, "a").unwrap().set_initializer(Some(zext));
    module.add_global(i8, "b").unwrap().set_initializer(Some(sext));
    let text = module.print_to_string().unwrap().get_string().unwrap();
    assert!(text.contains("@a = global i8 -1\n@b = global i8 -1\n"), "{text}");
}

#[test]
fn real_constants() {
    let ctx = Context::new().unwrap();
    let double = ctx.double_type().unwrap();
    let half = double.const_real(0.5).unwrap();
    assert_eq!(half.const_real_value(), Some(0.5));
    assert_eq!(half.const_int_value(), None);
    assert_eq!(half.type_of().unwrap(), double);

    assert!(ctx.i32_type().unwrap().const_real(0.5).is_err());
}

#[test]
fn debug_names_the_type() {
    let ctx = Context::new().unwrap();
    assert_eq!(format!("{:?}", ctx.i64_type().unwrap()), "i64");
    assert_eq!(format!("{:?}", ctx.void_type().unwrap()), "Void");
}
