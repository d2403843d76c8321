//! Instruction builder.
//!
//! A builder inserts at the end of the block it is positioned at, or in
//! front of one instruction after `frl_position_builder_before`. Every
//! `frl_build_*` function returns null when the builder has no insertion
//! point or when the operands do not type-check.

use std::ffi::{c_char, c_int, c_uint, CStr};
use std::ptr;

use crate::constants::{atomic_ordering, int_predicate, opcode, real_predicate, type_kind};
use crate::context::{
    frl_int_type_in_context, frl_pointer_type_in_context, frl_void_type_in_context, is_floating,
    is_sized,
};
use crate::ir::{
    block_module, link_instruction, FrlBasicBlock, FrlBuilder, FrlContext, FrlType, FrlValue,
    InstructionData, TypeShape, ValueData,
};
use crate::support::{record_allocation, record_release};

/// # Safety
/// `ctx` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_create_builder_in_context(ctx: *mut FrlContext) -> *mut FrlBuilder {
    record_allocation();
    Box::into_raw(Box::new(FrlBuilder {
        context: ctx,
        block: ptr::null_mut(),
        before: ptr::null_mut(),
    }))
}

/// # Safety
/// `builder` must be live; it is invalid after this call.
#[no_mangle]
pub unsafe extern "C" fn frl_dispose_builder(builder: *mut FrlBuilder) {
    if builder.is_null() {
        return;
    }
    drop(Box::from_raw(builder));
    record_release();
}

/// # Safety
/// Both pointers must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_position_builder_at_end(
    builder: *mut FrlBuilder,
    block: *mut FrlBasicBlock,
) {
    (*builder).block = block;
    (*builder).before = ptr::null_mut();
}

/// Insert in front of `inst` from now on. A detached `inst` leaves the
/// builder unpositioned.
///
/// # Safety
/// Both pointers must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_position_builder_before(
    builder: *mut FrlBuilder,
    inst: *mut FrlValue,
) {
    let block = (*inst).instruction().map_or(ptr::null_mut(), |data| data.block);
    (*builder).block = block;
    (*builder).before = if block.is_null() { ptr::null_mut() } else { inst };
}

/// Block the builder inserts into, null when unpositioned. A builder
/// positioned before an instruction that has since left its block is
/// unpositioned.
///
/// # Safety
/// `builder` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_insert_block(builder: *mut FrlBuilder) -> *mut FrlBasicBlock {
    let before = (*builder).before;
    if !before.is_null() {
        let still_there = (*before)
            .instruction()
            .is_some_and(|data| data.block == (*builder).block);
        if !still_there {
            return ptr::null_mut();
        }
    }
    (*builder).block
}

/// # Safety
/// `builder` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_clear_insertion_position(builder: *mut FrlBuilder) {
    (*builder).block = ptr::null_mut();
    (*builder).before = ptr::null_mut();
}

/// Insert the detached instruction `inst` at the builder's position and
/// name it. Returns `0` when the builder is unpositioned or `inst` is
/// attached, erased, or belongs to another module.
///
/// # Safety
/// Both pointers must be live; `name` must be null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn frl_insert_into_builder_with_name(
    builder: *mut FrlBuilder,
    inst: *mut FrlValue,
    name: *const c_char,
) -> c_int {
    let block = frl_get_insert_block(builder);
    if block.is_null() {
        return 0;
    }
    let module = block_module(block);
    let Some(data) = (*inst).instruction() else {
        return 0;
    };
    if !data.block.is_null() || data.erased || data.module != module {
        return 0;
    }
    (*module).detached.retain(|&detached| detached != inst);
    if (*(*inst).ty).kind != type_kind::VOID {
        (*inst).name = name_or_empty(name).to_owned();
    }
    link_instruction(block, inst, (*builder).before);
    1
}

unsafe fn insert(
    builder: *mut FrlBuilder,
    ty: *mut FrlType,
    mut data: InstructionData,
    name: &CStr,
) -> *mut FrlValue {
    let block = frl_get_insert_block(builder);
    if block.is_null() || ty.is_null() {
        return ptr::null_mut();
    }
    data.module = block_module(block);
    let mut value = FrlValue::new(ty, ValueData::Instruction(data));
    // Void results never carry a name.
    if (*ty).kind != type_kind::VOID {
        value.name = name.to_owned();
    }
    let inst = Box::into_raw(Box::new(value));
    link_instruction(block, inst, (*builder).before);
    inst
}

unsafe fn name_or_empty<'a>(name: *const c_char) -> &'a CStr {
    if name.is_null() {
        c""
    } else {
        CStr::from_ptr(name)
    }
}

unsafe fn void_type(builder: *mut FrlBuilder) -> *mut FrlType {
    frl_void_type_in_context((*builder).context)
}

// ── Terminators ─────────────────────────────────────────────────────────

/// # Safety
/// `builder` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_build_ret_void(builder: *mut FrlBuilder) -> *mut FrlValue {
    insert(builder, void_type(builder), InstructionData::new(opcode::RET), c"")
}

/// # Safety
/// Both pointers must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_build_ret(
    builder: *mut FrlBuilder,
    value: *mut FrlValue,
) -> *mut FrlValue {
    if value.is_null() {
        return ptr::null_mut();
    }
    let mut data = InstructionData::new(opcode::RET);
    data.operands.push(value);
    insert(builder, void_type(builder), data, c"")
}

/// # Safety
/// Both pointers must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_build_br(
    builder: *mut FrlBuilder,
    dest: *mut FrlBasicBlock,
) -> *mut FrlValue {
    if dest.is_null() {
        return ptr::null_mut();
    }
    let mut data = InstructionData::new(opcode::BR);
    data.successors.push(dest);
    insert(builder, void_type(builder), data, c"")
}

/// Conditional branch; `condition` must be an `i1`.
///
/// # Safety
/// All pointers must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_build_cond_br(
    builder: *mut FrlBuilder,
    condition: *mut FrlValue,
    then_block: *mut FrlBasicBlock,
    else_block: *mut FrlBasicBlock,
) -> *mut FrlValue {
    if condition.is_null() || then_block.is_null() || else_block.is_null() {
        return ptr::null_mut();
    }
    if !matches!((*(*condition).ty).shape, TypeShape::Integer(1)) {
        return ptr::null_mut();
    }
    let mut data = InstructionData::new(opcode::BR);
    data.operands.push(condition);
    data.successors.push(then_block);
    data.successors.push(else_block);
    insert(builder, void_type(builder), data, c"")
}

/// # Safety
/// `builder` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_build_unreachable(builder: *mut FrlBuilder) -> *mut FrlValue {
    insert(builder, void_type(builder), InstructionData::new(opcode::UNREACHABLE), c"")
}

// ── Arithmetic and comparison ───────────────────────────────────────────

/// Binary operator `op` (`ADD` through `XOR`).
///
/// Both operands must have the same type; floating opcodes need floating
/// operands and integer opcodes need integer operands.
///
/// # Safety
/// All pointers must be live; `name` must be null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn frl_build_bin_op(
    builder: *mut FrlBuilder,
    op: c_int,
    lhs: *mut FrlValue,
    rhs: *mut FrlValue,
    name: *const c_char,
) -> *mut FrlValue {
    if !(opcode::ADD..=opcode::XOR).contains(&op) || lhs.is_null() || rhs.is_null() {
        return ptr::null_mut();
    }
    let ty = (*lhs).ty;
    if ty != (*rhs).ty {
        return ptr::null_mut();
    }
    let wants_float = matches!(
        op,
        opcode::FADD | opcode::FSUB | opcode::FMUL | opcode::FDIV | opcode::FREM
    );
    let type_ok = if wants_float {
        is_floating(ty)
    } else {
        (*ty).kind == type_kind::INTEGER
    };
    if !type_ok {
        return ptr::null_mut();
    }
    let mut data = InstructionData::new(op);
    data.operands.push(lhs);
    data.operands.push(rhs);
    insert(builder, ty, data, name_or_empty(name))
}

/// Integer comparison producing an `i1`.
///
/// # Safety
/// All pointers must be live; `name` must be null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn frl_build_icmp(
    builder: *mut FrlBuilder,
    predicate: c_int,
    lhs: *mut FrlValue,
    rhs: *mut FrlValue,
    name: *const c_char,
) -> *mut FrlValue {
    if !(int_predicate::EQ..=int_predicate::SLE).contains(&predicate)
        || lhs.is_null()
        || rhs.is_null()
    {
        return ptr::null_mut();
    }
    let ty = (*lhs).ty;
    if ty != (*rhs).ty || !matches!((*ty).kind, type_kind::INTEGER | type_kind::POINTER) {
        return ptr::null_mut();
    }
    let mut data = InstructionData::new(opcode::ICMP);
    data.predicate = predicate;
    data.operands.push(lhs);
    data.operands.push(rhs);
    insert(builder, frl_int_type_in_context((*builder).context, 1), data, name_or_empty(name))
}

/// Floating-point comparison producing an `i1`.
///
/// # Safety
/// All pointers must be live; `name` must be null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn frl_build_fcmp(
    builder: *mut FrlBuilder,
    predicate: c_int,
    lhs: *mut FrlValue,
    rhs: *mut FrlValue,
    name: *const c_char,
) -> *mut FrlValue {
    if !(real_predicate::PREDICATE_FALSE..=real_predicate::PREDICATE_TRUE).contains(&predicate)
        || lhs.is_null()
        || rhs.is_null()
    {
        return ptr::null_mut();
    }
    let ty = (*lhs).ty;
    if ty != (*rhs).ty || !is_floating(ty) {
        return ptr::null_mut();
    }
    let mut data = InstructionData::new(opcode::FCMP);
    data.predicate = predicate;
    data.operands.push(lhs);
    data.operands.push(rhs);
    insert(builder, frl_int_type_in_context((*builder).context, 1), data, name_or_empty(name))
}

// ── Memory ──────────────────────────────────────────────────────────────

/// Stack slot for one `ty`; the result is a pointer.
///
/// # Safety
/// All pointers must be live; `name` must be null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn frl_build_alloca(
    builder: *mut FrlBuilder,
    ty: *mut FrlType,
    name: *const c_char,
) -> *mut FrlValue {
    if ty.is_null() || !is_sized(ty) {
        return ptr::null_mut();
    }
    let mut data = InstructionData::new(opcode::ALLOCA);
    data.aux_type = ty;
    data.alignment = 0;
    insert(builder, frl_pointer_type_in_context((*builder).context, 0), data, name_or_empty(name))
}

/// Load a `ty` from `pointer`.
///
/// # Safety
/// All pointers must be live; `name` must be null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn frl_build_load2(
    builder: *mut FrlBuilder,
    ty: *mut FrlType,
    pointer: *mut FrlValue,
    name: *const c_char,
) -> *mut FrlValue {
    if ty.is_null()
        || pointer.is_null()
        || !is_sized(ty)
        || (*(*pointer).ty).kind != type_kind::POINTER
    {
        return ptr::null_mut();
    }
    let mut data = InstructionData::new(opcode::LOAD);
    data.operands.push(pointer);
    data.alignment = 0;
    data.ordering = atomic_ordering::NOT_ATOMIC;
    insert(builder, ty, data, name_or_empty(name))
}

/// Store `value` to `pointer`.
///
/// # Safety
/// All pointers must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_build_store(
    builder: *mut FrlBuilder,
    value: *mut FrlValue,
    pointer: *mut FrlValue,
) -> *mut FrlValue {
    if value.is_null() || pointer.is_null() || (*(*pointer).ty).kind != type_kind::POINTER {
        return ptr::null_mut();
    }
    let mut data = InstructionData::new(opcode::STORE);
    data.operands.push(value);
    data.operands.push(pointer);
    data.alignment = 0;
    data.ordering = atomic_ordering::NOT_ATOMIC;
    insert(builder, void_type(builder), data, c"")
}

// ── Calls ───────────────────────────────────────────────────────────────

/// Call `callee` of type `function_type` with `count` arguments.
///
/// `name` must be non-null (pass `""` for an unnamed result); a null name
/// is rejected and yields null. Argument count must match the function
/// type unless it is variadic.
///
/// # Safety
/// All pointers must be live; `args` must be valid for `count` values.
#[no_mangle]
pub unsafe extern "C" fn frl_build_call2(
    builder: *mut FrlBuilder,
    function_type: *mut FrlType,
    callee: *mut FrlValue,
    args: *const *mut FrlValue,
    count: c_uint,
    name: *const c_char,
) -> *mut FrlValue {
    if name.is_null() || function_type.is_null() || callee.is_null() {
        return ptr::null_mut();
    }
    let TypeShape::Function { ret, params, vararg } = &(*function_type).shape else {
        return ptr::null_mut();
    };
    let args: &[*mut FrlValue] = if args.is_null() || count == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(args, count as usize)
    };
    let arity_ok = if *vararg {
        args.len() >= params.len()
    } else {
        args.len() == params.len()
    };
    if !arity_ok || args.iter().any(|arg| arg.is_null()) {
        return ptr::null_mut();
    }

    let mut data = InstructionData::new(opcode::CALL);
    data.aux_type = function_type;
    data.operands.extend(args.iter().copied());
    data.operands.push(callee);
    let ret = *ret;
    insert(builder, ret, data, CStr::from_ptr(name))
}

