//! Modules and the values that live in them: functions, parameters,
//! globals, basic blocks and instructions.
//!
//! Every `get_first_*` / `get_next_*` / `get_previous_*` accessor returns
//! null past the end of its list.

use std::ffi::{c_char, c_int, c_uint, CStr, CString};
use std::ptr;

use crate::constants::opcode;
use crate::context::frl_pointer_type_in_context;
use crate::ir::{
    find_by_name, free_block, link_global, unlink_instruction, FrlBasicBlock, FrlContext,
    FrlModule, FrlType, FrlValue, FunctionData, GlobalData, InstructionData, TypeShape, ValueData,
};
use crate::support::{record_allocation, record_release};

unsafe fn c_string(name: *const c_char) -> CString {
    if name.is_null() {
        CString::default()
    } else {
        CStr::from_ptr(name).to_owned()
    }
}

unsafe fn c_string_with_len(name: *const c_char, len: usize) -> CString {
    if name.is_null() || len == 0 {
        return CString::default();
    }
    let bytes = std::slice::from_raw_parts(name.cast::<u8>(), len);
    let cleaned: Vec<u8> = bytes.iter().copied().take_while(|&b| b != 0).collect();
    CString::new(cleaned).unwrap_or_default()
}

unsafe fn write_len(out: *mut usize, len: usize) {
    if !out.is_null() {
        *out = len;
    }
}

// ── Modules ─────────────────────────────────────────────────────────────

/// Create an empty module named `name` in `ctx`.
///
/// # Safety
/// `name` must be a valid NUL-terminated string; `ctx` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_module_create_with_name_in_context(
    name: *const c_char,
    ctx: *mut FrlContext,
) -> *mut FrlModule {
    record_allocation();
    Box::into_raw(Box::new(FrlModule {
        context: ctx,
        name: c_string(name),
        first_function: ptr::null_mut(),
        last_function: ptr::null_mut(),
        first_global: ptr::null_mut(),
        last_global: ptr::null_mut(),
        detached: Vec::new(),
    }))
}

/// Destroy a module and everything in it.
///
/// # Safety
/// `module` must be live; it is invalid after this call.
#[no_mangle]
pub unsafe extern "C" fn frl_dispose_module(module: *mut FrlModule) {
    if module.is_null() {
        return;
    }
    drop(Box::from_raw(module));
    record_release();
}

/// # Safety
/// `module` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_module_context(module: *mut FrlModule) -> *mut FrlContext {
    (*module).context
}

/// Module name; the length is written to `len`. Borrowed from the module.
///
/// # Safety
/// `module` must be live; `len` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn frl_get_module_identifier(
    module: *mut FrlModule,
    len: *mut usize,
) -> *const c_char {
    write_len(len, (*module).name.as_bytes().len());
    (*module).name.as_ptr()
}

/// # Safety
/// `module` must be live; `name` must be valid for `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn frl_set_module_identifier(
    module: *mut FrlModule,
    name: *const c_char,
    len: usize,
) {
    (*module).name = c_string_with_len(name, len);
}

// ── Functions ───────────────────────────────────────────────────────────

/// Add a function of type `function_type` to `module`.
///
/// Returns null when `function_type` is not a function type.
///
/// # Safety
/// All pointers must be live; `name` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn frl_add_function(
    module: *mut FrlModule,
    name: *const c_char,
    function_type: *mut FrlType,
) -> *mut FrlValue {
    let TypeShape::Function { params, .. } = &(*function_type).shape else {
        return ptr::null_mut();
    };
    let param_types = params.clone();

    let mut value = FrlValue::new(function_type, ValueData::Function(FunctionData::new(module)));
    value.name = c_string(name);
    let function = Box::into_raw(Box::new(value));

    let args: Vec<*mut FrlValue> = param_types
        .into_iter()
        .enumerate()
        .map(|(index, ty)| {
            let data = ValueData::Argument { function, index };
            Box::into_raw(Box::new(FrlValue::new(ty, data)))
        })
        .collect();
    if let Some(data) = (*function).function_mut() {
        data.params = args;
    }

    let module = &mut *module;
    link_global(&mut module.first_function, &mut module.last_function, function);
    function
}

/// First function named `name`, or null.
///
/// # Safety
/// `module` must be live; `name` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn frl_get_named_function(
    module: *mut FrlModule,
    name: *const c_char,
) -> *mut FrlValue {
    if name.is_null() {
        return ptr::null_mut();
    }
    find_by_name((*module).first_function, CStr::from_ptr(name).to_bytes())
}

/// # Safety
/// `module` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_first_function(module: *mut FrlModule) -> *mut FrlValue {
    (*module).first_function
}

/// # Safety
/// `module` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_last_function(module: *mut FrlModule) -> *mut FrlValue {
    (*module).last_function
}

/// # Safety
/// `function` must be a live function.
#[no_mangle]
pub unsafe extern "C" fn frl_get_next_function(function: *mut FrlValue) -> *mut FrlValue {
    (*function).function().map_or(ptr::null_mut(), |data| data.props.next)
}

/// # Safety
/// `function` must be a live function.
#[no_mangle]
pub unsafe extern "C" fn frl_get_previous_function(function: *mut FrlValue) -> *mut FrlValue {
    (*function).function().map_or(ptr::null_mut(), |data| data.props.prev)
}

/// Module that owns a function or global.
///
/// # Safety
/// `value` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_global_parent(value: *mut FrlValue) -> *mut FrlModule {
    (*value).props().map_or(ptr::null_mut(), |props| props.module)
}

/// # Safety
/// `value` must be a live function or global.
#[no_mangle]
pub unsafe extern "C" fn frl_get_linkage(value: *mut FrlValue) -> c_int {
    (*value).props().map_or(-1, |props| props.linkage)
}

/// Stores `linkage` as given; the constant is not validated.
///
/// # Safety
/// `value` must be a live function or global.
#[no_mangle]
pub unsafe extern "C" fn frl_set_linkage(value: *mut FrlValue, linkage: c_int) {
    if let Some(props) = (*value).props_mut() {
        props.linkage = linkage;
    }
}

/// # Safety
/// `value` must be a live function or global.
#[no_mangle]
pub unsafe extern "C" fn frl_get_visibility(value: *mut FrlValue) -> c_int {
    (*value).props().map_or(-1, |props| props.visibility)
}

/// # Safety
/// `value` must be a live function or global.
#[no_mangle]
pub unsafe extern "C" fn frl_set_visibility(value: *mut FrlValue, visibility: c_int) {
    if let Some(props) = (*value).props_mut() {
        props.visibility = visibility;
    }
}

/// # Safety
/// `function` must be a live function.
#[no_mangle]
pub unsafe extern "C" fn frl_get_function_call_conv(function: *mut FrlValue) -> c_int {
    (*function).function().map_or(-1, |data| data.call_conv)
}

/// # Safety
/// `function` must be a live function.
#[no_mangle]
pub unsafe extern "C" fn frl_set_function_call_conv(function: *mut FrlValue, call_conv: c_int) {
    if let Some(data) = (*function).function_mut() {
        data.call_conv = call_conv;
    }
}

// ── Parameters ──────────────────────────────────────────────────────────

/// # Safety
/// `function` must be a live function.
#[no_mangle]
pub unsafe extern "C" fn frl_count_params(function: *mut FrlValue) -> c_uint {
    (*function)
        .function()
        .map_or(0, |data| c_uint::try_from(data.params.len()).unwrap_or(c_uint::MAX))
}

/// Parameter `index`, or null when out of range.
///
/// # Safety
/// `function` must be a live function.
#[no_mangle]
pub unsafe extern "C" fn frl_get_param(function: *mut FrlValue, index: c_uint) -> *mut FrlValue {
    (*function)
        .function()
        .and_then(|data| data.params.get(index as usize).copied())
        .unwrap_or(ptr::null_mut())
}

/// # Safety
/// `function` must be a live function.
#[no_mangle]
pub unsafe extern "C" fn frl_get_first_param(function: *mut FrlValue) -> *mut FrlValue {
    frl_get_param(function, 0)
}

/// # Safety
/// `function` must be a live function.
#[no_mangle]
pub unsafe extern "C" fn frl_get_last_param(function: *mut FrlValue) -> *mut FrlValue {
    (*function)
        .function()
        .and_then(|data| data.params.last().copied())
        .unwrap_or(ptr::null_mut())
}

/// # Safety
/// `arg` must be a live parameter.
#[no_mangle]
pub unsafe extern "C" fn frl_get_next_param(arg: *mut FrlValue) -> *mut FrlValue {
    match (*arg).data {
        ValueData::Argument { function, index } => (*function)
            .function()
            .and_then(|data| data.params.get(index + 1).copied())
            .unwrap_or(ptr::null_mut()),
        _ => ptr::null_mut(),
    }
}

/// # Safety
/// `arg` must be a live parameter.
#[no_mangle]
pub unsafe extern "C" fn frl_get_previous_param(arg: *mut FrlValue) -> *mut FrlValue {
    match (*arg).data {
        ValueData::Argument { function, index } if index > 0 => (*function)
            .function()
            .and_then(|data| data.params.get(index - 1).copied())
            .unwrap_or(ptr::null_mut()),
        _ => ptr::null_mut(),
    }
}

/// # Safety
/// `arg` must be a live parameter.
#[no_mangle]
pub unsafe extern "C" fn frl_get_param_parent(arg: *mut FrlValue) -> *mut FrlValue {
    match (*arg).data {
        ValueData::Argument { function, .. } => function,
        _ => ptr::null_mut(),
    }
}

// ── Globals ─────────────────────────────────────────────────────────────

/// Add a global variable holding a `ty`. The global itself is a pointer.
///
/// # Safety
/// All pointers must be live; `name` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn frl_add_global(
    module: *mut FrlModule,
    ty: *mut FrlType,
    name: *const c_char,
) -> *mut FrlValue {
    let pointer = frl_pointer_type_in_context((*ty).context, 0);
    let mut value = FrlValue::new(pointer, ValueData::Global(GlobalData::new(module, ty)));
    value.name = c_string(name);
    let global = Box::into_raw(Box::new(value));

    let module = &mut *module;
    link_global(&mut module.first_global, &mut module.last_global, global);
    global
}

/// # Safety
/// `module` must be live; `name` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn frl_get_named_global(
    module: *mut FrlModule,
    name: *const c_char,
) -> *mut FrlValue {
    if name.is_null() {
        return ptr::null_mut();
    }
    find_by_name((*module).first_global, CStr::from_ptr(name).to_bytes())
}

/// # Safety
/// `module` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_first_global(module: *mut FrlModule) -> *mut FrlValue {
    (*module).first_global
}

/// # Safety
/// `module` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_last_global(module: *mut FrlModule) -> *mut FrlValue {
    (*module).last_global
}

/// # Safety
/// `global` must be a live global.
#[no_mangle]
pub unsafe extern "C" fn frl_get_next_global(global: *mut FrlValue) -> *mut FrlValue {
    (*global).global().map_or(ptr::null_mut(), |data| data.props.next)
}

/// # Safety
/// `global` must be a live global.
#[no_mangle]
pub unsafe extern "C" fn frl_get_previous_global(global: *mut FrlValue) -> *mut FrlValue {
    (*global).global().map_or(ptr::null_mut(), |data| data.props.prev)
}

/// Type of the value stored in a global, null for any other value.
///
/// # Safety
/// `global` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_global_get_value_type(global: *mut FrlValue) -> *mut FrlType {
    (*global).global().map_or(ptr::null_mut(), |data| data.value_type)
}

/// Initializer of a global, null when it has none.
///
/// # Safety
/// `global` must be a live global.
#[no_mangle]
pub unsafe extern "C" fn frl_get_initializer(global: *mut FrlValue) -> *mut FrlValue {
    (*global).global().map_or(ptr::null_mut(), |data| data.initializer)
}

/// # Safety
/// `global` must be a live global; `initializer` must be null or live.
#[no_mangle]
pub unsafe extern "C" fn frl_set_initializer(global: *mut FrlValue, initializer: *mut FrlValue) {
    if let Some(data) = (*global).global_mut() {
        data.initializer = initializer;
    }
}

/// # Safety
/// `global` must be a live global.
#[no_mangle]
pub unsafe extern "C" fn frl_is_global_constant(global: *mut FrlValue) -> c_int {
    (*global).global().map_or(0, |data| c_int::from(data.constant))
}

/// # Safety
/// `global` must be a live global.
#[no_mangle]
pub unsafe extern "C" fn frl_set_global_constant(global: *mut FrlValue, is_constant: c_int) {
    if let Some(data) = (*global).global_mut() {
        data.constant = is_constant != 0;
    }
}

/// # Safety
/// `global` must be a live global.
#[no_mangle]
pub unsafe extern "C" fn frl_get_thread_local_mode(global: *mut FrlValue) -> c_int {
    (*global).global().map_or(-1, |data| data.thread_local_mode)
}

/// # Safety
/// `global` must be a live global.
#[no_mangle]
pub unsafe extern "C" fn frl_set_thread_local_mode(global: *mut FrlValue, mode: c_int) {
    if let Some(data) = (*global).global_mut() {
        data.thread_local_mode = mode;
    }
}

// ── Generic values ──────────────────────────────────────────────────────

/// # Safety
/// `value` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_type_of(value: *mut FrlValue) -> *mut FrlType {
    (*value).ty
}

/// # Safety
/// `value` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_value_kind(value: *mut FrlValue) -> c_int {
    (*value).kind()
}

/// Value name (empty when unnamed); the length is written to `len`.
///
/// # Safety
/// `value` must be live; `len` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn frl_get_value_name2(
    value: *mut FrlValue,
    len: *mut usize,
) -> *const c_char {
    write_len(len, (*value).name.as_bytes().len());
    (*value).name.as_ptr()
}

/// # Safety
/// `value` must be live; `name` must be valid for `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn frl_set_value_name2(
    value: *mut FrlValue,
    name: *const c_char,
    len: usize,
) {
    (*value).name = c_string_with_len(name, len);
}

/// # Safety
/// `value` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_is_constant(value: *mut FrlValue) -> c_int {
    c_int::from(matches!(
        (*value).data,
        ValueData::ConstInt { .. }
            | ValueData::ConstReal(_)
            | ValueData::Function(_)
            | ValueData::Global(_)
    ))
}

// ── Basic blocks ────────────────────────────────────────────────────────

/// Append a new basic block to the end of `function`.
///
/// # Safety
/// `function` must be a live function; `name` must be null or a valid
/// NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn frl_append_basic_block_in_context(
    _ctx: *mut FrlContext,
    function: *mut FrlValue,
    name: *const c_char,
) -> *mut FrlBasicBlock {
    let Some(data) = (*function).function_mut() else {
        return ptr::null_mut();
    };
    let block = Box::into_raw(Box::new(FrlBasicBlock {
        name: c_string(name),
        parent: function,
        first: ptr::null_mut(),
        last: ptr::null_mut(),
        next: ptr::null_mut(),
        prev: data.last_block,
    }));
    if data.last_block.is_null() {
        data.first_block = block;
    } else {
        (*data.last_block).next = block;
    }
    data.last_block = block;
    block
}

/// Unlink a block from its function and free it with its instructions.
///
/// # Safety
/// `block` must be live; it is invalid after this call.
#[no_mangle]
pub unsafe extern "C" fn frl_delete_basic_block(block: *mut FrlBasicBlock) {
    let prev = (*block).prev;
    let next = (*block).next;
    if let Some(data) = (*(*block).parent).function_mut() {
        if prev.is_null() {
            data.first_block = next;
        } else {
            (*prev).next = next;
        }
        if next.is_null() {
            data.last_block = prev;
        } else {
            (*next).prev = prev;
        }
    }
    free_block(block);
}

/// # Safety
/// `function` must be a live function.
#[no_mangle]
pub unsafe extern "C" fn frl_count_basic_blocks(function: *mut FrlValue) -> c_uint {
    let mut count: c_uint = 0;
    let mut block = frl_get_first_basic_block(function);
    while !block.is_null() {
        count += 1;
        block = (*block).next;
    }
    count
}

/// # Safety
/// `function` must be a live function.
#[no_mangle]
pub unsafe extern "C" fn frl_get_first_basic_block(function: *mut FrlValue) -> *mut FrlBasicBlock {
    (*function).function().map_or(ptr::null_mut(), |data| data.first_block)
}

/// # Safety
/// `function` must be a live function.
#[no_mangle]
pub unsafe extern "C" fn frl_get_last_basic_block(function: *mut FrlValue) -> *mut FrlBasicBlock {
    (*function).function().map_or(ptr::null_mut(), |data| data.last_block)
}

/// Entry block of a function, null for a declaration.
///
/// # Safety
/// `function` must be a live function.
#[no_mangle]
pub unsafe extern "C" fn frl_get_entry_basic_block(function: *mut FrlValue) -> *mut FrlBasicBlock {
    frl_get_first_basic_block(function)
}

/// # Safety
/// `block` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_next_basic_block(block: *mut FrlBasicBlock) -> *mut FrlBasicBlock {
    (*block).next
}

/// # Safety
/// `block` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_previous_basic_block(
    block: *mut FrlBasicBlock,
) -> *mut FrlBasicBlock {
    (*block).prev
}

/// # Safety
/// `block` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_basic_block_name(block: *mut FrlBasicBlock) -> *const c_char {
    (*block).name.as_ptr()
}

/// # Safety
/// `block` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_basic_block_parent(block: *mut FrlBasicBlock) -> *mut FrlValue {
    (*block).parent
}

/// Last instruction of the block if it is a terminator, otherwise null.
///
/// # Safety
/// `block` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_basic_block_terminator(
    block: *mut FrlBasicBlock,
) -> *mut FrlValue {
    let last = (*block).last;
    if last.is_null() {
        return ptr::null_mut();
    }
    frl_is_a_terminator_inst(last)
}

/// # Safety
/// `block` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_first_instruction(block: *mut FrlBasicBlock) -> *mut FrlValue {
    (*block).first
}

/// # Safety
/// `block` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_last_instruction(block: *mut FrlBasicBlock) -> *mut FrlValue {
    (*block).last
}

// ── Instructions ────────────────────────────────────────────────────────

pub(crate) fn is_terminator_opcode(op: c_int) -> bool {
    matches!(
        op,
        opcode::RET
            | opcode::BR
            | opcode::SWITCH
            | opcode::INDIRECT_BR
            | opcode::INVOKE
            | opcode::UNREACHABLE
            | opcode::CALL_BR
            | opcode::RESUME
            | opcode::CLEANUP_RET
            | opcode::CATCH_RET
            | opcode::CATCH_SWITCH
    )
}

/// # Safety
/// `inst` must be a live instruction.
#[no_mangle]
pub unsafe extern "C" fn frl_get_next_instruction(inst: *mut FrlValue) -> *mut FrlValue {
    (*inst).instruction().map_or(ptr::null_mut(), |data| data.next)
}

/// # Safety
/// `inst` must be a live instruction.
#[no_mangle]
pub unsafe extern "C" fn frl_get_previous_instruction(inst: *mut FrlValue) -> *mut FrlValue {
    (*inst).instruction().map_or(ptr::null_mut(), |data| data.prev)
}

/// Opcode of an instruction, `0` for any other value.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_instruction_opcode(inst: *mut FrlValue) -> c_int {
    (*inst).instruction().map_or(0, |data| data.opcode)
}

/// Block containing an instruction, null when detached.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_instruction_parent(inst: *mut FrlValue) -> *mut FrlBasicBlock {
    (*inst).instruction().map_or(ptr::null_mut(), |data| data.block)
}

/// `inst` itself if it is a terminator, otherwise null.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_is_a_terminator_inst(inst: *mut FrlValue) -> *mut FrlValue {
    match (*inst).instruction() {
        Some(data) if is_terminator_opcode(data.opcode) => inst,
        _ => ptr::null_mut(),
    }
}

/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_num_operands(inst: *mut FrlValue) -> c_int {
    (*inst)
        .instruction()
        .map_or(0, |data| c_int::try_from(data.operands.len()).unwrap_or(c_int::MAX))
}

/// Operand `index`, or null when out of range.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_operand(inst: *mut FrlValue, index: c_uint) -> *mut FrlValue {
    (*inst)
        .instruction()
        .and_then(|data| data.operands.get(index as usize).copied())
        .unwrap_or(ptr::null_mut())
}

/// Successor count of a terminator, `-1` for any other value.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_num_successors(inst: *mut FrlValue) -> c_int {
    match (*inst).instruction() {
        Some(data) if is_terminator_opcode(data.opcode) => {
            c_int::try_from(data.successors.len()).unwrap_or(c_int::MAX)
        }
        _ => -1,
    }
}

/// Successor `index` of a terminator, or null.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_successor(
    inst: *mut FrlValue,
    index: c_uint,
) -> *mut FrlBasicBlock {
    (*inst)
        .instruction()
        .and_then(|data| data.successors.get(index as usize).copied())
        .unwrap_or(ptr::null_mut())
}

/// Alignment of `alloca` / `load` / `store`, `-1` for any other value.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_alignment(inst: *mut FrlValue) -> c_int {
    (*inst).instruction().map_or(-1, |data| data.alignment)
}

/// Ignored for instructions without an alignment.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_set_alignment(inst: *mut FrlValue, bytes: c_uint) {
    if let Some(data) = (*inst).instruction_mut() {
        if data.alignment >= 0 {
            data.alignment = c_int::try_from(bytes).unwrap_or(c_int::MAX);
        }
    }
}

/// Memory ordering of `load` / `store`, `-1` for any other value.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_ordering(inst: *mut FrlValue) -> c_int {
    (*inst).instruction().map_or(-1, |data| data.ordering)
}

/// Ignored for instructions without a memory ordering.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_set_ordering(inst: *mut FrlValue, ordering: c_int) {
    if let Some(data) = (*inst).instruction_mut() {
        if data.ordering >= 0 {
            data.ordering = ordering;
        }
    }
}

/// Predicate of an `icmp`, `-1` for any other value.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_icmp_predicate(inst: *mut FrlValue) -> c_int {
    match (*inst).instruction() {
        Some(data) if data.opcode == opcode::ICMP => data.predicate,
        _ => -1,
    }
}

/// Predicate of an `fcmp`, `-1` for any other value.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_fcmp_predicate(inst: *mut FrlValue) -> c_int {
    match (*inst).instruction() {
        Some(data) if data.opcode == opcode::FCMP => data.predicate,
        _ => -1,
    }
}

/// Point successor `index` of a terminator at `block`. Returns `0` when
/// `index` is out of range.
///
/// # Safety
/// Both pointers must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_set_successor(
    inst: *mut FrlValue,
    index: c_uint,
    block: *mut FrlBasicBlock,
) -> c_int {
    let Some(data) = (*inst).instruction_mut() else {
        return 0;
    };
    match data.successors.get_mut(index as usize) {
        Some(slot) => {
            *slot = block;
            1
        }
        None => 0,
    }
}

// ── Detaching ───────────────────────────────────────────────────────────
//
// Detached instructions stay owned by their module and are freed with it,
// so a pointer to one never dangles while the module is live.

/// Unlink `inst` from its block. It keeps its operands and can be put
/// back with `frl_insert_into_builder_with_name`. Returns `0` when `inst`
/// was not in a block.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_instruction_remove_from_parent(inst: *mut FrlValue) -> c_int {
    let Some(data) = (*inst).instruction() else {
        return 0;
    };
    if data.block.is_null() {
        return 0;
    }
    let module = data.module;
    unlink_instruction(inst);
    (*module).detached.push(inst);
    1
}

/// Unlink `inst` if it is in a block and mark it erased. Returns `0` when
/// it was already erased.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_instruction_erase_from_parent(inst: *mut FrlValue) -> c_int {
    let Some(data) = (*inst).instruction() else {
        return 0;
    };
    if data.erased {
        return 0;
    }
    if !data.block.is_null() {
        frl_instruction_remove_from_parent(inst);
    }
    if let Some(data) = (*inst).instruction_mut() {
        data.erased = true;
    }
    1
}

/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_instruction_is_erased(inst: *mut FrlValue) -> c_int {
    (*inst).instruction().map_or(0, |data| c_int::from(data.erased))
}

/// Detached, unnamed copy of `inst` with the same operands and
/// attributes. Null when `inst` is erased.
///
/// # Safety
/// `inst` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_instruction_clone(inst: *mut FrlValue) -> *mut FrlValue {
    let Some(data) = (*inst).instruction() else {
        return ptr::null_mut();
    };
    if data.erased {
        return ptr::null_mut();
    }
    let copy = InstructionData {
        operands: data.operands.clone(),
        successors: data.successors.clone(),
        alignment: data.alignment,
        ordering: data.ordering,
        predicate: data.predicate,
        aux_type: data.aux_type,
        module: data.module,
        ..InstructionData::new(data.opcode)
    };
    let module = data.module;
    let clone = Box::into_raw(Box::new(FrlValue::new((*inst).ty, ValueData::Instruction(copy))));
    (*module).detached.push(clone);
    clone
}
