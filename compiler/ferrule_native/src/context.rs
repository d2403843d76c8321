//! Contexts, types and constants.

use std::ffi::{c_int, c_uint};
use std::ptr;

use crate::constants::type_kind;
use crate::ir::{intern_type, FrlContext, FrlType, FrlValue, TypeKey, TypeShape, ValueData};
use crate::support::{record_allocation, record_release};

// ── Context ─────────────────────────────────────────────────────────────

/// Create a new context. Release with [`frl_context_dispose`].
#[no_mangle]
pub extern "C" fn frl_context_create() -> *mut FrlContext {
    record_allocation();
    Box::into_raw(Box::new(FrlContext::new()))
}

/// Destroy a context with every type and constant created in it.
///
/// # Safety
/// `ctx` must be live and every module created in it already disposed.
#[no_mangle]
pub unsafe extern "C" fn frl_context_dispose(ctx: *mut FrlContext) {
    if ctx.is_null() {
        return;
    }
    drop(Box::from_raw(ctx));
    record_release();
}

// ── Type construction ───────────────────────────────────────────────────

/// # Safety
/// `ctx` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_void_type_in_context(ctx: *mut FrlContext) -> *mut FrlType {
    intern_type(ctx, TypeKey::Simple(type_kind::VOID))
}

/// # Safety
/// `ctx` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_label_type_in_context(ctx: *mut FrlContext) -> *mut FrlType {
    intern_type(ctx, TypeKey::Simple(type_kind::LABEL))
}

/// # Safety
/// `ctx` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_half_type_in_context(ctx: *mut FrlContext) -> *mut FrlType {
    intern_type(ctx, TypeKey::Simple(type_kind::HALF))
}

/// # Safety
/// `ctx` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_float_type_in_context(ctx: *mut FrlContext) -> *mut FrlType {
    intern_type(ctx, TypeKey::Simple(type_kind::FLOAT))
}

/// # Safety
/// `ctx` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_double_type_in_context(ctx: *mut FrlContext) -> *mut FrlType {
    intern_type(ctx, TypeKey::Simple(type_kind::DOUBLE))
}

/// Integer type of `bits` width. Returns null for a zero width.
///
/// # Safety
/// `ctx` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_int_type_in_context(
    ctx: *mut FrlContext,
    bits: c_uint,
) -> *mut FrlType {
    if bits == 0 {
        return ptr::null_mut();
    }
    intern_type(ctx, TypeKey::Integer(bits))
}

/// Opaque pointer type in `address_space`.
///
/// # Safety
/// `ctx` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_pointer_type_in_context(
    ctx: *mut FrlContext,
    address_space: c_uint,
) -> *mut FrlType {
    intern_type(ctx, TypeKey::Pointer(address_space))
}

/// Array of `count` elements of `element`.
///
/// Returns null when `element` cannot be an array element (void, label,
/// function).
///
/// # Safety
/// `element` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_array_type2(element: *mut FrlType, count: u64) -> *mut FrlType {
    if !is_sized(element) {
        return ptr::null_mut();
    }
    intern_type((*element).context, TypeKey::Array(element, count))
}

/// Function type `ret (params...)`.
///
/// # Safety
/// `ret` must be live; `params` must be valid for `count` live types.
#[no_mangle]
pub unsafe extern "C" fn frl_function_type(
    ret: *mut FrlType,
    params: *const *mut FrlType,
    count: c_uint,
    is_vararg: c_int,
) -> *mut FrlType {
    let params = if params.is_null() || count == 0 {
        Vec::new()
    } else {
        std::slice::from_raw_parts(params, count as usize).to_vec()
    };
    intern_type(
        (*ret).context,
        TypeKey::Function(ret, params, is_vararg != 0),
    )
}

// ── Type queries ────────────────────────────────────────────────────────

/// # Safety
/// `ty` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_type_kind(ty: *mut FrlType) -> c_int {
    (*ty).kind
}

/// # Safety
/// `ty` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_type_context(ty: *mut FrlType) -> *mut FrlContext {
    (*ty).context
}

/// Bit width of an integer type, `0` for any other kind.
///
/// # Safety
/// `ty` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_int_type_width(ty: *mut FrlType) -> c_uint {
    match (*ty).shape {
        TypeShape::Integer(bits) => bits,
        _ => 0,
    }
}

/// Address space of a pointer type, `-1` for any other kind.
///
/// # Safety
/// `ty` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_pointer_address_space(ty: *mut FrlType) -> c_int {
    match (*ty).shape {
        TypeShape::Pointer(space) => c_int::try_from(space).unwrap_or(-1),
        _ => -1,
    }
}

/// Element count of an array type, `-1` for any other kind.
///
/// # Safety
/// `ty` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_array_length2(ty: *mut FrlType) -> i64 {
    match (*ty).shape {
        TypeShape::Array { length, .. } => i64::try_from(length).unwrap_or(-1),
        _ => -1,
    }
}

/// Element type of an array, null for any other kind.
///
/// # Safety
/// `ty` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_element_type(ty: *mut FrlType) -> *mut FrlType {
    match (*ty).shape {
        TypeShape::Array { element, .. } => element,
        _ => ptr::null_mut(),
    }
}

/// Return type of a function type, null for any other kind.
///
/// # Safety
/// `ty` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_return_type(ty: *mut FrlType) -> *mut FrlType {
    match (*ty).shape {
        TypeShape::Function { ret, .. } => ret,
        _ => ptr::null_mut(),
    }
}

/// Parameter count of a function type, `0` for any other kind.
///
/// # Safety
/// `ty` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_count_param_types(ty: *mut FrlType) -> c_uint {
    match &(*ty).shape {
        TypeShape::Function { params, .. } => c_uint::try_from(params.len()).unwrap_or(c_uint::MAX),
        _ => 0,
    }
}

/// Copy the parameter types of a function type into `dest`.
///
/// # Safety
/// `ty` must be live; `dest` must have room for
/// [`frl_count_param_types`] entries.
#[no_mangle]
pub unsafe extern "C" fn frl_get_param_types(ty: *mut FrlType, dest: *mut *mut FrlType) {
    if let TypeShape::Function { params, .. } = &(*ty).shape {
        if !dest.is_null() {
            ptr::copy_nonoverlapping(params.as_ptr(), dest, params.len());
        }
    }
}

/// # Safety
/// `ty` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_is_function_var_arg(ty: *mut FrlType) -> c_int {
    match (*ty).shape {
        TypeShape::Function { vararg, .. } => c_int::from(vararg),
        _ => 0,
    }
}

/// # Safety
/// `ty` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_type_is_sized(ty: *mut FrlType) -> c_int {
    c_int::from(is_sized(ty))
}

pub(crate) unsafe fn is_sized(ty: *mut FrlType) -> bool {
    !matches!(
        (*ty).kind,
        type_kind::VOID
            | type_kind::LABEL
            | type_kind::FUNCTION
            | type_kind::METADATA
            | type_kind::TOKEN
    )
}

pub(crate) unsafe fn is_floating(ty: *mut FrlType) -> bool {
    matches!(
        (*ty).kind,
        type_kind::HALF | type_kind::FLOAT | type_kind::DOUBLE | type_kind::BFLOAT
    )
}

// ── Constants ───────────────────────────────────────────────────────────

/// Integer constant of type `ty`. Returns null if `ty` is not an integer type.
///
/// The value is truncated to the type's width, so for widths up to 64 bits
/// `sign_extend` makes no difference: `(i8, 255, 0)` and `(i8, u64::MAX, 1)`
/// name the same constant. Wider types keep the low 64 bits, and
/// `sign_extend` decides whether the bits above are ones.
///
/// # Safety
/// `ty` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_const_int(
    ty: *mut FrlType,
    value: u64,
    sign_extend: c_int,
) -> *mut FrlValue {
    let TypeShape::Integer(width) = (*ty).shape else {
        return ptr::null_mut();
    };
    let (bits, negative) = canonical_int(value, width, sign_extend != 0);
    let ctx = (*ty).context;
    let key = (ty, bits, negative);
    if let Some(&existing) = (*ctx).int_constants.get(&key) {
        return existing;
    }
    let data = ValueData::ConstInt { bits, negative };
    let constant = Box::into_raw(Box::new(FrlValue::new(ty, data)));
    (*ctx).int_constants.insert(key, constant);
    constant
}

/// Low 64 bits, sign-extended from `width` when it is narrower, and whether
/// the constant is negative when read as signed.
fn canonical_int(value: u64, width: u32, sign_extend: bool) -> (u64, bool) {
    let top_bit_set = value >> 63 == 1;
    if width > 64 {
        return (value, sign_extend && top_bit_set);
    }
    if width == 64 {
        return (value, top_bit_set);
    }
    let mask = (1u64 << width) - 1;
    let truncated = value & mask;
    let sign_bit = 1u64 << (width - 1);
    if truncated & sign_bit == 0 {
        (truncated, false)
    } else {
        (truncated | !mask, true)
    }
}

/// Floating-point constant of type `ty`. Returns null for non-float types.
///
/// # Safety
/// `ty` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_const_real(ty: *mut FrlType, value: f64) -> *mut FrlValue {
    if !is_floating(ty) {
        return ptr::null_mut();
    }
    let ctx = (*ty).context;
    let key = (ty, value.to_bits());
    if let Some(&existing) = (*ctx).real_constants.get(&key) {
        return existing;
    }
    let constant = Box::into_raw(Box::new(FrlValue::new(ty, ValueData::ConstReal(value))));
    (*ctx).real_constants.insert(key, constant);
    constant
}

/// Zero-extended value of an integer constant, `0` for any other value.
///
/// # Safety
/// `value` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_const_int_get_zext_value(value: *mut FrlValue) -> u64 {
    match (&(*value).data, &(*(*value).ty).shape) {
        (ValueData::ConstInt { bits, .. }, TypeShape::Integer(width)) if *width < 64 => {
            bits & ((1u64 << width) - 1)
        }
        (ValueData::ConstInt { bits, .. }, _) => *bits,
        _ => 0,
    }
}

/// Value of a floating-point constant, `0.0` for any other value.
///
/// # Safety
/// `value` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_const_real_get_double(value: *mut FrlValue) -> f64 {
    match (*value).data {
        ValueData::ConstReal(real) => real,
        _ => 0.0,
    }
}
