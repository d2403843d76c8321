//! Type views.

use std::ffi::c_int;
use std::fmt;
use std::marker::PhantomData;
use std::ptr;

use ferrule_native as sys;

use crate::context::Context;
use crate::enums::{NativeEnum, TypeKind};
use crate::error::{FailureKind, FerruleError, Result};
use crate::handle::Handle;
use crate::option::Sentinel;
use crate::values::Value;

/// A type interned in a [`Context`].
///
/// Types are uniqued, so two views compare equal exactly when they name the
/// same type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Type<'ctx> {
    handle: Handle<sys::FrlType>,
    _ctx: PhantomData<&'ctx Context>,
}

impl<'ctx> Type<'ctx> {
    pub(crate) fn from_raw(raw: *mut sys::FrlType) -> Option<Type<'ctx>> {
        Handle::from_raw(raw).map(|handle| Type {
            handle,
            _ctx: PhantomData,
        })
    }

    #[inline]
    pub fn as_ptr(self) -> *mut sys::FrlType {
        self.handle.as_ptr()
    }

    pub fn kind(self) -> Result<TypeKind> {
        TypeKind::from_native(unsafe { sys::frl_get_type_kind(self.as_ptr()) })
    }

    /// Bit width for integer types, `None` otherwise.
    pub fn int_width(self) -> Option<u32> {
        let width = unsafe { sys::frl_get_int_type_width(self.as_ptr()) };
        (width != 0).then_some(width)
    }

    /// Address space for pointer types, `None` otherwise.
    pub fn pointer_address_space(self) -> Option<u32> {
        let raw = unsafe { sys::frl_get_pointer_address_space(self.as_ptr()) };
        let space = c_int::from_native(raw)?;
        u32::try_from(space).ok()
    }

    /// Array of `length` elements of this type.
    pub fn array_type(self, length: u64) -> Result<Type<'ctx>> {
        Type::from_raw(unsafe { sys::frl_array_type2(self.as_ptr(), length) }).ok_or_else(|| {
            FerruleError::external(
                FailureKind::InvalidType,
                format!("{self:?} is not a valid array element"),
            )
        })
    }

    pub fn array_length(self) -> Option<u64> {
        let length = i64::from_native(unsafe { sys::frl_get_array_length2(self.as_ptr()) })?;
        u64::try_from(length).ok()
    }

    pub fn element_type(self) -> Option<Type<'ctx>> {
        Type::from_raw(unsafe { sys::frl_get_element_type(self.as_ptr()) })
    }

    pub fn return_type(self) -> Option<Type<'ctx>> {
        Type::from_raw(unsafe { sys::frl_get_return_type(self.as_ptr()) })
    }

    /// Parameter types of a function type; empty for any other kind.
    pub fn param_types(self) -> Vec<Type<'ctx>> {
        let count = unsafe { sys::frl_count_param_types(self.as_ptr()) };
        let mut raw: Vec<*mut sys::FrlType> = vec![ptr::null_mut(); count as usize];
        unsafe { sys::frl_get_param_types(self.as_ptr(), raw.as_mut_ptr()) };
        raw.into_iter().filter_map(Type::from_raw).collect()
    }

    pub fn param_count(self) -> u32 {
        unsafe { sys::frl_count_param_types(self.as_ptr()) }
    }

    pub fn is_vararg(self) -> bool {
        unsafe { sys::frl_is_function_var_arg(self.as_ptr()) != 0 }
    }

    /// `false` for void, label, function, metadata and token types.
    pub fn is_sized(self) -> bool {
        unsafe { sys::frl_type_is_sized(self.as_ptr()) != 0 }
    }

    /// Integer constant of this type, truncated to the type's width.
    pub fn const_int(self, value: u64, sign_extend: bool) -> Result<Value<'ctx>> {
        let raw = unsafe { sys::frl_const_int(self.as_ptr(), value, c_int::from(sign_extend)) };
        Value::from_raw(raw).ok_or_else(|| {
            FerruleError::external(
                FailureKind::InvalidType,
                format!("{self:?} is not an integer type"),
            )
        })
    }

    pub fn const_real(self, value: f64) -> Result<Value<'ctx>> {
        let raw = unsafe { sys::frl_const_real(self.as_ptr(), value) };
        Value::from_raw(raw).ok_or_else(|| {
            FerruleError::external(
                FailureKind::InvalidType,
                format!("{self:?} is not a floating-point type"),
            )
        })
    }
}

impl fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Ok(TypeKind::Integer) => write!(f, "i{}", self.int_width().unwrap_or_default()),
            Ok(kind) => write!(f, "{kind:?}"),
            Err(_) => write!(f, "Type({:?})", self.handle),
        }
    }
}

#[cfg(test)]
mod tests;
