//! The root of every object graph.

use std::ffi::{c_uint, CString};

use ferrule_native as sys;
use tracing::instrument;

use crate::builder::Builder;
use crate::error::{FailureKind, FerruleError, Result};
use crate::module::Module;
use crate::owned::{impl_disposable, NativeResource, Owned};
use crate::types::Type;
use crate::values::{BasicBlock, Function};

enum ContextResource {}

impl NativeResource for ContextResource {
    type Raw = sys::FrlContext;
    const KIND: &'static str = "context";

    unsafe fn release(raw: *mut sys::FrlContext) {
        sys::frl_context_dispose(raw);
    }
}

/// Owns every type and constant created through it.
///
/// Modules, builders and views borrow the context, so it cannot be disposed
/// or dropped while any of them exists.
#[derive(Debug)]
pub struct Context {
    owned: Owned<ContextResource>,
}

impl Context {
    pub fn new() -> Result<Context> {
        let raw = sys::frl_context_create();
        Ok(Context {
            owned: unsafe { Owned::acquire(raw)? },
        })
    }

    pub(crate) fn as_ptr(&self) -> Result<*mut sys::FrlContext> {
        self.owned.as_ptr()
    }

    fn interned(
        &self,
        make: unsafe extern "C" fn(*mut sys::FrlContext) -> *mut sys::FrlType,
    ) -> Result<Type<'_>> {
        let ctx = self.as_ptr()?;
        Type::from_raw(unsafe { make(ctx) }).ok_or_else(|| {
            FerruleError::external(FailureKind::InvalidType, "native type lookup returned null")
        })
    }

    // ── Types ───────────────────────────────────────────────────────────

    pub fn void_type(&self) -> Result<Type<'_>> {
        self.interned(sys::frl_void_type_in_context)
    }

    pub fn label_type(&self) -> Result<Type<'_>> {
        self.interned(sys::frl_label_type_in_context)
    }

    pub fn half_type(&self) -> Result<Type<'_>> {
        self.interned(sys::frl_half_type_in_context)
    }

    pub fn float_type(&self) -> Result<Type<'_>> {
        self.interned(sys::frl_float_type_in_context)
    }

    pub fn double_type(&self) -> Result<Type<'_>> {
        self.interned(sys::frl_double_type_in_context)
    }

    /// Integer type of `bits` width. Zero is an [`FailureKind::InvalidType`]
    /// failure.
    pub fn int_type(&self, bits: u32) -> Result<Type<'_>> {
        let ctx = self.as_ptr()?;
        Type::from_raw(unsafe { sys::frl_int_type_in_context(ctx, bits) }).ok_or_else(|| {
            FerruleError::external(
                FailureKind::InvalidType,
                format!("invalid integer width {bits}"),
            )
        })
    }

    pub fn bool_type(&self) -> Result<Type<'_>> {
        self.int_type(1)
    }

    pub fn i8_type(&self) -> Result<Type<'_>> {
        self.int_type(8)
    }

    pub fn i16_type(&self) -> Result<Type<'_>> {
        self.int_type(16)
    }

    pub fn i32_type(&self) -> Result<Type<'_>> {
        self.int_type(32)
    }

    pub fn i64_type(&self) -> Result<Type<'_>> {
        self.int_type(64)
    }

    /// Opaque pointer in `address_space`.
    pub fn pointer_type(&self, address_space: u32) -> Result<Type<'_>> {
        let ctx = self.as_ptr()?;
        let raw = unsafe { sys::frl_pointer_type_in_context(ctx, address_space) };
        Type::from_raw(raw).ok_or_else(|| {
            FerruleError::external(
                FailureKind::InvalidType,
                "native pointer type lookup returned null",
            )
        })
    }

    /// Function type `ret (params...)`.
    pub fn function_type<'ctx>(
        &'ctx self,
        ret: Type<'ctx>,
        params: &[Type<'ctx>],
        is_vararg: bool,
    ) -> Result<Type<'ctx>> {
        self.as_ptr()?;
        let raw_params: Vec<*mut sys::FrlType> = params.iter().map(|ty| ty.as_ptr()).collect();
        let count = c_uint::try_from(raw_params.len())
            .map_err(|_| FerruleError::external(FailureKind::InvalidType, "too many parameters"))?;
        let vararg = i32::from(is_vararg);
        let raw =
            unsafe { sys::frl_function_type(ret.as_ptr(), raw_params.as_ptr(), count, vararg) };
        Type::from_raw(raw).ok_or_else(|| {
            FerruleError::external(
                FailureKind::InvalidType,
                "native function type lookup returned null",
            )
        })
    }

    // ── Children ────────────────────────────────────────────────────────

    #[instrument(level = "debug", skip(self))]
    pub fn create_module(&self, name: &str) -> Result<Module<'_>> {
        let ctx = self.as_ptr()?;
        let name = CString::new(name)?;
        let raw = unsafe { sys::frl_module_create_with_name_in_context(name.as_ptr(), ctx) };
        unsafe { Module::from_raw(raw) }
    }

    pub fn create_builder(&self) -> Result<Builder<'_>> {
        let ctx = self.as_ptr()?;
        let raw = unsafe { sys::frl_create_builder_in_context(ctx) };
        unsafe { Builder::from_raw(raw) }
    }

    /// Append a new, empty basic block to `function`.
    pub fn append_basic_block<'ctx>(
        &'ctx self,
        function: Function<'ctx>,
        name: &str,
    ) -> Result<BasicBlock<'ctx>> {
        let ctx = self.as_ptr()?;
        let name = CString::new(name)?;
        let raw = unsafe {
            sys::frl_append_basic_block_in_context(ctx, function.as_ptr(), name.as_ptr())
        };
        BasicBlock::from_raw(raw).ok_or_else(|| {
            FerruleError::external(
                FailureKind::InvalidType,
                "basic blocks can only be appended to functions",
            )
        })
    }

    pub fn dispose(&mut self) -> Result<()> {
        self.owned.dispose()
    }

    pub fn is_valid(&self) -> bool {
        self.owned.is_valid()
    }
}

impl_disposable!(Context, owned);
