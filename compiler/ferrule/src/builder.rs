//! Instruction builder.

use std::ffi::{c_uint, CString};
use std::marker::PhantomData;

use ferrule_native as sys;
use tracing::trace;

use crate::context::Context;
use crate::enums::{IntPredicate, NativeEnum, Opcode, RealPredicate};
use crate::error::{FailureKind, FerruleError, Result};
use crate::owned::{impl_disposable, NativeResource, Owned};
use crate::types::Type;
use crate::values::{BasicBlock, Function, Instruction, Value};

enum BuilderResource {}

impl NativeResource for BuilderResource {
    type Raw = sys::FrlBuilder;
    const KIND: &'static str = "builder";

    unsafe fn release(raw: *mut sys::FrlBuilder) {
        sys::frl_dispose_builder(raw);
    }
}

/// Inserts instructions at the end of a basic block or in front of a
/// chosen instruction.
///
/// Every `build_*` method fails with [`FailureKind::Builder`] when the
/// builder has no insertion point or the native library rejects the
/// operands; no partial instruction is left behind.
#[derive(Debug)]
pub struct Builder<'ctx> {
    owned: Owned<BuilderResource>,
    _ctx: PhantomData<&'ctx Context>,
}

impl<'ctx> Builder<'ctx> {
    /// # Safety
    /// `raw` must be null or a freshly created builder that nothing else
    /// will dispose.
    pub(crate) unsafe fn from_raw(raw: *mut sys::FrlBuilder) -> Result<Builder<'ctx>> {
        Ok(Builder {
            owned: Owned::acquire(raw)?,
            _ctx: PhantomData,
        })
    }

    pub fn position_at_end(&self, block: BasicBlock<'ctx>) -> Result<()> {
        let raw = self.owned.as_ptr()?;
        unsafe { sys::frl_position_builder_at_end(raw, block.as_ptr()) };
        Ok(())
    }

    /// Insert in front of `inst` from now on. If `inst` later leaves its
    /// block the builder becomes unpositioned.
    pub fn position_before(&self, inst: Instruction<'ctx>) -> Result<()> {
        let raw = self.owned.as_ptr()?;
        if inst.parent().is_none() {
            return Err(FerruleError::external(
                FailureKind::Builder,
                "instruction is not in a block",
            ));
        }
        unsafe { sys::frl_position_builder_before(raw, inst.as_ptr()) };
        Ok(())
    }

    /// Put a detached instruction, one that was removed or cloned, back at
    /// the insertion point under `name`.
    pub fn insert(&self, inst: Instruction<'ctx>, name: &str) -> Result<()> {
        if inst.is_erased() {
            return Err(FerruleError::UseAfterDispose { kind: "instruction" });
        }
        let raw = self.positioned()?;
        let c_name = CString::new(name)?;
        let inserted =
            unsafe { sys::frl_insert_into_builder_with_name(raw, inst.as_ptr(), c_name.as_ptr()) };
        if inserted == 0 {
            return Err(FerruleError::external(
                FailureKind::Builder,
                "instruction is already in a block or belongs to another module",
            ));
        }
        trace!(name, "inserted instruction");
        Ok(())
    }

    /// Block new instructions go to, `None` when unpositioned.
    pub fn insert_block(&self) -> Result<Option<BasicBlock<'ctx>>> {
        let raw = self.owned.as_ptr()?;
        Ok(BasicBlock::from_raw(unsafe { sys::frl_get_insert_block(raw) }))
    }

    pub fn clear_insertion_position(&self) -> Result<()> {
        let raw = self.owned.as_ptr()?;
        unsafe { sys::frl_clear_insertion_position(raw) };
        Ok(())
    }

    fn positioned(&self) -> Result<*mut sys::FrlBuilder> {
        let raw = self.owned.as_ptr()?;
        if unsafe { sys::frl_get_insert_block(raw) }.is_null() {
            return Err(FerruleError::external(
                FailureKind::Builder,
                "builder has no insertion point",
            ));
        }
        Ok(raw)
    }

    // ── Terminators ─────────────────────────────────────────────────────

    pub fn build_ret_void(&self) -> Result<Instruction<'ctx>> {
        let raw = self.positioned()?;
        instruction(unsafe { sys::frl_build_ret_void(raw) }, "ret void")
    }

    pub fn build_ret(&self, value: Value<'ctx>) -> Result<Instruction<'ctx>> {
        let raw = self.positioned()?;
        instruction(unsafe { sys::frl_build_ret(raw, value.as_ptr()) }, "ret")
    }

    pub fn build_br(&self, dest: BasicBlock<'ctx>) -> Result<Instruction<'ctx>> {
        let raw = self.positioned()?;
        instruction(unsafe { sys::frl_build_br(raw, dest.as_ptr()) }, "br")
    }

    /// `condition` must be an `i1`.
    pub fn build_cond_br(
        &self,
        condition: Value<'ctx>,
        then_block: BasicBlock<'ctx>,
        else_block: BasicBlock<'ctx>,
    ) -> Result<Instruction<'ctx>> {
        let raw = self.positioned()?;
        let inst = unsafe {
            sys::frl_build_cond_br(
                raw,
                condition.as_ptr(),
                then_block.as_ptr(),
                else_block.as_ptr(),
            )
        };
        instruction(inst, "conditional br")
    }

    pub fn build_unreachable(&self) -> Result<Instruction<'ctx>> {
        let raw = self.positioned()?;
        instruction(unsafe { sys::frl_build_unreachable(raw) }, "unreachable")
    }

    // ── Arithmetic ──────────────────────────────────────────────────────

    /// Any two-operand arithmetic or bitwise instruction. Both operands must
    /// have the same type, floating-point for the `F*` opcodes and integer
    /// otherwise.
    pub fn build_binop(
        &self,
        op: Opcode,
        lhs: Value<'ctx>,
        rhs: Value<'ctx>,
        name: &str,
    ) -> Result<Value<'ctx>> {
        if !op.is_binary_operator() {
            return Err(FerruleError::external(
                FailureKind::Builder,
                format!("{op:?} is not a binary operator"),
            ));
        }
        let raw = self.positioned()?;
        let name = CString::new(name)?;
        let inst = unsafe {
            sys::frl_build_bin_op(raw, op.to_native(), lhs.as_ptr(), rhs.as_ptr(), name.as_ptr())
        };
        value(inst, "binary operator")
    }

    pub fn build_add(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> Result<Value<'ctx>> {
        self.build_binop(Opcode::Add, lhs, rhs, name)
    }

    pub fn build_sub(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> Result<Value<'ctx>> {
        self.build_binop(Opcode::Sub, lhs, rhs, name)
    }

    pub fn build_mul(&self, lhs: Value<'ctx>, rhs: Value<'ctx>, name: &str) -> Result<Value<'ctx>> {
        self.build_binop(Opcode::Mul, lhs, rhs, name)
    }

    pub fn build_fadd(
        &self,
        lhs: Value<'ctx>,
        rhs: Value<'ctx>,
        name: &str,
    ) -> Result<Value<'ctx>> {
        self.build_binop(Opcode::FAdd, lhs, rhs, name)
    }

    // ── Comparisons ─────────────────────────────────────────────────────

    pub fn build_icmp(
        &self,
        predicate: IntPredicate,
        lhs: Value<'ctx>,
        rhs: Value<'ctx>,
        name: &str,
    ) -> Result<Value<'ctx>> {
        let raw = self.positioned()?;
        let name = CString::new(name)?;
        let predicate = predicate.to_native();
        let inst = unsafe {
            sys::frl_build_icmp(raw, predicate, lhs.as_ptr(), rhs.as_ptr(), name.as_ptr())
        };
        value(inst, "icmp")
    }

    pub fn build_fcmp(
        &self,
        predicate: RealPredicate,
        lhs: Value<'ctx>,
        rhs: Value<'ctx>,
        name: &str,
    ) -> Result<Value<'ctx>> {
        let raw = self.positioned()?;
        let name = CString::new(name)?;
        let predicate = predicate.to_native();
        let inst = unsafe {
            sys::frl_build_fcmp(raw, predicate, lhs.as_ptr(), rhs.as_ptr(), name.as_ptr())
        };
        value(inst, "fcmp")
    }

    // ── Memory ──────────────────────────────────────────────────────────

    /// Stack slot for one `ty`. The result is a pointer.
    pub fn build_alloca(&self, ty: Type<'ctx>, name: &str) -> Result<Value<'ctx>> {
        let raw = self.positioned()?;
        let name = CString::new(name)?;
        value(unsafe { sys::frl_build_alloca(raw, ty.as_ptr(), name.as_ptr()) }, "alloca")
    }

    pub fn build_load(
        &self,
        ty: Type<'ctx>,
        pointer: Value<'ctx>,
        name: &str,
    ) -> Result<Value<'ctx>> {
        let raw = self.positioned()?;
        let name = CString::new(name)?;
        let inst =
            unsafe { sys::frl_build_load2(raw, ty.as_ptr(), pointer.as_ptr(), name.as_ptr()) };
        value(inst, "load")
    }

    pub fn build_store(
        &self,
        value: Value<'ctx>,
        pointer: Value<'ctx>,
    ) -> Result<Instruction<'ctx>> {
        let raw = self.positioned()?;
        instruction(unsafe { sys::frl_build_store(raw, value.as_ptr(), pointer.as_ptr()) }, "store")
    }

    // ── Calls ───────────────────────────────────────────────────────────

    /// Call `callee` with `args`.
    ///
    /// With `name` of `None` the result is unnamed. The native call does not
    /// accept a null name, so an empty one is passed instead.
    pub fn build_call(
        &self,
        callee: Function<'ctx>,
        args: &[Value<'ctx>],
        name: Option<&str>,
    ) -> Result<Value<'ctx>> {
        let raw = self.positioned()?;
        let function_type = callee.function_type()?;
        let name = CString::new(name.unwrap_or_default())?;
        let raw_args: Vec<*mut sys::FrlValue> = args.iter().map(|arg| arg.as_ptr()).collect();
        let count = c_uint::try_from(raw_args.len())
            .map_err(|_| FerruleError::external(FailureKind::Builder, "too many call arguments"))?;
        trace!(callee = %callee.name(), args = count, "building call");
        let inst = unsafe {
            sys::frl_build_call2(
                raw,
                function_type.as_ptr(),
                callee.as_ptr(),
                raw_args.as_ptr(),
                count,
                name.as_ptr(),
            )
        };
        value(inst, "call")
    }

    pub fn dispose(&mut self) -> Result<()> {
        self.owned.dispose()
    }

    pub fn is_valid(&self) -> bool {
        self.owned.is_valid()
    }
}

impl_disposable!(Builder<'ctx>, owned);

fn rejected(what: &str) -> FerruleError {
    FerruleError::external(
        FailureKind::Builder,
        format!("native builder rejected the operands of {what}"),
    )
}

fn value<'ctx>(raw: *mut sys::FrlValue, what: &str) -> Result<Value<'ctx>> {
    Value::from_raw(raw).ok_or_else(|| rejected(what))
}

fn instruction<'ctx>(raw: *mut sys::FrlValue, what: &str) -> Result<Instruction<'ctx>> {
    Instruction::from_raw(raw).ok_or_else(|| rejected(what))
}

#[cfg(test)]
mod tests;
