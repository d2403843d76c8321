//! Non-owning views over values, functions, globals, blocks and
//! instructions.
//!
//! Every view is a `Copy` handle tied to its [`Context`] by the `'ctx`
//! lifetime. Views of module contents stay valid only while their
//! [`Module`](crate::Module) has not been disposed; the binding does not
//! track that.

use std::ffi::{c_int, CStr, CString};
use std::fmt;
use std::marker::PhantomData;

use ferrule_native as sys;

use crate::context::Context;
use crate::enums::{
    AtomicOrdering, CallConvention, IntPredicate, Linkage, NativeEnum, Opcode, RealPredicate,
    ThreadLocalMode, ValueKind, Visibility,
};
use crate::error::{FailureKind, FerruleError, Result};
use crate::handle::Handle;
use crate::iter::PointerIter;
use crate::option::{OptionExt, Sentinel};
use crate::types::Type;

// ── Value ───────────────────────────────────────────────────────────────

/// Any value: constant, argument, global or instruction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Value<'ctx> {
    handle: Handle<sys::FrlValue>,
    _ctx: PhantomData<&'ctx Context>,
}

impl<'ctx> Value<'ctx> {
    pub(crate) fn from_raw(raw: *mut sys::FrlValue) -> Option<Value<'ctx>> {
        Handle::from_raw(raw).map(Value::from_handle)
    }

    pub(crate) fn from_handle(handle: Handle<sys::FrlValue>) -> Value<'ctx> {
        Value {
            handle,
            _ctx: PhantomData,
        }
    }

    #[inline]
    pub fn as_ptr(self) -> *mut sys::FrlValue {
        self.handle.as_ptr()
    }

    /// Empty for unnamed values.
    pub fn name(self) -> String {
        let mut len = 0usize;
        unsafe {
            let start = sys::frl_get_value_name2(self.as_ptr(), &mut len);
            let bytes = std::slice::from_raw_parts(start.cast::<u8>(), len);
            String::from_utf8_lossy(bytes).into_owned()
        }
    }

    pub fn set_name(self, name: &str) -> Result<()> {
        let name = CString::new(name)?;
        unsafe { sys::frl_set_value_name2(self.as_ptr(), name.as_ptr(), name.as_bytes().len()) };
        Ok(())
    }

    pub fn type_of(self) -> Result<Type<'ctx>> {
        Type::from_raw(unsafe { sys::frl_type_of(self.as_ptr()) }).get()
    }

    pub fn kind(self) -> Result<ValueKind> {
        ValueKind::from_native(unsafe { sys::frl_get_value_kind(self.as_ptr()) })
    }

    pub fn is_constant(self) -> bool {
        unsafe { sys::frl_is_constant(self.as_ptr()) != 0 }
    }

    /// Zero-extended value of an integer constant.
    pub fn const_int_value(self) -> Option<u64> {
        matches!(self.kind(), Ok(ValueKind::ConstantInt))
            .then(|| unsafe { sys::frl_const_int_get_zext_value(self.as_ptr()) })
    }

    pub fn const_real_value(self) -> Option<f64> {
        matches!(self.kind(), Ok(ValueKind::ConstantFP))
            .then(|| unsafe { sys::frl_const_real_get_double(self.as_ptr()) })
    }

    /// The most specific view for this value.
    pub fn classify(self) -> Result<AnyValue<'ctx>> {
        Ok(match self.kind()? {
            ValueKind::Function => AnyValue::Function(Function(self)),
            ValueKind::GlobalVariable => AnyValue::GlobalVariable(GlobalVariable(self)),
            ValueKind::Instruction => AnyValue::Instruction(Instruction(self)),
            _ => AnyValue::Value(self),
        })
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("handle", &self.handle)
            .field("name", &self.name())
            .finish()
    }
}

/// Result of [`Value::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyValue<'ctx> {
    Function(Function<'ctx>),
    GlobalVariable(GlobalVariable<'ctx>),
    Instruction(Instruction<'ctx>),
    /// Constants, arguments and anything else without a dedicated view.
    Value(Value<'ctx>),
}

impl<'ctx> AnyValue<'ctx> {
    pub fn as_value(self) -> Value<'ctx> {
        match self {
            AnyValue::Function(function) => function.as_value(),
            AnyValue::GlobalVariable(global) => global.as_value(),
            AnyValue::Instruction(inst) => inst.as_value(),
            AnyValue::Value(value) => value,
        }
    }
}

// ── Globals ─────────────────────────────────────────────────────────────

/// Operations shared by functions and global variables.
pub trait GlobalObject<'ctx>: Copy {
    fn as_value(self) -> Value<'ctx>;

    fn linkage(self) -> Result<Linkage> {
        Linkage::from_native(unsafe { sys::frl_get_linkage(self.as_value().as_ptr()) })
    }

    fn set_linkage(self, linkage: Linkage) {
        unsafe { sys::frl_set_linkage(self.as_value().as_ptr(), linkage.to_native()) };
    }

    fn visibility(self) -> Result<Visibility> {
        Visibility::from_native(unsafe { sys::frl_get_visibility(self.as_value().as_ptr()) })
    }

    fn set_visibility(self, visibility: Visibility) {
        unsafe { sys::frl_set_visibility(self.as_value().as_ptr(), visibility.to_native()) };
    }

    /// Identifier of the module this global belongs to.
    fn parent_module_name(self) -> Option<String> {
        unsafe {
            let module = sys::frl_get_global_parent(self.as_value().as_ptr());
            if module.is_null() {
                return None;
            }
            let mut len = 0usize;
            let start = sys::frl_get_module_identifier(module, &mut len);
            let bytes = std::slice::from_raw_parts(start.cast::<u8>(), len);
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

// ── Function ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Function<'ctx>(Value<'ctx>);

impl<'ctx> Function<'ctx> {
    pub(crate) fn from_raw(raw: *mut sys::FrlValue) -> Option<Function<'ctx>> {
        Value::from_raw(raw).map(Function)
    }

    #[inline]
    pub fn as_ptr(self) -> *mut sys::FrlValue {
        self.0.as_ptr()
    }

    pub fn name(self) -> String {
        self.0.name()
    }

    pub fn function_type(self) -> Result<Type<'ctx>> {
        self.0.type_of()
    }

    pub fn param_count(self) -> u32 {
        unsafe { sys::frl_count_params(self.as_ptr()) }
    }

    pub fn param(self, index: u32) -> Option<Value<'ctx>> {
        Value::from_raw(unsafe { sys::frl_get_param(self.as_ptr(), index) })
    }

    pub fn params(self) -> PointerIter<sys::FrlValue, Value<'ctx>> {
        let first = Handle::from_raw(unsafe { sys::frl_get_first_param(self.as_ptr()) });
        PointerIter::linked(first, next_param, Value::from_handle)
    }

    pub fn basic_block_count(self) -> u32 {
        unsafe { sys::frl_count_basic_blocks(self.as_ptr()) }
    }

    /// `None` for a declaration.
    pub fn entry_block(self) -> Option<BasicBlock<'ctx>> {
        BasicBlock::from_raw(unsafe { sys::frl_get_entry_basic_block(self.as_ptr()) })
    }

    pub fn basic_blocks(self) -> PointerIter<sys::FrlBasicBlock, BasicBlock<'ctx>> {
        let first = Handle::from_raw(unsafe { sys::frl_get_first_basic_block(self.as_ptr()) });
        PointerIter::linked(first, next_block, BasicBlock::from_handle)
    }

    /// Blocks from last to first.
    pub fn basic_blocks_rev(self) -> PointerIter<sys::FrlBasicBlock, BasicBlock<'ctx>> {
        let last = Handle::from_raw(unsafe { sys::frl_get_last_basic_block(self.as_ptr()) });
        PointerIter::linked(last, previous_block, BasicBlock::from_handle)
    }

    pub fn call_convention(self) -> Result<CallConvention> {
        CallConvention::from_native(unsafe { sys::frl_get_function_call_conv(self.as_ptr()) })
    }

    pub fn set_call_convention(self, call_conv: CallConvention) {
        unsafe { sys::frl_set_function_call_conv(self.as_ptr(), call_conv.to_native()) };
    }

    pub(crate) fn next_in_module(handle: Handle<sys::FrlValue>) -> Option<Handle<sys::FrlValue>> {
        Handle::from_raw(unsafe { sys::frl_get_next_function(handle.as_ptr()) })
    }

    pub(crate) fn wrap(handle: Handle<sys::FrlValue>) -> Function<'ctx> {
        Function(Value::from_handle(handle))
    }
}

impl<'ctx> GlobalObject<'ctx> for Function<'ctx> {
    fn as_value(self) -> Value<'ctx> {
        self.0
    }
}

fn next_param(handle: Handle<sys::FrlValue>) -> Option<Handle<sys::FrlValue>> {
    Handle::from_raw(unsafe { sys::frl_get_next_param(handle.as_ptr()) })
}

fn next_block(handle: Handle<sys::FrlBasicBlock>) -> Option<Handle<sys::FrlBasicBlock>> {
    Handle::from_raw(unsafe { sys::frl_get_next_basic_block(handle.as_ptr()) })
}

fn previous_block(handle: Handle<sys::FrlBasicBlock>) -> Option<Handle<sys::FrlBasicBlock>> {
    Handle::from_raw(unsafe { sys::frl_get_previous_basic_block(handle.as_ptr()) })
}

// ── GlobalVariable ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalVariable<'ctx>(Value<'ctx>);

impl<'ctx> GlobalVariable<'ctx> {
    pub(crate) fn from_raw(raw: *mut sys::FrlValue) -> Option<GlobalVariable<'ctx>> {
        Value::from_raw(raw).map(GlobalVariable)
    }

    #[inline]
    pub fn as_ptr(self) -> *mut sys::FrlValue {
        self.0.as_ptr()
    }

    pub fn name(self) -> String {
        self.0.name()
    }

    /// Type of the stored value. The global itself is a pointer.
    pub fn value_type(self) -> Result<Type<'ctx>> {
        Type::from_raw(unsafe { sys::frl_global_get_value_type(self.as_ptr()) }).get()
    }

    /// `None` for an external declaration.
    pub fn initializer(self) -> Option<Value<'ctx>> {
        Value::from_raw(unsafe { sys::frl_get_initializer(self.as_ptr()) })
    }

    /// `None` turns the global into an external declaration.
    pub fn set_initializer(self, initializer: Option<Value<'ctx>>) {
        let raw = Handle::nullable(initializer.map(|value| value.handle));
        unsafe { sys::frl_set_initializer(self.as_ptr(), raw) };
    }

    pub fn is_constant(self) -> bool {
        unsafe { sys::frl_is_global_constant(self.as_ptr()) != 0 }
    }

    pub fn set_constant(self, is_constant: bool) {
        unsafe { sys::frl_set_global_constant(self.as_ptr(), c_int::from(is_constant)) };
    }

    pub fn thread_local_mode(self) -> Result<ThreadLocalMode> {
        ThreadLocalMode::from_native(unsafe { sys::frl_get_thread_local_mode(self.as_ptr()) })
    }

    pub fn set_thread_local_mode(self, mode: ThreadLocalMode) {
        unsafe { sys::frl_set_thread_local_mode(self.as_ptr(), mode.to_native()) };
    }

    pub(crate) fn next_in_module(handle: Handle<sys::FrlValue>) -> Option<Handle<sys::FrlValue>> {
        Handle::from_raw(unsafe { sys::frl_get_next_global(handle.as_ptr()) })
    }

    pub(crate) fn wrap(handle: Handle<sys::FrlValue>) -> GlobalVariable<'ctx> {
        GlobalVariable(Value::from_handle(handle))
    }
}

impl<'ctx> GlobalObject<'ctx> for GlobalVariable<'ctx> {
    fn as_value(self) -> Value<'ctx> {
        self.0
    }
}

// ── BasicBlock ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasicBlock<'ctx> {
    handle: Handle<sys::FrlBasicBlock>,
    _ctx: PhantomData<&'ctx Context>,
}

impl<'ctx> BasicBlock<'ctx> {
    pub(crate) fn from_raw(raw: *mut sys::FrlBasicBlock) -> Option<BasicBlock<'ctx>> {
        Handle::from_raw(raw).map(BasicBlock::from_handle)
    }

    fn from_handle(handle: Handle<sys::FrlBasicBlock>) -> BasicBlock<'ctx> {
        BasicBlock {
            handle,
            _ctx: PhantomData,
        }
    }

    #[inline]
    pub fn as_ptr(self) -> *mut sys::FrlBasicBlock {
        self.handle.as_ptr()
    }

    pub fn name(self) -> String {
        let name = unsafe { CStr::from_ptr(sys::frl_get_basic_block_name(self.as_ptr())) };
        name.to_string_lossy().into_owned()
    }

    pub fn parent(self) -> Option<Function<'ctx>> {
        Function::from_raw(unsafe { sys::frl_get_basic_block_parent(self.as_ptr()) })
    }

    /// The last instruction if it is a terminator.
    pub fn terminator(self) -> Option<Instruction<'ctx>> {
        Instruction::from_raw(unsafe { sys::frl_get_basic_block_terminator(self.as_ptr()) })
    }

    pub fn first_instruction(self) -> Option<Instruction<'ctx>> {
        Instruction::from_raw(unsafe { sys::frl_get_first_instruction(self.as_ptr()) })
    }

    pub fn last_instruction(self) -> Option<Instruction<'ctx>> {
        Instruction::from_raw(unsafe { sys::frl_get_last_instruction(self.as_ptr()) })
    }

    pub fn instructions(self) -> PointerIter<sys::FrlValue, Instruction<'ctx>> {
        let first = Handle::from_raw(unsafe { sys::frl_get_first_instruction(self.as_ptr()) });
        PointerIter::linked(first, next_instruction, Instruction::from_handle)
    }

    /// Instructions from last to first.
    pub fn instructions_rev(self) -> PointerIter<sys::FrlValue, Instruction<'ctx>> {
        let last = Handle::from_raw(unsafe { sys::frl_get_last_instruction(self.as_ptr()) });
        PointerIter::linked(last, previous_instruction, Instruction::from_handle)
    }

    pub fn next(self) -> Option<BasicBlock<'ctx>> {
        next_block(self.handle).map(BasicBlock::from_handle)
    }

    pub fn previous(self) -> Option<BasicBlock<'ctx>> {
        previous_block(self.handle).map(BasicBlock::from_handle)
    }

    /// Unlink the block from its function and free it with its instructions.
    ///
    /// # Safety
    /// No view of this block or of its instructions may be used afterwards,
    /// no other instruction may still refer to the block, and no builder
    /// may stay positioned in it. Reposition or clear such builders first.
    pub unsafe fn delete(self) {
        sys::frl_delete_basic_block(self.as_ptr());
    }
}

impl fmt::Debug for BasicBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicBlock")
            .field("handle", &self.handle)
            .field("name", &self.name())
            .finish()
    }
}

// ── Instruction ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction<'ctx>(Value<'ctx>);

impl<'ctx> Instruction<'ctx> {
    pub(crate) fn from_raw(raw: *mut sys::FrlValue) -> Option<Instruction<'ctx>> {
        Value::from_raw(raw).map(Instruction)
    }

    fn from_handle(handle: Handle<sys::FrlValue>) -> Instruction<'ctx> {
        Instruction(Value::from_handle(handle))
    }

    #[inline]
    pub fn as_ptr(self) -> *mut sys::FrlValue {
        self.0.as_ptr()
    }

    pub fn as_value(self) -> Value<'ctx> {
        self.0
    }

    pub fn opcode(self) -> Result<Opcode> {
        Opcode::from_native(unsafe { sys::frl_get_instruction_opcode(self.as_ptr()) })
    }

    /// `None` once the instruction has been detached from its block.
    pub fn parent(self) -> Option<BasicBlock<'ctx>> {
        BasicBlock::from_raw(unsafe { sys::frl_get_instruction_parent(self.as_ptr()) })
    }

    pub fn is_terminator(self) -> bool {
        !unsafe { sys::frl_is_a_terminator_inst(self.as_ptr()) }.is_null()
    }

    pub fn operand_count(self) -> u32 {
        u32::try_from(unsafe { sys::frl_get_num_operands(self.as_ptr()) }).unwrap_or(0)
    }

    pub fn operand(self, index: u32) -> Option<Value<'ctx>> {
        Value::from_raw(unsafe { sys::frl_get_operand(self.as_ptr(), index) })
    }

    /// `None` for instructions that are not terminators.
    pub fn successor_count(self) -> Option<u32> {
        let count = c_int::from_native(unsafe { sys::frl_get_num_successors(self.as_ptr()) })?;
        u32::try_from(count).ok()
    }

    pub fn successor(self, index: u32) -> Option<BasicBlock<'ctx>> {
        BasicBlock::from_raw(unsafe { sys::frl_get_successor(self.as_ptr(), index) })
    }

    /// Alignment in bytes of `alloca`, `load` and `store`; `0` means the
    /// type's natural alignment. `None` for other instructions.
    pub fn alignment(self) -> Option<u32> {
        let bytes = c_int::from_native(unsafe { sys::frl_get_alignment(self.as_ptr()) })?;
        u32::try_from(bytes).ok()
    }

    /// Ignored for instructions without an alignment.
    pub fn set_alignment(self, bytes: u32) {
        unsafe { sys::frl_set_alignment(self.as_ptr(), bytes) };
    }

    /// Memory ordering of `load` and `store`, `None` for other instructions.
    pub fn ordering(self) -> Result<Option<AtomicOrdering>> {
        c_int::from_native(unsafe { sys::frl_get_ordering(self.as_ptr()) })
            .map(AtomicOrdering::from_native)
            .transpose()
    }

    /// Ignored for instructions without a memory ordering.
    pub fn set_ordering(self, ordering: AtomicOrdering) {
        unsafe { sys::frl_set_ordering(self.as_ptr(), ordering.to_native()) };
    }

    pub fn icmp_predicate(self) -> Result<Option<IntPredicate>> {
        c_int::from_native(unsafe { sys::frl_get_icmp_predicate(self.as_ptr()) })
            .map(IntPredicate::from_native)
            .transpose()
    }

    pub fn fcmp_predicate(self) -> Result<Option<RealPredicate>> {
        c_int::from_native(unsafe { sys::frl_get_fcmp_predicate(self.as_ptr()) })
            .map(RealPredicate::from_native)
            .transpose()
    }

    pub fn next(self) -> Option<Instruction<'ctx>> {
        next_instruction(self.0.handle).map(Instruction::from_handle)
    }

    pub fn previous(self) -> Option<Instruction<'ctx>> {
        previous_instruction(self.0.handle).map(Instruction::from_handle)
    }

    // ── Editing ─────────────────────────────────────────────────────────

    /// Point successor `index` of a terminator at `block`.
    pub fn set_successor(self, index: u32, block: BasicBlock<'ctx>) -> Result<()> {
        if unsafe { sys::frl_set_successor(self.as_ptr(), index, block.as_ptr()) } == 0 {
            return Err(FerruleError::external(
                FailureKind::Builder,
                format!("instruction has no successor {index}"),
            ));
        }
        Ok(())
    }

    /// Unlink the instruction from its block. It stays alive, owned by the
    /// module, and can be put back with [`Builder::insert`](crate::Builder::insert).
    pub fn remove_from_parent(self) -> Result<()> {
        if self.is_erased() {
            return Err(FerruleError::UseAfterDispose { kind: INSTRUCTION_KIND });
        }
        if unsafe { sys::frl_instruction_remove_from_parent(self.as_ptr()) } == 0 {
            return Err(FerruleError::external(
                FailureKind::Builder,
                "instruction is not in a block",
            ));
        }
        Ok(())
    }

    /// Unlink the instruction and mark it dead. Its storage is reclaimed
    /// with the module, so views stay safe to query; inserting or cloning
    /// an erased instruction fails with `UseAfterDispose`.
    pub fn erase_from_parent(self) -> Result<()> {
        if unsafe { sys::frl_instruction_erase_from_parent(self.as_ptr()) } == 0 {
            return Err(FerruleError::DoubleDispose { kind: INSTRUCTION_KIND });
        }
        Ok(())
    }

    pub fn is_erased(self) -> bool {
        (unsafe { sys::frl_instruction_is_erased(self.as_ptr()) }) != 0
    }

    /// Unnamed copy with the same operands, detached from any block.
    pub fn clone_detached(self) -> Result<Instruction<'ctx>> {
        Instruction::from_raw(unsafe { sys::frl_instruction_clone(self.as_ptr()) })
            .ok_or(FerruleError::UseAfterDispose { kind: INSTRUCTION_KIND })
    }
}

const INSTRUCTION_KIND: &str = "instruction";

fn next_instruction(handle: Handle<sys::FrlValue>) -> Option<Handle<sys::FrlValue>> {
    Handle::from_raw(unsafe { sys::frl_get_next_instruction(handle.as_ptr()) })
}

fn previous_instruction(handle: Handle<sys::FrlValue>) -> Option<Handle<sys::FrlValue>> {
    Handle::from_raw(unsafe { sys::frl_get_previous_instruction(handle.as_ptr()) })
}
