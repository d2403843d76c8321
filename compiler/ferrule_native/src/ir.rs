//! In-memory object graph behind the C API.
//!
//! Ownership mirrors the handle contract:
//! - `FrlContext` owns every type and every constant created in it.
//! - `FrlModule` owns its functions and globals; a function owns its
//!   parameters and basic blocks; a block owns its instructions.
//! - `FrlBuilder` owns nothing but its insertion point.
//!
//! Sibling lists (functions, globals, blocks, instructions) are intrusive
//! doubly linked lists of raw pointers so that `get_next_*` / `get_previous_*`
//! are O(1) pointer reads, exactly as a C caller expects.

use std::ffi::{c_int, CString};
use std::ptr;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::constants::{call_conv, linkage, thread_local_mode, type_kind, value_kind, visibility};

// ── Context and types ───────────────────────────────────────────────────

/// Root object. Owns types and constants.
pub struct FrlContext {
    pub(crate) types: FxHashMap<TypeKey, *mut FrlType>,
    pub(crate) int_constants: FxHashMap<(*mut FrlType, u64, bool), *mut FrlValue>,
    pub(crate) real_constants: FxHashMap<(*mut FrlType, u64), *mut FrlValue>,
}

/// Structural identity of a type; types are uniqued per context.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum TypeKey {
    Simple(c_int),
    Integer(u32),
    Pointer(u32),
    Array(*mut FrlType, u64),
    Function(*mut FrlType, Vec<*mut FrlType>, bool),
}

pub struct FrlType {
    pub(crate) context: *mut FrlContext,
    pub(crate) kind: c_int,
    pub(crate) shape: TypeShape,
}

pub(crate) enum TypeShape {
    Simple,
    Integer(u32),
    Pointer(u32),
    Array {
        element: *mut FrlType,
        length: u64,
    },
    Function {
        ret: *mut FrlType,
        params: Vec<*mut FrlType>,
        vararg: bool,
    },
}

impl FrlContext {
    pub(crate) fn new() -> Self {
        Self {
            types: FxHashMap::default(),
            int_constants: FxHashMap::default(),
            real_constants: FxHashMap::default(),
        }
    }
}

impl Drop for FrlContext {
    fn drop(&mut self) {
        for (_, value) in self.int_constants.drain() {
            drop(unsafe { Box::from_raw(value) });
        }
        for (_, value) in self.real_constants.drain() {
            drop(unsafe { Box::from_raw(value) });
        }
        for (_, ty) in self.types.drain() {
            drop(unsafe { Box::from_raw(ty) });
        }
    }
}

/// Return the uniqued type for `key`, creating it on first request.
///
/// # Safety
/// `ctx` must be a live context.
pub(crate) unsafe fn intern_type(ctx: *mut FrlContext, key: TypeKey) -> *mut FrlType {
    if let Some(&ty) = (*ctx).types.get(&key) {
        return ty;
    }
    let (kind, shape) = match &key {
        TypeKey::Simple(kind) => (*kind, TypeShape::Simple),
        TypeKey::Integer(bits) => (type_kind::INTEGER, TypeShape::Integer(*bits)),
        TypeKey::Pointer(space) => (type_kind::POINTER, TypeShape::Pointer(*space)),
        TypeKey::Array(element, length) => (
            type_kind::ARRAY,
            TypeShape::Array {
                element: *element,
                length: *length,
            },
        ),
        TypeKey::Function(ret, params, vararg) => (
            type_kind::FUNCTION,
            TypeShape::Function {
                ret: *ret,
                params: params.clone(),
                vararg: *vararg,
            },
        ),
    };
    let ty = Box::into_raw(Box::new(FrlType {
        context: ctx,
        kind,
        shape,
    }));
    (*ctx).types.insert(key, ty);
    ty
}

// ── Values ──────────────────────────────────────────────────────────────

pub struct FrlValue {
    pub(crate) ty: *mut FrlType,
    pub(crate) name: CString,
    pub(crate) data: ValueData,
}

pub(crate) enum ValueData {
    /// `bits` holds the low 64 bits, sign-extended from the type's width.
    ConstInt { bits: u64, negative: bool },
    ConstReal(f64),
    Argument { function: *mut FrlValue, index: usize },
    Function(FunctionData),
    Global(GlobalData),
    Instruction(InstructionData),
}

/// Properties shared by functions and global variables.
pub(crate) struct GlobalProps {
    pub(crate) module: *mut FrlModule,
    pub(crate) next: *mut FrlValue,
    pub(crate) prev: *mut FrlValue,
    pub(crate) linkage: c_int,
    pub(crate) visibility: c_int,
}

impl GlobalProps {
    pub(crate) fn new(module: *mut FrlModule) -> Self {
        Self {
            module,
            next: ptr::null_mut(),
            prev: ptr::null_mut(),
            linkage: linkage::EXTERNAL,
            visibility: visibility::DEFAULT,
        }
    }
}

pub(crate) struct FunctionData {
    pub(crate) props: GlobalProps,
    pub(crate) call_conv: c_int,
    pub(crate) params: Vec<*mut FrlValue>,
    pub(crate) first_block: *mut FrlBasicBlock,
    pub(crate) last_block: *mut FrlBasicBlock,
}

pub(crate) struct GlobalData {
    pub(crate) props: GlobalProps,
    pub(crate) value_type: *mut FrlType,
    pub(crate) initializer: *mut FrlValue,
    pub(crate) constant: bool,
    pub(crate) thread_local_mode: c_int,
}

pub(crate) struct InstructionData {
    pub(crate) opcode: c_int,
    pub(crate) operands: SmallVec<[*mut FrlValue; 4]>,
    pub(crate) successors: SmallVec<[*mut FrlBasicBlock; 2]>,
    pub(crate) block: *mut FrlBasicBlock,
    pub(crate) next: *mut FrlValue,
    pub(crate) prev: *mut FrlValue,
    /// Module that frees the instruction, attached or not.
    pub(crate) module: *mut FrlModule,
    /// Set by `frl_instruction_erase_from_parent`; an erased instruction
    /// can no longer be inserted or cloned.
    pub(crate) erased: bool,
    /// `-1` when the opcode has no alignment.
    pub(crate) alignment: c_int,
    /// `-1` when the opcode has no memory ordering.
    pub(crate) ordering: c_int,
    /// `-1` unless the opcode is `icmp` / `fcmp`.
    pub(crate) predicate: c_int,
    /// Allocated type for `alloca`, callee type for `call`.
    pub(crate) aux_type: *mut FrlType,
}

impl InstructionData {
    pub(crate) fn new(opcode: c_int) -> Self {
        Self {
            opcode,
            operands: SmallVec::new(),
            successors: SmallVec::new(),
            block: ptr::null_mut(),
            next: ptr::null_mut(),
            prev: ptr::null_mut(),
            module: ptr::null_mut(),
            erased: false,
            alignment: -1,
            ordering: -1,
            predicate: -1,
            aux_type: ptr::null_mut(),
        }
    }
}

impl FunctionData {
    pub(crate) fn new(module: *mut FrlModule) -> Self {
        Self {
            props: GlobalProps::new(module),
            call_conv: call_conv::C,
            params: Vec::new(),
            first_block: ptr::null_mut(),
            last_block: ptr::null_mut(),
        }
    }
}

impl GlobalData {
    pub(crate) fn new(module: *mut FrlModule, value_type: *mut FrlType) -> Self {
        Self {
            props: GlobalProps::new(module),
            value_type,
            initializer: ptr::null_mut(),
            constant: false,
            thread_local_mode: thread_local_mode::NOT_THREAD_LOCAL,
        }
    }
}

impl FrlValue {
    pub(crate) fn new(ty: *mut FrlType, data: ValueData) -> Self {
        Self {
            ty,
            name: CString::default(),
            data,
        }
    }

    pub(crate) fn kind(&self) -> c_int {
        match &self.data {
            ValueData::ConstInt { .. } => value_kind::CONSTANT_INT,
            ValueData::ConstReal(_) => value_kind::CONSTANT_FP,
            ValueData::Argument { .. } => value_kind::ARGUMENT,
            ValueData::Function(_) => value_kind::FUNCTION,
            ValueData::Global(_) => value_kind::GLOBAL_VARIABLE,
            ValueData::Instruction(_) => value_kind::INSTRUCTION,
        }
    }

    pub(crate) fn function(&self) -> Option<&FunctionData> {
        match &self.data {
            ValueData::Function(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn function_mut(&mut self) -> Option<&mut FunctionData> {
        match &mut self.data {
            ValueData::Function(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn global(&self) -> Option<&GlobalData> {
        match &self.data {
            ValueData::Global(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn global_mut(&mut self) -> Option<&mut GlobalData> {
        match &mut self.data {
            ValueData::Global(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn instruction(&self) -> Option<&InstructionData> {
        match &self.data {
            ValueData::Instruction(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn instruction_mut(&mut self) -> Option<&mut InstructionData> {
        match &mut self.data {
            ValueData::Instruction(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn props(&self) -> Option<&GlobalProps> {
        match &self.data {
            ValueData::Function(data) => Some(&data.props),
            ValueData::Global(data) => Some(&data.props),
            _ => None,
        }
    }

    pub(crate) fn props_mut(&mut self) -> Option<&mut GlobalProps> {
        match &mut self.data {
            ValueData::Function(data) => Some(&mut data.props),
            ValueData::Global(data) => Some(&mut data.props),
            _ => None,
        }
    }
}

// ── Basic blocks ────────────────────────────────────────────────────────

pub struct FrlBasicBlock {
    pub(crate) name: CString,
    pub(crate) parent: *mut FrlValue,
    pub(crate) first: *mut FrlValue,
    pub(crate) last: *mut FrlValue,
    pub(crate) next: *mut FrlBasicBlock,
    pub(crate) prev: *mut FrlBasicBlock,
}

/// Link the detached `inst` into `block` in front of `before`, or at the
/// end when `before` is null.
///
/// # Safety
/// All non-null pointers must be live; `before` must be null or in `block`.
pub(crate) unsafe fn link_instruction(
    block: *mut FrlBasicBlock,
    inst: *mut FrlValue,
    before: *mut FrlValue,
) {
    let prev = if before.is_null() {
        (*block).last
    } else {
        (*before).instruction().map_or(ptr::null_mut(), |data| data.prev)
    };
    if let Some(data) = (*inst).instruction_mut() {
        data.block = block;
        data.prev = prev;
        data.next = before;
    }
    if prev.is_null() {
        (*block).first = inst;
    } else if let Some(data) = (*prev).instruction_mut() {
        data.next = inst;
    }
    if before.is_null() {
        (*block).last = inst;
    } else if let Some(data) = (*before).instruction_mut() {
        data.prev = inst;
    }
}

/// Unlink `inst` from its block, leaving it detached. No-op when it is
/// already detached.
///
/// # Safety
/// `inst` must be a live instruction.
pub(crate) unsafe fn unlink_instruction(inst: *mut FrlValue) {
    let Some(data) = (*inst).instruction_mut() else {
        return;
    };
    let block = data.block;
    if block.is_null() {
        return;
    }
    let (prev, next) = (data.prev, data.next);
    data.block = ptr::null_mut();
    data.prev = ptr::null_mut();
    data.next = ptr::null_mut();
    if prev.is_null() {
        (*block).first = next;
    } else if let Some(prev_data) = (*prev).instruction_mut() {
        prev_data.next = next;
    }
    if next.is_null() {
        (*block).last = prev;
    } else if let Some(next_data) = (*next).instruction_mut() {
        next_data.prev = prev;
    }
}

/// Module owning the function that contains `block`.
///
/// # Safety
/// `block` must be live.
pub(crate) unsafe fn block_module(block: *mut FrlBasicBlock) -> *mut FrlModule {
    (*(*block).parent).props().map_or(ptr::null_mut(), |props| props.module)
}

/// Free a block and every instruction in it.
///
/// # Safety
/// `block` must be live and no longer reachable from its function.
pub(crate) unsafe fn free_block(block: *mut FrlBasicBlock) {
    let mut inst = (*block).first;
    while !inst.is_null() {
        let next = (*inst).instruction().map_or(ptr::null_mut(), |data| data.next);
        drop(Box::from_raw(inst));
        inst = next;
    }
    drop(Box::from_raw(block));
}

// ── Modules ─────────────────────────────────────────────────────────────

pub struct FrlModule {
    pub(crate) context: *mut FrlContext,
    pub(crate) name: CString,
    pub(crate) first_function: *mut FrlValue,
    pub(crate) last_function: *mut FrlValue,
    pub(crate) first_global: *mut FrlValue,
    pub(crate) last_global: *mut FrlValue,
    /// Instructions outside any block: removed, erased or cloned.
    pub(crate) detached: Vec<*mut FrlValue>,
}

impl Drop for FrlModule {
    fn drop(&mut self) {
        unsafe {
            let mut function = self.first_function;
            while !function.is_null() {
                let next = (*function).props().map_or(ptr::null_mut(), |props| props.next);
                if let Some(data) = (*function).function() {
                    let mut block = data.first_block;
                    while !block.is_null() {
                        let next_block = (*block).next;
                        free_block(block);
                        block = next_block;
                    }
                    for &param in &data.params {
                        drop(Box::from_raw(param));
                    }
                }
                drop(Box::from_raw(function));
                function = next;
            }

            let mut global = self.first_global;
            while !global.is_null() {
                let next = (*global).props().map_or(ptr::null_mut(), |props| props.next);
                drop(Box::from_raw(global));
                global = next;
            }

            for inst in self.detached.drain(..) {
                drop(Box::from_raw(inst));
            }
        }
    }
}

/// Append a function or global to one of the module's sibling lists.
///
/// # Safety
/// `value` must be a detached function or global owned by `module`.
pub(crate) unsafe fn link_global(
    first: &mut *mut FrlValue,
    last: &mut *mut FrlValue,
    value: *mut FrlValue,
) {
    let tail = *last;
    if let Some(props) = (*value).props_mut() {
        props.prev = tail;
        props.next = ptr::null_mut();
    }
    if tail.is_null() {
        *first = value;
    } else if let Some(props) = (*tail).props_mut() {
        props.next = value;
    }
    *last = value;
}

/// Walk a module sibling list looking for `name`.
///
/// # Safety
/// `first` must head a live list.
pub(crate) unsafe fn find_by_name(first: *mut FrlValue, name: &[u8]) -> *mut FrlValue {
    let mut current = first;
    while !current.is_null() {
        if (*current).name.as_bytes() == name {
            return current;
        }
        current = (*current).props().map_or(ptr::null_mut(), |props| props.next);
    }
    ptr::null_mut()
}

// ── Builder ─────────────────────────────────────────────────────────────

pub struct FrlBuilder {
    pub(crate) context: *mut FrlContext,
    pub(crate) block: *mut FrlBasicBlock,
    /// Instruction new ones go in front of; null appends to `block`.
    pub(crate) before: *mut FrlValue,
}
