//! Textual IR printing and module verification.

use std::ffi::{c_char, c_int};
use std::fmt::{self, Write};
use std::ptr;

use rustc_hash::FxHashMap;

use crate::constants::{int_predicate, opcode, real_predicate, type_kind};
use crate::ir::{FrlBasicBlock, FrlModule, FrlType, FrlValue, TypeShape, ValueData};
use crate::module::is_terminator_opcode;
use crate::support::new_message;

/// Render `module` as text. Release the result with
/// [`frl_dispose_message`](crate::frl_dispose_message).
///
/// # Safety
/// `module` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_print_module_to_string(module: *mut FrlModule) -> *mut c_char {
    let mut out = String::new();
    if print_module(&mut out, module).is_err() {
        return ptr::null_mut();
    }
    new_message(out.as_bytes())
}

/// Check structural well-formedness of `module`.
///
/// Returns `0` when the module is valid. Otherwise returns `1` and, if
/// `out_message` is non-null, writes a native message listing every problem
/// found.
///
/// # Safety
/// `module` must be live; `out_message` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn frl_verify_module(
    module: *mut FrlModule,
    out_message: *mut *mut c_char,
) -> c_int {
    if !out_message.is_null() {
        *out_message = ptr::null_mut();
    }
    let mut problems = String::new();
    if verify_module(&mut problems, module).is_err() {
        return 1;
    }
    if problems.is_empty() {
        return 0;
    }
    if !out_message.is_null() {
        *out_message = new_message(problems.as_bytes());
    }
    1
}

// ── Verification ────────────────────────────────────────────────────────

unsafe fn verify_module(out: &mut String, module: *mut FrlModule) -> fmt::Result {
    let mut function = (*module).first_function;
    while !function.is_null() {
        let Some(data) = (*function).function() else {
            break;
        };
        let fn_name = (*function).name.to_string_lossy();
        let return_type = match &(*(*function).ty).shape {
            TypeShape::Function { ret, .. } => *ret,
            _ => ptr::null_mut(),
        };

        let mut block = data.first_block;
        while !block.is_null() {
            let last = (*block).last;
            let ends_in_terminator = !last.is_null()
                && (*last)
                    .instruction()
                    .is_some_and(|inst| is_terminator_opcode(inst.opcode));
            if !ends_in_terminator {
                writeln!(
                    out,
                    "Basic Block in function '{fn_name}' does not have terminator!\nlabel %{}",
                    (*block).name.to_string_lossy()
                )?;
            }

            let mut inst = (*block).first;
            while !inst.is_null() {
                let Some(inst_data) = (*inst).instruction() else {
                    break;
                };
                if inst != last && is_terminator_opcode(inst_data.opcode) {
                    writeln!(
                        out,
                        "Terminator found in the middle of a basic block!\nlabel %{}",
                        (*block).name.to_string_lossy()
                    )?;
                }
                let detached_operand = inst_data.operands.iter().any(|&operand| {
                    (*operand).instruction().is_some_and(|data| data.block.is_null())
                });
                if detached_operand {
                    writeln!(
                        out,
                        "Instruction operand is not in a basic block!\nin function '{fn_name}'"
                    )?;
                }
                if inst_data.opcode == opcode::RET {
                    let returned = inst_data.operands.first().map_or(ptr::null_mut(), |&v| (*v).ty);
                    let matches = if returned.is_null() {
                        !return_type.is_null() && (*return_type).kind == type_kind::VOID
                    } else {
                        returned == return_type
                    };
                    if !matches {
                        writeln!(
                            out,
                            "Function return type does not match operand type of return inst!\n\
                             in function '{fn_name}'"
                        )?;
                    }
                }
                inst = inst_data.next;
            }
            block = (*block).next;
        }
        function = data.props.next;
    }
    Ok(())
}

// ── Printing ────────────────────────────────────────────────────────────

/// Numbering for unnamed arguments, blocks and instructions of one function.
struct Slots {
    values: FxHashMap<*mut FrlValue, usize>,
    blocks: FxHashMap<*mut FrlBasicBlock, usize>,
}

impl Slots {
    unsafe fn for_function(function: *mut FrlValue) -> Self {
        let mut slots = Slots {
            values: FxHashMap::default(),
            blocks: FxHashMap::default(),
        };
        let Some(data) = (*function).function() else {
            return slots;
        };
        let mut next = 0;
        for &param in &data.params {
            if (*param).name.is_empty() {
                slots.values.insert(param, next);
                next += 1;
            }
        }
        let mut block = data.first_block;
        while !block.is_null() {
            if (*block).name.is_empty() {
                slots.blocks.insert(block, next);
                next += 1;
            }
            let mut inst = (*block).first;
            while !inst.is_null() {
                if (*inst).name.is_empty() && (*(*inst).ty).kind != type_kind::VOID {
                    slots.values.insert(inst, next);
                    next += 1;
                }
                inst = (*inst).instruction().map_or(ptr::null_mut(), |d| d.next);
            }
            block = (*block).next;
        }
        slots
    }

    unsafe fn block_label(&self, block: *mut FrlBasicBlock) -> String {
        match self.blocks.get(&block) {
            Some(slot) => slot.to_string(),
            None => (*block).name.to_string_lossy().into_owned(),
        }
    }
}

unsafe fn print_module(out: &mut String, module: *mut FrlModule) -> fmt::Result {
    writeln!(out, "; ModuleID = '{}'", (*module).name.to_string_lossy())?;

    let mut global = (*module).first_global;
    if !global.is_null() {
        writeln!(out)?;
    }
    while !global.is_null() {
        let Some(data) = (*global).global() else {
            break;
        };
        write!(out, "@{} = ", (*global).name.to_string_lossy())?;
        if data.initializer.is_null() {
            write!(out, "external ")?;
        }
        write!(out, "{} ", if data.constant { "constant" } else { "global" })?;
        write_type(out, data.value_type)?;
        if !data.initializer.is_null() {
            write!(out, " ")?;
            write_operand(out, data.initializer, None)?;
        }
        writeln!(out)?;
        global = data.props.next;
    }

    let mut function = (*module).first_function;
    while !function.is_null() {
        writeln!(out)?;
        print_function(out, function)?;
        function = (*function).props().map_or(ptr::null_mut(), |p| p.next);
    }
    Ok(())
}

unsafe fn print_function(out: &mut String, function: *mut FrlValue) -> fmt::Result {
    let Some(data) = (*function).function() else {
        return Ok(());
    };
    let TypeShape::Function { ret, vararg, .. } = &(*(*function).ty).shape else {
        return Ok(());
    };
    let is_declaration = data.first_block.is_null();
    let slots = Slots::for_function(function);

    write!(out, "{} ", if is_declaration { "declare" } else { "define" })?;
    write_type(out, *ret)?;
    write!(out, " @{}(", (*function).name.to_string_lossy())?;
    for (index, &param) in data.params.iter().enumerate() {
        if index > 0 {
            write!(out, ", ")?;
        }
        write_type(out, (*param).ty)?;
        if !is_declaration {
            write!(out, " ")?;
            write_local(out, param, &slots)?;
        }
    }
    if *vararg {
        write!(out, "{}...", if data.params.is_empty() { "" } else { ", " })?;
    }
    write!(out, ")")?;
    if is_declaration {
        return writeln!(out);
    }
    writeln!(out, " {{")?;

    let mut block = data.first_block;
    let mut first = true;
    while !block.is_null() {
        if !first {
            writeln!(out)?;
        }
        first = false;
        writeln!(out, "{}:", slots.block_label(block))?;
        let mut inst = (*block).first;
        while !inst.is_null() {
            write!(out, "  ")?;
            print_instruction(out, inst, &slots)?;
            writeln!(out)?;
            inst = (*inst).instruction().map_or(ptr::null_mut(), |d| d.next);
        }
        block = (*block).next;
    }
    writeln!(out, "}}")
}

unsafe fn print_instruction(out: &mut String, inst: *mut FrlValue, slots: &Slots) -> fmt::Result {
    let Some(data) = (*inst).instruction() else {
        return Ok(());
    };
    if (*(*inst).ty).kind != type_kind::VOID {
        write_local(out, inst, slots)?;
        write!(out, " = ")?;
    }
    write!(out, "{}", opcode_name(data.opcode))?;

    match data.opcode {
        opcode::RET => match data.operands.first() {
            Some(&value) => {
                write!(out, " ")?;
                write_typed_operand(out, value, slots)?;
            }
            None => write!(out, " void")?,
        },
        opcode::BR => {
            if let Some(&condition) = data.operands.first() {
                write!(out, " ")?;
                write_typed_operand(out, condition, slots)?;
                write!(out, ",")?;
            }
            for (index, &succ) in data.successors.iter().enumerate() {
                let sep = if index == 0 { "" } else { "," };
                write!(out, "{sep} label %{}", slots.block_label(succ))?;
            }
        }
        opcode::ICMP | opcode::FCMP => {
            write!(out, " {} ", predicate_name(data.opcode, data.predicate))?;
            write_binary_operands(out, &data.operands, slots)?;
        }
        opcode::ALLOCA => {
            write!(out, " ")?;
            write_type(out, data.aux_type)?;
        }
        opcode::LOAD => {
            write!(out, " ")?;
            write_type(out, (*inst).ty)?;
            if let Some(&pointer) = data.operands.first() {
                write!(out, ", ")?;
                write_typed_operand(out, pointer, slots)?;
            }
        }
        opcode::STORE => {
            for (index, &operand) in data.operands.iter().enumerate() {
                write!(out, "{}", if index == 0 { " " } else { ", " })?;
                write_typed_operand(out, operand, slots)?;
            }
        }
        opcode::CALL => {
            write!(out, " ")?;
            write_type(out, (*inst).ty)?;
            if let Some((&callee, args)) = data.operands.split_last() {
                write!(out, " ")?;
                write_operand(out, callee, Some(slots))?;
                write!(out, "(")?;
                for (index, &arg) in args.iter().enumerate() {
                    if index > 0 {
                        write!(out, ", ")?;
                    }
                    write_typed_operand(out, arg, slots)?;
                }
                write!(out, ")")?;
            }
        }
        op if (opcode::ADD..=opcode::XOR).contains(&op) => {
            write!(out, " ")?;
            write_binary_operands(out, &data.operands, slots)?;
        }
        _ => {}
    }

    if data.alignment > 0 {
        write!(out, ", align {}", data.alignment)?;
    }
    Ok(())
}

unsafe fn write_binary_operands(
    out: &mut String,
    operands: &[*mut FrlValue],
    slots: &Slots,
) -> fmt::Result {
    if let [lhs, rhs] = operands {
        write_type(out, (**lhs).ty)?;
        write!(out, " ")?;
        write_operand(out, *lhs, Some(slots))?;
        write!(out, ", ")?;
        write_operand(out, *rhs, Some(slots))?;
    }
    Ok(())
}

unsafe fn write_typed_operand(
    out: &mut String,
    value: *mut FrlValue,
    slots: &Slots,
) -> fmt::Result {
    write_type(out, (*value).ty)?;
    write!(out, " ")?;
    write_operand(out, value, Some(slots))
}

unsafe fn write_local(out: &mut String, value: *mut FrlValue, slots: &Slots) -> fmt::Result {
    match slots.values.get(&value) {
        Some(slot) => write!(out, "%{slot}"),
        None => write!(out, "%{}", (*value).name.to_string_lossy()),
    }
}

unsafe fn write_operand(
    out: &mut String,
    value: *mut FrlValue,
    slots: Option<&Slots>,
) -> fmt::Result {
    match &(*value).data {
        ValueData::ConstInt { bits, negative } => match (*(*value).ty).shape {
            TypeShape::Integer(1) => write!(out, "{}", *bits & 1 == 1),
            // Narrow constants are stored sign-extended, so a negative one
            // reads back as the right i64.
            _ if *negative => write!(out, "{}", *bits as i64),
            _ => write!(out, "{bits}"),
        },
        ValueData::ConstReal(real) => write!(out, "{real:?}"),
        ValueData::Function(_) | ValueData::Global(_) => {
            write!(out, "@{}", (*value).name.to_string_lossy())
        }
        ValueData::Argument { .. } | ValueData::Instruction(_) => match slots {
            Some(slots) => write_local(out, value, slots),
            None => write!(out, "%{}", (*value).name.to_string_lossy()),
        },
    }
}

unsafe fn write_type(out: &mut String, ty: *mut FrlType) -> fmt::Result {
    if ty.is_null() {
        return write!(out, "<null>");
    }
    match &(*ty).shape {
        TypeShape::Integer(bits) => write!(out, "i{bits}"),
        TypeShape::Pointer(0) => write!(out, "ptr"),
        TypeShape::Pointer(space) => write!(out, "ptr addrspace({space})"),
        TypeShape::Array { element, length } => {
            write!(out, "[{length} x ")?;
            write_type(out, *element)?;
            write!(out, "]")
        }
        TypeShape::Function { ret, params, vararg } => {
            write_type(out, *ret)?;
            write!(out, " (")?;
            for (index, &param) in params.iter().enumerate() {
                if index > 0 {
                    write!(out, ", ")?;
                }
                write_type(out, param)?;
            }
            if *vararg {
                write!(out, "{}...", if params.is_empty() { "" } else { ", " })?;
            }
            write!(out, ")")
        }
        TypeShape::Simple => write!(
            out,
            "{}",
            match (*ty).kind {
                type_kind::VOID => "void",
                type_kind::HALF => "half",
                type_kind::FLOAT => "float",
                type_kind::DOUBLE => "double",
                type_kind::LABEL => "label",
                _ => "opaque",
            }
        ),
    }
}

fn opcode_name(op: c_int) -> &'static str {
    match op {
        opcode::RET => "ret",
        opcode::BR => "br",
        opcode::UNREACHABLE => "unreachable",
        opcode::ADD => "add",
        opcode::FADD => "fadd",
        opcode::SUB => "sub",
        opcode::FSUB => "fsub",
        opcode::MUL => "mul",
        opcode::FMUL => "fmul",
        opcode::UDIV => "udiv",
        opcode::SDIV => "sdiv",
        opcode::FDIV => "fdiv",
        opcode::UREM => "urem",
        opcode::SREM => "srem",
        opcode::FREM => "frem",
        opcode::SHL => "shl",
        opcode::LSHR => "lshr",
        opcode::ASHR => "ashr",
        opcode::AND => "and",
        opcode::OR => "or",
        opcode::XOR => "xor",
        opcode::ALLOCA => "alloca",
        opcode::LOAD => "load",
        opcode::STORE => "store",
        opcode::ICMP => "icmp",
        opcode::FCMP => "fcmp",
        opcode::CALL => "call",
        _ => "<unknown>",
    }
}

fn predicate_name(op: c_int, predicate: c_int) -> &'static str {
    if op == opcode::ICMP {
        match predicate {
            int_predicate::EQ => "eq",
            int_predicate::NE => "ne",
            int_predicate::UGT => "ugt",
            int_predicate::UGE => "uge",
            int_predicate::ULT => "ult",
            int_predicate::ULE => "ule",
            int_predicate::SGT => "sgt",
            int_predicate::SGE => "sge",
            int_predicate::SLT => "slt",
            int_predicate::SLE => "sle",
            _ => "<unknown>",
        }
    } else {
        match predicate {
            real_predicate::PREDICATE_FALSE => "false",
            real_predicate::OEQ => "oeq",
            real_predicate::OGT => "ogt",
            real_predicate::OGE => "oge",
            real_predicate::OLT => "olt",
            real_predicate::OLE => "ole",
            real_predicate::ONE => "one",
            real_predicate::ORD => "ord",
            real_predicate::UNO => "uno",
            real_predicate::UEQ => "ueq",
            real_predicate::UGT => "ugt",
            real_predicate::UGE => "uge",
            real_predicate::ULT => "ult",
            real_predicate::ULE => "ule",
            real_predicate::UNE => "une",
            real_predicate::PREDICATE_TRUE => "true",
            _ => "<unknown>",
        }
    }
}
