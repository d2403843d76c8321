//! Native enum constant spaces.
//!
//! Each submodule is one C enum. Values follow the numbering of the LLVM C
//! API so that tables written against either library line up.

use std::ffi::c_int;

/// `FrlTypeKind`
pub mod type_kind {
    use super::c_int;

    pub const VOID: c_int = 0;
    pub const HALF: c_int = 1;
    pub const FLOAT: c_int = 2;
    pub const DOUBLE: c_int = 3;
    pub const X86_FP80: c_int = 4;
    pub const FP128: c_int = 5;
    pub const PPC_FP128: c_int = 6;
    pub const LABEL: c_int = 7;
    pub const INTEGER: c_int = 8;
    pub const FUNCTION: c_int = 9;
    pub const STRUCT: c_int = 10;
    pub const ARRAY: c_int = 11;
    pub const POINTER: c_int = 12;
    pub const VECTOR: c_int = 13;
    pub const METADATA: c_int = 14;
    pub const X86_MMX: c_int = 15;
    pub const TOKEN: c_int = 16;
    pub const SCALABLE_VECTOR: c_int = 17;
    pub const BFLOAT: c_int = 18;
    pub const X86_AMX: c_int = 19;
    pub const TARGET_EXT: c_int = 20;
}

/// `FrlOpcode`
pub mod opcode {
    use super::c_int;

    // Terminators
    pub const RET: c_int = 1;
    pub const BR: c_int = 2;
    pub const SWITCH: c_int = 3;
    pub const INDIRECT_BR: c_int = 4;
    pub const INVOKE: c_int = 5;
    pub const UNREACHABLE: c_int = 7;
    pub const CALL_BR: c_int = 67;

    // Unary
    pub const FNEG: c_int = 66;

    // Binary
    pub const ADD: c_int = 8;
    pub const FADD: c_int = 9;
    pub const SUB: c_int = 10;
    pub const FSUB: c_int = 11;
    pub const MUL: c_int = 12;
    pub const FMUL: c_int = 13;
    pub const UDIV: c_int = 14;
    pub const SDIV: c_int = 15;
    pub const FDIV: c_int = 16;
    pub const UREM: c_int = 17;
    pub const SREM: c_int = 18;
    pub const FREM: c_int = 19;

    // Logical
    pub const SHL: c_int = 20;
    pub const LSHR: c_int = 21;
    pub const ASHR: c_int = 22;
    pub const AND: c_int = 23;
    pub const OR: c_int = 24;
    pub const XOR: c_int = 25;

    // Memory
    pub const ALLOCA: c_int = 26;
    pub const LOAD: c_int = 27;
    pub const STORE: c_int = 28;
    pub const GET_ELEMENT_PTR: c_int = 29;

    // Casts
    pub const TRUNC: c_int = 30;
    pub const ZEXT: c_int = 31;
    pub const SEXT: c_int = 32;
    pub const FP_TO_UI: c_int = 33;
    pub const FP_TO_SI: c_int = 34;
    pub const UI_TO_FP: c_int = 35;
    pub const SI_TO_FP: c_int = 36;
    pub const FP_TRUNC: c_int = 37;
    pub const FP_EXT: c_int = 38;
    pub const PTR_TO_INT: c_int = 39;
    pub const INT_TO_PTR: c_int = 40;
    pub const BIT_CAST: c_int = 41;
    pub const ADDR_SPACE_CAST: c_int = 60;

    // Other
    pub const ICMP: c_int = 42;
    pub const FCMP: c_int = 43;
    pub const PHI: c_int = 44;
    pub const CALL: c_int = 45;
    pub const SELECT: c_int = 46;
    pub const USER_OP1: c_int = 47;
    pub const USER_OP2: c_int = 48;
    pub const VA_ARG: c_int = 49;
    pub const EXTRACT_ELEMENT: c_int = 50;
    pub const INSERT_ELEMENT: c_int = 51;
    pub const SHUFFLE_VECTOR: c_int = 52;
    pub const EXTRACT_VALUE: c_int = 53;
    pub const INSERT_VALUE: c_int = 54;
    pub const FREEZE: c_int = 68;

    // Atomic
    pub const FENCE: c_int = 55;
    pub const ATOMIC_CMP_XCHG: c_int = 56;
    pub const ATOMIC_RMW: c_int = 57;

    // Exception handling
    pub const RESUME: c_int = 58;
    pub const LANDING_PAD: c_int = 59;
    pub const CLEANUP_RET: c_int = 61;
    pub const CATCH_RET: c_int = 62;
    pub const CATCH_PAD: c_int = 63;
    pub const CLEANUP_PAD: c_int = 64;
    pub const CATCH_SWITCH: c_int = 65;
}

/// `FrlValueKind`
pub mod value_kind {
    use super::c_int;

    pub const ARGUMENT: c_int = 0;
    pub const BASIC_BLOCK: c_int = 1;
    pub const MEMORY_USE: c_int = 2;
    pub const MEMORY_DEF: c_int = 3;
    pub const MEMORY_PHI: c_int = 4;
    pub const FUNCTION: c_int = 5;
    pub const GLOBAL_ALIAS: c_int = 6;
    pub const GLOBAL_IFUNC: c_int = 7;
    pub const GLOBAL_VARIABLE: c_int = 8;
    pub const BLOCK_ADDRESS: c_int = 9;
    pub const CONSTANT_EXPR: c_int = 10;
    pub const CONSTANT_ARRAY: c_int = 11;
    pub const CONSTANT_STRUCT: c_int = 12;
    pub const CONSTANT_VECTOR: c_int = 13;
    pub const UNDEF_VALUE: c_int = 14;
    pub const CONSTANT_AGGREGATE_ZERO: c_int = 15;
    pub const CONSTANT_DATA_ARRAY: c_int = 16;
    pub const CONSTANT_DATA_VECTOR: c_int = 17;
    pub const CONSTANT_INT: c_int = 18;
    pub const CONSTANT_FP: c_int = 19;
    pub const CONSTANT_POINTER_NULL: c_int = 20;
    pub const CONSTANT_TOKEN_NONE: c_int = 21;
    pub const METADATA_AS_VALUE: c_int = 22;
    pub const INLINE_ASM: c_int = 23;
    pub const INSTRUCTION: c_int = 24;
    pub const POISON: c_int = 25;
}

/// `FrlLinkage`
pub mod linkage {
    use super::c_int;

    pub const EXTERNAL: c_int = 0;
    pub const AVAILABLE_EXTERNALLY: c_int = 1;
    pub const LINK_ONCE_ANY: c_int = 2;
    pub const LINK_ONCE_ODR: c_int = 3;
    pub const LINK_ONCE_ODR_AUTO_HIDE: c_int = 4;
    pub const WEAK_ANY: c_int = 5;
    pub const WEAK_ODR: c_int = 6;
    pub const APPENDING: c_int = 7;
    pub const INTERNAL: c_int = 8;
    pub const PRIVATE: c_int = 9;
    pub const DLL_IMPORT: c_int = 10;
    pub const DLL_EXPORT: c_int = 11;
    pub const EXTERNAL_WEAK: c_int = 12;
    pub const GHOST: c_int = 13;
    pub const COMMON: c_int = 14;
    pub const LINKER_PRIVATE: c_int = 15;
    pub const LINKER_PRIVATE_WEAK: c_int = 16;
}

/// `FrlVisibility`
pub mod visibility {
    use super::c_int;

    pub const DEFAULT: c_int = 0;
    pub const HIDDEN: c_int = 1;
    pub const PROTECTED: c_int = 2;
}

/// `FrlCallConv`
pub mod call_conv {
    use super::c_int;

    pub const C: c_int = 0;
    pub const FAST: c_int = 8;
    pub const COLD: c_int = 9;
    pub const GHC: c_int = 10;
    pub const HIPE: c_int = 11;
    pub const WEBKIT_JS: c_int = 12;
    pub const ANY_REG: c_int = 13;
    pub const PRESERVE_MOST: c_int = 14;
    pub const PRESERVE_ALL: c_int = 15;
    pub const SWIFT: c_int = 16;
    pub const CXX_FAST_TLS: c_int = 17;
    pub const X86_STDCALL: c_int = 64;
    pub const X86_FASTCALL: c_int = 65;
    pub const ARM_APCS: c_int = 66;
    pub const ARM_AAPCS: c_int = 67;
    pub const ARM_AAPCS_VFP: c_int = 68;
    pub const MSP430_INTR: c_int = 69;
    pub const X86_THIS_CALL: c_int = 70;
    pub const PTX_KERNEL: c_int = 71;
    pub const PTX_DEVICE: c_int = 72;
    pub const SPIR_FUNC: c_int = 75;
    pub const SPIR_KERNEL: c_int = 76;
    pub const INTEL_OCL_BI: c_int = 77;
    pub const X86_64_SYSV: c_int = 78;
    pub const WIN64: c_int = 79;
    pub const X86_VECTOR_CALL: c_int = 80;
    pub const HHVM: c_int = 81;
    pub const HHVM_C: c_int = 82;
    pub const X86_INTR: c_int = 83;
    pub const AVR_INTR: c_int = 84;
    pub const AVR_SIGNAL: c_int = 85;
    pub const AVR_BUILTIN: c_int = 86;
    pub const AMDGPU_VS: c_int = 87;
    pub const AMDGPU_GS: c_int = 88;
    pub const AMDGPU_PS: c_int = 89;
    pub const AMDGPU_CS: c_int = 90;
    pub const AMDGPU_KERNEL: c_int = 91;
    pub const X86_REG_CALL: c_int = 92;
    pub const AMDGPU_HS: c_int = 93;
    pub const MSP430_BUILTIN: c_int = 94;
    pub const AMDGPU_LS: c_int = 95;
    pub const AMDGPU_ES: c_int = 96;
}

/// `FrlThreadLocalMode`
pub mod thread_local_mode {
    use super::c_int;

    pub const NOT_THREAD_LOCAL: c_int = 0;
    pub const GENERAL_DYNAMIC: c_int = 1;
    pub const LOCAL_DYNAMIC: c_int = 2;
    pub const INITIAL_EXEC: c_int = 3;
    pub const LOCAL_EXEC: c_int = 4;
}

/// `FrlAtomicOrdering`
pub mod atomic_ordering {
    use super::c_int;

    pub const NOT_ATOMIC: c_int = 0;
    pub const UNORDERED: c_int = 1;
    pub const MONOTONIC: c_int = 2;
    pub const ACQUIRE: c_int = 4;
    pub const RELEASE: c_int = 5;
    pub const ACQUIRE_RELEASE: c_int = 6;
    pub const SEQUENTIALLY_CONSISTENT: c_int = 7;
}

/// `FrlIntPredicate`
pub mod int_predicate {
    use super::c_int;

    pub const EQ: c_int = 32;
    pub const NE: c_int = 33;
    pub const UGT: c_int = 34;
    pub const UGE: c_int = 35;
    pub const ULT: c_int = 36;
    pub const ULE: c_int = 37;
    pub const SGT: c_int = 38;
    pub const SGE: c_int = 39;
    pub const SLT: c_int = 40;
    pub const SLE: c_int = 41;
}

/// `FrlRealPredicate`
pub mod real_predicate {
    use super::c_int;

    pub const PREDICATE_FALSE: c_int = 0;
    pub const OEQ: c_int = 1;
    pub const OGT: c_int = 2;
    pub const OGE: c_int = 3;
    pub const OLT: c_int = 4;
    pub const OLE: c_int = 5;
    pub const ONE: c_int = 6;
    pub const ORD: c_int = 7;
    pub const UNO: c_int = 8;
    pub const UEQ: c_int = 9;
    pub const UGT: c_int = 10;
    pub const UGE: c_int = 11;
    pub const ULT: c_int = 12;
    pub const ULE: c_int = 13;
    pub const UNE: c_int = 14;
    pub const PREDICATE_TRUE: c_int = 15;
}
