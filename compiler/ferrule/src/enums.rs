//! Bridge between native `c_int` enum constants and Rust enums.
//!
//! Each bridged enum is declared once with [`native_enum!`], which generates
//! the enum, a total `to_native` `match`, the static lookup table used by
//! `from_native`, and an `ALL` list of variants.

use std::ffi::c_int;

use ferrule_native::{
    atomic_ordering, call_conv, int_predicate, linkage, opcode, real_predicate, thread_local_mode,
    type_kind, value_kind, visibility,
};

use crate::error::{FerruleError, Result};

/// A closed Rust enum mirroring one native constant space.
pub trait NativeEnum: Sized + Copy + 'static {
    /// Name of the native enum, used in error messages.
    const NAME: &'static str;

    /// Every variant paired with its native value.
    const TABLE: &'static [(Self, c_int)];

    fn to_native(self) -> c_int;

    /// Reverse lookup. Fails with [`FerruleError::UnknownNativeConstant`]
    /// for values outside the table.
    fn from_native(value: c_int) -> Result<Self> {
        Self::TABLE
            .iter()
            .find(|(_, native)| *native == value)
            .map(|(variant, _)| *variant)
            .ok_or(FerruleError::UnknownNativeConstant {
                enum_name: Self::NAME,
                value,
            })
    }
}

/// Declare a [`NativeEnum`].
///
/// ```ignore
/// native_enum! {
///     /// Symbol visibility.
///     pub enum Visibility => "FrlVisibility" {
///         Default = visibility::DEFAULT,
///         Hidden = visibility::HIDDEN,
///     }
/// }
/// ```
#[macro_export]
macro_rules! native_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident => $native_name:literal {
            $( $(#[$variant_meta:meta])* $variant:ident = $value:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$variant_meta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];
        }

        impl $crate::NativeEnum for $name {
            const NAME: &'static str = $native_name;
            const TABLE: &'static [(Self, ::std::ffi::c_int)] =
                &[ $( (Self::$variant, $value) ),+ ];

            #[inline]
            fn to_native(self) -> ::std::ffi::c_int {
                match self {
                    $( Self::$variant => $value ),+
                }
            }
        }
    };
}

native_enum! {
    /// Kind of a type.
    pub enum TypeKind => "FrlTypeKind" {
        Void = type_kind::VOID,
        Half = type_kind::HALF,
        Float = type_kind::FLOAT,
        Double = type_kind::DOUBLE,
        X86Fp80 = type_kind::X86_FP80,
        Fp128 = type_kind::FP128,
        PpcFp128 = type_kind::PPC_FP128,
        Label = type_kind::LABEL,
        Integer = type_kind::INTEGER,
        Function = type_kind::FUNCTION,
        Struct = type_kind::STRUCT,
        Array = type_kind::ARRAY,
        Pointer = type_kind::POINTER,
        Vector = type_kind::VECTOR,
        Metadata = type_kind::METADATA,
        X86Mmx = type_kind::X86_MMX,
        Token = type_kind::TOKEN,
        ScalableVector = type_kind::SCALABLE_VECTOR,
        BFloat = type_kind::BFLOAT,
        X86Amx = type_kind::X86_AMX,
        TargetExt = type_kind::TARGET_EXT,
    }
}

impl TypeKind {
    pub fn is_floating_point(self) -> bool {
        matches!(
            self,
            TypeKind::Half
                | TypeKind::Float
                | TypeKind::Double
                | TypeKind::X86Fp80
                | TypeKind::Fp128
                | TypeKind::PpcFp128
                | TypeKind::BFloat
        )
    }
}

native_enum! {
    /// Instruction opcode.
    pub enum Opcode => "FrlOpcode" {
        Ret = opcode::RET,
        Br = opcode::BR,
        Switch = opcode::SWITCH,
        IndirectBr = opcode::INDIRECT_BR,
        Invoke = opcode::INVOKE,
        Unreachable = opcode::UNREACHABLE,
        CallBr = opcode::CALL_BR,
        FNeg = opcode::FNEG,
        Add = opcode::ADD,
        FAdd = opcode::FADD,
        Sub = opcode::SUB,
        FSub = opcode::FSUB,
        Mul = opcode::MUL,
        FMul = opcode::FMUL,
        UDiv = opcode::UDIV,
        SDiv = opcode::SDIV,
        FDiv = opcode::FDIV,
        URem = opcode::UREM,
        SRem = opcode::SREM,
        FRem = opcode::FREM,
        Shl = opcode::SHL,
        LShr = opcode::LSHR,
        AShr = opcode::ASHR,
        And = opcode::AND,
        Or = opcode::OR,
        Xor = opcode::XOR,
        Alloca = opcode::ALLOCA,
        Load = opcode::LOAD,
        Store = opcode::STORE,
        GetElementPtr = opcode::GET_ELEMENT_PTR,
        Trunc = opcode::TRUNC,
        ZExt = opcode::ZEXT,
        SExt = opcode::SEXT,
        FPToUI = opcode::FP_TO_UI,
        FPToSI = opcode::FP_TO_SI,
        UIToFP = opcode::UI_TO_FP,
        SIToFP = opcode::SI_TO_FP,
        FPTrunc = opcode::FP_TRUNC,
        FPExt = opcode::FP_EXT,
        PtrToInt = opcode::PTR_TO_INT,
        IntToPtr = opcode::INT_TO_PTR,
        BitCast = opcode::BIT_CAST,
        AddrSpaceCast = opcode::ADDR_SPACE_CAST,
        ICmp = opcode::ICMP,
        FCmp = opcode::FCMP,
        Phi = opcode::PHI,
        Call = opcode::CALL,
        Select = opcode::SELECT,
        UserOp1 = opcode::USER_OP1,
        UserOp2 = opcode::USER_OP2,
        VAArg = opcode::VA_ARG,
        ExtractElement = opcode::EXTRACT_ELEMENT,
        InsertElement = opcode::INSERT_ELEMENT,
        ShuffleVector = opcode::SHUFFLE_VECTOR,
        ExtractValue = opcode::EXTRACT_VALUE,
        InsertValue = opcode::INSERT_VALUE,
        Freeze = opcode::FREEZE,
        Fence = opcode::FENCE,
        AtomicCmpXchg = opcode::ATOMIC_CMP_XCHG,
        AtomicRMW = opcode::ATOMIC_RMW,
        Resume = opcode::RESUME,
        LandingPad = opcode::LANDING_PAD,
        CleanupRet = opcode::CLEANUP_RET,
        CatchRet = opcode::CATCH_RET,
        CatchPad = opcode::CATCH_PAD,
        CleanupPad = opcode::CLEANUP_PAD,
        CatchSwitch = opcode::CATCH_SWITCH,
    }
}

impl Opcode {
    pub fn is_terminator(self) -> bool {
        matches!(
            self,
            Opcode::Ret
                | Opcode::Br
                | Opcode::Switch
                | Opcode::IndirectBr
                | Opcode::Invoke
                | Opcode::Unreachable
                | Opcode::CallBr
                | Opcode::Resume
                | Opcode::CleanupRet
                | Opcode::CatchRet
                | Opcode::CatchSwitch
        )
    }

    /// Two-operand arithmetic and bitwise operators accepted by
    /// [`Builder::build_binop`](crate::Builder::build_binop).
    pub fn is_binary_operator(self) -> bool {
        (opcode::ADD..=opcode::XOR).contains(&self.to_native())
    }
}

native_enum! {
    /// Discriminator of a value.
    pub enum ValueKind => "FrlValueKind" {
        Argument = value_kind::ARGUMENT,
        BasicBlock = value_kind::BASIC_BLOCK,
        MemoryUse = value_kind::MEMORY_USE,
        MemoryDef = value_kind::MEMORY_DEF,
        MemoryPhi = value_kind::MEMORY_PHI,
        Function = value_kind::FUNCTION,
        GlobalAlias = value_kind::GLOBAL_ALIAS,
        GlobalIFunc = value_kind::GLOBAL_IFUNC,
        GlobalVariable = value_kind::GLOBAL_VARIABLE,
        BlockAddress = value_kind::BLOCK_ADDRESS,
        ConstantExpr = value_kind::CONSTANT_EXPR,
        ConstantArray = value_kind::CONSTANT_ARRAY,
        ConstantStruct = value_kind::CONSTANT_STRUCT,
        ConstantVector = value_kind::CONSTANT_VECTOR,
        UndefValue = value_kind::UNDEF_VALUE,
        ConstantAggregateZero = value_kind::CONSTANT_AGGREGATE_ZERO,
        ConstantDataArray = value_kind::CONSTANT_DATA_ARRAY,
        ConstantDataVector = value_kind::CONSTANT_DATA_VECTOR,
        ConstantInt = value_kind::CONSTANT_INT,
        ConstantFP = value_kind::CONSTANT_FP,
        ConstantPointerNull = value_kind::CONSTANT_POINTER_NULL,
        ConstantTokenNone = value_kind::CONSTANT_TOKEN_NONE,
        MetadataAsValue = value_kind::METADATA_AS_VALUE,
        InlineAsm = value_kind::INLINE_ASM,
        Instruction = value_kind::INSTRUCTION,
        Poison = value_kind::POISON,
    }
}

native_enum! {
    /// Linkage of a function or global.
    pub enum Linkage => "FrlLinkage" {
        External = linkage::EXTERNAL,
        AvailableExternally = linkage::AVAILABLE_EXTERNALLY,
        LinkOnceAny = linkage::LINK_ONCE_ANY,
        LinkOnceOdr = linkage::LINK_ONCE_ODR,
        LinkOnceOdrAutoHide = linkage::LINK_ONCE_ODR_AUTO_HIDE,
        WeakAny = linkage::WEAK_ANY,
        WeakOdr = linkage::WEAK_ODR,
        Appending = linkage::APPENDING,
        Internal = linkage::INTERNAL,
        Private = linkage::PRIVATE,
        DllImport = linkage::DLL_IMPORT,
        DllExport = linkage::DLL_EXPORT,
        ExternalWeak = linkage::EXTERNAL_WEAK,
        Ghost = linkage::GHOST,
        Common = linkage::COMMON,
        LinkerPrivate = linkage::LINKER_PRIVATE,
        LinkerPrivateWeak = linkage::LINKER_PRIVATE_WEAK,
    }
}

native_enum! {
    pub enum Visibility => "FrlVisibility" {
        Default = visibility::DEFAULT,
        Hidden = visibility::HIDDEN,
        Protected = visibility::PROTECTED,
    }
}

native_enum! {
    /// Calling convention of a function.
    pub enum CallConvention => "FrlCallConv" {
        C = call_conv::C,
        Fast = call_conv::FAST,
        Cold = call_conv::COLD,
        Ghc = call_conv::GHC,
        HiPE = call_conv::HIPE,
        WebKitJS = call_conv::WEBKIT_JS,
        AnyReg = call_conv::ANY_REG,
        PreserveMost = call_conv::PRESERVE_MOST,
        PreserveAll = call_conv::PRESERVE_ALL,
        Swift = call_conv::SWIFT,
        CxxFastTls = call_conv::CXX_FAST_TLS,
        X86StdCall = call_conv::X86_STDCALL,
        X86FastCall = call_conv::X86_FASTCALL,
        ArmApcs = call_conv::ARM_APCS,
        ArmAapcs = call_conv::ARM_AAPCS,
        ArmAapcsVfp = call_conv::ARM_AAPCS_VFP,
        Msp430Intr = call_conv::MSP430_INTR,
        X86ThisCall = call_conv::X86_THIS_CALL,
        PtxKernel = call_conv::PTX_KERNEL,
        PtxDevice = call_conv::PTX_DEVICE,
        SpirFunc = call_conv::SPIR_FUNC,
        SpirKernel = call_conv::SPIR_KERNEL,
        IntelOclBi = call_conv::INTEL_OCL_BI,
        X86_64SysV = call_conv::X86_64_SYSV,
        Win64 = call_conv::WIN64,
        X86VectorCall = call_conv::X86_VECTOR_CALL,
        Hhvm = call_conv::HHVM,
        HhvmC = call_conv::HHVM_C,
        X86Intr = call_conv::X86_INTR,
        AvrIntr = call_conv::AVR_INTR,
        AvrSignal = call_conv::AVR_SIGNAL,
        AvrBuiltin = call_conv::AVR_BUILTIN,
        AmdGpuVs = call_conv::AMDGPU_VS,
        AmdGpuGs = call_conv::AMDGPU_GS,
        AmdGpuPs = call_conv::AMDGPU_PS,
        AmdGpuCs = call_conv::AMDGPU_CS,
        AmdGpuKernel = call_conv::AMDGPU_KERNEL,
        X86RegCall = call_conv::X86_REG_CALL,
        AmdGpuHs = call_conv::AMDGPU_HS,
        Msp430Builtin = call_conv::MSP430_BUILTIN,
        AmdGpuLs = call_conv::AMDGPU_LS,
        AmdGpuEs = call_conv::AMDGPU_ES,
    }
}

native_enum! {
    pub enum ThreadLocalMode => "FrlThreadLocalMode" {
        NotThreadLocal = thread_local_mode::NOT_THREAD_LOCAL,
        GeneralDynamic = thread_local_mode::GENERAL_DYNAMIC,
        LocalDynamic = thread_local_mode::LOCAL_DYNAMIC,
        InitialExec = thread_local_mode::INITIAL_EXEC,
        LocalExec = thread_local_mode::LOCAL_EXEC,
    }
}

native_enum! {
    /// Memory ordering of atomic loads and stores.
    pub enum AtomicOrdering => "FrlAtomicOrdering" {
        NotAtomic = atomic_ordering::NOT_ATOMIC,
        Unordered = atomic_ordering::UNORDERED,
        Monotonic = atomic_ordering::MONOTONIC,
        Acquire = atomic_ordering::ACQUIRE,
        Release = atomic_ordering::RELEASE,
        AcquireRelease = atomic_ordering::ACQUIRE_RELEASE,
        SequentiallyConsistent = atomic_ordering::SEQUENTIALLY_CONSISTENT,
    }
}

native_enum! {
    /// Predicate of an integer comparison.
    pub enum IntPredicate => "FrlIntPredicate" {
        Eq = int_predicate::EQ,
        Ne = int_predicate::NE,
        Ugt = int_predicate::UGT,
        Uge = int_predicate::UGE,
        Ult = int_predicate::ULT,
        Ule = int_predicate::ULE,
        Sgt = int_predicate::SGT,
        Sge = int_predicate::SGE,
        Slt = int_predicate::SLT,
        Sle = int_predicate::SLE,
    }
}

native_enum! {
    /// Predicate of a floating-point comparison. `O*` are ordered, `U*`
    /// unordered.
    pub enum RealPredicate => "FrlRealPredicate" {
        False = real_predicate::PREDICATE_FALSE,
        Oeq = real_predicate::OEQ,
        Ogt = real_predicate::OGT,
        Oge = real_predicate::OGE,
        Olt = real_predicate::OLT,
        Ole = real_predicate::OLE,
        One = real_predicate::ONE,
        Ord = real_predicate::ORD,
        Uno = real_predicate::UNO,
        Ueq = real_predicate::UEQ,
        Ugt = real_predicate::UGT,
        Uge = real_predicate::UGE,
        Ult = real_predicate::ULT,
        Ule = real_predicate::ULE,
        Une = real_predicate::UNE,
        True = real_predicate::PREDICATE_TRUE,
    }
}
