//! Binding error taxonomy.
//!
//! Two classes of failure cross this layer:
//!
//! - **Programmer errors** (`UseAfterDispose`, `DoubleDispose`,
//!   `EmptyOptionAccess`) and **version skew** (`UnknownNativeConstant`).
//!   These are returned from the offending call so they surface where the
//!   mistake was made; they are never defaulted away.
//! - **External failures** (`External`): the native library reported a
//!   domain error such as an unreadable file or a module that fails
//!   verification. These are the only errors callers are expected to
//!   handle.

use std::ffi::{c_int, NulError};
use std::fmt;

use thiserror::Error;

/// What kind of native operation reported an [`ExternalFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Reading a file into a memory buffer failed.
    File,
    /// Module verification found malformed IR.
    Verification,
    /// A name or string argument cannot cross the C boundary.
    InvalidName,
    /// The native library refused to construct a type or constant.
    InvalidType,
    /// The builder had no insertion point or rejected its operands.
    Builder,
    /// A native allocate call returned null.
    Allocation,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::File => "file",
            FailureKind::Verification => "verification",
            FailureKind::InvalidName => "invalid name",
            FailureKind::InvalidType => "invalid type",
            FailureKind::Builder => "builder",
            FailureKind::Allocation => "allocation",
        })
    }
}

/// A recoverable failure reported by the native library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} failure: {message}")]
pub struct ExternalFailure {
    pub kind: FailureKind,
    /// Diagnostic text, usually copied from a native message.
    pub message: String,
}

impl ExternalFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        ExternalFailure {
            kind,
            message: message.into(),
        }
    }
}

/// Every error the binding layer produces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FerruleError {
    /// A forwarding method was called on an owning wrapper after `dispose()`.
    #[error("use of {kind} after it was disposed")]
    UseAfterDispose { kind: &'static str },

    /// `dispose()` was called on an already disposed wrapper.
    #[error("{kind} disposed twice")]
    DoubleDispose { kind: &'static str },

    /// `get()` was called on an empty `Option`.
    #[error("accessed the value of an empty Option")]
    EmptyOptionAccess,

    /// The native library returned an enum constant this binding does not know.
    #[error("native constant {value} is not a known {enum_name}")]
    UnknownNativeConstant { enum_name: &'static str, value: c_int },

    #[error(transparent)]
    External(#[from] ExternalFailure),
}

impl FerruleError {
    /// Shorthand for `FerruleError::External(ExternalFailure::new(kind, message))`.
    pub fn external(kind: FailureKind, message: impl Into<String>) -> Self {
        FerruleError::External(ExternalFailure::new(kind, message))
    }

    /// Only external failures are meant to be handled by callers; the rest
    /// indicate a bug in the calling code or a mismatched native library.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FerruleError::External(_))
    }

    /// The external failure kind, if this is an external failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            FerruleError::External(failure) => Some(failure.kind),
            _ => None,
        }
    }
}

impl From<NulError> for FerruleError {
    fn from(err: NulError) -> Self {
        FerruleError::external(
            FailureKind::InvalidName,
            format!("string contains an interior NUL byte at offset {}", err.nul_position()),
        )
    }
}

pub type Result<T> = std::result::Result<T, FerruleError>;
