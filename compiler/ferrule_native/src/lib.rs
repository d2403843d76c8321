//! Ferrule native IR toolkit (`libferrule_native`)
//!
//! A small compiler-IR library exposed through a C ABI. It is the foreign
//! side that the `ferrule` crate binds: every object is an opaque pointer,
//! enums are plain `c_int` constants, absent results are null or `-1`, and
//! every top-level resource has an explicit create/dispose pair.
//!
//! # Build Modes
//!
//! - **rlib**: For Rust consumers (the `ferrule` bindings)
//! - **staticlib**: For linking into C programs (`libferrule_native.a`)
//!
//! # Function Categories
//!
//! - **Context & types**: `frl_context_create`, `frl_int_type_in_context`, `frl_function_type`, ...
//! - **Constants**: `frl_const_int`, `frl_const_real`
//! - **Modules**: `frl_module_create_with_name_in_context`, `frl_add_function`,
//!   `frl_add_global`, ...
//! - **Traversal**: `frl_get_first_*` / `frl_get_next_*` / `frl_get_previous_*`
//! - **Builder**: `frl_create_builder_in_context`, `frl_build_*`
//! - **Editing**: `frl_instruction_remove_from_parent`, `frl_instruction_erase_from_parent`,
//!   `frl_instruction_clone`, `frl_set_successor`, `frl_insert_into_builder_with_name`
//! - **Support**: messages, memory buffers, printing, verification
//!
//! # Ownership
//!
//! | Resource | Released by |
//! |----------|-------------|
//! | context (types, constants) | `frl_context_dispose` |
//! | module (functions, globals, blocks, instructions) | `frl_dispose_module` |
//! | builder | `frl_dispose_builder` |
//! | message | `frl_dispose_message` |
//! | memory buffer | `frl_dispose_memory_buffer` |
//!
//! Releasing a resource twice is undefined behaviour. Objects owned by a
//! released parent are dangling afterwards.
//!
//! # Safety
//!
//! Every entry point that takes a pointer is `unsafe` and documents what it
//! requires. The library is not thread-safe: a context and everything
//! created from it must stay on one thread at a time.

#![warn(clippy::allow_attributes_without_reason)]
#![allow(
    unsafe_code,
    reason = "C-ABI entry points require unsafe for raw pointer operations"
)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    reason = "C enums and lengths cross the ABI as c_int / c_uint / u64"
)]
#![allow(
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    reason = "FFI surface mirrors the C header, one function per entry point"
)]

mod builder;
pub mod constants;
mod context;
mod ir;
mod module;
mod printer;
mod support;

pub use builder::*;
pub use constants::{
    atomic_ordering, call_conv, int_predicate, linkage, opcode, real_predicate, thread_local_mode,
    type_kind, value_kind, visibility,
};
pub use context::*;
pub use ir::{FrlBasicBlock, FrlBuilder, FrlContext, FrlModule, FrlType, FrlValue};
pub use module::*;
pub use printer::*;
pub use support::*;
