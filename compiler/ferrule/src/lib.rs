//! Typed, validity-checked bindings over the `ferrule_native` C API.
//!
//! The native library hands out raw pointers, reports "no value" with null
//! or `-1`, and expects every allocated object to be released exactly once.
//! This crate turns those conventions into ordinary Rust:
//!
//! - **Handles** ([`Handle`]): a non-null pointer used only as an identity.
//! - **Owning wrappers** ([`Context`], [`Module`], [`Builder`],
//!   [`MemoryBuffer`], [`Message`]): one per native allocation, released by
//!   `dispose()` or by `Drop`. Use after dispose and a second dispose are
//!   reported as errors instead of reaching the native library.
//! - **Views** ([`Type`], [`Value`], [`Function`], [`GlobalVariable`],
//!   [`BasicBlock`], [`Instruction`]): `Copy` handles borrowing the
//!   [`Context`] they came from.
//! - **Sentinels** ([`Sentinel`], [`OptionExt`]): null and `-1` become
//!   `None` at the call boundary.
//! - **Lists** ([`PointerIter`]): native linked lists as lazy iterators.
//! - **Enums** ([`NativeEnum`]): checked conversion of native integer
//!   constants.
//!
//! Nothing here is `Send` or `Sync`; a context graph belongs to one thread.
//!
//! # Debug Environment Variables
//!
//! - `FERRULE_DEBUG_IR`: print a module's IR to stderr when it fails
//!   verification. Any non-empty value other than `0` enables this.
//!
//! - `FERRULE_WARN_IMPLICIT_RELEASE`: emit a `warn!` event whenever an
//!   owning wrapper is released by `Drop` instead of `dispose()`.
//!
//! - `RUST_LOG=ferrule=debug`: disposal and verification events.
//!   `RUST_LOG=ferrule=trace` adds every native acquire and release.
//!   Call [`init_tracing`] to install a subscriber.

#![warn(clippy::allow_attributes_without_reason)]
#![allow(
    unsafe_code,
    reason = "every wrapper forwards to the native C API through raw pointers"
)]

mod builder;
mod config;
mod context;
mod enums;
mod error;
mod handle;
mod iter;
mod memory_buffer;
mod message;
mod module;
mod option;
mod owned;
mod types;
mod values;

use std::sync::Once;

pub use builder::Builder;
pub use config::BindingConfig;
pub use context::Context;
pub use enums::{
    AtomicOrdering, CallConvention, IntPredicate, Linkage, NativeEnum, Opcode, RealPredicate,
    ThreadLocalMode, TypeKind, ValueKind, Visibility,
};
pub use error::{ExternalFailure, FailureKind, FerruleError, Result};
pub use handle::Handle;
pub use iter::PointerIter;
pub use memory_buffer::MemoryBuffer;
pub use message::Message;
pub use module::Module;
pub use option::{OptionExt, Sentinel};
pub use owned::{Disposable, NativeResource, Owned};
pub use types::Type;
pub use values::{AnyValue, BasicBlock, Function, GlobalObject, GlobalVariable, Instruction, Value};

/// Raw C API, for callers that need a function the wrappers do not cover.
pub use ferrule_native as sys;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debugging.
///
/// Call this at the start of a program or test to enable tracing output.
/// Set `RUST_LOG` to control the level (e.g. `RUST_LOG=ferrule=debug`).
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
