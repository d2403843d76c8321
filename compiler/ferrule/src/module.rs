//! Modules: the unit of printing and verification.

use std::ffi::{c_char, CString};
use std::io::{self, Write};
use std::marker::PhantomData;
use std::ptr;

use ferrule_native as sys;
use tracing::debug;

use crate::config::BindingConfig;
use crate::context::Context;
use crate::error::{FailureKind, FerruleError, Result};
use crate::handle::Handle;
use crate::iter::PointerIter;
use crate::message::Message;
use crate::owned::{impl_disposable, NativeResource, Owned};
use crate::types::Type;
use crate::values::{Function, GlobalVariable};

enum ModuleResource {}

impl NativeResource for ModuleResource {
    type Raw = sys::FrlModule;
    const KIND: &'static str = "module";

    unsafe fn release(raw: *mut sys::FrlModule) {
        sys::frl_dispose_module(raw);
    }
}

/// A named collection of functions and globals.
///
/// Disposing a module frees everything in it. Views obtained from the
/// module must not be used after that.
#[derive(Debug)]
pub struct Module<'ctx> {
    owned: Owned<ModuleResource>,
    _ctx: PhantomData<&'ctx Context>,
}

impl<'ctx> Module<'ctx> {
    /// # Safety
    /// `raw` must be null or a freshly created module that nothing else
    /// will dispose.
    pub(crate) unsafe fn from_raw(raw: *mut sys::FrlModule) -> Result<Module<'ctx>> {
        Ok(Module {
            owned: Owned::acquire(raw)?,
            _ctx: PhantomData,
        })
    }

    fn as_ptr(&self) -> Result<*mut sys::FrlModule> {
        self.owned.as_ptr()
    }

    pub fn name(&self) -> Result<String> {
        let raw = self.as_ptr()?;
        let mut len = 0usize;
        unsafe {
            let start = sys::frl_get_module_identifier(raw, &mut len);
            let bytes = std::slice::from_raw_parts(start.cast::<u8>(), len);
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    pub fn set_name(&self, name: &str) -> Result<()> {
        let raw = self.as_ptr()?;
        let name = CString::new(name)?;
        unsafe { sys::frl_set_module_identifier(raw, name.as_ptr(), name.as_bytes().len()) };
        Ok(())
    }

    // ── Functions ───────────────────────────────────────────────────────

    /// Add a function declaration. `function_type` must be a function type.
    pub fn add_function(&self, name: &str, function_type: Type<'ctx>) -> Result<Function<'ctx>> {
        let raw = self.as_ptr()?;
        let c_name = CString::new(name)?;
        let function =
            unsafe { sys::frl_add_function(raw, c_name.as_ptr(), function_type.as_ptr()) };
        Function::from_raw(function).ok_or_else(|| {
            FerruleError::external(
                FailureKind::InvalidType,
                format!(
                    "cannot declare function '{name}' with non-function type {function_type:?}"
                ),
            )
        })
    }

    pub fn get_function(&self, name: &str) -> Result<Option<Function<'ctx>>> {
        let raw = self.as_ptr()?;
        let name = CString::new(name)?;
        Ok(Function::from_raw(unsafe { sys::frl_get_named_function(raw, name.as_ptr()) }))
    }

    /// Functions in declaration order.
    pub fn functions(&self) -> Result<PointerIter<sys::FrlValue, Function<'ctx>>> {
        let raw = self.as_ptr()?;
        let first = Handle::from_raw(unsafe { sys::frl_get_first_function(raw) });
        Ok(PointerIter::linked(first, Function::next_in_module, Function::wrap))
    }

    // ── Globals ─────────────────────────────────────────────────────────

    /// Add a global variable holding a `ty`, with no initializer.
    pub fn add_global(&self, ty: Type<'ctx>, name: &str) -> Result<GlobalVariable<'ctx>> {
        let raw = self.as_ptr()?;
        let name = CString::new(name)?;
        let global = unsafe { sys::frl_add_global(raw, ty.as_ptr(), name.as_ptr()) };
        GlobalVariable::from_raw(global).ok_or_else(|| {
            FerruleError::external(FailureKind::Allocation, "native global allocation failed")
        })
    }

    pub fn get_global(&self, name: &str) -> Result<Option<GlobalVariable<'ctx>>> {
        let raw = self.as_ptr()?;
        let name = CString::new(name)?;
        Ok(GlobalVariable::from_raw(unsafe { sys::frl_get_named_global(raw, name.as_ptr()) }))
    }

    pub fn globals(&self) -> Result<PointerIter<sys::FrlValue, GlobalVariable<'ctx>>> {
        let raw = self.as_ptr()?;
        let first = Handle::from_raw(unsafe { sys::frl_get_first_global(raw) });
        Ok(PointerIter::linked(first, GlobalVariable::next_in_module, GlobalVariable::wrap))
    }

    // ── Output ──────────────────────────────────────────────────────────

    /// Textual IR of the whole module.
    pub fn print_to_string(&self) -> Result<Message> {
        let raw = self.as_ptr()?;
        let text = unsafe { Message::from_raw(sys::frl_print_module_to_string(raw)) };
        text.ok_or_else(|| {
            FerruleError::external(FailureKind::Allocation, "native module printing returned null")
        })
    }

    /// Check the module for malformed IR.
    ///
    /// A broken module is a [`FailureKind::Verification`] failure carrying
    /// the native diagnostic. With `FERRULE_DEBUG_IR` set the module's IR is
    /// printed to stderr as well.
    pub fn verify(&self) -> Result<()> {
        self.verify_with(BindingConfig::current(), &mut io::stderr())
    }

    /// [`Module::verify`] with the IR dump going to `dump`.
    fn verify_with(&self, config: BindingConfig, dump: &mut dyn Write) -> Result<()> {
        let raw = self.as_ptr()?;
        let mut out: *mut c_char = ptr::null_mut();
        let broken = unsafe { sys::frl_verify_module(raw, &mut out) } != 0;
        let message = unsafe { Message::from_raw(out) };
        if !broken {
            return Ok(());
        }

        let text = match &message {
            Some(message) => message.get_string()?,
            None => String::from("module is broken"),
        };
        let name = self.name()?;
        debug!(module = %name, error = %text, "module verification failed");
        if config.debug_ir {
            let ir = self.print_to_string()?.get_string()?;
            if let Err(err) = write_ir_dump(dump, &name, &ir) {
                debug!(module = %name, %err, "could not write IR dump");
            }
        }
        Err(FerruleError::external(FailureKind::Verification, text))
    }

    pub fn dispose(&mut self) -> Result<()> {
        self.owned.dispose()
    }

    pub fn is_valid(&self) -> bool {
        self.owned.is_valid()
    }
}

impl_disposable!(Module<'ctx>, owned);

fn write_ir_dump(out: &mut dyn Write, name: &str, ir: &str) -> io::Result<()> {
    writeln!(out, "=== IR for {name} ===")?;
    writeln!(out, "{ir}")?;
    writeln!(out, "=== END IR ===")
}
