//! Validity-tracked ownership of native resources.
//!
//! [`Owned`] holds exactly one handle plus a liveness flag. The resource is
//! released exactly once: by an explicit [`Owned::dispose`] or, failing
//! that, by `Drop`. After disposal every access returns
//! [`FerruleError::UseAfterDispose`] and a second `dispose` returns
//! [`FerruleError::DoubleDispose`] without touching the native library.

use std::fmt;
use std::mem::ManuallyDrop;

use tracing::{debug, trace, warn};

use crate::config::BindingConfig;
use crate::error::{FailureKind, FerruleError, Result};
use crate::handle::Handle;

/// A native resource type with a create/dispose pair.
pub trait NativeResource {
    /// Native object the handle points at.
    type Raw;

    /// Human-readable resource name used in errors and trace events.
    const KIND: &'static str;

    /// Release the resource.
    ///
    /// # Safety
    /// `raw` must be a live resource of this kind, released at most once.
    unsafe fn release(raw: *mut Self::Raw);
}

/// Owning wrappers: anything that can be explicitly disposed.
///
/// Non-owning views do not implement this trait, so calling `dispose` on
/// them does not compile.
pub trait Disposable {
    /// Release the native resource now.
    ///
    /// Fails with [`FerruleError::DoubleDispose`] on every call after the
    /// first; the native release runs only once.
    fn dispose(&mut self) -> Result<()>;

    fn is_valid(&self) -> bool;
}

/// Sole owner of one native resource.
pub struct Owned<R: NativeResource> {
    handle: Handle<R::Raw>,
    valid: bool,
}

impl<R: NativeResource> Owned<R> {
    /// Take ownership of a pointer returned by a native allocate call.
    ///
    /// Returns `None` for null.
    ///
    /// # Safety
    /// `raw` must be null or a live resource of kind `R` that nothing else
    /// will release.
    pub unsafe fn from_raw(raw: *mut R::Raw) -> Option<Self> {
        let handle = Handle::from_raw(raw)?;
        trace!(kind = R::KIND, handle = ?handle, "acquired native resource");
        Some(Owned { handle, valid: true })
    }

    /// Like [`Owned::from_raw`], but a null allocation becomes an
    /// [`FailureKind::Allocation`] error.
    ///
    /// # Safety
    /// Same as [`Owned::from_raw`].
    pub(crate) unsafe fn acquire(raw: *mut R::Raw) -> Result<Self> {
        Owned::from_raw(raw).ok_or_else(|| {
            FerruleError::external(
                FailureKind::Allocation,
                format!("native {} allocation failed", R::KIND),
            )
        })
    }

    /// The handle, or [`FerruleError::UseAfterDispose`] once disposed.
    #[inline]
    pub fn handle(&self) -> Result<Handle<R::Raw>> {
        if self.valid {
            Ok(self.handle)
        } else {
            Err(FerruleError::UseAfterDispose { kind: R::KIND })
        }
    }

    /// Raw pointer for a native call. Fails once disposed.
    #[inline]
    pub fn as_ptr(&self) -> Result<*mut R::Raw> {
        self.handle().map(Handle::as_ptr)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn dispose(&mut self) -> Result<()> {
        if !self.valid {
            return Err(FerruleError::DoubleDispose { kind: R::KIND });
        }
        debug!(kind = R::KIND, handle = ?self.handle, "disposing native resource");
        self.release();
        Ok(())
    }

    /// Give up ownership without releasing. The caller becomes responsible
    /// for the native release call.
    pub fn into_raw(self) -> Result<*mut R::Raw> {
        let this = ManuallyDrop::new(self);
        this.as_ptr()
    }

    fn release(&mut self) {
        self.valid = false;
        // SAFETY: `valid` was true, so the handle is live and has not been
        // released; it is cleared before the call so this runs once.
        unsafe { R::release(self.handle.as_ptr()) };
        trace!(kind = R::KIND, handle = ?self.handle, "released native resource");
    }
}

impl<R: NativeResource> Disposable for Owned<R> {
    fn dispose(&mut self) -> Result<()> {
        Owned::dispose(self)
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}

impl<R: NativeResource> Drop for Owned<R> {
    fn drop(&mut self) {
        if !self.valid {
            return;
        }
        if BindingConfig::current().warn_on_implicit_release {
            warn!(
                kind = R::KIND,
                handle = ?self.handle,
                "native resource released by drop, not dispose()"
            );
        }
        self.release();
    }
}

impl<R: NativeResource> fmt::Debug for Owned<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owned")
            .field("kind", &R::KIND)
            .field("handle", &self.handle)
            .field("valid", &self.valid)
            .finish()
    }
}

/// Implements [`Disposable`] for an owning wrapper by delegating to its
/// `Owned` field.
macro_rules! impl_disposable {
    ($wrapper:ident $(<$lt:lifetime>)?, $field:ident) => {
        impl $(<$lt>)? $crate::owned::Disposable for $wrapper $(<$lt>)? {
            fn dispose(&mut self) -> $crate::error::Result<()> {
                self.$field.dispose()
            }

            fn is_valid(&self) -> bool {
                self.$field.is_valid()
            }
        }
    };
}

pub(crate) use impl_disposable;
