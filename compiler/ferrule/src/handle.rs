//! Opaque handles to natively owned objects.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr::NonNull;

/// A non-null pointer to an object owned by the native library.
///
/// A handle carries no ownership and no lifetime: it is only an identity.
/// Two handles are equal exactly when they point at the same native object.
/// Handles are only ever produced from pointers returned by native calls.
pub struct Handle<T>(NonNull<T>);

impl<T> Handle<T> {
    /// Wrap a pointer returned by a native call. Null means "no object".
    #[inline]
    pub fn from_raw(ptr: *mut T) -> Option<Self> {
        NonNull::new(ptr).map(Handle)
    }

    #[inline]
    pub fn as_ptr(self) -> *mut T {
        self.0.as_ptr()
    }

    /// Null for `None`, the pointer otherwise. Used when passing an optional
    /// object back to a native call.
    #[inline]
    pub fn nullable(handle: Option<Self>) -> *mut T {
        handle.map_or(std::ptr::null_mut(), Handle::as_ptr)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:p})", self.0)
    }
}

#[cfg(test)]
mod tests;
