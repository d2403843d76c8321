//! The `Option` / `Result` boundary.
//!
//! Native calls signal "no value" with a sentinel: a null pointer or `-1`.
//! [`Sentinel::from_native`] is the one place where such a return becomes
//! `None`; nothing above it sees a raw sentinel. [`OptionExt`] adds the
//! forced-access and sentinel-interop operations the binding needs on top of
//! std's `Option`.

use std::ffi::c_int;
use std::ptr;

use crate::error::{FerruleError, Result};

/// A native return type with a distinguished "no value" representation.
pub trait Sentinel: Copy + PartialEq {
    const SENTINEL: Self;

    /// `None` if `raw` is the sentinel, `Some(raw)` otherwise.
    #[inline]
    fn from_native(raw: Self) -> Option<Self> {
        if raw == Self::SENTINEL {
            None
        } else {
            Some(raw)
        }
    }
}

impl<T> Sentinel for *mut T {
    const SENTINEL: Self = ptr::null_mut();
}

impl<T> Sentinel for *const T {
    const SENTINEL: Self = ptr::null();
}

impl Sentinel for c_int {
    const SENTINEL: Self = -1;
}

impl Sentinel for i64 {
    const SENTINEL: Self = -1;
}

/// Extra operations on `Option` used across the binding.
pub trait OptionExt<T> {
    /// `true` for `Some`. Always the negation of [`is_empty`](Self::is_empty).
    fn is_defined(&self) -> bool;

    /// `true` for `None`.
    fn is_empty(&self) -> bool;

    /// The contained value, or [`FerruleError::EmptyOptionAccess`].
    fn get(self) -> Result<T>;

    /// The contained value, or the native sentinel for `None`.
    fn to_nullable_or_sentinel(self) -> T
    where
        T: Sentinel;
}

impl<T> OptionExt<T> for Option<T> {
    #[inline]
    fn is_defined(&self) -> bool {
        self.is_some()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.is_none()
    }

    #[inline]
    fn get(self) -> Result<T> {
        self.ok_or(FerruleError::EmptyOptionAccess)
    }

    #[inline]
    fn to_nullable_or_sentinel(self) -> T
    where
        T: Sentinel,
    {
        self.unwrap_or(T::SENTINEL)
    }
}
