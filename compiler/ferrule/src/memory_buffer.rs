//! Native memory buffers.

use std::ffi::{CStr, CString};
use std::path::Path;
use std::ptr;

use ferrule_native as sys;
use tracing::debug;

use crate::error::{FailureKind, FerruleError, Result};
use crate::message::Message;
use crate::owned::{impl_disposable, NativeResource, Owned};

enum MemoryBufferResource {}

impl NativeResource for MemoryBufferResource {
    type Raw = sys::FrlMemoryBuffer;
    const KIND: &'static str = "memory buffer";

    unsafe fn release(raw: *mut sys::FrlMemoryBuffer) {
        sys::frl_dispose_memory_buffer(raw);
    }
}

/// An immutable byte buffer owned by the native library.
#[derive(Debug)]
pub struct MemoryBuffer {
    owned: Owned<MemoryBufferResource>,
}

impl MemoryBuffer {
    /// Read a whole file.
    ///
    /// A missing or unreadable file is an [`FailureKind::File`] failure
    /// carrying the native diagnostic.
    pub fn from_file(path: impl AsRef<Path>) -> Result<MemoryBuffer> {
        let path = path.as_ref();
        let c_path = c_path(path)?;
        let mut buffer = ptr::null_mut();
        let mut message = ptr::null_mut();
        let status = unsafe {
            sys::frl_create_memory_buffer_with_contents_of_file(
                c_path.as_ptr(),
                &mut buffer,
                &mut message,
            )
        };
        // The message must be released on every path, so wrap it first.
        let message = unsafe { Message::from_raw(message) };

        if status != 0 {
            let text = match &message {
                Some(message) => message.get_string()?,
                None => format!("{}: could not be read", path.display()),
            };
            debug!(path = %path.display(), error = %text, "memory buffer from file failed");
            return Err(FerruleError::external(FailureKind::File, text));
        }
        Ok(MemoryBuffer {
            owned: unsafe { Owned::acquire(buffer)? },
        })
    }

    /// Copy `bytes` into a new buffer named `name`.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<MemoryBuffer> {
        let name = CString::new(name)?;
        let raw = unsafe {
            sys::frl_create_memory_buffer_with_memory_range_copy(
                bytes.as_ptr().cast(),
                bytes.len(),
                name.as_ptr(),
            )
        };
        Ok(MemoryBuffer {
            owned: unsafe { Owned::acquire(raw)? },
        })
    }

    pub fn size(&self) -> Result<usize> {
        let raw = self.owned.as_ptr()?;
        Ok(unsafe { sys::frl_get_buffer_size(raw) })
    }

    /// Borrow the contents.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        let raw = self.owned.as_ptr()?;
        unsafe {
            let start = sys::frl_get_buffer_start(raw);
            Ok(std::slice::from_raw_parts(start.cast::<u8>(), sys::frl_get_buffer_size(raw)))
        }
    }

    /// Copy of the contents as text. Invalid UTF-8 is replaced.
    pub fn get_string(&self) -> Result<String> {
        Ok(String::from_utf8_lossy(self.as_bytes()?).into_owned())
    }

    /// Byte at `index`, `None` past the end.
    pub fn byte_at(&self, index: usize) -> Result<Option<u8>> {
        Ok(self.as_bytes()?.get(index).copied())
    }

    /// Name the buffer was created with; the path for file buffers.
    pub fn identifier(&self) -> Result<String> {
        let raw = self.owned.as_ptr()?;
        let name = unsafe { CStr::from_ptr(sys::frl_get_buffer_identifier(raw)) };
        Ok(name.to_string_lossy().into_owned())
    }

    pub fn dispose(&mut self) -> Result<()> {
        self.owned.dispose()
    }

    pub fn is_valid(&self) -> bool {
        self.owned.is_valid()
    }
}

impl_disposable!(MemoryBuffer, owned);

#[cfg(unix)]
fn c_path(path: &Path) -> Result<CString> {
    use std::os::unix::ffi::OsStrExt;
    Ok(CString::new(path.as_os_str().as_bytes())?)
}

#[cfg(not(unix))]
fn c_path(path: &Path) -> Result<CString> {
    Ok(CString::new(path.to_string_lossy().as_bytes())?)
}
