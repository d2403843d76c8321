//! Strings allocated by the native library.

use std::ffi::{c_char, CStr, CString};

use ferrule_native as sys;

use crate::error::Result;
use crate::owned::{impl_disposable, NativeResource, Owned};

enum MessageResource {}

impl NativeResource for MessageResource {
    type Raw = c_char;
    const KIND: &'static str = "message";

    unsafe fn release(raw: *mut c_char) {
        sys::frl_dispose_message(raw);
    }
}

/// A NUL-terminated string owned by the native library.
///
/// [`get_string`](Message::get_string) copies the text into Rust memory, so
/// the copy stays usable after the message is disposed.
#[derive(Debug)]
pub struct Message {
    owned: Owned<MessageResource>,
}

impl Message {
    /// Copy `text` into a new native message.
    pub fn new(text: &str) -> Result<Message> {
        let text = CString::new(text)?;
        let raw = unsafe { sys::frl_create_message(text.as_ptr()) };
        Ok(Message {
            owned: unsafe { Owned::acquire(raw)? },
        })
    }

    /// Take ownership of a message returned by a native call.
    ///
    /// # Safety
    /// `raw` must be null or a message that nothing else will dispose.
    pub(crate) unsafe fn from_raw(raw: *mut c_char) -> Option<Message> {
        Owned::from_raw(raw).map(|owned| Message { owned })
    }

    /// Borrow the native text.
    pub fn as_c_str(&self) -> Result<&CStr> {
        let raw = self.owned.as_ptr()?;
        Ok(unsafe { CStr::from_ptr(raw) })
    }

    /// Copy of the text. Invalid UTF-8 is replaced.
    pub fn get_string(&self) -> Result<String> {
        Ok(self.as_c_str()?.to_string_lossy().into_owned())
    }

    /// Length in bytes, excluding the terminator.
    pub fn len(&self) -> Result<usize> {
        Ok(self.as_c_str()?.to_bytes().len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.as_c_str()?.is_empty())
    }

    pub fn dispose(&mut self) -> Result<()> {
        self.owned.dispose()
    }

    pub fn is_valid(&self) -> bool {
        self.owned.is_valid()
    }
}

impl_disposable!(Message, owned);
