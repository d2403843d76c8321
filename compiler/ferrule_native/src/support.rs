//! Messages, memory buffers and allocation accounting.

use std::cell::Cell;
use std::ffi::{c_char, c_int, CStr, CString};
use std::path::PathBuf;
use std::ptr;

// ── Allocation accounting ───────────────────────────────────────────────
//
// Counts create/dispose calls for top-level resources (contexts, modules,
// builders, messages, memory buffers). Per thread, so parallel test
// threads observe only their own traffic.

thread_local! {
    static ALLOCATIONS: Cell<u64> = const { Cell::new(0) };
    static RELEASES: Cell<u64> = const { Cell::new(0) };
}

pub(crate) fn record_allocation() {
    ALLOCATIONS.with(|count| count.set(count.get() + 1));
}

pub(crate) fn record_release() {
    RELEASES.with(|count| count.set(count.get() + 1));
}

/// Number of top-level resources created on this thread.
#[no_mangle]
pub extern "C" fn frl_debug_allocation_count() -> u64 {
    ALLOCATIONS.with(Cell::get)
}

/// Number of top-level resources disposed on this thread.
#[no_mangle]
pub extern "C" fn frl_debug_release_count() -> u64 {
    RELEASES.with(Cell::get)
}

// ── Messages ────────────────────────────────────────────────────────────

/// Copy `text` into a freshly allocated native string.
///
/// Returns null if `text` is null. Release with [`frl_dispose_message`].
///
/// # Safety
/// `text` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn frl_create_message(text: *const c_char) -> *mut c_char {
    if text.is_null() {
        return ptr::null_mut();
    }
    new_message(CStr::from_ptr(text).to_bytes())
}

/// Release a string returned by this library.
///
/// # Safety
/// `message` must have been returned by this library and not yet disposed.
#[no_mangle]
pub unsafe extern "C" fn frl_dispose_message(message: *mut c_char) {
    if message.is_null() {
        return;
    }
    drop(CString::from_raw(message));
    record_release();
}

/// Allocate a native message from raw bytes, dropping interior NULs.
pub(crate) fn new_message(bytes: &[u8]) -> *mut c_char {
    let cleaned: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
    let Ok(text) = CString::new(cleaned) else {
        return ptr::null_mut();
    };
    record_allocation();
    text.into_raw()
}

// ── Memory buffers ──────────────────────────────────────────────────────

pub struct FrlMemoryBuffer {
    /// Contents followed by one trailing NUL so the start pointer can be
    /// read as a C string.
    data: Box<[u8]>,
    name: CString,
}

impl FrlMemoryBuffer {
    fn new(contents: &[u8], name: CString) -> *mut FrlMemoryBuffer {
        let mut data = Vec::with_capacity(contents.len() + 1);
        data.extend_from_slice(contents);
        data.push(0);
        record_allocation();
        Box::into_raw(Box::new(FrlMemoryBuffer {
            data: data.into_boxed_slice(),
            name,
        }))
    }

    fn len(&self) -> usize {
        self.data.len() - 1
    }
}

/// Read a whole file into a new memory buffer.
///
/// Returns `0` on success and writes the buffer to `out_buffer`. On failure
/// returns `1`, leaves `out_buffer` null and writes a native message
/// describing the error to `out_message` (release it with
/// [`frl_dispose_message`]).
///
/// # Safety
/// `path` must be a valid NUL-terminated string; the out pointers must be
/// null or writable.
#[no_mangle]
pub unsafe extern "C" fn frl_create_memory_buffer_with_contents_of_file(
    path: *const c_char,
    out_buffer: *mut *mut FrlMemoryBuffer,
    out_message: *mut *mut c_char,
) -> c_int {
    if !out_buffer.is_null() {
        *out_buffer = ptr::null_mut();
    }
    if !out_message.is_null() {
        *out_message = ptr::null_mut();
    }
    if path.is_null() {
        write_message(out_message, "no file path given");
        return 1;
    }

    let path_cstr = CStr::from_ptr(path);
    let file_path = native_path(path_cstr);
    match std::fs::read(&file_path) {
        Ok(contents) => {
            let buffer = FrlMemoryBuffer::new(&contents, path_cstr.to_owned());
            if out_buffer.is_null() {
                frl_dispose_memory_buffer(buffer);
            } else {
                *out_buffer = buffer;
            }
            0
        }
        Err(err) => {
            write_message(out_message, &format!("{}: {err}", file_path.display()));
            1
        }
    }
}

/// Paths cross the C boundary as raw bytes.
#[cfg(unix)]
fn native_path(path: &CStr) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(path.to_bytes()))
}

#[cfg(not(unix))]
fn native_path(path: &CStr) -> PathBuf {
    PathBuf::from(path.to_string_lossy().into_owned())
}

unsafe fn write_message(out_message: *mut *mut c_char, text: &str) {
    if !out_message.is_null() {
        *out_message = new_message(text.as_bytes());
    }
}

/// Copy `length` bytes starting at `data` into a new memory buffer.
///
/// # Safety
/// `data` must be valid for `length` bytes (or null with `length == 0`);
/// `name` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn frl_create_memory_buffer_with_memory_range_copy(
    data: *const c_char,
    length: usize,
    name: *const c_char,
) -> *mut FrlMemoryBuffer {
    let contents: &[u8] = if data.is_null() || length == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(data.cast::<u8>(), length)
    };
    let name = if name.is_null() {
        CString::default()
    } else {
        CStr::from_ptr(name).to_owned()
    };
    FrlMemoryBuffer::new(contents, name)
}

/// Pointer to the first byte of the buffer. The contents are followed by a NUL.
///
/// # Safety
/// `buffer` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_buffer_start(buffer: *const FrlMemoryBuffer) -> *const c_char {
    (*buffer).data.as_ptr().cast::<c_char>()
}

/// Size of the buffer contents in bytes, excluding the trailing NUL.
///
/// # Safety
/// `buffer` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_buffer_size(buffer: *const FrlMemoryBuffer) -> usize {
    (*buffer).len()
}

/// Identifier the buffer was created with (the file path for file buffers).
///
/// # Safety
/// `buffer` must be live.
#[no_mangle]
pub unsafe extern "C" fn frl_get_buffer_identifier(
    buffer: *const FrlMemoryBuffer,
) -> *const c_char {
    (*buffer).name.as_ptr()
}

/// # Safety
/// `buffer` must be live; it is invalid after this call.
#[no_mangle]
pub unsafe extern "C" fn frl_dispose_memory_buffer(buffer: *mut FrlMemoryBuffer) {
    if buffer.is_null() {
        return;
    }
    drop(Box::from_raw(buffer));
    record_release();
}
