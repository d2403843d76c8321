//! Native strings and memory buffers.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use std::io::Write as _;

use ferrule::{FailureKind, FerruleError, MemoryBuffer, Message};
use pretty_assertions::assert_eq;

#[test]
fn hello_world_copy_survives_dispose() {
    let mut message = Message::new("Hello World").unwrap();
    assert_eq!(message.len().unwrap(), 11);
    assert!(!message.is_empty().unwrap());

    let copy = message.get_string().unwrap();
    message.dispose().unwrap();

    assert_eq!(copy, "Hello World");
    assert_eq!(copy.len(), 11);
    assert!(matches!(message.get_string(), Err(FerruleError::UseAfterDispose { .. })));
}

#[test]
fn interior_nul_is_an_invalid_name() {
    let err = Message::new("a\0b").unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::InvalidName));
    assert!(err.is_recoverable());
}

#[test]
fn buffer_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"define void @f()\n").unwrap();
    file.flush().unwrap();

    let buffer = MemoryBuffer::from_file(file.path()).unwrap();
    assert_eq!(buffer.size().unwrap(), 17);
    assert_eq!(buffer.get_string().unwrap(), "define void @f()\n");
    assert_eq!(buffer.byte_at(0).unwrap(), Some(b'd'));
    assert_eq!(buffer.byte_at(17).unwrap(), None);
    assert_eq!(buffer.identifier().unwrap(), file.path().to_string_lossy());
}

#[cfg(unix)]
#[test]
fn non_utf8_file_name_is_read() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(OsStr::from_bytes(b"caf\xe9.ir"));
    std::fs::write(&path, "ret void\n").unwrap();

    let buffer = MemoryBuffer::from_file(&path).unwrap();
    assert_eq!(buffer.get_string().unwrap(), "ret void\n");
}

#[test]
fn missing_file_is_an_external_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.ir");

    let err = MemoryBuffer::from_file(&path).unwrap_err();
    let FerruleError::External(failure) = &err else {
        panic!("expected an external failure, got {err:?}");
    };
    assert_eq!(failure.kind, FailureKind::File);
    assert!(failure.message.contains("missing.ir"), "{}", failure.message);
    assert!(err.is_recoverable());
}

#[test]
fn buffer_from_bytes() {
    let buffer = MemoryBuffer::from_bytes("inline", &[0xde, 0xad, 0xbe, 0xef]).unwrap();
    assert_eq!(buffer.as_bytes().unwrap(), &[0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(buffer.identifier().unwrap(), "inline");

    let empty = MemoryBuffer::from_bytes("empty", &[]).unwrap();
    assert_eq!(empty.size().unwrap(), 0);
    assert_eq!(empty.get_string().unwrap(), "");
}
