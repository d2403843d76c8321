//! Ownership and disposal of native resources through the public API.
//!
//! The native library keeps per-thread allocation and release counters, so
//! each test compares counter deltas taken on its own thread.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use ferrule::sys::{frl_debug_allocation_count, frl_debug_release_count};
use ferrule::{Context, Disposable, FerruleError, MemoryBuffer, Message};
use pretty_assertions::assert_eq;

struct Counters {
    allocated: u64,
    released: u64,
}

impl Counters {
    fn now() -> Self {
        Counters {
            allocated: frl_debug_allocation_count(),
            released: frl_debug_release_count(),
        }
    }

    fn allocated_since(&self) -> u64 {
        frl_debug_allocation_count() - self.allocated
    }

    fn released_since(&self) -> u64 {
        frl_debug_release_count() - self.released
    }
}

#[test]
fn double_dispose_releases_once() {
    let before = Counters::now();
    let mut message = Message::new("twice").unwrap();
    assert_eq!(before.allocated_since(), 1);

    message.dispose().unwrap();
    assert_eq!(before.released_since(), 1);
    assert_eq!(message.dispose().unwrap_err(), FerruleError::DoubleDispose { kind: "message" });
    assert_eq!(before.released_since(), 1);

    drop(message);
    assert_eq!(before.released_since(), 1);
}

#[test]
fn use_after_dispose_is_an_error() {
    let mut buffer = MemoryBuffer::from_bytes("bytes", b"abc").unwrap();
    buffer.dispose().unwrap();

    assert!(!buffer.is_valid());
    let expected = FerruleError::UseAfterDispose { kind: "memory buffer" };
    assert_eq!(buffer.size().unwrap_err(), expected);
    assert_eq!(buffer.as_bytes().unwrap_err(), expected);
    assert_eq!(buffer.get_string().unwrap_err(), expected);
    assert!(!buffer.size().unwrap_err().is_recoverable());
}

#[test]
fn disposed_context_rejects_type_queries() {
    let mut ctx = Context::new().unwrap();
    ctx.dispose().unwrap();

    let expected = FerruleError::UseAfterDispose { kind: "context" };
    assert_eq!(ctx.i32_type().unwrap_err(), expected);
    assert_eq!(ctx.create_module("late").unwrap_err(), expected);
    assert_eq!(ctx.dispose().unwrap_err(), FerruleError::DoubleDispose { kind: "context" });
}

#[test]
fn drop_releases_every_owner() {
    let before = Counters::now();
    {
        let ctx = Context::new().unwrap();
        let _module = ctx.create_module("scoped").unwrap();
        let _builder = ctx.create_builder().unwrap();
        let _buffer = MemoryBuffer::from_bytes("scoped", b"x").unwrap();
        assert_eq!(before.allocated_since(), 4);
        assert_eq!(before.released_since(), 0);
    }
    assert_eq!(before.released_since(), 4);
}

#[test]
fn early_return_releases_owner() {
    fn fails_after_acquire() -> ferrule::Result<()> {
        let message = Message::new("scoped")?;
        assert!(message.is_valid());
        Err(FerruleError::EmptyOptionAccess)
    }

    let before = Counters::now();
    assert_eq!(fails_after_acquire().unwrap_err(), FerruleError::EmptyOptionAccess);
    assert_eq!(before.allocated_since(), 1);
    assert_eq!(before.released_since(), 1);
}

#[test]
fn panic_unwinding_releases_owner() {
    let before = Counters::now();
    let result = std::panic::catch_unwind(|| {
        let _message = Message::new("unwound").unwrap();
        panic!("unwinding with a live message");
    });
    assert!(result.is_err());
    assert_eq!(before.allocated_since(), 1);
    assert_eq!(before.released_since(), 1);
}

#[test]
fn disposal_through_the_trait() {
    let ctx = Context::new().unwrap();
    let mut owners: Vec<Box<dyn Disposable + '_>> = vec![
        Box::new(ctx.create_module("a").unwrap()),
        Box::new(ctx.create_builder().unwrap()),
        Box::new(Message::new("b").unwrap()),
    ];

    for owner in &mut owners {
        owner.dispose().unwrap();
        assert!(!owner.is_valid());
    }
    for owner in &mut owners {
        assert!(matches!(owner.dispose(), Err(FerruleError::DoubleDispose { .. })));
    }
}
