//! Process-wide configuration and the diagnostics it switches on.
//!
//! This binary installs its own configuration before any wrapper exists,
//! so it must stay in a test file of its own.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use std::io;
use std::sync::{Arc, Mutex, Once};

use ferrule::{BindingConfig, Context, FailureKind};
use pretty_assertions::assert_eq;
use tracing_subscriber::fmt::MakeWriter;

const INSTALLED: BindingConfig = BindingConfig {
    warn_on_implicit_release: true,
    debug_ir: true,
};

static INSTALL: Once = Once::new();

fn install() {
    INSTALL.call_once(|| assert!(INSTALLED.install()));
}

/// Shared buffer the fmt subscriber writes into.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Captured {
        self.clone()
    }
}

fn capture_warnings(f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    captured.text()
}

#[test]
fn installed_config_wins_over_environment() {
    install();
    assert_eq!(BindingConfig::current(), INSTALLED);
    assert!(!BindingConfig::default().install());
    assert_eq!(BindingConfig::current(), INSTALLED);
}

#[test]
fn implicit_release_warns() {
    install();
    let output = capture_warnings(|| {
        let ctx = Context::new().unwrap();
        drop(ctx);
    });
    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("native resource released by drop, not dispose()"), "{output}");
    assert!(output.contains("kind=\"context\""), "{output}");
}

#[test]
fn explicit_dispose_does_not_warn() {
    install();
    let output = capture_warnings(|| {
        let mut ctx = Context::new().unwrap();
        ctx.dispose().unwrap();
    });
    assert_eq!(output, "");
}

#[test]
fn debug_ir_keeps_the_verification_error() {
    install();
    let ctx = Context::new().unwrap();
    let module = ctx.create_module("broken").unwrap();
    let void = ctx.void_type().unwrap();
    let function = module.add_function("f", ctx.function_type(void, &[], false).unwrap()).unwrap();
    ctx.append_basic_block(function, "entry").unwrap();

    let err = module.verify().unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Verification));
}
