//! Process-wide binding configuration.

use std::sync::OnceLock;

static CONFIG: OnceLock<BindingConfig> = OnceLock::new();

/// Diagnostics switches for the binding layer.
///
/// Read once per process. Call [`BindingConfig::install`] before the first
/// wrapper is created to override the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindingConfig {
    /// Emit a `warn!` event when an owning wrapper is released by `Drop`
    /// instead of an explicit `dispose()`.
    pub warn_on_implicit_release: bool,

    /// Print a module's IR to stderr when it fails verification.
    pub debug_ir: bool,
}

impl BindingConfig {
    /// Read the configuration from the environment.
    ///
    /// - `FERRULE_WARN_IMPLICIT_RELEASE`: enables `warn_on_implicit_release`
    /// - `FERRULE_DEBUG_IR`: enables `debug_ir`
    ///
    /// Any non-empty value other than `0` enables a switch.
    pub fn from_env() -> Self {
        BindingConfig::from_vars(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub(crate) fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let warn = lookup("FERRULE_WARN_IMPLICIT_RELEASE");
        let debug_ir = lookup("FERRULE_DEBUG_IR");
        BindingConfig {
            warn_on_implicit_release: flag_enabled(warn.as_deref()),
            debug_ir: flag_enabled(debug_ir.as_deref()),
        }
    }

    /// Install `self` as the process configuration.
    ///
    /// Returns `false` if a configuration was already installed or read.
    pub fn install(self) -> bool {
        CONFIG.set(self).is_ok()
    }

    /// The active configuration, read from the environment on first use.
    pub fn current() -> BindingConfig {
        *CONFIG.get_or_init(BindingConfig::from_env)
    }
}

fn flag_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|value| !value.is_empty() && value != "0")
}

#[cfg(test)]
mod tests;
