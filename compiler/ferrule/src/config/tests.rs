#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use super::*;

fn config_from(vars: &[(&str, &str)]) -> BindingConfig {
    BindingConfig::from_vars(|name| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| (*value).to_owned())
    })
}

#[test]
fn flag_values() {
    assert!(!flag_enabled(None));
    assert!(!flag_enabled(Some("")));
    assert!(!flag_enabled(Some("0")));
    assert!(flag_enabled(Some("1")));
    assert!(flag_enabled(Some("yes")));
    // Only the exact string "0" disables.
    assert!(flag_enabled(Some("00")));
    assert!(flag_enabled(Some("false")));
}

#[test]
fn unset_environment_is_default() {
    assert_eq!(config_from(&[]), BindingConfig::default());
}

#[test]
fn each_variable_drives_its_switch() {
    assert_eq!(
        config_from(&[("FERRULE_DEBUG_IR", "1")]),
        BindingConfig {
            warn_on_implicit_release: false,
            debug_ir: true,
        }
    );
    assert_eq!(
        config_from(&[("FERRULE_WARN_IMPLICIT_RELEASE", "on"), ("FERRULE_DEBUG_IR", "0")]),
        BindingConfig {
            warn_on_implicit_release: true,
            debug_ir: false,
        }
    );
}
