//! Tests against the real process environment.
//!
//! Serialized: every test here mutates process-global state.

use std::fs;
use std::sync::Arc;

use serial_test::serial;
use tempfile::TempDir;

use shenv::application::services::{EnvReader, LoaderService};
use shenv::application::ApplicationError;
use shenv::domain::DomainError;
use shenv::infrastructure::traits::{LibcProcessGlobals, ProcessGlobals, RealFileSystem};
use shenv::infrastructure::{EnvironmentStore, ProcessEnvironment};

#[test]
#[serial]
fn given_exported_variable_when_new_store_then_visible() {
    // Arrange
    std::env::set_var("SHENV_TEST_EXPORTED", "from-parent");

    // Act
    let env = ProcessEnvironment::new();

    // Assert
    assert!(env.has("SHENV_TEST_EXPORTED"));
    assert_eq!(
        env.get("SHENV_TEST_EXPORTED").unwrap().as_deref(),
        Some("from-parent")
    );
    std::env::remove_var("SHENV_TEST_EXPORTED");
}

#[test]
#[serial]
fn given_set_when_reading_std_env_then_value_is_exported() {
    // Arrange
    let mut env = ProcessEnvironment::new();

    // Act
    env.set("SHENV_TEST_SET", "exported").unwrap();

    // Assert
    assert_eq!(std::env::var("SHENV_TEST_SET").as_deref(), Ok("exported"));
    env.unset("SHENV_TEST_SET").unwrap();
    assert!(std::env::var_os("SHENV_TEST_SET").is_none());
    assert!(!env.has("SHENV_TEST_SET"));
}

#[test]
#[serial]
fn given_unbound_name_when_unset_twice_then_ok() {
    let mut env = ProcessEnvironment::new();

    assert!(env.unset("SHENV_TEST_NEVER_BOUND").is_ok());
    assert!(env.unset("SHENV_TEST_NEVER_BOUND").is_ok());
}

#[test]
#[serial]
fn given_invalid_name_when_set_then_mutation_error() {
    let mut env = ProcessEnvironment::new();

    let result = env.set("SHENV=BROKEN", "x");

    assert!(result.is_err());
    assert!(!env.has("SHENV=BROKEN"));
}

#[test]
#[serial]
fn given_exported_variable_when_load_files_then_file_does_not_override() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = temp.path().join(".env");
    fs::write(
        &file,
        "SHENV_TEST_PRESET=from-file\nSHENV_TEST_FRESH=42\n",
    )
    .unwrap();
    std::env::set_var("SHENV_TEST_PRESET", "from-parent");
    let mut env = ProcessEnvironment::new();

    // Act
    LoaderService::new(Arc::new(RealFileSystem))
        .load_files(&mut env, [&file])
        .unwrap();

    // Assert
    let reader = EnvReader::new(&env);
    assert_eq!(reader.get("SHENV_TEST_PRESET", None).unwrap(), "from-parent");
    assert_eq!(reader.get_int("SHENV_TEST_FRESH", None).unwrap(), 42);
    assert_eq!(std::env::var("SHENV_TEST_FRESH").as_deref(), Ok("42"));

    env.unset("SHENV_TEST_PRESET").unwrap();
    env.unset("SHENV_TEST_FRESH").unwrap();
}

#[test]
#[serial]
fn given_nul_byte_in_file_when_load_files_then_process_env_untouched() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = temp.path().join(".env");
    fs::write(&file, "SHENV_TEST_BEFORE_NUL=1\nSHENV_TEST_NUL=a\0b\n").unwrap();
    let mut env = ProcessEnvironment::new();

    // Act
    let result = LoaderService::new(Arc::new(RealFileSystem)).load_files(&mut env, [&file]);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Syntax(_)))
    ));
    assert!(std::env::var_os("SHENV_TEST_BEFORE_NUL").is_none());
    assert!(!env.has("SHENV_TEST_BEFORE_NUL"));
}

#[cfg(unix)]
#[test]
#[serial]
fn given_tz_when_reload_timezone_then_libc_accepts_it() {
    // Arrange
    let previous = std::env::var_os("TZ");
    std::env::set_var("TZ", "UTC");

    // Act
    LibcProcessGlobals.reload_timezone();

    // Restore
    match previous {
        Some(value) => std::env::set_var("TZ", value),
        None => std::env::remove_var("TZ"),
    }
    LibcProcessGlobals.reload_timezone();
}

#[cfg(unix)]
#[test]
#[serial]
fn given_c_locale_when_set_locale_from_env_then_ok() {
    // Arrange
    let previous = std::env::var_os("LC_ALL");
    std::env::set_var("LC_ALL", "C");

    // Act
    let result = LibcProcessGlobals.set_locale_from_env();

    // Assert
    match previous {
        Some(value) => std::env::set_var("LC_ALL", value),
        None => std::env::remove_var("LC_ALL"),
    }
    assert!(result.is_ok(), "{result:?}");
}
