//! Integration tests for LoaderService
//!
//! Files are real (TempDir), the environment is an isolated MemoryEnvironment.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use shenv::application::services::LoaderService;
use shenv::application::ApplicationError;
use shenv::domain::DomainError;
use shenv::infrastructure::traits::RealFileSystem;
use shenv::infrastructure::{EnvironmentStore, MemoryEnvironment};

fn loader() -> LoaderService {
    LoaderService::new(Arc::new(RealFileSystem))
}

fn write_env(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write env file");
    path
}

fn value(env: &MemoryEnvironment, name: &str) -> Option<String> {
    env.get(name).expect("memory store never fails")
}

#[test]
fn given_valid_file_when_load_files_then_sets_every_assignment() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = write_env(
        temp.path(),
        ".env",
        "# database\nDB_HOST=localhost\nDB_PASS='s3cr'\\''t'\n\nGREETING=\"say \\\"hi\\\"\"\n",
    );
    let mut env = MemoryEnvironment::new();

    // Act
    let report = loader().load_files(&mut env, [&file]).unwrap();

    // Assert
    assert_eq!(value(&env, "DB_HOST").as_deref(), Some("localhost"));
    assert_eq!(value(&env, "DB_PASS").as_deref(), Some("s3cr't"));
    assert_eq!(value(&env, "GREETING").as_deref(), Some("say \"hi\""));
    assert_eq!(report.files_read, 1);
    assert_eq!(report.loaded, 3);
    assert_eq!(report.skipped_existing, 0);
}

#[test]
fn given_name_already_bound_when_load_files_then_live_value_wins() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let base = write_env(temp.path(), ".env", "PORT=8080\n");
    let local = write_env(temp.path(), ".env.local", "PORT=9090\n");
    let mut env: MemoryEnvironment = [("PORT", "3000")].into_iter().collect();

    // Act
    let report = loader().load_files(&mut env, [&base, &local]).unwrap();

    // Assert
    assert_eq!(value(&env, "PORT").as_deref(), Some("3000"));
    assert_eq!(report.loaded, 0);
    assert_eq!(report.skipped_existing, 2);
}

#[test]
fn given_two_files_defining_name_when_load_files_then_last_file_wins() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let base = write_env(temp.path(), ".env", "MODE=dev\nONLY_BASE=1\n");
    let local = write_env(temp.path(), ".env.local", "MODE=prod\n");
    let mut env = MemoryEnvironment::new();

    // Act
    let report = loader().load_files(&mut env, [&base, &local]).unwrap();

    // Assert
    assert_eq!(value(&env, "MODE").as_deref(), Some("prod"));
    assert_eq!(value(&env, "ONLY_BASE").as_deref(), Some("1"));
    assert_eq!(report.loaded, 2);
}

#[test]
fn given_bad_line_in_second_file_when_load_files_then_nothing_is_set() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let a = write_env(temp.path(), "a.env", "FROM_A=1\nSHARED=a\n");
    let b = write_env(temp.path(), "b.env", "FROM_B=2\nBROKEN=$HOME\n");
    let mut env: MemoryEnvironment = [("KEEP", "me")].into_iter().collect();
    let before = env.clone();

    // Act
    let result = loader().load_files(&mut env, [&a, &b]);

    // Assert
    match result {
        Err(ApplicationError::Domain(DomainError::Syntax(err))) => {
            assert_eq!(err.len(), 1);
            assert_eq!(err.errors[0].line, 2);
            assert_eq!(err.errors[0].file.as_deref(), Some(b.as_path()));
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
    assert_eq!(env, before);
}

#[test]
fn given_errors_in_several_files_when_load_files_then_reports_all_of_them() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let a = write_env(temp.path(), "a.env", "OK=1\nBAD=\"open\n");
    let b = write_env(temp.path(), "b.env", "GLOB=*.rs\nFINE=yes\nSUB=`ls`\n");
    let mut env = MemoryEnvironment::new();

    // Act
    let err = loader().load_files(&mut env, [&a, &b]).unwrap_err();

    // Assert
    let syntax = match err {
        ApplicationError::Domain(DomainError::Syntax(syntax)) => syntax,
        other => panic!("expected syntax error, got {other:?}"),
    };
    let locations: Vec<(PathBuf, usize)> = syntax
        .errors
        .iter()
        .map(|e| (e.file.clone().unwrap(), e.line))
        .collect();
    assert_eq!(locations, vec![(a.clone(), 2), (b.clone(), 1), (b.clone(), 3)]);
    let message = syntax.to_string();
    assert!(message.contains("3 syntax errors"), "{message}");
    assert!(message.contains(&format!("{}:2", a.display())), "{message}");
    assert!(env.as_map().is_empty());
}

#[test]
fn given_missing_file_when_load_files_then_fails_before_any_mutation() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let present = write_env(temp.path(), ".env", "PRESENT=1\n");
    let missing = temp.path().join("missing.env");
    let mut env = MemoryEnvironment::new();

    // Act
    let result = loader().load_files(&mut env, [&present, &missing]);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::OperationFailed { ref context, .. }) if context.contains("missing.env")
    ));
    assert!(!env.has("PRESENT"));
}

#[test]
fn given_crlf_and_cr_line_endings_when_load_files_then_values_have_no_carriage_returns() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = write_env(temp.path(), ".env", "WIN=1\r\nMAC=2\rUNIX=3\n");
    let mut env = MemoryEnvironment::new();

    // Act
    loader().load_files(&mut env, [&file]).unwrap();

    // Assert
    assert_eq!(value(&env, "WIN").as_deref(), Some("1"));
    assert_eq!(value(&env, "MAC").as_deref(), Some("2"));
    assert_eq!(value(&env, "UNIX").as_deref(), Some("3"));
}

#[test]
fn given_no_files_when_load_files_then_reports_nothing() {
    // Arrange
    let mut env = MemoryEnvironment::new();

    // Act
    let report = loader()
        .load_files(&mut env, Vec::<PathBuf>::new())
        .unwrap();

    // Assert
    assert_eq!(report.files_read, 0);
    assert_eq!(report.loaded, 0);
}

#[test]
fn given_bad_lines_when_scan_then_returns_partial_queue_with_errors() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = write_env(temp.path(), ".env", "A=1\nexport B=2\nC=3\n");
    let env = MemoryEnvironment::new();

    // Act
    let staged = loader().scan(&env, [&file]).unwrap();

    // Assert
    assert_eq!(staged.queue.len(), 2);
    assert_eq!(staged.queue.get("C"), Some("3"));
    assert_eq!(staged.errors.len(), 1);
    assert_eq!(staged.errors[0].line, 2);
    assert!(staged.into_result().is_err());
}

#[test]
fn given_repeated_names_when_stage_then_queue_keeps_first_position_and_last_value() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let a = write_env(temp.path(), "a.env", "FIRST=a\nSECOND=a\n");
    let b = write_env(temp.path(), "b.env", "THIRD=b\nFIRST=b\n");
    let env = MemoryEnvironment::new();

    // Act
    let staged = loader().stage(&env, [&a, &b]).unwrap();

    // Assert
    let order: Vec<(&str, &str)> = staged
        .queue
        .iter()
        .map(|entry| (entry.name.as_str(), entry.value.as_str()))
        .collect();
    assert_eq!(order, vec![("FIRST", "b"), ("SECOND", "a"), ("THIRD", "b")]);
}

#[test]
fn given_nul_byte_in_later_line_when_load_files_then_syntax_error_and_nothing_set() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = write_env(temp.path(), ".env", "FIRST=1\nWITH_NUL=a\0b\n");
    let mut env = MemoryEnvironment::new();

    // Act
    let result = loader().load_files(&mut env, [&file]);

    // Assert
    match result {
        Err(ApplicationError::Domain(DomainError::Syntax(err))) => {
            assert_eq!(err.len(), 1);
            assert_eq!(err.errors[0].line, 2);
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
    assert!(env.as_map().is_empty());
}
