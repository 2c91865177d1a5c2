mod common;

use cxkit_core::{CompilationDatabase, CxError, DatabaseErrorKind, HandleKind, live_handles};
use std::fs;
use tempfile::tempdir;

fn database_in(dir: &std::path::Path) -> Option<CompilationDatabase> {
    common::index()?;
    let entries = serde_json::json!([{
        "directory": dir,
        "command": "cc -c -DFOO=1 a.c",
        "file": "a.c",
    }]);
    fs::write(dir.join("compile_commands.json"), entries.to_string()).unwrap();
    Some(CompilationDatabase::from_directory(dir).unwrap())
}

#[test]
fn test_commands_for_a_known_file() {
    let dir = tempdir().unwrap();
    let Some(database) = database_in(dir.path()) else {
        return;
    };
    let commands = database
        .compile_commands(dir.path().join("a.c"))
        .unwrap()
        .unwrap();
    assert_eq!(commands.len(), 1);
    assert!(commands.get(1).is_none());

    let command = commands.get(0).unwrap();
    assert_eq!(command.directory(), dir.path());
    assert!(command.filename().ends_with("a.c"));
    let arguments = command.arguments();
    assert_eq!(arguments.first().map(String::as_str), Some("cc"));
    assert!(arguments.iter().any(|arg| arg == "-DFOO=1"));
}

#[test]
fn test_unknown_file_has_no_commands() {
    let dir = tempdir().unwrap();
    let Some(database) = database_in(dir.path()) else {
        return;
    };
    let commands = database
        .compile_commands(dir.path().join("missing.c"))
        .unwrap();
    assert!(commands.is_none());
}

#[test]
fn test_all_commands() {
    let dir = tempdir().unwrap();
    let Some(database) = database_in(dir.path()) else {
        return;
    };
    let all = database.all_compile_commands().unwrap();
    assert_eq!(all.iter().count(), 1);
}

#[test]
fn test_missing_database_is_an_error() {
    if common::index().is_none() {
        return;
    }
    let dir = tempdir().unwrap();
    let err = CompilationDatabase::from_directory(dir.path().join("nowhere")).unwrap_err();
    assert!(matches!(
        err,
        CxError::Database {
            kind: DatabaseErrorKind::CannotLoadDatabase,
            ..
        }
    ));
}

#[test]
fn test_commands_keep_the_database_alive() {
    let dir = tempdir().unwrap();
    let Some(database) = database_in(dir.path()) else {
        return;
    };
    let command = database
        .compile_commands(dir.path().join("a.c"))
        .unwrap()
        .unwrap()
        .get(0)
        .unwrap();
    drop(database);
    assert_eq!(live_handles(HandleKind::CompilationDatabase), 1);
    assert_eq!(live_handles(HandleKind::CompileCommands), 1);
    assert!(command.arguments().len() >= 3);

    drop(command);
    assert_eq!(live_handles(HandleKind::CompileCommands), 0);
    assert_eq!(live_handles(HandleKind::CompilationDatabase), 0);
}
