mod common;

use cxkit_core::{
    Cursor, CursorKind, CxError, DisplayOptions, HandleKind, ParseOptions, Position, Severity,
    SourceRange, UnsavedFile, live_handles,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const ADD: &str = "int add(int a, int b) { return a + b; }";

#[test]
fn test_missing_source_is_a_load_error() {
    let Some(index) = common::index() else {
        return;
    };
    let dir = tempdir().unwrap();
    let path = dir.path().join("non-existent.c");
    let err = index
        .parse(Some(path.as_path()), &[] as &[&str], &[], ParseOptions::NONE)
        .unwrap_err();
    assert!(matches!(err, CxError::TranslationUnitLoad { .. }));
    assert!(err.to_string().starts_with("could not parse"));
    assert!(err.to_string().contains("non-existent.c"));
    assert_eq!(live_handles(HandleKind::TranslationUnit), 0);
}

#[test]
fn test_missing_ast_file_is_a_load_error() {
    let Some(index) = common::index() else {
        return;
    };
    let dir = tempdir().unwrap();
    let err = index.read(dir.path().join("missing.ast")).unwrap_err();
    assert!(matches!(err, CxError::TranslationUnitLoad { .. }));
}

#[test]
fn test_parse_from_arguments_only() {
    let Some(index) = common::index() else {
        return;
    };
    let dir = tempdir().unwrap();
    let path = dir.path().join("args.c");
    fs::write(&path, ADD).unwrap();
    let args = [path.to_str().unwrap()];
    let unit = index.parse(None, &args, &[], ParseOptions::NONE).unwrap();
    assert!(unit.spelling().ends_with("args.c"));
    assert!(!unit.index().config().exclude_declarations_from_pch);
}

#[test]
fn test_parse_with_editing_defaults() {
    let Some(index) = common::index() else {
        return;
    };
    let options = ParseOptions::editing_defaults().unwrap();
    assert!(options.contains(ParseOptions::PRECOMPILED_PREAMBLE));
    let unsaved = [UnsavedFile::new("edit.c", ADD)];
    let unit = index
        .parse(Some(Path::new("edit.c")), &[] as &[&str], &unsaved, options)
        .unwrap();
    assert_eq!(common::find(&unit, "add").kind(), CursorKind::FUNCTION_DECL);
}

#[test]
fn test_save_and_read_round_trip() {
    let Some(index) = common::index() else {
        return;
    };
    let dir = tempdir().unwrap();
    let source = dir.path().join("test.c");
    fs::write(&source, ADD).unwrap();
    let unit = index
        .parse(Some(source.as_path()), &[] as &[&str], &[], ParseOptions::NONE)
        .unwrap();
    let ast = dir.path().join("test.ast");
    unit.save(&ast).unwrap();
    assert!(ast.exists());

    let loaded = unit.index().read(&ast).unwrap();
    let add = common::find(&loaded, "add");
    assert_eq!(add.kind(), CursorKind::FUNCTION_DECL);
    assert!(!loaded.ptr_eq(&unit));
}

#[test]
fn test_save_into_missing_directory_fails() {
    let Some(unit) = common::parse("test.c", ADD) else {
        return;
    };
    let dir = tempdir().unwrap();
    let err = unit
        .save(dir.path().join("no-such-dir").join("test.ast"))
        .unwrap_err();
    assert!(matches!(err, CxError::Save(_)));
}

#[test]
fn test_diagnostics() {
    let Some(unit) = common::parse("test.c", "int f(void) { return x; }\n") else {
        return;
    };
    let diagnostics = unit.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.get(1).is_none());

    let diagnostic = diagnostics.get(0).unwrap();
    assert_eq!(diagnostic.severity(), Severity::Error);
    assert!(diagnostic.severity().is_error());
    assert!(diagnostic.spelling().contains("'x'"));
    assert_eq!(diagnostic.location().line(), 1);
    assert_eq!(diagnostic.location().column(), 22);
    assert!(!diagnostic.category_name().is_empty());

    let formatted = diagnostic.format(None).unwrap();
    assert!(formatted.contains("error"));
    let bare = diagnostic
        .format(Some(DisplayOptions::from_bits(0)))
        .unwrap();
    assert_eq!(bare, format!("error: {}", diagnostic.spelling()));
    assert!(matches!(
        diagnostic.format(Some(DisplayOptions::from_bits(0x80))),
        Err(CxError::InvalidFormatOptions(0x80))
    ));
}

#[test]
fn test_diagnostic_fixits_and_options() {
    let source = "int f(void) { return 1 }\n";
    let Some(unit) = common::parse("test.c", source) else {
        return;
    };
    let missing_semi = unit
        .diagnostics()
        .iter()
        .find(|diagnostic| diagnostic.spelling().contains("expected ';'"))
        .unwrap();
    let fixits: Vec<_> = missing_semi.fixits().collect();
    assert_eq!(fixits.len(), 1);
    assert_eq!(fixits[0].value, ";");
    assert_eq!(fixits[0].range.start().line(), 1);

    let unused = common::parse_with(
        "warn.c",
        "void f(void) { int unused; }\n",
        &["-Wunused-variable"],
        ParseOptions::NONE,
    )
    .unwrap();
    let warning = unused.diagnostics().get(0).unwrap();
    assert_eq!(warning.severity(), Severity::Warning);
    assert_eq!(warning.option(), "-Wunused-variable");
    assert_eq!(warning.disable_option(), "-Wno-unused-variable");
}

#[test]
fn test_child_diagnostics_keep_parent_alive() {
    let source = "void f(int);\nvoid f(double);\nvoid g(void) { f(); }\n";
    let Some(unit) = common::parse("test.cpp", source) else {
        return;
    };
    let error = unit
        .diagnostics()
        .iter()
        .find(|diagnostic| diagnostic.severity().is_error())
        .unwrap();
    let notes: Vec<_> = error.children().collect();
    assert!(!notes.is_empty());
    drop(error);
    for note in &notes {
        assert_eq!(note.severity(), Severity::Note);
        assert!(note.parent().is_some());
    }
}

#[test]
fn test_reparse_requires_exclusive_unit() {
    let Some(mut unit) = common::parse("test.c", ADD) else {
        return;
    };
    let root = unit.cursor();
    let changed = [UnsavedFile::new("test.c", "int sub(int a, int b) { return a - b; }")];
    assert!(matches!(
        unit.reparse(&changed, None),
        Err(CxError::Precondition {
            operation: "reparse",
            ..
        })
    ));

    drop(root);
    unit.reparse(&changed, None).unwrap();
    let sub = common::find(&unit, "sub");
    assert_eq!(sub.kind(), CursorKind::FUNCTION_DECL);
}

#[test]
fn test_includes() {
    let Some(index) = common::index() else {
        return;
    };
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.h"), "int b;\n").unwrap();
    fs::write(dir.path().join("a.h"), "#include \"b.h\"\nint a;\n").unwrap();
    let main = dir.path().join("main.c");
    fs::write(&main, "#include \"a.h\"\nint main(void) { return a + b; }\n").unwrap();

    let unit = index
        .parse(
            Some(main.as_path()),
            &[] as &[&str],
            &[],
            ParseOptions::DETAILED_PROCESSING_RECORD,
        )
        .unwrap();

    let includes: Vec<_> = unit.includes().collect();
    assert_eq!(includes.len(), 2);
    assert!(includes[0].include().name().ends_with("a.h"));
    assert!(includes[0].source().unwrap().name().ends_with("main.c"));
    assert_eq!(includes[0].depth(), 1);
    assert!(!includes[0].is_input_file());
    assert!(includes[1].include().name().ends_with("b.h"));
    assert!(includes[1].source().unwrap().name().ends_with("a.h"));
    assert_eq!(includes[1].depth(), 2);
    assert_eq!(includes[0].location().line(), 1);

    let directive = unit
        .cursor()
        .children()
        .into_iter()
        .find(|cursor| cursor.kind() == CursorKind::INCLUSION_DIRECTIVE)
        .unwrap();
    let included = directive.included_file().unwrap().unwrap();
    assert_eq!(&included, includes[0].include());
    assert!(included.time() > 0);
}

#[test]
fn test_locations_and_ranges() {
    let Some(unit) = common::parse("test.c", ADD) else {
        return;
    };
    let by_line = unit
        .location("test.c", Position::LineColumn { line: 1, column: 5 })
        .unwrap()
        .unwrap();
    let by_offset = unit
        .location("test.c", Position::Offset(4))
        .unwrap()
        .unwrap();
    assert_eq!(by_line, by_offset);
    assert_eq!(by_offset.line(), 1);
    assert_eq!(by_offset.column(), 5);
    assert_eq!(by_offset.offset(), 4);
    assert!(by_offset.is_from_main_file());
    assert!(!by_offset.is_in_system_header());
    assert!(by_offset.file().unwrap().name().ends_with("test.c"));

    let add = Cursor::from_location(&by_offset).unwrap().unwrap();
    assert_eq!(add.spelling(), "add");

    let b = common::find(&unit, "b");
    assert!(add.extent().contains(b.location()));
    let outside = unit
        .location("test.c", Position::Offset(0))
        .unwrap()
        .unwrap();
    assert!(!b.extent().contains(&outside));

    assert!(unit.file("elsewhere.c").unwrap().is_none());
    assert!(unit
        .location(Path::new("elsewhere.c"), Position::Offset(0))
        .unwrap()
        .is_none());
}

#[test]
fn test_range_ends_must_share_a_unit() {
    let (Some(first), Some(second)) = (
        common::parse("first.c", ADD),
        common::parse("second.c", ADD),
    ) else {
        return;
    };
    let start = first.location("first.c", Position::Offset(0)).unwrap().unwrap();
    let end = second.location("second.c", Position::Offset(7)).unwrap().unwrap();
    let err = SourceRange::from_locations(&start, &end).unwrap_err();
    assert!(matches!(
        err,
        CxError::Precondition {
            operation: "from_locations",
            ..
        }
    ));

    let end = first.location("first.c", Position::Offset(7)).unwrap().unwrap();
    let range = SourceRange::from_locations(&start, &end).unwrap();
    assert_eq!(range.end().column(), 8);
}

#[test]
fn test_units_on_separate_threads() {
    if common::index().is_none() {
        return;
    }
    let workers: Vec<_> = (0..2)
        .map(|i| {
            std::thread::spawn(move || {
                let name = format!("f{i}");
                let source = format!("int {name}(void) {{ return {i}; }}");
                let unit = common::parse("thread.c", &source).unwrap();
                common::find(&unit, &name).spelling().to_string()
            })
        })
        .collect();
    let names: Vec<_> = workers
        .into_iter()
        .map(|worker| worker.join().unwrap())
        .collect();
    assert_eq!(names, ["f0", "f1"]);
}

#[test]
fn test_everything_is_disposed() {
    {
        let Some(unit) = common::parse("test.c", "int f(void) { return x; }\n") else {
            return;
        };
        let _cursor = common::find(&unit, "f");
        let _diagnostics: Vec<_> = unit.diagnostics().iter().collect();
        assert_eq!(live_handles(HandleKind::Index), 1);
        assert_eq!(live_handles(HandleKind::TranslationUnit), 1);
        assert_eq!(live_handles(HandleKind::Diagnostic), 1);
    }
    assert_eq!(live_handles(HandleKind::Diagnostic), 0);
    assert_eq!(live_handles(HandleKind::TranslationUnit), 0);
    assert_eq!(live_handles(HandleKind::Index), 0);
}
