mod common;

use cxkit_core::{
    CompleteOptions, CompletionChunkKind, Cursor, CursorKind, CxError, HandleKind, UnsavedFile,
    live_handles,
};

const SOURCE: &str = "struct S { int member; double other; };\nvoid f(struct S s) { s. }\n";

#[test]
fn test_member_completion() {
    let Some(unit) = common::parse("complete.c", SOURCE) else {
        return;
    };
    let unsaved = [UnsavedFile::new("complete.c", SOURCE)];
    let results = unit
        .code_complete("complete.c", 2, 24, &unsaved, CompleteOptions::default())
        .unwrap()
        .unwrap();
    assert!(!results.is_empty());
    assert!(results.get(results.len()).is_none());

    let member = results
        .iter()
        .find(|result| {
            result.string().chunks().any(|chunk| {
                chunk.kind() == CompletionChunkKind::TypedText && chunk.spelling() == "member"
            })
        })
        .unwrap();
    assert_eq!(member.kind(), CursorKind::FIELD_DECL);

    let string = member.string();
    assert!(!string.is_empty());
    assert_eq!(string.chunk(0).unwrap().kind(), CompletionChunkKind::ResultType);
    assert_eq!(string.chunk(0).unwrap().spelling(), "int");
    assert!(string.to_string().contains("member"));
    assert!(string.priority() > 0);
}

#[test]
fn test_completion_results_outlive_the_request() {
    let Some(unit) = common::parse("complete.c", SOURCE) else {
        return;
    };
    let unsaved = [UnsavedFile::new("complete.c", SOURCE)];
    let results = unit
        .code_complete("complete.c", 2, 24, &unsaved, CompleteOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(live_handles(HandleKind::CompletionResults), 1);

    let strings: Vec<_> = results.iter().map(|result| result.string()).collect();
    drop(results);
    drop(unit);
    assert_eq!(live_handles(HandleKind::CompletionResults), 1);
    assert!(strings.iter().any(|string| string.to_string().contains("other")));

    drop(strings);
    assert_eq!(live_handles(HandleKind::CompletionResults), 0);
    assert_eq!(live_handles(HandleKind::TranslationUnit), 0);
}

#[test]
fn test_completion_locations_do_not_address_the_unit() {
    let source = "int y = missing;\nstruct S { int member; };\nvoid f(struct S s) { s. }\n";
    let Some(unit) = common::parse("broken.c", source) else {
        return;
    };
    let unsaved = [UnsavedFile::new("broken.c", source)];
    let results = unit
        .code_complete("broken.c", 3, 24, &unsaved, CompleteOptions::default())
        .unwrap()
        .unwrap();
    for diagnostic in results.diagnostics() {
        let location = diagnostic.location();
        let err = Cursor::from_location(&location).unwrap_err();
        assert!(matches!(
            err,
            CxError::Precondition {
                operation: "from_location",
                ..
            }
        ));
        for range in diagnostic.ranges() {
            assert!(unit.tokens(&range).is_err());
        }
    }

    let own = unit.diagnostics().get(0).unwrap().location();
    assert!(Cursor::from_location(&own).is_ok());
}
