mod common;

use cxkit_core::{CursorKind, CxError, HandleKind, Position, Token, TokenKind, live_handles};

const ADD: &str = "int add(int a, int b) { return a + b; }";

#[test]
fn test_tokens_of_a_function() {
    let Some(unit) = common::parse("test.c", ADD) else {
        return;
    };
    let add = common::find(&unit, "add");
    let tokens: Vec<Token> = add.tokens().collect();
    let spellings: Vec<String> = tokens.iter().map(Token::spelling).collect();
    assert_eq!(
        spellings,
        [
            "int", "add", "(", "int", "a", ",", "int", "b", ")", "{", "return", "a", "+", "b", ";",
            "}"
        ]
    );
    assert_eq!(tokens[0].kind(), TokenKind::Keyword);
    assert_eq!(tokens[1].kind(), TokenKind::Identifier);
    assert_eq!(tokens[2].kind(), TokenKind::Punctuation);
    assert_eq!(tokens[1].location().column(), 5);
    assert_eq!(tokens[1].extent().end().column(), 8);
    assert_eq!(tokens[1].cursor().unwrap().kind(), CursorKind::FUNCTION_DECL);
}

#[test]
fn test_token_batch_lives_until_last_token_drops() {
    let Some(unit) = common::parse("test.c", ADD) else {
        return;
    };
    let add = common::find(&unit, "add");
    assert_eq!(live_handles(HandleKind::TokenBatch), 0);

    let tokens = add.tokens();
    assert_eq!(tokens.len(), 16);
    assert_eq!(live_handles(HandleKind::TokenBatch), 1);

    let mut kept: Vec<Token> = tokens.collect();
    let last = kept.pop().unwrap();
    drop(kept);
    assert_eq!(live_handles(HandleKind::TokenBatch), 1);
    assert_eq!(last.spelling(), "}");

    drop(last);
    assert_eq!(live_handles(HandleKind::TokenBatch), 0);
}

#[test]
fn test_unconsumed_iterator_releases_batch() {
    let Some(unit) = common::parse("test.c", ADD) else {
        return;
    };
    let mut tokens = unit.cursor().tokens();
    assert!(tokens.next().is_some());
    assert_eq!(live_handles(HandleKind::TokenBatch), 1);
    drop(tokens);
    assert_eq!(live_handles(HandleKind::TokenBatch), 0);
}

#[test]
fn test_tokens_of_an_explicit_range() {
    let Some(unit) = common::parse("test.c", ADD) else {
        return;
    };
    let range = unit
        .extent("test.c", Position::Offset(0), Position::Offset(7))
        .unwrap()
        .unwrap();
    let spellings: Vec<String> = unit
        .tokens(&range)
        .unwrap()
        .map(|token| token.spelling())
        .collect();
    assert_eq!(spellings, ["int", "add"]);
}

#[test]
fn test_tokens_reject_a_range_from_another_unit() {
    let (Some(first), Some(second)) = (
        common::parse("first.c", ADD),
        common::parse("second.c", "int x;"),
    ) else {
        return;
    };
    let root = first.cursor();
    let foreign = root.extent();
    let err = second.tokens(foreign).unwrap_err();
    assert!(matches!(
        err,
        CxError::Precondition {
            operation: "tokens",
            ..
        }
    ));
    assert_eq!(live_handles(HandleKind::TokenBatch), 0);
    let mut own = first.tokens(foreign).unwrap();
    assert_eq!(own.nth(1).unwrap().spelling(), "add");
}

#[test]
fn test_tokens_keep_the_unit_alive() {
    let Some(unit) = common::parse("test.c", ADD) else {
        return;
    };
    let tokens: Vec<Token> = unit.cursor().tokens().collect();
    drop(unit);
    assert_eq!(live_handles(HandleKind::TranslationUnit), 1);
    assert_eq!(tokens[1].spelling(), "add");
    drop(tokens);
    assert_eq!(live_handles(HandleKind::TranslationUnit), 0);
    assert_eq!(live_handles(HandleKind::Index), 0);
}
