#![allow(dead_code)]

use cxkit_core::{Cursor, Index, ParseOptions, TranslationUnit, UnsavedFile};
use std::path::Path;

/// Set to make engine tests fail, rather than skip, when libclang is missing.
pub const REQUIRE_LIBCLANG: &str = "CXKIT_REQUIRE_LIBCLANG";

/// A fresh index, or `None` when libclang cannot be loaded on this host.
pub fn index() -> Option<Index> {
    match Index::create(false) {
        Ok(index) => Some(index),
        Err(err) if required() => panic!("{REQUIRE_LIBCLANG} is set: {err}"),
        Err(err) => {
            eprintln!("skipping engine test: {err}");
            None
        }
    }
}

fn required() -> bool {
    std::env::var_os(REQUIRE_LIBCLANG).is_some_and(|value| !value.is_empty() && value != "0")
}

/// Parses `source` as the in-memory file `name`.
pub fn parse(name: &str, source: &str) -> Option<TranslationUnit> {
    parse_with(name, source, &[], ParseOptions::NONE)
}

pub fn parse_with(
    name: &str,
    source: &str,
    args: &[&str],
    options: ParseOptions,
) -> Option<TranslationUnit> {
    let index = index()?;
    let unsaved = [UnsavedFile::new(name, source)];
    Some(
        index
            .parse(Some(Path::new(name)), args, &unsaved, options)
            .unwrap(),
    )
}

/// First cursor in the unit, in preorder, spelled `spelling`.
pub fn find(unit: &TranslationUnit, spelling: &str) -> Cursor {
    unit.cursor()
        .walk_preorder()
        .find(|cursor| cursor.spelling() == spelling)
        .unwrap_or_else(|| panic!("no cursor named {spelling}"))
}
