//! Adapters from the engine's push-style visitors to collected sequences.
//!
//! Each trampoline only appends to its accumulator and tells the engine to
//! carry on; nothing inside a trampoline can panic, so no unwind ever crosses
//! the native frame. Checks on what was collected run after the engine call
//! has returned.

use crate::cursor::Cursor;
use crate::handle::is_null_cursor;
use crate::source::{File, FileInclusion, SourceLocation};
use crate::types::Type;
use crate::unit::TranslationUnit;
use clang_sys::*;
use std::os::raw::c_uint;
use tracing::trace;

#[derive(Default)]
struct Collected {
    cursors: Vec<(CXCursor, CXCursor)>,
    saw_null: bool,
}

impl Collected {
    fn push(&mut self, cursor: CXCursor, parent: CXCursor) -> bool {
        if is_null_cursor(cursor) {
            self.saw_null = true;
            return false;
        }
        self.cursors.push((cursor, parent));
        true
    }

    fn into_cursors(self, unit: &TranslationUnit) -> Vec<Cursor> {
        assert!(!self.saw_null, "engine visitor produced a null cursor");
        self.cursors
            .into_iter()
            .map(|(cursor, parent)| Cursor::with_parent(cursor, parent, unit))
            .collect()
    }
}

extern "C" fn collect_child(
    cursor: CXCursor,
    parent: CXCursor,
    data: CXClientData,
) -> CXChildVisitResult {
    // SAFETY: `data` is the `Collected` borrowed by `children` for the call.
    let collected = unsafe { &mut *(data as *mut Collected) };
    if collected.push(cursor, parent) {
        CXChildVisit_Continue
    } else {
        CXChildVisit_Break
    }
}

extern "C" fn collect_field(cursor: CXCursor, data: CXClientData) -> CXVisitorResult {
    // SAFETY: `data` is the `Collected` borrowed by `fields` for the call.
    let collected = unsafe { &mut *(data as *mut Collected) };
    let parent = unsafe { clang_getNullCursor() };
    if collected.push(cursor, parent) {
        CXVisit_Continue
    } else {
        CXVisit_Break
    }
}

/// Direct children of `cursor`, each stamped with the parent it was visited from.
pub fn children(cursor: &Cursor) -> Vec<Cursor> {
    let mut collected = Collected::default();
    unsafe {
        clang_visitChildren(
            cursor.raw(),
            collect_child,
            &mut collected as *mut Collected as CXClientData,
        )
    };
    trace!(count = collected.cursors.len(), "visited children");
    collected.into_cursors(cursor.translation_unit())
}

/// Field declarations of a record type, in declaration order.
pub fn fields(ty: &Type) -> Vec<Cursor> {
    let mut collected = Collected::default();
    unsafe {
        clang_Type_visitFields(
            ty.raw(),
            collect_field,
            &mut collected as *mut Collected as CXClientData,
        )
    };
    collected.into_cursors(ty.translation_unit())
}

struct Inclusion {
    file: CXFile,
    location: CXSourceLocation,
    depth: u32,
}

extern "C" fn collect_inclusion(
    file: CXFile,
    stack: *mut CXSourceLocation,
    depth: c_uint,
    data: CXClientData,
) {
    // SAFETY: `data` is the vector borrowed by `inclusions` for the call.
    let found = unsafe { &mut *(data as *mut Vec<Inclusion>) };
    if depth == 0 || stack.is_null() {
        return;
    }
    found.push(Inclusion {
        file,
        // SAFETY: the engine passes `depth` entries; the first is the directive.
        location: unsafe { *stack },
        depth,
    });
}

/// Every file pulled in by `#include`, directly or transitively.
///
/// The main file itself (depth 0) is not reported.
pub fn inclusions(unit: &TranslationUnit) -> Vec<FileInclusion> {
    let mut found: Vec<Inclusion> = Vec::new();
    unsafe {
        clang_getInclusions(
            unit.raw(),
            collect_inclusion,
            &mut found as *mut Vec<Inclusion> as CXClientData,
        )
    };
    found
        .into_iter()
        .filter_map(|inclusion| {
            let include = File::from_raw(inclusion.file, unit)?;
            let location = SourceLocation::from_raw(inclusion.location, unit);
            Some(FileInclusion::new(include, location, inclusion.depth))
        })
        .collect()
}

/// Depth-first preorder walk over a cursor and all of its descendants.
///
/// The root comes first. Children of a node are fetched when the node is
/// yielded, so abandoning the walk early skips the rest of the subtree.
pub struct Preorder {
    stack: Vec<Cursor>,
}

impl Preorder {
    pub(crate) fn new(root: Cursor) -> Self {
        Self { stack: vec![root] }
    }
}

impl Iterator for Preorder {
    type Item = Cursor;

    fn next(&mut self) -> Option<Cursor> {
        let cursor = self.stack.pop()?;
        self.stack.extend(children(&cursor).into_iter().rev());
        Some(cursor)
    }
}
