//! Typed wrappers around the engine's opaque handles.
//!
//! Nothing in this module is public: raw handles carry validity preconditions
//! (they must come from a live parent), so only the façade types construct
//! them, directly from the engine call that produced them.

use crate::error::Result;
use crate::lifetime::{Disposable, HandleKind};
use clang_sys::*;
use std::ffi::{CStr, CString};
use std::path::Path;

/// Copies the text out of an engine string and disposes the string at once.
pub(crate) fn text(raw: CXString) -> String {
    text_opt(raw).unwrap_or_default()
}

/// Like [`text`], but a string with no backing data yields `None`.
pub(crate) fn text_opt(raw: CXString) -> Option<String> {
    let ptr = unsafe { clang_getCString(raw) };
    let out = if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    };
    unsafe { clang_disposeString(raw) };
    out
}

/// An empty string handle, used as an out-parameter.
pub(crate) fn empty_string() -> CXString {
    CXString {
        data: std::ptr::null(),
        private_flags: 0,
    }
}

pub(crate) fn c_string(value: &str) -> Result<CString> {
    Ok(CString::new(value)?)
}

/// Path bytes as the engine sees them. Unix paths pass through unchanged,
/// whether or not they are valid UTF-8.
#[cfg(unix)]
pub(crate) fn c_path(path: &Path) -> Result<CString> {
    use std::os::unix::ffi::OsStrExt;
    Ok(CString::new(path.as_os_str().as_bytes())?)
}

#[cfg(not(unix))]
pub(crate) fn c_path(path: &Path) -> Result<CString> {
    c_string(&path.to_string_lossy())
}

pub(crate) fn is_null_cursor(raw: CXCursor) -> bool {
    unsafe { clang_Cursor_isNull(raw) != 0 }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexHandle(pub(crate) CXIndex);

impl Disposable for IndexHandle {
    const KIND: HandleKind = HandleKind::Index;

    fn is_null(&self) -> bool {
        self.0.is_null()
    }

    unsafe fn dispose(&mut self) {
        unsafe { clang_disposeIndex(self.0) }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct UnitHandle(pub(crate) CXTranslationUnit);

impl Disposable for UnitHandle {
    const KIND: HandleKind = HandleKind::TranslationUnit;

    fn is_null(&self) -> bool {
        self.0.is_null()
    }

    unsafe fn dispose(&mut self) {
        unsafe { clang_disposeTranslationUnit(self.0) }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DiagnosticHandle(pub(crate) CXDiagnostic);

impl Disposable for DiagnosticHandle {
    const KIND: HandleKind = HandleKind::Diagnostic;

    fn is_null(&self) -> bool {
        self.0.is_null()
    }

    unsafe fn dispose(&mut self) {
        unsafe { clang_disposeDiagnostic(self.0) }
    }
}

/// One `clang_tokenize` allocation. The engine frees it as a unit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TokenBatch {
    pub(crate) unit: CXTranslationUnit,
    pub(crate) tokens: *mut CXToken,
    pub(crate) count: u32,
}

impl TokenBatch {
    /// Raw token at `index`. Callers check `index < count`.
    pub(crate) fn at(&self, index: usize) -> CXToken {
        debug_assert!(index < self.count as usize);
        unsafe { *self.tokens.add(index) }
    }

    pub(crate) fn ptr_at(&self, index: usize) -> *mut CXToken {
        debug_assert!(index < self.count as usize);
        unsafe { self.tokens.add(index) }
    }
}

impl Disposable for TokenBatch {
    const KIND: HandleKind = HandleKind::TokenBatch;

    fn is_null(&self) -> bool {
        self.tokens.is_null() || self.count == 0
    }

    unsafe fn dispose(&mut self) {
        unsafe { clang_disposeTokens(self.unit, self.tokens, self.count) }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CompletionHandle(pub(crate) *mut CXCodeCompleteResults);

impl CompletionHandle {
    pub(crate) fn len(&self) -> usize {
        unsafe { (*self.0).NumResults as usize }
    }

    pub(crate) fn result(&self, index: usize) -> CXCompletionResult {
        debug_assert!(index < self.len());
        unsafe { *(*self.0).Results.add(index) }
    }
}

impl Disposable for CompletionHandle {
    const KIND: HandleKind = HandleKind::CompletionResults;

    fn is_null(&self) -> bool {
        self.0.is_null()
    }

    unsafe fn dispose(&mut self) {
        unsafe { clang_disposeCodeCompleteResults(self.0) }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DatabaseHandle(pub(crate) CXCompilationDatabase);

impl Disposable for DatabaseHandle {
    const KIND: HandleKind = HandleKind::CompilationDatabase;

    fn is_null(&self) -> bool {
        self.0.is_null()
    }

    unsafe fn dispose(&mut self) {
        unsafe { clang_CompilationDatabase_dispose(self.0) }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CommandsHandle(pub(crate) CXCompileCommands);

impl Disposable for CommandsHandle {
    const KIND: HandleKind = HandleKind::CompileCommands;

    fn is_null(&self) -> bool {
        self.0.is_null()
    }

    unsafe fn dispose(&mut self) {
        unsafe { clang_CompileCommands_dispose(self.0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CxError;

    #[cfg(unix)]
    #[test]
    fn test_c_path_keeps_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"dir/a\xffb.c"));
        let name = c_path(path).unwrap();
        assert_eq!(name.as_bytes(), b"dir/a\xffb.c");
    }

    #[test]
    fn test_c_path_rejects_interior_nul() {
        let err = c_path(Path::new("a\0b.c")).unwrap_err();
        assert!(matches!(err, CxError::InvalidArgument(_)));
    }
}
