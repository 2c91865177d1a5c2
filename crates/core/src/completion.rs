use crate::diagnostic::Diagnostic;
use crate::handle::{CompletionHandle, text};
use crate::kinds::{AvailabilityKind, CompletionChunkKind, CursorKind};
use crate::lifetime::{Anchor, Owned};
use crate::unit::TranslationUnit;
use clang_sys::*;
use once_cell::unsync::OnceCell;
use std::fmt;
use std::rc::Rc;

/// What code completion should include besides plain declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompleteOptions {
    pub include_macros: bool,
    pub include_code_patterns: bool,
    pub include_brief_comments: bool,
}

impl CompleteOptions {
    pub fn bits(self) -> u32 {
        let mut bits = 0;
        if self.include_macros {
            bits |= 0x01;
        }
        if self.include_code_patterns {
            bits |= 0x02;
        }
        if self.include_brief_comments {
            bits |= 0x04;
        }
        bits
    }
}

struct CompletionInner {
    handle: Owned<CompletionHandle>,
    unit: TranslationUnit,
}

/// The candidates produced by one code completion request.
#[derive(Clone)]
pub struct CodeCompletionResults {
    inner: Rc<CompletionInner>,
}

impl CodeCompletionResults {
    pub(crate) fn from_raw(
        raw: *mut CXCodeCompleteResults,
        unit: &TranslationUnit,
    ) -> Option<Self> {
        let handle = Owned::new(CompletionHandle(raw))?;
        Some(Self {
            inner: Rc::new(CompletionInner {
                handle,
                unit: unit.clone(),
            }),
        })
    }

    fn raw(&self) -> *mut CXCodeCompleteResults {
        self.inner.handle.get().0
    }

    pub fn len(&self) -> usize {
        self.inner.handle.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<CodeCompletionResult> {
        if index >= self.len() {
            return None;
        }
        Some(CodeCompletionResult {
            raw: self.inner.handle.get().result(index),
            results: self.clone(),
        })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = CodeCompletionResult> + '_ {
        (0..self.len()).map(|index| CodeCompletionResult {
            raw: self.inner.handle.get().result(index),
            results: self.clone(),
        })
    }

    /// Diagnostics produced while completing.
    pub fn diagnostics(&self) -> impl Iterator<Item = Diagnostic> + '_ {
        let count = unsafe { clang_codeCompleteGetNumDiagnostics(self.raw()) };
        let anchor: Anchor = self.inner.clone();
        (0..count).filter_map(move |i| {
            let raw = unsafe { clang_codeCompleteGetDiagnostic(self.raw(), i) };
            Diagnostic::from_raw(raw, &self.inner.unit, None, Some(&anchor))
        })
    }
}

impl fmt::Debug for CodeCompletionResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeCompletionResults")
            .field("len", &self.len())
            .finish()
    }
}

/// One completion candidate.
#[derive(Clone)]
pub struct CodeCompletionResult {
    raw: CXCompletionResult,
    results: CodeCompletionResults,
}

impl CodeCompletionResult {
    /// Kind of the entity being completed.
    pub fn kind(&self) -> CursorKind {
        CursorKind::from_raw(self.raw.CursorKind)
    }

    pub fn string(&self) -> CompletionString {
        CompletionString {
            raw: self.raw.CompletionString,
            results: self.results.clone(),
        }
    }
}

impl fmt::Debug for CodeCompletionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeCompletionResult")
            .field("kind", &self.kind())
            .field("string", &self.string())
            .finish()
    }
}

/// The text of a completion candidate, split into chunks.
#[derive(Clone)]
pub struct CompletionString {
    raw: CXCompletionString,
    results: CodeCompletionResults,
}

impl CompletionString {
    pub fn len(&self) -> usize {
        unsafe { clang_getNumCompletionChunks(self.raw) as usize }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn chunk(&self, index: usize) -> Option<CompletionChunk> {
        if index >= self.len() {
            return None;
        }
        Some(CompletionChunk::new(self.clone(), index as u32))
    }

    pub fn chunks(&self) -> impl ExactSizeIterator<Item = CompletionChunk> + '_ {
        (0..self.len() as u32).map(|index| CompletionChunk::new(self.clone(), index))
    }

    /// Lower is more likely to be what the user wants.
    pub fn priority(&self) -> u32 {
        unsafe { clang_getCompletionPriority(self.raw) }
    }

    pub fn availability(&self) -> AvailabilityKind {
        AvailabilityKind::from_raw(unsafe { clang_getCompletionAvailability(self.raw) })
    }

    pub fn brief_comment(&self) -> String {
        text(unsafe { clang_getCompletionBriefComment(self.raw) })
    }
}

impl fmt::Display for CompletionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.chunks() {
            f.write_str(chunk.spelling())?;
        }
        Ok(())
    }
}

impl fmt::Debug for CompletionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionString")
            .field("text", &self.to_string())
            .field("priority", &self.priority())
            .field("availability", &self.availability())
            .finish()
    }
}

/// One piece of a completion string: typed text, a placeholder, punctuation...
#[derive(Clone)]
pub struct CompletionChunk {
    completion: CompletionString,
    index: u32,
    spelling: OnceCell<String>,
    kind: OnceCell<CompletionChunkKind>,
}

impl CompletionChunk {
    fn new(completion: CompletionString, index: u32) -> Self {
        Self {
            completion,
            index,
            spelling: OnceCell::new(),
            kind: OnceCell::new(),
        }
    }

    pub fn spelling(&self) -> &str {
        self.spelling.get_or_init(|| {
            text(unsafe { clang_getCompletionChunkText(self.completion.raw, self.index) })
        })
    }

    pub fn kind(&self) -> CompletionChunkKind {
        *self.kind.get_or_init(|| {
            CompletionChunkKind::from_raw(unsafe {
                clang_getCompletionChunkKind(self.completion.raw, self.index)
            })
        })
    }

    /// Nested completion string of an optional chunk.
    pub fn string(&self) -> Option<CompletionString> {
        let raw =
            unsafe { clang_getCompletionChunkCompletionString(self.completion.raw, self.index) };
        if raw.is_null() {
            return None;
        }
        Some(CompletionString {
            raw,
            results: self.completion.results.clone(),
        })
    }
}

impl fmt::Debug for CompletionChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionChunk")
            .field("kind", &self.kind())
            .field("spelling", &self.spelling())
            .finish()
    }
}
