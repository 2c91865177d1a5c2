//! Translation units: one parsed source file together with everything it includes.

use crate::completion::{CodeCompletionResults, CompleteOptions};
use crate::config::UnsavedFile;
use crate::cursor::Cursor;
use crate::diagnostic::Diagnostics;
use crate::error::{CxError, ErrorCode, Result, SaveErrorKind};
use crate::handle::{UnitHandle, c_path, c_string, text};
use crate::index::Index;
use crate::library::ensure_loaded;
use crate::lifetime::Owned;
use crate::source::{File, FileInclusion, Position, SourceLocation, SourceRange};
use crate::token::{self, Tokens};
use crate::visit;
use clang_sys::*;
use once_cell::unsync::OnceCell;
use std::ffi::CString;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{BitOr, BitOrAssign};
use std::os::raw::{c_char, c_int, c_ulong};
use std::path::Path;
use std::ptr;
use std::rc::Rc;
use tracing::{debug, warn};

/// Flags that control how a translation unit is parsed. Combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParseOptions(u32);

impl ParseOptions {
    pub const NONE: Self = Self(0);
    /// Keep macro definitions and expansions in the AST.
    pub const DETAILED_PROCESSING_RECORD: Self = Self(0x01);
    /// The source is incomplete, e.g. a header parsed on its own.
    pub const INCOMPLETE: Self = Self(0x02);
    pub const PRECOMPILED_PREAMBLE: Self = Self(0x04);
    pub const CACHE_COMPLETION_RESULTS: Self = Self(0x08);
    pub const SKIP_FUNCTION_BODIES: Self = Self(0x40);
    pub const INCLUDE_BRIEF_COMMENTS_IN_CODE_COMPLETION: Self = Self(0x80);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The engine's recommended flags for a unit that will be edited and reparsed.
    pub fn editing_defaults() -> Result<Self> {
        ensure_loaded()?;
        Ok(Self(
            unsafe { clang_defaultEditingTranslationUnitOptions() } as u32,
        ))
    }
}

impl BitOr for ParseOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ParseOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// In-memory file contents handed to the engine for one call.
pub(crate) struct UnsavedBuffers<'a> {
    _names: Vec<CString>,
    raw: Vec<CXUnsavedFile>,
    _files: PhantomData<&'a [UnsavedFile]>,
}

impl<'a> UnsavedBuffers<'a> {
    pub(crate) fn new(files: &'a [UnsavedFile]) -> Result<Self> {
        let names = files
            .iter()
            .map(|file| c_path(&file.path))
            .collect::<Result<Vec<_>>>()?;
        let raw = files
            .iter()
            .zip(&names)
            .map(|(file, name)| CXUnsavedFile {
                Filename: name.as_ptr(),
                Contents: file.contents.as_ptr() as *const c_char,
                Length: file.contents.len() as c_ulong,
            })
            .collect();
        Ok(Self {
            _names: names,
            raw,
            _files: PhantomData,
        })
    }

    pub(crate) fn len(&self) -> u32 {
        self.raw.len() as u32
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut CXUnsavedFile {
        if self.raw.is_empty() {
            ptr::null_mut()
        } else {
            self.raw.as_mut_ptr()
        }
    }
}

struct UnitInner {
    handle: Owned<UnitHandle>,
    index: Index,
    spelling: OnceCell<String>,
}

/// A parsed (or loaded) compilation unit.
///
/// Cheap to clone; every clone and every cursor, type, location, token,
/// diagnostic and completion result derived from the unit keeps it alive.
#[derive(Clone)]
pub struct TranslationUnit {
    inner: Rc<UnitInner>,
}

impl TranslationUnit {
    /// Parses a source file. With no `path`, the file name is taken from `args`.
    pub fn from_source<S: AsRef<str>>(
        index: &Index,
        path: Option<&Path>,
        args: &[S],
        unsaved: &[UnsavedFile],
        options: ParseOptions,
    ) -> Result<Self> {
        let name = path.map(c_path).transpose()?;
        let args = args
            .iter()
            .map(|arg| c_string(arg.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let argv: Vec<*const c_char> = args.iter().map(|arg| arg.as_ptr()).collect();
        let mut buffers = UnsavedBuffers::new(unsaved)?;

        let mut raw: CXTranslationUnit = ptr::null_mut();
        let status = unsafe {
            clang_parseTranslationUnit2(
                index.raw(),
                name.as_ref().map_or(ptr::null(), |name| name.as_ptr()),
                argv.as_ptr(),
                argv.len() as c_int,
                buffers.as_mut_ptr(),
                buffers.len(),
                options.bits() as _,
                &mut raw,
            )
        };
        let display = path.map_or_else(
            || "<command line>".to_string(),
            |path| path.display().to_string(),
        );
        Self::adopt(raw, status as i32, index, display)
    }

    /// Loads a unit previously written with [`TranslationUnit::save`].
    pub fn from_ast_file(index: &Index, path: &Path) -> Result<Self> {
        let name = c_path(path)?;
        let mut raw: CXTranslationUnit = ptr::null_mut();
        let status = unsafe { clang_createTranslationUnit2(index.raw(), name.as_ptr(), &mut raw) };
        Self::adopt(raw, status as i32, index, path.display().to_string())
    }

    fn adopt(raw: CXTranslationUnit, status: i32, index: &Index, name: String) -> Result<Self> {
        let handle = Owned::new(UnitHandle(raw));
        match handle {
            Some(handle) if status == 0 => {
                debug!("created translation unit for {}", name);
                Ok(Self {
                    inner: Rc::new(UnitInner {
                        handle,
                        index: index.clone(),
                        spelling: OnceCell::new(),
                    }),
                })
            }
            _ => {
                warn!("could not create translation unit for {} (status {})", name, status);
                Err(CxError::TranslationUnitLoad {
                    name,
                    code: ErrorCode::from_code(status),
                })
            }
        }
    }

    pub(crate) fn raw(&self) -> CXTranslationUnit {
        self.inner.handle.get().0
    }

    /// The index this unit was created in.
    pub fn index(&self) -> &Index {
        &self.inner.index
    }

    /// Whether both values refer to the same unit.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The root cursor of the AST.
    pub fn cursor(&self) -> Cursor {
        Cursor::root(self)
    }

    /// Name of the main source file.
    pub fn spelling(&self) -> &str {
        self.inner
            .spelling
            .get_or_init(|| text(unsafe { clang_getTranslationUnitSpelling(self.raw()) }))
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::new(self)
    }

    /// Reparses the unit, optionally with new in-memory contents.
    ///
    /// Reparsing replaces the AST, so no cursor, type, location, token or
    /// diagnostic of this unit may be alive: the call fails if anything other
    /// than `self` still refers to the unit. `None` uses the engine's default
    /// reparse flags.
    pub fn reparse(&mut self, unsaved: &[UnsavedFile], options: Option<u32>) -> Result<()> {
        let references = Rc::strong_count(&self.inner);
        if references > 1 {
            return Err(CxError::Precondition {
                operation: "reparse",
                expected: "no other live references to the translation unit",
                found: format!("{} references", references),
            });
        }
        let mut buffers = UnsavedBuffers::new(unsaved)?;
        let options =
            options.unwrap_or_else(|| unsafe { clang_defaultReparseOptions(self.raw()) } as u32);
        let status = unsafe {
            clang_reparseTranslationUnit(
                self.raw(),
                buffers.len(),
                buffers.as_mut_ptr(),
                options as _,
            )
        };
        if status == 0 {
            debug!("reparsed {}", self.spelling());
            return Ok(());
        }
        warn!("reparse of {} failed with status {}", self.spelling(), status);
        match ErrorCode::from_code(status) {
            Some(code) => Err(CxError::Reparse(code)),
            None => Err(CxError::UnrecognizedCode {
                operation: "reparse",
                code: status as i64,
            }),
        }
    }

    /// Writes the unit to an AST file that [`Index::read`] can load.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let name = c_path(path.as_ref())?;
        let status = unsafe {
            let options = clang_defaultSaveOptions(self.raw());
            clang_saveTranslationUnit(self.raw(), name.as_ptr(), options)
        };
        if status == 0 {
            return Ok(());
        }
        warn!("saving {} failed with status {}", path.as_ref().display(), status);
        match SaveErrorKind::from_code(status) {
            Some(kind) => Err(CxError::Save(kind)),
            None => Err(CxError::UnrecognizedCode {
                operation: "save",
                code: status as i64,
            }),
        }
    }

    /// Code completion at a 1-based line and column of `path`.
    ///
    /// `None` when the engine produced no results object.
    pub fn code_complete(
        &self,
        path: impl AsRef<Path>,
        line: u32,
        column: u32,
        unsaved: &[UnsavedFile],
        options: CompleteOptions,
    ) -> Result<Option<CodeCompletionResults>> {
        let name = c_path(path.as_ref())?;
        let mut buffers = UnsavedBuffers::new(unsaved)?;
        let raw = unsafe {
            clang_codeCompleteAt(
                self.raw(),
                name.as_ptr(),
                line,
                column,
                buffers.as_mut_ptr(),
                buffers.len(),
                options.bits() as _,
            )
        };
        Ok(CodeCompletionResults::from_raw(raw, self))
    }

    /// Files included by the unit, excluding the main file.
    pub fn includes(&self) -> std::vec::IntoIter<FileInclusion> {
        visit::inclusions(self).into_iter()
    }

    pub fn file(&self, name: impl AsRef<Path>) -> Result<Option<File>> {
        File::from_name(self, name)
    }

    /// Location of `position` in the file called `name`.
    pub fn location(
        &self,
        name: impl AsRef<Path>,
        position: Position,
    ) -> Result<Option<SourceLocation>> {
        Ok(self.file(name)?.map(|file| file.position(position)))
    }

    /// Range between two positions in the file called `name`.
    pub fn extent(
        &self,
        name: impl AsRef<Path>,
        start: Position,
        end: Position,
    ) -> Result<Option<SourceRange>> {
        self.file(name)?
            .map(|file| SourceRange::from_locations(&file.position(start), &file.position(end)))
            .transpose()
    }

    /// Tokens within `range`, which must belong to this unit.
    pub fn tokens(&self, range: &SourceRange) -> Result<Tokens> {
        if range.is_anchored() || !range.translation_unit().ptr_eq(self) {
            return Err(CxError::Precondition {
                operation: "tokens",
                expected: "a range from this translation unit",
                found: format!("a range from {}", range.translation_unit().spelling()),
            });
        }
        Ok(token::tokenize(self, range))
    }
}

impl fmt::Debug for TranslationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationUnit")
            .field("spelling", &self.spelling())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_combine() {
        let options = ParseOptions::DETAILED_PROCESSING_RECORD | ParseOptions::SKIP_FUNCTION_BODIES;
        assert_eq!(options.bits(), 0x41);
        assert!(options.contains(ParseOptions::SKIP_FUNCTION_BODIES));
        assert!(!options.contains(ParseOptions::INCOMPLETE));

        let mut options = ParseOptions::NONE;
        options |= ParseOptions::INCLUDE_BRIEF_COMMENTS_IN_CODE_COMPLETION;
        assert_eq!(options, ParseOptions::from_bits(0x80));
        assert_eq!(ParseOptions::default(), ParseOptions::NONE);
    }

    #[test]
    fn test_unsaved_buffers_point_at_contents() {
        let files = vec![
            UnsavedFile::new("a.c", "int a;"),
            UnsavedFile::new("b.h", ""),
        ];
        let mut buffers = UnsavedBuffers::new(&files).unwrap();
        assert_eq!(buffers.len(), 2);
        assert!(!buffers.as_mut_ptr().is_null());
        assert_eq!(buffers.raw[0].Length, 6);
        let name = unsafe { std::ffi::CStr::from_ptr(buffers.raw[1].Filename) };
        assert_eq!(name.to_str().unwrap(), "b.h");
    }

    #[test]
    fn test_no_unsaved_files_pass_null() {
        let mut buffers = UnsavedBuffers::new(&[]).unwrap();
        assert_eq!(buffers.len(), 0);
        assert!(buffers.as_mut_ptr().is_null());
    }

    #[test]
    fn test_unsaved_name_with_nul_is_rejected() {
        let files = vec![UnsavedFile::new("bad\0name.c", "")];
        assert!(matches!(
            UnsavedBuffers::new(&files),
            Err(CxError::InvalidArgument(_))
        ));
    }
}
