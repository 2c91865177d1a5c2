//! Files, locations and ranges inside a translation unit.

use crate::error::{CxError, Result};
use crate::handle::{c_path, text};
use crate::lifetime::Anchor;
use crate::unit::TranslationUnit;
use clang_sys::*;
use once_cell::unsync::OnceCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

/// A position inside a file, as accepted by [`TranslationUnit::location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Byte offset from the start of the file, starting at 0.
    Offset(u32),
    /// 1-based line and column.
    LineColumn { line: u32, column: u32 },
}

/// A source file that takes part in a translation unit.
#[derive(Clone)]
pub struct File {
    raw: CXFile,
    unit: TranslationUnit,
}

impl File {
    /// Wraps a file handle; a null handle means "no file".
    pub(crate) fn from_raw(raw: CXFile, unit: &TranslationUnit) -> Option<Self> {
        if raw.is_null() {
            return None;
        }
        Some(Self {
            raw,
            unit: unit.clone(),
        })
    }

    /// Looks a file up by name. Files the translation unit never touched are `None`.
    pub fn from_name(unit: &TranslationUnit, name: impl AsRef<Path>) -> Result<Option<Self>> {
        let name = c_path(name.as_ref())?;
        let raw = unsafe { clang_getFile(unit.raw(), name.as_ptr()) };
        Ok(Self::from_raw(raw, unit))
    }

    /// Complete file name and path.
    pub fn name(&self) -> String {
        text(unsafe { clang_getFileName(self.raw) })
    }

    /// Last modification time, in seconds since the Unix epoch.
    pub fn time(&self) -> i64 {
        unsafe { clang_getFileTime(self.raw) as i64 }
    }

    pub fn translation_unit(&self) -> &TranslationUnit {
        &self.unit
    }

    /// Location of a 1-based line and column in this file.
    pub fn location(&self, line: u32, column: u32) -> SourceLocation {
        let raw = unsafe { clang_getLocation(self.unit.raw(), self.raw, line, column) };
        SourceLocation::from_raw(raw, &self.unit)
    }

    /// Location of a byte offset in this file.
    pub fn location_at_offset(&self, offset: u32) -> SourceLocation {
        let raw = unsafe { clang_getLocationForOffset(self.unit.raw(), self.raw, offset) };
        SourceLocation::from_raw(raw, &self.unit)
    }

    pub(crate) fn position(&self, position: Position) -> SourceLocation {
        match position {
            Position::Offset(offset) => self.location_at_offset(offset),
            Position::LineColumn { line, column } => self.location(line, column),
        }
    }
}

impl PartialEq for File {
    fn eq(&self, other: &Self) -> bool {
        unsafe { clang_File_isEqual(self.raw, other.raw) != 0 }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("File").field(&self.name()).finish()
    }
}

#[derive(Clone)]
struct Expansion {
    file: Option<File>,
    line: u32,
    column: u32,
    offset: u32,
}

/// A single point in the source.
///
/// File, line, column and offset come from one macro-expansion-aware query
/// that runs on first access and is reused afterwards.
#[derive(Clone)]
pub struct SourceLocation {
    raw: CXSourceLocation,
    unit: TranslationUnit,
    anchor: Option<Anchor>,
    expansion: OnceCell<Expansion>,
}

impl SourceLocation {
    pub(crate) fn from_raw(raw: CXSourceLocation, unit: &TranslationUnit) -> Self {
        Self {
            raw,
            unit: unit.clone(),
            anchor: None,
            expansion: OnceCell::new(),
        }
    }

    pub(crate) fn anchored(mut self, anchor: Option<&Anchor>) -> Self {
        self.anchor = anchor.cloned();
        self
    }

    /// Location of a 1-based line and column in `file`.
    pub fn from_position(file: &File, line: u32, column: u32) -> Self {
        file.location(line, column)
    }

    /// Location of a byte offset in `file`.
    pub fn from_offset(file: &File, offset: u32) -> Self {
        file.location_at_offset(offset)
    }

    pub(crate) fn raw(&self) -> CXSourceLocation {
        self.raw
    }

    /// Whether the location points into completion results rather than into
    /// the unit's own source manager.
    pub(crate) fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }

    fn expansion(&self) -> &Expansion {
        self.expansion.get_or_init(|| {
            let mut file: CXFile = std::ptr::null_mut();
            let (mut line, mut column, mut offset) = (0, 0, 0);
            unsafe {
                clang_getInstantiationLocation(
                    self.raw,
                    &mut file,
                    &mut line,
                    &mut column,
                    &mut offset,
                )
            };
            Expansion {
                file: File::from_raw(file, &self.unit),
                line,
                column,
                offset,
            }
        })
    }

    pub fn file(&self) -> Option<&File> {
        self.expansion().file.as_ref()
    }

    pub fn line(&self) -> u32 {
        self.expansion().line
    }

    pub fn column(&self) -> u32 {
        self.expansion().column
    }

    pub fn offset(&self) -> u32 {
        self.expansion().offset
    }

    pub fn is_in_system_header(&self) -> bool {
        unsafe { clang_Location_isInSystemHeader(self.raw) != 0 }
    }

    pub fn is_from_main_file(&self) -> bool {
        unsafe { clang_Location_isFromMainFile(self.raw) != 0 }
    }

    pub fn translation_unit(&self) -> &TranslationUnit {
        &self.unit
    }

    fn file_name(&self) -> Option<String> {
        self.file().map(File::name)
    }
}

impl PartialEq for SourceLocation {
    fn eq(&self, other: &Self) -> bool {
        unsafe { clang_equalLocations(self.raw, other.raw) != 0 }
    }
}

impl fmt::Debug for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceLocation")
            .field("file", &self.file_name())
            .field("line", &self.line())
            .field("column", &self.column())
            .finish()
    }
}

/// A half-open span of source text between two locations.
#[derive(Clone)]
pub struct SourceRange {
    raw: CXSourceRange,
    unit: TranslationUnit,
    anchor: Option<Anchor>,
}

impl SourceRange {
    pub(crate) fn from_raw(raw: CXSourceRange, unit: &TranslationUnit) -> Self {
        Self {
            raw,
            unit: unit.clone(),
            anchor: None,
        }
    }

    pub(crate) fn anchored(mut self, anchor: Option<&Anchor>) -> Self {
        self.anchor = anchor.cloned();
        self
    }

    /// Range from `start` to `end`. Both ends must come from the same source.
    pub fn from_locations(start: &SourceLocation, end: &SourceLocation) -> Result<Self> {
        let same_anchor = match (&start.anchor, &end.anchor) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
        if !start.unit.ptr_eq(&end.unit) || !same_anchor {
            return Err(CxError::Precondition {
                operation: "from_locations",
                expected: "two locations from the same translation unit",
                found: format!("{} and {}", start.unit.spelling(), end.unit.spelling()),
            });
        }
        let raw = unsafe { clang_getRange(start.raw(), end.raw()) };
        Ok(Self::from_raw(raw, &start.unit).anchored(start.anchor.as_ref()))
    }

    pub(crate) fn raw(&self) -> CXSourceRange {
        self.raw
    }

    pub(crate) fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }

    /// First character of the range.
    pub fn start(&self) -> SourceLocation {
        SourceLocation::from_raw(unsafe { clang_getRangeStart(self.raw) }, &self.unit)
            .anchored(self.anchor.as_ref())
    }

    /// Last character of the range.
    pub fn end(&self) -> SourceLocation {
        SourceLocation::from_raw(unsafe { clang_getRangeEnd(self.raw) }, &self.unit)
            .anchored(self.anchor.as_ref())
    }

    /// Whether `location` lies in the same file and between `start` and `end`.
    pub fn contains(&self, location: &SourceLocation) -> bool {
        let (start, end) = (self.start(), self.end());
        let name = location.file_name();
        if start.file_name() != name || end.file_name() != name {
            return false;
        }
        within(
            (start.line(), start.column()),
            (end.line(), end.column()),
            (location.line(), location.column()),
        )
    }

    pub fn translation_unit(&self) -> &TranslationUnit {
        &self.unit
    }
}

fn within(start: (u32, u32), end: (u32, u32), point: (u32, u32)) -> bool {
    start <= point && point <= end
}

impl PartialEq for SourceRange {
    fn eq(&self, other: &Self) -> bool {
        unsafe { clang_equalRanges(self.raw, other.raw) != 0 }
    }
}

impl fmt::Debug for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRange")
            .field("start", &self.start())
            .field("end", &self.end())
            .finish()
    }
}

/// One `#include` edge: `source` includes `include` at `location`.
#[derive(Debug, Clone)]
pub struct FileInclusion {
    source: Option<File>,
    include: File,
    location: SourceLocation,
    depth: u32,
}

impl FileInclusion {
    pub(crate) fn new(include: File, location: SourceLocation, depth: u32) -> Self {
        Self {
            source: location.file().cloned(),
            include,
            location,
            depth,
        }
    }

    /// The including file.
    pub fn source(&self) -> Option<&File> {
        self.source.as_ref()
    }

    /// The included file.
    pub fn include(&self) -> &File {
        &self.include
    }

    /// Where the `#include` directive sits.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Depth in the include stack; the input file has depth 0.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_input_file(&self) -> bool {
        self.depth == 0
    }
}
