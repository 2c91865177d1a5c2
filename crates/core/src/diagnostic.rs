use crate::error::{CxError, Result};
use crate::handle::{DiagnosticHandle, empty_string, text};
use crate::kinds::Severity;
use crate::lifetime::{Anchor, Owned};
use crate::source::{SourceLocation, SourceRange};
use crate::unit::TranslationUnit;
use clang_sys::*;
use std::fmt;
use std::ops::BitOr;
use std::rc::Rc;

/// Which parts to include when formatting a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayOptions(u32);

impl DisplayOptions {
    pub const SOURCE_LOCATION: Self = Self(0x01);
    pub const COLUMN: Self = Self(0x02);
    pub const SOURCE_RANGES: Self = Self(0x04);
    pub const OPTION: Self = Self(0x08);
    pub const CATEGORY_ID: Self = Self(0x10);
    pub const CATEGORY_NAME: Self = Self(0x20);

    const MASK: u32 = 0x3F;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    fn validate(self) -> Result<u32> {
        if self.0 & !Self::MASK != 0 {
            return Err(CxError::InvalidFormatOptions(self.0));
        }
        Ok(self.0)
    }
}

impl BitOr for DisplayOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A suggested edit: replace `range` with `value`.
#[derive(Debug, Clone)]
pub struct FixIt {
    pub range: SourceRange,
    pub value: String,
}

struct DiagnosticInner {
    handle: Owned<DiagnosticHandle>,
    parent: Option<Diagnostic>,
    anchor: Option<Anchor>,
    unit: TranslationUnit,
}

/// One compiler message.
///
/// Child diagnostics keep their parent alive; diagnostics from code
/// completion keep the completion results alive.
#[derive(Clone)]
pub struct Diagnostic {
    inner: Rc<DiagnosticInner>,
}

impl Diagnostic {
    pub(crate) fn from_raw(
        raw: CXDiagnostic,
        unit: &TranslationUnit,
        parent: Option<&Diagnostic>,
        anchor: Option<&Anchor>,
    ) -> Option<Self> {
        let handle = Owned::new(DiagnosticHandle(raw))?;
        Some(Self {
            inner: Rc::new(DiagnosticInner {
                handle,
                parent: parent.cloned(),
                anchor: anchor.cloned(),
                unit: unit.clone(),
            }),
        })
    }

    fn raw(&self) -> CXDiagnostic {
        self.inner.handle.get().0
    }

    fn anchor(&self) -> Option<&Anchor> {
        self.inner.anchor.as_ref()
    }

    pub fn severity(&self) -> Severity {
        Severity::from_raw(unsafe { clang_getDiagnosticSeverity(self.raw()) })
    }

    pub fn location(&self) -> SourceLocation {
        let raw = unsafe { clang_getDiagnosticLocation(self.raw()) };
        SourceLocation::from_raw(raw, &self.inner.unit).anchored(self.anchor())
    }

    /// The message text.
    pub fn spelling(&self) -> String {
        text(unsafe { clang_getDiagnosticSpelling(self.raw()) })
    }

    /// Source ranges highlighted by the diagnostic.
    pub fn ranges(&self) -> impl ExactSizeIterator<Item = SourceRange> + '_ {
        let count = unsafe { clang_getDiagnosticNumRanges(self.raw()) };
        (0..count).map(move |i| {
            let raw = unsafe { clang_getDiagnosticRange(self.raw(), i) };
            SourceRange::from_raw(raw, &self.inner.unit).anchored(self.anchor())
        })
    }

    pub fn fixits(&self) -> impl ExactSizeIterator<Item = FixIt> + '_ {
        let count = unsafe { clang_getDiagnosticNumFixIts(self.raw()) };
        (0..count).map(move |i| {
            let mut range = unsafe { clang_getNullRange() };
            let value = text(unsafe { clang_getDiagnosticFixIt(self.raw(), i, &mut range) });
            FixIt {
                range: SourceRange::from_raw(range, &self.inner.unit).anchored(self.anchor()),
                value,
            }
        })
    }

    /// Notes attached to this diagnostic.
    pub fn children(&self) -> impl Iterator<Item = Diagnostic> + '_ {
        let set = unsafe { clang_getChildDiagnostics(self.raw()) };
        let count = if set.is_null() {
            0
        } else {
            unsafe { clang_getNumDiagnosticsInSet(set) }
        };
        (0..count).filter_map(move |i| {
            let raw = unsafe { clang_getDiagnosticInSet(set, i) };
            Diagnostic::from_raw(raw, &self.inner.unit, Some(self), self.anchor())
        })
    }

    pub fn category_number(&self) -> u32 {
        unsafe { clang_getDiagnosticCategory(self.raw()) }
    }

    pub fn category_name(&self) -> String {
        text(unsafe { clang_getDiagnosticCategoryText(self.raw()) })
    }

    /// The command-line option that enables this diagnostic, e.g. `-Wunused`.
    pub fn option(&self) -> String {
        text(unsafe { clang_getDiagnosticOption(self.raw(), std::ptr::null_mut()) })
    }

    /// The command-line option that disables this diagnostic.
    pub fn disable_option(&self) -> String {
        let mut disable = empty_string();
        let enable = unsafe { clang_getDiagnosticOption(self.raw(), &mut disable) };
        drop(text(enable));
        text(disable)
    }

    /// Formats the diagnostic the way the compiler would print it.
    ///
    /// `None` uses the engine's default display options.
    pub fn format(&self, options: Option<DisplayOptions>) -> Result<String> {
        let bits = match options {
            Some(options) => options.validate()?,
            None => (unsafe { clang_defaultDiagnosticDisplayOptions() }) as u32,
        };
        Ok(text(unsafe { clang_formatDiagnostic(self.raw(), bits as _) }))
    }

    /// The diagnostic this one is a note of, if any.
    pub fn parent(&self) -> Option<&Diagnostic> {
        self.inner.parent.as_ref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling())
    }
}

impl fmt::Debug for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostic")
            .field("severity", &self.severity())
            .field("location", &self.location())
            .field("spelling", &self.spelling())
            .finish()
    }
}

/// Indexable view over a translation unit's diagnostics.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    unit: TranslationUnit,
}

impl Diagnostics {
    pub(crate) fn new(unit: &TranslationUnit) -> Self {
        Self { unit: unit.clone() }
    }

    pub fn len(&self) -> usize {
        unsafe { clang_getNumDiagnostics(self.unit.raw()) as usize }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Diagnostic> {
        if index >= self.len() {
            return None;
        }
        let raw = unsafe { clang_getDiagnostic(self.unit.raw(), index as u32) };
        Diagnostic::from_raw(raw, &self.unit, None, None)
    }

    pub fn iter(&self) -> impl Iterator<Item = Diagnostic> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_options_within_mask_are_accepted() {
        let options = DisplayOptions::SOURCE_LOCATION
            | DisplayOptions::COLUMN
            | DisplayOptions::CATEGORY_NAME;
        assert_eq!(options.validate().unwrap(), 0x23);
        assert_eq!(DisplayOptions::from_bits(0x3F).validate().unwrap(), 0x3F);
    }

    #[test]
    fn test_display_options_outside_mask_are_rejected() {
        assert!(matches!(
            DisplayOptions::from_bits(0x40).validate(),
            Err(CxError::InvalidFormatOptions(0x40))
        ));
        assert!(matches!(
            DisplayOptions::from_bits(0x101).validate(),
            Err(CxError::InvalidFormatOptions(_))
        ));
    }
}
