//! Lexical tokens.
//!
//! The engine hands out tokens in batches that can only be freed as a whole.
//! A batch lives in a reference-counted group; the iterator and every token
//! taken from it hold the group, and the batch is freed the moment the last
//! of them is dropped.

use crate::cursor::Cursor;
use crate::handle::{TokenBatch, text};
use crate::kinds::TokenKind;
use crate::lifetime::Owned;
use crate::source::{SourceLocation, SourceRange};
use crate::unit::TranslationUnit;
use clang_sys::*;
use std::fmt;
use std::ptr;
use std::rc::Rc;

struct TokenGroup {
    batch: Owned<TokenBatch>,
    unit: TranslationUnit,
}

impl TokenGroup {
    fn len(&self) -> usize {
        self.batch.get().count as usize
    }
}

/// Tokenizes `range`. An empty range allocates nothing.
pub(crate) fn tokenize(unit: &TranslationUnit, range: &SourceRange) -> Tokens {
    let mut tokens: *mut CXToken = ptr::null_mut();
    let mut count = 0;
    unsafe { clang_tokenize(unit.raw(), range.raw(), &mut tokens, &mut count) };
    let group = Owned::new(TokenBatch {
        unit: unit.raw(),
        tokens,
        count,
    })
    .map(|batch| {
        Rc::new(TokenGroup {
            batch,
            unit: unit.clone(),
        })
    });
    Tokens { group, next: 0 }
}

/// Iterator over the tokens of one batch.
///
/// Dropping the iterator, or running it to the end, releases its share of
/// the batch.
pub struct Tokens {
    group: Option<Rc<TokenGroup>>,
    next: usize,
}

impl Iterator for Tokens {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let group = self.group.as_ref()?;
        if self.next >= group.len() {
            self.group = None;
            return None;
        }
        let token = Token {
            group: Rc::clone(group),
            index: self.next,
        };
        self.next += 1;
        Some(token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .group
            .as_ref()
            .map_or(0, |group| group.len().saturating_sub(self.next));
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tokens {}

impl fmt::Debug for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokens")
            .field("remaining", &self.len())
            .finish()
    }
}

/// A single token.
#[derive(Clone)]
pub struct Token {
    group: Rc<TokenGroup>,
    index: usize,
}

impl Token {
    fn raw(&self) -> CXToken {
        self.group.batch.get().at(self.index)
    }

    fn unit(&self) -> &TranslationUnit {
        &self.group.unit
    }

    /// Source text of the token.
    pub fn spelling(&self) -> String {
        text(unsafe { clang_getTokenSpelling(self.unit().raw(), self.raw()) })
    }

    pub fn kind(&self) -> TokenKind {
        TokenKind::from_raw(unsafe { clang_getTokenKind(self.raw()) })
    }

    pub fn location(&self) -> SourceLocation {
        let raw = unsafe { clang_getTokenLocation(self.unit().raw(), self.raw()) };
        SourceLocation::from_raw(raw, self.unit())
    }

    pub fn extent(&self) -> SourceRange {
        let raw = unsafe { clang_getTokenExtent(self.unit().raw(), self.raw()) };
        SourceRange::from_raw(raw, self.unit())
    }

    /// The innermost cursor this token belongs to.
    pub fn cursor(&self) -> Option<Cursor> {
        let mut raw = unsafe { clang_getNullCursor() };
        let token = self.group.batch.get().ptr_at(self.index);
        unsafe { clang_annotateTokens(self.unit().raw(), token, 1, &mut raw) };
        Cursor::from_raw(raw, self.unit())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("kind", &self.kind())
            .field("spelling", &self.spelling())
            .finish()
    }
}
