//! Ownership of engine resources.
//!
//! Every derived object holds a strong reference to the ancestor that supplied
//! the context for its creation, so a native resource is released only once
//! nothing can reach it any more:
//!
//! | Resource | Released when the last of these drops |
//! |---|---|
//! | Index | the `Index` handle and every `TranslationUnit` created from it |
//! | TranslationUnit | the handle, cursors, types, files, locations, ranges, token groups, diagnostics, completion results |
//! | Token batch | the `Tokens` iterator and every `Token` taken from it |
//! | Diagnostic | the `Diagnostic` and its child diagnostics |
//! | Code completion results | the results object, its results, strings, chunks and diagnostics |
//! | Compilation database | the database and every `CompileCommands` list |
//! | Compile command list | the list and every `CompileCommand` taken from it |
//!
//! Owning structs declare their [`Owned`] handle before their keep-alive
//! fields. Rust drops fields in declaration order, so a resource is always
//! disposed before the ancestor it borrows from.

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

/// Type-erased keep-alive for values whose native data lives in an owner
/// other than their translation unit (locations inside completion results).
pub(crate) type Anchor = Rc<dyn Any>;

/// The kinds of engine resource the binding disposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Index,
    TranslationUnit,
    Diagnostic,
    TokenBatch,
    CompletionResults,
    CompilationDatabase,
    CompileCommands,
}

const KIND_COUNT: usize = 7;

impl HandleKind {
    const fn slot(self) -> usize {
        match self {
            Self::Index => 0,
            Self::TranslationUnit => 1,
            Self::Diagnostic => 2,
            Self::TokenBatch => 3,
            Self::CompletionResults => 4,
            Self::CompilationDatabase => 5,
            Self::CompileCommands => 6,
        }
    }
}

thread_local! {
    static LIVE: Cell<[usize; KIND_COUNT]> = const { Cell::new([0; KIND_COUNT]) };
}

fn adjust(kind: HandleKind, acquired: bool) {
    LIVE.with(|live| {
        let mut counts = live.get();
        let slot = &mut counts[kind.slot()];
        *slot = if acquired {
            *slot + 1
        } else {
            slot.saturating_sub(1)
        };
        live.set(counts);
    });
}

/// Number of resources of `kind` acquired on this thread and not yet disposed.
///
/// Binding objects never leave the thread that created them, so the count is
/// exact for that thread.
pub fn live_handles(kind: HandleKind) -> usize {
    LIVE.with(|live| live.get()[kind.slot()])
}

/// A raw engine handle that needs an explicit dispose call.
pub(crate) trait Disposable {
    const KIND: HandleKind;

    fn is_null(&self) -> bool;

    /// Releases the native resource.
    ///
    /// # Safety
    ///
    /// Called at most once, with a non-null handle whose parent resources
    /// are still alive.
    unsafe fn dispose(&mut self);
}

/// Single owner of a non-null engine handle; disposes it exactly once on drop.
pub(crate) struct Owned<H: Disposable> {
    raw: H,
}

impl<H: Disposable> Owned<H> {
    /// Takes ownership of `raw`. A null handle owns nothing and yields `None`.
    pub(crate) fn new(raw: H) -> Option<Self> {
        if raw.is_null() {
            return None;
        }
        adjust(H::KIND, true);
        trace!(kind = ?H::KIND, "acquired engine resource");
        Some(Self { raw })
    }

    pub(crate) fn get(&self) -> &H {
        &self.raw
    }
}

impl<H: Disposable> Drop for Owned<H> {
    fn drop(&mut self) {
        // SAFETY: `new` rejected null handles and drop runs once. Owners keep
        // their ancestors in fields declared after this one.
        unsafe { self.raw.dispose() };
        adjust(H::KIND, false);
        trace!(kind = ?H::KIND, "disposed engine resource");
    }
}

impl<H: Disposable + std::fmt::Debug> std::fmt::Debug for Owned<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Owned").field(&self.raw).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    thread_local! {
        static DISPOSED: Cell<usize> = const { Cell::new(0) };
    }

    #[derive(Debug)]
    struct FakeBatch(usize);

    impl Disposable for FakeBatch {
        const KIND: HandleKind = HandleKind::TokenBatch;

        fn is_null(&self) -> bool {
            self.0 == 0
        }

        unsafe fn dispose(&mut self) {
            DISPOSED.with(|d| d.set(d.get() + 1));
        }
    }

    fn disposed() -> usize {
        DISPOSED.with(|d| d.get())
    }

    #[test]
    fn test_null_handle_is_never_owned() {
        assert!(Owned::new(FakeBatch(0)).is_none());
        assert_eq!(disposed(), 0);
        assert_eq!(live_handles(HandleKind::TokenBatch), 0);
    }

    #[test]
    fn test_dispose_exactly_once() {
        let owned = Owned::new(FakeBatch(3)).unwrap();
        assert_eq!(live_handles(HandleKind::TokenBatch), 1);
        drop(owned);
        assert_eq!(disposed(), 1);
        assert_eq!(live_handles(HandleKind::TokenBatch), 0);
    }

    #[test]
    fn test_shared_owner_disposes_after_last_reference() {
        let shared = Rc::new(Owned::new(FakeBatch(2)).unwrap());
        let first = Rc::clone(&shared);
        let second = Rc::clone(&shared);
        drop(shared);
        drop(first);
        assert_eq!(disposed(), 0);
        assert_eq!(second.get().0, 2);
        drop(second);
        assert_eq!(disposed(), 1);
        assert_eq!(live_handles(HandleKind::TokenBatch), 0);
    }

    #[test]
    fn test_counts_are_per_kind() {
        let _batch = Owned::new(FakeBatch(1)).unwrap();
        assert_eq!(live_handles(HandleKind::TokenBatch), 1);
        assert_eq!(live_handles(HandleKind::Diagnostic), 0);
    }
}
