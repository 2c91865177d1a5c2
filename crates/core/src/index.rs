use crate::config::{IndexConfig, UnsavedFile};
use crate::error::{CxError, Result};
use crate::handle::IndexHandle;
use crate::library::ensure_loaded;
use crate::lifetime::Owned;
use crate::unit::{ParseOptions, TranslationUnit};
use clang_sys::*;
use std::fmt;
use std::os::raw::c_int;
use std::path::Path;
use std::rc::Rc;
use tracing::debug;

struct IndexInner {
    handle: Owned<IndexHandle>,
    config: IndexConfig,
}

/// The top-level engine context that translation units are created in.
///
/// Every translation unit holds a clone, so the native index outlives them all.
#[derive(Clone)]
pub struct Index {
    inner: Rc<IndexInner>,
}

impl Index {
    /// Creates an index. With `exclude_declarations`, declarations coming
    /// from precompiled headers are left out of visitation.
    pub fn create(exclude_declarations: bool) -> Result<Self> {
        Self::with_config(&IndexConfig {
            exclude_declarations_from_pch: exclude_declarations,
            ..IndexConfig::default()
        })
    }

    pub fn with_config(config: &IndexConfig) -> Result<Self> {
        ensure_loaded()?;
        let raw = unsafe {
            clang_createIndex(
                config.exclude_declarations_from_pch as c_int,
                config.display_diagnostics as c_int,
            )
        };
        let handle = Owned::new(IndexHandle(raw))
            .ok_or_else(|| CxError::LibraryLoad("engine refused to create an index".to_string()))?;
        debug!(?config, "created index");
        Ok(Self {
            inner: Rc::new(IndexInner {
                handle,
                config: config.clone(),
            }),
        })
    }

    pub(crate) fn raw(&self) -> CXIndex {
        self.inner.handle.get().0
    }

    pub fn config(&self) -> &IndexConfig {
        &self.inner.config
    }

    /// Parses `path` with compiler `args` and in-memory `unsaved` contents.
    ///
    /// When `path` is `None` the source file must be named in `args`.
    pub fn parse<S: AsRef<str>>(
        &self,
        path: Option<&Path>,
        args: &[S],
        unsaved: &[UnsavedFile],
        options: ParseOptions,
    ) -> Result<TranslationUnit> {
        TranslationUnit::from_source(self, path, args, unsaved, options)
    }

    /// Loads an AST file written by [`TranslationUnit::save`].
    pub fn read(&self, path: impl AsRef<Path>) -> Result<TranslationUnit> {
        TranslationUnit::from_ast_file(self, path.as_ref())
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index")
            .field("config", &self.inner.config)
            .finish()
    }
}
