//! Locating and installing the libclang shared library.
//!
//! `clang-sys` opens libclang at run time and keeps the opened library in a
//! thread-local slot. The library is opened once per process here and then
//! installed on every thread that creates an [`Index`](crate::Index) or a
//! [`CompilationDatabase`](crate::CompilationDatabase).

use crate::error::{CxError, Result};
use crate::handle::text;
use clang_sys::SharedLibrary;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, info};

static LIBRARY: OnceCell<Arc<SharedLibrary>> = OnceCell::new();

/// Makes libclang callable from the current thread.
///
/// The library location follows `clang-sys` discovery (`LIBCLANG_PATH`,
/// `llvm-config`, then the usual system directories).
pub fn ensure_loaded() -> Result<()> {
    if clang_sys::is_loaded() {
        return Ok(());
    }

    let library = LIBRARY.get_or_try_init(|| {
        clang_sys::load().map_err(CxError::LibraryLoad)?;
        let library = clang_sys::get_library().ok_or_else(|| {
            CxError::LibraryLoad("library was not installed after loading".to_string())
        })?;
        info!("loaded libclang from {}", library.path().display());
        Ok::<_, CxError>(library)
    })?;

    if !clang_sys::is_loaded() {
        debug!("installing libclang on thread {:?}", std::thread::current().id());
        clang_sys::set_library(Some(Arc::clone(library)));
    }
    Ok(())
}

/// Version string reported by the engine, e.g. `clang version 17.0.6`.
pub fn clang_version() -> Result<String> {
    ensure_loaded()?;
    Ok(text(unsafe { clang_sys::clang_getClangVersion() }))
}

/// Whether an optional entry point exists in the loaded library.
///
/// Entry points added after the minimum supported engine are checked before use.
macro_rules! supports {
    ($name:ident) => {
        clang_sys::$name::is_loaded()
    };
}

pub(crate) use supports;
