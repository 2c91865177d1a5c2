//! Access to `compile_commands.json` build databases.

use crate::error::{CxError, DatabaseErrorKind, Result};
use crate::handle::{CommandsHandle, DatabaseHandle, c_path, text};
use crate::library::ensure_loaded;
use crate::lifetime::Owned;
use clang_sys::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};

struct DatabaseInner {
    handle: Owned<DatabaseHandle>,
}

/// A loaded compilation database.
#[derive(Clone)]
pub struct CompilationDatabase {
    inner: Rc<DatabaseInner>,
}

impl CompilationDatabase {
    /// Loads the database found in `directory`.
    pub fn from_directory(directory: impl AsRef<Path>) -> Result<Self> {
        ensure_loaded()?;
        let directory = directory.as_ref();
        let name = c_path(directory)?;
        let mut status = 0;
        let raw = unsafe { clang_CompilationDatabase_fromDirectory(name.as_ptr(), &mut status) };
        let handle = Owned::new(DatabaseHandle(raw));
        match handle {
            Some(handle) if status == 0 => {
                debug!("loaded compilation database from {}", directory.display());
                Ok(Self {
                    inner: Rc::new(DatabaseInner { handle }),
                })
            }
            _ => {
                warn!(
                    "could not load compilation database from {} (status {})",
                    directory.display(),
                    status
                );
                Err(CxError::Database {
                    kind: DatabaseErrorKind::from_code(status)
                        .unwrap_or(DatabaseErrorKind::Unknown),
                    directory: directory.display().to_string(),
                })
            }
        }
    }

    fn raw(&self) -> CXCompilationDatabase {
        self.inner.handle.get().0
    }

    /// Commands that compile `file`; `None` when the database has no entry for it.
    pub fn compile_commands(&self, file: impl AsRef<Path>) -> Result<Option<CompileCommands>> {
        let name = c_path(file.as_ref())?;
        let raw =
            unsafe { clang_CompilationDatabase_getCompileCommands(self.raw(), name.as_ptr()) };
        Ok(CompileCommands::from_raw(raw, self))
    }

    /// Every command in the database; `None` when it is empty.
    pub fn all_compile_commands(&self) -> Option<CompileCommands> {
        let raw = unsafe { clang_CompilationDatabase_getAllCompileCommands(self.raw()) };
        CompileCommands::from_raw(raw, self)
    }
}

impl fmt::Debug for CompilationDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilationDatabase").finish_non_exhaustive()
    }
}

struct CommandsInner {
    handle: Owned<CommandsHandle>,
    _database: CompilationDatabase,
}

/// The compile commands found for a query.
#[derive(Clone)]
pub struct CompileCommands {
    inner: Rc<CommandsInner>,
}

impl CompileCommands {
    fn from_raw(raw: CXCompileCommands, database: &CompilationDatabase) -> Option<Self> {
        let handle = Owned::new(CommandsHandle(raw))?;
        Some(Self {
            inner: Rc::new(CommandsInner {
                handle,
                _database: database.clone(),
            }),
        })
    }

    fn raw(&self) -> CXCompileCommands {
        self.inner.handle.get().0
    }

    pub fn len(&self) -> usize {
        unsafe { clang_CompileCommands_getSize(self.raw()) as usize }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<CompileCommand> {
        if index >= self.len() {
            return None;
        }
        let raw = unsafe { clang_CompileCommands_getCommand(self.raw(), index as u32) };
        (!raw.is_null()).then(|| CompileCommand {
            raw,
            commands: self.clone(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = CompileCommand> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }
}

impl fmt::Debug for CompileCommands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// One compiler invocation.
#[derive(Clone)]
pub struct CompileCommand {
    raw: CXCompileCommand,
    commands: CompileCommands,
}

impl CompileCommand {
    /// Working directory the command runs in.
    pub fn directory(&self) -> PathBuf {
        PathBuf::from(text(unsafe { clang_CompileCommand_getDirectory(self.raw) }))
    }

    /// The main source file being compiled.
    pub fn filename(&self) -> PathBuf {
        PathBuf::from(text(unsafe { clang_CompileCommand_getFilename(self.raw) }))
    }

    /// The full command line, compiler executable first.
    pub fn arguments(&self) -> Vec<String> {
        let count = unsafe { clang_CompileCommand_getNumArgs(self.raw) };
        (0..count)
            .map(|i| text(unsafe { clang_CompileCommand_getArg(self.raw, i) }))
            .collect()
    }

    /// The list this command was taken from.
    pub fn commands(&self) -> &CompileCommands {
        &self.commands
    }
}

impl fmt::Debug for CompileCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileCommand")
            .field("directory", &self.directory())
            .field("filename", &self.filename())
            .field("arguments", &self.arguments())
            .finish()
    }
}
