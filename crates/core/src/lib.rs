//! Safe bindings to the libclang C API.
//!
//! Parse C and C++ sources into translation units, walk their syntax trees
//! and query types, tokens, diagnostics, code completion and compilation
//! databases. Every value keeps alive the engine resources it was derived
//! from, so nothing can outlive the native data it points into.
//!
//! ```no_run
//! use cxkit_core::{Index, ParseOptions, UnsavedFile};
//! use std::path::Path;
//!
//! let index = Index::create(false)?;
//! let unsaved = [UnsavedFile::new("test.c", "int add(int a, int b) { return a + b; }")];
//! let unit = index.parse(Some(Path::new("test.c")), &[] as &[&str], &unsaved, ParseOptions::NONE)?;
//! for cursor in unit.cursor().walk_preorder() {
//!     println!("{:?} {}", cursor.kind(), cursor.spelling());
//! }
//! # Ok::<(), cxkit_core::CxError>(())
//! ```

pub mod completion;
pub mod config;
pub mod cursor;
pub mod database;
pub mod diagnostic;
pub mod error;
mod handle;
pub mod index;
pub mod kinds;
pub mod library;
pub mod lifetime;
pub mod logging;
pub mod source;
pub mod token;
pub mod types;
pub mod unit;
pub mod visit;

pub use completion::{
    CodeCompletionResult, CodeCompletionResults, CompleteOptions, CompletionChunk,
    CompletionString,
};
pub use config::{IndexConfig, ParseConfig, ParseFlag, UnsavedFile};
pub use cursor::{Cursor, EnumValue};
pub use database::{CompilationDatabase, CompileCommand, CompileCommands};
pub use diagnostic::{Diagnostic, Diagnostics, DisplayOptions, FixIt};
pub use error::{CxError, DatabaseErrorKind, ErrorCode, LayoutError, Result, SaveErrorKind};
pub use index::Index;
pub use kinds::{
    AccessSpecifier, AvailabilityKind, CompletionChunkKind, CursorKind,
    ExceptionSpecificationKind, LinkageKind, RefQualifierKind, Severity, StorageClass,
    TemplateArgumentKind, TlsKind, TokenKind, TypeKind,
};
pub use library::clang_version;
pub use lifetime::{HandleKind, live_handles};
pub use source::{File, FileInclusion, Position, SourceLocation, SourceRange};
pub use token::{Token, Tokens};
pub use types::{ArgumentTypes, Type};
pub use unit::{ParseOptions, TranslationUnit};
pub use visit::Preorder;
