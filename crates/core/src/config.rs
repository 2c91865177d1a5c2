use crate::error::Result;
use crate::unit::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for a new [`Index`](crate::Index).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Leave declarations from precompiled headers out of visitation.
    pub exclude_declarations_from_pch: bool,
    /// Let the engine print diagnostics to stderr while parsing.
    pub display_diagnostics: bool,
}

/// Named form of a [`ParseOptions`] flag, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFlag {
    DetailedProcessingRecord,
    Incomplete,
    PrecompiledPreamble,
    CacheCompletionResults,
    SkipFunctionBodies,
    IncludeBriefCommentsInCodeCompletion,
}

impl ParseFlag {
    pub fn options(self) -> ParseOptions {
        match self {
            Self::DetailedProcessingRecord => ParseOptions::DETAILED_PROCESSING_RECORD,
            Self::Incomplete => ParseOptions::INCOMPLETE,
            Self::PrecompiledPreamble => ParseOptions::PRECOMPILED_PREAMBLE,
            Self::CacheCompletionResults => ParseOptions::CACHE_COMPLETION_RESULTS,
            Self::SkipFunctionBodies => ParseOptions::SKIP_FUNCTION_BODIES,
            Self::IncludeBriefCommentsInCodeCompletion => {
                ParseOptions::INCLUDE_BRIEF_COMMENTS_IN_CODE_COMPLETION
            }
        }
    }
}

/// Contents to use for `path` instead of what is on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsavedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl UnsavedFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// How to parse a translation unit: compiler arguments, flags and in-memory files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    pub args: Vec<String>,
    pub options: Vec<ParseFlag>,
    pub unsaved: Vec<UnsavedFile>,
}

impl ParseConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn parse_options(&self) -> ParseOptions {
        self.options
            .iter()
            .fold(ParseOptions::NONE, |options, flag| options | flag.options())
    }
}
