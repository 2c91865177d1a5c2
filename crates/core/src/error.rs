use std::fmt;
use thiserror::Error;

/// Status codes reported by the engine's `*2` entry points (`CXErrorCode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A generic failure with no further detail.
    Failure,
    /// The engine crashed while performing the request.
    Crashed,
    /// The request was rejected because of malformed arguments.
    InvalidArguments,
    /// A serialized AST could not be read.
    AstRead,
}

impl ErrorCode {
    /// Maps a raw status to an error. `0` means success and yields `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Failure),
            2 => Some(Self::Crashed),
            3 => Some(Self::InvalidArguments),
            4 => Some(Self::AstRead),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Failure => "failure",
            Self::Crashed => "engine crashed",
            Self::InvalidArguments => "invalid arguments",
            Self::AstRead => "AST read error",
        };
        f.write_str(text)
    }
}

/// Why a translation unit could not be written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveErrorKind {
    /// Unknown failure, typically I/O.
    Unknown,
    /// Errors during translation prevented saving.
    TranslationErrors,
    /// The translation unit was invalid at the time of the save.
    InvalidTranslationUnit,
}

impl SaveErrorKind {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Unknown),
            2 => Some(Self::TranslationErrors),
            3 => Some(Self::InvalidTranslationUnit),
            _ => None,
        }
    }
}

impl fmt::Display for SaveErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown I/O failure"),
            Self::TranslationErrors => f.write_str(
                "translation errors are present; inspect the translation unit's diagnostics",
            ),
            Self::InvalidTranslationUnit => f.write_str("translation unit is invalid"),
        }
    }
}

/// Why a compilation database could not be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseErrorKind {
    Unknown,
    CannotLoadDatabase,
}

impl DatabaseErrorKind {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::CannotLoadDatabase),
            _ => None,
        }
    }
}

impl fmt::Display for DatabaseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown error"),
            Self::CannotLoadDatabase => f.write_str("database could not be loaded"),
        }
    }
}

/// Negative results of the record layout queries (`CXTypeLayoutError`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    Invalid,
    Incomplete,
    Dependent,
    NotConstantSize,
    InvalidFieldName,
    Undeduced,
}

impl LayoutError {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Self::Invalid),
            -2 => Some(Self::Incomplete),
            -3 => Some(Self::Dependent),
            -4 => Some(Self::NotConstantSize),
            -5 => Some(Self::InvalidFieldName),
            -6 => Some(Self::Undeduced),
            _ => None,
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Invalid => "invalid type",
            Self::Incomplete => "incomplete type",
            Self::Dependent => "dependent type",
            Self::NotConstantSize => "type is not of constant size",
            Self::InvalidFieldName => "no field with that name",
            Self::Undeduced => "undeduced type",
        };
        f.write_str(text)
    }
}

#[derive(Error, Debug)]
pub enum CxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not load libclang: {0}")]
    LibraryLoad(String),
    #[error("could not parse {name}{}", code_suffix(.code))]
    TranslationUnitLoad {
        name: String,
        code: Option<ErrorCode>,
    },
    #[error("could not save translation unit: {0}")]
    Save(SaveErrorKind),
    #[error("could not reparse translation unit: {0}")]
    Reparse(ErrorCode),
    #[error("could not open compilation database in {directory}: {kind}")]
    Database {
        kind: DatabaseErrorKind,
        directory: String,
    },
    #[error("{operation} requires {expected}, found {found}")]
    Precondition {
        operation: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("layout query failed: {0}")]
    Layout(LayoutError),
    #[error("invalid diagnostic format options: {0:#x}")]
    InvalidFormatOptions(u32),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{operation} returned unrecognized status {code}")]
    UnrecognizedCode { operation: &'static str, code: i64 },
}

impl From<std::ffi::NulError> for CxError {
    fn from(err: std::ffi::NulError) -> Self {
        CxError::InvalidArgument(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CxError>;

fn code_suffix(code: &Option<ErrorCode>) -> String {
    code.map(|c| format!(" ({c})")).unwrap_or_default()
}

/// Maps a layout query result: non-negative values are sizes, negative ones are errors.
pub(crate) fn layout_result(operation: &'static str, value: i64) -> Result<u64> {
    if value >= 0 {
        return Ok(value as u64);
    }
    match LayoutError::from_code(value) {
        Some(err) => Err(CxError::Layout(err)),
        None => Err(CxError::UnrecognizedCode {
            operation,
            code: value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_error_translation_errors_mentions_diagnostics() {
        let err = CxError::Save(SaveErrorKind::from_code(2).unwrap());
        assert!(matches!(
            err,
            CxError::Save(SaveErrorKind::TranslationErrors)
        ));
        assert!(err.to_string().contains("diagnostics"));
    }

    #[test]
    fn test_save_error_codes() {
        assert_eq!(SaveErrorKind::from_code(0), None);
        assert_eq!(SaveErrorKind::from_code(1), Some(SaveErrorKind::Unknown));
        assert_eq!(
            SaveErrorKind::from_code(3),
            Some(SaveErrorKind::InvalidTranslationUnit)
        );
        assert_eq!(SaveErrorKind::from_code(4), None);
    }

    #[test]
    fn test_load_error_names_source() {
        let err = CxError::TranslationUnitLoad {
            name: "missing.c".to_string(),
            code: ErrorCode::from_code(1),
        };
        assert_eq!(err.to_string(), "could not parse missing.c (failure)");

        let err = CxError::TranslationUnitLoad {
            name: "missing.ast".to_string(),
            code: None,
        };
        assert_eq!(err.to_string(), "could not parse missing.ast");
    }

    #[test]
    fn test_database_error_codes() {
        assert_eq!(
            DatabaseErrorKind::from_code(1),
            Some(DatabaseErrorKind::CannotLoadDatabase)
        );
        assert_eq!(DatabaseErrorKind::from_code(2), None);
    }

    #[test]
    fn test_layout_result() {
        assert_eq!(layout_result("size", 16).unwrap(), 16);
        assert!(matches!(
            layout_result("size", -2),
            Err(CxError::Layout(LayoutError::Incomplete))
        ));
        assert!(matches!(
            layout_result("size", -42),
            Err(CxError::UnrecognizedCode { code: -42, .. })
        ));
    }

    #[test]
    fn test_nul_error_maps_to_invalid_argument() {
        let err: CxError = std::ffi::CString::new("a\0b").unwrap_err().into();
        assert!(matches!(err, CxError::InvalidArgument(_)));
    }
}
