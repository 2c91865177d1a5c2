//! Kind enumerations reported by the engine.
//!
//! Cursor and type kinds are open sets that grow with every engine release, so
//! they are newtypes with named constants for the kinds the binding itself
//! relies on. The small, stable enumerations are closed Rust enums with an
//! `Unknown` fallback.

use crate::handle::text;
use clang_sys::*;
use std::fmt;

macro_rules! open_kind {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($konst:ident = $value:literal => $label:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i32);

        impl $name {
            $(pub const $konst: Self = Self($value);)*

            pub const fn from_raw(raw: i32) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> i32 {
                self.0
            }

            /// Short name for kinds that have a constant here.
            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some($label),)*
                    _ => None,
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => write!(f, "{}::{}", stringify!($name), name),
                    None => write!(f, "{}({})", stringify!($name), self.0),
                }
            }
        }
    };
}

macro_rules! closed_kind {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
            /// A value this binding does not know about.
            Unknown(i32),
        }

        impl $name {
            pub fn from_raw(raw: i32) -> Self {
                match raw {
                    $($value => Self::$variant,)*
                    other => Self::Unknown(other),
                }
            }

            pub fn raw(self) -> i32 {
                match self {
                    $(Self::$variant => $value,)*
                    Self::Unknown(raw) => raw,
                }
            }
        }
    };
}

open_kind! {
    /// The kind of entity a [`Cursor`](crate::Cursor) points at.
    CursorKind {
        UNEXPOSED_DECL = 1 => "UnexposedDecl",
        STRUCT_DECL = 2 => "StructDecl",
        UNION_DECL = 3 => "UnionDecl",
        CLASS_DECL = 4 => "ClassDecl",
        ENUM_DECL = 5 => "EnumDecl",
        FIELD_DECL = 6 => "FieldDecl",
        ENUM_CONSTANT_DECL = 7 => "EnumConstantDecl",
        FUNCTION_DECL = 8 => "FunctionDecl",
        VAR_DECL = 9 => "VarDecl",
        PARM_DECL = 10 => "ParmDecl",
        TYPEDEF_DECL = 20 => "TypedefDecl",
        CXX_METHOD = 21 => "CXXMethod",
        NAMESPACE = 22 => "Namespace",
        LINKAGE_SPEC = 23 => "LinkageSpec",
        CONSTRUCTOR = 24 => "Constructor",
        DESTRUCTOR = 25 => "Destructor",
        CONVERSION_FUNCTION = 26 => "ConversionFunction",
        TEMPLATE_TYPE_PARAMETER = 27 => "TemplateTypeParameter",
        NON_TYPE_TEMPLATE_PARAMETER = 28 => "NonTypeTemplateParameter",
        TEMPLATE_TEMPLATE_PARAMETER = 29 => "TemplateTemplateParameter",
        FUNCTION_TEMPLATE = 30 => "FunctionTemplate",
        CLASS_TEMPLATE = 31 => "ClassTemplate",
        CLASS_TEMPLATE_PARTIAL_SPECIALIZATION = 32 => "ClassTemplatePartialSpecialization",
        NAMESPACE_ALIAS = 33 => "NamespaceAlias",
        USING_DIRECTIVE = 34 => "UsingDirective",
        USING_DECLARATION = 35 => "UsingDeclaration",
        TYPE_ALIAS_DECL = 36 => "TypeAliasDecl",
        CXX_ACCESS_SPECIFIER = 39 => "CXXAccessSpecifier",
        TYPE_REF = 43 => "TypeRef",
        CXX_BASE_SPECIFIER = 44 => "CXXBaseSpecifier",
        TEMPLATE_REF = 45 => "TemplateRef",
        NAMESPACE_REF = 46 => "NamespaceRef",
        MEMBER_REF = 47 => "MemberRef",
        INVALID_FILE = 70 => "InvalidFile",
        NO_DECL_FOUND = 71 => "NoDeclFound",
        NOT_IMPLEMENTED = 72 => "NotImplemented",
        INVALID_CODE = 73 => "InvalidCode",
        UNEXPOSED_EXPR = 100 => "UnexposedExpr",
        DECL_REF_EXPR = 101 => "DeclRefExpr",
        MEMBER_REF_EXPR = 102 => "MemberRefExpr",
        CALL_EXPR = 103 => "CallExpr",
        INTEGER_LITERAL = 106 => "IntegerLiteral",
        FLOATING_LITERAL = 107 => "FloatingLiteral",
        STRING_LITERAL = 109 => "StringLiteral",
        CHARACTER_LITERAL = 110 => "CharacterLiteral",
        PAREN_EXPR = 111 => "ParenExpr",
        UNARY_OPERATOR = 112 => "UnaryOperator",
        BINARY_OPERATOR = 114 => "BinaryOperator",
        UNEXPOSED_STMT = 200 => "UnexposedStmt",
        COMPOUND_STMT = 202 => "CompoundStmt",
        IF_STMT = 205 => "IfStmt",
        WHILE_STMT = 207 => "WhileStmt",
        FOR_STMT = 209 => "ForStmt",
        RETURN_STMT = 214 => "ReturnStmt",
        DECL_STMT = 231 => "DeclStmt",
        TRANSLATION_UNIT = 350 => "TranslationUnit",
        UNEXPOSED_ATTR = 400 => "UnexposedAttr",
        PREPROCESSING_DIRECTIVE = 500 => "PreprocessingDirective",
        MACRO_DEFINITION = 501 => "MacroDefinition",
        MACRO_EXPANSION = 502 => "MacroExpansion",
        INCLUSION_DIRECTIVE = 503 => "InclusionDirective",
    }
}

impl CursorKind {
    pub fn is_declaration(self) -> bool {
        unsafe { clang_isDeclaration(self.0 as _) != 0 }
    }

    pub fn is_reference(self) -> bool {
        unsafe { clang_isReference(self.0 as _) != 0 }
    }

    pub fn is_expression(self) -> bool {
        unsafe { clang_isExpression(self.0 as _) != 0 }
    }

    pub fn is_statement(self) -> bool {
        unsafe { clang_isStatement(self.0 as _) != 0 }
    }

    pub fn is_attribute(self) -> bool {
        unsafe { clang_isAttribute(self.0 as _) != 0 }
    }

    pub fn is_invalid(self) -> bool {
        unsafe { clang_isInvalid(self.0 as _) != 0 }
    }

    pub fn is_translation_unit(self) -> bool {
        unsafe { clang_isTranslationUnit(self.0 as _) != 0 }
    }

    pub fn is_preprocessing(self) -> bool {
        unsafe { clang_isPreprocessing(self.0 as _) != 0 }
    }

    pub fn is_unexposed(self) -> bool {
        unsafe { clang_isUnexposed(self.0 as _) != 0 }
    }

    /// The engine's name for this kind.
    pub fn spelling(self) -> String {
        text(unsafe { clang_getCursorKindSpelling(self.0 as _) })
    }
}

open_kind! {
    /// The kind of a [`Type`](crate::Type).
    TypeKind {
        INVALID = 0 => "Invalid",
        UNEXPOSED = 1 => "Unexposed",
        VOID = 2 => "Void",
        BOOL = 3 => "Bool",
        CHAR_U = 4 => "Char_U",
        UCHAR = 5 => "UChar",
        CHAR16 = 6 => "Char16",
        CHAR32 = 7 => "Char32",
        USHORT = 8 => "UShort",
        UINT = 9 => "UInt",
        ULONG = 10 => "ULong",
        ULONGLONG = 11 => "ULongLong",
        UINT128 = 12 => "UInt128",
        CHAR_S = 13 => "Char_S",
        SCHAR = 14 => "SChar",
        WCHAR = 15 => "WChar",
        SHORT = 16 => "Short",
        INT = 17 => "Int",
        LONG = 18 => "Long",
        LONGLONG = 19 => "LongLong",
        INT128 = 20 => "Int128",
        FLOAT = 21 => "Float",
        DOUBLE = 22 => "Double",
        LONG_DOUBLE = 23 => "LongDouble",
        NULL_PTR = 24 => "NullPtr",
        OVERLOAD = 25 => "Overload",
        DEPENDENT = 26 => "Dependent",
        POINTER = 101 => "Pointer",
        BLOCK_POINTER = 102 => "BlockPointer",
        LVALUE_REFERENCE = 103 => "LValueReference",
        RVALUE_REFERENCE = 104 => "RValueReference",
        RECORD = 105 => "Record",
        ENUM = 106 => "Enum",
        TYPEDEF = 107 => "Typedef",
        FUNCTION_NO_PROTO = 110 => "FunctionNoProto",
        FUNCTION_PROTO = 111 => "FunctionProto",
        CONSTANT_ARRAY = 112 => "ConstantArray",
        VECTOR = 113 => "Vector",
        INCOMPLETE_ARRAY = 114 => "IncompleteArray",
        VARIABLE_ARRAY = 115 => "VariableArray",
        DEPENDENT_SIZED_ARRAY = 116 => "DependentSizedArray",
        MEMBER_POINTER = 117 => "MemberPointer",
        AUTO = 118 => "Auto",
        ELABORATED = 119 => "Elaborated",
    }
}

impl TypeKind {
    /// Unsigned integer kinds, whose enum constants are read back unsigned.
    pub fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            Self::CHAR_U
                | Self::UCHAR
                | Self::CHAR16
                | Self::CHAR32
                | Self::USHORT
                | Self::UINT
                | Self::ULONG
                | Self::ULONGLONG
                | Self::UINT128
        )
    }

    pub fn spelling(self) -> String {
        text(unsafe { clang_getTypeKindSpelling(self.0 as _) })
    }
}

closed_kind! {
    TokenKind {
        Punctuation = 0,
        Keyword = 1,
        Identifier = 2,
        Literal = 3,
        Comment = 4,
    }
}

closed_kind! {
    Severity {
        Ignored = 0,
        Note = 1,
        Warning = 2,
        Error = 3,
        Fatal = 4,
    }
}

impl Severity {
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }
}

closed_kind! {
    LinkageKind {
        Invalid = 0,
        NoLinkage = 1,
        Internal = 2,
        UniqueExternal = 3,
        External = 4,
    }
}

closed_kind! {
    /// Thread-local storage kind of a variable.
    TlsKind {
        None = 0,
        Dynamic = 1,
        Static = 2,
    }
}

closed_kind! {
    StorageClass {
        Invalid = 0,
        None = 1,
        Extern = 2,
        Static = 3,
        PrivateExtern = 4,
        OpenClWorkGroupLocal = 5,
        Auto = 6,
        Register = 7,
    }
}

closed_kind! {
    AvailabilityKind {
        Available = 0,
        Deprecated = 1,
        NotAvailable = 2,
        NotAccessible = 3,
    }
}

closed_kind! {
    AccessSpecifier {
        Invalid = 0,
        Public = 1,
        Protected = 2,
        Private = 3,
    }
}

closed_kind! {
    RefQualifierKind {
        None = 0,
        LValue = 1,
        RValue = 2,
    }
}

closed_kind! {
    TemplateArgumentKind {
        Null = 0,
        Type = 1,
        Declaration = 2,
        NullPtr = 3,
        Integral = 4,
        Template = 5,
        TemplateExpansion = 6,
        Expression = 7,
        Pack = 8,
        Invalid = 9,
    }
}

closed_kind! {
    ExceptionSpecificationKind {
        None = 0,
        DynamicNone = 1,
        Dynamic = 2,
        MsAny = 3,
        BasicNoexcept = 4,
        ComputedNoexcept = 5,
        Unevaluated = 6,
        Uninstantiated = 7,
        Unparsed = 8,
        NoThrow = 9,
    }
}

closed_kind! {
    CompletionChunkKind {
        Optional = 0,
        TypedText = 1,
        Text = 2,
        Placeholder = 3,
        Informative = 4,
        CurrentParameter = 5,
        LeftParen = 6,
        RightParen = 7,
        LeftBracket = 8,
        RightBracket = 9,
        LeftBrace = 10,
        RightBrace = 11,
        LeftAngle = 12,
        RightAngle = 13,
        Comma = 14,
        ResultType = 15,
        Colon = 16,
        SemiColon = 17,
        Equal = 18,
        HorizontalSpace = 19,
        VerticalSpace = 20,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_kind_debug_uses_known_names() {
        assert_eq!(
            format!("{:?}", CursorKind::FUNCTION_DECL),
            "CursorKind::FunctionDecl"
        );
        assert_eq!(format!("{:?}", CursorKind::from_raw(9999)), "CursorKind(9999)");
        assert_eq!(TypeKind::from_raw(106), TypeKind::ENUM);
    }

    #[test]
    fn test_unsigned_integer_kinds() {
        assert!(TypeKind::UINT.is_unsigned_integer());
        assert!(TypeKind::ULONGLONG.is_unsigned_integer());
        assert!(TypeKind::CHAR16.is_unsigned_integer());
        assert!(!TypeKind::INT.is_unsigned_integer());
        assert!(!TypeKind::BOOL.is_unsigned_integer());
        assert!(!TypeKind::ENUM.is_unsigned_integer());
    }

    #[test]
    fn test_closed_kind_round_trips_unknown_values() {
        assert_eq!(TokenKind::from_raw(2), TokenKind::Identifier);
        assert_eq!(TokenKind::from_raw(42), TokenKind::Unknown(42));
        assert_eq!(TokenKind::Unknown(42).raw(), 42);
        assert_eq!(Severity::Fatal.raw(), 4);
        assert!(Severity::from_raw(3).is_error());
        assert!(!Severity::Warning.is_error());
    }
}
