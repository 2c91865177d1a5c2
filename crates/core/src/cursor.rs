use crate::error::{CxError, Result, layout_result};
use crate::handle::{is_null_cursor, text, text_opt};
use crate::kinds::{
    AccessSpecifier, AvailabilityKind, CursorKind, ExceptionSpecificationKind, LinkageKind,
    StorageClass, TemplateArgumentKind, TlsKind, TypeKind,
};
use crate::library::supports;
use crate::source::{File, SourceLocation, SourceRange};
use crate::token::{self, Tokens};
use crate::types::Type;
use crate::unit::TranslationUnit;
use crate::visit::{self, Preorder};
use clang_sys::*;
use once_cell::unsync::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Value of an enumeration constant, read with the signedness of the enum's
/// underlying integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumValue {
    Signed(i64),
    Unsigned(u64),
}

impl EnumValue {
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::Signed(value) => Some(value),
            Self::Unsigned(value) => i64::try_from(value).ok(),
        }
    }

    pub fn as_u64(self) -> Option<u64> {
        match self {
            Self::Signed(value) => u64::try_from(value).ok(),
            Self::Unsigned(value) => Some(value),
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(value) => write!(f, "{value}"),
            Self::Unsigned(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Default)]
struct CursorCache {
    spelling: OnceCell<String>,
    display_name: OnceCell<String>,
    location: OnceCell<SourceLocation>,
    extent: OnceCell<SourceRange>,
    ty: OnceCell<Type>,
    canonical: OnceCell<Cursor>,
    semantic_parent: OnceCell<Option<Cursor>>,
    lexical_parent: OnceCell<Option<Cursor>>,
    enum_value: OnceCell<EnumValue>,
    hash: OnceCell<u32>,
}

/// A node of the abstract syntax tree.
///
/// Cursors keep their translation unit alive. Clones share one set of
/// memoized query results; the node itself never changes once parsed.
#[derive(Clone)]
pub struct Cursor {
    raw: CXCursor,
    unit: TranslationUnit,
    ast_parent: Option<CXCursor>,
    cache: Rc<CursorCache>,
}

impl Cursor {
    /// Wraps a cursor returned by the engine; the null cursor maps to `None`.
    pub(crate) fn from_raw(raw: CXCursor, unit: &TranslationUnit) -> Option<Self> {
        if is_null_cursor(raw) {
            return None;
        }
        Some(Self::new(raw, unit, None))
    }

    /// A cursor produced by child visitation, together with the parent it was visited from.
    pub(crate) fn with_parent(raw: CXCursor, parent: CXCursor, unit: &TranslationUnit) -> Self {
        let parent = (!is_null_cursor(parent)).then_some(parent);
        Self::new(raw, unit, parent)
    }

    pub(crate) fn root(unit: &TranslationUnit) -> Self {
        let raw = unsafe { clang_getTranslationUnitCursor(unit.raw()) };
        Self::new(raw, unit, None)
    }

    fn new(raw: CXCursor, unit: &TranslationUnit, ast_parent: Option<CXCursor>) -> Self {
        Self {
            raw,
            unit: unit.clone(),
            ast_parent,
            cache: Rc::default(),
        }
    }

    fn derived(&self, raw: CXCursor) -> Option<Cursor> {
        Self::from_raw(raw, &self.unit)
    }

    /// The cursor for the entity at `location`, if any.
    ///
    /// Locations taken from code-completion diagnostics do not address the
    /// unit's AST and are rejected.
    pub fn from_location(location: &SourceLocation) -> Result<Option<Cursor>> {
        if location.is_anchored() {
            return Err(CxError::Precondition {
                operation: "from_location",
                expected: "a location inside a translation unit",
                found: "a code-completion location".to_string(),
            });
        }
        let unit = location.translation_unit();
        let raw = unsafe { clang_getCursor(unit.raw(), location.raw()) };
        Ok(Self::from_raw(raw, unit))
    }

    pub(crate) fn raw(&self) -> CXCursor {
        self.raw
    }

    pub fn translation_unit(&self) -> &TranslationUnit {
        &self.unit
    }

    fn require(&self, operation: &'static str, expected: &'static str, ok: bool) -> Result<()> {
        if ok {
            return Ok(());
        }
        Err(CxError::Precondition {
            operation,
            expected,
            found: format!("{:?}", self.kind()),
        })
    }

    pub fn kind(&self) -> CursorKind {
        CursorKind::from_raw(unsafe { clang_getCursorKind(self.raw) })
    }

    /// Name of the entity this cursor refers to.
    pub fn spelling(&self) -> &str {
        self.cache
            .spelling
            .get_or_init(|| text(unsafe { clang_getCursorSpelling(self.raw) }))
    }

    /// Spelling plus extra detail, such as a function's parameter list.
    pub fn display_name(&self) -> &str {
        self.cache
            .display_name
            .get_or_init(|| text(unsafe { clang_getCursorDisplayName(self.raw) }))
    }

    pub fn mangled_name(&self) -> String {
        text(unsafe { clang_Cursor_getMangling(self.raw) })
    }

    /// Unified Symbol Resolution string of the referenced entity.
    pub fn usr(&self) -> String {
        text(unsafe { clang_getCursorUSR(self.raw) })
    }

    pub fn location(&self) -> &SourceLocation {
        self.cache.location.get_or_init(|| {
            SourceLocation::from_raw(unsafe { clang_getCursorLocation(self.raw) }, &self.unit)
        })
    }

    pub fn extent(&self) -> &SourceRange {
        self.cache.extent.get_or_init(|| {
            SourceRange::from_raw(unsafe { clang_getCursorExtent(self.raw) }, &self.unit)
        })
    }

    pub fn linkage(&self) -> LinkageKind {
        LinkageKind::from_raw(unsafe { clang_getCursorLinkage(self.raw) })
    }

    pub fn tls_kind(&self) -> TlsKind {
        TlsKind::from_raw(unsafe { clang_getCursorTLSKind(self.raw) })
    }

    pub fn storage_class(&self) -> StorageClass {
        StorageClass::from_raw(unsafe { clang_Cursor_getStorageClass(self.raw) })
    }

    pub fn availability(&self) -> AvailabilityKind {
        AvailabilityKind::from_raw(unsafe { clang_getCursorAvailability(self.raw) })
    }

    pub fn access_specifier(&self) -> AccessSpecifier {
        AccessSpecifier::from_raw(unsafe { clang_getCXXAccessSpecifier(self.raw) })
    }

    pub fn exception_specification_kind(&self) -> ExceptionSpecificationKind {
        ExceptionSpecificationKind::from_raw(unsafe {
            clang_getCursorExceptionSpecificationType(self.raw)
        })
    }

    /// Type of the entity.
    pub fn ty(&self) -> &Type {
        self.cache
            .ty
            .get_or_init(|| Type::from_raw(unsafe { clang_getCursorType(self.raw) }, &self.unit))
    }

    /// Return type of a function or method.
    pub fn result_type(&self) -> Type {
        Type::from_raw(unsafe { clang_getCursorResultType(self.raw) }, &self.unit)
    }

    /// The canonical cursor for the entity; all redeclarations share it.
    pub fn canonical(&self) -> &Cursor {
        self.cache.canonical.get_or_init(|| {
            let raw = unsafe { clang_getCanonicalCursor(self.raw) };
            Self::new(raw, &self.unit, None)
        })
    }

    pub fn semantic_parent(&self) -> Option<&Cursor> {
        self.cache
            .semantic_parent
            .get_or_init(|| self.derived(unsafe { clang_getCursorSemanticParent(self.raw) }))
            .as_ref()
    }

    pub fn lexical_parent(&self) -> Option<&Cursor> {
        self.cache
            .lexical_parent
            .get_or_init(|| self.derived(unsafe { clang_getCursorLexicalParent(self.raw) }))
            .as_ref()
    }

    /// The parent this cursor was visited from, when it came out of a walk.
    pub fn ast_parent(&self) -> Option<Cursor> {
        self.ast_parent
            .map(|parent| Self::new(parent, &self.unit, None))
    }

    /// The entity a reference or expression refers to.
    pub fn referenced(&self) -> Option<Cursor> {
        self.derived(unsafe { clang_getCursorReferenced(self.raw) })
    }

    /// The defining declaration, if the definition is in this translation unit.
    pub fn definition(&self) -> Option<Cursor> {
        self.derived(unsafe { clang_getCursorDefinition(self.raw) })
    }

    pub fn is_definition(&self) -> bool {
        unsafe { clang_isCursorDefinition(self.raw) != 0 }
    }

    /// Underlying type of a typedef declaration.
    pub fn underlying_typedef_type(&self) -> Result<Type> {
        self.require(
            "underlying_typedef_type",
            "a declaration",
            self.kind().is_declaration(),
        )?;
        let raw = unsafe { clang_getTypedefDeclUnderlyingType(self.raw) };
        Ok(Type::from_raw(raw, &self.unit))
    }

    /// Integer type of an enum declaration.
    pub fn enum_type(&self) -> Result<Type> {
        self.require(
            "enum_type",
            "an enum declaration",
            self.kind() == CursorKind::ENUM_DECL,
        )?;
        let raw = unsafe { clang_getEnumDeclIntegerType(self.raw) };
        Ok(Type::from_raw(raw, &self.unit))
    }

    /// Value of an enum constant.
    ///
    /// Read as unsigned when the enum's integer type is unsigned, so a
    /// constant like `~0ULL` comes back as `u64::MAX` rather than `-1`.
    pub fn enum_value(&self) -> Result<EnumValue> {
        self.require(
            "enum_value",
            "an enum constant declaration",
            self.kind() == CursorKind::ENUM_CONSTANT_DECL,
        )?;
        let value = self.cache.enum_value.get_or_try_init(|| {
            let unsigned = integer_type(self.ty().clone())?.kind().is_unsigned_integer();
            Ok::<_, CxError>(if unsigned {
                EnumValue::Unsigned(unsafe { clang_getEnumConstantDeclUnsignedValue(self.raw) })
            } else {
                EnumValue::Signed(unsafe { clang_getEnumConstantDeclValue(self.raw) })
            })
        })?;
        Ok(*value)
    }

    pub fn objc_type_encoding(&self) -> String {
        text(unsafe { clang_getDeclObjCTypeEncoding(self.raw) })
    }

    /// Engine hash of the cursor; equal cursors hash equally.
    pub fn hash(&self) -> u32 {
        *self
            .cache
            .hash
            .get_or_init(|| unsafe { clang_hashCursor(self.raw) })
    }

    /// The file an inclusion directive pulls in.
    pub fn included_file(&self) -> Result<Option<File>> {
        self.require(
            "included_file",
            "an inclusion directive",
            self.kind() == CursorKind::INCLUSION_DIRECTIVE,
        )?;
        Ok(File::from_raw(
            unsafe { clang_getIncludedFile(self.raw) },
            &self.unit,
        ))
    }

    pub fn brief_comment(&self) -> Option<String> {
        text_opt(unsafe { clang_Cursor_getBriefCommentText(self.raw) })
    }

    pub fn raw_comment(&self) -> Option<String> {
        text_opt(unsafe { clang_Cursor_getRawCommentText(self.raw) })
    }

    /// Parameters of a function or method declaration, or the arguments of a call.
    pub fn arguments(&self) -> Vec<Cursor> {
        let count = unsafe { clang_Cursor_getNumArguments(self.raw) };
        (0..count.max(0) as u32)
            .filter_map(|i| self.derived(unsafe { clang_Cursor_getArgument(self.raw, i) }))
            .collect()
    }

    /// Number of template arguments of a specialization; `None` for other cursors.
    pub fn template_argument_count(&self) -> Option<u32> {
        let count = unsafe { clang_Cursor_getNumTemplateArguments(self.raw) };
        u32::try_from(count).ok()
    }

    pub fn template_argument_kind(&self, index: u32) -> TemplateArgumentKind {
        TemplateArgumentKind::from_raw(unsafe {
            clang_Cursor_getTemplateArgumentKind(self.raw, index)
        })
    }

    pub fn template_argument_type(&self, index: u32) -> Type {
        let raw = unsafe { clang_Cursor_getTemplateArgumentType(self.raw, index) };
        Type::from_raw(raw, &self.unit)
    }

    pub fn template_argument_value(&self, index: u32) -> i64 {
        unsafe { clang_Cursor_getTemplateArgumentValue(self.raw, index) }
    }

    pub fn template_argument_unsigned_value(&self, index: u32) -> u64 {
        unsafe { clang_Cursor_getTemplateArgumentUnsignedValue(self.raw, index) }
    }

    /// Direct children. Every call runs a fresh visitation.
    pub fn children(&self) -> Vec<Cursor> {
        visit::children(self)
    }

    /// This cursor followed by all of its descendants, depth first.
    pub fn walk_preorder(&self) -> Preorder {
        Preorder::new(self.clone())
    }

    /// Tokens covering this cursor's extent.
    pub fn tokens(&self) -> Tokens {
        token::tokenize(&self.unit, self.extent())
    }

    /// Offset of a field in bits from the start of its record.
    pub fn field_offset(&self) -> Result<u64> {
        layout_result("field_offset", unsafe {
            clang_Cursor_getOffsetOfField(self.raw)
        })
    }

    pub fn is_anonymous(&self) -> bool {
        unsafe { clang_Cursor_isAnonymous(self.raw) != 0 }
    }

    pub fn is_bitfield(&self) -> bool {
        unsafe { clang_Cursor_isBitField(self.raw) != 0 }
    }

    /// Width of a bit-field; `None` when the cursor is not one.
    pub fn bitfield_width(&self) -> Option<u32> {
        u32::try_from(unsafe { clang_getFieldDeclBitWidth(self.raw) }).ok()
    }

    pub fn is_const_method(&self) -> bool {
        unsafe { clang_CXXMethod_isConst(self.raw) != 0 }
    }

    pub fn is_converting_constructor(&self) -> bool {
        unsafe { clang_CXXConstructor_isConvertingConstructor(self.raw) != 0 }
    }

    pub fn is_copy_constructor(&self) -> bool {
        unsafe { clang_CXXConstructor_isCopyConstructor(self.raw) != 0 }
    }

    pub fn is_default_constructor(&self) -> bool {
        unsafe { clang_CXXConstructor_isDefaultConstructor(self.raw) != 0 }
    }

    pub fn is_move_constructor(&self) -> bool {
        unsafe { clang_CXXConstructor_isMoveConstructor(self.raw) != 0 }
    }

    pub fn is_default_method(&self) -> bool {
        unsafe { clang_CXXMethod_isDefaulted(self.raw) != 0 }
    }

    /// `false` when the loaded engine predates the query.
    pub fn is_deleted_method(&self) -> bool {
        supports!(clang_CXXMethod_isDeleted) && unsafe { clang_CXXMethod_isDeleted(self.raw) != 0 }
    }

    pub fn is_copy_assignment_operator_method(&self) -> bool {
        supports!(clang_CXXMethod_isCopyAssignmentOperator)
            && unsafe { clang_CXXMethod_isCopyAssignmentOperator(self.raw) != 0 }
    }

    pub fn is_move_assignment_operator_method(&self) -> bool {
        supports!(clang_CXXMethod_isMoveAssignmentOperator)
            && unsafe { clang_CXXMethod_isMoveAssignmentOperator(self.raw) != 0 }
    }

    pub fn is_explicit_method(&self) -> bool {
        supports!(clang_CXXMethod_isExplicit)
            && unsafe { clang_CXXMethod_isExplicit(self.raw) != 0 }
    }

    pub fn is_mutable_field(&self) -> bool {
        unsafe { clang_CXXField_isMutable(self.raw) != 0 }
    }

    pub fn is_pure_virtual_method(&self) -> bool {
        unsafe { clang_CXXMethod_isPureVirtual(self.raw) != 0 }
    }

    pub fn is_static_method(&self) -> bool {
        unsafe { clang_CXXMethod_isStatic(self.raw) != 0 }
    }

    pub fn is_virtual_method(&self) -> bool {
        unsafe { clang_CXXMethod_isVirtual(self.raw) != 0 }
    }

    pub fn is_abstract_record(&self) -> bool {
        unsafe { clang_CXXRecord_isAbstract(self.raw) != 0 }
    }

    pub fn is_scoped_enum(&self) -> bool {
        unsafe { clang_EnumDecl_isScoped(self.raw) != 0 }
    }
}

/// Resolves the integer type behind an enum constant's type: sugar is
/// peeled, typedefs are made canonical and enums yield their integer type.
fn integer_type(ty: Type) -> Result<Type> {
    let ty = if ty.kind() == TypeKind::ELABORATED {
        ty.named_type()
    } else {
        ty
    };
    let ty = if ty.kind() == TypeKind::TYPEDEF {
        ty.canonical()
    } else {
        ty
    };
    if ty.kind() != TypeKind::ENUM {
        return Ok(ty);
    }
    match ty.declaration() {
        Some(decl) if decl.kind() == CursorKind::ENUM_DECL => Ok(decl.enum_type()?.canonical()),
        _ => Ok(ty),
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        unsafe { clang_equalCursors(self.raw, other.raw) != 0 }
    }
}

impl Eq for Cursor {}

impl Hash for Cursor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(Cursor::hash(self));
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("kind", &self.kind())
            .field("spelling", &self.spelling())
            .field("location", self.location())
            .finish()
    }
}
