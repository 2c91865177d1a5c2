use crate::cursor::Cursor;
use crate::error::{CxError, Result, layout_result};
use crate::handle::{c_string, text};
use crate::kinds::{CursorKind, ExceptionSpecificationKind, RefQualifierKind, TypeKind};
use crate::unit::TranslationUnit;
use crate::visit;
use clang_sys::*;
use std::fmt;

/// The type of an entity, expression or declaration.
#[derive(Clone)]
pub struct Type {
    raw: CXType,
    unit: TranslationUnit,
}

impl Type {
    pub(crate) fn from_raw(raw: CXType, unit: &TranslationUnit) -> Self {
        Self {
            raw,
            unit: unit.clone(),
        }
    }

    fn derived(&self, raw: CXType) -> Type {
        Self::from_raw(raw, &self.unit)
    }

    pub(crate) fn raw(&self) -> CXType {
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

    pub fn kind(&self) -> TypeKind {
        TypeKind::from_raw(self.raw.kind)
    }

    pub fn spelling(&self) -> String {
        text(unsafe { clang_getTypeSpelling(self.raw) })
    }

    /// The type with all typedefs and sugar removed.
    pub fn canonical(&self) -> Type {
        self.derived(unsafe { clang_getCanonicalType(self.raw) })
    }

    pub fn is_const_qualified(&self) -> bool {
        unsafe { clang_isConstQualifiedType(self.raw) != 0 }
    }

    pub fn is_volatile_qualified(&self) -> bool {
        unsafe { clang_isVolatileQualifiedType(self.raw) != 0 }
    }

    pub fn is_restrict_qualified(&self) -> bool {
        unsafe { clang_isRestrictQualifiedType(self.raw) != 0 }
    }

    pub fn is_function_variadic(&self) -> Result<bool> {
        self.require(
            "is_function_variadic",
            "a function prototype",
            self.kind() == TypeKind::FUNCTION_PROTO,
        )?;
        Ok(unsafe { clang_isFunctionTypeVariadic(self.raw) != 0 })
    }

    pub fn address_space(&self) -> u32 {
        unsafe { clang_getAddressSpace(self.raw) }
    }

    /// Name of a typedef type; empty for other types.
    pub fn typedef_name(&self) -> String {
        text(unsafe { clang_getTypedefName(self.raw) })
    }

    pub fn is_pod(&self) -> bool {
        unsafe { clang_isPODType(self.raw) != 0 }
    }

    pub fn pointee(&self) -> Type {
        self.derived(unsafe { clang_getPointeeType(self.raw) })
    }

    /// The declaration that introduced this type. Builtin types have none.
    pub fn declaration(&self) -> Option<Cursor> {
        Cursor::from_raw(unsafe { clang_getTypeDeclaration(self.raw) }, &self.unit)
            .filter(|cursor| cursor.kind() != CursorKind::NO_DECL_FOUND)
    }

    /// Result type of a function type.
    pub fn result(&self) -> Type {
        self.derived(unsafe { clang_getResultType(self.raw) })
    }

    pub fn array_element_type(&self) -> Type {
        self.derived(unsafe { clang_getArrayElementType(self.raw) })
    }

    /// Number of elements of a constant array; `None` for other types.
    pub fn array_size(&self) -> Option<u64> {
        u64::try_from(unsafe { clang_getArraySize(self.raw) }).ok()
    }

    /// Element type of an array, vector or complex type.
    pub fn element_type(&self) -> Result<Type> {
        let element = self.derived(unsafe { clang_getElementType(self.raw) });
        self.require(
            "element_type",
            "an array, vector or complex type",
            element.kind() != TypeKind::INVALID,
        )?;
        Ok(element)
    }

    /// Number of elements of an array or vector type.
    pub fn element_count(&self) -> Result<u64> {
        let count = unsafe { clang_getNumElements(self.raw) };
        self.require("element_count", "an array or vector type", count >= 0)?;
        Ok(count as u64)
    }

    /// Class of a member pointer type.
    pub fn class_type(&self) -> Type {
        self.derived(unsafe { clang_Type_getClassType(self.raw) })
    }

    /// The type named by an elaborated type such as `struct S` or `ns::T`.
    pub fn named_type(&self) -> Type {
        self.derived(unsafe { clang_Type_getNamedType(self.raw) })
    }

    /// Alignment in bytes.
    pub fn align(&self) -> Result<u64> {
        layout_result("align", unsafe { clang_Type_getAlignOf(self.raw) })
    }

    /// Size in bytes.
    pub fn size(&self) -> Result<u64> {
        layout_result("size", unsafe { clang_Type_getSizeOf(self.raw) })
    }

    /// Offset of the named field in bits.
    pub fn offset_of(&self, field: &str) -> Result<u64> {
        let field = c_string(field)?;
        layout_result("offset_of", unsafe {
            clang_Type_getOffsetOf(self.raw, field.as_ptr())
        })
    }

    pub fn ref_qualifier(&self) -> RefQualifierKind {
        RefQualifierKind::from_raw(unsafe { clang_Type_getCXXRefQualifier(self.raw) })
    }

    pub fn exception_specification_kind(&self) -> ExceptionSpecificationKind {
        ExceptionSpecificationKind::from_raw(unsafe {
            clang_getExceptionSpecificationType(self.raw)
        })
    }

    /// Parameter types of a function prototype.
    pub fn argument_types(&self) -> Result<ArgumentTypes> {
        self.require(
            "argument_types",
            "a function prototype",
            self.kind() == TypeKind::FUNCTION_PROTO,
        )?;
        let len = unsafe { clang_getNumArgTypes(self.raw) };
        Ok(ArgumentTypes {
            ty: self.clone(),
            len: len.max(0) as u32,
        })
    }

    /// Number of template arguments; `None` if this is not a specialization.
    pub fn template_argument_count(&self) -> Option<u32> {
        u32::try_from(unsafe { clang_Type_getNumTemplateArguments(self.raw) }).ok()
    }

    pub fn template_argument_type(&self, index: u32) -> Type {
        self.derived(unsafe { clang_Type_getTemplateArgumentAsType(self.raw, index) })
    }

    /// Field declarations of a record type.
    pub fn fields(&self) -> Vec<Cursor> {
        visit::fields(self)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        unsafe { clang_equalTypes(self.raw, other.raw) != 0 }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("kind", &self.kind())
            .field("spelling", &self.spelling())
            .finish()
    }
}

/// Indexable view over the parameter types of a function prototype.
#[derive(Debug, Clone)]
pub struct ArgumentTypes {
    ty: Type,
    len: u32,
}

impl ArgumentTypes {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<Type> {
        let index = u32::try_from(index).ok().filter(|i| *i < self.len)?;
        Some(self.ty.derived(unsafe { clang_getArgType(self.ty.raw, index) }))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Type> + '_ {
        (0..self.len).map(|i| self.ty.derived(unsafe { clang_getArgType(self.ty.raw, i) }))
    }
}
