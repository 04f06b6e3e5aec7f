//! Type resolution: mapping schema type expressions to C++ spellings.

use tuplegen_schema::{Definition, Schema, StructField, TypeRef};

use crate::config::Config;
use crate::error::CodegenError;

/// Resolves schema type expressions to concrete generated-type spellings.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    schema: &'a Schema,
    emit_tracking: bool,
}

impl<'a> TypeResolver<'a> {
    /// Creates a new resolver.
    #[must_use]
    pub fn new(schema: &'a Schema, config: &Config) -> Self {
        Self {
            schema,
            emit_tracking: config.emit_tracking,
        }
    }

    /// Resolves a type expression to its C++ spelling.
    ///
    /// `context` names the referencing entity, for error reporting only.
    ///
    /// # Errors
    /// Returns `CodegenError::UnknownType` if a named type is absent from the
    /// schema.
    pub fn cpp_type(&self, ty: &TypeRef, context: &str) -> Result<String, CodegenError> {
        match ty {
            TypeRef::Named(name) => {
                let definition = self
                    .schema
                    .get_definition(name)
                    .ok_or_else(|| CodegenError::unknown_type(name, context))?;
                Ok(Self::user_fullname(definition))
            }
            TypeRef::Sequence { kind, element } => {
                let element_type = self.cpp_type(element, context)?;
                let container = if self.emit_tracking {
                    kind.tracking_cpp_name().unwrap_or(kind.cpp_name())
                } else {
                    kind.cpp_name()
                };
                Ok(format!("{container}<{element_type}>"))
            }
            TypeRef::Reference { pointee, root } => {
                let pointee_type = self.cpp_type(pointee, context)?;
                let root_type = self.cpp_type(root, context)?;
                Ok(format!("TupleTreeReference<{pointee_type}, {root_type}>"))
            }
            TypeRef::Upcastable { base } => {
                let base_type = self.cpp_type(base, context)?;
                Ok(format!("UpcastablePointer<{base_type}>"))
            }
        }
    }

    /// Resolves a struct field's type to its C++ spelling.
    ///
    /// # Errors
    /// Returns `CodegenError::UnknownType` if the field names a type absent
    /// from the schema.
    pub fn field_type(&self, field: &StructField) -> Result<String, CodegenError> {
        self.cpp_type(&field.ty, &field.name)
    }

    /// Returns the spelling of a definition as seen from autogenerated code:
    /// structs are named in their `generated` sub-namespace.
    #[must_use]
    pub fn fullname(definition: &Definition) -> String {
        match definition {
            Definition::Scalar(s) => s.cpp_name().to_string(),
            Definition::Enum(e) => format!("{}::{}::Values", e.namespace, e.name),
            Definition::Struct(s) => format!("{}::generated::{}", s.namespace, s.name),
        }
    }

    /// Returns the user-facing spelling of a definition.
    #[must_use]
    pub fn user_fullname(definition: &Definition) -> String {
        match definition {
            Definition::Scalar(s) => s.cpp_name().to_string(),
            Definition::Enum(e) => format!("{}::{}::Values", e.namespace, e.name),
            Definition::Struct(s) => format!("{}::{}", s.namespace, s.name),
        }
    }
}
