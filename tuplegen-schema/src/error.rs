//! Error types for schema construction.

use thiserror::Error;

/// Error type for schema construction.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two definitions share a name.
    #[error("duplicate definition: '{name}'")]
    DuplicateDefinition {
        /// Name of the duplicate.
        name: String,
    },

    /// A struct declares a base that is not a struct in the schema.
    #[error("struct '{struct_name}' declares unknown base '{base}'")]
    UnknownBase {
        /// The declaring struct.
        struct_name: String,
        /// The missing base name.
        base: String,
    },
}

impl SchemaError {
    /// Creates a duplicate definition error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateDefinition { name: name.into() }
    }

    /// Creates an unknown base error.
    pub fn unknown_base(struct_name: impl Into<String>, base: impl Into<String>) -> Self {
        Self::UnknownBase {
            struct_name: struct_name.into(),
            base: base.into(),
        }
    }
}
