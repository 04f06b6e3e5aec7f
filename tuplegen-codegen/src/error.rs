//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
///
/// Every variant is fatal: generation is deterministic and pure, so a failed
/// pass produces no output and is never retried.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The dependency graph contains a cycle among value-contained fields.
    #[error("dependency cycle among definitions: {}", members.join(", "))]
    CycleDetected {
        /// Names of the definitions on (or between) the offending cycles.
        members: Vec<String>,
    },

    /// Two definitions would emit to the same artifact name.
    #[error("artifact name collision: '{artifact}'")]
    NameCollision {
        /// The colliding artifact name.
        artifact: String,
    },

    /// A type expression names a definition that is not in the schema.
    #[error("unknown type '{type_name}' referenced by '{context}'")]
    UnknownType {
        /// The missing definition name.
        type_name: String,
        /// What referenced it (a struct field or type expression).
        context: String,
    },
}

impl CodegenError {
    /// Creates a name collision error.
    pub fn collision(artifact: impl Into<String>) -> Self {
        Self::NameCollision {
            artifact: artifact.into(),
        }
    }

    /// Creates an unknown type error.
    pub fn unknown_type(type_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
            context: context.into(),
        }
    }
}
