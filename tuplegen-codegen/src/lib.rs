//! # TupleGen Codegen
//!
//! C++ header generation from tuple-tree schemas.
//!
//! This crate provides:
//! - Dependency graph construction and deterministic topological ordering
//! - Type resolution from schema type expressions to C++ spellings
//! - The four emission phases (forward declarations, early definitions,
//!   late definitions, implementation unit) that together let the generated
//!   types support mutual recursion and polymorphism under C++'s
//!   declare-before-use rules
//!
//! The early/late split is the load-bearing idea: early definitions are
//! minimal and dependency-ordered, so a type can be used by value before its
//! siblings exist; late definitions assume the whole type graph is forward
//! declared and carry everything that needs total knowledge.

pub mod artifacts;
pub mod config;
pub mod cpp;
pub mod error;
pub mod generator;
pub mod graph;
pub mod resolver;

pub use artifacts::Artifacts;
pub use config::Config;
pub use error::CodegenError;
pub use generator::Generator;
pub use graph::{DependencyGraph, SchemaWarning};
pub use resolver::TypeResolver;

use tuplegen_schema::Schema;

/// Generates all artifacts for a schema in one pass.
///
/// # Arguments
/// * `schema` - The finished, immutable schema
/// * `config` - Generation options
///
/// # Returns
/// The mapping from logical artifact name to generated source text.
///
/// # Errors
/// Returns `CodegenError` if the pass fails; no partial output is produced.
pub fn generate(schema: &Schema, config: Config) -> Result<Artifacts, CodegenError> {
    Generator::new(schema, config).emit()
}
