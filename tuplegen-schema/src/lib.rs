//! # TupleGen Schema
//!
//! In-memory object model for tuple-tree schemas.
//!
//! This crate provides:
//! - The [`Definition`] variants (scalars, enums, structs) that live in a schema
//! - The [`TypeRef`] expressions used by struct fields (sequences, tree
//!   references, upcastable pointers)
//! - A [`SchemaBuilder`] that enforces construction invariants and resolves
//!   per-definition dependency sets
//!
//! Schema *documents* (however they are serialized on disk) are parsed and
//! validated by an outer layer; consumers of this crate receive a finished,
//! immutable [`Schema`].

pub mod builder;
pub mod error;
pub mod types;

pub use builder::SchemaBuilder;
pub use error::SchemaError;
pub use types::{
    Definition, EnumDefinition, EnumMember, ScalarDefinition, Schema, SequenceKind,
    StructDefinition, StructField, TypeRef,
};
