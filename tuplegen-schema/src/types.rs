//! Schema type definitions.
//!
//! This module contains the data structures representing tuple-tree schema
//! elements: named definitions (scalars, enums, structs) and the type
//! expressions struct fields are declared with.

use std::collections::{BTreeSet, HashMap};

static EMPTY_DEPS: BTreeSet<String> = BTreeSet::new();

/// Complete tuple-tree schema.
///
/// Definitions iterate in insertion order, which is the schema declaration
/// order used by the late-definition and implementation emitters. The schema
/// is immutable once built; see [`crate::SchemaBuilder`].
#[derive(Debug, Clone)]
pub struct Schema {
    /// Namespace user-facing types live in.
    pub base_namespace: String,
    /// Namespace autogenerated types live in.
    pub generated_namespace: String,
    /// Name of the root type of the tuple tree.
    pub root_type: String,
    pub(crate) definitions: Vec<Definition>,
    /// Name lookup map (built during construction).
    pub(crate) index: HashMap<String, usize>,
}

impl Schema {
    /// Looks up a definition by name.
    #[must_use]
    pub fn get_definition(&self, name: &str) -> Option<&Definition> {
        self.index.get(name).map(|&idx| &self.definitions[idx])
    }

    /// Returns true if a definition with the given name exists.
    #[must_use]
    pub fn has_definition(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over all definitions in declaration order.
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }

    /// Iterates over struct definitions in declaration order.
    pub fn struct_definitions(&self) -> impl Iterator<Item = &StructDefinition> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Struct(s) => Some(s),
            _ => None,
        })
    }

    /// Returns the concrete structs that may substitute for `base` through
    /// upcasting: every struct whose base chain reaches it, plus `base`
    /// itself when it is concrete. Empty when nothing derives from `base`.
    #[must_use]
    pub fn upcastable_types(&self, base: &StructDefinition) -> Vec<&StructDefinition> {
        let derived: Vec<&StructDefinition> = self
            .struct_definitions()
            .filter(|s| s.name != base.name && self.derives_from(s, &base.name))
            .collect();
        if derived.is_empty() {
            return Vec::new();
        }

        let mut result = Vec::new();
        if !base.is_abstract {
            if let Some(Definition::Struct(own)) = self.get_definition(&base.name) {
                result.push(own);
            }
        }
        result.extend(derived);
        result
    }

    /// Returns the number of definitions in the schema.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if the schema has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn derives_from(&self, def: &StructDefinition, base_name: &str) -> bool {
        let mut current = def.base.as_deref();
        while let Some(name) = current {
            if name == base_name {
                return true;
            }
            current = match self.get_definition(name) {
                Some(Definition::Struct(s)) => s.base.as_deref(),
                _ => None,
            };
        }
        false
    }
}

/// Named definition variants.
#[derive(Debug, Clone)]
pub enum Definition {
    /// Primitive or well-known built-in type.
    Scalar(ScalarDefinition),
    /// Closed set of named integer-backed values.
    Enum(EnumDefinition),
    /// Aggregate of named, typed fields.
    Struct(StructDefinition),
}

impl Definition {
    /// Returns the name of the definition.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(s) => &s.name,
            Self::Enum(e) => &e.name,
            Self::Struct(s) => &s.name,
        }
    }

    /// Returns the names of definitions this one textually requires.
    ///
    /// Scalars never have dependencies; struct and enum dependency sets are
    /// resolved by the schema builder.
    #[must_use]
    pub fn dependencies(&self) -> &BTreeSet<String> {
        match self {
            Self::Scalar(_) => &EMPTY_DEPS,
            Self::Enum(e) => &e.dependencies,
            Self::Struct(s) => &s.dependencies,
        }
    }

    /// Returns true if this definition is schema-internal (no hand-written
    /// companion header is expected).
    #[must_use]
    pub fn is_autogenerated(&self) -> bool {
        match self {
            Self::Scalar(_) => true,
            Self::Enum(e) => e.autogenerated,
            Self::Struct(s) => s.autogenerated,
        }
    }

    /// Returns true if this is a scalar definition.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns true if this is an enum definition.
    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    /// Returns true if this is a struct definition.
    #[must_use]
    pub const fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }
}

/// Primitive or well-known built-in type.
///
/// Scalars resolve directly to a fixed C++ spelling and never emit a
/// generated file of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarDefinition {
    /// Scalar name, spelled verbatim in generated code (except `string`,
    /// which maps to `std::string`).
    pub name: String,
}

impl ScalarDefinition {
    /// Creates a new scalar definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the C++ spelling for this scalar.
    #[must_use]
    pub fn cpp_name(&self) -> &str {
        if self.name == "string" {
            "std::string"
        } else {
            &self.name
        }
    }
}

/// Closed set of named integer-backed values.
#[derive(Debug, Clone)]
pub struct EnumDefinition {
    /// Enum name.
    pub name: String,
    /// Logical namespace.
    pub namespace: String,
    /// Documentation comment.
    pub doc: Option<String>,
    /// Whether this enum is schema-internal.
    pub autogenerated: bool,
    /// Enum members, in declaration order.
    pub members: Vec<EnumMember>,
    /// Resolved dependency set (always empty for enums).
    pub dependencies: BTreeSet<String>,
}

impl EnumDefinition {
    /// Creates a new enum definition.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        members: Vec<EnumMember>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            doc: None,
            autogenerated: true,
            members,
            dependencies: BTreeSet::new(),
        }
    }
}

/// A single enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Documentation comment.
    pub doc: Option<String>,
}

impl EnumMember {
    /// Creates a new enum member.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
        }
    }
}

/// Aggregate of named, typed fields.
#[derive(Debug, Clone)]
pub struct StructDefinition {
    /// Struct name.
    pub name: String,
    /// Logical namespace.
    pub namespace: String,
    /// Documentation comment.
    pub doc: Option<String>,
    /// True for polymorphic base types that are never directly instantiated.
    pub is_abstract: bool,
    /// Whether this struct is schema-internal.
    pub autogenerated: bool,
    /// Base struct reachable through the upcast relation, if any.
    pub base: Option<String>,
    /// Fields, in declaration order.
    pub fields: Vec<StructField>,
    /// Resolved dependency set (filled in by the schema builder).
    pub dependencies: BTreeSet<String>,
}

impl StructDefinition {
    /// Creates a new struct definition.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        fields: Vec<StructField>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            doc: None,
            is_abstract: false,
            autogenerated: true,
            base: None,
            fields,
            dependencies: BTreeSet::new(),
        }
    }
}

/// A named, typed struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// Field name.
    pub name: String,
    /// Documentation comment.
    pub doc: Option<String>,
    /// Resolved field type.
    pub ty: TypeRef,
}

impl StructField {
    /// Creates a new struct field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            doc: None,
            ty,
        }
    }

    /// Returns the element type for sequence-typed fields, `None` otherwise.
    #[must_use]
    pub fn element_type(&self) -> Option<&TypeRef> {
        match &self.ty {
            TypeRef::Sequence { element, .. } => Some(element),
            _ => None,
        }
    }
}

/// Type expression a struct field is declared with.
///
/// Named definitions are referenced by name rather than owned: a field of a
/// struct may (transitively) reach the struct itself, and names are what
/// break those cycles, exactly as forward declarations do in the generated
/// code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Reference to a named definition (scalar, enum or struct).
    Named(String),
    /// Ordered or associative container over an element type.
    Sequence {
        /// Container discriminator.
        kind: SequenceKind,
        /// Element type.
        element: Box<TypeRef>,
    },
    /// Non-owning, typed cross-reference between two nodes of the same tree.
    Reference {
        /// The referenced type.
        pointee: Box<TypeRef>,
        /// Root type of the tree the reference is resolved against.
        root: Box<TypeRef>,
    },
    /// Owning polymorphic pointer holding any concrete struct derived from
    /// `base`.
    Upcastable {
        /// The abstract base type.
        base: Box<TypeRef>,
    },
}

impl TypeRef {
    /// Creates a reference to a named definition.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a sequence over `element`.
    #[must_use]
    pub fn sequence(kind: SequenceKind, element: TypeRef) -> Self {
        Self::Sequence {
            kind,
            element: Box::new(element),
        }
    }

    /// Creates a tree reference from `pointee` resolved against `root`.
    #[must_use]
    pub fn reference(pointee: TypeRef, root: TypeRef) -> Self {
        Self::Reference {
            pointee: Box::new(pointee),
            root: Box::new(root),
        }
    }

    /// Creates an upcastable pointer over `base`.
    #[must_use]
    pub fn upcastable(base: TypeRef) -> Self {
        Self::Upcastable {
            base: Box::new(base),
        }
    }
}

/// Sequence container discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    /// Sorted container with unique keys.
    SortedVector,
    /// Mutable container with unique elements.
    MutableSet,
    /// Plain ordered container.
    Vector,
}

impl SequenceKind {
    /// Returns the C++ template name of the plain container.
    #[must_use]
    pub const fn cpp_name(self) -> &'static str {
        match self {
            Self::SortedVector => "SortedVector",
            Self::MutableSet => "MutableSet",
            Self::Vector => "std::vector",
        }
    }

    /// Returns the C++ template name of the mutation-tracked container, or
    /// `None` for kinds that are never tracked.
    #[must_use]
    pub const fn tracking_cpp_name(self) -> Option<&'static str> {
        match self {
            Self::SortedVector => Some("TrackingSortedVector"),
            Self::MutableSet => Some("TrackingMutableSet"),
            Self::Vector => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SchemaBuilder;

    fn schema_with_hierarchy() -> Schema {
        let mut builder = SchemaBuilder::new("model", "model::generated", "Binary");
        builder
            .add_struct({
                let mut s = StructDefinition::new("Base", "model", vec![]);
                s.is_abstract = true;
                s
            })
            .unwrap();
        builder
            .add_struct({
                let mut s = StructDefinition::new("DerivedA", "model", vec![]);
                s.base = Some("Base".to_string());
                s
            })
            .unwrap();
        builder
            .add_struct({
                let mut s = StructDefinition::new("DerivedB", "model", vec![]);
                s.base = Some("DerivedA".to_string());
                s
            })
            .unwrap();
        builder
            .add_struct(StructDefinition::new("Unrelated", "model", vec![]))
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_lookup_and_order() {
        let schema = schema_with_hierarchy();
        assert!(schema.has_definition("Base"));
        assert!(schema.get_definition("Missing").is_none());
        let names: Vec<&str> = schema.definitions().map(Definition::name).collect();
        assert_eq!(names, ["Base", "DerivedA", "DerivedB", "Unrelated"]);
    }

    #[test]
    fn test_upcastable_types_transitive() {
        let schema = schema_with_hierarchy();
        let base = match schema.get_definition("Base").unwrap() {
            Definition::Struct(s) => s,
            _ => unreachable!(),
        };
        let names: Vec<&str> = schema
            .upcastable_types(base)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        // Base is abstract, so only the derived structs are substitutable.
        assert_eq!(names, ["DerivedA", "DerivedB"]);
    }

    #[test]
    fn test_upcastable_types_concrete_base_includes_itself() {
        let schema = schema_with_hierarchy();
        let derived_a = match schema.get_definition("DerivedA").unwrap() {
            Definition::Struct(s) => s,
            _ => unreachable!(),
        };
        let names: Vec<&str> = schema
            .upcastable_types(derived_a)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, ["DerivedA", "DerivedB"]);
    }

    #[test]
    fn test_upcastable_types_leaf_is_empty() {
        let schema = schema_with_hierarchy();
        let unrelated = match schema.get_definition("Unrelated").unwrap() {
            Definition::Struct(s) => s,
            _ => unreachable!(),
        };
        assert!(schema.upcastable_types(unrelated).is_empty());
    }

    #[test]
    fn test_scalar_cpp_name() {
        assert_eq!(ScalarDefinition::new("string").cpp_name(), "std::string");
        assert_eq!(ScalarDefinition::new("uint64_t").cpp_name(), "uint64_t");
    }

    #[test]
    fn test_element_type_accessor() {
        let plain = StructField::new("Kind", TypeRef::named("Kind"));
        assert!(plain.element_type().is_none());

        let seq = StructField::new(
            "Children",
            TypeRef::sequence(SequenceKind::SortedVector, TypeRef::named("Node")),
        );
        assert_eq!(seq.element_type(), Some(&TypeRef::named("Node")));
    }

    #[test]
    fn test_sequence_kind_names() {
        assert_eq!(SequenceKind::SortedVector.cpp_name(), "SortedVector");
        assert_eq!(
            SequenceKind::SortedVector.tracking_cpp_name(),
            Some("TrackingSortedVector")
        );
        assert_eq!(SequenceKind::Vector.tracking_cpp_name(), None);
    }
}
