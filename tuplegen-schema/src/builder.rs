//! Programmatic schema construction.
//!
//! The builder enforces the invariants the code generator relies on: names
//! are unique across the whole schema, struct base references resolve, and
//! every definition carries its resolved dependency set before the schema is
//! handed out.

use std::collections::{BTreeSet, HashMap};

use crate::error::SchemaError;
use crate::types::{Definition, EnumDefinition, ScalarDefinition, Schema, StructDefinition, TypeRef};

/// Builder for [`Schema`] instances.
#[derive(Debug)]
pub struct SchemaBuilder {
    base_namespace: String,
    generated_namespace: String,
    root_type: String,
    definitions: Vec<Definition>,
    index: HashMap<String, usize>,
}

impl SchemaBuilder {
    /// Creates a new builder.
    ///
    /// # Arguments
    /// * `base_namespace` - Namespace user-facing types live in
    /// * `generated_namespace` - Namespace autogenerated types live in
    /// * `root_type` - Name of the root type of the tuple tree
    #[must_use]
    pub fn new(
        base_namespace: impl Into<String>,
        generated_namespace: impl Into<String>,
        root_type: impl Into<String>,
    ) -> Self {
        Self {
            base_namespace: base_namespace.into(),
            generated_namespace: generated_namespace.into(),
            root_type: root_type.into(),
            definitions: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Adds a scalar definition.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateDefinition` if the name is taken.
    pub fn add_scalar(&mut self, scalar: ScalarDefinition) -> Result<&mut Self, SchemaError> {
        self.add(Definition::Scalar(scalar))
    }

    /// Adds an enum definition.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateDefinition` if the name is taken.
    pub fn add_enum(&mut self, enum_def: EnumDefinition) -> Result<&mut Self, SchemaError> {
        self.add(Definition::Enum(enum_def))
    }

    /// Adds a struct definition.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateDefinition` if the name is taken.
    pub fn add_struct(&mut self, struct_def: StructDefinition) -> Result<&mut Self, SchemaError> {
        self.add(Definition::Struct(struct_def))
    }

    fn add(&mut self, definition: Definition) -> Result<&mut Self, SchemaError> {
        let name = definition.name().to_string();
        if self.index.contains_key(&name) {
            return Err(SchemaError::duplicate(name));
        }
        self.index.insert(name, self.definitions.len());
        self.definitions.push(definition);
        Ok(self)
    }

    /// Finishes construction: checks base references and resolves every
    /// definition's dependency set.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownBase` if a struct declares a base that is
    /// not a struct in the schema.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut schema = Schema {
            base_namespace: self.base_namespace,
            generated_namespace: self.generated_namespace,
            root_type: self.root_type,
            definitions: self.definitions,
            index: self.index,
        };

        for definition in &schema.definitions {
            if let Definition::Struct(s) = definition {
                if let Some(base) = &s.base {
                    if !matches!(schema.get_definition(base), Some(Definition::Struct(_))) {
                        return Err(SchemaError::unknown_base(&s.name, base));
                    }
                }
            }
        }

        let mut resolved: Vec<(usize, BTreeSet<String>)> = Vec::new();
        for (idx, definition) in schema.definitions.iter().enumerate() {
            if let Definition::Struct(s) = definition {
                resolved.push((idx, struct_dependencies(&schema, s)));
            }
        }
        for (idx, dependencies) in resolved {
            if let Definition::Struct(s) = &mut schema.definitions[idx] {
                s.dependencies = dependencies;
            }
        }

        Ok(schema)
    }
}

/// Computes the dependency set of a struct: every name directly reachable
/// from its fields' type expressions, except scalars (which carry no
/// generated file) and the struct's own name when reached only through an
/// indirection type (a reference or upcastable pointer does not need a
/// complete type at the point of use).
fn struct_dependencies(schema: &Schema, struct_def: &StructDefinition) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for field in &struct_def.fields {
        collect_names(&field.ty, &struct_def.name, false, &mut names);
    }
    if let Some(base) = &struct_def.base {
        names.insert(base.clone());
    }
    names.retain(|name| {
        !matches!(schema.get_definition(name), Some(Definition::Scalar(_)))
    });
    names
}

fn collect_names(ty: &TypeRef, owner: &str, indirect: bool, out: &mut BTreeSet<String>) {
    match ty {
        TypeRef::Named(name) => {
            if !(indirect && name == owner) {
                out.insert(name.clone());
            }
        }
        TypeRef::Sequence { element, .. } => collect_names(element, owner, indirect, out),
        TypeRef::Reference { pointee, root } => {
            collect_names(pointee, owner, true, out);
            collect_names(root, owner, true, out);
        }
        TypeRef::Upcastable { base } => collect_names(base, owner, true, out),
    }
}
