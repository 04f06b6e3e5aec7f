//! Forward-declaration emission.
//!
//! Every struct definition gets exactly one forward declaration in its
//! autogenerated namespace and one in its user-facing namespace, so late
//! definitions may name any generated type without caring about declaration
//! order. Abstract structs are additionally marked through a variable
//! template that only needs the forward declarations themselves.

use std::collections::{BTreeMap, BTreeSet};

use tuplegen_schema::Schema;

/// Emitter for the forward-declarations artifact.
#[derive(Debug, Clone, Copy)]
pub struct ForwardDeclsEmitter<'a> {
    schema: &'a Schema,
}

impl<'a> ForwardDeclsEmitter<'a> {
    /// Creates a new forward-declaration emitter.
    #[must_use]
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Renders the forward-declarations artifact.
    #[must_use]
    pub fn emit(&self) -> String {
        let mut generated_ns_to_names: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
        let mut user_ns_to_names: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for definition in self.schema.struct_definitions() {
            generated_ns_to_names
                .entry(format!("{}::generated", definition.namespace))
                .or_default()
                .insert(&definition.name);
            user_ns_to_names
                .entry(&definition.namespace)
                .or_default()
                .insert(&definition.name);
        }

        let mut output = String::new();
        output.push_str("#pragma once\n\n");
        output.push_str("//\n// Forward declarations for all generated tuple-tree types.\n//\n\n");

        for (namespace, names) in &generated_ns_to_names {
            output.push_str(&render_namespace_block(namespace, names));
        }
        for (namespace, names) in &user_ns_to_names {
            output.push_str(&render_namespace_block(namespace, names));
        }

        output.push_str(&self.render_abstract_markers());
        output
    }

    fn render_abstract_markers(&self) -> String {
        let abstract_names: Vec<String> = self
            .schema
            .struct_definitions()
            .filter(|s| s.is_abstract)
            .map(|s| format!("{}::{}", s.namespace, s.name))
            .collect();

        let mut output = String::new();
        output.push_str("template<typename T>\n");
        output.push_str("inline constexpr bool IsAbstractTupleTreeType = false;\n");
        for name in abstract_names {
            output.push('\n');
            output.push_str("template<>\n");
            output.push_str(&format!(
                "inline constexpr bool IsAbstractTupleTreeType<{name}> = true;\n"
            ));
        }
        output
    }
}

fn render_namespace_block(namespace: &str, names: &BTreeSet<&str>) -> String {
    let mut output = String::new();
    output.push_str(&format!("namespace {namespace} {{\n\n"));
    for name in names {
        output.push_str(&format!("class {name};\n"));
    }
    output.push_str(&format!("\n}} // namespace {namespace}\n\n"));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuplegen_schema::{SchemaBuilder, StructDefinition};

    fn sample_schema() -> Schema {
        let mut builder = SchemaBuilder::new("model", "model::generated", "Root");
        builder
            .add_struct(StructDefinition::new("Node", "model", vec![]))
            .unwrap();
        builder
            .add_struct({
                let mut s = StructDefinition::new("Base", "model", vec![]);
                s.is_abstract = true;
                s
            })
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_both_namespaces_covered() {
        let schema = sample_schema();
        let output = ForwardDeclsEmitter::new(&schema).emit();

        assert!(output.contains("namespace model::generated {"));
        assert!(output.contains("namespace model {"));
        // One declaration per struct per namespace.
        assert_eq!(output.matches("class Node;").count(), 2);
        assert_eq!(output.matches("class Base;").count(), 2);
    }

    #[test]
    fn test_abstract_marker_lists_abstract_structs_only() {
        let schema = sample_schema();
        let output = ForwardDeclsEmitter::new(&schema).emit();

        assert!(output.contains("IsAbstractTupleTreeType<model::Base> = true"));
        assert!(!output.contains("IsAbstractTupleTreeType<model::Node>"));
    }

    #[test]
    fn test_deterministic() {
        let schema = sample_schema();
        let first = ForwardDeclsEmitter::new(&schema).emit();
        let second = ForwardDeclsEmitter::new(&schema).emit();
        assert_eq!(first, second);
    }
}
