//! Generation driver.

use tuplegen_schema::Schema;

use crate::artifacts::{self, Artifacts};
use crate::config::Config;
use crate::cpp::{EarlyEmitter, ForwardDeclsEmitter, ImplEmitter, LateEmitter};
use crate::error::CodegenError;
use crate::graph::{DependencyGraph, SchemaWarning};

/// Drives a full generation pass over one schema.
///
/// The dependency graph is built once at construction; the four emission
/// phases then run over the same immutable schema and graph, and their
/// outputs are merged into a single artifact set. The pass is all-or-nothing:
/// any cycle, name collision or unresolvable type aborts it with no output.
#[derive(Debug)]
pub struct Generator<'a> {
    schema: &'a Schema,
    config: Config,
    graph: DependencyGraph,
    warnings: Vec<SchemaWarning>,
}

impl<'a> Generator<'a> {
    /// Creates a new generator for the given schema and configuration.
    #[must_use]
    pub fn new(schema: &'a Schema, config: Config) -> Self {
        let (graph, warnings) = DependencyGraph::build(schema);
        Self {
            schema,
            config,
            graph,
            warnings,
        }
    }

    /// Returns the schema inconsistencies observed while building the
    /// dependency graph. These do not fail the pass; the offending
    /// dependencies are simply omitted from the generated includes.
    #[must_use]
    pub fn warnings(&self) -> &[SchemaWarning] {
        &self.warnings
    }

    /// Returns the dependency graph built for this schema.
    #[must_use]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Runs all emission phases and merges their artifacts.
    ///
    /// # Errors
    /// Returns the first fatal error from any phase; no partial output is
    /// produced.
    pub fn emit(&self) -> Result<Artifacts, CodegenError> {
        let mut output = Artifacts::new();
        output.insert(
            artifacts::FORWARD_DECLS,
            ForwardDeclsEmitter::new(self.schema).emit(),
        )?;
        output.merge(EarlyEmitter::new(self.schema, &self.config).emit(&self.graph)?)?;
        output.merge(LateEmitter::new(self.schema, &self.config).emit()?)?;
        output.insert(
            artifacts::IMPL,
            ImplEmitter::new(self.schema, &self.config).emit()?,
        )?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuplegen_schema::{
        EnumDefinition, EnumMember, ScalarDefinition, SchemaBuilder, StructDefinition,
        StructField, TypeRef,
    };

    /// Scalar + enum + struct, the minimal interesting schema.
    fn kind_node_schema() -> Schema {
        let mut builder = SchemaBuilder::new("ns", "ns::generated", "Node");
        builder.add_scalar(ScalarDefinition::new("string")).unwrap();
        builder
            .add_enum(EnumDefinition::new(
                "Kind",
                "ns",
                vec![EnumMember::new("A"), EnumMember::new("B")],
            ))
            .unwrap();
        builder
            .add_struct(StructDefinition::new(
                "Node",
                "ns",
                vec![
                    StructField::new("Kind", TypeRef::named("Kind")),
                    StructField::new("Label", TypeRef::named("string")),
                ],
            ))
            .unwrap();
        builder.build().unwrap()
    }

    /// Abstract base, derived struct, and a holder with an upcastable field.
    fn upcast_schema() -> Schema {
        let mut builder = SchemaBuilder::new("model", "model::generated", "Holder");
        builder
            .add_struct({
                let mut s = StructDefinition::new("Base", "model", vec![]);
                s.is_abstract = true;
                s
            })
            .unwrap();
        builder
            .add_struct({
                let mut s = StructDefinition::new("Derived", "model", vec![]);
                s.base = Some("Base".to_string());
                s
            })
            .unwrap();
        builder
            .add_struct(StructDefinition::new(
                "Holder",
                "model",
                vec![StructField::new(
                    "Child",
                    TypeRef::upcastable(TypeRef::named("Base")),
                )],
            ))
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_kind_node_scenario() {
        let schema = kind_node_schema();
        let generator = Generator::new(&schema, Config::default());
        let artifacts = generator.emit().unwrap();

        // Early artifacts: one per struct and enum, none for scalars.
        assert!(artifacts.contains("Early/Kind"));
        assert!(artifacts.contains("Early/Node"));
        assert!(!artifacts.contains("Early/string"));

        // Kind is ordered before Node in the early phase.
        let order = generator.graph().topological_order(&schema).unwrap();
        let kind = order.iter().position(|n| n == "Kind").unwrap();
        let node = order.iter().position(|n| n == "Node").unwrap();
        assert!(kind < node);

        // Late artifacts cover structs only.
        assert!(artifacts.contains("Late/Node"));
        assert!(!artifacts.contains("Late/Kind"));

        // Forward declarations cover Node in both namespaces, and the
        // abstract list is empty.
        let forward = artifacts.get("ForwardDecls").unwrap();
        assert!(forward.contains("namespace ns::generated {"));
        assert!(forward.contains("namespace ns {"));
        assert_eq!(forward.matches("class Node;").count(), 2);
        assert!(!forward.contains("IsAbstractTupleTreeType<ns::Node> = true"));

        assert!(artifacts.contains("Impl"));
        assert_eq!(artifacts.len(), 5);
    }

    #[test]
    fn test_upcast_scenario() {
        let schema = upcast_schema();
        let generator = Generator::new(&schema, Config::default());
        let artifacts = generator.emit().unwrap();

        // Holder depends on Base through the upcastable field.
        assert!(
            schema
                .get_definition("Holder")
                .unwrap()
                .dependencies()
                .contains("Base")
        );

        // Holder's early definition spells the owning polymorphic pointer.
        let holder = artifacts.get("Early/Holder").unwrap();
        assert!(holder.contains("UpcastablePointer<model::Base> Child = {};"));

        // Only Base is marked abstract.
        let forward = artifacts.get("ForwardDecls").unwrap();
        assert!(forward.contains("IsAbstractTupleTreeType<model::Base> = true"));
        assert!(!forward.contains("IsAbstractTupleTreeType<model::Derived>"));
        assert!(!forward.contains("IsAbstractTupleTreeType<model::Holder>"));
    }

    #[test]
    fn test_determinism() {
        let schema = kind_node_schema();
        let config = Config::default().with_user_include_path("lib/Model");

        let first = Generator::new(&schema, config.clone()).emit().unwrap();
        let second = Generator::new(&schema, config).emit().unwrap();

        let first: Vec<(&str, &str)> = first.iter().collect();
        let second: Vec<(&str, &str)> = second.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_completeness() {
        let schema = upcast_schema();
        let artifacts = Generator::new(&schema, Config::default()).emit().unwrap();

        for struct_def in schema.struct_definitions() {
            assert!(artifacts.contains(&format!("Early/{}", struct_def.name)));
            assert!(artifacts.contains(&format!("Late/{}", struct_def.name)));
        }
        // ForwardDecls + Impl + 3 early + 3 late.
        assert_eq!(artifacts.len(), 8);
    }

    #[test]
    fn test_missing_dependency_warning_is_surfaced() {
        let mut builder = SchemaBuilder::new("model", "model::generated", "Root");
        builder
            .add_struct(StructDefinition::new(
                "Orphan",
                "model",
                vec![StructField::new(
                    "Ref",
                    TypeRef::reference(TypeRef::named("Ghost"), TypeRef::named("Orphan")),
                )],
            ))
            .unwrap();
        let schema = builder.build().unwrap();

        let generator = Generator::new(&schema, Config::default());
        assert_eq!(generator.warnings().len(), 1);
        assert_eq!(generator.warnings()[0].missing_dependency, "Ghost");
    }

    #[test]
    fn test_cycle_aborts_with_no_output() {
        let mut builder = SchemaBuilder::new("model", "model::generated", "Root");
        builder
            .add_struct(StructDefinition::new(
                "A",
                "model",
                vec![StructField::new("B", TypeRef::named("B"))],
            ))
            .unwrap();
        builder
            .add_struct(StructDefinition::new(
                "B",
                "model",
                vec![StructField::new("A", TypeRef::named("A"))],
            ))
            .unwrap();
        let schema = builder.build().unwrap();

        let result = Generator::new(&schema, Config::default()).emit();
        assert!(matches!(result, Err(CodegenError::CycleDetected { .. })));
    }

    #[test]
    fn test_empty_schema() {
        let schema = SchemaBuilder::new("model", "model::generated", "Root")
            .build()
            .unwrap();
        let artifacts = Generator::new(&schema, Config::default()).emit().unwrap();

        // Forward declarations and the implementation unit always exist.
        assert_eq!(artifacts.len(), 2);
        assert!(artifacts.contains("ForwardDecls"));
        assert!(artifacts.contains("Impl"));
    }
}
