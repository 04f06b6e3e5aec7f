//! Early-definition emission.
//!
//! Early definitions are emitted in topological order and are minimal: each
//! one is sufficient for use as a by-value member inside another type, but
//! knows nothing about sibling types that depend on it. Whole-graph features
//! live in the late definitions.

use std::collections::BTreeSet;

use tuplegen_schema::{Definition, EnumDefinition, Schema, StructDefinition};

use crate::artifacts::{self, Artifacts};
use crate::config::Config;
use crate::cpp::render_doc;
use crate::error::CodegenError;
use crate::graph::DependencyGraph;
use crate::resolver::TypeResolver;

/// Emitter for per-type early definitions.
#[derive(Debug)]
pub struct EarlyEmitter<'a> {
    schema: &'a Schema,
    config: &'a Config,
    resolver: TypeResolver<'a>,
}

impl<'a> EarlyEmitter<'a> {
    /// Creates a new early-definition emitter.
    #[must_use]
    pub fn new(schema: &'a Schema, config: &'a Config) -> Self {
        Self {
            schema,
            config,
            resolver: TypeResolver::new(schema, config),
        }
    }

    /// Emits one `Early/<Name>` artifact per struct and enum definition, in
    /// topological order. Scalars yield nothing.
    ///
    /// # Errors
    /// Fails on dependency cycles, unresolvable field types, and artifact
    /// name collisions.
    pub fn emit(&self, graph: &DependencyGraph) -> Result<Artifacts, CodegenError> {
        let mut definitions = Artifacts::new();
        for name in graph.topological_order(self.schema)? {
            let Some(definition) = self.schema.get_definition(&name) else {
                continue;
            };
            let text = match definition {
                Definition::Struct(s) => Some(self.render_struct(s)?),
                Definition::Enum(e) => Some(render_enum(e)),
                Definition::Scalar(_) => None,
            };
            if let Some(text) = text {
                definitions.insert(artifacts::early_name(&name), text)?;
            }
        }
        Ok(definitions)
    }

    /// Computes the include set of a definition: the forward declarations,
    /// plus one header per non-scalar dependency. Autogenerated dependencies
    /// point at their early header; anything else is expected to have a
    /// hand-written companion header.
    fn compute_includes(&self, dependencies: &BTreeSet<String>) -> BTreeSet<String> {
        let mut includes = BTreeSet::new();
        includes.insert("Generated/ForwardDecls.h".to_string());
        for dependency in dependencies {
            let Some(dep_definition) = self.schema.get_definition(dependency) else {
                continue;
            };
            if dep_definition.is_scalar() {
                continue;
            }
            if dep_definition.is_autogenerated() {
                includes.insert(format!("Generated/Early/{}.h", dep_definition.name()));
            } else {
                includes.insert(format!("{}.h", dep_definition.name()));
            }
        }
        includes
    }

    fn render_struct(&self, struct_def: &StructDefinition) -> Result<String, CodegenError> {
        let namespace = format!("{}::generated", struct_def.namespace);
        let name = &struct_def.name;
        let upcastable = self.schema.upcastable_types(struct_def);

        let mut output = String::new();
        output.push_str("#pragma once\n\n");

        for include in self.compute_includes(&struct_def.dependencies) {
            output.push_str(&format!(
                "#include \"{}{include}\"\n",
                self.config.user_include_path
            ));
        }
        output.push_str("#include <iosfwd>\n");
        output.push('\n');

        output.push_str(&format!("namespace {namespace} {{\n\n"));
        output.push_str(&render_doc(struct_def.doc.as_deref(), ""));
        match &struct_def.base {
            Some(base_name) => {
                let base = self
                    .schema
                    .get_definition(base_name)
                    .ok_or_else(|| CodegenError::unknown_type(base_name, name.as_str()))?;
                output.push_str(&format!(
                    "class {name} : public {} {{\n",
                    TypeResolver::fullname(base)
                ));
            }
            None => output.push_str(&format!("class {name} {{\n")),
        }

        output.push_str("public:\n");
        output.push_str(&format!(
            "  static constexpr bool IsAbstract = {};\n",
            struct_def.is_abstract
        ));

        if !struct_def.fields.is_empty() {
            output.push_str("\npublic:\n");
            for field in &struct_def.fields {
                output.push_str(&render_doc(field.doc.as_deref(), "  "));
                let field_type = self.resolver.field_type(field)?;
                output.push_str(&format!("  {field_type} {} = {{}};\n", field.name));
            }
        }

        output.push_str("\npublic:\n");
        if struct_def.is_abstract {
            output.push_str(&format!("  virtual ~{name}() = default;\n"));
            output.push_str("  virtual const char *typeName() const = 0;\n");
        } else if struct_def.base.is_some() {
            output.push_str(&format!("  {name}() = default;\n"));
            output.push_str("  const char *typeName() const override;\n");
        } else if upcastable.is_empty() {
            output.push_str(&format!("  {name}() = default;\n"));
            output.push_str("  const char *typeName() const;\n");
        } else {
            // Concrete root of a polymorphic hierarchy.
            output.push_str(&format!("  {name}() = default;\n"));
            output.push_str(&format!("  virtual ~{name}() = default;\n"));
            output.push_str("  virtual const char *typeName() const;\n");
        }
        output.push_str(&format!(
            "  bool operator==(const {name} &Other) const = default;\n"
        ));
        output.push_str("  void dump(std::ostream &Stream) const;\n");
        output.push_str("  bool verify() const;\n");

        output.push_str("};\n\n");
        output.push_str(&format!("}} // namespace {namespace}\n"));
        Ok(output)
    }
}

/// Renders an enum definition: a namespace wrapping a `Values` enumeration,
/// with `Invalid` and `Count` sentinels and a `getName` helper.
fn render_enum(enum_def: &EnumDefinition) -> String {
    let namespace = format!("{}::{}", enum_def.namespace, enum_def.name);

    let mut output = String::new();
    output.push_str("#pragma once\n\n");
    output.push_str("#include <cstdint>\n\n");
    output.push_str(&format!("namespace {namespace} {{\n\n"));
    output.push_str(&render_doc(enum_def.doc.as_deref(), ""));
    output.push_str("enum Values : uint64_t {\n");
    output.push_str("  Invalid,\n");
    for member in &enum_def.members {
        output.push_str(&render_doc(member.doc.as_deref(), "  "));
        output.push_str(&format!("  {},\n", member.name));
    }
    output.push_str("  Count\n");
    output.push_str("};\n\n");

    output.push_str("inline const char *getName(Values Value) {\n");
    output.push_str("  switch (Value) {\n");
    output.push_str("  case Invalid:\n    return \"Invalid\";\n");
    for member in &enum_def.members {
        output.push_str(&format!(
            "  case {}:\n    return \"{}\";\n",
            member.name, member.name
        ));
    }
    output.push_str("  default:\n    return nullptr;\n");
    output.push_str("  }\n");
    output.push_str("}\n\n");
    output.push_str(&format!("}} // namespace {namespace}\n"));
    output
}
