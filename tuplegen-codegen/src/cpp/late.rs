//! Late-definition emission.
//!
//! Late definitions are emitted in schema declaration order and assume total
//! knowledge of the generated type graph: forward declarations already
//! guarantee that every generated name is visible, so a late definition may
//! reference arbitrarily distant types. This is where whole-graph features
//! live: tuple-like traits, polymorphic dispatch tables and the global type
//! registry on the root type.

use std::collections::BTreeSet;

use tuplegen_schema::{Definition, Schema, StructDefinition, TypeRef};

use crate::artifacts::{self, Artifacts};
use crate::config::Config;
use crate::error::CodegenError;
use crate::resolver::TypeResolver;

/// Emitter for per-struct late definitions.
#[derive(Debug)]
pub struct LateEmitter<'a> {
    schema: &'a Schema,
    config: &'a Config,
    resolver: TypeResolver<'a>,
}

impl<'a> LateEmitter<'a> {
    /// Creates a new late-definition emitter.
    #[must_use]
    pub fn new(schema: &'a Schema, config: &'a Config) -> Self {
        Self {
            schema,
            config,
            resolver: TypeResolver::new(schema, config),
        }
    }

    /// Emits one `Late/<Name>` artifact per struct definition, in schema
    /// declaration order. Enums and scalars yield nothing.
    ///
    /// # Errors
    /// Fails on unresolvable field types and artifact name collisions.
    pub fn emit(&self) -> Result<Artifacts, CodegenError> {
        let all_types = self.all_known_types()?;

        let mut definitions = Artifacts::new();
        for definition in self.schema.definitions() {
            if let Definition::Struct(s) = definition {
                let text = self.render_struct(s, &all_types)?;
                definitions.insert(artifacts::late_name(&s.name), text)?;
            }
        }
        Ok(definitions)
    }

    /// Computes every generated-type spelling known to the schema: the
    /// user-facing full name of every struct, the resolved type of every
    /// field, and the resolved element type of every sequence field.
    fn all_known_types(&self) -> Result<BTreeSet<String>, CodegenError> {
        let mut all_types = BTreeSet::new();
        for struct_def in self.schema.struct_definitions() {
            all_types.insert(format!("{}::{}", struct_def.namespace, struct_def.name));
            for field in &struct_def.fields {
                all_types.insert(self.resolver.field_type(field)?);
                if let Some(element) = field.element_type() {
                    all_types.insert(self.resolver.cpp_type(element, &field.name)?);
                }
            }
        }
        Ok(all_types)
    }

    fn render_struct(
        &self,
        struct_def: &StructDefinition,
        all_types: &BTreeSet<String>,
    ) -> Result<String, CodegenError> {
        let user_fullname = format!("{}::{}", struct_def.namespace, struct_def.name);
        let upcastable = self.schema.upcastable_types(struct_def);

        let mut output = String::new();
        output.push_str("#pragma once\n\n");
        output.push_str(&format!(
            "//\n// Late definition for {user_fullname}: relies on forward declarations\n\
             // only, so any generated type may be named regardless of order.\n//\n\n"
        ));

        output.push_str(&format!("template<>\nstruct TupleLikeTraits<{user_fullname}> {{\n"));
        output.push_str(&format!(
            "  static constexpr const char *Name = \"{}\";\n",
            struct_def.name
        ));
        output.push_str(&format!(
            "  static constexpr const char *FullName = \"{user_fullname}\";\n"
        ));
        output.push_str("  enum class Fields {\n");
        for field in &struct_def.fields {
            output.push_str(&format!("    {},\n", field.name));
        }
        output.push_str("    Count\n  };\n");
        output.push_str(&format!(
            "  static constexpr std::array<const char *, {}> FieldNames = {{\n",
            struct_def.fields.len()
        ));
        for field in &struct_def.fields {
            output.push_str(&format!("    \"{}\",\n", field.name));
        }
        output.push_str("  };\n");
        output.push_str("};\n");

        if !upcastable.is_empty() {
            output.push('\n');
            output.push_str(&format!(
                "template<>\nstruct ConcreteTypesOf<{user_fullname}> {{\n"
            ));
            let concrete: Vec<String> = upcastable
                .iter()
                .map(|s| format!("{}::{}", s.namespace, s.name))
                .collect();
            output.push_str(&format!("  using Types = std::tuple<{}>;\n", concrete.join(", ")));
            output.push_str("};\n");
        }

        if self.config.emit_tracking {
            output.push_str(&self.render_tracking(struct_def, &user_fullname)?);
        }

        if struct_def.name == self.schema.root_type {
            output.push_str(&render_type_registry(&user_fullname, all_types));
        }

        Ok(output)
    }

    /// Renders the mutation-tracking visitor over the struct's tracked
    /// container fields, plus a diagnostics dump when tracking debug output
    /// is requested.
    fn render_tracking(
        &self,
        struct_def: &StructDefinition,
        user_fullname: &str,
    ) -> Result<String, CodegenError> {
        let tracked: Vec<&str> = struct_def
            .fields
            .iter()
            .filter(|field| match &field.ty {
                TypeRef::Sequence { kind, .. } => kind.tracking_cpp_name().is_some(),
                _ => false,
            })
            .map(|field| field.name.as_str())
            .collect();

        let mut output = String::new();
        output.push('\n');
        output.push_str("template<typename Tracker>\n");
        output.push_str(&format!(
            "void collectTrackers({user_fullname} &Object, Tracker &T) {{\n"
        ));
        for name in &tracked {
            output.push_str(&format!("  T.visit(Object.{name});\n"));
        }
        output.push_str("}\n");

        if self.config.emit_tracking_debug {
            output.push('\n');
            output.push_str(&format!(
                "inline void dumpTrackingState(const {user_fullname} &Object, std::ostream &Stream) {{\n"
            ));
            for name in &tracked {
                output.push_str(&format!(
                    "  Stream << \"{name}: \" << Object.{name}.trackingState() << \"\\n\";\n"
                ));
            }
            output.push_str("}\n");
        }

        Ok(output)
    }
}

/// Renders the whole-graph type registry, attached to the root type's late
/// definition.
fn render_type_registry(root_fullname: &str, all_types: &BTreeSet<String>) -> String {
    let mut output = String::new();
    output.push('\n');
    output.push_str(&format!(
        "template<>\nstruct AllTupleTreeTypes<{root_fullname}> {{\n"
    ));
    output.push_str(&format!(
        "  static constexpr std::array<const char *, {}> Names = {{\n",
        all_types.len()
    ));
    for name in all_types {
        output.push_str(&format!("    \"{name}\",\n"));
    }
    output.push_str("  };\n};\n");
    output
}
