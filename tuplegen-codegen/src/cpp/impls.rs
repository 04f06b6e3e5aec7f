//! Implementation-unit emission.
//!
//! Out-of-line method bodies for every struct definition, concatenated in
//! schema declaration order into a single translation unit.

use tuplegen_schema::{Definition, Schema, StructDefinition, TypeRef};

use crate::config::Config;
use crate::error::CodegenError;

/// Emitter for the single implementation artifact.
#[derive(Debug)]
pub struct ImplEmitter<'a> {
    schema: &'a Schema,
    config: &'a Config,
}

impl<'a> ImplEmitter<'a> {
    /// Creates a new implementation emitter.
    #[must_use]
    pub fn new(schema: &'a Schema, config: &'a Config) -> Self {
        Self { schema, config }
    }

    /// Renders the implementation unit. Enums and scalars contribute
    /// nothing.
    ///
    /// # Errors
    /// Currently infallible for well-formed schemas; the `Result` mirrors the
    /// other emitters so the driver treats all phases uniformly.
    pub fn emit(&self) -> Result<String, CodegenError> {
        let mut output = String::new();
        output.push_str(&format!(
            "//\n// Out-of-line method bodies for tuple-tree types in namespace {}.\n//\n\n",
            self.schema.base_namespace
        ));

        for struct_def in self.schema.struct_definitions() {
            let header = if struct_def.autogenerated {
                format!("Generated/Early/{}.h", struct_def.name)
            } else {
                format!("{}.h", struct_def.name)
            };
            output.push_str(&format!(
                "#include \"{}{header}\"\n",
                self.config.user_include_path
            ));
        }
        output.push_str("#include <ostream>\n\n");

        for definition in self.schema.definitions() {
            if let Definition::Struct(s) = definition {
                output.push_str(&render_struct_impl(s));
                output.push('\n');
            }
        }

        Ok(output)
    }
}

fn render_struct_impl(struct_def: &StructDefinition) -> String {
    let qualified = format!("{}::generated::{}", struct_def.namespace, struct_def.name);

    let mut output = String::new();
    if !struct_def.is_abstract {
        output.push_str(&format!("const char *{qualified}::typeName() const {{\n"));
        output.push_str(&format!("  return \"{}\";\n", struct_def.name));
        output.push_str("}\n\n");
    }

    output.push_str(&format!(
        "void {qualified}::dump(std::ostream &Stream) const {{\n"
    ));
    output.push_str(&format!("  Stream << \"{} {{\\n\";\n", struct_def.name));
    for field in &struct_def.fields {
        output.push_str(&format!("  Stream << \"  {}\\n\";\n", field.name));
    }
    output.push_str("  Stream << \"}\\n\";\n");
    output.push_str("}\n\n");

    output.push_str(&format!("bool {qualified}::verify() const {{\n"));
    for field in &struct_def.fields {
        // Owning polymorphic pointers must not be null in a valid tree.
        if matches!(field.ty, TypeRef::Upcastable { .. }) {
            output.push_str(&format!("  if ({} == nullptr)\n    return false;\n", field.name));
        }
    }
    output.push_str("  return true;\n");
    output.push_str("}\n");
    output
}
