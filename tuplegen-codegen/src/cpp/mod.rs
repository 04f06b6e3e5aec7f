//! C++ emitters, one per emission phase.

pub mod early;
pub mod forward_decls;
pub mod impls;
pub mod late;

pub use early::EarlyEmitter;
pub use forward_decls::ForwardDeclsEmitter;
pub use impls::ImplEmitter;
pub use late::LateEmitter;

/// Renders a documentation string as `///` comment lines, one per input
/// line, ending with a newline. Empty docs render to nothing.
pub(crate) fn render_doc(doc: Option<&str>, indent: &str) -> String {
    let Some(doc) = doc else {
        return String::new();
    };
    if doc.is_empty() {
        return String::new();
    }
    let mut output = String::new();
    for line in doc.lines() {
        if line.is_empty() {
            output.push_str(&format!("{indent}///\n"));
        } else {
            output.push_str(&format!("{indent}/// {line}\n"));
        }
    }
    output
}
