//! Dependency graph construction and topological ordering.

use std::collections::{BTreeMap, BTreeSet};

use tuplegen_schema::Schema;

use crate::error::CodegenError;

/// A dependency declared by a definition whose target is absent from the
/// schema. Such names are dropped from the graph and the corresponding
/// include is omitted from the generated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWarning {
    /// The definition declaring the dependency.
    pub definition: String,
    /// The missing dependency name.
    pub missing_dependency: String,
}

impl std::fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "definition '{}' depends on '{}', which is not in the schema",
            self.definition, self.missing_dependency
        )
    }
}

/// Forward and inverse dependency adjacency over a schema.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    forward: BTreeMap<String, BTreeSet<String>>,
    inverse: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Builds the adjacency maps from the schema's declared dependency sets.
    ///
    /// Dependency names absent from the schema are dropped, each producing a
    /// [`SchemaWarning`] (and a `tracing` warning). An empty schema yields
    /// empty maps.
    #[must_use]
    pub fn build(schema: &Schema) -> (Self, Vec<SchemaWarning>) {
        let mut forward: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut inverse: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut warnings = Vec::new();

        for definition in schema.definitions() {
            let entry = forward.entry(definition.name().to_string()).or_default();
            for dependency in definition.dependencies() {
                if schema.has_definition(dependency) {
                    entry.insert(dependency.clone());
                    inverse
                        .entry(dependency.clone())
                        .or_default()
                        .insert(definition.name().to_string());
                } else {
                    tracing::warn!(
                        definition = definition.name(),
                        dependency = dependency.as_str(),
                        "dropping dependency on a name missing from the schema"
                    );
                    warnings.push(SchemaWarning {
                        definition: definition.name().to_string(),
                        missing_dependency: dependency.clone(),
                    });
                }
            }
        }

        (Self { forward, inverse }, warnings)
    }

    /// Returns the in-schema dependencies of `name`.
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.forward.get(name)
    }

    /// Returns the definitions depending on `name`.
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.inverse.get(name)
    }

    /// Produces a linear order in which every definition appears after all of
    /// its in-schema dependencies.
    ///
    /// Ties between independent definitions are broken by schema declaration
    /// order, so the result is stable across runs for identical input.
    ///
    /// # Errors
    /// Returns `CodegenError::CycleDetected` when the graph contains a cycle,
    /// naming the definitions involved.
    pub fn topological_order(&self, schema: &Schema) -> Result<Vec<String>, CodegenError> {
        let declaration_order: Vec<&str> =
            schema.definitions().map(|d| d.name()).collect();

        let mut remaining_deps: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (name, deps) in &self.forward {
            remaining_deps.insert(
                name.as_str(),
                deps.iter().map(String::as_str).collect(),
            );
        }

        let mut order = Vec::with_capacity(remaining_deps.len());
        let mut emitted: BTreeSet<&str> = BTreeSet::new();

        while emitted.len() < remaining_deps.len() {
            // Pick the first not-yet-emitted definition, in declaration
            // order, whose dependencies have all been emitted.
            let next = declaration_order.iter().copied().find(|name| {
                !emitted.contains(name)
                    && remaining_deps
                        .get(name)
                        .is_some_and(|deps| deps.iter().all(|d| emitted.contains(d)))
            });

            match next {
                Some(name) => {
                    emitted.insert(name);
                    order.push(name.to_string());
                }
                None => {
                    return Err(CodegenError::CycleDetected {
                        members: self.cycle_members(&emitted),
                    });
                }
            }
        }

        Ok(order)
    }

    /// Narrows the stuck residue of a failed topological sort down to the
    /// definitions sitting on (or between) cycles: nodes are trimmed from
    /// both ends until every survivor has a blocked dependency and a blocked
    /// dependent.
    fn cycle_members(&self, emitted: &BTreeSet<&str>) -> Vec<String> {
        let mut blocked: BTreeSet<&str> = self
            .forward
            .keys()
            .map(String::as_str)
            .filter(|name| !emitted.contains(name))
            .collect();

        loop {
            let removable: Vec<&str> = blocked
                .iter()
                .copied()
                .filter(|name| {
                    let no_blocked_dep = self.forward[*name]
                        .iter()
                        .all(|d| !blocked.contains(d.as_str()));
                    let no_blocked_dependent = self
                        .inverse
                        .get(*name)
                        .is_none_or(|deps| deps.iter().all(|d| !blocked.contains(d.as_str())));
                    no_blocked_dep || no_blocked_dependent
                })
                .collect();
            if removable.is_empty() {
                break;
            }
            for name in removable {
                blocked.remove(name);
            }
        }

        blocked.into_iter().map(str::to_string).collect()
    }
}
