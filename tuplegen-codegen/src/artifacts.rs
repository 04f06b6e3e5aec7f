//! Named artifact collection.

use std::collections::BTreeMap;

use crate::error::CodegenError;

/// Logical name of the forward-declarations artifact.
pub const FORWARD_DECLS: &str = "ForwardDecls";
/// Logical name of the implementation artifact.
pub const IMPL: &str = "Impl";

/// Returns the logical name of an early-definition artifact.
#[must_use]
pub fn early_name(type_name: &str) -> String {
    format!("Early/{type_name}")
}

/// Returns the logical name of a late-definition artifact.
#[must_use]
pub fn late_name(type_name: &str) -> String {
    format!("Late/{type_name}")
}

/// Mapping from logical artifact name to generated source text.
///
/// Iteration is ordered by name, so serializing the whole set is
/// deterministic. Inserting under a taken name is a fatal
/// internal-consistency error.
#[derive(Debug, Clone, Default)]
pub struct Artifacts {
    entries: BTreeMap<String, String>,
}

impl Artifacts {
    /// Creates an empty artifact set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an artifact.
    ///
    /// # Errors
    /// Returns `CodegenError::NameCollision` if the name is already taken.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), CodegenError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(CodegenError::collision(name));
        }
        self.entries.insert(name, text.into());
        Ok(())
    }

    /// Merges another artifact set into this one.
    ///
    /// # Errors
    /// Returns `CodegenError::NameCollision` on the first overlapping name.
    pub fn merge(&mut self, other: Artifacts) -> Result<(), CodegenError> {
        for (name, text) in other.entries {
            self.insert(name, text)?;
        }
        Ok(())
    }

    /// Returns the text of the named artifact.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Returns true if the named artifact exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates over `(name, text)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }

    /// Returns the number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the set, returning the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut artifacts = Artifacts::new();
        artifacts.insert(early_name("Node"), "text").unwrap();
        assert_eq!(artifacts.get("Early/Node"), Some("text"));
        assert_eq!(artifacts.len(), 1);
    }

    #[test]
    fn test_collision_is_fatal() {
        let mut artifacts = Artifacts::new();
        artifacts.insert("Early/Node", "a").unwrap();
        let result = artifacts.insert("Early/Node", "b");
        assert!(matches!(
            result,
            Err(CodegenError::NameCollision { artifact }) if artifact == "Early/Node"
        ));
    }

    #[test]
    fn test_merge_detects_collisions() {
        let mut left = Artifacts::new();
        left.insert("Impl", "a").unwrap();
        let mut right = Artifacts::new();
        right.insert("Impl", "b").unwrap();
        assert!(left.merge(right).is_err());
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let mut artifacts = Artifacts::new();
        artifacts.insert("Late/B", "").unwrap();
        artifacts.insert("Early/A", "").unwrap();
        artifacts.insert(FORWARD_DECLS, "").unwrap();
        let names: Vec<&str> = artifacts.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Early/A", "ForwardDecls", "Late/B"]);
    }
}
