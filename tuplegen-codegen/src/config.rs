//! Generation configuration.

/// Configuration for a generation pass.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Wrap mutation-tracked containers in their tracking variants.
    pub emit_tracking: bool,
    /// Emit tracking diagnostics in generated definitions (only meaningful
    /// together with `emit_tracking`).
    pub emit_tracking_debug: bool,
    /// Prefix applied to user-header include references.
    pub user_include_path: String,
}

impl Config {
    /// Creates a configuration with the given user include path.
    ///
    /// The path is normalized to end with a `/` when non-empty, so it can be
    /// prepended to include references directly.
    #[must_use]
    pub fn with_user_include_path(mut self, path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.is_empty() && !path.ends_with('/') {
            path.push('/');
        }
        self.user_include_path = path;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_path_normalization() {
        let config = Config::default().with_user_include_path("lib/Model");
        assert_eq!(config.user_include_path, "lib/Model/");

        let config = Config::default().with_user_include_path("lib/Model/");
        assert_eq!(config.user_include_path, "lib/Model/");

        let config = Config::default().with_user_include_path("");
        assert_eq!(config.user_include_path, "");
    }

    #[test]
    fn test_default_is_plain() {
        let config = Config::default();
        assert!(!config.emit_tracking);
        assert!(!config.emit_tracking_debug);
        assert!(config.user_include_path.is_empty());
    }
}
