//! Registry error types.

use modplan_targets::TargetError;

/// Errors that can occur while building or resolving a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two descriptors share a name.
    #[error("module '{name}' is registered more than once")]
    DuplicateModuleName { name: String },

    /// A dependency names neither a registered nor an engine module.
    #[error("module '{module}' depends on unknown module '{dependency}'")]
    UnresolvedDependency { module: String, dependency: String },

    /// The dependency graph contains a cycle.
    #[error("dependency cycle: {}", format_cycle(.cycle))]
    CyclicDependency { cycle: Vec<String> },

    /// A runtime module depends on an editor-only module.
    #[error("runtime module '{module}' cannot depend on editor module '{dependency}'")]
    EditorDependencyFromRuntime { module: String, dependency: String },

    /// A descriptor violates a construction invariant.
    #[error("invalid module '{module}': {detail}")]
    InvalidDescriptor { module: String, detail: String },

    /// Invalid declaration manifest.
    #[error("invalid manifest: {detail}")]
    InvalidManifest { detail: String },

    /// Platform or artifact error.
    #[error(transparent)]
    Target(#[from] TargetError),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_cycle(cycle: &[String]) -> String {
    match cycle.first() {
        Some(first) => format!("{} -> {first}", cycle.join(" -> ")),
        None => String::new(),
    }
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
