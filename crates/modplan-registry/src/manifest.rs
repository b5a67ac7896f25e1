//! `modplan.toml` declaration manifest.
//!
//! The manifest holds the static module declarations for one plugin. It is
//! parsed once per invocation and turned into a [`DescriptorRegistry`] plus
//! the [`PathRoots`] its path specs are composed against.

use std::collections::BTreeMap;
use std::path::Path;

use modplan_targets::TargetPlatform;
use serde::{Deserialize, Serialize};

use crate::descriptor::{ModuleDescriptor, ModuleKind, PchUsage};
use crate::error::{RegistryError, Result};
use crate::path::{PathAnchor, PathRoots, PathSpec};
use crate::registry::DescriptorRegistry;

/// File name searched for by the CLI.
pub const MANIFEST_FILE: &str = "modplan.toml";

/// A complete plugin declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Plugin metadata (required).
    pub plugin: PluginConfig,
    /// Additional host-engine modules.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Module declarations, in declaration order.
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleDecl>,
}

/// Plugin-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginConfig {
    /// Plugin name.
    pub name: String,
    /// SDK root, relative to the plugin directory.
    #[serde(default = "default_sdk_root")]
    pub sdk_root: String,
    /// Name of generated-code include directories.
    #[serde(default = "default_generated_dir")]
    pub generated_dir: String,
    /// Directory holding module sources, relative to the plugin directory.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
}

fn default_sdk_root() -> String {
    PathRoots::DEFAULT_SDK_ROOT.to_string()
}

fn default_generated_dir() -> String {
    "StdbGenerated".to_string()
}

fn default_source_dir() -> String {
    PathRoots::DEFAULT_SOURCE_DIR.to_string()
}

/// `[engine]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Extra external module names, beyond the built-in set.
    #[serde(default)]
    pub modules: Vec<String>,
}

/// One `[[module]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleDecl {
    pub name: String,
    #[serde(default)]
    pub kind: ModuleKind,
    #[serde(default)]
    pub pch: PchUsage,
    #[serde(default)]
    pub public_include: Vec<String>,
    #[serde(default)]
    pub private_include: Vec<String>,
    #[serde(default)]
    pub public_dependencies: Vec<String>,
    #[serde(default)]
    pub private_dependencies: Vec<String>,
    #[serde(default)]
    pub dynamically_loaded: Vec<String>,
    #[serde(default)]
    pub sdk: Option<SdkDecl>,
}

/// `[module.sdk]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SdkDecl {
    /// Library directory, relative to the SDK root unless anchored.
    #[serde(default)]
    pub library_dir: Option<String>,
    /// Platform identifier → static library file name.
    #[serde(default)]
    pub artifacts: BTreeMap<String, String>,
}

impl PluginManifest {
    /// Parse a manifest from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let manifest: PluginManifest = toml::from_str(input)?;

        if manifest.plugin.name.trim().is_empty() {
            return Err(RegistryError::InvalidManifest {
                detail: "plugin.name is required".to_string(),
            });
        }

        if let Some(i) = manifest.modules.iter().position(|m| m.name.trim().is_empty()) {
            return Err(RegistryError::InvalidManifest {
                detail: format!("module #{} has an empty name", i + 1),
            });
        }

        Ok(manifest)
    }

    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Serialize this manifest to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RegistryError::InvalidManifest {
            detail: format!("failed to serialize: {e}"),
        })
    }

    /// Roots for a plugin checked out at `plugin_dir`.
    pub fn roots(&self, plugin_dir: &Path) -> PathRoots {
        PathRoots::new(plugin_dir)
            .with_source_dir(self.plugin.source_dir.clone())
            .with_sdk_root(self.plugin.sdk_root.clone())
    }

    /// Build and populate a registry from the declarations.
    pub fn to_registry(&self) -> Result<DescriptorRegistry> {
        let mut registry = DescriptorRegistry::new();
        for name in &self.engine.modules {
            registry.add_external(name.clone());
        }
        for decl in &self.modules {
            registry.register(self.descriptor(decl)?)?;
        }
        Ok(registry)
    }

    fn descriptor(&self, decl: &ModuleDecl) -> Result<ModuleDescriptor> {
        let generated = self.plugin.generated_dir.as_str();
        let mut builder = ModuleDescriptor::builder(decl.name.clone())
            .kind(decl.kind)
            .pch(decl.pch)
            .public_dependencies(decl.public_dependencies.iter().cloned())
            .private_dependencies(decl.private_dependencies.iter().cloned());

        for spec in &decl.public_include {
            builder = builder.public_include(PathSpec::parse(spec, generated));
        }
        for spec in &decl.private_include {
            builder = builder.private_include(PathSpec::parse(spec, generated));
        }
        for name in &decl.dynamically_loaded {
            builder = builder.dynamically_loaded(name.clone());
        }

        if let Some(sdk) = &decl.sdk {
            if let Some(dir) = &sdk.library_dir {
                builder = builder.sdk_library_dir(sdk_relative(dir, generated));
            }
            for (platform, file_name) in &sdk.artifacts {
                let platform: TargetPlatform = platform.parse()?;
                builder = builder.artifact(platform, file_name.clone());
            }
        }

        builder.build()
    }

    /// The canonical two-module declaration for a new plugin.
    pub fn template(name: &str) -> String {
        format!(
            r#"[plugin]
name = "{name}"
sdk-root = "Source/SpacetimeSDK"
generated-dir = "StdbGenerated"

[[module]]
name = "{name}Runtime"
kind = "runtime"
public-include = ["Public/{{generated}}", "$sdk/include"]
private-include = ["Private/{{generated}}"]
public-dependencies = ["Core"]
private-dependencies = ["CoreUObject", "Engine", "Json", "JsonUtilities"]

[module.sdk]
library-dir = "lib"

[module.sdk.artifacts]
Linux = "libspacetimedb_sdk.a"
Mac = "libspacetimedb_sdk.a"
Win64 = "spacetimedb_sdk.lib"

[[module]]
name = "{name}Editor"
kind = "editor"
public-dependencies = ["Core", "CoreUObject", "Engine", "UnrealEd", "Json", "JsonUtilities", "{name}Runtime", "Blutility"]
private-dependencies = ["Slate", "SlateCore", "EditorStyle", "LevelEditor", "ToolMenus", "PropertyEditor", "Projects"]
"#
        )
    }
}

/// Library dirs default to the SDK anchor; `$plugin/` still overrides it.
fn sdk_relative(spec: &str, generated: &str) -> PathSpec {
    let parsed = PathSpec::parse(spec, generated);
    match parsed.anchor() {
        PathAnchor::Module => PathSpec::sdk(parsed.relative()),
        _ => parsed,
    }
}
