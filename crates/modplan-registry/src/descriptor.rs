//! Module descriptors.
//!
//! A [`ModuleDescriptor`] is the declarative build record for one plugin
//! module. It is built once through [`ModuleDescriptorBuilder`] and never
//! mutated afterwards. Consumers see it through two views:
//! - [`PublicContract`]: what a dependent module inherits
//! - [`PrivateContract`]: what the orchestrator needs to build the module itself
//!
//! Private include paths never appear in the public contract.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use modplan_targets::{ArtifactTable, TargetError, TargetPlatform};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::path::{PathRoots, PathSpec};

/// Which build configurations a module belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// Shipped in every build.
    #[default]
    Runtime,
    /// Editor builds only.
    Editor,
}

/// Precompiled header policy passed through to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PchUsage {
    /// Use an explicit PCH if declared, otherwise a shared one.
    #[default]
    ExplicitOrShared,
    /// Always use a shared PCH.
    Shared,
    /// No precompiled headers.
    NoPch,
}

impl ModuleKind {
    /// Identifier as written in manifests and plans.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Editor => "editor",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PchUsage {
    /// Identifier as written in manifests and plans.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExplicitOrShared => "explicit-or-shared",
            Self::Shared => "shared",
            Self::NoPch => "no-pch",
        }
    }
}

impl fmt::Display for PchUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link to a prebuilt SDK: where its libraries live and which file to link
/// per platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLink {
    /// Directory containing the static libraries.
    pub library_dir: PathSpec,
    /// Platform → library file name.
    pub artifacts: ArtifactTable,
}

/// View of a module exposed to modules that depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicContract {
    /// Public include directories.
    pub include_paths: Vec<PathBuf>,
    /// Public dependencies re-exported to dependents.
    pub exported_dependencies: Vec<String>,
}

/// View of a module used to build the module itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivateContract {
    /// Public then private include directories.
    pub include_paths: Vec<PathBuf>,
    /// Public then private dependencies.
    pub all_dependencies: Vec<String>,
    /// Absolute library path for every platform with a registered artifact.
    pub linked_artifacts: BTreeMap<TargetPlatform, PathBuf>,
}

/// The build record for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    name: String,
    kind: ModuleKind,
    pch: PchUsage,
    public_include_paths: Vec<PathSpec>,
    private_include_paths: Vec<PathSpec>,
    public_dependencies: Vec<String>,
    private_dependencies: Vec<String>,
    dynamically_loaded: Vec<String>,
    sdk: Option<SdkLink>,
}

impl ModuleDescriptor {
    /// Start building a descriptor for `name`.
    pub fn builder(name: impl Into<String>) -> ModuleDescriptorBuilder {
        ModuleDescriptorBuilder::new(name)
    }

    /// Unique module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runtime or editor.
    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    /// Precompiled header policy.
    pub fn pch(&self) -> PchUsage {
        self.pch
    }

    /// Include specs exposed to dependents.
    pub fn public_include_paths(&self) -> &[PathSpec] {
        &self.public_include_paths
    }

    /// Include specs used only to build this module.
    pub fn private_include_paths(&self) -> &[PathSpec] {
        &self.private_include_paths
    }

    /// Dependencies re-exported to dependents.
    pub fn public_dependencies(&self) -> &[String] {
        &self.public_dependencies
    }

    /// Dependencies used only by this module.
    pub fn private_dependencies(&self) -> &[String] {
        &self.private_dependencies
    }

    /// Modules loaded at runtime rather than linked.
    pub fn dynamically_loaded(&self) -> &[String] {
        &self.dynamically_loaded
    }

    /// The prebuilt SDK this module links, if any.
    pub fn sdk(&self) -> Option<&SdkLink> {
        self.sdk.as_ref()
    }

    /// Public then private dependency names. Each name appears once.
    pub fn all_dependencies(&self) -> impl Iterator<Item = &str> {
        self.public_dependencies
            .iter()
            .chain(&self.private_dependencies)
            .map(String::as_str)
    }

    /// Absolute path of the static library to link on `platform`.
    ///
    /// A module without an SDK link, or without an entry for `platform`,
    /// yields [`TargetError::UnsupportedPlatform`].
    pub fn resolve_artifact(
        &self,
        platform: TargetPlatform,
        roots: &PathRoots,
    ) -> std::result::Result<PathBuf, TargetError> {
        let Some(sdk) = &self.sdk else {
            return Err(TargetError::UnsupportedPlatform {
                module: self.name.clone(),
                platform,
            });
        };
        let file_name = sdk.artifacts.resolve(platform)?;
        let path = sdk.library_dir.resolve(roots, &self.name).join(file_name);
        log::debug!("module '{}': {platform} links {}", self.name, path.display());
        Ok(path)
    }

    /// The view a dependent module inherits.
    pub fn to_public_contract(&self, roots: &PathRoots) -> PublicContract {
        PublicContract {
            include_paths: self.compose_all(&self.public_include_paths, roots),
            exported_dependencies: self.public_dependencies.clone(),
        }
    }

    /// The view used to build this module.
    pub fn to_private_contract(&self, roots: &PathRoots) -> PrivateContract {
        let mut include_paths = self.compose_all(&self.public_include_paths, roots);
        for path in self.compose_all(&self.private_include_paths, roots) {
            push_unique(&mut include_paths, path);
        }

        let linked_artifacts = match &self.sdk {
            Some(sdk) => sdk
                .artifacts
                .platforms()
                .filter_map(|p| self.resolve_artifact(p, roots).ok().map(|path| (p, path)))
                .collect(),
            None => BTreeMap::new(),
        };

        PrivateContract {
            include_paths,
            all_dependencies: self.all_dependencies().map(str::to_string).collect(),
            linked_artifacts,
        }
    }

    /// Fail if a private include directory composes to the same path as a
    /// public one.
    ///
    /// Specs on different anchors can name one directory (`Public` and
    /// `$plugin/Source/<Module>/Public`), which only shows once composed.
    pub fn check_include_overlap(&self, roots: &PathRoots) -> Result<()> {
        let public = self.compose_all(&self.public_include_paths, roots);
        for (spec, path) in self
            .private_include_paths
            .iter()
            .zip(self.compose_all(&self.private_include_paths, roots))
        {
            if public.contains(&path) {
                return Err(RegistryError::InvalidDescriptor {
                    module: self.name.clone(),
                    detail: format!(
                        "private include '{spec}' is the public include directory {}",
                        path.display()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Composed paths in declaration order, each once.
    fn compose_all(&self, specs: &[PathSpec], roots: &PathRoots) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(specs.len());
        for spec in specs {
            push_unique(&mut paths, spec.resolve(roots, &self.name));
        }
        paths
    }
}

/// Builder for [`ModuleDescriptor`].
///
/// Setters never fail; the first problem is recorded and reported by
/// [`build`](Self::build).
#[derive(Debug)]
pub struct ModuleDescriptorBuilder {
    name: String,
    kind: ModuleKind,
    pch: PchUsage,
    public_include_paths: Vec<PathSpec>,
    private_include_paths: Vec<PathSpec>,
    public_dependencies: Vec<String>,
    private_dependencies: Vec<String>,
    dynamically_loaded: Vec<String>,
    library_dir: Option<PathSpec>,
    artifacts: ArtifactTable,
    error: Option<RegistryError>,
}

impl ModuleDescriptorBuilder {
    /// SDK library directory used when artifacts are declared without one.
    pub const DEFAULT_LIBRARY_DIR: &'static str = "lib";

    fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            artifacts: ArtifactTable::new(name.clone()),
            name,
            kind: ModuleKind::default(),
            pch: PchUsage::default(),
            public_include_paths: Vec::new(),
            private_include_paths: Vec::new(),
            public_dependencies: Vec::new(),
            private_dependencies: Vec::new(),
            dynamically_loaded: Vec::new(),
            library_dir: None,
            error: None,
        }
    }

    /// Set the module kind (default runtime).
    pub fn kind(mut self, kind: ModuleKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the precompiled header policy.
    pub fn pch(mut self, pch: PchUsage) -> Self {
        self.pch = pch;
        self
    }

    /// Add a public include spec; repeats are ignored.
    pub fn public_include(mut self, spec: PathSpec) -> Self {
        push_unique(&mut self.public_include_paths, spec);
        self
    }

    /// Add a private include spec; repeats are ignored.
    pub fn private_include(mut self, spec: PathSpec) -> Self {
        push_unique(&mut self.private_include_paths, spec);
        self
    }

    /// Add a public dependency.
    pub fn public_dependency(mut self, name: impl Into<String>) -> Self {
        push_unique(&mut self.public_dependencies, name.into());
        self
    }

    pub fn public_dependencies<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(self, |b, name| b.public_dependency(name))
    }

    /// Add a private dependency.
    pub fn private_dependency(mut self, name: impl Into<String>) -> Self {
        push_unique(&mut self.private_dependencies, name.into());
        self
    }

    pub fn private_dependencies<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(self, |b, name| b.private_dependency(name))
    }

    /// Add a module loaded at runtime.
    pub fn dynamically_loaded(mut self, name: impl Into<String>) -> Self {
        push_unique(&mut self.dynamically_loaded, name.into());
        self
    }

    /// Directory holding the SDK's static libraries.
    pub fn sdk_library_dir(mut self, spec: PathSpec) -> Self {
        self.library_dir = Some(spec);
        self
    }

    /// Register the SDK library file to link on `platform`.
    pub fn artifact(mut self, platform: TargetPlatform, file_name: impl Into<String>) -> Self {
        if let Err(e) = self.artifacts.register(platform, file_name) {
            self.error.get_or_insert(e.into());
        }
        self
    }

    /// Finish the descriptor, checking construction invariants.
    pub fn build(self) -> Result<ModuleDescriptor> {
        if let Some(err) = self.error {
            return Err(err);
        }

        if self.name.trim().is_empty() {
            return Err(RegistryError::InvalidDescriptor {
                module: self.name,
                detail: "module name is empty".to_string(),
            });
        }

        if let Some(shared) = self
            .private_include_paths
            .iter()
            .find(|p| self.public_include_paths.contains(p))
        {
            return Err(RegistryError::InvalidDescriptor {
                module: self.name.clone(),
                detail: format!("include path '{shared}' is declared both public and private"),
            });
        }

        let sdk = match (self.library_dir, self.artifacts.is_empty()) {
            (None, true) => None,
            (Some(dir), true) => {
                return Err(RegistryError::InvalidDescriptor {
                    module: self.name,
                    detail: format!("SDK library directory '{dir}' declared without artifacts"),
                });
            }
            (dir, false) => Some(SdkLink {
                library_dir: dir.unwrap_or_else(|| PathSpec::sdk(Self::DEFAULT_LIBRARY_DIR)),
                artifacts: self.artifacts,
            }),
        };

        // A dependency declared public is already visible privately.
        let public_dependencies = self.public_dependencies;
        let private_dependencies = self
            .private_dependencies
            .into_iter()
            .filter(|d| !public_dependencies.contains(d))
            .collect();

        Ok(ModuleDescriptor {
            name: self.name,
            kind: self.kind,
            pch: self.pch,
            public_include_paths: self.public_include_paths,
            private_include_paths: self.private_include_paths,
            public_dependencies,
            private_dependencies,
            dynamically_loaded: self.dynamically_loaded,
            sdk,
        })
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots() -> PathRoots {
        PathRoots::new("/plug")
    }

    fn runtime() -> ModuleDescriptor {
        ModuleDescriptor::builder("Runtime")
            .public_include(PathSpec::module("Public/StdbGenerated"))
            .public_include(PathSpec::sdk("include"))
            .private_include(PathSpec::module("Private/StdbGenerated"))
            .public_dependency("Core")
            .private_dependencies(["CoreUObject", "Engine", "Json"])
            .artifact(TargetPlatform::Linux, "libsdk.a")
            .artifact(TargetPlatform::Win64, "sdk.lib")
            .build()
            .unwrap()
    }

    #[test]
    fn public_contract_hides_private_includes() {
        let contract = runtime().to_public_contract(&roots());
        assert_eq!(
            contract.include_paths,
            vec![
                PathBuf::from("/plug/Source/Runtime/Public/StdbGenerated"),
                PathBuf::from("/plug/Source/SpacetimeSDK/include"),
            ]
        );
        assert!(!contract
            .include_paths
            .iter()
            .any(|p| p.starts_with("/plug/Source/Runtime/Private")));
        assert_eq!(contract.exported_dependencies, vec!["Core"]);
    }

    #[test]
    fn private_contract_has_everything() {
        let contract = runtime().to_private_contract(&roots());
        assert_eq!(contract.include_paths.len(), 3);
        assert_eq!(
            contract.include_paths[2],
            PathBuf::from("/plug/Source/Runtime/Private/StdbGenerated")
        );
        assert_eq!(
            contract.all_dependencies,
            vec!["Core", "CoreUObject", "Engine", "Json"]
        );
        assert_eq!(contract.linked_artifacts.len(), 2);
        assert_eq!(
            contract.linked_artifacts[&TargetPlatform::Linux],
            PathBuf::from("/plug/Source/SpacetimeSDK/lib/libsdk.a")
        );
    }

    #[test]
    fn resolve_artifact_for_platform() {
        let path = runtime()
            .resolve_artifact(TargetPlatform::Win64, &roots())
            .unwrap();
        assert_eq!(path, PathBuf::from("/plug/Source/SpacetimeSDK/lib/sdk.lib"));
    }

    #[test]
    fn resolve_artifact_missing_platform_is_explicit() {
        let err = runtime()
            .resolve_artifact(TargetPlatform::Mac, &roots())
            .unwrap_err();
        assert!(matches!(
            err,
            TargetError::UnsupportedPlatform {
                platform: TargetPlatform::Mac,
                ..
            }
        ));
    }

    #[test]
    fn resolve_artifact_without_sdk_is_explicit() {
        let editor = ModuleDescriptor::builder("Editor").build().unwrap();
        assert!(editor.sdk().is_none());
        assert!(editor
            .resolve_artifact(TargetPlatform::Linux, &roots())
            .is_err());
        assert!(editor.to_private_contract(&roots()).linked_artifacts.is_empty());
    }

    #[test]
    fn custom_library_dir() {
        let m = ModuleDescriptor::builder("M")
            .sdk_library_dir(PathSpec::sdk("lib/x64"))
            .artifact(TargetPlatform::Linux, "libm.a")
            .build()
            .unwrap();
        assert_eq!(
            m.resolve_artifact(TargetPlatform::Linux, &roots()).unwrap(),
            PathBuf::from("/plug/Source/SpacetimeSDK/lib/x64/libm.a")
        );
    }

    #[test]
    fn duplicate_artifact_fails_build() {
        let err = ModuleDescriptor::builder("M")
            .artifact(TargetPlatform::Mac, "liba.a")
            .artifact(TargetPlatform::Mac, "libb.a")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Target(TargetError::DuplicateArtifactRegistration {
                platform: TargetPlatform::Mac,
                ..
            })
        ));
    }

    #[test]
    fn duplicate_include_kept_once() {
        let m = ModuleDescriptor::builder("M")
            .public_include(PathSpec::module("Public/StdbGenerated"))
            .public_include(PathSpec::module("Public/StdbGenerated"))
            .build()
            .unwrap();
        assert_eq!(m.public_include_paths().len(), 1);
    }

    #[test]
    fn differently_spelled_includes_kept_once() {
        let m = ModuleDescriptor::builder("M")
            .public_include(PathSpec::module("Public/StdbGenerated"))
            .public_include(PathSpec::module("Public\\StdbGenerated"))
            .public_include(PathSpec::module("./Public/StdbGenerated"))
            .build()
            .unwrap();
        assert_eq!(m.public_include_paths().len(), 1);
        assert_eq!(m.to_public_contract(&roots()).include_paths.len(), 1);
    }

    #[test]
    fn includes_on_different_anchors_compose_once() {
        let m = ModuleDescriptor::builder("M")
            .public_include(PathSpec::module("Public"))
            .public_include(PathSpec::plugin("Source/M/Public"))
            .build()
            .unwrap();
        assert_eq!(
            m.to_public_contract(&roots()).include_paths,
            vec![PathBuf::from("/plug/Source/M/Public")]
        );
    }

    #[test]
    fn private_alias_of_public_include_rejected() {
        let m = ModuleDescriptor::builder("R")
            .public_include(PathSpec::module("Public/StdbGenerated"))
            .private_include(PathSpec::plugin("Source/R/Public/StdbGenerated"))
            .build()
            .unwrap();
        let err = m.check_include_overlap(&roots()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDescriptor { ref module, .. } if module == "R"));
        assert_eq!(m.to_private_contract(&roots()).include_paths.len(), 1);

        assert!(runtime().check_include_overlap(&roots()).is_ok());
    }

    #[test]
    fn include_spelled_differently_public_and_private_rejected() {
        let err = ModuleDescriptor::builder("M")
            .public_include(PathSpec::module("Shared"))
            .private_include(PathSpec::module("./Shared/"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDescriptor { .. }));
    }

    #[test]
    fn blank_artifact_name_fails_build() {
        let err = ModuleDescriptor::builder("M")
            .artifact(TargetPlatform::Linux, "")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Target(TargetError::EmptyArtifactName {
                platform: TargetPlatform::Linux,
                ..
            })
        ));
    }

    #[test]
    fn include_both_public_and_private_rejected() {
        let err = ModuleDescriptor::builder("M")
            .public_include(PathSpec::module("Shared"))
            .private_include(PathSpec::module("Shared"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDescriptor { .. }));
        assert!(err.to_string().contains("both public and private"));
    }

    #[test]
    fn library_dir_without_artifacts_rejected() {
        let err = ModuleDescriptor::builder("M")
            .sdk_library_dir(PathSpec::sdk("lib"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDescriptor { .. }));
    }

    #[test]
    fn empty_name_rejected() {
        assert!(ModuleDescriptor::builder("  ").build().is_err());
    }

    #[test]
    fn public_dependency_not_repeated_privately() {
        let m = ModuleDescriptor::builder("M")
            .public_dependency("Core")
            .private_dependencies(["Core", "Engine"])
            .build()
            .unwrap();
        assert_eq!(m.private_dependencies().to_vec(), vec!["Engine".to_string()]);
        assert_eq!(m.all_dependencies().collect::<Vec<_>>(), vec!["Core", "Engine"]);
    }

    #[test]
    fn display_matches_manifest_spelling() {
        for kind in [ModuleKind::Runtime, ModuleKind::Editor] {
            let parsed: ModuleKind = serde_json::from_value(kind.to_string().into()).unwrap();
            assert_eq!(parsed, kind);
        }
        for pch in [PchUsage::ExplicitOrShared, PchUsage::Shared, PchUsage::NoPch] {
            let parsed: PchUsage = serde_json::from_value(pch.to_string().into()).unwrap();
            assert_eq!(parsed, pch);
        }
        assert_eq!(PchUsage::NoPch.as_str(), "no-pch");
    }

    #[test]
    fn defaults() {
        let m = ModuleDescriptor::builder("M").build().unwrap();
        assert_eq!(m.kind(), ModuleKind::Runtime);
        assert_eq!(m.pch(), PchUsage::ExplicitOrShared);
    }
}
