//! Build-plan emission.
//!
//! A [`BuildPlan`] is the fully resolved output for one platform: modules in
//! dependency order, each with absolute include directories, the module
//! names to link, and the static library to add to the link step.

use std::collections::HashMap;
use std::path::PathBuf;

use modplan_targets::TargetPlatform;
use serde::Serialize;

use crate::descriptor::{ModuleKind, PchUsage};
use crate::error::Result;
use crate::path::PathRoots;
use crate::registry::DescriptorRegistry;

/// Resolved build instructions for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePlan {
    /// Module name.
    pub name: String,
    /// Runtime or editor.
    pub kind: ModuleKind,
    /// Precompiled header policy.
    pub pch: PchUsage,
    /// Every include directory visible while compiling this module.
    pub include_dirs: Vec<PathBuf>,
    /// Include directories this module exposes to dependents.
    pub public_include_dirs: Vec<PathBuf>,
    /// Module names to link against, registered and external.
    pub link_modules: Vec<String>,
    /// Modules loaded at runtime.
    pub dynamically_loaded: Vec<String>,
    /// Prebuilt SDK library to link, if the module links one.
    pub static_library: Option<PathBuf>,
}

/// Ordered build plan for a plugin on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    /// Plugin name.
    pub plugin: String,
    /// Target platform.
    pub platform: TargetPlatform,
    /// Modules, dependencies first.
    pub modules: Vec<ModulePlan>,
}

impl BuildPlan {
    /// Look up a module plan by name.
    pub fn module(&self, name: &str) -> Option<&ModulePlan> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Serialize to pretty JSON for the host orchestrator.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Resolve `registry` into a build plan for `platform`.
///
/// Fails without producing a partial plan if any module reference is
/// unresolved, the graph is cyclic, a private include directory is also
/// public, or a module that links an SDK has no artifact for `platform`.
pub fn build_plan(
    plugin: &str,
    registry: &DescriptorRegistry,
    roots: &PathRoots,
    platform: TargetPlatform,
) -> Result<BuildPlan> {
    let order = registry.resolve_dependency_graph()?;

    // Include dirs each module re-exports: its own public dirs plus those of
    // its public dependencies, transitively. Filled in dependency order.
    let mut exported: HashMap<&str, Vec<PathBuf>> = HashMap::new();
    let mut modules = Vec::with_capacity(order.len());

    for descriptor in order {
        descriptor.check_include_overlap(roots)?;
        let public = descriptor.to_public_contract(roots);
        let private = descriptor.to_private_contract(roots);

        let mut reexported = public.include_paths.clone();
        for dep in &public.exported_dependencies {
            if let Some(dirs) = exported.get(dep.as_str()) {
                extend_unique(&mut reexported, dirs);
            }
        }

        let mut include_dirs = private.include_paths;
        for dep in &private.all_dependencies {
            if let Some(dirs) = exported.get(dep.as_str()) {
                extend_unique(&mut include_dirs, dirs);
            }
        }

        let static_library = match descriptor.sdk() {
            Some(_) => Some(descriptor.resolve_artifact(platform, roots)?),
            None => None,
        };

        exported.insert(descriptor.name(), reexported);
        modules.push(ModulePlan {
            name: descriptor.name().to_string(),
            kind: descriptor.kind(),
            pch: descriptor.pch(),
            include_dirs,
            public_include_dirs: public.include_paths,
            link_modules: private.all_dependencies,
            dynamically_loaded: descriptor.dynamically_loaded().to_vec(),
            static_library,
        });
    }

    log::debug!(
        "build plan for '{plugin}' on {platform}: {} modules",
        modules.len()
    );
    Ok(BuildPlan {
        plugin: plugin.to_string(),
        platform,
        modules,
    })
}

fn extend_unique(target: &mut Vec<PathBuf>, items: &[PathBuf]) {
    for item in items {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ModuleDescriptor;
    use crate::error::RegistryError;
    use crate::path::PathSpec;
    use modplan_targets::TargetError;

    fn registry() -> DescriptorRegistry {
        let mut registry = DescriptorRegistry::new();
        registry
            .register(
                ModuleDescriptor::builder("Editor")
                    .kind(ModuleKind::Editor)
                    .public_dependencies(["Core", "Runtime"])
                    .private_dependency("Slate")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                ModuleDescriptor::builder("Runtime")
                    .public_include(PathSpec::module("Public/StdbGenerated"))
                    .public_include(PathSpec::sdk("include"))
                    .private_include(PathSpec::module("Private/StdbGenerated"))
                    .public_dependency("Core")
                    .private_dependencies(["CoreUObject", "Engine"])
                    .artifact(TargetPlatform::Linux, "libsdk.a")
                    .artifact(TargetPlatform::Win64, "sdk.lib")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn plan_orders_and_resolves() {
        let roots = PathRoots::new("/p");
        let plan = build_plan("Plug", &registry(), &roots, TargetPlatform::Linux).unwrap();

        let names: Vec<_> = plan.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Runtime", "Editor"]);

        let runtime = plan.module("Runtime").unwrap();
        assert_eq!(
            runtime.static_library,
            Some(PathBuf::from("/p/Source/SpacetimeSDK/lib/libsdk.a"))
        );
        assert_eq!(runtime.include_dirs.len(), 3);
        assert_eq!(runtime.public_include_dirs.len(), 2);
        assert_eq!(runtime.link_modules, vec!["Core", "CoreUObject", "Engine"]);
    }

    #[test]
    fn dependents_see_public_but_not_private_includes() {
        let roots = PathRoots::new("/p");
        let plan = build_plan("Plug", &registry(), &roots, TargetPlatform::Win64).unwrap();
        let editor = plan.module("Editor").unwrap();

        assert!(editor
            .include_dirs
            .contains(&PathBuf::from("/p/Source/Runtime/Public/StdbGenerated")));
        assert!(editor
            .include_dirs
            .contains(&PathBuf::from("/p/Source/SpacetimeSDK/include")));
        assert!(!editor
            .include_dirs
            .contains(&PathBuf::from("/p/Source/Runtime/Private/StdbGenerated")));
        assert!(editor.static_library.is_none());
    }

    #[test]
    fn public_dependency_includes_propagate_transitively() {
        let mut registry = DescriptorRegistry::without_engine_modules();
        for (name, public_dep) in [("Base", None), ("Mid", Some("Base")), ("Top", Some("Mid"))] {
            let mut b = ModuleDescriptor::builder(name).public_include(PathSpec::module("Public"));
            if let Some(dep) = public_dep {
                b = b.public_dependency(dep);
            }
            registry.register(b.build().unwrap()).unwrap();
        }
        registry
            .register(
                ModuleDescriptor::builder("Leaf")
                    .private_dependency("Top")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let plan = build_plan("P", &registry, &PathRoots::new("/r"), TargetPlatform::Mac).unwrap();
        let leaf = plan.module("Leaf").unwrap();
        assert_eq!(
            leaf.include_dirs,
            vec![
                PathBuf::from("/r/Source/Top/Public"),
                PathBuf::from("/r/Source/Mid/Public"),
                PathBuf::from("/r/Source/Base/Public"),
            ]
        );
    }

    #[test]
    fn private_dependency_includes_do_not_propagate() {
        let mut registry = DescriptorRegistry::without_engine_modules();
        registry
            .register(
                ModuleDescriptor::builder("Hidden")
                    .public_include(PathSpec::module("Public"))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                ModuleDescriptor::builder("Wrapper")
                    .private_dependency("Hidden")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                ModuleDescriptor::builder("User")
                    .private_dependency("Wrapper")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let plan = build_plan("P", &registry, &PathRoots::new("/r"), TargetPlatform::Linux).unwrap();
        assert!(plan.module("User").unwrap().include_dirs.is_empty());
        assert_eq!(plan.module("Wrapper").unwrap().include_dirs.len(), 1);
    }

    #[test]
    fn unsupported_platform_fails_whole_plan() {
        let roots = PathRoots::new("/p");
        let err = build_plan("Plug", &registry(), &roots, TargetPlatform::Mac).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Target(TargetError::UnsupportedPlatform {
                platform: TargetPlatform::Mac,
                ..
            })
        ));
    }

    #[test]
    fn cycle_produces_no_plan() {
        let mut registry = DescriptorRegistry::new();
        for (name, dep) in [("A", "B"), ("B", "A")] {
            registry
                .register(ModuleDescriptor::builder(name).private_dependency(dep).build().unwrap())
                .unwrap();
        }
        let result = build_plan("P", &registry, &PathRoots::new("/r"), TargetPlatform::Linux);
        assert!(matches!(result, Err(RegistryError::CyclicDependency { .. })));
    }

    #[test]
    fn json_output_shape() {
        let roots = PathRoots::new("/p");
        let plan = build_plan("Plug", &registry(), &roots, TargetPlatform::Linux).unwrap();
        let json: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();
        assert_eq!(json["plugin"], "Plug");
        assert_eq!(json["platform"], "Linux");
        assert_eq!(json["modules"][0]["name"], "Runtime");
        assert_eq!(json["modules"][0]["kind"], "runtime");
        assert_eq!(json["modules"][0]["pch"], "explicit-or-shared");
        assert_eq!(json["modules"][1]["static_library"], serde_json::Value::Null);
    }
}
