//! Descriptor registry and dependency ordering.
//!
//! Holds every module of one plugin. Once populated it is only read:
//! [`DescriptorRegistry::resolve_dependency_graph`] checks every reference
//! and returns modules ordered so dependencies precede dependents.

use std::collections::{BTreeSet, HashMap};

use crate::descriptor::{ModuleDescriptor, ModuleKind};
use crate::error::{RegistryError, Result};

/// Host-engine modules that may be depended on without being registered.
pub const ENGINE_MODULES: &[&str] = &[
    "Core",
    "CoreUObject",
    "Engine",
    "InputCore",
    "Json",
    "JsonUtilities",
    "HTTP",
    "WebSockets",
    "Networking",
    "Sockets",
    "Projects",
    "Slate",
    "SlateCore",
    "EditorStyle",
    "LevelEditor",
    "ToolMenus",
    "PropertyEditor",
    "UnrealEd",
    "Blutility",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// All module descriptors for one build invocation.
#[derive(Debug, Clone)]
pub struct DescriptorRegistry {
    modules: Vec<ModuleDescriptor>,
    index: HashMap<String, usize>,
    external: BTreeSet<String>,
}

impl Default for DescriptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorRegistry {
    /// An empty registry that recognises [`ENGINE_MODULES`] as external.
    pub fn new() -> Self {
        let mut registry = Self::without_engine_modules();
        registry.external = ENGINE_MODULES.iter().map(|m| m.to_string()).collect();
        registry
    }

    /// An empty registry with no external modules.
    pub fn without_engine_modules() -> Self {
        Self {
            modules: Vec::new(),
            index: HashMap::new(),
            external: BTreeSet::new(),
        }
    }

    /// Recognise `name` as an externally provided module.
    pub fn add_external(&mut self, name: impl Into<String>) {
        self.external.insert(name.into());
    }

    /// Whether `name` is a recognised external module.
    pub fn is_external(&self, name: &str) -> bool {
        self.external.contains(name)
    }

    /// Add a descriptor. Names must be unique.
    pub fn register(&mut self, descriptor: ModuleDescriptor) -> Result<()> {
        if self.index.contains_key(descriptor.name()) {
            return Err(RegistryError::DuplicateModuleName {
                name: descriptor.name().to_string(),
            });
        }
        log::debug!(
            "registered module '{}' ({:?})",
            descriptor.name(),
            descriptor.kind()
        );
        self.index
            .insert(descriptor.name().to_string(), self.modules.len());
        self.modules.push(descriptor);
        Ok(())
    }

    /// Look up a registered module by name.
    pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.index.get(name).map(|&i| &self.modules[i])
    }

    /// Registered modules in declaration order.
    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Order every registered module so its dependencies come first.
    ///
    /// Depth-first over public and private dependency edges, visiting
    /// modules and their dependencies in declaration order, so the output
    /// is the same on every run. External modules are checked but not
    /// returned. Stops at the first error.
    pub fn resolve_dependency_graph(&self) -> Result<Vec<&ModuleDescriptor>> {
        let mut marks = vec![Mark::Unvisited; self.modules.len()];
        let mut stack = Vec::new();
        let mut order = Vec::with_capacity(self.modules.len());

        for i in 0..self.modules.len() {
            self.visit(i, &mut marks, &mut stack, &mut order)?;
        }

        log::debug!(
            "resolution order: {}",
            order
                .iter()
                .map(|&i| self.modules[i].name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(order.into_iter().map(|i| &self.modules[i]).collect())
    }

    fn visit(
        &self,
        i: usize,
        marks: &mut [Mark],
        stack: &mut Vec<usize>,
        order: &mut Vec<usize>,
    ) -> Result<()> {
        match marks[i] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                let start = stack.iter().position(|&s| s == i).unwrap_or(0);
                return Err(RegistryError::CyclicDependency {
                    cycle: stack[start..]
                        .iter()
                        .map(|&s| self.modules[s].name().to_string())
                        .collect(),
                });
            }
            Mark::Unvisited => {}
        }

        marks[i] = Mark::InProgress;
        stack.push(i);

        let module = &self.modules[i];
        for dep in module.all_dependencies() {
            match self.index.get(dep) {
                Some(&j) => {
                    if module.kind() == ModuleKind::Runtime
                        && self.modules[j].kind() == ModuleKind::Editor
                    {
                        return Err(RegistryError::EditorDependencyFromRuntime {
                            module: module.name().to_string(),
                            dependency: dep.to_string(),
                        });
                    }
                    self.visit(j, marks, stack, order)?;
                }
                None => self.check_external(module, dep)?,
            }
        }

        // Loaded at runtime: must exist, but imposes no build order.
        for dep in module.dynamically_loaded() {
            if !self.index.contains_key(dep.as_str()) {
                self.check_external(module, dep)?;
            }
        }

        stack.pop();
        marks[i] = Mark::Done;
        order.push(i);
        Ok(())
    }

    fn check_external(&self, module: &ModuleDescriptor, dep: &str) -> Result<()> {
        if self.is_external(dep) {
            Ok(())
        } else {
            Err(RegistryError::UnresolvedDependency {
                module: module.name().to_string(),
                dependency: dep.to_string(),
            })
        }
    }
}
