//! Human-readable rendering of the module graph and build plans.
//!
//! ```text
//! SpacetimeDB
//! └── SpacetimeDBEditor (editor)
//!     ├── Core (engine)
//!     └── SpacetimeDBRuntime (runtime)
//!         └── Core (engine)
//! ```

use std::collections::{BTreeSet, HashSet};

use crate::error::Result;
use crate::plan::BuildPlan;
use crate::registry::DescriptorRegistry;

/// Format the registry's dependency graph as a tree.
///
/// Top-level entries are modules no other registered module depends on.
/// A registered module reached a second time is marked `(shared)` and not
/// expanded again. Fails if the graph does not resolve.
pub fn format_tree(plugin: &str, registry: &DescriptorRegistry) -> Result<String> {
    registry.resolve_dependency_graph()?;

    let depended_on: HashSet<&str> = registry
        .modules()
        .iter()
        .flat_map(|m| m.all_dependencies())
        .collect();
    let roots: Vec<&str> = registry
        .modules()
        .iter()
        .map(|m| m.name())
        .filter(|name| !depended_on.contains(name))
        .collect();

    let mut out = format!("{plugin}\n");
    let mut expanded = HashSet::new();
    let mut external = BTreeSet::new();
    let count = roots.len();
    for (i, name) in roots.into_iter().enumerate() {
        format_node(
            &mut out,
            registry,
            name,
            "",
            i == count - 1,
            &mut expanded,
            &mut external,
        );
    }

    out.push_str(&format!(
        "\n{} modules ({} external)\n",
        registry.len(),
        external.len()
    ));
    Ok(out)
}

fn format_node<'a>(
    out: &mut String,
    registry: &'a DescriptorRegistry,
    name: &'a str,
    prefix: &str,
    is_last: bool,
    expanded: &mut HashSet<&'a str>,
    external: &mut BTreeSet<&'a str>,
) {
    let connector = if is_last { "└── " } else { "├── " };

    let Some(module) = registry.get(name) else {
        external.insert(name);
        out.push_str(&format!("{prefix}{connector}{name} (engine)\n"));
        return;
    };

    let kind = module.kind();
    if !expanded.insert(name) {
        out.push_str(&format!("{prefix}{connector}{name} ({kind}) (shared)\n"));
        return;
    }
    let sdk_marker = if module.sdk().is_some() { " [sdk]" } else { "" };
    out.push_str(&format!("{prefix}{connector}{name} ({kind}){sdk_marker}\n"));

    let child_prefix = if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };

    let deps: Vec<&str> = module.all_dependencies().collect();
    let child_count = deps.len();
    for (i, dep) in deps.into_iter().enumerate() {
        format_node(
            out,
            registry,
            dep,
            &child_prefix,
            i == child_count - 1,
            expanded,
            external,
        );
    }
}

/// Format a build plan as indented text.
pub fn format_plan(plan: &BuildPlan) -> String {
    let mut out = format!("{} ({})\n", plan.plugin, plan.platform);
    for (i, module) in plan.modules.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} [{}, pch: {}]\n",
            i + 1,
            module.name,
            module.kind,
            module.pch
        ));
        if !module.include_dirs.is_empty() {
            out.push_str("   include:\n");
            for dir in &module.include_dirs {
                out.push_str(&format!("     {}\n", dir.display()));
            }
        }
        if !module.link_modules.is_empty() {
            out.push_str(&format!("   link: {}\n", module.link_modules.join(", ")));
        }
        if !module.dynamically_loaded.is_empty() {
            out.push_str(&format!(
                "   dynamic: {}\n",
                module.dynamically_loaded.join(", ")
            ));
        }
        if let Some(lib) = &module.static_library {
            out.push_str(&format!("   library: {}\n", lib.display()));
        }
    }
    out
}
