//! `modplan plan` and `modplan tree`.

use anyhow::{bail, Result};
use modplan_registry::{build_plan, format_plan, format_tree};
use modplan_targets::TargetPlatform;

use crate::manifest::LoadedManifest;

/// Render the build plan for `platform` in `format` (`text` or `json`).
pub fn render(loaded: &LoadedManifest, platform: TargetPlatform, format: Option<&str>) -> Result<String> {
    let registry = loaded.manifest.to_registry()?;
    let roots = loaded.manifest.roots(&loaded.plugin_dir);
    let plan = build_plan(&loaded.manifest.plugin.name, &registry, &roots, platform)?;

    match format.unwrap_or("text") {
        "text" => Ok(format_plan(&plan)),
        "json" => Ok(plan.to_json()?),
        other => bail!("unknown format '{other}' (expected text or json)"),
    }
}

/// Run `modplan plan`.
pub fn run(loaded: &LoadedManifest, platform: TargetPlatform, format: Option<&str>) -> Result<()> {
    print!("{}", render(loaded, platform, format)?);
    Ok(())
}

/// Run `modplan tree`.
pub fn tree(loaded: &LoadedManifest) -> Result<()> {
    let registry = loaded.manifest.to_registry()?;
    print!("{}", format_tree(&loaded.manifest.plugin.name, &registry)?);
    Ok(())
}
