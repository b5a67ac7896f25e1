//! `modplan artifact` — locate one module's SDK library.

use std::path::PathBuf;

use anyhow::{Context, Result};
use modplan_targets::TargetPlatform;

use crate::manifest::LoadedManifest;

/// Absolute path of the library `module` links on `platform`.
pub fn locate(loaded: &LoadedManifest, module: &str, platform: TargetPlatform) -> Result<PathBuf> {
    let registry = loaded.manifest.to_registry()?;
    let descriptor = registry
        .get(module)
        .with_context(|| format!("module '{module}' is not declared"))?;
    let roots = loaded.manifest.roots(&loaded.plugin_dir);
    let path = descriptor
        .resolve_artifact(platform, &roots)
        .context("no artifact to link")?;
    Ok(path)
}

/// Run `modplan artifact <module>`.
pub fn run(loaded: &LoadedManifest, module: &str, platform: TargetPlatform) -> Result<()> {
    let path = locate(loaded, module, platform)?;
    println!("{}", path.display());
    Ok(())
}
