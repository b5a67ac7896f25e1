//! `modplan init` — manifest scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use modplan_registry::{PluginManifest, MANIFEST_FILE};

/// Write the canonical manifest into `dir`.
///
/// The plugin name defaults to the directory's name.
pub fn run(dir: &Path, name: Option<&str>) -> Result<()> {
    let name = match name {
        Some(n) => n.to_string(),
        None => dir
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .context("cannot infer a plugin name from the directory; pass --name")?,
    };
    let path = create_manifest(dir, &name)?;
    println!("Created {}", path.display());
    println!("  [[module]] {name}Runtime (runtime, links SDK)");
    println!("  [[module]] {name}Editor (editor)");
    Ok(())
}

pub(crate) fn create_manifest(dir: &Path, name: &str) -> Result<std::path::PathBuf> {
    let path = dir.join(MANIFEST_FILE);
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    fs::write(&path, PluginManifest::template(name))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
