//! Locating and loading `modplan.toml`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use modplan_registry::{PluginManifest, MANIFEST_FILE};
use modplan_targets::TargetPlatform;

/// A parsed manifest and the plugin directory it describes.
#[derive(Debug)]
pub struct LoadedManifest {
    pub manifest: PluginManifest,
    pub plugin_dir: PathBuf,
}

/// Search upward from `start_dir` for a `modplan.toml` file, parse and return
/// it along with the directory it was found in.
pub fn find_and_load(start_dir: &Path) -> Result<Option<LoadedManifest>> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(MANIFEST_FILE);
        if candidate.is_file() {
            let manifest = PluginManifest::load(&candidate)
                .with_context(|| format!("loading {}", candidate.display()))?;
            log::debug!("using manifest {}", candidate.display());
            return Ok(Some(LoadedManifest {
                manifest,
                plugin_dir: dir,
            }));
        }
        if !dir.pop() {
            break;
        }
    }
    Ok(None)
}

/// Load from an explicit path, or search upward from `cwd`.
pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<LoadedManifest> {
    if let Some(path) = explicit {
        let path = cwd.join(path);
        let manifest = PluginManifest::load(&path)
            .with_context(|| format!("loading {}", path.display()))?;
        let plugin_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf());
        return Ok(LoadedManifest {
            manifest,
            plugin_dir,
        });
    }

    match find_and_load(cwd)? {
        Some(loaded) => Ok(loaded),
        None => bail!(
            "no {MANIFEST_FILE} found in {} or any parent directory (run 'modplan init')",
            cwd.display()
        ),
    }
}

/// Resolve a platform argument, defaulting to the host.
pub fn resolve_platform(name: Option<&str>) -> Result<TargetPlatform> {
    match name {
        Some(name) => Ok(name.parse()?),
        None => match TargetPlatform::host() {
            Some(p) => Ok(p),
            None => bail!("host platform is not supported; pass --platform"),
        },
    }
}
