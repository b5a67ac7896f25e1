//! Per-platform artifact table.
//!
//! Maps each target platform to the file name of the prebuilt static
//! library a module links. Lookup is direct: a platform with no entry is
//! reported as [`TargetError::UnsupportedPlatform`], never as an empty name.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Result, TargetError};
use crate::platform::TargetPlatform;

/// One registered artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformArtifactEntry {
    /// Target platform.
    pub platform: TargetPlatform,
    /// Static library file name (no directory).
    pub artifact_file_name: String,
}

/// Platform → artifact file name for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactTable {
    module: String,
    entries: BTreeMap<TargetPlatform, String>,
}

impl ArtifactTable {
    /// Create an empty table owned by `module`.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Name of the owning module.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Register the artifact for `platform`.
    ///
    /// Fails if the platform already has an entry, or if the name is blank;
    /// the table is left untouched either way.
    pub fn register(
        &mut self,
        platform: TargetPlatform,
        artifact_file_name: impl Into<String>,
    ) -> Result<()> {
        if self.entries.contains_key(&platform) {
            return Err(TargetError::DuplicateArtifactRegistration {
                module: self.module.clone(),
                platform,
            });
        }
        let artifact_file_name = artifact_file_name.into();
        if artifact_file_name.trim().is_empty() {
            return Err(TargetError::EmptyArtifactName {
                module: self.module.clone(),
                platform,
            });
        }
        log::debug!(
            "module '{}': {platform} artifact '{artifact_file_name}'",
            self.module
        );
        self.entries.insert(platform, artifact_file_name);
        Ok(())
    }

    /// Look up the artifact file name for `platform`.
    pub fn resolve(&self, platform: TargetPlatform) -> Result<&str> {
        self.entries
            .get(&platform)
            .map(String::as_str)
            .ok_or_else(|| TargetError::UnsupportedPlatform {
                module: self.module.clone(),
                platform,
            })
    }

    /// Platforms with a registered artifact, in canonical order.
    pub fn platforms(&self) -> impl Iterator<Item = TargetPlatform> + '_ {
        self.entries.keys().copied()
    }

    /// All entries, in canonical platform order.
    pub fn entries(&self) -> Vec<PlatformArtifactEntry> {
        self.entries
            .iter()
            .map(|(platform, name)| PlatformArtifactEntry {
                platform: *platform,
                artifact_file_name: name.clone(),
            })
            .collect()
    }

    /// Number of registered platforms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no platform is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
