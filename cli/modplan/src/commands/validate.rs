//! `modplan validate` — check declarations against every platform.

use anyhow::{bail, Result};
use modplan_registry::{build_plan, RegistryError};
use modplan_targets::{validate_artifacts, Severity, TargetError, TargetPlatform, ValidationIssue};

use crate::manifest::LoadedManifest;

/// Outcome of validating one manifest.
#[derive(Debug, Default)]
pub struct Report {
    /// Platforms a full plan resolved for.
    pub supported: Vec<TargetPlatform>,
    /// Platforms skipped because a module ships no artifact for them.
    pub unsupported: Vec<(TargetPlatform, String)>,
    /// Artifact naming issues.
    pub issues: Vec<ValidationIssue>,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }
}

/// Validate `loaded`. Graph errors abort; missing artifacts are reported.
pub fn check(loaded: &LoadedManifest) -> Result<Report> {
    let registry = loaded.manifest.to_registry()?;
    let roots = loaded.manifest.roots(&loaded.plugin_dir);
    let mut report = Report::default();

    for platform in TargetPlatform::ALL {
        match build_plan(&loaded.manifest.plugin.name, &registry, &roots, platform) {
            Ok(_) => report.supported.push(platform),
            Err(RegistryError::Target(e @ TargetError::UnsupportedPlatform { .. })) => {
                report.unsupported.push((platform, e.to_string()));
            }
            Err(e) => return Err(e.into()),
        }
    }

    for module in registry.modules() {
        if let Some(sdk) = module.sdk() {
            if let Err(issues) = validate_artifacts(&sdk.artifacts) {
                report.issues.extend(issues);
            }
        }
    }

    Ok(report)
}

/// Run `modplan validate`.
pub fn run(loaded: &LoadedManifest) -> Result<()> {
    let report = check(loaded)?;

    for platform in &report.supported {
        println!("  ok       {platform}");
    }
    for (platform, reason) in &report.unsupported {
        println!("  skipped  {platform}: {reason}");
    }
    for issue in &report.issues {
        println!("{}: {}", issue.severity, issue.message);
    }

    if report.has_errors() {
        bail!("validation failed");
    }
    if report.supported.is_empty() {
        bail!("no platform produces a complete build plan");
    }
    println!("Validation passed.");
    Ok(())
}
