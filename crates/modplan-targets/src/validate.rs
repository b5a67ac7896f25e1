//! Naming checks for registered artifacts.
//!
//! These never fail resolution. A Linux entry ending in `.lib` still links
//! whatever file is named; the check only surfaces a likely copy-paste
//! mistake before the linker does.

use std::fmt;

use crate::artifact::ArtifactTable;

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Likely mistake; resolution still proceeds.
    Warning,
    /// Definite mistake.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A validation issue found in an artifact table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// How serious the issue is.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

/// Check every entry of `table` against its platform's conventions.
///
/// Returns `Ok(())` if clean, or `Err(issues)` with a list of problems.
pub fn validate_artifacts(table: &ArtifactTable) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    for entry in table.entries() {
        let name = entry.artifact_file_name.as_str();

        if name.contains('/') || name.contains('\\') {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                message: format!(
                    "module '{}': artifact '{name}' for {} must be a file name, not a path",
                    table.module(),
                    entry.platform
                ),
            });
        }

        let expected = entry.platform.static_lib_extension();
        let has_expected = name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(expected));
        if !has_expected {
            issues.push(ValidationIssue {
                severity: Severity::Warning,
                message: format!(
                    "module '{}': artifact '{name}' for {} does not end in .{expected}",
                    table.module(),
                    entry.platform
                ),
            });
        }
    }

    for issue in &issues {
        log::warn!("{}", issue.message);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
